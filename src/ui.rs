// UI layer: runs one intent against the API and renders the result.
// Listing output goes to `out`; spinners and the ✔/✖ status lines go to
// `status`. Each handler reports exactly one final status and never retries.

use crate::api::{tasks_in_project, NewTask, TodoistClient};
use crate::cli::{AddTask, Intent, USAGE};
use crossterm::style::Stylize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Stderr, Stdout, Write};
use std::time::Duration;
use tracing::{debug, info};

const TICK: Duration = Duration::from_millis(80);

/// The final status line a handler reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Succeeded(String),
    Failed(String),
}

/// A running progress indicator. Consumed by [`Console::succeed`] or
/// [`Console::fail`].
pub struct Spinner(ProgressBar);

impl Spinner {
    pub fn set_message(&self, msg: impl Into<String>) {
        self.0.set_message(msg.into());
    }
}

/// Output sinks plus whether spinners are drawn at all.
pub struct Console<O, S> {
    out: O,
    status: S,
    animate: bool,
}

impl Console<Stdout, Stderr> {
    /// Console on the process's stdout and stderr. `indicatif` itself hides
    /// the spinner when stderr is not a terminal.
    pub fn stdio() -> Self {
        Console::new(io::stdout(), io::stderr(), true)
    }
}

impl<O: Write, S: Write> Console<O, S> {
    pub fn new(out: O, status: S, animate: bool) -> Self {
        Console {
            out,
            status,
            animate,
        }
    }

    /// Listing output written so far.
    pub fn output(&self) -> &O {
        &self.out
    }

    /// Status lines written so far.
    pub fn status_output(&self) -> &S {
        &self.status
    }

    /// Start a spinner showing `msg`.
    pub fn spinner(&self, msg: impl Into<String>) -> Spinner {
        let bar = if self.animate {
            let bar = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
                bar.set_style(style);
            }
            bar.enable_steady_tick(TICK);
            bar
        } else {
            ProgressBar::hidden()
        };
        bar.set_message(msg.into());
        Spinner(bar)
    }

    /// Stop the spinner and persist a success line.
    pub fn succeed(&mut self, spinner: Spinner, msg: impl Into<String>) -> io::Result<Status> {
        spinner.0.finish_and_clear();
        let msg = msg.into();
        writeln!(self.status, "{} {}", "✔".green(), msg)?;
        Ok(Status::Succeeded(msg))
    }

    /// Stop the spinner and persist a failure line.
    pub fn fail(&mut self, spinner: Spinner, msg: impl Into<String>) -> io::Result<Status> {
        spinner.0.finish_and_clear();
        let msg = msg.into();
        writeln!(self.status, "{} {}", "✖".red(), msg)?;
        Ok(Status::Failed(msg))
    }

    /// Print one line of listing output.
    pub fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text)
    }
}

/// Execute `intent`. Returns the final status, or `None` when only the usage
/// text was printed.
pub fn run<O: Write, S: Write>(
    api: &TodoistClient,
    console: &mut Console<O, S>,
    intent: Intent,
) -> io::Result<Option<Status>> {
    info!(?intent, request_id = %api.request_id(), "running command");
    let status = match intent {
        Intent::ListProjects => list_projects(api, console)?,
        Intent::ListTasks { project } => list_tasks(api, console, project.as_deref())?,
        Intent::AddTask(request) => add_task(api, console, request)?,
        Intent::Help => {
            console.line(USAGE)?;
            return Ok(None);
        }
    };
    Ok(Some(status))
}

/// Print every project name, in the order the service returns them.
pub fn list_projects<O: Write, S: Write>(
    api: &TodoistClient,
    console: &mut Console<O, S>,
) -> io::Result<Status> {
    let spinner = console.spinner("Fetching projects");
    let projects = match api.projects() {
        Ok(projects) => projects,
        Err(e) => return console.fail(spinner, format!("{e:#}")),
    };
    let status = console.succeed(spinner, "Fetched!")?;
    for project in &projects {
        console.line(&project.name)?;
    }
    Ok(status)
}

/// Print the content of every task, or only of those in `project`.
///
/// An unknown project is reported and nothing is printed.
pub fn list_tasks<O: Write, S: Write>(
    api: &TodoistClient,
    console: &mut Console<O, S>,
    project: Option<&str>,
) -> io::Result<Status> {
    let spinner = console.spinner("Fetching tasks");
    let mut tasks = match api.tasks() {
        Ok(tasks) => tasks,
        Err(e) => return console.fail(spinner, format!("{e:#}")),
    };
    let status = console.succeed(spinner, "Fetched!")?;

    if let Some(name) = project {
        let spinner = console.spinner(format!("Resolving project '{}'", name));
        match api.resolve_project(name) {
            Ok(Some(id)) => {
                spinner.set_message("Filtering by project");
                tasks = tasks_in_project(tasks, id);
                debug!(project_id = id, kept = tasks.len(), "filtered tasks");
                spinner.0.finish_and_clear();
            }
            Ok(None) => return console.fail(spinner, not_found(name)),
            Err(e) => return console.fail(spinner, format!("{e:#}")),
        }
    }

    for task in &tasks {
        console.line(&task.content)?;
    }
    Ok(status)
}

/// Create a task, filing it under the named project when one is given.
/// No POST is made if the project cannot be resolved.
pub fn add_task<O: Write, S: Write>(
    api: &TodoistClient,
    console: &mut Console<O, S>,
    request: AddTask,
) -> io::Result<Status> {
    let spinner = console.spinner("Creating task");
    let mut task = NewTask {
        content: request.content,
        due_string: request.due,
        project_id: None,
    };

    if let Some(name) = request.project.as_deref() {
        spinner.set_message(format!("Resolving {}", name));
        match api.resolve_project(name) {
            Ok(Some(id)) => {
                spinner.set_message("Resolved project");
                task.project_id = Some(id);
            }
            Ok(None) => return console.fail(spinner, not_found(name)),
            Err(e) => return console.fail(spinner, format!("{e:#}")),
        }
    }

    spinner.set_message("Posting task");
    match api.create_task(&task) {
        Ok(()) => console.succeed(spinner, "Posted!"),
        Err(e) => console.fail(spinner, format!("{e:#}")),
    }
}

fn not_found(name: &str) -> String {
    format!("Project '{}' not found.", name)
}
