//! Command line parsing.
//!
//! The raw flags are parsed with `clap` and then collapsed into exactly one
//! [`Intent`]. Flags never conflict: when several commands are given the
//! first one in the order projects, list, add wins and the rest are ignored.

use clap::Parser;
use tracing::debug;

/// Usage text printed for `--help` and whenever no command is recognised.
pub const USAGE: &str = r#"
  Allows for adding and listing tasks from Todoist.

  commands:
    --add     -a    Add a task
    --list    -l    List tasks
    --projects      List projects

  options:
    --due     -d    A date string, eg. tomorrow, 'every day @ 10'
    --project -p    Filters task list, or sets project when adding a new task

  environment:
    TODOIST_TOKEN       API token (required)
    TODOIST_API_URL     REST API base URL, default https://api.todoist.com/rest/v1;
                        point it at an endpoint serving integer ids
    TODOIST_TIMEOUT_MS  Request timeout in milliseconds, default 1000

  example:
    todoist-cli --due sunday --add "Walk the dog"
    todoist-cli --list --project "Shopping"
"#;

// Help output is always `USAGE`; repeating a flag keeps the last value
// instead of failing the parse.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "todoist-cli",
    override_help = USAGE,
    disable_version_flag = true,
    args_override_self = true
)]
pub struct Args {
    #[arg(long)]
    pub projects: bool,

    #[arg(short, long)]
    pub list: bool,

    #[arg(short, long, value_name = "CONTENT")]
    pub add: Option<String>,

    #[arg(short, long, value_name = "NAME")]
    pub project: Option<String>,

    #[arg(short, long, value_name = "DATE")]
    pub due: Option<String>,
}

/// A request to create a task, before the project name is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddTask {
    pub content: String,
    pub due: Option<String>,
    pub project: Option<String>,
}

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    ListProjects,
    ListTasks { project: Option<String> },
    AddTask(AddTask),
    Help,
}

impl Args {
    /// Collapse the parsed flags into a single intent.
    pub fn into_intent(self) -> Intent {
        let project = non_empty(self.project);
        if self.projects {
            Intent::ListProjects
        } else if self.list {
            Intent::ListTasks { project }
        } else if let Some(content) = non_empty(self.add) {
            Intent::AddTask(AddTask {
                content,
                due: non_empty(self.due),
                project,
            })
        } else {
            Intent::Help
        }
    }
}

/// Parse an argument vector (including the program name) into an intent.
///
/// Anything `clap` rejects, including `--help`, resolves to [`Intent::Help`].
pub fn resolve<I, T>(args: I) -> Intent
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match Args::try_parse_from(args) {
        Ok(args) => args.into_intent(),
        Err(e) => {
            debug!(kind = ?e.kind(), "unusable arguments, showing usage");
            Intent::Help
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
