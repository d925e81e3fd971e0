// API client module: a small blocking HTTP client for the Todoist REST API.
// Every call is a single request with no retry; errors carry the step that
// failed so the UI can print them as a one-line status.

use anyhow::{Context, Result};
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::Config;

/// Header carrying the per-process request identifier.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// A named grouping of tasks. Fields not listed here are ignored.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: u64,
    pub name: String,
}

/// A task as returned by the service. Fields not listed here are ignored.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: u64,
    pub content: String,
    pub project_id: u64,
    #[serde(default)]
    pub due: Option<Due>,
}

/// Due information attached to a task.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Due {
    /// The human-readable form, e.g. "every day @ 10".
    pub string: String,
}

impl Task {
    /// The natural-language due string, if the task has one.
    pub fn due_string(&self) -> Option<&str> {
        self.due.as_ref().map(|d| d.string.as_str())
    }
}

/// Payload for the create-task endpoint. Absent optional fields are left
/// out of the JSON body so the service applies its own defaults.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
}

/// Blocking client holding the configured reqwest client and base URL.
/// Authorization and request-id headers are attached to every request.
#[derive(Clone)]
pub struct TodoistClient {
    client: Client,
    base_url: String,
    request_id: Uuid,
}

impl TodoistClient {
    /// Build a client from the runtime configuration. A fresh request id is
    /// generated for the lifetime of the client.
    pub fn new(config: &Config) -> Result<Self> {
        let request_id = Uuid::new_v4();
        let headers = default_headers(&config.token, request_id)?;
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(TodoistClient {
            client,
            base_url: config.base_url.clone(),
            request_id,
        })
    }

    /// The identifier sent in the `X-Request-Id` header.
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// GET /projects.
    pub fn projects(&self) -> Result<Vec<Project>> {
        let url = self.url("projects");
        debug!(%url, "fetching projects");
        let res = self
            .client
            .get(&url)
            .send()
            .context("Failed to send projects request")?;
        let projects: Vec<Project> = ensure_success(res)?
            .json()
            .context("Parsing projects response json")?;
        debug!(count = projects.len(), "fetched projects");
        Ok(projects)
    }

    /// GET /tasks.
    pub fn tasks(&self) -> Result<Vec<Task>> {
        let url = self.url("tasks");
        debug!(%url, "fetching tasks");
        let res = self
            .client
            .get(&url)
            .send()
            .context("Failed to send tasks request")?;
        let tasks: Vec<Task> = ensure_success(res)?
            .json()
            .context("Parsing tasks response json")?;
        debug!(count = tasks.len(), "fetched tasks");
        Ok(tasks)
    }

    /// POST /tasks. The response body is not needed and is discarded.
    pub fn create_task(&self, task: &NewTask) -> Result<()> {
        let url = self.url("tasks");
        debug!(%url, ?task, "creating task");
        let res = self
            .client
            .post(&url)
            .json(task)
            .send()
            .context("Failed to send create task request")?;
        ensure_success(res)?;
        Ok(())
    }

    /// Resolve a project name to its id against a fresh project list.
    ///
    /// Returns `Ok(None)` when no project matches; that is the normal
    /// "not found" outcome, not an error.
    pub fn resolve_project(&self, name: &str) -> Result<Option<u64>> {
        let projects = self.projects()?;
        let id = find_project(&projects, name).map(|p| p.id);
        debug!(project = name, ?id, "resolved project");
        Ok(id)
    }
}

/// First project whose name matches `name` ignoring case.
pub fn find_project<'a>(projects: &'a [Project], name: &str) -> Option<&'a Project> {
    let wanted = name.to_lowercase();
    projects.iter().find(|p| p.name.to_lowercase() == wanted)
}

/// Keep only the tasks belonging to `project_id`, in their original order.
pub fn tasks_in_project(tasks: Vec<Task>, project_id: u64) -> Vec<Task> {
    tasks
        .into_iter()
        .filter(|t| t.project_id == project_id)
        .collect()
}

fn default_headers(token: &str, request_id: Uuid) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
        .context("API token contains characters not allowed in a header")?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);
    headers.insert(
        HeaderName::from_static(REQUEST_ID_HEADER),
        HeaderValue::from_str(&request_id.to_string()).context("Invalid request id header")?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

fn ensure_success(res: Response) -> Result<Response> {
    let status = res.status();
    if !status.is_success() {
        let txt = res.text().unwrap_or_default();
        debug!(%status, body = %txt, "request rejected");
        anyhow::bail!("request failed with status code {}", status);
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn project(id: u64, name: &str) -> Project {
        Project {
            id,
            name: name.into(),
        }
    }

    fn task(id: u64, content: &str, project_id: u64) -> Task {
        Task {
            id,
            content: content.into(),
            project_id,
            due: None,
        }
    }

    #[test]
    fn find_project_ignores_case() {
        let projects = vec![project(1, "Inbox"), project(7, "Shopping")];
        assert_eq!(find_project(&projects, "shopping").map(|p| p.id), Some(7));
        assert_eq!(find_project(&projects, "SHOPPING").map(|p| p.id), Some(7));
    }

    #[test]
    fn find_project_requires_exact_name() {
        let projects = vec![project(7, "Shopping")];
        assert!(find_project(&projects, "Shop").is_none());
        assert!(find_project(&projects, "Shopping list").is_none());
        assert!(find_project(&[], "Shopping").is_none());
    }

    #[test]
    fn find_project_returns_first_match() {
        let projects = vec![project(3, "work"), project(4, "Work")];
        assert_eq!(find_project(&projects, "WORK").map(|p| p.id), Some(3));
    }

    #[test]
    fn tasks_in_project_keeps_order() {
        let tasks = vec![task(1, "a", 1), task(2, "b", 2), task(3, "c", 2)];
        let kept: Vec<_> = tasks_in_project(tasks, 2)
            .into_iter()
            .map(|t| t.content)
            .collect();
        assert_eq!(kept, vec!["b", "c"]);
    }

    #[test]
    fn new_task_omits_absent_fields() {
        let body = serde_json::to_value(NewTask {
            content: "Walk the dog".into(),
            ..NewTask::default()
        })
        .expect("serialize");
        assert_eq!(body, json!({ "content": "Walk the dog" }));
    }

    #[test]
    fn new_task_includes_due_and_project() {
        let body = serde_json::to_value(NewTask {
            content: "Buy milk".into(),
            due_string: Some("tomorrow".into()),
            project_id: Some(42),
        })
        .expect("serialize");
        assert_eq!(
            body,
            json!({ "content": "Buy milk", "due_string": "tomorrow", "project_id": 42 })
        );
    }

    #[test]
    fn task_ignores_unknown_fields() {
        let task: Task = serde_json::from_value(json!({
            "id": 9,
            "content": "Read",
            "project_id": 2,
            "completed": false,
            "due": { "string": "today", "date": "2024-01-01" }
        }))
        .expect("deserialize");
        assert_eq!(task.content, "Read");
        assert_eq!(task.project_id, 2);
        assert_eq!(task.due_string(), Some("today"));
    }

    #[test]
    fn task_without_due() {
        let task: Task = serde_json::from_value(json!({
            "id": 9,
            "content": "Read",
            "project_id": 2,
            "due": null
        }))
        .expect("deserialize");
        assert_eq!(task.due_string(), None);
    }
}
