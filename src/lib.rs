// Library root
// ------------
// The binary (`main.rs`) wires these modules together for one invocation.
//
// Module responsibilities:
// - `cli`: turns command line flags into a single `Intent`.
// - `config`: reads the API token and client settings from the environment.
// - `api`: blocking HTTP client for the Todoist REST API and project lookup.
// - `ui`: runs an intent, rendering spinners, status lines and listings.
// - `logging`: tracing subscriber setup.
pub mod api;
pub mod cli;
pub mod config;
pub mod logging;
pub mod ui;
