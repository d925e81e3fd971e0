// Entrypoint for the CLI application.
// - Refuses to do anything without an API token (exit code 1).
// - Otherwise resolves one intent from the flags and runs it. Reported
//   failures (unknown project, API errors) still exit 0.

use crossterm::style::Stylize;
use std::io::{self, Write};
use todoist_cli::config::{Config, ConfigError, TOKEN_PAGE_URL, TOKEN_VAR};
use todoist_cli::{api::TodoistClient, cli, logging, ui};

fn main() -> anyhow::Result<()> {
    logging::init();
    writeln!(io::stdout(), "{}", "Todoist CLI".red())?;

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(ConfigError::MissingToken) => {
            print_missing_token(&mut io::stdout().lock())?;
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    let intent = cli::resolve(std::env::args_os());
    let api = TodoistClient::new(&config)?;
    let mut console = ui::Console::stdio();
    ui::run(&api, &mut console, intent)?;
    Ok(())
}

fn print_missing_token(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", "API token not set.".red().bold())?;
    writeln!(
        out,
        "Please add a valid token to your environment as `{0}`, eg. by running `export {0}=\"MY_API_TOKEN\"`.",
        TOKEN_VAR
    )?;
    writeln!(out, "You can find your token at: {}.", TOKEN_PAGE_URL)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn missing_token_hint_names_variable_and_page() {
        let mut buf = Vec::new();
        print_missing_token(&mut buf).expect("write to buffer");
        let text = String::from_utf8(buf).expect("utf-8 output");
        assert!(text.contains("API token not set."));
        assert!(text.contains("export TODOIST_TOKEN="));
        assert!(text.contains(TOKEN_PAGE_URL));
    }

    #[test]
    fn missing_token_hint_reports_closed_stdout() {
        let err = print_missing_token(&mut ClosedPipe).expect_err("closed pipe");
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
