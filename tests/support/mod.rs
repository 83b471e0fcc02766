//! Shared helpers for integration tests.

use std::sync::Arc;

use dexcli::adapter::inbound::cli::output::Output;
use dexcli::adapter::inbound::cli::prompt::FixedConfirmation;
use dexcli::adapter::inbound::cli::{Cli, Dispatcher};
use dexcli::application::ExchangeClient;
use dexcli::port::ExchangeConnector;

use clap::Parser;

/// Captured result of one dispatched command.
pub struct Outcome {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Parse `args` as a command line and run it against `connector`.
///
/// Confirmation prompts are answered with `confirm`.
pub async fn dispatch(
    connector: Arc<dyn ExchangeConnector>,
    confirm: bool,
    args: &[&str],
) -> Outcome {
    let cli = Cli::try_parse_from(std::iter::once("dexcli").chain(args.iter().copied()))
        .expect("valid command line");
    let client = ExchangeClient::new(connector);
    let confirmation = FixedConfirmation(confirm);

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = {
        let mut output = Output::new(&mut stdout, &mut stderr);
        Dispatcher::new(&client, &confirmation)
            .run(cli.command, &mut output)
            .await
    };

    Outcome {
        code,
        stdout: String::from_utf8(stdout).expect("utf8 stdout"),
        stderr: String::from_utf8(stderr).expect("utf8 stderr"),
    }
}

/// Pull the value of a `Label: value` line out of command output.
pub fn field<'a>(output: &'a str, label: &str) -> Option<&'a str> {
    let prefix = format!("{label}: ");
    output
        .lines()
        .find_map(|line| line.strip_prefix(prefix.as_str()))
}
