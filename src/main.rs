use std::io;

use clap::Parser;
use dexcli::adapter::inbound::cli::dispatch::EXIT_FAILURE;
use dexcli::adapter::inbound::cli::output::Output;
use dexcli::adapter::inbound::cli::paths;
use dexcli::adapter::inbound::cli::prompt::TerminalConfirmation;
use dexcli::adapter::inbound::cli::{Cli, Dispatcher};
use dexcli::infrastructure::config::Config;
use dexcli::infrastructure::factory::connect;
use tracing::debug;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut config = match Config::resolve(cli.config.as_deref(), &paths::default_config()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(EXIT_FAILURE);
        }
    };
    config.apply_env(|key| std::env::var(key).ok());
    config.override_exchange(cli.exchange);
    config.logging.init(cli.verbose);

    let client = match connect(&config) {
        Ok(client) => client,
        Err(e) => {
            debug!(error = %e, "Failed to initialize exchange");
            eprintln!("Error: {e}");
            std::process::exit(EXIT_FAILURE);
        }
    };
    debug!(exchange = client.exchange_id(), "Exchange ready");

    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    let mut output = Output::new(&mut stdout, &mut stderr);
    let confirmation = TerminalConfirmation;
    let code = Dispatcher::new(&client, &confirmation)
        .run(cli.command, &mut output)
        .await;

    std::process::exit(code);
}
