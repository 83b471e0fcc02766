//! Command-line interface definitions.
//!
//! Defines the CLI structure for dexcli using `clap`. Each subcommand maps to
//! one [`ExchangeClient`](crate::application::client::ExchangeClient)
//! operation.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;

use crate::domain::{MarketType, OrderSide, OrderStatusFilter, OrderType};

/// Command line interface for trading on cryptocurrency exchanges
#[derive(Parser, Debug)]
#[command(name = "dexcli")]
#[command(version)]
pub struct Cli {
    /// Exchange id (overrides config and DEXCLI_EXCHANGE)
    #[arg(long, global = true)]
    pub exchange: Option<String>,

    /// Path to configuration file [default: ~/.dexcli/config.toml]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Create a new order
    Create(CreateArgs),

    /// Cancel an existing order
    Cancel(OrderRefArgs),

    /// Get the status of a specific order
    Status(OrderRefArgs),

    /// List orders
    Orders(OrdersArgs),

    /// Show open positions
    Positions(FormatArgs),

    /// Close an open position
    Close(CloseArgs),

    /// Get open orders for a specific symbol
    GetOpenOrders(OpenOrdersArgs),

    /// List available markets
    Markets(MarketsArgs),

    /// Show exchange information
    Info,
}

/// Output format for listing commands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Fixed-column table
    #[default]
    Table,
    /// Indented JSON
    Json,
}

/// Parse a strictly positive decimal.
fn positive_decimal(raw: &str) -> Result<Decimal, String> {
    let value: Decimal = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a valid decimal number"))?;
    if value <= Decimal::ZERO {
        return Err(format!("must be greater than 0, got {value}"));
    }
    Ok(value)
}

/// Arguments for the `create` subcommand.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct CreateArgs {
    /// Trading symbol (e.g., BTC/USDT)
    #[arg(short, long)]
    pub symbol: String,

    /// Order side
    #[arg(short = 'd', long, value_enum)]
    pub side: OrderSide,

    /// Order type
    #[arg(short = 't', long = "type", value_enum, default_value_t = OrderType::Limit)]
    pub order_type: OrderType,

    /// Order amount
    #[arg(short, long, value_parser = positive_decimal)]
    pub amount: Decimal,

    /// Order price (required for limit orders)
    #[arg(short, long, value_parser = positive_decimal)]
    pub price: Option<Decimal>,
}

/// Arguments identifying one order.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct OrderRefArgs {
    /// Order ID
    #[arg(short = 'i', long)]
    pub order_id: String,

    /// Trading symbol
    #[arg(short, long)]
    pub symbol: String,
}

/// Arguments for the `orders` subcommand.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct OrdersArgs {
    /// Filter by trading symbol
    #[arg(short, long)]
    pub symbol: Option<String>,

    /// Order status filter
    #[arg(short = 't', long, value_enum, default_value_t = OrderStatusFilter::Open)]
    pub status: OrderStatusFilter,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Output format selection only.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct FormatArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Arguments for the `close` subcommand.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct CloseArgs {
    /// Position symbol to close
    #[arg(short, long)]
    pub symbol: String,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub confirm: bool,
}

/// Arguments for the `get-open-orders` subcommand.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct OpenOrdersArgs {
    /// Trading symbol (e.g., BTC/USDT)
    #[arg(short, long)]
    pub symbol: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Arguments for the `markets` subcommand.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct MarketsArgs {
    /// Show only active markets
    #[arg(short, long)]
    pub active: bool,

    /// Filter by market type
    #[arg(short = 't', long = "type", value_enum)]
    pub market_type: Option<MarketType>,

    /// Filter by quote currency (e.g., USDT)
    #[arg(short, long)]
    pub quote: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rust_decimal_macros::dec;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("dexcli").chain(args.iter().copied()))
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn create_defaults_to_limit() {
        let cli = parse(&["create", "-s", "BTC/USDT", "-d", "buy", "-a", "0.01"]).unwrap();
        match cli.command {
            Commands::Create(args) => {
                assert_eq!(args.order_type, OrderType::Limit);
                assert_eq!(args.amount, dec!(0.01));
                assert_eq!(args.price, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn amount_and_price_must_be_positive() {
        assert!(parse(&["create", "-s", "BTC/USDT", "-d", "buy", "-a", "0"]).is_err());
        assert!(parse(&["create", "-s", "BTC/USDT", "-d", "buy", "-a", "abc"]).is_err());
        assert!(parse(&[
            "create", "-s", "BTC/USDT", "-d", "buy", "-a", "1", "-p", "-5"
        ])
        .is_err());
    }

    #[test]
    fn enumerated_options_reject_unknown_values() {
        assert!(parse(&["create", "-s", "X", "-d", "hold", "-a", "1"]).is_err());
        assert!(parse(&["orders", "--status", "pending"]).is_err());
        assert!(parse(&["positions", "--format", "csv"]).is_err());
        assert!(parse(&["markets", "--type", "option"]).is_err());
    }

    #[test]
    fn get_open_orders_uses_kebab_case_name() {
        let cli = parse(&["get-open-orders", "--symbol", "ETH/USDT", "-f", "json"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::GetOpenOrders(OpenOrdersArgs {
                symbol: "ETH/USDT".into(),
                format: OutputFormat::Json,
            })
        );
    }

    #[test]
    fn global_flags_apply_after_subcommand() {
        let cli = parse(&["markets", "--exchange", "paper", "-vv", "-a", "-t", "swap"]).unwrap();
        assert_eq!(cli.exchange.as_deref(), Some("paper"));
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Markets(args) => {
                assert!(args.active);
                assert_eq!(args.market_type, Some(MarketType::Swap));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn close_confirm_flag() {
        let cli = parse(&["close", "-s", "ETH/USDT", "-y"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Close(CloseArgs {
                symbol: "ETH/USDT".into(),
                confirm: true,
            })
        );
    }
}
