//! Command dispatch: one subcommand, one client call, one rendering.
//!
//! Every failure surfaces here, is printed as `Error: <message>` on the
//! error stream and becomes exit code 1. Nothing is retried.

use tracing::debug;

use super::command::{
    CloseArgs, Commands, CreateArgs, FormatArgs, MarketsArgs, OpenOrdersArgs, OrderRefArgs,
    OrdersArgs, OutputFormat,
};
use super::output::{mark, Output};
use super::prompt::Confirmation;
use super::render;
use crate::application::client::ExchangeClient;
use crate::domain::{open_positions, MarketFilter};
use crate::error::{Error, Result};

/// Exit code for a command that completed.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for any reported error.
pub const EXIT_FAILURE: i32 = 1;

/// Capabilities listed by `info`, as (label, capability flag).
const FEATURES: &[(&str, &str)] = &[
    ("Fetch Ticker", "fetchTicker"),
    ("Fetch Tickers", "fetchTickers"),
    ("Fetch Order Book", "fetchOrderBook"),
    ("Fetch Trades", "fetchTrades"),
    ("Fetch OHLCV", "fetchOHLCV"),
    ("Create Order", "createOrder"),
    ("Cancel Order", "cancelOrder"),
    ("Fetch Orders", "fetchOrders"),
    ("Fetch Open Orders", "fetchOpenOrders"),
    ("Fetch Closed Orders", "fetchClosedOrders"),
    ("Fetch Positions", "fetchPositions"),
    ("Fetch Balance", "fetchBalance"),
];

const CLOSE_PROMPT: &str = "Are you sure you want to close this position?";

/// Maps subcommands onto [`ExchangeClient`] calls and renders the results.
pub struct Dispatcher<'a> {
    client: &'a ExchangeClient,
    confirmation: &'a dyn Confirmation,
}

impl<'a> Dispatcher<'a> {
    pub fn new(client: &'a ExchangeClient, confirmation: &'a dyn Confirmation) -> Self {
        Self {
            client,
            confirmation,
        }
    }

    /// Run `command` and return the process exit code.
    pub async fn run(&self, command: Commands, output: &mut Output<'_>) -> i32 {
        let code = match self.execute(command, output).await {
            Ok(()) => EXIT_SUCCESS,
            Err(err) => {
                debug!(error = ?err, "Command failed");
                let _ = output.error(&err);
                EXIT_FAILURE
            }
        };
        let _ = output.flush();
        code
    }

    async fn execute(&self, command: Commands, output: &mut Output<'_>) -> Result<()> {
        match command {
            Commands::Create(args) => self.create(args, output).await,
            Commands::Cancel(args) => self.cancel(args, output).await,
            Commands::Status(args) => self.status(args, output).await,
            Commands::Orders(args) => self.orders(args, output).await,
            Commands::Positions(args) => self.positions(args, output).await,
            Commands::Close(args) => self.close(args, output).await,
            Commands::GetOpenOrders(args) => self.open_orders(args, output).await,
            Commands::Markets(args) => self.markets(args, output).await,
            Commands::Info => self.info(output).await,
        }
    }

    async fn create(&self, args: CreateArgs, output: &mut Output<'_>) -> Result<()> {
        let order = self
            .client
            .create_order(
                &args.symbol,
                args.side,
                args.order_type,
                args.amount,
                args.price,
            )
            .await?;

        output.success("Order created successfully!")?;
        output.field("Order ID", &order.id)?;
        output.field("Status", render::text_or_na(order.status.as_deref()))?;
        output.json(&order)
    }

    async fn cancel(&self, args: OrderRefArgs, output: &mut Output<'_>) -> Result<()> {
        let receipt = self.client.cancel_order(&args.order_id, &args.symbol).await?;

        output.success(&format!("Order {} cancelled successfully!", args.order_id))?;
        output.json(&receipt)
    }

    async fn status(&self, args: OrderRefArgs, output: &mut Output<'_>) -> Result<()> {
        let order = self
            .client
            .get_order_status(&args.order_id, &args.symbol)
            .await?;

        output.field("Order Status", render::text_or_na(order.status.as_deref()))?;
        output.field("Type", order.order_type)?;
        output.field("Side", order.side)?;
        output.field("Amount", order.amount.normalize())?;
        output.field("Filled", order.filled_amount().normalize())?;
        if let Some(price) = order.price.filter(|p| !p.is_zero()) {
            output.field("Price", price.normalize())?;
        }
        output.field("Created", render::timestamp(order.timestamp))?;
        Ok(())
    }

    async fn orders(&self, args: OrdersArgs, output: &mut Output<'_>) -> Result<()> {
        let orders = self
            .client
            .list_orders(args.symbol.as_deref(), args.status)
            .await?;

        if orders.is_empty() {
            output.line("No orders found.")?;
            return Ok(());
        }
        match args.format {
            OutputFormat::Json => output.json(&orders),
            OutputFormat::Table => Ok(output.block(&render::orders_table(&orders))?),
        }
    }

    async fn positions(&self, args: FormatArgs, output: &mut Output<'_>) -> Result<()> {
        let positions = open_positions(self.client.get_positions().await?);

        if positions.is_empty() {
            output.line("No open positions found.")?;
            return Ok(());
        }
        match args.format {
            OutputFormat::Json => output.json(&positions),
            OutputFormat::Table => Ok(output.block(&render::positions_table(&positions))?),
        }
    }

    async fn close(&self, args: CloseArgs, output: &mut Output<'_>) -> Result<()> {
        let positions = self.client.get_positions().await?;
        let Some(position) = positions
            .into_iter()
            .find(|p| p.symbol == args.symbol && p.is_open())
        else {
            output.line(format!("No open position found for {}", args.symbol))?;
            return Ok(());
        };

        output.line("Position to close:")?;
        output.field("Symbol", &position.symbol)?;
        output.field(
            "Side",
            position
                .direction()
                .map_or_else(|| render::NOT_AVAILABLE.to_string(), |d| d.to_string()),
        )?;
        output.field("Contracts", position.size().normalize())?;
        output.field(
            "Unrealized PnL",
            render::fixed_or_zero(position.unrealized_pnl, 2),
        )?;

        if !args.confirm && !self.confirmation.confirm(CLOSE_PROMPT)? {
            output.line("Cancelled.")?;
            return Ok(());
        }

        let order = match self.client.close_position(&args.symbol, true).await {
            Ok(order) => order,
            // The position went flat between the two fetches.
            Err(Error::NotFound(message)) => {
                output.line(message)?;
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        output.success("Position closed successfully!")?;
        output.field("Order ID", &order.id)?;
        output.field("Status", render::text_or_na(order.status.as_deref()))?;
        Ok(())
    }

    async fn open_orders(&self, args: OpenOrdersArgs, output: &mut Output<'_>) -> Result<()> {
        let orders = self.client.get_open_orders(&args.symbol).await?;

        if orders.is_empty() {
            output.line(format!("No open orders found for {}", args.symbol))?;
            return Ok(());
        }
        match args.format {
            OutputFormat::Json => output.json(&orders),
            OutputFormat::Table => {
                output.block(&render::open_orders_table(&orders))?;
                output.blank()?;
                output.line(format!("Total open orders: {}", orders.len()))?;
                Ok(())
            }
        }
    }

    async fn markets(&self, args: MarketsArgs, output: &mut Output<'_>) -> Result<()> {
        let filter = MarketFilter {
            active_only: args.active,
            market_type: args.market_type,
            quote: args.quote,
        };
        let markets = filter.apply(self.client.list_markets().await?);

        if markets.is_empty() {
            output.line("No markets found matching the criteria.")?;
            return Ok(());
        }
        match args.format {
            OutputFormat::Json => output.json(&markets),
            OutputFormat::Table => {
                let (table, remaining) = render::markets_table(&markets);
                output.block(&table)?;
                if remaining > 0 {
                    output.blank()?;
                    output.line(format!("... and {remaining} more markets"))?;
                }
                Ok(())
            }
        }
    }

    async fn info(&self, output: &mut Output<'_>) -> Result<()> {
        let info = self.client.describe().await?;

        output.field("Exchange", &info.name)?;
        output.field(
            "Version",
            info.version.as_deref().unwrap_or(render::NOT_AVAILABLE),
        )?;
        output.field(
            "Rate Limit",
            if info.rate_limit_enabled {
                "Enabled"
            } else {
                "Disabled"
            },
        )?;
        output.field("Has CORS", info.supports("CORS"))?;
        output.field("Has Public API", info.supports("publicAPI"))?;
        output.field("Has Private API", info.supports("privateAPI"))?;

        output.blank()?;
        output.line("Available Features:")?;
        for (label, capability) in FEATURES {
            output.line(format!("  {} {label}", mark(info.supports(capability))))?;
        }
        Ok(())
    }
}
