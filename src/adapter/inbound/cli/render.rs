//! Table rendering for exchange records.
//!
//! Identifiers are shortened for display, decimals are fixed to a small
//! number of places, and epoch-millisecond timestamps are shown in local
//! time.

use chrono::{Local, TimeZone};
use rust_decimal::{Decimal, RoundingStrategy};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::output::mark;
use crate::domain::{Market, Order, Position};

/// Placeholder for values the exchange did not report.
pub const NOT_AVAILABLE: &str = "N/A";

/// Maximum rows shown by the markets table.
pub const MARKET_TABLE_LIMIT: usize = 50;

/// Width of order ids in the `orders` table.
pub const ORDER_ID_WIDTH: usize = 8;

/// Width of order ids in the `get-open-orders` table.
pub const OPEN_ORDER_ID_WIDTH: usize = 12;

/// Shorten `id` to `width` characters followed by `...` when it is longer.
pub fn truncate_id(id: &str, width: usize) -> String {
    if id.chars().count() <= width {
        return id.to_string();
    }
    let head: String = id.chars().take(width).collect();
    format!("{head}...")
}

/// Format with exactly `places` decimal places, rounding half away from zero.
pub fn fixed(value: Decimal, places: u32) -> String {
    let rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    let width = places as usize;
    format!("{rounded:.width$}")
}

/// Format an optional value with `places` decimals, or zero when missing.
pub fn fixed_or_zero(value: Option<Decimal>, places: u32) -> String {
    fixed(value.unwrap_or(Decimal::ZERO), places)
}

/// Format an optional value as reported, or `N/A`.
pub fn or_na(value: Option<Decimal>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.normalize().to_string())
}

/// Exchange-reported text, or `N/A` when the exchange left it null.
pub fn text_or_na(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_string()
}

/// Render epoch milliseconds as local `YYYY-MM-DD HH:MM:SS`.
pub fn timestamp(millis: Option<i64>) -> String {
    millis
        .and_then(|ms| Local.timestamp_millis_opt(ms).single())
        .map_or_else(
            || NOT_AVAILABLE.to_string(),
            |dt| dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        )
}

fn grid<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows).with(Style::ascii()).to_string()
}

#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Type")]
    order_type: String,
    #[tabled(rename = "Side")]
    side: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Filled")]
    filled: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Created")]
    created: String,
}

/// Table for the `orders` command.
pub fn orders_table(orders: &[Order]) -> String {
    grid(
        orders
            .iter()
            .map(|o| OrderRow {
                id: truncate_id(&o.id, ORDER_ID_WIDTH),
                symbol: o.symbol.clone(),
                order_type: o.order_type.to_string(),
                side: o.side.to_string(),
                amount: fixed(o.amount, 4),
                filled: fixed_or_zero(o.filled, 4),
                price: or_na(o.price),
                status: text_or_na(o.status.as_deref()),
                created: timestamp(o.timestamp),
            })
            .collect(),
    )
}

#[derive(Tabled)]
struct OpenOrderRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    order_type: String,
    #[tabled(rename = "Side")]
    side: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Filled")]
    filled: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Created")]
    created: String,
}

/// Table for the `get-open-orders` command; the symbol is implied.
pub fn open_orders_table(orders: &[Order]) -> String {
    grid(
        orders
            .iter()
            .map(|o| OpenOrderRow {
                id: truncate_id(&o.id, OPEN_ORDER_ID_WIDTH),
                order_type: o.order_type.to_string(),
                side: o.side.to_string(),
                amount: fixed(o.amount, 4),
                filled: fixed_or_zero(o.filled, 4),
                price: or_na(o.price),
                status: text_or_na(o.status.as_deref()),
                created: timestamp(o.timestamp),
            })
            .collect(),
    )
}

#[derive(Tabled)]
struct PositionRow {
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Side")]
    side: String,
    #[tabled(rename = "Contracts")]
    contracts: String,
    #[tabled(rename = "Entry Price")]
    entry_price: String,
    #[tabled(rename = "Mark Price")]
    mark_price: String,
    #[tabled(rename = "PnL")]
    pnl: String,
    #[tabled(rename = "PnL %")]
    pnl_percent: String,
    #[tabled(rename = "Margin")]
    margin: String,
}

/// Table for the `positions` command.
pub fn positions_table(positions: &[Position]) -> String {
    grid(
        positions
            .iter()
            .map(|p| PositionRow {
                symbol: p.symbol.clone(),
                side: p
                    .direction()
                    .map_or_else(|| NOT_AVAILABLE.to_string(), |d| d.to_string()),
                contracts: fixed(p.size(), 4),
                entry_price: or_na(p.entry_price),
                mark_price: or_na(p.mark_price),
                pnl: fixed_or_zero(p.unrealized_pnl, 2),
                pnl_percent: format!("{}%", fixed_or_zero(p.percentage, 2)),
                margin: fixed_or_zero(p.initial_margin, 2),
            })
            .collect(),
    )
}

#[derive(Tabled)]
struct MarketRow {
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Type")]
    market_type: String,
    #[tabled(rename = "Base")]
    base: String,
    #[tabled(rename = "Quote")]
    quote: String,
    #[tabled(rename = "Active")]
    active: String,
    #[tabled(rename = "Min Amount")]
    min_amount: String,
    #[tabled(rename = "Min Cost")]
    min_cost: String,
}

/// Table for the `markets` command, capped at [`MARKET_TABLE_LIMIT`] rows.
///
/// Returns the table and the number of markets left out.
pub fn markets_table(markets: &[Market]) -> (String, usize) {
    let shown = markets.len().min(MARKET_TABLE_LIMIT);
    let na = || NOT_AVAILABLE.to_string();
    let table = grid(
        markets[..shown]
            .iter()
            .map(|m| MarketRow {
                symbol: m.symbol.clone(),
                market_type: m.market_type.map_or_else(na, |t| t.to_string()),
                base: m.base.clone().unwrap_or_else(na),
                quote: m.quote.clone().unwrap_or_else(na),
                active: mark(m.is_active()),
                min_amount: or_na(m.min_amount()),
                min_cost: or_na(m.min_cost()),
            })
            .collect(),
    );
    (table, markets.len() - shown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MarketType, OrderSide, OrderType, PositionSide};
    use crate::testkit::domain::{market, order, position, ORDER_TIMESTAMP_MS};
    use rust_decimal_macros::dec;

    #[test]
    fn ids_are_truncated_only_when_longer() {
        assert_eq!(truncate_id("abc123", 8), "abc123");
        assert_eq!(truncate_id("0123456789abcdef", 8), "01234567...");
        assert_eq!(truncate_id("0123456789ab", 12), "0123456789ab");
    }

    #[test]
    fn decimals_are_fixed() {
        assert_eq!(fixed(dec!(0.01), 4), "0.0100");
        assert_eq!(fixed(dec!(-12.345), 2), "-12.35");
        assert_eq!(fixed_or_zero(None, 2), "0.00");
        assert_eq!(or_na(Some(dec!(60000.50))), "60000.5");
        assert_eq!(or_na(None), "N/A");
    }

    #[test]
    fn timestamps_render_in_local_time() {
        let expected = Local
            .timestamp_millis_opt(ORDER_TIMESTAMP_MS)
            .single()
            .unwrap()
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        assert_eq!(timestamp(Some(ORDER_TIMESTAMP_MS)), expected);
        assert_eq!(expected.len(), 19);
        assert_eq!(timestamp(None), "N/A");
    }

    #[test]
    fn orders_table_has_fixed_columns() {
        let orders = vec![order(
            "0xdeadbeefcafebabe",
            "BTC/USDT",
            OrderSide::Buy,
            OrderType::Limit,
            dec!(0.5),
            "open",
        )];
        let table = orders_table(&orders);

        for header in ["ID", "Symbol", "Type", "Side", "Amount", "Filled", "Price", "Status", "Created"] {
            assert!(table.contains(header), "missing {header}\n{table}");
        }
        assert!(table.contains("0xdeadbe..."));
        assert!(table.contains("0.5000"));
        assert!(table.contains("0.0000"));
    }

    #[test]
    fn open_orders_table_omits_symbol() {
        let orders = vec![order(
            "0xdeadbeefcafebabe",
            "BTC/USDT",
            OrderSide::Sell,
            OrderType::Market,
            dec!(1),
            "open",
        )];
        let table = open_orders_table(&orders);
        assert!(!table.contains("Symbol"));
        assert!(table.contains("0xdeadbeefca..."));
        assert!(table.contains("N/A"));
    }

    #[test]
    fn orders_table_shows_missing_status_as_na() {
        let mut unsettled = order("abc123", "BTC/USDT", OrderSide::Buy, OrderType::Other, dec!(1), "open");
        unsettled.status = None;
        unsettled.filled = None;
        let table = orders_table(&[unsettled]);

        assert!(table.contains("other"), "{table}");
        assert!(table.contains("N/A"), "{table}");
        assert!(table.contains("0.0000"), "{table}");
    }

    #[test]
    fn positions_table_fills_missing_figures() {
        let mut pos = position("ETH/USDC:USDC", Some(PositionSide::Short), dec!(1.5));
        pos.unrealized_pnl = Some(dec!(-3.456));
        let table = positions_table(&[pos]);

        assert!(table.contains("Entry Price"));
        assert!(table.contains("short"));
        assert!(table.contains("1.5000"));
        assert!(table.contains("-3.46"));
        assert!(table.contains("0.00%"));
    }

    #[test]
    fn markets_table_caps_rows() {
        let markets: Vec<Market> = (0..53)
            .map(|i| market(&format!("C{i}/USDT"), MarketType::Spot, i % 2 == 0))
            .collect();
        let (table, remaining) = markets_table(&markets);

        assert_eq!(remaining, 3);
        assert!(table.contains("C49/USDT"));
        assert!(!table.contains("C50/USDT"));
        assert!(table.contains("Min Amount"));
    }

    #[test]
    fn short_market_list_is_not_capped() {
        let markets = vec![market("BTC/USDT", MarketType::Spot, true)];
        let (table, remaining) = markets_table(&markets);
        assert_eq!(remaining, 0);
        assert!(table.contains("BTC"));
        assert!(table.contains("0.001"));
    }
}
