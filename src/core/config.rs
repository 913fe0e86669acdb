//! Game configuration: money, calendar, dice and pricing model.

use serde::{Deserialize, Serialize};

use crate::catalog::Money;
use crate::rules::PricingModel;

/// Complete game configuration.
///
/// `Default` gives the standard rules: $2000 each, 1950 through 2026,
/// a 10 % sell spread and nationality-only dividends.
///
/// ```
/// use stock_exchange::core::GameConfig;
///
/// let config = GameConfig::default().with_end_year(1960).with_starting_cash(5000);
/// assert_eq!(config.end_year, 1960);
/// assert_eq!(config.start_year, 1950);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub starting_cash: Money,
    pub start_year: u32,
    /// Last playable year; the game ends when the calendar passes it.
    pub end_year: u32,
    pub min_players: usize,
    pub max_players: usize,
    /// Percent withheld from every sale.
    pub sell_spread_percent: u32,
    pub movement_die_sides: u32,
    pub valuation_die_sides: u32,
    /// Floor for every stock price.
    pub min_stock_value: Money,
    /// Capacity of the player-visible game log.
    pub log_capacity: usize,
    /// Run valuation when the last player ends their turn, instead of
    /// waiting in `StockValuation` for an explicit roll.
    pub auto_valuation: bool,
    pub pricing: PricingModel,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_cash: 2000,
            start_year: 1950,
            end_year: 2026,
            min_players: 2,
            max_players: 4,
            sell_spread_percent: 10,
            movement_die_sides: 6,
            valuation_die_sides: 20,
            min_stock_value: 1,
            log_capacity: 50,
            auto_valuation: true,
            pricing: PricingModel::default(),
        }
    }
}

impl GameConfig {
    #[must_use]
    pub fn with_starting_cash(mut self, cash: Money) -> Self {
        self.starting_cash = cash;
        self
    }

    #[must_use]
    pub fn with_start_year(mut self, year: u32) -> Self {
        self.start_year = year;
        self
    }

    #[must_use]
    pub fn with_end_year(mut self, year: u32) -> Self {
        self.end_year = year;
        self
    }

    #[must_use]
    pub fn with_auto_valuation(mut self, enabled: bool) -> Self {
        self.auto_valuation = enabled;
        self
    }

    #[must_use]
    pub fn with_pricing(mut self, pricing: PricingModel) -> Self {
        self.pricing = pricing;
        self
    }

    #[must_use]
    pub fn with_sell_spread_percent(mut self, percent: u32) -> Self {
        self.sell_spread_percent = percent.min(100);
        self
    }

    /// Proceeds of selling one share worth `value`.
    #[must_use]
    pub fn sell_price(&self, value: Money) -> Money {
        let keep = f64::from(100 - self.sell_spread_percent.min(100)) / 100.0;
        round_money(value as f64 * keep)
    }
}

/// Round half up to whole dollars (2.5 -> 3, -2.5 -> -2).
#[must_use]
pub fn round_money(value: f64) -> Money {
    (value + 0.5).floor() as Money
}
