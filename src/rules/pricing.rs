//! Pricing models: how valuation rounds move prices and who gets paid.
//!
//! The turn machine never computes prices itself. It asks a
//! `PricingPolicy` for the outcome of a valuation round or an event and
//! applies what comes back, so models can be swapped without touching it.
//!
//! Three models ship:
//! - `NationalityDividends`: shared prices; a stock that rises pays its
//!   gain per share only to holders whose nationality favours its category.
//! - `ShareholderDividends`: shared prices; every holder of a risen stock is
//!   paid its gain per share, favoured holders get a bonus on top.
//! - `PerHoldingValuation`: every holding carries its own value. The
//!   nationality bonus and weakness are folded into that value and no
//!   dividends are paid.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::catalog::{Catalog, Category, EventCard, Money, StockDefinition, StockId};
use crate::core::config::round_money;
use crate::core::{DiceSource, GameConfig, GameState, PlayerId};

/// Outcome of one stock's valuation roll.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StockRollResult {
    pub stock_id: StockId,
    pub stock_name: String,
    pub roll: u32,
    /// Signed distance of the roll from the neutral roll.
    pub multiplier: i32,
    pub percent_change: f64,
    pub nationality_bonus: f64,
    pub total_change: f64,
    pub old_value: Money,
    pub new_value: Money,
}

/// One player's share of a dividend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DividendRecipient {
    pub player: PlayerId,
    pub player_name: String,
    pub amount: Money,
}

/// Dividend paid by one stock in a valuation round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DividendResult {
    pub stock_id: StockId,
    pub stock_name: String,
    pub category: Category,
    /// Price gain per share this round.
    pub value_change: Money,
    pub recipients: SmallVec<[DividendRecipient; 4]>,
}

impl DividendResult {
    /// Total paid out by this stock.
    #[must_use]
    pub fn total(&self) -> Money {
        self.recipients.iter().map(|r| r.amount).sum()
    }
}

/// New per-player value for one holding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoldingMark {
    pub player: PlayerId,
    pub stock_id: StockId,
    pub value: Money,
}

/// Result of a valuation round, before it is applied to the state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Valuation {
    pub rolls: Vec<StockRollResult>,
    pub marks: Vec<HoldingMark>,
}

/// Read-only view handed to a policy.
#[derive(Clone, Copy, Debug)]
pub struct PricingContext<'a> {
    pub catalog: &'a Catalog,
    pub config: &'a GameConfig,
    /// State before the round or event is applied.
    pub state: &'a GameState,
}

impl PricingContext<'_> {
    /// Current shared price, falling back to the base price.
    #[must_use]
    pub fn market_price(&self, stock: &StockDefinition) -> Money {
        self.state.stock_value(&stock.id).unwrap_or(stock.price)
    }
}

/// Pricing strategy selected when the engine is built.
pub trait PricingPolicy: std::fmt::Debug + Send + Sync {
    /// Which built-in model this is, if any.
    fn model(&self) -> Option<PricingModel> {
        None
    }

    /// Roll every owned stock once and compute its new shared price.
    fn compute_valuation(
        &self,
        ctx: &PricingContext<'_>,
        owned: &[StockId],
        dice: &mut dyn DiceSource,
    ) -> Valuation {
        Valuation {
            rolls: roll_owned_stocks(ctx, owned, dice),
            marks: Vec::new(),
        }
    }

    /// Dividends owed for a valuation round. The engine credits them.
    fn compute_dividends(&self, ctx: &PricingContext<'_>, valuation: &Valuation) -> Vec<DividendResult>;

    /// Per-holding value changes caused by an event, on top of the shared
    /// price change every model applies.
    fn adjust_for_event(&self, _ctx: &PricingContext<'_>, _event: &EventCard) -> Vec<HoldingMark> {
        Vec::new()
    }
}

/// Built-in pricing models.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingModel {
    #[default]
    NationalityDividends,
    ShareholderDividends,
    PerHoldingValuation,
}

impl PricingModel {
    /// Instantiate the policy for this model.
    #[must_use]
    pub fn policy(self) -> Box<dyn PricingPolicy> {
        match self {
            PricingModel::NationalityDividends => Box::new(NationalityDividends),
            PricingModel::ShareholderDividends => Box::new(ShareholderDividends),
            PricingModel::PerHoldingValuation => Box::new(PerHoldingValuation),
        }
    }
}

/// Scale a price by a signed percentage, rounding and flooring it.
#[must_use]
pub fn scale_price(value: Money, percent: f64, floor: Money) -> Money {
    round_money(value as f64 * (1.0 + percent / 100.0)).max(floor)
}

/// Roll the valuation die once per owned stock, in the given order.
///
/// Stocks missing from the catalog are skipped without consuming a roll.
pub fn roll_owned_stocks(
    ctx: &PricingContext<'_>,
    owned: &[StockId],
    dice: &mut dyn DiceSource,
) -> Vec<StockRollResult> {
    owned
        .iter()
        .filter_map(|id| ctx.catalog.stock(id))
        .map(|stock| {
            let roll = dice.roll_die(ctx.config.valuation_die_sides);
            let percent_change = stock.percent_change(roll);
            let old_value = ctx.market_price(stock);
            let new_value = scale_price(old_value, percent_change, ctx.config.min_stock_value);
            log::trace!("valuation {}: rolled {} ({:+}%) {} -> {}", stock.id, roll, percent_change, old_value, new_value);

            StockRollResult {
                stock_id: stock.id.clone(),
                stock_name: stock.name.clone(),
                roll,
                multiplier: stock.roll_offset(roll),
                percent_change,
                nationality_bonus: 0.0,
                total_change: percent_change,
                old_value,
                new_value,
            }
        })
        .collect()
}

/// Shared prices; gains paid only to holders of their favoured category.
#[derive(Clone, Copy, Debug, Default)]
pub struct NationalityDividends;

impl PricingPolicy for NationalityDividends {
    fn model(&self) -> Option<PricingModel> {
        Some(PricingModel::NationalityDividends)
    }

    fn compute_dividends(&self, ctx: &PricingContext<'_>, valuation: &Valuation) -> Vec<DividendResult> {
        rising(ctx.catalog, valuation)
            .into_iter()
            .filter_map(|(stock, gain)| {
                let recipients = ctx
                    .state
                    .players
                    .iter()
                    .filter(|p| p.nationality.favours(stock.category))
                    .filter_map(|p| {
                        let shares = p.shares_of(&stock.id);
                        (shares > 0).then(|| DividendRecipient {
                            player: p.id,
                            player_name: p.name.clone(),
                            amount: gain * Money::from(shares),
                        })
                    })
                    .collect();
                dividend(stock, gain, recipients)
            })
            .collect()
    }
}

/// Shared prices; every holder is paid, favoured holders get a bonus.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShareholderDividends;

impl PricingPolicy for ShareholderDividends {
    fn model(&self) -> Option<PricingModel> {
        Some(PricingModel::ShareholderDividends)
    }

    fn compute_dividends(&self, ctx: &PricingContext<'_>, valuation: &Valuation) -> Vec<DividendResult> {
        valuation
            .rolls
            .iter()
            .filter(|r| r.new_value > r.old_value)
            .filter_map(|roll| {
                let stock = ctx.catalog.stock(&roll.stock_id)?;
                let gain = roll.new_value - roll.old_value;
                let recipients = ctx
                    .state
                    .players
                    .iter()
                    .filter_map(|p| {
                        let shares = p.shares_of(&stock.id);
                        if shares == 0 {
                            return None;
                        }
                        let mut amount = gain * Money::from(shares);
                        if p.nationality.favours(stock.category) && roll.percent_change > 0.0 {
                            amount += round_money(
                                f64::from(shares) * roll.old_value as f64 * p.nationality.bonus.percentage / 100.0,
                            );
                        }
                        Some(DividendRecipient {
                            player: p.id,
                            player_name: p.name.clone(),
                            amount,
                        })
                    })
                    .collect();
                dividend(stock, gain, recipients)
            })
            .collect()
    }
}

/// Each holding carries its own value; no dividends.
#[derive(Clone, Copy, Debug, Default)]
pub struct PerHoldingValuation;

impl PricingPolicy for PerHoldingValuation {
    fn model(&self) -> Option<PricingModel> {
        Some(PricingModel::PerHoldingValuation)
    }

    fn compute_valuation(
        &self,
        ctx: &PricingContext<'_>,
        owned: &[StockId],
        dice: &mut dyn DiceSource,
    ) -> Valuation {
        let rolls = roll_owned_stocks(ctx, owned, dice);
        let mut marks = Vec::new();

        for player in &ctx.state.players {
            for holding in &player.holdings {
                let Some(roll) = rolls.iter().find(|r| r.stock_id == holding.stock_id) else {
                    continue;
                };
                let Some(stock) = ctx.catalog.stock(&holding.stock_id) else {
                    continue;
                };
                let mut percent = roll.percent_change;
                if percent > 0.0 && player.nationality.favours(stock.category) {
                    percent += player.nationality.bonus.percentage;
                }
                marks.push(HoldingMark {
                    player: player.id,
                    stock_id: holding.stock_id.clone(),
                    value: scale_price(holding.unit_value(roll.old_value), percent, ctx.config.min_stock_value),
                });
            }
        }

        Valuation { rolls, marks }
    }

    fn compute_dividends(&self, _ctx: &PricingContext<'_>, _valuation: &Valuation) -> Vec<DividendResult> {
        Vec::new()
    }

    fn adjust_for_event(&self, ctx: &PricingContext<'_>, event: &EventCard) -> Vec<HoldingMark> {
        let mut marks = Vec::new();

        for player in &ctx.state.players {
            for holding in &player.holdings {
                let Some(stock) = ctx.catalog.stock(&holding.stock_id) else {
                    continue;
                };
                if !event.impact.category.matches(stock.category) {
                    continue;
                }
                let mut percent = event.impact.modifier;
                if player.nationality.is_weak_to(stock.category, &event.tags) {
                    percent -= player.nationality.weakness.extra_penalty;
                }
                marks.push(HoldingMark {
                    player: player.id,
                    stock_id: holding.stock_id.clone(),
                    value: scale_price(
                        holding.unit_value(ctx.market_price(stock)),
                        percent,
                        ctx.config.min_stock_value,
                    ),
                });
            }
        }

        marks
    }
}

/// Stocks that rose this round, with their gain per share.
fn rising<'a>(catalog: &'a Catalog, valuation: &Valuation) -> Vec<(&'a StockDefinition, Money)> {
    valuation
        .rolls
        .iter()
        .filter(|r| r.new_value > r.old_value)
        .filter_map(|r| Some((catalog.stock(&r.stock_id)?, r.new_value - r.old_value)))
        .collect()
}

fn dividend(
    stock: &StockDefinition,
    gain: Money,
    recipients: SmallVec<[DividendRecipient; 4]>,
) -> Option<DividendResult> {
    if recipients.is_empty() {
        return None;
    }
    Some(DividendResult {
        stock_id: stock.id.clone(),
        stock_name: stock.name.clone(),
        category: stock.category,
        value_change: gain,
        recipients,
    })
}
