//! Economic rules that sit outside the turn machine.
//!
//! - `pricing`: the `PricingPolicy` strategy that turns valuation rolls and
//!   events into new prices and dividends
//! - `outcome`: net worth, standings and the winner
//!
//! The engine calls into these but never hard-codes a pricing model.

pub mod pricing;
pub mod outcome;

pub use pricing::{
    roll_owned_stocks, scale_price, DividendRecipient, DividendResult, HoldingMark,
    NationalityDividends, PerHoldingValuation, PricingContext, PricingModel, PricingPolicy,
    ShareholderDividends, StockRollResult, Valuation,
};
pub use outcome::{net_worth, result, standings, GameResult, Standing};
