//! Commands a UI sends into the engine.
//!
//! Each command maps to one state transition. Commands carry only the
//! stock they refer to; the acting player is always the current player.

use serde::{Deserialize, Serialize};

use crate::catalog::StockId;

/// A player intent.
///
/// ## Example
///
/// ```
/// use stock_exchange::catalog::StockId;
/// use stock_exchange::core::Command;
///
/// let buy = Command::BuyStock(StockId::new("golden_cola"));
/// assert_eq!(buy.stock(), Some(&StockId::new("golden_cola")));
/// assert_eq!(Command::EndTurn.stock(), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "command", content = "stockId", rename_all = "snake_case")]
pub enum Command {
    RollMovementDice,
    ResolveLanding,
    ApplyEvent,
    ApplyChance,
    BuyStock(StockId),
    SellStock(StockId),
    SkipStockAction,
    RollStockValuation,
    EndTurn,
    AcknowledgeDividends,
    /// Open trading out of turn order; with a stock, the interrupted turn
    /// resumes on skip.
    OpenStockAction(Option<StockId>),
}

impl Command {
    /// The stock this command refers to, if any.
    #[must_use]
    pub fn stock(&self) -> Option<&StockId> {
        match self {
            Command::BuyStock(id) | Command::SellStock(id) => Some(id),
            Command::OpenStockAction(id) => id.as_ref(),
            _ => None,
        }
    }

    /// Short name for diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Command::RollMovementDice => "roll_movement_dice",
            Command::ResolveLanding => "resolve_landing",
            Command::ApplyEvent => "apply_event",
            Command::ApplyChance => "apply_chance",
            Command::BuyStock(_) => "buy_stock",
            Command::SellStock(_) => "sell_stock",
            Command::SkipStockAction => "skip_stock_action",
            Command::RollStockValuation => "roll_stock_valuation",
            Command::EndTurn => "end_turn",
            Command::AcknowledgeDividends => "acknowledge_dividends",
            Command::OpenStockAction(_) => "open_stock_action",
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.stock() {
            Some(stock) => write!(f, "{}({})", self.name(), stock),
            None => f.write_str(self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Command::EndTurn.to_string(), "end_turn");
        assert_eq!(
            Command::SellStock(StockId::new("iron_works")).to_string(),
            "sell_stock(iron_works)"
        );
        assert_eq!(Command::OpenStockAction(None).to_string(), "open_stock_action");
    }

    #[test]
    fn test_command_serialization() {
        let command = Command::BuyStock(StockId::new("iron_works"));
        let json = serde_json::to_string(&command).unwrap();
        assert_eq!(json, r#"{"command":"buy_stock","stockId":"iron_works"}"#);

        let deserialized: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(command, deserialized);
    }

    #[test]
    fn test_unit_command_serialization() {
        let json = serde_json::to_string(&Command::RollMovementDice).unwrap();
        let deserialized: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, Command::RollMovementDice);
    }
}
