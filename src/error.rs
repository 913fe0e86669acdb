//! Error types.
//!
//! Rejected commands are not failures from the player's point of view: the
//! engine logs a `Rejection` and hands back the unchanged snapshot. Only
//! catalog loading and game setup surface errors to the caller.

use thiserror::Error;

use crate::catalog::{Money, StockId};
use crate::core::Phase;

/// Reference data failed to load or validate.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("malformed {what} data: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("board must have {expected} tiles, found {found}")]
    BoardSize { expected: usize, found: usize },
    #[error("board tile {index} references unknown stock {stock}")]
    UnknownTileStock { index: usize, stock: StockId },
    #[error("duplicate {what} id {id}")]
    DuplicateId { what: &'static str, id: String },
    #[error("{0} deck is empty")]
    EmptyDeck(&'static str),
    #[error("no stock definitions")]
    NoStocks,
}

/// `start_game` was called with an invalid lineup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("need {min}-{max} players, got {found}")]
    PlayerCount { min: usize, max: usize, found: usize },
    #[error("unknown nationality {0}")]
    UnknownNationality(String),
}

/// Why a command left the state unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("command not valid during {0:?}")]
    WrongPhase(Phase),
    #[error("game is over")]
    GameOver,
    #[error("insufficient cash: required {required}, available {available}")]
    InsufficientCash { required: Money, available: Money },
    #[error("unknown stock {0}")]
    UnknownStock(StockId),
    #[error("no shares of {0} held")]
    NoHolding(StockId),
    #[error("no current tile")]
    NoCurrentTile,
    #[error("no current event")]
    NoCurrentEvent,
    #[error("no current chance card")]
    NoCurrentChance,
    #[error("no players seated")]
    NoPlayers,
}
