//! # stock-exchange
//!
//! Rules engine for a hotseat stock-trading board game played from 1950
//! to 2026 by two to four players.
//!
//! ## Design Principles
//!
//! 1. **Snapshots In, Snapshots Out**: every command is a function from one
//!    `GameState` to the next. The caller's snapshot is never mutated.
//!
//! 2. **Ignore Invalid Intent**: a command that does not fit the current
//!    phase, or that the player cannot afford, returns the input unchanged.
//!    `Engine::try_apply` reports the reason for tests and tooling.
//!
//! 3. **Pluggable Pricing**: valuation and dividends live behind the
//!    `PricingPolicy` trait, chosen when the engine is built.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: players, prices and the game log use
//!   `im-rs`, so cloning a snapshot per command is cheap.
//!
//! - **Injectable Dice**: all randomness goes through `DiceSource`. Seeded
//!   ChaCha8 in play, `ScriptedDice` in tests.
//!
//! ## Modules
//!
//! - `catalog`: stocks, nationalities, events, chance cards and the board
//! - `core`: players, phases, state, commands, dice and configuration
//! - `rules`: pricing policies, net worth and standings
//! - `engine`: the turn machine
//! - `game`: single-table session wrapper
//! - `error`: catalog, setup and rejection errors

pub mod catalog;
pub mod core;
pub mod rules;
pub mod engine;
pub mod game;
pub mod error;

// Re-export commonly used types
pub use crate::catalog::{
    BoardTile, Catalog, Category, ChanceCard, ChanceEffect, EventCard, Money,
    Nationality, StockDefinition, StockId,
};

pub use crate::core::{
    Command, DiceSource, GameConfig, GameLog, GameRng, GameState, Holding,
    Phase, Player, PlayerId, ScriptedDice,
};

pub use crate::rules::{
    DividendResult, GameResult, PricingModel, PricingPolicy, Standing,
    StockRollResult,
};

pub use crate::engine::{Engine, PlayerSetup};
pub use crate::game::Game;
pub use crate::error::{CatalogError, Rejection, SetupError};
