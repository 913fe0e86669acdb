//! Game state snapshot.
//!
//! `GameState` is the single root of mutable game data. The engine never
//! edits a snapshot a caller holds: each transition clones it (cheap, the
//! collections are `im` persistent structures) and returns the new one.
//!
//! Transient fields:
//! - `last_dice_roll`, `current_tile`, `current_event`, `current_chance`:
//!   cleared when the next player's turn starts
//! - `stock_roll_results`, `dividend_results`: the last valuation round,
//!   cleared when play moves on
//! - `resume`: set while an out-of-band stock action is open

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};

use super::game_log::GameLog;
use super::phase::{Phase, ResumeContext};
use super::player::{Player, PlayerId};
use crate::catalog::{BoardTile, ChanceCard, EventCard, Money, StockId};
use crate::rules::{DividendResult, StockRollResult};

/// Complete game snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Seated players in turn order.
    pub players: Vector<Player>,
    pub current_player_index: usize,
    pub year: u32,
    pub phase: Phase,
    pub last_dice_roll: Option<u32>,
    pub current_tile: Option<BoardTile>,
    pub current_event: Option<EventCard>,
    pub current_chance: Option<ChanceCard>,
    pub stock_roll_results: Vec<StockRollResult>,
    pub dividend_results: Vec<DividendResult>,
    /// Shared market price per stock.
    pub stock_values: OrdMap<StockId, Money>,
    pub log: GameLog,
    pub resume: Option<ResumeContext>,
}

impl GameState {
    /// An empty table waiting for `start_game`.
    #[must_use]
    pub fn new(start_year: u32, log_capacity: usize) -> Self {
        Self {
            players: Vector::new(),
            current_player_index: 0,
            year: start_year,
            phase: Phase::Setup,
            last_dice_roll: None,
            current_tile: None,
            current_event: None,
            current_chance: None,
            stock_roll_results: Vec::new(),
            dividend_results: Vec::new(),
            stock_values: OrdMap::new(),
            log: GameLog::new(log_capacity),
            resume: None,
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player_index)
    }

    /// Mutable access to the current player.
    pub fn current_player_mut(&mut self) -> Option<&mut Player> {
        self.players.get_mut(self.current_player_index)
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index())
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id.index())
    }

    /// Whether the current player is last in turn order.
    #[must_use]
    pub fn is_last_player(&self) -> bool {
        self.current_player_index + 1 == self.players.len()
    }

    /// Shared market price of a stock.
    #[must_use]
    pub fn stock_value(&self, id: &StockId) -> Option<Money> {
        self.stock_values.get(id).copied()
    }

    /// Distinct stocks held by any player, in seat then purchase order.
    #[must_use]
    pub fn owned_stock_ids(&self) -> Vec<StockId> {
        let mut owned: Vec<StockId> = Vec::new();
        for player in &self.players {
            for holding in &player.holdings {
                if !owned.contains(&holding.stock_id) {
                    owned.push(holding.stock_id.clone());
                }
            }
        }
        owned
    }

    /// Clear everything tied to the previous player's turn.
    pub fn clear_turn(&mut self) {
        self.last_dice_roll = None;
        self.current_tile = None;
        self.current_event = None;
        self.current_chance = None;
        self.stock_roll_results.clear();
        self.dividend_results.clear();
        self.resume = None;
    }
}
