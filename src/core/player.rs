//! Players and their stock holdings.
//!
//! ## PlayerId
//!
//! Seat index, 0-based. Seat order is turn order.
//!
//! ## Holding
//!
//! Shares of one stock owned by one player. A holding never has zero
//! shares: selling the last share removes it.

use serde::{Deserialize, Serialize};

use super::config::round_money;
use crate::catalog::{Money, Nationality, StockId};

/// Player identifier (seat index).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    ///
    /// ```
    /// use stock_exchange::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(players, vec![PlayerId::new(0), PlayerId::new(1), PlayerId::new(2)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count.min(u8::MAX as usize) as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0 + 1)
    }
}

/// Shares of one stock held by a player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub stock_id: StockId,
    pub shares: u32,
    /// Cumulative cost of the shares still held.
    pub total_invested: f64,
    /// Per-player market value, set only by per-holding pricing.
    /// `None` means the holding tracks the shared market price.
    #[serde(default)]
    pub mark: Option<Money>,
}

impl Holding {
    /// A fresh holding of one share bought at `price`.
    #[must_use]
    pub fn new(stock_id: StockId, price: Money) -> Self {
        Self {
            stock_id,
            shares: 1,
            total_invested: price as f64,
            mark: None,
        }
    }

    /// Average cost per share still held.
    #[must_use]
    pub fn average_cost(&self) -> f64 {
        if self.shares == 0 {
            0.0
        } else {
            self.total_invested / f64::from(self.shares)
        }
    }

    /// Value of one share given the shared market price.
    #[must_use]
    pub fn unit_value(&self, market_price: Money) -> Money {
        self.mark.unwrap_or(market_price)
    }
}

/// A seated player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub avatar: String,
    pub color: String,
    pub nationality: Nationality,
    /// Never negative.
    pub cash: Money,
    /// Board position, `0..BOARD_SIZE`.
    pub position: usize,
    /// Holdings in purchase order.
    pub holdings: Vec<Holding>,
}

impl Player {
    /// Create a player at the start tile.
    #[must_use]
    pub fn new(
        id: PlayerId,
        name: impl Into<String>,
        nationality: Nationality,
        cash: Money,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            avatar: String::new(),
            color: String::new(),
            nationality,
            cash,
            position: 0,
            holdings: Vec::new(),
        }
    }

    /// Get the holding for a stock.
    #[must_use]
    pub fn holding(&self, stock_id: &StockId) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.stock_id == *stock_id)
    }

    /// Number of shares held of a stock.
    #[must_use]
    pub fn shares_of(&self, stock_id: &StockId) -> u32 {
        self.holding(stock_id).map_or(0, |h| h.shares)
    }

    /// Record the purchase of one share at `price`. Cash is not touched.
    ///
    /// A marked holding is rebased to the share-weighted mean of its mark
    /// and `price`, so the holding's total value grows by exactly `price`.
    pub fn add_share(&mut self, stock_id: &StockId, price: Money) {
        match self.holdings.iter_mut().find(|h| h.stock_id == *stock_id) {
            Some(holding) => {
                if let Some(mark) = holding.mark {
                    let shares = f64::from(holding.shares);
                    holding.mark = Some(round_money((mark as f64 * shares + price as f64) / (shares + 1.0)));
                }
                holding.shares += 1;
                holding.total_invested += price as f64;
            }
            None => self.holdings.push(Holding::new(stock_id.clone(), price)),
        }
    }

    /// Remove one share, keeping the average cost of the rest.
    ///
    /// Returns the holding as it was before the sale, or `None` if there
    /// was nothing to sell. Cash is not touched.
    pub fn remove_share(&mut self, stock_id: &StockId) -> Option<Holding> {
        let pos = self.holdings.iter().position(|h| h.stock_id == *stock_id)?;
        let before = self.holdings[pos].clone();

        if before.shares <= 1 {
            self.holdings.remove(pos);
        } else {
            let holding = &mut self.holdings[pos];
            holding.total_invested -= holding.average_cost();
            holding.shares -= 1;
        }

        Some(before)
    }

    /// Add cash.
    pub fn credit(&mut self, amount: Money) {
        self.cash += amount;
    }

    /// Remove cash, clamping at zero. Returns the shortfall that was absorbed.
    pub fn debit_clamped(&mut self, amount: Money) -> Money {
        let remaining = self.cash - amount;
        self.cash = remaining.max(0);
        (-remaining).max(0)
    }
}
