//! Net worth, standings and the final result.

use im::OrdMap;
use serde::{Deserialize, Serialize};

use crate::catalog::{Money, StockId};
use crate::core::{GameState, Phase, Player, PlayerId};

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Single richest player.
    Winner(PlayerId),
    /// Several players share the top net worth.
    Tied(Vec<PlayerId>),
}

impl GameResult {
    /// Check if a player won (alone or tied).
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Tied(ps) => ps.contains(&player),
        }
    }
}

/// One row of the scoreboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    /// 1-based; tied players share a rank.
    pub rank: usize,
    pub player: PlayerId,
    pub name: String,
    pub cash: Money,
    pub net_worth: Money,
}

/// Cash plus every holding at its current value.
///
/// Holdings without a price entry count as worthless.
#[must_use]
pub fn net_worth(player: &Player, stock_values: &OrdMap<StockId, Money>) -> Money {
    let stocks: Money = player
        .holdings
        .iter()
        .map(|h| {
            let market = stock_values.get(&h.stock_id).copied().unwrap_or(0);
            h.unit_value(market) * Money::from(h.shares)
        })
        .sum();
    player.cash + stocks
}

/// Players ranked by net worth, richest first. Ties keep seat order.
#[must_use]
pub fn standings(state: &GameState) -> Vec<Standing> {
    let mut rows: Vec<Standing> = state
        .players
        .iter()
        .map(|p| Standing {
            rank: 0,
            player: p.id,
            name: p.name.clone(),
            cash: p.cash,
            net_worth: net_worth(p, &state.stock_values),
        })
        .collect();

    rows.sort_by(|a, b| b.net_worth.cmp(&a.net_worth));

    let mut previous: Option<Money> = None;
    let mut rank = 0;
    for (i, row) in rows.iter_mut().enumerate() {
        if previous != Some(row.net_worth) {
            rank = i + 1;
            previous = Some(row.net_worth);
        }
        row.rank = rank;
    }

    rows
}

/// The winner, once the game is over.
#[must_use]
pub fn result(state: &GameState) -> Option<GameResult> {
    if state.phase != Phase::GameOver {
        return None;
    }

    let leaders: Vec<PlayerId> = standings(state)
        .into_iter()
        .take_while(|s| s.rank == 1)
        .map(|s| s.player)
        .collect();

    match leaders.as_slice() {
        [] => None,
        [only] => Some(GameResult::Winner(*only)),
        _ => Some(GameResult::Tied(leaders)),
    }
}
