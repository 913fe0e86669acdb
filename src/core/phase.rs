//! Turn phases and the resume context for interrupted turns.

use serde::{Deserialize, Serialize};

use crate::catalog::BoardTile;

/// Where the game is within a turn.
///
/// ```text
/// setup -> rolling -> landed -> {event_display | chance_display | stock_action | turn_end}
///       -> [stock_valuation ->] valuation_results -> [dividend_display ->] rolling | game_over
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Setup,
    Rolling,
    Landed,
    EventDisplay,
    ChanceDisplay,
    StockAction,
    StockValuation,
    ValuationResults,
    DividendDisplay,
    TurnEnd,
    GameOver,
}

impl Phase {
    /// Phases that belong to the current player's own turn, before the
    /// round-level valuation starts. Trading can be opened out of band here.
    #[must_use]
    pub const fn is_in_turn(self) -> bool {
        matches!(
            self,
            Phase::Rolling
                | Phase::Landed
                | Phase::EventDisplay
                | Phase::ChanceDisplay
                | Phase::StockAction
                | Phase::TurnEnd
        )
    }

    /// Any phase between `start_game` and the end of the game.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Phase::Setup | Phase::GameOver)
    }
}

/// Saved turn position while an out-of-band stock action is open.
///
/// Depth one: opening a second stock action keeps the first context.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeContext {
    pub phase: Phase,
    pub tile: Option<BoardTile>,
    pub dice_roll: Option<u32>,
}
