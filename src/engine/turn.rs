//! Movement, landing and turn order.

use super::{require_phase, Engine};
use crate::catalog::{BoardTile, StockId};
use crate::core::{DiceSource, GameState, Phase, ResumeContext};
use crate::error::Rejection;

impl<R: DiceSource> Engine<R> {
    pub(super) fn roll_movement_dice(&mut self, state: &mut GameState) -> Result<(), Rejection> {
        require_phase(state, &[Phase::Rolling])?;

        let roll = self.dice.roll_die(self.config.movement_die_sides);
        log::trace!("movement roll {roll}");
        let board_len = self.catalog.board().len();
        let player = state.current_player_mut().ok_or(Rejection::NoPlayers)?;
        player.position = (player.position + roll as usize) % board_len;
        let position = player.position;
        let message = format!("{} rolled a {} and moved to tile {}.", player.name, roll, position + 1);

        state.last_dice_roll = Some(roll);
        state.current_tile = Some(self.catalog.tile(position).clone());
        state.phase = Phase::Landed;
        state.log.push(message);
        Ok(())
    }

    pub(super) fn resolve_landing(&mut self, state: &mut GameState) -> Result<(), Rejection> {
        require_phase(state, &[Phase::Landed])?;
        let tile = state.current_tile.clone().ok_or(Rejection::NoCurrentTile)?;

        state.phase = match tile {
            BoardTile::Event => {
                let events = self.catalog.events();
                let event = events[self.dice.pick_index(events.len())].clone();
                log::trace!("drew event {}", event.id);
                state.current_event = Some(event);
                Phase::EventDisplay
            }
            BoardTile::Chance => {
                let chances = self.catalog.chances();
                let chance = chances[self.dice.pick_index(chances.len())].clone();
                log::trace!("drew chance {}", chance.id);
                state.current_chance = Some(chance);
                Phase::ChanceDisplay
            }
            BoardTile::Stock { .. } => Phase::StockAction,
            BoardTile::Blank => Phase::TurnEnd,
        };
        Ok(())
    }

    pub(super) fn skip_stock_action(&mut self, state: &mut GameState) -> Result<(), Rejection> {
        require_phase(state, &[Phase::StockAction])?;

        match state.resume.take() {
            Some(resume) => {
                state.phase = resume.phase;
                state.current_tile = resume.tile;
                state.last_dice_roll = resume.dice_roll;
            }
            None => state.phase = Phase::TurnEnd,
        }
        Ok(())
    }

    /// Open trading outside the normal landing flow.
    ///
    /// With a stock, the current turn position is saved and restored on
    /// skip. An already saved position is kept, so nesting resumes to the
    /// outermost turn position.
    pub(super) fn open_stock_action(
        &mut self,
        state: &mut GameState,
        stock: Option<&StockId>,
    ) -> Result<(), Rejection> {
        if !state.phase.is_in_turn() {
            return Err(Rejection::WrongPhase(state.phase));
        }

        match stock {
            Some(id) => {
                if self.catalog.stock(id).is_none() {
                    return Err(Rejection::UnknownStock(id.clone()));
                }
                if state.resume.is_none() {
                    state.resume = Some(ResumeContext {
                        phase: state.phase,
                        tile: state.current_tile.clone(),
                        dice_roll: state.last_dice_roll,
                    });
                }
                state.current_tile = Some(BoardTile::Stock { stock_id: id.clone() });
            }
            None => {
                state.current_tile = None;
                state.resume = None;
            }
        }
        state.phase = Phase::StockAction;
        Ok(())
    }

    pub(super) fn end_turn(&mut self, state: &mut GameState) -> Result<(), Rejection> {
        match state.phase {
            Phase::TurnEnd => {
                if state.is_last_player() && !state.owned_stock_ids().is_empty() {
                    if self.config.auto_valuation {
                        self.run_valuation(state);
                    } else {
                        state.phase = Phase::StockValuation;
                    }
                } else {
                    self.advance(state);
                }
                Ok(())
            }
            Phase::ValuationResults => {
                if state.dividend_results.is_empty() {
                    self.advance(state);
                } else {
                    state.phase = Phase::DividendDisplay;
                }
                Ok(())
            }
            phase => Err(Rejection::WrongPhase(phase)),
        }
    }

    pub(super) fn acknowledge_dividends(&mut self, state: &mut GameState) -> Result<(), Rejection> {
        require_phase(state, &[Phase::DividendDisplay])?;
        self.advance(state);
        Ok(())
    }

    /// Hand the turn to the next seat, turning the calendar when the order wraps.
    pub(super) fn advance(&self, state: &mut GameState) {
        let next = (state.current_player_index + 1) % state.player_count().max(1);
        let new_year = next == 0;
        let year = if new_year { state.year + 1 } else { state.year };

        state.clear_turn();

        if year > self.config.end_year {
            state.year = year;
            state.phase = Phase::GameOver;
            state
                .log
                .push(format!("Game over! The market closes after {}.", self.config.end_year));
            log::info!("game over after {}", self.config.end_year);
            return;
        }

        state.current_player_index = next;
        state.year = year;
        state.phase = Phase::Rolling;

        let mut messages = Vec::with_capacity(2);
        if new_year {
            messages.push(format!("--- Year {year} begins ---"));
            log::info!("year {year} begins");
        }
        if let Some(player) = state.current_player() {
            messages.push(format!("{}'s turn.", player.name));
        }
        state.log.extend(messages);
    }
}
