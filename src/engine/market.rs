//! Trading, events, chance cards and valuation rounds.

use super::{require_phase, Engine};
use crate::catalog::{ChanceEffect, Money, StockId};
use crate::core::{DiceSource, GameState, Phase};
use crate::error::Rejection;
use crate::rules::{scale_price, HoldingMark, PricingContext};

impl<R: DiceSource> Engine<R> {
    pub(super) fn buy_stock(&mut self, state: &mut GameState, id: &StockId) -> Result<(), Rejection> {
        require_phase(state, &[Phase::StockAction])?;
        let stock = self.catalog.stock(id).ok_or_else(|| Rejection::UnknownStock(id.clone()))?;
        let price = state.stock_value(id).unwrap_or(stock.price);

        let player = state.current_player_mut().ok_or(Rejection::NoPlayers)?;
        if player.cash < price {
            return Err(Rejection::InsufficientCash {
                required: price,
                available: player.cash,
            });
        }
        player.cash -= price;
        player.add_share(id, price);
        let message = format!("{} bought {} for ${}.", player.name, stock.name, price);

        state.log.push(message);
        Ok(())
    }

    /// Sell one share at its current value less the spread.
    ///
    /// Allowed in any active phase so a holding can be sold out of turn.
    pub(super) fn sell_stock(&mut self, state: &mut GameState, id: &StockId) -> Result<(), Rejection> {
        let stock = self.catalog.stock(id).ok_or_else(|| Rejection::UnknownStock(id.clone()))?;
        let market = state.stock_value(id).unwrap_or(stock.price);

        let player = state.current_player_mut().ok_or(Rejection::NoPlayers)?;
        let value = player
            .holding(id)
            .map(|h| h.unit_value(market))
            .ok_or_else(|| Rejection::NoHolding(id.clone()))?;
        let price = self.config.sell_price(value);

        player.remove_share(id);
        player.credit(price);
        let message = format!(
            "{} sold 1 share of {} for ${} ({}% spread applied).",
            player.name, stock.name, price, self.config.sell_spread_percent
        );

        state.log.push(message);
        Ok(())
    }

    pub(super) fn apply_event(&mut self, state: &mut GameState) -> Result<(), Rejection> {
        require_phase(state, &[Phase::EventDisplay])?;
        let event = state.current_event.clone().ok_or(Rejection::NoCurrentEvent)?;

        let marks = {
            let ctx = PricingContext {
                catalog: &self.catalog,
                config: &self.config,
                state: &*state,
            };
            self.policy.adjust_for_event(&ctx, &event)
        };

        for stock in self.catalog.stocks() {
            if !event.impact.category.matches(stock.category) {
                continue;
            }
            let old = state.stock_value(&stock.id).unwrap_or(stock.price);
            let new = scale_price(old, event.impact.modifier, self.config.min_stock_value);
            state.stock_values.insert(stock.id.clone(), new);
        }
        apply_marks(state, marks);
        log::debug!("event {} moved {:?} by {:+}%", event.id, event.impact.category, event.impact.modifier);

        state.log.push(format!("EVENT: {} - {}", event.title, event.description));
        state.phase = Phase::TurnEnd;
        Ok(())
    }

    pub(super) fn apply_chance(&mut self, state: &mut GameState) -> Result<(), Rejection> {
        require_phase(state, &[Phase::ChanceDisplay])?;
        let chance = state.current_chance.clone().ok_or(Rejection::NoCurrentChance)?;
        let mut messages = vec![format!("CHANCE: {} - {}", chance.title, chance.description)];

        match chance.effect {
            ChanceEffect::GainCash => {
                let player = state.current_player_mut().ok_or(Rejection::NoPlayers)?;
                player.credit(chance.value);
                messages.push(format!("{} gained ${}.", player.name, chance.value));
            }
            ChanceEffect::LoseCash => self.charge_fine(state, chance.value, &mut messages)?,
            ChanceEffect::BoostRandomStock | ChanceEffect::HurtRandomStock => {
                let ids: Vec<StockId> = state.stock_values.keys().cloned().collect();
                if !ids.is_empty() {
                    let id = &ids[self.dice.pick_index(ids.len())];
                    let (percent, verb) = if chance.effect == ChanceEffect::BoostRandomStock {
                        (chance.value as f64, "rises")
                    } else {
                        (-(chance.value as f64), "falls")
                    };
                    self.move_stock(state, id, percent);
                    let name = self.catalog.stock(id).map_or(id.as_str(), |s| s.name.as_str());
                    messages.push(format!("{} {} {}%.", name, verb, chance.value));
                }
            }
            ChanceEffect::BoostAllStocks | ChanceEffect::HurtAllStocks => {
                let percent = if chance.effect == ChanceEffect::BoostAllStocks {
                    chance.value as f64
                } else {
                    -(chance.value as f64)
                };
                let ids: Vec<StockId> = state.stock_values.keys().cloned().collect();
                for id in &ids {
                    self.move_stock(state, id, percent);
                }
            }
        }

        state.log.extend(messages);
        state.phase = Phase::TurnEnd;
        Ok(())
    }

    /// Take a fine from the current player.
    ///
    /// A player who cannot pay but holds stock first sells one share of
    /// their cheapest holding. Whatever is still missing is forgiven.
    fn charge_fine(&self, state: &mut GameState, amount: Money, messages: &mut Vec<String>) -> Result<(), Rejection> {
        let values = state.stock_values.clone();
        let player = state.current_player_mut().ok_or(Rejection::NoPlayers)?;

        if player.cash < amount {
            let cheapest = player
                .holdings
                .iter()
                .map(|h| (h.stock_id.clone(), h.unit_value(values.get(&h.stock_id).copied().unwrap_or(0))))
                .min_by_key(|(_, value)| *value);
            if let Some((id, value)) = cheapest {
                player.remove_share(&id);
                player.credit(self.config.sell_price(value));
                messages.push(format!("{} had to sell stock to cover the fine.", player.name));
            }
        }

        let shortfall = player.debit_clamped(amount);
        if shortfall > 0 {
            log::debug!("{} could not cover ${} of a fine", player.name, shortfall);
        }
        messages.push(format!("{} lost ${}.", player.name, amount));
        Ok(())
    }

    /// Move a shared price and every holding marked against it.
    fn move_stock(&self, state: &mut GameState, id: &StockId, percent: f64) {
        let floor = self.config.min_stock_value;
        if let Some(value) = state.stock_values.get_mut(id) {
            *value = scale_price(*value, percent, floor);
        }
        for player in state.players.iter_mut() {
            for holding in player.holdings.iter_mut().filter(|h| h.stock_id == *id) {
                if let Some(mark) = holding.mark {
                    holding.mark = Some(scale_price(mark, percent, floor));
                }
            }
        }
    }

    pub(super) fn roll_stock_valuation(&mut self, state: &mut GameState) -> Result<(), Rejection> {
        require_phase(state, &[Phase::TurnEnd, Phase::StockValuation])?;

        if state.is_last_player() {
            self.run_valuation(state);
        } else {
            state.phase = Phase::TurnEnd;
        }
        Ok(())
    }

    /// Reprice every owned stock and pay dividends.
    pub(super) fn run_valuation(&mut self, state: &mut GameState) {
        let owned = state.owned_stock_ids();
        if owned.is_empty() {
            state.stock_roll_results.clear();
            state.dividend_results.clear();
            state.phase = Phase::TurnEnd;
            return;
        }

        let (valuation, dividends) = {
            let ctx = PricingContext {
                catalog: &self.catalog,
                config: &self.config,
                state: &*state,
            };
            let valuation = self.policy.compute_valuation(&ctx, &owned, &mut self.dice);
            let dividends = self.policy.compute_dividends(&ctx, &valuation);
            (valuation, dividends)
        };

        for roll in &valuation.rolls {
            state.stock_values.insert(roll.stock_id.clone(), roll.new_value);
        }
        apply_marks(state, valuation.marks);

        for dividend in &dividends {
            for recipient in &dividend.recipients {
                if let Some(player) = state.player_mut(recipient.player) {
                    player.credit(recipient.amount);
                }
                state.log.push(format!(
                    "{} received ${} in dividends from {}.",
                    recipient.player_name, recipient.amount, dividend.stock_name
                ));
            }
        }
        log::debug!(
            "valuation in {}: {} stocks rolled, {} dividends",
            state.year,
            valuation.rolls.len(),
            dividends.len()
        );

        state.stock_roll_results = valuation.rolls;
        state.dividend_results = dividends;
        state.log.push("Stock valuation round complete.");
        state.phase = Phase::ValuationResults;
    }
}

fn apply_marks(state: &mut GameState, marks: Vec<HoldingMark>) {
    for mark in marks {
        let Some(player) = state.player_mut(mark.player) else {
            continue;
        };
        if let Some(holding) = player.holdings.iter_mut().find(|h| h.stock_id == mark.stock_id) {
            holding.mark = Some(mark.value);
        }
    }
}
