//! Valuation rounds and dividends under each pricing model.

use std::sync::Arc;

use smallvec::smallvec;

use stock_exchange::catalog::{Catalog, StockId};
use stock_exchange::core::{Command, GameConfig, GameState, Phase, PlayerId, ScriptedDice};
use stock_exchange::engine::{Engine, PlayerSetup};
use stock_exchange::rules::{
    DividendRecipient, DividendResult, PricingContext, PricingModel, PricingPolicy, Valuation,
};

fn oil() -> StockId {
    StockId::new("petro_atlantic")
}

fn vacuum() -> StockId {
    StockId::new("vacuum_computing")
}

/// Two players (usa: tech bonus, norway: energy bonus) holding one share
/// each of an energy and a tech stock, at the end of the round.
fn round_end(model: PricingModel, rolls: &[u32]) -> (Engine<ScriptedDice>, GameState) {
    let catalog = Arc::new(Catalog::standard().unwrap());
    let config = GameConfig::default().with_pricing(model);
    let dice = ScriptedDice::new(5).with_rolls(rolls.iter().copied());
    let mut engine = Engine::with_dice(catalog, config, dice);

    let mut state = engine
        .start_game(&[PlayerSetup::new("Ada", "usa"), PlayerSetup::new("Bo", "norway")])
        .unwrap();
    for player in [0, 1] {
        state.players[player].add_share(&oil(), 300);
        state.players[player].add_share(&vacuum(), 500);
    }
    state.current_player_index = 1;
    state.phase = Phase::TurnEnd;
    (engine, state)
}

fn cash(state: &GameState) -> Vec<i64> {
    state.players.iter().map(|p| p.cash).collect()
}

#[test]
fn test_shared_prices_move_under_every_model() {
    // oil: neutral 10, 3%/pip; vacuum: neutral 11, 4%/pip
    for model in [
        PricingModel::NationalityDividends,
        PricingModel::ShareholderDividends,
        PricingModel::PerHoldingValuation,
    ] {
        let (mut engine, state) = round_end(model, &[15, 16]);
        let next = engine.apply(&state, &Command::EndTurn);

        assert_eq!(next.phase, Phase::ValuationResults, "{model:?}");
        assert_eq!(next.stock_value(&oil()), Some(345));
        assert_eq!(next.stock_value(&vacuum()), Some(600));

        let rolls = &next.stock_roll_results;
        assert_eq!(rolls.len(), 2);
        assert_eq!(rolls[0].stock_id, oil());
        assert_eq!(rolls[0].roll, 15);
        assert_eq!(rolls[0].multiplier, 5);
        assert!((rolls[0].percent_change - 15.0).abs() < 1e-9);
        assert_eq!((rolls[0].old_value, rolls[0].new_value), (300, 345));
        assert_eq!(rolls[1].stock_name, "Vacuum Computing");
    }
}

#[test]
fn test_nationality_dividends_pay_favoured_holders_only() {
    let (mut engine, state) = round_end(PricingModel::NationalityDividends, &[15, 16]);
    let next = engine.apply(&state, &Command::EndTurn);

    assert_eq!(cash(&next), vec![2000 + 100, 2000 + 45]);
    assert_eq!(next.dividend_results.len(), 2);

    let oil_dividend = &next.dividend_results[0];
    assert_eq!(oil_dividend.stock_id, oil());
    assert_eq!(oil_dividend.value_change, 45);
    assert_eq!(oil_dividend.recipients.len(), 1);
    assert_eq!(oil_dividend.recipients[0].player, PlayerId::new(1));
    assert_eq!(oil_dividend.total(), 45);

    let next = engine.apply(&next, &Command::EndTurn);
    assert_eq!(next.phase, Phase::DividendDisplay);
    let next = engine.apply(&next, &Command::AcknowledgeDividends);
    assert_eq!(next.phase, Phase::Rolling);
    assert_eq!(next.year, 1951);
    assert!(next.dividend_results.is_empty());
}

#[test]
fn test_nationality_dividends_scale_with_shares() {
    let (mut engine, mut state) = round_end(PricingModel::NationalityDividends, &[15, 16]);
    state.players[1].add_share(&oil(), 300);
    state.players[1].add_share(&oil(), 300);

    let next = engine.apply(&state, &Command::EndTurn);
    assert_eq!(next.players[1].cash, 2000 + 3 * 45);
}

#[test]
fn test_falling_prices_pay_nothing() {
    for model in [PricingModel::NationalityDividends, PricingModel::ShareholderDividends] {
        let (mut engine, state) = round_end(model, &[2, 3]);
        let next = engine.apply(&state, &Command::EndTurn);

        assert!(next.dividend_results.is_empty());
        assert_eq!(cash(&next), cash(&state));
        assert!(next.stock_value(&oil()).unwrap() < 300);

        let next = engine.apply(&next, &Command::EndTurn);
        assert_eq!(next.phase, Phase::Rolling);
    }
}

#[test]
fn test_shareholder_dividends_pay_everyone_with_bonus() {
    let (mut engine, state) = round_end(PricingModel::ShareholderDividends, &[15, 16]);
    let next = engine.apply(&state, &Command::EndTurn);

    // oil: 45 each, Bo adds 15% of 300; vacuum: 100 each, Ada adds 10% of 500
    assert_eq!(cash(&next), vec![2000 + 45 + 100 + 50, 2000 + 45 + 45 + 100]);

    let oil_dividend = &next.dividend_results[0];
    assert_eq!(oil_dividend.recipients.len(), 2);
    assert_eq!(oil_dividend.total(), 45 + 90);
}

#[test]
fn test_per_holding_marks_fold_in_bonus() {
    let (mut engine, state) = round_end(PricingModel::PerHoldingValuation, &[15, 16]);
    let next = engine.apply(&state, &Command::EndTurn);

    assert!(next.dividend_results.is_empty());
    assert_eq!(cash(&next), cash(&state));

    let ada = &next.players[0];
    let bo = &next.players[1];
    assert_eq!(ada.holding(&oil()).unwrap().mark, Some(345));
    assert_eq!(ada.holding(&vacuum()).unwrap().mark, Some(650));
    assert_eq!(bo.holding(&oil()).unwrap().mark, Some(390));
    assert_eq!(bo.holding(&vacuum()).unwrap().mark, Some(600));

    assert_eq!(engine.net_worth(&next, PlayerId::new(0)), 2000 + 345 + 650);
    assert_eq!(engine.net_worth(&next, PlayerId::new(1)), 2000 + 390 + 600);

    // No dividends to show
    let next = engine.apply(&next, &Command::EndTurn);
    assert_eq!(next.phase, Phase::Rolling);
}

#[test]
fn test_per_holding_sale_uses_mark() {
    let (mut engine, state) = round_end(PricingModel::PerHoldingValuation, &[15, 16]);
    let mut next = engine.apply(&state, &Command::EndTurn);
    next = engine.apply(&next, &Command::EndTurn);

    // Ada is on turn again; Ada's vacuum share is marked at 650
    let sold = engine.apply(&next, &Command::SellStock(vacuum()));
    assert_eq!(sold.players[0].cash, 2000 + 585);
}

#[test]
fn test_per_holding_event_applies_weakness() {
    let catalog = Arc::new(Catalog::standard().unwrap());
    let config = GameConfig::default().with_pricing(PricingModel::PerHoldingValuation);
    // Land on the event tile, draw oil_embargo (energy -25%, oil_crisis)
    let dice = ScriptedDice::new(5).with_rolls([4]).with_picks([3]);
    let mut engine = Engine::with_dice(catalog, config, dice);
    let mut state = engine
        .start_game(&[PlayerSetup::new("Ada", "usa"), PlayerSetup::new("Bo", "norway")])
        .unwrap();
    state.players[0].add_share(&oil(), 300);
    state.players[1].add_share(&oil(), 300);

    let state = engine.apply(&state, &Command::RollMovementDice);
    let state = engine.apply(&state, &Command::ResolveLanding);
    let state = engine.apply(&state, &Command::ApplyEvent);

    assert_eq!(state.stock_value(&oil()), Some(225));
    // usa is weak to oil crises: a further 5%
    assert_eq!(state.players[0].holding(&oil()).unwrap().mark, Some(210));
    assert_eq!(state.players[1].holding(&oil()).unwrap().mark, Some(225));
}

#[test]
fn test_shared_models_ignore_weakness() {
    let catalog = Arc::new(Catalog::standard().unwrap());
    let dice = ScriptedDice::new(5).with_rolls([4]).with_picks([3]);
    let mut engine = Engine::with_dice(catalog, GameConfig::default(), dice);
    let mut state = engine
        .start_game(&[PlayerSetup::new("Ada", "usa"), PlayerSetup::new("Bo", "norway")])
        .unwrap();
    state.players[0].add_share(&oil(), 300);

    let state = engine.apply(&state, &Command::RollMovementDice);
    let state = engine.apply(&state, &Command::ResolveLanding);
    let state = engine.apply(&state, &Command::ApplyEvent);

    assert_eq!(state.players[0].holding(&oil()).unwrap().mark, None);
    assert_eq!(engine.net_worth(&state, PlayerId::new(0)), 2000 + 225);
}

/// Pays every holder a flat amount per share, whatever the price did.
#[derive(Debug)]
struct FlatDividend(i64);

impl PricingPolicy for FlatDividend {
    fn compute_dividends(&self, ctx: &PricingContext<'_>, valuation: &Valuation) -> Vec<DividendResult> {
        valuation
            .rolls
            .iter()
            .map(|roll| {
                let stock = ctx.catalog.stock(&roll.stock_id).unwrap();
                let mut recipients = smallvec![];
                for player in &ctx.state.players {
                    let shares = player.shares_of(&stock.id);
                    if shares > 0 {
                        recipients.push(DividendRecipient {
                            player: player.id,
                            player_name: player.name.clone(),
                            amount: self.0 * i64::from(shares),
                        });
                    }
                }
                DividendResult {
                    stock_id: stock.id.clone(),
                    stock_name: stock.name.clone(),
                    category: stock.category,
                    value_change: roll.new_value - roll.old_value,
                    recipients,
                }
            })
            .collect()
    }
}

#[test]
fn test_custom_policy_plugs_in() {
    let (engine, state) = round_end(PricingModel::NationalityDividends, &[1, 1]);
    let mut engine = engine.with_policy(Box::new(FlatDividend(7)));
    assert_eq!(engine.policy().model(), None);

    let next = engine.apply(&state, &Command::EndTurn);
    assert_eq!(cash(&next), vec![2014, 2014]);
    assert_eq!(next.dividend_results.len(), 2);
}
