//! Turn machine tests: movement, landing, turn order, the calendar and
//! out-of-turn trading.

use std::sync::Arc;

use stock_exchange::catalog::{BoardTile, Catalog, StockId};
use stock_exchange::core::{Command, GameConfig, GameRng, GameState, Phase, PlayerId, ScriptedDice};
use stock_exchange::engine::{Engine, PlayerSetup};
use stock_exchange::Game;

fn engine(config: GameConfig, dice: ScriptedDice) -> Engine<ScriptedDice> {
    let catalog = Arc::new(Catalog::standard().unwrap());
    Engine::with_dice(catalog, config, dice)
}

fn setups(nationalities: &[&str]) -> Vec<PlayerSetup> {
    nationalities
        .iter()
        .enumerate()
        .map(|(i, nat)| PlayerSetup::new(format!("P{}", i + 1), *nat))
        .collect()
}

/// Scenario: rolling onto a blank tile goes straight to the end of the turn.
#[test]
fn test_blank_landing_skips_popups() {
    let mut engine = engine(GameConfig::default(), ScriptedDice::new(1).with_rolls([3]));
    let state = engine.start_game(&setups(&["usa", "uk"])).unwrap();
    assert_eq!(state.year, 1950);

    let state = engine.apply(&state, &Command::RollMovementDice);
    assert_eq!(state.players[0].position, 3);
    assert_eq!(state.current_tile, Some(BoardTile::Blank));

    let state = engine.apply(&state, &Command::ResolveLanding);
    assert_eq!(state.phase, Phase::TurnEnd);
    assert!(state.current_event.is_none());
    assert!(state.current_chance.is_none());
}

#[test]
fn test_movement_wraps_around_board() {
    let mut engine = engine(GameConfig::default(), ScriptedDice::new(1).with_rolls([6]));
    let mut state = engine.start_game(&setups(&["usa", "uk"])).unwrap();
    state.players[0].position = 30;

    let state = engine.apply(&state, &Command::RollMovementDice);
    assert_eq!(state.players[0].position, 4);
    assert_eq!(state.current_tile, Some(BoardTile::Event));
    assert_eq!(state.log.latest(), Some("P1 rolled a 6 and moved to tile 5."));
}

#[test]
fn test_landing_tile_kinds() {
    // 1: stock, 4: event, 6: chance
    let cases = [
        (1, Phase::StockAction),
        (4, Phase::EventDisplay),
        (6, Phase::ChanceDisplay),
    ];
    for (roll, expected) in cases {
        let mut engine = engine(GameConfig::default(), ScriptedDice::new(1).with_rolls([roll]));
        let state = engine.start_game(&setups(&["usa", "uk"])).unwrap();
        let state = engine.apply(&state, &Command::RollMovementDice);
        let state = engine.apply(&state, &Command::ResolveLanding);
        assert_eq!(state.phase, expected, "roll {roll}");
    }
}

#[test]
fn test_event_draw_uses_deck_pick() {
    let dice = ScriptedDice::new(1).with_rolls([4]).with_picks([3]);
    let mut engine = engine(GameConfig::default(), dice);
    let state = engine.start_game(&setups(&["usa", "uk"])).unwrap();

    let state = engine.apply(&state, &Command::RollMovementDice);
    let state = engine.apply(&state, &Command::ResolveLanding);
    let event = state.current_event.as_ref().unwrap();
    assert_eq!(event.id, "oil_embargo");
}

/// Scenario: the last player ends a round in which nobody owns stock.
#[test]
fn test_round_without_holdings_skips_valuation() {
    let mut engine = engine(GameConfig::default(), ScriptedDice::new(1));
    let mut state = engine.start_game(&setups(&["usa", "uk"])).unwrap();
    state.current_player_index = 1;
    state.phase = Phase::TurnEnd;

    let state = engine.apply(&state, &Command::EndTurn);
    assert_eq!(state.phase, Phase::Rolling);
    assert_eq!(state.current_player_index, 0);
    assert_eq!(state.year, 1951);
    assert!(state.stock_roll_results.is_empty());
    assert!(state.dividend_results.is_empty());
}

#[test]
fn test_turn_passes_within_round() {
    let mut engine = engine(GameConfig::default(), ScriptedDice::new(1));
    let mut state = engine.start_game(&setups(&["usa", "uk", "japan"])).unwrap();
    state.phase = Phase::TurnEnd;
    state.last_dice_roll = Some(5);

    let state = engine.apply(&state, &Command::EndTurn);
    assert_eq!(state.current_player_index, 1);
    assert_eq!(state.year, 1950);
    assert_eq!(state.phase, Phase::Rolling);
    assert_eq!(state.last_dice_roll, None);
    assert_eq!(state.log.latest(), Some("P2's turn."));
}

/// Scenario: the final round ends after valuation and dividends.
#[test]
fn test_final_round_ends_game() {
    let vacuum = StockId::new("vacuum_computing");
    // A 20 on a neutral-11, 4%-per-pip stock: +36%
    let mut engine = engine(GameConfig::default(), ScriptedDice::new(1).with_rolls([20]));
    let mut state = engine
        .start_game(&setups(&["japan", "uk", "germany", "usa"]))
        .unwrap();
    state.year = 2026;
    state.current_player_index = 3;
    state.phase = Phase::TurnEnd;
    state.players[3].cash -= 500;
    state.players[3].add_share(&vacuum, 500);

    let state = engine.apply(&state, &Command::EndTurn);
    assert_eq!(state.phase, Phase::ValuationResults);
    assert_eq!(state.stock_value(&vacuum), Some(680));
    assert_eq!(state.players[3].cash, 1500 + 180);
    assert_eq!(state.log.latest(), Some("Stock valuation round complete."));

    let state = engine.apply(&state, &Command::EndTurn);
    assert_eq!(state.phase, Phase::DividendDisplay);

    let state = engine.apply(&state, &Command::AcknowledgeDividends);
    assert_eq!(state.phase, Phase::GameOver);
    assert_eq!(state.year, 2027);
    assert_eq!(state.current_player_index, 3);
    assert!(state.dividend_results.is_empty());

    // Nothing moves after the end
    for command in [Command::RollMovementDice, Command::EndTurn, Command::AcknowledgeDividends] {
        assert_eq!(engine.apply(&state, &command), state);
    }
    assert!(engine.legal_commands(&state).is_empty());
}

#[test]
fn test_game_starting_in_last_year_ends_after_one_round() {
    let config = GameConfig::default().with_start_year(2026);
    let mut engine = engine(config, ScriptedDice::new(1));
    let mut state = engine.start_game(&setups(&["usa", "uk"])).unwrap();
    assert_eq!(state.year, 2026);

    state.phase = Phase::TurnEnd;
    let mut state = engine.apply(&state, &Command::EndTurn);
    assert_eq!(state.current_player_index, 1);
    assert_eq!(state.year, 2026);

    state.phase = Phase::TurnEnd;
    let state = engine.apply(&state, &Command::EndTurn);
    assert_eq!(state.phase, Phase::GameOver);
    assert_eq!(state.year, 2027);
    assert_eq!(state.log.latest(), Some("Game over! The market closes after 2026."));
}

#[test]
fn test_valuation_without_dividends_advances_directly() {
    let cola = StockId::new("golden_cola");
    let mut engine = engine(GameConfig::default(), ScriptedDice::new(1).with_rolls([1]));
    let mut state = engine.start_game(&setups(&["usa", "uk"])).unwrap();
    state.current_player_index = 1;
    state.phase = Phase::TurnEnd;
    state.players[0].add_share(&cola, 150);

    let state = engine.apply(&state, &Command::EndTurn);
    assert_eq!(state.phase, Phase::ValuationResults);
    assert!(state.dividend_results.is_empty());
    // neutral 9, 1.5% per pip: a 1 is -12%
    assert_eq!(state.stock_value(&cola), Some(132));
    assert_eq!(state.stock_roll_results[0].multiplier, -8);

    let state = engine.apply(&state, &Command::EndTurn);
    assert_eq!(state.phase, Phase::Rolling);
    assert_eq!(state.year, 1951);
    assert!(state.stock_roll_results.is_empty());
}

#[test]
fn test_explicit_valuation_roll() {
    let cola = StockId::new("golden_cola");
    let config = GameConfig::default().with_auto_valuation(false);
    let mut engine = engine(config, ScriptedDice::new(1).with_rolls([9]));
    let mut state = engine.start_game(&setups(&["usa", "uk"])).unwrap();
    state.current_player_index = 1;
    state.phase = Phase::TurnEnd;
    state.players[1].add_share(&cola, 150);

    let state = engine.apply(&state, &Command::EndTurn);
    assert_eq!(state.phase, Phase::StockValuation);
    assert_eq!(engine.legal_commands(&state)[0], Command::RollStockValuation);

    let state = engine.apply(&state, &Command::RollStockValuation);
    assert_eq!(state.phase, Phase::ValuationResults);
    assert_eq!(state.stock_roll_results.len(), 1);
    assert_eq!(state.stock_value(&cola), Some(150));
}

#[test]
fn test_open_stock_action_resumes_interrupted_turn() {
    let oil = StockId::new("petro_atlantic");
    let mut engine = engine(GameConfig::default(), ScriptedDice::new(1).with_rolls([4]));
    let mut state = engine.start_game(&setups(&["usa", "uk"])).unwrap();
    state.players[0].add_share(&oil, 300);

    let landed = engine.apply(&state, &Command::RollMovementDice);
    assert_eq!(landed.phase, Phase::Landed);

    let trading = engine.apply(&landed, &Command::OpenStockAction(Some(oil.clone())));
    assert_eq!(trading.phase, Phase::StockAction);
    assert_eq!(trading.current_tile, Some(BoardTile::Stock { stock_id: oil.clone() }));

    let sold = engine.apply(&trading, &Command::SellStock(oil.clone()));
    assert_eq!(sold.players[0].shares_of(&oil), 0);
    assert_eq!(sold.players[0].cash, 2270);

    let resumed = engine.apply(&sold, &Command::SkipStockAction);
    assert_eq!(resumed.phase, Phase::Landed);
    assert_eq!(resumed.current_tile, Some(BoardTile::Event));
    assert_eq!(resumed.last_dice_roll, Some(4));
    assert!(resumed.resume.is_none());
}

#[test]
fn test_rejected_commands_leave_state_untouched() {
    let mut engine = engine(GameConfig::default(), ScriptedDice::new(1));
    let state = engine.start_game(&setups(&["usa", "uk"])).unwrap();

    for command in [
        Command::ResolveLanding,
        Command::ApplyEvent,
        Command::ApplyChance,
        Command::BuyStock(StockId::new("golden_cola")),
        Command::SellStock(StockId::new("golden_cola")),
        Command::SkipStockAction,
        Command::RollStockValuation,
        Command::EndTurn,
        Command::AcknowledgeDividends,
    ] {
        assert!(engine.try_apply(&state, &command).is_err(), "{command} accepted");
        assert_eq!(engine.apply(&state, &command), state);
    }
}

fn play_out(game: &mut Game) -> usize {
    let mut steps = 0;
    while let Some(command) = game.legal_commands().into_iter().next() {
        game.dispatch(&command);
        steps += 1;
        assert!(steps < 100_000, "game did not terminate");
    }
    steps
}

#[test]
fn test_full_game_reaches_game_over() {
    let catalog = Arc::new(Catalog::standard().unwrap());
    let config = GameConfig::default().with_end_year(1960);
    let mut game = Game::new(catalog, config, 42);
    game.start_game(&setups(&["usa", "norway", "japan"])).unwrap();

    play_out(&mut game);

    let state: &GameState = game.state();
    assert_eq!(state.phase, Phase::GameOver);
    assert_eq!(state.year, 1961);
    assert!(state.log.len() <= 50);
    for player in &state.players {
        assert!(player.cash >= 0);
    }

    let standings = game.standings();
    assert_eq!(standings.len(), 3);
    assert_eq!(standings[0].rank, 1);
    assert!(game.result().unwrap().is_winner(standings[0].player));
}

#[test]
fn test_same_seed_same_game() {
    let catalog = Arc::new(Catalog::standard().unwrap());
    let config = GameConfig::default().with_end_year(1955);

    let mut a = Game::new(catalog.clone(), config.clone(), 7);
    let mut b = Game::new(catalog, config, 7);
    a.start_game(&setups(&["uk", "china"])).unwrap();
    b.start_game(&setups(&["uk", "china"])).unwrap();

    assert_eq!(play_out(&mut a), play_out(&mut b));
    assert_eq!(a.state(), b.state());
    assert_eq!(a.net_worth(PlayerId::new(0)), b.net_worth(PlayerId::new(0)));
}

#[test]
fn test_saved_game_resumes_with_same_dice() {
    let catalog = Arc::new(Catalog::standard().unwrap());
    let mut engine = Engine::new(catalog.clone(), GameConfig::default(), 11);
    let mut state = engine.start_game(&setups(&["usa", "uk"])).unwrap();
    for _ in 0..25 {
        let command = engine.legal_commands(&state).remove(0);
        state = engine.apply(&state, &command);
    }

    // Save snapshot and dice, then load both into a fresh engine
    let saved_state = serde_json::to_string(&state).unwrap();
    let saved_dice = serde_json::to_string(&engine.dice_mut().position()).unwrap();
    let mut loaded = Engine::with_dice(
        catalog,
        GameConfig::default(),
        GameRng::resume(&serde_json::from_str(&saved_dice).unwrap()),
    );
    let mut copy: GameState = serde_json::from_str(&saved_state).unwrap();
    assert_eq!(copy, state);

    for _ in 0..50 {
        let command = engine.legal_commands(&state).remove(0);
        state = engine.apply(&state, &command);
        copy = loaded.apply(&copy, &command);
    }
    assert_eq!(copy, state);
}
