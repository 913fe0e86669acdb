//! Single-table session for a hotseat UI.
//!
//! `Game` owns an engine and the current snapshot, and exposes one method
//! per command. Each method replaces the snapshot and returns it, so a UI
//! can re-render from the return value.

use std::sync::Arc;

use crate::catalog::{Catalog, Money, StockId};
use crate::core::{Command, DiceSource, GameConfig, GameRng, GameState, Player, PlayerId};
use crate::engine::{Engine, PlayerSetup};
use crate::error::SetupError;
use crate::rules::{GameResult, Standing};

/// A game in progress at one table.
///
/// ```
/// use std::sync::Arc;
/// use stock_exchange::catalog::Catalog;
/// use stock_exchange::core::{GameConfig, Phase};
/// use stock_exchange::engine::PlayerSetup;
/// use stock_exchange::Game;
///
/// let mut game = Game::new(Arc::new(Catalog::standard().unwrap()), GameConfig::default(), 7);
/// assert_eq!(game.state().phase, Phase::Setup);
///
/// game.start_game(&[PlayerSetup::new("Ada", "usa"), PlayerSetup::new("Bo", "uk")]).unwrap();
/// game.roll_movement_dice();
/// assert_eq!(game.state().phase, Phase::Landed);
/// ```
#[derive(Debug)]
pub struct Game<R: DiceSource = GameRng> {
    engine: Engine<R>,
    state: GameState,
}

impl Game<GameRng> {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, config: GameConfig, seed: u64) -> Self {
        Self::with_engine(Engine::new(catalog, config, seed))
    }
}

impl<R: DiceSource> Game<R> {
    /// Wrap an engine; the table starts in `Setup`.
    pub fn with_engine(engine: Engine<R>) -> Self {
        let state = engine.initial_state();
        Self { engine, state }
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn engine(&self) -> &Engine<R> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine<R> {
        &mut self.engine
    }

    /// Seat players and start the first turn. On error the table is unchanged.
    pub fn start_game(&mut self, setups: &[PlayerSetup]) -> Result<&GameState, SetupError> {
        self.state = self.engine.start_game(setups)?;
        Ok(&self.state)
    }

    /// Back to an empty `Setup` table.
    pub fn restart(&mut self) -> &GameState {
        self.state = self.engine.initial_state();
        &self.state
    }

    /// Apply any command; invalid ones leave the snapshot unchanged.
    pub fn dispatch(&mut self, command: &Command) -> &GameState {
        self.state = self.engine.apply(&self.state, command);
        &self.state
    }

    pub fn roll_movement_dice(&mut self) -> &GameState {
        self.dispatch(&Command::RollMovementDice)
    }

    pub fn resolve_landing(&mut self) -> &GameState {
        self.dispatch(&Command::ResolveLanding)
    }

    pub fn apply_event(&mut self) -> &GameState {
        self.dispatch(&Command::ApplyEvent)
    }

    pub fn apply_chance(&mut self) -> &GameState {
        self.dispatch(&Command::ApplyChance)
    }

    pub fn buy_stock(&mut self, stock: impl Into<StockId>) -> &GameState {
        self.dispatch(&Command::BuyStock(stock.into()))
    }

    pub fn sell_stock(&mut self, stock: impl Into<StockId>) -> &GameState {
        self.dispatch(&Command::SellStock(stock.into()))
    }

    pub fn skip_stock_action(&mut self) -> &GameState {
        self.dispatch(&Command::SkipStockAction)
    }

    pub fn roll_stock_valuation(&mut self) -> &GameState {
        self.dispatch(&Command::RollStockValuation)
    }

    pub fn end_turn(&mut self) -> &GameState {
        self.dispatch(&Command::EndTurn)
    }

    pub fn acknowledge_dividends(&mut self) -> &GameState {
        self.dispatch(&Command::AcknowledgeDividends)
    }

    pub fn open_stock_action(&mut self, stock: Option<StockId>) -> &GameState {
        self.dispatch(&Command::OpenStockAction(stock))
    }

    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        self.state.current_player()
    }

    #[must_use]
    pub fn legal_commands(&self) -> Vec<Command> {
        self.engine.legal_commands(&self.state)
    }

    #[must_use]
    pub fn net_worth(&self, player: PlayerId) -> Money {
        self.engine.net_worth(&self.state, player)
    }

    #[must_use]
    pub fn standings(&self) -> Vec<Standing> {
        self.engine.standings(&self.state)
    }

    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        self.engine.result(&self.state)
    }
}
