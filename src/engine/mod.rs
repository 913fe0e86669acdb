//! The game engine: one transition per command.
//!
//! `Engine::apply` takes a snapshot and a command and returns the next
//! snapshot. Invalid intent (wrong phase, not enough cash, selling a stock
//! you do not hold, ...) is absorbed: the rejection is logged at debug level
//! and the input comes back unchanged. `try_apply` runs the same transition
//! but reports the `Rejection`.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use stock_exchange::catalog::Catalog;
//! use stock_exchange::core::{Command, GameConfig, Phase};
//! use stock_exchange::engine::{Engine, PlayerSetup};
//!
//! let catalog = Arc::new(Catalog::standard().unwrap());
//! let mut engine = Engine::new(catalog, GameConfig::default(), 42);
//!
//! let state = engine
//!     .start_game(&[PlayerSetup::new("Ada", "usa"), PlayerSetup::new("Bo", "japan")])
//!     .unwrap();
//! assert_eq!(state.phase, Phase::Rolling);
//!
//! let state = engine.apply(&state, &Command::RollMovementDice);
//! assert_eq!(state.phase, Phase::Landed);
//! ```

mod market;
mod turn;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Money};
use crate::core::{Command, DiceSource, GameConfig, GameRng, GameState, Phase, Player, PlayerId};
use crate::error::{Rejection, SetupError};
use crate::rules::{self, GameResult, PricingPolicy, Standing};

const PLAYER_AVATARS: [&str; 4] = ["👤", "🚀", "👽", "⭐"];
const PLAYER_COLORS: [&str; 4] = ["player-1", "player-2", "player-3", "player-4"];

/// One seat as chosen on the setup screen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSetup {
    pub name: String,
    /// Nationality id from the catalog.
    pub nationality: String,
    /// Falls back to a per-seat default.
    #[serde(default)]
    pub avatar: Option<String>,
}

impl PlayerSetup {
    pub fn new(name: impl Into<String>, nationality: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nationality: nationality.into(),
            avatar: None,
        }
    }

    #[must_use]
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }
}

/// Rules, reference data and dice for one table.
#[derive(Debug)]
pub struct Engine<R: DiceSource = GameRng> {
    catalog: Arc<Catalog>,
    config: GameConfig,
    policy: Box<dyn PricingPolicy>,
    dice: R,
}

impl Engine<GameRng> {
    /// Engine with seeded dice and the pricing model named in `config`.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, config: GameConfig, seed: u64) -> Self {
        let dice = GameRng::new(seed);
        log::debug!("engine dice seeded with {}", dice.seed());
        Self::with_dice(catalog, config, dice)
    }
}

impl<R: DiceSource> Engine<R> {
    /// Engine with caller-supplied dice.
    pub fn with_dice(catalog: Arc<Catalog>, config: GameConfig, dice: R) -> Self {
        let policy = config.pricing.policy();
        Self {
            catalog,
            config,
            policy,
            dice,
        }
    }

    /// Replace the pricing policy chosen by the configuration.
    #[must_use]
    pub fn with_policy(mut self, policy: Box<dyn PricingPolicy>) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn policy(&self) -> &dyn PricingPolicy {
        self.policy.as_ref()
    }

    /// Dice, for scripting rolls between commands.
    pub fn dice_mut(&mut self) -> &mut R {
        &mut self.dice
    }

    /// An empty table in `Setup`.
    #[must_use]
    pub fn initial_state(&self) -> GameState {
        GameState::new(self.config.start_year, self.config.log_capacity)
    }

    /// Seat players and open the first turn.
    pub fn start_game(&mut self, setups: &[PlayerSetup]) -> Result<GameState, SetupError> {
        let (min, max) = (self.config.min_players, self.config.max_players);
        if setups.len() < min || setups.len() > max {
            return Err(SetupError::PlayerCount {
                min,
                max,
                found: setups.len(),
            });
        }

        let mut state = self.initial_state();
        for (id, setup) in PlayerId::all(setups.len()).zip(setups) {
            let nationality = self
                .catalog
                .nationality(&setup.nationality)
                .ok_or_else(|| SetupError::UnknownNationality(setup.nationality.clone()))?;

            let mut player = Player::new(id, setup.name.clone(), nationality.clone(), self.config.starting_cash);
            player.avatar = setup
                .avatar
                .clone()
                .or_else(|| PLAYER_AVATARS.get(id.index()).map(|a| (*a).to_string()))
                .unwrap_or_else(|| format!("P{}", id.index() + 1));
            player.color = PLAYER_COLORS
                .get(id.index())
                .map_or_else(|| format!("player-{}", id.index() + 1), |c| (*c).to_string());
            state.players.push_back(player);
        }

        for stock in self.catalog.stocks() {
            state.stock_values.insert(stock.id.clone(), stock.price);
        }

        state.phase = Phase::Rolling;
        let first = state.players.front().map(|p| p.name.clone()).unwrap_or_default();
        state
            .log
            .push(format!("Game started! Year {}. {}'s turn.", state.year, first));
        log::info!("game started with {} players in {}", state.player_count(), state.year);

        Ok(state)
    }

    /// Apply a command, absorbing rejections as no-ops.
    pub fn apply(&mut self, state: &GameState, command: &Command) -> GameState {
        match self.try_apply(state, command) {
            Ok(next) => next,
            Err(rejection) => {
                log::debug!("ignored {command}: {rejection}");
                state.clone()
            }
        }
    }

    /// Apply a command, reporting why it was rejected.
    pub fn try_apply(&mut self, state: &GameState, command: &Command) -> Result<GameState, Rejection> {
        if !state.phase.is_active() {
            return Err(match state.phase {
                Phase::GameOver => Rejection::GameOver,
                phase => Rejection::WrongPhase(phase),
            });
        }
        if state.current_player().is_none() {
            return Err(Rejection::NoPlayers);
        }

        let mut next = state.clone();
        match command {
            Command::RollMovementDice => self.roll_movement_dice(&mut next)?,
            Command::ResolveLanding => self.resolve_landing(&mut next)?,
            Command::ApplyEvent => self.apply_event(&mut next)?,
            Command::ApplyChance => self.apply_chance(&mut next)?,
            Command::BuyStock(id) => self.buy_stock(&mut next, id)?,
            Command::SellStock(id) => self.sell_stock(&mut next, id)?,
            Command::SkipStockAction => self.skip_stock_action(&mut next)?,
            Command::RollStockValuation => self.roll_stock_valuation(&mut next)?,
            Command::EndTurn => self.end_turn(&mut next)?,
            Command::AcknowledgeDividends => self.acknowledge_dividends(&mut next)?,
            Command::OpenStockAction(id) => self.open_stock_action(&mut next, id.as_ref())?,
        }
        Ok(next)
    }

    /// Commands `try_apply` would accept right now.
    #[must_use]
    pub fn legal_commands(&self, state: &GameState) -> Vec<Command> {
        let Some(player) = state.current_player() else {
            return Vec::new();
        };

        let mut commands = match state.phase {
            Phase::Setup | Phase::GameOver => return Vec::new(),
            Phase::Rolling => vec![Command::RollMovementDice],
            Phase::Landed if state.current_tile.is_some() => vec![Command::ResolveLanding],
            Phase::Landed => Vec::new(),
            Phase::EventDisplay => vec![Command::ApplyEvent],
            Phase::ChanceDisplay => vec![Command::ApplyChance],
            Phase::StockAction => {
                let mut commands = Vec::new();
                if let Some(stock) = state
                    .current_tile
                    .as_ref()
                    .and_then(|t| t.stock_id())
                    .and_then(|id| self.catalog.stock(id))
                {
                    let price = state.stock_value(&stock.id).unwrap_or(stock.price);
                    if player.cash >= price {
                        commands.push(Command::BuyStock(stock.id.clone()));
                    }
                }
                commands.push(Command::SkipStockAction);
                commands
            }
            Phase::TurnEnd if state.is_last_player() => {
                vec![Command::EndTurn, Command::RollStockValuation]
            }
            Phase::TurnEnd => vec![Command::EndTurn],
            Phase::StockValuation => vec![Command::RollStockValuation],
            Phase::ValuationResults => vec![Command::EndTurn],
            Phase::DividendDisplay => vec![Command::AcknowledgeDividends],
        };

        for holding in &player.holdings {
            commands.push(Command::SellStock(holding.stock_id.clone()));
        }
        if state.phase.is_in_turn() && state.phase != Phase::StockAction {
            for holding in &player.holdings {
                commands.push(Command::OpenStockAction(Some(holding.stock_id.clone())));
            }
        }

        commands
    }

    /// Cash plus holdings at current value. Zero for an empty seat.
    #[must_use]
    pub fn net_worth(&self, state: &GameState, player: PlayerId) -> Money {
        state
            .player(player)
            .map_or(0, |p| rules::net_worth(p, &state.stock_values))
    }

    /// Players ranked by net worth.
    #[must_use]
    pub fn standings(&self, state: &GameState) -> Vec<Standing> {
        rules::standings(state)
    }

    /// The winner, once the game is over.
    #[must_use]
    pub fn result(&self, state: &GameState) -> Option<GameResult> {
        rules::result(state)
    }
}

fn require_phase(state: &GameState, allowed: &[Phase]) -> Result<(), Rejection> {
    if allowed.contains(&state.phase) {
        Ok(())
    } else {
        Err(Rejection::WrongPhase(state.phase))
    }
}
