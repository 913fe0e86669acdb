//! Core engine types: players, phases, commands, state, dice, configuration.
//!
//! Nothing here knows the economic rules; those live in `rules` and `engine`.

pub mod player;
pub mod phase;
pub mod game_log;
pub mod rng;
pub mod config;
pub mod command;
pub mod state;

pub use player::{Holding, Player, PlayerId};
pub use phase::{Phase, ResumeContext};
pub use game_log::GameLog;
pub use rng::{DiceSource, GameRng, GameRngState, ScriptedDice};
pub use config::{round_money, GameConfig};
pub use command::Command;
pub use state::GameState;
