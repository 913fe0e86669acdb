//! Deterministic dice for movement, card draws and stock valuation.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical turn sequences
//! - **Resumable**: O(1) position capture and restore
//! - **Scriptable**: `ScriptedDice` replays fixed rolls for tests and replays
//!
//! ## Usage
//!
//! ```
//! use stock_exchange::core::{DiceSource, GameRng};
//!
//! let mut rng = GameRng::new(42);
//! let roll = rng.roll_die(6);
//! assert!((1..=6).contains(&roll));
//!
//! // Same seed, same rolls
//! let mut again = GameRng::new(42);
//! assert_eq!(again.roll_die(6), roll);
//! ```

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Source of every random draw the engine makes.
///
/// Ranges are inclusive on both ends for dice: a six-sided die yields `1..=6`.
pub trait DiceSource {
    /// Roll a die with faces `1..=sides`.
    fn roll_die(&mut self, sides: u32) -> u32;

    /// Pick a uniform index in `0..len`. `len` must be non-zero.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// Seeded ChaCha8 dice.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Where in its stream this RNG is, for saving alongside a snapshot.
    #[must_use]
    pub fn position(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Continue a stream from a saved position.
    #[must_use]
    pub fn resume(position: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(position.seed);
        inner.set_word_pos(position.word_pos);
        Self {
            inner,
            seed: position.seed,
        }
    }
}

impl DiceSource for GameRng {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.inner.gen_range(1..=sides.max(1))
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len.max(1))
    }
}

/// Saved `GameRng` position.
///
/// The ChaCha8 word position makes capture O(1) however many dice were rolled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    pub seed: u64,
    pub word_pos: u128,
}

/// Dice that replay queued results, then fall back to a seeded `GameRng`.
///
/// Rolls and picks are queued separately so a test can force a movement roll
/// without caring how many card draws happen in between.
///
/// ```
/// use stock_exchange::core::{DiceSource, ScriptedDice};
///
/// let mut dice = ScriptedDice::new(7).with_rolls([6, 3]);
/// assert_eq!(dice.roll_die(6), 6);
/// assert_eq!(dice.roll_die(6), 3);
/// ```
#[derive(Clone, Debug)]
pub struct ScriptedDice {
    rolls: VecDeque<u32>,
    picks: VecDeque<usize>,
    fallback: GameRng,
}

impl ScriptedDice {
    /// Create scripted dice with an empty script.
    #[must_use]
    pub fn new(fallback_seed: u64) -> Self {
        Self {
            rolls: VecDeque::new(),
            picks: VecDeque::new(),
            fallback: GameRng::new(fallback_seed),
        }
    }

    /// Queue die results, consumed in order.
    #[must_use]
    pub fn with_rolls(mut self, rolls: impl IntoIterator<Item = u32>) -> Self {
        self.rolls.extend(rolls);
        self
    }

    /// Queue index picks (card draws, random stock choice), consumed in order.
    #[must_use]
    pub fn with_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(picks);
        self
    }

    /// Append more die results to the script.
    pub fn push_rolls(&mut self, rolls: impl IntoIterator<Item = u32>) {
        self.rolls.extend(rolls);
    }

    /// Append more picks to the script.
    pub fn push_picks(&mut self, picks: impl IntoIterator<Item = usize>) {
        self.picks.extend(picks);
    }

    /// Number of scripted rolls not yet consumed.
    #[must_use]
    pub fn remaining_rolls(&self) -> usize {
        self.rolls.len()
    }
}

impl DiceSource for ScriptedDice {
    fn roll_die(&mut self, sides: u32) -> u32 {
        match self.rolls.pop_front() {
            Some(roll) => roll.clamp(1, sides.max(1)),
            None => self.fallback.roll_die(sides),
        }
    }

    fn pick_index(&mut self, len: usize) -> usize {
        match self.picks.pop_front() {
            Some(pick) => pick % len.max(1),
            None => self.fallback.pick_index(len),
        }
    }
}
