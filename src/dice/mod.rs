//! Sources of dice values.
//!
//! The game never reaches for ambient randomness: every roll goes through a
//! [`Dice`] handed in by the caller, so tests can script exact outcomes.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform integer generator over an inclusive range.
pub trait Dice {
    fn roll(&mut self, min: u8, max: u8) -> u8;
}

impl<D: Dice + ?Sized> Dice for &mut D {
    fn roll(&mut self, min: u8, max: u8) -> u8 {
        (**self).roll(min, max)
    }
}

/// Dice backed by a real RNG.
pub struct RandomDice {
    rng: StdRng,
}

impl RandomDice {
    /// `Some(seed)` gives reproducible rolls; `None` seeds from the OS.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        RandomDice { rng }
    }
}

impl Default for RandomDice {
    fn default() -> Self {
        RandomDice::new(None)
    }
}

impl Dice for RandomDice {
    fn roll(&mut self, min: u8, max: u8) -> u8 {
        self.rng.random_range(min..=max)
    }
}

/// Dice that replay a fixed script. Values are clamped into the requested
/// range; once the script runs dry every roll yields `min`.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDice {
    script: VecDeque<u8>,
}

impl ScriptedDice {
    pub fn new(values: impl IntoIterator<Item = u8>) -> Self {
        ScriptedDice {
            script: values.into_iter().collect(),
        }
    }

    pub fn push(&mut self, value: u8) {
        self.script.push_back(value);
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self, min: u8, max: u8) -> u8 {
        self.script
            .pop_front()
            .map(|value| value.clamp(min, max))
            .unwrap_or(min)
    }
}
