//! Seeded randomness and the dealing deck.
//!
//! Deck order must be a pure function of (seed, hand number) so any deal can
//! be replayed bit-for-bit. A small fixed-constant congruential generator
//! keeps the sequence stable across platforms and releases.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::constants::DECK_SIZE;
use super::entities::{Card, Suit, RANK_ACE, RANK_TWO};

const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;

/// Linear congruential generator over the full 32-bit state space.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { state: seed as u32 }
    }

    /// Next uniform fraction in [0, 1).
    pub fn next(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        f64::from(self.state) / (u64::from(u32::MAX) + 1) as f64
    }

    /// Uniform integer in [0, n).
    pub fn next_int(&mut self, n: usize) -> usize {
        (self.next() * n as f64).floor() as usize
    }
}

/// The dealing deck. Cards are consumed from the front.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Deck {
    cards: VecDeque<Card>,
}

impl Deck {
    /// The 52 cards in canonical order: suits clubs through spades, ranks
    /// deuce through ace within each suit.
    #[must_use]
    pub fn standard() -> Self {
        let mut cards = VecDeque::with_capacity(DECK_SIZE);
        for suit in Suit::ALL {
            for rank in RANK_TWO..=RANK_ACE {
                cards.push_back(Card(rank, suit));
            }
        }
        Self { cards }
    }

    /// A fresh deck shuffled with the supplied generator (Fisher-Yates,
    /// walking from the top of the deck down).
    #[must_use]
    pub fn shuffled(rng: &mut Lcg) -> Self {
        let mut cards: Vec<Card> = Self::standard().cards.into();
        for i in (1..cards.len()).rev() {
            let j = rng.next_int(i + 1);
            cards.swap(i, j);
        }
        Self {
            cards: cards.into(),
        }
    }

    /// A deck in exactly the supplied order; no shuffle is applied.
    #[must_use]
    pub fn preset(cards: Vec<Card>) -> Self {
        Self {
            cards: cards.into(),
        }
    }

    pub fn deal(&mut self) -> Option<Card> {
        self.cards.pop_front()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}
