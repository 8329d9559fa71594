use serde::{Deserialize, Deserializer, Serialize};
use std::{collections::HashMap, fmt};

use super::errors::GameError;

/// Type alias for card rank ordinals. Deuce is 2, ace is 14. The ace only
/// counts low inside the A-2-3-4-5 wheel straight.
pub type Rank = u8;

pub const RANK_TWO: Rank = 2;
pub const RANK_ACE: Rank = 14;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Clubs => "♣",
            Self::Diamonds => "♦",
            Self::Hearts => "♥",
            Self::Spades => "♠",
        };
        write!(f, "{repr}")
    }
}

/// A card is a tuple of a rank ordinal (2..=14) and a suit.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card(pub Rank, pub Suit);

impl Card {
    pub fn rank(&self) -> Rank {
        self.0
    }

    pub fn suit(&self) -> Suit {
        self.1
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rank = match self.0 {
            14 => "A".to_string(),
            13 => "K".to_string(),
            12 => "Q".to_string(),
            11 => "J".to_string(),
            10 => "T".to_string(),
            r => r.to_string(),
        };
        write!(f, "{rank}{}", self.1)
    }
}

/// Type alias for whole chips. All bets and stacks are whole chips; there is
/// nothing smaller to argue over.
pub type Chips = u32;

pub const DEFAULT_INITIAL_STACK: Chips = 1_000;
pub const DEFAULT_SMALL_BLIND: Chips = 5;
pub const DEFAULT_BIG_BLIND: Chips = 10;

/// Stable identifier for a player across the platform.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(s: &str) -> Self {
        let id: String = s
            .chars()
            .map(|c| if c.is_ascii_whitespace() { '_' } else { c })
            .collect();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<'de> Deserialize<'de> for PlayerId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PlayerId {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

/// Hand phases, in the order a hand moves through them.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Lobby,
    HandStart,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
    HandEnd,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Lobby => "lobby",
            Self::HandStart => "hand_start",
            Self::Preflop => "preflop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
            Self::Showdown => "showdown",
            Self::HandEnd => "hand_end",
        };
        write!(f, "{repr}")
    }
}

/// One seat at the table. Indices are fixed for a hand; `in_hand` is set at
/// hand start for every seat with chips, `folded`/`all_in` evolve within it.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Seat {
    pub id: PlayerId,
    pub seat_index: usize,
    pub stack: Chips,
    pub folded: bool,
    pub all_in: bool,
    pub is_dealer: bool,
    pub in_hand: bool,
}

impl Seat {
    #[must_use]
    pub fn new(id: PlayerId, seat_index: usize, stack: Chips) -> Self {
        Self {
            id,
            seat_index,
            stack,
            folded: false,
            all_in: false,
            is_dealer: false,
            in_hand: false,
        }
    }
}

/// One pot layer. Folded contributors stay in `amount` but never appear in
/// `eligible`; eligibility is listed in seat order.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Pot {
    pub amount: Chips,
    pub eligible: Vec<PlayerId>,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandCategory {
    HighCard,
    Pair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::HighCard => "high card",
            Self::Pair => "a pair",
            Self::TwoPair => "two pair",
            Self::ThreeOfAKind => "three of a kind",
            Self::Straight => "a straight",
            Self::Flush => "a flush",
            Self::FullHouse => "a full house",
            Self::FourOfAKind => "four of a kind",
            Self::StraightFlush => "a straight flush",
        };
        write!(f, "{repr}")
    }
}

/// Total-ordered score for a best five-card hand. The derived ordering
/// compares the category first, then the kicker vector lexicographically,
/// which matches standard poker tie-breaking.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct HandScore {
    pub category: HandCategory,
    pub tiebreakers: Vec<Rank>,
}

/// A uniform action envelope: a type tag plus an optional numeric payload.
/// Serialized form is `{ "type": …, "payload": { … } }`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum GameAction {
    #[serde(rename = "START_HAND")]
    StartHand,
    #[serde(rename = "ADVANCE_PHASE")]
    AdvancePhase,
    #[serde(rename = "fold")]
    Fold,
    #[serde(rename = "check")]
    Check,
    #[serde(rename = "call")]
    Call,
    #[serde(rename = "bet")]
    Bet { amount: i64 },
    #[serde(rename = "raise")]
    Raise { to_amount: i64 },
    #[serde(rename = "all_in")]
    AllIn,
}

const KNOWN_ACTION_TYPES: [&str; 8] = [
    "START_HAND",
    "ADVANCE_PHASE",
    "fold",
    "check",
    "call",
    "bet",
    "raise",
    "all_in",
];

impl GameAction {
    /// Parse an externally supplied action value. Unrecognized type tags are
    /// reported as such; a recognized tag with a malformed payload is an
    /// amount problem.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, GameError> {
        serde_json::from_value(value.clone()).map_err(|_| {
            let kind = value
                .get("type")
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default();
            if KNOWN_ACTION_TYPES.contains(&kind) {
                GameError::InvalidAmount
            } else {
                GameError::UnknownAction(kind.to_string())
            }
        })
    }
}

impl fmt::Display for GameAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::StartHand => "starts the hand".to_string(),
            Self::AdvancePhase => "advances the phase".to_string(),
            Self::Fold => "folds".to_string(),
            Self::Check => "checks".to_string(),
            Self::Call => "calls".to_string(),
            Self::Bet { amount } => format!("bets {amount}"),
            Self::Raise { to_amount } => format!("raises to {to_amount}"),
            Self::AllIn => "goes all-in".to_string(),
        };
        write!(f, "{repr}")
    }
}

/// Legal actions for the seat currently to act, with their numeric bounds.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ActionOptions {
    pub can_fold: bool,
    pub can_check: bool,
    pub can_call: bool,
    pub can_bet: bool,
    pub can_raise: bool,
    pub can_all_in: bool,
    pub call_amount: Chips,
    pub min_bet: Chips,
    pub min_raise_to: Chips,
}

/// Outcome of a completed hand.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ShowdownResult {
    /// Seats that won at least one pot layer, in seat order.
    pub winners: Vec<PlayerId>,
    pub payouts: HashMap<PlayerId, Chips>,
    pub scores: HashMap<PlayerId, HandScore>,
    pub summary: String,
}

/// Projection delivered to the shared display. Carries no hole cards and no
/// deck information.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PublicView {
    pub phase: Phase,
    pub hand_number: u32,
    pub board: Vec<Card>,
    pub seats: Vec<Seat>,
    pub pots: Vec<Pot>,
    pub active_player: Option<PlayerId>,
    pub action_log: Vec<String>,
}

/// Projection delivered to one seat: the public view plus that seat's own
/// hole cards and, when it is their turn, the legal actions.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PlayerView {
    #[serde(flatten)]
    pub public: PublicView,
    pub hole_cards: Vec<Card>,
    pub available_actions: Option<ActionOptions>,
}
