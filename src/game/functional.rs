//! Pure hand-evaluation functions.
//!
//! `eval` ranks the best five-card hand hidden in 5 to 7 cards. Scores are
//! totally ordered: category first, then the kicker vector, so a plain
//! comparison settles any showdown.

use super::entities::{Card, HandCategory, HandScore, Rank, RANK_ACE};
use super::errors::GameError;

/// Rank the best five-card hand out of `cards`.
///
/// Accepts 5 to 7 cards; anything else is a caller bug and comes back as
/// `InvalidInput`. With more than five cards every five-card subset is
/// scored and the best kept.
pub fn eval(cards: &[Card]) -> Result<HandScore, GameError> {
    let n = cards.len();
    if !(5..=7).contains(&n) {
        return Err(GameError::InvalidInput(format!(
            "hand evaluation needs 5 to 7 cards, got {n}"
        )));
    }

    let mut best: Option<HandScore> = None;
    for a in 0..n - 4 {
        for b in a + 1..n - 3 {
            for c in b + 1..n - 2 {
                for d in c + 1..n - 1 {
                    for e in d + 1..n {
                        let score =
                            score_five([cards[a], cards[b], cards[c], cards[d], cards[e]]);
                        if best.as_ref().map_or(true, |current| score > *current) {
                            best = Some(score);
                        }
                    }
                }
            }
        }
    }
    // n >= 5 guarantees at least one subset was scored
    best.ok_or_else(|| GameError::InvalidInput("empty hand".to_string()))
}

/// Indices of every score tied at the maximum. Ties mean a split pot.
#[must_use]
pub fn argmax(scores: &[HandScore]) -> Vec<usize> {
    let Some(best) = scores.iter().max() else {
        return Vec::new();
    };
    scores
        .iter()
        .enumerate()
        .filter(|(_, s)| *s == best)
        .map(|(i, _)| i)
        .collect()
}

/// Score exactly five cards.
#[must_use]
pub fn score_five(cards: [Card; 5]) -> HandScore {
    let mut ranks: Vec<Rank> = cards.iter().map(Card::rank).collect();
    ranks.sort_unstable_by(|a, b| b.cmp(a));

    let is_flush = cards.iter().all(|c| c.suit() == cards[0].suit());
    let straight_high = straight_high(&ranks);

    // counts[(rank, multiplicity)] sorted by multiplicity then rank, descending
    let mut counts: Vec<(Rank, usize)> = Vec::new();
    for &r in &ranks {
        match counts.iter_mut().find(|(rank, _)| *rank == r) {
            Some((_, n)) => *n += 1,
            None => counts.push((r, 1)),
        }
    }
    counts.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));

    if let Some(high) = straight_high {
        let category = if is_flush {
            HandCategory::StraightFlush
        } else {
            HandCategory::Straight
        };
        return HandScore {
            category,
            tiebreakers: vec![high],
        };
    }

    match (counts[0].1, counts.get(1).map_or(0, |c| c.1)) {
        (4, _) => HandScore {
            category: HandCategory::FourOfAKind,
            tiebreakers: vec![counts[0].0, counts[1].0],
        },
        (3, 2) => HandScore {
            category: HandCategory::FullHouse,
            tiebreakers: vec![counts[0].0, counts[1].0],
        },
        _ if is_flush => HandScore {
            category: HandCategory::Flush,
            tiebreakers: ranks,
        },
        (3, _) => HandScore {
            category: HandCategory::ThreeOfAKind,
            tiebreakers: vec![counts[0].0, counts[1].0, counts[2].0],
        },
        (2, 2) => HandScore {
            category: HandCategory::TwoPair,
            tiebreakers: vec![counts[0].0, counts[1].0, counts[2].0],
        },
        (2, _) => HandScore {
            category: HandCategory::Pair,
            tiebreakers: vec![counts[0].0, counts[1].0, counts[2].0, counts[3].0],
        },
        _ => HandScore {
            category: HandCategory::HighCard,
            tiebreakers: ranks,
        },
    }
}

/// High card of the straight formed by `ranks` (sorted descending), if any.
/// The wheel A-2-3-4-5 counts with a high card of 5.
fn straight_high(ranks: &[Rank]) -> Option<Rank> {
    let mut unique = ranks.to_vec();
    unique.dedup();
    if unique.len() != 5 {
        return None;
    }
    if unique[0] - unique[4] == 4 {
        return Some(unique[0]);
    }
    if unique == [RANK_ACE, 5, 4, 3, 2] {
        return Some(5);
    }
    None
}
