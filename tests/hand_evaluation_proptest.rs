//! Hand evaluator properties: the score must be a total order that matches
//! standard poker rankings, independent of card order, and the best
//! five-card subset must always win out.

use cardroom::game::entities::{Card, HandCategory, Suit};
use cardroom::game::functional::{argmax, eval, score_five};
use proptest::prelude::*;

fn full_deck() -> Vec<Card> {
    let mut cards = Vec::with_capacity(52);
    for suit in Suit::ALL {
        for rank in 2..=14 {
            cards.push(Card(rank, suit));
        }
    }
    cards
}

fn seven_distinct_cards() -> impl Strategy<Value = Vec<Card>> {
    prop::sample::subsequence(full_deck(), 7)
}

fn five_distinct_cards() -> impl Strategy<Value = Vec<Card>> {
    prop::sample::subsequence(full_deck(), 5)
}

// === Known hands ===

#[test]
fn test_royal_straight_flush_with_junk() {
    let cards = [
        Card(14, Suit::Hearts),
        Card(13, Suit::Hearts),
        Card(12, Suit::Hearts),
        Card(11, Suit::Hearts),
        Card(10, Suit::Hearts),
        Card(2, Suit::Clubs),
        Card(3, Suit::Diamonds),
    ];
    let score = eval(&cards).unwrap();
    assert_eq!(score.category, HandCategory::StraightFlush);
    assert_eq!(score.tiebreakers, vec![14]);
}

#[test]
fn test_quad_nines_with_ace_kicker() {
    let cards = [
        Card(9, Suit::Hearts),
        Card(9, Suit::Clubs),
        Card(9, Suit::Diamonds),
        Card(9, Suit::Spades),
        Card(14, Suit::Clubs),
        Card(13, Suit::Diamonds),
        Card(2, Suit::Spades),
    ];
    let score = eval(&cards).unwrap();
    assert_eq!(score.category, HandCategory::FourOfAKind);
    assert_eq!(score.tiebreakers, vec![9, 14]);
}

#[test]
fn test_category_ladder() {
    // One representative hand per category, weakest first.
    let hands: Vec<(HandCategory, [Card; 5])> = vec![
        (
            HandCategory::HighCard,
            [
                Card(14, Suit::Spades),
                Card(12, Suit::Hearts),
                Card(9, Suit::Diamonds),
                Card(6, Suit::Clubs),
                Card(3, Suit::Spades),
            ],
        ),
        (
            HandCategory::Pair,
            [
                Card(14, Suit::Spades),
                Card(14, Suit::Hearts),
                Card(9, Suit::Diamonds),
                Card(6, Suit::Clubs),
                Card(3, Suit::Spades),
            ],
        ),
        (
            HandCategory::TwoPair,
            [
                Card(14, Suit::Spades),
                Card(14, Suit::Hearts),
                Card(9, Suit::Diamonds),
                Card(9, Suit::Clubs),
                Card(3, Suit::Spades),
            ],
        ),
        (
            HandCategory::ThreeOfAKind,
            [
                Card(14, Suit::Spades),
                Card(14, Suit::Hearts),
                Card(14, Suit::Diamonds),
                Card(6, Suit::Clubs),
                Card(3, Suit::Spades),
            ],
        ),
        (
            HandCategory::Straight,
            [
                Card(8, Suit::Spades),
                Card(7, Suit::Hearts),
                Card(6, Suit::Diamonds),
                Card(5, Suit::Clubs),
                Card(4, Suit::Spades),
            ],
        ),
        (
            HandCategory::Flush,
            [
                Card(13, Suit::Clubs),
                Card(9, Suit::Clubs),
                Card(7, Suit::Clubs),
                Card(4, Suit::Clubs),
                Card(2, Suit::Clubs),
            ],
        ),
        (
            HandCategory::FullHouse,
            [
                Card(10, Suit::Spades),
                Card(10, Suit::Hearts),
                Card(10, Suit::Diamonds),
                Card(4, Suit::Clubs),
                Card(4, Suit::Spades),
            ],
        ),
        (
            HandCategory::FourOfAKind,
            [
                Card(10, Suit::Spades),
                Card(10, Suit::Hearts),
                Card(10, Suit::Diamonds),
                Card(10, Suit::Clubs),
                Card(4, Suit::Spades),
            ],
        ),
        (
            HandCategory::StraightFlush,
            [
                Card(9, Suit::Hearts),
                Card(8, Suit::Hearts),
                Card(7, Suit::Hearts),
                Card(6, Suit::Hearts),
                Card(5, Suit::Hearts),
            ],
        ),
    ];

    for window in hands.windows(2) {
        let (weak_cat, weak) = &window[0];
        let (strong_cat, strong) = &window[1];
        let weak_score = score_five(*weak);
        let strong_score = score_five(*strong);
        assert_eq!(weak_score.category, *weak_cat);
        assert_eq!(strong_score.category, *strong_cat);
        assert!(
            strong_score > weak_score,
            "{strong_cat:?} should beat {weak_cat:?}"
        );
    }
}

#[test]
fn test_kickers_break_pair_ties() {
    let ace_kicker = score_five([
        Card(8, Suit::Spades),
        Card(8, Suit::Hearts),
        Card(14, Suit::Diamonds),
        Card(6, Suit::Clubs),
        Card(3, Suit::Spades),
    ]);
    let king_kicker = score_five([
        Card(8, Suit::Clubs),
        Card(8, Suit::Diamonds),
        Card(13, Suit::Hearts),
        Card(6, Suit::Spades),
        Card(3, Suit::Hearts),
    ]);
    assert!(ace_kicker > king_kicker);
}

#[test]
fn test_identical_ranks_tie_across_suits() {
    let spades = score_five([
        Card(14, Suit::Spades),
        Card(13, Suit::Spades),
        Card(9, Suit::Hearts),
        Card(6, Suit::Clubs),
        Card(3, Suit::Diamonds),
    ]);
    let clubs = score_five([
        Card(14, Suit::Clubs),
        Card(13, Suit::Clubs),
        Card(9, Suit::Diamonds),
        Card(6, Suit::Spades),
        Card(3, Suit::Hearts),
    ]);
    assert_eq!(spades, clubs);
    assert_eq!(argmax(&[spades, clubs]), vec![0, 1]);
}

#[test]
fn test_wrong_card_counts_rejected() {
    let deck = full_deck();
    assert!(eval(&deck[..4]).is_err());
    assert!(eval(&deck[..8]).is_err());
    assert!(eval(&[]).is_err());
}

// === Properties ===

proptest! {
    /// Any 7 distinct cards evaluate, and the result is at least as good as
    /// every individual five-card subset.
    #[test]
    fn prop_seven_card_eval_dominates_subsets(cards in seven_distinct_cards()) {
        let best = eval(&cards).unwrap();
        for a in 0..3 {
            for b in (a + 1)..4 {
                // Drop two cards, keep five.
                let subset: Vec<Card> = cards
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != a && *i != b)
                    .map(|(_, c)| *c)
                    .collect();
                let sub_score = eval(&subset).unwrap();
                prop_assert!(best >= sub_score);
            }
        }
    }

    /// Scores form a total order: for any two hands exactly one of
    /// less / equal / greater holds, and equality means identical category
    /// and kicker vector.
    #[test]
    fn prop_total_order(a in seven_distinct_cards(), b in seven_distinct_cards()) {
        let sa = eval(&a).unwrap();
        let sb = eval(&b).unwrap();
        let relations = [sa < sb, sa == sb, sa > sb];
        prop_assert_eq!(relations.iter().filter(|r| **r).count(), 1);
        if sa == sb {
            prop_assert_eq!(sa.category, sb.category);
            prop_assert_eq!(&sa.tiebreakers, &sb.tiebreakers);
        }
    }

    /// Input order never matters.
    #[test]
    fn prop_order_invariant(mut cards in seven_distinct_cards(), rotation in 0usize..7) {
        let forward = eval(&cards).unwrap();
        cards.rotate_left(rotation);
        prop_assert_eq!(eval(&cards).unwrap(), forward.clone());
        cards.reverse();
        prop_assert_eq!(eval(&cards).unwrap(), forward);
    }

    /// Adding cards can only improve a hand.
    #[test]
    fn prop_extra_cards_never_hurt(cards in seven_distinct_cards()) {
        let five = eval(&cards[..5]).unwrap();
        let six = eval(&cards[..6]).unwrap();
        let seven = eval(&cards).unwrap();
        prop_assert!(six >= five);
        prop_assert!(seven >= six);
    }

    /// Tiebreaker vectors stay inside the rank alphabet and match the
    /// category's expected length.
    #[test]
    fn prop_score_shape(cards in five_distinct_cards()) {
        let score = eval(&cards).unwrap();
        let expected_len = match score.category {
            HandCategory::StraightFlush | HandCategory::Straight => 1,
            HandCategory::FourOfAKind | HandCategory::FullHouse => 2,
            HandCategory::ThreeOfAKind | HandCategory::TwoPair => 3,
            HandCategory::Pair => 4,
            HandCategory::Flush | HandCategory::HighCard => 5,
        };
        prop_assert_eq!(score.tiebreakers.len(), expected_len);
        for rank in &score.tiebreakers {
            prop_assert!((2..=14).contains(rank));
        }
    }

    /// `argmax` always returns the positions of the winning score.
    #[test]
    fn prop_argmax_selects_maximum(hands in prop::collection::vec(seven_distinct_cards(), 2..5)) {
        let scores: Vec<_> = hands.iter().map(|h| eval(h).unwrap()).collect();
        let winners = argmax(&scores);
        prop_assert!(!winners.is_empty());
        let best = scores.iter().max().unwrap();
        for (i, score) in scores.iter().enumerate() {
            prop_assert_eq!(winners.contains(&i), score == best);
        }
    }
}
