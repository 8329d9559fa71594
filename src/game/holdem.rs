//! No-Limit Texas Hold'em on top of the generic wagering engine.
//!
//! The module is a pure function of its state: `apply_action` never mutates
//! the input, it returns the successor state. The table layer owns exactly
//! one state per table and swaps it on success.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::betting::{build_pots, BetAction, BettingRound, ForcedBet};
use super::constants::{
    BOARD_SIZE, DECK_SIZE, DEFAULT_SEED, HOLE_CARDS, MAX_ACTION_LOG_ENTRIES, MAX_SEATS, MIN_SEATS,
};
use super::entities::{
    Card, Chips, GameAction, HandScore, Phase, PlayerId, PlayerView, Pot, PublicView, Seat,
    ShowdownResult, DEFAULT_BIG_BLIND, DEFAULT_INITIAL_STACK, DEFAULT_SMALL_BLIND,
};
use super::errors::GameError;
use super::functional::{argmax, eval};
use super::module::GameModule;
use super::rng::{Deck, Lcg};

/// Table-level knobs for a Hold'em game.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct HoldemOptions {
    pub seed: u64,
    pub initial_stack: Chips,
    pub small_blind: Chips,
    pub big_blind: Chips,
    /// Fixed 52-card deal order; disables shuffling. Test-only.
    pub test_deck: Option<Vec<Card>>,
}

impl Default for HoldemOptions {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            initial_stack: DEFAULT_INITIAL_STACK,
            small_blind: DEFAULT_SMALL_BLIND,
            big_blind: DEFAULT_BIG_BLIND,
            test_deck: None,
        }
    }
}

/// Complete state of one Hold'em table. Serializable as a plain tree for
/// snapshots; equality is structural so replays can be compared directly.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct HoldemState {
    pub phase: Phase,
    pub seed: u64,
    pub hand_number: u32,
    pub seats: Vec<Seat>,
    pub deck: Deck,
    pub board: Vec<Card>,
    pub hole_cards: HashMap<PlayerId, Vec<Card>>,
    pub dealer_index: usize,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub betting: Option<BettingRound>,
    /// Authoritative pot layers, rebuilt from `hand_contributions` after
    /// every wagering action so they survive street transitions.
    pub pots: Vec<Pot>,
    pub hand_contributions: HashMap<PlayerId, Chips>,
    pub action_log: Vec<String>,
    pub showdown: Option<ShowdownResult>,
    pub preset_deck: Option<Vec<Card>>,
}

impl HoldemState {
    fn log(&mut self, entry: String) {
        self.action_log.push(entry);
        if self.action_log.len() > MAX_ACTION_LOG_ENTRIES {
            let excess = self.action_log.len() - MAX_ACTION_LOG_ENTRIES;
            self.action_log.drain(..excess);
        }
    }

    fn seat(&self, player: &PlayerId) -> Option<&Seat> {
        self.seats.iter().find(|s| s.id == *player)
    }

    fn in_hand_indices(&self) -> Vec<usize> {
        self.seats
            .iter()
            .filter(|s| s.in_hand)
            .map(|s| s.seat_index)
            .collect()
    }

    fn live_indices(&self) -> Vec<usize> {
        self.seats
            .iter()
            .filter(|s| s.in_hand && !s.folded)
            .map(|s| s.seat_index)
            .collect()
    }

    /// First seat index after `from` (exclusive, wrapping) satisfying the
    /// predicate, walking the fixed seat order.
    fn next_seat_where<F>(&self, from: usize, predicate: F) -> Option<usize>
    where
        F: Fn(&Seat) -> bool,
    {
        let n = self.seats.len();
        (1..=n)
            .map(|offset| (from + offset) % n)
            .find(|&idx| predicate(&self.seats[idx]))
    }

    fn start_hand(&mut self) -> Result<(), GameError> {
        if !matches!(self.phase, Phase::Lobby | Phase::HandEnd) {
            return Err(GameError::WrongPhase(self.phase));
        }
        let funded = self.seats.iter().filter(|s| s.stack > 0).count();
        if funded < MIN_SEATS {
            return Err(GameError::InsufficientPlayers(MIN_SEATS));
        }

        self.hand_number += 1;
        self.dealer_index = if self.hand_number == 1 {
            self.seats
                .iter()
                .find(|s| s.stack > 0)
                .map(|s| s.seat_index)
                .unwrap_or(0)
        } else {
            self.next_seat_where(self.dealer_index, |s| s.stack > 0)
                .unwrap_or(self.dealer_index)
        };

        for seat in &mut self.seats {
            seat.folded = false;
            seat.all_in = false;
            seat.in_hand = seat.stack > 0;
            seat.is_dealer = seat.seat_index == self.dealer_index;
        }
        self.phase = Phase::HandStart;
        self.board.clear();
        self.hole_cards.clear();
        self.pots.clear();
        self.hand_contributions.clear();
        self.showdown = None;
        self.betting = None;

        self.deck = match &self.preset_deck {
            Some(cards) => Deck::preset(cards.clone()),
            None => {
                let mut rng = Lcg::new(self.seed.wrapping_add(u64::from(self.hand_number)));
                Deck::shuffled(&mut rng)
            }
        };

        let dealer = self.seats[self.dealer_index].id.clone();
        self.log(format!(
            "hand {} begins; dealer is {dealer}",
            self.hand_number
        ));
        debug!("hand {} dealt, dealer seat {}", self.hand_number, self.dealer_index);

        self.deal_hole_cards()?;
        self.phase = Phase::Preflop;
        self.open_preflop()
    }

    /// Two passes over the in-hand seats in seat order, one card each.
    fn deal_hole_cards(&mut self) -> Result<(), GameError> {
        let in_hand = self.in_hand_indices();
        for _ in 0..HOLE_CARDS {
            for &idx in &in_hand {
                let card = self
                    .deck
                    .deal()
                    .ok_or_else(|| GameError::InvalidInput("deck exhausted".to_string()))?;
                let id = self.seats[idx].id.clone();
                self.hole_cards.entry(id).or_default().push(card);
            }
        }
        Ok(())
    }

    fn open_preflop(&mut self) -> Result<(), GameError> {
        let in_hand = self.in_hand_indices();
        let (sb_idx, bb_idx, first_idx) = if in_hand.len() == MIN_SEATS {
            // Heads-up: the dealer posts the small blind and acts first.
            let other = self
                .next_seat_where(self.dealer_index, |s| s.in_hand)
                .ok_or_else(|| GameError::InvalidInput("no opposing seat".to_string()))?;
            (self.dealer_index, other, self.dealer_index)
        } else {
            let sb = self
                .next_seat_where(self.dealer_index, |s| s.in_hand)
                .ok_or_else(|| GameError::InvalidInput("no small blind seat".to_string()))?;
            let bb = self
                .next_seat_where(sb, |s| s.in_hand)
                .ok_or_else(|| GameError::InvalidInput("no big blind seat".to_string()))?;
            let first = self
                .next_seat_where(bb, |s| s.in_hand)
                .ok_or_else(|| GameError::InvalidInput("no first actor".to_string()))?;
            (sb, bb, first)
        };

        let forced = vec![
            ForcedBet::new(self.seats[sb_idx].id.clone(), self.small_blind, "small blind"),
            ForcedBet::new(self.seats[bb_idx].id.clone(), self.big_blind, "big blind"),
        ];
        let first = self.seats[first_idx].id.clone();
        self.open_round("preflop", &forced, Some(first))
    }

    /// Build the betting round for the current street and mirror its forced
    /// bets into the hand-wide accounting.
    fn open_round(
        &mut self,
        label: &str,
        forced: &[ForcedBet],
        first_to_act: Option<PlayerId>,
    ) -> Result<(), GameError> {
        let participants: Vec<(PlayerId, Chips)> = self
            .seats
            .iter()
            .filter(|s| s.in_hand && !s.folded)
            .map(|s| (s.id.clone(), s.stack))
            .collect();
        let round = BettingRound::new(
            label,
            &participants,
            forced,
            first_to_act.as_ref(),
            self.big_blind,
        );
        self.betting = Some(round);
        self.absorb_round_effects(&HashMap::new(), 0);
        Ok(())
    }

    /// Postflop streets: first actor is the first live seat with chips after
    /// the dealer.
    fn first_postflop_actor(&self) -> Option<PlayerId> {
        self.next_seat_where(self.dealer_index, |s| {
            s.in_hand && !s.folded && !s.all_in && s.stack > 0
        })
        .map(|idx| self.seats[idx].id.clone())
    }

    fn betting_action(&mut self, player: &PlayerId, action: BetAction) -> Result<(), GameError> {
        if !matches!(
            self.phase,
            Phase::Preflop | Phase::Flop | Phase::Turn | Phase::River
        ) {
            return Err(GameError::WrongPhase(self.phase));
        }
        let Some(round) = self.betting.as_mut() else {
            return Err(GameError::WrongPhase(self.phase));
        };

        let before: HashMap<PlayerId, Chips> = round
            .seat_order
            .iter()
            .map(|id| (id.clone(), round.bettors[id].round_contribution))
            .collect();
        let log_mark = round.action_log.len();
        round.apply(player, action)?;

        self.absorb_round_effects(&before, log_mark);

        if self.live_indices().len() <= 1 {
            return self.run_showdown();
        }
        let closed = self
            .betting
            .as_ref()
            .map_or(false, |round| round.round_closed);
        if closed {
            // One street per closure; an all-in runout is stepped explicitly
            // with ADVANCE_PHASE so the display can pace the reveal.
            return self.advance_street();
        }
        Ok(())
    }

    /// Mirror the betting round back into the seats, fold cumulative
    /// contribution deltas into the hand accounting, rebuild the pots, and
    /// copy any new wagering log lines.
    fn absorb_round_effects(&mut self, before: &HashMap<PlayerId, Chips>, log_mark: usize) {
        let Some(round) = self.betting.as_ref() else {
            return;
        };
        let new_log: Vec<String> = round.action_log[log_mark..].to_vec();
        let updates: Vec<(PlayerId, Chips, bool, bool, Chips)> = round
            .seat_order
            .iter()
            .map(|id| {
                let bettor = &round.bettors[id];
                let delta = bettor
                    .round_contribution
                    .saturating_sub(before.get(id).copied().unwrap_or(0));
                (
                    id.clone(),
                    bettor.stack,
                    bettor.folded,
                    bettor.all_in,
                    delta,
                )
            })
            .collect();

        for (id, stack, folded, all_in, delta) in updates {
            if let Some(seat) = self.seats.iter_mut().find(|s| s.id == id) {
                seat.stack = stack;
                seat.folded = folded;
                seat.all_in = all_in;
            }
            if delta > 0 {
                *self.hand_contributions.entry(id).or_insert(0) += delta;
            }
        }
        for entry in new_log {
            self.log(entry);
        }
        self.rebuild_pots();
    }

    fn rebuild_pots(&mut self) {
        let order: Vec<PlayerId> = self.seats.iter().map(|s| s.id.clone()).collect();
        let folded: HashMap<PlayerId, bool> = self
            .seats
            .iter()
            .map(|s| (s.id.clone(), s.folded || !s.in_hand))
            .collect();
        self.pots = build_pots(&order, &self.hand_contributions, |id| {
            folded.get(id).copied().unwrap_or(true)
        });
    }

    /// Deal the next street, or run the showdown after the river.
    fn advance_street(&mut self) -> Result<(), GameError> {
        match self.phase {
            Phase::Preflop => {
                self.deal_board(3)?;
                self.phase = Phase::Flop;
                self.open_street("flop")
            }
            Phase::Flop => {
                self.deal_board(1)?;
                self.phase = Phase::Turn;
                self.open_street("turn")
            }
            Phase::Turn => {
                self.deal_board(1)?;
                self.phase = Phase::River;
                self.open_street("river")
            }
            Phase::River => self.run_showdown(),
            _ => Err(GameError::WrongPhase(self.phase)),
        }
    }

    fn open_street(&mut self, label: &str) -> Result<(), GameError> {
        let first = self.first_postflop_actor();
        self.open_round(label, &[], first)
    }

    fn deal_board(&mut self, count: usize) -> Result<(), GameError> {
        let mut dealt = Vec::with_capacity(count);
        for _ in 0..count {
            let card = self
                .deck
                .deal()
                .ok_or_else(|| GameError::InvalidInput("deck exhausted".to_string()))?;
            self.board.push(card);
            dealt.push(card.to_string());
        }
        debug_assert!(self.board.len() <= BOARD_SIZE);
        let street = match self.board.len() {
            3 => "flop",
            4 => "turn",
            _ => "river",
        };
        self.log(format!("{street}: {}", dealt.join(" ")));
        Ok(())
    }

    fn advance_phase_requested(&mut self) -> Result<(), GameError> {
        match self.phase {
            Phase::Preflop | Phase::Flop | Phase::Turn | Phase::River => {
                let closed = self
                    .betting
                    .as_ref()
                    .map_or(false, |round| round.round_closed);
                if !closed {
                    return Err(GameError::WrongPhase(self.phase));
                }
                self.advance_street()
            }
            Phase::Showdown => {
                self.phase = Phase::HandEnd;
                Ok(())
            }
            _ => Err(GameError::WrongPhase(self.phase)),
        }
    }

    /// Award every pot layer and finish the hand.
    fn run_showdown(&mut self) -> Result<(), GameError> {
        self.phase = Phase::Showdown;
        self.betting = None;
        self.rebuild_pots();

        let contenders: Vec<PlayerId> = self
            .seats
            .iter()
            .filter(|s| s.in_hand && !s.folded)
            .map(|s| s.id.clone())
            .collect();

        let mut scores: HashMap<PlayerId, HandScore> = HashMap::new();
        if contenders.len() > 1 {
            for id in &contenders {
                let mut cards = self.hole_cards.get(id).cloned().unwrap_or_default();
                cards.extend(self.board.iter().copied());
                scores.insert(id.clone(), eval(&cards)?);
            }
        }

        let mut payouts: HashMap<PlayerId, Chips> = HashMap::new();
        let mut summary_parts: Vec<String> = Vec::new();
        let pots = self.pots.clone();
        let pot_count = pots.len();
        for (layer, pot) in pots.iter().enumerate() {
            let eligible: Vec<PlayerId> = pot
                .eligible
                .iter()
                .filter(|id| contenders.contains(id))
                .cloned()
                .collect();
            if eligible.is_empty() {
                continue;
            }
            let winners: Vec<PlayerId> = if eligible.len() == 1 || scores.is_empty() {
                vec![eligible[0].clone()]
            } else {
                let layer_scores: Vec<_> =
                    eligible.iter().map(|id| scores[id].clone()).collect();
                argmax(&layer_scores)
                    .into_iter()
                    .map(|i| eligible[i].clone())
                    .collect()
            };

            // Floor split; odd chips go one each in seat order from the
            // lowest winning seat.
            let mut winners_by_seat = winners.clone();
            winners_by_seat.sort_by_key(|id| {
                self.seat(id).map(|s| s.seat_index).unwrap_or(usize::MAX)
            });
            let share = pot.amount / winners_by_seat.len() as Chips;
            let remainder = pot.amount % winners_by_seat.len() as Chips;
            for (i, id) in winners_by_seat.iter().enumerate() {
                let mut won = share;
                if (i as Chips) < remainder {
                    won += 1;
                }
                *payouts.entry(id.clone()).or_insert(0) += won;
            }

            let pot_name = match layer {
                0 if pot_count == 1 => "the pot".to_string(),
                0 => "the main pot".to_string(),
                n => format!("side pot {n}"),
            };
            let names: Vec<String> =
                winners_by_seat.iter().map(ToString::to_string).collect();
            let description = match winners_by_seat.first().and_then(|id| scores.get(id)) {
                Some(score) if winners_by_seat.len() == 1 => {
                    format!("{} wins {pot_name} ({}) with {}", names[0], pot.amount, score.category)
                }
                Some(score) => format!(
                    "{} split {pot_name} ({}) with {}",
                    names.join(" and "),
                    pot.amount,
                    score.category
                ),
                None => format!("{} wins {pot_name} ({}) uncontested", names[0], pot.amount),
            };
            summary_parts.push(description);
        }

        for seat in &mut self.seats {
            if let Some(won) = payouts.get(&seat.id) {
                seat.stack += won;
            }
        }

        let winners: Vec<PlayerId> = self
            .seats
            .iter()
            .filter(|s| payouts.get(&s.id).copied().unwrap_or(0) > 0)
            .map(|s| s.id.clone())
            .collect();
        let summary = summary_parts.join("; ");
        self.log(summary.clone());

        self.showdown = Some(ShowdownResult {
            winners,
            payouts,
            scores,
            summary,
        });
        // Awarded chips now live in the stacks again.
        self.pots.clear();
        self.hand_contributions.clear();
        self.phase = Phase::HandEnd;
        debug!("hand {} complete", self.hand_number);
        Ok(())
    }
}

/// The Hold'em implementation of the platform's game-module contract.
#[derive(Clone, Copy, Debug, Default)]
pub struct HoldemGame;

impl HoldemGame {
    fn validate_amount(amount: i64) -> Result<Chips, GameError> {
        if amount <= 0 || amount > i64::from(u32::MAX) {
            return Err(GameError::InvalidAmount);
        }
        Ok(amount as Chips)
    }
}

impl GameModule for HoldemGame {
    type State = HoldemState;
    type Options = HoldemOptions;

    fn game_id(&self) -> &'static str {
        "holdem"
    }

    fn game_version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    fn create_initial_state(
        &self,
        players: &[PlayerId],
        options: Self::Options,
    ) -> Result<Self::State, GameError> {
        if players.is_empty() || players.len() > MAX_SEATS {
            return Err(GameError::InvalidInput(format!(
                "a table seats 1 to {MAX_SEATS} players, got {}",
                players.len()
            )));
        }
        for (i, id) in players.iter().enumerate() {
            if players[..i].contains(id) {
                return Err(GameError::InvalidInput(format!("duplicate player id {id}")));
            }
        }
        if options.initial_stack == 0 || options.small_blind == 0 || options.big_blind == 0 {
            return Err(GameError::InvalidAmount);
        }
        if options.big_blind < options.small_blind {
            return Err(GameError::InvalidInput(
                "big blind must be at least the small blind".to_string(),
            ));
        }
        if let Some(deck) = &options.test_deck {
            if deck.len() != DECK_SIZE {
                return Err(GameError::InvalidInput(format!(
                    "preset decks hold exactly {DECK_SIZE} cards, got {}",
                    deck.len()
                )));
            }
        }

        let seats = players
            .iter()
            .enumerate()
            .map(|(idx, id)| Seat::new(id.clone(), idx, options.initial_stack))
            .collect();

        Ok(HoldemState {
            phase: Phase::Lobby,
            seed: options.seed,
            hand_number: 0,
            seats,
            deck: Deck::standard(),
            board: Vec::new(),
            hole_cards: HashMap::new(),
            dealer_index: 0,
            small_blind: options.small_blind,
            big_blind: options.big_blind,
            betting: None,
            pots: Vec::new(),
            hand_contributions: HashMap::new(),
            action_log: Vec::new(),
            showdown: None,
            preset_deck: options.test_deck,
        })
    }

    fn apply_action(
        &self,
        state: &Self::State,
        player: &PlayerId,
        action: &GameAction,
    ) -> Result<Self::State, GameError> {
        if state.seat(player).is_none() {
            return Err(GameError::NotSeated(player.clone()));
        }
        let mut next = state.clone();
        match action {
            GameAction::StartHand => next.start_hand()?,
            GameAction::AdvancePhase => next.advance_phase_requested()?,
            GameAction::Fold => next.betting_action(player, BetAction::Fold)?,
            GameAction::Check => next.betting_action(player, BetAction::Check)?,
            GameAction::Call => next.betting_action(player, BetAction::Call)?,
            GameAction::Bet { amount } => {
                let amount = Self::validate_amount(*amount)?;
                next.betting_action(player, BetAction::Bet(amount))?;
            }
            GameAction::Raise { to_amount } => {
                let to_amount = Self::validate_amount(*to_amount)?;
                next.betting_action(player, BetAction::RaiseTo(to_amount))?;
            }
            GameAction::AllIn => next.betting_action(player, BetAction::AllIn)?,
        }
        Ok(next)
    }

    fn public_view(&self, state: &Self::State) -> PublicView {
        PublicView {
            phase: state.phase,
            hand_number: state.hand_number,
            board: state.board.clone(),
            seats: state.seats.clone(),
            pots: state.pots.clone(),
            active_player: state
                .betting
                .as_ref()
                .and_then(|round| round.active_player.clone()),
            action_log: state.action_log.clone(),
        }
    }

    fn player_view(&self, state: &Self::State, player: &PlayerId) -> PlayerView {
        let available_actions = state.betting.as_ref().and_then(|round| {
            if round.round_closed || round.active_player.as_ref() != Some(player) {
                None
            } else {
                Some(round.available_actions(player))
            }
        });
        PlayerView {
            public: self.public_view(state),
            hole_cards: state.hole_cards.get(player).cloned().unwrap_or_default(),
            available_actions,
        }
    }

    fn is_game_over(&self, state: &Self::State) -> bool {
        state.seats.iter().filter(|s| s.stack > 0).count() <= 1
    }

    fn result(&self, state: &Self::State) -> Option<ShowdownResult> {
        if state.phase == Phase::HandEnd {
            state.showdown.clone()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::Suit;

    fn players(names: &[&str]) -> Vec<PlayerId> {
        names.iter().map(|n| PlayerId::new(n)).collect()
    }

    fn start(names: &[&str], options: HoldemOptions) -> HoldemState {
        let module = HoldemGame;
        let state = module
            .create_initial_state(&players(names), options)
            .unwrap();
        module
            .apply_action(&state, &PlayerId::new(names[0]), &GameAction::StartHand)
            .unwrap()
    }

    fn total_chips(state: &HoldemState) -> Chips {
        let stacks: Chips = state.seats.iter().map(|s| s.stack).sum();
        let contributed: Chips = state.hand_contributions.values().sum();
        stacks + contributed
    }

    #[test]
    fn test_start_hand_deals_two_cards_each() {
        let state = start(
            &["p1", "p2", "p3"],
            HoldemOptions {
                seed: 42,
                ..HoldemOptions::default()
            },
        );
        assert_eq!(state.phase, Phase::Preflop);
        assert_eq!(state.hand_number, 1);
        for id in players(&["p1", "p2", "p3"]) {
            assert_eq!(state.hole_cards[&id].len(), 2);
        }
        assert_eq!(state.deck.remaining(), 46);
    }

    #[test]
    fn test_start_hand_requires_two_funded_seats() {
        let module = HoldemGame;
        let state = module
            .create_initial_state(&players(&["p1"]), HoldemOptions::default())
            .unwrap();
        assert_eq!(
            module.apply_action(&state, &PlayerId::new("p1"), &GameAction::StartHand),
            Err(GameError::InsufficientPlayers(2))
        );
    }

    #[test]
    fn test_start_hand_rejected_mid_hand() {
        let module = HoldemGame;
        let state = start(&["p1", "p2"], HoldemOptions::default());
        assert_eq!(
            module.apply_action(&state, &PlayerId::new("p1"), &GameAction::StartHand),
            Err(GameError::WrongPhase(Phase::Preflop))
        );
    }

    #[test]
    fn test_unseated_player_rejected() {
        let module = HoldemGame;
        let state = start(&["p1", "p2"], HoldemOptions::default());
        assert_eq!(
            module.apply_action(&state, &PlayerId::new("ghost"), &GameAction::Call),
            Err(GameError::NotSeated(PlayerId::new("ghost")))
        );
    }

    #[test]
    fn test_heads_up_dealer_posts_small_blind_and_acts_first() {
        let state = start(&["p1", "p2"], HoldemOptions::default());
        assert!(state.seats[0].is_dealer);
        let round = state.betting.as_ref().unwrap();
        assert_eq!(round.active_player, Some(PlayerId::new("p1")));
        assert_eq!(round.bettors[&PlayerId::new("p1")].round_contribution, 5);
        assert_eq!(round.bettors[&PlayerId::new("p2")].round_contribution, 10);
    }

    #[test]
    fn test_three_handed_blind_positions() {
        let state = start(&["p1", "p2", "p3"], HoldemOptions::default());
        // Dealer p1, small blind p2, big blind p3, first to act back on p1.
        let round = state.betting.as_ref().unwrap();
        assert_eq!(round.bettors[&PlayerId::new("p2")].round_contribution, 5);
        assert_eq!(round.bettors[&PlayerId::new("p3")].round_contribution, 10);
        assert_eq!(round.active_player, Some(PlayerId::new("p1")));
    }

    #[test]
    fn test_heads_up_call_check_reaches_flop() {
        let module = HoldemGame;
        let state = start(
            &["p1", "p2"],
            HoldemOptions {
                seed: 7,
                ..HoldemOptions::default()
            },
        );
        let state = module
            .apply_action(&state, &PlayerId::new("p1"), &GameAction::Call)
            .unwrap();
        let state = module
            .apply_action(&state, &PlayerId::new("p2"), &GameAction::Check)
            .unwrap();
        assert_eq!(state.phase, Phase::Flop);
        assert_eq!(state.board.len(), 3);
        // Postflop heads-up: the non-dealer acts first.
        let round = state.betting.as_ref().unwrap();
        assert_eq!(round.active_player, Some(PlayerId::new("p2")));
    }

    #[test]
    fn test_fold_ends_hand_uncontested() {
        let module = HoldemGame;
        let state = start(&["p1", "p2"], HoldemOptions::default());
        let state = module
            .apply_action(&state, &PlayerId::new("p1"), &GameAction::Fold)
            .unwrap();
        assert_eq!(state.phase, Phase::HandEnd);
        let result = state.showdown.as_ref().unwrap();
        assert_eq!(result.winners, vec![PlayerId::new("p2")]);
        assert!(result.summary.contains("uncontested"));
        // The blinds moved: p2 collected p1's small blind.
        assert_eq!(state.seats[1].stack, 1_005);
        assert_eq!(state.seats[0].stack, 995);
    }

    #[test]
    fn test_invalid_amounts_rejected() {
        let module = HoldemGame;
        let state = start(&["p1", "p2"], HoldemOptions::default());
        for action in [
            GameAction::Bet { amount: 0 },
            GameAction::Bet { amount: -5 },
            GameAction::Raise { to_amount: 0 },
            GameAction::Raise { to_amount: -1 },
        ] {
            assert_eq!(
                module.apply_action(&state, &PlayerId::new("p1"), &action),
                Err(GameError::InvalidAmount)
            );
        }
    }

    #[test]
    fn test_advance_phase_rejected_while_round_open() {
        let module = HoldemGame;
        let state = start(&["p1", "p2"], HoldemOptions::default());
        assert_eq!(
            module.apply_action(&state, &PlayerId::new("p1"), &GameAction::AdvancePhase),
            Err(GameError::WrongPhase(Phase::Preflop))
        );
    }

    #[test]
    fn test_all_in_runout_steps_with_advance_phase() {
        let module = HoldemGame;
        let state = start(&["p1", "p2"], HoldemOptions::default());
        let state = module
            .apply_action(&state, &PlayerId::new("p1"), &GameAction::AllIn)
            .unwrap();
        let state = module
            .apply_action(&state, &PlayerId::new("p2"), &GameAction::Call)
            .unwrap();
        // Both stacks are committed; the flop is out and betting is closed.
        assert_eq!(state.phase, Phase::Flop);
        assert!(state.betting.as_ref().unwrap().round_closed);
        let state = module
            .apply_action(&state, &PlayerId::new("p1"), &GameAction::AdvancePhase)
            .unwrap();
        assert_eq!(state.phase, Phase::Turn);
        let state = module
            .apply_action(&state, &PlayerId::new("p1"), &GameAction::AdvancePhase)
            .unwrap();
        assert_eq!(state.phase, Phase::River);
        let state = module
            .apply_action(&state, &PlayerId::new("p1"), &GameAction::AdvancePhase)
            .unwrap();
        assert_eq!(state.phase, Phase::HandEnd);
        assert!(state.showdown.is_some());
        let total: Chips = state.seats.iter().map(|s| s.stack).sum();
        assert_eq!(total, 2_000);
    }

    #[test]
    fn test_chip_conservation_through_a_hand() {
        let module = HoldemGame;
        let mut state = start(&["p1", "p2", "p3"], HoldemOptions::default());
        assert_eq!(total_chips(&state), 3_000);
        for (player, action) in [
            ("p1", GameAction::Call),
            ("p2", GameAction::Call),
            ("p3", GameAction::Check),
        ] {
            state = module
                .apply_action(&state, &PlayerId::new(player), &action)
                .unwrap();
            assert_eq!(total_chips(&state), 3_000);
        }
        assert_eq!(state.phase, Phase::Flop);
        let pot_total: Chips = state.pots.iter().map(|p| p.amount).sum();
        assert_eq!(pot_total, 30);
    }

    #[test]
    fn test_dealer_rotates_between_hands() {
        let module = HoldemGame;
        let state = start(&["p1", "p2", "p3"], HoldemOptions::default());
        let state = module
            .apply_action(&state, &PlayerId::new("p1"), &GameAction::Fold)
            .unwrap();
        let state = module
            .apply_action(&state, &PlayerId::new("p2"), &GameAction::Fold)
            .unwrap();
        assert_eq!(state.phase, Phase::HandEnd);
        let state = module
            .apply_action(&state, &PlayerId::new("p2"), &GameAction::StartHand)
            .unwrap();
        assert_eq!(state.hand_number, 2);
        assert!(state.seats[1].is_dealer);
    }

    #[test]
    fn test_replay_is_deterministic() {
        let module = HoldemGame;
        let options = HoldemOptions {
            seed: 99,
            ..HoldemOptions::default()
        };
        let initial = module
            .create_initial_state(&players(&["p1", "p2"]), options)
            .unwrap();
        let script = [
            (PlayerId::new("p1"), GameAction::StartHand),
            (PlayerId::new("p1"), GameAction::Call),
            (PlayerId::new("p2"), GameAction::Check),
        ];
        let run = |mut state: HoldemState| {
            for (player, action) in &script {
                state = module.apply_action(&state, player, action).unwrap();
            }
            state
        };
        assert_eq!(run(initial.clone()), run(initial));
    }

    #[test]
    fn test_public_view_hides_hole_cards() {
        let module = HoldemGame;
        let state = start(&["p1", "p2"], HoldemOptions::default());
        let public = module.public_view(&state);
        let serialized = serde_json::to_string(&public).unwrap();
        for cards in state.hole_cards.values() {
            for card in cards {
                assert!(!serialized.contains(&card.to_string()));
            }
        }
        assert!(!serialized.contains("deck"));
    }

    #[test]
    fn test_player_view_carries_own_cards_and_options() {
        let module = HoldemGame;
        let state = start(&["p1", "p2"], HoldemOptions::default());
        let p1 = PlayerId::new("p1");
        let p2 = PlayerId::new("p2");
        let view = module.player_view(&state, &p1);
        assert_eq!(view.hole_cards, state.hole_cards[&p1]);
        assert!(view.available_actions.is_some());
        // p2 is not to act yet, so no options are offered.
        let view = module.player_view(&state, &p2);
        assert_eq!(view.hole_cards, state.hole_cards[&p2]);
        assert!(view.available_actions.is_none());
    }

    #[test]
    fn test_preset_deck_used_verbatim() {
        let mut deck = Vec::new();
        for suit in Suit::ALL {
            for rank in 2..=14 {
                deck.push(Card(rank, suit));
            }
        }
        let state = start(
            &["p1", "p2"],
            HoldemOptions {
                test_deck: Some(deck.clone()),
                ..HoldemOptions::default()
            },
        );
        // Two-pass dealing: p1 gets cards 0 and 2, p2 gets 1 and 3.
        assert_eq!(
            state.hole_cards[&PlayerId::new("p1")],
            vec![deck[0], deck[2]]
        );
        assert_eq!(
            state.hole_cards[&PlayerId::new("p2")],
            vec![deck[1], deck[3]]
        );
    }

    #[test]
    fn test_game_over_when_one_stack_remains() {
        let module = HoldemGame;
        let mut state = start(&["p1", "p2"], HoldemOptions::default());
        assert!(!module.is_game_over(&state));
        state.seats[0].stack = 0;
        assert!(module.is_game_over(&state));
    }
}
