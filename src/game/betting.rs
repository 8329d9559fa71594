//! Generic wagering engine.
//!
//! Seats, forced bets, turn rotation, legal actions, round closure, and
//! layered pot construction. The engine knows chips and players, never
//! cards; any wagering game can drive it.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::entities::{ActionOptions, Chips, PlayerId, Pot};
use super::errors::GameError;

/// A contribution a seat must make at round start (small/big blind, ante).
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ForcedBet {
    pub player: PlayerId,
    pub amount: Chips,
    pub label: String,
}

impl ForcedBet {
    #[must_use]
    pub fn new(player: PlayerId, amount: Chips, label: &str) -> Self {
        Self {
            player,
            amount,
            label: label.to_string(),
        }
    }
}

/// A wager instruction from the seat currently to act.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum BetAction {
    Fold,
    Check,
    Call,
    /// Open for exactly this many chips; only legal while nobody has bet.
    Bet(Chips),
    /// Raise so the seat's round contribution totals this many chips.
    RaiseTo(Chips),
    /// Sugar: resolves to an opening bet, a call, or a raise for the seat's
    /// whole stack.
    AllIn,
}

/// Per-seat wagering bookkeeping within one round.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Bettor {
    pub folded: bool,
    pub all_in: bool,
    pub stack: Chips,
    pub round_contribution: Chips,
    pub total_contribution: Chips,
    /// Cleared only by a full bet or full raise. A seat whose flag is still
    /// set when action returns to it may fold or call but not raise.
    pub has_acted: bool,
}

impl Bettor {
    fn new(stack: Chips) -> Self {
        Self {
            folded: false,
            all_in: stack == 0,
            stack,
            round_contribution: 0,
            total_contribution: 0,
            has_acted: false,
        }
    }
}

/// One betting round. Created at the start of every street and replaced
/// wholesale on each action; discarded when the street is done.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BettingRound {
    pub label: String,
    /// Turn rotation; all per-seat iteration goes through this sequence so
    /// behavior never depends on map ordering.
    pub seat_order: Vec<PlayerId>,
    pub active_player: Option<PlayerId>,
    pub bettors: HashMap<PlayerId, Bettor>,
    /// Highest round contribution across seats.
    pub current_bet: Chips,
    /// Size of the last full raise; an under-minimum all-in never moves it.
    pub min_raise_increment: Chips,
    pub min_open_bet: Chips,
    pub round_closed: bool,
    pub action_log: Vec<String>,
}

impl BettingRound {
    /// Open a round. Forced bets are applied in the order given, each capped
    /// at the posting seat's stack; a seat emptied by posting is all-in.
    #[must_use]
    pub fn new(
        label: &str,
        seats: &[(PlayerId, Chips)],
        forced_bets: &[ForcedBet],
        first_to_act: Option<&PlayerId>,
        min_open_bet: Chips,
    ) -> Self {
        let seat_order: Vec<PlayerId> = seats.iter().map(|(id, _)| id.clone()).collect();
        let bettors: HashMap<PlayerId, Bettor> = seats
            .iter()
            .map(|(id, stack)| (id.clone(), Bettor::new(*stack)))
            .collect();

        let mut round = Self {
            label: label.to_string(),
            seat_order,
            active_player: None,
            bettors,
            current_bet: 0,
            min_raise_increment: min_open_bet,
            min_open_bet,
            round_closed: false,
            action_log: Vec::new(),
        };

        for forced in forced_bets {
            let Some(bettor) = round.bettors.get_mut(&forced.player) else {
                continue;
            };
            let posted = forced.amount.min(bettor.stack);
            bettor.stack -= posted;
            bettor.round_contribution += posted;
            bettor.total_contribution += posted;
            if bettor.stack == 0 && posted > 0 {
                bettor.all_in = true;
            }
            round
                .action_log
                .push(format!("{} posts {} {}", forced.player, forced.label, posted));
        }

        round.current_bet = round
            .seat_order
            .iter()
            .map(|id| round.bettors[id].round_contribution)
            .max()
            .unwrap_or(0);
        round.min_raise_increment = min_open_bet.max(round.current_bet);

        // Rotation starts from the requested first actor when that seat can
        // still act, otherwise from the top of the seat order.
        let start = first_to_act
            .and_then(|id| round.seat_order.iter().position(|p| p == id))
            .unwrap_or(0);
        let n = round.seat_order.len();
        round.active_player = (0..n)
            .map(|offset| round.seat_order[(start + offset) % n].clone())
            .find(|id| round.needs_action(id));
        if round.active_player.is_none() {
            round.close();
        }
        round
    }

    /// Apply one action from `player`. Fails without mutating observable
    /// wagering state when the action is out of turn or illegal.
    pub fn apply(&mut self, player: &PlayerId, action: BetAction) -> Result<(), GameError> {
        if self.round_closed {
            return Err(GameError::RoundClosed);
        }
        if self.active_player.as_ref() != Some(player) {
            return Err(GameError::NotYourTurn);
        }

        let action = self.desugar_all_in(player, action);
        match action {
            BetAction::Fold => self.fold(player),
            BetAction::Check => self.check(player)?,
            BetAction::Call => self.call(player)?,
            BetAction::Bet(amount) => self.bet(player, amount)?,
            BetAction::RaiseTo(to_amount) => self.raise_to(player, to_amount)?,
            BetAction::AllIn => unreachable!("all-in desugars to bet, call, or raise"),
        }

        self.advance_from(player);
        Ok(())
    }

    /// Chips the given seat must still put in to match the current bet,
    /// capped at its stack.
    #[must_use]
    pub fn call_amount(&self, player: &PlayerId) -> Chips {
        let Some(bettor) = self.bettors.get(player) else {
            return 0;
        };
        self.current_bet
            .saturating_sub(bettor.round_contribution)
            .min(bettor.stack)
    }

    /// Legal actions with numeric bounds. Everything is false unless the
    /// round is open and it is this seat's turn.
    #[must_use]
    pub fn available_actions(&self, player: &PlayerId) -> ActionOptions {
        if self.round_closed || self.active_player.as_ref() != Some(player) {
            return ActionOptions::default();
        }
        let bettor = &self.bettors[player];
        let need = self.current_bet.saturating_sub(bettor.round_contribution);
        let all_in_total = bettor.round_contribution + bettor.stack;

        ActionOptions {
            can_fold: true,
            can_check: need == 0,
            can_call: need > 0 && bettor.stack > 0,
            can_bet: self.current_bet == 0 && bettor.stack > 0,
            can_raise: self.current_bet > 0 && !bettor.has_acted && all_in_total > self.current_bet,
            can_all_in: bettor.stack > 0,
            call_amount: need.min(bettor.stack),
            min_bet: self.min_open_bet.max(self.min_raise_increment).min(bettor.stack),
            min_raise_to: (self.current_bet + self.min_raise_increment).min(all_in_total),
        }
    }

    /// Layered pots from this round's contributions.
    #[must_use]
    pub fn pots(&self) -> Vec<Pot> {
        let contributions: HashMap<PlayerId, Chips> = self
            .seat_order
            .iter()
            .map(|id| (id.clone(), self.bettors[id].total_contribution))
            .collect();
        build_pots(&self.seat_order, &contributions, |id| {
            self.bettors[id].folded
        })
    }

    #[must_use]
    pub fn non_folded_count(&self) -> usize {
        self.seat_order
            .iter()
            .filter(|id| !self.bettors[*id].folded)
            .count()
    }

    /// True iff this seat can still be asked to do something: not folded,
    /// not all-in, chips behind, and either short of the current bet or yet
    /// to use its turn. The unused-turn case only matters while a live
    /// opponent could respond; with everyone else all-in there is nothing
    /// left to bet at.
    fn needs_action(&self, player: &PlayerId) -> bool {
        let bettor = &self.bettors[player];
        if bettor.folded || bettor.all_in || bettor.stack == 0 {
            return false;
        }
        if bettor.round_contribution < self.current_bet {
            return true;
        }
        if bettor.has_acted {
            return false;
        }
        self.seat_order
            .iter()
            .filter(|id| *id != player)
            .any(|id| {
                let other = &self.bettors[id];
                !other.folded && !other.all_in && other.stack > 0
            })
    }

    fn desugar_all_in(&self, player: &PlayerId, action: BetAction) -> BetAction {
        if action != BetAction::AllIn {
            return action;
        }
        let bettor = &self.bettors[player];
        if self.current_bet == 0 {
            BetAction::Bet(bettor.stack)
        } else if bettor.round_contribution + bettor.stack <= self.current_bet {
            BetAction::Call
        } else {
            BetAction::RaiseTo(bettor.round_contribution + bettor.stack)
        }
    }

    fn fold(&mut self, player: &PlayerId) {
        let bettor = self.bettors.get_mut(player).expect("active seat exists");
        bettor.folded = true;
        bettor.has_acted = true;
        self.action_log.push(format!("{player} folds"));
    }

    fn check(&mut self, player: &PlayerId) -> Result<(), GameError> {
        let need = self
            .current_bet
            .saturating_sub(self.bettors[player].round_contribution);
        if need > 0 {
            return Err(GameError::IllegalAction(format!(
                "Cannot check facing a bet of {need}"
            )));
        }
        self.bettors
            .get_mut(player)
            .expect("active seat exists")
            .has_acted = true;
        self.action_log.push(format!("{player} checks"));
        Ok(())
    }

    fn call(&mut self, player: &PlayerId) -> Result<(), GameError> {
        let need = self
            .current_bet
            .saturating_sub(self.bettors[player].round_contribution);
        if need == 0 {
            return Err(GameError::IllegalAction(
                "Nothing to call; check instead".to_string(),
            ));
        }
        let bettor = self.bettors.get_mut(player).expect("active seat exists");
        let paid = need.min(bettor.stack);
        bettor.stack -= paid;
        bettor.round_contribution += paid;
        bettor.total_contribution += paid;
        bettor.has_acted = true;
        if bettor.stack == 0 {
            bettor.all_in = true;
            self.action_log
                .push(format!("{player} calls {paid} and is all-in"));
        } else {
            self.action_log.push(format!("{player} calls {paid}"));
        }
        Ok(())
    }

    fn bet(&mut self, player: &PlayerId, amount: Chips) -> Result<(), GameError> {
        if self.current_bet > 0 {
            return Err(GameError::IllegalAction(
                "Cannot bet over an existing bet; raise instead".to_string(),
            ));
        }
        let stack = self.bettors[player].stack;
        if amount == 0 || amount > stack {
            return Err(GameError::IllegalAction(format!(
                "Bet of {amount} is outside the 1..={stack} range"
            )));
        }
        let min_open = self.min_open_bet.max(self.min_raise_increment);
        let is_all_in = amount == stack;
        if amount < min_open && !is_all_in {
            return Err(GameError::IllegalAction(format!(
                "Bet must be at least {min_open} or the whole stack"
            )));
        }

        let bettor = self.bettors.get_mut(player).expect("active seat exists");
        bettor.stack -= amount;
        bettor.round_contribution += amount;
        bettor.total_contribution += amount;
        bettor.has_acted = true;
        if bettor.stack == 0 {
            bettor.all_in = true;
        }
        self.current_bet = self.bettors[player].round_contribution;

        if amount >= self.min_raise_increment {
            self.min_raise_increment = amount;
            self.reopen_action(player);
        }
        if self.bettors[player].all_in {
            self.action_log
                .push(format!("{player} bets {amount} and is all-in"));
        } else {
            self.action_log.push(format!("{player} bets {amount}"));
        }
        Ok(())
    }

    fn raise_to(&mut self, player: &PlayerId, to_amount: Chips) -> Result<(), GameError> {
        if self.current_bet == 0 {
            return Err(GameError::IllegalAction(
                "Cannot raise before a bet; bet instead".to_string(),
            ));
        }
        if to_amount <= self.current_bet {
            return Err(GameError::IllegalAction(format!(
                "Raise must exceed the current bet of {}",
                self.current_bet
            )));
        }
        let bettor_snapshot = self.bettors[player].clone();
        if bettor_snapshot.has_acted {
            return Err(GameError::IllegalAction(
                "Cannot re-raise; the action was not reopened".to_string(),
            ));
        }
        let additional = to_amount - bettor_snapshot.round_contribution;
        if additional > bettor_snapshot.stack {
            return Err(GameError::IllegalAction(format!(
                "Raise to {to_amount} needs {additional} chips but only {} remain",
                bettor_snapshot.stack
            )));
        }
        let increment = to_amount - self.current_bet;
        let is_all_in = additional == bettor_snapshot.stack;
        let full_raise = increment >= self.min_raise_increment;
        if !full_raise && !is_all_in {
            return Err(GameError::IllegalAction(format!(
                "Raise increment {increment} is below the minimum of {}",
                self.min_raise_increment
            )));
        }

        let bettor = self.bettors.get_mut(player).expect("active seat exists");
        bettor.stack -= additional;
        bettor.round_contribution = to_amount;
        bettor.total_contribution += additional;
        bettor.has_acted = true;
        if bettor.stack == 0 {
            bettor.all_in = true;
        }
        self.current_bet = to_amount;

        if full_raise {
            self.min_raise_increment = increment;
            self.reopen_action(player);
        }
        if self.bettors[player].all_in {
            self.action_log
                .push(format!("{player} raises to {to_amount} and is all-in"));
        } else {
            self.action_log
                .push(format!("{player} raises to {to_amount}"));
        }
        Ok(())
    }

    /// After a full bet or raise by `actor`, every other seat that can still
    /// act gets its turn back; seats that cannot act are marked acted so
    /// they never gate closure.
    fn reopen_action(&mut self, actor: &PlayerId) {
        for id in self.seat_order.clone() {
            if id == *actor {
                continue;
            }
            let bettor = self.bettors.get_mut(&id).expect("seat exists");
            let can_act = !bettor.folded && !bettor.all_in && bettor.stack > 0;
            bettor.has_acted = !can_act;
        }
    }

    /// Move the turn to the next seat after `last` that still needs action,
    /// or close the round.
    fn advance_from(&mut self, last: &PlayerId) {
        if self.non_folded_count() <= 1 {
            self.close();
            return;
        }
        let n = self.seat_order.len();
        let start = self
            .seat_order
            .iter()
            .position(|id| id == last)
            .unwrap_or(0);
        for offset in 1..=n {
            let id = self.seat_order[(start + offset) % n].clone();
            if self.needs_action(&id) {
                self.active_player = Some(id);
                return;
            }
        }
        self.close();
    }

    fn close(&mut self) {
        self.round_closed = true;
        self.active_player = None;
        debug!("betting round {} closed", self.label);
    }
}

/// Build layered pots from cumulative contributions: peel the smallest
/// remaining contribution level off every contributing seat until nothing
/// remains. Folded seats stay in each layer's amount but are never eligible.
pub fn build_pots<F>(
    seat_order: &[PlayerId],
    contributions: &HashMap<PlayerId, Chips>,
    is_folded: F,
) -> Vec<Pot>
where
    F: Fn(&PlayerId) -> bool,
{
    let mut remaining: Vec<(PlayerId, Chips)> = seat_order
        .iter()
        .filter_map(|id| {
            let amount = contributions.get(id).copied().unwrap_or(0);
            (amount > 0).then(|| (id.clone(), amount))
        })
        .collect();

    let mut pots = Vec::new();
    loop {
        let Some(level) = remaining
            .iter()
            .map(|(_, amount)| *amount)
            .filter(|amount| *amount > 0)
            .min()
        else {
            break;
        };
        let contributors: Vec<PlayerId> = remaining
            .iter()
            .filter(|(_, amount)| *amount > 0)
            .map(|(id, _)| id.clone())
            .collect();
        let amount = level * contributors.len() as Chips;
        let eligible: Vec<PlayerId> = contributors
            .iter()
            .filter(|id| !is_folded(id))
            .cloned()
            .collect();
        for (id, left) in &mut remaining {
            if contributors.contains(id) {
                *left -= level;
            }
        }
        pots.push(Pot { amount, eligible });
        remaining.retain(|(_, amount)| *amount > 0);
    }
    pots
}
