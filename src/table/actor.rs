//! Table actor: owns one table's state, serializes its mutations, and
//! publishes fresh views after every change.
//!
//! Each table is a logical actor behind an mpsc inbox, so actions for one
//! table apply strictly in arrival order while independent tables run in
//! parallel. Core transitions are pure and synchronous; only the channel
//! handoffs suspend.

use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::game::constants::MIN_SEATS;
use crate::game::module::{GameModule, Snapshot};
use crate::game::{GameAction, GameError, PlayerId, PlayerView};

use super::messages::{TableError, TableMessage, TableViews};
use super::transport::ViewPublisher;
use super::TableId;

const INBOX_CAPACITY: usize = 64;

/// Cloneable handle for sending requests to a running table actor.
pub struct TableHandle<M: GameModule> {
    sender: mpsc::Sender<TableMessage<M::State>>,
    table_id: TableId,
}

impl<M: GameModule> Clone for TableHandle<M> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            table_id: self.table_id,
        }
    }
}

impl<M: GameModule> TableHandle<M> {
    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    /// Queue an action and wait for the verdict. Submission order is the
    /// order the table applies actions in.
    pub async fn act(&self, player_id: PlayerId, action: GameAction) -> Result<(), TableError> {
        let (respond, rx) = oneshot::channel();
        self.sender
            .send(TableMessage::Act {
                player_id,
                action,
                respond,
            })
            .await
            .map_err(|_| TableError::Closed)?;
        rx.await.map_err(|_| TableError::Closed)?
    }

    /// Like [`act`](Self::act) but refuses to wait for inbox room: a full
    /// table reports `Busy` without mutating anything.
    pub async fn try_act(&self, player_id: PlayerId, action: GameAction) -> Result<(), TableError> {
        let (respond, rx) = oneshot::channel();
        let message = TableMessage::Act {
            player_id,
            action,
            respond,
        };
        match self.sender.try_send(message) {
            Ok(()) => rx.await.map_err(|_| TableError::Closed)?,
            Err(mpsc::error::TrySendError::Full(_)) => Err(TableError::Busy),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(TableError::Closed),
        }
    }

    /// The views from the last publication. Pure read.
    pub async fn views(&self) -> Result<TableViews, TableError> {
        let (respond, rx) = oneshot::channel();
        self.sender
            .send(TableMessage::GetViews { respond })
            .await
            .map_err(|_| TableError::Closed)?;
        rx.await.map_err(|_| TableError::Closed)
    }

    /// One seat's view from the last publication. Pure read.
    pub async fn player_view(&self, player_id: PlayerId) -> Result<PlayerView, TableError> {
        let (respond, rx) = oneshot::channel();
        self.sender
            .send(TableMessage::GetPlayerView { player_id, respond })
            .await
            .map_err(|_| TableError::Closed)?;
        rx.await.map_err(|_| TableError::Closed)?
    }

    /// Attach point for a subscriber: returns the current views so a fresh
    /// client renders the table before the next broadcast arrives.
    pub async fn subscribe(&self) -> Result<TableViews, TableError> {
        let (respond, rx) = oneshot::channel();
        self.sender
            .send(TableMessage::Subscribe { respond })
            .await
            .map_err(|_| TableError::Closed)?;
        rx.await.map_err(|_| TableError::Closed)
    }

    /// Persistence envelope of the current state.
    pub async fn snapshot(&self) -> Result<Snapshot<M::State>, TableError> {
        let (respond, rx) = oneshot::channel();
        self.sender
            .send(TableMessage::GetSnapshot { respond })
            .await
            .map_err(|_| TableError::Closed)?;
        rx.await.map_err(|_| TableError::Closed)
    }

    pub async fn close(&self) {
        let (respond, rx) = oneshot::channel();
        if self
            .sender
            .send(TableMessage::Close { respond })
            .await
            .is_ok()
        {
            let _ = rx.await;
        }
    }
}

/// The actor owning one table.
pub struct TableActor<M: GameModule> {
    id: TableId,
    module: M,
    state: M::State,
    inbox: mpsc::Receiver<TableMessage<M::State>>,
    publisher: Arc<dyn ViewPublisher>,
    /// Projections from the most recent mutation; queries answer from here
    /// so reads match what subscribers last received.
    last_views: TableViews,
    closed: bool,
}

impl<M: GameModule> TableActor<M> {
    /// Build a table around a fresh game state.
    pub fn new(
        module: M,
        players: &[PlayerId],
        options: M::Options,
        publisher: Arc<dyn ViewPublisher>,
    ) -> Result<(Self, TableHandle<M>), GameError> {
        let state = module.create_initial_state(players, options)?;
        let (sender, inbox) = mpsc::channel(INBOX_CAPACITY);
        let id = Uuid::new_v4();
        let last_views = Self::project(&module, &state);
        let actor = Self {
            id,
            module,
            state,
            inbox,
            publisher,
            last_views,
            closed: false,
        };
        let handle = TableHandle {
            sender,
            table_id: id,
        };
        Ok((actor, handle))
    }

    /// Run the table event loop until closed or all handles drop.
    pub async fn run(mut self) {
        info!("table {} starting", self.id);
        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message);
            if self.closed {
                break;
            }
        }
        info!("table {} closed", self.id);
    }

    fn handle_message(&mut self, message: TableMessage<M::State>) {
        match message {
            TableMessage::Act {
                player_id,
                action,
                respond,
            } => {
                let result = self.handle_act(&player_id, &action);
                if let Err(err) = &result {
                    debug!("table {}: {player_id} {action} rejected: {err}", self.id);
                }
                let _ = respond.send(result);
            }
            TableMessage::GetViews { respond } => {
                let _ = respond.send(self.last_views.clone());
            }
            TableMessage::GetPlayerView { player_id, respond } => {
                let result = self
                    .last_views
                    .players
                    .get(&player_id)
                    .cloned()
                    .ok_or_else(|| TableError::Game(GameError::NotSeated(player_id)));
                let _ = respond.send(result);
            }
            TableMessage::Subscribe { respond } => {
                let _ = respond.send(self.last_views.clone());
            }
            TableMessage::GetSnapshot { respond } => {
                let _ = respond.send(self.module.snapshot(&self.state));
            }
            TableMessage::Close { respond } => {
                self.closed = true;
                let _ = respond.send(());
            }
        }
    }

    /// Validate, apply, swap, publish. Failures leave the state and the
    /// published views untouched.
    fn handle_act(&mut self, player_id: &PlayerId, action: &GameAction) -> Result<(), TableError> {
        let seats = &self.last_views.public.seats;
        if !seats.iter().any(|s| s.id == *player_id) {
            return Err(GameError::NotSeated(player_id.clone()).into());
        }
        if *action == GameAction::StartHand && seats.len() < MIN_SEATS {
            return Err(GameError::InsufficientPlayers(MIN_SEATS).into());
        }

        let next = self.module.apply_action(&self.state, player_id, action)?;
        self.state = next;
        self.publish();
        Ok(())
    }

    /// Project views from the committed state and hand them to the
    /// transport: the public view first, then one view per seat in seat
    /// order.
    fn publish(&mut self) {
        let views = Self::project(&self.module, &self.state);
        self.publisher.publish_public(self.id, &views.public);
        for seat in &views.public.seats {
            if let Some(view) = views.players.get(&seat.id) {
                self.publisher.publish_player(self.id, &seat.id, view);
            }
        }
        self.last_views = views;
    }

    fn project(module: &M, state: &M::State) -> TableViews {
        let public = module.public_view(state);
        let players: HashMap<PlayerId, PlayerView> = public
            .seats
            .iter()
            .map(|seat| (seat.id.clone(), module.player_view(state, &seat.id)))
            .collect();
        TableViews { public, players }
    }
}
