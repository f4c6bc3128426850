//! Multi-board hosting.
//!
//! ## Isolation
//!
//! Every board is an independent `Session` owned by its own worker task.
//! Boards share no mutable state: commands for one board never touch
//! another, and each board publishes on its own broadcast channel.
//!
//! ## Ordering
//!
//! Commands for a board are queued and applied one at a time. Subscribers
//! see a board's events in the order they were published.

mod worker;

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::info;

use crate::core::{Command, GameRng, PlayerId, RandomSource, RulesConfig, SessionSnapshot};
use crate::events::SessionEvent;
use crate::rules::{Applied, Rejection, Session};

use worker::Request;

/// Pending commands per board before senders wait.
pub const COMMAND_QUEUE_DEPTH: usize = 64;

/// Events buffered per board for slow subscribers.
pub const EVENT_BUFFER: usize = 1024;

/// Name of a board within a hub.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardId(pub String);

impl BoardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BoardId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Failures of the hosting layer itself, as opposed to rule rejections.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HubError {
    #[error("board {0} is already open")]
    BoardExists(BoardId),

    #[error("no board named {0}")]
    UnknownBoard(BoardId),

    #[error("board {0} has shut down")]
    BoardClosed(BoardId),
}

/// Cloneable handle to a running board.
#[derive(Clone, Debug)]
pub struct BoardHandle {
    board: BoardId,
    commands: mpsc::Sender<Request>,
    events: broadcast::Sender<SessionEvent>,
}

impl BoardHandle {
    #[must_use]
    pub fn id(&self) -> &BoardId {
        &self.board
    }

    /// Submit a command and wait for the board's verdict.
    ///
    /// The outer `Result` reports hosting failures; the inner one is the
    /// rule engine's answer.
    pub async fn send(
        &self,
        player: PlayerId,
        command: Command,
    ) -> Result<Result<Applied, Rejection>, HubError> {
        let (reply, answer) = oneshot::channel();
        self.request(Request::Command {
            player,
            command,
            reply,
        })
        .await?;
        answer.await.map_err(|_| self.closed())
    }

    /// Current position of the board.
    pub async fn snapshot(&self) -> Result<SessionSnapshot, HubError> {
        let (reply, answer) = oneshot::channel();
        self.request(Request::Snapshot { reply }).await?;
        answer.await.map_err(|_| self.closed())
    }

    /// Pawns the current player may move, empty outside a MOVE phase.
    pub async fn legal_moves(&self) -> Result<Vec<u8>, HubError> {
        let (reply, answer) = oneshot::channel();
        self.request(Request::LegalMoves { reply }).await?;
        answer.await.map_err(|_| self.closed())
    }

    /// Receive every event this board publishes from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    async fn request(&self, request: Request) -> Result<(), HubError> {
        self.commands
            .send(request)
            .await
            .map_err(|_| self.closed())
    }

    fn closed(&self) -> HubError {
        HubError::BoardClosed(self.board.clone())
    }
}

/// Registry of independently running boards.
///
/// Boards are spawned onto the ambient Tokio runtime, so `open` and
/// `open_with` must be called from inside one.
pub struct SessionHub {
    config: RulesConfig,
    boards: FxHashMap<BoardId, BoardHandle>,
}

impl SessionHub {
    /// Create a hub whose boards all use `config`.
    #[must_use]
    pub fn new(config: RulesConfig) -> Self {
        Self {
            config,
            boards: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Open a board with dice derived from the hub seed and the board name.
    pub fn open(&mut self, board: BoardId) -> Result<BoardHandle, HubError> {
        let rng = GameRng::new(self.config.seed).for_context(board.as_str());
        self.open_with(board, rng)
    }

    /// Open a board with an explicit random source.
    pub fn open_with<R>(&mut self, board: BoardId, rng: R) -> Result<BoardHandle, HubError>
    where
        R: RandomSource + Send + 'static,
    {
        if self.boards.contains_key(&board) {
            return Err(HubError::BoardExists(board));
        }

        let (commands, requests) = mpsc::channel(COMMAND_QUEUE_DEPTH);
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        let session = Session::with_rng(self.config.clone(), rng);

        tokio::spawn(worker::run(
            board.clone(),
            session,
            requests,
            events.clone(),
        ));

        let handle = BoardHandle {
            board: board.clone(),
            commands,
            events,
        };
        info!(%board, boards = self.boards.len() + 1, "board opened");
        self.boards.insert(board, handle.clone());
        Ok(handle)
    }

    #[must_use]
    pub fn board(&self, board: &BoardId) -> Option<&BoardHandle> {
        self.boards.get(board)
    }

    /// Names of all open boards.
    pub fn boards(&self) -> impl Iterator<Item = &BoardId> {
        self.boards.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.boards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    /// Stop a board's worker and forget it. Outstanding handles start
    /// failing with `BoardClosed` once the worker exits.
    pub async fn close(&mut self, board: &BoardId) -> Result<(), HubError> {
        let handle = self
            .boards
            .remove(board)
            .ok_or_else(|| HubError::UnknownBoard(board.clone()))?;
        // A worker that already stopped is as closed as it gets
        let _ = handle.commands.send(Request::Shutdown).await;
        info!(%board, "board closed");
        Ok(())
    }
}
