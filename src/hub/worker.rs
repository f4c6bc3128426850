//! Board worker task.
//!
//! Each board runs as one task that owns its `Session`. Requests arrive on
//! an mpsc queue and are handled strictly in arrival order, so every
//! command (including its event publishes) completes before the next one
//! starts.

use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info};

use crate::core::{Command, PlayerId, RandomSource, SessionSnapshot};
use crate::events::SessionEvent;
use crate::rules::{Applied, Rejection, Session};

use super::BoardId;

/// Work item sent to a board worker.
pub(crate) enum Request {
    Command {
        player: PlayerId,
        command: Command,
        reply: oneshot::Sender<Result<Applied, Rejection>>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    LegalMoves {
        reply: oneshot::Sender<Vec<u8>>,
    },
    Shutdown,
}

pub(crate) async fn run<R: RandomSource>(
    board: BoardId,
    mut session: Session<R>,
    mut requests: mpsc::Receiver<Request>,
    mut events: broadcast::Sender<SessionEvent>,
) {
    info!(%board, "board worker started");

    while let Some(request) = requests.recv().await {
        match request {
            Request::Command {
                player,
                command,
                reply,
            } => {
                let result = session.apply(&player, command, &mut events);
                // Caller may have stopped waiting; the command still counts
                let _ = reply.send(result);
            }
            Request::Snapshot { reply } => {
                let _ = reply.send(session.snapshot());
            }
            Request::LegalMoves { reply } => {
                let _ = reply.send(session.legal_moves());
            }
            Request::Shutdown => {
                debug!(%board, "shutdown requested");
                break;
            }
        }
    }

    info!(%board, "board worker stopped");
}
