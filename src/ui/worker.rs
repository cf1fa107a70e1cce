use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::JoinHandle;

use tracing::{debug, warn};

use crate::ai::{Agent, SearchStats};
use crate::error::SearchError;
use crate::game::{GameState, Position};

/// Commands sent from the UI to the search thread.
enum WorkerCommand {
    Search { generation: u64, state: GameState },
    ReplaceAgent(Box<dyn Agent>),
    Shutdown,
}

/// A finished search, tagged with the game generation it was asked for.
#[derive(Debug)]
pub struct SearchReply {
    pub generation: u64,
    pub result: Result<Position, SearchError>,
    pub stats: Option<SearchStats>,
}

/// Runs an [`Agent`] on a background thread so the UI keeps handling input.
///
/// Each game gets a generation number; [`SearchWorker::reset`] starts a new
/// generation and replies for older ones are dropped. An in-flight search
/// is never interrupted, only ignored.
pub struct SearchWorker {
    cmd_tx: Sender<WorkerCommand>,
    reply_rx: Receiver<SearchReply>,
    handle: Option<JoinHandle<()>>,
    generation: u64,
    pending: bool,
}

impl SearchWorker {
    pub fn spawn(agent: Box<dyn Agent>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();
        let (reply_tx, reply_rx) = mpsc::channel::<SearchReply>();

        let handle = std::thread::spawn(move || {
            let mut agent = agent;
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    WorkerCommand::Search { generation, state } => {
                        let result = agent.select_move(&state);
                        let reply = SearchReply {
                            generation,
                            result,
                            stats: agent.last_stats(),
                        };
                        if reply_tx.send(reply).is_err() {
                            break;
                        }
                    }
                    WorkerCommand::ReplaceAgent(next) => {
                        debug!(agent = next.name(), "search worker agent replaced");
                        agent = next;
                    }
                    WorkerCommand::Shutdown => break,
                }
            }
        });

        SearchWorker {
            cmd_tx,
            reply_rx,
            handle: Some(handle),
            generation: 0,
            pending: false,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A search for the current generation is in flight.
    pub fn is_thinking(&self) -> bool {
        self.pending
    }

    /// Ask for a move in `state` under the current generation.
    pub fn request(&mut self, state: &GameState) {
        let cmd = WorkerCommand::Search {
            generation: self.generation,
            state: state.clone(),
        };
        if self.cmd_tx.send(cmd).is_err() {
            warn!("search worker has stopped");
            return;
        }
        self.pending = true;
    }

    /// Abandon any in-flight search and start a new generation.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.pending = false;
    }

    /// Swap the agent used for subsequent searches.
    pub fn replace_agent(&mut self, agent: Box<dyn Agent>) {
        if self.cmd_tx.send(WorkerCommand::ReplaceAgent(agent)).is_err() {
            warn!("search worker has stopped");
        }
    }

    /// Non-blocking check for a reply to the current generation.
    pub fn poll(&mut self) -> Option<SearchReply> {
        loop {
            match self.reply_rx.try_recv() {
                Ok(reply) if reply.generation == self.generation => {
                    self.pending = false;
                    return Some(reply);
                }
                Ok(stale) => {
                    debug!(
                        generation = stale.generation,
                        current = self.generation,
                        "discarding stale search reply"
                    );
                }
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => {
                    self.pending = false;
                    return None;
                }
            }
        }
    }
}

impl Drop for SearchWorker {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(WorkerCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    /// Plays the given columns in order, one per request.
    struct ScriptedAgent {
        columns: Vec<usize>,
    }

    impl Agent for ScriptedAgent {
        fn select_move(&mut self, state: &GameState) -> Result<Position, SearchError> {
            let col = self.columns.remove(0);
            state
                .board()
                .resolve_drop(col)
                .map_err(|_| SearchError::NoLegalMoves)
        }

        fn name(&self) -> &str {
            "Scripted"
        }
    }

    fn wait_for_reply(worker: &mut SearchWorker) -> SearchReply {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(reply) = worker.poll() {
                return reply;
            }
            assert!(Instant::now() < deadline, "timed out waiting for search reply");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn replies_to_current_generation() {
        let mut worker = SearchWorker::spawn(Box::new(ScriptedAgent { columns: vec![4] }));
        worker.request(&GameState::initial());
        assert!(worker.is_thinking());

        let reply = wait_for_reply(&mut worker);
        assert_eq!(reply.generation, 0);
        assert_eq!(reply.result.unwrap(), Position::new(5, 4));
        assert!(!worker.is_thinking());
    }

    #[test]
    fn reset_discards_in_flight_reply() {
        let mut worker = SearchWorker::spawn(Box::new(ScriptedAgent {
            columns: vec![0, 5],
        }));
        worker.request(&GameState::initial());
        worker.reset();
        assert!(!worker.is_thinking());
        worker.request(&GameState::initial());

        let reply = wait_for_reply(&mut worker);
        assert_eq!(reply.generation, 1);
        assert_eq!(reply.result.unwrap().col, 5);
    }

    #[test]
    fn replaced_agent_serves_next_request() {
        let mut worker = SearchWorker::spawn(Box::new(ScriptedAgent { columns: vec![1] }));
        worker.replace_agent(Box::new(ScriptedAgent { columns: vec![6] }));
        worker.request(&GameState::initial());
        assert_eq!(wait_for_reply(&mut worker).result.unwrap().col, 6);
    }
}
