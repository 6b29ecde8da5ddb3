//! Search orchestrator: one long-lived background worker.
//!
//! The worker is spawned once by [`Engine::new`] and sleeps on a condition
//! variable until a task is scheduled. [`Engine::submit`] hands over a
//! search and returns at once with a [`PendingSearch`], which receives the
//! result over a one-shot channel. Only one search may be outstanding.
//!
//! Dropping the engine waits until the worker has picked up a queued search,
//! then schedules an exit task and joins the worker. The search still runs
//! to completion and its [`PendingSearch`] gets the result. Call
//! [`Engine::cancel`] first to cut it short.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, warn};

use crate::error::{EngineError, ParameterError};
use crate::parameters::{Parameter, SearchParameters};
use crate::position::Position;
use crate::search::{SearchResult, Searcher};

/// What the caller hands to the engine.
#[derive(Clone, Debug, Default)]
pub struct SearchRequest {
    /// Position to search, with the side to move and ply counters
    pub position: Position,
    /// Positions since the last capture, oldest first, excluding `position`
    pub history: Vec<Position>,
    /// Wall time limit; the search deepens iteratively until it runs out
    pub movetime: Option<Duration>,
}

impl SearchRequest {
    pub fn new(position: Position) -> Self {
        Self::with_history(position, Vec::new())
    }

    pub fn with_history(position: Position, history: Vec<Position>) -> Self {
        Self {
            position,
            history,
            movetime: None,
        }
    }

    pub fn with_movetime(mut self, movetime: Option<Duration>) -> Self {
        self.movetime = movetime;
        self
    }
}

enum Task {
    Search {
        request: SearchRequest,
        params: SearchParameters,
        reply: Sender<SearchResult>,
    },
    Exit,
}

struct WorkerState {
    task: Option<Task>,
    busy: bool,
}

struct Inner {
    state: Mutex<WorkerState>,
    condvar: Condvar,
    stop: AtomicBool,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, WorkerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle to the background search worker.
pub struct Engine {
    inner: Arc<Inner>,
    handle: Option<JoinHandle<()>>,
    params: SearchParameters,
}

impl Engine {
    /// Spawn the worker with default parameters.
    pub fn new() -> Result<Self, EngineError> {
        Self::with_parameters(SearchParameters::default())
    }

    pub fn with_parameters(params: SearchParameters) -> Result<Self, EngineError> {
        let inner = Arc::new(Inner {
            state: Mutex::new(WorkerState {
                task: None,
                busy: false,
            }),
            condvar: Condvar::new(),
            stop: AtomicBool::new(false),
        });

        let worker_inner = Arc::clone(&inner);
        let handle = thread::Builder::new()
            .name("search-worker".to_string())
            .spawn(move || idle_loop(worker_inner))?;
        debug!("search worker started");

        Ok(Self {
            inner,
            handle: Some(handle),
            params,
        })
    }

    pub fn parameters(&self) -> &SearchParameters {
        &self.params
    }

    /// Set a parameter by name. Takes effect on the next submitted search.
    pub fn set_parameter(
        &mut self,
        parameter: Parameter,
        value: i64,
    ) -> Result<(), ParameterError> {
        self.params.set(parameter, value)?;
        debug!("{parameter} set to {value}");
        Ok(())
    }

    /// Start a search in the background.
    ///
    /// Fails with [`EngineError::Busy`] while a previous search is running.
    pub fn submit(&self, request: SearchRequest) -> Result<PendingSearch, EngineError> {
        let mut state = self.inner.lock();
        if state.busy || state.task.is_some() {
            warn!("search submitted while another is outstanding");
            return Err(EngineError::Busy);
        }

        let (reply, receiver) = mpsc::channel();
        self.inner.stop.store(false, Ordering::Relaxed);
        state.task = Some(Task::Search {
            request,
            params: self.params,
            reply,
        });
        state.busy = true;
        self.inner.condvar.notify_one();

        Ok(PendingSearch {
            receiver,
            result: None,
        })
    }

    /// Submit and wait for the result.
    pub fn search(&self, request: SearchRequest) -> Result<SearchResult, EngineError> {
        self.submit(request)?.join()
    }

    /// Whether a search is queued or running.
    pub fn is_busy(&self) -> bool {
        let state = self.inner.lock();
        state.busy
    }

    /// Ask the running search to stop early. It still reports a move.
    pub fn cancel(&self) {
        self.inner.stop.store(true, Ordering::Relaxed);
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        {
            let mut state = self.inner.lock();
            // The worker empties the slot when it takes a search
            while state.task.is_some() {
                state = self
                    .inner
                    .condvar
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
            }
            state.task = Some(Task::Exit);
            self.inner.condvar.notify_all();
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn idle_loop(inner: Arc<Inner>) {
    loop {
        let task = {
            let mut state = inner.lock();
            while state.task.is_none() {
                state = inner
                    .condvar
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
            }
            let task = state.task.take();
            // Wake a dropping engine waiting for the slot
            inner.condvar.notify_all();
            task
        };

        match task {
            Some(Task::Search {
                request,
                params,
                reply,
            }) => {
                let result = Searcher::new(params, &inner.stop)
                    .with_movetime(request.movetime)
                    .search(&request.position, &request.history);
                inner.lock().busy = false;
                // The caller may have dropped its PendingSearch
                let _ = reply.send(result);
            }
            Some(Task::Exit) => {
                debug!("search worker exiting");
                return;
            }
            None => {}
        }
    }
}

/// A submitted search whose result has not been collected yet.
pub struct PendingSearch {
    receiver: Receiver<SearchResult>,
    result: Option<SearchResult>,
}

impl PendingSearch {
    /// Poll for completion without blocking.
    pub fn is_done(&mut self) -> bool {
        if self.result.is_some() {
            return true;
        }
        match self.receiver.try_recv() {
            Ok(result) => {
                self.result = Some(result);
                true
            }
            Err(TryRecvError::Empty) => false,
            // Reported by `join`
            Err(TryRecvError::Disconnected) => true,
        }
    }

    /// Block until the search finishes.
    pub fn join(self) -> Result<SearchResult, EngineError> {
        match self.result {
            Some(result) => Ok(result),
            None => self.receiver.recv().map_err(|_| EngineError::WorkerGone),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_and_join() {
        let mut engine = Engine::new().unwrap();
        engine.set_parameter(Parameter::Depth, 2).unwrap();

        let pending = engine.submit(SearchRequest::new(Position::new())).unwrap();
        let result = pending.join().unwrap();
        assert!(result.best_move.is_some());
        assert!(!engine.is_busy());
    }

    #[test]
    fn test_is_done_polls() {
        let engine = Engine::with_parameters(SearchParameters {
            depth: 3,
            ..SearchParameters::default()
        })
        .unwrap();
        let mut pending = engine
            .submit(SearchRequest::new("w:0;b:;b;1;1".parse().unwrap()))
            .unwrap();
        while !pending.is_done() {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(pending.is_done());
        assert!(pending.join().is_ok());
    }

    #[test]
    fn test_engine_is_reused() {
        let mut engine = Engine::new().unwrap();
        engine.set_parameter(Parameter::Depth, 1).unwrap();
        for _ in 0..3 {
            let result = engine.search(SearchRequest::new(Position::new())).unwrap();
            assert_eq!(result.nodes, 24);
        }
    }

    #[test]
    fn test_drop_finishes_queued_search() {
        for _ in 0..100 {
            let mut engine = Engine::new().unwrap();
            engine.set_parameter(Parameter::Depth, 1).unwrap();
            let pending = engine.submit(SearchRequest::new(Position::new())).unwrap();
            drop(engine);

            let result = pending.join().unwrap();
            assert_eq!(result.nodes, 24);
            assert!(!result.cancelled);
        }
    }

    #[test]
    fn test_movetime_reaches_worker() {
        let engine = Engine::with_parameters(SearchParameters {
            depth: 30,
            ..SearchParameters::default()
        })
        .unwrap();
        let request =
            SearchRequest::new(Position::new()).with_movetime(Some(Duration::from_millis(20)));
        let result = engine.search(request).unwrap();
        assert!(result.cancelled);
        assert!(result.best_move.is_some());
        assert!(!engine.is_busy());
    }

    #[test]
    fn test_parameter_errors_leave_engine_unchanged() {
        let mut engine = Engine::new().unwrap();
        assert!(engine.set_parameter(Parameter::Depth, -2).is_err());
        assert_eq!(*engine.parameters(), SearchParameters::default());
    }
}
