//! Depth-limited minimax with alpha-beta pruning.
//!
//! White maximizes and Black minimizes; scores are always from White's side.
//! The position is mutated in place. Every child is visited through
//! [`Searcher::with_move`], which makes the move, records the reached
//! position for repetition detection and undoes both before returning.
//!
//! Repetition inside the tree uses the same [`RepetitionTracker`] the game
//! uses: the root's history is fed in first, then every position on the
//! current line. A capture clears the tracker for the subtree below it.
//!
//! A search with a move time deepens iteratively from depth one and answers
//! with the last iteration that finished before the deadline.

use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::board::Player;
use crate::constants::{Eval, MAX_EVALUATION, MIN_EVALUATION};
use crate::evaluation::{Outcome, evaluate, game_over};
use crate::movegen::generate_moves;
use crate::parameters::SearchParameters;
use crate::position::{Move, Position};
use crate::repetition::{Fingerprint, Occurrence, RepetitionTracker};

/// Outcome of one search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    /// Chosen move, `None` when the side to move has already lost
    pub best_move: Option<Move>,
    /// Score of the chosen line, from White's side
    pub evaluation: Eval,
    /// Positions evaluated
    pub nodes: u64,
    /// Wall time spent
    pub elapsed: Duration,
    /// Deepest fully searched depth, 0 if none finished
    pub depth: u32,
    /// Set when the search was stopped before reaching full depth
    pub cancelled: bool,
}

/// State of one running search.
pub struct Searcher<'a> {
    params: SearchParameters,
    tracker: RepetitionTracker,
    stop: &'a AtomicBool,
    movetime: Option<Duration>,
    deadline: Option<Instant>,
    nodes: u64,
    cancelled: bool,
}

impl<'a> Searcher<'a> {
    pub fn new(params: SearchParameters, stop: &'a AtomicBool) -> Self {
        Self {
            params,
            tracker: RepetitionTracker::new(),
            stop,
            movetime: None,
            deadline: None,
            nodes: 0,
            cancelled: false,
        }
    }

    /// Stop each search once `movetime` has elapsed.
    pub fn with_movetime(mut self, movetime: Option<Duration>) -> Self {
        self.movetime = movetime;
        self
    }

    /// Search `root` and choose a move for the side to move.
    ///
    /// `history` lists the positions since the last capture, oldest first,
    /// excluding `root`. The root itself is always expanded, so a depth of
    /// zero behaves like a depth of one.
    pub fn search(&mut self, root: &Position, history: &[Position]) -> SearchResult {
        let start = Instant::now();
        self.deadline = self.movetime.map(|movetime| start + movetime);
        self.nodes = 0;
        self.cancelled = false;
        self.tracker.clear();
        for pos in history {
            self.tracker.observe(Fingerprint::of(pos));
        }
        self.tracker.observe(Fingerprint::of(root));

        let mut pos = *root;
        let depth = self.params.depth.max(1);
        debug!(
            "search start: {} to move, depth {}, movetime {:?}, {} history positions",
            pos.player,
            depth,
            self.movetime,
            history.len()
        );

        let (best_move, evaluation, completed) = match game_over(&pos) {
            Some(outcome) => {
                self.nodes += 1;
                (None, evaluate(&pos, &self.params, Some(outcome), 0), 0)
            }
            None => self.deepen(&mut pos, depth),
        };
        debug_assert_eq!(pos, *root, "search left the root position modified");

        let result = SearchResult {
            best_move,
            evaluation,
            nodes: self.nodes,
            elapsed: start.elapsed(),
            depth: completed,
            cancelled: self.cancelled,
        };
        debug!(
            "search done: best {:?}, eval {}, depth {}, {} nodes in {:?}{}",
            result.best_move.map(|m| m.to_string()),
            result.evaluation,
            result.depth,
            result.nodes,
            result.elapsed,
            if result.cancelled { " (cancelled)" } else { "" }
        );
        result
    }

    /// Search the root to `depth`, or to every depth up to it when a move
    /// time is set. Returns the move, its score and the depth it came from.
    fn deepen(&mut self, pos: &mut Position, depth: u32) -> (Option<Move>, Eval, u32) {
        let first = if self.deadline.is_some() { 1 } else { depth };
        let mut completed = None;

        for d in first..=depth {
            let (best_move, evaluation) = self.search_root(pos, d);
            if self.cancelled {
                // An unfinished iteration only counts when nothing else did
                return completed.unwrap_or((best_move, evaluation, 0));
            }
            debug!("depth {d} done: eval {evaluation}, {} nodes", self.nodes);
            completed = Some((best_move, evaluation, d));
        }

        completed.unwrap_or_else(|| (None, evaluate(pos, &self.params, None, 0), 0))
    }

    fn search_root(&mut self, pos: &mut Position, depth: u32) -> (Option<Move>, Eval) {
        let moves = generate_moves(pos);
        let maximizing = pos.player == Player::White;
        let mut alpha = MIN_EVALUATION;
        let mut beta = MAX_EVALUATION;
        let mut best: Option<(Move, Eval)> = None;

        for mv in moves.iter().copied() {
            if self.should_stop() {
                break;
            }
            let eval = self.with_move(pos, mv, |this, pos, occurrence| {
                this.child(pos, occurrence, depth - 1, 1, alpha, beta)
            });
            if self.cancelled {
                break;
            }
            trace!("root move {mv}: {eval}");

            let improves = match best {
                None => true,
                Some((_, best_eval)) if maximizing => eval > best_eval,
                Some((_, best_eval)) => eval < best_eval,
            };
            if improves {
                best = Some((mv, eval));
            }
            if maximizing {
                alpha = alpha.max(eval);
            } else {
                beta = beta.min(eval);
            }
            if beta <= alpha {
                break;
            }
        }

        match best {
            Some((mv, eval)) => (Some(mv), eval),
            // Stopped before any root move finished: any legal move will do
            None => (
                moves.first().copied(),
                evaluate(pos, &self.params, None, 0),
            ),
        }
    }

    /// Score a child reached by the caller's move.
    fn child(
        &mut self,
        pos: &mut Position,
        occurrence: Occurrence,
        depth: u32,
        plies_from_root: u32,
        alpha: Eval,
        beta: Eval,
    ) -> Eval {
        if occurrence.is_repetition() {
            self.nodes += 1;
            return evaluate(pos, &self.params, Some(Outcome::Draw), plies_from_root);
        }
        self.minimax(pos, depth, plies_from_root, alpha, beta)
    }

    fn minimax(
        &mut self,
        pos: &mut Position,
        depth: u32,
        plies_from_root: u32,
        mut alpha: Eval,
        mut beta: Eval,
    ) -> Eval {
        if self.should_stop() {
            return 0;
        }

        let outcome = game_over(pos);
        if outcome.is_some() || depth == 0 {
            self.nodes += 1;
            return evaluate(pos, &self.params, outcome, plies_from_root);
        }

        let moves = generate_moves(pos);
        if pos.player == Player::White {
            let mut best = MIN_EVALUATION;
            for mv in moves {
                let eval = self.with_move(pos, mv, |this, pos, occurrence| {
                    this.child(pos, occurrence, depth - 1, plies_from_root + 1, alpha, beta)
                });
                best = best.max(eval);
                alpha = alpha.max(best);
                if beta <= alpha || self.cancelled {
                    break;
                }
            }
            best
        } else {
            let mut best = MAX_EVALUATION;
            for mv in moves {
                let eval = self.with_move(pos, mv, |this, pos, occurrence| {
                    this.child(pos, occurrence, depth - 1, plies_from_root + 1, alpha, beta)
                });
                best = best.min(eval);
                beta = beta.min(best);
                if beta <= alpha || self.cancelled {
                    break;
                }
            }
            best
        }
    }

    /// Run `f` on the position after `mv`, then take the move back.
    ///
    /// The reached position is recorded in the repetition tracker for the
    /// duration of `f`. A capture hides the tracker's earlier contents from
    /// `f`, since no position before a capture can be reached again.
    fn with_move<R>(
        &mut self,
        pos: &mut Position,
        mv: Move,
        f: impl FnOnce(&mut Self, &mut Position, Occurrence) -> R,
    ) -> R {
        let undo = pos.make_move(mv);
        let saved = mv.is_capture().then(|| mem::take(&mut self.tracker));

        let fp = Fingerprint::of(pos);
        let occurrence = self.tracker.observe(fp);
        let result = f(self, pos, occurrence);
        self.tracker.forget(fp, occurrence);

        if let Some(saved) = saved {
            self.tracker = saved;
        }
        pos.unmake_move(mv, undo);
        result
    }

    #[inline]
    fn should_stop(&mut self) -> bool {
        if !self.cancelled
            && (self.stop.load(Ordering::Relaxed)
                || self.deadline.is_some_and(|deadline| Instant::now() >= deadline))
        {
            self.cancelled = true;
        }
        self.cancelled
    }
}

/// Search `root` with a fresh [`Searcher`].
pub fn search(
    root: &Position,
    history: &[Position],
    params: &SearchParameters,
    stop: &AtomicBool,
) -> SearchResult {
    Searcher::new(*params, stop).search(root, history)
}
