//! Muhle-Engine: a minimax search engine for Nine Men's Morris.
//!
//! This crate provides a depth-limited alpha-beta search over the three
//! phases of the game (placing, sliding and flying), including captures
//! after closing a mill and threefold repetition draws.
//!
//! ## Modules
//!
//! - [`constants`] - Board dimensions, rule thresholds and default weights
//! - [`topology`] - Adjacency and mill-line tables
//! - [`board`] - Cells, players and the 24-node board
//! - [`position`] - Moves, make/unmake and the snapshot string format
//! - [`movegen`] - Legal move generation and perft
//! - [`repetition`] - Position fingerprints and threefold repetition
//! - [`evaluation`] - Terminal detection and static evaluation
//! - [`parameters`] - Tunable search weights and depth
//! - [`search`] - Minimax with alpha-beta pruning
//! - [`engine`] - Background search worker
//! - [`game`] - Game record with history and outcome
//! - [`playout`] - Random moves and random games
//! - [`protocol`] - Text protocol front-end
//!
//! ## Example
//!
//! ```
//! use muhle_engine::engine::Engine;
//! use muhle_engine::game::Game;
//! use muhle_engine::parameters::Parameter;
//! use muhle_engine::position::Move;
//!
//! let mut game = Game::new();
//! game.play(Move::Place { target: 4 }).unwrap();
//!
//! let mut engine = Engine::new().unwrap();
//! engine.set_parameter(Parameter::Depth, 2).unwrap();
//! let result = engine.submit(game.search_request()).unwrap().join().unwrap();
//! println!("Best move: {}", result.best_move.unwrap());
//! ```

pub mod board;
pub mod constants;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod game;
pub mod movegen;
pub mod parameters;
pub mod playout;
pub mod position;
pub mod protocol;
pub mod repetition;
pub mod search;
pub mod topology;
