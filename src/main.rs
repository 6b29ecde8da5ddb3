//! Muhle-Engine: a minimax search engine for Nine Men's Morris.
//!
//! ## Usage
//!
//! - `muhle-engine` - Start the text protocol on stdin/stdout
//! - `muhle-engine search --position <snapshot>` - Search one position
//! - `muhle-engine perft --depth <n>` - Count move-tree leaves
//! - `muhle-engine selfplay` - Let the engine play against itself

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use log::info;

use muhle_engine::engine::{Engine, SearchRequest};
use muhle_engine::evaluation::Outcome;
use muhle_engine::game::Game;
use muhle_engine::movegen::perft;
use muhle_engine::parameters::SearchParameters;
use muhle_engine::playout::random_move;
use muhle_engine::position::Position;
use muhle_engine::protocol::ProtocolSession;
use muhle_engine::search::SearchResult;

/// Muhle-Engine: minimax search for Nine Men's Morris
#[derive(Parser)]
#[command(name = "muhle-engine")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the line-oriented text protocol on stdin/stdout
    Protocol(SearchArgs),
    /// Search a single position and print the chosen move
    Search {
        /// Position snapshot, e.g. `w:0,1;b:5;b;3;3`
        #[arg(long)]
        position: Position,
        #[command(flatten)]
        params: SearchArgs,
    },
    /// Count the leaves of the full move tree
    Perft {
        #[arg(long)]
        depth: u32,
        /// Position snapshot, defaults to the empty board
        #[arg(long)]
        position: Option<Position>,
    },
    /// Let the engine play both sides
    Selfplay {
        #[command(flatten)]
        params: SearchArgs,
        /// Stop after this many plies
        #[arg(long, default_value_t = 200)]
        max_plies: usize,
        /// Random plies played before the engine takes over
        #[arg(long, default_value_t = 0)]
        random_plies: usize,
        /// Seed for the random opening
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Search parameters shared by every searching subcommand.
#[derive(Args, Clone, Copy)]
struct SearchArgs {
    /// Search depth in plies
    #[arg(long)]
    depth: Option<u32>,
    /// Weight per stone of material advantage
    #[arg(long, allow_hyphen_values = true)]
    piece: Option<i32>,
    /// Weight per free adjacent node
    #[arg(long, allow_hyphen_values = true)]
    freedom: Option<i32>,
    /// Multiplier applied to a decided game
    #[arg(long, allow_hyphen_values = true)]
    end_game: Option<i32>,
    /// Wall time per move in milliseconds; deepens up to --depth until it runs out
    #[arg(long)]
    movetime: Option<u64>,
}

impl SearchArgs {
    fn parameters(self) -> SearchParameters {
        let defaults = SearchParameters::default();
        SearchParameters {
            piece: self.piece.unwrap_or(defaults.piece),
            freedom: self.freedom.unwrap_or(defaults.freedom),
            end_game: self.end_game.unwrap_or(defaults.end_game),
            depth: self.depth.unwrap_or(defaults.depth),
        }
    }

    fn movetime(self) -> Option<Duration> {
        self.movetime.map(Duration::from_millis)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        None => run_protocol(SearchParameters::default(), None),
        Some(Commands::Protocol(params)) => run_protocol(params.parameters(), params.movetime()),
        Some(Commands::Search { position, params }) => {
            run_search(position, params.parameters(), params.movetime())
        }
        Some(Commands::Perft { depth, position }) => {
            run_perft(position.unwrap_or_default(), depth);
            Ok(())
        }
        Some(Commands::Selfplay {
            params,
            max_plies,
            random_plies,
            seed,
        }) => run_selfplay(params, max_plies, random_plies, seed),
    }
}

/// Log to stderr so the protocol on stdout stays clean.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, level),
    )
    .format(|buf, record| {
        writeln!(
            buf,
            "[{}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        )
    })
    .write_style(env_logger::WriteStyle::Never)
    .target(env_logger::Target::Stderr)
    .init();
}

fn run_protocol(params: SearchParameters, movetime: Option<Duration>) -> Result<()> {
    let mut session = ProtocolSession::with_parameters(params)?;
    session.set_movetime(movetime);
    session
        .run(io::stdin().lock(), io::stdout())
        .context("protocol I/O failed")
}

fn run_search(
    position: Position,
    params: SearchParameters,
    movetime: Option<Duration>,
) -> Result<()> {
    let engine = Engine::with_parameters(params)?;
    info!("searching {position} with {params}, movetime {movetime:?}");

    let result = engine.search(SearchRequest::new(position).with_movetime(movetime))?;
    println!("{}", position.board);
    print_result(&result);
    Ok(())
}

fn run_perft(mut position: Position, depth: u32) {
    for d in 1..=depth {
        let start = Instant::now();
        let nodes = perft(&mut position, d);
        println!("perft {d}: {nodes} ({:?})", start.elapsed());
    }
}

fn run_selfplay(
    args: SearchArgs,
    max_plies: usize,
    random_plies: usize,
    seed: Option<u64>,
) -> Result<()> {
    let engine = Engine::with_parameters(args.parameters())?;
    let mut rng = seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
    let mut game = Game::new();

    while game.outcome().is_none() && game.moves().len() < max_plies {
        let ply = game.moves().len();
        let mv = if ply < random_plies {
            let mut pos = *game.position();
            random_move(&mut pos, &mut rng).context("no legal move in an undecided game")?
        } else {
            let result = engine.search(game.search_request().with_movetime(args.movetime()))?;
            match result.best_move {
                Some(mv) => {
                    info!("ply {ply}: {mv} (eval {}, {} nodes)", result.evaluation, result.nodes);
                    mv
                }
                None => bail!("engine returned no move in an undecided game"),
            }
        };
        println!("{:>3}. {} {mv}", ply + 1, game.position().player);
        game.play(mv)?;
    }

    println!("{}", game.position().board);
    println!("{}", game.position());
    match game.outcome().map(Outcome::winner) {
        Some(Some(winner)) => println!("{winner} wins"),
        Some(None) => println!("draw by repetition"),
        None => println!("no result after {max_plies} plies"),
    }
    Ok(())
}

fn print_result(result: &SearchResult) {
    match result.best_move {
        Some(mv) => println!("bestmove {mv}"),
        None => println!("bestmove none"),
    }
    println!(
        "eval {} depth {} nodes {} time {:?}{}",
        result.evaluation,
        result.depth,
        result.nodes,
        result.elapsed,
        if result.cancelled { " (cancelled)" } else { "" }
    );
}
