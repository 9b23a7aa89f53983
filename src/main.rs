//! # Hunt the Wumpus Main Entry Point
//!
//! Parses the command line, sets up logging, and either plays games with the
//! search agent or hands the controls to a human at the terminal.

use clap::Parser;
use log::{info, warn, LevelFilter};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;
use wumpus::{
    render_board, Difficulty, Game, GameStatistics, GameStatus, GenerationConfig, InputHandler,
    InputOutcome, SearchMode, TextDisplay, WumpusError, WumpusResult,
};

/// Command line arguments for Hunt the Wumpus.
#[derive(Parser, Debug)]
#[command(name = "wumpus")]
#[command(about = "Hunt the Wumpus on a 20x20 cave, played by a search agent or by you")]
#[command(version)]
struct Args {
    /// Random seed for cave generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Agent search strategy (dfs or astar)
    #[arg(short, long, default_value = "dfs")]
    mode: SearchMode,

    /// Number of bats and pits (easy, normal or hard)
    #[arg(short, long, default_value = "normal")]
    difficulty: Difficulty,

    /// Number of games to play back to back
    #[arg(short, long, default_value_t = 1)]
    games: u32,

    /// Give up on a game after this many agent steps
    #[arg(long, default_value_t = 10_000)]
    max_steps: u64,

    /// Play by hand from the terminal
    #[arg(long)]
    manual: bool,

    /// Show the whole cave instead of the explored part
    #[arg(long)]
    show_board: bool,

    /// Print each finished game as a JSON snapshot
    #[arg(long)]
    json: bool,

    /// Accumulate statistics across runs in this file
    #[arg(long)]
    stats_file: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> WumpusResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level)?;

    let seed = args.seed.unwrap_or_else(rand::random);
    info!("Starting Hunt the Wumpus v{} with seed {}", wumpus::VERSION, seed);

    if args.manual {
        info!("Starting in manual mode");
        return run_manual(&args, seed);
    }

    run_batch(&args, seed)
}

/// Initializes the logger at the given level.
fn initialize_logging(log_level: &str) -> WumpusResult<()> {
    let level = LevelFilter::from_str(log_level).map_err(|_| {
        WumpusError::InvalidAction(format!("Unknown log level '{}'", log_level))
    })?;

    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .init();

    Ok(())
}

fn new_game(args: &Args, seed: u64) -> WumpusResult<Game> {
    let config = GenerationConfig::for_difficulty(seed, args.difficulty);
    Ok(Game::new(&config)?.with_mode(args.mode))
}

/// Plays `--games` autonomous games and prints the aggregate results.
fn run_batch(args: &Args, seed: u64) -> WumpusResult<()> {
    let mut stats = match &args.stats_file {
        Some(path) => GameStatistics::load_from_path(path)?,
        None => GameStatistics::new(),
    };
    let single = args.games == 1;

    for i in 0..args.games {
        let game_seed = seed.wrapping_add(u64::from(i));
        let mut game = match new_game(args, game_seed) {
            Ok(game) => game,
            Err(e) => {
                warn!("skipping seed {}: {}", game_seed, e);
                continue;
            }
        };

        if game.run(args.max_steps) == GameStatus::Playing {
            warn!(
                "game {} (seed {}) still running after {} steps",
                game.state().game_id,
                game_seed,
                args.max_steps
            );
        }

        if args.json {
            println!("{}", game.snapshot().to_json()?);
        } else if single {
            for line in &game.state().action_log {
                println!("{}", line);
            }
            if args.show_board {
                println!();
                print!("{}", render_board(game.state(), true));
            }
        }

        let (state, agent) = game.into_parts();
        stats.record(&state, &agent);
    }

    if !args.json {
        print_summary(&stats);
    }
    if let Some(path) = &args.stats_file {
        stats.save_to_path(path)?;
        info!("statistics saved to {}", path.display());
    }
    Ok(())
}

fn print_summary(stats: &GameStatistics) {
    let per_game = |total: u64| {
        if stats.games == 0 {
            0.0
        } else {
            total as f64 / f64::from(stats.games)
        }
    };
    println!();
    println!("Games played:        {}", stats.games);
    println!("Victories:           {}", stats.victories);
    println!("Gold recovered:      {}", stats.gold_found);
    println!("Win percentage:      {:.1}%", stats.win_percentage());
    println!("Bat rides per game:  {:.2}", per_game(stats.bat_resets));
    println!("Cells per game:      {:.1}", per_game(stats.cells_explored));
    println!("Steps per game:      {:.1}", per_game(stats.steps_taken));
}

/// Reads commands from stdin until the player quits.
fn run_manual(args: &Args, seed: u64) -> WumpusResult<()> {
    let handler = InputHandler::new();
    let mut display = TextDisplay::new(args.show_board);
    let mut game_seed = seed;
    let mut game = new_game(args, game_seed)?;

    println!("{}", handler.help_text());
    print!("{}", display.render_game(game.state(), game.agent()));

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let input = match handler.parse_line(&line) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match handler.apply(input, &mut game) {
            InputOutcome::Continue => {}
            InputOutcome::ShowHelp => {
                println!("{}", handler.help_text());
                continue;
            }
            InputOutcome::NewGame => {
                game_seed = game_seed.wrapping_add(1);
                game = new_game(args, game_seed)?;
                display.reset();
            }
            InputOutcome::Quit => break,
        }

        print!("{}", display.render_game(game.state(), game.agent()));
        if game.is_over() {
            println!("Game over. Type new to play again or quit to leave.");
        }
    }

    Ok(())
}
