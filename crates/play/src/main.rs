//! Match play between two UCT players.
//!
//! Plays single verbose games or batches of independent games on the bundled
//! games, and can save one JSON record per game for later analysis.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use uct_core::{Game, Player, Reward};
use uct_mcts::{
    games::{Gomoku, Nim, TicTacToe},
    SearchResult, Uct, UctConfig, UniformRollout,
};

/// UCT match play tool.
#[derive(Parser)]
#[command(name = "uct-play")]
#[command(about = "Play UCT against UCT on small board games")]
struct Cli {
    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one game, printing the position after every move.
    Play {
        #[command(flatten)]
        setup: MatchSetup,

        /// Print the root children statistics for every decision.
        #[arg(short, long)]
        verbose: bool,
    },

    /// Play many independent games and report the score.
    Arena {
        #[command(flatten)]
        setup: MatchSetup,

        /// Number of games to play.
        #[arg(short = 'n', long, default_value = "20")]
        games: usize,

        /// Write one JSON record per game to this file.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GameKind {
    Nim,
    Tictactoe,
    Gomoku,
}

#[derive(Args, Clone, Debug)]
struct MatchSetup {
    /// Game to play.
    #[arg(short, long, value_enum, default_value = "tictactoe")]
    game: GameKind,

    /// UCT iterations per move for the first player.
    #[arg(long, default_value = "1000")]
    first_iterations: usize,

    /// UCT iterations per move for the second player.
    #[arg(long, default_value = "100")]
    second_iterations: usize,

    /// UCB1 exploration constant for both players.
    #[arg(short, long, default_value = "1.0")]
    exploration: f64,

    /// Random seed for reproducibility.
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Starting pile for Nim.
    #[arg(long, default_value = "15")]
    chips: u32,

    /// Board edge for Gomoku.
    #[arg(long, default_value = "10")]
    board_size: usize,

    /// Stones in a row needed to win Gomoku.
    #[arg(long, default_value = "5")]
    win_length: usize,
}

impl MatchSetup {
    /// Search configuration for each seat, indexed by `Player::index`.
    fn configs(&self) -> Result<[UctConfig; 2]> {
        if self.first_iterations == 0 || self.second_iterations == 0 {
            bail!("Both players need at least one iteration per move");
        }
        let configs = [
            UctConfig::with_iterations(self.first_iterations).with_exploration(self.exploration),
            UctConfig::with_iterations(self.second_iterations).with_exploration(self.exploration),
        ];
        for config in &configs {
            config.validate().context("Invalid search settings")?;
        }
        Ok(configs)
    }
}

/// A finished game.
#[derive(Serialize, Debug)]
struct GameRecord {
    seed: u64,
    moves: usize,
    winner: Option<Player>,
    configs: [UctConfig; 2],
}

/// Which seat won, if anyone, in a terminal position.
fn winner<G: Game>(game: &G, state: &G::State) -> Option<Player> {
    [Player::First, Player::Second]
        .into_iter()
        .find(|&p| game.result(state, p).is_some_and(Reward::is_win))
}

/// How much of a game to print while it is played.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Output {
    Quiet,
    Moves,
    Stats,
}

/// Play one game between two UCT players.
fn play_game<G>(game: &G, configs: &[UctConfig; 2], seed: u64, output: Output) -> Result<GameRecord>
where
    G: Game,
    G::State: Display,
    G::Move: Display,
{
    let mut players: [Uct<G, UniformRollout, ChaCha8Rng>; 2] = [
        Uct::with_uniform_rollouts(configs[0].clone(), ChaCha8Rng::seed_from_u64(seed)),
        Uct::with_uniform_rollouts(
            configs[1].clone(),
            ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)),
        ),
    ];

    let mut state = game.initial_state();
    let mut moves = 0;

    while !game.is_terminal(&state) {
        let mover = game.current_player(&state);
        let uct = &mut players[mover.index()];

        let result = uct
            .search(game, &state)
            .with_context(|| format!("Search failed at move {}", moves + 1))?;
        let Some(mv) = result.best() else {
            bail!(
                "The {} player found no move at move {} of an unfinished game",
                mover,
                moves + 1
            );
        };

        if output == Output::Stats {
            print_children(&result);
        }

        game.apply(&mut state, mv)
            .with_context(|| format!("Search returned an unplayable move {}", mv))?;
        moves += 1;

        if output != Output::Quiet {
            println!("Best move ({}): {}", mover, mv);
            println!("{}", state);
        }
    }

    Ok(GameRecord {
        seed,
        moves,
        winner: winner(game, &state),
        configs: [players[0].config().clone(), players[1].config().clone()],
    })
}

/// Print visit and win statistics for every root child.
fn print_children<M: Display>(result: &SearchResult<M>) {
    for child in &result.children {
        println!(
            "  {:>5}: {:>6} visits, win rate {:.3}",
            child.mv,
            child.visits,
            child.win_rate()
        );
    }
}

fn cmd_play<G>(game: &G, setup: &MatchSetup, verbose: bool) -> Result<()>
where
    G: Game,
    G::State: Display,
    G::Move: Display,
{
    let configs = setup.configs()?;
    println!("{}", game.initial_state());

    let output = if verbose { Output::Stats } else { Output::Moves };
    let record = play_game(game, &configs, setup.seed, output)?;

    println!("Game over after {} moves", record.moves);
    match record.winner {
        Some(player) => println!("The {} player wins!", player),
        None => println!("Nobody wins!"),
    }
    Ok(())
}

fn cmd_arena<G>(game: &G, setup: &MatchSetup, games: usize, output: Option<PathBuf>) -> Result<()>
where
    G: Game,
    G::State: Display,
    G::Move: Display,
{
    let configs = setup.configs()?;
    info!(games, game = ?setup.game, "Starting arena");
    let start = Instant::now();

    let records: Vec<GameRecord> = (0..games as u64)
        .into_par_iter()
        .map(|i| play_game(game, &configs, setup.seed.wrapping_add(i * 2), Output::Quiet))
        .collect::<Result<_>>()?;

    let first_wins = records.iter().filter(|r| r.winner == Some(Player::First)).count();
    let second_wins = records.iter().filter(|r| r.winner == Some(Player::Second)).count();
    let draws = records.len() - first_wins - second_wins;

    println!("Completed {} games in {:.2}s", records.len(), start.elapsed().as_secs_f64());
    println!(
        "First ({} iterations):  {} wins",
        configs[0].iterations, first_wins
    );
    println!(
        "Second ({} iterations): {} wins",
        configs[1].iterations, second_wins
    );
    println!("Draws: {}", draws);

    if let Some(path) = output {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file {:?}", path))?;
        let mut writer = BufWriter::new(file);
        for record in &records {
            serde_json::to_writer(&mut writer, record).context("Failed to serialize game record")?;
            writeln!(writer)?;
        }
        writer.flush()?;
        println!("Records saved to: {:?}", path);
    }

    Ok(())
}

fn dispatch<G>(game: G, command: &Commands) -> Result<()>
where
    G: Game,
    G::State: Display,
    G::Move: Display,
{
    match command {
        Commands::Play { setup, verbose } => cmd_play(&game, setup, *verbose),
        Commands::Arena {
            setup,
            games,
            output,
        } => cmd_arena(&game, setup, *games, output.clone()),
    }
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let setup = match &cli.command {
        Commands::Play { setup, .. } | Commands::Arena { setup, .. } => setup,
    };

    match setup.game {
        GameKind::Nim => dispatch(Nim::new(setup.chips), &cli.command),
        GameKind::Tictactoe => dispatch(TicTacToe, &cli.command),
        GameKind::Gomoku => {
            let game = Gomoku::new(setup.board_size, setup.win_length)
                .context("Invalid Gomoku settings")?;
            dispatch(game, &cli.command)
        }
    }
}
