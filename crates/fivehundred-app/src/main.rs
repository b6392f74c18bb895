use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use fivehundred_app::config::{GameConfig, SeatKind};
use fivehundred_app::controller::{ControllerSettings, GameController};
use fivehundred_app::human::HumanPlayer;
use fivehundred_app::logging::init_logging;
use fivehundred_app::remote::{self, RemotePlayer};
use fivehundred_bot::{HeuristicPlayer, Player, RandomPlayer};
use fivehundred_core::AppInfo;
use fivehundred_core::model::deck::Deck;
use fivehundred_core::model::player::Seat;
use tracing::info;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built ",
    env!("FIVEHUNDRED_BUILD_DATE"),
    ")"
);

/// Terminal table for the card game 500.
#[derive(Debug, Parser)]
#[command(
    name = "fivehundred",
    author,
    version,
    long_version = LONG_VERSION,
    about = "Play a hand of 500 against bots or remote players"
)]
struct Cli {
    /// Path to a YAML configuration file. Defaults apply when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the RNG seed for the shuffle.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Seat kinds, South first: human, random, heuristic or remote:ADDR.
    #[arg(long, value_name = "KINDS", value_delimiter = ',')]
    seats: Option<Vec<SeatKind>>,

    /// Override the bots' thinking delay.
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Write a JSON snapshot of the hand to FILE after every step.
    #[arg(long, value_name = "FILE")]
    gamestate_log: Option<PathBuf>,

    /// Join the table listening at ADDR and play its remote seat from this terminal.
    #[arg(long, value_name = "ADDR", conflicts_with_all = ["seats", "seed", "gamestate_log"])]
    serve: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = match cli.config.as_ref() {
        Some(path) => GameConfig::from_path(path)?,
        None => GameConfig::default(),
    };

    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }

    if let Some(seats) = cli.seats {
        config.seats = seats;
    }

    if let Some(delay_ms) = cli.delay_ms {
        config.bot_delay_ms = delay_ms;
    }

    if let Some(path) = cli.gamestate_log {
        config.gamestate_log = Some(path);
    }

    config.validate()?;

    let _logging_guard = init_logging(&config.logging)?;

    if let Some(addr) = cli.serve.as_deref() {
        let mut human = HumanPlayer::stdio();
        remote::join(addr, &mut human).with_context(|| format!("playing at table {addr}"))?;
        return Ok(());
    }

    let seed = config.seed.unwrap_or_else(rand::random);
    info!(
        target: "fivehundred::main",
        app = AppInfo::name(),
        version = AppInfo::version(),
        seed,
        seats = %config.seats.iter().map(ToString::to_string).collect::<Vec<_>>().join(","),
        "starting hand"
    );

    let players = build_players(&config, seed)?;
    let settings = ControllerSettings {
        bot_delay: config.bot_delay(),
        gamestate_log: config.gamestate_log.clone(),
    };
    let mut controller = GameController::new(players, settings);
    let result = controller.play_hand(&Deck::shuffled_with_seed(seed))?;

    // A human seat has already been shown the result.
    if !config.has_human() {
        println!("{result}");
    }
    Ok(())
}

fn build_players(config: &GameConfig, seed: u64) -> Result<[Box<dyn Player>; 4]> {
    let delay = config.bot_delay();
    let mut players: Vec<Box<dyn Player>> = Vec::with_capacity(Seat::LOOP.len());
    for (seat, kind) in Seat::LOOP.into_iter().zip(&config.seats) {
        let player: Box<dyn Player> = match kind {
            SeatKind::Human => Box::new(HumanPlayer::stdio()),
            SeatKind::Random => Box::new(RandomPlayer::new(
                delay,
                seed.wrapping_add(seat.index() as u64 + 1),
            )),
            SeatKind::Heuristic => Box::new(HeuristicPlayer::new(delay)),
            SeatKind::Remote(addr) => {
                println!("{seat}: waiting for a player to join at {addr}");
                let remote = RemotePlayer::accept(addr, config.remote_timeout())
                    .with_context(|| format!("seating a remote player for {seat} at {addr}"))?;
                Box::new(remote)
            }
        };
        players.push(player);
    }
    players
        .try_into()
        .map_err(|_| anyhow!("exactly four seats are required"))
}
