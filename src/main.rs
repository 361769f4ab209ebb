#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use std::path::PathBuf;
#[cfg(feature = "std")]
use std::sync::Arc;

#[cfg(feature = "std")]
use broadside::cli::{
    describe_event, format_elapsed, parse_command, render_board, render_view, ship_to_place,
    Command, BATTLE_HELP, PLACEMENT_HELP,
};
#[cfg(feature = "std")]
use broadside::{
    init_logging, EventReceiver, FileSnapshotStore, GameError, GameSession, Phase,
    SessionConfig, ShotResult, SnapshotStore,
};
#[cfg(feature = "std")]
use clap::{Parser, Subcommand};
#[cfg(feature = "std")]
use tokio::io::{AsyncBufReadExt, BufReader};
#[cfg(feature = "std")]
use tokio::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
#[cfg(feature = "std")]
enum Commands {
    /// Start a new game against the computer.
    Play {
        #[arg(long)]
        nickname: String,
        #[arg(long, default_value = ".")]
        save_dir: PathBuf,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, help = "Place your whole fleet at random")]
        auto_place: bool,
        #[arg(long, default_value_t = 1500)]
        ai_delay_ms: u64,
    },
    /// Continue the last saved game.
    Resume {
        #[arg(long, default_value = ".")]
        save_dir: PathBuf,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, default_value_t = 1500)]
        ai_delay_ms: u64,
    },
    /// Show the last saved game without playing it.
    Status {
        #[arg(long, default_value = ".")]
        save_dir: PathBuf,
    },
}

#[cfg(feature = "std")]
fn session_config(seed: Option<u64>, ai_delay_ms: u64) -> SessionConfig {
    if let Some(s) = seed {
        println!("Using fixed seed: {} (game will be reproducible)", s);
    }
    SessionConfig {
        ai_think_delay: Duration::from_millis(ai_delay_ms),
        seed,
        ..SessionConfig::default()
    }
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            nickname,
            save_dir,
            seed,
            auto_place,
            ai_delay_ms,
        } => {
            let store: Arc<dyn SnapshotStore> = Arc::new(FileSnapshotStore::new(&save_dir));
            let (mut session, events) =
                GameSession::new(&nickname, session_config(seed, ai_delay_ms), store)?;
            let renderer = tokio::spawn(render_events(events));
            if auto_place {
                session.place_remaining_randomly()?;
            }
            run_shell(session).await?;
            renderer.abort();
        }
        Commands::Resume {
            save_dir,
            seed,
            ai_delay_ms,
        } => {
            let store: Arc<dyn SnapshotStore> = Arc::new(FileSnapshotStore::new(&save_dir));
            let Some((session, events)) =
                GameSession::load(session_config(seed, ai_delay_ms), store).await?
            else {
                println!("No saved game in {}", save_dir.display());
                return Ok(());
            };
            println!(
                "Welcome back, {}! Resuming at {}.",
                session.nickname(),
                format_elapsed(session.elapsed_seconds())
            );
            let renderer = tokio::spawn(render_events(events));
            run_shell(session).await?;
            renderer.abort();
        }
        Commands::Status { save_dir } => {
            let store = FileSnapshotStore::new(&save_dir);
            match store.load().await? {
                Some(snapshot) => {
                    print!("{}", snapshot.summary());
                    println!("\n{}", render_view(&snapshot.player_board, &snapshot.enemy_board));
                }
                None => println!("No saved game in {}", save_dir.display()),
            }
        }
    }
    Ok(())
}

#[cfg(feature = "std")]
async fn render_events(mut events: EventReceiver) {
    while let Some(event) = events.recv().await {
        if let Some(message) = describe_event(&event) {
            println!("\n{}", message);
        }
    }
}

#[cfg(feature = "std")]
fn print_prompt(session: &GameSession) {
    match session.phase() {
        Phase::Placing => {
            if let Some(board) = session.player_board() {
                println!("\n{}", render_board(board, true));
            }
            match session.placement().pending().next() {
                Some(kind) => println!(
                    "Place your {} (length {}), e.g. A5 H, or name another ship. {} ships left, or 'auto'.",
                    kind,
                    kind.size(),
                    session.placement().total_remaining()
                ),
                None => println!("✓ All ships placed! Type 'start' to begin the battle."),
            }
        }
        Phase::Battle => {
            if let Some(boards) = session.boards() {
                println!("\n{}", render_view(&boards.player, &boards.enemy));
            }
            println!(
                "[{}] Enter target coordinates (or 'help'):",
                format_elapsed(session.elapsed_seconds())
            );
        }
        Phase::GameOver => println!("Type 'restart' for a new game or 'quit' to leave."),
    }
}

#[cfg(feature = "std")]
async fn run_shell(mut session: GameSession) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_prompt(&session);

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line, session.phase()) {
            Ok(command) => command,
            Err(e) => {
                println!("✗ {}", e);
                continue;
            }
        };

        let outcome: Result<(), GameError> = match command {
            Command::Place {
                kind,
                start,
                orientation,
            } => {
                let next = ship_to_place(kind, session.placement());
                match next {
                    Some(kind) => session
                        .place_ship(kind, start, orientation)
                        .map(|_| println!("✓ {} placed at {}", kind, start)),
                    None => {
                        println!("All ships are placed. Type 'start'.");
                        Ok(())
                    }
                }
            }
            Command::Auto => session
                .place_remaining_randomly()
                .map(|n| println!("✓ {} ships placed at random", n)),
            Command::Start => session.start_battle(),
            Command::Fire(coord) => match session.fire_at(coord).await {
                Ok(ShotResult::Miss) if session.phase() == Phase::Battle => {
                    session.wait_for_turn().await.map(|_| ())
                }
                Ok(_) => Ok(()),
                Err(e) => Err(e),
            },
            Command::Save => session.save().await.map(|()| println!("✓ Game saved")),
            Command::Restart => session.restart().await,
            Command::Board => {
                if let Some(boards) = session.boards() {
                    println!("\n{}", render_view(&boards.player, &boards.enemy));
                }
                continue;
            }
            Command::Help => {
                match session.phase() {
                    Phase::Placing => println!("{}", PLACEMENT_HELP),
                    _ => println!("{}", BATTLE_HELP),
                }
                continue;
            }
            Command::Quit => break,
        };

        if let Err(e) = outcome {
            println!("✗ Error: {}", e);
            if matches!(e, GameError::SessionAborted) {
                break;
            }
        }
        print_prompt(&session);
    }

    if session.phase() == Phase::Battle {
        session.wait_for_turn().await?;
        if let Err(e) = session.save().await {
            println!("✗ Could not save on exit: {}", e);
        }
    }
    session.close().await?;
    println!("Goodbye!");
    Ok(())
}
