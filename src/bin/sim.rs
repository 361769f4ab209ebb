//! Headless game: a random-firing stand-in for the human against the
//! computer. Prints a JSON summary of the finished game.

use std::sync::Arc;

use broadside::{
    Board, GameSession, MemorySnapshotStore, Phase, RandomTargeting, SessionConfig, Side,
    SnapshotStore, Targeting,
};
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;
use tokio::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <seed>", args[0]);
        std::process::exit(1);
    }
    let seed: u64 = args[1].parse()?;

    let store = Arc::new(MemorySnapshotStore::new());
    let config = SessionConfig {
        ai_think_delay: Duration::ZERO,
        seed: Some(seed),
        ..SessionConfig::default()
    };
    let (mut session, _events) = GameSession::new(
        "sim",
        config,
        Arc::clone(&store) as Arc<dyn SnapshotStore>,
    )?;
    session.place_remaining_randomly()?;
    session.start_battle()?;

    let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(1));
    let mut human = RandomTargeting::new();
    let mut human_shots = 0usize;

    while session.phase() == Phase::Battle {
        match session.whose_turn() {
            Some(Side::Human) => {
                let target = session
                    .enemy_board()
                    .and_then(|board: &Board| human.select_target(&mut rng, board));
                let Some(target) = target else { break };
                session.fire_at(target).await?;
                human_shots += 1;
            }
            Some(Side::Ai) => {
                session.wait_for_turn().await?;
            }
            None => break,
        }
    }

    let (player, enemy) = match session.boards() {
        Some(boards) => (boards.player.clone(), boards.enemy.clone()),
        None => anyhow::bail!("game ended without returning the boards"),
    };
    let winner = if enemy.all_ships_sunk() {
        Some("human")
    } else if player.all_ships_sunk() {
        Some("ai")
    } else {
        None
    };
    session.close().await?;

    let result = json!({
        "seed": seed,
        "human": {"shots": human_shots, "ships_sunk": enemy.sunk_count()},
        "ai": {"shots": player.shots_fired().len(), "ships_sunk": player.sunk_count()},
        "winner": winner,
        "saves": store.save_count(),
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
