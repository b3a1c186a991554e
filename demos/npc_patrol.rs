//! NPC Patrol
//!
//! This example drives a guard NPC through a few dozen game ticks.
//!
//! Key concepts:
//! - One machine per NPC, each with its own seeded random source
//! - Sampling the next behavior every tick
//! - Adding and removing behaviors while the game is running
//! - Transition history for debugging
//!
//! Run with: RUST_LOG=npcmind=trace cargo run --example npc_patrol

use npcmind::{state_enum, StateMachineBuilder, TransitionKind};
use tracing_subscriber::EnvFilter;

state_enum! {
    enum Behavior {
        Patrol,
        Chase,
        Shoot,
        Hide,
        Flee,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== NPC Patrol Example ===\n");

    let mut guard = StateMachineBuilder::new()
        .name("gate-guard")
        .state(Behavior::Patrol, vec![0.7, 0.2, 0.0, 0.1])
        .state(Behavior::Chase, vec![0.2, 0.4, 0.3, 0.1])
        .state(Behavior::Shoot, vec![0.1, 0.3, 0.4, 0.2])
        .state(Behavior::Hide, vec![0.5, 0.1, 0.1, 0.3])
        .seed(2024)
        .history(64)
        .build()?;

    println!("Phase 1: normal patrol");
    for tick in 0..12 {
        let behavior = guard.next_state();
        println!("  tick {tick:>2}: {behavior}");
    }

    // The guard picks up a wound: fleeing becomes possible from every behavior
    println!("\nPhase 2: wounded, Flee added");
    guard.add_state(
        Behavior::Flee,
        &[0.05, 0.1, 0.2, 0.3],
        &[0.1, 0.0, 0.0, 0.4, 0.5],
    )?;
    for state in guard.states() {
        println!("  {state:<6} {:?}", guard.p_vector(state)?);
    }
    for tick in 12..24 {
        let behavior = guard.next_state();
        println!("  tick {tick:>2}: {behavior}");
    }

    // Out of ammunition: shooting is no longer an option
    println!("\nPhase 3: out of ammo, Shoot removed");
    guard.remove_state(&Behavior::Shoot)?;
    println!("  current state: {}", guard.current_state());
    for tick in 24..36 {
        let behavior = guard.next_state();
        println!("  tick {tick:>2}: {behavior}");
    }

    if let Some(history) = guard.history() {
        let forced = history
            .transitions()
            .filter(|t| t.kind == TransitionKind::Forced)
            .count();
        println!(
            "\nHistory: {} transitions kept ({} forced)",
            history.len(),
            forced
        );
    }
    println!("Drifted rows: {:?}", guard.drifted_rows());

    println!("\n=== Example Complete ===");
    Ok(())
}
