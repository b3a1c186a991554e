//! Load Definitions
//!
//! This example loads machine definitions from text and JSON.
//!
//! Key concepts:
//! - The plain-text definition format
//! - JSON definitions via serde
//! - Validation that reports every problem at once
//!
//! Run with: cargo run --example load_definition

use npcmind::definition::{parse_text, validate, MachineDefinition};
use npcmind::{state_enum, BuildError, DefinitionError};
use stillwater::validation::Validation;

state_enum! {
    enum Behavior {
        Chase,
        Avoid,
        Hide,
        Shoot,
    }
}

const SCOUT: &str = "
# scout: mostly keeps its distance
scout
3
Chase Avoid Hide
0.2 0.6 0.2
0.1 0.6 0.3
0.3 0.5 0.2
";

const SNIPER: &str = r#"{
    "name": "sniper",
    "states": ["Hide", "Shoot"],
    "matrix": [[0.6, 0.4], [0.7, 0.3]]
}"#;

const BROKEN: &str = "
broken
2
Chase Chase
0.5 0.6
0.5 -0.5
";

fn main() -> Result<(), DefinitionError> {
    println!("=== Load Definition Example ===\n");

    let scout: MachineDefinition<Behavior> = parse_text(SCOUT)?;
    print_definition(&scout);

    let sniper = MachineDefinition::<Behavior>::from_json(SNIPER)?;
    print_definition(&sniper);

    println!("\nValidating a broken definition:");
    let broken: MachineDefinition<Behavior> = parse_text(BROKEN)?;
    match validate(&broken, 1e-9) {
        Validation::Success(_) => println!("  unexpectedly valid"),
        Validation::Failure(errors) => {
            for violation in errors.iter() {
                println!("  - {violation}");
            }
        }
    }

    match broken.into_machine() {
        Err(BuildError::Invalid { violations }) => {
            println!("  builder refused it ({} violations)", violations.len())
        }
        Err(other) => println!("  builder refused it: {other}"),
        Ok(_) => println!("  builder accepted it"),
    }

    println!("\nRunning the scout for ten ticks:");
    if let Ok(mut machine) = scout.into_machine_with_seed(7) {
        let path: Vec<String> = (0..10).map(|_| machine.next_state().to_string()).collect();
        println!("  {}", path.join(" -> "));
    }

    println!("\n=== Example Complete ===");
    Ok(())
}

fn print_definition(definition: &MachineDefinition<Behavior>) {
    println!("Machine '{}':", definition.name);
    for (state, row) in definition.states.iter().zip(&definition.matrix) {
        println!("  {state:<6} {row:?}");
    }
}
