//! Generate synthetic rules (or payloads) as JSONL for testing and demos.
//!
//! Output is deterministic for a given seed.

use arrrg::CommandLine;
use guacamole::Guacamole;

use zenrules::data::{generate_payload, generate_rule};

#[derive(Clone, Default, Debug, Eq, PartialEq, arrrg_derive::CommandLine)]
struct Args {
    #[arrrg(optional, "Seed for deterministic generation (default 0)")]
    seed: Option<String>,
    #[arrrg(optional, "Number of records to generate (default 100)")]
    count: Option<String>,
    #[arrrg(flag, "Emit synthetic payloads instead of rules")]
    payloads: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = Args::from_command_line_relaxed(
        "USAGE: zenrules-generate-rules [--seed SEED] [--count COUNT] [--payloads]",
    );
    let seed: u64 = args.seed.as_deref().unwrap_or("0").parse()?;
    let count: usize = args.count.as_deref().unwrap_or("100").parse()?;
    let mut guac = Guacamole::new(seed);
    for index in 0..count {
        if args.payloads {
            let payload = generate_payload(&mut guac);
            println!("{}", serde_json::to_string(&payload)?);
        } else {
            let rule = generate_rule(&mut guac, index + 1);
            println!("{}", serde_json::to_string(&rule)?);
        }
    }
    Ok(())
}
