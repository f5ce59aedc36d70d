//! Execute a single rule against a payload and print the execution result.
//!
//! The rule is read from `--rule FILE` or stdin; the payload from `--payload FILE`
//! or the built-in sample. The result is always well-formed JSON, even for garbage
//! rule input.

use std::fs::File;
use std::io::Read;

use arrrg::CommandLine;
use serde_json::Value;

use zenrules::data::sample_payload;
use zenrules::execute_rule;

#[derive(Clone, Default, Debug, Eq, PartialEq, arrrg_derive::CommandLine)]
struct Args {
    #[arrrg(optional, "Read the rule from this file instead of stdin")]
    rule: Option<String>,
    #[arrrg(optional, "Read the payload from this file (defaults to the built-in sample)")]
    payload: Option<String>,
    #[arrrg(flag, "Print compact JSON instead of pretty-printed")]
    compact: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = Args::from_command_line_relaxed(
        "USAGE: zenrules-execute [--rule FILE] [--payload FILE] [--compact]",
    );
    let rule = read_json(args.rule.as_deref())?;
    let payload = match args.payload.as_deref() {
        Some(path) => read_json(Some(path))?,
        None => Value::Object(sample_payload()),
    };
    let result = execute_rule(&rule, &payload);
    if args.compact {
        println!("{}", serde_json::to_string(&result)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }
    Ok(())
}

fn read_json(path: Option<&str>) -> Result<Value, Box<dyn std::error::Error>> {
    let mut buf = String::new();
    match path {
        Some(path) => {
            File::open(path)?.read_to_string(&mut buf)?;
        }
        None => {
            std::io::stdin().read_to_string(&mut buf)?;
        }
    }
    Ok(serde_json::from_str(&buf)?)
}
