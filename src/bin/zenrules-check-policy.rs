//! Check a payload against an out-of-policy trigger rule.
//!
//! Prints the policy verdict as JSON. A rule whose conditions all hold marks the
//! payload out of policy; anything else, including an unparseable rule, leaves it in
//! policy.

use std::fs::File;
use std::io::Read;

use arrrg::CommandLine;
use serde_json::Value;

use zenrules::data::sample_payload;
use zenrules::execute_policy;

#[derive(Clone, Default, Debug, Eq, PartialEq, arrrg_derive::CommandLine)]
struct Args {
    #[arrrg(optional, "Read the rule from this file instead of stdin")]
    rule: Option<String>,
    #[arrrg(optional, "Read the payload from this file (defaults to the built-in sample)")]
    payload: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = Args::from_command_line_relaxed(
        "USAGE: zenrules-check-policy [--rule FILE] [--payload FILE]",
    );
    let rule = read_json(args.rule.as_deref())?;
    let payload = match args.payload.as_deref() {
        Some(path) => read_json(Some(path))?,
        None => Value::Object(sample_payload()),
    };
    let verdict = execute_policy(&rule, &payload);
    println!("{}", serde_json::to_string_pretty(&verdict)?);
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
