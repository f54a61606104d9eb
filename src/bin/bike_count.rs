//! Counts newline-delimited names read from stdin and writes
//! `"<name> = <count>"` lines to an output file.
//!
//! Usage: `bike_count [--strategy array|chained] [OUTPUT]`

use log::info;
use simap::{tally, ArrayMap, ChainedMap, StrIntMap, TallyError};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

const USAGE: &str = "usage: bike_count [--strategy array|chained] [OUTPUT]";

#[derive(Debug, PartialEq, Eq)]
enum Strategy {
    Array,
    Chained,
}

#[derive(Debug)]
struct Args {
    strategy: Strategy,
    output: String,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut strategy = Strategy::Chained;
    let mut output = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--strategy" => {
                strategy = match args.next().as_deref() {
                    Some("array") => Strategy::Array,
                    Some("chained") => Strategy::Chained,
                    Some(other) => return Err(format!("unknown strategy `{other}`")),
                    None => return Err("--strategy needs a value".to_string()),
                }
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            _ if output.is_none() => output = Some(arg),
            _ => return Err(format!("unexpected argument `{arg}`")),
        }
    }
    Ok(Args {
        strategy,
        output: output.unwrap_or_else(|| "output".to_string()),
    })
}

fn count_into<M: StrIntMap>(mut map: M, output: &str) -> Result<(), TallyError> {
    let stdin = io::stdin();
    let lines = tally::tally(&mut map, stdin.lock())?;
    let mut out = BufWriter::new(File::create(output)?);
    tally::write_counts(&map, &mut out)?;
    out.flush()?;
    info!("counted {lines} lines, {} distinct, into {output}", map.len());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(a) => a,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::from(2);
        }
    };
    let res = match args.strategy {
        Strategy::Array => count_into(ArrayMap::new(), &args.output),
        Strategy::Chained => count_into(ChainedMap::new(), &args.output),
    };
    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("bike_count: {e}");
            ExitCode::FAILURE
        }
    }
}
