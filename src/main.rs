use std::process;
use std::time::Duration;

use clap::Parser;
use log::error;

use keysolver::config::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_LENGTH, DEFAULT_PROGRESS_EVERY};
use keysolver::{ConsoleReporter, Escalation, Outcome, SampleSet, SearchConfig, Validator};

/// Recover a short AES-128 key that decrypts every sample to a digit string.
#[derive(Parser, Debug)]
#[command(name = "keysolver", version, about, long_about = None)]
struct Args {
    /// Ciphertext as BASE64, optionally followed by `:MARKER`. Repeatable.
    /// Defaults to the built-in samples.
    #[arg(short, long = "sample", value_name = "BASE64[:MARKER]")]
    samples: Vec<String>,

    /// Longest key length to try, in bytes
    #[arg(short, long, default_value_t = DEFAULT_MAX_LENGTH)]
    max_length: usize,

    /// Worker threads [default: number of CPUs]
    #[arg(short, long)]
    workers: Option<usize>,

    /// Candidates per work chunk
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: u64,

    /// Candidates between progress updates
    #[arg(long, default_value_t = DEFAULT_PROGRESS_EVERY)]
    progress_every: u64,

    /// Give up after this many seconds
    #[arg(short, long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Log progress instead of drawing a progress bar
    #[arg(short, long, default_value_t = false)]
    quiet: bool,
}

fn parse_sample(arg: &str) -> (&str, Option<&str>) {
    match arg.rsplit_once(':') {
        Some((b64, marker)) => (b64, Some(marker)),
        None => (arg, None),
    }
}

/// Status the process ends with. Finding a key and exhausting every length
/// are both normal ends; only a timeout gets its own code.
fn exit_code(outcome: &Outcome) -> i32 {
    match outcome {
        Outcome::Found { .. } | Outcome::Exhausted => 0,
        Outcome::Cancelled { .. } => 3,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(Some(env_logger::TimestampPrecision::Seconds))
        .init();

    let args = Args::parse();

    let samples = if args.samples.is_empty() {
        SampleSet::builtin()
    } else {
        SampleSet::decode(args.samples.iter().map(|s| parse_sample(s)))
    };
    let samples = match samples {
        Ok(s) => s,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let defaults = SearchConfig::default();
    let config = SearchConfig {
        max_length: args.max_length,
        workers: args.workers.unwrap_or(defaults.workers),
        chunk_size: args.chunk_size,
        progress_every: args.progress_every,
        timeout: args.timeout.map(Duration::from_secs),
    };

    let escalation = match Escalation::new(config, Validator::new(samples)) {
        Ok(e) => e,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let reporter = ConsoleReporter::new(!args.quiet);
    let outcome = match escalation.run(&reporter) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    match &outcome {
        Outcome::Found { key, samples } => {
            println!("=======================================================================");
            println!("FOUND KEY: {}", hex::encode(key.key));
            println!("Candidate: {}", hex::encode(&key.candidate));
            println!("=======================================================================");
            for s in samples {
                match &s.marker {
                    Some(marker) => println!("{} → {} (expected {})", s.encoded, s.plaintext, marker),
                    None => println!("{} → {}", s.encoded, s.plaintext),
                }
            }
        }
        Outcome::Exhausted => {
            println!("No valid key found up to length {}", escalation.config().max_length);
        }
        Outcome::Cancelled { length } => {
            println!("Timed out while searching keys of length {}", length);
        }
    }
    let code = exit_code(&outcome);
    if code != 0 {
        process::exit(code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_argument_splits_on_last_colon() {
        assert_eq!(parse_sample("AAAA:123"), ("AAAA", Some("123")));
        assert_eq!(parse_sample("AAAA"), ("AAAA", None));
    }

    #[test]
    fn exhaustion_exits_cleanly() {
        assert_eq!(exit_code(&Outcome::Exhausted), 0);
        assert_eq!(exit_code(&Outcome::Cancelled { length: 2 }), 3);
    }

    #[test]
    fn cli_defaults() {
        let args = Args::parse_from(["keysolver"]);
        assert_eq!(args.max_length, DEFAULT_MAX_LENGTH);
        assert!(args.samples.is_empty());
        assert!(args.workers.is_none());

        let args = Args::parse_from(["keysolver", "-s", "AAAA", "-s", "BBBB:7", "-m", "2", "-t", "30"]);
        assert_eq!(args.samples, vec!["AAAA", "BBBB:7"]);
        assert_eq!(args.max_length, 2);
        assert_eq!(args.timeout, Some(30));
    }
}
