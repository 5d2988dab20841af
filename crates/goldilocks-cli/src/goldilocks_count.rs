//! Counting pipeline CLI
//!
//! Usage: goldilocks_count <n> [--data-dir <PATH>] [--workers <N>] [--expected-total <T>]
//!
//! Reads goldcands<n>.dat from the data directory, runs the concurrent
//! testing pipeline, appends per-candidate results to goldcounts<n>.txt
//! and diagnostics to goldlog<n>.txt, and prints the final totals.
//!
//! Example: goldilocks_count 7 --workers 8

use goldilocks_ltf::app::pipeline::{PipelineConfig, run};
use goldilocks_ltf::constants::{MAX_VARIABLES, MIN_VARIABLES};
use goldilocks_ltf::infra::candidate_io::{candidate_path, log_path, results_path};
use goldilocks_ltf::infra::report::{ResultsSink, open_log_file, write_totals};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, TermLogger, TerminalMode, WriteLogger,
};
use std::env;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

struct Args {
    n: usize,
    data_dir: PathBuf,
    workers: Option<usize>,
    expected_total: Option<u64>,
}

fn print_usage(program: &str) {
    eprintln!(
        "Usage: {} <n> [--data-dir <PATH>] [--workers <N>] [--expected-total <T>]",
        program
    );
    eprintln!();
    eprintln!("Arguments:");
    eprintln!(
        "  <n>                   Number of Boolean variables ({}-{})",
        MIN_VARIABLES, MAX_VARIABLES
    );
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --data-dir <PATH>     Directory holding goldcands<n>.dat (default: .)");
    eprintln!("  --workers <N>         Number of tester threads");
    eprintln!("  --expected-total <T>  Fail unless the candidate file holds exactly T records");
    eprintln!("  --help, -h            Show this help message");
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = env::args().collect();

    let mut n: Option<usize> = None;
    let mut data_dir: Option<PathBuf> = None;
    let mut workers: Option<usize> = None;
    let mut expected_total: Option<u64> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--data-dir" => {
                i += 1;
                if i >= args.len() {
                    return Err("--data-dir requires a value".to_string());
                }
                data_dir = Some(PathBuf::from(&args[i]));
            }
            "--workers" => {
                i += 1;
                if i >= args.len() {
                    return Err("--workers requires a value".to_string());
                }
                workers = Some(
                    args[i]
                        .parse()
                        .map_err(|_| format!("Invalid worker count: {}", args[i]))?,
                );
            }
            "--expected-total" => {
                i += 1;
                if i >= args.len() {
                    return Err("--expected-total requires a value".to_string());
                }
                expected_total = Some(
                    args[i]
                        .parse()
                        .map_err(|_| format!("Invalid expected total: {}", args[i]))?,
                );
            }
            "--help" | "-h" => {
                print_usage(&args[0]);
                std::process::exit(0);
            }
            arg if !arg.starts_with('-') => {
                if n.is_some() {
                    return Err(format!("Unexpected argument: {}", arg));
                }
                n = Some(
                    arg.parse()
                        .map_err(|_| format!("Invalid variable count: {}", arg))?,
                );
            }
            _ => return Err(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }

    let n = n.ok_or("Missing variable count argument")?;

    Ok(Args {
        n,
        data_dir: data_dir.unwrap_or_else(|| PathBuf::from(".")),
        workers,
        expected_total,
    })
}

fn init_logging(log_file: &std::path::Path) -> Result<(), String> {
    // The log survives across runs; each run appends to it.
    let file = open_log_file(log_file)
        .map_err(|e| format!("cannot open log file {}: {}", log_file.display(), e))?;
    let config = ConfigBuilder::new().set_time_format_rfc3339().build();
    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Warn,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, config, file),
    ])
    .map_err(|e| format!("logger init failed: {}", e))
}

fn main() {
    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage(&env::args().next().unwrap_or_default());
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&log_path(&args.data_dir, args.n)) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let mut config = PipelineConfig::new(args.n);
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    config.expected_total = args.expected_total;

    let candidates = candidate_path(&args.data_dir, args.n);
    let results = results_path(&args.data_dir, args.n);
    println!("Counting for n = {} with {} workers...", args.n, config.workers);
    println!("Candidate file: {}", candidates.display());
    println!("Results file: {}", results.display());

    let sink = match ResultsSink::append(&results) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error opening {}: {}", results.display(), e);
            std::process::exit(1);
        }
    };

    let start = Instant::now();
    let totals = match run(&config, &candidates, &sink) {
        Ok(t) => t,
        Err(e) => {
            log::error!("pipeline failed: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!();
    println!("Final results!");
    if let Err(e) = write_totals(&mut io::stdout(), args.n, &totals) {
        eprintln!("Error writing totals: {}", e);
        std::process::exit(1);
    }
    println!();
    println!(
        "Done! Total time: {:.2} seconds",
        start.elapsed().as_secs_f64()
    );
}
