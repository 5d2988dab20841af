//! Candidate generation CLI
//!
//! Usage: goldilocks_generate <n> [--out-dir <PATH>]
//!
//! Options:
//!   --out-dir <PATH>  Directory for the candidate file (default: .)
//!   --help, -h        Show help
//!
//! Example: goldilocks_generate 7

use goldilocks_ltf::app::generator::enumerate_with_progress;
use goldilocks_ltf::constants::{MAX_VARIABLES, MIN_VARIABLES, known_candidate_total};
use goldilocks_ltf::domain::order::OrderTable;
use goldilocks_ltf::infra::candidate_io::{CandidateWriter, candidate_path};
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

struct Args {
    n: usize,
    out_dir: PathBuf,
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <n> [options]", program);
    eprintln!();
    eprintln!("Arguments:");
    eprintln!(
        "  <n>               Number of Boolean variables ({}-{})",
        MIN_VARIABLES, MAX_VARIABLES
    );
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --out-dir <PATH>  Directory for the candidate file (default: .)");
    eprintln!("  --help, -h        Show this help message");
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = env::args().collect();

    let mut n: Option<usize> = None;
    let mut out_dir: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--out-dir" => {
                i += 1;
                if i >= args.len() {
                    return Err("--out-dir requires a value".to_string());
                }
                out_dir = Some(PathBuf::from(&args[i]));
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
    if !(MIN_VARIABLES..=MAX_VARIABLES).contains(&n) {
        return Err(format!(
            "Variable count {} out of range ({}-{})",
            n, MIN_VARIABLES, MAX_VARIABLES
        ));
    }

    Ok(Args {
        n,
        out_dir: out_dir.unwrap_or_else(|| PathBuf::from(".")),
    })
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

    println!("Generating candidates for n = {}...", args.n);
    if args.n == MAX_VARIABLES {
        println!("This will take a long time. Press Ctrl+C to cancel.");
    }

    let start = Instant::now();
    let order = OrderTable::build(args.n);
    println!(
        "Order tables built in {:.2} seconds.",
        start.elapsed().as_secs_f64()
    );

    let path = candidate_path(&args.out_dir, args.n);
    let mut writer = match CandidateWriter::create(&path, 1usize << args.n) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Error creating {}: {}", path.display(), e);
            std::process::exit(1);
        }
    };

    let gen_start = Instant::now();
    let result = enumerate_with_progress(
        &order,
        |f| writer.write(f),
        |count| {
            print!("\r[Generation] {} candidates", count);
            let _ = io::stdout().flush();
        },
    );
    let generated = match result.and_then(|count| writer.finish().map(|_| count)) {
        Ok(count) => count,
        Err(e) => {
            eprintln!("\nError writing {}: {}", path.display(), e);
            std::process::exit(1);
        }
    };
    println!();

    println!(
        "Generated {} candidates in {:.2} seconds",
        generated,
        gen_start.elapsed().as_secs_f64()
    );
    println!("Candidate file: {}", path.display());
    let file_size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
    println!("File size: {:.2} MB", file_size as f64 / (1024.0 * 1024.0));

    match known_candidate_total(args.n) {
        Some(expected) if expected != generated => {
            eprintln!(
                "Warning: generated {} candidates but the published total is {}",
                generated, expected
            );
        }
        _ => {}
    }

    println!();
    println!(
        "Done! Total time: {:.2} seconds",
        start.elapsed().as_secs_f64()
    );
    println!("The candidate file is ready for counting with goldilocks_count.");
}
