//! # Scheduling Simulator
//!
//! Main entry point: `schedsim <input_file>`.

use schedsim::{HostConfig, HostRuntime};
use std::env;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        print_usage(&args);
        process::exit(-1);
    }

    let config = HostConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(-1);
    });

    let runtime = HostRuntime::new(config);
    if let Err(e) = runtime.run_file(&args[1]) {
        eprintln!("Error: {}", e);
        process::exit(-1);
    }
}

fn print_usage(args: &[String]) {
    let program = args.first().map(String::as_str).unwrap_or("schedsim");
    println!("ERROR!");
    println!(
        "Expected 1 argument, received {}",
        args.len().saturating_sub(1)
    );
    println!("Usage: {} <input_file>", program);
}
