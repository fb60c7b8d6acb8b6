//! distrand CLI entry point

use anyhow::{Context, Result};
use distrand::config::cli::Cli;
use distrand::config::toml::load_config;
use distrand::config::validator::validate_config;
use distrand::config::Config;
use distrand::output::json::{write_json_output, JsonReport};
use distrand::output::text::print_summary;
use distrand::output::Summary;
use distrand::request::{handle, SymbolTable};
use distrand::Cluster;
use std::time::Instant;

fn main() -> Result<()> {
    let main_start = Instant::now();

    // Parse CLI arguments
    let parse_start = Instant::now();
    let cli = Cli::parse_args();
    cli.validate()?;
    let config = load_config(&cli)?;
    validate_config(&config).context("Invalid configuration")?;
    let debug = config.runtime.debug;
    if debug {
        eprintln!("DEBUG TIMING: CLI parse: {:.3}s", parse_start.elapsed().as_secs_f64());
    }

    if !config.output.quiet {
        println!("distrand v{}", env!("CARGO_PKG_VERSION"));
        println!("Cluster: {}", config.cluster);
        println!();
    }

    let cluster = Cluster::new(&config.cluster, &config.runtime).context("Failed to create cluster")?;

    let request = cli.command.to_request();
    if debug {
        eprintln!("DEBUG: Request: {:?}", request);
    }

    let mut symbols = SymbolTable::new();
    let generate_start = Instant::now();
    let reply = handle(&cluster, &mut symbols, &request).context("Generation failed")?;
    if debug {
        eprintln!("DEBUG TIMING: Generate: {:.3}s", generate_start.elapsed().as_secs_f64());
    }

    println!("{}", reply.text);

    let entry = symbols
        .get(&reply.name)
        .with_context(|| format!("{} was not registered", reply.name))?;
    let summary = Summary::from_entry(&reply.name, entry, config.output.preview);

    if !config.output.quiet {
        println!();
        print_summary(&summary);
    }

    write_report(&config, &reply.text, summary)?;

    if debug {
        eprintln!("DEBUG TIMING: Total: {:.3}s", main_start.elapsed().as_secs_f64());
    }

    Ok(())
}

/// Write the JSON report if one was requested
fn write_report(config: &Config, reply: &str, summary: Summary) -> Result<()> {
    let Some(ref path) = config.output.json_output else {
        return Ok(());
    };

    let report = JsonReport::new(config, reply, summary);
    write_json_output(path, &report, true)?;
    if !config.output.quiet {
        println!();
        println!("JSON report written to {}", path.display());
    }
    Ok(())
}
