use clap::Parser;
use colored::*;
use std::process;
use taxalift::cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize logging with TAXALIFT_LOG environment variable support
    let log_level = std::env::var("TAXALIFT_LOG").unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            e.print().expect("Failed to write argument diagnostics");
            // Usage problems are failures; --help and --version are not.
            process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let summary = taxalift::pipeline::run(&cli.input, cli.output.as_deref())?;

    println!(
        "{} Transformation complete. Output written to {}",
        "✓".green().bold(),
        summary.output.display()
    );
    println!(
        "  {} of {} data rows transformed ({} valid, {} synonyms)",
        summary.transformed_rows, summary.data_rows, summary.valid_records, summary.synonym_records
    );
    println!("  {} surrogate identifiers issued", summary.ids_generated);
    Ok(())
}
