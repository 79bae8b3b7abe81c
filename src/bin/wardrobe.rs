//! Command-line wardrobe recommendations.
//!
//! Usage:
//!   cargo run --bin wardrobe -- "I need a casual wardrobe for a Boston Red Sox fan"
//!   cargo run --bin wardrobe -- --json "minimalist capsule wardrobe for Seattle"

use std::io::Write;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use wardrobe_advisor::config::Config;
use wardrobe_advisor::report;
use wardrobe_advisor::service::WardrobeService;

const SAMPLE_PROMPT: &str =
    "I need a casual wardrobe for a Boston Red Sox fan who likes comfortable clothes";

#[derive(Parser)]
#[command(name = "wardrobe")]
#[command(about = "Build a themed wardrobe recommendation from a prompt", long_about = None)]
struct Cli {
    /// What you are looking for; a sample Red Sox request when omitted
    prompt: Option<String>,

    /// Print the canonical JSON instead of the text report
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.runtime.log_level)
                .unwrap_or_else(|_| EnvFilter::new("wardrobe_advisor=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let prompt = cli.prompt.unwrap_or_else(|| SAMPLE_PROMPT.to_string());
    let service = WardrobeService::from_config(&config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if !cli.json {
        report::write_request(&mut out, &prompt)?;
    }

    match service.create_wardrobe_recommendation(&prompt) {
        Ok(rec) if cli.json => {
            serde_json::to_writer_pretty(&mut out, &rec)?;
            writeln!(out)?;
        }
        Ok(rec) => report::write_recommendation(&mut out, &rec)?,
        Err(e) => {
            writeln!(out)?;
            writeln!(out, "=== ERROR ===")?;
            writeln!(out, "{}", e)?;
            out.flush()?;
            std::process::exit(1);
        }
    }
    Ok(())
}
