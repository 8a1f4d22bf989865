mod config;
mod fetch;
mod notify;
mod parser;
mod sheets;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use config::Config;
use notify::{HttpMailer, Notifier};
use sheets::api::SheetsClient;
use sheets::grid::MemoryGrid;
use sheets::writer;

#[derive(Parser)]
#[command(name = "pump_sync", about = "Daily workout page → spreadsheet sync")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch today's workout and write it into the spreadsheet
    Run,
    /// Parse a workout page and print what a run would write, without
    /// touching the spreadsheet or sending mail
    Preview {
        /// Local HTML file to parse instead of fetching the page
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Print the weekly split definition from the page
    Split,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => run().await,
        Commands::Preview { file } => preview(file).await,
        Commands::Split => split().await,
    }
}

async fn run() -> Result<()> {
    let cfg = Config::from_env()?;
    let http = reqwest::Client::new();

    let html = fetch::fetch_page(&http, &cfg).await?;
    let (title, workout) = parser::parse_workout(&html)?;
    info!("Extracted {} exercises for {:?}", workout.len(), title);
    if workout.is_empty() {
        warn!("No exercises extracted; writing header only");
    }

    let today = Local::now().date_naive();
    let client = SheetsClient::new(http.clone(), &cfg);
    let mut worksheet = client.select_worksheet(&title, &cfg.first_day, today).await?;

    let errors = writer::fill(&mut worksheet, &title, &workout, today).await?;
    if errors {
        warn!("Layout check found a gap in the written rows");
        match &cfg.mail {
            Some(mail) => {
                let notifier = Notifier::new(HttpMailer::new(http.clone(), mail), mail);
                notifier
                    .notify(
                        "Workout sheet needs a look",
                        "There is something wrong with today's workout sheet.",
                    )
                    .await;
            }
            None => warn!("Mail not configured; skipping alert"),
        }
    }

    println!(
        "Workout saved to {:?} ({} exercises).",
        worksheet.title,
        workout.len()
    );
    Ok(())
}

async fn preview(file: Option<PathBuf>) -> Result<()> {
    let html = match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let cfg = Config::from_env()?;
            let http = reqwest::Client::new();
            fetch::fetch_page(&http, &cfg).await?
        }
    };

    let (title, workout) = parser::parse_workout(&html)?;
    let today = Local::now().date_naive();

    let mut grid = MemoryGrid::new();
    let errors = writer::fill(&mut grid, &title, &workout, today).await?;

    println!("{}", grid.render());
    if errors {
        println!("Layout check: FAILED (a live run would send an alert)");
    } else {
        println!("Layout check: ok ({} exercises)", workout.len());
    }
    Ok(())
}

async fn split() -> Result<()> {
    let cfg = Config::from_env()?;
    let http = reqwest::Client::new();

    let html = fetch::fetch_page(&http, &cfg).await?;
    let block = parser::parse_split(&html)?;

    if let Some(heading) = &block.heading {
        println!("{}", heading.trim());
    }
    for line in block.fragments.iter().filter(|f| !f.trim().is_empty()) {
        println!("  {}", line);
    }
    match parser::page::first_split_day(&block) {
        Some(day) => println!("First day: {}", day),
        None => warn!("Could not determine the first split day"),
    }
    Ok(())
}
