mod batch;
mod browser;
mod config;
mod parser;
mod records;
mod subject;

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;

use browser::ChromiumFetcher;
use config::Config;
use records::CourseRecord;

const DEFAULT_INPUT: &str = "subjects.csv";

#[derive(Parser)]
#[command(
    name = "prereq_scraper",
    about = "Scrape subject prerequisites and corequisites from the course catalog"
)]
struct Cli {
    /// CSV with a SUBJECT CODE column (plus SUBJECT NAME, CATEGORY, YEAR to merge)
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    if !cli.input.exists() {
        eprintln!("Error: input file {} not found", cli.input.display());
        std::process::exit(1);
    }

    let config = Config::from_env()?;
    let list = records::read_subjects(&cli.input, &config)?;
    if list.subjects.is_empty() {
        println!("No subjects in {}.", cli.input.display());
    }

    let fetcher = ChromiumFetcher::new(config.browser.clone());
    let (course_records, stats) = batch::run(&fetcher, &list.subjects).await?;
    println!(
        "Done: {} scraped ({} ok, {} errors).",
        stats.total, stats.ok, stats.errors
    );

    records::write_records(&config.output, list.mode, &course_records)?;
    println!("\nData written to {}", config.output.display());

    print_preview(&course_records);

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    Ok(())
}

fn print_preview(records: &[CourseRecord]) {
    println!("\nExtracted Data Preview:");
    for r in records {
        println!("\nSubject: {}", r.subject_code);
        println!("Prerequisites: {}", r.prerequisites.as_deref().unwrap_or("None"));
        println!("Corequisites: {}", r.corequisites.as_deref().unwrap_or("None"));
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
