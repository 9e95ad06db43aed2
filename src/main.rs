//! Job scout: scrape new job postings and score them against a resume

use clap::Parser;
use colored::Colorize;
use job_scout::cli::{self, Cli, Commands, ConfigAction};
use job_scout::config::Config;
use job_scout::error::{Result, ScoutError};
use job_scout::extraction::{extract_keywords, FieldExtractor, JobDescriptionRecord};
use job_scout::fetch::DiceClient;
use job_scout::listing::JobPosting;
use job_scout::notify::TelegramNotifier;
use job_scout::pipeline::{Pipeline, RunSummary};
use job_scout::resume::load_resume;
use job_scout::scoring::{MatchScore, SimilarityScorer};
use job_scout::store::JobStore;
use log::{error, info};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone();
    let config = match Config::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Run { resume, dry_run } => run_cycle(&config, resume, dry_run).await,
        Commands::Extract { job, json } => {
            let record = extract_file(&job).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print_record(&record);
            }
            Ok(())
        }
        Commands::Score { resume, job, json } => score_files(&resume, &job, json).await,
        Commands::Config { action } => {
            let path = config_path.unwrap_or_else(Config::config_path);
            match action.unwrap_or(ConfigAction::Show) {
                ConfigAction::Show => {
                    let text = toml::to_string_pretty(&config)
                        .map_err(|e| ScoutError::Configuration(e.to_string()))?;
                    println!("{}", text);
                }
                ConfigAction::Path => println!("{}", path.display()),
                ConfigAction::Reset => {
                    Config::default().save_to(&path)?;
                    println!("✅ Configuration reset: {}", path.display());
                }
            }
            Ok(())
        }
    }
}

async fn run_cycle(config: &Config, resume: Option<PathBuf>, dry_run: bool) -> Result<()> {
    if !dry_run {
        config.validate()?;
    }

    let resume_path = resume.or_else(|| config.resume.path.clone()).ok_or_else(|| {
        ScoutError::InvalidInput("No resume given; pass --resume or set resume.path in the config".to_string())
    })?;
    let resume_text = load_resume(&resume_path).await?;

    let source = DiceClient::new(&config.search)?;
    let notifier = if config.telegram.enabled && !dry_run {
        Some(TelegramNotifier::new(&config.telegram)?)
    } else {
        None
    };
    let store = JobStore::new(config.storage.output_path.clone());

    info!("Starting scrape of {}", config.search.url);
    let pipeline = Pipeline::new(source, notifier, store)
        .dry_run(dry_run)
        .with_progress(true);
    let (postings, summary) = pipeline.run(&resume_text).await?;

    print_summary(&postings, &summary, &config.storage.output_path, dry_run);
    Ok(())
}

async fn extract_file(job: &Path) -> Result<JobDescriptionRecord> {
    cli::validate_file_extension(job, &["html", "htm"])
        .map_err(|e| ScoutError::InvalidInput(format!("Job page: {}", e)))?;
    let markup = tokio::fs::read_to_string(job).await?;
    Ok(FieldExtractor::new().extract(&markup))
}

#[derive(Serialize)]
struct ScoreOutput {
    record: JobDescriptionRecord,
    keywords: String,
    keyword_coverage: f64,
    contextual_similarity: f64,
    score: f64,
}

async fn score_files(resume: &Path, job: &Path, json: bool) -> Result<()> {
    let resume_text = load_resume(resume).await?;
    let record = extract_file(job).await?;
    let keywords = extract_keywords(&record);
    let breakdown = SimilarityScorer::new().breakdown(&resume_text, &keywords);

    if json {
        let output = ScoreOutput {
            record,
            keywords,
            keyword_coverage: breakdown.keyword_coverage,
            contextual_similarity: breakdown.contextual_similarity,
            score: breakdown.score,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_record(&record);
    println!("\n🔤 Keywords: {}", truncate_text(&keywords, 300));
    println!("\n📈 Score Breakdown:");
    println!("  • Keyword Coverage: {:.1}%", breakdown.keyword_coverage * 100.0);
    println!("  • Contextual Similarity: {:.1}%", breakdown.contextual_similarity * 100.0);
    println!("\n🎯 ATS Score: {}", colored_score(MatchScore::Scored(breakdown.score)));
    Ok(())
}

fn print_record(record: &JobDescriptionRecord) {
    let show = |label: &str, value: &Option<String>| {
        println!("  • {}: {}", label, value.as_deref().unwrap_or("-"));
    };

    println!("{}", "💼 Job Description".bold());
    show("Title", &record.title);
    show("Company", &record.company);
    show("Location", &record.location);
    show("Duration", &record.duration);
    show("Experience", &record.experience);
    show("Employment Type", &record.employment_type);
    if !record.badges.is_empty() {
        println!("  • Badges: {}", record.badges.join(job_scout::extraction::BADGE_SEPARATOR));
    }

    for section in record.sections.iter() {
        println!("\n{}", section.heading.bold());
        for item in &section.items {
            println!("  - {}", item);
        }
    }
}

fn print_summary(postings: &[JobPosting], summary: &RunSummary, output: &Path, dry_run: bool) {
    println!("\n{}", "📊 Run Summary".bold());
    println!("  • Scraped: {}", summary.scraped);
    println!("  • New: {}", summary.new_jobs);
    println!("  • Scored: {} (N/A: {})", summary.scored, summary.unscored);
    if dry_run {
        println!("  • {}", "Dry run: nothing saved or sent".yellow());
    } else {
        println!("  • Notified: {}", summary.notified);
        if summary.new_jobs > 0 {
            println!("💾 Saved to {}", output.display());
        }
    }

    for posting in postings {
        println!(
            "  {} {} ({})",
            colored_score(posting.ats_score),
            truncate_text(&posting.title, 70),
            posting.company.as_deref().unwrap_or("Unknown Company")
        );
    }
}

fn colored_score(score: MatchScore) -> colored::ColoredString {
    let text = score.to_string();
    match score.value() {
        Some(v) if v >= 70.0 => text.green().bold(),
        Some(v) if v >= 40.0 => text.yellow(),
        Some(_) => text.red(),
        None => text.dimmed(),
    }
}

fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_len).collect();
        format!("{}...", truncated)
    }
}
