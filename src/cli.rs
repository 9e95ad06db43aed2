//! CLI interface for the job scout

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "job-scout")]
#[command(about = "Watch a job board and score new postings against your resume")]
#[command(long_about = "Scrape new job postings, score each one against your resume with ATS-style keyword and TF-IDF matching, record them and push them to Telegram")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrape, score, record and notify new postings
    Run {
        /// Resume file (PDF, TXT, MD); overrides resume.path from the config
        #[arg(short, long)]
        resume: Option<PathBuf>,

        /// Score postings without writing the record file or sending messages
        #[arg(long)]
        dry_run: bool,
    },

    /// Extract structured fields from a saved job detail page
    Extract {
        /// Path to the job detail HTML file
        #[arg(short, long)]
        job: PathBuf,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Score a resume against a saved job detail page
    Score {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to the job detail HTML file
        #[arg(short, long)]
        job: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file location
    Path,

    /// Reset configuration to defaults
    Reset,
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
