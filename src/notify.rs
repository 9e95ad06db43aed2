//! Telegram notifications for new postings

use crate::config::TelegramConfig;
use crate::error::{Result, ScoutError};
use crate::fetch::retry_backoff;
use crate::listing::JobPosting;
use chrono::{DateTime, Local};
use log::{info, warn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Where run results are pushed
pub trait Notifier {
    fn notify_posting(&self, posting: &JobPosting) -> impl Future<Output = Result<()>> + Send;

    fn notify_completion(&self, new_jobs: usize) -> impl Future<Output = Result<()>> + Send;
}

pub struct TelegramNotifier {
    client: Client,
    endpoint: String,
    chat_id: String,
    message_delay: Duration,
    max_retries: usize,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    description: Option<String>,
    parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
struct ResponseParameters {
    retry_after: Option<u64>,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        if config.bot_token.trim().is_empty() {
            return Err(ScoutError::Configuration("missing Telegram bot token".to_string()));
        }
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        let endpoint = format!(
            "{}/bot{}/sendMessage",
            config.api_base.trim_end_matches('/'),
            config.bot_token.trim()
        );

        Ok(Self {
            client,
            endpoint,
            chat_id: config.chat_id.clone(),
            message_delay: Duration::from_millis(config.message_delay_ms),
            max_retries: config.max_retries.max(1),
        })
    }

    async fn send_message(&self, text: &str) -> Result<()> {
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: "Markdown",
        };

        let mut attempt = 0usize;
        loop {
            let response = self.client.post(&self.endpoint).json(&payload).send().await?;
            let status = response.status();
            if status.is_success() {
                return Ok(());
            }

            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            let parsed: Option<ErrorResponse> = serde_json::from_str(&body).ok();

            let retryable = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
            if retryable && attempt + 1 < self.max_retries {
                attempt += 1;
                let wait = parsed
                    .as_ref()
                    .and_then(|r| r.parameters.as_ref())
                    .and_then(|p| p.retry_after)
                    .map(Duration::from_secs)
                    .unwrap_or_else(|| retry_backoff(attempt));
                warn!("Telegram answered {}, retrying in {:?}", status, wait);
                tokio::time::sleep(wait).await;
                continue;
            }

            let description = parsed.and_then(|r| r.description).unwrap_or(body);
            return Err(ScoutError::Notification(format!("{}: {}", status, description)));
        }
    }
}

impl Notifier for TelegramNotifier {
    async fn notify_posting(&self, posting: &JobPosting) -> Result<()> {
        self.send_message(&format_posting_message(posting)).await?;
        info!("Sent job to Telegram: {}", posting.title);
        tokio::time::sleep(self.message_delay).await;
        Ok(())
    }

    async fn notify_completion(&self, new_jobs: usize) -> Result<()> {
        self.send_message(&format_completion_message(new_jobs, Local::now())).await?;
        info!("Sent completion message to Telegram");
        Ok(())
    }
}

pub fn format_posting_message(posting: &JobPosting) -> String {
    let or = |value: &Option<String>, fallback: &str| {
        value
            .as_deref()
            .map(escape_markdown)
            .unwrap_or_else(|| fallback.to_string())
    };

    let mut message = format!(
        "*{}*\n🏢 {}\n📍 {}\n📝 Employment: {}\n💰 Salary: {}\n🎯 ATS Score: {}\n",
        escape_markdown(&posting.title),
        or(&posting.company, "Unknown Company"),
        or(&posting.location, "Location not listed"),
        or(&posting.employment_type, "N/A"),
        or(&posting.salary, "N/A"),
        posting.ats_score,
    );
    if let Some(badges) = posting.badges.as_deref().filter(|b| !b.is_empty()) {
        message.push_str(&format!("🏷 {}\n", escape_markdown(badges)));
    }
    message.push_str(&format!("🔗 [Apply here]({})", posting.url));
    message
}

pub fn format_completion_message(new_jobs: usize, now: DateTime<Local>) -> String {
    format!(
        "*JOB SCOUT COMPLETED* ✅\n⏰ {}\n🆕 New Jobs: {}\n📊 Status: SUCCESS",
        now.format("%B %d, %Y -- %I:%M %p"),
        new_jobs
    )
}

/// Escape the characters legacy Telegram Markdown treats as markup
fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
