use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs as async_fs;

// Import shared types
use ecoscore_types::*;

#[derive(Parser)]
#[command(name = "ecoscore")]
#[command(about = "A sustainability scoring CLI for product descriptions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend server URL
    #[arg(long, default_value = "http://localhost:5001")]
    server: String,

    /// Timeout for requests in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a product described in a JSON file
    Score {
        /// JSON file with the product description
        file: PathBuf,

        /// Output format (json or text)
        #[arg(long, default_value = "text")]
        output: OutputFormat,
    },
    /// List all scored submissions, newest first
    History,
    /// Show aggregate statistics across all submissions
    Summary,
    /// Clear all recorded submissions
    Clear,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Json,
    Text,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "text" => Ok(OutputFormat::Text),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(cli.timeout))
        .build()
        .context("Failed to create HTTP client")?;

    match cli.command {
        Commands::Score { file, output } => {
            score_product(&client, &cli.server, &file, output).await?;
        }
        Commands::History => {
            show_history(&client, &cli.server).await?;
        }
        Commands::Summary => {
            show_summary(&client, &cli.server).await?;
        }
        Commands::Clear => {
            clear_submissions(&client, &cli.server).await?;
        }
    }

    Ok(())
}

async fn read_error(response: reqwest::Response) -> Result<()> {
    let status = response.status();
    if let Ok(error) = response.json::<ErrorResponse>().await {
        bail!("Server returned {}: {}", status, error.error);
    }
    bail!("Server returned {}", status);
}

async fn score_product(
    client: &reqwest::Client,
    server: &str,
    file_path: &Path,
    output: OutputFormat,
) -> Result<()> {
    let contents = async_fs::read_to_string(file_path)
        .await
        .with_context(|| format!("Failed to read product file: {}", file_path.display()))?;

    let product: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid JSON in {}", file_path.display()))?;

    let response = client
        .post(format!("{}/score", server))
        .json(&product)
        .send()
        .await
        .context("Failed to reach the backend")?;

    if !response.status().is_success() {
        return read_error(response).await;
    }

    let score: ScoreResponse = response
        .json()
        .await
        .context("Failed to parse score response")?;

    match output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&score)?);
        }
        OutputFormat::Text => {
            println!(
                "🌱 {}: {}/100 (rating {})",
                score.product_name, score.sustainability_score, score.rating
            );
            if !score.issues.is_empty() {
                println!("⚠️  Issues:");
                for issue in &score.issues {
                    println!("   - {}", issue);
                }
            }
            if !score.suggestions.is_empty() {
                println!("💡 Suggestions:");
                for suggestion in &score.suggestions {
                    println!("   - {}", suggestion);
                }
            }
        }
    }

    Ok(())
}

async fn show_history(client: &reqwest::Client, server: &str) -> Result<()> {
    let response = client
        .get(format!("{}/history", server))
        .send()
        .await
        .context("Failed to reach the backend")?;

    if !response.status().is_success() {
        return read_error(response).await;
    }

    let history: HistoryResponse = response
        .json()
        .await
        .context("Failed to parse history response")?;

    println!("📋 {} submissions", history.count);
    for submission in &history.submissions {
        println!(
            "   {}  {}  {}/100 ({})",
            submission.timestamp.format("%Y-%m-%d %H:%M:%S"),
            submission.product_name,
            submission.score,
            submission.rating
        );
    }

    Ok(())
}

async fn show_summary(client: &reqwest::Client, server: &str) -> Result<()> {
    let response = client
        .get(format!("{}/score-summary", server))
        .send()
        .await
        .context("Failed to reach the backend")?;

    if !response.status().is_success() {
        return read_error(response).await;
    }

    let summary: SummaryResponse = response
        .json()
        .await
        .context("Failed to parse summary response")?;

    println!(
        "📊 {} products, average score {}",
        summary.total_products, summary.average_score
    );
    for (rating, count) in &summary.ratings {
        println!("   {}: {}", rating, count);
    }
    if let Some(distribution) = summary.distribution {
        println!(
            "   min {} / median {} / max {} (std dev {})",
            distribution.min_score,
            distribution.median_score,
            distribution.max_score,
            distribution.std_dev
        );
    }
    if !summary.top_issues.is_empty() {
        println!("⚠️  Top issues:");
        for issue in &summary.top_issues {
            println!("   {}x {}", issue.count, issue.issue);
        }
    }

    Ok(())
}

async fn clear_submissions(client: &reqwest::Client, server: &str) -> Result<()> {
    let response = client
        .post(format!("{}/clear", server))
        .send()
        .await
        .context("Failed to reach the backend")?;

    if !response.status().is_success() {
        return read_error(response).await;
    }

    let cleared: ClearResponse = response
        .json()
        .await
        .context("Failed to parse clear response")?;

    println!("🧹 {}", cleared.message);
    Ok(())
}
