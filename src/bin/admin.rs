//! CLI administration tool for linktrack.
//!
//! Creates links, reads click totals and applies migrations directly against
//! the database, without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL
//! cargo run --bin admin -- create --url https://example.com/some/path
//!
//! # Click total for a code
//! cargo run --bin admin -- stats --code aB3xY9
//!
//! # List every link
//! cargo run --bin admin -- list
//!
//! # Apply pending migrations
//! cargo run --bin admin -- migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `BASE_URL` (optional): Public prefix for printed short URLs

use linktrack::application::services::LinkService;
use linktrack::config::{self, Config};
use linktrack::domain::repositories::{ClickSink, LinkStore};
use linktrack::error::AppError;
use linktrack::server::{Stores, connect_pool, run_migrations};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;

/// CLI tool for managing linktrack.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a short link
    Create {
        /// Absolute http(s) URL to shorten
        #[arg(short, long)]
        url: String,
    },

    /// Show the click total for a short code
    Stats {
        /// Short code (case-sensitive)
        #[arg(short, long)]
        code: String,
    },

    /// List all links
    List,

    /// Apply database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    let database_url = config
        .database_url
        .clone()
        .context("DATABASE_URL must be set")?;

    let pool = connect_pool(&config, &database_url).await?;

    if let Commands::Migrate = cli.command {
        run_migrations(&pool).await?;
        println!("{}", "✅ Migrations applied".green().bold());
        return Ok(());
    }

    let stores = Stores::postgres(pool);
    let service = LinkService::new(stores.links, stores.clicks);

    match cli.command {
        Commands::Create { url } => create_link(&service, &config, &url).await?,
        Commands::Stats { code } => show_stats(&service, &code).await?,
        Commands::List => list_links(&service, &config).await?,
        Commands::Migrate => {}
    }

    Ok(())
}

type Service = LinkService<dyn LinkStore, dyn ClickSink>;

async fn create_link(service: &Service, config: &Config, url: &str) -> Result<()> {
    match service.create_link(url).await {
        Ok(link) => {
            println!("{}", "✅ Link created".green().bold());
            println!();
            println!("  Code:      {}", link.short_code.cyan());
            println!("  Long URL:  {}", link.long_url);
            println!(
                "  Short URL: {}",
                service
                    .short_url(&config.base_url, &link.short_code)
                    .bright_yellow()
                    .bold()
            );
            Ok(())
        }
        Err(AppError::InvalidInput { message, details }) => {
            anyhow::bail!("{}: {}", message, details)
        }
        Err(e) => Err(e).context("Failed to create link"),
    }
}

async fn show_stats(service: &Service, code: &str) -> Result<()> {
    match service.get_link_stats(code).await {
        Ok(stats) => {
            println!("{}", "📊 Link statistics".bright_blue().bold());
            println!();
            println!("  Code:         {}", stats.link.short_code.cyan());
            println!("  Long URL:     {}", stats.link.long_url);
            println!(
                "  Created:      {}",
                stats.link.created_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
            println!(
                "  Total clicks: {}",
                stats.total_clicks.to_string().bright_yellow().bold()
            );
            Ok(())
        }
        Err(AppError::NotFound { .. }) => {
            println!("{} {}", "❌ No link with code".red(), code.bold());
            Ok(())
        }
        Err(e) => Err(e).context("Failed to load statistics"),
    }
}

async fn list_links(service: &Service, config: &Config) -> Result<()> {
    let links = service.list_links().await.context("Failed to list links")?;

    println!("{}", "📋 Links".bright_blue().bold());
    println!();

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        println!();
        return Ok(());
    }

    for link in &links {
        println!(
            "  {}  {}  {}",
            link.short_code.cyan(),
            service
                .short_url(&config.base_url, &link.short_code)
                .dimmed(),
            link.long_url
        );
    }

    println!();
    println!("  {} link(s)", links.len().to_string().bold());

    Ok(())
}
