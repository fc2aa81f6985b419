//! CLI administration tool for country-redirect.
//!
//! Edits the settings file directly, so no running server or admin token is
//! needed. A running server picks the changes up on its next request.
//!
//! # Usage
//!
//! ```bash
//! # Add a rule
//! cargo run --bin admin -- rules add --country ES --url https://example.com/es
//!
//! # List rules
//! cargo run --bin admin -- rules list
//!
//! # Change the cookie lifetime
//! cargo run --bin admin -- settings set --cookie-days 30
//!
//! # Dry-run a visit
//! cargo run --bin admin -- check --country ES
//!
//! # Generate an admin API token
//! cargo run --bin admin -- token generate
//! ```
//!
//! # Environment Variables
//!
//! - `SETTINGS_PATH`: settings file (default: `settings.json`)
//! - `SITE_URL`, `FRONT_PAGE_PATH`, `COUNTRY_HEADER`, `COOKIE_PREFIX`,
//!   `ADMIN_PATH_PREFIXES`: used by `check`, same meaning as for the server

use country_redirect::api::middleware::geo_redirect::{path_only, request_context};
use country_redirect::application::services::{RuleInput, SettingsService, SettingsUpdate};
use country_redirect::config::Config;
use country_redirect::domain::engine::RedirectEngine;
use country_redirect::domain::entities::{Decision, RedirectSettings};
use country_redirect::domain::repositories::SettingsRepository;
use country_redirect::infrastructure::persistence::JsonFileSettingsRepository;

use anyhow::{Context, Result};
use axum::http::{HeaderMap, HeaderValue, header};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::path::PathBuf;
use std::sync::Arc;

/// CLI tool for managing country redirects.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (overrides SETTINGS_PATH)
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage redirect rules
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },

    /// Show or change general settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Show what would happen for a visit
    Check {
        /// Country header value (e.g. ES)
        #[arg(short, long)]
        country: Option<String>,

        /// Request path
        #[arg(short, long, default_value = "/")]
        path: String,

        /// User-Agent header value
        #[arg(short, long)]
        user_agent: Option<String>,

        /// Pretend the visitor already has the redirect cookie
        #[arg(long)]
        cookie: bool,
    },

    /// Admin API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

/// Rule management subcommands.
#[derive(Subcommand)]
enum RulesAction {
    /// List rules in evaluation order
    List,

    /// Append a rule
    Add {
        /// Two-letter country code
        #[arg(short, long)]
        country: String,

        /// Target URL on the site, absolute or starting with `/`
        #[arg(short, long)]
        url: String,
    },

    /// Remove every rule for a country
    Remove {
        country: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Remove all rules
    Clear {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// General settings subcommands.
#[derive(Subcommand)]
enum SettingsAction {
    /// Show current settings
    Show,

    /// Change settings
    Set {
        /// Lifetime of the redirect cookie in days
        #[arg(long)]
        cookie_days: Option<i64>,

        /// Turn redirects on or off
        #[arg(long)]
        enabled: Option<bool>,
    },
}

/// Token subcommands.
#[derive(Subcommand)]
enum TokenAction {
    /// Generate a random token for ADMIN_TOKEN
    Generate {
        /// Print only the token
        #[arg(long)]
        raw: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Token { action } => handle_token_action(action),
        command => run_settings_command(command, cli.settings).await,
    }
}

/// Runs a command against the settings file.
async fn run_settings_command(command: Commands, settings: Option<PathBuf>) -> Result<()> {
    let config = Config::from_env()?;
    let path = settings
        .or_else(|| config.settings_path.clone())
        .unwrap_or_else(|| PathBuf::from("settings.json"));

    let repository = JsonFileSettingsRepository::open(&path)
        .await
        .with_context(|| format!("Failed to open settings file {}", path.display()))?;
    let repository: Arc<dyn SettingsRepository> = Arc::new(repository);
    let service = SettingsService::new(repository);

    match command {
        Commands::Rules { action } => handle_rules_action(action, &service).await?,
        Commands::Settings { action } => handle_settings_action(action, &service).await?,
        Commands::Check {
            country,
            path,
            user_agent,
            cookie,
        } => check(&config, &service, country, &path, user_agent, cookie).await?,
        Commands::Token { action } => handle_token_action(action)?,
    }

    Ok(())
}

/// Dispatches rule management commands.
async fn handle_rules_action(action: RulesAction, service: &SettingsService) -> Result<()> {
    match action {
        RulesAction::List => list_rules(service).await,
        RulesAction::Add { country, url } => {
            let rule = service.add_rule(RuleInput::new(country, url)).await?;

            println!(
                "{} {} {} {}",
                "✅ Rule added:".green().bold(),
                rule.country.cyan(),
                "→".bright_black(),
                rule.url.bright_white()
            );
            Ok(())
        }
        RulesAction::Remove { country, yes } => {
            if !yes && !confirm(&format!("Remove all rules for {}?", country.to_uppercase()))? {
                println!("{}", "❌ Cancelled".red());
                return Ok(());
            }

            let removed = service.remove_country(&country).await?;
            println!(
                "{} {} rule(s) removed",
                "✅".green(),
                removed.to_string().bright_white().bold()
            );
            Ok(())
        }
        RulesAction::Clear { yes } => {
            if !yes && !confirm("Remove ALL rules?")? {
                println!("{}", "❌ Cancelled".red());
                return Ok(());
            }

            service
                .update(SettingsUpdate {
                    rules: Some(Vec::new()),
                    ..SettingsUpdate::default()
                })
                .await?;
            println!("{}", "✅ All rules removed".green().bold());
            Ok(())
        }
    }
}

/// Lists rules with their target paths.
///
/// # Output Format
///
/// ```text
/// 📋 Redirect Rules
///
///   #   Country  Target      URL
///   ──────────────────────────────────────────────────────
///   1   ES       /es         https://example.com/es
/// ```
async fn list_rules(service: &SettingsService) -> Result<()> {
    println!("{}", "📋 Redirect Rules".bright_blue().bold());
    println!();

    let settings = service.snapshot().await?;

    if settings.rules.is_empty() {
        println!("{}", "  No rules configured".yellow());
        println!();
        println!(
            "  Add one with: {} admin rules add --country ES --url /es",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<3} {:<8} {:<20} {}",
        "#".bright_white().bold(),
        "Country".bright_white().bold(),
        "Target".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for (i, rule) in settings.rules.iter().enumerate() {
        println!(
            "  {:<3} {:<8} {:<20} {}",
            (i + 1).to_string().bright_black(),
            rule.country.to_string().cyan(),
            format!("/{}", rule.target_path),
            rule.url.bright_black()
        );
    }

    println!();
    println!(
        "  Total: {}",
        settings.rules.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Dispatches general settings commands.
async fn handle_settings_action(action: SettingsAction, service: &SettingsService) -> Result<()> {
    match action {
        SettingsAction::Show => {
            let stored = service.stored().await?;
            print_settings(service, &RedirectSettings::from_stored(&stored));

            if let Some(updated_at) = stored.updated_at {
                println!(
                    "  Updated:     {}",
                    updated_at
                        .format("%Y-%m-%d %H:%M:%S UTC")
                        .to_string()
                        .bright_black()
                );
            }
            println!();
        }
        SettingsAction::Set {
            cookie_days,
            enabled,
        } => {
            if cookie_days.is_none() && enabled.is_none() {
                anyhow::bail!("Nothing to change, pass --cookie-days and/or --enabled");
            }

            let outcome = service
                .update(SettingsUpdate {
                    rules: None,
                    cookie_days,
                    redirect_enabled: enabled,
                })
                .await?;

            println!("{}", "✅ Settings updated".green().bold());
            println!();
            print_settings(service, &RedirectSettings::from_stored(&outcome.settings));
            println!();
        }
    }

    Ok(())
}

fn print_settings(service: &SettingsService, settings: &RedirectSettings) {
    println!("{}", "⚙️  Settings".bright_blue().bold());
    println!();
    println!("  Store:       {}", service.describe().bright_white());
    println!(
        "  Redirects:   {}",
        if settings.redirect_enabled {
            "ENABLED".green()
        } else {
            "DISABLED".red()
        }
    );
    println!(
        "  Cookie days: {}",
        settings.cookie_days.to_string().bright_white().bold()
    );
    println!(
        "  Rules:       {}",
        settings.rules.len().to_string().bright_white().bold()
    );
}

/// Dry-runs the redirect decision for a simulated visit.
async fn check(
    config: &Config,
    service: &SettingsService,
    country: Option<String>,
    path: &str,
    user_agent: Option<String>,
    cookie: bool,
) -> Result<()> {
    config.validate()?;
    let site = config.site_options()?;
    let engine = RedirectEngine::new(config.parsed_site_url()?);

    let mut headers = HeaderMap::new();
    if let Some(country) = country {
        headers.insert(site.country_header.clone(), HeaderValue::from_str(&country)?);
    }
    if let Some(user_agent) = user_agent {
        headers.insert(header::USER_AGENT, HeaderValue::from_str(&user_agent)?);
    }
    if cookie {
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("{}=1", site.cookie_name))?,
        );
    }

    let ctx = request_context(&site, path_only(path), &headers);
    let settings = service.snapshot().await?;

    println!("{}", "🔍 Redirect check".bright_blue().bold());
    println!();

    match engine.decide(&ctx, &settings) {
        Decision::Redirect {
            country,
            location,
            cookie_max_age,
        } => {
            println!(
                "  {} {} {} {}",
                "REDIRECT".green().bold(),
                country.to_string().cyan(),
                "→".bright_black(),
                location.bright_white()
            );
            println!(
                "  Cookie {} for {}s",
                site.cookie_name.bright_black(),
                cookie_max_age
            );
        }
        Decision::Skip(reason) => {
            println!(
                "  {} {} ({})",
                "SKIP".yellow().bold(),
                reason.as_str().bright_white(),
                reason.description()
            );
        }
    }
    println!();

    Ok(())
}

/// Handles token commands.
fn handle_token_action(action: TokenAction) -> Result<()> {
    match action {
        TokenAction::Generate { raw } => {
            let token = generate_token();

            if raw {
                println!("{token}");
                return Ok(());
            }

            println!("{}", "🔑 Admin API Token".bright_blue().bold());
            println!();
            println!("  {}", token.bright_yellow().bold());
            println!();
            println!("{}", "Set it on the server:".bright_white());
            println!("  {}={}", "ADMIN_TOKEN".bright_cyan(), token);
            println!();
            println!("{}", "Example:".bright_white());
            println!(
                "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/settings",
                token.bright_yellow()
            );
            println!();
        }
    }

    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

/// Generates a cryptographically random token.
///
/// 32 random bytes, base64url without padding (43 characters).
fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    URL_SAFE_NO_PAD.encode(bytes)
}
