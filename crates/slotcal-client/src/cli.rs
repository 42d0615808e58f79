//! Command-line interface definition.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use slotcal_core::{DateLocale, TracingOutputFormat};

use crate::config::{ClientConfig, ProviderKind};
use crate::error::{ClientError, ClientResult};
use crate::state::FailurePolicy;

/// slotcal - Browse and pick bookable time slots
#[derive(Debug, Parser)]
#[command(name = "slotcal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "SLOTCAL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    // --- Provider flags ---
    /// Data provider to use
    #[arg(long, value_enum, env = "SLOTCAL_PROVIDER")]
    pub provider: Option<ProviderKind>,

    /// Base URL of the booking backend
    #[arg(long, env = "SLOTCAL_BASE_URL")]
    pub base_url: Option<String>,

    /// Slot endpoint, absolute or relative to the base URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Extra request header as NAME=VALUE (can be repeated)
    #[arg(long, value_parser = parse_header, action = clap::ArgAction::Append)]
    pub header: Vec<(String, String)>,

    /// Seed for the static provider
    #[arg(long)]
    pub seed: Option<u64>,

    /// Simulated latency of the static provider in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    // --- Query flags ---
    /// Shop to show slots for
    #[arg(long, env = "SLOTCAL_SHOP_ID")]
    pub shop_id: Option<u64>,

    /// Menu item to book (can be repeated)
    #[arg(long, action = clap::ArgAction::Append)]
    pub menu_item: Vec<u64>,

    /// Only show slots of this staff member
    #[arg(long)]
    pub staff_id: Option<u64>,

    /// Reservation being rescheduled
    #[arg(long)]
    pub reservation_id: Option<u64>,

    // --- Calendar flags ---
    /// Date inside the week to show (YYYY-MM-DD, default today)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Weeks to move from the date, negative to go back
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub weeks_ahead: i32,

    /// What to do with the shown week when loading fails
    #[arg(long, value_parser = parse_failure_policy)]
    pub failure_policy: Option<FailurePolicy>,

    /// Pick the slot at DAY:SLOT (zero-based) after loading
    #[arg(long, value_parser = parse_cell)]
    pub select: Option<(usize, usize)>,

    /// Language of dates in the output
    #[arg(long, value_enum, default_value_t = Locale::Ja)]
    pub locale: Locale,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Writes command-line overrides into `config`.
    pub fn apply_overrides(&self, config: &mut ClientConfig) {
        if let Some(provider) = self.provider {
            config.provider = provider;
        }
        if self.base_url.is_some() {
            config.api.base_url = self.base_url.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.api.endpoint = endpoint.clone();
        }
        config.api.headers.extend(self.header.iter().cloned());

        if self.seed.is_some() {
            config.static_data.seed = self.seed;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.static_data.delay_ms = delay_ms;
        }

        if let Some(shop_id) = self.shop_id {
            config.calendar.shop_id = shop_id;
        }
        if !self.menu_item.is_empty() {
            config.calendar.menu_item_ids = self.menu_item.clone();
        }
        if self.staff_id.is_some() {
            config.calendar.staff_id = self.staff_id;
        }
        if self.reservation_id.is_some() {
            config.calendar.reservation_id = self.reservation_id;
        }
        if let Some(policy) = self.failure_policy {
            config.calendar.failure_policy = policy;
        }
        config.debug |= self.debug;
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormat> for TracingOutputFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
            LogFormat::Json => Self::Json,
        }
    }
}

/// Date language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Locale {
    Ja,
    En,
}

impl From<Locale> for DateLocale {
    fn from(locale: Locale) -> Self {
        match locale {
            Locale::Ja => Self::Ja,
            Locale::En => Self::En,
        }
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump the effective configuration
    Dump,
    /// Validate the configuration
    Validate,
    /// Show the configuration file path
    Path,
}

fn parse_header(value: &str) -> Result<(String, String), String> {
    let (name, value) = value
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", value))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("header name must not be empty".to_string());
    }
    Ok((name.to_string(), value.to_string()))
}

fn parse_cell(value: &str) -> Result<(usize, usize), String> {
    let (day, slot) = value
        .split_once(':')
        .ok_or_else(|| format!("expected DAY:SLOT, got '{}'", value))?;
    let day: usize = day.parse().map_err(|e| format!("invalid day '{}': {}", day, e))?;
    let slot: usize = slot.parse().map_err(|e| format!("invalid slot '{}': {}", slot, e))?;
    if day > 6 {
        return Err(format!("day must be between 0 and 6, got {}", day));
    }
    Ok((day, slot))
}

fn parse_failure_policy(value: &str) -> Result<FailurePolicy, String> {
    value.parse()
}

/// Loads the configuration named by `--config`, or the default one.
pub fn load_config(cli: &Cli) -> ClientResult<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::load_from(path),
        None => ClientConfig::load(),
    }
    .map_err(|e| ClientError::Config(e.to_string()))?;
    cli.apply_overrides(&mut config);
    Ok(config)
}
