//! Summitcast - adventure forecasts from the command line.
//!
//! Prints seven-day activity forecasts, current conditions and location
//! suggestions, manages activity alerts, and stores the completion service
//! API key.

mod output;

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Result;
use summitcast_core::auth::CredentialStore;
use summitcast_core::ai::UnconfiguredService;
use summitcast_core::models::{AlertDraft, ALERT_ACTIVITIES};
use summitcast_core::{
    check_alerts, current_conditions, suggest_locations, CompletionService, Config, EntityStore,
    FileStore, ForecastCache, HttpCompletionClient,
};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Directory for an additional daily log file, if set.
const LOG_DIR_ENV: &str = "SUMMITCAST_LOG_DIR";

const USAGE: &str = "\
Usage: summitcast <command> [args]

Commands:
  forecast [LOCATION] [--json] [--detail]   7-day adventure forecast
  now [LOCATION] [--insights] [--json]      current conditions
  suggest QUERY                             location suggestions
  alerts                                    list saved alerts
  alerts add [ACTIVITY] [LOCATION]          alert with the activity's default thresholds
  alerts toggle ID                          turn an alert on or off
  alerts check                              forecast days matching active alerts
  activities [ACTIVITY...]                  show or set preferred activities
  set-location LOCATION                     save the default location
  set-endpoint URL                          save the completion service URL
  login                                     store the completion API key
  logout                                    remove the stored API key
";

/// Initialize the tracing subscriber for logging
fn init_tracing() -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match std::env::var(LOG_DIR_ENV) {
        Ok(dir) if !dir.trim().is_empty() => {
            let appender = tracing_appender::rolling::daily(dir, "summitcast.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _log_guard = init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        eprint!("{}", USAGE);
        return Ok(());
    };
    let rest = &args[1..];

    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };

    match command.as_str() {
        "forecast" => forecast(&config, rest).await,
        "now" => now(&config, rest).await,
        "suggest" => suggest(&config, rest).await,
        "alerts" => alerts(&config, rest).await,
        "activities" => activities(&config, rest),
        "set-location" => {
            let location = positional(rest)
                .ok_or_else(|| anyhow::anyhow!("Usage: summitcast set-location LOCATION"))?;
            config.default_location = Some(location.clone());
            config.save()?;
            println!("Default location set to {}", location);
            Ok(())
        }
        "set-endpoint" => {
            let endpoint = positional(rest)
                .ok_or_else(|| anyhow::anyhow!("Usage: summitcast set-endpoint URL"))?;
            config.ai_endpoint = Some(endpoint.clone());
            config.save()?;
            println!("Completion endpoint set to {}", endpoint);
            Ok(())
        }
        "login" => login(),
        "logout" => {
            CredentialStore::delete_api_key()?;
            println!("API key removed");
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print!("{}", USAGE);
            Ok(())
        }
        other => {
            eprint!("Unknown command: {}\n\n{}", other, USAGE);
            std::process::exit(2);
        }
    }
}

/// Non-flag arguments joined with spaces, so locations need no quoting.
fn positional(args: &[String]) -> Option<String> {
    let words: Vec<&str> = args
        .iter()
        .filter(|a| !a.starts_with("--"))
        .map(String::as_str)
        .collect();
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// Completion client from config, or a stand-in that always fails so every
/// command still answers with placeholder data.
fn completion_service(config: &Config) -> Arc<dyn CompletionService> {
    let Some(endpoint) = config.endpoint() else {
        warn!("No completion endpoint configured");
        return Arc::new(UnconfiguredService);
    };

    match HttpCompletionClient::new(endpoint) {
        Ok(client) => match CredentialStore::resolve_api_key() {
            Some(key) => Arc::new(client.with_token(key)),
            None => Arc::new(client),
        },
        Err(e) => {
            warn!(error = %e, "Failed to create completion client");
            Arc::new(UnconfiguredService)
        }
    }
}

async fn forecast(config: &Config, args: &[String]) -> Result<()> {
    let location = positional(args).unwrap_or_else(|| config.preferred_location());
    let store = FileStore::new(config.cache_dir()?)?;
    let cache = ForecastCache::new(Arc::new(store), completion_service(config));

    let outcome = cache.forecast(&location).await;
    info!(location = %location, source = outcome.source(), days = outcome.days().len(), "Forecast ready");

    if has_flag(args, "--json") {
        println!("{}", serde_json::to_string_pretty(outcome.days())?);
        return Ok(());
    }

    let age = cache
        .cache_age(&location, chrono::Utc::now())
        .filter(|_| !outcome.is_fallback());
    match age {
        Some(age) => println!("Forecast for {} ({}, fetched {})", location, outcome.source(), age),
        None => println!("Forecast for {} ({})", location, outcome.source()),
    }

    let detail = has_flag(args, "--detail");
    for day in outcome.days() {
        println!("{}", output::forecast_line(day, config.temperature_unit));
        if detail {
            for line in output::activity_lines(day) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

async fn now(config: &Config, args: &[String]) -> Result<()> {
    let location = positional(args).unwrap_or_else(|| config.preferred_location());
    let include_insights = config.insights_enabled || has_flag(args, "--insights");
    let service = completion_service(config);

    let outcome = current_conditions(service.as_ref(), &location, include_insights).await;
    if outcome.is_fallback() {
        warn!(location = %location, "Showing placeholder conditions");
    }

    if has_flag(args, "--json") {
        println!("{}", serde_json::to_string_pretty(outcome.conditions())?);
        return Ok(());
    }

    for line in output::conditions_lines(outcome.conditions(), config.temperature_unit) {
        println!("{}", line);
    }
    Ok(())
}

async fn suggest(config: &Config, args: &[String]) -> Result<()> {
    let query = positional(args)
        .ok_or_else(|| anyhow::anyhow!("Usage: summitcast suggest QUERY"))?;
    let service = completion_service(config);

    let suggestions = suggest_locations(service.as_ref(), &query).await;
    if suggestions.is_empty() {
        eprintln!("No suggestions for \"{}\"", query);
    }
    for suggestion in suggestions {
        println!("{}", suggestion);
    }
    Ok(())
}

fn entity_store(config: &Config) -> Result<EntityStore> {
    let store = FileStore::new(config.data_dir()?)?;
    Ok(EntityStore::new(Arc::new(store)))
}

async fn alerts(config: &Config, args: &[String]) -> Result<()> {
    let entities = entity_store(config)?;

    match args.first().map(String::as_str) {
        None | Some("list") => {
            let alerts = entities.list_alerts()?;
            if alerts.is_empty() {
                println!("No alerts yet. Create one with `summitcast alerts add ACTIVITY`.");
            }
            for alert in &alerts {
                println!("{}", output::alert_line(alert));
            }
        }
        Some("add") => {
            let rest = &args[1..];
            let (activity, location) = match rest.first() {
                Some(first) if ALERT_ACTIVITIES.contains(&first.to_lowercase().as_str()) => {
                    (first.to_lowercase(), positional(&rest[1..]))
                }
                _ => {
                    let preferred = entities.preferences()?.preferred_activities;
                    let activity = preferred.into_iter().next().ok_or_else(|| {
                        anyhow::anyhow!(
                            "Usage: summitcast alerts add ACTIVITY [LOCATION] (one of: {})",
                            ALERT_ACTIVITIES.join(", ")
                        )
                    })?;
                    (activity, positional(rest))
                }
            };
            let location = location.unwrap_or_else(|| config.preferred_location());
            let alert = entities.create_alert(AlertDraft::quick(location, activity), chrono::Utc::now())?;
            println!("Created {}", output::alert_line(&alert));
        }
        Some("toggle") => {
            let id = args
                .get(1)
                .ok_or_else(|| anyhow::anyhow!("Usage: summitcast alerts toggle ID"))?;
            let alert = entities.toggle_alert(id)?;
            println!("{}", output::alert_line(&alert));
        }
        Some("check") => {
            let alerts = entities.list_alerts()?;
            let store = FileStore::new(config.cache_dir()?)?;
            let cache = ForecastCache::new(Arc::new(store), completion_service(config));

            let matches = check_alerts(&cache, &alerts, chrono::Utc::now()).await;
            if matches.is_empty() {
                println!("No active alert matches the forecast");
            }
            for m in &matches {
                println!("{}: {}", output::alert_line(&m.alert), m.dates.join(", "));
            }
        }
        Some(other) => {
            return Err(anyhow::anyhow!("Unknown alerts command: {}", other));
        }
    }
    Ok(())
}

fn activities(config: &Config, args: &[String]) -> Result<()> {
    let entities = entity_store(config)?;
    let mut preferences = entities.preferences()?;

    if args.is_empty() {
        if preferences.preferred_activities.is_empty() {
            println!("No preferred activities");
        } else {
            println!("{}", preferences.preferred_activities.join(", "));
        }
        return Ok(());
    }

    let mut chosen = Vec::new();
    for arg in args {
        let activity = arg.to_lowercase();
        if !ALERT_ACTIVITIES.contains(&activity.as_str()) {
            return Err(anyhow::anyhow!(
                "Unknown activity {} (one of: {})",
                arg,
                ALERT_ACTIVITIES.join(", ")
            ));
        }
        if !chosen.contains(&activity) {
            chosen.push(activity);
        }
    }

    preferences.preferred_activities = chosen;
    entities.save_preferences(&preferences)?;
    println!("Preferred activities: {}", preferences.preferred_activities.join(", "));
    Ok(())
}

fn login() -> Result<()> {
    print!("Completion API key: ");
    io::stdout().flush()?;
    let key = rpassword::read_password()?;
    let key = key.trim();
    if key.is_empty() {
        return Err(anyhow::anyhow!("API key required"));
    }

    CredentialStore::store_api_key(key)?;
    println!("API key stored in system keychain");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_positional_joins_words_and_skips_flags() {
        assert_eq!(
            positional(&args(&["Salt", "Lake", "City", "--json"])).as_deref(),
            Some("Salt Lake City")
        );
        assert!(positional(&args(&["--json"])).is_none());
        assert!(positional(&[]).is_none());
    }

    #[test]
    fn test_has_flag() {
        assert!(has_flag(&args(&["Denver", "--insights"]), "--insights"));
        assert!(!has_flag(&args(&["Denver"]), "--json"));
    }
}
