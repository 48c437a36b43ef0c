//! Hockey travel CLI - computes wake-up and departure times for a game.

mod cli;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing::{error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command, PlanArgs};
use hockey_travel::config::Config;
use hockey_travel::services::create_planner;
use hockey_travel::services::timezone::{format_instant, resolve_zone, to_instant};
use hockey_travel::{GameEvent, TravelPreferences};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs directory - use LOGS_DIR env var or default to ./logs
    let logs_dir = std::env::var("LOGS_DIR").unwrap_or_else(|_| "./logs".to_string());
    std::fs::create_dir_all(&logs_dir).ok();

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &logs_dir, "hockey-travel.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // stdout carries the JSON result, so console logs go to stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,hockey_travel=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    match Cli::parse().command {
        Some(Command::Plan(args)) => run_plan(args).await,
        Some(Command::Zone { indicator, date, time }) => {
            let zone = resolve_zone(Some(&indicator));
            println!("{}", zone.name());
            if let (Some(date), Some(time)) = (date, time) {
                let instant = to_instant(&date, &time, zone)?;
                println!("{}", format_instant(instant, zone));
            }
            Ok(())
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

async fn run_plan(args: PlanArgs) -> Result<()> {
    let config = Config::from_env()?;
    info!("Configuration loaded");

    let planner = create_planner(&config)?;

    let game = match &args.game_file {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str::<GameEvent>(&raw)
                .with_context(|| format!("Failed to parse game from {}", path.display()))?
        }
        None => GameEvent {
            home_team: "Home".to_string(),
            away_team: "Away".to_string(),
            date: args.date.clone().unwrap_or_default(),
            time: args.time.clone().unwrap_or_default(),
            timezone: args.zone.clone(),
            venue: args.venue_name.clone(),
            rink: None,
            season: None,
            division: None,
        },
    };

    let preferences = TravelPreferences {
        home_address: args.home.clone(),
        prep_time_minutes: args.prep_time,
        arrival_buffer_minutes: args.arrival_buffer,
    };

    match planner
        .compose_plan(&game, &preferences, &args.venue_address, args.zone_override.as_deref())
        .await
    {
        Ok(plan) => {
            if let Some(disclaimer) = &plan.disclaimer {
                eprintln!("Note: {}", disclaimer);
            }
            println!("{}", serde_json::to_string_pretty(&plan)?);
            Ok(())
        }
        Err(e) => {
            if let Some(fallback) = e.fallback_error() {
                error!("Fallback also failed: {}", fallback);
            }
            error!("[{}] {}", e.code(), e);
            eprintln!("Sorry, travel time could not be calculated. Try planning the route manually in a maps app.");
            Err(e.into())
        }
    }
}
