use anyhow::{Context, bail};
use chrono::FixedOffset;
use clap::{Parser, Subcommand};
use inquire::Password;
use weather_view_core::{
    Config, HttpFetch, LocalStorage, SubmitOutcome, WeatherApp,
    harness::{Suite, TestTrigger},
};

use crate::{display::format_results, session::Session};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-view", version, about = "Look up current weather by location")]
pub struct Cli {
    /// Debug-level logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Render times at this UTC offset (e.g. "+09:00") instead of local time.
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub utc_offset: Option<FixedOffset>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current weather for a location once.
    Search {
        /// Location name, e.g. "tokyo, jp".
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Interactive session; runs the suite first when it is armed.
    Open,

    /// Run the verification suite against stubbed responses.
    Test {
        /// Flip the persisted flag that runs the suite on every `open`.
        #[arg(long)]
        toggle: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Search { ref query } => {
                let config = Config::load()?;
                let mut app = WeatherApp::from_config(HttpFetch::new(), &config)?;
                if self.utc_offset.is_some() {
                    app = app.with_utc_offset(self.utc_offset);
                }

                app.set_input_value(query.join(" "));
                let outcome = app.submit().await;
                for line in format_results(app.results()) {
                    println!("{line}");
                }

                if let SubmitOutcome::Failed(err) = outcome {
                    bail!("search failed: {err}");
                }
                Ok(())
            }
            Command::Open => {
                let config = Config::load()?;
                let offset = match self.utc_offset {
                    Some(offset) => Some(offset),
                    None => config.utc_offset()?,
                };
                let app =
                    WeatherApp::from_config(HttpFetch::new(), &config)?.with_utc_offset(offset);
                Session::new(app).run().await
            }
            Command::Test { toggle } => {
                if toggle {
                    let storage = LocalStorage::open_default()?;
                    let mut trigger = TestTrigger::load(storage);
                    let state = if trigger.toggle()? { "armed" } else { "disarmed" };
                    println!("Suite {state}; it applies from the next `weather-view open`.");
                    return Ok(());
                }

                let offset = match self.utc_offset {
                    Some(offset) => Some(offset),
                    None => Config::load()?.utc_offset()?,
                };
                let report = Suite::weather_app().with_utc_offset(offset).run().await;
                print!("{report}");

                if !report.is_success() {
                    bail!("{} of {} checks failed", report.failed(), report.cases.len());
                }
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_help_message("Get one at https://openweathermap.org/api")
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}
