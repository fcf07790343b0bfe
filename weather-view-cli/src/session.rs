use anyhow::Context;
use inquire::{InquireError, Text};
use weather_view_core::{
    HttpFetch, LocalStorage, WeatherApp,
    harness::{ClickAction, Suite, TestTrigger},
};

use crate::display::format_results;

/// What a line typed at the prompt asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Search(String),
    ToggleTests,
    RunTests,
    Quit,
}

impl Input {
    fn parse(line: &str) -> Self {
        match line.trim() {
            ":tests" => Input::ToggleTests,
            ":run" => Input::RunTests,
            ":quit" | ":q" => Input::Quit,
            _ => Input::Search(line.to_string()),
        }
    }
}

enum Exit {
    Reload,
    Quit,
}

/// The interactive page: a location prompt plus the suite's trigger.
pub struct Session {
    app: WeatherApp<HttpFetch>,
}

impl Session {
    pub fn new(app: WeatherApp<HttpFetch>) -> Self {
        Self { app }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        loop {
            match self.launch().await? {
                Exit::Reload => {
                    tracing::debug!("reloading session");
                    println!("Reloading...");
                }
                Exit::Quit => return Ok(()),
            }
        }
    }

    async fn launch(&mut self) -> anyhow::Result<Exit> {
        let storage = LocalStorage::open_default()?;
        let mut trigger = TestTrigger::load(storage);

        if trigger.dependencies_ready() {
            self.run_suite(&mut trigger).await;
        }
        println!(
            "[{}] type :tests to toggle, :run to run now, :quit to exit",
            trigger.state().label()
        );

        loop {
            let line = match Text::new("Location:").prompt() {
                Ok(line) => line,
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                    return Ok(Exit::Quit);
                }
                Err(err) => return Err(err).context("Failed to read location"),
            };

            match Input::parse(&line) {
                Input::Quit => return Ok(Exit::Quit),
                Input::ToggleTests => {
                    if trigger.click()? == ClickAction::Reload {
                        return Ok(Exit::Reload);
                    }
                    println!("[{}] busy", trigger.state().label());
                }
                Input::RunTests => {
                    trigger.begin_run();
                    self.run_suite(&mut trigger).await;
                }
                Input::Search(query) => {
                    self.app.set_input_value(query);
                    self.app.submit().await;
                    for line in format_results(self.app.results()) {
                        println!("{line}");
                    }
                }
            }
        }
    }

    async fn run_suite(&self, trigger: &mut TestTrigger) {
        println!("[{}]", trigger.state().label());
        let report = Suite::weather_app()
            .with_utc_offset(self.app.utc_offset())
            .run()
            .await;
        print!("{report}");
        trigger.finish_run();
        println!("[{}]", trigger.state().label());
    }
}
