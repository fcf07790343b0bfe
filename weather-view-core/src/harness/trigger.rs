use anyhow::Result;

use crate::storage::LocalStorage;

/// Storage key that arms the suite for the next launch.
pub const TEST_RUN_KEY: &str = "test-run";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Loading,
    RunTests,
    Running,
    CloseTests,
}

impl ButtonState {
    pub fn label(&self) -> &'static str {
        match self {
            ButtonState::Loading => "Loading Tests",
            ButtonState::RunTests => "Run Tests",
            ButtonState::Running => "Running Tests",
            ButtonState::CloseTests => "Close Tests",
        }
    }

    pub fn enabled(&self) -> bool {
        matches!(self, ButtonState::RunTests | ButtonState::CloseTests)
    }
}

/// What the caller should do after a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    Reload,
    Ignored,
}

/// The opt-in switch for the verification suite.
///
/// The armed flag lives in [`LocalStorage`], so it survives the reload a click
/// triggers. When armed at launch, the suite should start by itself once
/// [`TestTrigger::dependencies_ready`] reports it.
#[derive(Debug)]
pub struct TestTrigger {
    storage: LocalStorage,
    state: ButtonState,
}

impl TestTrigger {
    pub fn load(storage: LocalStorage) -> Self {
        let state = if storage.get_item(TEST_RUN_KEY).is_some() {
            ButtonState::Loading
        } else {
            ButtonState::RunTests
        };
        tracing::debug!(state = state.label(), "test trigger loaded");
        Self { storage, state }
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.storage.get_item(TEST_RUN_KEY).is_some()
    }

    /// Runner, assertions and stub are all linked in, so they are ready as soon as
    /// the trigger exists. Returns whether the suite should start now.
    pub fn dependencies_ready(&mut self) -> bool {
        if self.state != ButtonState::Loading {
            return false;
        }
        self.state = ButtonState::Running;
        true
    }

    pub fn begin_run(&mut self) {
        self.state = ButtonState::Running;
    }

    pub fn finish_run(&mut self) {
        self.state = ButtonState::CloseTests;
    }

    /// Arm on "Run Tests" when not armed, otherwise disarm. Both request a reload.
    pub fn click(&mut self) -> Result<ClickAction> {
        if !self.state.enabled() {
            return Ok(ClickAction::Ignored);
        }

        if !self.is_armed() && self.state == ButtonState::RunTests {
            self.storage.set_item(TEST_RUN_KEY, "true")?;
            tracing::info!("suite armed for next launch");
        } else {
            self.storage.remove_item(TEST_RUN_KEY)?;
            tracing::info!("suite disarmed");
        }

        Ok(ClickAction::Reload)
    }

    /// Flip the persisted flag regardless of the button state. Returns whether
    /// the suite is armed afterwards.
    pub fn toggle(&mut self) -> Result<bool> {
        if self.is_armed() {
            self.storage.remove_item(TEST_RUN_KEY)?;
            self.state = ButtonState::RunTests;
            tracing::info!("suite disarmed");
            Ok(false)
        } else {
            self.storage.set_item(TEST_RUN_KEY, "true")?;
            self.state = ButtonState::Loading;
            tracing::info!("suite armed for next launch");
            Ok(true)
        }
    }
}
