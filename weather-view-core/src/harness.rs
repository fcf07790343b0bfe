//! Opt-in verification of the search-and-render component.
//!
//! The suite swaps the network call for [`StubFetch`], drives
//! [`WeatherApp::submit`](crate::WeatherApp::submit) programmatically and checks
//! the resulting element tree. Whether it runs at launch is controlled by a
//! persisted flag, see [`TestTrigger`].

pub mod fixtures;
pub mod stub;
pub mod suite;
pub mod trigger;

pub use stub::StubFetch;
pub use suite::{CaseReport, Expectation, Search, Suite, SuiteReport, TestCase};
pub use trigger::{ButtonState, ClickAction, TEST_RUN_KEY, TestTrigger};
