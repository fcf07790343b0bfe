//! Core library for `weather-view`.
//!
//! This crate defines:
//! - Configuration and the persisted local store
//! - The network seam (`Fetch`) and the OpenWeather request/response mapping
//! - The search-and-render component and its element tree
//! - A stub-driven verification harness for that component
//!
//! It is used by `weather-view-cli`, but can also be embedded elsewhere.

pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod harness;
pub mod model;
pub mod provider;
pub mod render;
pub mod storage;

pub use config::Config;
pub use controller::{SubmitOutcome, WeatherApp};
pub use error::WeatherError;
pub use model::{Query, WeatherReading};
pub use provider::{Fetch, FetchResponse, HttpFetch};
pub use storage::LocalStorage;
