use thiserror::Error;

/// Failures surfaced in the result container after a submission.
///
/// The `Display` text is exactly what the component shows to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    /// The provider answered with a non-2xx status, whatever the actual code.
    #[error("Location Not Found")]
    LocationNotFound,

    /// Anything else that went wrong while fetching or decoding.
    #[error("{0}")]
    RequestFailure(String),
}

impl WeatherError {
    pub fn request_failure(err: &anyhow::Error) -> Self {
        WeatherError::RequestFailure(format!("{err:#}"))
    }
}
