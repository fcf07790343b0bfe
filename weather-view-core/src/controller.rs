//! The search-and-render component.
//!
//! `WeatherApp` owns its page elements: the search input's value and the
//! `#weather` result container. Each submission replaces the container's content
//! wholesale, so only one reading (or one error) is ever on display.

use anyhow::Result;
use chrono::FixedOffset;

use crate::{
    Config,
    dom::{Element, Node},
    error::WeatherError,
    model::{Query, WeatherReading},
    provider::{
        Fetch,
        openweather::{self, OpenWeatherEndpoint},
    },
    render::render_view,
};

pub const APP_ID: &str = "weather-app";
pub const RESULT_ID: &str = "weather";
pub const INPUT_ID: &str = "weather-search";

/// What a call to [`WeatherApp::submit`] ended up doing.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Rendered(WeatherReading),
    Failed(WeatherError),
    /// Blank query; the view was cleared and nothing was fetched.
    Skipped,
}

#[derive(Debug)]
pub struct WeatherApp<F: Fetch> {
    fetcher: F,
    endpoint: OpenWeatherEndpoint,
    utc_offset: Option<FixedOffset>,
    input: String,
    results: Element,
}

impl<F: Fetch> WeatherApp<F> {
    pub fn new(fetcher: F, endpoint: OpenWeatherEndpoint) -> Self {
        Self {
            fetcher,
            endpoint,
            utc_offset: None,
            input: String::new(),
            results: Element::new("div").with_attr("id", RESULT_ID),
        }
    }

    pub fn from_config(fetcher: F, config: &Config) -> Result<Self> {
        let endpoint = OpenWeatherEndpoint::from_config(config)?;
        Ok(Self::new(fetcher, endpoint).with_utc_offset(config.utc_offset()?))
    }

    /// Pin time rendering to a fixed offset instead of the local zone.
    pub fn with_utc_offset(mut self, offset: Option<FixedOffset>) -> Self {
        self.utc_offset = offset;
        self
    }

    pub fn utc_offset(&self) -> Option<FixedOffset> {
        self.utc_offset
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn input_value(&self) -> &str {
        &self.input
    }

    pub fn set_input_value(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    /// The `#weather` container.
    pub fn results(&self) -> &Element {
        &self.results
    }

    /// A `body` holding the `#weather-app` subtree: search form plus result
    /// container. Selectors rooted at `#weather-app` resolve against it.
    pub fn document(&self) -> Element {
        let form = Element::new("form")
            .with_child(
                Element::new("input")
                    .with_attr("type", "text")
                    .with_attr("name", "search")
                    .with_attr("id", INPUT_ID),
            )
            .with_child(
                Element::new("button")
                    .with_attr("type", "submit")
                    .with_text("Search"),
            );

        let app = Element::new("div")
            .with_attr("id", APP_ID)
            .with_child(form)
            .with_child(self.results.clone());

        Element::new("body").with_child(app)
    }

    /// Run one search with the current input value.
    ///
    /// Errors never escape: they are shown in the result container and returned
    /// as [`SubmitOutcome::Failed`]. The input is cleared in every case.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let outcome = match Query::parse(&self.input) {
            None => {
                tracing::debug!("blank query, clearing view without fetching");
                self.clear();
                SubmitOutcome::Skipped
            }
            Some(query) => match self.lookup(&query).await {
                Ok(reading) => {
                    self.render(&reading);
                    SubmitOutcome::Rendered(reading)
                }
                Err(err) => {
                    tracing::warn!(%query, error = %err, "search failed");
                    self.show_error(&err);
                    SubmitOutcome::Failed(err)
                }
            },
        };

        self.input.clear();
        outcome
    }

    async fn lookup(&self, query: &Query) -> Result<WeatherReading, WeatherError> {
        let url = self.endpoint.current_url(query.as_str());
        tracing::info!(%query, "fetching current weather");

        let res = self
            .fetcher
            .fetch(&url)
            .await
            .map_err(|e| WeatherError::request_failure(&e))?;

        if !res.is_success() {
            tracing::debug!(status = res.status, "non-success status");
            return Err(WeatherError::LocationNotFound);
        }

        openweather::parse_current(&res.body).map_err(|e| WeatherError::request_failure(&e))
    }

    /// Replace whatever is displayed with the view for `reading`.
    pub fn render(&mut self, reading: &WeatherReading) {
        let view = render_view(reading, self.utc_offset);
        self.results.replace_children(vec![Node::Element(view)]);
        tracing::debug!(location = %reading.location_name, "rendered reading");
    }

    /// Replace whatever is displayed with `err`'s message.
    pub fn show_error(&mut self, err: &WeatherError) {
        let message = Element::new("div").with_text(err.to_string());
        self.results.replace_children(vec![Node::Element(message)]);
    }

    pub fn clear(&mut self) {
        self.results.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{FetchResponse, HttpFetch};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Answers from a queue and records requested URLs.
    #[derive(Debug, Default)]
    struct Scripted {
        responses: Mutex<Vec<anyhow::Result<FetchResponse>>>,
        urls: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn with(responses: Vec<anyhow::Result<FetchResponse>>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().rev().collect()),
                urls: Mutex::default(),
            }
        }

        fn urls(&self) -> Vec<String> {
            self.urls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetch for Scripted {
        async fn fetch(&self, url: &str) -> anyhow::Result<FetchResponse> {
            self.urls.lock().unwrap().push(url.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(anyhow::anyhow!("no scripted response")))
        }
    }

    const TOKYO: &str = r#"{"coord":{"lon":139.6917,"lat":35.6895},
        "weather":[{"description":"few clouds","icon":"02d"}],
        "main":{"temp":55.42,"feels_like":52.74},"dt":1647843122,
        "sys":{"country":"JP"},"name":"Tokyo"}"#;

    fn app(responses: Vec<anyhow::Result<FetchResponse>>) -> WeatherApp<Scripted> {
        WeatherApp::new(
            Scripted::with(responses),
            OpenWeatherEndpoint::new("https://example.test/weather", "KEY"),
        )
        .with_utc_offset(FixedOffset::east_opt(0))
    }

    #[tokio::test]
    async fn success_renders_and_clears_input() {
        let mut app = app(vec![Ok(FetchResponse::new(200, TOKYO))]);
        app.set_input_value("  tokyo, jp ");

        let outcome = app.submit().await;

        assert!(matches!(outcome, SubmitOutcome::Rendered(ref r) if r.location_name == "Tokyo"));
        assert_eq!(app.input_value(), "");
        assert_eq!(
            app.fetcher().urls(),
            ["https://example.test/weather?q=tokyo, jp&units=imperial&appid=KEY"]
        );
        let text = app.results().text_content();
        assert!(text.contains("Tokyo , JP"));
        assert!(text.contains("Last updated: 6:12 AM"));
    }

    #[tokio::test]
    async fn any_non_2xx_is_location_not_found() {
        for status in [301, 404, 500] {
            let mut app = app(vec![Ok(FetchResponse::new(status, r#"{"cod":"404"}"#))]);
            app.set_input_value("askjdnfks");

            let outcome = app.submit().await;

            assert_eq!(outcome, SubmitOutcome::Failed(WeatherError::LocationNotFound));
            assert_eq!(app.results().inner_html(), "<div>Location Not Found</div>");
            assert_eq!(app.input_value(), "");
        }
    }

    #[tokio::test]
    async fn transport_error_message_is_displayed() {
        let mut app = app(vec![Err(anyhow::anyhow!("connection refused"))]);
        app.set_input_value("tokyo");

        let outcome = app.submit().await;

        assert_eq!(
            outcome,
            SubmitOutcome::Failed(WeatherError::RequestFailure("connection refused".into()))
        );
        assert_eq!(app.results().text_content(), "connection refused");
    }

    #[tokio::test]
    async fn malformed_body_is_request_failure() {
        let mut app = app(vec![Ok(FetchResponse::new(200, "<html>"))]);
        app.set_input_value("tokyo");

        let outcome = app.submit().await;

        assert!(matches!(outcome, SubmitOutcome::Failed(WeatherError::RequestFailure(_))));
        assert!(app
            .results()
            .text_content()
            .starts_with("Failed to parse OpenWeather current JSON"));
        assert!(app.results().query_selector("h2").is_none());
    }

    #[tokio::test]
    async fn blank_query_clears_without_fetching() {
        let mut app = app(vec![Ok(FetchResponse::new(200, TOKYO))]);
        app.set_input_value("tokyo");
        app.submit().await;

        app.set_input_value("   ");
        let outcome = app.submit().await;

        assert_eq!(outcome, SubmitOutcome::Skipped);
        assert_eq!(app.fetcher().urls().len(), 1);
        assert_eq!(app.results().inner_html(), "");
        assert_eq!(app.input_value(), "");
    }

    #[tokio::test]
    async fn success_after_error_replaces_message() {
        let mut app = app(vec![
            Ok(FetchResponse::new(404, "{}")),
            Ok(FetchResponse::new(200, TOKYO)),
        ]);
        app.set_input_value("nowhere");
        app.submit().await;
        app.set_input_value("tokyo");
        app.submit().await;

        assert_eq!(app.results().children().len(), 1);
        assert!(!app.results().text_content().contains("Location Not Found"));
    }

    #[test]
    fn document_exposes_form_and_container() {
        let app = app(vec![]);
        let doc = app.document();

        assert_eq!(doc.tag_name(), "body");
        assert!(doc.query_selector("#weather-app input").is_some());
        assert!(doc.query_selector("#weather-app form button").is_some());
        assert!(doc.query_selector("#weather-app #weather").is_some());
    }

    #[tokio::test]
    async fn unreachable_provider_shows_failure_without_api_key() {
        let mut app = WeatherApp::new(
            HttpFetch::new(),
            OpenWeatherEndpoint::new("http://127.0.0.1:1/data/2.5/weather", "SECRETKEY123"),
        );
        app.set_input_value("tokyo");

        let outcome = app.submit().await;

        let SubmitOutcome::Failed(WeatherError::RequestFailure(msg)) = outcome else {
            panic!("expected a request failure, got {outcome:?}");
        };
        assert!(msg.starts_with("Failed to send request to OpenWeather"));
        assert!(!msg.contains("SECRETKEY123"));

        let shown = app.document().inner_html();
        assert!(!shown.contains("SECRETKEY123"));
        assert_eq!(app.results().text_content(), msg);
        assert_eq!(app.input_value(), "");
    }
}
