use chrono::FixedOffset;
use serde_json::Value;
use std::fmt;

use super::{fixtures, stub::StubFetch};
use crate::{
    controller::WeatherApp,
    provider::{
        Fetch,
        openweather::{DEFAULT_BASE_URL, OpenWeatherEndpoint, icon_url, map_url},
    },
    render::{MAP_LINK_LABEL, format_local_time},
};

/// One programmatic submission: what the stub answers and what gets typed.
#[derive(Debug, Clone)]
pub struct Search {
    pub query: String,
    pub body: Value,
    pub status: u16,
    /// Whether the component is expected to hit the network for this query.
    pub expect_fetch: bool,
}

impl Search {
    pub fn ok(query: &str, body: Value) -> Self {
        Self::with_status(query, body, 200)
    }

    pub fn with_status(query: &str, body: Value, status: u16) -> Self {
        Self {
            query: query.to_string(),
            body,
            status,
            expect_fetch: true,
        }
    }

    /// A query that should be dropped before any request is made.
    pub fn blank(query: &str) -> Self {
        Self {
            query: query.to_string(),
            body: Value::Null,
            status: 200,
            expect_fetch: false,
        }
    }
}

/// A check against the component after the last search of a case.
///
/// HTML checks run against the lowercased `#weather-app` inner HTML.
#[derive(Debug, Clone, PartialEq)]
pub enum Expectation {
    HtmlContains(String),
    HtmlExcludes(String),
    InputCleared,
    LinkLabel(String),
    LinkHref(String),
    LinkHrefNot(String),
    IconSrc(String),
    IconSrcNot(String),
    /// The local-time rendering of this Unix timestamp is on the page.
    UpdatedTimeShown(i64),
    UpdatedTimeAbsent(i64),
    ResultsEmpty,
}

impl Expectation {
    pub fn contains(text: &str) -> Self {
        Expectation::HtmlContains(text.to_string())
    }

    pub fn excludes(text: &str) -> Self {
        Expectation::HtmlExcludes(text.to_string())
    }

    pub fn check<F: Fetch>(&self, app: &WeatherApp<F>) -> Result<(), String> {
        let doc = app.document();
        let root = doc
            .query_selector("#weather-app")
            .ok_or("expected a #weather-app element")?;
        let html = root.inner_html().to_lowercase();
        let link = doc.query_selector("#weather-app a");
        let img = doc.query_selector("#weather-app img");

        match self {
            Expectation::HtmlContains(text) => ensure(html.contains(&text.to_lowercase()), || {
                format!("expected page to contain {text:?}")
            }),
            Expectation::HtmlExcludes(text) => ensure(!html.contains(&text.to_lowercase()), || {
                format!("expected page not to contain {text:?}")
            }),
            Expectation::InputCleared => ensure(app.input_value().is_empty(), || {
                format!("expected input to be empty, got {:?}", app.input_value())
            }),
            Expectation::LinkLabel(label) => {
                let link = link.ok_or("expected a map link")?;
                let actual = link.text_content().to_lowercase();
                ensure(actual == label.to_lowercase(), || {
                    format!("expected link label {label:?}, got {actual:?}")
                })
            }
            Expectation::LinkHref(href) => {
                let link = link.ok_or("expected a map link")?;
                let actual = link.attribute("href").unwrap_or_default();
                ensure(actual == href.as_str(), || {
                    format!("expected link href {href:?}, got {actual:?}")
                })
            }
            Expectation::LinkHrefNot(href) => {
                let link = link.ok_or("expected a map link")?;
                ensure(link.attribute("href") != Some(href.as_str()), || {
                    format!("expected link href to differ from {href:?}")
                })
            }
            Expectation::IconSrc(src) => {
                let img = img.ok_or("expected a condition icon")?;
                let actual = img.attribute("src").unwrap_or_default();
                ensure(actual == src.as_str(), || {
                    format!("expected icon src {src:?}, got {actual:?}")
                })
            }
            Expectation::IconSrcNot(src) => {
                let img = img.ok_or("expected a condition icon")?;
                ensure(img.attribute("src") != Some(src.as_str()), || {
                    format!("expected icon src to differ from {src:?}")
                })
            }
            Expectation::UpdatedTimeShown(dt) => {
                let time = format_local_time(*dt, app.utc_offset()).to_lowercase();
                ensure(html.contains(&time), || format!("expected updated time {time:?}"))
            }
            Expectation::UpdatedTimeAbsent(dt) => {
                let time = format_local_time(*dt, app.utc_offset()).to_lowercase();
                ensure(!html.contains(&time), || format!("expected no updated time {time:?}"))
            }
            Expectation::ResultsEmpty => ensure(app.results().children().is_empty(), || {
                format!("expected empty results, got {:?}", app.results().inner_html())
            }),
        }
    }
}

fn ensure(cond: bool, msg: impl FnOnce() -> String) -> Result<(), String> {
    if cond { Ok(()) } else { Err(msg()) }
}

/// A named scenario: optional prior searches, the search under test, then checks.
///
/// Every case runs against a fresh component and a fresh stub.
#[derive(Debug, Clone)]
pub struct TestCase {
    pub name: String,
    pub setup: Vec<Search>,
    pub search: Search,
    pub expectations: Vec<Expectation>,
}

impl TestCase {
    pub fn new(name: &str, search: Search) -> Self {
        Self {
            name: name.to_string(),
            setup: Vec::new(),
            search,
            expectations: Vec::new(),
        }
    }

    pub fn after(mut self, search: Search) -> Self {
        self.setup.push(search);
        self
    }

    pub fn expect(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseReport {
    pub name: String,
    pub failures: Vec<String>,
}

impl CaseReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteReport {
    pub title: String,
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.cases.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;

        let mut failure_no = 0;
        for case in &self.cases {
            if case.passed() {
                writeln!(f, "  ✓ {}", case.name)?;
            } else {
                failure_no += 1;
                writeln!(f, "  {failure_no}) {}", case.name)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "  {} passing", self.passed())?;
        if self.failed() > 0 {
            writeln!(f, "  {} failing", self.failed())?;

            let failing = self.cases.iter().filter(|c| !c.passed());
            for (i, case) in failing.enumerate() {
                writeln!(f)?;
                writeln!(f, "  {}) {}:", i + 1, case.name)?;
                for msg in &case.failures {
                    writeln!(f, "     {msg}")?;
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Suite {
    title: String,
    cases: Vec<TestCase>,
    utc_offset: Option<FixedOffset>,
}

impl Suite {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            cases: Vec::new(),
            utc_offset: None,
        }
    }

    /// Render times in a fixed offset rather than the local zone.
    pub fn with_utc_offset(mut self, offset: Option<FixedOffset>) -> Self {
        self.utc_offset = offset;
        self
    }

    pub fn case(mut self, case: TestCase) -> Self {
        self.cases.push(case);
        self
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    /// The behavioral checks for the search-and-render component.
    pub fn weather_app() -> Self {
        use fixtures::{HONOLULU_DT, HONOLULU_QUERY, TOKYO_DT, TOKYO_QUERY, UNKNOWN_QUERY};
        use Expectation as E;

        let tokyo = || Search::ok(TOKYO_QUERY, fixtures::tokyo());
        let unknown = || Search::with_status(UNKNOWN_QUERY, fixtures::not_found(), 404);
        let tokyo_map = map_url(35.6895, 139.6917);
        let tokyo_icon = icon_url("02d");

        Suite::new("Weather App")
            .case(
                TestCase::new(
                    r#"should display "Location Not Found" if no location is found"#,
                    unknown(),
                )
                .expect(E::contains("location not found"))
                .expect(E::excludes("<h2>")),
            )
            .case(
                TestCase::new(
                    "should clear the input value after searching for weather data",
                    unknown(),
                )
                .expect(E::InputCleared),
            )
            .case(
                TestCase::new(
                    r#"should not display "Location not found" after entering a valid location"#,
                    tokyo(),
                )
                .after(unknown())
                .expect(E::excludes("location not found")),
            )
            .case(
                TestCase::new("should display city", tokyo())
                    .expect(E::contains("tokyo"))
                    .expect(E::contains("jp")),
            )
            .case(
                TestCase::new("should display working map link", tokyo())
                    .expect(E::LinkLabel(MAP_LINK_LABEL.to_string()))
                    .expect(E::LinkHref(tokyo_map.clone())),
            )
            .case(
                TestCase::new("should display condition icon", tokyo())
                    .expect(E::IconSrc(tokyo_icon.clone())),
            )
            .case(
                TestCase::new("should display condition", tokyo())
                    .expect(E::contains("few clouds")),
            )
            .case(
                TestCase::new("should display current temp", tokyo())
                    .expect(E::contains("55.42")),
            )
            .case(
                TestCase::new(r#"should display current "feels like" temp"#, tokyo())
                    .expect(E::contains("52.74")),
            )
            .case(
                TestCase::new("should display updated time", tokyo())
                    .expect(E::UpdatedTimeShown(TOKYO_DT)),
            )
            .case(
                TestCase::new(
                    "should not display previous location's weather info \
                     after searching for a new location",
                    Search::ok(HONOLULU_QUERY, fixtures::honolulu()),
                )
                .after(tokyo())
                .expect(E::excludes("tokyo"))
                .expect(E::excludes("jp"))
                .expect(E::LinkHrefNot(tokyo_map))
                .expect(E::IconSrcNot(tokyo_icon))
                .expect(E::excludes("few clouds"))
                .expect(E::excludes("55.42"))
                .expect(E::excludes("52.74"))
                .expect(E::UpdatedTimeAbsent(TOKYO_DT))
                .expect(E::contains("honolulu"))
                .expect(E::contains("us"))
                .expect(E::LinkLabel(MAP_LINK_LABEL.to_string()))
                .expect(E::LinkHref(map_url(21.3069, -157.8583)))
                .expect(E::IconSrc(icon_url("04n")))
                .expect(E::contains("broken clouds"))
                .expect(E::contains("73.67"))
                .expect(E::contains("74.88"))
                .expect(E::UpdatedTimeShown(HONOLULU_DT)),
            )
            .case(
                TestCase::new(
                    "should clear the view without searching for a blank location",
                    Search::blank("   "),
                )
                .after(tokyo())
                .expect(E::ResultsEmpty)
                .expect(E::InputCleared)
                .expect(E::excludes("tokyo")),
            )
    }

    pub async fn run(&self) -> SuiteReport {
        tracing::info!(suite = %self.title, cases = self.cases.len(), "running suite");

        let mut reports = Vec::with_capacity(self.cases.len());
        for case in &self.cases {
            let report = self.run_case(case).await;
            if report.passed() {
                tracing::debug!(case = %report.name, "passed");
            } else {
                tracing::warn!(case = %report.name, failures = ?report.failures, "failed");
            }
            reports.push(report);
        }

        SuiteReport {
            title: self.title.clone(),
            cases: reports,
        }
    }

    async fn run_case(&self, case: &TestCase) -> CaseReport {
        let stub = StubFetch::new();
        let endpoint = OpenWeatherEndpoint::new(DEFAULT_BASE_URL, "stub");
        let mut app = WeatherApp::new(stub.clone(), endpoint).with_utc_offset(self.utc_offset);

        let mut failures = Vec::new();
        for step in case.setup.iter().chain(std::iter::once(&case.search)) {
            if let Err(msg) = drive(&stub, &mut app, step).await {
                failures.push(msg);
            }
        }

        if failures.is_empty() {
            failures.extend(case.expectations.iter().filter_map(|e| e.check(&app).err()));
        }
        stub.restore();

        CaseReport {
            name: case.name.clone(),
            failures,
        }
    }
}

/// Install a fresh stub, type the query, submit, and let the render settle.
async fn drive(
    stub: &StubFetch,
    app: &mut WeatherApp<StubFetch>,
    step: &Search,
) -> Result<(), String> {
    stub.restore();
    stub.resolves(&step.body, step.status);

    app.set_input_value(step.query.clone());
    app.submit().await;

    if step.expect_fetch {
        let url = stub
            .first_call()
            .ok_or_else(|| format!("expected a fetch for {:?}", step.query))?;
        ensure(url.contains(&step.query), || {
            format!("expected fetch URL to contain {:?}, got {url:?}", step.query)
        })?;
    } else {
        ensure(!stub.called(), || format!("expected no fetch for {:?}", step.query))?;
    }

    tokio::task::yield_now().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> Option<FixedOffset> {
        FixedOffset::east_opt(0)
    }

    #[tokio::test]
    async fn failing_expectation_is_reported() {
        let suite = Suite::new("demo").with_utc_offset(utc()).case(
            TestCase::new("wrong city", Search::ok("tokyo, jp", fixtures::tokyo()))
                .expect(Expectation::contains("osaka")),
        );

        let report = suite.run().await;

        assert!(!report.is_success());
        assert_eq!(report.failed(), 1);
        assert_eq!(report.cases[0].failures, [r#"expected page to contain "osaka""#]);
    }

    #[tokio::test]
    async fn fetch_expectation_mismatch_is_reported() {
        let mut search = Search::ok("tokyo", fixtures::tokyo());
        search.expect_fetch = false;
        let suite = Suite::new("demo").case(TestCase::new("unexpected fetch", search));

        let report = suite.run().await;

        assert_eq!(report.cases[0].failures, [r#"expected no fetch for "tokyo""#]);
    }

    #[tokio::test]
    async fn cases_do_not_share_state() {
        let suite = Suite::new("isolation")
            .with_utc_offset(utc())
            .case(TestCase::new("first", Search::ok("tokyo, jp", fixtures::tokyo())))
            .case(
                TestCase::new("second", Search::blank(""))
                    .expect(Expectation::ResultsEmpty)
                    .expect(Expectation::excludes("tokyo")),
            );

        assert!(suite.run().await.is_success());
    }

    #[test]
    fn report_lists_passes_and_failures() {
        let report = SuiteReport {
            title: "Weather App".into(),
            cases: vec![
                CaseReport {
                    name: "ok".into(),
                    failures: vec![],
                },
                CaseReport {
                    name: "bad".into(),
                    failures: vec!["boom".into()],
                },
            ],
        };

        let text = report.to_string();
        assert!(text.starts_with("Weather App\n  ✓ ok\n  1) bad\n"));
        assert!(text.contains("1 passing"));
        assert!(text.contains("1 failing"));
        assert!(text.contains("  1) bad:\n     boom\n"));
    }

    #[test]
    fn weather_app_suite_has_every_scenario() {
        let suite = Suite::weather_app();
        assert_eq!(suite.cases().len(), 12);
        assert!(suite.cases().iter().all(|c| !c.expectations.is_empty()));
    }
}
