#![allow(dead_code)]

use async_trait::async_trait;
use renfe_watch::config::{SiteSelectors, WatchConfig};
use renfe_watch::domain::calendar::day_cell_selector;
use renfe_watch::domain::model::{AlertEmail, TripQuery};
use renfe_watch::domain::ports::{Browser, Clock, Locator, Notifier, SessionDriver, WaitCondition};
use renfe_watch::{Result, WatchError};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn trip() -> TripQuery {
    TripQuery {
        origin: "Linares-Baeza".to_string(),
        destination: "Madrid".to_string(),
        date: "24/10/2025".to_string(),
        departure_time: "07:27".to_string(),
    }
}

pub fn config() -> WatchConfig {
    let mut config = WatchConfig::for_trip(trip());
    config.monitor.screenshot_dir = Some("shots".to_string());
    config
}

/// 可注入失敗的流程階段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Launch,
    Navigate,
    OriginInput,
    DestinationSuggestion,
    OneWay,
    NextMonth,
    Apply,
    Search,
    Rows,
    Screenshot,
    Close,
}

pub const FLOW_STAGES: [Stage; 8] = [
    Stage::Navigate,
    Stage::OriginInput,
    Stage::DestinationSuggestion,
    Stage::OneWay,
    Stage::NextMonth,
    Stage::Apply,
    Stage::Search,
    Stage::Rows,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeElement {
    Consent,
    OriginInput,
    OriginSuggestion,
    DestinationInput,
    DestinationSuggestion,
    DateInput,
    OneWay,
    DayCell,
    NextMonth,
    Apply,
    Search,
    Results,
    Row(usize),
    RowTime(usize),
    RowPrice(usize),
}

#[derive(Debug, Clone)]
pub struct FakeRow {
    pub label: Option<String>,
    pub priced: bool,
    pub stale: bool,
}

impl FakeRow {
    pub fn priced(label: &str) -> Self {
        Self {
            label: Some(label.to_string()),
            priced: true,
            stale: false,
        }
    }

    pub fn unpriced(label: &str) -> Self {
        Self {
            label: Some(label.to_string()),
            priced: false,
            stale: false,
        }
    }

    pub fn without_time() -> Self {
        Self {
            label: None,
            priced: true,
            stale: false,
        }
    }

    /// 讀取時間標籤時元素已從頁面移除
    pub fn stale(label: &str) -> Self {
        Self {
            stale: true,
            ..Self::priced(label)
        }
    }
}

/// 模擬一次造訪時網站的樣子
#[derive(Debug, Clone)]
pub struct FakeSite {
    pub consent_banner: bool,
    pub months_ahead: u32,
    /// 前幾頁的目標格子存在但被隱藏
    pub hidden_pages: u32,
    pub rows: Option<Vec<FakeRow>>,
    pub no_service_message: bool,
    pub fail_at: Option<Stage>,
}

impl FakeSite {
    pub fn with_rows(rows: Vec<FakeRow>) -> Self {
        Self {
            consent_banner: true,
            months_ahead: 0,
            hidden_pages: 0,
            rows: Some(rows),
            no_service_message: false,
            fail_at: None,
        }
    }

    pub fn available() -> Self {
        Self::with_rows(vec![FakeRow::priced("06:10 h"), FakeRow::priced("07:27 h")])
    }

    pub fn sold_out() -> Self {
        Self::with_rows(vec![FakeRow::unpriced("07:27 h")])
    }

    pub fn not_listed() -> Self {
        Self::with_rows(vec![FakeRow::priced("08:00 h")])
    }

    pub fn no_service() -> Self {
        Self {
            rows: None,
            no_service_message: true,
            ..Self::with_rows(vec![])
        }
    }

    pub fn broken_results() -> Self {
        Self {
            rows: None,
            ..Self::with_rows(vec![])
        }
    }

    pub fn without_consent(mut self) -> Self {
        self.consent_banner = false;
        self
    }

    pub fn months_ahead(mut self, months: u32) -> Self {
        self.months_ahead = months;
        self
    }

    pub fn hidden_for(mut self, pages: u32) -> Self {
        self.hidden_pages = pages;
        self
    }

    pub fn failing_at(mut self, stage: Stage) -> Self {
        self.fail_at = Some(stage);
        self
    }
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub launches: u32,
    pub close_calls: u32,
    pub navigations: Vec<String>,
    pub typed: Vec<String>,
    pub clicks: Vec<FakeElement>,
    pub script_clicks: Vec<FakeElement>,
    pub cleared: u32,
    pub pages_turned: u32,
    pub screenshots: Vec<PathBuf>,
}

fn injected(stage: Stage) -> WatchError {
    WatchError::BrowserError {
        message: format!("injected failure at {:?}\nStacktrace: fake", stage),
    }
}

pub struct FakeBrowser {
    site: FakeSite,
    selectors: SiteSelectors,
    target_day: Locator,
    state: Arc<Mutex<FakeState>>,
}

impl FakeBrowser {
    pub fn new(site: FakeSite, config: &WatchConfig, state: Arc<Mutex<FakeState>>) -> Self {
        let timestamp = config.target_timestamp_ms().expect("valid trip date");
        Self {
            site,
            selectors: config.selectors.clone(),
            target_day: Locator::css(day_cell_selector(&config.selectors.day_cell_css, timestamp)),
            state,
        }
    }

    fn fails_at(&self, stage: Stage) -> bool {
        self.site.fail_at == Some(stage)
    }

    fn resolve(&self, locator: &Locator) -> Option<FakeElement> {
        let s = &self.selectors;
        let element = if *locator == s.consent_button() {
            self.site.consent_banner.then_some(FakeElement::Consent)?
        } else if *locator == s.origin_input() {
            (!self.fails_at(Stage::OriginInput)).then_some(FakeElement::OriginInput)?
        } else if *locator == s.origin_suggestion() {
            FakeElement::OriginSuggestion
        } else if *locator == s.destination_input() {
            FakeElement::DestinationInput
        } else if *locator == s.destination_suggestion() {
            (!self.fails_at(Stage::DestinationSuggestion)).then_some(FakeElement::DestinationSuggestion)?
        } else if *locator == s.date_input() {
            FakeElement::DateInput
        } else if *locator == s.one_way_label() {
            FakeElement::OneWay
        } else if *locator == self.target_day {
            let turned = self.state.lock().unwrap().pages_turned;
            (turned >= self.site.months_ahead).then_some(FakeElement::DayCell)?
        } else if *locator == s.next_month() {
            (!self.fails_at(Stage::NextMonth)).then_some(FakeElement::NextMonth)?
        } else if *locator == s.apply_button() {
            FakeElement::Apply
        } else if *locator == s.search_button() {
            (!self.fails_at(Stage::Search)).then_some(FakeElement::Search)?
        } else if *locator == s.results_container() {
            self.site.rows.as_ref().map(|_| FakeElement::Results)?
        } else {
            return None;
        };
        Some(element)
    }

    fn row(&self, index: usize) -> Option<&FakeRow> {
        self.site.rows.as_ref().and_then(|rows| rows.get(index))
    }
}

#[async_trait]
impl Browser for FakeBrowser {
    type Element = FakeElement;

    async fn navigate(&self, url: &str) -> Result<()> {
        if self.fails_at(Stage::Navigate) {
            return Err(injected(Stage::Navigate));
        }
        self.state.lock().unwrap().navigations.push(url.to_string());
        Ok(())
    }

    async fn find(&self, locator: &Locator) -> Result<Option<FakeElement>> {
        Ok(self.resolve(locator))
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<FakeElement>> {
        if *locator == self.selectors.result_row() {
            if self.fails_at(Stage::Rows) {
                return Err(injected(Stage::Rows));
            }
            let count = self.site.rows.as_ref().map(Vec::len).unwrap_or(0);
            return Ok((0..count).map(FakeElement::Row).collect());
        }
        Ok(self.resolve(locator).into_iter().collect())
    }

    async fn find_within(&self, parent: &FakeElement, locator: &Locator) -> Result<Option<FakeElement>> {
        let FakeElement::Row(index) = parent else {
            return Ok(None);
        };
        let Some(row) = self.row(*index) else {
            return Ok(None);
        };

        if *locator == self.selectors.departure_time() {
            Ok(row.label.as_ref().map(|_| FakeElement::RowTime(*index)))
        } else if *locator == self.selectors.price() {
            Ok(row.priced.then_some(FakeElement::RowPrice(*index)))
        } else {
            Ok(None)
        }
    }

    async fn wait_for(
        &self,
        locator: &Locator,
        _condition: WaitCondition,
        _timeout: Duration,
    ) -> Result<Option<FakeElement>> {
        Ok(self.resolve(locator))
    }

    async fn click(&self, element: &FakeElement) -> Result<()> {
        if *element == FakeElement::OneWay && self.fails_at(Stage::OneWay) {
            return Err(injected(Stage::OneWay));
        }
        let mut state = self.state.lock().unwrap();
        if *element == FakeElement::NextMonth {
            state.pages_turned += 1;
        }
        state.clicks.push(element.clone());
        Ok(())
    }

    async fn script_click(&self, element: &FakeElement) -> Result<()> {
        if self.fails_at(Stage::Apply) {
            return Err(injected(Stage::Apply));
        }
        self.state.lock().unwrap().script_clicks.push(element.clone());
        Ok(())
    }

    async fn clear(&self, _element: &FakeElement) -> Result<()> {
        self.state.lock().unwrap().cleared += 1;
        Ok(())
    }

    async fn type_text(&self, _element: &FakeElement, text: &str) -> Result<()> {
        self.state.lock().unwrap().typed.push(text.to_string());
        Ok(())
    }

    async fn text(&self, element: &FakeElement) -> Result<String> {
        match element {
            FakeElement::RowTime(index) => match self.row(*index) {
                Some(row) if row.stale => Err(WatchError::BrowserError {
                    message: "stale element reference: element is not attached to the page document"
                        .to_string(),
                }),
                row => Ok(row.and_then(|row| row.label.clone()).unwrap_or_default()),
            },
            _ => Ok(String::new()),
        }
    }

    async fn is_displayed(&self, element: &FakeElement) -> Result<bool> {
        if *element == FakeElement::DayCell {
            let turned = self.state.lock().unwrap().pages_turned;
            return Ok(turned >= self.site.hidden_pages);
        }
        Ok(true)
    }

    async fn page_source(&self) -> Result<String> {
        if self.site.no_service_message {
            Ok(format!(
                "<html><body><p class=\"alert\">{}</p></body></html>",
                self.selectors.no_service_text
            ))
        } else {
            Ok("<html><body><h1>Error</h1></body></html>".to_string())
        }
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        if self.fails_at(Stage::Screenshot) {
            return Err(injected(Stage::Screenshot));
        }
        self.state.lock().unwrap().screenshots.push(path.to_path_buf());
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.state.lock().unwrap().close_calls += 1;
        if self.fails_at(Stage::Close) {
            return Err(injected(Stage::Close));
        }
        Ok(())
    }
}

/// 每次啟動取出下一個網站狀態；用完後重複最後一個
pub struct FakeDriver {
    sites: Mutex<VecDeque<FakeSite>>,
    config: WatchConfig,
    state: Arc<Mutex<FakeState>>,
}

impl FakeDriver {
    pub fn new(config: &WatchConfig, sites: Vec<FakeSite>) -> Self {
        Self {
            sites: Mutex::new(sites.into()),
            config: config.clone(),
            state: Arc::new(Mutex::new(FakeState::default())),
        }
    }

    pub fn state(&self) -> Arc<Mutex<FakeState>> {
        self.state.clone()
    }
}

#[async_trait]
impl SessionDriver for FakeDriver {
    type Session = FakeBrowser;

    async fn launch(&self) -> Result<FakeBrowser> {
        let site = {
            let mut sites = self.sites.lock().unwrap();
            if sites.len() > 1 {
                sites.pop_front().unwrap()
            } else {
                sites.front().cloned().expect("at least one fake site")
            }
        };

        {
            let mut state = self.state.lock().unwrap();
            state.launches += 1;
            state.pages_turned = 0;
        }

        if site.fail_at == Some(Stage::Launch) {
            return Err(WatchError::SessionLaunchError {
                message: "chromedriver not reachable".to_string(),
            });
        }

        Ok(FakeBrowser::new(site, &self.config, self.state.clone()))
    }
}

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub sent: Arc<Mutex<Vec<AlertEmail>>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, email: &AlertEmail) -> Result<()> {
        self.sent.lock().unwrap().push(email.clone());
        if self.fail {
            return Err(WatchError::IoError(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "smtp unreachable",
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct RecordingClock {
    pub sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingClock {
    pub fn total(&self) -> Duration {
        self.sleeps.lock().unwrap().iter().sum()
    }
}

#[async_trait]
impl Clock for RecordingClock {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}
