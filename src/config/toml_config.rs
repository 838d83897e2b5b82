use crate::config::site::{SiteSelectors, DEFAULT_BASE_URL, DEFAULT_CALENDAR_TIMEZONE};
use crate::domain::calendar;
use crate::domain::model::TripQuery;
use crate::utils::error::{Result, WatchError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "renfe-watch.toml";
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    pub trip: TripQuery,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub selectors: SiteSelectors,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    pub base_url: Option<String>,
    pub calendar_timezone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrowserConfig {
    pub webdriver_url: Option<String>,
    /// 設定時由本程式啟動 chromedriver，忽略 webdriver_url
    pub chromedriver_path: Option<String>,
    pub headless: Option<bool>,
    pub window_width: Option<u32>,
    pub window_height: Option<u32>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeoutConfig {
    pub interaction_seconds: Option<u64>,
    pub results_seconds: Option<u64>,
    pub input_pause_ms: Option<u64>,
    pub calendar_pause_ms: Option<u64>,
    pub max_calendar_pages: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitorConfig {
    pub interval_seconds: Option<u64>,
    pub screenshot_dir: Option<String>,
    pub screenshot_on_failure: Option<bool>,
}

impl WatchConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 只含行程、其餘皆為預設值的配置
    pub fn for_trip(trip: TripQuery) -> Self {
        Self {
            trip,
            site: SiteConfig::default(),
            browser: BrowserConfig::default(),
            timeouts: TimeoutConfig::default(),
            email: EmailConfig::default(),
            monitor: MonitorConfig::default(),
            selectors: SiteSelectors::default(),
        }
    }

    /// 替換環境變數 (例如 ${EMAIL_SENDER})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| WatchError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn base_url(&self) -> &str {
        self.site.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn calendar_timezone(&self) -> &str {
        self.site
            .calendar_timezone
            .as_deref()
            .unwrap_or(DEFAULT_CALENDAR_TIMEZONE)
    }

    pub fn webdriver_url(&self) -> &str {
        self.browser
            .webdriver_url
            .as_deref()
            .unwrap_or(DEFAULT_WEBDRIVER_URL)
    }

    pub fn chromedriver_path(&self) -> Option<&Path> {
        self.browser.chromedriver_path.as_deref().map(Path::new)
    }

    pub fn headless(&self) -> bool {
        self.browser.headless.unwrap_or(true)
    }

    pub fn window_size(&self) -> (u32, u32) {
        (
            self.browser.window_width.unwrap_or(1920),
            self.browser.window_height.unwrap_or(1080),
        )
    }

    pub fn user_agent(&self) -> &str {
        self.browser
            .user_agent
            .as_deref()
            .unwrap_or(DEFAULT_USER_AGENT)
    }

    /// 一般互動元素的等待上限
    pub fn interaction_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.interaction_seconds.unwrap_or(20))
    }

    pub fn results_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.results_seconds.unwrap_or(40))
    }

    /// 輸入後等待自動完成清單出現的固定停頓
    pub fn input_pause(&self) -> Duration {
        Duration::from_millis(self.timeouts.input_pause_ms.unwrap_or(1000))
    }

    pub fn calendar_pause(&self) -> Duration {
        Duration::from_millis(self.timeouts.calendar_pause_ms.unwrap_or(500))
    }

    /// 日曆最多往後翻幾個月 (預設兩年)
    pub fn max_calendar_pages(&self) -> u32 {
        self.timeouts.max_calendar_pages.unwrap_or(24)
    }

    pub fn smtp_host(&self) -> &str {
        self.email.smtp_host.as_deref().unwrap_or("smtp.gmail.com")
    }

    pub fn smtp_port(&self) -> u16 {
        self.email.smtp_port.unwrap_or(465)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.monitor.interval_seconds.unwrap_or(300))
    }

    pub fn screenshot_dir(&self) -> PathBuf {
        PathBuf::from(self.monitor.screenshot_dir.as_deref().unwrap_or("."))
    }

    pub fn screenshot_on_failure(&self) -> bool {
        self.monitor.screenshot_on_failure.unwrap_or(true)
    }

    /// 目標日期日曆格子的 `data-time` 值
    pub fn target_timestamp_ms(&self) -> Result<i64> {
        calendar::trip_timestamp_ms(&self.trip.date, self.calendar_timezone())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("trip.origin", &self.trip.origin)?;
        validation::validate_non_empty_string("trip.destination", &self.trip.destination)?;
        validation::validate_departure_time("trip.departure_time", &self.trip.departure_time)?;

        // 日期與時區一起驗證
        self.target_timestamp_ms()?;

        validation::validate_url("site.base_url", self.base_url())?;
        validation::validate_url("browser.webdriver_url", self.webdriver_url())?;
        if let Some(path) = &self.browser.chromedriver_path {
            validation::validate_path("browser.chromedriver_path", path)?;
        }

        validation::validate_positive_number(
            "timeouts.interaction_seconds",
            self.interaction_timeout().as_secs(),
            1,
        )?;
        validation::validate_positive_number(
            "timeouts.results_seconds",
            self.results_timeout().as_secs(),
            1,
        )?;
        validation::validate_range("timeouts.max_calendar_pages", self.max_calendar_pages(), 1, 120)?;

        validation::validate_non_empty_string("email.smtp_host", self.smtp_host())?;
        validation::validate_positive_number("email.smtp_port", u64::from(self.smtp_port()), 1)?;

        if let Some(dir) = &self.monitor.screenshot_dir {
            validation::validate_path("monitor.screenshot_dir", dir)?;
        }

        Ok(())
    }
}

impl Validate for WatchConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
