use crate::adapters::chromedriver::ChromeDriverService;
use crate::config::WatchConfig;
use crate::domain::ports::{Browser, Locator, SessionDriver, WaitCondition};
use crate::utils::error::{Result, WatchError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thirtyfour::error::WebDriverResult;
use thirtyfour::extensions::cdp::ChromeDevTools;
use thirtyfour::prelude::*;
use thirtyfour::{ChromeCapabilities, ChromiumLikeCapabilities};
use tokio::sync::Mutex;

const POLL_INTERVAL: Duration = Duration::from_millis(500);
const CHROMEDRIVER_STARTUP: Duration = Duration::from_secs(10);

fn to_by(locator: &Locator) -> By {
    match locator {
        Locator::Id(v) => By::Id(v.as_str()),
        Locator::Css(v) => By::Css(v.as_str()),
        Locator::XPath(v) => By::XPath(v.as_str()),
    }
}

/// 透過 chromedriver 啟動 Chrome；有設定 chromedriver_path 時每個工作階段自行啟動 chromedriver
#[derive(Debug, Clone)]
pub struct ChromeSessionDriver {
    webdriver_url: String,
    chromedriver_path: Option<PathBuf>,
    headless: bool,
    window_size: (u32, u32),
    user_agent: String,
    timezone: String,
}

impl ChromeSessionDriver {
    pub fn from_config(config: &WatchConfig) -> Self {
        Self {
            webdriver_url: config.webdriver_url().to_string(),
            chromedriver_path: config.chromedriver_path().map(Path::to_path_buf),
            headless: config.headless(),
            window_size: config.window_size(),
            user_agent: config.user_agent().to_string(),
            timezone: config.calendar_timezone().to_string(),
        }
    }

    fn capabilities(&self) -> WebDriverResult<ChromeCapabilities> {
        let mut caps = DesiredCapabilities::chrome();
        if self.headless {
            caps.set_headless()?;
        }
        caps.add_arg(&format!(
            "--window-size={},{}",
            self.window_size.0, self.window_size.1
        ))?;
        caps.add_arg("--start-maximized")?;
        caps.set_disable_gpu()?;
        caps.set_no_sandbox()?;
        caps.set_disable_dev_shm_usage()?;
        caps.add_arg(&format!("--user-agent={}", self.user_agent))?;
        caps.add_experimental_option("excludeSwitches", vec!["enable-logging"])?;
        Ok(caps)
    }
}

#[async_trait]
impl SessionDriver for ChromeSessionDriver {
    type Session = WebDriverBrowser;

    async fn launch(&self) -> Result<WebDriverBrowser> {
        let caps = self
            .capabilities()
            .map_err(|e| WatchError::SessionLaunchError {
                message: e.to_string(),
            })?;

        let service = match &self.chromedriver_path {
            Some(path) => Some(ChromeDriverService::spawn(path, CHROMEDRIVER_STARTUP).await?),
            None => None,
        };
        let url = service
            .as_ref()
            .map(ChromeDriverService::url)
            .unwrap_or_else(|| self.webdriver_url.clone());
        tracing::info!("🧭 Starting Chrome via {}", url);

        // 連線失敗時 service 被 drop，chromedriver 隨之終止
        let driver = WebDriver::new(url.as_str(), caps)
            .await
            .map_err(|e| WatchError::SessionLaunchError {
                message: e.to_string(),
            })?;

        // 日曆的 data-time 以瀏覽器時區計算，需與設定的時區一致
        let dev_tools = ChromeDevTools::new(driver.handle.clone());
        if let Err(e) = dev_tools
            .execute_cdp_with_params(
                "Emulation.setTimezoneOverride",
                serde_json::json!({ "timezoneId": self.timezone }),
            )
            .await
        {
            tracing::warn!("Could not set browser timezone to {}: {}", self.timezone, e);
        }

        Ok(WebDriverBrowser {
            driver,
            service: Mutex::new(service),
        })
    }
}

pub struct WebDriverBrowser {
    driver: WebDriver,
    service: Mutex<Option<ChromeDriverService>>,
}

impl WebDriverBrowser {
    async fn matches(&self, element: &WebElement, condition: WaitCondition) -> WebDriverResult<bool> {
        match condition {
            WaitCondition::Present => Ok(true),
            WaitCondition::Visible => element.is_displayed().await,
            WaitCondition::Clickable => {
                Ok(element.is_displayed().await? && element.is_enabled().await?)
            }
        }
    }
}

#[async_trait]
impl Browser for WebDriverBrowser {
    type Element = WebElement;

    async fn navigate(&self, url: &str) -> Result<()> {
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn find(&self, locator: &Locator) -> Result<Option<WebElement>> {
        Ok(self.driver.find_all(to_by(locator)).await?.into_iter().next())
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<WebElement>> {
        Ok(self.driver.find_all(to_by(locator)).await?)
    }

    async fn find_within(&self, parent: &WebElement, locator: &Locator) -> Result<Option<WebElement>> {
        Ok(parent.find_all(to_by(locator)).await?.into_iter().next())
    }

    async fn wait_for(
        &self,
        locator: &Locator,
        condition: WaitCondition,
        timeout: Duration,
    ) -> Result<Option<WebElement>> {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            for element in self.driver.find_all(to_by(locator)).await? {
                // 元素在檢查時被移除 (stale) 視為尚未就緒
                if self.matches(&element, condition).await.unwrap_or(false) {
                    return Ok(Some(element));
                }
            }

            if tokio::time::Instant::now() >= deadline {
                tracing::debug!("Timed out waiting for {} ({:?})", locator, condition);
                return Ok(None);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn click(&self, element: &WebElement) -> Result<()> {
        element.click().await?;
        Ok(())
    }

    async fn script_click(&self, element: &WebElement) -> Result<()> {
        self.driver
            .execute("arguments[0].click();", vec![element.to_json()?])
            .await?;
        Ok(())
    }

    async fn clear(&self, element: &WebElement) -> Result<()> {
        element.clear().await?;
        Ok(())
    }

    async fn type_text(&self, element: &WebElement, text: &str) -> Result<()> {
        element.send_keys(text).await?;
        Ok(())
    }

    async fn text(&self, element: &WebElement) -> Result<String> {
        Ok(element.text().await?)
    }

    async fn is_displayed(&self, element: &WebElement) -> Result<bool> {
        Ok(element.is_displayed().await?)
    }

    async fn page_source(&self) -> Result<String> {
        Ok(self.driver.source().await?)
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        self.driver.screenshot(path).await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        let quit = self.driver.clone().quit().await;

        // 即使 quit 失敗也要停止自行啟動的 chromedriver
        let service = self.service.lock().await.take();
        let stopped = match service {
            Some(service) => service.shutdown().await,
            None => Ok(()),
        };

        quit?;
        stopped?;
        tracing::debug!("Browser session closed");
        Ok(())
    }
}
