use crate::config::WatchConfig;
use crate::core::results::AvailabilityCheck;
use crate::core::search::SearchFlow;
use crate::domain::alert::compose_alert;
use crate::domain::model::Availability;
use crate::domain::ports::{Browser, Clock, Notifier, SessionDriver};
use crate::utils::error::Result;

pub const SCREENSHOT_PREFIX: &str = "error_renfe";

/// 連續監控的結束結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchReport {
    pub attempts: u32,
    pub outcome: Availability,
}

/// 失敗截圖檔名；連續模式帶有嘗試次數
pub fn screenshot_file_name(attempt: Option<u32>) -> String {
    match attempt {
        Some(n) => format!("{}_{}.png", SCREENSHOT_PREFIX, n),
        None => format!("{}.png", SCREENSHOT_PREFIX),
    }
}

pub struct Watcher<D: SessionDriver, N: Notifier, K: Clock> {
    driver: D,
    notifier: N,
    clock: K,
    config: WatchConfig,
}

impl<D: SessionDriver, N: Notifier, K: Clock> Watcher<D, N, K> {
    pub fn new(driver: D, notifier: N, clock: K, config: WatchConfig) -> Self {
        Self {
            driver,
            notifier,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    /// 單次檢查；錯誤直接往上傳
    pub async fn run_once(&self) -> Result<Availability> {
        self.check(None).await
    }

    /// 持續檢查直到可購票或確定沒有車次；錯誤只記錄後重試
    pub async fn run_until_resolved(&self) -> WatchReport {
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            match self.check(Some(attempt)).await {
                Ok(outcome) if outcome.is_terminal() => {
                    tracing::info!("🏁 Finished after {} attempt(s): {}", attempt, outcome);
                    return WatchReport {
                        attempts: attempt,
                        outcome,
                    };
                }
                Ok(outcome) => {
                    tracing::info!(
                        "🔄 Train {} ({}). Retrying in {:.1} minutes",
                        self.config.trip.departure_time,
                        outcome,
                        self.config.retry_interval().as_secs_f64() / 60.0
                    );
                }
                Err(e) => {
                    tracing::error!(
                        "❌ Attempt #{} failed: {} - {}",
                        attempt,
                        e.kind(),
                        e.first_line()
                    );
                    tracing::info!("💡 Suggestion: {}", e.recovery_suggestion());
                }
            }

            self.clock.sleep(self.config.retry_interval()).await;
        }
    }

    /// 一次完整流程：啟動瀏覽器、搜尋、判斷、通知；瀏覽器在所有路徑上都只關閉一次。
    /// 錯誤由呼叫端記錄
    pub async fn check(&self, attempt: Option<u32>) -> Result<Availability> {
        tracing::info!("{}", "=".repeat(50));
        tracing::info!(
            "🚆 Starting check #{} - {}",
            attempt.unwrap_or(1),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        );

        let session = self.driver.launch().await?;

        let result = self.evaluate(&session).await;

        match &result {
            Ok(Availability::Available) => self.send_alert().await,
            Ok(_) => {}
            Err(_) if self.config.screenshot_on_failure() => {
                self.capture_failure(&session, attempt).await;
            }
            Err(_) => {}
        }

        if let Err(e) = session.close().await {
            tracing::warn!("Browser session did not close cleanly: {}", e.first_line());
        }

        result
    }

    async fn evaluate(&self, session: &D::Session) -> Result<Availability> {
        SearchFlow::new(session, &self.config, &self.clock)
            .run()
            .await?;
        AvailabilityCheck::new(session, &self.config).run().await
    }

    /// 通知失敗只記錄，不影響本次判斷結果
    async fn send_alert(&self) {
        tracing::info!("✉️ Seats available! Sending notification email");
        let email = compose_alert(&self.config.trip, self.config.base_url());
        match self.notifier.notify(&email).await {
            Ok(()) => tracing::info!("✉️ Notification email sent"),
            Err(e) => tracing::error!("❌ Failed to send notification email: {}", e),
        }
    }

    async fn capture_failure(&self, session: &D::Session, attempt: Option<u32>) {
        let path = self.config.screenshot_dir().join(screenshot_file_name(attempt));
        match session.screenshot(&path).await {
            Ok(()) => tracing::info!("📸 Screenshot saved to {}", path.display()),
            Err(e) => tracing::warn!("Could not save screenshot: {}", e.first_line()),
        }
    }
}
