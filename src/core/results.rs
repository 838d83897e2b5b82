use crate::config::WatchConfig;
use crate::domain::availability::{is_no_service_page, normalize_time_label, row_outcome};
use crate::domain::model::Availability;
use crate::domain::ports::{Browser, WaitCondition};
use crate::utils::error::{Result, WatchError};

pub struct AvailabilityCheck<'a, B: Browser> {
    browser: &'a B,
    config: &'a WatchConfig,
}

impl<'a, B: Browser> AvailabilityCheck<'a, B> {
    pub fn new(browser: &'a B, config: &'a WatchConfig) -> Self {
        Self { browser, config }
    }

    pub async fn run(&self) -> Result<Availability> {
        let selectors = &self.config.selectors;
        let timeout = self.config.results_timeout();

        let container = self
            .browser
            .wait_for(&selectors.results_container(), WaitCondition::Visible, timeout)
            .await?;

        if container.is_none() {
            let source = self.browser.page_source().await?;
            if is_no_service_page(&source, &selectors.no_service_text) {
                tracing::info!("🚫 Renfe reports no trains for this route and date");
                return Ok(Availability::NoService);
            }
            tracing::warn!("Results page did not load in time");
            return Err(WatchError::ResultsTimeoutError {
                seconds: timeout.as_secs(),
            });
        }

        let target = &self.config.trip.departure_time;
        let availability = self.scan_rows(target).await?;

        match availability {
            Availability::Available => tracing::info!("🎟️ Train {} has a price: AVAILABLE", target),
            Availability::Unavailable => {
                tracing::info!("⛔ Train {} listed without price (sold out or no fares)", target)
            }
            Availability::NotFound => {
                tracing::warn!("⚠️ Train {} not found in the results list", target)
            }
            Availability::NoService => {}
        }

        Ok(availability)
    }

    /// 依文件順序掃描；第一個時間相符的列決定結果，之後的列不再讀取
    async fn scan_rows(&self, target: &str) -> Result<Availability> {
        let selectors = &self.config.selectors;
        let elements = self.browser.find_all(&selectors.result_row()).await?;
        tracing::info!("Found {} trains, analysing", elements.len());

        for element in &elements {
            let Some(label) = self
                .browser
                .find_within(element, &selectors.departure_time())
                .await?
            else {
                tracing::debug!("Skipping row without departure time");
                continue;
            };

            let departure = normalize_time_label(&self.browser.text(&label).await?);
            if departure != target {
                continue;
            }

            let priced = self
                .browser
                .find_within(element, &selectors.price())
                .await?
                .is_some();
            return Ok(row_outcome(priced));
        }

        Ok(Availability::NotFound)
    }
}
