use crate::config::WatchConfig;
use crate::domain::calendar::day_cell_selector;
use crate::domain::ports::{Browser, Clock, Locator, WaitCondition};
use crate::utils::error::{Result, WatchError};
use std::time::Duration;

/// 首頁搜尋流程：同意 cookies、起訖站、單程、日期、送出
pub struct SearchFlow<'a, B: Browser, K: Clock> {
    browser: &'a B,
    config: &'a WatchConfig,
    clock: &'a K,
}

impl<'a, B: Browser, K: Clock> SearchFlow<'a, B, K> {
    pub fn new(browser: &'a B, config: &'a WatchConfig, clock: &'a K) -> Self {
        Self {
            browser,
            config,
            clock,
        }
    }

    pub async fn run(&self) -> Result<()> {
        let trip = &self.config.trip;
        let selectors = &self.config.selectors;

        tracing::info!("🌐 Opening {}", self.config.base_url());
        self.browser.navigate(self.config.base_url()).await?;

        self.accept_cookies().await?;

        self.fill_station(
            &selectors.origin_input(),
            &selectors.origin_suggestion(),
            &trip.origin,
        )
        .await?;
        self.fill_station(
            &selectors.destination_input(),
            &selectors.destination_suggestion(),
            &trip.destination,
        )
        .await?;

        self.choose_one_way().await?;
        self.select_date().await?;
        self.confirm_date().await?;
        self.submit().await?;

        tracing::info!("🔎 Search submitted, waiting for results");
        Ok(())
    }

    /// 等待必要元素，逾時即為致命錯誤
    async fn wait_required(
        &self,
        locator: &Locator,
        condition: WaitCondition,
        timeout: Duration,
        what: &str,
    ) -> Result<B::Element> {
        self.browser
            .wait_for(locator, condition, timeout)
            .await?
            .ok_or_else(|| WatchError::ElementTimeoutError {
                element: format!("{} ({})", what, locator),
                seconds: timeout.as_secs(),
            })
    }

    /// cookies 對話框可能不存在，找不到不算錯誤
    pub async fn accept_cookies(&self) -> Result<bool> {
        let button = self
            .browser
            .wait_for(
                &self.config.selectors.consent_button(),
                WaitCondition::Clickable,
                self.config.interaction_timeout(),
            )
            .await?;

        match button {
            Some(button) => {
                self.browser.click(&button).await?;
                tracing::info!("🍪 Cookie policy accepted");
                Ok(true)
            }
            None => {
                tracing::info!("🍪 No cookie banner found (already accepted?)");
                Ok(false)
            }
        }
    }

    pub async fn fill_station(
        &self,
        input: &Locator,
        suggestion: &Locator,
        station: &str,
    ) -> Result<()> {
        tracing::debug!("Filling {} with '{}'", input, station);
        let timeout = self.config.interaction_timeout();

        let field = self
            .wait_required(input, WaitCondition::Clickable, timeout, "station input")
            .await?;
        self.browser.click(&field).await?;
        self.browser.clear(&field).await?;
        self.browser.type_text(&field, station).await?;

        // 自動完成清單需要一點時間出現
        self.clock.sleep(self.config.input_pause()).await;

        let option = self
            .wait_required(suggestion, WaitCondition::Clickable, timeout, "station suggestion")
            .await?;
        self.browser.click(&option).await?;

        tracing::info!("🚉 Selected '{}' in {}", station, input);
        Ok(())
    }

    pub async fn choose_one_way(&self) -> Result<()> {
        let selectors = &self.config.selectors;
        let timeout = self.config.interaction_timeout();

        let date_input = self
            .wait_required(&selectors.date_input(), WaitCondition::Clickable, timeout, "date input")
            .await?;
        self.browser.click(&date_input).await?;

        let one_way = self
            .wait_required(
                &selectors.one_way_label(),
                WaitCondition::Clickable,
                timeout,
                "one-way option",
            )
            .await?;
        self.browser.click(&one_way).await?;

        self.clock.sleep(self.config.input_pause()).await;
        Ok(())
    }

    /// 往後翻月直到目標日期出現；回傳翻了幾頁
    pub async fn select_date(&self) -> Result<u32> {
        let selectors = &self.config.selectors;
        let timestamp = self.config.target_timestamp_ms()?;
        let day = Locator::css(day_cell_selector(&selectors.day_cell_css, timestamp));
        let max_pages = self.config.max_calendar_pages();

        tracing::info!(
            "📅 Looking for {} (data-time={})",
            self.config.trip.date,
            timestamp
        );

        for page in 0..=max_pages {
            if let Some(cell) = self.browser.find(&day).await? {
                if self.browser.is_displayed(&cell).await? {
                    self.browser.click(&cell).await?;
                    tracing::info!("📅 Date selected after {} page(s)", page);
                    return Ok(page);
                }
            }

            if page == max_pages {
                break;
            }

            let next = self
                .wait_required(
                    &selectors.next_month(),
                    WaitCondition::Clickable,
                    self.config.interaction_timeout(),
                    "calendar next-month button",
                )
                .await?;
            self.browser.click(&next).await?;
            self.clock.sleep(self.config.calendar_pause()).await;
        }

        Err(WatchError::DateUnreachableError {
            date: self.config.trip.date.clone(),
            pages: max_pages,
        })
    }

    /// 「Aceptar」按鈕可能被遮住，改用 JavaScript 點擊
    pub async fn confirm_date(&self) -> Result<()> {
        let apply = self
            .wait_required(
                &self.config.selectors.apply_button(),
                WaitCondition::Present,
                self.config.interaction_timeout(),
                "calendar apply button",
            )
            .await?;
        self.browser.script_click(&apply).await?;
        tracing::debug!("Calendar apply triggered");
        Ok(())
    }

    pub async fn submit(&self) -> Result<()> {
        let search = self
            .wait_required(
                &self.config.selectors.search_button(),
                WaitCondition::Clickable,
                self.config.interaction_timeout(),
                "search button",
            )
            .await?;
        self.browser.click(&search).await
    }
}
