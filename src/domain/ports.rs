use crate::domain::model::AlertEmail;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// 與瀏覽器驅動無關的元素定位方式
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    Id(String),
    Css(String),
    XPath(String),
}

impl Locator {
    pub fn id(value: impl Into<String>) -> Self {
        Locator::Id(value.into())
    }

    pub fn css(value: impl Into<String>) -> Self {
        Locator::Css(value.into())
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Locator::XPath(value.into())
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locator::Id(v) => write!(f, "#{}", v),
            Locator::Css(v) => write!(f, "css={}", v),
            Locator::XPath(v) => write!(f, "xpath={}", v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitCondition {
    Present,
    Visible,
    Clickable,
}

/// 瀏覽器操作介面；找不到元素以 `None` 表示，不是錯誤
#[async_trait]
pub trait Browser: Send + Sync {
    type Element: Clone + Send + Sync;

    async fn navigate(&self, url: &str) -> Result<()>;
    async fn find(&self, locator: &Locator) -> Result<Option<Self::Element>>;
    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self::Element>>;
    async fn find_within(
        &self,
        parent: &Self::Element,
        locator: &Locator,
    ) -> Result<Option<Self::Element>>;

    /// 等待元素符合條件；逾時回傳 `Ok(None)`
    async fn wait_for(
        &self,
        locator: &Locator,
        condition: WaitCondition,
        timeout: Duration,
    ) -> Result<Option<Self::Element>>;

    async fn click(&self, element: &Self::Element) -> Result<()>;
    /// 以 JavaScript 觸發點擊，用於被遮住的元素
    async fn script_click(&self, element: &Self::Element) -> Result<()>;
    async fn clear(&self, element: &Self::Element) -> Result<()>;
    async fn type_text(&self, element: &Self::Element, text: &str) -> Result<()>;
    async fn text(&self, element: &Self::Element) -> Result<String>;
    async fn is_displayed(&self, element: &Self::Element) -> Result<bool>;
    async fn page_source(&self) -> Result<String>;
    async fn screenshot(&self, path: &Path) -> Result<()>;
    async fn close(&self) -> Result<()>;
}

/// 啟動瀏覽器並回傳可操作的工作階段
#[async_trait]
pub trait SessionDriver: Send + Sync {
    type Session: Browser;

    async fn launch(&self) -> Result<Self::Session>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, email: &AlertEmail) -> Result<()>;
}

/// 可替換的時鐘，測試時不必真的等待
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}
