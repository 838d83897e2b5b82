use serde::{Deserialize, Serialize};
use std::fmt;

/// 要監控的車次：起訖站、日期 (`DD/MM/YYYY`) 與出發時間 (`HH:MM`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripQuery {
    pub origin: String,
    pub destination: String,
    pub date: String,
    pub departure_time: String,
}

/// 寄件者、密碼與收件者，只從環境變數讀取
#[derive(Clone, Default)]
pub struct Credentials {
    pub sender: String,
    pub secret: String,
    pub recipient: String,
}

impl Credentials {
    pub const SENDER_VAR: &'static str = "EMAIL_SENDER";
    pub const SECRET_VAR: &'static str = "EMAIL_APP_PASSWORD";
    pub const RECIPIENT_VAR: &'static str = "EMAIL_RECIPIENT";

    /// 缺少的值保留為空字串，寄信時才會以認證失敗的形式出現
    pub fn from_env() -> Self {
        Self {
            sender: std::env::var(Self::SENDER_VAR).unwrap_or_default(),
            secret: std::env::var(Self::SECRET_VAR).unwrap_or_default(),
            recipient: std::env::var(Self::RECIPIENT_VAR).unwrap_or_default(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("sender", &self.sender)
            .field("secret", &"<redacted>")
            .field("recipient", &self.recipient)
            .finish()
    }
}

/// 結果列表中的一列；只在單次檢查中存在
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub departure: String,
    pub priced: bool,
}

impl ResultRow {
    pub fn new(departure: impl Into<String>, priced: bool) -> Self {
        Self {
            departure: departure.into(),
            priced,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// 目標車次有價格，可購票
    Available,
    /// 目標車次存在但沒有價格 (售完或無票價)
    Unavailable,
    /// 結果列表中沒有目標車次
    NotFound,
    /// 官方訊息：該日期沒有車次
    NoService,
}

impl Availability {
    /// 是否結束監控 (可購票或確定沒有車次)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Availability::Available | Availability::NoService)
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Availability::Available => "available",
            Availability::Unavailable => "unavailable",
            Availability::NotFound => "not found",
            Availability::NoService => "no service",
        };
        f.write_str(label)
    }
}

/// 已組好的通知信件內容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertEmail {
    pub subject: String,
    pub html_body: String,
}
