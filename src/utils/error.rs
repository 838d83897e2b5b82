use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("WebDriver error: {0}")]
    WebDriverError(#[from] thirtyfour::error::WebDriverError),

    #[error("SMTP delivery failed: {0}")]
    SmtpError(#[from] lettre::transport::smtp::Error),

    #[error("Email build failed: {0}")]
    EmailBuildError(#[from] lettre::error::Error),

    #[error("Invalid email address: {0}")]
    AddressError(#[from] lettre::address::AddressError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Browser session could not be started: {message}")]
    SessionLaunchError { message: String },

    #[error("Browser operation failed: {message}")]
    BrowserError { message: String },

    #[error("Timed out after {seconds}s waiting for {element}")]
    ElementTimeoutError { element: String, seconds: u64 },

    #[error("Target date {date} not reachable within {pages} calendar pages")]
    DateUnreachableError { date: String, pages: u32 },

    #[error("Results list did not load within {seconds}s")]
    ResultsTimeoutError { seconds: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Browser,
    Site,
    Notification,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl WatchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            WatchError::ConfigError { .. }
            | WatchError::InvalidConfigValueError { .. }
            | WatchError::TomlError(_) => ErrorCategory::Configuration,
            WatchError::WebDriverError(_)
            | WatchError::SessionLaunchError { .. }
            | WatchError::BrowserError { .. } => ErrorCategory::Browser,
            WatchError::ElementTimeoutError { .. }
            | WatchError::DateUnreachableError { .. }
            | WatchError::ResultsTimeoutError { .. } => ErrorCategory::Site,
            WatchError::SmtpError(_)
            | WatchError::EmailBuildError(_)
            | WatchError::AddressError(_) => ErrorCategory::Notification,
            WatchError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Notification => ErrorSeverity::Low,
            ErrorCategory::Site => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Browser => match self {
                WatchError::SessionLaunchError { .. } => ErrorSeverity::Critical,
                _ => ErrorSeverity::Medium,
            },
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 嚴重程度對應的行程結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    /// 錯誤種類名稱，用於日誌
    pub fn kind(&self) -> &'static str {
        match self {
            WatchError::IoError(_) => "IoError",
            WatchError::TomlError(_) => "TomlError",
            WatchError::WebDriverError(_) => "WebDriverError",
            WatchError::SmtpError(_) => "SmtpError",
            WatchError::EmailBuildError(_) => "EmailBuildError",
            WatchError::AddressError(_) => "AddressError",
            WatchError::ConfigError { .. } => "ConfigError",
            WatchError::InvalidConfigValueError { .. } => "InvalidConfigValueError",
            WatchError::SessionLaunchError { .. } => "SessionLaunchError",
            WatchError::BrowserError { .. } => "BrowserError",
            WatchError::ElementTimeoutError { .. } => "ElementTimeoutError",
            WatchError::DateUnreachableError { .. } => "DateUnreachableError",
            WatchError::ResultsTimeoutError { .. } => "ResultsTimeoutError",
        }
    }

    /// 錯誤訊息的第一行 (WebDriver 錯誤常帶有多行堆疊)
    pub fn first_line(&self) -> String {
        self.to_string().lines().next().unwrap_or_default().to_string()
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            WatchError::ConfigError { .. }
            | WatchError::InvalidConfigValueError { .. }
            | WatchError::TomlError(_) => "Check the configuration file and command line overrides",
            WatchError::SessionLaunchError { .. } => {
                "Set browser.chromedriver_path, or make sure chromedriver is running at webdriver_url"
            }
            WatchError::WebDriverError(_) | WatchError::BrowserError { .. } => {
                "Retry later; the browser session may have crashed"
            }
            WatchError::ElementTimeoutError { .. } => {
                "The site markup may have changed; review the [selectors] section"
            }
            WatchError::DateUnreachableError { .. } => {
                "Check that the trip date is in the future and within the bookable window"
            }
            WatchError::ResultsTimeoutError { .. } => {
                "The results page was slow or changed; inspect the failure screenshot"
            }
            WatchError::SmtpError(_)
            | WatchError::EmailBuildError(_)
            | WatchError::AddressError(_) => {
                "Check EMAIL_SENDER, EMAIL_APP_PASSWORD and EMAIL_RECIPIENT"
            }
            WatchError::IoError(_) => "Check file permissions and available disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self.first_line()),
            ErrorCategory::Browser => format!("Browser problem: {}", self.first_line()),
            ErrorCategory::Site => format!("The booking site did not behave as expected: {}", self.first_line()),
            ErrorCategory::Notification => format!("Could not send the alert email: {}", self.first_line()),
            ErrorCategory::System => format!("System error: {}", self.first_line()),
        }
    }
}

pub type Result<T> = std::result::Result<T, WatchError>;
