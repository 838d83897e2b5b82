// Adapters layer: concrete implementations of the domain ports (browser, email, clock).

pub mod chromedriver;
pub mod clock;
pub mod smtp;
pub mod webdriver;

pub use chromedriver::ChromeDriverService;
pub use clock::TokioClock;
pub use smtp::SmtpNotifier;
pub use webdriver::{ChromeSessionDriver, WebDriverBrowser};
