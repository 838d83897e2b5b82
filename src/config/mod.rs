pub mod site;
pub mod toml_config;

pub use site::SiteSelectors;
pub use toml_config::WatchConfig;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "renfe-watch")]
#[command(about = "Watch a Renfe departure and send an email when seats go on sale")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = toml_config::DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Check once and exit instead of polling until seats appear
    #[arg(long)]
    pub once: bool,

    /// Override the retry interval in seconds
    #[arg(long)]
    pub interval: Option<u64>,

    /// Override the origin station
    #[arg(long)]
    pub origin: Option<String>,

    /// Override the destination station
    #[arg(long)]
    pub destination: Option<String>,

    /// Override the trip date (DD/MM/YYYY)
    #[arg(long)]
    pub date: Option<String>,

    /// Override the departure time (HH:MM)
    #[arg(long)]
    pub time: Option<String>,

    /// Show the browser window
    #[arg(long)]
    pub headful: bool,

    /// Start this chromedriver binary for each check instead of using webdriver_url
    #[arg(long, value_name = "PATH")]
    pub chromedriver: Option<String>,

    /// Show the resolved configuration without launching a browser
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(feature = "cli")]
impl CliArgs {
    /// 命令列覆蓋設定；回傳被覆蓋的欄位名稱
    pub fn apply_to(&self, config: &mut WatchConfig) -> Vec<&'static str> {
        let mut overridden = Vec::new();

        if let Some(origin) = &self.origin {
            config.trip.origin = origin.clone();
            overridden.push("trip.origin");
        }
        if let Some(destination) = &self.destination {
            config.trip.destination = destination.clone();
            overridden.push("trip.destination");
        }
        if let Some(date) = &self.date {
            config.trip.date = date.clone();
            overridden.push("trip.date");
        }
        if let Some(time) = &self.time {
            config.trip.departure_time = time.clone();
            overridden.push("trip.departure_time");
        }
        if let Some(interval) = self.interval {
            config.monitor.interval_seconds = Some(interval);
            overridden.push("monitor.interval_seconds");
        }
        if self.headful {
            config.browser.headless = Some(false);
            overridden.push("browser.headless");
        }
        if let Some(path) = &self.chromedriver {
            config.browser.chromedriver_path = Some(path.clone());
            overridden.push("browser.chromedriver_path");
        }

        overridden
    }
}
