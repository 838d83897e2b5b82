use clap::Parser;
use renfe_watch::adapters::{ChromeSessionDriver, SmtpNotifier, TokioClock};
use renfe_watch::domain::calendar::day_cell_selector;
use renfe_watch::utils::{logger, validation::Validate};
use renfe_watch::{Availability, CliArgs, Credentials, WatchConfig, Watcher};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting renfe-watch");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match WatchConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    for field in args.apply_to(&mut config) {
        tracing::info!("🔧 {} overridden from command line", field);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no browser will be started");
        return Ok(());
    }

    let driver = ChromeSessionDriver::from_config(&config);
    let notifier = SmtpNotifier::from_config(&config, Credentials::from_env());
    let watcher = Watcher::new(driver, notifier, TokioClock, config);

    if args.once {
        match watcher.run_once().await {
            Ok(outcome) => {
                println!("{}", outcome_message(outcome));
            }
            Err(e) => {
                tracing::error!(
                    "❌ Check failed: {} (Category: {:?}, Severity: {:?})",
                    e.first_line(),
                    e.category(),
                    e.severity()
                );
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 {}", e.recovery_suggestion());
                std::process::exit(e.exit_code().max(1));
            }
        }
    } else {
        let report = watcher.run_until_resolved().await;
        println!("{}", outcome_message(report.outcome));
        println!("🔁 Attempts: {}", report.attempts);
    }

    Ok(())
}

fn outcome_message(outcome: Availability) -> &'static str {
    match outcome {
        Availability::Available => "✅ Seats available - notification sent",
        Availability::Unavailable => "⛔ Train found but not on sale",
        Availability::NotFound => "⚠️ Train not found in the results",
        Availability::NoService => "🚫 No trains scheduled for this date",
    }
}

fn display_config_summary(config: &WatchConfig, args: &CliArgs) {
    println!("📋 Watch Summary:");
    println!(
        "  Trip: {} → {} on {} at {}",
        config.trip.origin, config.trip.destination, config.trip.date, config.trip.departure_time
    );
    println!("  Site: {}", config.base_url());
    match config.chromedriver_path() {
        Some(path) => println!("  WebDriver: spawned from {}", path.display()),
        None => println!("  WebDriver: {}", config.webdriver_url()),
    }
    println!("  Headless: {}", config.headless());
    println!("  Calendar timezone: {}", config.calendar_timezone());
    if let Ok(timestamp) = config.target_timestamp_ms() {
        println!(
            "  Day cell: {}",
            day_cell_selector(&config.selectors.day_cell_css, timestamp)
        );
    }
    println!("  SMTP: {}:{}", config.smtp_host(), config.smtp_port());

    if args.once {
        println!("  Mode: single check");
    } else {
        println!(
            "  Mode: continuous, every {}s",
            config.retry_interval().as_secs()
        );
    }
    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }
    println!();
}
