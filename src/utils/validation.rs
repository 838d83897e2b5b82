use crate::utils::error::{Result, WatchError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(WatchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(WatchError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(WatchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(WatchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(WatchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(WatchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(WatchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(WatchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 出發時間必須是 `HH:MM` (與結果頁顯示格式一致)
pub fn validate_departure_time(field_name: &str, value: &str) -> Result<()> {
    let invalid = |reason: &str| WatchError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let (hours, minutes) = value
        .split_once(':')
        .ok_or_else(|| invalid("Expected HH:MM"))?;

    if hours.len() != 2 || minutes.len() != 2 {
        return Err(invalid("Expected HH:MM with two digits each"));
    }

    let hours: u32 = hours.parse().map_err(|_| invalid("Hours are not a number"))?;
    let minutes: u32 = minutes
        .parse()
        .map_err(|_| invalid("Minutes are not a number"))?;

    if hours > 23 || minutes > 59 {
        return Err(invalid("Time out of range"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("site.base_url", "https://www.renfe.com/es/es").is_ok());
        assert!(validate_url("browser.webdriver_url", "http://localhost:9515").is_ok());
        assert!(validate_url("site.base_url", "").is_err());
        assert!(validate_url("site.base_url", "invalid-url").is_err());
        assert!(validate_url("site.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("timeouts.search_seconds", 20, 1).is_ok());
        assert!(validate_positive_number("timeouts.search_seconds", 0, 1).is_err());
    }

    #[test]
    fn test_validate_departure_time() {
        assert!(validate_departure_time("trip.departure_time", "07:27").is_ok());
        assert!(validate_departure_time("trip.departure_time", "23:59").is_ok());
        assert!(validate_departure_time("trip.departure_time", "7:27").is_err());
        assert!(validate_departure_time("trip.departure_time", "24:00").is_err());
        assert!(validate_departure_time("trip.departure_time", "07:27 h").is_err());
        assert!(validate_departure_time("trip.departure_time", "0727").is_err());
    }
}
