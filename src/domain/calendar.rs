use crate::utils::error::{Result, WatchError};
use chrono::{NaiveDate, TimeZone};
use chrono_tz::Tz;

pub const DATE_FORMAT: &str = "%d/%m/%Y";

pub fn parse_trip_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        WatchError::InvalidConfigValueError {
            field: "trip.date".to_string(),
            value: value.to_string(),
            reason: format!("Expected DD/MM/YYYY: {}", e),
        }
    })
}

pub fn parse_timezone(value: &str) -> Result<Tz> {
    value
        .parse::<Tz>()
        .map_err(|e| WatchError::InvalidConfigValueError {
            field: "site.calendar_timezone".to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// 目標日期在指定時區午夜的 epoch 毫秒，對應日曆格子的 `data-time`
///
/// 只依賴設定的時區，不受執行主機本地時區影響。
pub fn midnight_timestamp_ms(date: NaiveDate, tz: Tz) -> Result<i64> {
    let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| WatchError::ConfigError {
        message: format!("Cannot build midnight for {}", date),
    })?;

    // 夏令時間切換剛好在午夜時取較早的時刻
    let local = tz
        .from_local_datetime(&midnight)
        .earliest()
        .ok_or_else(|| WatchError::InvalidConfigValueError {
            field: "trip.date".to_string(),
            value: date.format(DATE_FORMAT).to_string(),
            reason: format!("Midnight does not exist in {}", tz),
        })?;

    Ok(local.timestamp_millis())
}

/// 帶有目標 `data-time` 屬性的日曆格子 CSS 選擇器
pub fn day_cell_selector(day_cell_css: &str, timestamp_ms: i64) -> String {
    format!("{}[data-time='{}']", day_cell_css, timestamp_ms)
}

/// 解析日期字串並直接算出時間戳
pub fn trip_timestamp_ms(date: &str, timezone: &str) -> Result<i64> {
    let date = parse_trip_date(date)?;
    let tz = parse_timezone(timezone)?;
    midnight_timestamp_ms(date, tz)
}
