use crate::domain::model::{Availability, ResultRow};

/// 清理結果頁的時間標籤：`" 07:27 h "` -> `"07:27"`
pub fn normalize_time_label(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_unit = trimmed.strip_suffix('h').unwrap_or(trimmed);
    without_unit.trim().to_string()
}

/// 時間相符的列：有價格即可購票
pub fn row_outcome(priced: bool) -> Availability {
    if priced {
        Availability::Available
    } else {
        Availability::Unavailable
    }
}

/// 依照文件順序掃描，第一個時間相符的列決定結果 (假設同一時間只有一班車)
pub fn classify(rows: &[ResultRow], target_time: &str) -> Availability {
    rows.iter()
        .find(|row| row.departure == target_time)
        .map_or(Availability::NotFound, |row| row_outcome(row.priced))
}

/// 頁面是否包含官方的「無車次」訊息
pub fn is_no_service_page(page_source: &str, no_service_text: &str) -> bool {
    !no_service_text.is_empty() && page_source.contains(no_service_text)
}
