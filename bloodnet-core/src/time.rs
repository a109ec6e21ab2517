//! Tiện ích thời gian: id tin nhắn theo thời gian và nhãn thời gian tương đối.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Sinh id tin nhắn dựa trên mili giây hiện tại, luôn tăng ngặt.
#[derive(Debug, Clone, Default)]
pub struct IdSequence {
    last: i64,
}

impl IdSequence {
    pub fn starting_after(last: i64) -> Self {
        Self { last }
    }

    pub fn next(&mut self, now: DateTime<Utc>) -> i64 {
        let id = now.timestamp_millis().max(self.last + 1);
        self.last = id;
        id
    }
}

/// Nhãn hiển thị cạnh bong bóng chat ("Just now", "5m ago", ...).
pub fn relative_label(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = now.signed_duration_since(timestamp).num_minutes();
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes}m ago");
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }

    timestamp.format("%Y-%m-%d").to_string()
}

pub(crate) fn to_chrono(delay: Duration) -> chrono::Duration {
    chrono::Duration::from_std(delay).unwrap_or_else(|_| chrono::Duration::zero())
}
