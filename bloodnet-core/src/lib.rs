//! Logic lõi cho các widget BloodNet: trợ lý trả lời sẵn, bảng tồn kho máu,
//! khung chat mô phỏng và danh bạ người hiến.
//!
//! Mọi widget là một máy trạng thái thuần: `update(action)` đổi trạng thái và
//! trả về các tác vụ trì hoãn (`Scheduled`) để host (trình duyệt, CLI, test)
//! tự chạy hẹn giờ.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod assistant;
pub mod chat;
pub mod donors;
pub mod inventory;
pub mod task;
pub mod time;

pub use assistant::{resolve, Assistant, AssistantAction, MatchKind, Resolution, TopicEntry};
pub use chat::{ChatAction, ChatMessage, ChatPanel, ChatSender};
pub use donors::{BloodTypeFilter, DirectoryAction, Donor, DonorDirectory};
pub use inventory::{
    BloodType, Dashboard, DashboardAction, Inventory, StockChange, StockDetail, StockEntry,
    StockSource,
};
pub use task::{DelayQueue, Scheduled, Simulation, TaskId};

/// Cấu hình thời gian trễ, chu kỳ làm mới và ngưỡng khẩn cấp.
/// Trường thiếu khi deserialize lấy giá trị mặc định.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BloodNetConfig {
    /// Thời gian "suy nghĩ" giả lập của trợ lý (ms).
    pub assistant_reply_delay_ms: u64,
    /// Độ trễ trước khi người hiến trả lời trong khung chat (ms).
    pub donor_reply_delay_ms: u64,
    /// Thời gian hiển thị chỉ báo "đang gõ" (ms).
    pub typing_indicator_ms: u64,
    /// Chu kỳ random walk tồn kho (giây).
    pub stock_refresh_secs: u64,
    /// Chu kỳ làm mới trạng thái online của người hiến (giây).
    pub presence_refresh_secs: u64,
    /// Xác suất một người hiến đang online sau mỗi lần làm mới.
    pub presence_online_ratio: f64,
    /// Độ trễ debounce ô tìm kiếm người hiến (ms).
    pub search_debounce_ms: u64,
    /// Dưới ngưỡng này nhóm máu bị coi là khẩn cấp.
    pub urgent_threshold: u32,
    pub stock_source: StockSource,
}

impl Default for BloodNetConfig {
    fn default() -> Self {
        Self {
            assistant_reply_delay_ms: 1_000,
            donor_reply_delay_ms: 2_000,
            typing_indicator_ms: 3_000,
            stock_refresh_secs: 30,
            presence_refresh_secs: 15,
            presence_online_ratio: 0.7,
            search_debounce_ms: 300,
            urgent_threshold: 10,
            stock_source: StockSource::Simulated,
        }
    }
}

/// Chu kỳ lặp lại ngắn nhất; chu kỳ 0 sẽ tự kích hoạt liên tục.
pub const MIN_REFRESH_PERIOD: Duration = Duration::from_secs(1);
/// Mọi độ trễ cấu hình được giới hạn ở một ngày.
pub const MAX_DELAY: Duration = Duration::from_secs(24 * 60 * 60);

impl BloodNetConfig {
    pub fn assistant_reply_delay(&self) -> Duration {
        bounded_delay(Duration::from_millis(self.assistant_reply_delay_ms))
    }

    pub fn donor_reply_delay(&self) -> Duration {
        bounded_delay(Duration::from_millis(self.donor_reply_delay_ms))
    }

    pub fn typing_indicator(&self) -> Duration {
        bounded_delay(Duration::from_millis(self.typing_indicator_ms))
    }

    pub fn stock_refresh(&self) -> Duration {
        bounded_period(Duration::from_secs(self.stock_refresh_secs))
    }

    pub fn presence_refresh(&self) -> Duration {
        bounded_period(Duration::from_secs(self.presence_refresh_secs))
    }

    pub fn search_debounce(&self) -> Duration {
        bounded_delay(Duration::from_millis(self.search_debounce_ms))
    }
}

fn bounded_delay(delay: Duration) -> Duration {
    delay.min(MAX_DELAY)
}

fn bounded_period(period: Duration) -> Duration {
    period.clamp(MIN_REFRESH_PERIOD, MAX_DELAY)
}

/// Trạng thái hiển thị của một widget (mở/đóng).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Open,
    #[default]
    Closed,
}

impl Visibility {
    pub fn toggled(self) -> Self {
        match self {
            Visibility::Open => Visibility::Closed,
            Visibility::Closed => Visibility::Open,
        }
    }

    pub fn is_open(self) -> bool {
        self == Visibility::Open
    }
}

/// Định danh widget mà trang host có thể bật/tắt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WidgetId {
    Assistant,
    Inventory,
    Chat,
    Donors,
}

impl FromStr for WidgetId {
    type Err = BloodNetError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "assistant" => Ok(WidgetId::Assistant),
            "inventory" => Ok(WidgetId::Inventory),
            "chat" => Ok(WidgetId::Chat),
            "donors" => Ok(WidgetId::Donors),
            other => Err(BloodNetError::UnknownWidget(other.to_string())),
        }
    }
}

/// Kết quả gửi một tin nhắn từ ô nhập.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<A> {
    /// Tin nhắn đã vào transcript; `follow_up` là phản hồi trì hoãn.
    Accepted { id: i64, follow_up: Scheduled<A> },
    /// Ô nhập rỗng (sau khi trim): không làm gì, không báo lỗi.
    EmptyInputIgnored,
}

impl<A> Submission<A> {
    pub fn into_follow_ups(self) -> Vec<Scheduled<A>> {
        match self {
            Submission::Accepted { follow_up, .. } => vec![follow_up],
            Submission::EmptyInputIgnored => Vec::new(),
        }
    }
}

/// Máy trạng thái của một widget, kiểu reducer.
pub trait Widget {
    type Action;

    /// Áp dụng `action` tại thời điểm `now`, trả về các action cần chạy sau.
    fn update(&mut self, action: Self::Action, now: DateTime<Utc>) -> Vec<Scheduled<Self::Action>>;
}

/// Lỗi chung của các widget.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BloodNetError {
    #[error("Không tìm thấy container: {0}")]
    ContainerMissing(String),
    #[error("Nhóm máu không hợp lệ: {0}")]
    UnknownBloodType(String),
    #[error("Widget không hợp lệ: {0}")]
    UnknownWidget(String),
    #[error("Dữ liệu đầu vào thiếu thông tin tối thiểu")]
    MissingData,
    #[error("Không đọc được dữ liệu: {0}")]
    Parse(String),
}
