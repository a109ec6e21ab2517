//! Bảng tồn kho máu: 8 nhóm máu cố định, random walk định kỳ, hoặc nhận sự
//! kiện thay đổi từ nguồn dữ liệu thật.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{BloodNetConfig, BloodNetError, Scheduled, Visibility, Widget};

/// Nhóm máu ABO/Rh. Thứ tự khai báo là thứ tự hiển thị thẻ.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodType {
    pub const ALL: [BloodType; 8] = [
        BloodType::APositive,
        BloodType::ANegative,
        BloodType::BPositive,
        BloodType::BNegative,
        BloodType::AbPositive,
        BloodType::AbNegative,
        BloodType::OPositive,
        BloodType::ONegative,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
        }
    }

    /// Số lượng ban đầu khi không có nguồn dữ liệu.
    pub fn default_count(self) -> u32 {
        match self {
            BloodType::APositive => 45,
            BloodType::ANegative => 12,
            BloodType::BPositive => 38,
            BloodType::BNegative => 8,
            BloodType::AbPositive => 15,
            BloodType::AbNegative => 3,
            BloodType::OPositive => 67,
            BloodType::ONegative => 5,
        }
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BloodType {
    type Err = BloodNetError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_uppercase();
        BloodType::ALL
            .into_iter()
            .find(|blood_type| blood_type.label() == normalized)
            .ok_or_else(|| BloodNetError::UnknownBloodType(value.to_string()))
    }
}

/// Nguồn số liệu tồn kho.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StockSource {
    /// Random walk theo chu kỳ.
    #[default]
    Simulated,
    /// Chỉ cập nhật qua sự kiện `StockChange`.
    Feed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StockEntry {
    pub blood_type: BloodType,
    pub count: u32,
    /// Luôn bằng `count < ngưỡng`; tính lại sau mỗi thay đổi.
    pub urgent: bool,
}

/// Sự kiện thay đổi tồn kho từ nguồn thật.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StockChange {
    pub blood_type: BloodType,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InventoryRepr {
    urgent_threshold: u32,
    entries: Vec<StockChange>,
}

/// Bảng tồn kho. Tập khoá cố định: luôn đủ 8 nhóm máu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "InventoryRepr", into = "InventoryRepr")]
pub struct Inventory {
    entries: BTreeMap<BloodType, StockEntry>,
    urgent_threshold: u32,
}

impl From<InventoryRepr> for Inventory {
    fn from(repr: InventoryRepr) -> Self {
        let mut inventory = Inventory::with_threshold(repr.urgent_threshold);
        for change in repr.entries {
            inventory.apply(change);
        }
        inventory
    }
}

impl From<Inventory> for InventoryRepr {
    fn from(inventory: Inventory) -> Self {
        Self {
            urgent_threshold: inventory.urgent_threshold,
            entries: inventory
                .entries()
                .map(|entry| StockChange {
                    blood_type: entry.blood_type,
                    count: entry.count,
                })
                .collect(),
        }
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::with_threshold(BloodNetConfig::default().urgent_threshold)
    }
}

impl Inventory {
    /// Tồn kho mặc định với ngưỡng khẩn cấp cho trước.
    pub fn with_threshold(urgent_threshold: u32) -> Self {
        Self::from_counts(urgent_threshold, BloodType::default_count)
    }

    pub fn from_counts(urgent_threshold: u32, count_for: impl Fn(BloodType) -> u32) -> Self {
        let entries = BloodType::ALL
            .into_iter()
            .map(|blood_type| {
                let count = count_for(blood_type);
                (
                    blood_type,
                    StockEntry {
                        blood_type,
                        count,
                        urgent: count < urgent_threshold,
                    },
                )
            })
            .collect();

        Self {
            entries,
            urgent_threshold,
        }
    }

    pub fn urgent_threshold(&self) -> u32 {
        self.urgent_threshold
    }

    /// Các thẻ theo thứ tự hiển thị.
    pub fn entries(&self) -> impl Iterator<Item = &StockEntry> {
        self.entries.values()
    }

    pub fn get(&self, blood_type: BloodType) -> &StockEntry {
        // Tập khoá đủ 8 nhóm từ lúc khởi tạo.
        &self.entries[&blood_type]
    }

    pub fn urgent_types(&self) -> Vec<BloodType> {
        self.entries()
            .filter(|entry| entry.urgent)
            .map(|entry| entry.blood_type)
            .collect()
    }

    pub fn apply(&mut self, change: StockChange) {
        self.set_count(change.blood_type, change.count);
    }

    fn set_count(&mut self, blood_type: BloodType, count: u32) {
        let threshold = self.urgent_threshold;
        if let Some(entry) = self.entries.get_mut(&blood_type) {
            entry.count = count;
            entry.urgent = count < threshold;
        }
    }

    /// Một bước random walk: mỗi nhóm cộng -1, 0 hoặc +1 (đều nhau), chặn dưới ở 0.
    /// Trả về số nhóm có thay đổi.
    pub fn random_walk<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let mut changed = 0;
        for blood_type in BloodType::ALL {
            let delta: i64 = rng.gen_range(-1..=1);
            let current = i64::from(self.get(blood_type).count);
            let next = u32::try_from((current + delta).max(0)).unwrap_or(u32::MAX);
            if next != self.get(blood_type).count {
                changed += 1;
            }
            self.set_count(blood_type, next);
        }
        changed
    }

    pub fn detail(&self, blood_type: BloodType) -> StockDetail {
        StockDetail::from(self.get(blood_type))
    }
}

/// Nội dung lớp phủ chi tiết khi chọn một thẻ.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StockDetail {
    pub blood_type: BloodType,
    pub count: u32,
    pub urgent: bool,
    pub headline: String,
    pub note: &'static str,
}

impl From<&StockEntry> for StockDetail {
    fn from(entry: &StockEntry) -> Self {
        Self {
            blood_type: entry.blood_type,
            count: entry.count,
            urgent: entry.urgent,
            headline: format!("{} units available", entry.count),
            note: if entry.urgent {
                "Urgent need - Please donate soon!"
            } else {
                "Stock levels are stable"
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardAction {
    /// Gắn widget: bật hẹn giờ làm mới nếu nguồn là mô phỏng.
    Start,
    Toggle,
    Refresh,
    Select(BloodType),
    CloseDetail,
    StockChanged(StockChange),
}

/// Widget bảng tồn kho.
#[derive(Debug, Clone)]
pub struct Dashboard {
    inventory: Inventory,
    visibility: Visibility,
    detail: Option<StockDetail>,
    source: StockSource,
    refresh_every: Duration,
    armed: bool,
    ticks: u64,
    rng: StdRng,
}

impl Dashboard {
    pub fn new(config: &BloodNetConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_seed(config: &BloodNetConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &BloodNetConfig, rng: StdRng) -> Self {
        Self {
            inventory: Inventory::with_threshold(config.urgent_threshold),
            visibility: Visibility::Open,
            detail: None,
            source: config.stock_source,
            refresh_every: config.stock_refresh(),
            armed: false,
            ticks: 0,
            rng,
        }
    }

    /// Thay dữ liệu ban đầu (ví dụ từ feed), giữ ngưỡng khẩn cấp hiện tại.
    pub fn with_inventory(mut self, inventory: Inventory) -> Self {
        let threshold = self.inventory.urgent_threshold();
        self.inventory = Inventory::from_counts(threshold, |blood_type| {
            inventory.get(blood_type).count
        });
        self
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn detail(&self) -> Option<&StockDetail> {
        self.detail.as_ref()
    }

    pub fn source(&self) -> StockSource {
        self.source
    }

    /// Số lần random walk đã chạy.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    fn next_refresh(&self) -> Scheduled<DashboardAction> {
        Scheduled::after(self.refresh_every, DashboardAction::Refresh)
    }
}

impl Widget for Dashboard {
    type Action = DashboardAction;

    fn update(&mut self, action: DashboardAction, _now: DateTime<Utc>) -> Vec<Scheduled<DashboardAction>> {
        match action {
            DashboardAction::Start => {
                if self.armed || self.source == StockSource::Feed {
                    return Vec::new();
                }
                self.armed = true;
                vec![self.next_refresh()]
            }
            DashboardAction::Toggle => {
                self.visibility = self.visibility.toggled();
                Vec::new()
            }
            DashboardAction::Refresh => {
                if self.source == StockSource::Feed {
                    return Vec::new();
                }
                let changed = self.inventory.random_walk(&mut self.rng);
                self.ticks += 1;
                tracing::info!(tick = self.ticks, changed, "inventory: làm mới tồn kho mô phỏng");
                vec![self.next_refresh()]
            }
            DashboardAction::Select(blood_type) => {
                self.detail = Some(self.inventory.detail(blood_type));
                Vec::new()
            }
            DashboardAction::CloseDetail => {
                self.detail = None;
                Vec::new()
            }
            DashboardAction::StockChanged(change) => {
                self.inventory.apply(change);
                Vec::new()
            }
        }
    }
}
