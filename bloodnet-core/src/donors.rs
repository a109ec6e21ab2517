//! Danh bạ người hiến: lọc theo từ khoá/nhóm máu, trạng thái online làm mới định kỳ.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{BloodNetConfig, BloodNetError, BloodType, Scheduled, Visibility, Widget};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Donor {
    pub id: String,
    pub name: String,
    pub blood_type: BloodType,
    pub location: String,
    #[serde(default)]
    pub online: bool,
}

/// Bộ lọc nhóm máu: tất cả hoặc đúng một nhóm.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BloodTypeFilter {
    #[default]
    All,
    Only(BloodType),
}

impl BloodTypeFilter {
    pub fn accepts(self, blood_type: BloodType) -> bool {
        match self {
            BloodTypeFilter::All => true,
            BloodTypeFilter::Only(selected) => selected == blood_type,
        }
    }
}

impl FromStr for BloodTypeFilter {
    type Err = BloodNetError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(BloodTypeFilter::All);
        }
        value.parse().map(BloodTypeFilter::Only)
    }
}

/// Người hiến khớp khi từ khoá (không phân biệt hoa thường) nằm trong tên,
/// nhóm máu hoặc địa điểm, và nhóm máu qua được bộ lọc.
pub fn matches(donor: &Donor, query: &str, filter: BloodTypeFilter) -> bool {
    if !filter.accepts(donor.blood_type) {
        return false;
    }

    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }

    [
        donor.name.to_lowercase(),
        donor.blood_type.label().to_lowercase(),
        donor.location.to_lowercase(),
    ]
    .iter()
    .any(|text| text.contains(&query))
}

/// Danh sách mẫu khi trang không cung cấp dữ liệu.
pub fn sample_roster() -> Vec<Donor> {
    [
        ("d-101", "Anika Rao", BloodType::OPositive, "Downtown"),
        ("d-102", "Marcus Lee", BloodType::ANegative, "Riverside"),
        ("d-103", "Priya Nair", BloodType::BPositive, "North Hills"),
        ("d-104", "Tomás García", BloodType::ONegative, "Harbor District"),
        ("d-105", "Grace Kim", BloodType::AbPositive, "University Park"),
        ("d-106", "Samuel Okafor", BloodType::APositive, "Riverside"),
    ]
    .into_iter()
    .map(|(id, name, blood_type, location)| Donor {
        id: id.to_string(),
        name: name.to_string(),
        blood_type,
        location: location.to_string(),
        online: true,
    })
    .collect()
}

fn online_ratio(configured: f64) -> f64 {
    if configured.is_nan() {
        return BloodNetConfig::default().presence_online_ratio;
    }
    configured.clamp(0.0, 1.0)
}

#[derive(Debug, Clone, PartialEq)]
pub enum DirectoryAction {
    Start,
    Toggle,
    /// Người dùng gõ vào ô tìm kiếm; chỉ áp dụng sau thời gian debounce.
    Search(String),
    ApplySearch { generation: u64 },
    Filter(BloodTypeFilter),
    RefreshPresence,
}

#[derive(Debug, Clone)]
pub struct DonorDirectory {
    visibility: Visibility,
    donors: Vec<Donor>,
    draft_query: String,
    query: String,
    search_generation: u64,
    filter: BloodTypeFilter,
    refresh_every: Duration,
    debounce: Duration,
    online_ratio: f64,
    armed: bool,
    rng: StdRng,
}

impl DonorDirectory {
    pub fn new(config: &BloodNetConfig, donors: Vec<Donor>) -> Self {
        Self::with_rng(config, donors, StdRng::from_entropy())
    }

    pub fn with_seed(config: &BloodNetConfig, donors: Vec<Donor>, seed: u64) -> Self {
        Self::with_rng(config, donors, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &BloodNetConfig, donors: Vec<Donor>, rng: StdRng) -> Self {
        Self {
            visibility: Visibility::Open,
            donors,
            draft_query: String::new(),
            query: String::new(),
            search_generation: 0,
            filter: BloodTypeFilter::All,
            refresh_every: config.presence_refresh(),
            debounce: config.search_debounce(),
            online_ratio: online_ratio(config.presence_online_ratio),
            armed: false,
            rng,
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn donors(&self) -> &[Donor] {
        &self.donors
    }

    /// Nội dung ô tìm kiếm (có thể chưa được áp dụng).
    pub fn draft_query(&self) -> &str {
        &self.draft_query
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filter(&self) -> BloodTypeFilter {
        self.filter
    }

    pub fn visible(&self) -> Vec<&Donor> {
        self.donors
            .iter()
            .filter(|donor| matches(donor, &self.query, self.filter))
            .collect()
    }

    fn refresh_presence(&mut self) -> usize {
        let ratio = self.online_ratio;
        let rng = &mut self.rng;
        self.donors
            .iter_mut()
            .map(|donor| {
                donor.online = rng.gen_bool(ratio);
                donor.online
            })
            .filter(|online| *online)
            .count()
    }
}

impl Widget for DonorDirectory {
    type Action = DirectoryAction;

    fn update(&mut self, action: DirectoryAction, _now: DateTime<Utc>) -> Vec<Scheduled<DirectoryAction>> {
        match action {
            DirectoryAction::Start => {
                if self.armed {
                    return Vec::new();
                }
                self.armed = true;
                vec![Scheduled::after(self.refresh_every, DirectoryAction::RefreshPresence)]
            }
            DirectoryAction::Toggle => {
                self.visibility = self.visibility.toggled();
                Vec::new()
            }
            DirectoryAction::Search(text) => {
                self.draft_query = text;
                self.search_generation += 1;
                vec![Scheduled::after(
                    self.debounce,
                    DirectoryAction::ApplySearch {
                        generation: self.search_generation,
                    },
                )]
            }
            DirectoryAction::ApplySearch { generation } => {
                if generation == self.search_generation {
                    self.query = self.draft_query.clone();
                }
                Vec::new()
            }
            DirectoryAction::Filter(filter) => {
                self.filter = filter;
                Vec::new()
            }
            DirectoryAction::RefreshPresence => {
                let online = self.refresh_presence();
                tracing::debug!(online, total = self.donors.len(), "donors: làm mới trạng thái online");
                vec![Scheduled::after(self.refresh_every, DirectoryAction::RefreshPresence)]
            }
        }
    }
}
