//! Mô hình hiển thị thuần: trạng thái widget -> dữ liệu để dựng markup.
//! Không phụ thuộc Yew nên kiểm thử được trên host.

use bloodnet_core::assistant::{AssistantSender, Suggestion};
use bloodnet_core::time::relative_label;
use bloodnet_core::{
    Assistant, BloodType, BloodTypeFilter, ChatPanel, ChatSender, Donor, DonorDirectory, Inventory,
};
use chrono::{DateTime, Utc};

/// Phía hiển thị của bong bóng chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Outgoing,
    Incoming,
}

impl Side {
    pub fn class(self) -> &'static str {
        match self {
            Side::Outgoing => "bn-bubble is-outgoing",
            Side::Incoming => "bn-bubble is-incoming",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BubbleView {
    pub key: i64,
    pub side: Side,
    pub text: String,
    pub meta: String,
    pub delivered: bool,
}

pub fn assistant_bubbles(assistant: &Assistant, now: DateTime<Utc>) -> Vec<BubbleView> {
    assistant
        .transcript()
        .iter()
        .map(|message| match message.sender {
            AssistantSender::User => BubbleView {
                key: message.id,
                side: Side::Outgoing,
                text: message.text.clone(),
                meta: relative_label(message.timestamp, now),
                delivered: false,
            },
            AssistantSender::Assistant => BubbleView {
                key: message.id,
                side: Side::Incoming,
                text: message.text.clone(),
                meta: "AI Assistant".to_string(),
                delivered: false,
            },
        })
        .collect()
}

pub fn assistant_chips(assistant: &Assistant) -> Vec<Suggestion> {
    assistant.suggestions().to_vec()
}

pub fn chat_bubbles(panel: &ChatPanel, now: DateTime<Utc>) -> Vec<BubbleView> {
    panel
        .messages()
        .iter()
        .map(|message| BubbleView {
            key: message.id,
            side: match message.sender {
                ChatSender::User => Side::Outgoing,
                ChatSender::Donor => Side::Incoming,
            },
            text: message.text.clone(),
            meta: relative_label(message.timestamp, now),
            delivered: message.delivered,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockCardView {
    pub blood_type: BloodType,
    pub label: &'static str,
    pub count: u32,
    pub urgent: bool,
}

impl StockCardView {
    pub fn class(&self) -> &'static str {
        if self.urgent {
            "bn-stock-card is-urgent"
        } else {
            "bn-stock-card"
        }
    }
}

pub fn stock_cards(inventory: &Inventory) -> Vec<StockCardView> {
    inventory
        .entries()
        .map(|entry| StockCardView {
            blood_type: entry.blood_type,
            label: entry.blood_type.label(),
            count: entry.count,
            urgent: entry.urgent,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonorCardView {
    pub id: String,
    pub name: String,
    pub blood_type: &'static str,
    pub location: String,
    pub status: &'static str,
    pub online: bool,
}

fn donor_card(donor: &Donor) -> DonorCardView {
    DonorCardView {
        id: donor.id.clone(),
        name: donor.name.clone(),
        blood_type: donor.blood_type.label(),
        location: donor.location.clone(),
        status: if donor.online { "Online" } else { "Offline" },
        online: donor.online,
    }
}

pub fn donor_cards(directory: &DonorDirectory) -> Vec<DonorCardView> {
    directory.visible().into_iter().map(donor_card).collect()
}

/// Chip lọc nhóm máu: nhãn, bộ lọc, đang chọn hay không.
pub fn filter_chips(active: BloodTypeFilter) -> Vec<(&'static str, BloodTypeFilter, bool)> {
    std::iter::once(("All", BloodTypeFilter::All))
        .chain(
            BloodType::ALL
                .into_iter()
                .map(|blood_type| (blood_type.label(), BloodTypeFilter::Only(blood_type))),
        )
        .map(|(label, filter)| (label, filter, filter == active))
        .collect()
}
