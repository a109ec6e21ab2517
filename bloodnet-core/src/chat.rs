//! Khung chat ẩn danh với người hiến, phản hồi được mô phỏng.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::time::{to_chrono, IdSequence};
use crate::{BloodNetConfig, Scheduled, Submission, Visibility, Widget};

/// Các câu trả lời soạn sẵn của người hiến, chọn ngẫu nhiên đều.
pub static DONOR_REPLIES: [&str; 8] = [
    "I understand. Let me check my schedule.",
    "That works for me. I'll be there soon.",
    "Thank you for the information. I'm on my way.",
    "Perfect! I'll bring my ID and medical records.",
    "I'm available now. What's the exact location?",
    "I've donated before, so I know the process.",
    "Is there anything specific I need to know?",
    "I'm ready to help. Every life matters!",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChatSender {
    User,
    Donor,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub id: i64,
    pub sender: ChatSender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub delivered: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChatAction {
    /// Mở khung chat, tuỳ chọn ghi nhận người hiến đang trò chuyện.
    Open { donor_id: Option<String> },
    Close,
    Toggle,
    Input(String),
    Send,
    DonorReply,
    TypingExpired { generation: u64 },
}

/// Trạng thái khung chat. Transcript chỉ được nối thêm.
#[derive(Debug, Clone)]
pub struct ChatPanel {
    visibility: Visibility,
    messages: Vec<ChatMessage>,
    input: String,
    typing: bool,
    typing_generation: u64,
    partner: Option<String>,
    reply_delay: Duration,
    typing_duration: Duration,
    ids: IdSequence,
    rng: StdRng,
}

impl ChatPanel {
    pub fn new(config: &BloodNetConfig, now: DateTime<Utc>) -> Self {
        Self::with_rng(config, now, StdRng::from_entropy())
    }

    pub fn with_seed(config: &BloodNetConfig, now: DateTime<Utc>, seed: u64) -> Self {
        Self::with_rng(config, now, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &BloodNetConfig, now: DateTime<Utc>, rng: StdRng) -> Self {
        let messages = sample_messages(now);
        let last_id = messages.last().map_or(0, |message| message.id);

        Self {
            visibility: Visibility::Closed,
            messages,
            input: String::new(),
            typing: false,
            typing_generation: 0,
            partner: None,
            reply_delay: config.donor_reply_delay(),
            typing_duration: config.typing_indicator(),
            ids: IdSequence::starting_after(last_id),
            rng,
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn partner(&self) -> Option<&str> {
        self.partner.as_deref()
    }

    /// Gửi tin nhắn của người dùng; luôn thành công nếu không rỗng.
    pub fn send(&mut self, text: &str, now: DateTime<Utc>) -> Submission<ChatAction> {
        let text = text.trim();
        if text.is_empty() {
            tracing::debug!("chat: bỏ qua tin nhắn rỗng");
            return Submission::EmptyInputIgnored;
        }

        let id = self.push(ChatSender::User, text.to_string(), now);
        self.input.clear();
        self.typing = false;

        Submission::Accepted {
            id,
            follow_up: Scheduled::after(self.reply_delay, ChatAction::DonorReply),
        }
    }

    fn push(&mut self, sender: ChatSender, text: String, now: DateTime<Utc>) -> i64 {
        let id = self.ids.next(now);
        self.messages.push(ChatMessage {
            id,
            sender,
            text,
            timestamp: now,
            delivered: true,
        });
        id
    }

    fn on_input(&mut self, value: String) -> Vec<Scheduled<ChatAction>> {
        let starts_typing = !self.typing && !value.is_empty();
        self.input = value;
        if !starts_typing {
            return Vec::new();
        }

        self.typing = true;
        self.typing_generation += 1;
        vec![Scheduled::after(
            self.typing_duration,
            ChatAction::TypingExpired {
                generation: self.typing_generation,
            },
        )]
    }
}

impl Widget for ChatPanel {
    type Action = ChatAction;

    fn update(&mut self, action: ChatAction, now: DateTime<Utc>) -> Vec<Scheduled<ChatAction>> {
        match action {
            ChatAction::Open { donor_id } => {
                self.visibility = Visibility::Open;
                self.partner = donor_id;
                Vec::new()
            }
            ChatAction::Close => {
                self.visibility = Visibility::Closed;
                self.partner = None;
                Vec::new()
            }
            ChatAction::Toggle => {
                self.visibility = self.visibility.toggled();
                if !self.visibility.is_open() {
                    self.partner = None;
                }
                Vec::new()
            }
            ChatAction::Input(value) => self.on_input(value),
            ChatAction::Send => {
                let text = self.input.clone();
                self.send(&text, now).into_follow_ups()
            }
            ChatAction::DonorReply => {
                let reply = DONOR_REPLIES
                    .choose(&mut self.rng)
                    .copied()
                    .unwrap_or(DONOR_REPLIES[0]);
                self.push(ChatSender::Donor, reply.to_string(), now);
                Vec::new()
            }
            ChatAction::TypingExpired { generation } => {
                if generation == self.typing_generation {
                    self.typing = false;
                }
                Vec::new()
            }
        }
    }
}

fn sample_messages(now: DateTime<Utc>) -> Vec<ChatMessage> {
    [
        (1, ChatSender::Donor, "Hello! I saw your blood request. I have O+ blood type.", 5),
        (2, ChatSender::User, "Thank you for responding! Are you available to donate today?", 4),
        (3, ChatSender::Donor, "Yes, I can come to the hospital in the next hour. What time works for you?", 3),
    ]
    .into_iter()
    .map(|(id, sender, text, minutes_ago)| ChatMessage {
        id,
        sender,
        text: text.to_string(),
        timestamp: now - to_chrono(Duration::from_secs(minutes_ago * 60)),
        delivered: true,
    })
    .collect()
}
