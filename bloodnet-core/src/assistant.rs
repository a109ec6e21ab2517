//! Trợ lý trả lời sẵn: so khớp từ khoá theo thứ tự khai báo, khớp đầu tiên thắng.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::time::IdSequence;
use crate::{BloodNetConfig, Scheduled, Submission, Visibility, Widget};

/// Câu trả lời soạn sẵn gắn với một từ khoá.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct TopicEntry {
    pub keyword: &'static str,
    pub response: &'static str,
    pub suggestions: &'static [&'static str],
}

/// Bảng chủ đề. Thứ tự quyết định kết quả khi câu hỏi chứa nhiều từ khoá.
pub static TOPICS: [TopicEntry; 5] = [
    TopicEntry {
        keyword: "nearest blood bank",
        response: "I can help you find the nearest blood bank! Based on your location, here are the closest options:\n\n🏥 City General Hospital - 2.3 km\n🏥 Red Cross Blood Center - 4.1 km\n🏥 Central Medical Center - 5.7 km\n\nWould you like directions to any of these locations?",
        suggestions: &["Get directions", "Check availability", "Contact hospital"],
    },
    TopicEntry {
        keyword: "eligibility",
        response: "Great question! Here are the general eligibility criteria for blood donation:\n\n✅ Age: 18-65 years\n✅ Weight: At least 50 kg\n✅ Hemoglobin: 12.5 g/dL or higher\n✅ No recent illness or medication\n✅ No tattoos in last 3 months\n\n⚠️ Please consult with a medical professional for specific health conditions.",
        suggestions: &["Check my eligibility", "Find donation center", "Schedule appointment"],
    },
    TopicEntry {
        keyword: "register",
        response: "I'd be happy to help you register as a donor! Here's how to get started:\n\n1️⃣ Click 'Register as Donor' on our homepage\n2️⃣ Fill out the registration form\n3️⃣ Verify your information\n4️⃣ Complete health screening\n\nRegistration takes about 5 minutes and helps save lives!",
        suggestions: &["Start registration", "Learn more", "Contact support"],
    },
    TopicEntry {
        keyword: "blood type",
        response: "Blood types are crucial for matching donors and recipients:\n\n🩸 **Universal Donor**: O- (can donate to anyone)\n🩸 **Universal Recipient**: AB+ (can receive from anyone)\n🩸 **Most Common**: O+ (38% of population)\n🩸 **Rarest**: AB- (1% of population)\n\nYour blood type is determined by genetics and affects compatibility.",
        suggestions: &["Check compatibility", "Find donors", "Learn more"],
    },
    TopicEntry {
        keyword: "emergency",
        response: "🚨 **EMERGENCY BLOOD REQUEST** 🚨\n\nIf this is a life-threatening emergency:\n\n1️⃣ Call emergency services (108/911)\n2️⃣ Contact nearest hospital immediately\n3️⃣ Use our 'Find Donor' feature for urgent matching\n4️⃣ Post in our emergency channel\n\nEvery second counts in emergencies!",
        suggestions: &["Find urgent donors", "Contact hospital", "Emergency protocols"],
    },
];

const EMERGENCY_INDEX: usize = 4;

/// Từ kích hoạt nhánh khẩn cấp khi không chủ đề nào khớp.
pub static EMERGENCY_TRIGGERS: [&str; 3] = ["emergency", "urgent", "help"];

pub static DEFAULT_ENTRY: TopicEntry = TopicEntry {
    keyword: "default",
    response: "I'm here to help with blood donation and emergency blood requests! I can assist with:\n\n🔍 Finding nearby blood banks\n✅ Checking donation eligibility\n📝 Registration guidance\n🩸 Blood type information\n🚨 Emergency procedures\n\nWhat would you like to know?",
    suggestions: &["Find blood bank", "Check eligibility", "Register as donor", "Emergency help"],
};

pub const GREETING: &str = "Hello! I'm your BloodNet AI Assistant. How can I help you today?";

pub fn emergency_entry() -> &'static TopicEntry {
    &TOPICS[EMERGENCY_INDEX]
}

/// Nhánh đã quyết định câu trả lời.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Topic,
    EmergencyTrigger,
    Fallback,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Resolution {
    pub entry: &'static TopicEntry,
    pub kind: MatchKind,
}

/// Tìm câu trả lời cho một câu hỏi tự do. Hàm toàn phần: mọi chuỗi đều
/// cho ra đúng một mục cố định.
pub fn resolve(query: &str) -> Resolution {
    let lowered = query.to_lowercase();

    if let Some(entry) = TOPICS.iter().find(|entry| lowered.contains(entry.keyword)) {
        return Resolution {
            entry,
            kind: MatchKind::Topic,
        };
    }

    if EMERGENCY_TRIGGERS
        .iter()
        .any(|trigger| lowered.contains(trigger))
    {
        return Resolution {
            entry: emergency_entry(),
            kind: MatchKind::EmergencyTrigger,
        };
    }

    Resolution {
        entry: &DEFAULT_ENTRY,
        kind: MatchKind::Fallback,
    }
}

/// Gợi ý theo đường dẫn trang đang mở.
pub fn contextual_suggestions(path: &str) -> &'static [&'static str] {
    if path.contains("register") {
        &["Check eligibility", "Find donation center", "Registration process"]
    } else if path.contains("search") {
        &["Find blood bank", "Check availability", "Contact donor"]
    } else if path.contains("dashboard") {
        &["View statistics", "Manage requests", "Update inventory"]
    } else {
        DEFAULT_ENTRY.suggestions
    }
}

/// Nút gợi ý: nhãn hiển thị và câu hỏi gửi đi khi bấm.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Suggestion {
    pub label: String,
    pub query: String,
}

impl Suggestion {
    pub fn from_label(label: &str) -> Self {
        Self {
            label: label.to_string(),
            query: label.to_lowercase(),
        }
    }

    fn initial() -> Vec<Self> {
        [
            ("Find Blood Bank", "nearest blood bank"),
            ("Check Eligibility", "eligibility"),
            ("How to Register", "register"),
        ]
        .into_iter()
        .map(|(label, query)| Self {
            label: label.to_string(),
            query: query.to_string(),
        })
        .collect()
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssistantSender {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AssistantMessage {
    pub id: i64,
    pub sender: AssistantSender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssistantAction {
    Toggle,
    Input(String),
    /// Gửi nội dung ô nhập.
    Submit,
    /// Gửi trực tiếp một câu hỏi (nút gợi ý, API của trang host).
    Ask(String),
    /// Hết thời gian "suy nghĩ": trả lời câu hỏi đã gửi.
    Reply { query: String },
    /// Trang host đổi đường dẫn, thay gợi ý theo ngữ cảnh.
    PageContext { path: String },
}

/// Trạng thái widget trợ lý.
#[derive(Debug, Clone)]
pub struct Assistant {
    visibility: Visibility,
    input: String,
    transcript: Vec<AssistantMessage>,
    suggestions: Vec<Suggestion>,
    awaiting: usize,
    reply_delay: std::time::Duration,
    ids: IdSequence,
}

impl Assistant {
    pub fn new(config: &BloodNetConfig, now: DateTime<Utc>) -> Self {
        let mut ids = IdSequence::default();
        let greeting = AssistantMessage {
            id: ids.next(now),
            sender: AssistantSender::Assistant,
            text: GREETING.to_string(),
            timestamp: now,
        };

        Self {
            visibility: Visibility::Closed,
            input: String::new(),
            transcript: vec![greeting],
            suggestions: Suggestion::initial(),
            awaiting: 0,
            reply_delay: config.assistant_reply_delay(),
            ids,
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn transcript(&self) -> &[AssistantMessage] {
        &self.transcript
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Số câu trả lời đang chờ.
    pub fn awaiting_replies(&self) -> usize {
        self.awaiting
    }

    /// Đưa câu hỏi vào transcript và hẹn trả lời.
    pub fn send(&mut self, text: &str, now: DateTime<Utc>) -> Submission<AssistantAction> {
        let query = text.trim();
        if query.is_empty() {
            tracing::debug!("assistant: bỏ qua câu hỏi rỗng");
            return Submission::EmptyInputIgnored;
        }

        let id = self.push(AssistantSender::User, query.to_string(), now);
        self.input.clear();
        self.awaiting += 1;

        Submission::Accepted {
            id,
            follow_up: Scheduled::after(
                self.reply_delay,
                AssistantAction::Reply {
                    query: query.to_string(),
                },
            ),
        }
    }

    fn push(&mut self, sender: AssistantSender, text: String, now: DateTime<Utc>) -> i64 {
        let id = self.ids.next(now);
        self.transcript.push(AssistantMessage {
            id,
            sender,
            text,
            timestamp: now,
        });
        id
    }
}

impl Widget for Assistant {
    type Action = AssistantAction;

    fn update(&mut self, action: AssistantAction, now: DateTime<Utc>) -> Vec<Scheduled<AssistantAction>> {
        match action {
            AssistantAction::Toggle => {
                self.visibility = self.visibility.toggled();
                Vec::new()
            }
            AssistantAction::Input(value) => {
                self.input = value;
                Vec::new()
            }
            AssistantAction::Submit => {
                let text = self.input.clone();
                self.send(&text, now).into_follow_ups()
            }
            AssistantAction::Ask(query) => self.send(&query, now).into_follow_ups(),
            AssistantAction::Reply { query } => {
                let resolution = resolve(&query);
                tracing::debug!(keyword = resolution.entry.keyword, kind = ?resolution.kind, "assistant: trả lời");
                self.push(
                    AssistantSender::Assistant,
                    resolution.entry.response.to_string(),
                    now,
                );
                self.suggestions = resolution
                    .entry
                    .suggestions
                    .iter()
                    .map(|label| Suggestion::from_label(label))
                    .collect();
                self.awaiting = self.awaiting.saturating_sub(1);
                Vec::new()
            }
            AssistantAction::PageContext { path } => {
                self.suggestions = contextual_suggestions(&path)
                    .iter()
                    .map(|label| Suggestion::from_label(label))
                    .collect();
                Vec::new()
            }
        }
    }
}
