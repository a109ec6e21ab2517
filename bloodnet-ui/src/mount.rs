//! Tuỳ chọn mount và dựng trạng thái ban đầu cho bốn widget.
//!
//! Phần này không phụ thuộc DOM nên kiểm thử được trên host.

use bloodnet_core::donors::sample_roster;
use bloodnet_core::{
    Assistant, AssistantAction, BloodNetConfig, ChatPanel, Dashboard, DonorDirectory, Inventory,
    Widget, WidgetId,
};
use bloodnet_wasm::JsBloodNetConfig;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Selector mặc định cho từng widget.
pub fn default_selector(widget: WidgetId) -> &'static str {
    match widget {
        WidgetId::Assistant | WidgetId::Chat => "body",
        WidgetId::Inventory => "#bloodStock",
        WidgetId::Donors => "#donorDirectory",
    }
}

/// Tuỳ chọn trang host truyền vào `mount_bloodnet_widgets`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountOptions {
    #[serde(default)]
    pub assistant_selector: Option<String>,
    #[serde(default)]
    pub inventory_selector: Option<String>,
    #[serde(default)]
    pub chat_selector: Option<String>,
    #[serde(default)]
    pub donors_selector: Option<String>,
    #[serde(default)]
    pub config: Option<JsBloodNetConfig>,
    /// Snapshot tồn kho dạng `{"inventory": [...]}`.
    #[serde(default)]
    pub inventory_feed: Option<Value>,
    /// Danh bạ dạng `{"donors": [...]}`.
    #[serde(default)]
    pub donor_feed: Option<Value>,
    /// Đường dẫn trang hiện tại, dùng cho gợi ý theo ngữ cảnh.
    #[serde(default)]
    pub page_path: Option<String>,
    /// Seed cố định cho random walk, presence và câu trả lời của người hiến.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl MountOptions {
    pub fn selector(&self, widget: WidgetId) -> &str {
        let custom = match widget {
            WidgetId::Assistant => self.assistant_selector.as_deref(),
            WidgetId::Inventory => self.inventory_selector.as_deref(),
            WidgetId::Chat => self.chat_selector.as_deref(),
            WidgetId::Donors => self.donors_selector.as_deref(),
        };
        custom
            .map(str::trim)
            .filter(|selector| !selector.is_empty())
            .unwrap_or_else(|| default_selector(widget))
    }

    pub fn resolved_config(&self) -> BloodNetConfig {
        self.config
            .as_ref()
            .map(|cfg| BloodNetConfig::from(cfg.clone()))
            .unwrap_or_default()
    }
}

/// Trạng thái khởi tạo của cả bốn widget.
pub struct WidgetSet {
    pub config: BloodNetConfig,
    pub assistant: Assistant,
    pub dashboard: Dashboard,
    pub chat: ChatPanel,
    pub directory: DonorDirectory,
}

impl WidgetSet {
    /// Feed lỗi hoặc thiếu thì dùng dữ liệu mặc định và ghi cảnh báo.
    pub fn from_options(options: &MountOptions, now: DateTime<Utc>) -> Self {
        let config = options.resolved_config();

        let inventory = options
            .inventory_feed
            .as_ref()
            .and_then(|feed| match bloodnet_feed::load_inventory_value(feed, &config) {
                Ok(inventory) => Some(inventory),
                Err(err) => {
                    tracing::warn!(%err, "mount: bỏ qua inventory feed");
                    None
                }
            })
            .unwrap_or_else(|| Inventory::with_threshold(config.urgent_threshold));

        let roster = options
            .donor_feed
            .as_ref()
            .and_then(|feed| match bloodnet_feed::load_donors_value(feed) {
                Ok(donors) => Some(donors),
                Err(err) => {
                    tracing::warn!(%err, "mount: bỏ qua donor feed");
                    None
                }
            })
            .unwrap_or_else(sample_roster);

        let (dashboard, chat, directory) = match options.seed {
            Some(seed) => (
                Dashboard::with_seed(&config, seed),
                ChatPanel::with_seed(&config, now, seed),
                DonorDirectory::with_seed(&config, roster, seed),
            ),
            None => (
                Dashboard::new(&config),
                ChatPanel::new(&config, now),
                DonorDirectory::new(&config, roster),
            ),
        };

        let mut assistant = Assistant::new(&config, now);
        if let Some(path) = &options.page_path {
            assistant.update(AssistantAction::PageContext { path: path.clone() }, now);
        }

        Self {
            dashboard: dashboard.with_inventory(inventory),
            assistant,
            chat,
            directory,
            config,
        }
    }
}
