//! Bridge WASM <-> JavaScript trung lập framework cho các widget BloodNet.

use bloodnet_core::assistant;
use bloodnet_core::donors::matches;
use bloodnet_core::{
    BloodNetConfig, BloodNetError, BloodType, BloodTypeFilter, Donor, Inventory, StockSource,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

/// Cấu hình phía JS: mọi trường đều tuỳ chọn, thiếu thì dùng mặc định.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsBloodNetConfig {
    #[serde(default)]
    pub assistant_reply_delay_ms: Option<u64>,
    #[serde(default)]
    pub donor_reply_delay_ms: Option<u64>,
    #[serde(default)]
    pub typing_indicator_ms: Option<u64>,
    #[serde(default)]
    pub stock_refresh_secs: Option<u64>,
    #[serde(default)]
    pub presence_refresh_secs: Option<u64>,
    #[serde(default)]
    pub presence_online_ratio: Option<f64>,
    #[serde(default)]
    pub search_debounce_ms: Option<u64>,
    #[serde(default)]
    pub urgent_threshold: Option<u32>,
    #[serde(default)]
    pub stock_source: Option<StockSource>,
}

impl From<JsBloodNetConfig> for BloodNetConfig {
    fn from(cfg: JsBloodNetConfig) -> Self {
        let base = BloodNetConfig::default();
        BloodNetConfig {
            assistant_reply_delay_ms: cfg
                .assistant_reply_delay_ms
                .unwrap_or(base.assistant_reply_delay_ms),
            donor_reply_delay_ms: cfg.donor_reply_delay_ms.unwrap_or(base.donor_reply_delay_ms),
            typing_indicator_ms: cfg.typing_indicator_ms.unwrap_or(base.typing_indicator_ms),
            stock_refresh_secs: cfg.stock_refresh_secs.unwrap_or(base.stock_refresh_secs),
            presence_refresh_secs: cfg
                .presence_refresh_secs
                .unwrap_or(base.presence_refresh_secs),
            presence_online_ratio: cfg
                .presence_online_ratio
                .unwrap_or(base.presence_online_ratio),
            search_debounce_ms: cfg.search_debounce_ms.unwrap_or(base.search_debounce_ms),
            urgent_threshold: cfg.urgent_threshold.unwrap_or(base.urgent_threshold),
            stock_source: cfg.stock_source.unwrap_or(base.stock_source),
        }
    }
}

/// Đọc cấu hình tuỳ chọn từ JS, thiếu thì dùng mặc định.
pub fn config_from_js(config: Option<JsValue>) -> Result<BloodNetConfig, JsValue> {
    match config {
        Some(js_cfg) if !js_cfg.is_undefined() && !js_cfg.is_null() => {
            let cfg: JsBloodNetConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?;
            Ok(BloodNetConfig::from(cfg))
        }
        _ => Ok(BloodNetConfig::default()),
    }
}

/// Một bước random walk với seed cố định (dùng cho demo và kiểm thử phía JS).
pub fn refresh_seeded(mut inventory: Inventory, seed: u32) -> Inventory {
    let mut rng = StdRng::seed_from_u64(u64::from(seed));
    inventory.random_walk(&mut rng);
    inventory
}

/// Lọc danh bạ theo từ khoá và nhãn nhóm máu ("all" hoặc "A+", ...).
pub fn filter_roster(
    roster: Vec<Donor>,
    query: &str,
    blood_type: Option<&str>,
) -> Result<Vec<Donor>, BloodNetError> {
    let filter = match blood_type {
        Some(label) => label.parse::<BloodTypeFilter>()?,
        None => BloodTypeFilter::All,
    };

    Ok(roster
        .into_iter()
        .filter(|donor| matches(donor, query, filter))
        .collect())
}

#[wasm_bindgen]
pub fn resolve_query(text: &str) -> Result<JsValue, JsValue> {
    to_js(&assistant::resolve(text))
}

#[wasm_bindgen]
pub fn contextual_suggestions(path: &str) -> Result<JsValue, JsValue> {
    to_js(&assistant::contextual_suggestions(path))
}

#[wasm_bindgen]
pub fn initial_inventory(config: Option<JsValue>) -> Result<JsValue, JsValue> {
    init_panic_hook();
    let cfg = config_from_js(config)?;
    to_js(&Inventory::with_threshold(cfg.urgent_threshold))
}

#[wasm_bindgen]
pub fn load_inventory(feed: JsValue, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    init_panic_hook();
    let cfg = config_from_js(config)?;
    let feed_value = from_value::<serde_json::Value>(feed)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được JSON feed: {err}")))?;

    let inventory = bloodnet_feed::load_inventory_value(&feed_value, &cfg)
        .map_err(|err| JsValue::from_str(&format_error(err)))?;
    to_js(&inventory)
}

#[wasm_bindgen]
pub fn simulate_refresh(inventory: JsValue, seed: u32) -> Result<JsValue, JsValue> {
    let inventory: Inventory = from_value(inventory)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được inventory: {err}")))?;
    to_js(&refresh_seeded(inventory, seed))
}

#[wasm_bindgen]
pub fn stock_detail(inventory: JsValue, blood_type: &str) -> Result<JsValue, JsValue> {
    let inventory: Inventory = from_value(inventory)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được inventory: {err}")))?;
    let blood_type: BloodType = blood_type
        .parse()
        .map_err(|err| JsValue::from_str(&format_error(err)))?;
    to_js(&inventory.detail(blood_type))
}

#[wasm_bindgen]
pub fn filter_donors(
    roster: JsValue,
    query: &str,
    blood_type: Option<String>,
) -> Result<JsValue, JsValue> {
    let roster: Vec<Donor> = from_value(roster)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được danh bạ: {err}")))?;
    let visible = filter_roster(roster, query, blood_type.as_deref())
        .map_err(|err| JsValue::from_str(&format_error(err)))?;
    to_js(&visible)
}

fn to_js<T: serde::Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    to_value(value).map_err(|err| JsValue::from_str(&format!("Không serialize kết quả: {err}")))
}

fn init_panic_hook() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

fn format_error(err: BloodNetError) -> String {
    format!("BloodNet error: {err}")
}
