use bloodnet_core::donors::sample_roster;
use bloodnet_core::{BloodNetConfig, BloodNetError, BloodType, Inventory, StockSource};
use bloodnet_wasm::{filter_roster, refresh_seeded, JsBloodNetConfig};

#[test]
fn partial_js_config_overlays_defaults() {
    let js: JsBloodNetConfig =
        serde_json::from_str(r#"{"urgentThreshold": 20, "stockSource": "feed"}"#)
            .expect("Config JS không hợp lệ");
    let config = BloodNetConfig::from(js);

    assert_eq!(config.urgent_threshold, 20);
    assert_eq!(config.stock_source, StockSource::Feed);
    assert_eq!(config.assistant_reply_delay_ms, 1_000);
    assert_eq!(config.stock_refresh_secs, 30);
}

#[test]
fn empty_js_config_is_default() {
    let js: JsBloodNetConfig = serde_json::from_str("{}").expect("Config JS không hợp lệ");
    assert_eq!(BloodNetConfig::from(js), BloodNetConfig::default());
}

#[test]
fn seeded_refresh_is_reproducible_and_bounded() {
    let first = refresh_seeded(Inventory::default(), 99);
    let second = refresh_seeded(Inventory::default(), 99);
    assert_eq!(first, second);

    let before = Inventory::default();
    for entry in first.entries() {
        let previous = before.get(entry.blood_type).count;
        assert!(entry.count.abs_diff(previous) <= 1);
    }
}

#[test]
fn roster_filter_parses_blood_type_labels() {
    let visible = filter_roster(sample_roster(), "", Some("o-")).expect("Lọc thất bại");
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].blood_type, BloodType::ONegative);

    let all = filter_roster(sample_roster(), "riverside", Some("all")).expect("Lọc thất bại");
    assert_eq!(all.len(), 2);

    assert_eq!(
        filter_roster(sample_roster(), "", Some("Q")),
        Err(BloodNetError::UnknownBloodType("Q".into()))
    );
}
