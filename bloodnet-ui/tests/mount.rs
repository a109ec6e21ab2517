use bloodnet_core::{BloodType, StockSource, WidgetId};
use bloodnet_ui::mount::{default_selector, MountOptions, WidgetSet};
use chrono::{TimeZone, Utc};
use serde_json::json;

fn origin() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 14, 9, 0, 0).unwrap()
}

fn options(value: serde_json::Value) -> MountOptions {
    serde_json::from_value(value).unwrap()
}

#[test]
fn selectors_fall_back_to_page_defaults() {
    let opts = options(json!({ "donorsSelector": "  ", "inventorySelector": "#stock" }));

    assert_eq!(opts.selector(WidgetId::Inventory), "#stock");
    assert_eq!(opts.selector(WidgetId::Donors), default_selector(WidgetId::Donors));
    assert_eq!(opts.selector(WidgetId::Assistant), "body");
    assert_eq!(opts.selector(WidgetId::Chat), "body");
}

#[test]
fn partial_config_overlays_defaults() {
    let opts = options(json!({ "config": { "urgentThreshold": 20, "stockSource": "feed" } }));
    let config = opts.resolved_config();

    assert_eq!(config.urgent_threshold, 20);
    assert_eq!(config.stock_source, StockSource::Feed);
    assert_eq!(config.assistant_reply_delay_ms, 1_000);
}

#[test]
fn inventory_feed_seeds_the_dashboard() {
    let opts = options(json!({
        "inventoryFeed": { "inventory": [{ "bloodType": "AB-", "count": 14 }] },
        "seed": 9
    }));
    let set = WidgetSet::from_options(&opts, origin());

    let entry = set.dashboard.inventory().get(BloodType::AbNegative);
    assert_eq!(entry.count, 14);
    assert!(!entry.urgent);
    assert_eq!(set.dashboard.inventory().get(BloodType::APositive).count, 45);
}

#[test]
fn broken_feeds_fall_back_to_defaults() {
    let opts = options(json!({
        "inventoryFeed": { "stock": [] },
        "donorFeed": { "people": [] }
    }));
    let set = WidgetSet::from_options(&opts, origin());

    assert_eq!(set.dashboard.inventory().get(BloodType::ONegative).count, 5);
    assert_eq!(set.directory.donors().len(), 6);
}

#[test]
fn donor_feed_replaces_sample_roster() {
    let opts = options(json!({
        "donorFeed": { "donors": [
            { "id": "x-1", "name": "Lena Ortiz", "bloodType": "B-", "location": "Old Town" }
        ] }
    }));
    let set = WidgetSet::from_options(&opts, origin());

    assert_eq!(set.directory.donors().len(), 1);
    assert_eq!(set.directory.donors()[0].name, "Lena Ortiz");
}

#[test]
fn page_path_sets_contextual_suggestions() {
    let opts = options(json!({ "pagePath": "/register" }));
    let set = WidgetSet::from_options(&opts, origin());

    let labels: Vec<&str> = set
        .assistant
        .suggestions()
        .iter()
        .map(|chip| chip.label.as_str())
        .collect();
    assert_eq!(labels, bloodnet_core::assistant::contextual_suggestions("/register"));
}
