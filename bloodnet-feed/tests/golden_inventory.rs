use std::fs;

use bloodnet_core::{BloodNetConfig, BloodNetError, BloodType, Inventory, StockChange};
use bloodnet_feed::{
    load_donors_str, load_inventory_str, load_inventory_value, parse_stock_events_str,
};
use serde_json::{json, Value};

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn regional_inventory_matches_golden() {
    let feed = fs::read_to_string(fixture_path("regional_inventory.json"))
        .expect("Could not read inventory fixture");

    let inventory =
        load_inventory_str(&feed, &BloodNetConfig::default()).expect("Could not load inventory");
    let actual = serde_json::to_value(&inventory).expect("Could not serialize inventory");

    let expected = fs::read_to_string(fixture_path("regional_inventory_snapshot.json"))
        .expect("Could not read golden snapshot");
    let expected: Value = serde_json::from_str(&expected).expect("Invalid golden snapshot");

    assert_eq!(actual, expected);
}

#[test]
fn feed_urgency_is_derived_not_trusted() {
    let feed = fs::read_to_string(fixture_path("regional_inventory.json"))
        .expect("Could not read inventory fixture");
    let inventory =
        load_inventory_str(&feed, &BloodNetConfig::default()).expect("Could not load inventory");

    assert!(!inventory.get(BloodType::AbNegative).urgent);
    assert!(inventory.get(BloodType::ANegative).urgent);
    assert_eq!(
        inventory.urgent_types(),
        [BloodType::ANegative, BloodType::BNegative, BloodType::ONegative]
    );
}

#[test]
fn missing_inventory_key_is_missing_data() {
    let result = load_inventory_value(&json!({ "stock": [] }), &BloodNetConfig::default());
    assert_eq!(result, Err(BloodNetError::MissingData));
}

#[test]
fn bad_entries_are_rejected() {
    let config = BloodNetConfig::default();

    let unknown = load_inventory_value(
        &json!({ "inventory": [{ "bloodType": "Z+", "count": 1 }] }),
        &config,
    );
    assert_eq!(unknown, Err(BloodNetError::UnknownBloodType("Z+".into())));

    let negative = load_inventory_value(
        &json!({ "inventory": [{ "bloodType": "A+", "count": -3 }] }),
        &config,
    );
    assert!(matches!(negative, Err(BloodNetError::Parse(_))));

    assert!(matches!(
        load_inventory_str("{ not json", &config),
        Err(BloodNetError::Parse(_))
    ));
}

#[test]
fn empty_inventory_list_keeps_defaults() {
    let inventory = load_inventory_value(&json!({ "inventory": [] }), &BloodNetConfig::default())
        .expect("Could not load inventory");
    assert_eq!(inventory, Inventory::default());
}

#[test]
fn stock_events_accept_bare_or_wrapped_lists() {
    let expected = vec![
        StockChange {
            blood_type: BloodType::ONegative,
            count: 4,
        },
        StockChange {
            blood_type: BloodType::OPositive,
            count: 70,
        },
    ];
    let bare = r#"[{"bloodType":"O-","count":4},{"bloodType":"O+","count":70}]"#;
    let wrapped = r#"{"events":[{"bloodType":"O-","count":4},{"bloodType":"O+","count":70}]}"#;

    assert_eq!(parse_stock_events_str(bare), Ok(expected.clone()));
    assert_eq!(parse_stock_events_str(wrapped), Ok(expected));
    assert_eq!(
        parse_stock_events_str(r#"{"changes":[]}"#),
        Err(BloodNetError::MissingData)
    );
}

#[test]
fn donor_roster_fills_ids_and_skips_nameless_entries() {
    let roster = fs::read_to_string(fixture_path("donor_roster.json"))
        .expect("Could not read roster fixture");
    let donors = load_donors_str(&roster).expect("Could not load roster");

    let summary: Vec<_> = donors
        .iter()
        .map(|d| (d.id.as_str(), d.name.as_str(), d.blood_type.label(), d.online))
        .collect();
    assert_eq!(
        summary,
        [
            ("d-201", "Lena Fischer", "O-", true),
            ("donor-2", "Ravi Menon", "B+", false),
            ("d-204", "Chen Wei", "AB+", false),
        ]
    );
    assert_eq!(donors[2].location, "");
}

#[test]
fn donor_with_unknown_blood_type_is_skipped_not_fatal() {
    let roster = json!({
        "donors": [
            { "id": "d-1", "name": "Mara Quinn", "bloodType": "Z+" },
            { "id": "d-2", "name": "Tomas Berg", "bloodType": "A-", "online": true }
        ]
    });
    let donors = load_donors_str(&roster.to_string()).expect("Could not load roster");

    assert_eq!(donors.len(), 1);
    assert_eq!(donors[0].id, "d-2");
    assert_eq!(donors[0].blood_type, BloodType::ANegative);
    assert!(donors[0].online);
}
