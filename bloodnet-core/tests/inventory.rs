use std::time::Duration;

use bloodnet_core::{
    BloodNetConfig, BloodNetError, BloodType, Dashboard, DashboardAction, Inventory, Simulation,
    StockChange, StockSource, Widget,
};
use chrono::{TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn origin() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 14, 9, 0, 0).unwrap()
}

#[test]
fn default_inventory_matches_seed_counts() {
    let inventory = Inventory::default();
    let counts: Vec<_> = inventory
        .entries()
        .map(|entry| (entry.blood_type.label(), entry.count, entry.urgent))
        .collect();

    assert_eq!(
        counts,
        [
            ("A+", 45, false),
            ("A-", 12, false),
            ("B+", 38, false),
            ("B-", 8, true),
            ("AB+", 15, false),
            ("AB-", 3, true),
            ("O+", 67, false),
            ("O-", 5, true),
        ]
    );
}

#[test]
fn blood_type_labels_parse_case_insensitively() {
    assert_eq!("ab-".parse::<BloodType>(), Ok(BloodType::AbNegative));
    assert_eq!(" O+ ".parse::<BloodType>(), Ok(BloodType::OPositive));
    assert_eq!(
        "C+".parse::<BloodType>(),
        Err(BloodNetError::UnknownBloodType("C+".into()))
    );
}

#[test]
fn random_walk_moves_each_count_by_at_most_one() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut inventory = Inventory::from_counts(10, |_| 0);
    inventory.apply(StockChange {
        blood_type: BloodType::APositive,
        count: 10,
    });

    for _ in 0..500 {
        let before = inventory.clone();
        inventory.random_walk(&mut rng);
        for entry in inventory.entries() {
            let previous = i64::from(before.get(entry.blood_type).count);
            assert!((i64::from(entry.count) - previous).abs() <= 1);
            assert_eq!(entry.urgent, entry.count < 10);
        }
    }
}

#[test]
fn random_walk_is_floored_at_zero() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..50 {
        let mut inventory = Inventory::from_counts(10, |_| 0);
        inventory.random_walk(&mut rng);
        assert!(inventory.entries().all(|entry| entry.count <= 1 && entry.urgent));
    }
}

#[test]
fn refresh_runs_every_thirty_seconds() {
    let dashboard = Dashboard::with_seed(&BloodNetConfig::default(), 42);
    let mut sim = Simulation::new(dashboard, origin());
    sim.dispatch(DashboardAction::Start);
    sim.dispatch(DashboardAction::Start);

    assert_eq!(sim.pending(), 1);
    assert_eq!(sim.advance(Duration::from_secs(29)), 0);
    assert_eq!(sim.advance(Duration::from_secs(1)), 1);
    assert_eq!(sim.advance(Duration::from_secs(90)), 3);
    assert_eq!(sim.widget().ticks(), 4);
    assert_eq!(sim.pending(), 1);
}

#[test]
fn feed_source_never_arms_random_walk() {
    let config = BloodNetConfig {
        stock_source: StockSource::Feed,
        ..BloodNetConfig::default()
    };
    let mut sim = Simulation::new(Dashboard::with_seed(&config, 3), origin());
    sim.dispatch(DashboardAction::Start);
    assert_eq!(sim.pending(), 0);

    sim.dispatch(DashboardAction::StockChanged(StockChange {
        blood_type: BloodType::APositive,
        count: 2,
    }));
    let entry = sim.widget().inventory().get(BloodType::APositive);
    assert_eq!(entry.count, 2);
    assert!(entry.urgent);
    assert_eq!(sim.widget().inventory().get(BloodType::OPositive).count, 67);
}

#[test]
fn selecting_a_card_opens_detail_snapshot() {
    let mut dashboard = Dashboard::with_seed(&BloodNetConfig::default(), 9);
    dashboard.update(DashboardAction::Select(BloodType::ONegative), origin());

    let detail = dashboard.detail().expect("chưa mở chi tiết").clone();
    assert_eq!(detail.headline, "5 units available");
    assert_eq!(detail.note, "Urgent need - Please donate soon!");

    dashboard.update(
        DashboardAction::StockChanged(StockChange {
            blood_type: BloodType::ONegative,
            count: 30,
        }),
        origin(),
    );
    assert_eq!(dashboard.detail(), Some(&detail));

    dashboard.update(DashboardAction::CloseDetail, origin());
    assert!(dashboard.detail().is_none());

    dashboard.update(DashboardAction::Select(BloodType::ONegative), origin());
    assert_eq!(dashboard.detail().unwrap().note, "Stock levels are stable");
}

#[test]
fn custom_threshold_drives_urgency() {
    let config = BloodNetConfig {
        urgent_threshold: 40,
        ..BloodNetConfig::default()
    };
    let dashboard = Dashboard::with_seed(&config, 0);
    let urgent = dashboard.inventory().urgent_types();
    assert!(urgent.contains(&BloodType::BPositive));
    assert!(!urgent.contains(&BloodType::APositive));
}

#[test]
fn inventory_json_recomputes_urgency_and_fills_missing_types() {
    let json = r#"{"urgentThreshold":10,"entries":[{"bloodType":"A+","count":4}]}"#;
    let inventory: Inventory = serde_json::from_str(json).expect("JSON không hợp lệ");

    assert!(inventory.get(BloodType::APositive).urgent);
    assert_eq!(inventory.get(BloodType::BPositive).count, 38);
    assert_eq!(inventory.entries().count(), 8);

    let value = serde_json::to_value(&inventory).expect("Không serialize inventory");
    assert_eq!(value["entries"].as_array().map(Vec::len), Some(8));
    assert_eq!(value["entries"][0]["bloodType"], "A+");
}
