use std::time::Duration;

use bloodnet_core::donors::{matches, sample_roster};
use bloodnet_core::{
    BloodNetConfig, BloodType, BloodTypeFilter, DirectoryAction, Donor, DonorDirectory, Simulation,
};
use chrono::{TimeZone, Utc};

fn origin() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 14, 9, 0, 0).unwrap()
}

fn simulation() -> Simulation<DonorDirectory> {
    let directory = DonorDirectory::with_seed(&BloodNetConfig::default(), sample_roster(), 21);
    Simulation::new(directory, origin())
}

fn visible_names(sim: &Simulation<DonorDirectory>) -> Vec<String> {
    sim.widget()
        .visible()
        .into_iter()
        .map(|donor| donor.name.clone())
        .collect()
}

fn matching_ids<'a>(roster: &'a [Donor], query: &str) -> Vec<&'a str> {
    roster
        .iter()
        .filter(|donor| matches(donor, query, BloodTypeFilter::All))
        .map(|donor| donor.id.as_str())
        .collect()
}

#[test]
fn query_matches_name_blood_type_or_location() {
    let roster = sample_roster();

    assert_eq!(matching_ids(&roster, "grace"), ["d-105"]);
    assert_eq!(matching_ids(&roster, "RIVERSIDE"), ["d-102", "d-106"]);
    assert_eq!(matching_ids(&roster, "o-"), ["d-104"]);
    assert_eq!(matching_ids(&roster, "").len(), roster.len());
}

#[test]
fn search_applies_after_debounce_only_for_latest_input() {
    let mut sim = simulation();
    sim.dispatch(DirectoryAction::Search("river".into()));
    sim.advance(Duration::from_millis(200));
    sim.dispatch(DirectoryAction::Search("riverside".into()));
    sim.advance(Duration::from_millis(200));
    assert_eq!(sim.widget().query(), "");
    assert_eq!(visible_names(&sim).len(), 6);

    sim.advance(Duration::from_millis(100));
    assert_eq!(sim.widget().query(), "riverside");
    assert_eq!(visible_names(&sim), ["Marcus Lee", "Samuel Okafor"]);
}

#[test]
fn blood_type_filter_combines_with_query() {
    let mut sim = simulation();
    sim.dispatch(DirectoryAction::Filter(BloodTypeFilter::Only(BloodType::APositive)));
    assert_eq!(visible_names(&sim), ["Samuel Okafor"]);

    sim.dispatch(DirectoryAction::Search("downtown".into()));
    sim.advance(Duration::from_millis(300));
    assert!(visible_names(&sim).is_empty());

    sim.dispatch(DirectoryAction::Filter("all".parse().unwrap()));
    assert_eq!(visible_names(&sim), ["Anika Rao"]);
}

#[test]
fn presence_refresh_every_fifteen_seconds() {
    let mut sim = simulation();
    sim.dispatch(DirectoryAction::Start);
    assert_eq!(sim.advance(Duration::from_secs(14)), 0);
    assert_eq!(sim.advance(Duration::from_secs(46)), 4);
    assert_eq!(sim.pending(), 1);
}

#[test]
fn presence_ratio_extremes_are_deterministic() {
    for (ratio, expected) in [(0.0, false), (1.0, true)] {
        let config = BloodNetConfig {
            presence_online_ratio: ratio,
            ..BloodNetConfig::default()
        };
        let directory = DonorDirectory::with_seed(&config, sample_roster(), 4);
        let mut sim = Simulation::new(directory, origin());
        sim.dispatch(DirectoryAction::RefreshPresence);
        assert!(sim.widget().donors().iter().all(|d| d.online == expected));
    }
}
