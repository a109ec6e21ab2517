use std::time::Duration;

use bloodnet_core::donors::sample_roster;
use bloodnet_core::{
    Assistant, AssistantAction, BloodNetConfig, BloodType, BloodTypeFilter, ChatAction, ChatPanel,
    DirectoryAction, DonorDirectory, Inventory, Simulation, StockChange, Widget,
};
use bloodnet_ui::view_model::{
    assistant_bubbles, assistant_chips, chat_bubbles, donor_cards, filter_chips, stock_cards, Side,
};
use chrono::{TimeZone, Utc};

fn origin() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 14, 9, 0, 0).unwrap()
}

#[test]
fn greeting_renders_as_incoming_assistant_bubble() {
    let assistant = Assistant::new(&BloodNetConfig::default(), origin());
    let bubbles = assistant_bubbles(&assistant, origin());

    assert_eq!(bubbles.len(), 1);
    assert_eq!(bubbles[0].side, Side::Incoming);
    assert_eq!(bubbles[0].meta, "AI Assistant");
    assert_eq!(bubbles[0].side.class(), "bn-bubble is-incoming");
}

#[test]
fn user_question_and_reply_alternate_sides() {
    let mut sim = Simulation::new(Assistant::new(&BloodNetConfig::default(), origin()), origin());
    sim.dispatch(AssistantAction::Ask("How do I register?".into()));
    sim.advance(Duration::from_secs(1));

    let bubbles = assistant_bubbles(sim.widget(), sim.now());
    let sides: Vec<Side> = bubbles.iter().map(|b| b.side).collect();
    assert_eq!(sides, [Side::Incoming, Side::Outgoing, Side::Incoming]);
    assert_eq!(bubbles[1].text, "How do I register?");
    assert_eq!(bubbles[1].meta, "Just now");

    let labels: Vec<String> = assistant_chips(sim.widget())
        .into_iter()
        .map(|chip| chip.label)
        .collect();
    assert_eq!(labels, ["Start registration", "Learn more", "Contact support"]);
}

#[test]
fn chat_bubbles_carry_relative_time_and_delivery() {
    let panel = ChatPanel::with_seed(&BloodNetConfig::default(), origin(), 3);
    let bubbles = chat_bubbles(&panel, origin());

    assert_eq!(
        bubbles.iter().map(|b| b.side).collect::<Vec<_>>(),
        [Side::Incoming, Side::Outgoing, Side::Incoming]
    );
    assert_eq!(
        bubbles.iter().map(|b| b.meta.as_str()).collect::<Vec<_>>(),
        ["5m ago", "4m ago", "3m ago"]
    );
    assert!(bubbles.iter().all(|b| b.delivered));
}

#[test]
fn sent_chat_message_renders_outgoing() {
    let mut panel = ChatPanel::with_seed(&BloodNetConfig::default(), origin(), 3);
    panel.update(ChatAction::Input("On my way".into()), origin());
    panel.update(ChatAction::Send, origin());

    let last = chat_bubbles(&panel, origin()).pop().unwrap();
    assert_eq!(last.side, Side::Outgoing);
    assert_eq!(last.text, "On my way");
    assert_eq!(last.meta, "Just now");
}

#[test]
fn stock_cards_follow_blood_type_order_and_urgency() {
    let mut inventory = Inventory::default();
    inventory.apply(StockChange {
        blood_type: BloodType::OPositive,
        count: 4,
    });

    let cards = stock_cards(&inventory);
    assert_eq!(cards.len(), 8);
    assert_eq!(
        cards.iter().map(|c| c.label).collect::<Vec<_>>(),
        ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"]
    );

    let o_positive = cards
        .iter()
        .find(|c| c.blood_type == BloodType::OPositive)
        .unwrap();
    assert_eq!(o_positive.count, 4);
    assert_eq!(o_positive.class(), "bn-stock-card is-urgent");

    let a_positive = &cards[0];
    assert_eq!(a_positive.class(), "bn-stock-card");
}

#[test]
fn donor_cards_reflect_applied_filter() {
    let mut directory = DonorDirectory::with_seed(&BloodNetConfig::default(), sample_roster(), 5);
    directory.update(DirectoryAction::Filter(BloodTypeFilter::Only(BloodType::OPositive)), origin());

    let cards = donor_cards(&directory);
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].name, "Anika Rao");
    assert_eq!(cards[0].blood_type, "O+");
    assert_eq!(cards[0].status, "Online");
}

#[test]
fn filter_chips_mark_only_the_active_option() {
    let chips = filter_chips(BloodTypeFilter::Only(BloodType::BNegative));

    assert_eq!(chips.len(), 9);
    assert_eq!(chips[0].0, "All");
    let active: Vec<&str> = chips
        .iter()
        .filter(|(_, _, active)| *active)
        .map(|(label, _, _)| *label)
        .collect();
    assert_eq!(active, ["B-"]);
}
