//! JSON feed ingestion: inventory snapshots, stock change events and donor rosters.
//!
//! A missing feed is not an error for the widgets; callers fall back to
//! `Inventory::default()` and `donors::sample_roster()`.

use bloodnet_core::{BloodNetConfig, BloodNetError, BloodType, Donor, Inventory, StockChange};
use serde_json::Value;

/// Build an inventory from a JSON snapshot string.
pub fn load_inventory_str(
    inventory_json: &str,
    config: &BloodNetConfig,
) -> Result<Inventory, BloodNetError> {
    let value = parse_json(inventory_json)?;
    load_inventory_value(&value, config)
}

/// Build an inventory from `{"inventory": [{"bloodType": "A+", "count": 45}, ...]}`.
///
/// Blood types absent from the snapshot keep their default counts. Urgency is
/// always derived from `config.urgent_threshold`, never read from the feed.
pub fn load_inventory_value(
    snapshot: &Value,
    config: &BloodNetConfig,
) -> Result<Inventory, BloodNetError> {
    let entries = snapshot
        .get("inventory")
        .and_then(Value::as_array)
        .ok_or(BloodNetError::MissingData)?;

    let mut inventory = Inventory::with_threshold(config.urgent_threshold);
    for change in entries.iter().map(parse_change) {
        inventory.apply(change?);
    }

    Ok(inventory)
}

/// Parse stock change events from either a bare array or `{"events": [...]}`.
pub fn parse_stock_events_str(events_json: &str) -> Result<Vec<StockChange>, BloodNetError> {
    let value = parse_json(events_json)?;
    parse_stock_events_value(&value)
}

pub fn parse_stock_events_value(events: &Value) -> Result<Vec<StockChange>, BloodNetError> {
    let list = events
        .as_array()
        .or_else(|| events.get("events").and_then(Value::as_array))
        .ok_or(BloodNetError::MissingData)?;

    list.iter().map(parse_change).collect()
}

/// Parse a donor roster `{"donors": [...]}`.
///
/// Entries without a name or with an unreadable blood type are skipped; entries
/// without an id get a positional one.
pub fn load_donors_str(roster_json: &str) -> Result<Vec<Donor>, BloodNetError> {
    let value = parse_json(roster_json)?;
    load_donors_value(&value)
}

pub fn load_donors_value(roster: &Value) -> Result<Vec<Donor>, BloodNetError> {
    let entries = roster
        .get("donors")
        .and_then(Value::as_array)
        .ok_or(BloodNetError::MissingData)?;

    let mut donors = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let Some(name) = text_field(entry, "name") else {
            tracing::warn!(index, "donor entry without name skipped");
            continue;
        };
        let blood_type = match blood_type_field(entry) {
            Ok(blood_type) => blood_type,
            Err(err) => {
                tracing::warn!(index, %err, "donor entry with invalid blood type skipped");
                continue;
            }
        };

        donors.push(Donor {
            id: text_field(entry, "id").unwrap_or_else(|| format!("donor-{}", index + 1)),
            name,
            blood_type,
            location: text_field(entry, "location").unwrap_or_default(),
            online: entry.get("online").and_then(Value::as_bool).unwrap_or(false),
        });
    }

    Ok(donors)
}

fn parse_json(input: &str) -> Result<Value, BloodNetError> {
    serde_json::from_str(input).map_err(|err| BloodNetError::Parse(err.to_string()))
}

fn parse_change(entry: &Value) -> Result<StockChange, BloodNetError> {
    let blood_type = blood_type_field(entry)?;
    let count = match entry.get("count") {
        Some(Value::Number(number)) => number
            .as_u64()
            .and_then(|count| u32::try_from(count).ok())
            .ok_or_else(|| {
                BloodNetError::Parse(format!("Invalid count {number} for {blood_type}"))
            })?,
        Some(Value::String(text)) => text.trim().parse::<u32>().map_err(|_| {
            BloodNetError::Parse(format!("Invalid count {text:?} for {blood_type}"))
        })?,
        _ => return Err(BloodNetError::MissingData),
    };

    Ok(StockChange { blood_type, count })
}

fn blood_type_field(entry: &Value) -> Result<BloodType, BloodNetError> {
    entry
        .get("bloodType")
        .or_else(|| entry.get("blood_type"))
        .and_then(Value::as_str)
        .ok_or(BloodNetError::MissingData)?
        .parse()
}

fn text_field(entry: &Value, key: &str) -> Option<String> {
    entry
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
