use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::models::chart::AlignedRecord;
use crate::models::series::{parse_timestamp, TimePoint};

/// Merge an observed series and a forecast series into one chart-ready
/// sequence.
///
/// - One record per distinct timestamp key across both inputs.
/// - Keys are matched by string equality; a repeated key overwrites the
///   earlier value from the same series (last write wins).
/// - A timestamp missing from one series leaves that side `None`.
/// - Output is ascending by parsed timestamp. Keys that do not parse as a
///   date sort after all dated keys, in lexical order.
///
/// Both inputs empty yields an empty vector.
pub fn align_series(actual: &[TimePoint], predicted: &[TimePoint]) -> Vec<AlignedRecord> {
    let mut records: Vec<AlignedRecord> = Vec::with_capacity(actual.len() + predicted.len());
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(records.capacity());

    for point in actual {
        match index.get(point.date.as_str()) {
            Some(&idx) => records[idx].actual = Some(point.count),
            None => {
                index.insert(point.date.as_str(), records.len());
                records.push(AlignedRecord::observed(point.date.clone(), point.count));
            }
        }
    }

    for point in predicted {
        match index.get(point.date.as_str()) {
            Some(&idx) => records[idx].predicted = Some(point.count),
            None => {
                index.insert(point.date.as_str(), records.len());
                records.push(AlignedRecord::forecast(point.date.clone(), point.count));
            }
        }
    }

    sort_records(&mut records);
    records
}

/// Sort records ascending by timestamp, degrading to lexical order for
/// keys that are not dates.
pub fn sort_records(records: &mut [AlignedRecord]) {
    let unparsed = records
        .iter()
        .filter(|r| parse_timestamp(&r.date).is_none())
        .count();
    if unparsed > 0 {
        tracing::warn!(
            unparsed,
            total = records.len(),
            "timestamp keys not parseable as dates; ordering them lexically"
        );
    }

    records.sort_by_cached_key(|r| sort_key(&r.date));
}

/// Dated keys first (by instant, then text), then labels by text.
fn sort_key(key: &str) -> (bool, Option<NaiveDateTime>, String) {
    match parse_timestamp(key) {
        Some(ts) => (false, Some(ts), key.to_string()),
        None => (true, None, key.to_string()),
    }
}
