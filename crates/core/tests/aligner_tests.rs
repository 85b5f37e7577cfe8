// ═══════════════════════════════════════════════════════════════════
// Aligner Tests — merging observed and forecast series for charting
// ═══════════════════════════════════════════════════════════════════

use std::collections::HashSet;

use serde_json::json;

use census_forecast_core::models::chart::AlignedRecord;
use census_forecast_core::models::series::{parse_timestamp, SeriesPair, TimePoint};
use census_forecast_core::services::aligner::{align_series, sort_records};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn tp(date: &str, count: f64) -> TimePoint {
    TimePoint::new(date, count)
}

fn distinct_keys(a: &[TimePoint], b: &[TimePoint]) -> usize {
    a.iter()
        .chain(b.iter())
        .map(|p| p.date.as_str())
        .collect::<HashSet<_>>()
        .len()
}

fn assert_ascending(records: &[AlignedRecord]) {
    for pair in records.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        match (parse_timestamp(&a.date), parse_timestamp(&b.date)) {
            (Some(x), Some(y)) => assert!(x <= y, "{} should not follow {}", b.date, a.date),
            (Some(_), None) => {}
            (None, Some(_)) => panic!("label {} sorted before date {}", a.date, b.date),
            (None, None) => assert!(a.date <= b.date),
        }
    }
}

/// A handful of overlapping/disjoint/unsorted fixtures for property checks.
fn fixtures() -> Vec<(Vec<TimePoint>, Vec<TimePoint>)> {
    vec![
        (vec![], vec![]),
        (vec![tp("2024-01-03", 5.0), tp("2024-01-01", 3.0)], vec![]),
        (vec![], vec![tp("2024-02-01", 1.0), tp("2024-01-15", 2.0)]),
        (
            vec![tp("2024-01-01", 10.0), tp("2024-01-02", 11.0), tp("2024-01-03", 12.0)],
            vec![tp("2024-01-03", 12.0), tp("2024-01-04", 14.0), tp("2024-01-05", 15.0)],
        ),
        (
            vec![tp("2024-03-10", 1.0), tp("2024-03-08", 2.0), tp("2024-03-10", 4.0)],
            vec![tp("2024-03-09", 7.0), tp("2024-03-08", 0.0)],
        ),
        (
            vec![tp("2024-05-01T08:00:00", 3.0), tp("2024-05-01T06:00:00", 1.0)],
            vec![tp("2024-05-01T07:00:00", 2.0)],
        ),
    ]
}

// ── Scenarios ───────────────────────────────────────────────────────

mod scenarios {
    use super::*;

    #[test]
    fn observed_only() {
        let out = align_series(&[tp("2024-01-01", 10.0)], &[]);
        assert_eq!(out, vec![AlignedRecord::observed("2024-01-01", 10.0)]);
        assert_eq!(out[0].predicted, None);
    }

    #[test]
    fn disjoint_dates_are_sorted_and_null_filled() {
        let out = align_series(&[tp("2024-01-01", 10.0)], &[tp("2024-01-02", 15.0)]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], AlignedRecord::observed("2024-01-01", 10.0));
        assert_eq!(out[1].date, "2024-01-02");
        assert_eq!(out[1].actual, None);
        assert_eq!(out[1].predicted, Some(15.0));
    }

    #[test]
    fn shared_date_merges_into_one_record() {
        let out = align_series(&[tp("2024-01-01", 10.0)], &[tp("2024-01-01", 12.0)]);
        assert_eq!(
            out,
            vec![AlignedRecord {
                date: "2024-01-01".into(),
                actual: Some(10.0),
                predicted: Some(12.0),
            }]
        );
    }

    #[test]
    fn duplicate_observed_key_last_write_wins() {
        let out = align_series(&[tp("d1", 1.0), tp("d1", 2.0)], &[]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].actual, Some(2.0));
    }

    #[test]
    fn duplicate_forecast_key_last_write_wins() {
        let out = align_series(
            &[tp("2024-01-01", 5.0)],
            &[tp("2024-01-01", 6.0), tp("2024-01-01", 7.0)],
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].actual, Some(5.0));
        assert_eq!(out[0].predicted, Some(7.0));
    }

    #[test]
    fn both_empty_is_empty() {
        assert!(align_series(&[], &[]).is_empty());
    }

    #[test]
    fn forecast_only() {
        let out = align_series(&[], &[tp("2024-01-02", 4.0), tp("2024-01-01", 3.0)]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].date, "2024-01-01");
        assert!(out.iter().all(|r| r.actual.is_none()));
    }
}

// ── Properties over fixtures ────────────────────────────────────────

mod properties {
    use super::*;

    #[test]
    fn one_record_per_distinct_key() {
        for (actual, predicted) in fixtures() {
            let out = align_series(&actual, &predicted);
            assert_eq!(out.len(), distinct_keys(&actual, &predicted));
            let unique: HashSet<_> = out.iter().map(|r| r.date.as_str()).collect();
            assert_eq!(unique.len(), out.len());
        }
    }

    #[test]
    fn keys_only_in_observed_have_no_forecast() {
        for (actual, predicted) in fixtures() {
            let forecast_keys: HashSet<_> = predicted.iter().map(|p| p.date.as_str()).collect();
            for record in align_series(&actual, &predicted) {
                if !forecast_keys.contains(record.date.as_str()) {
                    assert_eq!(record.predicted, None, "{}", record.date);
                    assert!(record.actual.is_some());
                }
            }
        }
    }

    #[test]
    fn keys_in_both_carry_last_source_values() {
        for (actual, predicted) in fixtures() {
            for record in align_series(&actual, &predicted) {
                let last_actual = actual.iter().rev().find(|p| p.date == record.date);
                let last_pred = predicted.iter().rev().find(|p| p.date == record.date);
                assert_eq!(record.actual, last_actual.map(|p| p.count));
                assert_eq!(record.predicted, last_pred.map(|p| p.count));
            }
        }
    }

    #[test]
    fn output_is_ascending() {
        for (actual, predicted) in fixtures() {
            assert_ascending(&align_series(&actual, &predicted));
        }
    }

    #[test]
    fn realigning_projection_is_idempotent() {
        for (actual, predicted) in fixtures() {
            let first = align_series(&actual, &predicted);
            let projected = SeriesPair::from_aligned(&first);
            assert_eq!(projected.align(), first);
        }
    }
}

// ── Absence vs zero ─────────────────────────────────────────────────

#[test]
fn zero_count_is_a_value_not_absence() {
    let out = align_series(&[tp("2024-01-01", 0.0)], &[tp("2024-01-02", 0.0)]);
    assert_eq!(out[0].actual, Some(0.0));
    assert_eq!(out[0].predicted, None);
    assert_eq!(out[1].actual, None);
    assert_eq!(out[1].predicted, Some(0.0));
}

#[test]
fn serializes_absence_as_null() {
    let out = align_series(&[tp("2024-01-01", 10.0)], &[tp("2024-01-02", 15.0)]);
    let value = serde_json::to_value(&out).unwrap();
    assert_eq!(
        value,
        json!([
            { "date": "2024-01-01", "actual": 10.0, "predicted": null },
            { "date": "2024-01-02", "actual": null, "predicted": 15.0 }
        ])
    );
}

// ── Ordering and degraded keys ──────────────────────────────────────

mod ordering {
    use super::*;

    #[test]
    fn mixed_date_formats_sort_chronologically() {
        let out = align_series(
            &[tp("2024-10-01", 1.0), tp("2023-12-31", 2.0), tp("2024-02-01", 3.0)],
            &[tp("2024-01-15 12:00:00", 4.0)],
        );
        let dates: Vec<_> = out.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(
            dates,
            vec!["2023-12-31", "2024-01-15 12:00:00", "2024-02-01", "2024-10-01"]
        );
    }

    #[test]
    fn datetimes_sort_within_a_day() {
        let out = align_series(
            &[tp("2024-05-01T14:00:00", 1.0), tp("2024-05-01T09:30:00", 2.0)],
            &[tp("2024-05-01T11:00:00Z", 3.0)],
        );
        let dates: Vec<_> = out.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(
            dates,
            vec!["2024-05-01T09:30:00", "2024-05-01T11:00:00Z", "2024-05-01T14:00:00"]
        );
    }

    #[test]
    fn unparseable_labels_fall_back_to_lexical_after_dates() {
        init_tracing();
        let out = align_series(
            &[tp("Day 2", 1.0), tp("Day 10", 2.0), tp("2024-01-01", 3.0)],
            &[tp("Feb", 4.0)],
        );
        let dates: Vec<_> = out.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01-01", "Day 10", "Day 2", "Feb"]);
    }

    #[test]
    fn keys_are_matched_by_exact_string() {
        // Same instant, different spelling: two rows
        let out = align_series(&[tp("2024-01-01", 1.0)], &[tp("2024-01-01T00:00:00", 2.0)]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].date, "2024-01-01");
        assert_eq!(out[1].date, "2024-01-01T00:00:00");
    }

    #[test]
    fn sort_records_orders_in_place() {
        let mut records = vec![
            AlignedRecord::forecast("2024-01-03", 3.0),
            AlignedRecord::observed("2024-01-01", 1.0),
            AlignedRecord::observed("label", 0.0),
            AlignedRecord::forecast("2024-01-02", 2.0),
        ];
        sort_records(&mut records);
        let dates: Vec<_> = records.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-02", "2024-01-03", "label"]);
    }
}

#[test]
fn series_pair_align_matches_free_function() {
    let pair = SeriesPair::new(
        vec![tp("2024-01-02", 2.0), tp("2024-01-01", 1.0)],
        vec![tp("2024-01-02", 2.5), tp("2024-01-03", 3.0)],
    );
    assert_eq!(pair.align(), align_series(&pair.actual, &pair.predicted));
    assert_eq!(pair.align().len(), 3);
}

#[test]
fn large_disjoint_series_scale_linearly_in_output() {
    let actual: Vec<_> = (0..500)
        .map(|i| tp(&format!("2020-01-01T{:02}:{:02}:00", i / 60, i % 60), i as f64))
        .collect();
    let predicted: Vec<_> = (0..500)
        .map(|i| tp(&format!("2021-01-01T{:02}:{:02}:00", i / 60, i % 60), i as f64))
        .collect();
    let out = align_series(&actual, &predicted);
    assert_eq!(out.len(), 1000);
    assert_ascending(&out);
    assert!(out[..500].iter().all(|r| r.predicted.is_none()));
    assert!(out[500..].iter().all(|r| r.actual.is_none()));
}
