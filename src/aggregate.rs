use std::collections::{BTreeMap, BTreeSet};

use crate::record::{TripRequest, STATUS_CANCELLED, STATUS_NO_CARS};
use crate::slot::TimeSlot;

/// Per-group status tally. Lookup of a status never seen in the group
/// returns 0, so derived columns don't depend on which labels happened
/// to occur.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusCounts(BTreeMap<String, u64>);

impl StatusCounts {
    pub fn bump(&mut self, status: &str) {
        *self.0.entry(status.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, status: &str) -> u64 {
        self.0.get(status).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn unfulfilled(&self) -> u64 {
        self.get(STATUS_CANCELLED) + self.get(STATUS_NO_CARS)
    }

    /// 100 * unfulfilled / total. NaN only when the group is empty,
    /// which aggregation never emits.
    pub fn gap_percent(&self) -> f64 {
        self.unfulfilled() as f64 / self.total() as f64 * 100.0
    }

    pub fn statuses(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// One pivoted summary row per (time slot, pickup point) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct GapSummaryRow {
    pub slot: TimeSlot,
    pub pickup_point: String,
    pub counts: StatusCounts,
}

impl GapSummaryRow {
    pub fn total_requests(&self) -> u64 {
        self.counts.total()
    }

    pub fn unfulfilled(&self) -> u64 {
        self.counts.unfulfilled()
    }

    pub fn gap_percent(&self) -> f64 {
        self.counts.gap_percent()
    }
}

/// One summary row per hour of day that saw at least one request.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyGapRow {
    pub hour: u32,
    pub counts: StatusCounts,
}

impl HourlyGapRow {
    pub fn total_requests(&self) -> u64 {
        self.counts.total()
    }

    pub fn unfulfilled(&self) -> u64 {
        self.counts.unfulfilled()
    }

    pub fn gap_percent(&self) -> f64 {
        self.counts.gap_percent()
    }
}

/// Group by (slot, pickup point), tally statuses. Rows come out in day
/// order then pickup point, independent of input order. Records with an
/// unparseable request time land under the Unknown slot.
pub fn aggregate(records: &[TripRequest]) -> Vec<GapSummaryRow> {
    let mut groups: BTreeMap<(TimeSlot, String), StatusCounts> = BTreeMap::new();
    for record in records {
        let key = (record.slot(), record.pickup_point.clone());
        groups.entry(key).or_default().bump(&record.status);
    }
    groups
        .into_iter()
        .map(|((slot, pickup_point), counts)| GapSummaryRow {
            slot,
            pickup_point,
            counts,
        })
        .collect()
}

/// Same tally keyed by hour alone. Records without an hour are excluded.
pub fn aggregate_hourly(records: &[TripRequest]) -> Vec<HourlyGapRow> {
    let mut groups: BTreeMap<u32, StatusCounts> = BTreeMap::new();
    for record in records {
        if let Some(hour) = record.hour() {
            groups.entry(hour).or_default().bump(&record.status);
        }
    }
    groups
        .into_iter()
        .map(|(hour, counts)| HourlyGapRow { hour, counts })
        .collect()
}

/// Sorted union of every status label observed across the rows. These
/// become the dynamic columns of the pivoted table.
pub fn observed_statuses(rows: &[GapSummaryRow]) -> Vec<String> {
    let mut statuses = BTreeSet::new();
    for row in rows {
        for status in row.counts.statuses() {
            statuses.insert(status.to_string());
        }
    }
    statuses.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{parse_timestamp, STATUS_COMPLETED};

    fn trip(hour: Option<u32>, pickup: &str, status: &str) -> TripRequest {
        let request_time = hour.map(|h| {
            parse_timestamp(&format!("11/7/2016 {:02}:30", h))
                .expect("test timestamp should parse")
        });
        TripRequest {
            request_time,
            drop_time: None,
            pickup_point: pickup.to_string(),
            status: status.to_string(),
        }
    }

    #[test]
    fn night_airport_scenario() {
        let records = vec![
            trip(Some(2), "Airport", STATUS_CANCELLED),
            trip(Some(2), "Airport", STATUS_COMPLETED),
        ];
        let rows = aggregate(&records);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.slot, TimeSlot::Night);
        assert_eq!(row.pickup_point, "Airport");
        assert_eq!(row.total_requests(), 2);
        assert_eq!(row.unfulfilled(), 1);
        assert_eq!(row.gap_percent(), 50.0);
    }

    #[test]
    fn absent_status_counts_as_zero() {
        let records = vec![trip(Some(9), "City", STATUS_CANCELLED)];
        let rows = aggregate(&records);
        let row = &rows[0];
        assert_eq!(row.counts.get(STATUS_NO_CARS), 0);
        assert_eq!(row.counts.get(STATUS_COMPLETED), 0);
        assert_eq!(row.unfulfilled(), 1);
    }

    #[test]
    fn total_is_sum_of_status_counts() {
        let records = vec![
            trip(Some(18), "City", STATUS_COMPLETED),
            trip(Some(18), "City", STATUS_COMPLETED),
            trip(Some(18), "City", STATUS_CANCELLED),
            trip(Some(18), "City", STATUS_NO_CARS),
            trip(Some(18), "City", "Driver No Show"), // novel status
        ];
        let rows = aggregate(&records);
        let row = &rows[0];
        let status_sum: u64 = row.counts.statuses().map(|s| row.counts.get(s)).sum();
        assert_eq!(row.total_requests(), status_sum);
        assert_eq!(row.total_requests(), 5);
        // The novel status counts toward the total but not the gap.
        assert_eq!(row.unfulfilled(), 2);
    }

    #[test]
    fn unfulfilled_never_exceeds_total_and_gap_stays_in_range() {
        let records = vec![
            trip(Some(5), "Airport", STATUS_NO_CARS),
            trip(Some(5), "Airport", STATUS_NO_CARS),
            trip(Some(6), "City", STATUS_COMPLETED),
            trip(Some(22), "Airport", STATUS_CANCELLED),
            trip(None, "City", STATUS_CANCELLED),
        ];
        for row in aggregate(&records) {
            assert!(row.unfulfilled() <= row.total_requests());
            let gap = row.gap_percent();
            assert!((0.0..=100.0).contains(&gap));
        }
    }

    #[test]
    fn gap_percent_is_monotonic_in_unfulfilled_for_fixed_total() {
        let total = 10;
        let mut previous = -1.0;
        for unfulfilled in 0..=total {
            let mut counts = StatusCounts::default();
            for _ in 0..unfulfilled {
                counts.bump(STATUS_CANCELLED);
            }
            for _ in unfulfilled..total {
                counts.bump(STATUS_COMPLETED);
            }
            assert_eq!(counts.total(), total);
            let gap = counts.gap_percent();
            assert!(gap > previous);
            previous = gap;
        }
    }

    #[test]
    fn aggregate_is_idempotent_and_order_independent() {
        let records = vec![
            trip(Some(2), "Airport", STATUS_CANCELLED),
            trip(Some(9), "City", STATUS_COMPLETED),
            trip(Some(18), "City", STATUS_NO_CARS),
            trip(Some(18), "Airport", STATUS_COMPLETED),
        ];
        let mut reversed = records.clone();
        reversed.reverse();
        let first = aggregate(&records);
        let second = aggregate(&records);
        let shuffled = aggregate(&reversed);
        assert_eq!(first, second);
        assert_eq!(first, shuffled);
    }

    #[test]
    fn no_emitted_row_has_zero_total() {
        let records = vec![
            trip(Some(2), "Airport", STATUS_CANCELLED),
            trip(None, "City", STATUS_NO_CARS),
        ];
        for row in aggregate(&records) {
            assert!(row.total_requests() > 0);
        }
        for row in aggregate_hourly(&records) {
            assert!(row.total_requests() > 0);
        }
    }

    #[test]
    fn unknown_slot_rows_sort_last() {
        let records = vec![
            trip(None, "City", STATUS_CANCELLED),
            trip(Some(23), "City", STATUS_COMPLETED),
            trip(Some(0), "City", STATUS_COMPLETED),
        ];
        let rows = aggregate(&records);
        let slots: Vec<TimeSlot> = rows.iter().map(|r| r.slot).collect();
        assert_eq!(
            slots,
            vec![TimeSlot::Night, TimeSlot::LateNight, TimeSlot::Unknown]
        );
    }

    #[test]
    fn hourly_excludes_records_without_an_hour() {
        let records = vec![
            trip(Some(7), "City", STATUS_COMPLETED),
            trip(None, "City", STATUS_CANCELLED),
            trip(Some(7), "Airport", STATUS_NO_CARS),
        ];
        let rows = aggregate_hourly(&records);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].hour, 7);
        // Pickup point is ignored in the hourly view.
        assert_eq!(rows[0].total_requests(), 2);
        assert_eq!(rows[0].unfulfilled(), 1);
    }

    #[test]
    fn observed_statuses_is_sorted_union() {
        let records = vec![
            trip(Some(2), "Airport", STATUS_NO_CARS),
            trip(Some(9), "City", STATUS_CANCELLED),
            trip(Some(14), "City", STATUS_COMPLETED),
        ];
        let rows = aggregate(&records);
        assert_eq!(
            observed_statuses(&rows),
            vec![
                STATUS_CANCELLED.to_string(),
                STATUS_NO_CARS.to_string(),
                STATUS_COMPLETED.to_string(),
            ]
        );
    }
}
