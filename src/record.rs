use chrono::{NaiveDateTime, Timelike};
use serde::Deserialize;

use crate::slot::TimeSlot;

// Status labels observed in the request log. The vocabulary is open:
// anything else still counts toward totals, just not toward `unfulfilled`.
pub const STATUS_COMPLETED: &str = "Trip Completed";
pub const STATUS_CANCELLED: &str = "Cancelled";
pub const STATUS_NO_CARS: &str = "No Cars Available";

/// One CSV row as it appears in the file. Timestamps stay strings here
/// because the source mixes two layouts and leaves some cells blank.
#[derive(Debug, Deserialize)]
pub struct RawTrip {
    #[serde(rename = "Request timestamp")]
    pub request_timestamp: String, // e.g. "11/7/2016 11:51" or "13-07-2016 08:33:16"
    #[serde(rename = "Drop timestamp")]
    pub drop_timestamp: String,
    #[serde(rename = "Pickup point")]
    pub pickup_point: String, // "City" or "Airport"
    #[serde(rename = "Status")]
    pub status: String,
}

/// A cleaned request record. Unparseable timestamps are already None.
#[derive(Debug, Clone)]
pub struct TripRequest {
    pub request_time: Option<NaiveDateTime>,
    pub drop_time: Option<NaiveDateTime>,
    pub pickup_point: String,
    pub status: String,
}

impl TripRequest {
    pub fn from_raw(raw: RawTrip) -> TripRequest {
        TripRequest {
            request_time: parse_timestamp(&raw.request_timestamp),
            drop_time: parse_timestamp(&raw.drop_timestamp),
            pickup_point: raw.pickup_point,
            status: raw.status,
        }
    }

    /// Hour of day of the request, 0-23. None when the timestamp was bad.
    pub fn hour(&self) -> Option<u32> {
        self.request_time.map(|t| t.hour())
    }

    pub fn slot(&self) -> TimeSlot {
        TimeSlot::classify(self.hour())
    }

    pub fn is_completed(&self) -> bool {
        self.status == STATUS_COMPLETED
    }
}

const TIMESTAMP_FORMATS: [&str; 2] = ["%d/%m/%Y %H:%M", "%d-%m-%Y %H:%M:%S"];

/// Try both layouts seen in the data; coerce failures to None instead of
/// failing the whole pipeline.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Missing-value counts across the cleaned record set.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct NullReport {
    pub request_time: usize,
    pub drop_time: usize,
}

pub fn null_report(records: &[TripRequest]) -> NullReport {
    let mut report = NullReport::default();
    for record in records {
        if record.request_time.is_none() {
            report.request_time += 1;
        }
        if record.drop_time.is_none() {
            report.drop_time += 1;
        }
    }
    report
}
