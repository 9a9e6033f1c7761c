use csv::Reader;
use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};

use indicatif::{ProgressBar, ProgressStyle};

mod aggregate;
mod charts;
mod export;
mod record;
mod slot;

use aggregate::{aggregate, aggregate_hourly};
use record::{null_report, RawTrip, TripRequest};

const INPUT_PATH: &str = "data.csv";
const SUMMARY_PATH: &str = "gap_summary.csv";
const SLOT_CHART_PATH: &str = "unfulfilled_by_slot.png";
const PICKUP_CHART_PATH: &str = "unfulfilled_by_pickup.png";
const HOURLY_CHART_PATH: &str = "hourly_unfulfilled.png";

fn main() -> Result<(), Box<dyn Error>> {
    // Count total number of records (minus header) for the progress bar.
    let total_lines = {
        let file = File::open(INPUT_PATH)?;
        let buf_reader = BufReader::new(file);
        buf_reader.lines().count().saturating_sub(1)
    };

    let pb = ProgressBar::new(total_lines as u64);
    pb.set_message("Loading requests...");
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} {wide_bar} {pos}/{len} ({eta})")
            .progress_chars("█▒░"),
    );

    // Reopen and deserialize. A missing file or missing columns aborts here;
    // bad timestamps inside a row are coerced to None instead.
    let file = File::open(INPUT_PATH)?;
    let mut rdr = Reader::from_reader(file);
    let mut records: Vec<TripRequest> = Vec::with_capacity(total_lines);
    for result in pb.wrap_iter(rdr.deserialize()) {
        let raw: RawTrip = result?;
        records.push(TripRequest::from_raw(raw));
    }
    pb.finish_with_message("Load complete.");

    println!("Loaded {} requests from {}", records.len(), INPUT_PATH);
    let nulls = null_report(&records);
    println!(
        "Missing values: request_time={}, drop_time={}",
        nulls.request_time, nulls.drop_time
    );

    // Slot/pickup pivot: print, then persist.
    let summary = aggregate(&records);
    println!();
    export::print_summary(&summary);
    export::export_summary(SUMMARY_PATH, &summary)?;
    println!("\nSummary written to {}", SUMMARY_PATH);

    // Hourly pivot feeds the stacked chart.
    let hourly = aggregate_hourly(&records);

    charts::render_unfulfilled_by_slot(SLOT_CHART_PATH, &records)?;
    charts::render_unfulfilled_by_pickup(PICKUP_CHART_PATH, &records)?;
    charts::render_hourly_stacked(HOURLY_CHART_PATH, &hourly)?;

    println!("Charts generated successfully.");
    Ok(())
}
