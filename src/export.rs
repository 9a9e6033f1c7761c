use std::error::Error;
use std::io;

use crate::aggregate::{observed_statuses, GapSummaryRow};

/// Write the pivoted summary table. Status columns are the sorted set of
/// labels actually observed, so the layout tracks the data vocabulary.
pub fn write_summary<W: io::Write>(
    writer: W,
    rows: &[GapSummaryRow],
) -> Result<(), Box<dyn Error>> {
    let statuses = observed_statuses(rows);
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["Time slot".to_string(), "Pickup point".to_string()];
    header.extend(statuses.iter().cloned());
    header.push("Total Requests".to_string());
    header.push("Unfulfilled".to_string());
    header.push("Gap %".to_string());
    wtr.write_record(&header)?;

    for row in rows {
        let mut record = vec![row.slot.label().to_string(), row.pickup_point.clone()];
        for status in &statuses {
            record.push(row.counts.get(status).to_string());
        }
        record.push(row.total_requests().to_string());
        record.push(row.unfulfilled().to_string());
        record.push(format!("{:.2}", row.gap_percent()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the summary to the fixed output path.
pub fn export_summary(path: &str, rows: &[GapSummaryRow]) -> Result<(), Box<dyn Error>> {
    let file = std::fs::File::create(path)?;
    write_summary(file, rows)
}

/// Print the pivoted table to stdout, columns padded for reading.
pub fn print_summary(rows: &[GapSummaryRow]) {
    let statuses = observed_statuses(rows);
    print!("{:<22} {:<14}", "Time slot", "Pickup point");
    for status in &statuses {
        print!(" {:>18}", status);
    }
    println!(" {:>15} {:>12} {:>8}", "Total Requests", "Unfulfilled", "Gap %");

    for row in rows {
        print!("{:<22} {:<14}", row.slot.label(), row.pickup_point);
        for status in &statuses {
            print!(" {:>18}", row.counts.get(status));
        }
        println!(
            " {:>15} {:>12} {:>8.2}",
            row.total_requests(),
            row.unfulfilled(),
            row.gap_percent()
        );
    }
}
