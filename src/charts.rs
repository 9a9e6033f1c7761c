use std::collections::BTreeSet;
use std::error::Error;

use plotters::prelude::*;

use crate::aggregate::HourlyGapRow;
use crate::record::{TripRequest, STATUS_CANCELLED, STATUS_NO_CARS};
use crate::slot::TimeSlot;

/// Returns a palette of distinct colors.
fn get_color_palette() -> Vec<RGBColor> {
    vec![
        RGBColor(255, 0, 0),     // red
        RGBColor(0, 0, 255),     // blue
        RGBColor(0, 128, 0),     // green
        RGBColor(255, 165, 0),   // orange
        RGBColor(128, 0, 128),   // purple
        RGBColor(0, 128, 128),   // teal
        RGBColor(128, 128, 0),   // olive
        RGBColor(165, 42, 42),   // brown
    ]
}

/// Grouped bar chart of unfulfilled requests per time slot, one bar per
/// status within each slot. Completed trips are filtered out first.
pub fn render_unfulfilled_by_slot(
    filename: &str,
    records: &[TripRequest],
) -> Result<(), Box<dyn Error>> {
    let unfulfilled: Vec<&TripRequest> =
        records.iter().filter(|r| !r.is_completed()).collect();

    let mut slots: Vec<TimeSlot> = TimeSlot::DAY.to_vec();
    if unfulfilled.iter().any(|r| r.slot() == TimeSlot::Unknown) {
        slots.push(TimeSlot::Unknown);
    }
    let statuses = status_set(&unfulfilled);

    let labels: Vec<String> = slots.iter().map(|s| s.label().to_string()).collect();
    let counts: Vec<Vec<u64>> = slots
        .iter()
        .map(|slot| {
            statuses
                .iter()
                .map(|status| {
                    unfulfilled
                        .iter()
                        .filter(|r| r.slot() == *slot && r.status == *status)
                        .count() as u64
                })
                .collect()
        })
        .collect();

    grouped_bar_chart(
        filename,
        "Unfulfilled Requests by Time Slot",
        "Time Slot",
        &labels,
        &statuses,
        &counts,
    )
}

/// Grouped bar chart of unfulfilled requests per pickup point.
pub fn render_unfulfilled_by_pickup(
    filename: &str,
    records: &[TripRequest],
) -> Result<(), Box<dyn Error>> {
    let unfulfilled: Vec<&TripRequest> =
        records.iter().filter(|r| !r.is_completed()).collect();

    let pickups: Vec<String> = unfulfilled
        .iter()
        .map(|r| r.pickup_point.clone())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect();
    let statuses = status_set(&unfulfilled);

    let counts: Vec<Vec<u64>> = pickups
        .iter()
        .map(|pickup| {
            statuses
                .iter()
                .map(|status| {
                    unfulfilled
                        .iter()
                        .filter(|r| r.pickup_point == *pickup && r.status == *status)
                        .count() as u64
                })
                .collect()
        })
        .collect();

    grouped_bar_chart(
        filename,
        "Unfulfilled Requests by Pickup Point",
        "Pickup Point",
        &pickups,
        &statuses,
        &counts,
    )
}

/// Stacked bars of Cancelled plus No Cars Available per hour of day.
pub fn render_hourly_stacked(
    filename: &str,
    rows: &[HourlyGapRow],
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(filename, (1600, 1200)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_value = rows
        .iter()
        .map(|r| r.counts.get(STATUS_CANCELLED) + r.counts.get(STATUS_NO_CARS))
        .max()
        .unwrap_or(0) as i64;

    let mut chart = ChartBuilder::on(&root)
        .caption("Hourly Unfulfilled Requests", ("sans-serif", 50))
        .margin(60)
        .x_label_area_size(100)
        .y_label_area_size(80)
        .build_cartesian_2d(0..24i32, 0..(max_value + max_value / 10 + 1))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(24)
        .x_desc("Hour of Day")
        .y_desc("Number of Requests")
        .label_style(("sans-serif", 30))
        .draw()?;

    let cancelled_color = RGBColor(255, 0, 0);
    let no_cars_color = RGBColor(0, 0, 255);

    chart
        .draw_series(rows.iter().map(|row| {
            let h = row.hour as i32;
            Rectangle::new(
                [(h, 0), (h + 1, row.counts.get(STATUS_CANCELLED) as i64)],
                cancelled_color.filled(),
            )
        }))?
        .label(STATUS_CANCELLED)
        .legend(move |(x, y)| {
            Rectangle::new([(x, y - 7), (x + 14, y + 7)], cancelled_color.filled())
        });

    chart
        .draw_series(rows.iter().map(|row| {
            let h = row.hour as i32;
            let base = row.counts.get(STATUS_CANCELLED) as i64;
            let top = base + row.counts.get(STATUS_NO_CARS) as i64;
            Rectangle::new([(h, base), (h + 1, top)], no_cars_color.filled())
        }))?
        .label(STATUS_NO_CARS)
        .legend(move |(x, y)| {
            Rectangle::new([(x, y - 7), (x + 14, y + 7)], no_cars_color.filled())
        });

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 30))
        .draw()?;

    Ok(())
}

fn status_set(records: &[&TripRequest]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.status.clone())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

/// Shared renderer: one group per x cell, one sub-bar per status.
fn grouped_bar_chart(
    filename: &str,
    caption: &str,
    x_desc: &str,
    group_labels: &[String],
    statuses: &[String],
    counts: &[Vec<u64>],
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(filename, (1600, 1200)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_value = counts
        .iter()
        .flat_map(|group| group.iter())
        .copied()
        .max()
        .unwrap_or(0) as i64;

    let labels = group_labels.to_vec();
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 50))
        .margin(60)
        .x_label_area_size(100)
        .y_label_area_size(80)
        .build_cartesian_2d(
            0f64..group_labels.len() as f64,
            0..(max_value + max_value / 10 + 1),
        )?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(group_labels.len())
        .x_label_formatter(&move |x| {
            let idx = x.floor() as usize;
            labels.get(idx).cloned().unwrap_or_default()
        })
        .x_desc(x_desc)
        .y_desc("Number of Requests")
        .label_style(("sans-serif", 30))
        .draw()?;

    let palette = get_color_palette();
    // Sub-bars fill the middle 80% of each group cell.
    let bar_width = 0.8 / statuses.len().max(1) as f64;

    for (j, status) in statuses.iter().enumerate() {
        let color = palette[j % palette.len()];
        chart
            .draw_series(counts.iter().enumerate().map(|(i, group)| {
                let x0 = i as f64 + 0.1 + j as f64 * bar_width;
                let x1 = x0 + bar_width;
                Rectangle::new([(x0, 0), (x1, group[j] as i64)], color.filled())
            }))?
            .label(status)
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 7), (x + 14, y + 7)], color.filled())
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 30))
        .draw()?;

    Ok(())
}
