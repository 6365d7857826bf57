//! Plain-text rendering of a surface for the terminal.

use tracker_core::review::ReviewPlatform;
use tracker_core::{Alert, AlertKind, JobRecord, SurfaceView, TrackButton, COLUMN_TITLES};

pub const EMPTY_LISTING: &str = "No tracked jobs found. Start tracking jobs to see them here!";
pub const NOT_TRACKABLE: &str = "This page has no trackable job.";

const MAX_CELL_WIDTH: usize = 40;
const COLUMN_GAP: &str = "  ";

pub fn render_alert(alert: &Alert) -> String {
    match alert.kind {
        AlertKind::Info => alert.message.clone(),
        AlertKind::Error => format!("error: {}", alert.message),
    }
}

/// The track affordance as the page would show it.
pub fn render_page(view: &SurfaceView) -> String {
    match (&view.page_key, view.button) {
        (Some(key), button) if button != TrackButton::Hidden => {
            format!("[{}] {}", button.label(), key)
        }
        _ => NOT_TRACKABLE.to_string(),
    }
}

fn clip(cell: &str) -> String {
    if cell.chars().count() <= MAX_CELL_WIDTH {
        return cell.to_string();
    }
    let mut clipped: String = cell.chars().take(MAX_CELL_WIDTH - 3).collect();
    clipped.push_str("...");
    clipped
}

fn table_line(cells: &[String], widths: &[usize]) -> String {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(COLUMN_GAP);
    line.trim_end().to_string()
}

/// Records in stored order under the export's column titles.
pub fn render_listing(records: &[JobRecord]) -> String {
    if records.is_empty() {
        return EMPTY_LISTING.to_string();
    }

    let header: Vec<String> = COLUMN_TITLES.iter().map(|title| title.to_string()).collect();
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| record.columns().iter().map(|cell| clip(cell)).collect())
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|cell| cell.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    let mut lines = vec![table_line(&header, &widths), table_line(&rule, &widths)];
    lines.extend(rows.iter().map(|row| table_line(row, &widths)));
    lines.join("\n")
}

pub fn render_reviews<'a>(
    company: &str,
    platforms: impl IntoIterator<Item = &'a ReviewPlatform>,
) -> String {
    platforms
        .into_iter()
        .map(|platform| format!("{}: {}", platform.title, platform.search_url(company)))
        .collect::<Vec<_>>()
        .join("\n")
}
