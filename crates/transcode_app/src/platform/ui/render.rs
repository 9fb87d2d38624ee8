use transcode_core::{AppViewModel, ListingEntry, ListingRow, PushStatus, QueueRowView, TreeStatus};

const BAR_WIDTH: usize = 20;

/// Renders the whole screen as text. `stamp` is shown in the header.
pub fn render(view: &AppViewModel, stamp: &str) -> String {
    let mut lines = vec![format!("== transcode console [{stamp}] ==")];

    match &view.tree {
        TreeStatus::Loading => lines.push("Loading source tree...".to_string()),
        TreeStatus::Failed(reason) => lines.push(format!("Source tree unavailable: {reason}")),
        TreeStatus::Ready => {
            lines.push(format!("Location: {}", view.location.join(" > ")));
            if view.listing.is_empty() {
                lines.push("  (empty)".to_string());
            }
            lines.extend(
                view.listing
                    .iter()
                    .enumerate()
                    .map(|(index, row)| format_listing_row(index + 1, row)),
            );
        }
    }

    lines.push(String::new());
    lines.push(format!("Queue (updates: {}):", push_label(view.push)));
    if !view.queue_synced {
        lines.push("  Loading queue...".to_string());
    } else if view.queue.is_empty() {
        lines.push("  Nothing queued".to_string());
    } else {
        lines.extend(view.queue.iter().map(format_queue_row));
    }

    if let Some(error) = &view.last_error {
        lines.push(format!("Error: {error}"));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn format_listing_row(number: usize, row: &ListingRow) -> String {
    match &row.entry {
        ListingEntry::Up => format!("  [{number:>2}] ../"),
        ListingEntry::Directory { name } => format!("  [{number:>2}] {name}/"),
        ListingEntry::File { name, .. } => {
            let mark = if row.selected { "x" } else { " " };
            format!("  [{number:>2}] [{mark}] {name}")
        }
    }
}

fn format_queue_row(item: &QueueRowView) -> String {
    format!(
        "  {bar} {progress:>7.2}%  {name}",
        bar = progress_bar(item.progress),
        progress = item.progress,
        name = item.name
    )
}

/// Values outside 0..=100 are drawn clamped; the number stays as reported.
fn progress_bar(progress: f64) -> String {
    let fraction = if progress.is_finite() {
        progress.clamp(0.0, 100.0) / 100.0
    } else {
        0.0
    };
    let filled = (fraction * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

fn push_label(status: PushStatus) -> &'static str {
    match status {
        PushStatus::Connecting => "connecting",
        PushStatus::Connected => "live",
        PushStatus::Unavailable => "polling only, push unavailable",
        PushStatus::Closed => "polling only, push closed",
    }
}
