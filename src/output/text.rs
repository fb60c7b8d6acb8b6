//! Human-readable text output

use super::Summary;

/// Print a result summary to stdout
pub fn print_summary(summary: &Summary) {
    print!("{}", format_summary(summary));
}

/// Render a result summary
pub fn format_summary(summary: &Summary) -> String {
    let mut out = String::new();
    out.push_str("═══════════════════════════════════════════════════════════\n");
    out.push_str(&format!("  {} ({})\n", summary.name, summary.kind));
    out.push_str("═══════════════════════════════════════════════════════════\n");

    let unit = if summary.kind == "strings" { "strings" } else { "elements" };
    out.push_str(&format!("Size: {} {}\n", format_number(summary.size as u64), unit));

    if let Some(num_bytes) = summary.num_bytes {
        out.push_str(&format!("Bytes: {} ({})\n", format_number(num_bytes as u64), format_bytes(num_bytes as u64)));
    }

    if let Some(ref stats) = summary.stats {
        let label = if summary.kind == "strings" { "Length" } else { "Values" };
        out.push_str(&format!(
            "{}: min {} / max {} / mean {:.4}\n",
            label, stats.min, stats.max, stats.mean
        ));
    }

    if let Some(fraction) = summary.true_fraction {
        out.push_str(&format!("True: {:.2}%\n", fraction * 100.0));
    }

    if !summary.preview.is_empty() {
        let more = if summary.size > summary.preview.len() { ", ..." } else { "" };
        out.push_str(&format!("Preview: [{}{}]\n", summary.preview.join(", "), more));
    }

    out
}

/// Format number with thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();

    for (count, c) in s.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result.chars().rev().collect()
}

/// Format bytes in human-readable form
fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
