//! Table and summary rendering for the terminal

use codecsweep_config::MemoryUnit;
use codecsweep_types::{CompressionResult, Objective, SweepReport};
use console::style;
use std::path::Path;
use std::time::Duration;

const HEADERS: [&str; 6] = [
    "Optimized For",
    "Parameters",
    "Compression %",
    "Time (s)",
    "Peak Memory",
    "Ratio",
];

/// One table row: label, parameters and four metric cells
pub type Row = [String; 6];

fn memory_header(unit: MemoryUnit) -> &'static str {
    match unit {
        MemoryUnit::Mb => "Peak Memory (MB)",
        MemoryUnit::Bytes => "Peak Memory (bytes)",
    }
}

/// Peak memory in the configured unit
pub fn format_memory(result: &CompressionResult, unit: MemoryUnit) -> String {
    match unit {
        MemoryUnit::Mb => format!("{:.3}", result.peak_memory_mb()),
        MemoryUnit::Bytes => result.peak_memory_bytes.to_string(),
    }
}

/// Cells for one objective, or a placeholder row when nothing qualified
pub fn objective_row(
    objective: Objective,
    result: Option<&CompressionResult>,
    unit: MemoryUnit,
) -> Row {
    let label = objective.label().to_string();
    match result {
        Some(result) => [
            label,
            result.params.to_string(),
            format!("{:.2}", result.compression_percentage()),
            format!("{:.6}", result.time_secs()),
            format_memory(result, unit),
            format!("{:.3}", result.compression_ratio()),
        ],
        None => [
            label,
            "no eligible point".to_string(),
            "undefined".to_string(),
            "undefined".to_string(),
            "undefined".to_string(),
            "undefined".to_string(),
        ],
    }
}

/// Rows for every objective, in canonical order
pub fn objective_rows(report: &SweepReport, unit: MemoryUnit) -> Vec<Row> {
    Objective::ALL
        .into_iter()
        .map(|objective| objective_row(objective, report.optimal.get(objective), unit))
        .collect()
}

/// Lay out rows under a header with aligned columns
pub fn render_table(rows: &[Row], unit: MemoryUnit) -> String {
    let mut headers = HEADERS.map(str::to_string);
    headers[4] = memory_header(unit).to_string();

    let mut widths = headers.clone().map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render_line = |cells: &[String; 6]| {
        cells
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(column, (cell, width))| {
                // Text columns left, numbers right
                if column < 2 {
                    format!("{:<width$}", cell)
                } else {
                    format!("{:>width$}", cell)
                }
            })
            .collect::<Vec<_>>()
            .join(" | ")
    };

    let mut lines = vec![render_line(&headers)];
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    lines.extend(rows.iter().map(render_line));
    lines.join("\n")
}

/// Print the winners table and sweep summary
pub fn print_report(report: &SweepReport, input: &Path, unit: MemoryUnit, show_failures: bool) {
    println!();
    println!(
        "{} {}",
        style("◆").cyan().bold(),
        style(format!("Optimal {} parameters", report.family))
            .bold()
            .underlined()
    );
    println!("{}", render_table(&objective_rows(report, unit), unit));

    println!();
    println!("{}", style("Sweep Summary:").bold().underlined());
    println!(
        "  Input: {} ({})",
        style(input.display()).cyan(),
        style(format_bytes(report.input_size)).green()
    );
    println!("  Space: {}", style(&report.space).cyan());
    println!(
        "  Points evaluated: {}",
        style(report.points_evaluated).green()
    );
    println!(
        "  Failed: {}",
        if report.failures.is_empty() {
            style(report.failures.len()).green()
        } else {
            style(report.failures.len()).red()
        }
    );
    println!(
        "  Duration: {}",
        style(format_duration(report.elapsed)).blue()
    );

    if show_failures && !report.failures.is_empty() {
        println!();
        println!("{}", style("Failed Points:").bold().underlined());
        for failure in &report.failures {
            println!(
                "  #{} {}: {}",
                failure.index,
                style(&failure.params).yellow(),
                style(&failure.error).red()
            );
        }
    }
}

/// Print the full measurement of a single point
pub fn print_profile(result: &CompressionResult, input: &Path, unit: MemoryUnit) {
    println!();
    println!(
        "{} {}",
        style("◆").cyan().bold(),
        style(format!("Profile of {}", result.params))
            .bold()
            .underlined()
    );
    println!("  Input: {}", style(input.display()).cyan());
    println!(
        "  Original size: {}",
        style(format_bytes(result.original_size)).green()
    );
    println!(
        "  Compressed size: {}",
        style(format_bytes(result.compressed_size)).green()
    );
    println!(
        "  Compression %: {}",
        style(format!("{:.2}", result.compression_percentage())).green()
    );
    println!(
        "  Ratio: {}",
        style(format!("{:.3}", result.compression_ratio())).green()
    );
    println!(
        "  Time: {}",
        style(format!("{:.6}s", result.time_secs())).blue()
    );
    println!(
        "  {}: {}",
        memory_header(unit),
        style(format_memory(result, unit)).blue()
    );
}

/// Format bytes in human-readable format
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_index])
}

/// Format duration in human-readable format
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{:.2}s", duration.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

/// Display a warning message with proper formatting
pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠").yellow().bold(), style(message).yellow());
}

/// Display an error message with proper formatting
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), style(message).red());
}

#[cfg(test)]
mod tests {
    use super::*;
    use codecsweep_types::ParameterSet;
    use rstest::rstest;

    fn result(original_size: u64, compressed_size: u64) -> CompressionResult {
        CompressionResult {
            params: ParameterSet::Zstd { level: 3 },
            original_size,
            compressed_size,
            time_taken: Duration::from_millis(5),
            peak_memory_bytes: 2_500_000,
        }
    }

    #[rstest]
    #[case(0, "0.00 B")]
    #[case(1023, "1023.00 B")]
    #[case(1536, "1.50 KB")]
    #[case(5 * 1024 * 1024, "5.00 MB")]
    fn test_format_bytes(#[case] bytes: u64, #[case] expected: &str) {
        assert_eq!(format_bytes(bytes), expected);
    }

    #[rstest]
    #[case(Duration::from_millis(1500), "1.50s")]
    #[case(Duration::from_secs(125), "2m 5s")]
    #[case(Duration::from_secs(3725), "1h 2m 5s")]
    fn test_format_duration(#[case] duration: Duration, #[case] expected: &str) {
        assert_eq!(format_duration(duration), expected);
    }

    #[test]
    fn test_row_cells() {
        let row = objective_row(Objective::MinTime, Some(&result(1000, 250)), MemoryUnit::Mb);
        assert_eq!(row[0], "Time");
        assert_eq!(row[1], "zstd(level=3)");
        assert_eq!(row[2], "75.00");
        assert_eq!(row[3], "0.005000");
        assert_eq!(row[4], "2.500");
        assert_eq!(row[5], "4.000");

        let row = objective_row(Objective::MinTime, Some(&result(1000, 250)), MemoryUnit::Bytes);
        assert_eq!(row[4], "2500000");
    }

    #[test]
    fn test_zero_length_row_prints_undefined() {
        let row = objective_row(Objective::MinPeakMemory, Some(&result(0, 20)), MemoryUnit::Mb);
        assert_eq!(row[2], "undefined");
        assert_eq!(row[5], "undefined");

        let row = objective_row(Objective::MaxCompressionRatio, None, MemoryUnit::Mb);
        assert_eq!(row[1], "no eligible point");
        assert!(row[2..].iter().all(|cell| cell == "undefined"));
    }

    #[test]
    fn test_table_columns_align() {
        let rows = vec![
            objective_row(Objective::MinTime, Some(&result(1000, 250)), MemoryUnit::Mb),
            objective_row(Objective::MaxCompressionRatio, None, MemoryUnit::Mb),
        ];
        let table = render_table(&rows, MemoryUnit::Mb);
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Optimized For"));
        assert!(lines[0].contains("Peak Memory (MB)"));
        let width = lines[0].chars().count();
        assert!(lines.iter().all(|line| line.chars().count() == width));
    }
}
