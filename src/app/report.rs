//! Terminal rendering for finished scans
//!
//! Findings go into a prettytable, the summary and status lines use colored
//! accents. Every function takes an explicit color flag instead of relying on
//! global terminal detection, which keeps output testable.

use crate::analysis::api::{Finding, Severity, Summary};
use crate::core::strings::{title_case, truncate_display};
use crate::scan::api::{Scan, ScanStatus};
use crate::source::api::{decide, extension, has_skipped_segment, EntryKind, FilterDecision};
use colored::Colorize;
use prettytable::{format, Cell, Row, Table};

const MODULE_WIDTH: usize = 24;
const NAME_WIDTH: usize = 40;
const LOCATION_WIDTH: usize = 44;

/// Render a scan record to stdout.
pub fn print_report(scan: &Scan, color: bool) {
    println!();
    println!("Scan {} for {}", scan.id, scan.target);
    println!("Branch: {}", scan.branch);
    println!("Status: {}", status_label(scan.status, color));
    if let Some(duration_ms) = scan.duration_ms {
        println!("Duration: {}", format_duration(duration_ms));
    }
    println!();

    match scan.status {
        ScanStatus::Completed => {
            let findings = scan.results.as_deref().unwrap_or(&[]);
            if findings.is_empty() {
                println!("No security issues were found.");
            } else {
                findings_table(findings, color).printstd();
            }
            if let Some(summary) = &scan.summary {
                print_summary(summary, color);
            }
        }
        ScanStatus::Failed => {
            let error = scan.error.as_deref().unwrap_or("unknown failure");
            println!("{} {}", heading("Error:", color), error);
        }
        ScanStatus::Pending | ScanStatus::InProgress => {
            println!("The scan has not finished yet.");
        }
    }
}

/// Render a scan record as pretty-printed JSON.
pub fn print_json(scan: &Scan) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(scan)?);
    Ok(())
}

/// Show how the traversal filter classifies each path.
///
/// Paths are treated as files; a trailing slash marks a directory, which is
/// how the descend decision becomes reachable from the command line.
pub fn print_filter_decisions(paths: &[String]) {
    for path in paths {
        let (trimmed, kind) = match path.strip_suffix('/') {
            Some(dir) => (dir, EntryKind::Dir),
            None => (path.as_str(), EntryKind::File),
        };
        let decision = decide(trimmed, kind);
        let label = match decision {
            FilterDecision::Analyze => "analyze",
            FilterDecision::Descend => "descend",
            FilterDecision::Skip => "skip",
        };
        println!("{:<8} {} ({})", label, path, filter_reason(trimmed, kind, decision));
    }
}

fn filter_reason(path: &str, kind: EntryKind, decision: FilterDecision) -> String {
    if has_skipped_segment(path) {
        return "inside an excluded directory".to_string();
    }
    match (kind, decision) {
        (EntryKind::Dir, _) => "directory".to_string(),
        (EntryKind::File, FilterDecision::Analyze) => match extension(path) {
            Some(ext) => format!("{} source", ext),
            None => "analyzable".to_string(),
        },
        (EntryKind::File, _) => match extension(path) {
            Some(ext) => format!("'{}' is not an analyzed extension", ext),
            None => "no file extension".to_string(),
        },
    }
}

fn status_label(status: ScanStatus, color: bool) -> String {
    let text = status.to_string().to_uppercase();
    if !color {
        return text;
    }
    match status {
        ScanStatus::Completed => text.green().bold().to_string(),
        ScanStatus::Failed => text.red().bold().to_string(),
        ScanStatus::InProgress => text.yellow().to_string(),
        ScanStatus::Pending => text,
    }
}

fn format_duration(duration_ms: i64) -> String {
    if duration_ms >= 1000 {
        format!("{:.1}s", duration_ms as f64 / 1000.0)
    } else {
        format!("{}ms", duration_ms)
    }
}

fn findings_table(findings: &[Finding], color: bool) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(Row::new(vec![
        Cell::new("#"),
        Cell::new("Severity"),
        Cell::new("Module"),
        Cell::new("Finding"),
        Cell::new("Location"),
        Cell::new("Line"),
    ]));

    for (index, finding) in findings.iter().enumerate() {
        let line = finding
            .line_number
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(Row::new(vec![
            Cell::new(&(index + 1).to_string()),
            severity_cell(finding.severity, color),
            Cell::new(&truncate_display(&finding.module, MODULE_WIDTH)),
            Cell::new(&truncate_display(&finding.name, NAME_WIDTH)),
            Cell::new(&truncate_display(&finding.location, LOCATION_WIDTH)),
            Cell::new(&line),
        ]));
    }
    table
}

fn severity_cell(severity: Severity, color: bool) -> Cell {
    let cell = Cell::new(&title_case(&severity.to_string()));
    if !color {
        return cell;
    }
    let spec = match severity {
        Severity::Critical => "bFr",
        Severity::High => "Fr",
        Severity::Medium => "Fy",
        Severity::Low => "Fb",
    };
    cell.style_spec(spec)
}

fn print_summary(summary: &Summary, color: bool) {
    println!();
    println!("{}", heading("Summary", color));
    println!(
        "{} issues: {} critical, {} high, {} medium, {} low",
        summary.total_issues,
        summary.critical_count,
        summary.high_count,
        summary.medium_count,
        summary.low_count
    );
    if !summary.top_modules.is_empty() {
        let ranked: Vec<String> = summary
            .top_modules
            .iter()
            .map(|module| format!("{} ({})", module.name, module.count))
            .collect();
        println!("Most affected: {}", ranked.join(", "));
    }
    if !summary.short_summary.is_empty() {
        println!();
        println!("{}", summary.short_summary);
    }
    if !summary.detailed_analysis.is_empty() {
        println!();
        println!("{}", summary.detailed_analysis);
    }
    if !summary.recommendations.is_empty() {
        println!();
        println!("{}", heading("Recommendations", color));
        for recommendation in &summary.recommendations {
            println!("  - {}", recommendation);
        }
    }
}

fn heading(text: &str, color: bool) -> String {
    if color {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}
