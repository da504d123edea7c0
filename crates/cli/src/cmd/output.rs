//! Report formatting for the export command.

use mdexport_core::ExportReport;
use tabled::{Table, Tabled, settings::Style};

#[derive(Debug, Tabled)]
pub struct ReportRow {
    #[tabled(rename = "Path")]
    pub path: String,
    #[tabled(rename = "Status")]
    pub status: &'static str,
    #[tabled(rename = "Detail")]
    pub detail: String,
}

/// One row per document the traversal touched, included first.
pub fn report_rows(report: &ExportReport) -> Vec<ReportRow> {
    let included = report.included.iter().map(|path| ReportRow {
        path: path.clone(),
        status: if report.skipped.contains(path) { "skipped" } else { "included" },
        detail: if report.skipped.contains(path) {
            "unreadable".to_string()
        } else {
            String::new()
        },
    });

    let excluded = report.excluded.iter().map(|entry| ReportRow {
        path: entry.path.clone(),
        status: "excluded",
        detail: entry.reason.to_string(),
    });

    let skipped = report
        .skipped
        .iter()
        .filter(|path| !report.included.contains(path))
        .map(|path| ReportRow {
            path: path.clone(),
            status: "skipped",
            detail: "unreadable".to_string(),
        });

    included.chain(excluded).chain(skipped).collect()
}

pub fn print_report_table(report: &ExportReport) {
    let rows = report_rows(report);
    if rows.is_empty() {
        println!("(nothing to export)");
        return;
    }

    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");
    println!();
    print_summary(report);
}

pub fn print_summary(report: &ExportReport) {
    let archived = report.included.iter().filter(|p| !report.skipped.contains(p)).count();
    println!(
        "-- {} archived, {} excluded, {} skipped --",
        archived,
        report.excluded.len(),
        report.skipped.len()
    );
    if let Some(dest) = &report.destination {
        println!("Wrote {} ({} bytes)", dest.display(), report.bytes);
    }
}

pub fn print_report_json(report: &ExportReport) {
    println!("{}", serde_json::to_string_pretty(report).unwrap_or_default());
}
