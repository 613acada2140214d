/*!
 * Reporting functionality for fconcat
 *
 * Provides functionality for generating formatted reports of run results
 * using the tabled library for clean, consistent table rendering.
 */

use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::types::WalkStats;
use crate::utils::format_size;

/// Statistics for a completed run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Output file path
    pub output_file: String,
    /// Time taken for both passes
    pub duration: Duration,
    /// Walk counters
    pub stats: WalkStats,
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
    // Other formats could be added in the future
}

/// Report generator for run results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string based on run statistics
    pub fn generate_report(&self, report: &RunReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &RunReport) {
        println!("\n{}", self.generate_report(report));
    }

    // Generate a console table report
    fn generate_console_report(&self, report: &RunReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let stats = &report.stats;
        let mut rows = Vec::new();

        rows.push(SummaryRow {
            key: "📂 Output File".to_string(),
            value: report.output_file.clone(),
        });

        rows.push(SummaryRow {
            key: "⏱️ Process Time".to_string(),
            value: format!("{:.4?}", report.duration),
        });

        rows.push(SummaryRow {
            key: "📄 Files Concatenated".to_string(),
            value: self.format_number(stats.files_processed),
        });

        rows.push(SummaryRow {
            key: "⏭️ Files Skipped".to_string(),
            value: self.format_number(stats.files_skipped),
        });

        rows.push(SummaryRow {
            key: "📁 Directories".to_string(),
            value: self.format_number(stats.directories_processed),
        });

        if stats.symlinks_processed > 0 {
            rows.push(SummaryRow {
                key: "🔗 Symlinks".to_string(),
                value: format!(
                    "{} processed, {} skipped",
                    self.format_number(stats.symlinks_processed),
                    self.format_number(stats.symlinks_skipped)
                ),
            });
        }

        rows.push(SummaryRow {
            key: "📦 Data Written".to_string(),
            value: format_size(stats.bytes_processed),
        });

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        format!("✅  CONCATENATION COMPLETE\n{}", table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_contains_counters() {
        let report = RunReport {
            output_file: "out.txt".to_string(),
            duration: Duration::from_millis(42),
            stats: WalkStats {
                files_processed: 3,
                files_skipped: 1,
                directories_processed: 2,
                symlinks_processed: 1,
                symlinks_skipped: 1,
                bytes_processed: 2048,
                total_size: 2048,
            },
        };
        let rendered = Reporter::new(ReportFormat::ConsoleTable).generate_report(&report);
        assert!(rendered.contains("out.txt"));
        assert!(rendered.contains("Files Concatenated"));
        assert!(rendered.contains("2.00 KB"));
        assert!(rendered.contains("1 processed, 1 skipped"));
    }

    #[test]
    fn test_format_number_units() {
        let reporter = Reporter::new(ReportFormat::ConsoleTable);
        assert_eq!(reporter.format_number(5), "5");
        assert_eq!(reporter.format_number(1_500), "1.5K");
        assert_eq!(reporter.format_number(2_000_000), "2.0M");
    }
}
