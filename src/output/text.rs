//! Plain-text output for terminals and pipes.
//!
//! Each group is printed as one path per line, groups separated by a blank
//! line. A one-line summary follows unless disabled.
//!
//! ```text
//! /data/a.txt
//! /data/b.txt
//!
//! /data/x.bin
//! /data/sub/y.bin
//!
//! 2 duplicate groups, 2 redundant files, 1.2 KiB reclaimable
//! ```

use std::io::{self, Write};

use yansi::Paint;

use crate::duplicates::{EquivalenceGroup, ScanSummary};

/// Text renderer for scan results.
#[derive(Debug, Clone, Copy)]
pub struct TextOutput<'a> {
    groups: &'a [EquivalenceGroup],
    summary: &'a ScanSummary,
    color: bool,
    show_summary: bool,
}

impl<'a> TextOutput<'a> {
    /// Create a renderer; color and summary are on by default.
    #[must_use]
    pub fn new(groups: &'a [EquivalenceGroup], summary: &'a ScanSummary) -> Self {
        Self {
            groups,
            summary,
            color: true,
            show_summary: true,
        }
    }

    /// Enable or disable ANSI colors.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Enable or disable the trailing summary line.
    #[must_use]
    pub fn with_summary(mut self, show_summary: bool) -> Self {
        self.show_summary = show_summary;
        self
    }

    /// Write the report.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for group in self.groups {
            for path in &group.paths {
                writeln!(writer, "{}", path.display())?;
            }
            writeln!(writer)?;
        }

        if self.show_summary {
            let line = self.summary_line();
            if self.color {
                writeln!(writer, "{}", line.bold())?;
            } else {
                writeln!(writer, "{line}")?;
            }
            if self.summary.comparison_errors > 0 {
                let warning = format!(
                    "{} comparison(s) skipped due to read errors",
                    self.summary.comparison_errors
                );
                if self.color {
                    writeln!(writer, "{}", warning.yellow())?;
                } else {
                    writeln!(writer, "{warning}")?;
                }
            }
        }

        Ok(())
    }

    fn summary_line(&self) -> String {
        if self.groups.is_empty() {
            return format!("No duplicates among {} candidate files", self.summary.candidates);
        }
        format!(
            "{} duplicate group{}, {} redundant file{}, {} reclaimable",
            self.summary.duplicate_groups,
            plural(self.summary.duplicate_groups),
            self.summary.duplicate_files,
            plural(self.summary.duplicate_files),
            self.summary.reclaimable_display()
        )
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
