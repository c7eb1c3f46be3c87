use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;
use serde::Serialize;

use super::Discrepancy;

/// Verdict of one round-trip verification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationReport {
    /// Source file the pair was derived from
    pub subject: String,
    /// True when `issues` is empty
    pub passed: bool,
    /// Every discrepancy found, in check order
    pub issues: Vec<Discrepancy>,
    /// Curves present in the intermediate model
    pub curves_checked: usize,
    /// Event entries present in the intermediate model
    pub events_checked: usize,
}

impl VerificationReport {
    pub(crate) fn new(
        subject: impl Into<String>,
        issues: Vec<Discrepancy>,
        curves_checked: usize,
        events_checked: usize,
    ) -> Self {
        Self {
            subject: subject.into(),
            passed: issues.is_empty(),
            issues,
            curves_checked,
            events_checked,
        }
    }

    /// Issues rendered as text
    pub fn issue_messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    /// Format the report with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::Emoji;

            static OK: Emoji<'_, '_> = Emoji("✓", "[OK]");
            static FAIL: Emoji<'_, '_> = Emoji("✗", "[FAIL]");

            let mut output = String::new();
            output.push_str(&format!(
                "{}: {} ({} curves, {} events)\n",
                style("Round-trip").bold().cyan(),
                self.subject,
                self.curves_checked,
                self.events_checked
            ));

            if self.passed {
                output.push_str(&format!(
                    "[{}] {}\n",
                    OK,
                    style("Validation PASSED").green().bold()
                ));
            } else {
                for issue in &self.issues {
                    output.push_str(&format!("[{}] {}\n", FAIL, style(issue).red()));
                }
                output.push_str(&format!(
                    "{} ({} issues)\n",
                    style("Validation FAILED").red().bold(),
                    self.issues.len()
                ));
            }
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Round-trip: {} ({} curves, {} events)",
            self.subject, self.curves_checked, self.events_checked
        )?;

        if self.passed {
            return writeln!(f, "[✓] Validation PASSED");
        }

        for issue in &self.issues {
            writeln!(f, "[✗] {}", issue)?;
        }
        writeln!(f, "Validation FAILED ({} issues)", self.issues.len())
    }
}
