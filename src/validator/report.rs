use std::fmt;

/// Outcome of one validation check
#[derive(Debug, Clone, PartialEq)]
pub enum CheckStatus {
    Ok,
    /// Advisory finding, e.g. non-finite samples
    Warning(String),
    /// Schema mismatch; reported, never fatal to the pipeline
    Failed(String),
}

impl CheckStatus {
    fn symbol(&self) -> &'static str {
        match self {
            CheckStatus::Ok => "✓",
            CheckStatus::Warning(_) => "⚠",
            CheckStatus::Failed(_) => "✗",
        }
    }

    fn message(&self) -> Option<&str> {
        match self {
            CheckStatus::Ok => None,
            CheckStatus::Warning(msg) | CheckStatus::Failed(msg) => Some(msg),
        }
    }
}

/// One named check and its outcome
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationCheck {
    pub name: String,
    pub status: CheckStatus,
}

impl ValidationCheck {
    pub(crate) fn ok(name: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Ok)
    }

    pub(crate) fn warning(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Warning(message.into()))
    }

    pub(crate) fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Failed(message.into()))
    }

    fn with_status(name: impl Into<String>, status: CheckStatus) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }
}

/// Schema validation report for one IDS document.
///
/// Failed checks are schema mismatches. They make [`ValidationReport::ok`]
/// false but callers treat them as advisory.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub checks: Vec<ValidationCheck>,
    /// Diagnostic notes, e.g. that schema validation was skipped
    pub notes: Vec<String>,
    /// File path or source file name of the document
    pub subject: String,
}

/// Highlight applied to a fragment of the rendered report
#[derive(Clone, Copy)]
enum Tone {
    Title,
    Good,
    Caution,
    Bad,
    Quiet,
}

impl ValidationReport {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            checks: Vec::new(),
            notes: Vec::new(),
            subject: subject.into(),
        }
    }

    pub fn add_check(&mut self, check: ValidationCheck) {
        self.checks.push(check);
    }

    pub fn add_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// True when no check failed. Warnings and notes do not count.
    pub fn ok(&self) -> bool {
        !self.has_failures()
    }

    /// `"<check>: <message>"` for every failed check, in check order
    pub fn errors(&self) -> Vec<String> {
        self.checks
            .iter()
            .filter_map(|c| match &c.status {
                CheckStatus::Failed(msg) => Some(format!("{}: {}", c.name, msg)),
                _ => None,
            })
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count() > 0
    }

    pub fn warning_count(&self) -> usize {
        self.count(|s| matches!(s, CheckStatus::Warning(_)))
    }

    pub fn failure_count(&self) -> usize {
        self.count(|s| matches!(s, CheckStatus::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&CheckStatus) -> bool) -> usize {
        self.checks.iter().filter(|c| pred(&c.status)).count()
    }

    /// Render with terminal colors when the `colorized_output` feature is on
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::style;
            self.render(|tone, text| match tone {
                Tone::Title => style(text).bold().cyan().to_string(),
                Tone::Good => style(text).green().to_string(),
                Tone::Caution => style(text).yellow().to_string(),
                Tone::Bad => style(text).red().bold().to_string(),
                Tone::Quiet => style(text).dim().to_string(),
            })
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            self.to_string()
        }
    }

    fn render(&self, paint: impl Fn(Tone, &str) -> String) -> String {
        let mut out = format!(
            "{} {}\n",
            paint(Tone::Title, "Schema validation:"),
            self.subject
        );

        for check in &self.checks {
            let tone = match check.status {
                CheckStatus::Ok => Tone::Good,
                CheckStatus::Warning(_) => Tone::Caution,
                CheckStatus::Failed(_) => Tone::Bad,
            };
            out.push_str(&format!("  {} {}", paint(tone, check.status.symbol()), check.name));
            if let Some(msg) = check.status.message() {
                out.push_str(&format!(": {msg}"));
            }
            out.push('\n');
        }

        for note in &self.notes {
            out.push_str(&format!("  {} {}\n", paint(Tone::Quiet, "note:"), note));
        }

        let passed = self.checks.len() - self.warning_count() - self.failure_count();
        out.push_str(&format!(
            "{} passed, {} warnings, {} failed\n",
            paint(Tone::Good, &passed.to_string()),
            paint(Tone::Caution, &self.warning_count().to_string()),
            paint(Tone::Bad, &self.failure_count().to_string()),
        ));
        out
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(|_, text| text.to_string()))
    }
}
