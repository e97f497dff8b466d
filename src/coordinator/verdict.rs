//! Batch verdict reduction.
//!
//! Pure functions only: the verdict is a commutative reduction over the
//! reports of a batch, so arrival order never changes it.

use crate::checks::{CheckOutcome, CheckReport};

/// Aggregate decision for one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchVerdict {
    /// Every check passed (or no check was configured).
    Success,
    /// At least one check failed or errored. Carries those reports, ordered
    /// by subject then kind.
    Failure(Vec<CheckReport>),
}

impl BatchVerdict {
    pub fn is_success(&self) -> bool {
        matches!(self, BatchVerdict::Success)
    }

    /// Reports that caused a failure (empty on success).
    pub fn failures(&self) -> &[CheckReport] {
        match self {
            BatchVerdict::Success => &[],
            BatchVerdict::Failure(failures) => failures,
        }
    }
}

/// Reduce a set of reports to a verdict.
pub fn reduce(reports: &[CheckReport]) -> BatchVerdict {
    let mut failures: Vec<CheckReport> = reports
        .iter()
        .filter(|r| !r.outcome.is_passed())
        .cloned()
        .collect();

    if failures.is_empty() {
        return BatchVerdict::Success;
    }

    failures.sort_by(|a, b| (&a.subject, a.kind).cmp(&(&b.subject, b.kind)));
    BatchVerdict::Failure(failures)
}

/// Everything the coordinator learned about a batch.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub verdict: BatchVerdict,
    /// All reports, ordered by subject then kind.
    pub reports: Vec<CheckReport>,
}

impl BatchReport {
    pub fn from_reports(mut reports: Vec<CheckReport>) -> Self {
        let verdict = reduce(&reports);
        reports.sort_by(|a, b| (&a.subject, a.kind).cmp(&(&b.subject, b.kind)));
        Self { verdict, reports }
    }

    /// One SUCCESS/FAILURE line per subject and check.
    pub fn summary_lines(&self) -> Vec<String> {
        self.reports.iter().map(CheckReport::summary_line).collect()
    }

    /// Counts of (passed, failed, errored).
    pub fn tally(&self) -> (usize, usize, usize) {
        self.reports.iter().fold((0, 0, 0), |(p, f, e), r| match r.outcome {
            CheckOutcome::Passed => (p + 1, f, e),
            CheckOutcome::Failed(_) => (p, f + 1, e),
            CheckOutcome::Errored(_) => (p, f, e + 1),
        })
    }
}
