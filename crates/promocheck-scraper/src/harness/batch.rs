use std::sync::Arc;

use promocheck_core::{ErrorInfo, ErrorKind, TestCase, TestOutcome};
use serde::Serialize;

use super::Harness;

/// Outcomes of one batch, in the order the cases were submitted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    outcomes: Vec<TestOutcome>,
}

impl BatchReport {
    #[must_use]
    pub fn outcomes(&self) -> &[TestOutcome] {
        &self.outcomes
    }

    /// Outcomes that reached extraction, mismatched counts included.
    pub fn succeeded(&self) -> impl Iterator<Item = &TestOutcome> {
        self.outcomes.iter().filter(|o| !o.is_failure())
    }

    pub fn failed(&self) -> impl Iterator<Item = &TestOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }

    /// Splits into `(succeeded, failed)`, each keeping submission order.
    #[must_use]
    pub fn partition(self) -> (Vec<TestOutcome>, Vec<TestOutcome>) {
        self.outcomes.into_iter().partition(|o| !o.is_failure())
    }
}

impl From<Vec<TestOutcome>> for BatchReport {
    fn from(outcomes: Vec<TestOutcome>) -> Self {
        Self { outcomes }
    }
}

impl Harness {
    /// Runs every case concurrently and waits for all of them.
    ///
    /// Each case runs on its own task with its own rendering session, so a
    /// failing or panicking case only affects its own outcome.
    /// Cases with invalid input are reported as failed outcomes.
    pub async fn run_batch(self: &Arc<Self>, cases: Vec<TestCase>) -> BatchReport {
        tracing::info!(cases = cases.len(), "batch started");

        let tasks: Vec<_> = cases
            .into_iter()
            .map(|case| {
                let harness = Arc::clone(self);
                let task_case = case.clone();
                let handle = tokio::spawn(async move {
                    match harness.run_test(&task_case).await {
                        Ok(outcome) => outcome,
                        Err(e) => {
                            tracing::warn!(url = %task_case.url, error = %e, "test case rejected");
                            TestOutcome::failed(&task_case, e.to_error_info())
                        }
                    }
                });
                (case, handle)
            })
            .collect();

        let mut outcomes = Vec::with_capacity(tasks.len());
        for (case, handle) in tasks {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(url = %case.url, error = %e, "test task aborted");
                    TestOutcome::failed(
                        &case,
                        ErrorInfo::new(ErrorKind::Internal, format!("test task aborted: {e}")),
                    )
                }
            };
            outcomes.push(outcome);
        }

        let report = BatchReport { outcomes };
        tracing::info!(
            succeeded = report.succeeded().count(),
            failed = report.failed().count(),
            "batch finished"
        );
        report
    }
}
