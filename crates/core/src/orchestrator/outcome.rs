use crate::actions::timelock_action::Mode;
use crate::submitter::Submission;
use alloy::primitives::B256;
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Chain state already matches the desired state.
    AlreadyApplied,
    /// Propose: the timelock already knows the operation.
    AlreadyScheduled,
    /// Execute: not scheduled yet or delay not elapsed.
    NotReady,
    /// Execute: the operation already ran.
    AlreadyExecuted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    Skipped(SkipReason),
    Proposed(Submission),
    Executed(Submission),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOutcome {
    pub label: String,
    pub operation_id: Option<B256>,
    pub status: OutcomeStatus,
}

impl TargetOutcome {
    pub fn describe(&self) -> Value {
        let (status, detail) = match &self.status {
            OutcomeStatus::Skipped(reason) => ("skipped", format!("{reason:?}")),
            OutcomeStatus::Proposed(submission) => ("proposed", describe_submission(submission)),
            OutcomeStatus::Executed(submission) => ("executed", describe_submission(submission)),
            OutcomeStatus::Failed(error) => ("failed", error.clone()),
        };
        json!({
            "label": self.label,
            "operation_id": self.operation_id.map(|id| id.to_string()),
            "status": status,
            "detail": detail,
        })
    }
}

fn describe_submission(submission: &Submission) -> String {
    match submission {
        Submission::Sent { hash } => format!("sent {hash}"),
        Submission::Delegated { location } => format!("delegated to {location}"),
    }
}

/// Per-target outcomes of one batch run, in processing order.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub action: String,
    pub mode: Mode,
    pub outcomes: Vec<TargetOutcome>,
}

impl BatchSummary {
    pub fn new(action: &str, mode: Mode) -> Self {
        Self {
            action: action.to_string(),
            mode,
            outcomes: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: TargetOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcome(&self, label: &str) -> Option<&TargetOutcome> {
        self.outcomes.iter().find(|outcome| outcome.label == label)
    }

    pub fn submitted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, OutcomeStatus::Proposed(_) | OutcomeStatus::Executed(_)))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, OutcomeStatus::Skipped(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, OutcomeStatus::Failed(_)))
            .count()
    }

    pub fn describe(&self) -> Value {
        json!({
            "action": self.action,
            "mode": self.mode.as_str(),
            "submitted": self.submitted(),
            "skipped": self.skipped(),
            "failed": self.failed(),
            "targets": self.outcomes.iter().map(|o| o.describe()).collect::<Vec<_>>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_and_json() {
        let mut summary = BatchSummary::new("upgrade_vaults", Mode::Propose);
        summary.record(TargetOutcome {
            label: "usdc/lending".to_string(),
            operation_id: Some(B256::repeat_byte(0x01)),
            status: OutcomeStatus::Proposed(Submission::Delegated {
                location: "output/tx_0.json".to_string(),
            }),
        });
        summary.record(TargetOutcome {
            label: "usdc/staking".to_string(),
            operation_id: None,
            status: OutcomeStatus::Skipped(SkipReason::AlreadyApplied),
        });
        summary.record(TargetOutcome {
            label: "weth/lending".to_string(),
            operation_id: None,
            status: OutcomeStatus::Failed("rpc timeout".to_string()),
        });

        assert_eq!((summary.submitted(), summary.skipped(), summary.failed()), (1, 1, 1));
        let json = summary.describe();
        assert_eq!(json["mode"], "propose");
        assert_eq!(json["targets"][1]["detail"], "AlreadyApplied");
        assert_eq!(json["targets"][2]["operation_id"], Value::Null);
    }
}
