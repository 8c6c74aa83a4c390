use super::implementation::{ImplementationPlan, ImplementationSource, resolve_implementation};
use super::outcome::{BatchSummary, OutcomeStatus, SkipReason, TargetOutcome};
use super::selection::{TargetRequest, UpgradeRequest};
use crate::actions::action::Action;
use crate::actions::timelock_action::Mode;
use crate::codec::operation::Operation;
use crate::errors::{GovernanceError, is_fatal};
use crate::signer::SignerResolver;
use crate::submitter::{TxMetadata, TxSubmitter};
use crate::timelock::client::{DelayedExecutionClient, PopulateState};
use crate::tx_builder::CallerAwareTxBuilder;
use crate::types::address_book::AddressBook;
use crate::types::admin_target::{AdminTarget, TargetKind};
use crate::utils::chain_reader::ChainReader;
use crate::validators::{
    ownership_validator::OwnershipTransferValidator,
    upgrade_validator::UpgradeValidator,
    validator::{Comments, ProposalValidator, Validation},
};
use alloy::primitives::{Address, B256};
use eyre::{Result, WrapErr, eyre};
use log::{error, info, warn};

/// Result of the read-only planning pass for one target.
enum PlanStep {
    Skip,
    Ready {
        target: AdminTarget,
        action: Box<dyn Action>,
        comments: Comments,
    },
    /// Propose run, implementation still has to be deployed.
    Deploy(UpgradeRequest),
}

/// Drives a batch of governed changes through the timelock, one target at a time.
pub struct BatchOrchestrator<'a> {
    chain: &'a dyn ChainReader,
    book: &'a AddressBook,
    implementations: &'a dyn ImplementationSource,
    signers: &'a dyn SignerResolver,
    submitter: &'a dyn TxSubmitter,
}

impl<'a> BatchOrchestrator<'a> {
    pub fn new(
        chain: &'a dyn ChainReader,
        book: &'a AddressBook,
        implementations: &'a dyn ImplementationSource,
        signers: &'a dyn SignerResolver,
        submitter: &'a dyn TxSubmitter,
    ) -> Self {
        Self {
            chain,
            book,
            implementations,
            signers,
            submitter,
        }
    }

    /// Runs `requests` in `mode`. Skips and per-target failures are recorded in
    /// the summary, a `GovernanceError` aborts the whole run.
    ///
    /// Every target is validated before any transaction is built, so a broken
    /// governance premise on any target stops the run before anything is sent.
    pub async fn run(
        &self,
        action: &str,
        mode: Mode,
        requests: Vec<TargetRequest>,
    ) -> Result<BatchSummary> {
        info!("Starting {} batch ({}) over {} target(s)", action, mode.as_str(), requests.len());
        let mut summary = BatchSummary::new(action, mode);

        let mut planned = Vec::new();
        for request in requests {
            let label = request.label();
            match self.plan(request, mode).await {
                Ok(PlanStep::Skip) => {
                    summary.record(skipped(&label, None, SkipReason::AlreadyApplied));
                }
                Ok(step) => planned.push((label, step)),
                Err(e) if is_fatal(&e) => {
                    error!("{}: {:#}", label, e);
                    return Err(e.wrap_err(format!("Aborting {action} batch at {label}")));
                }
                Err(e) => {
                    warn!("{}: planning failed: {:#}", label, e);
                    summary.record(failed(&label, None, &e));
                }
            }
        }

        let client = DelayedExecutionClient::new(self.chain, self.book.timelock, self.book.delay);
        let builder = CallerAwareTxBuilder::new(self.chain, &client, self.signers);

        for (label, step) in planned {
            match self.apply(&client, &builder, action, mode, &label, step).await {
                Ok(outcome) => summary.record(outcome),
                Err(e) if is_fatal(&e) => {
                    error!("{}: {:#}", label, e);
                    return Err(e.wrap_err(format!("Aborting {action} batch at {label}")));
                }
                Err(e) => {
                    warn!("{}: {:#}", label, e);
                    summary.record(failed(&label, None, &e));
                }
            }
        }

        info!(
            "Finished {} batch: {} submitted, {} skipped, {} failed",
            action,
            summary.submitted(),
            summary.skipped(),
            summary.failed()
        );
        Ok(summary)
    }

    /// Fails unless `wallet` is the account every transaction of this run is
    /// sent from: the role holder itself, or the co-signing multisig owner.
    pub async fn check_sender(&self, action: &str, mode: Mode, wallet: Address) -> Result<()> {
        let client = DelayedExecutionClient::new(self.chain, self.book.timelock, self.book.delay);
        let builder = CallerAwareTxBuilder::new(self.chain, &client, self.signers);
        let expected = builder.resolve_caller(mode, action).await?.sender();
        if expected != wallet {
            return Err(GovernanceError::SenderMismatch { expected, wallet }.into());
        }
        Ok(())
    }

    async fn plan(&self, request: TargetRequest, mode: Mode) -> Result<PlanStep> {
        let target = match request {
            TargetRequest::TransferOwnership {
                proxy_admin,
                new_owner,
            } => AdminTarget::transfer_ownership(proxy_admin, new_owner),
            TargetRequest::Upgrade(request) => {
                let recorded = self.implementations.recorded(&request).await?;
                match resolve_implementation(request.implementation_override, recorded, mode) {
                    ImplementationPlan::Use { address, origin } => {
                        info!("{}: using {:?} implementation {}", request.label(), origin, address);
                        self.upgrade_target(&request, address)
                    }
                    ImplementationPlan::Deploy => return Ok(PlanStep::Deploy(request)),
                    ImplementationPlan::Unavailable => {
                        return Err(eyre!(
                            "No implementation known for {}, nothing can have been proposed",
                            request.label()
                        ));
                    }
                }
            }
        };
        self.validate(target).await
    }

    fn upgrade_target(&self, request: &UpgradeRequest, implementation: Address) -> AdminTarget {
        AdminTarget::upgrade(
            &request.label(),
            self.book.proxy_admin,
            request.proxy,
            implementation,
            request.initializer.clone(),
        )
    }

    async fn validate(&self, target: AdminTarget) -> Result<PlanStep> {
        let validator: Box<dyn ProposalValidator + '_> = match target.kind {
            TargetKind::Upgrade { .. } => Box::new(UpgradeValidator::new(self.chain)),
            TargetKind::TransferOwnership { .. } => {
                Box::new(OwnershipTransferValidator::new(self.chain, self.book.timelock))
            }
        };
        match validator.validate(&target).await? {
            Validation::AlreadySatisfied { .. } => Ok(PlanStep::Skip),
            Validation::Proposal { action, comments } => Ok(PlanStep::Ready {
                target,
                action,
                comments,
            }),
        }
    }

    async fn apply(
        &self,
        client: &DelayedExecutionClient<'_>,
        builder: &CallerAwareTxBuilder<'_>,
        action_name: &str,
        mode: Mode,
        label: &str,
        step: PlanStep,
    ) -> Result<TargetOutcome> {
        let step = match step {
            PlanStep::Deploy(request) => {
                let implementation = self
                    .implementations
                    .deploy(&request)
                    .await
                    .wrap_err_with(|| format!("Deploying implementation for {}", request.label()))?;
                info!("{}: deployed implementation {}", label, implementation);
                self.implementations
                    .record(&request, implementation)
                    .await
                    .wrap_err_with(|| format!("Recording implementation for {}", request.label()))?;
                self.validate(self.upgrade_target(&request, implementation)).await?
            }
            step => step,
        };
        let (target, action, comments) = match step {
            PlanStep::Ready {
                target,
                action,
                comments,
            } => (target, action, comments),
            _ => return Ok(skipped(label, None, SkipReason::AlreadyApplied)),
        };

        let operation = Operation::new(action.target(), action.data(), &target.operation_label())?;
        let populated = client.populate(mode, operation).await?;
        let operation_id = populated.operation_id;

        let timelock_action = match populated.state {
            PopulateState::Ready(timelock_action) => timelock_action,
            PopulateState::AlreadyScheduled => {
                return Ok(skipped(label, Some(operation_id), SkipReason::AlreadyScheduled));
            }
            PopulateState::NotReady { done: true } => {
                return Ok(skipped(label, Some(operation_id), SkipReason::AlreadyExecuted));
            }
            PopulateState::NotReady { done: false } => {
                return Ok(skipped(label, Some(operation_id), SkipReason::NotReady));
            }
        };

        let final_tx = match builder.build(timelock_action, action_name).await {
            Ok(final_tx) => final_tx,
            Err(e) if is_fatal(&e) => return Err(e),
            Err(e) => {
                warn!("{}: building transaction failed: {:#} (operation {})", label, e, operation_id);
                return Ok(failed(label, Some(operation_id), &e));
            }
        };
        let comment = match mode {
            Mode::Propose => comments.propose,
            Mode::Execute => comments.execute,
        };
        let metadata = TxMetadata {
            action: action_name.to_string(),
            sub_action: mode.as_str().to_string(),
            comment,
        };

        let submission = match self.submitter.submit(&final_tx.transaction, &metadata).await {
            Ok(submission) => submission,
            Err(e) => {
                warn!("{}: submission failed: {:#}", label, e);
                return Ok(failed(label, Some(operation_id), &e));
            }
        };

        let status = match mode {
            Mode::Propose => OutcomeStatus::Proposed(submission),
            Mode::Execute => OutcomeStatus::Executed(submission),
        };
        info!("{}: {:?} (operation {})", label, status, operation_id);
        Ok(TargetOutcome {
            label: label.to_string(),
            operation_id: Some(operation_id),
            status,
        })
    }
}

fn skipped(label: &str, operation_id: Option<B256>, reason: SkipReason) -> TargetOutcome {
    match operation_id {
        Some(id) => info!("{}: skipped, {:?} (operation {})", label, reason, id),
        None => info!("{}: skipped, {:?}", label, reason),
    }
    TargetOutcome {
        label: label.to_string(),
        operation_id,
        status: OutcomeStatus::Skipped(reason),
    }
}

fn failed(label: &str, operation_id: Option<B256>, error: &eyre::Report) -> TargetOutcome {
    TargetOutcome {
        label: label.to_string(),
        operation_id,
        status: OutcomeStatus::Failed(format!("{error:#}")),
    }
}
