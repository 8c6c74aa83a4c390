use crate::actions::timelock_action::{Mode, TimelockAction};
use crate::bindings::timelock::Timelock;
use crate::codec::operation::Operation;
use crate::errors::GovernanceError;
use crate::utils::chain_reader::{ChainReader, view};
use alloy::primitives::{Address, B256, U256};
use alloy::sol_types::SolCall;
use eyre::Result;
use log::{debug, info};

/// Result of asking the timelock whether a propose or execute call is due.
pub enum PopulateState {
    /// The call to send.
    Ready(TimelockAction),
    /// Propose: the timelock already knows the operation.
    AlreadyScheduled,
    /// Execute: not scheduled, still inside its delay, or already executed.
    NotReady { done: bool },
}

pub struct PopulatedTx {
    pub operation: Operation,
    pub operation_id: B256,
    pub mode: Mode,
    pub state: PopulateState,
}

/// Adapter over the timelock's query surface plus the two driving calls.
pub struct DelayedExecutionClient<'a> {
    chain: &'a dyn ChainReader,
    timelock: Address,
    delay: Option<u64>,
}

impl<'a> DelayedExecutionClient<'a> {
    pub fn new(chain: &'a dyn ChainReader, timelock: Address, delay: Option<u64>) -> Self {
        Self {
            chain,
            timelock,
            delay,
        }
    }

    pub fn timelock(&self) -> Address {
        self.timelock
    }

    /// Local id, confirmed against the timelock's own `hashOperation`.
    pub async fn compute_id(&self, operation: &Operation) -> Result<B256> {
        let local = operation.id();
        let remote = view(
            self.chain,
            self.timelock,
            Timelock::hashOperationCall::new((
                operation.target,
                operation.value,
                operation.data.clone(),
                operation.predecessor,
                operation.salt,
            )),
        )
        .await?
        .id;
        if local != remote {
            return Err(GovernanceError::OperationIdMismatch { local, remote }.into());
        }
        Ok(local)
    }

    pub async fn is_known(&self, id: B256) -> Result<bool> {
        Ok(view(self.chain, self.timelock, Timelock::isOperationCall::new((id,)))
            .await?
            .registered)
    }

    pub async fn is_ready(&self, id: B256) -> Result<bool> {
        Ok(view(self.chain, self.timelock, Timelock::isOperationReadyCall::new((id,)))
            .await?
            .ready)
    }

    pub async fn is_done(&self, id: B256) -> Result<bool> {
        Ok(view(self.chain, self.timelock, Timelock::isOperationDoneCall::new((id,)))
            .await?
            .done)
    }

    pub async fn min_delay(&self) -> Result<U256> {
        Ok(view(self.chain, self.timelock, Timelock::getMinDelayCall::new(()))
            .await?
            .delay)
    }

    pub async fn proposers(&self) -> Result<Vec<Address>> {
        Ok(view(self.chain, self.timelock, Timelock::getProposersCall::new(()))
            .await?
            .proposers)
    }

    pub async fn executors(&self) -> Result<Vec<Address>> {
        Ok(view(self.chain, self.timelock, Timelock::getExecutorsCall::new(()))
            .await?
            .executors)
    }

    /// Callers allowed to drive `mode`.
    pub async fn callers(&self, mode: Mode) -> Result<Vec<Address>> {
        match mode {
            Mode::Propose => self.proposers().await,
            Mode::Execute => self.executors().await,
        }
    }

    /// Configured delay if set, else the timelock minimum. A configured delay
    /// shorter than the minimum is a configuration error.
    async fn schedule_delay(&self) -> Result<U256> {
        let minimum = self.min_delay().await?;
        match self.delay {
            Some(configured) if U256::from(configured) < minimum => Err(GovernanceError::DelayTooShort {
                configured,
                minimum: minimum.saturating_to::<u64>(),
            }
            .into()),
            Some(configured) => Ok(U256::from(configured)),
            None => Ok(minimum),
        }
    }

    pub async fn propose(&self, operation: Operation) -> Result<PopulatedTx> {
        let operation_id = self.compute_id(&operation).await?;
        let state = if self.is_known(operation_id).await? {
            info!("Operation {} already scheduled, skipping", operation_id);
            PopulateState::AlreadyScheduled
        } else {
            let delay = self.schedule_delay().await?;
            debug!("Scheduling {} with delay {}", operation_id, delay);
            PopulateState::Ready(TimelockAction::schedule(self.timelock, operation.clone(), delay))
        };
        Ok(PopulatedTx {
            operation,
            operation_id,
            mode: Mode::Propose,
            state,
        })
    }

    pub async fn execute_now(&self, operation: Operation) -> Result<PopulatedTx> {
        let operation_id = self.compute_id(&operation).await?;
        let state = if self.is_ready(operation_id).await? {
            PopulateState::Ready(TimelockAction::execute(self.timelock, operation.clone()))
        } else {
            let done = self.is_done(operation_id).await?;
            if done {
                info!("Operation {} already executed", operation_id);
            } else {
                info!("Operation {} not ready for execution", operation_id);
            }
            PopulateState::NotReady { done }
        };
        Ok(PopulatedTx {
            operation,
            operation_id,
            mode: Mode::Execute,
            state,
        })
    }

    /// Single dispatch point for the propose/execute strategies.
    pub async fn populate(&self, mode: Mode, operation: Operation) -> Result<PopulatedTx> {
        match mode {
            Mode::Propose => self.propose(operation).await,
            Mode::Execute => self.execute_now(operation).await,
        }
    }
}
