use crate::actions::action::Action;
use crate::actions::multisig_action::MultisigAction;
use crate::actions::timelock_action::{Mode, TimelockAction};
use crate::bindings::multisig::GnosisSafe;
use crate::errors::{GovernanceError, is_revert};
use crate::signer::SignerResolver;
use crate::timelock::client::DelayedExecutionClient;
use crate::types::transaction::Transaction;
use crate::utils::chain_reader::{ChainReader, has_code, view};
use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;
use eyre::Result;
use log::{debug, info};
use serde_json::Value;

/// Who actually calls the timelock for a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerContext {
    /// A plain account, signs the timelock call itself.
    Account(Address),
    /// A Safe registered with the timelock, `signer` is the co-signing owner.
    Multisig { wallet: Address, signer: Address },
}

impl CallerContext {
    /// Account that signs and broadcasts the final transaction.
    pub fn sender(&self) -> Address {
        match self {
            CallerContext::Account(account) => *account,
            CallerContext::Multisig { signer, .. } => *signer,
        }
    }
}

/// The transaction to hand to the submitter.
pub struct FinalTx {
    pub caller: CallerContext,
    pub transaction: Transaction,
    pub description: Value,
}

pub struct CallerAwareTxBuilder<'a> {
    chain: &'a dyn ChainReader,
    client: &'a DelayedExecutionClient<'a>,
    signers: &'a dyn SignerResolver,
}

impl<'a> CallerAwareTxBuilder<'a> {
    pub fn new(
        chain: &'a dyn ChainReader,
        client: &'a DelayedExecutionClient<'a>,
        signers: &'a dyn SignerResolver,
    ) -> Self {
        Self {
            chain,
            client,
            signers,
        }
    }

    /// Resolves the acting caller for `mode`. Never cached, the authorized
    /// set can change between calls.
    pub async fn resolve_caller(&self, mode: Mode, action_label: &str) -> Result<CallerContext> {
        let callers = self.client.callers(mode).await?;
        let Some(&caller) = callers.first() else {
            return Err(GovernanceError::NoCaller {
                timelock: self.client.timelock(),
                role: role_name(mode).to_string(),
            }
            .into());
        };

        if !has_code(self.chain, caller).await? {
            debug!("{} {} is a plain account", role_name(mode), caller);
            return Ok(CallerContext::Account(caller));
        }

        // A contract caller must behave like a Safe. A revert or an undecodable
        // answer rules it out, transport failures propagate unchanged.
        let calldata = Bytes::from(GnosisSafe::getOwnersCall::new(()).abi_encode());
        let owners = match self.chain.call(caller, calldata).await {
            Ok(result) => match GnosisSafe::getOwnersCall::abi_decode_returns(&result, true) {
                Ok(decoded) => decoded.owners,
                Err(e) => return Err(incompatible(caller, e.to_string())),
            },
            Err(e) if is_revert(&e) => return Err(incompatible(caller, e.to_string())),
            Err(e) => return Err(e),
        };

        // One pre-approved signature is all the wrapped call carries.
        let threshold = view(self.chain, caller, GnosisSafe::getThresholdCall::new(()))
            .await?
            .threshold;
        if threshold > U256::from(1) {
            return Err(GovernanceError::ThresholdTooHigh {
                multisig: caller,
                threshold: threshold.saturating_to::<u64>(),
            }
            .into());
        }

        let signer = self.signers.resolve_signer_for_action(action_label).await?;
        if !owners.contains(&signer) {
            return Err(GovernanceError::UnauthorizedSigner {
                signer,
                multisig: caller,
            }
            .into());
        }

        debug!("{} {} is a multisig, co-signed by {}", role_name(mode), caller, signer);
        Ok(CallerContext::Multisig {
            wallet: caller,
            signer,
        })
    }

    pub async fn build(&self, action: TimelockAction, action_label: &str) -> Result<FinalTx> {
        let caller = self.resolve_caller(action.mode(), action_label).await?;

        match caller {
            CallerContext::Account(account) => Ok(FinalTx {
                caller,
                transaction: Transaction::from_action(account, &action),
                description: action.describe(),
            }),
            CallerContext::Multisig { wallet, signer } => {
                let nonce = view(self.chain, wallet, GnosisSafe::nonceCall::new(()))
                    .await?
                    .nonce;
                let safe_hash = view(
                    self.chain,
                    wallet,
                    MultisigAction::transaction_hash_call(&action, nonce),
                )
                .await?
                ._0;
                info!("Safe {} transaction hash {} at nonce {}", wallet, safe_hash, nonce);

                let wrapped = MultisigAction::new(wallet, signer, Box::new(action), nonce, safe_hash);
                Ok(FinalTx {
                    caller,
                    transaction: Transaction::from_action(signer, &wrapped),
                    description: wrapped.describe(),
                })
            }
        }
    }
}

fn incompatible(caller: Address, reason: String) -> eyre::Report {
    GovernanceError::IncompatibleCaller { caller, reason }.into()
}

fn role_name(mode: Mode) -> &'static str {
    match mode {
        Mode::Propose => "proposer",
        Mode::Execute => "executor",
    }
}
