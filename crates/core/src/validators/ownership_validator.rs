use super::validator::{Comments, ProposalValidator, Validation};
use crate::actions::transfer_ownership_action::TransferOwnership;
use crate::bindings::proxy_admin::ProxyAdmin;
use crate::errors::GovernanceError;
use crate::types::admin_target::{AdminTarget, TargetKind};
use crate::utils::chain_reader::{ChainReader, view};
use alloy::primitives::Address;
use async_trait::async_trait;
use alloy::sol_types::SolCall;
use eyre::{Result, eyre};
use log::info;

pub struct OwnershipTransferValidator<'a> {
    chain: &'a dyn ChainReader,
    timelock: Address,
}

impl<'a> OwnershipTransferValidator<'a> {
    pub fn new(chain: &'a dyn ChainReader, timelock: Address) -> Self {
        Self { chain, timelock }
    }
}

#[async_trait]
impl ProposalValidator for OwnershipTransferValidator<'_> {
    async fn validate(&self, target: &AdminTarget) -> Result<Validation> {
        let TargetKind::TransferOwnership { new_owner } = &target.kind else {
            return Err(eyre!(
                "OwnershipTransferValidator: {} is not an ownership transfer",
                target.label
            ));
        };

        let current = view(self.chain, target.proxy_admin, ProxyAdmin::ownerCall::new(()))
            .await?
            .owner;

        if current == *new_owner {
            info!(
                "{}: proxy admin {} already owned by {}, skipping",
                target.label, target.proxy_admin, new_owner
            );
            return Ok(Validation::AlreadySatisfied { current });
        }

        // Only the timelock can move ownership through this pipeline.
        if current != self.timelock {
            return Err(GovernanceError::OwnerMismatch {
                proxy_admin: target.proxy_admin,
                owner: current,
                timelock: self.timelock,
            }
            .into());
        }

        let comments = Comments {
            propose: format!(
                "Propose transfer of proxy admin {} ownership from {} to {}",
                target.proxy_admin, current, new_owner
            ),
            execute: format!(
                "Execute transfer of proxy admin {} ownership to {}",
                target.proxy_admin, new_owner
            ),
        };
        let action = TransferOwnership::new(target.proxy_admin, *new_owner);

        Ok(Validation::Proposal {
            action: Box::new(action),
            comments,
        })
    }
}
