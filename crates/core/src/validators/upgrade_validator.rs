use super::validator::{Comments, ProposalValidator, Validation};
use crate::actions::upgrade_proxy_action::UpgradeProxy;
use crate::bindings::proxy_admin::ProxyAdmin;
use crate::types::admin_target::{AdminTarget, TargetKind};
use crate::utils::chain_reader::{ChainReader, view};
use async_trait::async_trait;
use alloy::sol_types::SolCall;
use eyre::{Result, eyre};
use log::info;

pub struct UpgradeValidator<'a> {
    chain: &'a dyn ChainReader,
}

impl<'a> UpgradeValidator<'a> {
    pub fn new(chain: &'a dyn ChainReader) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl ProposalValidator for UpgradeValidator<'_> {
    async fn validate(&self, target: &AdminTarget) -> Result<Validation> {
        let TargetKind::Upgrade {
            proxy,
            implementation,
            initializer,
        } = &target.kind
        else {
            return Err(eyre!("UpgradeValidator: {} is not an upgrade", target.label));
        };

        let current = view(
            self.chain,
            target.proxy_admin,
            ProxyAdmin::getProxyImplementationCall::new((*proxy,)),
        )
        .await?
        .implementation;

        if current == *implementation {
            info!(
                "{}: proxy {} already points at {}, skipping",
                target.label, proxy, implementation
            );
            return Ok(Validation::AlreadySatisfied { current });
        }

        let call = match initializer {
            Some(_) => "upgradeAndCall",
            None => "upgrade",
        };
        let comments = Comments {
            propose: format!(
                "Propose {} of {} proxy {} from {} to implementation {}",
                call, target.label, proxy, current, implementation
            ),
            execute: format!(
                "Execute {} of {} proxy {} to implementation {}",
                call, target.label, proxy, implementation
            ),
        };
        let action = UpgradeProxy::new(
            target.proxy_admin,
            *proxy,
            *implementation,
            initializer.clone(),
        );

        Ok(Validation::Proposal {
            action: Box::new(action),
            comments,
        })
    }
}
