use alloy::primitives::Address;
use async_trait::async_trait;
use eyre::Result;
use std::collections::HashMap;

use crate::errors::GovernanceError;

/// Identifies which multisig owner co-signs a wrapped call for an action.
#[async_trait]
pub trait SignerResolver: Send + Sync {
    async fn resolve_signer_for_action(&self, action: &str) -> Result<Address>;
}

/// Signers taken from configuration: a per-action entry, else the default.
pub struct StaticSignerResolver {
    default: Option<Address>,
    per_action: HashMap<String, Address>,
}

impl StaticSignerResolver {
    pub fn new(default: Option<Address>, per_action: HashMap<String, Address>) -> Self {
        Self {
            default,
            per_action,
        }
    }
}

#[async_trait]
impl SignerResolver for StaticSignerResolver {
    async fn resolve_signer_for_action(&self, action: &str) -> Result<Address> {
        self.per_action
            .get(action)
            .copied()
            .or(self.default)
            .ok_or_else(|| {
                GovernanceError::MissingConfig(format!("no signer configured for action {action}"))
                    .into()
            })
    }
}
