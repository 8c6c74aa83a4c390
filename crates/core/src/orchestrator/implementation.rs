use super::selection::UpgradeRequest;
use crate::actions::timelock_action::Mode;
use alloy::primitives::Address;
use async_trait::async_trait;
use eyre::{Result, eyre};
use std::collections::BTreeMap;
use tokio::sync::Mutex;

/// Where vault implementations come from. Deployment itself is delegated.
///
/// Every deployment is passed to `record` right away, and `recorded` must
/// return it from then on, so reruns and execute runs reuse the address the
/// operation was proposed with.
#[async_trait]
pub trait ImplementationSource: Send + Sync {
    /// An implementation already deployed for this vault, if any.
    async fn recorded(&self, request: &UpgradeRequest) -> Result<Option<Address>>;
    /// Deploys a fresh implementation and returns its address.
    async fn deploy(&self, request: &UpgradeRequest) -> Result<Address>;
    /// Remembers a deployment for this vault.
    async fn record(&self, request: &UpgradeRequest, implementation: Address) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImplementationOrigin {
    Override,
    Recorded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImplementationPlan {
    Use {
        address: Address,
        origin: ImplementationOrigin,
    },
    Deploy,
    Unavailable,
}

/// Precedence: explicit override, then a recorded deployment, then a new
/// deployment. Deploying only makes sense while proposing, an execute run
/// must reuse whatever was proposed.
pub fn resolve_implementation(
    implementation_override: Option<Address>,
    recorded: Option<Address>,
    mode: Mode,
) -> ImplementationPlan {
    let sources = [
        (ImplementationOrigin::Override, implementation_override),
        (ImplementationOrigin::Recorded, recorded),
    ];
    if let Some((origin, Some(address))) = sources.into_iter().find(|(_, address)| address.is_some()) {
        return ImplementationPlan::Use { address, origin };
    }
    match mode {
        Mode::Propose => ImplementationPlan::Deploy,
        Mode::Execute => ImplementationPlan::Unavailable,
    }
}

/// Implementation addresses recorded in configuration, per vault
/// (`token/kind`) or per vault kind.
/// Recorded deployments take precedence over both.
pub struct ConfiguredImplementations {
    by_vault: BTreeMap<String, Address>,
    by_kind: BTreeMap<String, Address>,
    deployed: Mutex<BTreeMap<String, Address>>,
}

impl ConfiguredImplementations {
    pub fn new(by_vault: BTreeMap<String, Address>, by_kind: BTreeMap<String, Address>) -> Self {
        Self {
            by_vault,
            by_kind,
            deployed: Mutex::new(BTreeMap::new()),
        }
    }
}

#[async_trait]
impl ImplementationSource for ConfiguredImplementations {
    async fn recorded(&self, request: &UpgradeRequest) -> Result<Option<Address>> {
        let label = request.label();
        if let Some(address) = self.deployed.lock().await.get(&label) {
            return Ok(Some(*address));
        }
        Ok(self
            .by_vault
            .get(&label)
            .or_else(|| self.by_kind.get(&request.kind))
            .copied())
    }

    async fn record(&self, request: &UpgradeRequest, implementation: Address) -> Result<()> {
        self.deployed.lock().await.insert(request.label(), implementation);
        Ok(())
    }

    async fn deploy(&self, request: &UpgradeRequest) -> Result<Address> {
        Err(eyre!(
            "No implementation recorded for {}, deploy it and add it to [implementations]",
            request.label()
        ))
    }
}
