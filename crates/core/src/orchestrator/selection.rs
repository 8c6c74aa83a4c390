use crate::errors::GovernanceError;
use crate::types::address_book::AddressBook;
use alloy::primitives::{Address, Bytes};
use eyre::Result;
use serde::Deserialize;

/// One explicitly selected vault, with optional overrides.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VaultSelection {
    pub token: String,
    pub kind: String,
    /// Reuse an already deployed implementation instead of deploying one.
    #[serde(default)]
    pub implementation: Option<Address>,
    /// Initializer calldata, turns the upgrade into upgradeAndCall.
    #[serde(default)]
    pub initializer: Option<Bytes>,
}

/// Which vaults a batch run upgrades.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeSelection {
    AllVaults,
    Explicit(Vec<VaultSelection>),
}

/// A vault to upgrade, before its implementation address is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeRequest {
    pub token: String,
    pub kind: String,
    pub proxy: Address,
    pub implementation_override: Option<Address>,
    pub initializer: Option<Bytes>,
}

impl UpgradeRequest {
    pub fn label(&self) -> String {
        format!("{}/{}", self.token, self.kind)
    }
}

/// A unit of work for the batch orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetRequest {
    Upgrade(UpgradeRequest),
    TransferOwnership { proxy_admin: Address, new_owner: Address },
}

impl TargetRequest {
    pub fn label(&self) -> String {
        match self {
            TargetRequest::Upgrade(request) => request.label(),
            TargetRequest::TransferOwnership { proxy_admin, .. } => format!("proxy-admin {proxy_admin}"),
        }
    }
}

impl UpgradeSelection {
    /// Expands the selection against the address book. Unknown tokens or
    /// vault kinds are configuration errors.
    pub fn resolve(&self, book: &AddressBook) -> Result<Vec<UpgradeRequest>> {
        match self {
            UpgradeSelection::AllVaults => Ok(book
                .tokens
                .iter()
                .flat_map(|(token, vaults)| {
                    vaults.iter().map(move |(kind, proxy)| UpgradeRequest {
                        token: token.clone(),
                        kind: kind.clone(),
                        proxy: *proxy,
                        implementation_override: None,
                        initializer: None,
                    })
                })
                .collect()),
            UpgradeSelection::Explicit(selections) => selections
                .iter()
                .map(|selection| -> Result<UpgradeRequest> {
                    let proxy = book.vault(&selection.token, &selection.kind).ok_or_else(|| {
                        GovernanceError::MissingConfig(format!(
                            "no {} vault for token {} on network {}",
                            selection.kind, selection.token, book.network_id
                        ))
                    })?;
                    Ok(UpgradeRequest {
                        token: selection.token.clone(),
                        kind: selection.kind.clone(),
                        proxy,
                        implementation_override: selection.implementation,
                        initializer: selection.initializer.clone(),
                    })
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::is_fatal;
    use crate::test_utils::{VAULT_A, VAULT_B, VAULT_C, address_book};

    #[test]
    fn test_all_vaults_enumerates_every_token_and_kind() {
        let requests = UpgradeSelection::AllVaults.resolve(&address_book()).unwrap();
        let labels: Vec<String> = requests.iter().map(|r| r.label()).collect();
        assert_eq!(labels, vec!["usdc/lending", "usdc/staking", "weth/lending"]);
        assert_eq!(requests[0].proxy, VAULT_A);
        assert_eq!(requests[1].proxy, VAULT_B);
        assert_eq!(requests[2].proxy, VAULT_C);
    }

    #[test]
    fn test_explicit_selection_carries_overrides() {
        let override_impl = Address::repeat_byte(0x42);
        let selection = UpgradeSelection::Explicit(vec![VaultSelection {
            token: "weth".to_string(),
            kind: "lending".to_string(),
            implementation: Some(override_impl),
            initializer: None,
        }]);
        let requests = selection.resolve(&address_book()).unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].proxy, VAULT_C);
        assert_eq!(requests[0].implementation_override, Some(override_impl));
    }

    #[test]
    fn test_unknown_vault_is_configuration_error() {
        let selection = UpgradeSelection::Explicit(vec![VaultSelection {
            token: "dai".to_string(),
            kind: "lending".to_string(),
            implementation: None,
            initializer: None,
        }]);
        let err = selection.resolve(&address_book()).unwrap_err();
        assert!(is_fatal(&err));
    }
}
