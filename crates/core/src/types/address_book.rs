use alloy::primitives::Address;
use std::collections::BTreeMap;

/// Per-network addresses a batch run operates on, resolved once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressBook {
    pub network_id: u64,
    pub timelock: Address,
    pub proxy_admin: Address,
    /// Optional schedule delay, must not undercut the timelock minimum.
    pub delay: Option<u64>,
    /// token -> vault kind -> vault proxy
    pub tokens: BTreeMap<String, BTreeMap<String, Address>>,
}

impl AddressBook {
    pub fn vault(&self, token: &str, kind: &str) -> Option<Address> {
        self.tokens.get(token).and_then(|vaults| vaults.get(kind)).copied()
    }
}
