use alloy::primitives::{Address, Bytes};

/// What should change on the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetKind {
    Upgrade {
        proxy: Address,
        implementation: Address,
        initializer: Option<Bytes>,
    },
    TransferOwnership {
        new_owner: Address,
    },
}

/// One contract whose implementation or ownership is governed by the timelock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminTarget {
    pub label: String,
    pub proxy_admin: Address,
    pub kind: TargetKind,
}

impl AdminTarget {
    pub fn upgrade(
        label: &str,
        proxy_admin: Address,
        proxy: Address,
        implementation: Address,
        initializer: Option<Bytes>,
    ) -> Self {
        Self {
            label: label.to_string(),
            proxy_admin,
            kind: TargetKind::Upgrade {
                proxy,
                implementation,
                initializer,
            },
        }
    }

    pub fn transfer_ownership(proxy_admin: Address, new_owner: Address) -> Self {
        Self {
            label: format!("proxy-admin {proxy_admin}"),
            proxy_admin,
            kind: TargetKind::TransferOwnership { new_owner },
        }
    }

    /// Label the operation salt is derived from. Stable across propose and
    /// execute runs, distinct for every desired end state.
    pub fn operation_label(&self) -> String {
        match &self.kind {
            TargetKind::Upgrade {
                proxy,
                implementation,
                ..
            } => format!("upgrade {} proxy {} to {}", self.label, proxy, implementation),
            TargetKind::TransferOwnership { new_owner } => {
                format!("transfer ownership of {} to {}", self.proxy_admin, new_owner)
            }
        }
    }
}
