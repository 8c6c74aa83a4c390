use alloy::primitives::{Address, Bytes};
use alloy::sol_types::SolCall;
use serde_json::{Value, json};

use crate::{actions::action::Action, bindings::proxy_admin::ProxyAdmin};

pub struct TransferOwnership {
    proxy_admin: Address,
    new_owner: Address,
}

impl TransferOwnership {
    pub fn new(proxy_admin: Address, new_owner: Address) -> Self {
        Self {
            proxy_admin,
            new_owner,
        }
    }
}

impl Action for TransferOwnership {
    fn target(&self) -> Address {
        self.proxy_admin
    }
    fn data(&self) -> Bytes {
        let bytes_data = ProxyAdmin::transferOwnershipCall::new((self.new_owner,)).abi_encode();
        Bytes::from(bytes_data)
    }
    fn describe(&self) -> Value {
        json!({
            "action": "TransferOwnership",
            "proxy_admin": self.proxy_admin.to_string(),
            "new_owner": self.new_owner.to_string(),
        })
    }
}
