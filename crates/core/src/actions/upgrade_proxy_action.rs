use alloy::primitives::{Address, Bytes};
use alloy::sol_types::SolCall;
use serde_json::{Value, json};

use crate::{actions::action::Action, bindings::proxy_admin::ProxyAdmin};

pub struct UpgradeProxy {
    proxy_admin: Address,
    proxy: Address,
    implementation: Address,
    initializer: Option<Bytes>,
}

impl UpgradeProxy {
    pub fn new(
        proxy_admin: Address,
        proxy: Address,
        implementation: Address,
        initializer: Option<Bytes>,
    ) -> Self {
        Self {
            proxy_admin,
            proxy,
            implementation,
            initializer,
        }
    }
}

impl Action for UpgradeProxy {
    fn target(&self) -> Address {
        self.proxy_admin
    }
    fn data(&self) -> Bytes {
        let bytes_data = match &self.initializer {
            Some(initializer) => ProxyAdmin::upgradeAndCallCall::new((
                self.proxy,
                self.implementation,
                initializer.clone(),
            ))
            .abi_encode(),
            None => ProxyAdmin::upgradeCall::new((self.proxy, self.implementation)).abi_encode(),
        };
        Bytes::from(bytes_data)
    }
    fn describe(&self) -> Value {
        let action = match self.initializer {
            Some(_) => "UpgradeAndCall",
            None => "Upgrade",
        };
        json!({
            "action": action,
            "proxy_admin": self.proxy_admin.to_string(),
            "proxy": self.proxy.to_string(),
            "implementation": self.implementation.to_string(),
        })
    }
}
