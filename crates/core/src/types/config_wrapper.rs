use crate::errors::GovernanceError;
use crate::orchestrator::implementation::ConfiguredImplementations;
use crate::orchestrator::selection::{UpgradeSelection, VaultSelection};
use crate::signer::StaticSignerResolver;
use crate::submitter::DEFAULT_CONFIRMATIONS;
use crate::types::address_book::AddressBook;
use alloy::primitives::Address;
use eyre::{Result, WrapErr, eyre};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::{env, fs};
use toml::Value;

pub struct ConfigWrapper {
    raw_config: Value,
}

impl ConfigWrapper {
    pub fn new(raw_config: Value) -> Self {
        Self { raw_config }
    }

    pub fn from_file(path: Option<&str>) -> Result<Self> {
        let path = path.unwrap_or("config.toml");
        let config_content =
            fs::read_to_string(path).wrap_err_with(|| format!("Failed to read {path}"))?;
        let raw_config: toml::Value = config_content.parse::<Value>()?;

        Ok(Self { raw_config })
    }

    /// Settings for `network_id`, falling back key by key to `[network.default]`.
    pub fn network_config(&self, network_id: u64) -> Result<NetworkConfig> {
        let networks = self.raw_config.get("network");
        let specific = networks
            .and_then(|n| n.get(&network_id.to_string()))
            .and_then(|n| n.as_table());
        let default = networks
            .and_then(|n| n.get("default"))
            .and_then(|n| n.as_table());

        let mut merged = match (specific, default) {
            (None, None) => {
                return Err(GovernanceError::MissingConfig(format!(
                    "no [network.{network_id}] or [network.default] section"
                ))
                .into());
            }
            (_, Some(default)) => default.clone(),
            (Some(_), None) => toml::map::Map::new(),
        };
        if let Some(specific) = specific {
            for (key, value) in specific {
                merged.insert(key.clone(), value.clone());
            }
        }

        Value::Table(merged).try_into::<NetworkConfig>().map_err(|e| {
            GovernanceError::MissingConfig(format!("network {network_id}: {e}")).into()
        })
    }

    pub fn get_rpc_url(&self, network_id: u64) -> Result<String> {
        let url_str = self
            .raw_config
            .get("rpc_endpoints")
            .and_then(|r| r.get(&network_id.to_string()))
            .and_then(|r| r.as_str())
            .ok_or_else(|| eyre!("URL not found for network_id: {}", network_id))?;

        if let Some(env_var) = url_str.strip_prefix("env:") {
            env::var(env_var).map_err(|_| eyre!("Environment variable {} not set", env_var))
        } else {
            Ok(url_str.to_string())
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignersConfig {
    #[serde(default)]
    pub default: Option<Address>,
    /// Signer per action name, e.g. `upgrade_vaults`.
    #[serde(default)]
    pub actions: HashMap<String, Address>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImplementationsConfig {
    /// Keyed by `token/kind`.
    #[serde(default)]
    pub vaults: BTreeMap<String, Address>,
    /// Keyed by vault kind, used when no vault entry exists.
    #[serde(default)]
    pub kinds: BTreeMap<String, Address>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectionConfig {
    /// Empty means every vault in the address book.
    #[serde(default)]
    pub vaults: Vec<VaultSelection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwnershipConfig {
    pub new_owner: Address,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    pub timelock: Address,
    pub proxy_admin: Address,
    #[serde(default)]
    pub delay: Option<u64>,
    #[serde(default)]
    pub confirmations: Option<u64>,
    #[serde(default)]
    pub signers: SignersConfig,
    #[serde(default)]
    pub tokens: BTreeMap<String, BTreeMap<String, Address>>,
    #[serde(default)]
    pub implementations: ImplementationsConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub ownership: Option<OwnershipConfig>,
}

impl NetworkConfig {
    pub fn address_book(&self, network_id: u64) -> AddressBook {
        AddressBook {
            network_id,
            timelock: self.timelock,
            proxy_admin: self.proxy_admin,
            delay: self.delay,
            tokens: self.tokens.clone(),
        }
    }

    pub fn selection(&self) -> UpgradeSelection {
        if self.selection.vaults.is_empty() {
            UpgradeSelection::AllVaults
        } else {
            UpgradeSelection::Explicit(self.selection.vaults.clone())
        }
    }

    pub fn signer_resolver(&self) -> StaticSignerResolver {
        StaticSignerResolver::new(self.signers.default, self.signers.actions.clone())
    }

    pub fn implementation_source(&self) -> ConfiguredImplementations {
        ConfiguredImplementations::new(
            self.implementations.vaults.clone(),
            self.implementations.kinds.clone(),
        )
    }

    pub fn confirmations(&self) -> u64 {
        self.confirmations.unwrap_or(DEFAULT_CONFIRMATIONS)
    }

    /// The command line value wins over `[ownership] new_owner`.
    pub fn new_owner(&self, cli_override: Option<Address>) -> Result<Address> {
        cli_override
            .or_else(|| self.ownership.as_ref().map(|o| o.new_owner))
            .ok_or_else(|| GovernanceError::MissingConfig("ownership.new_owner".to_string()).into())
    }
}
