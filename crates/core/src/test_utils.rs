use crate::bindings::{multisig::GnosisSafe, proxy_admin::ProxyAdmin, timelock::Timelock};
use crate::codec::operation::operation_id;
use crate::errors::CallReverted;
use crate::orchestrator::implementation::ImplementationSource;
use crate::orchestrator::selection::UpgradeRequest;
use crate::signer::SignerResolver;
use crate::submitter::{Submission, TxMetadata, TxSubmitter};
use crate::types::address_book::AddressBook;
use crate::types::transaction::Transaction;
use crate::utils::chain_reader::ChainReader;
use alloy::primitives::{Address, B256, Bytes, U256, address, keccak256};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use eyre::{Result, eyre};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

pub const TIMELOCK: Address = address!("0x1000000000000000000000000000000000000001");
pub const PROXY_ADMIN: Address = address!("0x2000000000000000000000000000000000000002");
pub const PROPOSER: Address = address!("0x3000000000000000000000000000000000000003");
pub const SAFE: Address = address!("0x4000000000000000000000000000000000000004");
pub const SAFE_OWNER: Address = address!("0x5000000000000000000000000000000000000005");
pub const NEW_OWNER: Address = address!("0x6000000000000000000000000000000000000006");
pub const IMPL_V1: Address = address!("0x7100000000000000000000000000000000000071");
pub const IMPL_V2: Address = address!("0x7200000000000000000000000000000000000072");
pub const VAULT_A: Address = address!("0xa00000000000000000000000000000000000000a");
pub const VAULT_B: Address = address!("0xb00000000000000000000000000000000000000b");
pub const VAULT_C: Address = address!("0xc00000000000000000000000000000000000000c");

pub const MIN_DELAY: u64 = 86_400;

/// usdc: lending (VAULT_A), staking (VAULT_B); weth: lending (VAULT_C).
pub fn address_book() -> AddressBook {
    let mut tokens = BTreeMap::new();
    tokens.insert(
        "usdc".to_string(),
        BTreeMap::from([
            ("lending".to_string(), VAULT_A),
            ("staking".to_string(), VAULT_B),
        ]),
    );
    tokens.insert(
        "weth".to_string(),
        BTreeMap::from([("lending".to_string(), VAULT_C)]),
    );
    AddressBook {
        network_id: 1,
        timelock: TIMELOCK,
        proxy_admin: PROXY_ADMIN,
        delay: None,
        tokens,
    }
}

/// Chain state answered by `MockChain`. Unset proxies report `IMPL_V1`,
/// unset proxy admins are owned by the timelock.
pub struct MockState {
    pub code: HashSet<Address>,
    pub implementations: HashMap<Address, Address>,
    pub admin_owners: HashMap<Address, Address>,
    pub min_delay: u64,
    pub proposers: Vec<Address>,
    pub executors: Vec<Address>,
    pub known: HashSet<B256>,
    pub ready: HashSet<B256>,
    pub done: HashSet<B256>,
    pub safe_owners: Vec<Address>,
    pub safe_nonce: u64,
    pub safe_threshold: u64,
    pub safe_get_owners_reverts: bool,
    /// getOwners fails like a dropped connection.
    pub safe_get_owners_unreachable: bool,
    pub safe_nonce_unreachable: bool,
    pub corrupt_hash_operation: bool,
    /// Proxies whose implementation lookup fails like a flaky RPC would.
    pub failing_proxies: HashSet<Address>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            code: HashSet::from([TIMELOCK, PROXY_ADMIN, SAFE, VAULT_A, VAULT_B, VAULT_C]),
            implementations: HashMap::new(),
            admin_owners: HashMap::new(),
            min_delay: MIN_DELAY,
            proposers: vec![PROPOSER],
            executors: vec![PROPOSER],
            known: HashSet::new(),
            ready: HashSet::new(),
            done: HashSet::new(),
            safe_owners: vec![SAFE_OWNER, Address::repeat_byte(0x55)],
            safe_nonce: 7,
            safe_threshold: 1,
            safe_get_owners_reverts: false,
            safe_get_owners_unreachable: false,
            safe_nonce_unreachable: false,
            corrupt_hash_operation: false,
            failing_proxies: HashSet::new(),
        }
    }
}

/// In-memory `ChainReader` dispatching on the call selector.
pub struct MockChain {
    state: Mutex<MockState>,
}

impl MockChain {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
        }
    }

    pub fn update(&self, f: impl FnOnce(&mut MockState)) {
        f(&mut self.state.lock().unwrap());
    }

    pub fn min_delay(&self) -> U256 {
        U256::from(self.state.lock().unwrap().min_delay)
    }

    fn answer(&self, target: Address, calldata: &[u8]) -> Result<Vec<u8>> {
        let state = self.state.lock().unwrap();
        let selector: [u8; 4] = calldata
            .get(..4)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| eyre!("calldata too short"))?;

        if selector == Timelock::hashOperationCall::SELECTOR {
            let call = Timelock::hashOperationCall::abi_decode(calldata, true)?;
            let mut id = operation_id(call.target, call.value, &call.data, call.predecessor, call.salt)?;
            if state.corrupt_hash_operation {
                id = keccak256(id);
            }
            Ok(Timelock::hashOperationCall::abi_encode_returns(&(id,)))
        } else if selector == Timelock::isOperationCall::SELECTOR {
            let call = Timelock::isOperationCall::abi_decode(calldata, true)?;
            Ok(Timelock::isOperationCall::abi_encode_returns(&(state.known.contains(&call.id),)))
        } else if selector == Timelock::isOperationReadyCall::SELECTOR {
            let call = Timelock::isOperationReadyCall::abi_decode(calldata, true)?;
            Ok(Timelock::isOperationReadyCall::abi_encode_returns(&(state.ready.contains(&call.id),)))
        } else if selector == Timelock::isOperationDoneCall::SELECTOR {
            let call = Timelock::isOperationDoneCall::abi_decode(calldata, true)?;
            Ok(Timelock::isOperationDoneCall::abi_encode_returns(&(state.done.contains(&call.id),)))
        } else if selector == Timelock::getMinDelayCall::SELECTOR {
            Ok(Timelock::getMinDelayCall::abi_encode_returns(&(U256::from(state.min_delay),)))
        } else if selector == Timelock::getProposersCall::SELECTOR {
            Ok(Timelock::getProposersCall::abi_encode_returns(&(state.proposers.clone(),)))
        } else if selector == Timelock::getExecutorsCall::SELECTOR {
            Ok(Timelock::getExecutorsCall::abi_encode_returns(&(state.executors.clone(),)))
        } else if selector == ProxyAdmin::getProxyImplementationCall::SELECTOR {
            let call = ProxyAdmin::getProxyImplementationCall::abi_decode(calldata, true)?;
            if state.failing_proxies.contains(&call.proxy) {
                return Err(eyre!("server returned an error response: internal error"));
            }
            let implementation = state.implementations.get(&call.proxy).copied().unwrap_or(IMPL_V1);
            Ok(ProxyAdmin::getProxyImplementationCall::abi_encode_returns(&(implementation,)))
        } else if selector == ProxyAdmin::ownerCall::SELECTOR {
            let owner = state.admin_owners.get(&target).copied().unwrap_or(TIMELOCK);
            Ok(ProxyAdmin::ownerCall::abi_encode_returns(&(owner,)))
        } else if selector == GnosisSafe::getOwnersCall::SELECTOR {
            if state.safe_get_owners_unreachable {
                return Err(eyre!("error sending request: connection reset by peer"));
            }
            if state.safe_get_owners_reverts || target != SAFE {
                return Err(CallReverted {
                    target,
                    reason: "execution reverted".to_string(),
                }
                .into());
            }
            Ok(GnosisSafe::getOwnersCall::abi_encode_returns(&(state.safe_owners.clone(),)))
        } else if selector == GnosisSafe::getThresholdCall::SELECTOR {
            Ok(GnosisSafe::getThresholdCall::abi_encode_returns(&(U256::from(state.safe_threshold),)))
        } else if selector == GnosisSafe::nonceCall::SELECTOR {
            if state.safe_nonce_unreachable {
                return Err(eyre!("error sending request: operation timed out"));
            }
            Ok(GnosisSafe::nonceCall::abi_encode_returns(&(U256::from(state.safe_nonce),)))
        } else if selector == GnosisSafe::getTransactionHashCall::SELECTOR {
            Ok(GnosisSafe::getTransactionHashCall::abi_encode_returns(&(keccak256(calldata),)))
        } else {
            Err(eyre!("MockChain: unexpected call to {} with selector 0x{}", target, hex::encode(selector)))
        }
    }
}

#[async_trait]
impl ChainReader for MockChain {
    async fn call(&self, target: Address, calldata: Bytes) -> Result<Bytes> {
        self.answer(target, &calldata).map(Bytes::from)
    }

    async fn code(&self, target: Address) -> Result<Bytes> {
        let state = self.state.lock().unwrap();
        if state.code.contains(&target) {
            Ok(Bytes::from_static(&[0x60, 0x80, 0x60, 0x40]))
        } else {
            Ok(Bytes::new())
        }
    }
}

/// Resolves every action to the same signer.
pub struct FixedSignerResolver(pub Address);

#[async_trait]
impl SignerResolver for FixedSignerResolver {
    async fn resolve_signer_for_action(&self, _action: &str) -> Result<Address> {
        Ok(self.0)
    }
}

/// Keeps submitted transactions in memory. Fails when the destination is
/// listed in `failing_targets`.
#[derive(Default)]
pub struct RecordingSubmitter {
    pub submitted: Mutex<Vec<(Transaction, TxMetadata)>>,
    pub failing_targets: HashSet<Address>,
}

impl RecordingSubmitter {
    pub fn count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.submitted
            .lock()
            .unwrap()
            .iter()
            .map(|(tx, _)| tx.clone())
            .collect()
    }
}

#[async_trait]
impl TxSubmitter for RecordingSubmitter {
    async fn submit(&self, tx: &Transaction, metadata: &TxMetadata) -> Result<Submission> {
        if self.failing_targets.contains(&tx.to) {
            return Err(eyre!("transaction to {} was rejected", tx.to));
        }
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push((tx.clone(), metadata.clone()));
        Ok(Submission::Delegated {
            location: format!("memory/{}", submitted.len() - 1),
        })
    }
}

/// Implementation source with an in-memory record. Each deployment lands at
/// a new address, the way CREATE does.
#[derive(Default)]
pub struct MockImplementations {
    pub recorded: Mutex<HashMap<String, Address>>,
    pub can_deploy: bool,
    pub deployed: Mutex<Vec<Address>>,
}

impl MockImplementations {
    pub fn with_recorded(entries: &[(&str, Address)]) -> Self {
        Self {
            recorded: Mutex::new(
                entries
                    .iter()
                    .map(|(label, address)| (label.to_string(), *address))
                    .collect(),
            ),
            ..Default::default()
        }
    }

    pub fn deploying() -> Self {
        Self {
            can_deploy: true,
            ..Default::default()
        }
    }

    pub fn deploy_count(&self) -> usize {
        self.deployed.lock().unwrap().len()
    }
}

#[async_trait]
impl ImplementationSource for MockImplementations {
    async fn recorded(&self, request: &UpgradeRequest) -> Result<Option<Address>> {
        Ok(self.recorded.lock().unwrap().get(&request.label()).copied())
    }

    async fn deploy(&self, request: &UpgradeRequest) -> Result<Address> {
        if !self.can_deploy {
            return Err(eyre!("deployment of {} failed", request.label()));
        }
        let mut deployed = self.deployed.lock().unwrap();
        let address = Address::with_last_byte(0xd0 + deployed.len() as u8);
        deployed.push(address);
        Ok(address)
    }

    async fn record(&self, request: &UpgradeRequest, implementation: Address) -> Result<()> {
        self.recorded.lock().unwrap().insert(request.label(), implementation);
        Ok(())
    }
}
