use alloy::primitives::{Address, B256, Bytes, U256, keccak256};
use alloy::sol_types::{SolType, sol_data};
use eyre::{Result, eyre};
use serde_json::{Value, json};

/// No operation in this system depends on another one.
pub const DEFAULT_PREDECESSOR: B256 = B256::ZERO;

type OperationTuple = (
    sol_data::Address,
    sol_data::Uint<256>,
    sol_data::Bytes,
    sol_data::FixedBytes<32>,
    sol_data::FixedBytes<32>,
);

/// Derives the operation salt from a human readable label.
pub fn salt(label: &str) -> B256 {
    keccak256(label.as_bytes())
}

/// keccak256(abi.encode(target, value, data, predecessor, salt)), the scheme
/// `TimelockController.hashOperation` uses.
pub fn operation_id(
    target: Address,
    value: U256,
    data: &Bytes,
    predecessor: B256,
    salt: B256,
) -> Result<B256> {
    if target == Address::ZERO {
        return Err(eyre!("OperationCodec: target must not be the zero address"));
    }
    Ok(hash_operation(target, value, data, predecessor, salt))
}

fn hash_operation(target: Address, value: U256, data: &Bytes, predecessor: B256, salt: B256) -> B256 {
    keccak256(OperationTuple::abi_encode_params(&(target, value, data.clone(), predecessor, salt)))
}

/// A single governed call routed through the timelock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub target: Address,
    pub value: U256,
    pub data: Bytes,
    pub predecessor: B256,
    pub salt: B256,
    label: String,
}

impl Operation {
    pub fn new(target: Address, data: Bytes, label: &str) -> Result<Self> {
        if target == Address::ZERO {
            return Err(eyre!("Operation: target must not be the zero address"));
        }
        Ok(Self {
            target,
            value: U256::ZERO,
            data,
            predecessor: DEFAULT_PREDECESSOR,
            salt: salt(label),
            label: label.to_string(),
        })
    }

    pub fn id(&self) -> B256 {
        // Target is checked in `new`.
        hash_operation(self.target, self.value, &self.data, self.predecessor, self.salt)
    }

    pub fn describe(&self) -> Value {
        json!({
            "label": self.label,
            "target": self.target.to_string(),
            "data": format!("0x{}", hex::encode(&self.data)),
            "salt": self.salt.to_string(),
            "id": self.id().to_string(),
        })
    }
}
