use alloy::primitives::{Address, Bytes, U256};
use serde_json::Value;

/// A single call against a contract, encodable to calldata.
pub trait Action: Send + Sync {
    fn target(&self) -> Address;
    fn value(&self) -> U256 {
        U256::ZERO
    }
    fn data(&self) -> Bytes; // encode to tx data
    fn operation(&self) -> u8 {
        0
    }
    fn describe(&self) -> Value;
}
