use crate::actions::action::Action;
use alloy::primitives::{Address, Bytes, U256};

/// A fully built transaction, ready to be signed by `from`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

impl Transaction {
    pub fn from_action(from: Address, action: &dyn Action) -> Self {
        Self {
            from,
            to: action.target(),
            value: action.value(),
            data: action.data(),
        }
    }
}
