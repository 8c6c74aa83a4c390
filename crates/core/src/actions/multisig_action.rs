use crate::{actions::action::Action, bindings::multisig::GnosisSafe};
use alloy::primitives::{Address, B256, Bytes, U256};
use alloy::sol_types::SolCall;
use serde_json::{Value, json};

const SAFE_TX_GAS: U256 = U256::ZERO;
const BASE_GAS: U256 = U256::ZERO;
const GAS_PRICE: U256 = U256::ZERO;
const GAS_TOKEN: Address = Address::ZERO;
const REFUND_RECEIVER: Address = Address::ZERO;
/// Signature type byte the Safe reads as "approved by msg.sender or approveHash".
pub const PRE_APPROVED_SIGNATURE_TYPE: u8 = 1;

/// Pre-validated signature of `owner`: r = owner address left-padded to a word,
/// s = zero word, v = approval type byte.
pub fn pre_approved_signature(owner: Address) -> Bytes {
    let mut sig = Vec::with_capacity(65);
    // r
    sig.extend_from_slice(owner.into_word().as_slice());
    // s
    sig.extend_from_slice(&[0u8; 32]);
    // v
    sig.push(PRE_APPROVED_SIGNATURE_TYPE);
    Bytes::from(sig)
}

// Wraps an action into an execTransaction call signed off by a single owner.
pub struct MultisigAction {
    multisig: Address,
    signer: Address,
    action: Box<dyn Action>,
    nonce: U256,
    safe_hash: B256,
    signature: Bytes,
}

impl MultisigAction {
    pub fn new(
        multisig: Address,
        signer: Address,
        action: Box<dyn Action>,
        nonce: U256,
        safe_hash: B256,
    ) -> Self {
        Self {
            multisig,
            signer,
            action,
            nonce,
            safe_hash,
            signature: pre_approved_signature(signer),
        }
    }

    /// Arguments of `getTransactionHash` for the wrapped action at `nonce`.
    pub fn transaction_hash_call(action: &dyn Action, nonce: U256) -> GnosisSafe::getTransactionHashCall {
        GnosisSafe::getTransactionHashCall::new((
            action.target(),
            action.value(),
            action.data(),
            action.operation(),
            SAFE_TX_GAS,
            BASE_GAS,
            GAS_PRICE,
            GAS_TOKEN,
            REFUND_RECEIVER,
            nonce,
        ))
    }
}

impl Action for MultisigAction {
    fn target(&self) -> Address {
        self.multisig
    }

    fn data(&self) -> Bytes {
        let tx_data = GnosisSafe::execTransactionCall::new((
            self.action.target(),
            self.action.value(),
            self.action.data(),
            self.action.operation(),
            SAFE_TX_GAS,
            BASE_GAS,
            GAS_PRICE,
            GAS_TOKEN,
            REFUND_RECEIVER,
            self.signature.clone(),
        ))
        .abi_encode();

        Bytes::from(tx_data)
    }

    fn describe(&self) -> Value {
        json!({
            "action": "ExecTransaction",
            "multisig": self.multisig.to_string(),
            "signer": self.signer.to_string(),
            "nonce": self.nonce.to_string(),
            "safe_hash": self.safe_hash.to_string(),
            "inner": self.action.describe()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::transfer_ownership_action::TransferOwnership;
    use alloy::primitives::address;

    const SAFE: Address = address!("0x5afe5afe5afe5afe5afe5afe5afe5afe5afe5afe");
    const OWNER: Address = address!("0x0000000000000000000000000000000000000abc");
    const ADMIN: Address = address!("0x1111111111111111111111111111111111111111");

    #[test]
    fn test_pre_approved_signature_layout() {
        let sig = pre_approved_signature(OWNER);
        assert_eq!(sig.len(), 65);
        assert_eq!(&sig[..12], &[0u8; 12]);
        assert_eq!(&sig[12..32], OWNER.as_slice());
        assert_eq!(&sig[32..64], &[0u8; 32]);
        assert_eq!(sig[64], PRE_APPROVED_SIGNATURE_TYPE);
    }

    #[test]
    fn test_exec_transaction_wraps_inner_call() {
        let inner = TransferOwnership::new(ADMIN, OWNER);
        let inner_data = inner.data();
        let action = MultisigAction::new(SAFE, OWNER, Box::new(inner), U256::from(3), B256::ZERO);

        assert_eq!(action.target(), SAFE);
        let decoded = GnosisSafe::execTransactionCall::abi_decode(&action.data(), true).unwrap();
        assert_eq!(decoded.to, ADMIN);
        assert_eq!(decoded.value, U256::ZERO);
        assert_eq!(decoded.data, inner_data);
        assert_eq!(decoded.operation, 0);
        assert_eq!(decoded.signatures, pre_approved_signature(OWNER));
    }
}
