use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{actions::action::Action, bindings::timelock::Timelock, codec::operation::Operation};

/// Which half of the timelock protocol a call drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Propose,
    Execute,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Propose => "propose",
            Mode::Execute => "execute",
        }
    }
}

pub struct TimelockAction {
    mode: Mode,
    timelock: Address,
    delay: U256,
    operation: Operation,
}

impl TimelockAction {
    pub fn schedule(timelock: Address, operation: Operation, delay: U256) -> Self {
        Self {
            mode: Mode::Propose,
            timelock,
            delay,
            operation,
        }
    }

    pub fn execute(timelock: Address, operation: Operation) -> Self {
        Self {
            mode: Mode::Execute,
            timelock,
            delay: U256::ZERO,
            operation,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}

impl Action for TimelockAction {
    fn target(&self) -> Address {
        self.timelock
    }

    fn data(&self) -> Bytes {
        let op = &self.operation;
        let tx_data = match self.mode {
            Mode::Propose => Timelock::scheduleCall::new((
                op.target,
                op.value,
                op.data.clone(),
                op.predecessor,
                op.salt,
                self.delay,
            ))
            .abi_encode(),
            Mode::Execute => Timelock::executeCall::new((
                op.target,
                op.value,
                op.data.clone(),
                op.predecessor,
                op.salt,
            ))
            .abi_encode(),
        };

        Bytes::from(tx_data)
    }

    fn describe(&self) -> Value {
        match self.mode {
            Mode::Propose => {
                json!({
                    "action": "Schedule",
                    "timelock": self.timelock.to_string(),
                    "delay": self.delay.to_string(),
                    "inner": self.operation.describe()
                })
            }
            Mode::Execute => {
                json!({
                    "action": "Execute",
                    "timelock": self.timelock.to_string(),
                    "inner": self.operation.describe()
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, bytes};

    const TIMELOCK: Address = address!("0x7777777777777777777777777777777777777777");
    const ADMIN: Address = address!("0x1111111111111111111111111111111111111111");

    #[test]
    fn test_schedule_and_execute_share_operation_fields() {
        let op = Operation::new(ADMIN, bytes!("0xf2fde38b"), "transfer").unwrap();
        let delay = U256::from(86_400);

        let schedule = TimelockAction::schedule(TIMELOCK, op.clone(), delay);
        let decoded = Timelock::scheduleCall::abi_decode(&schedule.data(), true).unwrap();
        assert_eq!(decoded.target, ADMIN);
        assert_eq!(decoded.salt, op.salt);
        assert_eq!(decoded.delay, delay);

        let execute = TimelockAction::execute(TIMELOCK, op.clone());
        let decoded = Timelock::executeCall::abi_decode(&execute.data(), true).unwrap();
        assert_eq!(decoded.payload, op.data);
        assert_eq!(decoded.predecessor, op.predecessor);
        assert_eq!(execute.target(), TIMELOCK);
        assert_eq!(execute.describe()["inner"]["id"], op.id().to_string());
    }
}
