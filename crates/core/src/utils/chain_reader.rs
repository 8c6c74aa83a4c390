use crate::errors::CallReverted;
use alloy::contract::{CallBuilder, Error as ContractError};
use alloy::primitives::{Address, Bytes};
use alloy::providers::Provider;
use alloy::sol_types::SolCall;
use alloy::transports::RpcError;
use async_trait::async_trait;
use eyre::{Result, eyre};
use log::{debug, info};
use std::time::Duration;

/// Read access to chain state. Every read goes to the chain, nothing is cached,
/// so each target observes the latest state of the authority.
///
/// A call the chain executed and reverted is reported as `CallReverted`,
/// anything else is a transport failure.
#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn call(&self, target: Address, calldata: Bytes) -> Result<Bytes>;
    async fn code(&self, target: Address) -> Result<Bytes>;
}

/// Encodes `call`, sends it to `target` and decodes the return values.
pub async fn view<C: SolCall>(chain: &dyn ChainReader, target: Address, call: C) -> Result<C::Return> {
    let calldata = Bytes::from(call.abi_encode());
    let result = chain.call(target, calldata).await?;
    Ok(C::abi_decode_returns(&result, true)?)
}

pub async fn has_code(chain: &dyn ChainReader, target: Address) -> Result<bool> {
    Ok(!chain.code(target).await?.is_empty())
}

pub struct RpcChainReader<P> {
    provider: P,
}

impl<P> RpcChainReader<P>
where
    P: Provider + Clone + Send + Sync + 'static,
{
    const MAX_RETRIES: u32 = 10;
    const RETRY_DELAY: Duration = Duration::from_secs(1);

    pub fn new(provider: P) -> Self {
        debug!("Creating RpcChainReader");
        Self { provider }
    }
}

fn is_rate_limited(error: &str) -> bool {
    error.contains("429") || error.contains("quota")
}

fn is_revert_message(message: &str) -> bool {
    message.contains("revert")
}

fn revert_reason(error: &ContractError) -> Option<String> {
    match error {
        ContractError::TransportError(RpcError::ErrorResp(payload))
            if payload.as_revert_data().is_some() || is_revert_message(&payload.message) =>
        {
            Some(payload.message.to_string())
        }
        _ => None,
    }
}

#[async_trait]
impl<P> ChainReader for RpcChainReader<P>
where
    P: Provider + Clone + Send + Sync + 'static,
{
    async fn call(&self, target: Address, calldata: Bytes) -> Result<Bytes> {
        let builder: CallBuilder<(), _, _> = CallBuilder::new_raw(self.provider.clone(), calldata).to(target);
        let mut attempts = 0;

        while attempts < Self::MAX_RETRIES {
            match builder.call().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if let Some(reason) = revert_reason(&e) {
                        return Err(CallReverted { target, reason }.into());
                    }
                    // Only rate limits are retried.
                    if !is_rate_limited(&e.to_string()) {
                        return Err(e.into());
                    }

                    info!("Rate limit error: {}", e);
                    attempts += 1;
                    tokio::time::sleep(Self::RETRY_DELAY).await;
                }
            }
        }

        Err(eyre!(
            "Failed to make RPC call to {} after {} attempts",
            target,
            Self::MAX_RETRIES
        ))
    }

    async fn code(&self, target: Address) -> Result<Bytes> {
        let mut attempts = 0;

        while attempts < Self::MAX_RETRIES {
            match self.provider.get_code_at(target).await {
                Ok(code) => return Ok(code),
                Err(e) => {
                    if !is_rate_limited(&e.to_string()) {
                        return Err(e.into());
                    }

                    info!("Rate limit error: {}", e);
                    attempts += 1;
                    tokio::time::sleep(Self::RETRY_DELAY).await;
                }
            }
        }

        Err(eyre!(
            "Failed to read code of {} after {} attempts",
            target,
            Self::MAX_RETRIES
        ))
    }
}
