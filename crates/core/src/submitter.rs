use crate::types::transaction::Transaction;
use alloy::network::{ReceiptResponse, TransactionBuilder};
use alloy::primitives::B256;
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use eyre::{Result, eyre};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Confirmation depth a sent transaction must reach before it counts as final.
pub const DEFAULT_CONFIRMATIONS: u64 = 2;
const RECEIPT_TIMEOUT: Duration = Duration::from_secs(600);

/// Routing information attached to every submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxMetadata {
    pub action: String,
    pub sub_action: String,
    pub comment: String,
}

/// How a transaction left the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Signed and broadcast, confirmed at the required depth.
    Sent { hash: B256 },
    /// Handed off for custom signing (hardware wallet, Safe UI, ...).
    Delegated { location: String },
}

#[async_trait]
pub trait TxSubmitter: Send + Sync {
    async fn submit(&self, tx: &Transaction, metadata: &TxMetadata) -> Result<Submission>;
}

/// Sends through a wallet-enabled provider and waits for confirmations.
pub struct RpcSubmitter<P> {
    provider: P,
    confirmations: u64,
}

impl<P> RpcSubmitter<P>
where
    P: Provider + Clone + Send + Sync + 'static,
{
    pub fn new(provider: P, confirmations: u64) -> Self {
        Self {
            provider,
            confirmations,
        }
    }
}

#[async_trait]
impl<P> TxSubmitter for RpcSubmitter<P>
where
    P: Provider + Clone + Send + Sync + 'static,
{
    async fn submit(&self, tx: &Transaction, metadata: &TxMetadata) -> Result<Submission> {
        let request = TransactionRequest::default()
            .with_from(tx.from)
            .with_to(tx.to)
            .with_value(tx.value)
            .with_input(tx.data.clone());

        info!(
            "Sending {}/{} from {}: {}",
            metadata.action, metadata.sub_action, tx.from, metadata.comment
        );
        let pending = self.provider.send_transaction(request).await?;
        let hash = *pending.tx_hash();
        info!("Sent transaction {}, waiting for {} confirmations", hash, self.confirmations);

        let receipt = pending
            .with_required_confirmations(self.confirmations)
            .with_timeout(Some(RECEIPT_TIMEOUT))
            .get_receipt()
            .await?;
        if !receipt.status() {
            return Err(eyre!("Transaction {} reverted", hash));
        }

        Ok(Submission::Sent { hash })
    }
}

/// On-disk form of a transaction awaiting delegated signing.
#[derive(Debug, Serialize, Deserialize)]
pub struct TxFile {
    pub network_id: u64,
    pub action: String,
    pub sub_action: String,
    pub comment: String,
    pub from: String,
    pub to: String,
    pub value: String,
    pub data: String,
}

impl TxFile {
    pub fn from_file(file_path: &str) -> Result<Self> {
        let file_content = fs::read_to_string(file_path)?;
        let tx_file: TxFile = serde_json::from_str(&file_content)?;
        Ok(tx_file)
    }
}

/// Writes each transaction to a numbered JSON file for signing elsewhere.
pub struct FileSubmitter {
    output_dir: PathBuf,
    network_id: u64,
    counter: AtomicUsize,
}

impl FileSubmitter {
    pub fn new(output_dir: impl Into<PathBuf>, network_id: u64) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self {
            output_dir,
            network_id,
            counter: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl TxSubmitter for FileSubmitter {
    async fn submit(&self, tx: &Transaction, metadata: &TxMetadata) -> Result<Submission> {
        let index = self.counter.fetch_add(1, Ordering::SeqCst);
        let filename = self.output_dir.join(format!(
            "tx_{}_{}_{}.json",
            index, metadata.action, metadata.sub_action
        ));
        let tx_file = TxFile {
            network_id: self.network_id,
            action: metadata.action.clone(),
            sub_action: metadata.sub_action.clone(),
            comment: metadata.comment.clone(),
            from: tx.from.to_string(),
            to: tx.to.to_string(),
            value: tx.value.to_string(),
            data: format!("0x{}", hex::encode(&tx.data)),
        };
        fs::write(&filename, serde_json::to_string_pretty(&tx_file)?)?;

        let location = filename.display().to_string();
        info!("Saved transaction to: {}", location);
        Ok(Submission::Delegated { location })
    }
}
