use alloy::network::EthereumWallet;
use alloy::primitives::{Address, Bytes};
use alloy::providers::ProviderBuilder;
use alloy::signers::Signer;
use alloy::signers::ledger::{HDPath, LedgerSigner};
use alloy::signers::trezor::{TrezorHDPath, TrezorSigner};
use clap::{Parser, Subcommand, ValueEnum};
use eyre::{Result, eyre};
use log::{info, warn};
use std::fs;
use std::path::Path;
use timelock_governor::{
    BatchOrchestrator, BatchSummary, ConfigWrapper, Mode, NetworkConfig, Operation,
    TargetRequest,
    submitter::{FileSubmitter, RpcSubmitter, TxSubmitter},
    utils::chain_reader::RpcChainReader,
};

const OUTPUT_DIR: &str = "output";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long = "config", short = 'c', default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Propose,
    Execute,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Propose => Mode::Propose,
            ModeArg::Execute => Mode::Execute,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Propose or execute vault implementation upgrades through the timelock
    UpgradeVaults {
        /// Network ID
        #[arg(long = "network", short = 'n')]
        network_id: u64,

        /// Timelock phase to run
        #[arg(long = "mode", short = 'm', value_enum)]
        mode: ModeArg,

        /// Use Trezor hardware wallet
        #[arg(long = "trezor", short = 't', conflicts_with = "ledger")]
        trezor: bool,

        /// Use Ledger hardware wallet
        #[arg(long = "ledger", short = 'l', conflicts_with = "trezor")]
        ledger: bool,
    },
    /// Propose or execute the proxy admin ownership transfer
    TransferOwnership {
        /// Network ID
        #[arg(long = "network", short = 'n')]
        network_id: u64,

        /// Timelock phase to run
        #[arg(long = "mode", short = 'm', value_enum)]
        mode: ModeArg,

        /// New owner, defaults to [ownership] new_owner
        #[arg(long = "new-owner")]
        new_owner: Option<Address>,

        /// Use Trezor hardware wallet
        #[arg(long = "trezor", short = 't', conflicts_with = "ledger")]
        trezor: bool,

        /// Use Ledger hardware wallet
        #[arg(long = "ledger", short = 'l', conflicts_with = "trezor")]
        ledger: bool,
    },
    /// Print the timelock operation id for a call
    OperationId {
        #[arg(long = "target")]
        target: Address,

        /// Calldata (hex)
        #[arg(long = "data")]
        data: Bytes,

        /// Label the salt is derived from
        #[arg(long = "label")]
        label: String,
    },
}

pub enum HardwareWalletType {
    TREZOR,
    LEDGER,
}

fn wallet_type(trezor: bool, ledger: bool) -> Option<HardwareWalletType> {
    match (trezor, ledger) {
        (true, false) => Some(HardwareWalletType::TREZOR),
        (false, true) => Some(HardwareWalletType::LEDGER),
        _ => None,
    }
}

async fn hardware_wallet(
    wallet_type: HardwareWalletType,
    chain_id: u64,
) -> Result<(EthereumWallet, Address)> {
    match wallet_type {
        HardwareWalletType::TREZOR => {
            let signer = TrezorSigner::new(TrezorHDPath::TrezorLive(0), Some(chain_id)).await?;
            let address = signer.address();
            Ok((EthereumWallet::from(signer), address))
        }
        HardwareWalletType::LEDGER => {
            let signer = LedgerSigner::new(HDPath::LedgerLive(0), Some(chain_id)).await?;
            let address = signer.address();
            Ok((EthereumWallet::from(signer), address))
        }
    }
}

async fn run_batch(
    wrapper: &ConfigWrapper,
    network_id: u64,
    network: &NetworkConfig,
    action: &str,
    mode: Mode,
    requests: Vec<TargetRequest>,
    wallet: Option<HardwareWalletType>,
) -> Result<BatchSummary> {
    let rpc_url = wrapper.get_rpc_url(network_id)?;
    let chain = RpcChainReader::new(ProviderBuilder::new().on_http(rpc_url.parse()?));
    let book = network.address_book(network_id);
    let implementations = network.implementation_source();
    let signers = network.signer_resolver();

    let (submitter, wallet_address): (Box<dyn TxSubmitter>, Option<Address>) = match wallet {
        Some(wallet_type) => {
            let (wallet, address) = hardware_wallet(wallet_type, network_id).await?;
            info!("Signing with hardware wallet account {}", address);
            let provider = ProviderBuilder::new().wallet(wallet).on_http(rpc_url.parse()?);
            (
                Box::new(RpcSubmitter::new(provider, network.confirmations())) as Box<dyn TxSubmitter>,
                Some(address),
            )
        }
        None => {
            // Start from a clean output directory on every run
            if Path::new(OUTPUT_DIR).exists() {
                fs::remove_dir_all(OUTPUT_DIR)?;
            }
            (Box::new(FileSubmitter::new(OUTPUT_DIR, network_id)?) as Box<dyn TxSubmitter>, None)
        }
    };

    let orchestrator = BatchOrchestrator::new(
        &chain,
        &book,
        &implementations,
        &signers,
        submitter.as_ref(),
    );
    if let Some(address) = wallet_address {
        orchestrator.check_sender(action, mode, address).await?;
    }
    orchestrator.run(action, mode, requests).await
}

fn print_summary(summary: &BatchSummary) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&summary.describe())?);
    if summary.failed() > 0 {
        warn!("{} target(s) failed, rerun once the cause is fixed", summary.failed());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::UpgradeVaults {
            network_id,
            mode,
            trezor,
            ledger,
        } => {
            let wrapper = ConfigWrapper::from_file(Some(&cli.config))?;
            let network = wrapper.network_config(*network_id)?;
            let requests = network
                .selection()
                .resolve(&network.address_book(*network_id))?
                .into_iter()
                .map(TargetRequest::Upgrade)
                .collect();

            let summary = run_batch(
                &wrapper,
                *network_id,
                &network,
                "upgrade_vaults",
                (*mode).into(),
                requests,
                wallet_type(*trezor, *ledger),
            )
            .await?;
            print_summary(&summary)?;
        }
        Commands::TransferOwnership {
            network_id,
            mode,
            new_owner,
            trezor,
            ledger,
        } => {
            let wrapper = ConfigWrapper::from_file(Some(&cli.config))?;
            let network = wrapper.network_config(*network_id)?;
            let requests = vec![TargetRequest::TransferOwnership {
                proxy_admin: network.proxy_admin,
                new_owner: network.new_owner(*new_owner)?,
            }];

            let summary = run_batch(
                &wrapper,
                *network_id,
                &network,
                "transfer_ownership",
                (*mode).into(),
                requests,
                wallet_type(*trezor, *ledger),
            )
            .await?;
            print_summary(&summary)?;
        }
        Commands::OperationId {
            target,
            data,
            label,
        } => {
            let operation = Operation::new(*target, data.clone(), label)
                .map_err(|e| eyre!("Invalid operation: {}", e))?;
            println!("{}", serde_json::to_string_pretty(&operation.describe())?);
        }
    }

    Ok(())
}
