use async_trait::async_trait;
use ethers::{
    abi::Abi,
    contract::Contract,
    providers::Middleware,
    types::{Address, U256},
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::FaucetError;
use crate::types::RewardReceipt;

const REWARD_METHOD: &str = "tweetToken";
const BALANCE_METHOD: &str = "balanceOf";

/// The seam between the orchestrator and the ledger.
///
/// One implementation talks to a real node; tests substitute a mock to
/// exercise the per-event pipeline without a chain.
#[async_trait]
pub trait RewardGateway: Send + Sync {
    /// Submit the reward call for `receiver` and wait for it to be
    /// mined. Exactly one on-chain state mutation per `Ok`.
    async fn reward(&self, receiver: Address) -> Result<RewardReceipt, FaucetError>;

    /// Read-only token balance query, no gas cost.
    async fn balance_of(&self, receiver: Address) -> Result<U256, FaucetError>;
}

/// Gateway onto the deployed token contract via an ethers middleware.
///
/// The sender is one of the node's unlocked accounts (ganache-style),
/// so the node signs; no local key handling.
pub struct ContractGateway<M> {
    contract: Contract<M>,
    sender: Address,
    confirmation_timeout: Duration,
}

impl<M: Middleware + 'static> ContractGateway<M> {
    /// Load the ABI, resolve the sender account from the node's account
    /// list, and bind the contract. All failures here are fatal.
    pub async fn connect(
        provider: Arc<M>,
        contract_address: Address,
        abi_path: &str,
        sender_account_index: usize,
        confirmation_timeout: Duration,
    ) -> Result<Self, FaucetError> {
        let raw = tokio::fs::read_to_string(abi_path)
            .await
            .map_err(|e| FaucetError::Abi {
                path: abi_path.to_string(),
                source: Box::new(e),
            })?;
        let abi: Abi = serde_json::from_str(&raw).map_err(|e| FaucetError::Abi {
            path: abi_path.to_string(),
            source: Box::new(e),
        })?;

        let accounts = provider
            .get_accounts()
            .await
            .map_err(|e| FaucetError::Rpc(format!("failed to list node accounts: {e}")))?;
        let sender = *accounts.get(sender_account_index).ok_or_else(|| {
            FaucetError::Rpc(format!(
                "sender account index {} out of range, node exposes {} account(s)",
                sender_account_index,
                accounts.len()
            ))
        })?;

        info!(contract = ?contract_address, sender = ?sender, "contract gateway ready");

        Ok(Self {
            contract: Contract::new(contract_address, abi, provider),
            sender,
            confirmation_timeout,
        })
    }
}

#[async_trait]
impl<M: Middleware + 'static> RewardGateway for ContractGateway<M> {
    async fn reward(&self, receiver: Address) -> Result<RewardReceipt, FaucetError> {
        let call = self
            .contract
            .method::<_, ()>(REWARD_METHOD, receiver)
            .map_err(|e| FaucetError::Contract {
                address: receiver,
                reason: format!("encoding {REWARD_METHOD} call: {e}"),
            })?
            .from(self.sender);

        let pending = call.send().await.map_err(|e| FaucetError::Contract {
            address: receiver,
            reason: e.to_string(),
        })?;

        let tx_hash = *pending;
        debug!(tx = ?tx_hash, receiver = ?receiver, "reward submitted, waiting for mining");

        let receipt = tokio::time::timeout(self.confirmation_timeout, pending)
            .await
            .map_err(|_| FaucetError::ConfirmationTimeout {
                address: receiver,
                timeout_secs: self.confirmation_timeout.as_secs(),
            })?
            .map_err(|e| FaucetError::Contract {
                address: receiver,
                reason: format!("waiting for receipt: {e}"),
            })?
            .ok_or_else(|| FaucetError::Contract {
                address: receiver,
                reason: "transaction dropped before mining".to_string(),
            })?;

        Ok(RewardReceipt {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number.map(|b| b.as_u64()),
        })
    }

    async fn balance_of(&self, receiver: Address) -> Result<U256, FaucetError> {
        self.contract
            .method::<_, U256>(BALANCE_METHOD, receiver)
            .map_err(|e| FaucetError::Balance {
                address: receiver,
                reason: format!("encoding {BALANCE_METHOD} call: {e}"),
            })?
            .call()
            .await
            .map_err(|e| FaucetError::Balance {
                address: receiver,
                reason: e.to_string(),
            })
    }
}
