//! # Tweet Faucet
//!
//! Listens to a keyword-filtered tweet stream, extracts the first
//! `0x` + 40-hex address from each matching tweet, and calls a token
//! contract's `tweetToken` entry point to reward that address. Raw
//! payloads of successfully rewarded tweets are appended to an
//! append-only audit file.
//!
//! ## Features
//!
//! - App-only bearer authentication against the streaming service
//! - Reconnecting line-delimited stream transport with explicit
//!   rate-limit shutdown (HTTP 420/429)
//! - Syntactic address extraction, first match wins
//! - Reward + balance query through an ethers contract, node-signed
//! - Bounded wait for transaction confirmation
//! - Per-event error isolation: one bad tweet never stops the stream
//!
//! ## Example
//!
//! ```rust,no_run
//! use tweet_faucet::{FaucetBuilder, FaucetConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = FaucetConfig::from_env()?;
//!
//!     let exit = FaucetBuilder::new(config)
//!         .on_reward(|outcome| {
//!             println!("rewarded {:?}", outcome.receiver);
//!         })
//!         .run()
//!         .await?;
//!
//!     println!("stream closed: {}", exit.as_str());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod display;
pub mod error;
pub mod types;

use ethers::providers::{Http, Provider};
use std::sync::Arc;

pub use config::FaucetConfig;
pub use error::FaucetError;
pub use types::{ContinuationSignal, RewardOutcome, StreamEvent, StreamExit};

use crate::core::auth::StreamAuthenticator;
use crate::core::faucet::{RewardCallback, TweetFaucet};
use crate::core::gateway::ContractGateway;
use crate::core::listener::TweetListener;
use crate::core::sink::AuditSink;

/// Builder for configuring and starting the faucet pipeline.
pub struct FaucetBuilder {
    config: FaucetConfig,
    on_reward: Option<RewardCallback>,
}

impl FaucetBuilder {
    pub fn new(config: FaucetConfig) -> Self {
        Self {
            config,
            on_reward: None,
        }
    }

    /// Register an observer called once per successfully rewarded
    /// tweet. The bin wires the colored console formatter through here.
    pub fn on_reward<F>(mut self, callback: F) -> Self
    where
        F: Fn(&RewardOutcome) + Send + Sync + 'static,
    {
        self.on_reward = Some(Box::new(callback));
        self
    }

    /// Authenticate, connect the contract gateway, and stream until the
    /// service rate-limits us.
    ///
    /// Startup failures (authentication, ABI load, RPC setup) are
    /// returned as errors; a rate-limit shutdown is a clean
    /// [`StreamExit::RateLimited`].
    pub async fn run(self) -> Result<StreamExit, FaucetError> {
        let config = self.config;

        let authenticator =
            StreamAuthenticator::new(config.credentials.clone(), config.token_url.clone());
        let session = authenticator.authenticate().await?;

        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|e| FaucetError::Rpc(format!("invalid RPC url '{}': {e}", config.rpc_url)))?;
        let gateway = ContractGateway::connect(
            Arc::new(provider),
            config.contract_address,
            &config.abi_path,
            config.sender_account_index,
            config.confirmation_timeout,
        )
        .await?;

        let mut faucet = TweetFaucet::new(gateway, AuditSink::new(config.audit_log_path.clone()));
        if let Some(callback) = self.on_reward {
            faucet = faucet.with_reward_callback(callback);
        }

        let listener = TweetListener::new(config.stream_url.clone());
        let faucet = &faucet;
        listener
            .run(&session, &config.keywords, move |event| {
                faucet.process(event)
            })
            .await
    }
}
