use ethers::types::Address;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::FaucetError;

// Twitter app-only auth and filtered-stream endpoints
pub const DEFAULT_TOKEN_URL: &str = "https://api.twitter.com/oauth2/token";
pub const DEFAULT_STREAM_URL: &str = "https://stream.twitter.com/1.1/statuses/filter.json";

// Local node started by ganache-cli / hardhat
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

pub const DEFAULT_ABI_PATH: &str = "contractJSONABI.json";
pub const DEFAULT_AUDIT_LOG_PATH: &str = "tweets.txt";
pub const DEFAULT_TRACK_KEYWORD: &str = "giveMeTST2Token";
pub const DEFAULT_CONFIRMATION_TIMEOUT_SECS: u64 = 120;

/// Streaming-service credentials. Held in memory only, never logged.
#[derive(Clone)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    /// User-context token pair. App-only bearer authentication does not
    /// use it, so it is accepted but not required.
    pub access_token: Option<String>,
    pub access_token_secret: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").finish_non_exhaustive()
    }
}

/// Runtime configuration, sourced entirely from the environment.
#[derive(Debug, Clone)]
pub struct FaucetConfig {
    pub credentials: Credentials,
    /// Keywords the stream is filtered by.
    pub keywords: Vec<String>,
    /// Address of the deployed token contract.
    pub contract_address: Address,
    /// Path to the contract's JSON ABI file.
    pub abi_path: String,
    /// HTTP endpoint of the blockchain node.
    pub rpc_url: String,
    /// Index into the node's unlocked account list used as sender.
    pub sender_account_index: usize,
    /// Append-only audit log of raw payloads.
    pub audit_log_path: String,
    /// Upper bound on the wait for a mined reward transaction.
    pub confirmation_timeout: Duration,
    pub token_url: String,
    pub stream_url: String,
}

impl FaucetConfig {
    /// Load configuration from environment variables. Call `dotenv()`
    /// first if a `.env` file should be picked up.
    pub fn from_env() -> Result<Self, FaucetError> {
        let credentials = Credentials {
            consumer_key: require("TWITTER_CONSUMER_KEY")?,
            consumer_secret: require("TWITTER_CONSUMER_SECRET")?,
            access_token: env::var("TWITTER_ACCESS_TOKEN").ok(),
            access_token_secret: env::var("TWITTER_ACCESS_TOKEN_SECRET").ok(),
        };

        let keywords = parse_keywords(
            &env::var("TRACK_KEYWORDS").unwrap_or_else(|_| DEFAULT_TRACK_KEYWORD.to_string()),
        );
        if keywords.is_empty() {
            return Err(FaucetError::Config(
                "TRACK_KEYWORDS must contain at least one keyword".to_string(),
            ));
        }

        let contract_address = require("CONTRACT_ADDRESS").and_then(|s| {
            Address::from_str(&s)
                .map_err(|e| FaucetError::Config(format!("CONTRACT_ADDRESS is not an address: {e}")))
        })?;

        let sender_account_index = env::var("SENDER_ACCOUNT_INDEX")
            .unwrap_or_else(|_| "0".to_string())
            .parse()
            .map_err(|e| FaucetError::Config(format!("SENDER_ACCOUNT_INDEX must be a number: {e}")))?;

        let timeout_secs: u64 = env::var("CONFIRMATION_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_CONFIRMATION_TIMEOUT_SECS.to_string())
            .parse()
            .map_err(|e| {
                FaucetError::Config(format!("CONFIRMATION_TIMEOUT_SECS must be a number: {e}"))
            })?;
        if timeout_secs == 0 {
            return Err(FaucetError::Config(
                "CONFIRMATION_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            credentials,
            keywords,
            contract_address,
            abi_path: env::var("CONTRACT_ABI_PATH").unwrap_or_else(|_| DEFAULT_ABI_PATH.to_string()),
            rpc_url: env::var("RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string()),
            sender_account_index,
            audit_log_path: env::var("AUDIT_LOG_PATH")
                .unwrap_or_else(|_| DEFAULT_AUDIT_LOG_PATH.to_string()),
            confirmation_timeout: Duration::from_secs(timeout_secs),
            token_url: env::var("TOKEN_URL").unwrap_or_else(|_| DEFAULT_TOKEN_URL.to_string()),
            stream_url: env::var("STREAM_URL").unwrap_or_else(|_| DEFAULT_STREAM_URL.to_string()),
        })
    }
}

fn require(key: &str) -> Result<String, FaucetError> {
    env::var(key).map_err(|_| FaucetError::Config(format!("{key} must be set")))
}

/// Split a comma-separated keyword list, trimming whitespace and
/// dropping empty entries.
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(|k| k.to_string())
        .collect()
}
