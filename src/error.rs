use ethers::types::Address;
use thiserror::Error;

/// Faucet error taxonomy.
///
/// Fatal variants abort the process before streaming begins; recoverable
/// variants are logged per event and the stream keeps running. The split
/// is encoded in [`FaucetError::is_recoverable`] rather than a broad
/// catch clause at the call site.
#[derive(Error, Debug)]
pub enum FaucetError {
    /// Missing or unparsable configuration value (fatal).
    #[error("configuration error: {0}")]
    Config(String),

    /// Bearer-token exchange with the streaming service failed (fatal).
    #[error("stream authentication failed: {0}")]
    Auth(String),

    /// Contract ABI file could not be read or parsed (fatal).
    #[error("failed to load contract ABI from '{path}'")]
    Abi {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Provider setup or sender-account resolution failed (fatal).
    #[error("RPC setup failed: {0}")]
    Rpc(String),

    /// Event payload was not the expected JSON shape.
    #[error("malformed event payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// No `0x` + 40-hex address in the event text.
    #[error("no receiver address found in event text")]
    NoAddress,

    /// The reward transaction was rejected or dropped.
    #[error("reward call failed for {address}: {reason}")]
    Contract { address: Address, reason: String },

    /// The reward transaction was not mined within the configured window.
    #[error("no confirmation for {address} within {timeout_secs}s")]
    ConfirmationTimeout { address: Address, timeout_secs: u64 },

    /// The read-only balance query failed.
    #[error("balance query failed for {address}: {reason}")]
    Balance { address: Address, reason: String },

    /// Appending to the audit log failed.
    #[error("audit log append failed")]
    Audit(#[from] std::io::Error),
}

impl FaucetError {
    /// Whether this error is isolated to one event. Recoverable errors
    /// are logged with the raw payload and the stream continues;
    /// everything else aborts startup.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FaucetError::MalformedPayload(_)
                | FaucetError::NoAddress
                | FaucetError::Contract { .. }
                | FaucetError::ConfirmationTimeout { .. }
                | FaucetError::Balance { .. }
                | FaucetError::Audit(_)
        )
    }
}
