use ethers::types::{Address, H256, U256};
use serde::{Deserialize, Serialize};

/// One raw event pushed by the streaming service.
///
/// Owned by the listener for the duration of a single handler call;
/// nothing is retained between events.
#[derive(Debug, Clone)]
pub struct StreamEvent {
    /// Verbatim payload as delivered, assumed UTF-8 JSON.
    pub raw: String,
}

impl StreamEvent {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }
}

/// Fields of the event payload the pipeline cares about.
#[derive(Debug, Clone, Deserialize)]
pub struct TweetPayload {
    pub text: String,
}

/// Return value of the event handler, controls stream continuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinuationSignal {
    Continue,
    Stop,
}

/// How the stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamExit {
    /// The service signalled a rate limit (HTTP 420/429); the stream
    /// shuts down cleanly and must not be reopened.
    RateLimited,
    /// The handler asked to stop.
    Stopped,
}

impl StreamExit {
    pub fn as_str(&self) -> &str {
        match self {
            StreamExit::RateLimited => "rate limited",
            StreamExit::Stopped => "stopped by handler",
        }
    }
}

/// Mined receipt of a reward transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardReceipt {
    pub transaction_hash: H256,
    pub block_number: Option<u64>,
}

/// One successfully processed event, as handed to the reward callback.
#[derive(Debug, Clone)]
pub struct RewardOutcome {
    /// Running tweet number, starting at 0 like the console output.
    pub tweet_number: u64,
    /// Address extracted from the tweet text.
    pub receiver: Address,
    /// Receipt of the mined `tweetToken` transaction.
    pub receipt: RewardReceipt,
    /// Receiver's token balance after the reward.
    pub balance: U256,
    /// Tweet text, already decoded from the payload.
    pub text: String,
    /// ISO-8601 time the event finished processing.
    pub timestamp: Option<String>,
}
