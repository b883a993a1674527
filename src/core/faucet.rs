use ethers::types::Address;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{error, info};

use crate::core::extractor::extract_address;
use crate::core::gateway::RewardGateway;
use crate::core::sink::AuditSink;
use crate::error::FaucetError;
use crate::types::{ContinuationSignal, RewardOutcome, StreamEvent, TweetPayload};

pub type RewardCallback = Box<dyn Fn(&RewardOutcome) + Send + Sync>;

/// Per-event pipeline: parse payload, extract the receiver address,
/// reward it on-chain, query the new balance, append the raw payload to
/// the audit log.
///
/// Every pipeline failure is isolated to its event: logged with the raw
/// payload, then the stream continues. The audit entry is written only
/// after reward and balance query succeed, so entries correspond 1:1
/// with rewarded addresses.
pub struct TweetFaucet<G> {
    gateway: G,
    sink: AuditSink,
    tweet_count: AtomicU64,
    on_reward: Option<RewardCallback>,
}

impl<G: RewardGateway> TweetFaucet<G> {
    pub fn new(gateway: G, sink: AuditSink) -> Self {
        Self {
            gateway,
            sink,
            tweet_count: AtomicU64::new(0),
            on_reward: None,
        }
    }

    /// Observer invoked once per successfully rewarded event.
    pub fn with_reward_callback(mut self, callback: RewardCallback) -> Self {
        self.on_reward = Some(callback);
        self
    }

    /// Handler wired into the listener. Never asks the stream to stop;
    /// termination is the listener's rate-limit path alone.
    pub async fn process(&self, event: StreamEvent) -> ContinuationSignal {
        match self.handle_event(&event).await {
            Ok(outcome) => {
                info!(
                    tweet = outcome.tweet_number,
                    receiver = ?outcome.receiver,
                    balance = %outcome.balance,
                    tx = ?outcome.receipt.transaction_hash,
                    "reward completed"
                );
                if let Some(callback) = &self.on_reward {
                    callback(&outcome);
                }
            }
            Err(err) => {
                debug_assert!(err.is_recoverable());
                error!(error = %err, raw = %event.raw, "event dropped");
            }
        }
        ContinuationSignal::Continue
    }

    async fn handle_event(&self, event: &StreamEvent) -> Result<RewardOutcome, FaucetError> {
        let payload: TweetPayload = serde_json::from_str(&event.raw)?;
        let tweet_number = self.tweet_count.fetch_add(1, Ordering::Relaxed);

        let receiver = extract_address(&payload.text)
            .and_then(|s| Address::from_str(s).ok())
            .ok_or(FaucetError::NoAddress)?;

        let receipt = self.gateway.reward(receiver).await?;
        let balance = self.gateway.balance_of(receiver).await?;

        self.sink.append(&event.raw).await?;

        Ok(RewardOutcome {
            tweet_number,
            receiver,
            receipt,
            balance,
            text: payload.text,
            timestamp: Some(chrono::Utc::now().to_rfc3339()),
        })
    }
}
