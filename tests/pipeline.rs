//! Per-event pipeline behavior against a mock gateway: reward and audit
//! on success, drop-and-continue on every per-event failure.

use async_trait::async_trait;
use ethers::types::{Address, H256, U256};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tweet_faucet::core::faucet::TweetFaucet;
use tweet_faucet::core::gateway::RewardGateway;
use tweet_faucet::core::sink::AuditSink;
use tweet_faucet::error::FaucetError;
use tweet_faucet::types::{ContinuationSignal, RewardReceipt, StreamEvent};

const ADDR: &str = "0xABCDEF0123456789ABCDEF0123456789ABCDEF01";

/// Records reward calls; the test keeps a clone of `rewards` since the
/// faucet takes ownership of the gateway itself.
#[derive(Default)]
struct MockGateway {
    rewards: Arc<Mutex<Vec<Address>>>,
    fail_next_rewards: Arc<AtomicUsize>,
}

impl MockGateway {
    fn new() -> (Self, Arc<Mutex<Vec<Address>>>) {
        let gateway = Self::default();
        let rewards = gateway.rewards.clone();
        (gateway, rewards)
    }

    fn failing_once() -> (Self, Arc<Mutex<Vec<Address>>>) {
        let (gateway, rewards) = Self::new();
        gateway.fail_next_rewards.store(1, Ordering::SeqCst);
        (gateway, rewards)
    }
}

#[async_trait]
impl RewardGateway for MockGateway {
    async fn reward(&self, receiver: Address) -> Result<RewardReceipt, FaucetError> {
        if self
            .fail_next_rewards
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(FaucetError::Contract {
                address: receiver,
                reason: "network unreachable".to_string(),
            });
        }
        self.rewards.lock().unwrap().push(receiver);
        Ok(RewardReceipt {
            transaction_hash: H256::zero(),
            block_number: Some(1),
        })
    }

    async fn balance_of(&self, _receiver: Address) -> Result<U256, FaucetError> {
        Ok(U256::from(self.rewards.lock().unwrap().len()))
    }
}

fn audit_path(dir: &tempfile::TempDir) -> String {
    dir.path().join("tweets.txt").to_str().unwrap().to_string()
}

#[tokio::test]
async fn rewarded_tweet_appends_exactly_its_payload() {
    let dir = tempfile::tempdir().unwrap();
    let path = audit_path(&dir);
    let (gateway, _) = MockGateway::new();
    let faucet = TweetFaucet::new(gateway, AuditSink::new(path.clone()));

    let payload = format!(r#"{{"text":"send to {ADDR} please"}}"#);
    let signal = faucet.process(StreamEvent::new(payload.clone())).await;

    assert_eq!(signal, ContinuationSignal::Continue);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), payload);
}

#[tokio::test]
async fn reward_is_called_once_with_extracted_address() {
    let dir = tempfile::tempdir().unwrap();
    let (gateway, rewards) = MockGateway::new();
    let faucet = TweetFaucet::new(gateway, AuditSink::new(audit_path(&dir)));

    faucet
        .process(StreamEvent::new(format!(r#"{{"text":"to {ADDR}"}}"#)))
        .await;

    let expected = Address::from_str(ADDR).unwrap();
    assert_eq!(*rewards.lock().unwrap(), vec![expected]);
}

#[tokio::test]
async fn tweet_without_address_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let path = audit_path(&dir);
    let (gateway, rewards) = MockGateway::new();
    let faucet = TweetFaucet::new(gateway, AuditSink::new(path.clone()));

    let signal = faucet
        .process(StreamEvent::new(r#"{"text":"no address here"}"#))
        .await;

    assert_eq!(signal, ContinuationSignal::Continue);
    assert!(rewards.lock().unwrap().is_empty());
    assert!(!std::path::Path::new(&path).exists());
}

#[tokio::test]
async fn malformed_json_is_dropped_and_stream_continues() {
    let dir = tempfile::tempdir().unwrap();
    let path = audit_path(&dir);
    let (gateway, rewards) = MockGateway::new();
    let faucet = TweetFaucet::new(gateway, AuditSink::new(path.clone()));

    let signal = faucet.process(StreamEvent::new("not json at all")).await;
    assert_eq!(signal, ContinuationSignal::Continue);
    assert!(rewards.lock().unwrap().is_empty());
    assert!(!std::path::Path::new(&path).exists());

    // Next event is still processed normally.
    let payload = format!(r#"{{"text":"{ADDR}"}}"#);
    faucet.process(StreamEvent::new(payload.clone())).await;
    assert_eq!(std::fs::read_to_string(&path).unwrap(), payload);
}

#[tokio::test]
async fn gateway_failure_writes_no_audit_entry_and_next_event_proceeds() {
    let dir = tempfile::tempdir().unwrap();
    let path = audit_path(&dir);
    let (gateway, rewards) = MockGateway::failing_once();
    let faucet = TweetFaucet::new(gateway, AuditSink::new(path.clone()));

    let failing = format!(r#"{{"text":"first {ADDR}"}}"#);
    let signal = faucet.process(StreamEvent::new(failing)).await;
    assert_eq!(signal, ContinuationSignal::Continue);
    assert!(rewards.lock().unwrap().is_empty());
    assert!(!std::path::Path::new(&path).exists());

    let ok = format!(r#"{{"text":"second {ADDR}"}}"#);
    faucet.process(StreamEvent::new(ok.clone())).await;
    assert_eq!(rewards.lock().unwrap().len(), 1);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), ok);
}

#[tokio::test]
async fn duplicate_addresses_are_not_deduplicated() {
    let dir = tempfile::tempdir().unwrap();
    let path = audit_path(&dir);
    let (gateway, rewards) = MockGateway::new();
    let faucet = TweetFaucet::new(gateway, AuditSink::new(path.clone()));

    let payload = format!(r#"{{"text":"{ADDR}"}}"#);
    faucet.process(StreamEvent::new(payload.clone())).await;
    faucet.process(StreamEvent::new(payload.clone())).await;

    // Two reward calls, two audit entries.
    assert_eq!(rewards.lock().unwrap().len(), 2);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        format!("{payload}{payload}")
    );
}
