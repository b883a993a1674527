use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::FaucetError;

/// Append-only audit log of raw event payloads.
///
/// The file is opened, written, flushed, and closed inside each
/// `append`; no handle survives across events. Payloads are written
/// byte-for-byte as received, with no delimiter added.
pub struct AuditSink {
    path: String,
}

impl AuditSink {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub async fn append(&self, raw: &str) -> Result<(), FaucetError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(raw.as_bytes()).await?;
        file.flush().await?;

        debug!(path = %self.path, bytes = raw.len(), "audit entry appended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn appends_payload_byte_for_byte() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tweets.txt");
        let sink = AuditSink::new(path.to_str().unwrap());

        let payload = r#"{"text":"send to 0xABCDEF0123456789ABCDEF0123456789ABCDEF01"}"#;
        sink.append(payload).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), payload);
    }

    #[tokio::test]
    async fn successive_appends_concatenate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tweets.txt");
        let sink = AuditSink::new(path.to_str().unwrap());

        sink.append("first").await.unwrap();
        sink.append("second").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "firstsecond");
    }

    #[tokio::test]
    async fn unwritable_path_surfaces_io_error() {
        let sink = AuditSink::new("/nonexistent-dir/tweets.txt");
        let err = sink.append("payload").await.unwrap_err();
        assert!(matches!(err, FaucetError::Audit(_)));
    }
}
