use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Stored records expire this many days after creation
pub const RECORD_TTL_DAYS: i64 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Audit,
    Crawl,
    Keywords,
}

impl RecordKind {
    fn as_str(self) -> &'static str {
        match self {
            RecordKind::Audit => "audit",
            RecordKind::Crawl => "crawl",
            RecordKind::Keywords => "keywords",
        }
    }
}

/// A finished audit, crawl or keyword lookup handed to storage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    pub kind: RecordKind,
    /// URL for audits and crawls, domain for keyword lookups
    pub target: String,
    pub created_at: String,
    pub expires_at: String,
    pub payload: serde_json::Value,
}

impl StoredRecord {
    pub fn new<T: Serialize>(kind: RecordKind, target: &str, payload: &T) -> Result<Self> {
        Self::at(kind, target, payload, Utc::now())
    }

    pub fn at<T: Serialize>(
        kind: RecordKind,
        target: &str,
        payload: &T,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        Ok(Self {
            kind,
            target: target.to_string(),
            created_at: now.to_rfc3339(),
            expires_at: (now + Duration::days(RECORD_TTL_DAYS)).to_rfc3339(),
            payload: serde_json::to_value(payload).context("Failed to serialize record")?,
        })
    }
}

/// Storage backend for finished records
pub trait ReportStore: Send + Sync {
    fn save(&self, record: &StoredRecord) -> Result<()>;
}

/// Writes each record as a pretty-printed JSON file in one directory
pub struct JsonFileStore {
    dir: PathBuf,
    sequence: AtomicU64,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create store directory: {}", dir.display()))?;
        Ok(Self {
            dir,
            sequence: AtomicU64::new(0),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ReportStore for JsonFileStore {
    fn save(&self, record: &StoredRecord) -> Result<()> {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let filename = format!(
            "{}-{}-{}.json",
            record.kind.as_str(),
            Utc::now().format("%Y%m%dT%H%M%S%3f"),
            sequence
        );
        let path = self.dir.join(filename);

        let json = serde_json::to_string_pretty(record)?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write record: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "Record stored");
        Ok(())
    }
}

/// Saves a record if a store is configured. The write runs on the blocking
/// pool; failures are logged and never reach the caller.
pub async fn persist_best_effort<T: Serialize>(
    store: Option<Arc<dyn ReportStore>>,
    kind: RecordKind,
    target: &str,
    payload: &T,
) {
    let Some(store) = store else {
        return;
    };

    let record = match StoredRecord::new(kind, target, payload) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!(target = %target, error = %e, "Record save skipped");
            return;
        }
    };

    match tokio::task::spawn_blocking(move || store.save(&record)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!(target = %target, error = %e, "Record save skipped"),
        Err(e) => tracing::warn!(target = %target, error = %e, "Record save task aborted"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    struct FailingStore;

    #[derive(Default)]
    struct ThreadRecordingStore {
        saved_on: std::sync::Mutex<Option<std::thread::ThreadId>>,
    }

    impl ReportStore for ThreadRecordingStore {
        fn save(&self, _record: &StoredRecord) -> Result<()> {
            *self.saved_on.lock().unwrap() = Some(std::thread::current().id());
            Ok(())
        }
    }

    impl ReportStore for FailingStore {
        fn save(&self, _record: &StoredRecord) -> Result<()> {
            anyhow::bail!("database unavailable")
        }
    }

    #[test]
    fn test_record_expires_after_ninety_days() {
        let now = DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let record =
            StoredRecord::at(RecordKind::Crawl, "https://example.com", &json!({}), now)
                .unwrap();

        assert_eq!(record.created_at, "2026-01-01T00:00:00+00:00");
        assert_eq!(record.expires_at, "2026-04-01T00:00:00+00:00");
    }

    #[tokio::test]
    async fn test_json_file_store_writes_one_file_per_record() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(JsonFileStore::new(dir.path().join("records")).unwrap());
        let shared: Arc<dyn ReportStore> = store.clone();

        persist_best_effort(
            Some(shared.clone()),
            RecordKind::Audit,
            "https://a.com",
            &json!({"a": 1}),
        )
        .await;
        persist_best_effort(Some(shared), RecordKind::Audit, "https://b.com", &json!({"b": 2}))
            .await;

        let files: Vec<_> = fs::read_dir(store.dir()).unwrap().collect();
        assert_eq!(files.len(), 2);

        let first = files[0].as_ref().unwrap().path();
        let record: StoredRecord =
            serde_json::from_str(&fs::read_to_string(first).unwrap()).unwrap();
        assert_eq!(record.kind, RecordKind::Audit);
    }

    #[tokio::test]
    async fn test_persist_best_effort_swallows_failures() {
        persist_best_effort(
            Some(Arc::new(FailingStore) as Arc<dyn ReportStore>),
            RecordKind::Crawl,
            "https://a.com",
            &json!({}),
        )
        .await;
        persist_best_effort(None, RecordKind::Crawl, "https://a.com", &json!({})).await;
    }

    #[tokio::test]
    async fn test_save_runs_off_the_runtime_thread() {
        let store = Arc::new(ThreadRecordingStore::default());

        persist_best_effort(
            Some(store.clone() as Arc<dyn ReportStore>),
            RecordKind::Crawl,
            "https://a.com",
            &json!({}),
        )
        .await;

        let saved_on = store.saved_on.lock().unwrap().expect("save should have run");
        assert_ne!(saved_on, std::thread::current().id());
    }
}
