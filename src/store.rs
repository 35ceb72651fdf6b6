//! Reference JSONL-backed sink adapters.
//!
//! Production deployments put a relational store behind the sink traits; this
//! append-only file store is what the CLI binary and the integration tests
//! run against.

use crate::category::Category;
use crate::event::Context;
use crate::severity::Severity;
use crate::sink::{
    AuditError, GeneralAuditSink, RecordId, TransactionAuditSink, UserAuditSink,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

/// Append-only JSONL audit store. One record per line; record ids are
/// allocated sequentially and are opaque to the router.
pub struct JsonlAuditStore {
    path: PathBuf,
    file: Mutex<File>,
    next_id: AtomicI64,
}

impl JsonlAuditStore {
    pub async fn create(path: impl Into<PathBuf>) -> Result<Self, AuditError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        debug!(path = %path.display(), "Opened audit store");

        Ok(Self {
            path,
            file: Mutex::new(file),
            next_id: AtomicI64::new(1),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn flush(&self) -> Result<(), AuditError> {
        let mut file = self.file.lock().await;
        file.flush().await?;
        Ok(())
    }

    async fn append(&self, mut record: Value) -> Result<RecordId, AuditError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        record["id"] = json!(id);
        record["recorded_at"] = json!(chrono::Utc::now().to_rfc3339());

        let line = serde_json::to_string(&record)?;
        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes()).await?;
        file.write_all(b"\n").await?;
        Ok(id)
    }
}

#[async_trait]
impl UserAuditSink for JsonlAuditStore {
    async fn log_user_event(
        &self,
        category: Category,
        action: &str,
        message: &str,
        context: &Context,
        user_id: Option<i64>,
        level: Severity,
    ) -> Result<RecordId, AuditError> {
        self.append(json!({
            "sink": "user",
            "category": category,
            "action": action,
            "message": message,
            "context": context,
            "user_id": user_id,
            "level": level,
        }))
        .await
    }
}

#[async_trait]
impl TransactionAuditSink for JsonlAuditStore {
    async fn log_event(
        &self,
        category: Category,
        message: &str,
        context: &Context,
        user_id: Option<i64>,
        object_id: Option<i64>,
        level: Severity,
    ) -> Result<RecordId, AuditError> {
        self.append(json!({
            "sink": "transaction",
            "category": category,
            "message": message,
            "context": context,
            "user_id": user_id,
            "object_id": object_id,
            "level": level,
        }))
        .await
    }
}

#[async_trait]
impl GeneralAuditSink for JsonlAuditStore {
    async fn create_log_entry(
        &self,
        category: Category,
        message: &str,
        context: &Context,
        user_id: Option<i64>,
        object_id: Option<i64>,
        ip_address: Option<&str>,
        level: Severity,
    ) -> Result<RecordId, AuditError> {
        self.append(json!({
            "sink": "general",
            "category": category,
            "message": message,
            "context": context,
            "user_id": user_id,
            "object_id": object_id,
            "ip_address": ip_address,
            "level": level,
        }))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn allocates_sequential_record_ids() {
        let dir = TempDir::new().unwrap();
        let store = JsonlAuditStore::create(dir.path().join("user.jsonl"))
            .await
            .unwrap();

        let context = Context::new();
        let first = store
            .log_user_event(Category::Auth, "auth", "login ok", &context, Some(7), Severity::Info)
            .await
            .unwrap();
        let second = store
            .log_user_event(Category::User, "update", "profile", &context, Some(7), Severity::Info)
            .await
            .unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }

    #[tokio::test]
    async fn writes_one_json_record_per_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tx.jsonl");
        let store = JsonlAuditStore::create(&path).await.unwrap();

        let mut context = Context::new();
        context.insert("amount".to_string(), json!(50));

        TransactionAuditSink::log_event(
            &store,
            Category::Payment,
            "refund issued",
            &context,
            Some(3),
            Some(101),
            Severity::Info,
        )
        .await
        .unwrap();
        store.flush().await.unwrap();

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);

        let record: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(record["sink"], json!("transaction"));
        assert_eq!(record["category"], json!("payment"));
        assert_eq!(record["object_id"], json!(101));
        assert_eq!(record["context"]["amount"], json!(50));
        assert_eq!(record["id"], json!(1));
        assert!(record["recorded_at"].is_string());
    }

    #[tokio::test]
    async fn general_record_carries_ip_address() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("general.jsonl");
        let store = JsonlAuditStore::create(&path).await.unwrap();

        store
            .create_log_entry(
                Category::Security,
                "brute force suspected",
                &Context::new(),
                None,
                None,
                Some("203.0.113.9"),
                Severity::Critical,
            )
            .await
            .unwrap();
        store.flush().await.unwrap();

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        let record: Value = serde_json::from_str(content.lines().next().unwrap()).unwrap();
        assert_eq!(record["ip_address"], json!("203.0.113.9"));
        assert_eq!(record["level"], json!("critical"));
    }

    #[tokio::test]
    async fn creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("dir").join("audit.jsonl");
        let store = JsonlAuditStore::create(&path).await.unwrap();
        assert_eq!(store.path(), path);
        assert!(path.exists());
    }
}
