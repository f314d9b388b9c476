use crate::error::StoreError;
use crate::models::submission::Submission;
use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

pub type Document = Map<String, Value>;

pub fn timestamp_key(now: DateTime<Local>) -> String {
    now.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

/// JSON record store. Each append is a full read-modify-write of the file.
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, raw: &str) -> Result<String, StoreError> {
        let submission = Submission::from_form(raw)?;
        let key = timestamp_key(Local::now());
        self.insert(key.clone(), submission).await?;
        Ok(key)
    }

    pub async fn load(&self) -> Result<Document, StoreError> {
        let data = match fs::read_to_string(&self.path).await {
            Ok(d) => d,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Document::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Value>(&data)? {
            Value::Object(doc) => Ok(doc),
            _ => Err(StoreError::NotAnObject),
        }
    }

    async fn insert(&self, key: String, submission: Submission) -> Result<(), StoreError> {
        let mut doc = self.load().await?;
        if doc.contains_key(&key) {
            warn!(key, "Timestamp key collision, overwriting record");
        }
        debug!(key, fields = submission.field_count(), "Appending record");
        doc.insert(key, serde_json::to_value(&submission)?);
        self.save(&doc).await
    }

    // Write to a sibling temp file, then rename over the target.
    async fn save(&self, doc: &Document) -> Result<(), StoreError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        doc.serialize(&mut ser)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.temp_path();
        fs::write(&tmp, &buf).await?;
        if let Err(e) = fs::rename(&tmp, &self.path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = std::ffi::OsString::from(".");
        name.push(self.path.file_name().unwrap_or(std::ffi::OsStr::new("data.json")));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
