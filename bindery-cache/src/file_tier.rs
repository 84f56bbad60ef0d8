//! Durable file tier: one JSON envelope per key under a base directory.
//!
//! Every operation carries a deadline (checked at attempt boundaries, since
//! blocking `fs` calls cannot be interrupted mid-flight) and retries once
//! with backoff; any failure is reported to the engine, which degrades to a
//! cache miss rather than failing the assembly.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::warn;

use bindery_core::errors::{BinderyResult, CacheError};
use bindery_core::models::cache_entry::EntryMetadata;

/// On-disk representation of one entry. Payload is the post-hook bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEnvelope {
    pub key: String,
    pub metadata: EntryMetadata,
    pub tags: Vec<String>,
    pub dependencies: Vec<String>,
    pub payload_b64: String,
}

impl StoredEnvelope {
    pub fn payload(&self) -> BinderyResult<Vec<u8>> {
        BASE64.decode(&self.payload_b64).map_err(|e| {
            CacheError::Codec {
                reason: format!("payload base64: {e}"),
            }
            .into()
        })
    }

    pub fn encode_payload(bytes: &[u8]) -> String {
        BASE64.encode(bytes)
    }
}

pub struct FileTier {
    dir: PathBuf,
    timeout: Duration,
    backoff: Duration,
}

impl FileTier {
    pub fn new(dir: &Path, timeout: Duration, backoff: Duration) -> BinderyResult<Self> {
        fs::create_dir_all(dir).map_err(|e| CacheError::FileIo {
            key: String::new(),
            reason: format!("create {}: {e}", dir.display()),
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
            timeout,
            backoff,
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Run `op`, retrying once with backoff. The deadline is enforced at
    /// attempt boundaries: a blocking `fs` call cannot be interrupted
    /// mid-flight, so an operation stuck inside the kernel is only reported
    /// as a timeout once it returns. The retry is skipped when the first
    /// attempt already exhausted the deadline.
    fn with_retry<T>(
        &self,
        key: &str,
        op: impl Fn() -> std::io::Result<T>,
    ) -> BinderyResult<T> {
        let start = Instant::now();
        let result = match op() {
            Ok(v) => Ok(v),
            Err(first) => {
                if start.elapsed() > self.timeout {
                    return Err(CacheError::FileTimeout {
                        elapsed_ms: start.elapsed().as_millis() as u64,
                    }
                    .into());
                }
                warn!(key, error = %first, "file tier operation failed, retrying once");
                std::thread::sleep(self.backoff);
                op()
            }
        };
        let elapsed = start.elapsed();
        if elapsed > self.timeout {
            return Err(CacheError::FileTimeout {
                elapsed_ms: elapsed.as_millis() as u64,
            }
            .into());
        }
        result.map_err(|e| {
            CacheError::FileIo {
                key: key.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    pub fn write(&self, envelope: &StoredEnvelope) -> BinderyResult<()> {
        let json = serde_json::to_vec(envelope)?;
        let path = self.path_for(&envelope.key);
        self.with_retry(&envelope.key, || fs::write(&path, &json))
    }

    /// `Ok(None)` when no file exists for the key.
    pub fn read(&self, key: &str) -> BinderyResult<Option<StoredEnvelope>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = self.with_retry(key, || fs::read(&path))?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    pub fn delete(&self, key: &str) -> BinderyResult<()> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(());
        }
        self.with_retry(key, || fs::remove_file(&path))
    }

    /// All keys currently stored in this tier.
    pub fn keys(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        entries
            .filter_map(|e| e.ok())
            .filter_map(|e| {
                let name = e.file_name().into_string().ok()?;
                name.strip_suffix(".json").map(String::from)
            })
            .collect()
    }

    pub fn clear(&self) {
        for key in self.keys() {
            let _ = self.delete(&key);
        }
    }
}
