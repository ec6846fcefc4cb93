//! JSON-Schema checks for devfiles.
//!
//! [`SchemaCache::get_or_compile`] fetches and compiles each URL once per
//! run. Concurrent first requests for the same URL wait on that URL's slot
//! instead of compiling in parallel.

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use jsonschema::{Draft, JSONSchema};
use parking_lot::Mutex;
use serde_json::Value;
use sha2::{Digest, Sha256};
use ureq::{Agent, AgentBuilder};
use url::Url;

use crate::error::HarnessError;

/// Largest schema document accepted from the network.
const MAX_SCHEMA_BYTES: u64 = 8 * 1024 * 1024;

/// Where schema documents come from.
pub trait SchemaSource: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, HarnessError>;
}

/// Fetches `http(s)` URLs with `ureq`; `file://` URLs and plain paths are
/// read from disk.
pub struct HttpSource {
    agent: Agent,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> Self {
        HttpSource {
            agent: AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

impl SchemaSource for HttpSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, HarnessError> {
        let fetch_error = |message: String| HarnessError::SchemaFetch {
            url: url.to_string(),
            message,
        };
        match Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
                let response = self
                    .agent
                    .get(parsed.as_str())
                    .call()
                    .map_err(|e| fetch_error(format!("HTTP request failed: {e}")))?;
                let mut buf = Vec::new();
                response
                    .into_reader()
                    .take(MAX_SCHEMA_BYTES)
                    .read_to_end(&mut buf)
                    .map_err(|e| fetch_error(format!("cannot read response: {e}")))?;
                Ok(buf)
            }
            Ok(parsed) if parsed.scheme() == "file" => {
                let path = parsed
                    .to_file_path()
                    .map_err(|_| fetch_error("not a local file URL".into()))?;
                fs::read(&path).map_err(|e| fetch_error(e.to_string()))
            }
            Ok(parsed) => Err(fetch_error(format!("unsupported scheme {}", parsed.scheme()))),
            Err(_) => fs::read(url).map_err(|e| fetch_error(e.to_string())),
        }
    }
}

/// A draft-7 schema ready to validate documents.
pub struct CompiledSchema {
    url: String,
    schema: JSONSchema,
}

impl CompiledSchema {
    pub fn compile(url: &str, document: &Value) -> Result<Self, HarnessError> {
        let schema = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(document)
            .map_err(|e| HarnessError::SchemaCompile {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(CompiledSchema {
            url: url.to_string(),
            schema,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// All validation messages for `instance`.
    pub fn validate(&self, instance: &Value) -> Result<(), Vec<String>> {
        self.schema
            .validate(instance)
            .map_err(|errors| errors.map(|e| e.to_string()).collect())
    }

    /// Check a YAML file against the schema.
    ///
    /// An empty `expected_message` means the file must be valid; otherwise
    /// validation must fail with a message containing it.
    pub fn check_file(&self, yaml_path: &Path, expected_message: &str) -> Result<(), HarnessError> {
        let text = fs::read_to_string(yaml_path).map_err(HarnessError::io(yaml_path))?;
        let document: Value = serde_yaml::from_str(&text).map_err(|e| HarnessError::Serialization {
            what: yaml_path.display().to_string(),
            message: e.to_string(),
        })?;
        let file = yaml_path.display();

        match (self.validate(&document), expected_message.is_empty()) {
            (Ok(()), true) => Ok(()),
            (Ok(()), false) => Err(HarnessError::SchemaValidation(format!(
                "FAIL : schema : {file} : devfile was valid - Expected Error not found : {expected_message}"
            ))),
            (Err(messages), true) => Err(HarnessError::SchemaValidation(format!(
                "FAIL : schema : {file} : Did not pass as expected : {}",
                messages.join("; ")
            ))),
            (Err(messages), false) => {
                if messages.iter().any(|m| m.contains(expected_message)) {
                    Ok(())
                } else {
                    Err(HarnessError::SchemaValidation(format!(
                        "FAIL : schema : {file} : Did not fail as expected : {expected_message} got : {}",
                        messages.join("; ")
                    )))
                }
            }
        }
    }
}

type Slot = Arc<Mutex<Option<Arc<CompiledSchema>>>>;

/// Compiled schemas keyed by URL, fetched at most once each.
pub struct SchemaCache {
    source: Box<dyn SchemaSource>,
    download_dir: Option<PathBuf>,
    slots: Mutex<HashMap<String, Slot>>,
    compiled: AtomicUsize,
}

impl SchemaCache {
    pub fn new(source: Box<dyn SchemaSource>) -> Self {
        SchemaCache {
            source,
            download_dir: None,
            slots: Mutex::new(HashMap::new()),
            compiled: AtomicUsize::new(0),
        }
    }

    /// Record fetched documents under `dir` as `<sha256(url)>.json`.
    /// The records are never read back; each cache fetches afresh.
    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = Some(dir.into());
        self
    }

    /// Number of fetch-and-compile passes performed so far.
    pub fn compiled_count(&self) -> usize {
        self.compiled.load(Ordering::SeqCst)
    }

    pub fn get_or_compile(&self, url: &str) -> Result<Arc<CompiledSchema>, HarnessError> {
        let slot = self.slots.lock().entry(url.to_string()).or_default().clone();
        let mut guard = slot.lock();
        if let Some(schema) = guard.as_ref() {
            return Ok(Arc::clone(schema));
        }

        let bytes = self.load(url)?;
        let document: Value = serde_json::from_slice(&bytes).map_err(|e| HarnessError::SchemaCompile {
            url: url.to_string(),
            message: format!("not JSON: {e}"),
        })?;
        let schema = Arc::new(CompiledSchema::compile(url, &document)?);
        self.compiled.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(url, "compiled schema");
        *guard = Some(Arc::clone(&schema));
        Ok(schema)
    }

    /// Always fetches; the download directory only records what was used.
    fn load(&self, url: &str) -> Result<Vec<u8>, HarnessError> {
        let bytes = self.source.fetch(url)?;
        let Some(dir) = &self.download_dir else {
            return Ok(bytes);
        };
        let path = dir.join(format!("{}.json", sha256_hex(url)));
        let stored = fs::create_dir_all(dir).and_then(|_| fs::write(&path, &bytes));
        if let Err(e) = stored {
            tracing::warn!(path = %path.display(), error = %e, "cannot keep schema download");
        }
        Ok(bytes)
    }
}

fn sha256_hex(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    format!("{:x}", hasher.finalize())
}
