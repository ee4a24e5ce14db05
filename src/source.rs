//! Where JSON content comes from.
//!
//! A [`DataSource`] returns the raw text of a named data file. Three are
//! provided: a directory on disk (the normal build), an HTTP base URL (a
//! site whose data is served elsewhere), and an in-memory map for tests and
//! embedding.
//!
//! Every failure, whatever its cause, means the same thing to callers: the
//! data is unavailable and the section it feeds is not rendered. Failures
//! are logged once, here at the fetch boundary; nothing is retried.

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("{name}: IO error: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{name}: HTTP error! status: {status}")]
    Status { name: String, status: u16 },
    #[error("{name}: request failed: {source}")]
    Http {
        name: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{name}: invalid JSON: {source}")]
    Json {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A provider of named JSON documents.
pub trait DataSource: Send + Sync {
    /// Raw text of `name` (e.g. `navigation.json`).
    fn fetch(&self, name: &str) -> Result<String, DataError>;

    /// Human-readable location of `name`, for logs and reports.
    fn locate(&self, name: &str) -> String;
}

/// Data files in a directory. A missing file behaves like a 404.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DataSource for DirSource {
    fn fetch(&self, name: &str) -> Result<String, DataError> {
        fs::read_to_string(self.root.join(name)).map_err(|source| match source.kind() {
            ErrorKind::NotFound => DataError::Status {
                name: name.to_string(),
                status: 404,
            },
            _ => DataError::Io {
                name: name.to_string(),
                source,
            },
        })
    }

    fn locate(&self, name: &str) -> String {
        self.root.join(name).display().to_string()
    }
}

/// Data files served over HTTP under a base URL.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base: String,
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(base: impl Into<String>) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|source| DataError::Http {
                name: "client".to_string(),
                source,
            })?;
        Ok(Self {
            base: base.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, name: &str) -> String {
        format!("{}/{}", self.base, name.trim_start_matches('/'))
    }
}

impl DataSource for HttpSource {
    fn fetch(&self, name: &str) -> Result<String, DataError> {
        let http_err = |source| DataError::Http {
            name: name.to_string(),
            source,
        };
        let response = self.client.get(self.url(name)).send().map_err(http_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Status {
                name: name.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().map_err(http_err)
    }

    fn locate(&self, name: &str) -> String {
        self.url(name)
    }
}

/// Data files held in memory. Entries can also stand in for a failing
/// server by carrying a status code instead of a body.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, Result<String, u16>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, name: &str, body: impl Into<String>) -> Self {
        self.files.insert(name.to_string(), Ok(body.into()));
        self
    }

    pub fn with_status(mut self, name: &str, status: u16) -> Self {
        self.files.insert(name.to_string(), Err(status));
        self
    }
}

impl DataSource for MemorySource {
    fn fetch(&self, name: &str) -> Result<String, DataError> {
        match self.files.get(name) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => Err(DataError::Status {
                name: name.to_string(),
                status: *status,
            }),
            None => Err(DataError::Status {
                name: name.to_string(),
                status: 404,
            }),
        }
    }

    fn locate(&self, name: &str) -> String {
        format!("memory:{name}")
    }
}

/// Fetch and decode one data file, logging the failure if there is one.
///
/// Callers treat `Err` as "no data": the error is already logged and only
/// returned so it can be counted or reported.
pub fn load_json<T: DeserializeOwned>(source: &dyn DataSource, name: &str) -> Result<T, DataError> {
    let result = source.fetch(name).and_then(|text| {
        serde_json::from_str(&text).map_err(|e| DataError::Json {
            name: name.to_string(),
            source: e,
        })
    });
    if let Err(err) = &result {
        tracing::error!(location = %source.locate(name), "Error loading JSON: {err}");
    }
    result
}
