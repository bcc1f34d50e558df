use std::{future::Future, io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Somewhere a coordinate file can be fetched from by name.
pub trait CoordinateSource {
    fn fetch(&self, name: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Files in a local directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl CoordinateSource for DirSource {
    async fn fetch(&self, name: &str) -> Result<String, FetchError> {
        let path = self.root.join(name);
        match tokio::fs::read_to_string(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(FetchError::NotFound(path.display().to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                Err(FetchError::InvalidData(e.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Files served below an HTTP base url.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), name)
    }
}

impl CoordinateSource for HttpSource {
    async fn fetch(&self, name: &str) -> Result<String, FetchError> {
        let url = self.url(name);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(url));
        }

        if !response.status().is_success() {
            return Err(FetchError::Network(format!("HTTP {}", response.status())));
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::InvalidData(e.to_string()))
    }
}

/// The source picked by configuration.
#[derive(Debug, Clone)]
pub enum Source {
    Dir(DirSource),
    Http(HttpSource),
}

impl CoordinateSource for Source {
    async fn fetch(&self, name: &str) -> Result<String, FetchError> {
        match self {
            Source::Dir(x) => x.fetch(name).await,
            Source::Http(x) => x.fetch(name).await,
        }
    }
}
