//! Bundle sources: a remote branch archive or a local directory
//!
//! Remote bundles are downloaded in full and decoded in memory. Local bundles
//! are enumerated up front and read lazily.

use super::reader::{ArchiveReader, DirectoryReader};
use super::Bundle;
use crate::library::LibraryConfig;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors that can occur while materializing or reading a bundle
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("falha na requisição para {url}: {source}")]
    Fetch {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("download falhou com status {status}: {url}")]
    Status { url: Url, status: u16 },

    #[error("arquivo ZIP inválido: {0}")]
    Decode(#[source] zip::result::ZipError),

    #[error("diretório de componentes não encontrado: {}", .0.display())]
    NotFound(PathBuf),

    #[error("falha ao ler {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("repositório inválido '{0}' (esperado: dono/repositorio)")]
    Repository(String),

    #[error("URL base inválida '{0}'")]
    Host(String),
}

/// A remote repository branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRef {
    pub host: Url,
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

impl RemoteRef {
    pub fn new(host: Url, repository: &str, branch: impl Into<String>) -> Result<Self, SourceError> {
        let (owner, repo) = parse_repository(repository)?;
        Ok(Self {
            host,
            owner,
            repo,
            branch: branch.into(),
        })
    }

    /// Resolve the remote from the product defaults and their environment overrides
    pub fn from_config<C: LibraryConfig>(config: &C) -> Result<Self, SourceError> {
        let host = env_or(config.host_env(), config.default_host());
        let repository = env_or(config.repository_env(), config.default_repository());
        let branch = env_or(config.branch_env(), config.default_branch());

        let host = Url::parse(&host).map_err(|_| SourceError::Host(host.clone()))?;
        Self::new(host, &repository, branch)
    }

    pub fn with_repository(mut self, repository: &str) -> Result<Self, SourceError> {
        let (owner, repo) = parse_repository(repository)?;
        self.owner = owner;
        self.repo = repo;
        Ok(self)
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// `<host>/<owner>/<repo>/archive/refs/heads/<branch>.zip`
    pub fn archive_url(&self) -> Result<Url, SourceError> {
        let mut url = self.host.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| SourceError::Host(self.host.to_string()))?;
            segments
                .pop_if_empty()
                .push(&self.owner)
                .push(&self.repo)
                .extend(["archive", "refs", "heads"]);

            let mut branch_segments: Vec<&str> =
                self.branch.split('/').filter(|s| !s.is_empty()).collect();
            let last = branch_segments.pop().unwrap_or_default();
            segments.extend(branch_segments);
            segments.push(&format!("{}.zip", last));
        }
        Ok(url)
    }
}

impl fmt::Display for RemoteRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.repo, self.branch)
    }
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_repository(repository: &str) -> Result<(String, String), SourceError> {
    let invalid = || SourceError::Repository(repository.to_string());
    let (owner, repo) = repository.trim().split_once('/').ok_or_else(invalid)?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return Err(invalid());
    }
    Ok((owner.to_string(), repo.to_string()))
}

/// Where components come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleSource {
    Remote(RemoteRef),
    Local(PathBuf),
}

impl BundleSource {
    pub fn local(path: PathBuf) -> Self {
        Self::Local(path)
    }
}

impl fmt::Display for BundleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BundleSource::Remote(remote) => write!(f, "{}", remote),
            BundleSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Materializes bundles; owns the HTTP client for the whole invocation
pub struct BundleFetcher {
    client: reqwest::Client,
}

impl BundleFetcher {
    /// Create a new fetcher with a custom user agent and optional request timeout
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Self {
        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            client: builder.build().unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Create a fetcher from a product config
    pub fn from_config<C: LibraryConfig>(config: &C, timeout: Option<Duration>) -> Self {
        Self::new(config.user_agent(), timeout)
    }

    pub async fn materialize(&self, source: &BundleSource) -> Result<Bundle, SourceError> {
        match source {
            BundleSource::Remote(remote) => {
                let url = remote.archive_url()?;
                let bytes = self.fetch_bytes(url).await?;
                let (reader, entries) = ArchiveReader::open(bytes)?;
                Ok(Bundle::new(entries, Box::new(reader)).strip_wrapper_dir())
            }
            BundleSource::Local(root) => {
                let (reader, entries) = DirectoryReader::open(root)?;
                Ok(Bundle::new(entries, Box::new(reader)))
            }
        }
    }

    async fn fetch_bytes(&self, url: Url) -> Result<Vec<u8>, SourceError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| SourceError::Fetch {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(SourceError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| SourceError::Fetch { url, source })?;
        Ok(bytes.to_vec())
    }
}
