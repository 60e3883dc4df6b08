//! Directory-backed pillar source.
//!
//! Reads rendered pillar dumps laid out as
//! `<root>/<env>/<host>.{yaml,yml,json}`, e.g. the output of
//! `salt <host> pillar.items --out=yaml` saved once per environment.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::ConfigParser;
use crate::error::{Result, SourceError};
use crate::tree::ConfigTree;

use super::pillar::PillarSource;

/// File extensions recognised as pillar documents, in lookup order.
const PILLAR_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Pillar source reading one file per host and environment.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    /// Root directory containing one subdirectory per environment.
    root: PathBuf,
}

impl DirectorySource {
    /// Creates a source rooted at the given directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Gets the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Gets the directory of an environment.
    fn env_dir(&self, env: &str) -> PathBuf {
        self.root.join(env)
    }

    /// Checks that a path exists, surfacing I/O errors other than absence.
    async fn exists(path: &Path) -> Result<bool> {
        tokio::fs::try_exists(path)
            .await
            .map_err(|e| SourceError::read(path, e.to_string()).into())
    }

    /// Gets the directory of an environment that must exist.
    async fn existing_env_dir(&self, env: &str) -> Result<PathBuf> {
        let env_dir = self.env_dir(env);
        if Self::exists(&env_dir).await? {
            Ok(env_dir)
        } else {
            Err(SourceError::EnvironmentNotFound {
                env: env.to_string(),
            }
            .into())
        }
    }

    /// Finds the pillar file of a host, trying each extension in order.
    async fn find_host_file(env_dir: &Path, host: &str) -> Result<Option<PathBuf>> {
        for ext in PILLAR_EXTENSIONS {
            let path = env_dir.join(format!("{host}.{ext}"));
            if Self::exists(&path).await? {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }

    /// Lists every environment directory under the root.
    async fn all_env_dirs(&self) -> Result<Vec<PathBuf>> {
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| SourceError::read(&self.root, e.to_string()))?;

        let mut dirs = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| SourceError::read(&self.root, e.to_string()))?
        {
            let path = entry.path();
            if path.is_dir() {
                dirs.push(path);
            }
        }
        Ok(dirs)
    }

    /// Collects host ids from the pillar files of one environment.
    async fn collect_hosts(env_dir: &Path, hosts: &mut BTreeSet<String>) -> Result<()> {
        let read_err = |e: std::io::Error| SourceError::read(env_dir, e.to_string());

        let mut files = tokio::fs::read_dir(env_dir).await.map_err(read_err)?;
        while let Some(file) = files.next_entry().await.map_err(read_err)? {
            if let Some(host) = host_from_path(&file.path()) {
                hosts.insert(host);
            }
        }
        Ok(())
    }
}

/// Extracts a host id from a pillar file path.
fn host_from_path(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    if !PILLAR_EXTENSIONS.contains(&ext) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    if stem.is_empty() || stem.starts_with('.') {
        return None;
    }
    Some(stem.to_string())
}

#[async_trait]
impl PillarSource for DirectorySource {
    async fn list_hosts(&self, envs: &[String]) -> Result<Vec<String>> {
        let env_dirs = if envs.is_empty() {
            self.all_env_dirs().await?
        } else {
            let mut dirs = Vec::with_capacity(envs.len());
            for env in envs {
                dirs.push(self.existing_env_dir(env).await?);
            }
            dirs
        };

        let mut hosts = BTreeSet::new();
        for env_dir in &env_dirs {
            Self::collect_hosts(env_dir, &mut hosts).await?;
        }

        info!(
            "Found {} hosts in {} environments under {}",
            hosts.len(),
            env_dirs.len(),
            self.root.display()
        );
        Ok(hosts.into_iter().collect())
    }

    async fn resolve_config(&self, env: &str, host: &str) -> Result<ConfigTree> {
        let env_dir = self.existing_env_dir(env).await?;

        let Some(path) = Self::find_host_file(&env_dir, host).await? else {
            debug!("No pillar for {host} in {env}, treating as empty");
            return Ok(ConfigTree::new());
        };

        debug!("Reading pillar for {host} from {}", path.display());
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| SourceError::read(&path, e.to_string()))?;

        ConfigParser::parse_pillar(&content, Some(&path))
            .map_err(|e| SourceError::invalid_host(host, e.to_string()).into())
    }

    fn source_type(&self) -> &'static str {
        "directory"
    }
}
