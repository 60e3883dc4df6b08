//! Snapshot-backed pillar source.
//!
//! A snapshot is a single document per environment mapping host ids to
//! their rendered pillar, as produced by `salt '*' pillar.items --out=json`.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, info};

use crate::config::ConfigParser;
use crate::error::{Result, SourceError};
use crate::tree::ConfigTree;

use super::pillar::PillarSource;

/// Pillar source holding whole-environment snapshots in memory.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    /// Raw host documents per environment.
    environments: BTreeMap<String, BTreeMap<String, serde_yaml::Value>>,
}

impl SnapshotSource {
    /// Creates an empty snapshot source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an environment from snapshot text.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot is not a mapping of host ids.
    pub fn add_environment(
        &mut self,
        env: impl Into<String>,
        content: &str,
        location: Option<&Path>,
    ) -> Result<()> {
        let env = env.into();
        let hosts = ConfigParser::parse_snapshot(content, location)?;
        debug!("Snapshot for {env} holds {} hosts", hosts.len());
        self.environments.insert(env, hosts);
        Ok(())
    }

    /// Adds an environment from a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load_environment(&mut self, env: impl Into<String>, path: impl AsRef<Path>) -> Result<()> {
        let env = env.into();
        let path = path.as_ref();
        info!("Loading {env} snapshot from: {}", path.display());

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SourceError::read(path, e.to_string()))?;

        self.add_environment(env, &content, Some(path))
    }

    /// Gets the hosts of an environment.
    fn environment(&self, env: &str) -> Result<&BTreeMap<String, serde_yaml::Value>> {
        self.environments.get(env).ok_or_else(|| {
            SourceError::EnvironmentNotFound {
                env: env.to_string(),
            }
            .into()
        })
    }

    /// Returns the environment names held by the source.
    pub fn environments(&self) -> impl Iterator<Item = &str> {
        self.environments.keys().map(String::as_str)
    }
}

#[async_trait]
impl PillarSource for SnapshotSource {
    async fn list_hosts(&self, envs: &[String]) -> Result<Vec<String>> {
        let hosts: BTreeSet<&String> = if envs.is_empty() {
            self.environments.values().flat_map(BTreeMap::keys).collect()
        } else {
            let mut hosts = BTreeSet::new();
            for env in envs {
                hosts.extend(self.environment(env)?.keys());
            }
            hosts
        };
        Ok(hosts.into_iter().cloned().collect())
    }

    async fn resolve_config(&self, env: &str, host: &str) -> Result<ConfigTree> {
        let hosts = self.environment(env)?;

        let Some(value) = hosts.get(host) else {
            debug!("No pillar for {host} in {env} snapshot, treating as empty");
            return Ok(ConfigTree::new());
        };

        ConfigTree::try_from(value.clone())
            .map_err(|e| SourceError::invalid_host(host, e.to_string()).into())
    }

    fn source_type(&self) -> &'static str {
        "snapshot"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CitoolsError;
    use tempfile::TempDir;

    const BASE: &str = r"
ghar01.tkclabs.io:
  ghar: {}
salt01.tkclabs.io:
  salt:
    lookup:
      master: salt.tkclabs.io
";

    const INCOMING: &str = r"
ghar01.tkclabs.io:
  ghar:
    testing_key01: x
ghar02.tkclabs.io: 42
";

    fn create_test_source() -> SnapshotSource {
        let mut source = SnapshotSource::new();
        source.add_environment("base", BASE, None).expect("base");
        source.add_environment("dev.1", INCOMING, None).expect("incoming");
        source
    }

    #[tokio::test]
    async fn test_list_hosts_across_environments() {
        let source = create_test_source();
        let hosts = source.list_hosts(&[]).await.expect("hosts");
        assert_eq!(hosts, ["ghar01.tkclabs.io", "ghar02.tkclabs.io", "salt01.tkclabs.io"]);

        let base = source.list_hosts(&[String::from("base")]).await.expect("hosts");
        assert_eq!(base, ["ghar01.tkclabs.io", "salt01.tkclabs.io"]);
        assert!(source.list_hosts(&[String::from("dev.404")]).await.is_err());
        assert_eq!(source.environments().collect::<Vec<_>>(), ["base", "dev.1"]);
    }

    #[tokio::test]
    async fn test_resolve_and_absent_host() {
        let source = create_test_source();

        let tree = source.resolve_config("dev.1", "ghar01.tkclabs.io").await.expect("tree");
        assert!(tree.contains_key("ghar"));

        let absent = source.resolve_config("dev.1", "salt01.tkclabs.io").await.expect("empty");
        assert!(absent.is_empty());
    }

    #[tokio::test]
    async fn test_non_mapping_host_is_host_scoped() {
        let source = create_test_source();
        let err = source
            .resolve_config("dev.1", "ghar02.tkclabs.io")
            .await
            .expect_err("scalar pillar");
        assert!(err.is_host_scoped());
    }

    #[tokio::test]
    async fn test_unknown_environment() {
        let source = create_test_source();
        let result = source.resolve_config("dev.2", "ghar01.tkclabs.io").await;
        assert!(matches!(
            result,
            Err(CitoolsError::Source(SourceError::EnvironmentNotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_load_environment_from_file() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("base.yaml");
        std::fs::write(&path, BASE).expect("write");

        let mut source = SnapshotSource::new();
        source.load_environment("base", &path).await.expect("load");
        assert_eq!(source.list_hosts(&[]).await.expect("hosts").len(), 2);
    }
}
