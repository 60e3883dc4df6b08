//! Pillar source trait definition.
//!
//! This module defines the interface through which rendered pillar data
//! reaches the differ. Implementations decide where the data lives; the
//! validator only sees fully materialized trees.

use async_trait::async_trait;

use crate::error::Result;
use crate::tree::ConfigTree;

/// Trait for rendered pillar providers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PillarSource: Send + Sync {
    /// Lists the host ids with pillar in any of `envs`, sorted.
    ///
    /// An empty slice lists the hosts of every environment. A named
    /// environment that does not exist is an error.
    async fn list_hosts(&self, envs: &[String]) -> Result<Vec<String>>;

    /// Resolves the pillar of a host in an environment.
    ///
    /// A host with no pillar in the environment resolves to an empty tree.
    async fn resolve_config(&self, env: &str, host: &str) -> Result<ConfigTree>;

    /// Gets the source type name.
    fn source_type(&self) -> &'static str;
}

#[async_trait]
impl PillarSource for Box<dyn PillarSource> {
    async fn list_hosts(&self, envs: &[String]) -> Result<Vec<String>> {
        (**self).list_hosts(envs).await
    }

    async fn resolve_config(&self, env: &str, host: &str) -> Result<ConfigTree> {
        (**self).resolve_config(env, host).await
    }

    fn source_type(&self) -> &'static str {
        (**self).source_type()
    }
}
