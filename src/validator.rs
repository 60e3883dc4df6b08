//! Pull request validation.
//!
//! This module resolves the pillar of every host under the target and the
//! incoming environment, diffs each pair, and aggregates the deltas into a
//! [`ValidationResult`]. A host whose data is malformed is recorded as a
//! failure without stopping the other hosts.

use tracing::{debug, info, warn};

use crate::diff::{Delta, DiffEngine};
use crate::error::Result;
use crate::report::ValidationResult;
use crate::source::PillarSource;

/// Validator comparing two pillar environments through a source.
pub struct PrValidator<'a, S: PillarSource> {
    /// Pillar source.
    source: &'a S,
    /// Diff engine.
    diff_engine: DiffEngine,
}

impl<'a, S: PillarSource> PrValidator<'a, S> {
    /// Creates a new validator.
    #[must_use]
    pub const fn new(source: &'a S) -> Self {
        Self {
            source,
            diff_engine: DiffEngine::new(),
        }
    }

    /// Resolves the hosts to validate.
    ///
    /// Explicit hosts are used as given, minus duplicates; otherwise every
    /// host with pillar in the target or incoming environment is validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot list the hosts of either
    /// environment.
    pub async fn resolve_hosts(
        &self,
        hosts: &[String],
        target_env: &str,
        incoming_env: &str,
    ) -> Result<Vec<String>> {
        if hosts.is_empty() {
            debug!(
                "No hosts given, listing {target_env} and {incoming_env} hosts from {} source",
                self.source.source_type()
            );
            let envs = [target_env.to_string(), incoming_env.to_string()];
            return self.source.list_hosts(&envs).await;
        }

        let mut unique: Vec<String> = Vec::with_capacity(hosts.len());
        for host in hosts {
            if !unique.contains(host) {
                unique.push(host.clone());
            }
        }
        Ok(unique)
    }

    /// Validates a pull request by diffing every host's pillar.
    ///
    /// Hosts appear in the result in the order given.
    ///
    /// # Errors
    ///
    /// Returns an error if a failure is not specific to one host, such as a
    /// missing environment.
    pub async fn validate_pr(
        &self,
        hosts: &[String],
        target_env: &str,
        incoming_env: &str,
    ) -> Result<ValidationResult> {
        let hosts = self.resolve_hosts(hosts, target_env, incoming_env).await?;
        info!(
            "Validating {} hosts: {target_env} -> {incoming_env}",
            hosts.len()
        );

        let mut result = ValidationResult::new();
        for host in &hosts {
            match self.diff_host(host, target_env, incoming_env).await {
                Ok(deltas) => {
                    debug!("{host}: {} deltas", deltas.len());
                    result.record_host(host.as_str(), deltas);
                }
                Err(e) if e.is_host_scoped() => {
                    warn!("Skipping {host}: {e}");
                    result.record_failure(host.as_str(), e.to_string());
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "{} of {} hosts changed, {} failed",
            result.reports.len(),
            result.hosts_checked,
            result.failures.len()
        );
        Ok(result)
    }

    /// Resolves both trees of a host concurrently and diffs them.
    async fn diff_host(&self, host: &str, target_env: &str, incoming_env: &str) -> Result<Vec<Delta>> {
        let (base, incoming) = tokio::try_join!(
            self.source.resolve_config(target_env, host),
            self.source.resolve_config(incoming_env, host),
        )?;

        Ok(self.diff_engine.diff(&base, &incoming)?)
    }
}
