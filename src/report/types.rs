//! Report types aggregating per-host deltas.

use crate::diff::{Delta, DeltaKind};

/// Deltas that share a top-level namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceReport {
    /// Namespace name (first path segment).
    pub namespace: String,
    /// Deltas in differ order.
    pub deltas: Vec<Delta>,
}

/// All deltas for a single host, grouped by namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct HostReport {
    /// Host identifier (minion id).
    pub host: String,
    /// Namespaces in order of first appearance.
    pub namespaces: Vec<NamespaceReport>,
}

/// A host whose validation was aborted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostFailure {
    /// Host identifier.
    pub host: String,
    /// Error description.
    pub error: String,
}

/// Outcome of a validation run across hosts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    /// Hosts with at least one delta, in input order.
    pub reports: Vec<HostReport>,
    /// Hosts whose diff failed.
    pub failures: Vec<HostFailure>,
    /// Number of hosts that were examined.
    pub hosts_checked: usize,
}

impl HostReport {
    /// Groups a host's deltas by namespace.
    ///
    /// Returns `None` when there are no deltas.
    #[must_use]
    pub fn from_deltas(host: impl Into<String>, deltas: Vec<Delta>) -> Option<Self> {
        if deltas.is_empty() {
            return None;
        }

        let mut namespaces: Vec<NamespaceReport> = Vec::new();
        for delta in deltas {
            let namespace = delta.path().namespace().unwrap_or_default().to_string();
            match namespaces.iter_mut().find(|n| n.namespace == namespace) {
                Some(group) => group.deltas.push(delta),
                None => namespaces.push(NamespaceReport {
                    namespace,
                    deltas: vec![delta],
                }),
            }
        }

        Some(Self {
            host: host.into(),
            namespaces,
        })
    }

    /// Iterates over all deltas of the host.
    pub fn deltas(&self) -> impl Iterator<Item = &Delta> {
        self.namespaces.iter().flat_map(|n| n.deltas.iter())
    }

    /// Counts deltas of the given kind.
    #[must_use]
    pub fn count(&self, kind: DeltaKind) -> usize {
        self.deltas().filter(|d| d.kind() == kind).count()
    }

    /// Returns the total number of deltas.
    #[must_use]
    pub fn total(&self) -> usize {
        self.deltas().count()
    }
}

impl ValidationResult {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a result from per-host deltas, omitting clean hosts.
    #[must_use]
    pub fn from_host_deltas<I, H>(results: I) -> Self
    where
        I: IntoIterator<Item = (H, Vec<Delta>)>,
        H: Into<String>,
    {
        let mut result = Self::new();
        for (host, deltas) in results {
            result.record_host(host, deltas);
        }
        result
    }

    /// Records the deltas computed for one host.
    pub fn record_host(&mut self, host: impl Into<String>, deltas: Vec<Delta>) {
        self.hosts_checked += 1;
        if let Some(report) = HostReport::from_deltas(host, deltas) {
            self.reports.push(report);
        }
    }

    /// Records a host whose diff failed.
    pub fn record_failure(&mut self, host: impl Into<String>, error: impl Into<String>) {
        self.hosts_checked += 1;
        self.failures.push(HostFailure {
            host: host.into(),
            error: error.into(),
        });
    }

    /// Returns true if any host has deltas.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.reports.is_empty()
    }

    /// Returns true if any host failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Returns the report for a host, if it has deltas.
    #[must_use]
    pub fn host(&self, host: &str) -> Option<&HostReport> {
        self.reports.iter().find(|r| r.host == host)
    }

    /// Returns the total number of deltas across hosts.
    #[must_use]
    pub fn total_deltas(&self) -> usize {
        self.reports.iter().map(HostReport::total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::KeyPath;
    use crate::tree::ConfigValue;

    fn added(path: &[&str]) -> Delta {
        Delta::Added {
            path: KeyPath::from(path),
            value: ConfigValue::from("v"),
        }
    }

    #[test]
    fn test_groups_by_namespace_in_order() {
        let report = HostReport::from_deltas(
            "salt01.tkclabs.io",
            vec![
                added(&["common", "a"]),
                added(&["common", "b"]),
                added(&["salt", "lookup", "master"]),
            ],
        )
        .expect("report");

        let names: Vec<&str> = report.namespaces.iter().map(|n| n.namespace.as_str()).collect();
        assert_eq!(names, ["common", "salt"]);
        assert_eq!(report.namespaces[0].deltas.len(), 2);
        assert_eq!(report.count(DeltaKind::Added), 3);
        assert_eq!(report.count(DeltaKind::Removed), 0);
    }

    #[test]
    fn test_clean_hosts_are_omitted() {
        let result = ValidationResult::from_host_deltas(vec![
            ("ghar01.tkclabs.io", vec![added(&["ghar", "testing_key01"])]),
            ("ghar03.tkclabs.io", Vec::new()),
        ]);

        assert_eq!(result.hosts_checked, 2);
        assert_eq!(result.reports.len(), 1);
        assert!(result.host("ghar03.tkclabs.io").is_none());
        assert!(result.has_changes());
        assert_eq!(result.total_deltas(), 1);
    }

    #[test]
    fn test_failures_are_tracked_separately() {
        let mut result = ValidationResult::new();
        result.record_failure("web01.local", "bad data");
        result.record_host("web02.local", Vec::new());

        assert!(result.has_failures());
        assert!(!result.has_changes());
        assert_eq!(result.hosts_checked, 2);
    }
}
