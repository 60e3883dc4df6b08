//! Report rendering.
//!
//! Produces the indented text report consumed by CI comments and the
//! structured form consumed by calling workflows. Both forms are pure
//! functions of the [`ValidationResult`].

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

use crate::diff::Delta;
use crate::tree::ConfigValue;

use super::types::{HostFailure, HostReport, NamespaceReport, ValidationResult};

/// Separator printed under hosts and namespaces.
const SEPARATOR: &str = "----------";

/// Indentation step.
const INDENT: usize = 4;

/// Renderer for validation results.
#[derive(Debug, Clone, Copy)]
pub struct ReportRenderer {
    /// Whether old/new values are included.
    show_values: bool,
}

/// Both report forms for a single run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedReport {
    /// Indented text form.
    pub text: String,
    /// Structured form.
    pub structured: StructuredReport,
}

/// Structured report: host -> namespace -> path -> action.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StructuredReport {
    /// Changes per host, namespace and full key path.
    pub changes: BTreeMap<String, BTreeMap<String, BTreeMap<String, ChangeEntry>>>,
    /// Error message per failed host.
    pub errors: BTreeMap<String, String>,
}

/// A single change in the structured report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ChangeEntry {
    /// Key added.
    Added {
        /// Incoming value.
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<ConfigValue>,
    },
    /// Key removed.
    Removed {
        /// Base value.
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<ConfigValue>,
    },
    /// Value changed.
    Changed {
        /// Base value.
        #[serde(skip_serializing_if = "Option::is_none")]
        old: Option<ConfigValue>,
        /// Incoming value.
        #[serde(skip_serializing_if = "Option::is_none")]
        new: Option<ConfigValue>,
    },
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer {
    /// Creates a renderer that shows old and new values.
    #[must_use]
    pub const fn new() -> Self {
        Self { show_values: true }
    }

    /// Sets whether values are shown.
    #[must_use]
    pub const fn with_values(mut self, show_values: bool) -> Self {
        self.show_values = show_values;
        self
    }

    /// Aggregates per-host deltas and renders both report forms.
    ///
    /// Hosts without deltas do not appear in either form.
    #[must_use]
    pub fn render<I, H>(&self, results: I) -> RenderedReport
    where
        I: IntoIterator<Item = (H, Vec<Delta>)>,
        H: Into<String>,
    {
        let result = ValidationResult::from_host_deltas(results);
        RenderedReport {
            text: self.render_text(&result),
            structured: self.structured(&result),
        }
    }

    /// Renders the indented text report.
    ///
    /// Host blocks are separated by a blank line. An empty result renders
    /// as an empty string.
    #[must_use]
    pub fn render_text(&self, result: &ValidationResult) -> String {
        let mut blocks: Vec<String> = result
            .reports
            .iter()
            .map(|report| self.render_host(report))
            .collect();
        blocks.extend(result.failures.iter().map(Self::render_failure));
        blocks.join("\n")
    }

    /// Builds the structured report.
    #[must_use]
    pub fn structured(&self, result: &ValidationResult) -> StructuredReport {
        let mut structured = StructuredReport::default();

        for report in &result.reports {
            let host = structured.changes.entry(report.host.clone()).or_default();
            for namespace in &report.namespaces {
                let entries = host.entry(namespace.namespace.clone()).or_default();
                for delta in &namespace.deltas {
                    entries.insert(delta.path().to_string(), self.change_entry(delta));
                }
            }
        }

        for failure in &result.failures {
            structured
                .errors
                .insert(failure.host.clone(), failure.error.clone());
        }

        structured
    }

    /// Renders one host block.
    fn render_host(&self, report: &HostReport) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "{}:", report.host);
        let _ = writeln!(output, "{}{SEPARATOR}", pad(INDENT));

        for namespace in &report.namespaces {
            self.render_namespace(&mut output, namespace);
        }

        output
    }

    /// Renders one namespace with its nested keys.
    fn render_namespace(&self, output: &mut String, namespace: &NamespaceReport) {
        if let [delta] = namespace.deltas.as_slice()
            && delta.path().len() == 1
        {
            let _ = writeln!(
                output,
                "{}{}",
                pad(INDENT),
                self.leaf_line(&namespace.namespace, delta)
            );
            return;
        }

        let base = 2 * INDENT;
        let _ = writeln!(output, "{}{}:", pad(INDENT), namespace.namespace);
        let _ = writeln!(output, "{}{SEPARATOR}", pad(base));

        let mut previous: &[String] = &[];
        for delta in &namespace.deltas {
            let segments = delta.path().segments();
            let Some((leaf, rest)) = segments.split_last() else {
                continue;
            };
            // Drop the namespace itself; it is already printed.
            let parents = rest.get(1..).unwrap_or_default();

            let shared = common_prefix_len(previous, parents);
            for (depth, key) in parents.iter().enumerate().skip(shared) {
                let _ = writeln!(output, "{}{key}:", pad(base + depth * INDENT));
            }

            let _ = writeln!(
                output,
                "{}{}",
                pad(base + parents.len() * INDENT),
                self.leaf_line(leaf, delta)
            );
            previous = parents;
        }
    }

    /// Renders a failed host block.
    fn render_failure(failure: &HostFailure) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "{}:", failure.host);
        let _ = writeln!(output, "{}{SEPARATOR}", pad(INDENT));
        let _ = writeln!(output, "{}error: {}", pad(INDENT), failure.error);
        output
    }

    /// Formats the final line for a delta.
    fn leaf_line(&self, key: &str, delta: &Delta) -> String {
        match delta {
            Delta::Added { .. } => format!("{key}: added"),
            Delta::Removed { .. } => format!("{key}: removed"),
            Delta::Changed { old, new, .. } if self.show_values => {
                format!("{key}: changed: {old} -> {new}")
            }
            Delta::Changed { .. } => format!("{key}: changed"),
        }
    }

    /// Converts a delta to its structured entry.
    fn change_entry(&self, delta: &Delta) -> ChangeEntry {
        let shown = |value: &ConfigValue| self.show_values.then(|| value.clone());
        match delta {
            Delta::Added { value, .. } => ChangeEntry::Added {
                value: shown(value),
            },
            Delta::Removed { value, .. } => ChangeEntry::Removed {
                value: shown(value),
            },
            Delta::Changed { old, new, .. } => ChangeEntry::Changed {
                old: shown(old),
                new: shown(new),
            },
        }
    }
}

fn pad(width: usize) -> String {
    " ".repeat(width)
}

fn common_prefix_len(a: &[String], b: &[String]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::KeyPath;
    use crate::tree::ConfigTree;

    fn path(segments: &[&str]) -> KeyPath {
        KeyPath::from(segments)
    }

    fn ghar_deltas() -> Vec<Delta> {
        vec![
            Delta::Added {
                path: path(&["ghar", "testing_key01"]),
                value: ConfigValue::from("x"),
            },
            Delta::Added {
                path: path(&["ghar", "testing_key02"]),
                value: ConfigValue::from("y"),
            },
        ]
    }

    #[test]
    fn test_render_single_host() {
        let rendered = ReportRenderer::new().render(vec![("ghar01.tkclabs.io", ghar_deltas())]);

        let expected = "\
ghar01.tkclabs.io:
    ----------
    ghar:
        ----------
        testing_key01: added
        testing_key02: added
";
        assert_eq!(rendered.text, expected);
    }

    #[test]
    fn test_nested_keys_share_parent_lines() {
        let deltas = vec![
            Delta::Changed {
                path: path(&["common", "demo_key01"]),
                old: ConfigValue::from("a"),
                new: ConfigValue::from("b"),
            },
            Delta::Changed {
                path: path(&["common", "demo_key02", "demo_nestedkey02"]),
                old: ConfigValue::from(1_i64),
                new: ConfigValue::from(2_i64),
            },
            Delta::Added {
                path: path(&["common", "demo_key02", "demo_nestedkey03"]),
                value: ConfigValue::from("c"),
            },
            Delta::Removed {
                path: path(&["common", "demo_key04"]),
                value: ConfigValue::from("d"),
            },
        ];

        let rendered = ReportRenderer::new().render(vec![("salt01.tkclabs.io", deltas)]);
        let expected = "\
salt01.tkclabs.io:
    ----------
    common:
        ----------
        demo_key01: changed: \"a\" -> \"b\"
        demo_key02:
            demo_nestedkey02: changed: 1 -> 2
            demo_nestedkey03: added
        demo_key04: removed
";
        assert_eq!(rendered.text, expected);
    }

    #[test]
    fn test_blank_line_between_hosts_and_clean_hosts_omitted() {
        let rendered = ReportRenderer::new().render(vec![
            ("ghar01.tkclabs.io", ghar_deltas()),
            ("ghar03.tkclabs.io", Vec::new()),
            ("ghar02.tkclabs.io", ghar_deltas()),
        ]);

        let block = |host: &str| {
            format!(
                "{host}:\n    ----------\n    ghar:\n        ----------\n        testing_key01: added\n        testing_key02: added\n"
            )
        };
        assert_eq!(
            rendered.text,
            format!("{}\n{}", block("ghar01.tkclabs.io"), block("ghar02.tkclabs.io"))
        );
        assert!(!rendered.structured.changes.contains_key("ghar03.tkclabs.io"));
    }

    #[test]
    fn test_namespace_level_delta() {
        let deltas = vec![Delta::Removed {
            path: path(&["salt"]),
            value: ConfigValue::from(crate::tree::ConfigTree::new().with("master", "m")),
        }];

        let rendered = ReportRenderer::new().render(vec![("salt01.tkclabs.io", deltas)]);
        assert_eq!(rendered.text, "salt01.tkclabs.io:\n    ----------\n    salt: removed\n");
    }

    #[test]
    fn test_hidden_values() {
        let deltas = vec![Delta::Changed {
            path: path(&["ghar", "lookup", "token"]),
            old: ConfigValue::from("secret-1"),
            new: ConfigValue::from("secret-2"),
        }];

        let rendered = ReportRenderer::new()
            .with_values(false)
            .render(vec![("ghar01.tkclabs.io", deltas)]);

        assert!(rendered.text.contains("token: changed\n"));
        assert!(!rendered.text.contains("secret"));

        let json = serde_json::to_value(&rendered.structured).expect("json");
        assert_eq!(
            json["changes"]["ghar01.tkclabs.io"]["ghar"]["ghar:lookup:token"],
            serde_json::json!({ "action": "changed" })
        );
    }

    #[test]
    fn test_structured_form() {
        let rendered = ReportRenderer::new().render(vec![("ghar01.tkclabs.io", ghar_deltas())]);
        let json = serde_json::to_value(&rendered.structured).expect("json");

        assert_eq!(
            json,
            serde_json::json!({
                "changes": {
                    "ghar01.tkclabs.io": {
                        "ghar": {
                            "ghar:testing_key01": { "action": "added", "value": "x" },
                            "ghar:testing_key02": { "action": "added", "value": "y" }
                        }
                    }
                },
                "errors": {}
            })
        );
    }

    #[test]
    fn test_delimiter_in_key_keeps_both_entries() {
        let base = ConfigTree::new().with(
            "ns",
            ConfigTree::new()
                .with("a:b", 1_i64)
                .with("a", ConfigTree::new().with("b", 1_i64)),
        );
        let incoming = ConfigTree::new().with(
            "ns",
            ConfigTree::new()
                .with("a:b", 2_i64)
                .with("a", ConfigTree::new().with("b", 3_i64)),
        );
        let deltas = crate::diff::diff(&base, &incoming).expect("diff");
        assert_eq!(deltas.len(), 2);

        let rendered = ReportRenderer::new().render(vec![("web01.local", deltas)]);
        let entries = &rendered.structured.changes["web01.local"]["ns"];
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries.get("ns:a:b"),
            Some(&ChangeEntry::Changed {
                old: Some(ConfigValue::from(1_i64)),
                new: Some(ConfigValue::from(3_i64)),
            })
        );
        assert_eq!(
            entries.get("ns:a\\:b"),
            Some(&ChangeEntry::Changed {
                old: Some(ConfigValue::from(1_i64)),
                new: Some(ConfigValue::from(2_i64)),
            })
        );
    }

    #[test]
    fn test_failures_render_after_changes() {
        let mut result = ValidationResult::from_host_deltas(vec![("ghar01.tkclabs.io", ghar_deltas())]);
        result.record_failure("web01.local", "bad data");

        let renderer = ReportRenderer::new();
        let text = renderer.render_text(&result);
        assert!(text.ends_with("\nweb01.local:\n    ----------\n    error: bad data\n"));

        let structured = renderer.structured(&result);
        assert_eq!(structured.errors.get("web01.local").map(String::as_str), Some("bad data"));
    }

    #[test]
    fn test_empty_result_renders_nothing() {
        let rendered = ReportRenderer::new().render(Vec::<(String, Vec<Delta>)>::new());
        assert!(rendered.text.is_empty());
        assert!(rendered.structured.changes.is_empty());
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let renderer = ReportRenderer::new();
        let first = renderer.render(vec![("ghar01.tkclabs.io", ghar_deltas())]);
        let second = renderer.render(vec![("ghar01.tkclabs.io", ghar_deltas())]);
        assert_eq!(first, second);
    }
}
