//! Build: turn the configured variables into image labels.

use std::fmt;

use toml_edit::{value, ArrayOfTables, DocumentMut, Item, Table};
use tracing::{debug, info};

use crate::config::{Buildpack, ConfigurationResolver, Environment};
use crate::error::BuildError;
use crate::oci::{IMAGE_LABELS, WELL_KNOWN};
use crate::parser::{parse_labels, Labels};

/// A single image label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Label {
    pub key: String,
    pub value: String,
}

impl Label {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Labels produced by a build, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildResult {
    pub labels: Vec<Label>,
}

impl From<Labels> for BuildResult {
    fn from(labels: Labels) -> Self {
        Self {
            labels: labels
                .into_iter()
                .map(|(key, value)| Label { key, value })
                .collect(),
        }
    }
}

impl BuildResult {
    /// Render as the `[[labels]]` section of `launch.toml`.
    pub fn to_launch_toml(&self) -> String {
        let mut tables = ArrayOfTables::new();
        for label in &self.labels {
            let mut table = Table::new();
            table.insert("key", value(label.key.as_str()));
            table.insert("value", value(label.value.as_str()));
            tables.push(table);
        }

        let mut doc = DocumentMut::new();
        if !tables.is_empty() {
            doc.insert("labels", Item::ArrayOfTables(tables));
        }
        doc.to_string()
    }

    /// One `key=value` line per label.
    pub fn to_text(&self) -> String {
        self.labels
            .iter()
            .map(|label| format!("{}\n", label))
            .collect()
    }
}

/// Collect labels from the well-known variables, in table order, followed
/// by the labels parsed from `$BP_IMAGE_LABELS` sorted by key.
pub fn build(buildpack: &Buildpack, env: &dyn Environment) -> Result<BuildResult, BuildError> {
    info!("{}", buildpack.title());

    let resolver = ConfigurationResolver::new(buildpack, env);
    resolver.log_configuration();

    let mut result = BuildResult::default();

    for label in WELL_KNOWN {
        if let Some(value) = resolver.resolve(label.variable) {
            debug!(variable = label.variable, key = label.key, "well-known label");
            result.labels.push(Label::new(label.key, value));
        }
    }

    if let Some(raw) = resolver.resolve(IMAGE_LABELS) {
        let parsed = match parse_labels(&raw) {
            Ok(parsed) => parsed,
            Err(source) => return Err(BuildError::Parse { raw, source }),
        };
        debug!(count = parsed.len(), "parsed {}", IMAGE_LABELS);
        result.labels.extend(BuildResult::from(parsed).labels);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapEnvironment;

    fn build_with(env: MapEnvironment) -> Result<BuildResult, BuildError> {
        build(&Buildpack::builtin(), &env)
    }

    #[test]
    fn test_image_labels() {
        let env = MapEnvironment::new().with(
            IMAGE_LABELS,
            r#"alpha=bravo charlie="delta echo" foxtrot='golf hotel'"#,
        );
        assert_eq!(
            build_with(env).unwrap(),
            BuildResult {
                labels: vec![
                    Label::new("alpha", "bravo"),
                    Label::new("charlie", "delta echo"),
                    Label::new("foxtrot", "golf hotel"),
                ],
            }
        );
    }

    #[test]
    fn test_each_well_known_variable() {
        for label in WELL_KNOWN {
            let env = MapEnvironment::new().with(label.variable, "test-value");
            assert_eq!(
                build_with(env).unwrap(),
                BuildResult {
                    labels: vec![Label::new(label.key, "test-value")],
                },
                "{}",
                label.variable
            );
        }
    }

    #[test]
    fn test_well_known_before_parsed_labels() {
        let env = MapEnvironment::new()
            .with("BP_OCI_VERSION", "1.0")
            .with("BP_OCI_AUTHORS", "me")
            .with(IMAGE_LABELS, "zulu=1 alpha=2");
        let keys: Vec<String> = build_with(env)
            .unwrap()
            .labels
            .into_iter()
            .map(|l| l.key)
            .collect();
        assert_eq!(
            keys,
            vec![
                "org.opencontainers.image.authors",
                "org.opencontainers.image.version",
                "alpha",
                "zulu",
            ]
        );
    }

    #[test]
    fn test_nothing_set() {
        assert_eq!(build_with(MapEnvironment::new()).unwrap(), BuildResult::default());
    }

    #[test]
    fn test_empty_image_labels() {
        let env = MapEnvironment::new().with(IMAGE_LABELS, "");
        assert!(build_with(env).unwrap().labels.is_empty());
    }

    #[test]
    fn test_defaults_do_not_produce_labels() {
        let buildpack = Buildpack::from_toml(
            "[[metadata.configurations]]\nname = \"BP_OCI_VENDOR\"\ndefault = \"Example\"\nbuild = true\n",
        )
        .unwrap();
        let result = build(&buildpack, &MapEnvironment::new()).unwrap();
        assert!(result.labels.is_empty());
    }

    #[test]
    fn test_parse_failure() {
        let env = MapEnvironment::new().with(IMAGE_LABELS, "key='value");
        let err = build_with(env).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unable to parse key='value\nunable to read value ending at char 10\nunable to find a closing quote"
        );
    }

    #[test]
    fn test_launch_toml() {
        let result = BuildResult {
            labels: vec![Label::new("a", "x y"), Label::new("b", "it's \"quoted\"")],
        };
        let doc: DocumentMut = result.to_launch_toml().parse().unwrap();
        let labels = doc
            .get("labels")
            .and_then(Item::as_array_of_tables)
            .unwrap();
        assert_eq!(labels.len(), 2);
        let second = labels.get(1).unwrap();
        assert_eq!(second.get("key").and_then(Item::as_str), Some("b"));
        assert_eq!(
            second.get("value").and_then(Item::as_str),
            Some("it's \"quoted\"")
        );
    }

    #[test]
    fn test_text() {
        let result = BuildResult {
            labels: vec![Label::new("a", "1"), Label::new("b", "two words")],
        };
        assert_eq!(result.to_text(), "a=1\nb=two words\n");
        assert_eq!(BuildResult::default().to_text(), "");
    }
}
