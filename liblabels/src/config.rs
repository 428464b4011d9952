//! Configuration: environment lookup and buildpack metadata.
//!
//! Values come from the environment. `buildpack.toml` declares which
//! variables the buildpack understands, with optional defaults and
//! descriptions, under `[[metadata.configurations]]`.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::path::Path;

use toml_edit::{DocumentMut, Item, TableLike};
use tracing::{info, warn};

use crate::error::MetadataError;
use crate::oci::{IMAGE_LABELS, WELL_KNOWN};

/// Source of configuration variables.
pub trait Environment {
    /// Value of `name`, or `None` if unset. An empty value is still set.
    fn lookup(&self, name: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var_os(name).map(|value| decode(name, value))
    }
}

/// Non UTF-8 bytes become U+FFFD, with a warning naming the variable.
fn decode(name: &str, value: OsString) -> String {
    value.into_string().unwrap_or_else(|value| {
        warn!(variable = name, "value is not valid UTF-8, replacing invalid bytes");
        value.to_string_lossy().into_owned()
    })
}

/// An in-memory environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnvironment {
    vars: HashMap<String, String>,
}

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name`, returning the environment for chaining.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }
}

impl Environment for MapEnvironment {
    fn lookup(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnvironment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// The `[buildpack]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildpackInfo {
    pub id: String,
    pub name: String,
    pub version: String,
}

/// One `[[metadata.configurations]]` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub name: String,
    pub default: Option<String>,
    pub description: Option<String>,
    pub build: bool,
    pub launch: bool,
}

/// Buildpack metadata, as read from `buildpack.toml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buildpack {
    pub info: BuildpackInfo,
    pub configurations: Vec<Configuration>,
}

impl Default for Buildpack {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Buildpack {
    /// Metadata for this buildpack when no `buildpack.toml` is given.
    pub fn builtin() -> Self {
        let mut configurations: Vec<Configuration> = WELL_KNOWN
            .iter()
            .map(|label| Configuration {
                name: label.variable.to_string(),
                default: None,
                description: Some(label.description.to_string()),
                build: true,
                launch: false,
            })
            .collect();
        configurations.push(Configuration {
            name: IMAGE_LABELS.to_string(),
            default: None,
            description: Some("arbitrary image labels".to_string()),
            build: true,
            launch: false,
        });

        Self {
            info: BuildpackInfo {
                id: "paketo-buildpacks/image-labels".to_string(),
                name: "Paketo Buildpack for Image Labels".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            configurations,
        }
    }

    /// Read metadata from a `buildpack.toml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MetadataError> {
        let path = path.as_ref();
        let input = fs::read_to_string(path).map_err(|source| MetadataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&input)
    }

    /// Parse metadata from `buildpack.toml` text.
    pub fn from_toml(input: &str) -> Result<Self, MetadataError> {
        let doc: DocumentMut = input.parse()?;

        let info = match doc.get("buildpack") {
            Some(item) => {
                let table = item
                    .as_table_like()
                    .ok_or_else(|| invalid("buildpack must be a table"))?;
                BuildpackInfo {
                    id: string_field(table, "id", "buildpack")?.unwrap_or_default(),
                    name: string_field(table, "name", "buildpack")?.unwrap_or_default(),
                    version: string_field(table, "version", "buildpack")?.unwrap_or_default(),
                }
            }
            None => BuildpackInfo::default(),
        };

        let configurations = match doc.get("metadata") {
            Some(metadata) => {
                let metadata = metadata
                    .as_table_like()
                    .ok_or_else(|| invalid("metadata must be a table"))?;
                match metadata.get("configurations") {
                    Some(item) => parse_configurations(item)?,
                    None => Vec::new(),
                }
            }
            None => Vec::new(),
        };

        Ok(Self {
            info,
            configurations,
        })
    }

    /// `name version`, as printed at the top of the build output.
    pub fn title(&self) -> String {
        format!("{} {}", self.info.name, self.info.version)
            .trim()
            .to_string()
    }

    pub fn configuration(&self, name: &str) -> Option<&Configuration> {
        self.configurations.iter().find(|c| c.name == name)
    }
}

fn invalid(message: &str) -> MetadataError {
    MetadataError::Invalid(message.to_string())
}

fn string_field(
    table: &dyn TableLike,
    key: &str,
    context: &str,
) -> Result<Option<String>, MetadataError> {
    match table.get(key) {
        None => Ok(None),
        Some(item) => item
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| MetadataError::Invalid(format!("{}.{} must be a string", context, key))),
    }
}

fn bool_field(table: &dyn TableLike, key: &str, context: &str) -> Result<bool, MetadataError> {
    match table.get(key) {
        None => Ok(false),
        Some(item) => item.as_bool().ok_or_else(|| {
            MetadataError::Invalid(format!("{}.{} must be a boolean", context, key))
        }),
    }
}

/// Accepts both `[[metadata.configurations]]` and an inline array of tables.
fn parse_configurations(item: &Item) -> Result<Vec<Configuration>, MetadataError> {
    let tables: Vec<&dyn TableLike> = if let Some(array) = item.as_array_of_tables() {
        array.iter().map(|t| t as &dyn TableLike).collect()
    } else if let Some(array) = item.as_array() {
        array
            .iter()
            .map(|value| {
                value
                    .as_inline_table()
                    .map(|t| t as &dyn TableLike)
                    .ok_or_else(|| invalid("metadata.configurations entries must be tables"))
            })
            .collect::<Result<_, _>>()?
    } else {
        return Err(invalid("metadata.configurations must be an array of tables"));
    };

    tables.into_iter().map(parse_configuration).collect()
}

fn parse_configuration(table: &dyn TableLike) -> Result<Configuration, MetadataError> {
    let context = "metadata.configurations";
    let name = string_field(table, "name", context)?
        .filter(|name| !name.is_empty())
        .ok_or_else(|| invalid("metadata.configurations entries need a name"))?;
    Ok(Configuration {
        name,
        default: string_field(table, "default", context)?,
        description: string_field(table, "description", context)?,
        build: bool_field(table, "build", context)?,
        launch: bool_field(table, "launch", context)?,
    })
}

/// Resolves configuration values from the environment, falling back to the
/// defaults declared in buildpack metadata.
pub struct ConfigurationResolver<'a> {
    configurations: &'a [Configuration],
    env: &'a dyn Environment,
}

impl<'a> ConfigurationResolver<'a> {
    pub fn new(buildpack: &'a Buildpack, env: &'a dyn Environment) -> Self {
        Self {
            configurations: &buildpack.configurations,
            env,
        }
    }

    /// Value of `name` if it is set in the environment.
    pub fn resolve(&self, name: &str) -> Option<String> {
        self.env.lookup(name)
    }

    /// Value of `name` from the environment, else its declared default.
    pub fn resolve_or_default(&self, name: &str) -> Option<String> {
        self.resolve(name).or_else(|| {
            self.configurations
                .iter()
                .find(|c| c.name == name)
                .and_then(|c| c.default.clone())
        })
    }

    /// Log the build-time configurations and their effective values.
    pub fn log_configuration(&self) {
        let build: Vec<&Configuration> = self.configurations.iter().filter(|c| c.build).collect();
        if build.is_empty() {
            return;
        }

        let name_width = build.iter().map(|c| c.name.len() + 1).max().unwrap_or(0);
        let values: Vec<String> = build
            .iter()
            .map(|c| self.resolve_or_default(&c.name).unwrap_or_default())
            .collect();
        let value_width = values.iter().map(String::len).max().unwrap_or(0);

        info!("Build Configuration:");
        for (c, value) in build.iter().zip(&values) {
            let line = format!(
                "  {:<nw$}  {:<vw$}  {}",
                format!("${}", c.name),
                value,
                c.description.as_deref().unwrap_or(""),
                nw = name_width,
                vw = value_width,
            );
            info!("{}", line.trim_end());
        }
    }
}
