//! Output encodings for labels.

use clap::ValueEnum;
use liblabels::BuildResult;

mod yaml;

/// Output format for `--to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// One `key=value` line per label
    Text,
    /// `[[labels]]` tables, as in `launch.toml`
    Toml,
    /// A `labels` sequence of key/value mappings
    Yaml,
}

pub fn render(result: &BuildResult, format: Format) -> Result<String, String> {
    match format {
        Format::Text => Ok(result.to_text()),
        Format::Toml => Ok(result.to_launch_toml()),
        Format::Yaml => yaml::encode(result),
    }
}
