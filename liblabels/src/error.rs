//! Error types for label parsing and the buildpack steps.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for label parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Why a single key or value read stopped.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// A quote was opened and never closed before the token ended.
    #[error("unable to find a closing quote")]
    UnclosedQuote,

    /// Non-whitespace text between a closing quote and the next delimiter.
    #[error("unable to have characters after a trailing quote")]
    TrailingCharacters,
}

/// Error type for label string parsing.
///
/// Positions are character offsets into the input, reported the same way
/// the parser has always reported them so messages stay byte-for-byte
/// stable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A key could not be read.
    #[error("unable to read key ending at char {pos}\n{source}")]
    ReadKey { pos: usize, source: TokenError },

    /// A key read produced nothing.
    #[error("unable to have empty key ending at char {pos}")]
    EmptyKey { pos: usize },

    /// A value could not be read.
    #[error("unable to read value ending at char {pos}\n{source}")]
    ReadValue { pos: usize, source: TokenError },
}

/// Problems loading `buildpack.toml` metadata.
#[derive(Error, Debug)]
pub enum MetadataError {
    /// The metadata file could not be read.
    #[error("unable to read {}\n{source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The metadata is not valid TOML.
    #[error("unable to parse buildpack metadata\n{0}")]
    Toml(#[from] toml_edit::TomlError),

    /// The metadata is TOML but has the wrong shape.
    #[error("invalid buildpack metadata: {0}")]
    Invalid(String),
}

/// Error type for the build step.
#[derive(Error, Debug)]
pub enum BuildError {
    /// `buildpack.toml` could not be loaded.
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// `$BP_IMAGE_LABELS` was set but could not be parsed.
    #[error("unable to parse {raw}\n{source}")]
    Parse { raw: String, source: ParseError },
}
