//! Image label parsing for the OCI image labels buildpack.
//!
//! Users describe image labels in a single environment variable,
//! `$BP_IMAGE_LABELS`, as whitespace separated `key=value` pairs. Keys and
//! values may be single or double quoted, quoted text may contain spaces,
//! values may contain `=`, and `\"` or `\'` embed a literal quote.
//!
//! # Parsing Pipeline
//!
//! 1. **Scanner**: splits a buffer at the first of a small set of delimiter
//!    characters.
//!
//! 2. **Readers**: accumulate one key (up to `=`) or one value (up to a
//!    space) from repeated scans, tracking quotes and escapes.
//!
//! 3. **Parser**: alternates key and value reads over the input, keeping a
//!    character offset so errors say where they happened.
//!
//! On top of the parser sit the two buildpack steps: [`detect()`] decides
//! whether any label variable is set, and [`build()`] turns the well-known
//! `$BP_OCI_*` variables and `$BP_IMAGE_LABELS` into [`Label`]s.

mod build;
mod config;
mod detect;
mod error;
pub mod oci;
mod parser;
mod reader;
mod scanner;

pub use build::{build, BuildResult, Label};
pub use config::{
    Buildpack, BuildpackInfo, Configuration, ConfigurationResolver, Environment, MapEnvironment,
    ProcessEnvironment,
};
pub use detect::{
    detect, BuildPlan, BuildPlanProvide, BuildPlanRequire, DetectResult, FAIL_EXIT_CODE,
    PLAN_NAME,
};
pub use error::{BuildError, MetadataError, ParseError, Result, TokenError};
pub use parser::{parse_labels, Labels};
pub use reader::{read_key, read_value, ReadFailure, ReadResult};
pub use scanner::{read_to_next, Scan};
