//! # copilot-customize
//!
//! A library for generating customized AI assistant instruction files
//! from Markdown templates.
//!
//! ## Features
//!
//! - Pure template resolution: `{{KEY}}` placeholders and
//!   `{{#if_...}}` conditional blocks
//! - Interactive preference survey with per-variant question catalogs
//! - Response persistence as JSON for repeatable runs
//! - Atomic file operations with automatic backups
//! - Non-fatal detection of unresolved markers in the output
//!
//! ## Quick Start
//!
//! ```no_run
//! use copilot_customize::{Config, Pipeline};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::builder()
//!     .template_path("templates/python.md")
//!     .responses_path("copilot_config.json")
//!     .output_path(".github/copilot-instructions.md")
//!     .build()?;
//!
//! Pipeline::new(config)?.run()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library follows a pipeline architecture:
//! 1. **Survey/Responses**: Collects preferences interactively or from JSON
//! 2. **Resolver**: Substitutes placeholders, then resolves conditionals
//! 3. **Validator**: Flags residual markers without failing the run
//! 4. **Writer**: Persists the customized instructions atomically

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod error;
mod pipeline;
mod responses;
mod validator;
mod writer;

pub mod resolver;
pub mod survey;

pub use config::{Config, ConfigBuilder, CONFIG_FILE_NAME};
pub use error::{Error, Result};
pub use pipeline::{Pipeline, PipelineStats};
pub use resolver::resolve;
pub use responses::ResponseSet;
pub use survey::{Choice, Question, SurveyKind};
pub use validator::find_unresolved_markers;

/// Runs a complete customization with the given configuration.
///
/// This is the main entry point for the library.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - The template or responses file cannot be read
/// - The interactive survey is aborted
/// - The output file cannot be written
///
/// # Examples
///
/// ```no_run
/// use copilot_customize::{Config, run};
///
/// # fn main() -> anyhow::Result<()> {
/// let config = Config::builder()
///     .template_path("templates/python.md")
///     .responses_path("copilot_config.json")
///     .build()?;
///
/// run(config)?;
/// # Ok(())
/// # }
/// ```
pub fn run(config: Config) -> Result<PipelineStats> {
    Pipeline::new(config)?.run()
}
