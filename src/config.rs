use crate::error::{Error, Result};
use crate::survey::SurveyKind;
use crate::validator::TemplateValidator;
use std::path::PathBuf;

const DEFAULT_OUTPUT_PATH: &str = ".github/copilot-instructions.md";

/// Filename used when persisting survey responses for reuse.
pub const CONFIG_FILE_NAME: &str = "copilot_config.json";

/// Configuration for a customization run.
///
/// Use [`Config::builder()`] to construct a new configuration.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    /// Instruction template to customize
    pub template_path: PathBuf,

    /// Destination for the customized instructions
    pub output_path: PathBuf,

    /// JSON file with saved responses; interactive survey if absent
    pub responses_path: Option<PathBuf>,

    /// Template variant driving the survey question catalog
    pub survey: SurveyKind,

    /// Persist survey responses next to the output file
    pub save_responses: bool,

    /// Dry run mode (no file writes)
    pub dry_run: bool,

    /// Create a backup of an existing output file
    pub backup_existing: bool,
}

impl Config {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use copilot_customize::Config;
    ///
    /// let config = Config::builder()
    ///     .template_path("templates/python.md")
    ///     .output_path(".github/copilot-instructions.md")
    ///     .build()
    ///     .expect("valid configuration");
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Template file is missing, empty, or oversized
    /// - The responses file is specified but missing
    /// - The output path has no filename component
    pub fn validate(&self) -> Result<()> {
        TemplateValidator::validate_template(&self.template_path)?;

        if let Some(ref responses_path) = self.responses_path {
            if !responses_path.exists() {
                return Err(Error::io(
                    responses_path,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "Config file not found"),
                ));
            }

            if self.save_responses {
                tracing::warn!(
                    "save_responses has no effect when responses are loaded from a file"
                );
            }
        }

        if self.output_path.file_name().is_none() {
            return Err(Error::config(format!(
                "Output path has no filename: {}",
                self.output_path.display()
            )));
        }

        Ok(())
    }

    /// Returns the path where survey responses are persisted.
    ///
    /// Responses are saved alongside the output file.
    #[must_use]
    pub fn responses_save_path(&self) -> PathBuf {
        match self.output_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(CONFIG_FILE_NAME),
            _ => PathBuf::from(CONFIG_FILE_NAME),
        }
    }
}

/// Builder for creating a [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    template_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    responses_path: Option<PathBuf>,
    survey: Option<SurveyKind>,
    save_responses: bool,
    dry_run: bool,
    backup_existing: Option<bool>,
}

impl ConfigBuilder {
    /// Sets the instruction template to customize.
    ///
    /// Defaults to the survey variant's built-in template path.
    #[must_use]
    pub fn template_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_path = Some(path.into());
        self
    }

    /// Sets the destination for the customized instructions.
    #[must_use]
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Sets a JSON file with previously saved responses.
    ///
    /// When provided, the interactive survey is skipped.
    #[must_use]
    pub fn responses_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.responses_path = Some(path.into());
        self
    }

    /// Sets the template variant for the survey.
    #[must_use]
    pub fn survey(mut self, kind: SurveyKind) -> Self {
        self.survey = Some(kind);
        self
    }

    /// Enables persisting survey responses for future runs.
    #[must_use]
    pub fn save_responses(mut self, enabled: bool) -> Self {
        self.save_responses = enabled;
        self
    }

    /// Enables dry run mode (no file writes).
    #[must_use]
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Enables or disables backup creation.
    #[must_use]
    pub fn backup_existing(mut self, enabled: bool) -> Self {
        self.backup_existing = Some(enabled);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn build(self) -> Result<Config> {
        let survey = self.survey.unwrap_or(SurveyKind::Python);

        let config = Config {
            template_path: self
                .template_path
                .unwrap_or_else(|| PathBuf::from(survey.default_template())),
            output_path: self
                .output_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH)),
            responses_path: self.responses_path,
            survey,
            save_responses: self.save_responses,
            dry_run: self.dry_run,
            backup_existing: self.backup_existing.unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }
}
