use crate::{
    config::Config,
    error::{Error, Result},
    resolver,
    responses::ResponseSet,
    survey,
    validator,
    writer::Writer,
};
use serde::Serialize;
use std::fs;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// Statistics collected during a customization run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineStats {
    /// Number of preferences in the response set
    pub response_count: usize,

    /// Template size in bytes
    pub template_bytes: usize,

    /// Resolved output size in bytes
    pub output_bytes: usize,

    /// Markers still present in the output after resolution
    pub unresolved_markers: Vec<String>,

    /// Whether the output file was written
    pub output_written: bool,

    /// Output file path
    pub output_path: String,

    /// Total execution time
    pub duration: Duration,

    /// Generation timestamp
    pub generated_at: String,
}

impl PipelineStats {
    /// Returns true if the run produced fully resolved output.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unresolved_markers.is_empty()
    }

    /// Prints a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!();
        println!("Customization summary");
        println!("---------------------");
        println!("  Responses:          {}", self.response_count);
        println!("  Template size:      {} bytes", self.template_bytes);
        println!("  Output size:        {} bytes", self.output_bytes);
        println!(
            "  Unresolved markers: {}",
            if self.unresolved_markers.is_empty() {
                "none".to_string()
            } else {
                self.unresolved_markers.join(", ")
            }
        );
        println!("  Output: {}", self.output_path);
        println!("  Duration: {:.2}s", self.duration.as_secs_f64());
        println!();
    }
}

/// Orchestrates a full customization run.
///
/// Collects responses (from a saved file or the interactive survey),
/// resolves the template, checks the output for residual markers, and
/// writes the result.
pub struct Pipeline {
    config: Config,
    writer: Writer,
}

impl Pipeline {
    /// Creates a new pipeline with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let writer = Writer::new(&config.output_path, config.backup_existing);

        Ok(Self { config, writer })
    }

    /// Executes the complete pipeline and returns statistics.
    ///
    /// # Process
    ///
    /// 1. **Collect**: Loads responses from JSON or runs the survey
    /// 2. **Resolve**: Substitutes placeholders and conditional blocks
    /// 3. **Check**: Scans the output for residual markers (non-fatal)
    /// 4. **Write**: Persists the customized instructions
    ///
    /// # Errors
    ///
    /// Returns an error if responses cannot be collected, the template
    /// cannot be read, or the output cannot be written. Unresolved
    /// markers in the output are reported as warnings, never errors.
    #[instrument(skip(self), fields(template = %self.config.template_path.display()))]
    pub fn run(self) -> Result<PipelineStats> {
        let start_time = Instant::now();

        info!("Starting customization");

        // Stage 1: Responses
        let responses = self.collect_responses()?;
        info!("Collected {} responses", responses.len());

        if self.config.save_responses && self.config.responses_path.is_none() {
            let save_path = self.config.responses_save_path();
            responses.save(&save_path)?;
            println!("Configuration saved to: {}", save_path.display());
        }

        // Stage 2: Resolution
        let template = fs::read_to_string(&self.config.template_path)
            .map_err(|e| Error::io(&self.config.template_path, e))?;

        let output = resolver::resolve(&template, &responses);
        info!(
            "Resolved template ({} -> {} bytes)",
            template.len(),
            output.len()
        );

        // Stage 3: Residual marker check (non-fatal)
        let unresolved = validator::find_unresolved_markers(&output);
        if !unresolved.is_empty() {
            warn!(
                "Output contains {} unresolved marker(s):",
                unresolved.len()
            );
            for marker in &unresolved {
                warn!("  {marker}");
            }
        }

        // Stage 4: Write
        let output_written = if self.config.dry_run {
            warn!("Dry run mode enabled - skipping file writes");
            false
        } else {
            self.writer.write(&output)?;
            true
        };

        let stats = PipelineStats {
            response_count: responses.len(),
            template_bytes: template.len(),
            output_bytes: output.len(),
            unresolved_markers: unresolved,
            output_written,
            output_path: self.config.output_path.display().to_string(),
            duration: start_time.elapsed(),
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };

        info!(
            "Customization completed in {:.2}s",
            stats.duration.as_secs_f64()
        );

        Ok(stats)
    }

    /// Loads responses from the configured file or runs the survey.
    fn collect_responses(&self) -> Result<ResponseSet> {
        match self.config.responses_path {
            Some(ref path) => {
                let responses = ResponseSet::load(path)?;
                println!("Loaded configuration from: {}", path.display());
                Ok(responses)
            }
            None => survey::run_survey(self.config.survey),
        }
    }
}
