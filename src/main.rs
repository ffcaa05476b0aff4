use anyhow::Context;
use clap::Parser;
use copilot_customize::{Config, Pipeline, SurveyKind};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "copilot-customize",
    version,
    author,
    about = "Customize AI assistant instruction templates",
    long_about = "Generate a personalized instruction file for an AI coding assistant \
    from a Markdown template.\n\n\
    The tool collects your tooling preferences (package manager, testing framework, \
    formatter, linter, type checker) through an interactive survey or a saved JSON \
    config, then substitutes placeholders and resolves conditional blocks in the \
    template.\n\n\
    USAGE EXAMPLES:\n  \
      # Interactive survey with the default Python template\n  \
      copilot-customize\n\n  \
      # Reuse a saved configuration\n  \
      copilot-customize --config copilot_config.json\n\n  \
      # JavaScript variant, saving answers for later\n  \
      copilot-customize --survey javascript -t templates/javascript.md --save-config"
)]
struct Cli {
    /// Template file to customize
    #[arg(short, long, value_name = "FILE")]
    template: Option<PathBuf>,

    /// JSON config file with responses (interactive survey if not provided)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output file path
    #[arg(short, long, default_value = ".github/copilot-instructions.md", value_name = "FILE")]
    output: PathBuf,

    /// Survey variant (selects the question catalog and default template)
    #[arg(short, long, value_enum, default_value = "python")]
    survey: CliSurvey,

    /// Save responses to a config file for future use
    #[arg(long)]
    save_config: bool,

    /// Skip writing the output file
    #[arg(long)]
    dry_run: bool,

    /// Don't back up an existing output file before overwriting
    #[arg(long)]
    no_backup: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliSurvey {
    /// Python tooling questions
    Python,
    /// JavaScript/TypeScript tooling questions
    Javascript,
}

impl From<CliSurvey> for SurveyKind {
    fn from(s: CliSurvey) -> Self {
        match s {
            CliSurvey::Python => Self::Python,
            CliSurvey::Javascript => Self::Javascript,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose)?;

    let mut builder = Config::builder()
        .survey(cli.survey.into())
        .output_path(cli.output)
        .save_responses(cli.save_config)
        .dry_run(cli.dry_run)
        .backup_existing(!cli.no_backup);

    if let Some(template) = cli.template {
        builder = builder.template_path(template);
    }

    if let Some(config_path) = cli.config {
        builder = builder.responses_path(config_path);
    }

    let config = builder.build().context("Failed to build configuration")?;

    let stats = Pipeline::new(config)
        .context("Failed to create pipeline")?
        .run()
        .context("Customization failed")?;

    if cli.verbose > 0 {
        stats.print_summary();
    }

    if stats.output_written {
        print_next_steps();
    }

    Ok(())
}

fn print_next_steps() {
    println!();
    println!("Next steps:");
    println!("1. Review the generated instructions");
    println!("2. Commit the file to your repository");
    println!("3. GitHub Copilot will automatically use these instructions in VS Code");
}

fn setup_tracing(verbosity: u8) -> anyhow::Result<()> {
    let filter = match verbosity {
        0 => EnvFilter::new("copilot_customize=info"),
        1 => EnvFilter::new("copilot_customize=debug"),
        _ => EnvFilter::new("copilot_customize=trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_thread_ids(false))
        .init();

    Ok(())
}
