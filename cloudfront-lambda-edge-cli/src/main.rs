//! Command line adapter: reads a compiled template and a service definition,
//! wires the declared Lambda@Edge associations in and writes the result.

mod config;

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use cloudfront_lambda_edge_core::{
    EdgeAssociationError, LogFacadeSink, ServerlessNaming, Template, TemplateTransformer,
};
use log::{error, info, LevelFilter};

use crate::config::ServiceDefinition;

/// Exit code for fatal transformation errors (bad event type, missing distribution, ...).
const EXIT_TRANSFORM_ERROR: u8 = 1;
/// Exit code for unreadable or unparsable inputs and output write failures.
const EXIT_INPUT_ERROR: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "cloudfront-lambda-edge",
    version,
    about = "Associate Lambda@Edge functions with CloudFront cache behaviors in a compiled CloudFormation template"
)]
struct Cli {
    /// Compiled CloudFormation template (JSON)
    #[arg(long, short = 't')]
    template: PathBuf,

    /// Service definition declaring `functions` (serverless.yml or JSON)
    #[arg(long, short = 's')]
    service: PathBuf,

    /// Deployment stage used for export names; overrides `provider.stage`
    #[arg(long, env = "LAMBDA_EDGE_STAGE")]
    stage: Option<String>,

    /// Write the transformed template here instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Print the transformation report as JSON on stderr
    #[arg(long, default_value_t = false)]
    report: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short = 'v', action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(long, short = 'q', default_value_t = false)]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        match (self.quiet, self.verbose) {
            (true, _) => LevelFilter::Warn,
            (false, 0) => LevelFilter::Info,
            (false, 1) => LevelFilter::Debug,
            (false, _) => LevelFilter::Trace,
        }
    }
}

fn init_logging(level: LevelFilter) {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(level.to_string().to_ascii_lowercase()),
    )
    .format_timestamp(None)
    .format_target(false)
    .init();
}

fn run(cli: &Cli) -> Result<()> {
    let definition = ServiceDefinition::load(&cli.service)?;
    let stage = definition.resolve_stage(cli.stage.as_deref());

    let raw = fs::read_to_string(&cli.template)
        .with_context(|| format!("Failed to read template {}", cli.template.display()))?;
    let mut template = Template::from_json(&raw)
        .with_context(|| format!("Failed to parse template {}", cli.template.display()))?;

    match &definition.service {
        Some(service) => info!("Transforming template for service {service} (stage {stage})"),
        None => info!("Transforming template (stage {stage})"),
    }

    let naming = ServerlessNaming;
    let report = TemplateTransformer::new(&naming, &stage).transform(
        &mut template,
        &definition.functions,
        &mut LogFacadeSink,
    )?;

    let rendered = template
        .to_json_pretty()
        .context("Failed to serialize transformed template")?;
    match &cli.output {
        Some(path) => fs::write(path, format!("{rendered}\n"))
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => writeln!(io::stdout().lock(), "{rendered}").context("Failed to write to stdout")?,
    }

    if cli.report {
        let summary =
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        eprintln!("{summary}");
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            if e.downcast_ref::<EdgeAssociationError>().is_some() {
                ExitCode::from(EXIT_TRANSFORM_ERROR)
            } else {
                ExitCode::from(EXIT_INPUT_ERROR)
            }
        }
    }
}
