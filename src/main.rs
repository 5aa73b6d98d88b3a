mod config;
mod encoder;
mod error;
mod locator;
mod pipeline;
mod report;
mod selector;
mod suggest;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use config::SnapNameConfig;
use encoder::Encoder;
use error::{Error, Stage};
use pipeline::{Naming, Pipeline};
use suggest::OpenRouterClient;

/// Rename the latest screenshot with an AI-suggested name and convert it to WebP
#[derive(Debug, Parser)]
#[command(name = "snapname", version, about)]
struct Cli {
    /// Config file (default: <config dir>/snapname/config.json)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory to search for screenshots
    #[arg(short, long, value_name = "DIR")]
    dir: Option<String>,

    /// Screenshot filename prefix
    #[arg(long)]
    prefix: Option<String>,

    /// Model identifier
    #[arg(short, long)]
    model: Option<String>,

    /// Chat-completion endpoint URL
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Encoder quality
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=100))]
    quality: Option<u8>,

    /// Encoder binary
    #[arg(long, value_name = "BIN")]
    encoder: Option<String>,

    /// Replace the output file if it already exists
    #[arg(long)]
    overwrite: bool,

    /// Describe the file to the model instead of sending the image
    #[arg(long)]
    no_image: bool,

    /// Use this name instead of asking the model
    #[arg(short, long)]
    name: Option<String>,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded config
    fn apply(&self, config: &mut SnapNameConfig) {
        if let Some(dir) = &self.dir {
            config.screenshot_dir = dir.clone();
        }
        if let Some(prefix) = &self.prefix {
            config.prefix = prefix.clone();
        }
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(quality) = self.quality {
            config.quality = quality;
        }
        if let Some(encoder) = &self.encoder {
            config.encoder = encoder.clone();
        }
        if self.overwrite {
            config.overwrite = true;
        }
        if self.no_image {
            config.attach_image = false;
        }
    }

    fn naming(&self) -> Naming {
        match &self.name {
            Some(name) => Naming::Fixed(name.clone()),
            None => Naming::Suggest,
        }
    }

    fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut config = SnapNameConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    config.validate()?;

    let source = OpenRouterClient::from_config(&config);
    let encoder = Encoder::new(config.encoder.as_str(), config.quality);
    let pipeline = Pipeline::new(&config, source, encoder);

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    pipeline.run(&cli.naming(), &mut stdin.lock(), &mut stdout)?;
    stdout
        .flush()
        .map_err(|e| Error::io(Stage::Report, "<stdout>", e))?;
    Ok(())
}

/// One-line message and exit code for a failed run
fn diagnostic(err: &anyhow::Error) -> (String, u8) {
    match err.downcast_ref::<Error>() {
        Some(err) => (
            format!("snapname: {} failed: {}", err.stage(), err),
            err.exit_code() as u8,
        ),
        None => (format!("snapname: setup failed: {:#}", err), 1),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let (message, code) = diagnostic(&err);
            eprintln!("{}", message);
            ExitCode::from(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "snapname",
            "--dir",
            "/srv/shots",
            "-q",
            "60",
            "--model",
            "openai/gpt-4o-mini",
            "--overwrite",
            "--no-image",
        ]);
        let mut config = SnapNameConfig::default();
        cli.apply(&mut config);

        assert_eq!(config.screenshot_dir, "/srv/shots");
        assert_eq!(config.quality, 60);
        assert_eq!(config.model, "openai/gpt-4o-mini");
        assert!(config.overwrite);
        assert!(!config.attach_image);
        assert_eq!(config.prefix, "SCR-");
        assert_eq!(cli.naming(), Naming::Suggest);
    }

    #[test]
    fn test_cli_rejects_quality_over_100() {
        assert!(Cli::try_parse_from(["snapname", "-q", "101"]).is_err());
    }

    #[test]
    fn test_cli_name_and_verbosity() {
        let cli = Cli::parse_from(["snapname", "-n", "my shot", "-vv"]);
        assert_eq!(cli.naming(), Naming::Fixed("my shot".into()));
        assert_eq!(cli.log_filter(), "debug");
        assert_eq!(Cli::parse_from(["snapname"]).log_filter(), "warn");
    }

    #[test]
    fn test_diagnostic_names_stage_and_exit_code() {
        let err = anyhow::Error::from(Error::Auth("OPENROUTER_API_KEY".into()));
        let (message, code) = diagnostic(&err);
        assert_eq!(
            message,
            "snapname: suggest failed: environment variable OPENROUTER_API_KEY is not set"
        );
        assert_eq!(code, 3);

        let flush = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = anyhow::Error::from(Error::io(Stage::Report, "<stdout>", flush));
        let (message, code) = diagnostic(&err);
        assert_eq!(message, "snapname: report failed: <stdout>: pipe closed");
        assert_eq!(code, 10);
    }

    #[test]
    fn test_diagnostic_for_untyped_error() {
        let err = anyhow::anyhow!("disk on fire").context("Failed to start");
        let (message, code) = diagnostic(&err);
        assert_eq!(message, "snapname: setup failed: Failed to start: disk on fire");
        assert_eq!(code, 1);
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
