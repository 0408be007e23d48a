//! `ewaybill`: render one e-Way Bill PDF per spreadsheet row

use clap::Parser;
use ewaybill::{load_records, run_batch, BatchReport, Config};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Debug, Parser)]
#[command(name = "ewaybill", version, about = "Generate e-Way Bill PDFs from a spreadsheet")]
struct Cli {
    /// Spreadsheet (.xlsx, .xls, .xlsb or .ods)
    input: PathBuf,

    /// Worksheet to read [default: ACC]
    #[arg(short, long)]
    sheet: Option<String>,

    /// Output directory [default: output]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with issuer and batch settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Create the output directory if it does not exist
    #[arg(long)]
    create_output_dir: bool,
}

impl Cli {
    /// Configuration file (or defaults) with command-line overrides applied
    fn resolve_config(&self) -> ewaybill::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        config.batch.input = self.input.clone();
        if let Some(sheet) = &self.sheet {
            config.batch.sheet = sheet.clone();
        }
        if let Some(output) = &self.output {
            config.batch.output_dir = output.clone();
        }
        if self.create_output_dir {
            config.batch.create_output_dir = true;
        }

        Ok(config)
    }
}

fn run(cli: &Cli) -> ewaybill::Result<BatchReport> {
    let config = cli.resolve_config()?;
    let batch = &config.batch;

    let records = load_records(&batch.input, &batch.sheet)?;

    if batch.create_output_dir {
        std::fs::create_dir_all(&batch.output_dir)?;
    }

    Ok(run_batch(&records, batch, &config.issuer))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_overrides_apply_over_defaults() {
        let cli = Cli::parse_from([
            "ewaybill",
            "bills.xlsx",
            "--sheet",
            "JAN",
            "--output",
            "out",
            "--create-output-dir",
        ]);
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.batch.input, PathBuf::from("bills.xlsx"));
        assert_eq!(config.batch.sheet, "JAN");
        assert_eq!(config.batch.output_dir, PathBuf::from("out"));
        assert!(config.batch.create_output_dir);
        assert_eq!(config.issuer, ewaybill::IssuerConfig::default());
    }

    #[test]
    fn test_defaults_without_flags() {
        let cli = Cli::parse_from(["ewaybill", "final_data.xlsx"]);
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.batch.sheet, "ACC");
        assert_eq!(config.batch.output_dir, PathBuf::from("output"));
        assert!(!config.batch.create_output_dir);
    }
}
