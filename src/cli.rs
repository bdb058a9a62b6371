//! Ratecast CLI
//!
//! Commands:
//! - `ratecast predict` - Batch predictions from a JSON file
//! - `ratecast form` - Interactive single-prediction form
//! - `ratecast schema` - Print the expected feature columns
//! - `ratecast serve` - HTTP prediction API

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

use crate::api::types::{PredictRequest, PredictResponse};
use crate::config::AppConfig;
use crate::error::{RatecastError, Result};
use crate::model::ModelFormat;
use crate::predict::Predictor;
use crate::present::prediction_table;

/// Inflation rate forecasting from yearly history
#[derive(Parser, Debug)]
#[command(name = "ratecast")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding default.toml and environment overrides
    #[arg(long, global = true, default_value = "config", env = "RATECAST_CONFIG_DIR")]
    pub config_dir: PathBuf,

    /// Model file (overrides model.path)
    #[arg(short, long, global = true)]
    pub model: Option<PathBuf>,

    /// Model format (overrides model.format)
    #[arg(long, global = true, value_enum)]
    pub model_format: Option<ModelFormat>,

    /// Debug logging for ratecast
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Predict every record in a JSON file
    Predict {
        /// JSON array of records, or {"records": [...]}; `-` reads stdin
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Open the interactive form
    Form,

    /// Print the feature columns in model order
    Schema,

    /// Run the HTTP prediction API
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

impl Cli {
    /// Load configuration and apply command-line overrides
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::load_from(&self.config_dir)?;

        if let Some(path) = &self.model {
            config.model.path = path.clone();
        }
        if let Some(format) = self.model_format {
            config.model.format = format;
        }
        if self.verbose {
            config.logging.level = "debug".to_string();
        }
        if let Commands::Serve { host, port } = &self.command {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
        }

        config.validate().map_err(RatecastError::InvalidConfig)?;
        Ok(config)
    }
}

/// Parse a batch input document
pub fn parse_records(text: &str) -> Result<PredictRequest> {
    serde_json::from_str(text).map_err(|e| {
        RatecastError::InputValidation(format!(
            "expected a JSON array of records or {{\"records\": [...]}}: {e}"
        ))
    })
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Run a batch and render the output
pub fn run_predict(predictor: &Predictor, input: &Path, format: OutputFormat) -> Result<String> {
    let records = parse_records(&read_input(input)?)?.into_records();
    let predictions = predictor.predict_batch(&records)?;

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&PredictResponse {
            predictions,
        })?),
        OutputFormat::Table => Ok(prediction_table(&predictions)),
    }
}

/// One feature name per line
pub fn render_schema(predictor: &Predictor) -> String {
    predictor.schema().names().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureSchema;
    use crate::model::DenseNetwork;
    use std::sync::Arc;

    fn predictor() -> Predictor {
        Predictor::new(
            Arc::new(DenseNetwork::linear(vec![1.0, 10.0, 100.0], 0.0)),
            FeatureSchema::years(1980..=1982),
        )
        .unwrap()
    }

    fn write_input(dir: &tempfile::TempDir, text: &str) -> PathBuf {
        let path = dir.path().join("records.json");
        std::fs::write(&path, text).unwrap();
        path
    }

    const RECORDS: &str = r#"{"records": [
        {"1980": 1.0, "1981": 0.0, "1982": 0.0},
        {"1980": 0.0, "1981": 0.0, "1982": 1.0},
        {"1982": 0.0, "1981": 1.0, "1980": 0.0}
    ]}"#;

    #[test]
    fn predict_file_as_json_keeps_record_order() {
        let tmp = tempfile::tempdir().unwrap();
        let input = write_input(&tmp, RECORDS);

        let output = run_predict(&predictor(), &input, OutputFormat::Json).unwrap();
        let parsed: PredictResponse = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.predictions, vec![1.0, 100.0, 10.0]);
    }

    #[test]
    fn predict_file_as_table_has_one_row_per_record() {
        let tmp = tempfile::tempdir().unwrap();
        let input = write_input(&tmp, RECORDS);

        let output = run_predict(&predictor(), &input, OutputFormat::Table).unwrap();
        assert!(output.contains("Prediction"));
        let first = output.find("1.0000").unwrap();
        let second = output.find("100.0000").unwrap();
        let third = output.find("10.0000").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn predict_file_with_missing_column_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let input = write_input(&tmp, r#"[{"1981": 1.0, "1982": 2.0}]"#);

        let err = run_predict(&predictor(), &input, OutputFormat::Json).unwrap_err();
        assert!(matches!(err, RatecastError::SchemaMismatch(_)));
        assert!(err.to_string().contains("1980"));
    }

    #[test]
    fn predict_missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = run_predict(&predictor(), &tmp.path().join("absent.json"), OutputFormat::Json)
            .unwrap_err();
        assert!(matches!(err, RatecastError::Io(_)));
    }

    #[test]
    fn schema_lists_one_name_per_line() {
        assert_eq!(render_schema(&predictor()), "1980\n1981\n1982");
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ratecast",
            "predict",
            "--input",
            "records.json",
            "--format",
            "table",
            "--model",
            "m.json",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.model, Some(PathBuf::from("m.json")));
        match cli.command {
            Commands::Predict { input, format } => {
                assert_eq!(input, PathBuf::from("records.json"));
                assert_eq!(format, OutputFormat::Table);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn predict_requires_input() {
        assert!(Cli::try_parse_from(["ratecast", "predict"]).is_err());
    }

    #[test]
    fn overrides_apply_to_config() {
        let tmp = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "ratecast",
            "--config-dir",
            tmp.path().to_str().unwrap(),
            "--model-format",
            "xgboost",
            "serve",
            "--port",
            "9000",
        ])
        .unwrap();

        let config = cli.load_config().unwrap();
        assert_eq!(config.model.format, ModelFormat::Xgboost);
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn accepts_both_record_layouts() {
        let bare = parse_records(r#"[{"1980": 1.0}]"#).unwrap();
        assert_eq!(bare.into_records().len(), 1);

        let wrapped = parse_records(r#"{"records": [{"1980": 1.0}, {"1980": 2.0}]}"#).unwrap();
        assert_eq!(wrapped.into_records().len(), 2);

        assert!(parse_records(r#"{"1980": 1.0}"#).is_err());
    }
}
