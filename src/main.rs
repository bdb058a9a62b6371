use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use ratecast::api::{self, AppState};
use ratecast::cli::{self, Cli, Commands};
use ratecast::logging::{init_logging, init_logging_file_only};
use ratecast::tui::{self, FormApp};
use ratecast::Predictor;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config().context("loading configuration")?;

    let _log_guard = match cli.command {
        Commands::Form => init_logging_file_only(&config.logging),
        _ => init_logging(&config.logging),
    };

    // A model that cannot be loaded is fatal for every command.
    let predictor = match Predictor::from_config(&config) {
        Ok(p) => p,
        Err(e) => {
            error!(path = %config.model.path.display(), "Model load failed: {}", e);
            return Err(e).context("loading model");
        }
    };

    match &cli.command {
        Commands::Predict { input, format } => {
            let output = cli::run_predict(&predictor, input, *format)?;
            println!("{output}");
        }
        Commands::Schema => {
            println!("{}", cli::render_schema(&predictor));
        }
        Commands::Form => {
            let app = FormApp::new(
                predictor.schema(),
                config.features.default_value,
                config.presentation.target_year,
            );
            tui::run_form(app, &predictor).context("running form")?;
        }
        Commands::Serve { .. } => {
            let addr = config.server.bind_addr();
            let state = AppState::new(Arc::new(predictor), config.presentation.target_year);
            info!(%addr, "Starting prediction API");
            api::serve(state, &addr).await?;
        }
    }

    Ok(())
}
