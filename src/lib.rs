pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod features;
pub mod logging;
pub mod model;
pub mod predict;
pub mod present;
pub mod tui;

pub use config::AppConfig;
pub use error::{RatecastError, Result};
pub use features::{FeatureRow, FeatureSchema, Record};
pub use model::{load_model, ModelFormat, ModelHandle, Regressor};
pub use predict::Predictor;
pub use present::format_prediction;
