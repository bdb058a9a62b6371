//! Result presentation.

use serde::Serialize;
use tabled::Tabled;

/// The success line shown after the user triggers a prediction.
pub fn format_prediction(value: f64, target_year: i32) -> String {
    format!("Predicted Inflation Rate for {target_year}: {value:.2}%")
}

/// One row of the `--format table` batch output
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct PredictionLine {
    #[tabled(rename = "Record")]
    pub record: usize,
    #[tabled(rename = "Prediction")]
    #[tabled(display = "display_value")]
    pub prediction: f64,
}

fn display_value(value: &f64) -> String {
    format!("{value:.4}")
}

pub fn prediction_table(predictions: &[f64]) -> String {
    let lines: Vec<PredictionLine> = predictions
        .iter()
        .enumerate()
        .map(|(record, prediction)| PredictionLine {
            record,
            prediction: *prediction,
        })
        .collect();
    tabled::Table::new(lines).to_string()
}
