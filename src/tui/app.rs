//! Form state management
//!
//! Holds one numeric field per feature and the Predict trigger. Rendering reads
//! this state; it never computes anything itself.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::{RatecastError, Result};
use crate::features::FeatureSchema;
use crate::predict::Predictor;
use crate::present::format_prediction;

/// One labeled numeric input
#[derive(Debug, Clone)]
pub struct FormField {
    /// Feature name (a year label)
    pub name: String,
    /// Last committed value
    pub value: f64,
    /// Uncommitted text while the user is typing
    pub buffer: Option<String>,
}

impl FormField {
    fn new(name: String, value: f64) -> Self {
        Self {
            name,
            value,
            buffer: None,
        }
    }

    /// Text shown in the input box
    pub fn display(&self) -> String {
        match &self.buffer {
            Some(text) => text.clone(),
            None => format!("{:.2}", self.value),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.buffer.is_some()
    }
}

/// What the notification area shows
#[derive(Debug, Clone, PartialEq)]
pub enum FormStatus {
    /// Nothing predicted since the last edit
    Idle,
    /// Prediction succeeded
    Predicted {
        line: String,
        at: DateTime<Utc>,
    },
    /// Input or prediction failed
    Failed(String),
}

/// Form application state
pub struct FormApp {
    /// Input fields, in schema order
    pub fields: Vec<FormField>,
    /// Currently selected field
    pub selected: usize,
    /// Notification area
    pub status: FormStatus,
    /// Number of Predict triggers that produced a result
    pub predictions_made: usize,
    /// Show help overlay
    pub show_help: bool,
    /// Is the app running
    pub running: bool,
    default_value: f64,
    target_year: i32,
}

impl FormApp {
    /// Create a form with one field per schema column, all set to `default_value`
    pub fn new(schema: &FeatureSchema, default_value: f64, target_year: i32) -> Self {
        Self {
            fields: schema
                .names()
                .iter()
                .map(|n| FormField::new(n.clone(), default_value))
                .collect(),
            selected: 0,
            status: FormStatus::Idle,
            predictions_made: 0,
            show_help: false,
            running: true,
            default_value,
            target_year,
        }
    }

    pub fn target_year(&self) -> i32 {
        self.target_year
    }

    /// Check if app should continue running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Signal the app to quit
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// The success line, once a prediction has been made
    pub fn notification(&self) -> Option<&str> {
        match &self.status {
            FormStatus::Predicted { line, .. } => Some(line),
            _ => None,
        }
    }

    /// Move selection up, committing the field being left
    pub fn select_prev(&mut self) {
        self.leave_field();
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move selection down, committing the field being left
    pub fn select_next(&mut self) {
        self.leave_field();
        if self.selected + 1 < self.fields.len() {
            self.selected += 1;
        }
    }

    /// Type a character into the selected field.
    ///
    /// Only characters that can appear in a decimal number are accepted.
    pub fn input_char(&mut self, c: char) {
        if !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')) {
            return;
        }
        if let Some(field) = self.fields.get_mut(self.selected) {
            field.buffer.get_or_insert_with(String::new).push(c);
            self.status = FormStatus::Idle;
        }
    }

    /// Delete the last typed character of the selected field
    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.selected) {
            let mut text = field.buffer.take().unwrap_or_else(|| format!("{}", field.value));
            text.pop();
            field.buffer = Some(text);
            self.status = FormStatus::Idle;
        }
    }

    /// Drop the uncommitted text of the selected field
    pub fn cancel_edit(&mut self) {
        if let Some(field) = self.fields.get_mut(self.selected) {
            field.buffer = None;
        }
    }

    /// Parse the selected field's text into its value.
    ///
    /// Invalid text is rejected and the previous value is kept.
    pub fn commit_field(&mut self) -> Result<()> {
        let Some(field) = self.fields.get_mut(self.selected) else {
            return Ok(());
        };
        let Some(text) = field.buffer.take() else {
            return Ok(());
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            field.value = self.default_value;
            return Ok(());
        }

        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => {
                field.value = v;
                Ok(())
            }
            _ => Err(RatecastError::InputValidation(format!(
                "{}: {text:?} is not a number",
                field.name
            ))),
        }
    }

    fn leave_field(&mut self) {
        if let Err(e) = self.commit_field() {
            self.status = FormStatus::Failed(e.to_string());
        }
    }

    /// Reset every field to the default value
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.value = self.default_value;
            field.buffer = None;
        }
        self.status = FormStatus::Idle;
    }

    /// Handle the Predict trigger: commit pending input, build the row, run
    /// the model, and publish exactly one result line.
    pub fn trigger_predict(&mut self, predictor: &Predictor) -> Result<f64> {
        let outcome = self.commit_field().and_then(|_| {
            let pairs: Vec<(&str, f64)> = self
                .fields
                .iter()
                .map(|f| (f.name.as_str(), f.value))
                .collect();
            let row = predictor.schema().row_from_pairs(&pairs)?;
            predictor.predict_row(&row)
        });

        match outcome {
            Ok(value) => {
                let line = format_prediction(value, self.target_year);
                info!(value, "{}", line);
                self.status = FormStatus::Predicted {
                    line,
                    at: Utc::now(),
                };
                self.predictions_made += 1;
                Ok(value)
            }
            Err(e) => {
                warn!(error = %e, "Prediction failed");
                self.status = FormStatus::Failed(e.to_string());
                Err(e)
            }
        }
    }
}
