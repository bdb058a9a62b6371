use std::path::PathBuf;

use ratecast::tui::{handle_action, FormApp, FormStatus, KeyAction};
use ratecast::{AppConfig, Predictor};

fn setup() -> (FormApp, Predictor) {
    let model = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("models/best_inflation_model.json");
    let config = AppConfig::default_config(model);
    let predictor = Predictor::from_config(&config).unwrap();
    let app = FormApp::new(
        predictor.schema(),
        config.features.default_value,
        config.presentation.target_year,
    );
    (app, predictor)
}

fn press(app: &mut FormApp, predictor: &Predictor, keys: &[KeyAction]) {
    for key in keys {
        handle_action(app, *key, predictor);
    }
}

#[test]
fn nothing_is_shown_before_the_first_trigger() {
    let (mut app, predictor) = setup();
    press(
        &mut app,
        &predictor,
        &[KeyAction::Input('5'), KeyAction::Commit, KeyAction::Down],
    );
    assert_eq!(app.predictions_made, 0);
    assert!(app.notification().is_none());
}

#[test]
fn defaults_predict_the_intercept() {
    let (mut app, predictor) = setup();
    press(&mut app, &predictor, &[KeyAction::Predict]);
    assert_eq!(
        app.notification(),
        Some("Predicted Inflation Rate for 2024: 0.35%")
    );
}

#[test]
fn editing_the_latest_year_moves_the_prediction() {
    let (mut app, predictor) = setup();

    // Jump to 2023, the last field.
    let mut keys = vec![KeyAction::Down; 43];
    keys.extend([KeyAction::Input('1'), KeyAction::Input('0'), KeyAction::Predict]);
    press(&mut app, &predictor, &keys);

    // 0.55 * 10 + 0.35
    assert_eq!(
        app.notification(),
        Some("Predicted Inflation Rate for 2024: 5.85%")
    );
    assert_eq!(app.predictions_made, 1);
}

#[test]
fn each_trigger_yields_one_line() {
    let (mut app, predictor) = setup();
    for n in 1..=3 {
        press(&mut app, &predictor, &[KeyAction::Predict]);
        assert_eq!(app.predictions_made, n);
        assert!(app.notification().is_some());
    }
}

#[test]
fn bad_input_reports_an_error_and_keeps_values() {
    let (mut app, predictor) = setup();
    press(
        &mut app,
        &predictor,
        &[KeyAction::Input('.'), KeyAction::Input('.'), KeyAction::Predict],
    );
    assert!(matches!(app.status, FormStatus::Failed(_)));
    assert_eq!(app.predictions_made, 0);
    assert_eq!(app.fields[0].value, 0.0);
}

#[test]
fn reset_restores_defaults_after_prediction() {
    let (mut app, predictor) = setup();
    press(
        &mut app,
        &predictor,
        &[
            KeyAction::Input('3'),
            KeyAction::Predict,
            KeyAction::Reset,
        ],
    );
    assert!(app.fields.iter().all(|f| f.value == 0.0));
    assert!(app.notification().is_none());
}
