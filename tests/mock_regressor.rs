use std::sync::Arc;

use mockall::mock;
use ratecast::{
    FeatureRow, FeatureSchema, Predictor, RatecastError, Record, Regressor, Result,
};

mock! {
    pub Model {}

    impl Regressor for Model {
        fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>>;
        fn input_dim(&self) -> Option<usize>;
        fn feature_names(&self) -> Option<Vec<String>>;
        fn kind(&self) -> &'static str;
    }
}

fn schema() -> FeatureSchema {
    FeatureSchema::years(2021..=2023)
}

fn undeclared() -> MockModel {
    let mut model = MockModel::new();
    model.expect_input_dim().return_const(None::<usize>);
    model.expect_feature_names().return_const(None::<Vec<String>>);
    model.expect_kind().return_const("mock");
    model
}

fn record(values: [f64; 3]) -> Record {
    schema().names().iter().cloned().zip(values).collect()
}

#[test]
fn rows_reach_the_model_in_schema_order() {
    let mut model = undeclared();
    model
        .expect_predict()
        .withf(|rows| {
            rows.len() == 2
                && rows[0].values() == [1.0, 2.0, 3.0]
                && rows[1].values() == [4.0, 5.0, 6.0]
        })
        .times(1)
        .returning(|rows| Ok(rows.iter().map(|r| r.values().iter().sum()).collect()));

    let predictor = Predictor::new(Arc::new(model), schema()).unwrap();
    let out = predictor
        .predict_batch(&[record([1.0, 2.0, 3.0]), record([4.0, 5.0, 6.0])])
        .unwrap();
    assert_eq!(out, vec![6.0, 15.0]);
}

#[test]
fn invalid_records_never_reach_the_model() {
    let mut model = undeclared();
    model.expect_predict().times(0);

    let predictor = Predictor::new(Arc::new(model), schema()).unwrap();
    let mut bad = record([1.0, 2.0, 3.0]);
    bad.remove("2021");
    assert!(predictor.predict_batch(&[bad]).is_err());
}

#[test]
fn empty_batch_skips_the_model() {
    let mut model = undeclared();
    model.expect_predict().times(0);

    let predictor = Predictor::new(Arc::new(model), schema()).unwrap();
    assert!(predictor.predict_batch(&[]).unwrap().is_empty());
}

#[test]
fn short_model_output_is_an_inference_error() {
    let mut model = undeclared();
    model.expect_predict().returning(|_| Ok(vec![1.0]));

    let predictor = Predictor::new(Arc::new(model), schema()).unwrap();
    let err = predictor
        .predict_batch(&[record([0.0; 3]), record([0.0; 3])])
        .unwrap_err();
    assert!(matches!(err, RatecastError::Inference(_)));
}

#[test]
fn backend_errors_propagate_unchanged() {
    let mut model = undeclared();
    model
        .expect_predict()
        .returning(|_| Err(RatecastError::Inference("session closed".into())));

    let predictor = Predictor::new(Arc::new(model), schema()).unwrap();
    let err = predictor.predict_batch(&[record([0.0; 3])]).unwrap_err();
    assert_eq!(err.to_string(), RatecastError::Inference("session closed".into()).to_string());
}

#[test]
fn declared_width_must_match_schema() {
    let mut model = MockModel::new();
    model.expect_input_dim().return_const(Some(44usize));
    model.expect_feature_names().return_const(None::<Vec<String>>);
    model.expect_kind().return_const("mock");

    let err = Predictor::new(Arc::new(model), schema()).unwrap_err();
    assert!(matches!(err, RatecastError::SchemaMismatch(_)));
}

#[test]
fn declared_names_must_match_schema() {
    let mut model = MockModel::new();
    model.expect_input_dim().return_const(Some(3usize));
    model
        .expect_feature_names()
        .return_const(Some(vec!["2021".to_string(), "2022".to_string(), "2024".to_string()]));
    model.expect_kind().return_const("mock");

    let err = Predictor::new(Arc::new(model), schema()).unwrap_err();
    assert!(err.to_string().contains("2024"));
}
