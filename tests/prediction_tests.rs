/// Prediction submission tests.
///
/// Covers form serialization into the request body, the per-model result
/// formatting, and the error notifications.
mod common;

use common::{Call, ScriptedBackend, backend_error, dashboard, network_error};
use jarvis::api::PredictionResult;
use jarvis::app::Level;
use jarvis::forms::FormError;
use serde_json::json;

fn predicted_features(backend: &ScriptedBackend) -> serde_json::Map<String, serde_json::Value> {
    backend
        .calls()
        .into_iter()
        .find_map(|call| match call {
            Call::Predict(_, features) => Some(features),
            _ => None,
        })
        .expect("a prediction request was made")
}

#[test]
fn submit_without_selection_sends_nothing() {
    let mut dash = dashboard(ScriptedBackend {
        models: Ok(Vec::new()),
        ..ScriptedBackend::default()
    });
    dash.load_catalog();
    dash.drain_notifications();

    assert!(dash.submit_prediction().is_none());
    assert_eq!(dash.backend().count(|c| matches!(c, Call::Predict(..))), 0);

    let notes = dash.drain_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, Level::Error);
    assert_eq!(notes[0].message, "Select a model first");
}

#[test]
fn car_defaults_are_sent_with_typed_values() {
    let mut dash = dashboard(ScriptedBackend::default());
    dash.load_catalog();

    let view = dash.submit_prediction().expect("prediction succeeds");

    let features = predicted_features(dash.backend());
    assert_eq!(features.len(), 8);
    assert_eq!(features["car_name"], json!("ritz"));
    assert_eq!(features["year"], json!(2015));
    assert_eq!(features["present_price"], json!(5.59));
    assert_eq!(features["kms_driven"], json!(27000));
    assert_eq!(features["fuel_type"], json!("Petrol"));
    assert_eq!(features["owner"], json!(0));

    assert_eq!(view.label, "Vehicle price (Indian Lakhs)");
    assert_eq!(view.value, "5.59 Lakhs (₹5,59,000 / ~$6,735)");
    assert!(view.confidence.is_none());
    assert_eq!(dash.view().prediction, Some(view));
}

#[test]
fn edited_fields_override_defaults_and_empty_fields_are_dropped() {
    let mut dash = dashboard(ScriptedBackend::default());
    dash.load_catalog();
    dash.set_field("year", "2019").unwrap();
    dash.set_field("kms_driven", "").unwrap();
    dash.set_field("present_price", "abc").unwrap();

    dash.submit_prediction();

    let features = predicted_features(dash.backend());
    assert_eq!(features["year"], json!(2019));
    assert!(!features.contains_key("kms_driven"));
    assert_eq!(features["present_price"], json!("abc"));
}

#[test]
fn unknown_field_is_rejected() {
    let mut dash = dashboard(ScriptedBackend::default());
    dash.load_catalog();

    let err = dash.set_field("horsepower", "120").unwrap_err();
    assert!(matches!(err, FormError::UnknownField { .. }));
}

#[test]
fn batch_edit_with_unknown_field_changes_nothing() {
    let mut dash = dashboard(ScriptedBackend::default());
    dash.load_catalog();

    let err = dash
        .set_fields([("year", "1999"), ("horsepower", "120")])
        .unwrap_err();
    assert!(matches!(err, FormError::UnknownField { .. }));

    dash.submit_prediction();
    assert_eq!(predicted_features(dash.backend())["year"], json!(2015));
}

#[test]
fn batch_edit_applies_every_value() {
    let mut dash = dashboard(ScriptedBackend::default());
    dash.load_catalog();
    dash.set_fields([("year", "2020"), ("owner", "2")]).unwrap();

    dash.submit_prediction();
    let features = predicted_features(dash.backend());
    assert_eq!(features["year"], json!(2020));
    assert_eq!(features["owner"], json!(2));
}

#[test]
fn classification_shows_confidence() {
    let mut dash = dashboard(ScriptedBackend {
        prediction: Ok(PredictionResult {
            dataset: "telco_churn".to_string(),
            prediction: json!("Yes"),
            task_type: "classification".to_string(),
            confidence: Some(0.87),
        }),
        ..ScriptedBackend::default()
    });
    dash.load_catalog();
    dash.select_index(1);

    let view = dash.submit_prediction().expect("prediction succeeds");
    assert_eq!(view.value, "Yes");
    assert_eq!(view.label, "Will churn");
    let confidence = view.confidence.expect("confidence present");
    assert_eq!(confidence.label, "87.0%");
}

#[test]
fn regression_for_model_without_formatter_uses_two_decimals() {
    let mut dash = dashboard(ScriptedBackend {
        prediction: Ok(PredictionResult {
            dataset: "iris".to_string(),
            prediction: json!(3.14159),
            task_type: "regression".to_string(),
            confidence: None,
        }),
        ..ScriptedBackend::default()
    });
    dash.load_catalog();
    dash.select_index(2);

    let view = dash.submit_prediction().expect("prediction succeeds");
    assert_eq!(view.value, "3.14");
    assert_eq!(view.label, "Prediction");
    assert!(predicted_features(dash.backend()).is_empty());
}

#[test]
fn backend_error_message_is_shown() {
    let mut dash = dashboard(ScriptedBackend {
        prediction: Err(backend_error(422, "year must be positive")),
        ..ScriptedBackend::default()
    });
    dash.load_catalog();

    assert!(dash.submit_prediction().is_none());
    let notes = dash.drain_notifications();
    assert_eq!(notes[0].message, "Error: year must be positive");
}

#[test]
fn network_failure_has_generic_message() {
    let mut dash = dashboard(ScriptedBackend {
        prediction: Err(network_error()),
        ..ScriptedBackend::default()
    });
    dash.load_catalog();

    assert!(dash.submit_prediction().is_none());
    let notes = dash.drain_notifications();
    assert_eq!(notes[0].message, "Could not complete the prediction");
    assert!(dash.view().prediction.is_none());
}

#[test]
fn selecting_another_model_hides_the_result() {
    let mut dash = dashboard(ScriptedBackend::default());
    dash.load_catalog();
    dash.submit_prediction();
    assert!(dash.view().prediction.is_some());

    dash.select_index(1);
    assert!(dash.view().prediction.is_none());
}
