//! Prediction result formatting.
//!
//! Regression values are formatted per model; every other task type shows
//! the backend's prediction as-is.

mod fixed;
mod locale;

pub use fixed::to_fixed;
pub use locale::{Grouping, grouped};

use serde::Serialize;
use serde_json::Value;

use crate::api::PredictionResult;
use crate::catalog::ModelKey;
use crate::forms::js_number;

/// Indian rupees per US dollar used for the approximate car price.
const INR_PER_USD: f64 = 83.0;
const RUPEES_PER_LAKH: f64 = 100_000.0;

const REGRESSION: &str = "regression";

/// Caption shown above a prediction value.
pub fn prediction_label(key: Option<ModelKey>) -> &'static str {
    key.map(ModelKey::prediction_label).unwrap_or("Prediction")
}

/// Format a prediction value for display.
///
/// Only `task_type == "regression"` values are formatted; a regression
/// value that is neither a number nor a numeric string is shown raw.
pub fn format_prediction(key: Option<ModelKey>, prediction: &Value, task_type: &str) -> String {
    if task_type != REGRESSION {
        return display_value(prediction);
    }
    let Some(value) = numeric(prediction) else {
        return display_value(prediction);
    };

    match key {
        Some(ModelKey::BitcoinPrice | ModelKey::AvocadoPrices) => {
            format!("${}", grouped(value, Grouping::EnUs, 2, 2))
        }
        Some(ModelKey::CarPrices) => {
            let inr = value * RUPEES_PER_LAKH;
            let usd: f64 = to_fixed(inr / INR_PER_USD, 0).parse().unwrap_or(0.0);
            format!(
                "{} Lakhs (₹{} / ~${})",
                to_fixed(value, 2),
                grouped(inr, Grouping::EnIn, 0, 3),
                grouped(usd, Grouping::EnUs, 0, 3),
            )
        }
        Some(ModelKey::BodyFat) => format!("{}%", to_fixed(value, 2)),
        _ => to_fixed(value, 2),
    }
}

/// Render a JSON scalar the way it reads in a page: strings unquoted,
/// integral floats without a fraction.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.is_f64() => {
            n.as_f64().map(js_number).unwrap_or_else(|| n.to_string())
        }
        other => other.to_string(),
    }
}

fn numeric(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    parsed.is_finite().then_some(parsed)
}

/// Confidence as shown under a result: label and bar width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidenceView {
    /// Raw fraction, usually in `0..=1`.
    pub fraction: f64,
    /// `(c*100)` with one decimal, e.g. `"87.0%"`.
    pub label: String,
    /// Bar width in percent, clamped to `0..=100`.
    pub width: f64,
}

impl ConfidenceView {
    pub fn new(fraction: f64) -> Self {
        let percent = fraction * 100.0;
        Self {
            fraction,
            label: format!("{}%", to_fixed(percent, 1)),
            width: percent.clamp(0.0, 100.0),
        }
    }
}

/// A rendered prediction result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionView {
    pub dataset: String,
    pub label: &'static str,
    pub value: String,
    pub confidence: Option<ConfidenceView>,
    pub task_type: String,
}

impl PredictionView {
    /// Render `result` for the model it was requested for.
    pub fn new(key: Option<ModelKey>, result: &PredictionResult) -> Self {
        Self {
            dataset: result.dataset.clone(),
            label: prediction_label(key),
            value: format_prediction(key, &result.prediction, &result.task_type),
            confidence: result.confidence.map(ConfidenceView::new),
            task_type: result.task_type.clone(),
        }
    }
}
