//! Static field catalog: the input form for each known model.
//!
//! Field names are the backend's feature keys and must match them exactly;
//! nothing checks this client-side, a mismatch only surfaces as a backend
//! error.

use crate::catalog::ModelKey;

/// How a field is rendered and what it is pre-filled with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Drop-down over a fixed option set; the first option is the default.
    Select { options: &'static [&'static str] },
    /// Numeric input with an example value. `step: None` renders as `any`.
    Number { value: f64, step: Option<f64> },
    /// Free-text input with an example value.
    Text { value: &'static str },
}

/// One field of a model's input form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

const fn select(
    name: &'static str,
    label: &'static str,
    options: &'static [&'static str],
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind: FieldKind::Select { options },
    }
}

const fn int(name: &'static str, label: &'static str, value: f64) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind: FieldKind::Number { value, step: None },
    }
}

const fn dec(name: &'static str, label: &'static str, value: f64, step: f64) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind: FieldKind::Number {
            value,
            step: Some(step),
        },
    }
}

const fn text(name: &'static str, label: &'static str, value: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind: FieldKind::Text { value },
    }
}

const YES_NO: &[&str] = &["Yes", "No"];
const YES_NO_PHONE: &[&str] = &["Yes", "No", "No phone service"];
const YES_NO_INTERNET: &[&str] = &["Yes", "No", "No internet service"];
const Y_N: &[&str] = &["Y", "N"];

const TELCO_CHURN: &[FieldSpec] = &[
    select("gender", "Gender", &["Male", "Female"]),
    int("SeniorCitizen", "Senior citizen (0/1)", 0.0),
    select("Partner", "Partner", YES_NO),
    select("Dependents", "Dependents", YES_NO),
    int("tenure", "Tenure (months)", 12.0),
    select("PhoneService", "Phone service", YES_NO),
    select("MultipleLines", "Multiple lines", YES_NO_PHONE),
    select(
        "InternetService",
        "Internet service",
        &["DSL", "Fiber optic", "No"],
    ),
    select("OnlineSecurity", "Online security", YES_NO_INTERNET),
    select("OnlineBackup", "Online backup", YES_NO_INTERNET),
    select("DeviceProtection", "Device protection", YES_NO_INTERNET),
    select("TechSupport", "Tech support", YES_NO_INTERNET),
    select("StreamingTV", "Streaming TV", YES_NO_INTERNET),
    select("StreamingMovies", "Streaming movies", YES_NO_INTERNET),
    select(
        "Contract",
        "Contract",
        &["Month-to-month", "One year", "Two year"],
    ),
    select("PaperlessBilling", "Paperless billing", YES_NO),
    select(
        "PaymentMethod",
        "Payment method",
        &[
            "Electronic check",
            "Mailed check",
            "Bank transfer (automatic)",
            "Credit card (automatic)",
        ],
    ),
    dec("MonthlyCharges", "Monthly charges ($)", 70.35, 0.01),
    dec("TotalCharges", "Total charges ($)", 1397.475, 0.01),
];

const WINE_QUALITY: &[FieldSpec] = &[
    select("type", "Wine type", &["white", "red"]),
    dec("fixed acidity", "Fixed acidity", 7.0, 0.1),
    dec("volatile acidity", "Volatile acidity", 0.27, 0.01),
    dec("citric acid", "Citric acid", 0.36, 0.01),
    dec("residual sugar", "Residual sugar", 20.7, 0.1),
    dec("chlorides", "Chlorides", 0.045, 0.001),
    dec("free sulfur dioxide", "Free sulfur dioxide", 45.0, 0.1),
    dec("total sulfur dioxide", "Total sulfur dioxide", 170.0, 0.1),
    dec("density", "Density", 1.001, 0.001),
    dec("pH", "pH", 3.0, 0.01),
    dec("sulphates", "Sulphates", 0.45, 0.01),
    dec("alcohol", "Alcohol (%)", 8.8, 0.1),
];

const BITCOIN_PRICE: &[FieldSpec] = &[
    dec("open", "Opening price ($)", 650.00, 0.01),
    dec("high", "High price ($)", 670.00, 0.01),
    dec("low", "Low price ($)", 630.00, 0.01),
    text("volume", "Volume", "35,000,000"),
    text("market_cap", "Market cap", "10,000,000,000"),
    dec("lag_1", "Previous day price ($)", 640.00, 0.01),
    dec("lag_7", "Price 7 days ago ($)", 620.00, 0.01),
    dec("rolling_mean_7", "7-day moving average ($)", 635.00, 0.01),
];

const BODY_FAT: &[FieldSpec] = &[
    dec("density", "Body density", 1.0708, 0.0001),
    int("age", "Age", 23.0),
    dec("weight", "Weight (lbs)", 154.25, 0.01),
    dec("height", "Height (inches)", 67.75, 0.01),
    dec("neck", "Neck (cm)", 36.2, 0.1),
    dec("chest", "Chest (cm)", 93.1, 0.1),
    dec("abdomen", "Abdomen (cm)", 85.2, 0.1),
    dec("hip", "Hip (cm)", 94.5, 0.1),
    dec("thigh", "Thigh (cm)", 59.0, 0.1),
    dec("knee", "Knee (cm)", 37.3, 0.1),
    dec("ankle", "Ankle (cm)", 21.9, 0.1),
    dec("biceps", "Biceps (cm)", 32.0, 0.1),
    dec("forearm", "Forearm (cm)", 27.4, 0.1),
    dec("wrist", "Wrist (cm)", 17.1, 0.1),
];

const CAR_PRICES: &[FieldSpec] = &[
    text("car_name", "Car name", "ritz"),
    int("year", "Year", 2015.0),
    dec("present_price", "Present price (Indian Lakhs)", 5.59, 0.01),
    int("kms_driven", "Kilometers driven", 27000.0),
    select("fuel_type", "Fuel type", &["Petrol", "Diesel", "CNG"]),
    select("seller_type", "Seller type", &["Dealer", "Individual"]),
    select("transmission", "Transmission", &["Manual", "Automatic"]),
    int("owner", "Previous owners", 0.0),
];

const STROKE_RISK: &[FieldSpec] = &[
    select("gender", "Gender", &["Male", "Female", "Other"]),
    int("age", "Age", 67.0),
    int("hypertension", "Hypertension", 0.0),
    int("heart_disease", "Heart disease", 1.0),
    select("ever_married", "Ever married", YES_NO),
    select(
        "work_type",
        "Work type",
        &[
            "Private",
            "Self-employed",
            "Govt_job",
            "children",
            "Never_worked",
        ],
    ),
    select("residence_type", "Residence type", &["Urban", "Rural"]),
    dec("avg_glucose_level", "Average glucose level", 228.69, 0.01),
    dec("bmi", "BMI", 36.6, 0.1),
    select(
        "smoking_status",
        "Smoking status",
        &["formerly smoked", "never smoked", "smokes", "Unknown"],
    ),
];

const HEPATITIS_C: &[FieldSpec] = &[
    int("age", "Age", 32.0),
    select("sex", "Sex", &["m", "f"]),
    dec("alb", "Albumin", 38.5, 0.1),
    dec("alp", "Alkaline phosphatase", 52.5, 0.1),
    dec("alt", "ALT", 7.7, 0.1),
    dec("ast", "AST", 22.1, 0.1),
    dec("bil", "Bilirubin", 7.5, 0.1),
    dec("che", "Cholinesterase", 6.93, 0.01),
    dec("chol", "Cholesterol", 3.23, 0.01),
    dec("crea", "Creatinine", 106.0, 0.1),
    dec("ggt", "GGT", 12.1, 0.1),
    dec("prot", "Total protein", 69.0, 0.1),
];

const CIRRHOSIS_STATUS: &[FieldSpec] = &[
    int("n_days", "Days under observation", 400.0),
    select("drug", "Drug", &["D-penicillamine", "Placebo"]),
    int("age", "Age (days)", 21464.0),
    select("sex", "Sex", &["M", "F"]),
    select("ascites", "Ascites", Y_N),
    select("hepatomegaly", "Hepatomegaly", Y_N),
    select("spiders", "Spider angiomas", Y_N),
    select("edema", "Edema", &["Y", "N", "S"]),
    dec("bilirubin", "Bilirubin", 14.5, 0.1),
    dec("cholesterol", "Cholesterol", 261.0, 0.1),
    dec("albumin", "Albumin", 2.60, 0.01),
    dec("copper", "Copper", 156.0, 0.1),
    dec("alk_phos", "Alkaline phosphatase", 1718.0, 0.1),
    dec("sgot", "SGOT", 137.95, 0.01),
    dec("tryglicerides", "Triglycerides", 172.0, 0.1),
    dec("platelets", "Platelets", 190.0, 0.1),
    dec("prothrombin", "Prothrombin", 12.2, 0.1),
    int("stage", "Stage", 4.0),
];

const AVOCADO_PRICES: &[FieldSpec] = &[
    text("date", "Date", "2015-12-27"),
    dec("total_volume", "Total volume", 64236.62, 0.01),
    dec("4046", "PLU 4046", 1036.74, 0.01),
    dec("4225", "PLU 4225", 54454.85, 0.01),
    dec("4770", "PLU 4770", 48.16, 0.01),
    dec("total_bags", "Total bags", 8696.87, 0.01),
    dec("small_bags", "Small bags", 8603.62, 0.01),
    dec("large_bags", "Large bags", 93.25, 0.01),
    dec("xlarge_bags", "Extra large bags", 0.0, 0.01),
    select("type", "Type", &["conventional", "organic"]),
    int("year", "Year", 2015.0),
    text("region", "Region", "Albany"),
];

/// The ordered form fields for a model.
pub fn schema_for(key: ModelKey) -> &'static [FieldSpec] {
    match key {
        ModelKey::TelcoChurn => TELCO_CHURN,
        ModelKey::WineQuality => WINE_QUALITY,
        ModelKey::BitcoinPrice => BITCOIN_PRICE,
        ModelKey::BodyFat => BODY_FAT,
        ModelKey::CarPrices => CAR_PRICES,
        ModelKey::StrokeRisk => STROKE_RISK,
        ModelKey::HepatitisC => HEPATITIS_C,
        ModelKey::CirrhosisStatus => CIRRHOSIS_STATUS,
        ModelKey::AvocadoPrices => AVOCADO_PRICES,
    }
}
