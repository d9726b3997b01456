use std::fmt;

/// The prediction models this client has form schemas and formatters for.
///
/// Backend descriptors carry the key as a string; [`ModelKey::parse`]
/// resolves it, and `None` selects the explicit default branch of every
/// per-model table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKey {
    TelcoChurn,
    WineQuality,
    BitcoinPrice,
    BodyFat,
    CarPrices,
    StrokeRisk,
    HepatitisC,
    CirrhosisStatus,
    AvocadoPrices,
}

impl ModelKey {
    pub const ALL: [ModelKey; 9] = [
        Self::TelcoChurn,
        Self::WineQuality,
        Self::BitcoinPrice,
        Self::BodyFat,
        Self::CarPrices,
        Self::StrokeRisk,
        Self::HepatitisC,
        Self::CirrhosisStatus,
        Self::AvocadoPrices,
    ];

    /// The backend's dataset key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TelcoChurn => "telco_churn",
            Self::WineQuality => "wine_quality",
            Self::BitcoinPrice => "bitcoin_price",
            Self::BodyFat => "body_fat",
            Self::CarPrices => "car_prices",
            Self::StrokeRisk => "stroke_risk",
            Self::HepatitisC => "hepatitis_c",
            Self::CirrhosisStatus => "cirrhosis_status",
            Self::AvocadoPrices => "avocado_prices",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }

    /// Caption shown above a prediction value.
    pub fn prediction_label(self) -> &'static str {
        match self {
            Self::BitcoinPrice => "Closing price (USD)",
            Self::AvocadoPrices => "Average price (USD)",
            Self::BodyFat => "Body fat percentage",
            Self::CarPrices => "Vehicle price (Indian Lakhs)",
            Self::TelcoChurn => "Will churn",
            Self::WineQuality => "Wine quality",
            Self::StrokeRisk => "Stroke risk",
            Self::HepatitisC => "Diagnosis category",
            Self::CirrhosisStatus => "Clinical status",
        }
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_key() {
        for key in ModelKey::ALL {
            assert_eq!(ModelKey::parse(key.as_str()), Some(key));
        }
    }

    #[test]
    fn parse_rejects_unknown_and_differently_cased_keys() {
        assert_eq!(ModelKey::parse("iris"), None);
        assert_eq!(ModelKey::parse("Body_Fat"), None);
        assert_eq!(ModelKey::parse(""), None);
    }

    #[test]
    fn display_matches_backend_key() {
        assert_eq!(ModelKey::HepatitisC.to_string(), "hepatitis_c");
    }
}
