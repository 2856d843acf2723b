use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Number of numeric features compared by the matcher.
pub const FEATURE_DIM: usize = 5;

/// Feature names in the fixed order used by [`ProviderOffering::features`].
pub const FEATURE_NAMES: [&str; FEATURE_DIM] =
    ["storage_needs", "supports_encryption", "cpu_speed", "price_per_hour", "service_model_score"];

pub type FeatureVector = [f64; FEATURE_DIM];

/// Reference dataset column names.
pub mod columns {
    pub const ACTIVITY_FIELD: &str = "Activity_Field";
    pub const STORAGE_NEEDS: &str = "Storage_Needs";
    pub const SUPPORTS_ENCRYPTION: &str = "Supports_Encryption";
    pub const CPU_SPEED: &str = "CPU_Speed";
    pub const PRICE_PER_HOUR: &str = "Price_Per_Hour";
    pub const SERVICE_MODEL_SCORE: &str = "Service_Model_Score";
    pub const PROVIDER: &str = "Provider";

    pub const REQUIRED: [&str; 7] = [
        ACTIVITY_FIELD,
        STORAGE_NEEDS,
        SUPPORTS_ENCRYPTION,
        CPU_SPEED,
        PRICE_PER_HOUR,
        SERVICE_MODEL_SCORE,
        PROVIDER,
    ];
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndustrySegment(pub String);

impl IndustrySegment {
    pub const KNOWN: [&'static str; 6] = ["IT", "Education", "Bank", "Medical", "Telecom", "Other"];

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_known(&self) -> bool {
        Self::KNOWN.contains(&self.0.as_str())
    }
}

impl fmt::Display for IndustrySegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of the reference dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProviderOffering {
    pub segment: IndustrySegment,
    pub storage_gb: f64,
    pub supports_encryption: bool,
    pub cpu_speed_ghz: f64,
    pub price_per_hour: f64,
    pub service_model_score: u8,
    pub provider: String,
    /// Descriptive columns outside the fixed schema, carried through verbatim.
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
}

impl ProviderOffering {
    pub fn features(&self) -> FeatureVector {
        [
            self.storage_gb,
            if self.supports_encryption { 1.0 } else { 0.0 },
            self.cpu_speed_ghz,
            self.price_per_hour,
            f64::from(self.service_model_score),
        ]
    }

    /// Renders the offering keyed by dataset column names, extras included.
    pub fn to_details(&self) -> Value {
        let mut details: Map<String, Value> =
            self.attributes.iter().map(|(key, value)| (key.clone(), value.clone())).collect();

        details.insert(columns::ACTIVITY_FIELD.to_owned(), json!(self.segment.as_str()));
        details.insert(columns::STORAGE_NEEDS.to_owned(), json!(self.storage_gb));
        details.insert(
            columns::SUPPORTS_ENCRYPTION.to_owned(),
            json!(u8::from(self.supports_encryption)),
        );
        details.insert(columns::CPU_SPEED.to_owned(), json!(self.cpu_speed_ghz));
        details.insert(columns::PRICE_PER_HOUR.to_owned(), json!(self.price_per_hour));
        details.insert(columns::SERVICE_MODEL_SCORE.to_owned(), json!(self.service_model_score));
        details.insert(columns::PROVIDER.to_owned(), json!(self.provider));

        Value::Object(details)
    }
}
