use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Remedy languages the service can answer in. Closed set; anything else is
/// rejected at the request boundary.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    En,
    Hi,
    Te,
}

impl Language {
    /// Every supported language, in catalog-validation order.
    pub const ALL: [Language; 3] = [Language::En, Language::Hi, Language::Te];

    pub fn code(&self) -> &'static str {
        self.into()
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::En
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PredictionResponse {
    pub disease: String,
    pub confidence: f32,
    pub remedy: String,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChatReply {
    pub reply: String,
}
