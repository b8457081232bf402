use std::collections::HashMap;

use shared::Language;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CatalogError {
    #[error("label catalog is empty")]
    EmptyCatalog,
    #[error("no remedies configured for disease {0:?}")]
    MissingDisease(String),
    #[error("missing {language} remedy for disease {disease:?}")]
    MissingRemedy {
        disease: String,
        language: &'static str,
    },
    #[error("remedy entry {0:?} does not match any catalog label")]
    OrphanRemedy(String),
}

/// Deployment catalog: the ordered label list the classifier was trained
/// against, plus remedy text for every (disease, language) pair.
///
/// The label order must match the output order of the model artifact.
pub struct Catalog {
    labels: Vec<String>,
    remedies: HashMap<String, HashMap<Language, String>>,
}

impl Catalog {
    pub fn new(
        labels: Vec<String>,
        remedies: HashMap<String, HashMap<Language, String>>,
    ) -> Self {
        Self { labels, remedies }
    }

    /// The catalog shipped with the current model artifact.
    pub fn builtin() -> Self {
        let labels = vec![
            "Apple Scab".to_string(),
            "Corn Leaf Blight".to_string(),
            "Grape Black Rot".to_string(),
            "Healthy".to_string(),
        ];

        let mut remedies = HashMap::new();
        remedies.insert(
            "Apple Scab".to_string(),
            translations(
                "Apply fungicides like captan or sulfur.",
                "कैप्टन जैसे फफूंदनाशक का उपयोग करें।",
                "క్యాప్టాన్ వంటి ఫంగిసైడ్ వాడండి.",
            ),
        );
        remedies.insert(
            "Corn Leaf Blight".to_string(),
            translations(
                "Use resistant hybrids and crop rotation.",
                "प्रतिरोधी किस्मों का उपयोग करें।",
                "ప్రతిరోధక రకాలను వాడండి.",
            ),
        );
        remedies.insert(
            "Grape Black Rot".to_string(),
            translations(
                "Prune infected areas and apply fungicide.",
                "संक्रमित भागों को हटाएं।",
                "సంక్రమిత భాగాలను తొలగించండి.",
            ),
        );
        remedies.insert(
            "Healthy".to_string(),
            translations(
                "Your plant is healthy.",
                "आपका पौधा स्वस्थ है।",
                "మీ మొక్క ఆరోగ్యంగా ఉంది.",
            ),
        );

        Self::new(labels, remedies)
    }

    /// Startup consistency check: every label must resolve in every supported
    /// language, and the remedy table must not carry entries for unknown
    /// diseases. A gap here is a deployment defect, so callers should refuse
    /// to start rather than discover it per-request.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.labels.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }

        for label in &self.labels {
            let entry = self
                .remedies
                .get(label)
                .ok_or_else(|| CatalogError::MissingDisease(label.clone()))?;
            for language in Language::ALL {
                if !entry.contains_key(&language) {
                    return Err(CatalogError::MissingRemedy {
                        disease: label.clone(),
                        language: language.code(),
                    });
                }
            }
        }

        for disease in self.remedies.keys() {
            if !self.labels.iter().any(|label| label == disease) {
                return Err(CatalogError::OrphanRemedy(disease.clone()));
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn remedy(&self, disease: &str, language: Language) -> Option<&str> {
        self.remedies
            .get(disease)
            .and_then(|entry| entry.get(&language))
            .map(String::as_str)
    }
}

fn translations(en: &str, hi: &str, te: &str) -> HashMap<Language, String> {
    let mut entry = HashMap::new();
    entry.insert(Language::En, en.to_string());
    entry.insert(Language::Hi, hi.to_string());
    entry.insert(Language::Te, te.to_string());
    entry
}
