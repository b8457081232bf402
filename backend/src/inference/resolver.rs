use std::sync::Arc;

use shared::{Language, PredictionResponse};

use crate::cache::ResultCache;
use crate::catalog::Catalog;

use super::preprocess::preprocess;
use super::{Classifier, PredictError};

/// Orchestrates one prediction: preprocess the upload, run the classifier,
/// turn the winning score into a catalogued disease and localized remedy,
/// and publish the result to the single-slot cache.
#[derive(Clone)]
pub struct InferenceResolver {
    classifier: Arc<dyn Classifier>,
    catalog: Arc<Catalog>,
    cache: ResultCache,
}

impl InferenceResolver {
    pub fn new(classifier: Arc<dyn Classifier>, catalog: Arc<Catalog>, cache: ResultCache) -> Self {
        Self {
            classifier,
            catalog,
            cache,
        }
    }

    /// Any failure aborts the whole call and leaves the cache untouched;
    /// there is no partial result and no retry.
    pub fn resolve(
        &self,
        image: &[u8],
        language: Language,
    ) -> Result<PredictionResponse, PredictError> {
        let tensor = preprocess(image)?;
        let scores = self.classifier.predict(&tensor)?;

        let (index, top) = argmax(&scores).ok_or_else(|| {
            PredictError::Inference("classifier returned an empty probability vector".to_string())
        })?;

        let disease = self.catalog.label(index).ok_or_else(|| {
            PredictError::Configuration(format!(
                "classifier index {index} is outside the catalog of {} labels",
                self.catalog.len()
            ))
        })?;

        let remedy = self.catalog.remedy(disease, language).ok_or_else(|| {
            PredictError::Configuration(format!(
                "no {} remedy configured for {disease:?}",
                language.code()
            ))
        })?;

        let result = PredictionResponse {
            disease: disease.to_string(),
            confidence: round_percent(top),
            remedy: remedy.to_string(),
        };
        self.cache.store(result.clone());
        Ok(result)
    }
}

/// Index and value of the highest score. The first maximum wins, so equal
/// scores resolve deterministically to the lower index.
fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((index, score)),
        }
    }
    best
}

/// Probability to percentage, rounded to two decimal places.
fn round_percent(probability: f32) -> f32 {
    (probability * 10_000.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};
    use std::collections::HashMap;
    use std::io::Cursor;

    struct StubClassifier(Vec<f32>);

    impl Classifier for StubClassifier {
        fn predict(&self, _input: &ndarray::Array4<f32>) -> Result<Vec<f32>, PredictError> {
            Ok(self.0.clone())
        }
    }

    struct FailingClassifier;

    impl Classifier for FailingClassifier {
        fn predict(&self, _input: &ndarray::Array4<f32>) -> Result<Vec<f32>, PredictError> {
            Err(PredictError::Inference("backend unavailable".to_string()))
        }
    }

    fn white_png(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            image::Rgb([255, 255, 255]),
        ));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn resolver_with(scores: Vec<f32>, cache: ResultCache) -> InferenceResolver {
        InferenceResolver::new(
            Arc::new(StubClassifier(scores)),
            Arc::new(Catalog::builtin()),
            cache,
        )
    }

    #[test]
    fn picks_the_highest_score() {
        let resolver = resolver_with(vec![0.05, 0.1, 0.8, 0.05], ResultCache::new());
        let result = resolver.resolve(&white_png(10, 10), Language::En).unwrap();
        assert_eq!(result.disease, "Grape Black Rot");
        assert!((result.confidence - 80.0).abs() < 1e-4);
    }

    #[test]
    fn tie_breaks_to_the_lower_index() {
        let resolver = resolver_with(vec![0.4, 0.4, 0.1, 0.1], ResultCache::new());
        let result = resolver.resolve(&white_png(10, 10), Language::En).unwrap();
        assert_eq!(result.disease, "Apple Scab");
    }

    #[test]
    fn confidence_is_rounded_to_two_decimals() {
        let resolver = resolver_with(vec![0.87654, 0.1, 0.01, 0.01], ResultCache::new());
        let result = resolver.resolve(&white_png(10, 10), Language::En).unwrap();
        assert!((result.confidence - 87.65).abs() < 1e-4);
    }

    #[test]
    fn white_upload_in_hindi_matches_the_remedy_table() {
        let catalog = Catalog::builtin();
        let resolver = resolver_with(vec![0.1, 0.2, 0.3, 0.4], ResultCache::new());
        let result = resolver.resolve(&white_png(10, 10), Language::Hi).unwrap();

        assert!((0..catalog.len()).any(|i| catalog.label(i) == Some(result.disease.as_str())));
        assert!((0.0..=100.0).contains(&result.confidence));
        assert_eq!(
            result.remedy,
            catalog.remedy(&result.disease, Language::Hi).unwrap()
        );
    }

    #[test]
    fn cache_holds_only_the_latest_result() {
        let cache = ResultCache::new();
        resolver_with(vec![0.9, 0.0, 0.0, 0.1], cache.clone())
            .resolve(&white_png(10, 10), Language::En)
            .unwrap();
        resolver_with(vec![0.0, 0.0, 0.0, 1.0], cache.clone())
            .resolve(&white_png(20, 20), Language::En)
            .unwrap();

        assert_eq!(cache.snapshot().unwrap().disease, "Healthy");
    }

    #[test]
    fn decode_failure_leaves_the_cache_untouched() {
        let cache = ResultCache::new();
        let resolver = resolver_with(vec![0.9, 0.0, 0.0, 0.1], cache.clone());
        resolver.resolve(&white_png(10, 10), Language::En).unwrap();

        let err = resolver
            .resolve(b"not an image", Language::En)
            .unwrap_err();
        assert!(matches!(err, PredictError::Decode(_)));
        assert_eq!(cache.snapshot().unwrap().disease, "Apple Scab");
    }

    #[test]
    fn classifier_failure_leaves_the_cache_untouched() {
        let cache = ResultCache::new();
        let resolver = InferenceResolver::new(
            Arc::new(FailingClassifier),
            Arc::new(Catalog::builtin()),
            cache.clone(),
        );

        let err = resolver
            .resolve(&white_png(10, 10), Language::En)
            .unwrap_err();
        assert!(matches!(err, PredictError::Inference(_)));
        assert_eq!(cache.snapshot(), None);
    }

    #[test]
    fn empty_probability_vector_is_an_inference_error() {
        let resolver = resolver_with(Vec::new(), ResultCache::new());
        let err = resolver
            .resolve(&white_png(10, 10), Language::En)
            .unwrap_err();
        assert!(matches!(err, PredictError::Inference(_)));
    }

    #[test]
    fn out_of_catalog_index_is_a_configuration_error() {
        let resolver = resolver_with(vec![0.0, 0.0, 0.0, 0.1, 0.2, 0.7], ResultCache::new());
        let err = resolver
            .resolve(&white_png(10, 10), Language::En)
            .unwrap_err();
        assert!(matches!(err, PredictError::Configuration(_)));
    }

    #[test]
    fn missing_remedy_is_a_configuration_error() {
        let mut translations = HashMap::new();
        translations.insert(Language::En, "only english".to_string());
        let mut remedies = HashMap::new();
        remedies.insert("Rust".to_string(), translations);
        let catalog = Catalog::new(vec!["Rust".to_string()], remedies);

        let resolver = InferenceResolver::new(
            Arc::new(StubClassifier(vec![1.0])),
            Arc::new(catalog),
            ResultCache::new(),
        );
        let err = resolver
            .resolve(&white_png(10, 10), Language::Te)
            .unwrap_err();
        assert!(matches!(err, PredictError::Configuration(_)));
    }
}
