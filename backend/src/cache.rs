use std::sync::{Arc, Mutex};

use shared::PredictionResponse;

/// Single-slot store for the most recent prediction, shared between the
/// resolver (writer) and the report route (reader).
///
/// The slot starts empty and is replaced in full on every successful
/// prediction. Concurrent predictions are last-write-wins; readers always
/// observe a complete result because the mutex covers the whole slot.
#[derive(Clone, Default)]
pub struct ResultCache {
    slot: Arc<Mutex<Option<PredictionResponse>>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, result: PredictionResponse) {
        *self.slot.lock().unwrap() = Some(result);
    }

    pub fn snapshot(&self) -> Option<PredictionResponse> {
        self.slot.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(disease: &str) -> PredictionResponse {
        PredictionResponse {
            disease: disease.to_string(),
            confidence: 90.0,
            remedy: "remedy".to_string(),
        }
    }

    #[test]
    fn starts_empty() {
        assert_eq!(ResultCache::new().snapshot(), None);
    }

    #[test]
    fn store_replaces_previous_result() {
        let cache = ResultCache::new();
        cache.store(result("Apple Scab"));
        cache.store(result("Healthy"));

        let snapshot = cache.snapshot().unwrap();
        assert_eq!(snapshot.disease, "Healthy");
    }

    #[test]
    fn clones_share_the_slot() {
        let cache = ResultCache::new();
        let writer = cache.clone();
        writer.store(result("Grape Black Rot"));
        assert_eq!(cache.snapshot().unwrap().disease, "Grape Black Rot");
    }
}
