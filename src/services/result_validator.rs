//! Classification response validation
//!
//! Parses the raw generated text against the result schema. Parsing never
//! fails outward: schema-invalid text becomes a raw-fallback outcome, which
//! callers must treat as a degraded success, not an error.
//!
//! Out-of-range `confidence` values and missing array fields are passed
//! through uncorrected — the validator does not clamp or repair.

use crate::models::{ClassificationOutcome, ClassificationResult};

/// Validate raw response text into a [`ClassificationOutcome`].
pub fn parse_classification(raw: &str) -> ClassificationOutcome {
    match serde_json::from_str::<ClassificationResult>(raw) {
        Ok(result) => ClassificationOutcome::Classified(result),
        Err(err) => {
            tracing::warn!(
                %err,
                response_len = raw.len(),
                "Classification response was not schema-valid JSON, returning raw text"
            );
            ClassificationOutcome::Unparsed {
                raw: raw.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_response_parses() {
        let raw = r#"{
            "genre": "electronic",
            "subgenres": ["house", "techno"],
            "confidence": 0.74,
            "mood": ["energetic", "dark"],
            "keyFactors": ["high spectral flatness", "steady zcr"],
            "reasoning": "Flat spectrum with strong periodic energy."
        }"#;

        match parse_classification(raw) {
            ClassificationOutcome::Classified(result) => {
                assert_eq!(result.genre, "electronic");
                assert_eq!(result.subgenres, vec!["house", "techno"]);
                assert_eq!(result.confidence, 0.74);
                assert_eq!(result.key_factors.len(), 2);
            }
            other => panic!("expected Classified, got {other:?}"),
        }
    }

    #[test]
    fn plain_prose_falls_back_to_raw() {
        let outcome = parse_classification("I think this is rock music");
        assert_eq!(
            outcome,
            ClassificationOutcome::Unparsed {
                raw: "I think this is rock music".to_string()
            }
        );
    }

    #[test]
    fn json_of_the_wrong_shape_falls_back_to_raw() {
        let outcome = parse_classification(r#"["rock", 0.9]"#);
        assert!(matches!(outcome, ClassificationOutcome::Unparsed { .. }));

        // Missing required genre key.
        let outcome = parse_classification(r#"{"confidence": 0.9}"#);
        assert!(matches!(outcome, ClassificationOutcome::Unparsed { .. }));
    }

    #[test]
    fn out_of_range_confidence_is_passed_through() {
        let outcome = parse_classification(r#"{"genre": "pop", "confidence": 1.7}"#);
        match outcome {
            ClassificationOutcome::Classified(result) => assert_eq!(result.confidence, 1.7),
            other => panic!("expected Classified, got {other:?}"),
        }
    }
}
