use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SUBSCALE_MAX: u8 = 20;
pub const CONFIDENCE_MIN: u8 = 1;
pub const CONFIDENCE_MAX: u8 = 7;

#[derive(Debug, Error, PartialEq)]
pub enum SurveyError {
    #[error("workload sub-scale {name} = {value} is outside 0..=20")]
    SubscaleOutOfRange { name: &'static str, value: u8 },
    #[error("workload score {0} is outside 0..=20")]
    WorkloadOutOfRange(f64),
    #[error("confidence rating {0} is outside 1..=7")]
    ConfidenceOutOfRange(u8),
}

/// Post-task questionnaire result attached to a trial record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurveyScores {
    /// Mean of the six NASA-TLX sub-scales, 0..=20
    pub nasa_tlx: f64,
    /// Self-rated confidence, 1..=7
    pub confidence: u8,
}

impl SurveyScores {
    pub fn new(nasa_tlx: f64, confidence: u8) -> Result<Self, SurveyError> {
        if !(0.0..=f64::from(SUBSCALE_MAX)).contains(&nasa_tlx) {
            return Err(SurveyError::WorkloadOutOfRange(nasa_tlx));
        }
        if !(CONFIDENCE_MIN..=CONFIDENCE_MAX).contains(&confidence) {
            return Err(SurveyError::ConfidenceOutOfRange(confidence));
        }
        Ok(Self {
            nasa_tlx,
            confidence,
        })
    }

    /// Builds scores from the raw sub-scales in questionnaire order:
    /// mental, physical, temporal, performance, effort, frustration.
    pub fn from_subscales(subscales: [u8; 6], confidence: u8) -> Result<Self, SurveyError> {
        const NAMES: [&str; 6] = [
            "mental",
            "physical",
            "temporal",
            "performance",
            "effort",
            "frustration",
        ];
        for (name, value) in NAMES.iter().zip(subscales) {
            if value > SUBSCALE_MAX {
                return Err(SurveyError::SubscaleOutOfRange { name, value });
            }
        }
        let sum: u32 = subscales.iter().map(|&v| u32::from(v)).sum();
        Self::new(f64::from(sum) / 6.0, confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workload_is_mean_of_subscales() {
        let scores = SurveyScores::from_subscales([10, 2, 4, 6, 8, 0], 5).unwrap();
        assert_eq!(scores.nasa_tlx, 5.0);
        assert_eq!(scores.confidence, 5);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert_eq!(
            SurveyScores::from_subscales([21, 0, 0, 0, 0, 0], 4),
            Err(SurveyError::SubscaleOutOfRange {
                name: "mental",
                value: 21
            })
        );
        assert_eq!(
            SurveyScores::new(3.0, 0),
            Err(SurveyError::ConfidenceOutOfRange(0))
        );
        assert!(SurveyScores::new(20.5, 4).is_err());
    }
}
