use std::fmt;

use serde::Serialize;

/// Raw model scores for the two classes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Logits {
    pub benign: f32,
    pub phishing: f32,
}

impl Logits {
    pub fn new(benign: f32, phishing: f32) -> Self {
        Self { benign, phishing }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Benign,
    Phishing,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Benign => "benign",
            Label::Phishing => "phishing",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single classification call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationOutcome {
    pub logits: Logits,
    pub probability_benign: f32,
    pub probability_phishing: f32,
    pub label: Label,
    /// Probability of `label` as a percentage with two decimals, e.g. `"97.31"`
    pub confidence: String,
}

impl ClassificationOutcome {
    /// Probability of the chosen label in `[0, 1]`.
    pub fn confidence_value(&self) -> f32 {
        match self.label {
            Label::Benign => self.probability_benign,
            Label::Phishing => self.probability_phishing,
        }
    }

    pub fn is_phishing(&self) -> bool {
        self.label == Label::Phishing
    }

    /// One-line human-facing verdict.
    pub fn summary(&self) -> String {
        format!("result: {} (probability: {}%)", self.label, self.confidence)
    }
}

/// Softmax with the maximum subtracted first so large logits cannot overflow.
///
/// Each exponential is taken in `f64` and narrowed back to `f32`, so results
/// do not depend on the platform's single-precision `exp`.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| f64::from(x - max).exp() as f32).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Formats a non-negative percentage with two decimals, rounding half up.
///
/// Rounding works on the shortest decimal digits of the widened value, so an
/// exact tie such as `51.125` becomes `"51.13"` where `{:.2}` would give
/// `"51.12"`.
pub fn format_percentage(value: f32) -> String {
    let digits = f64::from(value).abs().to_string();
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), ""));

    let mut frac = frac_part.chars();
    let kept: String = int_part.chars().chain((0..2).map(|_| frac.next().unwrap_or('0'))).collect();
    let round_up = frac.next().map_or(false, |d| d >= '5');

    let hundredths = kept
        .chars()
        .fold(0u64, |acc, d| acc * 10 + u64::from(d.to_digit(10).unwrap_or(0)))
        + u64::from(round_up);
    format!("{}.{:02}", hundredths / 100, hundredths % 100)
}

/// Turns raw logits into probabilities and a label.
///
/// Ties go to `Benign`: phishing wins only with a strictly greater probability.
pub fn interpret(logits: Logits) -> ClassificationOutcome {
    let probs = softmax(&[logits.benign, logits.phishing]);
    let (probability_benign, probability_phishing) = (probs[0], probs[1]);

    let (label, chosen) = if probability_phishing > probability_benign {
        (Label::Phishing, probability_phishing)
    } else {
        (Label::Benign, probability_benign)
    };

    ClassificationOutcome {
        logits,
        probability_benign,
        probability_phishing,
        label,
        confidence: format_percentage(chosen * 100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tie_resolves_to_benign() {
        let outcome = interpret(Logits::new(2.0, 2.0));
        assert_eq!(outcome.label, Label::Benign);
        assert_eq!(outcome.probability_benign, 0.5);
        assert_eq!(outcome.probability_phishing, 0.5);
        assert_eq!(outcome.confidence, "50.00");
    }

    #[test]
    fn test_phishing_wins_when_strictly_greater() {
        let outcome = interpret(Logits::new(-1.0, 3.0));
        assert_eq!(outcome.label, Label::Phishing);
        assert!(outcome.is_phishing());
        assert!((outcome.confidence_value() - 0.98201376).abs() < 1e-6);
        assert_eq!(outcome.confidence, "98.20");
        assert_eq!(outcome.summary(), "result: phishing (probability: 98.20%)");
    }

    #[test]
    fn test_large_logits_do_not_overflow() {
        let outcome = interpret(Logits::new(1000.0, 990.0));
        assert!(outcome.probability_benign.is_finite());
        assert!(outcome.probability_phishing.is_finite());
        assert_eq!(outcome.label, Label::Benign);
        assert_eq!(outcome.confidence, "100.00");
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let pairs = [
            (0.0, 0.0),
            (1.5, -2.25),
            (-30.0, 30.0),
            (88.0, 89.0),
            (-1e4, 1e4),
            (3.0e38, -3.0e38),
            (0.1234, 0.1235),
        ];
        for (b, p) in pairs {
            let outcome = interpret(Logits::new(b, p));
            let sum = outcome.probability_benign + outcome.probability_phishing;
            assert!((sum - 1.0).abs() < 1e-6, "logits ({}, {}) summed to {}", b, p, sum);
        }
    }

    #[test]
    fn test_confidence_rounds_ties_half_up() {
        let outcome = interpret(Logits::new(0.0, 0.045007594));
        assert_eq!(outcome.probability_phishing * 100.0, 51.125);
        assert_eq!(outcome.confidence, "51.13");

        assert_eq!(format_percentage(62.125), "62.13");
        assert_eq!(format_percentage(0.125), "0.13");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(100.0), "100.00");
        assert_eq!(format_percentage(50.0), "50.00");
        assert_eq!(format_percentage(98.20138), "98.20");
        assert_eq!(format_percentage(73.10586), "73.11");
        assert_eq!(format_percentage(99.999), "100.00");
        assert_eq!(format_percentage(0.004), "0.00");
    }

    #[test]
    fn test_label_display() {
        assert_eq!(Label::Benign.to_string(), "benign");
        assert_eq!(Label::Phishing.as_str(), "phishing");
    }
}
