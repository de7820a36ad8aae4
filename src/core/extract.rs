use crate::utils::error::{CalcError, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref BARE_NUMBER: Regex = Regex::new(r"-?\d+\.?\d*").unwrap();
    static ref PHRASE_NUMBER: Regex =
        Regex::new(r"(?i)(?:equals?|is|result|answer)\s*:?\s*(-?\d+\.?\d*)").unwrap();
    static ref TRAILING_NUMBER: Regex = Regex::new(r"(-?\d+\.?\d*)\s*$").unwrap();
}

/// 從模型回覆中找出數字的啟發式規則
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionPattern {
    /// 任何數字，取最後一個
    LastNumber,
    /// "equals / is / result / answer: <number>"
    Phrase,
    /// 回覆結尾的數字
    Trailing,
}

impl ExtractionPattern {
    pub const ORDERED: [ExtractionPattern; 3] = [
        ExtractionPattern::LastNumber,
        ExtractionPattern::Phrase,
        ExtractionPattern::Trailing,
    ];

    pub fn find(&self, text: &str) -> Option<f64> {
        let literal = match self {
            ExtractionPattern::LastNumber => BARE_NUMBER.find_iter(text).last()?.as_str(),
            ExtractionPattern::Phrase => PHRASE_NUMBER.captures(text)?.get(1)?.as_str(),
            ExtractionPattern::Trailing => TRAILING_NUMBER.captures(text)?.get(1)?.as_str(),
        };
        parse_literal(literal)
    }
}

fn parse_literal(literal: &str) -> Option<f64> {
    literal
        .trim_end_matches('.')
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// 依序套用規則，第一個命中的規則勝出
pub fn extract_number(text: &str) -> Result<f64> {
    for pattern in ExtractionPattern::ORDERED {
        if let Some(value) = pattern.find(text) {
            tracing::debug!("Extracted {} from response using {:?}", value, pattern);
            return Ok(value);
        }
    }

    Err(CalcError::UnparseableResponse {
        response: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentence_with_expression_prefers_last_number() {
        assert_eq!(extract_number("The result of 2+2 is 4.").unwrap(), 4.0);
        assert_eq!(
            ExtractionPattern::LastNumber.find("The result of 2+2 is 4."),
            Some(4.0)
        );
    }

    #[test]
    fn test_phrase_anchored_extraction() {
        assert_eq!(ExtractionPattern::Phrase.find("The answer is: -3.5"), Some(-3.5));
        assert_eq!(ExtractionPattern::Phrase.find("RESULT 12"), Some(12.0));
        assert_eq!(ExtractionPattern::Phrase.find("it equals 7"), Some(7.0));
        assert_eq!(ExtractionPattern::Phrase.find("seven"), None);
        assert_eq!(extract_number("The answer is: -3.5").unwrap(), -3.5);
    }

    #[test]
    fn test_trailing_number() {
        assert_eq!(ExtractionPattern::Trailing.find("so we get 42  \n"), Some(42.0));
        assert_eq!(ExtractionPattern::Trailing.find("42 is the answer"), None);
    }

    #[test]
    fn test_decimal_and_negative_values() {
        assert_eq!(extract_number("10 / 4 = 2.5").unwrap(), 2.5);
        assert_eq!(extract_number("3 - 10 equals -7").unwrap(), -7.0);
    }

    #[test]
    fn test_no_digits_is_unparseable() {
        let err = extract_number("I cannot compute that.").unwrap_err();
        match err {
            CalcError::UnparseableResponse { response } => {
                assert_eq!(response, "I cannot compute that.");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(extract_number("").is_err());
    }
}
