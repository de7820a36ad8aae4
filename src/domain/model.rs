use crate::utils::error::{CalcError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 計算失敗時顯示的通用標記
pub const FAILURE_MARKER: &str = "Error";

/// 使用者輸入的運算式（已去除前後空白，且不為空）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression(String);

impl Expression {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CalcError::EmptyInput);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 送給模型的自然語言問題
    pub fn prompt(&self) -> String {
        format!("What is the result of this calculation: {}?", self.0)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Remote,
    Local,
}

impl Strategy {
    /// 失敗後的下一個策略：遠端呼叫失敗改用本地計算，其餘錯誤直接回報
    pub fn fallback(&self, err: &CalcError) -> Option<Strategy> {
        match self {
            Strategy::Remote if err.is_recoverable() => Some(Strategy::Local),
            _ => None,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Remote => f.write_str("remote"),
            Strategy::Local => f.write_str("local"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub expression: String,
    pub value: f64,
    pub strategy: Strategy,
    pub fell_back: bool,
}

impl Resolution {
    pub fn display_value(&self) -> String {
        format_value(self.value)
    }
}

/// 整數不顯示小數點，負零顯示為 0
pub fn format_value(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_rejects_blank_input() {
        assert!(matches!(Expression::parse(""), Err(CalcError::EmptyInput)));
        assert!(matches!(Expression::parse(" \t\n"), Err(CalcError::EmptyInput)));
    }

    #[test]
    fn test_expression_prompt() {
        let expression = Expression::parse("  12*3 ").unwrap();
        assert_eq!(expression.as_str(), "12*3");
        assert_eq!(
            expression.prompt(),
            "What is the result of this calculation: 12*3?"
        );
    }

    #[test]
    fn test_fallback_rule() {
        let remote_err = CalcError::RemoteCallFailed {
            reason: "timeout".to_string(),
        };
        let parse_err = CalcError::UnparseableResponse {
            response: "hmm".to_string(),
        };

        assert_eq!(Strategy::Remote.fallback(&remote_err), Some(Strategy::Local));
        assert_eq!(Strategy::Remote.fallback(&parse_err), None);
        assert_eq!(Strategy::Local.fallback(&remote_err), None);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(4.0), "4");
        assert_eq!(format_value(2.5), "2.5");
        assert_eq!(format_value(-3.5), "-3.5");
        assert_eq!(format_value(-0.0), "0");
    }
}
