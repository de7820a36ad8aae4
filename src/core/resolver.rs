use crate::core::{arithmetic, extract};
use crate::domain::model::{Expression, Resolution, Strategy, FAILURE_MARKER};
use crate::domain::ports::TextGenerator;
use crate::utils::error::Result;

/// 將運算式解析為數值：有模型時先問模型，遠端失敗則改用本地計算
pub struct ResultResolver {
    generator: Option<Box<dyn TextGenerator>>,
}

impl ResultResolver {
    pub fn new(generator: Option<Box<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    pub fn local() -> Self {
        Self { generator: None }
    }

    pub fn with_generator<G: TextGenerator + 'static>(generator: G) -> Self {
        Self {
            generator: Some(Box::new(generator)),
        }
    }

    /// 第一次嘗試使用的策略
    pub fn strategy(&self) -> Strategy {
        if self.generator.is_some() {
            Strategy::Remote
        } else {
            Strategy::Local
        }
    }

    pub async fn resolve(&self, raw: &str) -> Result<Resolution> {
        let expression = Expression::parse(raw)?;
        let mut strategy = self.strategy();
        let mut fell_back = false;

        loop {
            match self.attempt(strategy, &expression).await {
                Ok(value) => {
                    tracing::info!("✅ {} = {} ({})", expression, value, strategy);
                    return Ok(Resolution {
                        expression: expression.as_str().to_string(),
                        value,
                        strategy,
                        fell_back,
                    });
                }
                Err(err) => match strategy.fallback(&err) {
                    Some(next) => {
                        tracing::warn!("Remote call failed, falling back to {}: {}", next, err);
                        strategy = next;
                        fell_back = true;
                    }
                    None => return Err(err),
                },
            }
        }
    }

    /// 顯示用：成功回傳數值字串，失敗回傳通用標記，細節只寫進日誌
    pub async fn resolve_for_display(&self, raw: &str) -> String {
        match self.resolve(raw).await {
            Ok(resolution) => resolution.display_value(),
            Err(err) => {
                tracing::error!(
                    "❌ Calculation failed: {} (Category: {:?}, Severity: {:?})",
                    err,
                    err.category(),
                    err.severity()
                );
                FAILURE_MARKER.to_string()
            }
        }
    }

    async fn attempt(&self, strategy: Strategy, expression: &Expression) -> Result<f64> {
        match (strategy, &self.generator) {
            (Strategy::Remote, Some(generator)) => {
                let prompt = expression.prompt();
                tracing::debug!("Sending prompt: {}", prompt);
                let text = generator.generate(&prompt).await?;
                tracing::debug!("Model response: {}", text);
                extract::extract_number(&text)
            }
            _ => {
                let value = arithmetic::evaluate(expression.as_str())?;
                tracing::debug!("Local evaluation: The result of {} is {}.", expression, value);
                Ok(value)
            }
        }
    }
}
