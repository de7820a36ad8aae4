use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// 遠端文字生成服務
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// 送出提示並回傳模型的純文字回覆；任何傳輸或驗證失敗都應回傳
    /// [`CalcError::RemoteCallFailed`](crate::utils::error::CalcError::RemoteCallFailed)
    async fn generate(&self, prompt: &str) -> Result<String>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_key(&self) -> Option<&str>;
    fn api_base_url(&self) -> &str;
    fn model(&self) -> &str;
    fn max_tokens(&self) -> u32;
    fn timeout(&self) -> Duration;
}
