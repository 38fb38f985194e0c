use crate::{audit::model::BalanceAdjustment, Database};
use async_trait::async_trait;
use std::sync::Arc;
use utils::AppResult;

pub type DynAuditRepository = Arc<dyn AuditRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait AuditRepositoryTrait {
    // 追加一条流水（id 由调用方生成）
    async fn append(&self, entry: BalanceAdjustment) -> AppResult<()>;
}

#[async_trait]
impl AuditRepositoryTrait for Database {
    async fn append(&self, entry: BalanceAdjustment) -> AppResult<()> {
        self.balance_logs.insert_one(entry, None).await?;

        Ok(())
    }
}
