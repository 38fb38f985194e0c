use crate::{
    activation::model::TxStatus,
    withdrawal::model::Withdrawal,
    Database,
};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::doc;
use std::sync::Arc;
use utils::AppResult;

pub type DynWithdrawalRepository = Arc<dyn WithdrawalRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait WithdrawalRepositoryTrait {
    async fn create_withdrawal(&self, withdrawal: Withdrawal) -> AppResult<()>;

    async fn get_withdrawal(&self, id: &str) -> AppResult<Option<Withdrawal>>;

    // 待审批列表，新的在前
    async fn list_pending(&self) -> AppResult<Vec<Withdrawal>>;

    /// 单路径条件写：pending -> approved。
    /// 返回是否确实翻转了（false = 已处理过或不存在，零写入）。
    async fn approve(&self, id: &str) -> AppResult<bool>;
}

#[async_trait]
impl WithdrawalRepositoryTrait for Database {
    async fn create_withdrawal(&self, withdrawal: Withdrawal) -> AppResult<()> {
        self.withdrawals.insert_one(withdrawal, None).await?;

        Ok(())
    }

    async fn get_withdrawal(&self, id: &str) -> AppResult<Option<Withdrawal>> {
        let filter = doc! {"_id": id};
        let withdrawal = self.withdrawals.find_one(filter, None).await?;

        Ok(withdrawal)
    }

    async fn list_pending(&self) -> AppResult<Vec<Withdrawal>> {
        let filter = doc! {"status": TxStatus::Pending.as_str()};
        let cursor = self.withdrawals.find(filter, None).await?;
        let mut pending: Vec<Withdrawal> = cursor.try_collect().await?;

        pending.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(pending)
    }

    async fn approve(&self, id: &str) -> AppResult<bool> {
        let filter = doc! {"_id": id, "status": TxStatus::Pending.as_str()};
        let update = doc! {"$set": {"status": TxStatus::Approved.as_str()}};

        let result = self.withdrawals.update_one(filter, update, None).await?;

        Ok(result.modified_count > 0)
    }
}
