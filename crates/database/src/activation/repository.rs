use crate::{
    activation::model::{Activation, TxStatus},
    store::{StatusGuard, StoreCollection, WriteBatch},
    Database,
};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::doc;
use std::sync::Arc;
use utils::AppResult;

pub type DynActivationRepository = Arc<dyn ActivationRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait ActivationRepositoryTrait {
    async fn create_activation(&self, activation: Activation) -> AppResult<()>;

    async fn get_activation(&self, id: &str) -> AppResult<Option<Activation>>;

    // 待审批列表，新的在前
    async fn list_pending(&self) -> AppResult<Vec<Activation>>;

    /// 审批提交：整批写（状态翻转 + isActive + 佣金自增）带
    /// status == pending 守卫，事务内全部成功或全部回滚。
    /// 重复审批时守卫不命中，零写入，返回 Conflict。
    async fn commit_approval(&self, activation_id: &str, batch: WriteBatch) -> AppResult<()>;
}

#[async_trait]
impl ActivationRepositoryTrait for Database {
    async fn create_activation(&self, activation: Activation) -> AppResult<()> {
        self.activations.insert_one(activation, None).await?;

        Ok(())
    }

    async fn get_activation(&self, id: &str) -> AppResult<Option<Activation>> {
        let filter = doc! {"_id": id};
        let activation = self.activations.find_one(filter, None).await?;

        Ok(activation)
    }

    async fn list_pending(&self) -> AppResult<Vec<Activation>> {
        let filter = doc! {"status": TxStatus::Pending.as_str()};
        let cursor = self.activations.find(filter, None).await?;
        let mut pending: Vec<Activation> = cursor.try_collect().await?;

        pending.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(pending)
    }

    async fn commit_approval(&self, activation_id: &str, batch: WriteBatch) -> AppResult<()> {
        let guard = StatusGuard::pending(StoreCollection::Activations, activation_id);
        self.commit_guarded(guard, batch).await
    }
}
