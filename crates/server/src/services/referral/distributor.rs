use super::{resolver::ReferralIndex, CommissionTable};
use database::{
    activation::model::TxStatus,
    store::{PathWrite, StoreCollection, StorePath, WriteBatch, WriteOp},
    user::model::User,
};
use utils::{AppError, AppResult};

/// 审批一笔激活必然要落的两条写：交易状态翻转 + 用户 isActive。
/// 无论佣金计算成败，这两条始终在批里。
pub fn activation_writes(activation_id: &str, user_id: &str) -> WriteBatch {
    let mut batch = WriteBatch::new();
    batch.set(
        StorePath::new(StoreCollection::Activations, activation_id, "status"),
        TxStatus::Approved.as_str(),
    );
    batch.set(StorePath::new(StoreCollection::Users, user_id, "isActive"), true);
    batch
}

/// 佣金增量计算（隔离失败边界）。
///
/// Err 只代表佣金这一步失败（如快照里找不到被激活用户），调用方记
/// 日志后丢弃即可，绝不能因此阻塞激活本身。产出为每个解析到的上级
/// 一条 balance 原子自增，按层级升序，金额取自层级表。
pub fn commission_writes(
    snapshot: &[User],
    activating_user_id: &str,
    table: &CommissionTable,
) -> AppResult<Vec<PathWrite>> {
    let activating = snapshot
        .iter()
        .find(|u| u.id == activating_user_id)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "User {} missing from snapshot, commission skipped.",
                activating_user_id
            ))
        })?;

    let index = ReferralIndex::build(snapshot);

    let writes = index
        .upline_of(activating, table.depth())
        .zip(table.tiers())
        .map(|((_, upline), tier)| PathWrite {
            path: StorePath::new(StoreCollection::Users, upline.id.clone(), "balance"),
            op: WriteOp::Increment(tier.amount),
        })
        .collect();

    Ok(writes)
}
