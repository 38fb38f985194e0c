use crate::activation::model::TxStatus;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const ADJUSTMENT_ADMIN_ADD: &str = "admin_add";

/// 人工调账流水（append-only，审计用，不参与对账）
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceAdjustment {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    /// 类型标签，目前只有 admin_add
    #[serde(rename = "type")]
    pub kind: String,
    pub status: TxStatus,
    /// unix 毫秒
    pub timestamp: u64,
}
