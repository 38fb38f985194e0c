use crate::activation::model::TxStatus;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// 提现请求。余额在创建时已条件扣减，审批只翻转状态。
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Withdrawal {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    /// 收款方式：bkash | nagad
    pub method: String,
    pub mobile_number: String,
    pub status: TxStatus,
    /// 创建时间（unix 毫秒），兼作排序序号
    pub created_at: u64,
}
