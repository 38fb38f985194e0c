use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// 交易状态。单向：pending -> approved，审批后不再变化，记录永不删除。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Pending,
    Approved,
}

impl TxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxStatus::Pending => "pending",
            TxStatus::Approved => "approved",
        }
    }
}

/// 激活请求
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Activation {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    /// 支付方式：bkash | nagad
    pub method: String,
    /// 支付方交易号
    pub trx_id: String,
    pub mobile_number: String,
    pub status: TxStatus,
    /// 创建时间（unix 毫秒），兼作排序序号
    pub created_at: u64,
}
