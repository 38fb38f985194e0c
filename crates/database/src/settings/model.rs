use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const SETTINGS_DOC_ID: &str = "settings";

/// 管理端全局设置（单例文档 admin_settings/settings）
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminSettings {
    #[serde(rename = "_id")]
    pub id: String,
    /// 当前对外公布的收款号码
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_payment_number: Option<String>,
}
