use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// 推荐链的根哨兵：referrerId 等于它的用户没有上级
pub const ROOT_REFERRER: &str = "ADMIN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

/// 用户模型
///
/// 字段名保持文档库的 camelCase 布局（isActive / referralCode / ...），
/// 与既有数据互通。
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// 注册时分配的会员号，形如 MP12345
    #[serde(rename = "_id")]
    pub id: String,
    /// 口令派生出的确定性凭证密钥（唯一索引，登录点查询）
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub credential_key: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub avatar: String,
    /// 余额（Tk），只经由审批通过的事件或人工调账变动
    pub balance: f64,
    pub is_active: bool,
    /// 自己的推荐码，6 位大写字母数字，全局唯一
    pub referral_code: String,
    /// 上级的推荐码（大写），或根哨兵 ADMIN
    pub referrer_id: String,
    pub role: UserRole,
    /// 注册时间（unix 毫秒）
    pub joined_at: u64,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// 管理端统计（只读聚合，绝不回写）
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_users: u64,
    pub total_balance: f64,
}
