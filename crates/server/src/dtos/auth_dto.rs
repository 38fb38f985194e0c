use crate::dtos::user_dto::UserProfileDto;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// 单口令登录/注册入口的请求体
#[derive(Clone, Serialize, Deserialize, Debug, Validate, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginDto {
    #[validate(length(min = 3, message = "Password must be at least 3 characters."))]
    pub password: String,

    /// 注册时挂靠的推荐码；登录时忽略
    pub referral_code: Option<String>,
}

#[derive(Clone, Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponseDto {
    pub user: UserProfileDto,
    /// true = 本次请求新注册的账号
    pub created: bool,
}
