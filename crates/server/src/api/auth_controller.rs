use crate::{
    dtos::auth_dto::{AuthResponseDto, LoginDto},
    extractors::validation_extractor::ValidationExtractor,
    services::Services,
};
use axum::{routing::post, Extension, Json, Router};
use utils::AppResult;

/// 单口令登录/注册
///
/// 口令命中已有账号则登录，否则注册一个新会员并挂靠推荐码。
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginDto,
    responses(
        (status = 200, description = "登录或注册成功", body = AuthResponseDto),
        (status = 400, description = "口令过短"),
        (status = 422, description = "请求体校验失败")
    )
)]
pub async fn login(
    Extension(services): Extension<Services>,
    ValidationExtractor(req): ValidationExtractor<LoginDto>,
) -> AppResult<Json<AuthResponseDto>> {
    let outcome = services.user.login_or_register(req.password, req.referral_code).await?;

    Ok(Json(AuthResponseDto {
        user: outcome.user.into(),
        created: outcome.created,
    }))
}

pub struct AuthController;
impl AuthController {
    pub fn app() -> Router {
        Router::new().route("/auth/login", post(login))
    }
}
