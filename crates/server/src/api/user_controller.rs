use crate::{
    dtos::user_dto::{
        CreateActivationDto, CreateWithdrawalDto, TeamResponseDto, UpdateProfileDto, UserProfileDto,
    },
    extractors::validation_extractor::ValidationExtractor,
    services::Services,
};
use axum::{
    extract::Path,
    routing::{get, post, put},
    Extension, Json, Router,
};
use database::{activation::model::Activation, withdrawal::model::Withdrawal};
use utils::{AppError, AppResult};

/// 查询会员资料
#[utoipa::path(
    get,
    path = "/api/v1/user/{id}",
    tag = "user",
    params(
        ("id" = String, Path, description = "会员号，形如 MP12345")
    ),
    responses(
        (status = 200, description = "成功返回会员资料", body = UserProfileDto),
        (status = 404, description = "会员不存在")
    )
)]
pub async fn get_user(
    Extension(services): Extension<Services>,
    Path(id): Path<String>,
) -> AppResult<Json<UserProfileDto>> {
    match services.user.get_user(id.clone()).await? {
        Some(user) => Ok(Json(user.into())),
        None => Err(AppError::NotFound(format!(
            "User ID '{}' not found! Check the ID again (e.g. MP12345).",
            id
        ))),
    }
}

/// 修改会员昵称
#[utoipa::path(
    put,
    path = "/api/v1/user/{id}/profile",
    tag = "user",
    params(
        ("id" = String, Path, description = "会员号")
    ),
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "修改成功，返回最新资料", body = UserProfileDto),
        (status = 404, description = "会员不存在")
    )
)]
pub async fn update_profile(
    Extension(services): Extension<Services>,
    Path(id): Path<String>,
    ValidationExtractor(req): ValidationExtractor<UpdateProfileDto>,
) -> AppResult<Json<UserProfileDto>> {
    let user = services.user.update_name(id, req.name).await?;

    Ok(Json(user.into()))
}

/// 查询直推团队
#[utoipa::path(
    get,
    path = "/api/v1/user/{id}/team",
    tag = "user",
    params(
        ("id" = String, Path, description = "会员号")
    ),
    responses(
        (status = 200, description = "成功返回直推成员列表", body = TeamResponseDto),
        (status = 404, description = "会员不存在")
    )
)]
pub async fn get_team(
    Extension(services): Extension<Services>,
    Path(id): Path<String>,
) -> AppResult<Json<TeamResponseDto>> {
    let members = services.user.get_team(id).await?;

    Ok(Json(TeamResponseDto::from_members(members)))
}

/// 提交激活申请
#[utoipa::path(
    post,
    path = "/api/v1/user/{id}/activation",
    tag = "user",
    params(
        ("id" = String, Path, description = "会员号")
    ),
    request_body = CreateActivationDto,
    responses(
        (status = 200, description = "申请已受理，等待审批", body = Activation),
        (status = 404, description = "会员不存在"),
        (status = 409, description = "账号已激活")
    )
)]
pub async fn request_activation(
    Extension(services): Extension<Services>,
    Path(id): Path<String>,
    ValidationExtractor(req): ValidationExtractor<CreateActivationDto>,
) -> AppResult<Json<Activation>> {
    let activation = services
        .user
        .request_activation(id, req.amount, req.method, req.trx_id, req.mobile_number)
        .await?;

    Ok(Json(activation))
}

/// 提交提现申请
///
/// 余额在受理时即条件扣减，审批只翻状态。
#[utoipa::path(
    post,
    path = "/api/v1/user/{id}/withdrawal",
    tag = "user",
    params(
        ("id" = String, Path, description = "会员号")
    ),
    request_body = CreateWithdrawalDto,
    responses(
        (status = 200, description = "申请已受理，等待审批", body = Withdrawal),
        (status = 404, description = "会员不存在"),
        (status = 409, description = "余额不足")
    )
)]
pub async fn request_withdrawal(
    Extension(services): Extension<Services>,
    Path(id): Path<String>,
    ValidationExtractor(req): ValidationExtractor<CreateWithdrawalDto>,
) -> AppResult<Json<Withdrawal>> {
    let withdrawal = services
        .user
        .request_withdrawal(id, req.amount, req.method, req.mobile_number)
        .await?;

    Ok(Json(withdrawal))
}

pub struct UserController;
impl UserController {
    pub fn app() -> Router {
        Router::new()
            .route("/user/:id", get(get_user))
            .route("/user/:id/profile", put(update_profile))
            .route("/user/:id/team", get(get_team))
            .route("/user/:id/activation", post(request_activation))
            .route("/user/:id/withdrawal", post(request_withdrawal))
    }
}
