use crate::{
    dtos::admin_dto::{AddFundsDto, PaymentNumberDto, SetPaymentNumberDto},
    extractors::validation_extractor::ValidationExtractor,
    services::{admin::ActivationApproval, Services},
};
use axum::{
    extract::Path,
    routing::{get, post},
    Extension, Json, Router,
};
use database::{
    activation::model::Activation, audit::model::BalanceAdjustment, user::model::UserStats,
    withdrawal::model::Withdrawal,
};
use utils::AppResult;

/// 待审批激活列表
#[utoipa::path(
    get,
    path = "/api/v1/admin/activations/pending",
    tag = "admin",
    responses(
        (status = 200, description = "成功返回待审批激活（新的在前）", body = Vec<Activation>)
    )
)]
pub async fn list_pending_activations(
    Extension(services): Extension<Services>,
) -> AppResult<Json<Vec<Activation>>> {
    let pending = services.admin.list_pending_activations().await?;

    Ok(Json(pending))
}

/// 审批激活
///
/// 状态翻转 + 激活标记必落；逐级佣金尽力而为；整批原子提交。
#[utoipa::path(
    post,
    path = "/api/v1/admin/activations/{id}/approve",
    tag = "admin",
    params(
        ("id" = String, Path, description = "激活申请 id")
    ),
    responses(
        (status = 200, description = "审批成功", body = ActivationApproval),
        (status = 404, description = "激活申请不存在"),
        (status = 409, description = "已被处理过，零写入")
    )
)]
pub async fn approve_activation(
    Extension(services): Extension<Services>,
    Path(id): Path<String>,
) -> AppResult<Json<ActivationApproval>> {
    let approval = services.admin.approve_activation(id).await?;

    Ok(Json(approval))
}

/// 待审批提现列表
#[utoipa::path(
    get,
    path = "/api/v1/admin/withdrawals/pending",
    tag = "admin",
    responses(
        (status = 200, description = "成功返回待审批提现（新的在前）", body = Vec<Withdrawal>)
    )
)]
pub async fn list_pending_withdrawals(
    Extension(services): Extension<Services>,
) -> AppResult<Json<Vec<Withdrawal>>> {
    let pending = services.admin.list_pending_withdrawals().await?;

    Ok(Json(pending))
}

/// 审批提现
#[utoipa::path(
    post,
    path = "/api/v1/admin/withdrawals/{id}/approve",
    tag = "admin",
    params(
        ("id" = String, Path, description = "提现申请 id")
    ),
    responses(
        (status = 200, description = "审批成功"),
        (status = 404, description = "提现申请不存在"),
        (status = 409, description = "已被处理过")
    )
)]
pub async fn approve_withdrawal(
    Extension(services): Extension<Services>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    services.admin.approve_withdrawal(id.clone()).await?;

    Ok(Json(serde_json::json!({ "approved": id })))
}

/// 人工加款
#[utoipa::path(
    post,
    path = "/api/v1/admin/funds",
    tag = "admin",
    request_body = AddFundsDto,
    responses(
        (status = 200, description = "加款成功，返回流水", body = BalanceAdjustment),
        (status = 404, description = "会员不存在")
    )
)]
pub async fn add_funds(
    Extension(services): Extension<Services>,
    ValidationExtractor(req): ValidationExtractor<AddFundsDto>,
) -> AppResult<Json<BalanceAdjustment>> {
    let entry = services.admin.add_funds(req.user_id, req.amount).await?;

    Ok(Json(entry))
}

/// 查询当前收款号码
#[utoipa::path(
    get,
    path = "/api/v1/admin/settings/payment-number",
    tag = "admin",
    responses(
        (status = 200, description = "成功返回收款号码（可能尚未配置）", body = PaymentNumberDto)
    )
)]
pub async fn get_payment_number(
    Extension(services): Extension<Services>,
) -> AppResult<Json<PaymentNumberDto>> {
    let active_payment_number = services.admin.get_payment_number().await?;

    Ok(Json(PaymentNumberDto { active_payment_number }))
}

/// 更新收款号码
#[utoipa::path(
    put,
    path = "/api/v1/admin/settings/payment-number",
    tag = "admin",
    request_body = SetPaymentNumberDto,
    responses(
        (status = 200, description = "更新成功", body = PaymentNumberDto),
        (status = 400, description = "号码为空")
    )
)]
pub async fn set_payment_number(
    Extension(services): Extension<Services>,
    ValidationExtractor(req): ValidationExtractor<SetPaymentNumberDto>,
) -> AppResult<Json<PaymentNumberDto>> {
    services.admin.set_payment_number(req.number.clone()).await?;

    Ok(Json(PaymentNumberDto {
        active_payment_number: Some(req.number.trim().to_string()),
    }))
}

/// 全站统计
#[utoipa::path(
    get,
    path = "/api/v1/admin/stats",
    tag = "admin",
    responses(
        (status = 200, description = "成功返回统计", body = UserStats)
    )
)]
pub async fn get_stats(Extension(services): Extension<Services>) -> AppResult<Json<UserStats>> {
    let stats = services.admin.get_stats().await?;

    Ok(Json(stats))
}

pub struct AdminController;
impl AdminController {
    pub fn app() -> Router {
        Router::new()
            .route("/admin/activations/pending", get(list_pending_activations))
            .route("/admin/activations/:id/approve", post(approve_activation))
            .route("/admin/withdrawals/pending", get(list_pending_withdrawals))
            .route("/admin/withdrawals/:id/approve", post(approve_withdrawal))
            .route("/admin/funds", post(add_funds))
            .route(
                "/admin/settings/payment-number",
                get(get_payment_number).put(set_payment_number),
            )
            .route("/admin/stats", get(get_stats))
    }
}
