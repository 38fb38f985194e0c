use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Max Power Membership API",
        description = "基于 Rust 和 Axum 的推荐分佣会员系统 API 文档",
        version = "1.0.0"
    ),
    paths(
        // System health check
        crate::api::health,
        // Auth endpoints
        crate::api::auth_controller::login,
        // User endpoints
        crate::api::user_controller::get_user,
        crate::api::user_controller::update_profile,
        crate::api::user_controller::get_team,
        crate::api::user_controller::request_activation,
        crate::api::user_controller::request_withdrawal,
        // Admin endpoints
        crate::api::admin_controller::list_pending_activations,
        crate::api::admin_controller::approve_activation,
        crate::api::admin_controller::list_pending_withdrawals,
        crate::api::admin_controller::approve_withdrawal,
        crate::api::admin_controller::add_funds,
        crate::api::admin_controller::get_payment_number,
        crate::api::admin_controller::set_payment_number,
        crate::api::admin_controller::get_stats,
    ),
    components(
        schemas(
            database::user::model::User,
            database::user::model::UserRole,
            database::user::model::UserStats,
            database::activation::model::Activation,
            database::activation::model::TxStatus,
            database::withdrawal::model::Withdrawal,
            database::audit::model::BalanceAdjustment,
            crate::dtos::auth_dto::LoginDto,
            crate::dtos::auth_dto::AuthResponseDto,
            crate::dtos::user_dto::UserProfileDto,
            crate::dtos::user_dto::UpdateProfileDto,
            crate::dtos::user_dto::TeamResponseDto,
            crate::dtos::user_dto::CreateActivationDto,
            crate::dtos::user_dto::CreateWithdrawalDto,
            crate::dtos::admin_dto::AddFundsDto,
            crate::dtos::admin_dto::SetPaymentNumberDto,
            crate::dtos::admin_dto::PaymentNumberDto,
            crate::services::admin::ActivationApproval,
        )
    ),
    tags(
        (name = "system", description = "系统状态"),
        (name = "auth", description = "登录与注册"),
        (name = "user", description = "会员侧操作"),
        (name = "admin", description = "管理端审批与配置")
    )
)]
pub struct ApiDoc;
