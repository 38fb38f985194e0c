pub mod admin_controller;
pub mod auth_controller;
pub mod user_controller;

use axum::routing::{get, Router};

/// 系统健康检查
///
/// 返回服务器运行状态
#[utoipa::path(
    get,
    path = "/api/v1/",
    responses(
        (status = 200, description = "服务器运行正常", body = String)
    ),
    tag = "system"
)]
pub async fn health() -> &'static str {
    "Server is running! 🚀"
}

pub fn app() -> Router {
    Router::new()
        .route("/", get(health))
        .merge(auth_controller::AuthController::app())
        .merge(user_controller::UserController::app())
        .merge(admin_controller::AdminController::app())
}
