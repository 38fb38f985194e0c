use axum::{
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::time::Instant;
use tracing::info;

/// 请求日志中间件
/// 记录每个HTTP请求的IP地址、方法、路径和响应时间
pub async fn request_logger(ConnectInfo(addr): ConnectInfo<SocketAddr>, request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let client_ip = addr.ip();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    info!(
        "📡 {} | {} {} | 状态: {} | 耗时: {:.2}ms",
        client_ip,
        method,
        uri,
        status.as_u16(),
        duration.as_secs_f64() * 1000.0
    );

    response
}
