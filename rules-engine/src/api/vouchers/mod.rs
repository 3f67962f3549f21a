//! Voucher API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/vouchers", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::issue))
        .route("/price", post(handler::price))
        .route("/redeem", post(handler::redeem))
        .route("/{id}/extend", post(handler::extend))
        .route("/owner/{owner_id}", get(handler::list_for_owner))
}
