pub mod chat;
pub mod health;
pub mod keys;
pub mod status;

use axum::Router;

pub fn router() -> Router {
    Router::new()
        .merge(health::router())
        .merge(keys::router())
        .merge(chat::router())
        .merge(status::router())
}
