use axum::{Router, routing::post};

use crate::modules::auth::controller::{external_login, login_user};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login_user))
        .route("/auth/external", post(external_login))
}
