use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    routing::{get, post},
};

use crate::middleware::auth::authenticate;
use crate::middleware::role::{ANY_ROLE, CLIENT_ONLY, require_roles};
use crate::modules::posts::controller::{
    create_post, delete_post, get_post, get_posts, like_post, unlike_post, update_post,
};
use crate::state::AppState;

/// Routes under `/posts`, all behind a token.
pub fn init_posts_router(state: AppState) -> Router<AppState> {
    let any_role = Router::new()
        .route("/", get(get_posts))
        .route("/{id}", get(get_post).put(update_post).delete(delete_post))
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            require_roles(ANY_ROLE, req, next)
        }));

    let clients = Router::new()
        .route("/", post(create_post))
        .route("/{id}/like", post(like_post).delete(unlike_post))
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            require_roles(CLIENT_ONLY, req, next)
        }));

    any_role
        .merge(clients)
        .route_layer(middleware::from_fn_with_state(state, authenticate))
}
