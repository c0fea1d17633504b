use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    routing::{delete, get, post, put},
};

use crate::middleware::auth::authenticate;
use crate::middleware::owner::require_self_or_privileged;
use crate::middleware::role::{ADMINS, ANY_ROLE, CLIENT_ONLY, SUPER_ONLY, require_roles};
use crate::modules::users::controller::{
    create_admin, create_user, delete_user, follow_user, get_admins, get_user, get_users,
    unfollow_user, update_user,
};
use crate::state::AppState;

/// Routes under `/users`. Sign-up is public; everything else needs a token
/// and passes the role gate of its group.
pub fn init_users_router(state: AppState) -> Router<AppState> {
    let any_role = Router::new()
        .route("/", get(get_users))
        .route("/{id}", get(get_user))
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            require_roles(ANY_ROLE, req, next)
        }));

    let self_or_privileged = Router::new()
        .route("/{id}", put(update_user))
        .route_layer(middleware::from_fn(require_self_or_privileged))
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            require_roles(ANY_ROLE, req, next)
        }));

    let admins = Router::new()
        .route("/{id}", delete(delete_user))
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            require_roles(ADMINS, req, next)
        }));

    let super_only = Router::new()
        .route("/admins", get(get_admins).post(create_admin))
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            require_roles(SUPER_ONLY, req, next)
        }));

    let clients = Router::new()
        .route("/{id}/follow", post(follow_user).delete(unfollow_user))
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            require_roles(CLIENT_ONLY, req, next)
        }));

    let protected = any_role
        .merge(self_or_privileged)
        .merge(admins)
        .merge(super_only)
        .merge(clients)
        .route_layer(middleware::from_fn_with_state(state, authenticate));

    Router::new().route("/", post(create_user)).merge(protected)
}
