/**
 * Account Routes
 *
 * Endpoints that require a valid access token cookie. The `authenticate`
 * middleware is applied as a route layer, so unknown paths still fall
 * through to the 404 handler instead of answering 401.
 *
 * - `GET /user` - Current user
 * - `GET /sessions` - Active sessions
 * - `DELETE /sessions/{id}` - Revoke a session
 */

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get},
    Router,
};

use crate::backend::account::{current_user, delete_session, list_sessions};
use crate::backend::middleware::authenticate;
use crate::backend::server::state::AppState;

/// Add the authenticated account routes to `router`
pub fn configure_account_routes(router: Router<AppState>, state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/user", get(current_user))
        .route("/sessions", get(list_sessions))
        .route("/sessions/{id}", delete(delete_session))
        .route_layer(from_fn_with_state(state, authenticate));

    router.merge(protected)
}
