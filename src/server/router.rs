use axum::{
    Router,
    extract::FromRef,
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;

use crate::handlers::auth::{login_handler, logout_handler, me_handler, register_handler};
use crate::handlers::employees::{
    add_employee_handler, delete_employees_handler, list_employees_handler,
};
use crate::service::session::Desk;

#[derive(Clone)]
pub struct DeskState {
    pub desk: Desk,
    cookie_key: Key,
    pub insecure_cookie: bool,
}

impl DeskState {
    pub fn new(desk: Desk, cookie_key: Key, insecure_cookie: bool) -> Self {
        Self {
            desk,
            cookie_key,
            insecure_cookie,
        }
    }

    pub fn cookie_key(&self) -> &Key {
        &self.cookie_key
    }
}

impl FromRef<DeskState> for Key {
    fn from_ref(state: &DeskState) -> Self {
        state.cookie_key.clone()
    }
}

pub fn desk_router(state: DeskState) -> Router {
    Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/me", get(me_handler))
        .route("/employees", post(add_employee_handler))
        .route(
            "/admin/employees",
            get(list_employees_handler).delete(delete_employees_handler),
        )
        .with_state(state)
}
