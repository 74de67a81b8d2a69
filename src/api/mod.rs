//! HTTP/JSON interface over the user store.
//!
//! - `POST   /api/users`       create a user, returns its identifier
//! - `GET    /api/users`       list every user
//! - `GET    /api/users/{id}`  fetch one user
//! - `PUT    /api/users/{id}`  replace one user
//! - `DELETE /api/users/{id}`  delete one user
//!
//! Every response body is the `{message?, data?}` envelope.

pub mod envelope;
pub mod error;
pub mod handlers;
pub mod routes;

use std::sync::Arc;

use crate::store::UserStore;

pub use routes::create_router;

/// State shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<UserStore>,
}

impl AppState {
    pub fn new(store: Arc<UserStore>) -> Self {
        Self { store }
    }
}
