//! Startup seeding of the user store.

use tracing::info;

use crate::id::UserId;
use crate::model::User;
use crate::store::{StoreError, UserStore};

/// Insert the bootstrap user. Run once, after the store is built and before serving.
pub fn seed_store(store: &UserStore) -> Result<UserId, StoreError> {
    let id = store.create(User::new("Guilherme", "Carvalho", "Golang dev"))?;
    info!(%id, records = store.len()?, "Seeded bootstrap user");
    Ok(id)
}
