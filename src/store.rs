use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use crate::id::UserId;
use crate::model::User;

/// Errors returned by [`UserStore`]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record is stored under the identifier
    #[error("user {0} not found")]
    NotFound(UserId),

    /// A writer panicked while holding the lock
    #[error("store lock poisoned ({0})")]
    LockPoisoned(&'static str),
}

/// In-memory user store
///
/// All access to the map goes through the lock: reads share it, mutations
/// hold it exclusively for their whole read-modify-write sequence.
pub struct UserStore {
    data: RwLock<HashMap<UserId, User>>,
}

impl UserStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Store a record under a freshly minted identifier
    pub fn create(&self, user: User) -> Result<UserId, StoreError> {
        let mut data = self
            .data
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))?;

        let id = loop {
            let id = UserId::generate();
            if !data.contains_key(&id) {
                break id;
            }
        };
        data.insert(id, user);
        debug!(%id, "user created");

        Ok(id)
    }

    /// Get the record stored under `id`
    pub fn get(&self, id: &UserId) -> Result<User, StoreError> {
        let data = self
            .data
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        data.get(id).cloned().ok_or(StoreError::NotFound(*id))
    }

    /// Replace the record stored under `id`, leaving the store untouched if absent
    pub fn update(&self, id: &UserId, user: User) -> Result<(), StoreError> {
        let mut data = self
            .data
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))?;

        let slot = data.get_mut(id).ok_or(StoreError::NotFound(*id))?;
        *slot = user;
        debug!(%id, "user updated");

        Ok(())
    }

    /// Remove the record stored under `id`
    pub fn delete(&self, id: &UserId) -> Result<(), StoreError> {
        let mut data = self
            .data
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))?;

        data.remove(id).ok_or(StoreError::NotFound(*id))?;
        debug!(%id, "user deleted");

        Ok(())
    }

    /// Snapshot of every stored record, in no particular order
    pub fn list_all(&self) -> Result<Vec<User>, StoreError> {
        let data = self
            .data
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(data.values().cloned().collect())
    }

    /// Number of stored records
    pub fn len(&self) -> Result<usize, StoreError> {
        let data = self
            .data
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(data.len())
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn sample(n: usize) -> User {
        User::new(format!("first-{n}"), format!("last-{n}"), format!("bio-{n}"))
    }

    #[test]
    fn test_create_and_get() {
        let store = UserStore::new();
        let user = User::new("Ana", "Silva", "dev");

        let id = store.create(user.clone()).unwrap();

        assert_eq!(store.get(&id).unwrap(), user);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_unknown_id_not_found() {
        let store = UserStore::new();
        store.create(sample(0)).unwrap();
        let unknown = UserId::generate();

        assert!(matches!(store.get(&unknown), Err(StoreError::NotFound(id)) if id == unknown));
        assert!(matches!(
            store.update(&unknown, sample(1)),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(store.delete(&unknown), Err(StoreError::NotFound(_))));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_update_replaces_whole_record() {
        let store = UserStore::new();
        let id = store.create(User::new("Ana", "Silva", "dev")).unwrap();

        let replacement = User::new("Ana", "", "");
        store.update(&id, replacement.clone()).unwrap();

        assert_eq!(store.get(&id).unwrap(), replacement);
    }

    #[test]
    fn test_update_missing_leaves_store_unchanged() {
        let store = UserStore::new();
        let id = store.create(sample(0)).unwrap();

        let result = store.update(&UserId::generate(), sample(1));

        assert!(matches!(result, Err(StoreError::NotFound(_))));

        assert_eq!(store.list_all().unwrap(), vec![sample(0)]);
        assert_eq!(store.get(&id).unwrap(), sample(0));
    }

    #[test]
    fn test_delete_is_permanent() {
        let store = UserStore::new();
        let id = store.create(sample(0)).unwrap();

        store.delete(&id).unwrap();

        assert!(matches!(store.get(&id), Err(StoreError::NotFound(_))));
        assert!(matches!(store.update(&id, sample(1)), Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete(&id), Err(StoreError::NotFound(_))));
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_list_all_contains_every_created_record() {
        let store = UserStore::new();
        for n in 0..50 {
            store.create(sample(n)).unwrap();
        }

        let mut listed: Vec<String> = store
            .list_all()
            .unwrap()
            .into_iter()
            .map(|u| u.first_name)
            .collect();
        listed.sort();

        let mut expected: Vec<String> = (0..50).map(|n| format!("first-{n}")).collect();
        expected.sort();

        assert_eq!(listed, expected);
    }

    #[test]
    fn test_concurrent_creates_yield_distinct_ids() {
        let store = UserStore::new();
        let threads = 16;
        let per_thread = 250;

        let ids: Vec<UserId> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..threads)
                .map(|t| {
                    let store = &store;
                    s.spawn(move || {
                        (0..per_thread)
                            .map(|n| store.create(sample(t * per_thread + n)).unwrap())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });

        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), threads * per_thread);
        assert_eq!(store.len().unwrap(), threads * per_thread);
        for (i, id) in ids.iter().enumerate() {
            assert!(store.get(id).is_ok(), "record {i} lost");
        }
    }

    #[test]
    fn test_concurrent_readers_never_see_torn_records() {
        let store = UserStore::new();
        let id = store.create(User::new("a", "a", "a")).unwrap();
        let done = AtomicBool::new(false);

        std::thread::scope(|s| {
            s.spawn(|| {
                for n in 0..2_000 {
                    let v = if n % 2 == 0 { "b" } else { "a" };
                    store.update(&id, User::new(v, v, v)).unwrap();
                    let extra = store.create(User::new(v, v, v)).unwrap();
                    store.delete(&extra).unwrap();
                }
                done.store(true, Ordering::SeqCst);
            });

            for _ in 0..4 {
                s.spawn(|| {
                    while !done.load(Ordering::SeqCst) {
                        let user = store.get(&id).unwrap();
                        assert_eq!(user.first_name, user.last_name);
                        assert_eq!(user.last_name, user.biography);

                        for user in store.list_all().unwrap() {
                            assert_eq!(user.first_name, user.last_name);
                            assert_eq!(user.last_name, user.biography);
                        }
                    }
                });
            }
        });

        assert_eq!(store.len().unwrap(), 1);
    }
}
