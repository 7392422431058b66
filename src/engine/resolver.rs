//! Get-or-create for aggregate entities.
//!
//! A missing aggregate is synthesized with zero counters and returned unsaved;
//! the caller persists it after applying its delta.

use crate::domain::{Address, Factory, Pool, User};
use crate::store::{EntityStore, StoreError};

pub async fn get_or_create_factory(
    store: &dyn EntityStore,
    id: &Address,
) -> Result<Factory, StoreError> {
    Ok(store
        .load_factory(id)
        .await?
        .unwrap_or_else(|| Factory::new(id.clone())))
}

pub async fn get_or_create_pool(store: &dyn EntityStore, id: &Address) -> Result<Pool, StoreError> {
    Ok(store
        .load_pool(id)
        .await?
        .unwrap_or_else(|| Pool::new(id.clone())))
}

pub async fn get_or_create_user(store: &dyn EntityStore, id: &Address) -> Result<User, StoreError> {
    Ok(store
        .load_user(id)
        .await?
        .unwrap_or_else(|| User::new(id.clone())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Amount;
    use crate::store::{Changeset, MemoryStore};

    #[tokio::test]
    async fn test_absent_pool_is_zeroed_and_not_saved() {
        let store = MemoryStore::new();
        let id = Address::repeat_byte(0x50);

        let pool = get_or_create_pool(&store, &id).await.unwrap();
        assert_eq!(pool, Pool::new(id.clone()));
        assert_eq!(pool.created, 0);
        assert!(store.load_pool(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_two_calls_return_independent_values() {
        let store = MemoryStore::new();
        let id = Address::repeat_byte(0x33);

        let mut first = get_or_create_user(&store, &id).await.unwrap();
        let second = get_or_create_user(&store, &id).await.unwrap();
        first.total_deposited += &Amount::from(5u64);

        assert_eq!(second.total_deposited, Amount::zero());
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_existing_factory_is_loaded() {
        let store = MemoryStore::new();
        let id = Address::repeat_byte(0xfa);
        let mut factory = Factory::new(id.clone());
        factory.total_pools_created = Amount::from(3u64);
        store
            .apply(&Changeset {
                factory: Some(factory),
                ..Default::default()
            })
            .await
            .unwrap();

        let loaded = get_or_create_factory(&store, &id).await.unwrap();
        assert_eq!(loaded.total_pools_created, Amount::from(3u64));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let store = MemoryStore::new();
        store.set_unavailable(true);
        let result = get_or_create_user(&store, &Address::repeat_byte(0x33)).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }
}
