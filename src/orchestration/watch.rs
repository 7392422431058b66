//! Set of contract addresses whose events the indexer currently admits.

use crate::domain::{Address, RawEvent};
use std::collections::HashSet;

/// Factories are fixed by configuration; pools are added at runtime as the
/// projector reports newly created ones.
#[derive(Debug, Clone, Default)]
pub struct WatchList {
    factories: HashSet<Address>,
    pools: HashSet<Address>,
}

impl WatchList {
    pub fn new(factories: impl IntoIterator<Item = Address>) -> Self {
        WatchList {
            factories: factories.into_iter().collect(),
            pools: HashSet::new(),
        }
    }

    /// Start admitting events emitted by `pool`. Returns false if it was
    /// already observed.
    pub fn begin_observing(&mut self, pool: Address) -> bool {
        self.pools.insert(pool)
    }

    pub fn is_observing(&self, pool: &Address) -> bool {
        self.pools.contains(pool)
    }

    /// Pool creation is only accepted from a configured factory, every other
    /// event only from a registered pool.
    pub fn admits(&self, event: &RawEvent) -> bool {
        if event.event.is_factory_event() {
            self.factories.contains(&event.address)
        } else {
            self.pools.contains(&event.address)
        }
    }

    /// Every observed address, factories first.
    pub fn contracts(&self) -> impl Iterator<Item = &Address> {
        self.factories.iter().chain(self.pools.iter())
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Amount, LendingEvent, PoolCreatedParams, PositionParams, TxHash};

    fn event_from(address: Address, event: LendingEvent) -> RawEvent {
        RawEvent {
            address,
            block_number: 1,
            log_index: 0,
            timestamp: 10,
            transaction_hash: TxHash::repeat_byte(1),
            event,
        }
    }

    fn create_position() -> LendingEvent {
        LendingEvent::CreatePosition(PositionParams {
            user: Address::repeat_byte(0x33),
        })
    }

    #[test]
    fn test_pool_events_need_registration() {
        let mut watch = WatchList::new([Address::repeat_byte(0xfa)]);
        let pool = Address::repeat_byte(0x50);
        let event = event_from(pool.clone(), create_position());

        assert!(!watch.admits(&event));
        assert!(watch.begin_observing(pool.clone()));
        assert!(!watch.begin_observing(pool.clone()));
        assert!(watch.admits(&event));
        assert_eq!(watch.pool_count(), 1);
    }

    #[test]
    fn test_pool_creation_only_from_factory() {
        let mut watch = WatchList::new([Address::repeat_byte(0xfa)]);
        let created = LendingEvent::LendingPoolCreated(PoolCreatedParams {
            lending_pool: Address::repeat_byte(0x50),
            collateral_token: Address::repeat_byte(0xc0),
            borrow_token: Address::repeat_byte(0xb0),
            ltv: Amount::from(7500u64),
        });

        assert!(watch.admits(&event_from(Address::repeat_byte(0xfa), created.clone())));

        // A registered pool emitting a factory event is still rejected.
        watch.begin_observing(Address::repeat_byte(0x51));
        assert!(!watch.admits(&event_from(Address::repeat_byte(0x51), created)));
    }

    #[test]
    fn test_contracts_lists_factories_and_pools() {
        let mut watch = WatchList::new([Address::repeat_byte(0xfa)]);
        watch.begin_observing(Address::repeat_byte(0x50));

        let mut contracts: Vec<&Address> = watch.contracts().collect();
        contracts.sort();
        assert_eq!(
            contracts,
            vec![&Address::repeat_byte(0x50), &Address::repeat_byte(0xfa)]
        );
    }
}
