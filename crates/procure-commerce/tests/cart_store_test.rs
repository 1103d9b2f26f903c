//! Cart store behaviour through the public API.

use std::sync::{Arc, Mutex};

use procure_cache::{Cache, CacheError, KeyValueStore, MemoryStore, SessionId};
use procure_commerce::prelude::*;

fn catalog() -> Arc<dyn ProductCatalog> {
    let products = vec![
        Product::new(
            "P1",
            "VP-21418",
            "Volvo Penta Impeller",
            Price::fixed(Money::new(4250, Currency::USD)),
        ),
        Product::new(
            "P2",
            "YM-119773",
            "Yanmar Fuel Filter",
            Price::fixed(Money::new(1899, Currency::USD)),
        ),
        Product::new("P3", "CAT-7W2326", "Caterpillar Turbocharger", Price::OnRequest)
            .with_stock_status(StockStatus::OnRequest),
        Product::new("A", "A-1", "Anode", Price::fixed(Money::new(900, Currency::USD))),
        Product::new("B", "B-1", "Bellows", Price::fixed(Money::new(12000, Currency::USD))),
    ];
    Arc::new(InMemoryCatalog::new(products).unwrap())
}

fn open(cache: &Cache) -> CartStore {
    CartStore::open_session(
        catalog(),
        cache.clone(),
        &SessionId::new("sess_test"),
        &CartStoreConfig::default(),
    )
}

fn lines(snapshot: &CartSnapshot) -> Vec<(String, i64)> {
    snapshot
        .items
        .iter()
        .map(|i| (i.product.to_string(), i.quantity))
        .collect()
}

fn slug(s: &str) -> ProductSlug {
    ProductSlug::new(s)
}

#[test]
fn test_end_to_end_scenario() {
    let store = open(&Cache::new(MemoryStore::new()));
    assert!(store.snapshot().is_empty());

    store.add_item(&slug("P1"), 1).unwrap();
    store.add_item(&slug("P1"), 2).unwrap();
    let snapshot = store.add_item(&slug("P2"), 1).unwrap();

    assert_eq!(
        lines(&snapshot),
        vec![("P1".to_string(), 3), ("P2".to_string(), 1)]
    );
    assert_eq!(snapshot.total_items(), 4);
    assert_eq!(snapshot.revision, 3);
}

#[test]
fn test_adding_twice_merges_lines() {
    let store = open(&Cache::new(MemoryStore::new()));
    store.add_item(&slug("A"), 2).unwrap();
    let snapshot = store.add_item(&slug("A"), 3).unwrap();
    assert_eq!(lines(&snapshot), vec![("A".to_string(), 5)]);
}

#[test]
fn test_set_quantity_zero_removes() {
    let store = open(&Cache::new(MemoryStore::new()));
    store.add_item(&slug("A"), 2).unwrap();
    store.add_item(&slug("B"), 1).unwrap();

    let snapshot = store.set_quantity(&slug("A"), 0).unwrap();
    assert_eq!(snapshot.quantity_of(&slug("A")), 0);
    assert_eq!(lines(&snapshot), vec![("B".to_string(), 1)]);
}

#[test]
fn test_set_quantity_replaces_or_adds() {
    let store = open(&Cache::new(MemoryStore::new()));
    store.add_item(&slug("A"), 2).unwrap();

    let snapshot = store.set_quantity(&slug("A"), 7).unwrap();
    assert_eq!(snapshot.quantity_of(&slug("A")), 7);

    let snapshot = store.set_quantity(&slug("B"), 4).unwrap();
    assert_eq!(lines(&snapshot), vec![("A".to_string(), 7), ("B".to_string(), 4)]);

    let err = store.set_quantity(&slug("nope"), 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    // Removing an unknown product is fine.
    assert!(store.set_quantity(&slug("nope"), 0).is_ok());
}

#[test]
fn test_remove_absent_is_noop() {
    let store = open(&Cache::new(MemoryStore::new()));
    store.add_item(&slug("A"), 1).unwrap();
    let before = store.snapshot();

    let after = store.remove_item(&slug("B"));
    assert_eq!(after, before);
}

#[test]
fn test_unknown_product_leaves_cart_unchanged() {
    let store = open(&Cache::new(MemoryStore::new()));
    store.add_item(&slug("A"), 1).unwrap();
    let before = store.snapshot();

    let err = store.add_item(&slug("ghost"), 1).unwrap_err();
    assert!(matches!(err, CommerceError::ProductNotFound(ref s) if s == "ghost"));
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(store.snapshot(), before);
}

#[test]
fn test_quantity_validation() {
    let store = open(&Cache::new(MemoryStore::new()));
    for quantity in [0, -3] {
        let err = store.add_item(&slug("A"), quantity).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
    let err = store
        .set_quantity(&slug("A"), MAX_QUANTITY_PER_ITEM + 1)
        .unwrap_err();
    assert!(matches!(err, CommerceError::QuantityExceedsLimit(..)));
    assert!(store.snapshot().is_empty());
}

#[test]
fn test_increments_are_capped() {
    let store = open(&Cache::new(MemoryStore::new()));
    store.add_item(&slug("A"), MAX_QUANTITY_PER_ITEM).unwrap();
    let snapshot = store.add_item(&slug("A"), 10).unwrap();
    assert_eq!(snapshot.quantity_of(&slug("A")), MAX_QUANTITY_PER_ITEM);
}

#[test]
fn test_total_items_never_drifts() {
    let store = open(&Cache::new(MemoryStore::new()));
    let slugs = ["P1", "P2", "P3", "A", "B"];

    // Deterministic pseudo-random walk over all mutators.
    let mut seed: u64 = 0x5eed;
    for _ in 0..500 {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let product = slug(slugs[(seed >> 33) as usize % slugs.len()]);
        let amount = ((seed >> 17) % 6) as i64;
        let snapshot = match (seed >> 8) % 4 {
            0 => store.add_item(&product, amount.max(1)).unwrap(),
            1 => store.remove_item(&product),
            2 => store.set_quantity(&product, amount).unwrap(),
            _ => {
                if (seed >> 40) % 25 == 0 {
                    store.clear()
                } else {
                    store.snapshot()
                }
            }
        };

        let sum: i64 = snapshot.items.iter().map(|i| i.quantity).sum();
        assert_eq!(snapshot.total_items(), sum);
        assert!(snapshot.items.iter().all(|i| i.quantity >= 1));

        let mut seen: Vec<_> = snapshot.items.iter().map(|i| i.product.clone()).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), snapshot.items.len());
    }
}

#[test]
fn test_cart_survives_reopen() {
    let cache = Cache::new(MemoryStore::new());
    {
        let store = open(&cache);
        store.add_item(&slug("A"), 2).unwrap();
        store.add_item(&slug("B"), 1).unwrap();
    }

    let reopened = open(&cache);
    let snapshot = reopened.snapshot();
    assert_eq!(lines(&snapshot), vec![("A".to_string(), 2), ("B".to_string(), 1)]);
    assert_eq!(snapshot.persistence, PersistenceStatus::Healthy);
}

#[test]
fn test_corrupt_record_opens_empty() {
    let cache = Cache::new(MemoryStore::new());
    cache.set_raw("cart:sess_test", b"\x00garbage").unwrap();

    let store = open(&cache);
    assert!(store.snapshot().is_empty());
    assert_eq!(store.snapshot().persistence, PersistenceStatus::Healthy);
}

#[test]
fn test_sessions_are_isolated() {
    let cache = Cache::new(MemoryStore::new());
    let config = CartStoreConfig::default();
    let first = CartStore::open_session(catalog(), cache.clone(), &SessionId::new("one"), &config);
    let second = CartStore::open_session(catalog(), cache.clone(), &SessionId::new("two"), &config);

    first.add_item(&slug("A"), 1).unwrap();
    assert!(second.snapshot().is_empty());
    assert_eq!(cache.keys().unwrap(), vec!["cart:one".to_string()]);
}

#[test]
fn test_write_failure_degrades_without_rollback() {
    let cache = Cache::new(MemoryStore::with_quota(280));
    let store = open(&cache);

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let _subscription = store.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

    // A single line fits, a second one blows the quota.
    store.add_item(&slug("A"), 1).unwrap();
    assert!(!store.snapshot().persistence.is_degraded());

    let snapshot = store.add_item(&slug("B"), 1).unwrap();
    assert_eq!(snapshot.total_items(), 2);
    assert!(snapshot.persistence.is_degraded());

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 3);
    assert!(matches!(&events[1], CartEvent::Changed(s) if s.total_items() == 2));
    assert!(matches!(&events[2], CartEvent::PersistenceFailed { reason } if reason.contains("quota")));

    drop(events);
    // Shrinking the cart makes it fit again.
    let snapshot = store.remove_item(&slug("B"));
    assert_eq!(snapshot.persistence, PersistenceStatus::Healthy);
}

struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Err(CacheError::StoreError("disk unavailable".to_string()))
    }

    fn set(&self, _key: &str, _value: &[u8]) -> Result<(), CacheError> {
        Err(CacheError::StoreError("disk unavailable".to_string()))
    }

    fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        Ok(Vec::new())
    }
}

#[test]
fn test_unreadable_backend_starts_degraded() {
    let store = open(&Cache::new(BrokenStore));
    assert!(store.snapshot().persistence.is_degraded());

    let snapshot = store.add_item(&slug("P1"), 1).unwrap();
    assert_eq!(snapshot.total_items(), 1);
    assert!(snapshot.persistence.is_degraded());
}

#[test]
fn test_notifications_follow_commit() {
    let handle = CartHandle::new(open(&Cache::new(MemoryStore::new())));

    // The listener reads the store back; it must already see the change.
    let observed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&observed);
    let reader = handle.clone();
    let _subscription = handle.subscribe(move |event| {
        if let CartEvent::Changed(snapshot) = event {
            let current = reader.snapshot();
            sink.lock()
                .unwrap()
                .push((snapshot.total_items(), current.total_items()));
        }
    });

    handle.add_item(&slug("A"), 2).unwrap();
    handle.add_item(&slug("B"), 1).unwrap();
    handle.clear();

    assert_eq!(*observed.lock().unwrap(), vec![(2, 2), (3, 3), (0, 0)]);
}

#[test]
fn test_listener_may_mutate() {
    let handle = CartHandle::new(open(&Cache::new(MemoryStore::new())));
    let reentrant = handle.clone();
    let _subscription = handle.subscribe(move |event| {
        // Top the cart up to two lines whenever only one is present.
        if let CartEvent::Changed(snapshot) = event {
            if snapshot.items.len() == 1 {
                reentrant.add_item(&slug("B"), 1).unwrap();
            }
        }
    });

    handle.add_item(&slug("A"), 1).unwrap();
    assert_eq!(handle.snapshot().total_items(), 2);
}

#[test]
fn test_unsubscribe_stops_delivery() {
    let handle = CartHandle::new(open(&Cache::new(MemoryStore::new())));
    let count = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&count);
    let subscription = handle.subscribe(move |_| *sink.lock().unwrap() += 1);

    handle.add_item(&slug("A"), 1).unwrap();
    subscription.unsubscribe();
    handle.add_item(&slug("A"), 1).unwrap();

    assert_eq!(*count.lock().unwrap(), 1);
}

#[test]
fn test_handles_share_one_store() {
    let handle = CartHandle::new(open(&Cache::new(MemoryStore::new())));
    let header = handle.clone();
    let card = handle.clone();

    card.add_item(&slug("P3"), 1).unwrap();
    assert_eq!(header.snapshot().total_items(), 1);
    assert_eq!(header.snapshot(), card.snapshot());
    assert!(header.snapshot().totals.has_quote_items());
}

#[test]
fn test_concurrent_writers_notify_in_commit_order() {
    const THREADS: usize = 8;
    const ADDS: usize = 25;

    let handle = CartHandle::new(open(&Cache::new(MemoryStore::new())));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _subscription = handle.subscribe(move |event| {
        if let CartEvent::Changed(snapshot) = event {
            sink.lock().unwrap().push((snapshot.revision, snapshot.total_items()));
        }
    });

    let workers: Vec<_> = (0..THREADS)
        .map(|_| {
            let handle = handle.clone();
            std::thread::spawn(move || {
                for _ in 0..ADDS {
                    handle.add_item(&slug("A"), 1).unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), THREADS * ADDS);
    // Every revision delivered once, in order, each carrying its own count.
    for (index, (revision, total_items)) in seen.iter().enumerate() {
        assert_eq!(*revision, index as u64 + 1);
        assert_eq!(*total_items, index as i64 + 1);
    }
    assert_eq!(handle.snapshot().total_items(), (THREADS * ADDS) as i64);
}
