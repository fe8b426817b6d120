//! Multi-device behavior of SyncedStore against the in-memory remote

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ayala_sync::{
    LocalCache, MemoryRemote, RemoteStore, RemoteWatch, SyncResult, SyncedStore, document,
};
use futures::StreamExt;
use serde_json::{Value, json};
use shared::models::{Table, TableStatus};
use shared::seed::default_tables;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(2);

fn connect(remote: &MemoryRemote) -> SyncedStore<Vec<Table>> {
    SyncedStore::connect(Arc::new(remote.clone()), "tables", default_tables())
}

/// Wait until the store's local state satisfies `pred`.
async fn wait_until(store: &SyncedStore<Vec<Table>>, pred: impl Fn(&Vec<Table>) -> bool) {
    let mut rx = store.subscribe();
    timeout(WAIT, rx.wait_for(|v| pred(v)))
        .await
        .expect("state did not converge in time")
        .expect("store closed");
}

/// Remote whose change notifications arrive late, like a slow network.
#[derive(Clone)]
struct LaggingRemote {
    inner: MemoryRemote,
    lag: Duration,
}

#[async_trait]
impl RemoteStore for LaggingRemote {
    async fn read(&self, path: &str) -> SyncResult<Option<Value>> {
        self.inner.read(path).await
    }

    async fn write(&self, path: &str, value: Value) -> SyncResult<()> {
        self.inner.write(path, value).await
    }

    async fn watch(&self, path: &str) -> SyncResult<RemoteWatch> {
        let lag = self.lag;
        let changes = self.inner.watch(path).await?;
        Ok(changes
            .then(move |item| async move {
                tokio::time::sleep(lag).await;
                item
            })
            .boxed())
    }
}

fn remote_tables(remote: &MemoryRemote) -> Vec<Table> {
    document::revive(remote.snapshot("tables").expect("path empty")).unwrap()
}

#[tokio::test]
async fn test_empty_path_is_seeded() {
    let remote = MemoryRemote::new();
    let store = connect(&remote);

    timeout(WAIT, store.wait_ready()).await.unwrap();
    store.settle().await;

    assert!(store.is_ready());
    assert_eq!(remote_tables(&remote), default_tables());
}

#[tokio::test]
async fn test_undecodable_remote_is_reseeded() {
    let remote = MemoryRemote::new();
    remote.write("tables", json!("not a table list")).await.unwrap();

    let store = connect(&remote);
    timeout(WAIT, store.wait_ready()).await.unwrap();
    store.settle().await;

    assert_eq!(remote_tables(&remote), default_tables());
    assert_eq!(*store.get(), default_tables());
}

#[tokio::test]
async fn test_existing_remote_replaces_local() {
    let remote = MemoryRemote::new();
    remote
        .write(
            "tables",
            json!([{
                "id": 1,
                "name": "שולחן 1",
                "status": "ORDERED",
                "guests": 2,
                "startTime": "2024-01-22T16:32:15+02:00"
            }]),
        )
        .await
        .unwrap();

    let store = connect(&remote);
    wait_until(&store, |tables| tables.len() == 1).await;

    let table = &store.get()[0];
    assert_eq!(table.status, TableStatus::Ordered);
    assert!(table.current_order.is_empty());
    assert_eq!(
        shared::util::format_iso(&table.start_time.unwrap()),
        "2024-01-22T14:32:15.000Z"
    );
}

#[tokio::test]
async fn test_write_propagates_to_other_device() {
    let remote = MemoryRemote::new();
    let a = connect(&remote.device());
    let b = connect(&remote.device());
    timeout(WAIT, a.wait_ready()).await.unwrap();
    timeout(WAIT, b.wait_ready()).await.unwrap();
    a.settle().await;
    b.settle().await;

    a.update(|tables| {
        let mut next = tables.clone();
        next[0].guests = 3;
        next[0].status = TableStatus::Occupied;
        next
    });
    // Local state is updated before any remote round trip
    assert_eq!(a.get()[0].guests, 3);

    wait_until(&b, |tables| tables[0].guests == 3).await;
    assert_eq!(b.get()[0].status, TableStatus::Occupied);
}

#[tokio::test]
async fn test_concurrent_writers_converge_to_last_write() {
    let remote = MemoryRemote::new();
    let a = connect(&remote.device());
    let b = connect(&remote.device());
    timeout(WAIT, a.wait_ready()).await.unwrap();
    timeout(WAIT, b.wait_ready()).await.unwrap();
    a.settle().await;
    b.settle().await;

    a.update(|tables| {
        let mut next = tables.clone();
        next[0].guests = 2;
        next
    });
    b.update(|tables| {
        let mut next = tables.clone();
        next[1].guests = 5;
        next
    });
    a.settle().await;
    b.settle().await;

    // Whole-collection overwrite: exactly one of the two edits survives
    let winner = remote_tables(&remote);
    assert!((winner[0].guests == 2) ^ (winner[1].guests == 5));

    wait_until(&a, |tables| *tables == winner).await;
    wait_until(&b, |tables| *tables == winner).await;
}

#[tokio::test]
async fn test_own_writes_arrive_in_order() {
    let remote = MemoryRemote::new();
    let store = connect(&remote);
    timeout(WAIT, store.wait_ready()).await.unwrap();

    for guests in 1..=20 {
        store.update(|tables| {
            let mut next = tables.clone();
            next[2].guests = guests;
            next
        });
    }
    store.settle().await;

    assert_eq!(remote_tables(&remote)[2].guests, 20);
    assert_eq!(store.get()[2].guests, 20);
}

#[tokio::test]
async fn test_own_echoes_never_roll_back_local_state() {
    let remote = MemoryRemote::new();
    let store = connect(&remote);
    timeout(WAIT, store.wait_ready()).await.unwrap();

    for guests in 1..=20 {
        store.update(|tables| {
            let mut next = tables.clone();
            next[2].guests = guests;
            next
        });
        // Let the writer and listener interleave with local writes
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        assert_eq!(store.get()[2].guests, guests);
    }
    store.settle().await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(store.get()[2].guests, 20);
}

#[tokio::test]
async fn test_late_echo_of_timestamped_write_is_recognized() {
    let remote = MemoryRemote::new();
    let lagging = LaggingRemote {
        inner: remote.clone(),
        lag: Duration::from_millis(30),
    };
    let store = SyncedStore::connect(Arc::new(lagging), "tables", default_tables());
    timeout(WAIT, store.wait_ready()).await.unwrap();
    store.settle().await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    store.update(|tables| {
        let mut next = tables.clone();
        next[0].status = TableStatus::Occupied;
        next[0].start_time = Some(shared::util::now());
        next[0].guests = 1;
        next
    });
    store.update(|tables| {
        let mut next = tables.clone();
        next[0].guests = 2;
        next
    });

    // Both echoes land while sampling; neither may surface an older state
    for _ in 0..10 {
        assert_eq!(store.get()[0].guests, 2);
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    store.settle().await;
    assert_eq!(store.get()[0].guests, 2);
    assert_eq!(remote_tables(&remote), *store.get());
}

#[tokio::test]
async fn test_offline_write_is_kept_locally() {
    let remote = MemoryRemote::new();
    let online = connect(&remote.device());
    let device = remote.device();
    let offline = connect(&device);
    timeout(WAIT, online.wait_ready()).await.unwrap();
    timeout(WAIT, offline.wait_ready()).await.unwrap();
    online.settle().await;
    offline.settle().await;

    device.set_offline(true);
    offline.update(|tables| {
        let mut next = tables.clone();
        next[4].guests = 4;
        next
    });
    offline.settle().await;

    // Failed push: no rollback, remote untouched
    assert_eq!(offline.get()[4].guests, 4);
    assert_eq!(remote_tables(&remote)[4].guests, 0);

    online.update(|tables| {
        let mut next = tables.clone();
        next[5].guests = 6;
        next
    });
    online.settle().await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Devices have diverged until the offline one writes again
    assert_eq!(offline.get()[5].guests, 0);
    assert_eq!(online.get()[4].guests, 0);
}

#[tokio::test]
async fn test_try_update_without_change_writes_nothing() {
    let remote = MemoryRemote::new();
    let store = connect(&remote);
    timeout(WAIT, store.wait_ready()).await.unwrap();
    store.settle().await;

    let mut rx = store.subscribe();
    rx.borrow_and_update();

    let wrote = store.try_update(|_| Ok::<_, ()>(None)).unwrap();
    assert!(!wrote);
    let failed = store.try_update(|_| Err::<Option<Vec<Table>>, _>("rejected"));
    assert_eq!(failed, Err("rejected"));

    assert!(!rx.has_changed().unwrap());
}

#[tokio::test]
async fn test_cache_mirrors_changes() {
    let dir = tempfile::TempDir::new().unwrap();
    let cache = LocalCache::new(dir.path(), "tables");
    let remote = MemoryRemote::new();

    let mut cached = default_tables();
    cached[0].guests = 7;
    cached[0].status = TableStatus::Occupied;
    cache.save(&cached).unwrap();

    // Device boots offline: readers see the cached floor, not the seed
    remote.set_offline(true);
    let store = SyncedStore::connect_with_state(
        Arc::new(remote.clone()),
        "tables",
        default_tables(),
        cache.load(),
    );
    assert_eq!(store.get()[0].guests, 7);

    let mirror = cache.mirror(&store);
    store.update(|tables| {
        let mut next = tables.clone();
        next[0].guests = 8;
        next
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    store.shutdown();
    timeout(WAIT, mirror).await.unwrap().unwrap();

    let saved: Vec<Table> = cache.load().unwrap();
    assert_eq!(saved[0].guests, 8);
}
