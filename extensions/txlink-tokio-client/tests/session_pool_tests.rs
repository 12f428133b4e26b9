use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use txlink::transport::{SessionHandle, TransportSession};
use txlink_tokio_client::ClientSessionPool;

struct MockSession {
    addr: String,
    closed: AtomicBool,
}

impl MockSession {
    fn handle(addr: &str) -> SessionHandle {
        SessionHandle::new(Arc::new(MockSession {
            addr: addr.to_string(),
            closed: AtomicBool::new(false),
        }))
    }
}

impl TransportSession for MockSession {
    fn remote_addr(&self) -> String {
        self.addr.clone()
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn send(&self, _bytes: &[u8]) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn acquire_returns_a_registered_live_session() {
    let pool = ClientSessionPool::new();
    let session = MockSession::handle("192.168.1.10:8091");

    pool.register(session.clone());
    assert_eq!(pool.session_size(), 1);

    let acquired = pool.acquire().await.expect("expected a live session");
    assert_eq!(acquired, session);
}

#[tokio::test]
async fn acquire_evicts_dead_sessions_and_returns_a_live_one() {
    let pool = ClientSessionPool::new();
    let dead = MockSession::handle("192.168.1.10:8091");
    let live = MockSession::handle("192.168.1.11:8091");

    pool.register(dead.clone());
    pool.register(live.clone());
    dead.close();

    let acquired = pool.acquire().await.expect("expected a live session");
    assert_eq!(acquired, live);

    // The dead entry is gone; only the live one is counted.
    assert_eq!(pool.session_size(), 1);
    assert!(pool.acquire_by_server_address("192.168.1.10:8091").is_none());
}

#[tokio::test(start_paused = true)]
async fn empty_pool_acquire_spends_its_retry_budget_and_gives_up() {
    let pool = ClientSessionPool::new();

    // Paused time auto-advances through every poll tick.
    assert!(pool.acquire().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn acquire_picks_up_a_session_registered_while_polling() {
    let pool = Arc::new(ClientSessionPool::new());

    let registrar = pool.clone();
    let register_task = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(350)).await;
        registrar.register(MockSession::handle("192.168.1.10:8091"));
    });

    let acquired = pool.acquire().await;
    register_task.await.unwrap();

    assert!(acquired.is_some());
}

#[tokio::test]
async fn acquire_by_server_address_only_considers_that_address() {
    let pool = ClientSessionPool::new();
    let first = MockSession::handle("192.168.1.10:8091");
    let second = MockSession::handle("192.168.1.11:8091");

    pool.register(first.clone());
    pool.register(second.clone());

    assert_eq!(
        pool.acquire_by_server_address("192.168.1.10:8091"),
        Some(first)
    );
    assert_eq!(
        pool.acquire_by_server_address("192.168.1.11:8091"),
        Some(second)
    );
    assert!(pool.acquire_by_server_address("192.168.1.12:8091").is_none());
}

#[tokio::test]
async fn release_closes_the_session_and_is_idempotent() {
    let pool = ClientSessionPool::new();
    let session = MockSession::handle("192.168.1.10:8091");

    pool.register(session.clone());
    assert!(!session.is_closed());

    pool.release(&session);
    assert!(session.is_closed());
    assert_eq!(pool.session_size(), 0);

    // A concurrent scanner may race to the same eviction; the second call
    // must not drive the counter negative.
    pool.release(&session);
    assert_eq!(pool.session_size(), 0);
}

#[tokio::test]
async fn reconnect_to_the_same_address_is_a_distinct_session() {
    let pool = ClientSessionPool::new();
    let first = MockSession::handle("192.168.1.10:8091");

    pool.register(first.clone());
    pool.release(&first);

    let second = MockSession::handle("192.168.1.10:8091");
    pool.register(second.clone());

    assert_eq!(pool.session_size(), 1);
    assert_eq!(
        pool.acquire_by_server_address("192.168.1.10:8091"),
        Some(second)
    );
}
