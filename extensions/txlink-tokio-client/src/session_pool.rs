use dashmap::{DashMap, DashSet};
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::Duration;

use txlink::transport::SessionHandle;

/// How many times an empty-pool `acquire` re-scans before giving up.
pub const MAX_CHECK_ALIVE_RETRY: usize = 600;

/// Delay between empty-pool re-scans.
pub const CHECK_ALIVE_INTERVAL: Duration = Duration::from_millis(100);

/// Client-side pool of live connections across the configured coordinator
/// addresses.
///
/// The pool never opens connections itself; the connector registers each
/// established session and the pool hands them out, lazily evicting any
/// that have died since. All mutations are single-key operations, so
/// concurrent scans and releases need no coordination beyond idempotence.
#[derive(Default)]
pub struct ClientSessionPool {
    all_sessions: DashMap<SessionHandle, ()>,
    server_sessions: DashMap<String, DashSet<SessionHandle>>,
    session_size: AtomicI32,
}

impl ClientSessionPool {
    pub fn new() -> ClientSessionPool {
        ClientSessionPool::default()
    }

    /// Returns any live session, releasing dead ones found along the way.
    ///
    /// When the pool is empty this polls on [`CHECK_ALIVE_INTERVAL`] up to
    /// [`MAX_CHECK_ALIVE_RETRY`] times, giving a reconnecting transport time
    /// to register, and returns `None` once the budget is spent.
    pub async fn acquire(&self) -> Option<SessionHandle> {
        if let Some(session) = self.scan_live() {
            return Some(session);
        }

        if self.session_size.load(Ordering::SeqCst) == 0 {
            for _ in 0..MAX_CHECK_ALIVE_RETRY {
                tokio::time::sleep(CHECK_ALIVE_INTERVAL).await;
                if let Some(session) = self.scan_live() {
                    return Some(session);
                }
            }
        }

        None
    }

    /// Returns a live session to the given coordinator address, without the
    /// empty-pool retry loop.
    pub fn acquire_by_server_address(&self, server_address: &str) -> Option<SessionHandle> {
        let mut dead = Vec::new();
        let mut found = None;

        if let Some(sessions) = self.server_sessions.get(server_address) {
            for session in sessions.iter() {
                if session.is_closed() {
                    dead.push(session.clone());
                } else {
                    found = Some(session.clone());
                    break;
                }
            }
        }

        for session in dead {
            self.release(&session);
        }
        found
    }

    /// Adds an established connection to the pool.
    pub fn register(&self, session: SessionHandle) {
        self.server_sessions
            .entry(session.remote_addr())
            .or_default()
            .insert(session.clone());

        if self.all_sessions.insert(session, ()).is_none() {
            self.session_size.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Drops a session from the pool, closing it if still open.
    ///
    /// Safe to call from several scanners at once: only the call that
    /// actually removes the entry decrements the counter.
    pub fn release(&self, session: &SessionHandle) {
        let removed = self.all_sessions.remove(session).is_some();

        if let Some(sessions) = self.server_sessions.get(&session.remote_addr()) {
            sessions.remove(session);
        }

        if !session.is_closed() {
            session.close();
        }

        if removed {
            tracing::debug!(remote = %session.remote_addr(), "released pooled session");
            self.session_size.fetch_sub(1, Ordering::SeqCst);
        }
    }

    pub fn session_size(&self) -> i32 {
        self.session_size.load(Ordering::SeqCst)
    }

    fn scan_live(&self) -> Option<SessionHandle> {
        let mut dead = Vec::new();
        let mut found = None;

        for entry in self.all_sessions.iter() {
            let session = entry.key().clone();
            if session.is_closed() {
                dead.push(session);
            } else {
                found = Some(session);
                break;
            }
        }

        for session in dead {
            self.release(&session);
        }
        found
    }
}
