use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use txlink::codec::{RegisterRmRequest, RegisterTmRequest};
use txlink::transport::{SessionHandle, TransportSession};
use txlink_tokio_server::{SessionError, SessionRegistry, TransactionRole};

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

fn tm_request(application_id: &str) -> RegisterTmRequest {
    RegisterTmRequest {
        version: "1.0.0".to_string(),
        application_id: application_id.to_string(),
        transaction_service_group: "default".to_string(),
        extra_data: String::new(),
    }
}

fn rm_request(application_id: &str, resource_ids: &str) -> RegisterRmRequest {
    RegisterRmRequest {
        version: "1.0.0".to_string(),
        application_id: application_id.to_string(),
        transaction_service_group: "default".to_string(),
        extra_data: String::new(),
        resource_ids: resource_ids.to_string(),
    }
}

#[test]
fn registration_builds_contexts_and_rm_snapshot() {
    let registry = SessionRegistry::new();
    let tm = MockSession::handle("10.0.0.1:30001");
    let rm = MockSession::handle("10.0.0.1:30002");

    registry.register_tm(&tm_request("app1"), &tm);
    registry.register_rm(&rm_request("app1", "db1,db2"), &rm);

    let rm_sessions = registry.rm_sessions();
    assert_eq!(rm_sessions.len(), 2);
    assert_eq!(rm_sessions.get("db1"), Some(&rm));
    assert_eq!(rm_sessions.get("db2"), Some(&rm));

    let tm_context = registry.context_of(&tm).expect("tm should be registered");
    assert_eq!(tm_context.role(), TransactionRole::Tm);
    assert_eq!(tm_context.client_id(), "app1:10.0.0.1:30001");

    let rm_context = registry.context_of(&rm).expect("rm should be registered");
    assert_eq!(rm_context.role(), TransactionRole::Rm);
    assert_eq!(rm_context.application_id(), "app1");
    assert!(rm_context.resource_set().contains("db1"));
    assert!(rm_context.resource_set().contains("db2"));
    assert_eq!(rm_context.session(), &rm);
}

#[test]
fn dead_rm_does_not_fall_back_to_the_application_tm() {
    let registry = SessionRegistry::new();
    let tm = MockSession::handle("10.0.0.1:30001");
    let rm = MockSession::handle("10.0.0.1:30002");

    registry.register_tm(&tm_request("app1"), &tm);
    registry.register_rm(&rm_request("app1", "db1,db2"), &rm);

    rm.close();

    // Only the TM remains, and TMs never serve resource traffic.
    let err = registry
        .session_for("db1", "app1:10.0.0.1:30002")
        .unwrap_err();
    assert!(matches!(err, SessionError::NoSuitableSession { .. }));
}

#[test]
fn exact_lookup_routes_to_the_registering_connection() {
    let registry = SessionRegistry::new();
    let first = MockSession::handle("1.2.3.4:5000");

    registry.register_rm(&rm_request("A", "R"), &first);
    assert_eq!(
        registry.session_for("R", "A:1.2.3.4:5000").unwrap(),
        first
    );

    // The original dies and the client reconnects on another port; the same
    // query now routes to the replacement.
    first.close();
    let second = MockSession::handle("1.2.3.4:5001");
    registry.register_rm(&rm_request("A", "R"), &second);

    assert_eq!(
        registry.session_for("R", "A:1.2.3.4:5000").unwrap(),
        second
    );
}

#[test]
fn fallback_prefers_same_host_then_same_application() {
    let registry = SessionRegistry::new();
    let host1_a = MockSession::handle("1.1.1.1:5000");
    let host1_b = MockSession::handle("1.1.1.1:5001");
    let host2 = MockSession::handle("2.2.2.2:5000");

    registry.register_rm(&rm_request("A", "R"), &host1_a);
    registry.register_rm(&rm_request("A", "R"), &host1_b);
    registry.register_rm(&rm_request("A", "R"), &host2);

    // No session on the queried port: any same-host connection qualifies.
    let same_host = registry.session_for("R", "A:1.1.1.1:9999").unwrap();
    assert!(same_host == host1_a || same_host == host1_b);

    host1_a.close();
    host1_b.close();
    assert_eq!(registry.session_for("R", "A:1.1.1.1:9999").unwrap(), host2);

    host2.close();
    let err = registry.session_for("R", "A:1.1.1.1:9999").unwrap_err();
    assert!(matches!(err, SessionError::NoSuitableSession { .. }));
}

#[test]
fn malformed_client_ids_are_rejected() {
    let registry = SessionRegistry::new();

    for client_id in ["", "app1", "app1:10.0.0.1", "app1:10.0.0.1:30001:extra"] {
        let err = registry.session_for("db1", client_id).unwrap_err();
        assert_eq!(err, SessionError::InvalidClientId(client_id.to_string()));
    }
}

#[test]
fn unknown_application_finds_no_session() {
    let registry = SessionRegistry::new();
    let rm = MockSession::handle("10.0.0.1:30002");
    registry.register_rm(&rm_request("app1", "db1"), &rm);

    let err = registry
        .session_for("db1", "other-app:10.0.0.1:30002")
        .unwrap_err();
    assert!(matches!(err, SessionError::NoSuitableSession { .. }));
}

#[test]
fn same_client_returns_a_live_input_unchanged() {
    let registry = SessionRegistry::new();
    let session = MockSession::handle("10.0.0.1:30002");
    registry.register_rm(&rm_request("app1", "db1"), &session);

    assert_eq!(registry.same_client_session(&session), Some(session));
}

#[test]
fn same_client_falls_back_to_a_sibling_port() {
    let registry = SessionRegistry::new();
    let original = MockSession::handle("10.0.0.1:30002");
    let sibling = MockSession::handle("10.0.0.1:30003");

    registry.register_rm(&rm_request("app1", "db1"), &original);
    registry.register_rm(&rm_request("app1", "db1"), &sibling);

    original.close();
    assert_eq!(registry.same_client_session(&original), Some(sibling));
}

#[test]
fn same_client_of_an_unregistered_session_is_none() {
    let registry = SessionRegistry::new();
    let stranger = MockSession::handle("10.0.0.9:30002");
    stranger.close();

    assert!(registry.same_client_session(&stranger).is_none());
}

#[test]
fn rm_snapshot_skips_tm_connections() {
    let registry = SessionRegistry::new();
    let tm = MockSession::handle("10.0.0.1:30001");

    registry.register_tm(&tm_request("app1"), &tm);
    // The application never registered an RM, so no resource can be served.
    assert!(registry.rm_sessions().is_empty());
}

#[test]
fn rm_snapshot_reflects_a_resource_list_overwrite() {
    let registry = SessionRegistry::new();
    let rm = MockSession::handle("10.0.0.1:30002");

    registry.register_rm(&rm_request("app1", "db1,db2"), &rm);
    registry.register_rm(&rm_request("app1", "db3"), &rm);

    let rm_sessions = registry.rm_sessions();
    assert_eq!(rm_sessions.len(), 1);
    assert_eq!(rm_sessions.get("db3"), Some(&rm));
    assert!(!rm_sessions.contains_key("db1"));
}

#[test]
fn release_forgets_role_and_identity() {
    let registry = SessionRegistry::new();
    let rm = MockSession::handle("10.0.0.1:30002");

    registry.register_rm(&rm_request("app1", "db1"), &rm);
    assert!(registry.is_registered(&rm));

    registry.release(&rm);
    assert!(!registry.is_registered(&rm));
    assert!(registry.role_of(&rm).is_none());
    assert!(registry.context_of(&rm).is_none());
}

#[test]
fn concurrent_registration_is_last_writer_wins_per_leaf() {
    let registry = Arc::new(SessionRegistry::new());
    let mut handles = Vec::new();

    for _ in 0..8 {
        let registry = registry.clone();
        handles.push(std::thread::spawn(move || {
            let session = MockSession::handle("10.0.0.1:30002");
            registry.register_rm(&rm_request("app1", "db1"), &session);
            session
        }));
    }

    let sessions: Vec<SessionHandle> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    // One leaf survives and it is one of the racers.
    let chosen = registry.session_for("db1", "app1:10.0.0.1:30002").unwrap();
    assert!(sessions.contains(&chosen));
}
