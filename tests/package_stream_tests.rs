use rand::Rng;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use txlink::codec::{
    BranchEndRequest, GlobalBeginRequest, GlobalEndRequest, MessagePayload, RegisterRmRequest,
};
use txlink::handler::RpcPackageHandler;
use txlink::protocol::RpcMessage;
use txlink::transport::TransportSession;

struct MockSession {
    addr: String,
    closed: AtomicBool,
}

impl MockSession {
    fn new(addr: &str) -> MockSession {
        MockSession {
            addr: addr.to_string(),
            closed: AtomicBool::new(false),
        }
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

fn sample_messages() -> Vec<RpcMessage> {
    let mut with_meta = RpcMessage::request(
        2,
        MessagePayload::GlobalCommit(GlobalEndRequest {
            xid: "tc:8091:2001".to_string(),
            extra_data: String::new(),
        }),
    );
    with_meta
        .head_map
        .insert("trace".to_string(), "abc123".to_string());

    vec![
        RpcMessage::request(
            1,
            MessagePayload::GlobalBegin(GlobalBeginRequest {
                timeout_millis: 60_000,
                transaction_name: "order-create".to_string(),
            }),
        ),
        with_meta,
        RpcMessage::heartbeat_request(3),
        RpcMessage::request(
            4,
            MessagePayload::BranchCommit(BranchEndRequest {
                xid: "tc:8091:2001".to_string(),
                branch_id: 77,
                branch_type: 0,
                resource_id: "db-orders".to_string(),
                application_data: "{\"k\":1}".to_string(),
            }),
        ),
        RpcMessage::request(
            5,
            MessagePayload::RegisterRm(RegisterRmRequest {
                version: "1.0.0".to_string(),
                application_id: "app1".to_string(),
                transaction_service_group: "default".to_string(),
                extra_data: String::new(),
                resource_ids: "db1,db2".to_string(),
            }),
        ),
    ]
}

/// Feeds `stream` to the handler in the given chunks, draining complete
/// frames as they become available, the way a receive loop does.
fn feed_in_chunks(chunks: Vec<Vec<u8>>) -> Vec<RpcMessage> {
    let session = MockSession::new("10.0.0.1:30001");
    let handler = RpcPackageHandler;

    let mut buffer: Vec<u8> = Vec::new();
    let mut decoded = Vec::new();

    for chunk in chunks {
        buffer.extend(chunk);
        loop {
            match handler.read(&session, &buffer) {
                Ok((Some(message), consumed)) => {
                    decoded.push(message);
                    buffer.drain(..consumed);
                }
                Ok((None, _needed)) => break,
                Err(err) => panic!("stream decode failed: {err}"),
            }
        }
    }

    assert!(buffer.is_empty(), "stream left {} stray bytes", buffer.len());
    decoded
}

#[test]
fn partial_header_then_partial_body_then_rest() {
    let session = MockSession::new("10.0.0.1:30001");
    let handler = RpcPackageHandler;

    let message = RpcMessage::request(
        9,
        MessagePayload::GlobalBegin(GlobalBeginRequest {
            timeout_millis: 1000,
            transaction_name: "t".to_string(),
        }),
    );
    let full = handler.write(&session, &message).expect("write failed");
    assert!(full.len() > 16);

    // 8 bytes: not even a header.
    let (out, needed) = handler.read(&session, &full[..8]).expect("read failed");
    assert!(out.is_none());
    assert_eq!(needed, 0);

    // 16 bytes: header complete, body still short; the handler reports the
    // full frame size so the caller can reserve.
    let (out, needed) = handler.read(&session, &full[..16]).expect("read failed");
    assert!(out.is_none());
    assert_eq!(needed, full.len());

    let (out, consumed) = handler.read(&session, &full).expect("read failed");
    assert_eq!(out.unwrap(), message);
    assert_eq!(consumed, full.len());
}

#[test]
fn byte_by_byte_feed_recovers_all_messages() {
    let session = MockSession::new("10.0.0.1:30001");
    let handler = RpcPackageHandler;

    let messages = sample_messages();
    let mut stream = Vec::new();
    for message in &messages {
        stream.extend(handler.write(&session, message).expect("write failed"));
    }

    let chunks = stream.iter().map(|b| vec![*b]).collect();
    assert_eq!(feed_in_chunks(chunks), messages);
}

#[test]
fn random_chunk_splits_recover_all_messages_in_order() {
    let session = MockSession::new("10.0.0.1:30001");
    let handler = RpcPackageHandler;

    let messages = sample_messages();
    let mut stream = Vec::new();
    for message in &messages {
        stream.extend(handler.write(&session, message).expect("write failed"));
    }

    let mut rng = rand::thread_rng();
    for _ in 0..50 {
        let mut chunks = Vec::new();
        let mut rest = stream.as_slice();
        while !rest.is_empty() {
            let take = rng.gen_range(1..=rest.len().min(24));
            chunks.push(rest[..take].to_vec());
            rest = &rest[take..];
        }

        assert_eq!(feed_in_chunks(chunks), messages);
    }
}

#[test]
fn decoder_never_consumes_past_the_last_complete_frame() {
    let session = MockSession::new("10.0.0.1:30001");
    let handler = RpcPackageHandler;

    let messages = sample_messages();
    let first = handler.write(&session, &messages[0]).expect("write failed");
    let second = handler.write(&session, &messages[1]).expect("write failed");

    // One whole frame plus a sliver of the next.
    let mut stream = first.clone();
    stream.extend(&second[..5]);

    let (out, consumed) = handler.read(&session, &stream).expect("read failed");
    assert_eq!(out.unwrap(), messages[0]);
    assert_eq!(consumed, first.len());

    // The remainder alone is still just a partial header.
    let (out, needed) = handler
        .read(&session, &stream[consumed..])
        .expect("read failed");
    assert!(out.is_none());
    assert_eq!(needed, 0);
}
