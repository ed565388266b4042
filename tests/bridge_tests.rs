//! Bridge Tests
//!
//! End-to-end tests over real Unix domain sockets: framing, connection
//! isolation, backlog queueing, and watchdog supervision.

use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use simbridge::protocol::{
    read_reply, write_request, Command, CommandCode, CommandType, Dimension, ErrorCode, Reply,
    Request, Response, StateQuery, Target,
};
use simbridge::{Bridge, BridgeHandle, Config, MemoryProvider};

fn seeded_provider() -> Arc<MemoryProvider> {
    let provider = Arc::new(MemoryProvider::new());
    provider.add_world(Dimension::Overworld);
    provider.spawn(Dimension::Overworld, 1, "player", Some(20.0));
    provider.spawn(Dimension::Overworld, 7, "pig", Some(10.0));
    provider.seat_player("Steve", Dimension::Overworld, 1);
    provider
}

fn start_bridge(dir: &tempfile::TempDir) -> BridgeHandle {
    let config = Config::builder()
        .socket_path(dir.path().join("bridge.sock"))
        .watchdog_interval(Duration::from_millis(100))
        .build();
    Bridge::start(config, seeded_provider())
}

/// Poll a condition until it holds or the deadline passes
fn wait_for(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    false
}

/// Connect, retrying while the bridge binds
fn connect(path: &Path) -> UnixStream {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        match UnixStream::connect(path) {
            Ok(stream) => return stream,
            Err(e) => {
                if Instant::now() >= deadline {
                    panic!("failed to connect to {}: {}", path.display(), e);
                }
                thread::sleep(Duration::from_millis(10));
            }
        }
    }
}

fn player_name_request() -> Request {
    Request::Command(Command::new(CommandType::PlayerName))
}

// =============================================================================
// Request/Response Tests
// =============================================================================

#[test]
fn test_end_to_end_command_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let handle = start_bridge(&dir);

    let mut stream = connect(handle.socket_path());
    write_request(&mut stream, &player_name_request()).unwrap();
    let reply = read_reply(&mut stream).unwrap();
    assert_eq!(reply, Reply::Response(Response::Text("Steve".to_string())));

    handle.stop();
}

#[test]
fn test_multiple_requests_on_one_connection() {
    let dir = tempfile::tempdir().unwrap();
    let handle = start_bridge(&dir);

    let mut stream = connect(handle.socket_path());

    write_request(&mut stream, &player_name_request()).unwrap();
    assert_eq!(
        read_reply(&mut stream).unwrap(),
        Reply::Response(Response::Text("Steve".to_string()))
    );

    let query = Request::Query(StateQuery {
        want_entities: true,
        world: None,
        block: None,
    });
    write_request(&mut stream, &query).unwrap();
    match read_reply(&mut stream).unwrap() {
        Reply::State(state) => {
            assert_eq!(state.player_entity_id, Some(1));
            assert_eq!(state.entities.map(|e| e.len()), Some(2));
        }
        other => panic!("expected state reply, got {:?}", other),
    }

    handle.stop();
}

#[test]
fn test_connection_survives_error_replies() {
    let dir = tempfile::tempdir().unwrap();
    let handle = start_bridge(&dir);

    let mut stream = connect(handle.socket_path());

    // Unknown command: error code back, connection stays usable
    let unknown = Request::Command(Command {
        cmd: CommandCode(0xABCD),
        target: Target::None,
        world: None,
        block: None,
        write: None,
    });
    write_request(&mut stream, &unknown).unwrap();
    assert_eq!(
        read_reply(&mut stream).unwrap(),
        Reply::error(ErrorCode::UnknownCommand)
    );

    write_request(&mut stream, &player_name_request()).unwrap();
    assert_eq!(
        read_reply(&mut stream).unwrap(),
        Reply::Response(Response::Text("Steve".to_string()))
    );

    handle.stop();
}

#[test]
fn test_garbage_payload_gets_error_reply() {
    let dir = tempfile::tempdir().unwrap();
    let handle = start_bridge(&dir);

    let mut stream = connect(handle.socket_path());

    // A well-framed but undecodable payload
    stream.write_all(&4u32.to_le_bytes()).unwrap();
    stream.write_all(&[0xDE, 0xAD, 0xBE, 0xEF]).unwrap();
    assert_eq!(
        read_reply(&mut stream).unwrap(),
        Reply::error(ErrorCode::MalformedRequest)
    );

    handle.stop();
}

// =============================================================================
// Connection Isolation Tests
// =============================================================================

#[test]
fn test_truncated_frame_only_kills_that_connection() {
    let dir = tempfile::tempdir().unwrap();
    let handle = start_bridge(&dir);

    {
        // Declare 500 bytes, send 300, hang up mid-frame
        let mut stream = connect(handle.socket_path());
        stream.write_all(&500u32.to_le_bytes()).unwrap();
        stream.write_all(&[0u8; 300]).unwrap();
    }

    // The worker is back on accept and serves the next client
    let mut stream = connect(handle.socket_path());
    write_request(&mut stream, &player_name_request()).unwrap();
    assert_eq!(
        read_reply(&mut stream).unwrap(),
        Reply::Response(Response::Text("Steve".to_string()))
    );

    handle.stop();
}

#[test]
fn test_second_client_queues_until_first_disconnects() {
    let dir = tempfile::tempdir().unwrap();
    let handle = start_bridge(&dir);

    let mut first = connect(handle.socket_path());
    write_request(&mut first, &player_name_request()).unwrap();
    read_reply(&mut first).unwrap();

    // Second client connects (OS backlog) but is not served yet
    let mut second = connect(handle.socket_path());
    write_request(&mut second, &player_name_request()).unwrap();
    second
        .set_read_timeout(Some(Duration::from_millis(300)))
        .unwrap();
    match read_reply(&mut second) {
        Err(simbridge::BridgeError::Io(e)) => {
            assert!(
                matches!(
                    e.kind(),
                    std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
                ),
                "unexpected kind {:?}",
                e.kind()
            );
        }
        other => panic!("second client should not be served yet, got {:?}", other),
    }

    // First disconnects; the worker picks the second client up
    drop(first);
    second
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    assert_eq!(
        read_reply(&mut second).unwrap(),
        Reply::Response(Response::Text("Steve".to_string()))
    );

    handle.stop();
}

// =============================================================================
// Supervision Tests
// =============================================================================

#[test]
fn test_watchdog_rebinds_when_socket_file_removed() {
    let dir = tempfile::tempdir().unwrap();
    let handle = start_bridge(&dir);
    let path = handle.socket_path().to_path_buf();

    // Keep a client connected across the restart
    let mut held = connect(&path);
    write_request(&mut held, &player_name_request()).unwrap();
    read_reply(&mut held).unwrap();

    std::fs::remove_file(&path).unwrap();
    assert!(
        wait_for(Duration::from_secs(5), || path.exists()),
        "watchdog did not rebind the socket"
    );

    drop(held);
    let mut stream = connect(&path);
    write_request(&mut stream, &player_name_request()).unwrap();
    assert_eq!(
        read_reply(&mut stream).unwrap(),
        Reply::Response(Response::Text("Steve".to_string()))
    );

    handle.stop();
}

#[test]
fn test_stop_removes_socket_file() {
    let dir = tempfile::tempdir().unwrap();
    let handle = start_bridge(&dir);
    let path = handle.socket_path().to_path_buf();

    assert!(wait_for(Duration::from_secs(5), || path.exists()));
    handle.stop();
    assert!(!path.exists(), "socket file should be removed on stop");
}

#[test]
fn test_recovers_when_initial_bind_fails() {
    let dir = tempfile::tempdir().unwrap();
    let parent = dir.path().join("not-yet");
    let socket = parent.join("bridge.sock");

    let config = Config::builder()
        .socket_path(&socket)
        .watchdog_interval(Duration::from_millis(100))
        .build();
    let handle = Bridge::start(config, seeded_provider());

    // Bind cannot succeed, but the bridge must stay up and keep retrying
    thread::sleep(Duration::from_millis(300));
    assert!(handle.is_running());
    assert!(!socket.exists());

    std::fs::create_dir_all(&parent).unwrap();
    assert!(
        wait_for(Duration::from_secs(5), || socket.exists()),
        "watchdog did not recover after bind became possible"
    );

    let mut stream = connect(&socket);
    write_request(&mut stream, &player_name_request()).unwrap();
    assert_eq!(
        read_reply(&mut stream).unwrap(),
        Reply::Response(Response::Text("Steve".to_string()))
    );

    handle.stop();
}
