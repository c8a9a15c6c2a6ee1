//! End-to-end POP3 client scenarios against a scripted server

mod support;

use pop3_client::{Pop3Client, RetrievedMessage, SessionError};
use support::ScriptedServer;

#[tokio::test]
async fn test_open_connects_and_logs_in() {
    let (config, server) = ScriptedServer::new("+OK POP3 ready")
        .expect("USER alice", "+OK send password")
        .expect("PASS secret", "+OK logged in")
        .spawn()
        .await;

    let mut client = Pop3Client::open(config, "alice", "secret").await.unwrap();
    assert!(client.is_connected());
    assert!(client.is_authenticated());

    client.disconnect().await;
    server.await.unwrap();
}

#[tokio::test]
async fn test_login_failure_reports_server_reason() {
    let (config, server) = ScriptedServer::new("+OK POP3 ready")
        .expect("USER alice", "+OK send password")
        .expect("PASS wrong", "-ERR invalid credentials")
        .spawn()
        .await;

    let mut client = Pop3Client::new(config);
    client.connect().await.unwrap();

    let err = client.login("alice", "wrong").await.unwrap_err();
    match err {
        SessionError::UnexpectedResponse { response } => {
            assert_eq!(response, "invalid credentials");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(client.is_connected());
    assert!(!client.is_authenticated());

    client.disconnect().await;
    server.await.unwrap();
}

#[tokio::test]
async fn test_rejected_user_stops_the_exchange() {
    // The script ends after USER; a stray PASS would hang the client
    let (config, server) = ScriptedServer::new("+OK POP3 ready")
        .expect("USER nobody", "-ERR unknown user")
        .spawn()
        .await;

    let mut client = Pop3Client::new(config);
    client.connect().await.unwrap();

    let err = client.login("nobody", "whatever").await.unwrap_err();
    assert!(matches!(err, SessionError::UnexpectedResponse { .. }));
    assert!(!client.is_authenticated());

    client.disconnect().await;
    server.await.unwrap();
}

#[tokio::test]
async fn test_message_count() {
    let (config, server) = ScriptedServer::new("+OK POP3 ready")
        .expect("USER alice", "+OK")
        .expect("PASS secret", "+OK")
        .expect("STAT", "+OK 3 1024")
        .spawn()
        .await;

    let mut client = Pop3Client::open(config, "alice", "secret").await.unwrap();
    assert_eq!(client.message_count().await.unwrap(), 3);

    client.disconnect().await;
    server.await.unwrap();
}

#[tokio::test]
async fn test_message_count_degrades_on_odd_stat() {
    let (config, server) = ScriptedServer::new("+OK POP3 ready")
        .expect("USER alice", "+OK")
        .expect("PASS secret", "+OK")
        .expect("STAT", "+OK much mail")
        .spawn()
        .await;

    let mut client = Pop3Client::open(config, "alice", "secret").await.unwrap();
    assert_eq!(client.message_count().await.unwrap(), 0);

    client.disconnect().await;
    server.await.unwrap();
}

#[tokio::test]
async fn test_message_count_requires_authentication() {
    let (config, server) = ScriptedServer::new("+OK POP3 ready").spawn().await;

    let mut client = Pop3Client::new(config);
    client.connect().await.unwrap();

    let err = client.message_count().await.unwrap_err();
    assert!(matches!(err, SessionError::NotAuthenticated));
    assert!(err.is_state_error());

    client.disconnect().await;
    server.await.unwrap();
}

#[tokio::test]
async fn test_retrieve_sized_message() {
    let body = b"From: a@example.com\r\n\r\nhi\r\n";
    let mut reply = format!("+OK {} octets\r\n", body.len()).into_bytes();
    reply.extend_from_slice(body);
    reply.extend_from_slice(b".\r\n");

    let (config, server) = ScriptedServer::new("+OK POP3 ready")
        .expect("USER alice", "+OK")
        .expect("PASS secret", "+OK")
        .expect_raw("RETR 1", &reply)
        .spawn()
        .await;

    let mut client = Pop3Client::open(config, "alice", "secret").await.unwrap();
    let message = client.get_message(0, false).await.unwrap();

    assert_eq!(message.bytes(), body);
    assert_eq!(message.uid(), "1");
    assert!(client.warnings().is_empty());

    client.disconnect().await;
    server.await.unwrap();
}

#[tokio::test]
async fn test_retrieve_unsized_message() {
    let (config, server) = ScriptedServer::new("+OK POP3 ready")
        .expect("USER alice", "+OK")
        .expect("PASS secret", "+OK")
        .expect_raw(
            "RETR 2",
            b"+OK message follows\r\nline one\r\nline two\r\n.\r\n",
        )
        .spawn()
        .await;

    let mut client = Pop3Client::open(config, "alice", "secret").await.unwrap();
    let message = client.get_message(1, false).await.unwrap();

    assert_eq!(message.bytes(), b"line one\r\nline two\r\n");
    assert!(client.warnings().is_empty());

    client.disconnect().await;
    server.await.unwrap();
}

#[tokio::test]
async fn test_retrieve_empty_message_with_zero_octets() {
    let (config, server) = ScriptedServer::new("+OK POP3 ready")
        .expect("USER alice", "+OK")
        .expect("PASS secret", "+OK")
        .expect_raw("RETR 1", b"+OK 0 octets\r\n.\r\n")
        .spawn()
        .await;

    let mut client = Pop3Client::open(config, "alice", "secret").await.unwrap();
    let message = client.get_message(0, false).await.unwrap();

    assert!(message.is_empty());
    assert!(client.warnings().is_empty());

    client.disconnect().await;
    server.await.unwrap();
}

#[tokio::test]
async fn test_size_hint_excluding_final_crlf_is_tolerated() {
    // Servers that count octets without the trailing CRLF leave a blank
    // line before the terminator; no warning should result
    let (config, server) = ScriptedServer::new("+OK POP3 ready")
        .expect("USER alice", "+OK")
        .expect("PASS secret", "+OK")
        .expect_raw("RETR 1", b"+OK 4 octets\r\nabcd\r\n.\r\n")
        .spawn()
        .await;

    let mut client = Pop3Client::open(config, "alice", "secret").await.unwrap();
    let message = client.get_message(0, false).await.unwrap();

    assert_eq!(message.bytes(), b"abcd");
    assert!(client.warnings().is_empty());

    client.disconnect().await;
    server.await.unwrap();
}

#[tokio::test]
async fn test_missing_terminator_warns_but_delivers() {
    let (config, server) = ScriptedServer::new("+OK POP3 ready")
        .expect("USER alice", "+OK")
        .expect("PASS secret", "+OK")
        .expect_raw("RETR 3", b"+OK 4 octets\r\nabcdX\r\n")
        .spawn()
        .await;

    let mut client = Pop3Client::open(config, "alice", "secret").await.unwrap();
    let message = client.get_message(2, false).await.unwrap();

    // The payload still came through
    assert_eq!(message.bytes(), b"abcd");

    let warnings = client.take_warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].uid(), "3");
    assert_eq!(warnings[0].received(), "X");
    assert_eq!(
        warnings[0].to_string(),
        "Expected \".\" in stream, but received \"X\""
    );
    assert!(client.warnings().is_empty());

    client.disconnect().await;
    server.await.unwrap();
}

#[tokio::test]
async fn test_headers_only_uses_top() {
    let (config, server) = ScriptedServer::new("+OK POP3 ready")
        .expect("USER alice", "+OK")
        .expect("PASS secret", "+OK")
        .expect_raw("TOP 1 0", b"+OK headers follow\r\nSubject: x\r\n\r\n.\r\n")
        .spawn()
        .await;

    let mut client = Pop3Client::open(config, "alice", "secret").await.unwrap();
    let message = client.get_message(0, true).await.unwrap();

    assert_eq!(message.bytes(), b"Subject: x\r\n\r\n");

    client.disconnect().await;
    server.await.unwrap();
}

#[tokio::test]
async fn test_delete_converts_index_to_number() {
    let (config, server) = ScriptedServer::new("+OK POP3 ready")
        .expect("USER alice", "+OK")
        .expect("PASS secret", "+OK")
        .expect("DELE 1", "+OK marked for deletion")
        .spawn()
        .await;

    let mut client = Pop3Client::open(config, "alice", "secret").await.unwrap();
    client.delete_message(0).await.unwrap();

    client.disconnect().await;
    server.await.unwrap();
}

#[tokio::test]
async fn test_delete_for_retrieved_message() {
    let (config, server) = ScriptedServer::new("+OK POP3 ready")
        .expect("USER alice", "+OK")
        .expect("PASS secret", "+OK")
        .expect_raw("RETR 2", b"+OK here it is\r\nbody\r\n.\r\n")
        .expect("DELE 2", "+OK marked for deletion")
        .spawn()
        .await;

    let mut client = Pop3Client::open(config, "alice", "secret").await.unwrap();
    let message = client.get_message(1, false).await.unwrap();
    client.delete_message_for(&message).await.unwrap();

    client.disconnect().await;
    server.await.unwrap();
}

#[tokio::test]
async fn test_delete_is_not_auth_guarded() {
    // DELE goes to the wire even without login; the server's refusal
    // surfaces as a protocol error, not a state error
    let (config, server) = ScriptedServer::new("+OK POP3 ready")
        .expect("DELE 1", "-ERR not authorized")
        .spawn()
        .await;

    let mut client = Pop3Client::new(config);
    client.connect().await.unwrap();

    let err = client.delete_message(0).await.unwrap_err();
    match err {
        SessionError::UnexpectedResponse { response } => {
            assert_eq!(response, "not authorized");
        }
        other => panic!("unexpected error: {:?}", other),
    }

    client.disconnect().await;
    server.await.unwrap();
}

#[tokio::test]
async fn test_delete_failure_reports_reason() {
    let (config, server) = ScriptedServer::new("+OK POP3 ready")
        .expect("USER alice", "+OK")
        .expect("PASS secret", "+OK")
        .expect("DELE 9", "-ERR no such message")
        .spawn()
        .await;

    let mut client = Pop3Client::open(config, "alice", "secret").await.unwrap();
    let err = client.delete_message_by_uid("9").await.unwrap_err();
    match err {
        SessionError::UnexpectedResponse { response } => {
            assert_eq!(response, "no such message");
        }
        other => panic!("unexpected error: {:?}", other),
    }

    client.disconnect().await;
    server.await.unwrap();
}

#[tokio::test]
async fn test_retrieval_requires_authentication() {
    let (config, server) = ScriptedServer::new("+OK POP3 ready").spawn().await;

    let mut client = Pop3Client::new(config);
    client.connect().await.unwrap();

    let err = client.get_message(0, false).await.unwrap_err();
    assert!(matches!(err, SessionError::NotAuthenticated));

    client.disconnect().await;
    server.await.unwrap();
}

#[tokio::test]
async fn test_retrieval_failure_reports_reason() {
    let (config, server) = ScriptedServer::new("+OK POP3 ready")
        .expect("USER alice", "+OK")
        .expect("PASS secret", "+OK")
        .expect("RETR 42", "-ERR no such message")
        .spawn()
        .await;

    let mut client = Pop3Client::open(config, "alice", "secret").await.unwrap();
    let err = client.get_message_by_uid("42", false).await.unwrap_err();
    match err {
        SessionError::UnexpectedResponse { response } => {
            assert_eq!(response, "no such message");
        }
        other => panic!("unexpected error: {:?}", other),
    }

    client.disconnect().await;
    server.await.unwrap();
}
