//! End-to-end tests for string commands, lazy creation, and the
//! existence preconditions.

use crate::helpers::TestServer;

#[tokio::test]
async fn set_get_round_trip() {
    let server = TestServer::start();
    let mut c = server.connect().await;

    c.ok("set foo bar").await;
    assert_eq!(c.cmd("get foo").await, "bar");
}

#[tokio::test]
async fn lazy_create_and_type_lock() {
    let server = TestServer::start();
    let mut c = server.connect().await;

    c.ok("set foo bar").await;
    assert_eq!(c.cmd("get foo").await, "bar");

    // a hash command against a string key is rejected, not a new hash
    let reply = c.cmd("hget foo f").await;
    assert!(reply.starts_with("WRONGTYPE"), "got '{reply}'");
    assert_eq!(c.cmd("get foo").await, "bar");
}

#[tokio::test]
async fn must_exist_guard() {
    let server = TestServer::start();
    let mut c = server.connect().await;

    assert_eq!(c.cmd("lpushx missing x").await, "0");
    // no actor was created
    assert_eq!(c.cmd("exists missing").await, "0");
}

#[tokio::test]
async fn cannot_exist_guard() {
    let server = TestServer::start();
    let mut c = server.connect().await;

    c.ok("set k v1").await;
    assert_eq!(c.cmd("setnx k v2").await, "0");
    assert_eq!(c.cmd("get k").await, "v1");
}

#[tokio::test]
async fn setnx_creates_fresh_keys() {
    let server = TestServer::start();
    let mut c = server.connect().await;

    assert_eq!(c.cmd("setnx k v").await, "1");
    assert_eq!(c.cmd("get k").await, "v");
}

#[tokio::test]
async fn incr_counts_from_empty() {
    let server = TestServer::start();
    let mut c = server.connect().await;

    for expected in 1..=5 {
        assert_eq!(c.cmd("incr counter").await, expected.to_string());
    }
    assert_eq!(c.cmd("get counter").await, "5");
}

#[tokio::test]
async fn incr_on_non_numeric_is_an_error() {
    let server = TestServer::start();
    let mut c = server.connect().await;

    c.ok("set k abc").await;
    let reply = c.cmd("incr k").await;
    assert!(reply.contains("not an integer"), "got '{reply}'");
    assert_eq!(c.cmd("get k").await, "abc");
}

#[tokio::test]
async fn append_getset_strlen() {
    let server = TestServer::start();
    let mut c = server.connect().await;

    c.ok("set k foo").await;
    assert_eq!(c.cmd("append k bar").await, "foobar");
    assert_eq!(c.cmd("strlen k").await, "6");
    assert_eq!(c.cmd("getset k next").await, "foobar");
    assert_eq!(c.cmd("get k").await, "next");
}

#[tokio::test]
async fn unknown_command_and_missing_key() {
    let server = TestServer::start();
    let mut c = server.connect().await;

    assert_eq!(c.cmd("flushall").await, "Unknown command");
    assert_eq!(c.cmd("get").await, "Too few parameters");
}

#[tokio::test]
async fn commands_are_case_insensitive() {
    let server = TestServer::start();
    let mut c = server.connect().await;

    c.ok("SET foo bar").await;
    assert_eq!(c.cmd("GET foo").await, "bar");
}

#[tokio::test]
async fn pipelined_commands_reply_in_order() {
    let server = TestServer::start();
    let mut c = server.connect().await;

    c.send_raw(b"set a 1\nset b 2\nget a\nget b\n").await;
    let replies = c.read_lines(4).await;
    assert_eq!(replies, vec!["OK", "OK", "1", "2"]);
}

#[tokio::test]
async fn data_is_shared_across_connections() {
    let server = TestServer::start();
    let mut first = server.connect().await;
    first.ok("set shared value").await;

    let mut second = server.connect().await;
    assert_eq!(second.cmd("get shared").await, "value");
}
