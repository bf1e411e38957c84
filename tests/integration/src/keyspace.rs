//! End-to-end tests for the key directory and the client-owned
//! multi-key commands.

use std::collections::HashSet;

use crate::helpers::TestServer;

#[tokio::test]
async fn keys_and_exists_track_live_actors() {
    let server = TestServer::start();
    let mut c = server.connect().await;

    c.ok("set a 1").await;
    c.cmd("sadd b x").await;

    let keys: HashSet<String> = c.cmd_lines("keys", 2).await.into_iter().collect();
    assert_eq!(keys, HashSet::from(["a".to_owned(), "b".to_owned()]));

    assert_eq!(c.cmd("exists a").await, "1");
    assert_eq!(c.cmd("exists a b").await, "1");
    assert_eq!(c.cmd("exists a ghost").await, "0");
}

#[tokio::test]
async fn del_frees_the_key_for_recreation() {
    let server = TestServer::start();
    let mut c = server.connect().await;

    c.ok("set k v").await;
    assert_eq!(c.cmd("del k").await, "1");
    assert_eq!(c.cmd("exists k").await, "0");
    assert_eq!(c.cmd("del k").await, "0");

    // create-on-write succeeds with fresh zero state, any type
    assert_eq!(c.cmd("sadd k m").await, "1");
    assert_eq!(c.cmd("scard k").await, "1");
}

#[tokio::test]
async fn del_counts_present_keys_only() {
    let server = TestServer::start();
    let mut c = server.connect().await;

    c.ok("set a 1").await;
    c.ok("set b 2").await;
    assert_eq!(c.cmd("del a b ghost").await, "2");
}

#[tokio::test]
async fn randomkey() {
    let server = TestServer::start();
    let mut c = server.connect().await;

    assert_eq!(c.cmd("randomkey").await, "None");
    c.ok("set only v").await;
    assert_eq!(c.cmd("randomkey").await, "only");
}

#[tokio::test]
async fn scan_with_glob_over_keys() {
    let server = TestServer::start();
    let mut c = server.connect().await;

    for key in ["foo1", "foo2", "bar"] {
        c.ok(&format!("set {key} v")).await;
    }

    let mut page = c.cmd_lines("scan 0 foo* 10", 3).await;
    assert_eq!(page.remove(0), "0");
    page.sort();
    assert_eq!(page, vec!["foo1", "foo2"]);
}

#[tokio::test]
async fn scan_cursor_walks_every_key_once() {
    let server = TestServer::start();
    let mut c = server.connect().await;

    for i in 0..5 {
        c.ok(&format!("set key{i} v")).await;
    }

    let mut seen: Vec<String> = Vec::new();
    let mut cursor = 0usize;
    loop {
        // each page is the next cursor followed by up to two keys
        let next: usize = c.cmd(&format!("scan {cursor} * 2")).await.parse().unwrap();
        let expected = if next == 0 { 5 - seen.len() } else { 2 };
        seen.extend(c.read_lines(expected).await);
        if next == 0 {
            break;
        }
        cursor = next;
    }
    seen.sort();
    assert_eq!(seen, vec!["key0", "key1", "key2", "key3", "key4"]);
}

#[tokio::test]
async fn mget_collects_values_in_order() {
    let server = TestServer::start();
    let mut c = server.connect().await;

    c.ok("set a 1").await;
    c.ok("set c 3").await;

    let values = c.cmd_lines("mget a b c", 3).await;
    assert_eq!(values, vec!["1", "None", "3"]);
    // the missing key was not created by the read
    assert_eq!(c.cmd("exists b").await, "0");
}

#[tokio::test]
async fn mset_writes_all_pairs() {
    let server = TestServer::start();
    let mut c = server.connect().await;

    c.ok("mset a 1 b 2 c 3").await;
    let values = c.cmd_lines("mget a b c", 3).await;
    assert_eq!(values, vec!["1", "2", "3"]);
}

#[tokio::test]
async fn msetnx_refuses_when_any_key_exists() {
    let server = TestServer::start();
    let mut c = server.connect().await;

    c.ok("set a taken").await;
    assert_eq!(c.cmd("msetnx a 1 b 2").await, "0");
    assert_eq!(c.cmd("exists b").await, "0");

    assert_eq!(c.cmd("msetnx x 1 y 2").await, "1");
    let values = c.cmd_lines("mget x y", 2).await;
    assert_eq!(values, vec!["1", "2"]);
}
