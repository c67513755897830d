mod common;

use std::sync::Arc;

use common::{FakeLister, LISTING, ROOT_INDEX, webroot};
use rootserve::config::{BindHost, Config};
use rootserve::error::ServeError;
use rootserve::fs::index::{DirectoryIndex, DirectoryLister, ListingBase, TreeLister};
use rootserve::fs::resolver::{ResourceKind, ResourceResolver};

fn index(root: &std::path::Path, lister: Arc<FakeLister>) -> DirectoryIndex {
    DirectoryIndex::new(root, ListingBase::new("localhost", 8080), lister)
}

#[test]
fn test_resolver_classifies_paths() {
    let root = webroot();
    let resolver = ResourceResolver::new(root.path());

    assert_eq!(resolver.resolve("/").kind, ResourceKind::Directory);
    assert_eq!(resolver.resolve("/site1").kind, ResourceKind::Directory);
    assert_eq!(resolver.resolve("/site1/").kind, ResourceKind::Directory);
    assert_eq!(resolver.resolve("/site1/doc1.txt").kind, ResourceKind::File);
    assert_eq!(resolver.resolve("/index.html").kind, ResourceKind::File);
    assert_eq!(resolver.resolve("/nope.txt").kind, ResourceKind::Missing);
}

#[test]
fn test_resolver_parent_segment_is_missing_even_if_target_exists() {
    let root = webroot();
    let resolver = ResourceResolver::new(root.path().join("site1"));

    // ../index.html exists one level up, but is never reachable
    assert_eq!(resolver.resolve("/../index.html").kind, ResourceKind::Missing);
    assert_eq!(resolver.resolve("/..").kind, ResourceKind::Missing);
    assert_eq!(resolver.resolve("/doc1.txt/../doc1.txt").kind, ResourceKind::Missing);
}

#[test]
fn test_resolver_sees_live_filesystem_changes() {
    let root = webroot();
    let resolver = ResourceResolver::new(root.path());

    assert_eq!(resolver.resolve("/late.txt").kind, ResourceKind::Missing);
    std::fs::write(root.path().join("late.txt"), b"now").unwrap();
    assert_eq!(resolver.resolve("/late.txt").kind, ResourceKind::File);
}

#[test]
fn test_index_prefers_index_document() {
    let root = webroot();
    let lister = FakeLister::ok();

    let body = index(root.path(), lister.clone()).load("/").unwrap();

    assert_eq!(body, ROOT_INDEX);
    assert!(lister.calls().is_empty());
}

#[test]
fn test_index_falls_back_to_listing_without_persisting() {
    let root = webroot();
    let lister = FakeLister::ok();

    let body = index(root.path(), lister.clone()).load("/site1").unwrap();

    assert_eq!(body, LISTING);
    let calls = lister.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, root.path().join("site1"));
    assert!(!root.path().join("site1/index.html").exists());
}

#[test]
fn test_index_listing_failure_is_index_generation_error() {
    let root = webroot();

    let result = index(root.path(), FakeLister::failing()).load("/site1/");

    assert!(matches!(result, Err(ServeError::IndexGeneration { .. })));
}

#[test]
fn test_index_unreadable_index_document_falls_back() {
    let root = webroot();
    // a directory named index.html cannot be read as a file
    std::fs::create_dir(root.path().join("site1/index.html")).unwrap();
    let lister = FakeLister::ok();

    let body = index(root.path(), lister.clone()).load("/site1/").unwrap();

    assert_eq!(body, LISTING);
    assert_eq!(lister.calls().len(), 1);
}

#[test]
fn test_listing_base_url_trailing_slash_handling() {
    let root = webroot();
    let lister = FakeLister::ok();
    let idx = index(root.path(), lister.clone());

    idx.load("/site1/").unwrap();
    idx.load("/site1").unwrap();

    let urls: Vec<String> = lister.calls().into_iter().map(|(_, url)| url).collect();
    assert_eq!(urls, vec!["http://localhost:8080/site1", "http://localhost:8080/site1"]);
}

#[test]
fn test_listing_base_url_root_directory_vs_startup_refresh() {
    let base = ListingBase::new("localhost", 8080);

    // Per-directory URLs drop one trailing slash; the startup URL never has a path.
    assert_eq!(base.for_directory("/"), "http://localhost:8080");
    assert_eq!(base.for_directory("/a/b/"), "http://localhost:8080/a/b");
    assert_eq!(base.for_directory("/a/b//"), "http://localhost:8080/a/b/");
    assert_eq!(base.for_root(), "http://localhost:8080");
}

#[test]
fn test_listing_base_port_can_differ_from_bound_port() {
    // Links carry whatever port the base was built with, even if the socket
    // ended up elsewhere.
    let root = webroot();
    let lister = FakeLister::ok();
    let idx = DirectoryIndex::new(root.path(), ListingBase::new("localhost", 9999), lister.clone());

    idx.load("/site1").unwrap();

    assert_eq!(lister.calls()[0].1, "http://localhost:9999/site1");
}

#[test]
fn test_listing_base_from_loopback_config_keeps_host() {
    let cfg = Config {
        host: BindHost::Named("127.0.0.1".to_string()),
        port: 8123,
        ..Config::default()
    };

    let base = ListingBase::from_config(&cfg);

    assert_eq!(base.host(), "127.0.0.1");
    assert_eq!(base.for_root(), "http://127.0.0.1:8123");
}

#[test]
fn test_listing_base_from_wildcard_config_is_an_address() {
    let cfg = Config {
        host: BindHost::All,
        ..Config::default()
    };

    let base = ListingBase::from_config(&cfg);

    assert_ne!(base.host(), "0.0.0.0");
    assert!(base.host().parse::<std::net::IpAddr>().is_ok());
}

#[test]
fn test_refresh_root_overwrites_root_index() {
    let root = webroot();
    let lister = FakeLister::ok();

    index(root.path(), lister.clone()).refresh_root().unwrap();

    assert_eq!(std::fs::read(root.path().join("index.html")).unwrap(), LISTING);
    let calls = lister.calls();
    assert_eq!(calls[0].0, root.path());
    assert_eq!(calls[0].1, "http://localhost:8080");
}

#[test]
fn test_refresh_root_failure_leaves_index_untouched() {
    let root = webroot();

    let result = index(root.path(), FakeLister::failing()).refresh_root();

    assert!(result.is_err());
    assert_eq!(std::fs::read(root.path().join("index.html")).unwrap(), ROOT_INDEX);
}

#[test]
fn test_tree_lister_missing_program_is_an_error() {
    let root = webroot();
    let lister = TreeLister::with_program("rootserve-no-such-tree");

    assert!(lister.list(root.path(), "http://localhost:8080").is_err());
}
