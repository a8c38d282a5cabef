//! Integration tests for single downloads and refresh batches against a local HTTP server.

mod common;

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use common::file_server::FileServer;
use msync_core::downloader::{CurlOptions, Downloader};
use msync_core::error::{DownloadError, ManifestFetchError};
use msync_core::local_dir::LocalDirectory;
use msync_core::manifest::FileManifest;
use msync_core::synchronizer::Synchronizer;
use msync_core::url_model::{FileName, RemoteLocation};
use tempfile::tempdir;

fn location(url: &str) -> RemoteLocation {
    RemoteLocation::parse(url).unwrap()
}

fn downloader(dir: &Path) -> Downloader {
    Downloader::new(LocalDirectory::new(dir), CurlOptions::default())
}

fn synchronizer(dir: &Path) -> Synchronizer {
    // The manifest is not consulted by refresh_files.
    Synchronizer::new(Box::new(FileManifest::new(dir.join("unused"))), downloader(dir))
}

fn dir_names(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect()
}

#[test]
fn download_writes_exactly_one_file_with_body() {
    let server = FileServer::start();
    let url = server.serve("/file.txt", "content");
    let dest = tempdir().unwrap();
    let dest_path = dest.path().join("downloads");

    let name = downloader(&dest_path).download(&location(&url)).unwrap();

    assert_eq!(name, FileName::new("file.txt"));
    assert_eq!(dir_names(&dest_path), BTreeSet::from(["file.txt".to_string()]));
    assert_eq!(fs::read(dest_path.join("file.txt")).unwrap(), b"content");
}

#[test]
fn download_overwrites_existing_file() {
    let server = FileServer::start();
    let url = server.serve("/data/report.csv", "new");
    let dest = tempdir().unwrap();
    fs::write(dest.path().join("report.csv"), "old and much longer").unwrap();

    downloader(dest.path()).download(&location(&url)).unwrap();

    assert_eq!(fs::read(dest.path().join("report.csv")).unwrap(), b"new");
}

#[test]
fn download_empty_body_creates_empty_file() {
    let server = FileServer::start();
    let url = server.serve("/empty.bin", Vec::new());
    let dest = tempdir().unwrap();

    downloader(dest.path()).download(&location(&url)).unwrap();

    assert_eq!(fs::read(dest.path().join("empty.bin")).unwrap(), b"");
}

#[test]
fn http_error_fails_and_keeps_existing_file() {
    let server = FileServer::start();
    let url = server.url("/gone.txt");
    let dest = tempdir().unwrap();
    fs::write(dest.path().join("gone.txt"), "previous").unwrap();

    let err = downloader(dest.path()).download(&location(&url)).unwrap_err();

    assert!(matches!(err, DownloadError::Http(404)), "got {:?}", err);
    assert_eq!(fs::read(dest.path().join("gone.txt")).unwrap(), b"previous");
}

#[test]
fn server_error_status_is_reported() {
    let server = FileServer::start();
    let url = server.serve_status("/busy.txt", 503, "try later");
    let dest = tempdir().unwrap();

    let err = downloader(dest.path()).download(&location(&url)).unwrap_err();

    assert!(matches!(err, DownloadError::Http(503)), "got {:?}", err);
    assert!(!dest.path().join("busy.txt").exists());
}

#[test]
fn connection_refused_is_transfer_error() {
    let dest = tempdir().unwrap();
    let err = downloader(dest.path())
        .download(&location("http://127.0.0.1:1/file.txt"))
        .unwrap_err();
    assert!(matches!(err, DownloadError::Transfer(_)), "got {:?}", err);
}

#[test]
fn slow_server_hits_deadline() {
    let server = FileServer::start();
    let url = server.serve("/slow.bin", "late");
    server.set_delay(Duration::from_secs(3));
    let dest = tempdir().unwrap();
    let curl = CurlOptions {
        timeout: Duration::from_secs(1),
        ..CurlOptions::default()
    };

    let err = Downloader::new(LocalDirectory::new(dest.path()), curl)
        .download(&location(&url))
        .unwrap_err();

    assert!(err.is_timeout(), "expected timeout, got {:?}", err);
}

#[test]
fn refresh_downloads_all_locations() {
    let server = FileServer::start();
    let urls = vec![
        server.serve("/file1.txt", "content"),
        server.serve("/file2.txt", "content2"),
        server.serve("/file3.txt", "content3"),
    ];
    let dest = tempdir().unwrap();
    let locations: Vec<_> = urls.iter().map(|u| location(u)).collect();

    let report = synchronizer(dest.path()).refresh_files(&locations).unwrap();

    assert_eq!(report.downloaded.len(), 3);
    assert_eq!(
        dir_names(dest.path()),
        BTreeSet::from([
            "file1.txt".to_string(),
            "file2.txt".to_string(),
            "file3.txt".to_string()
        ])
    );
    assert_eq!(fs::read(dest.path().join("file1.txt")).unwrap(), b"content");
    assert_eq!(fs::read(dest.path().join("file2.txt")).unwrap(), b"content2");
    assert_eq!(fs::read(dest.path().join("file3.txt")).unwrap(), b"content3");
}

#[test]
fn refresh_keeps_at_most_three_fetches_in_flight() {
    let server = FileServer::start();
    server.set_delay(Duration::from_millis(150));
    let locations: Vec<_> = (0..9)
        .map(|i| location(&server.serve(&format!("/part{}.bin", i), format!("body {}", i))))
        .collect();
    let dest = tempdir().unwrap();

    synchronizer(dest.path()).refresh_files(&locations).unwrap();

    assert_eq!(server.request_count(), 9);
    let peak = server.peak_in_flight();
    assert!(peak <= 3, "saw {} concurrent requests", peak);
    assert!(peak >= 2, "downloads did not overlap (peak {})", peak);
    assert_eq!(dir_names(dest.path()).len(), 9);
}

#[test]
fn configured_limit_of_one_serializes_fetches() {
    let server = FileServer::start();
    server.set_delay(Duration::from_millis(50));
    let locations: Vec<_> = (0..4)
        .map(|i| location(&server.serve(&format!("/s{}.bin", i), "x")))
        .collect();
    let dest = tempdir().unwrap();

    synchronizer(dest.path())
        .with_max_concurrent(1)
        .refresh_files(&locations)
        .unwrap();

    assert_eq!(server.peak_in_flight(), 1);
}

#[test]
fn one_failure_does_not_stop_the_batch() {
    let server = FileServer::start();
    let ok1 = server.serve("/ok1.txt", "one");
    let missing = server.url("/missing.txt");
    let ok2 = server.serve("/ok2.txt", "two");
    let dest = tempdir().unwrap();
    let locations = vec![location(&ok1), location(&missing), location(&ok2)];

    let err = synchronizer(dest.path()).refresh_files(&locations).unwrap_err();

    assert_eq!(err.failures.len(), 1);
    assert_eq!(err.failures[0].location.as_str(), missing);
    assert!(matches!(err.failures[0].error, DownloadError::Http(404)));
    assert_eq!(err.succeeded.len(), 2);
    assert_eq!(
        dir_names(dest.path()),
        BTreeSet::from(["ok1.txt".to_string(), "ok2.txt".to_string()])
    );
}

#[test]
fn http_manifest_error_status() {
    use msync_core::manifest::{HttpManifest, ManifestSource};

    let server = FileServer::start();
    let source = HttpManifest::new(server.url("/manifest.txt"), CurlOptions::default());
    assert!(matches!(source.fetch(), Err(ManifestFetchError::Http(404))));

    server.serve("/manifest.txt", "http://example.com/a.txt\n");
    let locations = source.fetch().unwrap();
    assert_eq!(locations.len(), 1);
    assert_eq!(locations[0].as_str(), "http://example.com/a.txt");
}
