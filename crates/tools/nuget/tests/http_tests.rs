//! Feed reader and downloader tests against a local HTTP server.

use std::io::{self, BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::Path;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tempfile::TempDir;
use toolfeed_core::{Downloader, FeedReader};
use toolfeed_nuget::{Error, HttpDownloader, NuGetFeedReader};

const TIMEOUT: Duration = Duration::from_secs(5);

/// A server that answers exactly one request with a canned response.
struct OneShotServer {
    url: String,
    requests: mpsc::Receiver<String>,
    handle: JoinHandle<()>,
}

impl OneShotServer {
    fn start(status: &'static str, body: &'static [u8]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let (tx, requests) = mpsc::channel();

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).unwrap();
                if header == "\r\n" || header.is_empty() {
                    break;
                }
            }
            tx.send(request_line.trim_end().to_string()).unwrap();

            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            )
            .unwrap();
            stream.write_all(body).unwrap();
            stream.flush().unwrap();
        });

        Self {
            url,
            requests,
            handle,
        }
    }

    /// Wait for the server to finish and return the request line it saw.
    fn finish(self) -> String {
        self.handle.join().unwrap();
        self.requests.recv().unwrap()
    }
}

#[test]
fn test_query_lists_versions_in_feed_order() {
    let server = OneShotServer::start(
        "200 OK",
        br#"{"versions": ["1.0.0", "1.0.1-beta", "1.0.2"]}"#,
    );
    let reader = NuGetFeedReader::new(TIMEOUT).unwrap();

    let entries = reader
        .query_package_versions(&server.url, "TeamCity.Dotnet.Integration")
        .unwrap();
    let feed_url = server.url.clone();
    let request = server.finish();

    assert_eq!(
        request,
        "GET /teamcity.dotnet.integration/index.json HTTP/1.1"
    );
    let versions: Vec<_> = entries.iter().map(|e| e.package_version.as_str()).collect();
    assert_eq!(versions, ["1.0.0", "1.0.1-beta", "1.0.2"]);
    assert_eq!(
        entries[2].download_url,
        format!(
            "{feed_url}/teamcity.dotnet.integration/1.0.2/teamcity.dotnet.integration.1.0.2.nupkg"
        )
    );
}

#[test]
fn test_unknown_package_is_empty() {
    let server = OneShotServer::start("404 Not Found", b"");
    let reader = NuGetFeedReader::new(TIMEOUT).unwrap();

    let entries = reader.query(&server.url, "Missing.Package").unwrap();
    server.finish();

    assert!(entries.is_empty());
}

#[test]
fn test_server_error_fails_query() {
    let server = OneShotServer::start("500 Internal Server Error", b"boom");
    let reader = NuGetFeedReader::new(TIMEOUT).unwrap();

    let err = reader.query(&server.url, "Pkg").unwrap_err();
    server.finish();

    assert!(matches!(err, Error::UnexpectedStatus { status: 500, .. }));
}

#[test]
fn test_malformed_index_is_invalid_data() {
    let server = OneShotServer::start("200 OK", b"<html>not json</html>");
    let reader = NuGetFeedReader::new(TIMEOUT).unwrap();

    let err = reader.query_package_versions(&server.url, "Pkg").unwrap_err();
    server.finish();

    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
}

#[test]
fn test_unreachable_feed_fails() {
    // Bind then drop to get a port nothing listens on.
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let reader = NuGetFeedReader::new(TIMEOUT).unwrap();

    let result = reader.query(&format!("http://127.0.0.1:{port}"), "Pkg");
    assert!(matches!(result, Err(Error::Http { .. })));
}

#[test]
fn test_download_writes_file() {
    let server = OneShotServer::start("200 OK", b"PK-package-bytes");
    let temp = TempDir::new().unwrap();
    let destination = temp.path().join("cache/Pkg.1.0.0.nupkg");
    let downloader = HttpDownloader::new(TIMEOUT).unwrap();

    let url = format!("{}/pkg/1.0.0/pkg.1.0.0.nupkg", server.url);
    let bytes = downloader.download_to(&url, &destination).unwrap();
    let request = server.finish();

    assert_eq!(request, "GET /pkg/1.0.0/pkg.1.0.0.nupkg HTTP/1.1");
    assert_eq!(bytes, 16);
    assert_eq!(std::fs::read(&destination).unwrap(), b"PK-package-bytes");
    assert_eq!(only_entry(destination.parent().unwrap()), "Pkg.1.0.0.nupkg");
}

#[test]
fn test_failed_download_leaves_nothing() {
    let server = OneShotServer::start("404 Not Found", b"missing");
    let temp = TempDir::new().unwrap();
    let destination = temp.path().join("Pkg.9.9.9.nupkg");
    let downloader = HttpDownloader::new(TIMEOUT).unwrap();

    let err = downloader
        .download(&format!("{}/pkg.nupkg", server.url), &destination)
        .unwrap_err();
    server.finish();

    assert_eq!(err.kind(), io::ErrorKind::Other);
    assert!(err.to_string().contains("404"));
    assert!(!destination.exists());
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
}

fn only_entry(dir: &Path) -> String {
    let entries: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries.len(), 1, "unexpected entries: {entries:?}");
    entries.into_iter().next().unwrap()
}
