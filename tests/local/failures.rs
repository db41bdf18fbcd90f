use crate::{downloader, init_logging, is_empty_dir, pattern, silent_server, TestServer};
use rangefetch::{Error, FetchError};
use reqwest::StatusCode;
use std::time::Duration;

#[tokio::test]
async fn failed_segment_leaves_nothing() {
    init_logging();
    let server = TestServer::start(pattern(4000));
    let dir = tempfile::tempdir().unwrap();
    let res = downloader(&server.url("fail"), 4, Duration::from_secs(10), &dir.path().join("out.bin"))
        .download()
        .await;
    match res {
        Err(Error::SegmentFetch {
            index,
            source: FetchError::Status(code),
        }) => {
            assert!(index > 0);
            assert_eq!(code, StatusCode::INTERNAL_SERVER_ERROR);
        }
        other => panic!("unexpected result {:?}", other),
    }
    assert!(is_empty_dir(dir.path()));
}

#[tokio::test]
async fn truncated_segment_detected() {
    init_logging();
    let server = TestServer::start(pattern(4000));
    let dir = tempfile::tempdir().unwrap();
    let res = downloader(&server.url("short"), 4, Duration::from_secs(10), &dir.path().join("out.bin"))
        .download()
        .await;
    assert!(
        matches!(
            res,
            Err(Error::SegmentFetch {
                source: FetchError::Length {
                    expected: 1000,
                    received: 500
                },
                ..
            })
        ),
        "{:?}",
        res
    );
    assert!(is_empty_dir(dir.path()));
}

#[tokio::test]
async fn ignored_range_detected() {
    init_logging();
    let server = TestServer::start(pattern(4000));
    let dir = tempfile::tempdir().unwrap();
    let res = downloader(&server.url("ignore"), 4, Duration::from_secs(10), &dir.path().join("out.bin"))
        .download()
        .await;
    match res {
        Err(Error::SegmentFetch {
            source: FetchError::Status(code),
            ..
        }) => assert_eq!(code, StatusCode::OK),
        other => panic!("unexpected result {:?}", other),
    }
    assert!(is_empty_dir(dir.path()));
}

#[tokio::test]
async fn stalled_segment_times_out() {
    init_logging();
    let server = TestServer::start(pattern(4000));
    let dir = tempfile::tempdir().unwrap();
    let dl = downloader(&server.url("hang"), 2, Duration::from_millis(300), &dir.path().join("out.bin"));
    let res = tokio::time::timeout(Duration::from_secs(10), dl.download())
        .await
        .expect("idle timeout didn't fire");
    assert!(
        matches!(
            res,
            Err(Error::SegmentFetch {
                source: FetchError::Timeout(_),
                ..
            })
        ),
        "{:?}",
        res
    );
    assert!(is_empty_dir(dir.path()));
}

#[tokio::test]
async fn failure_cancels_siblings() {
    init_logging();
    let server = TestServer::start(pattern(4000));
    let dir = tempfile::tempdir().unwrap();
    // siblings hang far longer than the test is willing to wait
    let dl = downloader(&server.url("stall"), 4, Duration::from_secs(120), &dir.path().join("out.bin"));
    let res = tokio::time::timeout(Duration::from_secs(10), dl.download())
        .await
        .expect("siblings weren't cancelled");
    assert!(
        matches!(res, Err(Error::SegmentFetch { index: 0, .. })),
        "{:?}",
        res
    );
    assert!(is_empty_dir(dir.path()));
}

#[tokio::test]
async fn unreachable_host() {
    init_logging();
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let dir = tempfile::tempdir().unwrap();
    let url = format!("http://{}/file.bin", addr);
    let res = downloader(&url, 4, Duration::from_secs(10), &dir.path().join("out.bin"))
        .download()
        .await;
    assert!(matches!(res, Err(Error::Probe(_))), "{:?}", res);
    assert!(is_empty_dir(dir.path()));
}

#[tokio::test]
async fn silent_server_times_out_probe() {
    init_logging();
    let url = silent_server().await;
    let dir = tempfile::tempdir().unwrap();
    let dl = downloader(&url, 4, Duration::from_millis(300), &dir.path().join("out.bin"));
    let res = tokio::time::timeout(Duration::from_secs(5), dl.download())
        .await
        .expect("probe wasn't bounded by the idle timeout");
    assert!(
        matches!(res, Err(Error::Probe(FetchError::Timeout(_)))),
        "{:?}",
        res
    );
    assert!(is_empty_dir(dir.path()));
}
