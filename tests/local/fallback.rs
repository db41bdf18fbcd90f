use crate::{downloader, init_logging, is_empty_dir, pattern, TestServer};
use rangefetch::{ConfigBuilder, Downloader, Error, FetchError, Result, Strategy};
use reqwest::StatusCode;
use std::time::Duration;

const IDLE: Duration = Duration::from_secs(10);

#[tokio::test]
async fn no_range_support() -> Result<()> {
    init_logging();
    let data = pattern(5000);
    let server = TestServer::start(data.clone());
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.bin");
    let transfer = downloader(&server.url("plain"), 8, IDLE, &out)
        .download()
        .await?;
    assert_eq!(transfer.strategy, Strategy::Single);
    assert_eq!(transfer.bytes, 5000);
    assert_eq!(std::fs::read(&out).unwrap(), data);
    assert_eq!(server.ranged_gets(), 0);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    Ok(())
}

#[tokio::test]
async fn unknown_length() -> Result<()> {
    init_logging();
    let data = pattern(3000);
    let server = TestServer::start(data.clone());
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.bin");
    let transfer = downloader(&server.url("nolength"), 4, IDLE, &out)
        .download()
        .await?;
    assert_eq!(transfer.strategy, Strategy::Single);
    assert_eq!(std::fs::read(&out).unwrap(), data);
    assert_eq!(server.ranged_gets(), 0);
    Ok(())
}

#[tokio::test]
async fn shorter_than_worker_count() -> Result<()> {
    init_logging();
    let data = pattern(3);
    let server = TestServer::start(data.clone());
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.bin");
    let transfer = downloader(&server.url("ranged"), 8, IDLE, &out)
        .download()
        .await?;
    assert_eq!(transfer.strategy, Strategy::Single);
    assert_eq!(std::fs::read(&out).unwrap(), data);
    assert_eq!(server.ranged_gets(), 0);
    Ok(())
}

#[tokio::test]
async fn filename_derived_from_url() -> Result<()> {
    init_logging();
    let data = pattern(100);
    let server = TestServer::start(data.clone());
    let dir = tempfile::tempdir().unwrap();
    let config = ConfigBuilder::default().workers(2).build()?;
    let mut dl = Downloader::new(&server.url("ranged"), config)?;
    dl.output(dir.path());
    let transfer = dl.download().await?;
    assert_eq!(transfer.path, dir.path().join("file.bin"));
    assert_eq!(std::fs::read(&transfer.path).unwrap(), data);
    Ok(())
}

#[tokio::test]
async fn truncated_single_stream_detected() {
    init_logging();
    let server = TestServer::start(pattern(1000));
    let dir = tempfile::tempdir().unwrap();
    let res = downloader(&server.url("cut"), 4, IDLE, &dir.path().join("out.bin"))
        .download()
        .await;
    assert!(
        matches!(
            res,
            Err(Error::SingleFetch(FetchError::Length {
                expected: 1000,
                received: 400
            }))
        ),
        "{:?}",
        res
    );
    assert!(is_empty_dir(dir.path()));
}

#[tokio::test]
async fn missing_resource() {
    init_logging();
    let server = TestServer::start(pattern(100));
    let dir = tempfile::tempdir().unwrap();
    let res = downloader(&server.url("missing"), 4, IDLE, &dir.path().join("out.bin"))
        .download()
        .await;
    match res {
        Err(Error::SingleFetch(FetchError::Status(code))) => {
            assert_eq!(code, StatusCode::NOT_FOUND)
        }
        other => panic!("unexpected result {:?}", other),
    }
    assert!(is_empty_dir(dir.path()));
}
