use crate::{downloader, init_logging, pattern, TestServer};
use rangefetch::{Error, Hash, Result, Strategy};
use sha2::{Digest, Sha256};
use std::time::Duration;

const IDLE: Duration = Duration::from_secs(10);

#[tokio::test]
async fn thousand_bytes_four_segments() -> Result<()> {
    init_logging();
    let data = pattern(1000);
    let server = TestServer::start(data.clone());
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.bin");
    let transfer = downloader(&server.url("ranged"), 4, IDLE, &out)
        .download()
        .await?;
    assert_eq!(transfer.strategy, Strategy::Segmented { length: 1000 });
    assert_eq!(transfer.bytes, 1000);
    assert_eq!(transfer.path, out);
    assert_eq!(std::fs::read(&out).unwrap(), data);
    assert_eq!(server.ranged_gets(), 4);
    // only the destination is left, the temporary directory is gone
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    Ok(())
}

#[tokio::test]
async fn segmented_equals_single_stream() -> Result<()> {
    init_logging();
    let data = pattern(256 * 1024 + 13);
    let server = TestServer::start(data.clone());
    let dir = tempfile::tempdir().unwrap();
    let segmented = downloader(&server.url("ranged"), 7, IDLE, &dir.path().join("a.bin"))
        .download()
        .await?;
    let single = downloader(&server.url("plain"), 7, IDLE, &dir.path().join("b.bin"))
        .download()
        .await?;
    assert!(matches!(segmented.strategy, Strategy::Segmented { .. }));
    assert_eq!(single.strategy, Strategy::Single);
    let a = std::fs::read(&segmented.path).unwrap();
    let b = std::fs::read(&single.path).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, data);
    Ok(())
}

#[tokio::test]
async fn verified_for_every_worker_count() -> Result<()> {
    init_logging();
    let data = pattern(10_007);
    let sum = format!("{:x}", Sha256::digest(&data));
    let server = TestServer::start(data);
    let dir = tempfile::tempdir().unwrap();
    for i in 1..=10 {
        let out = dir.path().join(format!("out-{}.bin", i));
        let mut dl = downloader(&server.url("ranged"), i, IDLE, &out);
        dl.verify(Hash::new_sha256(sum.clone()));
        let transfer = dl.download().await?;
        assert_eq!(transfer.bytes, 10_007);
    }
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 10);
    Ok(())
}

#[tokio::test]
async fn checksum_mismatch_leaves_nothing() {
    init_logging();
    let server = TestServer::start(pattern(4096));
    let dir = tempfile::tempdir().unwrap();
    let mut dl = downloader(&server.url("ranged"), 4, IDLE, &dir.path().join("out.bin"));
    dl.verify(Hash::new_sha256(format!("{:x}", Sha256::digest(b"other"))));
    let res = dl.download().await;
    assert!(matches!(res, Err(Error::Checksum { .. })), "{:?}", res);
    assert!(crate::is_empty_dir(dir.path()));
}

#[tokio::test]
async fn existing_destination_is_replaced() -> Result<()> {
    init_logging();
    let data = pattern(2048);
    let server = TestServer::start(data.clone());
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.bin");
    std::fs::write(&out, b"stale contents").unwrap();
    downloader(&server.url("ranged"), 3, IDLE, &out)
        .download()
        .await?;
    assert_eq!(std::fs::read(&out).unwrap(), data);
    Ok(())
}
