use crate::error::FetchError;
use crate::progress::Progress;
use reqwest::{RequestBuilder, Response};
use std::future::Future;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// Await `fut`, failing when it takes longer than `idle`
async fn idle<T, F>(idle: Duration, fut: F) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, reqwest::Error>>,
{
    tokio::time::timeout(idle, fut)
        .await
        .map_err(|_| FetchError::Timeout(idle))?
        .map_err(FetchError::Net)
}

/// Send the request, waiting at most `idle_timeout` for response headers
pub(crate) async fn send(req: RequestBuilder, idle_timeout: Duration) -> Result<Response, FetchError> {
    let resp = idle(idle_timeout, req.send()).await?;
    debug!(
        "Response code: {}, headers: {:?}",
        resp.status(),
        resp.headers()
    );
    Ok(resp)
}

/// Copy the response body into `out`, chunk by chunk.
///
/// Each chunk must arrive within `idle_timeout`. Returns the amount of bytes written.
pub(crate) async fn copy_body<W>(
    mut resp: Response,
    out: &mut W,
    idle_timeout: Duration,
    progress: &Progress,
) -> Result<u64, FetchError>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0u64;
    while let Some(chunk) = idle(idle_timeout, resp.chunk()).await? {
        out.write_all(&chunk).await?;
        written += chunk.len() as u64;
        progress.inc(chunk.len() as u64);
    }
    out.flush().await?;
    Ok(written)
}
