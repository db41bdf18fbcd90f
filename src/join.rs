use crate::{Error, Result};
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use tokio::task::{AbortHandle, JoinHandle};
use tracing::warn;

/// Wait for every task and return their outputs in spawn order.
///
/// The first failure aborts the tasks still running. This only returns once
/// all of them have stopped, so nothing keeps writing after the caller moves on.
pub(crate) async fn join_all<T>(handles: Vec<JoinHandle<Result<T>>>) -> Result<Vec<T>> {
    let aborts = handles
        .iter()
        .map(JoinHandle::abort_handle)
        .collect::<Vec<AbortHandle>>();
    let mut pending = handles
        .into_iter()
        .enumerate()
        .map(|(pos, handle)| handle.map(move |res| (pos, res)))
        .collect::<FuturesUnordered<_>>();
    let mut done = (0..aborts.len()).map(|_| None).collect::<Vec<Option<T>>>();
    while let Some((pos, res)) = pending.next().await {
        match res.map_err(Error::Join).and_then(|x| x) {
            Ok(val) => done[pos] = Some(val),
            Err(e) => {
                warn!("Task {} failed, aborting {} others: {}", pos, pending.len(), e);
                aborts.iter().for_each(AbortHandle::abort);
                while pending.next().await.is_some() {}
                return Err(e);
            }
        }
    }
    Ok(done.into_iter().flatten().collect())
}
