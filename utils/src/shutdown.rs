use std::future::Future;

use tokio_util::sync::CancellationToken;

/// Drives `fut` to completion unless `cancel` fires first, in which case the future is
/// dropped and [`crate::Error::Cancelled`] is returned.
pub async fn until_cancelled<Fut>(
    cancel: &CancellationToken,
    fut: Fut,
) -> crate::Result<Fut::Output>
where
    Fut: Future,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            Err(crate::Error::Cancelled)
        }
        result = fut => {
            Ok(result)
        }
    }
}
