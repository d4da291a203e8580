//! Per-operation deadline

use sbb_core::{SbbError, SbbResult};
use std::future::Future;
use std::time::Duration;

/// Run one suspending network operation under `timeout`
///
/// Each call gets the full timeout afresh; there is no shared budget across
/// calls. An expired deadline becomes [`SbbError::Timeout`], an I/O failure
/// becomes [`SbbError::Connection`].
pub async fn guarded<F, T>(timeout: Duration, operation: F) -> SbbResult<T>
where
    F: Future<Output = std::io::Result<T>>,
{
    tokio::time::timeout(timeout, operation)
        .await
        .map_err(|_| SbbError::Timeout)?
        .map_err(SbbError::Connection)
}
