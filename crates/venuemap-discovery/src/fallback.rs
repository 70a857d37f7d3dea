//! Fail-open policy shared by every public engine operation.

use std::error::Error;
use std::future::Future;

use crate::error::DiscoveryError;

/// Await `operation` and swap any error for `T::default()`.
///
/// Validation failures are logged at warn, collaborator failures at error
/// with the full cause chain. Nothing is propagated to the caller.
pub(crate) async fn degrade<T, F>(operation: &'static str, fut: F) -> T
where
    T: Default,
    F: Future<Output = Result<T, DiscoveryError>>,
{
    match fut.await {
        Ok(value) => value,
        Err(err) if err.is_validation() => {
            tracing::warn!(operation, error = %err, "invalid request, returning empty result");
            T::default()
        }
        Err(err) => {
            tracing::error!(
                operation,
                error = %error_chain(&err),
                "collaborator failed, returning empty result"
            );
            T::default()
        }
    }
}

/// Render an error and all of its sources as `outer: inner: root`.
#[must_use]
pub fn error_chain(err: &(dyn Error + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_chain_walks_every_source() {
        let root = std::io::Error::other("connection refused");
        let err = DiscoveryError::store(root);
        assert_eq!(error_chain(&err), "venue store failed: connection refused");
    }

    #[tokio::test]
    async fn degrade_returns_value_on_success() {
        let value = degrade("test", async { Ok::<_, DiscoveryError>(vec![1, 2, 3]) }).await;
        assert_eq!(value, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn degrade_returns_default_on_validation_error() {
        let value: Vec<u8> = degrade("test", async { Err(DiscoveryError::MissingCoordinate) }).await;
        assert!(value.is_empty());
    }

    #[tokio::test]
    async fn degrade_returns_default_on_collaborator_error() {
        let value: Option<u32> =
            degrade("test", async { Err(DiscoveryError::geocoder("timed out")) }).await;
        assert!(value.is_none());
    }
}
