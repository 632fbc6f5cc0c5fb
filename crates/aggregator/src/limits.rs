use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

pub const MAX_SPEC_CONCURRENCY: usize = 256;

pub const CONCURRENCY_ENV: &str = "CONTEXT_PATHS_CONCURRENCY";

/// `None` means one task per spec with no upper bound.
pub(crate) fn parse_spec_concurrency(raw: Option<&str>) -> Option<usize> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|v| *v > 0)
        .map(|v| v.clamp(1, MAX_SPEC_CONCURRENCY))
}

pub(crate) fn spec_concurrency_from_env() -> Option<usize> {
    let raw = std::env::var(CONCURRENCY_ENV).ok();
    parse_spec_concurrency(raw.as_deref())
}

/// Optional cap on the number of spec tasks reading at once.
#[derive(Debug, Clone, Default)]
pub(crate) struct SpecLimiter {
    limit: Option<usize>,
    semaphore: Option<Arc<Semaphore>>,
}

impl SpecLimiter {
    pub(crate) fn new(limit: Option<usize>) -> Self {
        let limit = limit.map(|n| n.clamp(1, MAX_SPEC_CONCURRENCY));
        Self {
            limit,
            semaphore: limit.map(|n| Arc::new(Semaphore::new(n))),
        }
    }

    pub(crate) fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub(crate) async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        let semaphore = self.semaphore.as_ref()?;
        // The semaphore is never closed; acquire failures are not expected.
        Arc::clone(semaphore).acquire_owned().await.ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_spec_concurrency_defaults_to_unbounded_and_clamps() {
        assert_eq!(parse_spec_concurrency(None), None);
        assert_eq!(parse_spec_concurrency(Some("")), None);
        assert_eq!(parse_spec_concurrency(Some("   ")), None);
        assert_eq!(parse_spec_concurrency(Some("0")), None);
        assert_eq!(parse_spec_concurrency(Some("abc")), None);
        assert_eq!(parse_spec_concurrency(Some("4")), Some(4));
        assert_eq!(parse_spec_concurrency(Some(" 5 ")), Some(5));
        assert_eq!(
            parse_spec_concurrency(Some("100000")),
            Some(MAX_SPEC_CONCURRENCY)
        );
    }

    #[tokio::test]
    async fn unbounded_limiter_hands_out_no_permits() {
        let limiter = SpecLimiter::new(None);
        assert!(limiter.acquire().await.is_none());
        assert_eq!(limiter.limit(), None);
    }

    #[tokio::test]
    async fn bounded_limiter_hands_out_permits() {
        let limiter = SpecLimiter::new(Some(2));
        assert_eq!(limiter.limit(), Some(2));
        let first = limiter.acquire().await;
        assert!(first.is_some());
        drop(first);
        assert!(limiter.acquire().await.is_some());
    }
}
