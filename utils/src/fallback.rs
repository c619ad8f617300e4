use std::future::Future;

/// Runs `job` against each candidate in order and returns the first success. Later
/// candidates are never touched once one succeeds. When all fail, every candidate is
/// returned together with its error, in the order they were tried.
pub async fn first_success<C, T, E, F, Fut>(
    candidates: impl IntoIterator<Item = C>,
    mut job: F,
) -> Result<T, Vec<(C, E)>>
where
    C: Clone,
    F: FnMut(C) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut failures = Vec::new();
    for candidate in candidates {
        match job(candidate.clone()).await {
            Ok(value) => return Ok(value),
            Err(err) => failures.push((candidate, err)),
        }
    }
    Err(failures)
}
