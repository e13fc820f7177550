//! Ordered concurrent fan-out.

use std::future::Future;

use futures::future::join_all;
use nns_core::NnsError;

/// Run `resolve` over every input concurrently and collect results in input
/// order. An error for one input becomes `None` for that slot only.
pub async fn resolve_ordered<'a, I, F, Fut, T>(inputs: I, resolve: F) -> Vec<Option<T>>
where
    I: IntoIterator<Item = &'a str>,
    F: Fn(&'a str) -> Fut,
    Fut: Future<Output = Result<Option<T>, NnsError>>,
{
    let inputs: Vec<&'a str> = inputs.into_iter().collect();
    let results = join_all(inputs.iter().map(|input| resolve(*input))).await;

    let mut failed = 0usize;
    let out: Vec<Option<T>> = results
        .into_iter()
        .zip(&inputs)
        .map(|(result, input)| match result {
            Ok(value) => value,
            Err(e) => {
                failed += 1;
                tracing::warn!(input = %input, error = %e, "batch entry failed");
                None
            }
        })
        .collect();

    tracing::info!(
        total = out.len(),
        resolved = out.iter().filter(|r| r.is_some()).count(),
        failed,
        "batch resolved"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn preserves_order_and_isolates_failures() {
        let out = resolve_ordered(["a", "bad", "c", "none"], |s| async move {
            match s {
                "bad" => Err(NnsError::Transport("down".into())),
                "none" => Ok(None),
                other => Ok(Some(other.to_uppercase())),
            }
        })
        .await;
        assert_eq!(
            out,
            vec![Some("A".to_string()), None, Some("C".to_string()), None]
        );
    }

    #[tokio::test]
    async fn empty_input() {
        let out: Vec<Option<u8>> = resolve_ordered(Vec::<&str>::new(), |_| async { Ok(Some(1)) }).await;
        assert!(out.is_empty());
    }
}
