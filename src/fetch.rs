//! Paginated accumulation of API results.
//!
//! The loop is generic over an async page callback so the accumulation and
//! truncation behavior can be exercised against a stub source, without a
//! network in sight.

use anyhow::Result;
use std::future::Future;

/// One fetched page of items, plus whether the server reports a further page.
#[derive(Debug)]
pub struct FetchedPage<T> {
    pub items: Vec<T>,
    pub has_next: bool,
}

/// Accumulates items across pages, starting at page 1.
///
/// Stops as soon as the source reports no further page or the accumulated
/// count reaches `max_items`, then truncates to exactly `max_items`. Full
/// pages are always requested, so the last page may overshoot the cap; the
/// overshoot is discarded by the truncation.
///
/// Any page error aborts the whole fetch; items accumulated so far are
/// dropped rather than returned as a partial result.
pub async fn collect_pages<T, F, Fut>(max_items: usize, mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<FetchedPage<T>>>,
{
    let mut all = Vec::new();
    let mut page: u32 = 1;

    loop {
        let fetched = fetch_page(page).await?;
        all.extend(fetched.items);
        tracing::debug!(page, accumulated = all.len(), "fetched page");

        if !fetched.has_next || all.len() >= max_items {
            break;
        }
        page += 1;
    }

    all.truncate(max_items);
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn page_of(range: std::ops::Range<u32>, has_next: bool) -> FetchedPage<u32> {
        FetchedPage {
            items: range.collect(),
            has_next,
        }
    }

    #[tokio::test]
    async fn concatenates_pages_and_truncates_to_cap() {
        // Two full pages of 100 with a cap of 150: the second page is
        // fetched whole and the overshoot trimmed.
        let items = collect_pages(150, |page| async move {
            Ok(match page {
                1 => page_of(0..100, true),
                2 => page_of(100..200, false),
                n => panic!("unexpected page {n}"),
            })
        })
        .await
        .unwrap();

        assert_eq!(items.len(), 150);
        assert_eq!(items, (0..150).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn stops_when_source_reports_no_next_page() {
        let items = collect_pages(1000, |page| async move {
            assert_eq!(page, 1);
            Ok(page_of(0..3, false))
        })
        .await
        .unwrap();

        assert_eq!(items, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn does_not_request_past_a_cap_hit_on_a_page_boundary() {
        let mut calls = 0;
        let items = collect_pages(100, |page| {
            calls += 1;
            async move {
                assert_eq!(page, 1);
                Ok(page_of(0..100, true))
            }
        })
        .await
        .unwrap();

        assert_eq!(calls, 1);
        assert_eq!(items.len(), 100);
    }

    #[tokio::test]
    async fn page_error_aborts_the_whole_fetch() {
        let result: Result<Vec<u32>> = collect_pages(1000, |page| async move {
            match page {
                1 => Ok(page_of(0..100, true)),
                _ => Err(anyhow!("boom")),
            }
        })
        .await;

        assert!(result.is_err());
    }
}
