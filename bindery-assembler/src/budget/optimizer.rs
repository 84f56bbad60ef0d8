//! Content-shrinking transforms applied before an item is dropped.

use super::counter::SizeCounter;

const ELLIPSIS: char = '…';
const SUMMARY_MAX_CHARS: usize = 120;
/// Truncation that keeps less than this fraction of the original is
/// considered too lossy; later optimizations get their turn instead.
const MIN_KEEP_RATIO: f64 = 0.25;

/// Truncate `text` to the largest prefix that, with a trailing ellipsis,
/// fits within `limit` units. Returns `None` when the best fitting prefix
/// keeps less than a quarter of the original.
pub fn truncate_to_fit(text: &str, limit: usize, counter: &SizeCounter) -> Option<String> {
    if limit == 0 {
        return None;
    }
    let total = text.chars().count();
    let with_ellipsis = |keep: usize| -> String {
        let mut shortened: String = text.chars().take(keep).collect();
        shortened.push(ELLIPSIS);
        shortened
    };
    // The count is nondecreasing in the prefix length, so binary-search the
    // largest prefix that still fits.
    let (mut lo, mut hi) = (0usize, total);
    while lo < hi {
        let mid = lo + (hi - lo).div_ceil(2);
        if counter.count(&with_ellipsis(mid)) <= limit {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    if lo == 0 || (lo as f64) < total as f64 * MIN_KEEP_RATIO {
        return None;
    }
    Some(with_ellipsis(lo))
}

/// Replace `text` with a short summary: its first sentence, capped at
/// 120 characters.
pub fn substitute_summary(text: &str) -> String {
    let first_sentence = match text.find(['.', '!', '?']) {
        Some(pos) => &text[..=pos],
        None => text,
    };
    let mut summary: String = first_sentence.chars().take(SUMMARY_MAX_CHARS).collect();
    if first_sentence.chars().count() > SUMMARY_MAX_CHARS {
        summary.push(ELLIPSIS);
    }
    summary
}

/// Collapse runs of whitespace into single spaces.
pub fn compress_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use bindery_core::config::CountingMethod;

    #[test]
    fn truncation_fits_within_limit() {
        let counter = SizeCounter::new(CountingMethod::Characters);
        let text = "a".repeat(200);
        let out = truncate_to_fit(&text, 60, &counter).unwrap();
        assert!(counter.count(&out) <= 60);
        assert!(out.ends_with(ELLIPSIS));
    }

    #[test]
    fn truncation_uses_the_whole_remaining_budget() {
        let counter = SizeCounter::new(CountingMethod::Characters);
        let text = "a".repeat(100);
        // Largest fitting prefix, not the first power-of-two fraction that
        // happens to fit: 99 chars of budget keep 98 chars plus the ellipsis.
        let out = truncate_to_fit(&text, 99, &counter).unwrap();
        assert_eq!(counter.count(&out), 99);
        let out = truncate_to_fit(&text, 60, &counter).unwrap();
        assert_eq!(counter.count(&out), 60);
    }

    #[test]
    fn truncation_gives_up_on_zero_limit() {
        let counter = SizeCounter::new(CountingMethod::Characters);
        assert!(truncate_to_fit("hello", 0, &counter).is_none());
    }

    #[test]
    fn truncation_declines_when_too_lossy() {
        let counter = SizeCounter::new(CountingMethod::Characters);
        let text = "a".repeat(500);
        // The best fitting truncation keeps 59 chars, under the 25% floor.
        assert!(truncate_to_fit(&text, 60, &counter).is_none());
        // At a quarter of the content the floor is satisfied.
        assert!(truncate_to_fit(&text, 126, &counter).is_some());
    }

    #[test]
    fn summary_takes_first_sentence() {
        let out = substitute_summary("Retry failed. Everything after is dropped.");
        assert_eq!(out, "Retry failed.");
    }

    #[test]
    fn summary_caps_long_sentences() {
        let text = "x".repeat(300);
        let out = substitute_summary(&text);
        assert_eq!(out.chars().count(), SUMMARY_MAX_CHARS + 1);
        assert!(out.ends_with(ELLIPSIS));
    }

    #[test]
    fn whitespace_compression_collapses_runs() {
        assert_eq!(compress_whitespace("a  b\n\n c\t d"), "a b c d");
    }
}
