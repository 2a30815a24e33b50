//! Threshold evaluation

use crate::watch::{ThresholdMode, Watch};

/// Whether a watch's condition holds against the current price.
///
/// Pure; only called with a quote in hand. Missing limits for the active
/// mode are rejected at registration, so absent values here simply read as
/// "leg not armed".
pub fn evaluate(watch: &Watch, current_price: f64) -> bool {
    let up_hit = watch.up_limit.map(|limit| current_price >= limit);
    let down_hit = watch.down_limit.map(|limit| current_price <= limit);

    match watch.mode {
        ThresholdMode::Up => up_hit.unwrap_or(false),
        ThresholdMode::Down => down_hit.unwrap_or(false),
        ThresholdMode::Both => up_hit.unwrap_or(false) || down_hit.unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watch::WatchRequest;

    fn make_watch(mode: ThresholdMode, up: Option<f64>, down: Option<f64>) -> Watch {
        Watch::from_request(WatchRequest {
            asset_id: "bitcoin".to_string(),
            mode,
            up_limit: up,
            down_limit: down,
            recipient: "a@x.com".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_up_mode() {
        let watch = make_watch(ThresholdMode::Up, Some(100_000.0), None);

        assert!(!evaluate(&watch, 99_000.0));
        assert!(evaluate(&watch, 100_000.0)); // boundary is inclusive
        assert!(evaluate(&watch, 100_500.0));
    }

    #[test]
    fn test_down_mode() {
        let watch = make_watch(ThresholdMode::Down, None, Some(1000.0));

        assert!(!evaluate(&watch, 1001.0));
        assert!(evaluate(&watch, 1000.0));
        assert!(evaluate(&watch, 900.0));
    }

    #[test]
    fn test_both_mode_is_or_of_legs() {
        let watch = make_watch(ThresholdMode::Both, Some(5000.0), Some(1000.0));

        assert!(evaluate(&watch, 5200.0));
        assert!(evaluate(&watch, 900.0));
        assert!(!evaluate(&watch, 3000.0));
    }

    #[test]
    fn test_both_mode_with_overlapping_limits() {
        // up_limit <= down_limit: a value between them trips both legs
        let watch = make_watch(ThresholdMode::Both, Some(1000.0), Some(5000.0));
        assert!(evaluate(&watch, 3000.0));
    }
}
