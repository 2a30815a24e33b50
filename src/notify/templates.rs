//! Message rendering for confirmation and trigger notifications

use crate::watch::{ThresholdMode, Watch};

pub fn confirmation_subject(watch: &Watch) -> String {
    format!("Alert Confirmation for {}", watch.asset_id)
}

pub fn confirmation_body(watch: &Watch) -> String {
    format!(
        "Your alert for {} has been successfully set!\n\n\
         Alert Details:\n{}\n\
         We will notify you when the price meets the specified criteria.",
        watch.asset_id,
        detail_lines(watch),
    )
}

pub fn trigger_subject(watch: &Watch) -> String {
    format!("Price Alert: {}", watch.asset_id)
}

pub fn trigger_body(watch: &Watch, current_price: f64) -> String {
    let direction = match watch.mode {
        ThresholdMode::Up => "reached or exceeded",
        ThresholdMode::Down => "dropped to or below",
        ThresholdMode::Both => "crossed",
    };

    format!(
        "Your price alert for {} has been triggered!\n\n\
         Current Price: ${}\n\n\
         Alert Details:\n{}\n\
         The current price has {} the set limit.",
        watch.asset_id,
        current_price,
        detail_lines(watch),
        direction,
    )
}

fn detail_lines(watch: &Watch) -> String {
    format!(
        "  - Alert Type: {}\n  - Up Limit: {}\n  - Down Limit: {}\n",
        watch.mode.as_str(),
        limit_line(watch.up_limit),
        limit_line(watch.down_limit),
    )
}

fn limit_line(limit: Option<f64>) -> String {
    match limit {
        Some(value) => format!("${}", value),
        None => "N/A".to_string(),
    }
}
