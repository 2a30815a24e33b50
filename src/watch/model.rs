//! Watch definition and registration validation

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

/// Which threshold(s) a watch is armed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdMode {
    /// Trigger when the price reaches or exceeds the upper limit
    Up,
    /// Trigger when the price reaches or drops below the lower limit
    Down,
    /// Trigger when either limit is crossed
    Both,
}

impl ThresholdMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThresholdMode::Up => "up",
            ThresholdMode::Down => "down",
            ThresholdMode::Both => "both",
        }
    }
}

/// Incoming registration payload
#[derive(Debug, Clone, Deserialize)]
pub struct WatchRequest {
    pub asset_id: String,
    pub mode: ThresholdMode,
    #[serde(default)]
    pub up_limit: Option<f64>,
    #[serde(default)]
    pub down_limit: Option<f64>,
    pub recipient: String,
}

/// Registration validation errors
#[derive(Debug, thiserror::Error)]
pub enum InvalidWatch {
    #[error("asset id must not be empty")]
    MissingAsset,

    #[error("recipient must not be empty")]
    MissingRecipient,

    #[error("mode '{0}' requires up_limit")]
    MissingUpLimit(&'static str),

    #[error("mode '{0}' requires down_limit")]
    MissingDownLimit(&'static str),

    #[error("{0} must be a finite number")]
    NonFiniteLimit(&'static str),
}

/// A registered standing request to be notified once when an asset's price
/// crosses a threshold.
///
/// Immutable after creation except for the `notified` flag, which flips
/// `false -> true` exactly once when a trigger notification has been
/// delivered. The flag lives on the shared entity so every holder of the
/// `Arc<Watch>` observes the same state.
#[derive(Debug)]
pub struct Watch {
    pub id: u64,
    pub asset_id: String,
    pub mode: ThresholdMode,
    pub up_limit: Option<f64>,
    pub down_limit: Option<f64>,
    pub recipient: String,
    notified: AtomicBool,
}

impl Watch {
    /// Validate a registration request and build a watch from it.
    ///
    /// The id is assigned by the store on insert; `from_request` leaves it
    /// zeroed.
    pub fn from_request(request: WatchRequest) -> Result<Self, InvalidWatch> {
        let asset_id = request.asset_id.trim().to_string();
        if asset_id.is_empty() {
            return Err(InvalidWatch::MissingAsset);
        }

        let recipient = request.recipient.trim().to_string();
        if recipient.is_empty() {
            return Err(InvalidWatch::MissingRecipient);
        }

        let mode = request.mode;
        let up_limit = match mode {
            ThresholdMode::Up | ThresholdMode::Both => Some(check_limit(
                request.up_limit,
                "up_limit",
                InvalidWatch::MissingUpLimit(mode.as_str()),
            )?),
            ThresholdMode::Down => request.up_limit,
        };
        let down_limit = match mode {
            ThresholdMode::Down | ThresholdMode::Both => Some(check_limit(
                request.down_limit,
                "down_limit",
                InvalidWatch::MissingDownLimit(mode.as_str()),
            )?),
            ThresholdMode::Up => request.down_limit,
        };

        Ok(Self {
            id: 0,
            asset_id,
            mode,
            up_limit,
            down_limit,
            recipient,
            notified: AtomicBool::new(false),
        })
    }

    /// Whether the trigger notification has already been delivered
    pub fn is_notified(&self) -> bool {
        self.notified.load(Ordering::Acquire)
    }

    /// Record a delivered trigger notification. Called only by the sweeper,
    /// only after a successful send; never reset.
    pub fn mark_notified(&self) {
        self.notified.store(true, Ordering::Release);
    }

    pub(crate) fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }
}

fn check_limit(
    value: Option<f64>,
    name: &'static str,
    missing: InvalidWatch,
) -> Result<f64, InvalidWatch> {
    let value = value.ok_or(missing)?;
    if !value.is_finite() {
        return Err(InvalidWatch::NonFiniteLimit(name));
    }
    Ok(value)
}
