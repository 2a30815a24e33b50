//! Watch registration

use std::sync::Arc;

use crate::notify::{templates, Notifier};
use crate::watch::{InvalidWatch, Watch, WatchRequest, WatchStore};

/// Outcome of an accepted registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    pub id: u64,
    /// Whether the confirmation message was delivered. A failed confirmation
    /// does not undo the registration; the watch still fires later.
    pub confirmation_sent: bool,
}

/// Validates and accepts new watches
#[derive(Clone)]
pub struct RegistrationService {
    store: Arc<WatchStore>,
    notifier: Arc<dyn Notifier>,
}

impl RegistrationService {
    pub fn new(store: Arc<WatchStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Validate, insert, and send the confirmation.
    ///
    /// Invalid input is rejected before any side effect. The insert is
    /// committed before the confirmation attempt, so a notifier outage never
    /// loses an accepted watch.
    pub async fn register(&self, request: WatchRequest) -> Result<Registration, InvalidWatch> {
        let watch = Watch::from_request(request)?;
        let watch = self.store.insert(watch);

        tracing::info!(
            watch_id = watch.id,
            asset = %watch.asset_id,
            mode = watch.mode.as_str(),
            "Watch registered"
        );

        let subject = templates::confirmation_subject(&watch);
        let body = templates::confirmation_body(&watch);
        let confirmation_sent = match self
            .notifier
            .send(&watch.recipient, &subject, &body)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    watch_id = watch.id,
                    error = %e,
                    "Failed to send confirmation"
                );
                false
            }
        };

        Ok(Registration {
            id: watch.id,
            confirmation_sent,
        })
    }
}
