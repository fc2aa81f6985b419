//! Per-request redirect evaluation.

use std::sync::Arc;
use tracing::{debug, error, info};

use crate::application::services::SettingsService;
use crate::domain::engine::RedirectEngine;
use crate::domain::entities::{Decision, RequestContext, SkipReason};
use crate::domain::repositories::SettingsRepository;

/// Metric counting decisions, labelled by `outcome`.
pub const DECISIONS_METRIC: &str = "country_redirect_decisions_total";

/// Combines a settings snapshot with the [`RedirectEngine`] for each request.
///
/// Never fails: if settings cannot be loaded the request is left alone with
/// [`SkipReason::SettingsUnavailable`].
pub struct RedirectService<R: SettingsRepository + ?Sized = dyn SettingsRepository> {
    settings: Arc<SettingsService<R>>,
    engine: RedirectEngine,
}

impl<R: SettingsRepository + ?Sized> RedirectService<R> {
    pub fn new(settings: Arc<SettingsService<R>>, engine: RedirectEngine) -> Self {
        Self { settings, engine }
    }

    pub fn engine(&self) -> &RedirectEngine {
        &self.engine
    }

    /// Evaluates one request against the current settings.
    pub async fn evaluate(&self, ctx: &RequestContext) -> Decision {
        let decision = match self.settings.snapshot().await {
            Ok(snapshot) => self.engine.decide(ctx, &snapshot),
            Err(e) => {
                error!("Redirect settings unavailable: {}", e);
                Decision::Skip(SkipReason::SettingsUnavailable)
            }
        };

        match &decision {
            Decision::Redirect {
                country, location, ..
            } => info!(
                country = %country,
                path = %ctx.request_path,
                "Redirecting to {}",
                location
            ),
            Decision::Skip(reason) => debug!(
                path = %ctx.request_path,
                reason = reason.as_str(),
                "Redirect skipped: {}",
                reason
            ),
        }

        metrics::counter!(DECISIONS_METRIC, "outcome" => decision.outcome()).increment(1);

        decision
    }
}
