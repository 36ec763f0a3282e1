//! Click escalation
//!
//! Each candidate gets at most one attempt per strategy, in order; the first
//! success wins. A crash aborts immediately.

use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, trace};

use crate::renderer::{ClickStrategy, DriverError, ElementHandle, RenderedPage};

/// Strategies in the order they are tried
pub const CLICK_ESCALATION: [ClickStrategy; 3] =
    [ClickStrategy::Direct, ClickStrategy::Forced, ClickStrategy::Script];

/// Result of escalating clicks on one element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Clicked(ClickStrategy),
    /// Every strategy failed; the candidate is skipped
    Exhausted(Vec<DriverError>),
}

/// Try each strategy once, each bounded by `per_attempt`.
///
/// Returns `Err` only for a fatal driver error.
pub async fn click_with_escalation(
    page: &dyn RenderedPage,
    element: &ElementHandle,
    per_attempt: Duration,
) -> Result<ClickOutcome, DriverError> {
    let mut failures = Vec::with_capacity(CLICK_ESCALATION.len());

    for strategy in CLICK_ESCALATION {
        let attempt = match timeout(per_attempt, page.click(element, strategy)).await {
            Ok(result) => result,
            Err(_) => Err(DriverError::Timeout(format!(
                "{strategy:?} click exceeded {}ms",
                per_attempt.as_millis()
            ))),
        };

        match attempt {
            Ok(()) => {
                trace!("Clicked <{}> with {:?}", element.tag, strategy);
                return Ok(ClickOutcome::Clicked(strategy));
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                debug!("{:?} click on <{}> failed: {}", strategy, element.tag, e);
                failures.push(e);
            }
        }
    }

    Ok(ClickOutcome::Exhausted(failures))
}
