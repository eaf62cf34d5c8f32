//! Request lifecycle and display state
//!
//! Every fetch takes a [`RequestTicket`]. Starting a fetch supersedes all
//! earlier tickets, and only the newest ticket may write the display state,
//! so a slow response can never overwrite a fresher one. Each fetch is bounded
//! by a timeout. Failed and timed-out fetches leave the state as it was.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::WeatherCardError;
use crate::background::Background;
use crate::models::WeatherReport;

/// What the card currently shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayState {
    pub report: Option<WeatherReport>,
    pub background: Background,
    /// Ticket of the fetch that produced `report`, 0 before the first one
    pub ticket: u64,
}

/// Identifies one fetch within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    #[must_use]
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// How a fetch ended
#[derive(Debug)]
pub enum RequestOutcome {
    /// The report is now on display
    Applied,
    /// A newer fetch was started; the result was dropped
    Superseded,
    /// The fetch failed; the display is unchanged
    Failed(WeatherCardError),
    /// The fetch did not finish in time; the display is unchanged
    TimedOut,
}

impl RequestOutcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, RequestOutcome::Applied)
    }
}

/// Single writer of the display state
#[derive(Debug)]
pub struct WeatherSession {
    latest: AtomicU64,
    state: watch::Sender<DisplayState>,
    timeout: Duration,
}

impl WeatherSession {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let (state, _) = watch::channel(DisplayState::default());
        Self {
            latest: AtomicU64::new(0),
            state,
            timeout,
        }
    }

    /// Start a fetch, superseding any in flight
    pub fn begin(&self) -> RequestTicket {
        let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(ticket = id, "Request issued");
        RequestTicket(id)
    }

    /// Whether `ticket` is still the newest one issued
    #[must_use]
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.id()
    }

    /// Drive `fetch` to completion under the session timeout and apply its
    /// result if `ticket` is still current.
    pub async fn run<F>(&self, ticket: RequestTicket, fetch: F) -> RequestOutcome
    where
        F: Future<Output = crate::Result<WeatherReport>>,
    {
        let result = tokio::time::timeout(self.timeout, fetch).await;

        if !self.is_current(ticket) {
            debug!(ticket = ticket.id(), "Dropping result of superseded request");
            return RequestOutcome::Superseded;
        }

        match result {
            Err(_) => {
                warn!(
                    ticket = ticket.id(),
                    "Request timed out after {:.1}s",
                    self.timeout.as_secs_f64()
                );
                RequestOutcome::TimedOut
            }
            Ok(Err(e)) => {
                error!(ticket = ticket.id(), "Error fetching weather data: {}", e);
                RequestOutcome::Failed(e)
            }
            Ok(Ok(report)) => {
                if self.apply(ticket, report) {
                    RequestOutcome::Applied
                } else {
                    RequestOutcome::Superseded
                }
            }
        }
    }

    fn apply(&self, ticket: RequestTicket, report: WeatherReport) -> bool {
        self.state.send_if_modified(|state| {
            // re-checked under the channel lock so a newer ticket cannot be overwritten
            if !self.is_current(ticket) || ticket.id() <= state.ticket {
                return false;
            }
            info!(
                ticket = ticket.id(),
                location = %report.current.location_name,
                background = %report.background,
                "Display updated"
            );
            state.background = report.background;
            state.report = Some(report);
            state.ticket = ticket.id();
            true
        })
    }

    /// Watch the display state
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.state.subscribe()
    }

    /// Copy of the current display state
    #[must_use]
    pub fn snapshot(&self) -> DisplayState {
        self.state.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use crate::models::{Condition, CurrentConditions};

    fn report(city: &str, label: &str) -> WeatherReport {
        WeatherReport::new(
            CurrentConditions {
                location_name: city.to_string(),
                condition: Condition::new(label, "test"),
                temperature_kelvin: 290.0,
            },
            Vec::new(),
        )
    }

    #[tokio::test]
    async fn applies_current_request() {
        let session = WeatherSession::new(Duration::from_secs(5));
        let ticket = session.begin();

        let outcome = session
            .run(ticket, async { Ok(report("Paris", "Clear")) })
            .await;

        assert!(outcome.is_applied());
        let state = session.snapshot();
        assert_eq!(state.ticket, ticket.id());
        assert_eq!(ticket.id(), 1);
        assert_eq!(state.background, Background::Sunny);
        assert_eq!(state.report.unwrap().current.location_name, "Paris");
    }

    #[tokio::test]
    async fn stale_response_does_not_overwrite_newer_one() {
        let session = WeatherSession::new(Duration::from_secs(5));
        let first = session.begin();
        let second = session.begin();

        let newer = session
            .run(second, async { Ok(report("Rome", "Rain")) })
            .await;
        let older = session
            .run(first, async { Ok(report("Paris", "Clear")) })
            .await;

        assert!(newer.is_applied());
        assert!(matches!(older, RequestOutcome::Superseded));
        let state = session.snapshot();
        assert_eq!(state.report.unwrap().current.location_name, "Rome");
        assert_eq!(state.background, Background::Rainy);
    }

    #[tokio::test]
    async fn superseded_while_in_flight_is_dropped() {
        let session = WeatherSession::new(Duration::from_secs(5));
        let first = session.begin();

        let outcome = session
            .run(first, async {
                // user submits another city before this one resolves
                session.begin();
                Ok(report("Paris", "Clear"))
            })
            .await;

        assert!(matches!(outcome, RequestOutcome::Superseded));
        assert!(session.snapshot().report.is_none());
    }

    #[tokio::test]
    async fn failure_leaves_state_untouched() {
        let session = WeatherSession::new(Duration::from_secs(5));
        let ticket = session.begin();
        session
            .run(ticket, async { Ok(report("Oslo", "Clouds")) })
            .await;

        let ticket = session.begin();
        let outcome = session
            .run(ticket, async {
                Err(WeatherCardError::api("not found", ErrorCode::ApiLocationNotFound))
            })
            .await;

        assert!(matches!(outcome, RequestOutcome::Failed(_)));
        let state = session.snapshot();
        assert_eq!(state.ticket, 1);
        assert_eq!(state.report.unwrap().current.location_name, "Oslo");
    }

    #[tokio::test(start_paused = true)]
    async fn slow_request_times_out() {
        let session = WeatherSession::new(Duration::from_secs(2));
        let ticket = session.begin();

        let outcome = session
            .run(ticket, async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(report("Paris", "Clear"))
            })
            .await;

        assert!(matches!(outcome, RequestOutcome::TimedOut));
        assert!(session.snapshot().report.is_none());
    }

    #[tokio::test]
    async fn subscribers_see_updates() {
        let session = WeatherSession::new(Duration::from_secs(5));
        let mut rx = session.subscribe();
        let ticket = session.begin();

        session
            .run(ticket, async { Ok(report("Lima", "Clouds")) })
            .await;

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().background, Background::Cloudy);
    }
}
