// ── Navigation sink ──
//
// Views never own the screen; they ask a `Navigator` to move somewhere.
// The CLI prints a hint, tests record the requests.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::routes::Route;

/// Delay between a blocked action and the redirect to the login screen.
pub const SIGN_IN_REDIRECT_DELAY: Duration = Duration::from_millis(100);

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Records every navigation request in order.
#[derive(Debug, Default)]
pub struct NavigationLog {
    visited: Mutex<Vec<Route>>,
}

impl NavigationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visited(&self) -> Vec<Route> {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<Route> {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .copied()
    }
}

impl Navigator for NavigationLog {
    fn navigate(&self, route: Route) {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route);
    }
}

/// Ask `navigator` to move to `route` after `delay`, off the caller's task.
pub fn navigate_after(
    navigator: Arc<dyn Navigator>,
    route: Route,
    delay: Duration,
) -> JoinHandle<()> {
    debug!(%route, ?delay, "navigation scheduled");
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        navigator.navigate(route);
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn scheduled_navigation_lands_after_delay() {
        let log = Arc::new(NavigationLog::new());
        let handle = navigate_after(log.clone(), Route::Login, SIGN_IN_REDIRECT_DELAY);

        assert!(log.visited().is_empty());
        handle.await.unwrap();
        assert_eq!(log.last(), Some(Route::Login));
    }
}
