// ── Application context ──
//
// The process-wide collaborators every view needs: the session store,
// the API client reading its token from that store, and the navigator.
// Built once at startup and cloned into views.

use std::sync::Arc;

use tracing::debug;

use eventos_api::{ApiClient, BearerSource};

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::navigation::Navigator;
use crate::routes::{GuardDecision, Route, guard};
use crate::session::SessionStore;
use crate::storage::DurableStorage;

#[derive(Clone)]
pub struct AppContext {
    session: Arc<SessionStore>,
    api: ApiClient,
    navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("session", &self.session)
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build the client from `config` and restore any stored session.
    pub fn new(
        config: &ClientConfig,
        storage: Arc<dyn DurableStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, CoreError> {
        let api = ApiClient::new(config.api_url.clone(), &config.transport())?;
        Ok(Self::from_parts(api, storage, navigator))
    }

    /// Wire an already-built client to a fresh session store over
    /// `storage`. The stored session is restored before returning.
    pub fn from_parts(
        api: ApiClient,
        storage: Arc<dyn DurableStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let session = Arc::new(SessionStore::new(storage));
        session.initialize();
        let bearer: Arc<dyn BearerSource> = session.clone();
        Self {
            api: api.with_bearer(bearer),
            session,
            navigator,
        }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// What the guard would do for `target` right now.
    pub fn check(&self, target: Route) -> GuardDecision {
        guard(target, self.is_authenticated())
    }

    /// Navigate through the guard. Returns where the user actually ended up.
    pub fn navigate(&self, target: Route) -> Route {
        let landed = match self.check(target) {
            GuardDecision::Allow => target,
            GuardDecision::Redirect(to) => {
                debug!(%target, %to, "guard redirected navigation");
                to
            }
        };
        self.navigator.navigate(landed);
        landed
    }

    pub fn logout(&self) {
        self.session.logout();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use url::Url;

    use super::*;
    use crate::navigation::NavigationLog;
    use crate::storage::{MemoryStorage, TOKEN_KEY};

    fn context(storage: Arc<MemoryStorage>) -> (AppContext, Arc<NavigationLog>) {
        let log = Arc::new(NavigationLog::new());
        let config = ClientConfig::new(Url::parse("http://localhost:5000/api").unwrap());
        let ctx = AppContext::new(&config, storage, log.clone()).unwrap();
        (ctx, log)
    }

    #[test]
    fn guarded_navigation_without_session_lands_on_login() {
        let (ctx, log) = context(Arc::new(MemoryStorage::new()));
        assert_eq!(ctx.navigate(Route::Profile), Route::Login);
        assert_eq!(ctx.navigate(Route::EventDetail { id: 1 }), Route::EventDetail { id: 1 });
        assert_eq!(log.visited(), vec![Route::Login, Route::EventDetail { id: 1 }]);
    }

    #[test]
    fn restored_session_opens_protected_routes() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "abc").unwrap();
        let (ctx, _) = context(storage);

        assert!(ctx.is_authenticated());
        assert_eq!(ctx.check(Route::EventCreate), GuardDecision::Allow);

        ctx.logout();
        assert_eq!(
            ctx.check(Route::EventCreate),
            GuardDecision::Redirect(Route::Login)
        );
    }
}
