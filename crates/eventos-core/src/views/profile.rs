use eventos_api::{Event, EventPage, EventQuery, User};

use crate::context::AppContext;
use crate::lifecycle::Listing;
use crate::routes::{GuardDecision, Route};

/// The signed-in user and the events they registered for.
#[derive(Debug)]
pub struct ProfileView {
    ctx: AppContext,
    events: Listing<Event>,
}

impl ProfileView {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            events: Listing::new(),
        }
    }

    pub fn user(&self) -> Option<User> {
        self.ctx.session().user()
    }

    pub fn events(&self) -> &[Event] {
        self.events.items()
    }

    pub fn listing(&self) -> &Listing<Event> {
        &self.events
    }

    /// Without a session this goes to the login screen instead of loading.
    pub async fn load(&mut self) -> bool {
        if let GuardDecision::Redirect(_) = self.ctx.check(Route::Profile) {
            self.ctx.navigate(Route::Profile);
            return false;
        }

        let api = self.ctx.api().clone();
        self.events
            .load_page(
                || async move { api.my_events(&EventQuery::default()).await },
                |page: &mut EventPage| std::mem::take(&mut page.events),
            )
            .await
            .is_some()
    }
}
