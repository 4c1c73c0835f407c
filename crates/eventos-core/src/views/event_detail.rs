use eventos_api::{Event, Talk};

use crate::context::AppContext;
use crate::forms::EventForm;
use crate::lifecycle::{ErrorPresentation, FormController, Listing, ResourceController};
use crate::routes::Route;

pub const EVENT_UPDATED: &str = "Event updated successfully";
pub const EVENT_DELETED: &str = "Event deleted successfully";
pub const EVENT_JOINED: &str = "You are registered for this event";
pub const EVENT_LEFT: &str = "Your registration was cancelled";

/// One event with its sessions. Editing shows server field errors as a
/// single summary line above the form.
#[derive(Debug)]
pub struct EventDetailView {
    ctx: AppContext,
    id: i64,
    event: ResourceController<Event>,
    talks: Listing<Talk>,
    available: Option<i64>,
}

impl EventDetailView {
    pub fn new(ctx: AppContext, id: i64) -> Self {
        Self {
            ctx,
            id,
            event: ResourceController::new(ErrorPresentation::Summary),
            talks: Listing::new(),
            available: None,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn event(&self) -> Option<&Event> {
        self.event.record()
    }

    pub fn controller(&self) -> &ResourceController<Event> {
        &self.event
    }

    pub fn form(&self) -> &FormController<EventForm> {
        self.event.controller()
    }

    pub fn talks(&self) -> &[Talk] {
        self.talks.items()
    }

    pub fn talk_listing(&self) -> &Listing<Talk> {
        &self.talks
    }

    /// Seats left, once [`check_capacity`](Self::check_capacity) has run.
    pub fn available(&self) -> Option<i64> {
        self.available
    }

    /// Fetch the event, then its sessions. Sessions are only requested
    /// when the event itself loaded.
    pub async fn load(&mut self) -> bool {
        let api = self.ctx.api().clone();
        let id = self.id;
        if !self.event.load(|| async move { api.get_event(id).await }).await {
            return false;
        }

        let api = self.ctx.api().clone();
        self.talks
            .load(|| async move { api.talks_for_event(id).await })
            .await;
        true
    }

    pub fn toggle_edit(&mut self) {
        self.event.toggle_edit();
    }

    pub fn edit(&mut self, apply: impl FnOnce(&mut EventForm)) {
        self.event.edit(apply);
    }

    pub async fn update(&mut self) -> bool {
        let api = self.ctx.api().clone();
        let id = self.id;
        self.event
            .submit_update(EVENT_UPDATED, move |payload| async move {
                api.update_event(id, &payload).await.map(|_| None)
            })
            .await
    }

    pub async fn register(&mut self) -> bool {
        let api = self.ctx.api().clone();
        let id = self.id;
        self.event
            .run_action(&self.ctx, EVENT_JOINED, || async move {
                api.join_event(id).await
            })
            .await
            .is_some()
    }

    pub async fn unregister(&mut self) -> bool {
        let api = self.ctx.api().clone();
        let id = self.id;
        self.event
            .run_action(&self.ctx, EVENT_LEFT, || async move {
                api.leave_event(id).await
            })
            .await
            .is_some()
    }

    /// Delete the event and go home.
    pub async fn delete(&mut self) -> bool {
        let api = self.ctx.api().clone();
        let id = self.id;
        let deleted = self
            .event
            .run_action(&self.ctx, EVENT_DELETED, || async move {
                api.delete_event(id).await
            })
            .await
            .is_some();

        if deleted {
            self.ctx.navigate(Route::Home);
        }
        deleted
    }

    pub async fn check_capacity(&mut self) -> Option<i64> {
        let api = self.ctx.api().clone();
        let id = self.id;
        let capacity = self
            .event
            .query(|| async move { api.event_capacity(id).await })
            .await?;
        self.available = Some(capacity.available);
        self.available
    }

    /// Wait for a scheduled sign-in redirect.
    pub async fn settle(&mut self) {
        self.event.settle().await;
    }
}
