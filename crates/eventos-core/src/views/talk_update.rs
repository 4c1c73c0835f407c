use eventos_api::Talk;

use crate::context::AppContext;
use crate::forms::TalkForm;
use crate::lifecycle::{FormController, ResourceController};
use crate::routes::Route;

pub const TALK_UPDATED: &str = "Session updated successfully";
pub const TALK_DELETED: &str = "Session deleted successfully";
pub const TALK_JOINED: &str = "You are registered for this session";
pub const SPEAKER_ASSIGNED: &str = "Speaker assigned successfully";

/// One session: edit, attendee registration, speaker assignment.
#[derive(Debug)]
pub struct TalkUpdateView {
    ctx: AppContext,
    id: i64,
    talk: ResourceController<Talk>,
    available: Option<i64>,
}

impl TalkUpdateView {
    pub fn new(ctx: AppContext, id: i64) -> Self {
        Self {
            ctx,
            id,
            talk: ResourceController::default(),
            available: None,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn talk(&self) -> Option<&Talk> {
        self.talk.record()
    }

    pub fn controller(&self) -> &ResourceController<Talk> {
        &self.talk
    }

    pub fn form(&self) -> &FormController<TalkForm> {
        self.talk.controller()
    }

    pub fn available(&self) -> Option<i64> {
        self.available
    }

    pub async fn load(&mut self) -> bool {
        let api = self.ctx.api().clone();
        let id = self.id;
        self.talk.load(|| async move { api.get_talk(id).await }).await
    }

    pub fn toggle_edit(&mut self) {
        self.talk.toggle_edit();
    }

    pub fn edit(&mut self, apply: impl FnOnce(&mut TalkForm)) {
        self.talk.edit(apply);
    }

    pub async fn update(&mut self) -> bool {
        let api = self.ctx.api().clone();
        let id = self.id;
        self.talk
            .submit_update(TALK_UPDATED, move |payload| async move {
                api.update_talk(id, &payload).await.map(|_| None)
            })
            .await
    }

    pub async fn register_attendee(&mut self) -> bool {
        let api = self.ctx.api().clone();
        let id = self.id;
        self.talk
            .run_action(&self.ctx, TALK_JOINED, || async move {
                api.join_talk(id).await
            })
            .await
            .is_some()
    }

    pub async fn assign_speaker(&mut self, speaker: &str) -> bool {
        let api = self.ctx.api().clone();
        let id = self.id;
        let name = speaker.trim().to_owned();
        let sent = name.clone();
        let assigned = self
            .talk
            .run_action(&self.ctx, SPEAKER_ASSIGNED, || async move {
                api.assign_speaker(id, &sent).await
            })
            .await
            .is_some();

        if assigned {
            if let Some(talk) = self.talk.record_mut() {
                talk.speaker = Some(name);
            }
        }
        assigned
    }

    /// Delete the session and return to its event, or home when the
    /// event is unknown.
    pub async fn delete(&mut self) -> bool {
        let api = self.ctx.api().clone();
        let id = self.id;
        let back = self
            .talk
            .record()
            .map_or(Route::Home, |talk| Route::EventDetail { id: talk.event_id });

        let deleted = self
            .talk
            .run_action(&self.ctx, TALK_DELETED, || async move {
                api.delete_talk(id).await
            })
            .await
            .is_some();

        if deleted {
            self.ctx.navigate(back);
        }
        deleted
    }

    pub async fn check_capacity(&mut self) -> Option<i64> {
        let api = self.ctx.api().clone();
        let id = self.id;
        let capacity = self
            .talk
            .query(|| async move { api.talk_capacity(id).await })
            .await?;
        self.available = Some(capacity.available);
        self.available
    }

    pub async fn settle(&mut self) {
        self.talk.settle().await;
    }
}
