use eventos_api::Ack;

use crate::context::AppContext;
use crate::forms::TalkForm;
use crate::lifecycle::FormController;

pub const TALK_CREATED: &str = "Session created successfully";

/// New-session form. Opened from an event, the event id is preset and
/// survives the reset after each successful submission.
#[derive(Debug)]
pub struct TalkCreateView {
    ctx: AppContext,
    event_id: Option<i64>,
    form: FormController<TalkForm>,
}

impl TalkCreateView {
    pub fn new(ctx: AppContext, event_id: Option<i64>) -> Self {
        Self {
            ctx,
            event_id,
            form: FormController::new(Self::blank(event_id)),
        }
    }

    fn blank(event_id: Option<i64>) -> TalkForm {
        event_id.map(TalkForm::for_event).unwrap_or_default()
    }

    pub fn controller(&self) -> &FormController<TalkForm> {
        &self.form
    }

    pub fn edit(&mut self, apply: impl FnOnce(&mut TalkForm)) {
        self.form.edit(apply);
    }

    pub async fn submit(&mut self) -> Option<Ack> {
        let api = self.ctx.api().clone();
        let ack = self
            .form
            .submit_create(TALK_CREATED, move |payload| async move {
                api.create_talk(&payload).await
            })
            .await?;

        self.form.replace_form(Self::blank(self.event_id));
        Some(ack)
    }
}
