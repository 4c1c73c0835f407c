use eventos_api::Event;

use crate::context::AppContext;
use crate::forms::EventForm;
use crate::lifecycle::FormController;
use crate::routes::Route;

pub const EVENT_CREATED: &str = "Event created successfully";

/// New-event form. Success clears the form and returns home.
#[derive(Debug)]
pub struct EventCreateView {
    ctx: AppContext,
    form: FormController<EventForm>,
}

impl EventCreateView {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            form: FormController::default(),
        }
    }

    pub fn controller(&self) -> &FormController<EventForm> {
        &self.form
    }

    pub fn edit(&mut self, apply: impl FnOnce(&mut EventForm)) {
        self.form.edit(apply);
    }

    pub async fn submit(&mut self) -> Option<Event> {
        let api = self.ctx.api().clone();
        let created = self
            .form
            .submit_create(EVENT_CREATED, move |payload| async move {
                api.create_event(&payload).await
            })
            .await?;

        self.ctx.navigate(Route::Home);
        Some(created)
    }
}
