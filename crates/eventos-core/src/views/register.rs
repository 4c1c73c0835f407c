use eventos_api::Ack;

use crate::context::AppContext;
use crate::forms::RegisterForm;
use crate::lifecycle::FormController;

pub const REGISTERED: &str = "User registered successfully. Please sign in.";

/// Account creation. Never navigates; the user signs in afterwards.
#[derive(Debug)]
pub struct RegisterView {
    ctx: AppContext,
    form: FormController<RegisterForm>,
}

impl RegisterView {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            form: FormController::default(),
        }
    }

    pub fn controller(&self) -> &FormController<RegisterForm> {
        &self.form
    }

    pub fn edit(&mut self, apply: impl FnOnce(&mut RegisterForm)) {
        self.form.edit(apply);
    }

    pub async fn submit(&mut self) -> Option<Ack> {
        let api = self.ctx.api().clone();
        self.form
            .submit_create(REGISTERED, move |account| async move {
                api.register(&account.email, &account.password).await
            })
            .await
    }
}
