use crate::context::AppContext;
use crate::forms::LoginForm;
use crate::lifecycle::FormController;
use crate::routes::Route;

pub const SIGNED_IN: &str = "Signed in";

/// Sign-in screen. Success stores the session and goes home.
#[derive(Debug)]
pub struct LoginView {
    ctx: AppContext,
    form: FormController<LoginForm>,
}

impl LoginView {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            form: FormController::default(),
        }
    }

    pub fn controller(&self) -> &FormController<LoginForm> {
        &self.form
    }

    pub fn edit(&mut self, apply: impl FnOnce(&mut LoginForm)) {
        self.form.edit(apply);
    }

    pub async fn submit(&mut self) -> bool {
        let ctx = self.ctx.clone();
        let signed_in = self
            .form
            .submit(SIGNED_IN, move |credentials| async move {
                ctx.session()
                    .login(ctx.api(), &credentials.email, &credentials.password)
                    .await
            })
            .await
            .is_some();

        if signed_in {
            self.form.reset_form();
            self.ctx.navigate(Route::Home);
        }
        signed_in
    }
}
