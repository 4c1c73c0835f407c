// ── Form models ──
//
// Editable copies of what a user types. Every field is a `String`;
// validation turns a form into a typed wire payload or a map of issues
// keyed by the same field names the API uses in its `errors` bodies.

mod account;
mod event;
mod talk;
pub mod validate;

use std::fmt::Debug;

use crate::lifecycle::FieldErrors;

pub use account::{AccountPayload, LoginForm, RegisterForm};
pub use event::{EventForm, DEFAULT_EVENT_STATUS};
pub use talk::TalkForm;

pub trait FormModel: Clone + Default + PartialEq + Debug + Send + Sync {
    type Payload: Send;

    /// Check every field and build the payload, or report per-field issues.
    fn validate(&self) -> Result<Self::Payload, FieldErrors>;

    /// Back to an empty form.
    fn reset(&mut self) {
        *self = Self::default();
    }
}
