// ── View lifecycle ──
//
// Load → view ⇄ edit → submit → reconcile, shared by every screen.

mod controller;
mod feedback;
mod listing;
mod phase;

pub use controller::{FormController, Resource, ResourceController};
pub use feedback::{
    ErrorPresentation, Feedback, FieldErrors, FORM_INVALID, LOAD_FAILED, REQUEST_FAILED,
    SIGN_IN_REQUIRED,
};
pub use listing::Listing;
pub use phase::{Phase, ViewState};
