// ── Screens ──
//
// One controller per screen of the application, each owning a clone of
// the `AppContext`. Front ends drive them: set fields, call the async
// operation, then render `feedback()` and the loaded data.

mod attendance;
mod event_create;
mod event_detail;
mod event_list;
mod login;
mod profile;
mod register;
mod talk_create;
mod talk_update;

pub use attendance::AttendanceView;
pub use event_create::{EVENT_CREATED, EventCreateView};
pub use event_detail::{
    EVENT_DELETED, EVENT_JOINED, EVENT_LEFT, EVENT_UPDATED, EventDetailView,
};
pub use event_list::{EventListView, PageInfo};
pub use login::{LoginView, SIGNED_IN};
pub use profile::ProfileView;
pub use register::{REGISTERED, RegisterView};
pub use talk_create::{TALK_CREATED, TalkCreateView};
pub use talk_update::{SPEAKER_ASSIGNED, TALK_DELETED, TALK_JOINED, TALK_UPDATED, TalkUpdateView};
