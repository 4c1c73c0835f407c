//! Async client for the eventos event-management HTTP API.
//!
//! - **[`ApiClient`]** joins endpoint paths onto a configured base URL,
//!   attaches `Authorization: Bearer` from a [`BearerSource`] on every call
//!   except login, and sorts failures into [`Error`] variants.
//! - **[`TransportConfig`]** builds the underlying `reqwest::Client`
//!   (timeout, TLS mode, user agent).
//! - **[`models`]** holds the wire types: [`Event`], [`Talk`] (a session
//!   inside an event), [`User`], pages and acknowledgements.
//!
//! The client never retries and never caches.

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod transport;

mod account;
mod events;
mod talks;

pub use auth::{BearerSource, LOGIN_PATH, REGISTER_PATH, StaticBearer};
pub use client::ApiClient;
pub use error::{Error, FieldMessages};
pub use models::{
    Ack, Attendance, Capacity, Event, EventPage, EventPayload, EventQuery, LoginResponse, Talk,
    TalkPayload, User,
};
pub use transport::{TlsMode, TransportConfig};
