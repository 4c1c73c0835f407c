// Wire models for the eventos API.
//
// The server speaks Spanish field names; Rust-side names are English and
// serde renames bridge the two. Date-times stay as the strings the server
// sends (`2025-06-01T18:00:00`) so they round-trip unchanged through edit
// forms.

use serde::{Deserialize, Serialize};

// ── Accounts ────────────────────────────────────────────────────────

/// The signed-in user as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

/// Generic acknowledgement body (`{"message": ...}` / `{"success": ...}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
}

// ── Events ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "fecha_inicio")]
    pub start_time: String,
    #[serde(rename = "fecha_fin")]
    pub end_time: String,
    #[serde(rename = "capacidad_maxima")]
    pub capacity: i64,
    #[serde(rename = "estado", default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "activo".into()
}

/// Body of `POST /eventos/crear` and `PUT /eventos/{id}/actualizar`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPayload {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "fecha_inicio")]
    pub start_time: String,
    #[serde(rename = "fecha_fin")]
    pub end_time: String,
    #[serde(rename = "capacidad_maxima")]
    pub capacity: i64,
    #[serde(rename = "estado")]
    pub status: String,
}

/// One page of `GET /eventos/eventos` or `GET /eventos/mis-eventos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPage {
    #[serde(rename = "eventos")]
    pub events: Vec<Event>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

/// Paging and name filter for event listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQuery {
    pub name: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl EventQuery {
    pub(crate) fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            pairs.push(("nombre", name.to_owned()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            pairs.push(("per_page", per_page.to_string()));
        }
        pairs
    }
}

/// Remaining seats for an event or session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capacity {
    #[serde(rename = "capacidad_disponible")]
    pub available: i64,
}

// ── Sessions ────────────────────────────────────────────────────────

/// A session (talk, workshop) inside an event.
///
/// Named `Talk` so it never gets confused with the authentication session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Talk {
    pub id: i64,
    #[serde(rename = "evento_id")]
    pub event_id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "fecha_inicio")]
    pub start_time: String,
    #[serde(rename = "fecha_fin")]
    pub end_time: String,
    #[serde(rename = "capacidad_maxima")]
    pub capacity: i64,
    #[serde(rename = "ponente", default)]
    pub speaker: Option<String>,
    #[serde(
        rename = "asistentes_actuales",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub attendees: Option<i64>,
    #[serde(
        rename = "capacidad_disponible",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub available: Option<i64>,
}

/// Body of `POST /sesiones/crear` and `PUT /sesiones/actualizar/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TalkPayload {
    #[serde(rename = "evento_id")]
    pub event_id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "fecha_inicio")]
    pub start_time: String,
    #[serde(rename = "fecha_fin")]
    pub end_time: String,
    #[serde(rename = "capacidad_maxima")]
    pub capacity: i64,
    #[serde(rename = "ponente")]
    pub speaker: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TalkList {
    #[serde(rename = "sesiones")]
    pub talks: Vec<Talk>,
}

/// One attendee/session pairing from `GET /sesiones/asistencias`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    #[serde(rename = "usuario_id")]
    pub user_id: i64,
    pub email: String,
    #[serde(rename = "sesion_id")]
    pub talk_id: i64,
    #[serde(rename = "nombre_sesion")]
    pub talk_name: String,
    #[serde(rename = "fecha_inicio")]
    pub start_time: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AttendanceList {
    #[serde(rename = "asistencias")]
    pub entries: Vec<Attendance>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SpeakerAssignment<'a> {
    #[serde(rename = "ponente")]
    pub speaker: &'a str,
}
