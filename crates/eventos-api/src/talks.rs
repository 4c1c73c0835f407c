// Session endpoints
//
// Everything under `/sesiones`. The API has no single-session GET, so
// `get_talk` filters the full listing.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    Ack, Attendance, AttendanceList, Capacity, SpeakerAssignment, Talk, TalkList, TalkPayload,
};

impl ApiClient {
    /// All sessions with live attendee counts.
    ///
    /// `GET /sesiones/sesiones`
    pub async fn list_talks(&self) -> Result<Vec<Talk>, Error> {
        debug!("listing sessions");
        let list: TalkList = self.get("/sesiones/sesiones", &[]).await?;
        Ok(list.talks)
    }

    /// Sessions belonging to one event.
    ///
    /// `GET /sesiones/{event_id}/sesiones`
    pub async fn talks_for_event(&self, event_id: i64) -> Result<Vec<Talk>, Error> {
        debug!(event_id, "listing sessions for event");
        self.get(&format!("/sesiones/{event_id}/sesiones"), &[])
            .await
    }

    /// A single session, looked up in the full listing.
    ///
    /// Yields `Error::Api { status: 404, .. }` when no session has that id.
    pub async fn get_talk(&self, id: i64) -> Result<Talk, Error> {
        self.list_talks()
            .await?
            .into_iter()
            .find(|talk| talk.id == id)
            .ok_or_else(|| Error::Api {
                status: 404,
                message: Some(format!("Session {id} not found")),
            })
    }

    /// Create a session.
    ///
    /// `POST /sesiones/crear`
    pub async fn create_talk(&self, payload: &TalkPayload) -> Result<Ack, Error> {
        debug!(name = %payload.name, event_id = payload.event_id, "creating session");
        self.post("/sesiones/crear", payload).await
    }

    /// Replace a session's fields.
    ///
    /// `PUT /sesiones/actualizar/{id}`
    pub async fn update_talk(&self, id: i64, payload: &TalkPayload) -> Result<Ack, Error> {
        debug!(id, "updating session");
        self.put(&format!("/sesiones/actualizar/{id}"), payload).await
    }

    /// Delete a session.
    ///
    /// `DELETE /sesiones/eliminar/{id}`
    pub async fn delete_talk(&self, id: i64) -> Result<Ack, Error> {
        debug!(id, "deleting session");
        let ack: Option<Ack> = self.delete(&format!("/sesiones/eliminar/{id}")).await?;
        Ok(ack.unwrap_or_default())
    }

    /// Remaining seats for a session.
    ///
    /// `GET /sesiones/validar_capacidad/{id}`
    pub async fn talk_capacity(&self, id: i64) -> Result<Capacity, Error> {
        self.get(&format!("/sesiones/validar_capacidad/{id}"), &[])
            .await
    }

    /// Register the signed-in user for a session.
    ///
    /// `POST /sesiones/registrar_asistente/{id}`
    pub async fn join_talk(&self, id: i64) -> Result<Ack, Error> {
        debug!(id, "registering for session");
        self.post_empty(&format!("/sesiones/registrar_asistente/{id}"))
            .await
    }

    /// Every attendee/session pairing.
    ///
    /// `GET /sesiones/asistencias`
    pub async fn attendance(&self) -> Result<Vec<Attendance>, Error> {
        let list: AttendanceList = self.get("/sesiones/asistencias", &[]).await?;
        Ok(list.entries)
    }

    /// Set the speaker of a session.
    ///
    /// `PUT /sesiones/asignar_ponente/{id}` with `{"ponente": ...}`
    pub async fn assign_speaker(&self, id: i64, speaker: &str) -> Result<Ack, Error> {
        debug!(id, speaker, "assigning speaker");
        self.put(
            &format!("/sesiones/asignar_ponente/{id}"),
            &SpeakerAssignment { speaker },
        )
        .await
    }
}
