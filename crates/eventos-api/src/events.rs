// Event endpoints
//
// Everything under `/eventos`: paged listing, CRUD, attendee
// registration, and capacity checks.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Ack, Capacity, Event, EventPage, EventPayload, EventQuery};

impl ApiClient {
    /// List events, optionally filtered by name, one page at a time.
    ///
    /// `GET /eventos/eventos?nombre=&page=&per_page=`
    pub async fn list_events(&self, query: &EventQuery) -> Result<EventPage, Error> {
        debug!(?query, "listing events");
        self.get("/eventos/eventos", &query.to_pairs()).await
    }

    /// Search events by name without paging.
    ///
    /// `GET /eventos/buscar?nombre=`
    pub async fn search_events(&self, name: &str) -> Result<Vec<Event>, Error> {
        debug!(name, "searching events");
        self.get("/eventos/buscar", &[("nombre", name.to_owned())])
            .await
    }

    /// Fetch a single event.
    ///
    /// `GET /eventos/{id}`
    pub async fn get_event(&self, id: i64) -> Result<Event, Error> {
        debug!(id, "fetching event");
        self.get(&format!("/eventos/{id}"), &[]).await
    }

    /// Create an event; the server echoes the stored record.
    ///
    /// `POST /eventos/crear`
    pub async fn create_event(&self, payload: &EventPayload) -> Result<Event, Error> {
        debug!(name = %payload.name, "creating event");
        self.post("/eventos/crear", payload).await
    }

    /// Replace an event's fields.
    ///
    /// `PUT /eventos/{id}/actualizar`
    pub async fn update_event(&self, id: i64, payload: &EventPayload) -> Result<Ack, Error> {
        debug!(id, "updating event");
        self.put(&format!("/eventos/{id}/actualizar"), payload).await
    }

    /// Delete an event.
    ///
    /// `DELETE /eventos/{id}/eliminar`
    pub async fn delete_event(&self, id: i64) -> Result<Ack, Error> {
        debug!(id, "deleting event");
        let ack: Option<Ack> = self.delete(&format!("/eventos/{id}/eliminar")).await?;
        Ok(ack.unwrap_or_default())
    }

    /// Register the signed-in user as an attendee.
    ///
    /// `POST /eventos/{id}/registrarse`
    pub async fn join_event(&self, id: i64) -> Result<Ack, Error> {
        debug!(id, "registering for event");
        self.post_empty(&format!("/eventos/{id}/registrarse")).await
    }

    /// Withdraw the signed-in user's registration.
    ///
    /// `DELETE /eventos/{id}/eliminar-registro`
    pub async fn leave_event(&self, id: i64) -> Result<Ack, Error> {
        debug!(id, "withdrawing event registration");
        let ack: Option<Ack> = self
            .delete(&format!("/eventos/{id}/eliminar-registro"))
            .await?;
        Ok(ack.unwrap_or_default())
    }

    /// Remaining seats for an event.
    ///
    /// `GET /eventos/{id}/validar-capacidad`
    pub async fn event_capacity(&self, id: i64) -> Result<Capacity, Error> {
        self.get(&format!("/eventos/{id}/validar-capacidad"), &[])
            .await
    }

    /// Events the signed-in user is registered for.
    ///
    /// `GET /eventos/mis-eventos?page=&per_page=`
    pub async fn my_events(&self, query: &EventQuery) -> Result<EventPage, Error> {
        debug!("listing my events");
        let pairs: Vec<_> = query
            .to_pairs()
            .into_iter()
            .filter(|(key, _)| *key != "nombre")
            .collect();
        self.get("/eventos/mis-eventos", &pairs).await
    }
}
