use eventos_api::{Event, EventPayload};

use super::FormModel;
use super::validate::Checks;
use crate::lifecycle::{FieldErrors, Resource};

/// Status given to new events.
pub const DEFAULT_EVENT_STATUS: &str = "activo";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventForm {
    pub name: String,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
    pub capacity: String,
    pub status: String,
}

impl Default for EventForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            start_time: String::new(),
            end_time: String::new(),
            capacity: String::new(),
            status: DEFAULT_EVENT_STATUS.to_owned(),
        }
    }
}

impl From<&Event> for EventForm {
    fn from(event: &Event) -> Self {
        Self {
            name: event.name.clone(),
            description: event.description.clone().unwrap_or_default(),
            start_time: event.start_time.clone(),
            end_time: event.end_time.clone(),
            capacity: event.capacity.to_string(),
            status: event.status.clone(),
        }
    }
}

impl FormModel for EventForm {
    type Payload = EventPayload;

    fn validate(&self) -> Result<EventPayload, FieldErrors> {
        let mut checks = Checks::new();
        let name = checks.required("nombre", &self.name);
        let start = checks.datetime("fecha_inicio", &self.start_time);
        let end = checks.datetime("fecha_fin", &self.end_time);
        checks.end_after_start("fecha_fin", start.as_ref(), end.as_ref());
        let capacity = checks.positive_int("capacidad_maxima", &self.capacity);
        let status = match self.status.trim() {
            "" => DEFAULT_EVENT_STATUS.to_owned(),
            other => other.to_owned(),
        };

        checks.finish(|| {
            Some(EventPayload {
                name: name?,
                description: self.description.trim().to_owned(),
                start_time: start?.0,
                end_time: end?.0,
                capacity: capacity?,
                status,
            })
        })
    }
}

impl Resource for Event {
    type Form = EventForm;

    fn apply(&mut self, payload: &EventPayload) {
        self.name.clone_from(&payload.name);
        self.description = Some(payload.description.clone());
        self.start_time.clone_from(&payload.start_time);
        self.end_time.clone_from(&payload.end_time);
        self.capacity = payload.capacity;
        self.status.clone_from(&payload.status);
    }
}
