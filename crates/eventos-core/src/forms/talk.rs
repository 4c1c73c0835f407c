use eventos_api::{Talk, TalkPayload};

use super::FormModel;
use super::validate::Checks;
use crate::lifecycle::{FieldErrors, Resource};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TalkForm {
    pub event_id: String,
    pub name: String,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
    pub capacity: String,
    pub speaker: String,
}

impl TalkForm {
    /// An empty form already pointing at `event_id`.
    pub fn for_event(event_id: i64) -> Self {
        Self {
            event_id: event_id.to_string(),
            ..Self::default()
        }
    }
}

impl From<&Talk> for TalkForm {
    fn from(talk: &Talk) -> Self {
        Self {
            event_id: talk.event_id.to_string(),
            name: talk.name.clone(),
            description: talk.description.clone().unwrap_or_default(),
            start_time: talk.start_time.clone(),
            end_time: talk.end_time.clone(),
            capacity: talk.capacity.to_string(),
            speaker: talk.speaker.clone().unwrap_or_default(),
        }
    }
}

impl FormModel for TalkForm {
    type Payload = TalkPayload;

    fn validate(&self) -> Result<TalkPayload, FieldErrors> {
        let mut checks = Checks::new();
        let event_id = checks.identifier("evento_id", &self.event_id);
        let name = checks.required("nombre", &self.name);
        let start = checks.datetime("fecha_inicio", &self.start_time);
        let end = checks.datetime("fecha_fin", &self.end_time);
        checks.end_after_start("fecha_fin", start.as_ref(), end.as_ref());
        let capacity = checks.positive_int("capacidad_maxima", &self.capacity);
        let speaker = checks.required("ponente", &self.speaker);

        checks.finish(|| {
            Some(TalkPayload {
                event_id: event_id?,
                name: name?,
                description: self.description.trim().to_owned(),
                start_time: start?.0,
                end_time: end?.0,
                capacity: capacity?,
                speaker: speaker?,
            })
        })
    }
}

impl Resource for Talk {
    type Form = TalkForm;

    fn apply(&mut self, payload: &TalkPayload) {
        self.event_id = payload.event_id;
        self.name.clone_from(&payload.name);
        self.description = Some(payload.description.clone());
        self.start_time.clone_from(&payload.start_time);
        self.end_time.clone_from(&payload.end_time);
        self.capacity = payload.capacity;
        self.speaker = Some(payload.speaker.clone());
    }
}
