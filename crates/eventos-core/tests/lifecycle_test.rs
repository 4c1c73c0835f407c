#![allow(clippy::unwrap_used)]
// View lifecycle against a mock API: validation, submission, field-error
// reconciliation, gated actions and navigation.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use eventos_core::forms::validate::REQUIRED;
use eventos_core::lifecycle::Phase;
use eventos_core::views::{EVENT_CREATED, EVENT_JOINED, REGISTERED, SIGNED_IN, TALK_CREATED};
use eventos_core::{
    AppContext, ClientConfig, CONNECTION_FAILED, DurableStorage, EventCreateView,
    EventDetailView, EventForm, EventListView, EventQuery, FORM_INVALID, Failure, LoginView,
    MemoryStorage, NavigationLog, ProfileView, RegisterView, Route, SIGN_IN_REQUIRED,
    TOKEN_KEY, TalkCreateView, TalkUpdateView, USER_KEY,
};

// ── Helpers ─────────────────────────────────────────────────────────

struct Harness {
    server: MockServer,
    ctx: AppContext,
    storage: Arc<MemoryStorage>,
    nav: Arc<NavigationLog>,
}

async fn harness(token: Option<&str>) -> Harness {
    let server = MockServer::start().await;
    let storage = Arc::new(MemoryStorage::new());
    if let Some(token) = token {
        storage.set(TOKEN_KEY, token).unwrap();
    }
    let nav = Arc::new(NavigationLog::new());
    let config = ClientConfig::new(Url::parse(&format!("{}/api", server.uri())).unwrap());
    let ctx = AppContext::new(&config, storage.clone(), nav.clone()).unwrap();
    Harness {
        server,
        ctx,
        storage,
        nav,
    }
}

fn event_json() -> serde_json::Value {
    json!({
        "id": 1,
        "nombre": "Evento Test",
        "descripcion": "Descripción del evento",
        "fecha_inicio": "2025-06-01T18:00:00",
        "fecha_fin": "2025-06-01T22:00:00",
        "capacidad_maxima": 100,
        "estado": "activo"
    })
}

fn talk_json() -> serde_json::Value {
    json!({
        "id": 3,
        "evento_id": 1,
        "nombre": "Rust en producción",
        "descripcion": "Charla",
        "fecha_inicio": "2025-06-01T18:30:00",
        "fecha_fin": "2025-06-01T19:30:00",
        "capacidad_maxima": 40,
        "ponente": "Ana"
    })
}

async fn mount_event(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/eventos/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_json()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/sesiones/1/sesiones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sesiones": [talk_json()]})))
        .mount(server)
        .await;
}

fn fill_event(form: &mut EventForm) {
    form.name = "Evento Test".into();
    form.description = "Descripción del evento".into();
    form.start_time = "2025-06-01T18:00:00".into();
    form.end_time = "2025-06-01T22:00:00".into();
    form.capacity = "100".into();
}

// ── Local validation ────────────────────────────────────────────────

#[tokio::test]
async fn test_local_validation_failure_sends_nothing() {
    let h = harness(Some("mock-token")).await;
    let mut view = EventCreateView::new(h.ctx.clone());

    assert!(view.submit().await.is_none());

    let controller = view.controller();
    assert_eq!(controller.error_message(), FORM_INVALID);
    assert!(controller.field_errors().is_empty());
    assert_eq!(controller.local_issues()["nombre"], REQUIRED);
    assert_eq!(controller.phase(), Phase::SubmitFailed);
    assert!(matches!(controller.last_failure(), Some(Failure::LocalValidation(_))));
    assert!(h.server.received_requests().await.unwrap().is_empty());
    assert!(h.nav.visited().is_empty());
}

// ── Creation ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_successful_create_resets_form_and_goes_home() {
    let h = harness(Some("mock-token")).await;

    Mock::given(method("POST"))
        .and(path("/api/eventos/crear"))
        .and(header("Authorization", "Bearer mock-token"))
        .and(body_json(json!({
            "nombre": "Evento Test",
            "descripcion": "Descripción del evento",
            "fecha_inicio": "2025-06-01T18:00:00",
            "fecha_fin": "2025-06-01T22:00:00",
            "capacidad_maxima": 100,
            "estado": "activo"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(event_json()))
        .expect(1)
        .mount(&h.server)
        .await;

    let mut view = EventCreateView::new(h.ctx.clone());
    view.edit(fill_event);
    let created = view.submit().await.unwrap();

    assert_eq!(created.id, 1);
    let controller = view.controller();
    assert_eq!(controller.success_message(), EVENT_CREATED);
    assert_eq!(controller.error_message(), "");
    assert_eq!(controller.form(), &EventForm::default());
    assert!(!controller.loading());
    assert_eq!(h.nav.last(), Some(Route::Home));
}

#[tokio::test]
async fn test_field_errors_land_in_their_slots() {
    let h = harness(Some("mock-token")).await;

    Mock::given(method("POST"))
        .and(path("/api/sesiones/crear"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": {
                "nombre": ["El nombre ya existe", "otro"],
                "ponente": ["El ponente no está disponible"]
            }
        })))
        .mount(&h.server)
        .await;

    let mut view = TalkCreateView::new(h.ctx.clone(), Some(1));
    view.edit(|form| {
        form.name = "Rust en producción".into();
        form.start_time = "2025-06-01 18:30".into();
        form.end_time = "2025-06-01 19:30".into();
        form.capacity = "40".into();
        form.speaker = "Ana".into();
    });
    assert!(view.submit().await.is_none());

    let controller = view.controller();
    assert_eq!(controller.error_message(), "");
    assert_eq!(controller.success_message(), "");
    assert_eq!(controller.feedback().field_error("nombre"), Some("El nombre ya existe"));
    assert_eq!(
        controller.feedback().field_error("ponente"),
        Some("El ponente no está disponible")
    );
    // Entered values survive the failure.
    assert_eq!(controller.form().name, "Rust en producción");
    assert_eq!(controller.form().event_id, "1");
}

#[tokio::test]
async fn test_talk_create_keeps_preset_event_after_reset() {
    let h = harness(Some("mock-token")).await;

    Mock::given(method("POST"))
        .and(path("/api/sesiones/crear"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"message": "Sesión creada exitosamente"})),
        )
        .mount(&h.server)
        .await;

    let mut view = TalkCreateView::new(h.ctx.clone(), Some(1));
    view.edit(|form| {
        form.name = "Rust en producción".into();
        form.start_time = "2025-06-01 18:30".into();
        form.end_time = "2025-06-01 19:30".into();
        form.capacity = "40".into();
        form.speaker = "Ana".into();
    });
    assert!(view.submit().await.is_some());

    assert_eq!(view.controller().success_message(), TALK_CREATED);
    assert_eq!(view.controller().form().event_id, "1");
    assert!(view.controller().form().name.is_empty());
}

// ── Gated actions ───────────────────────────────────────────────────

#[tokio::test]
async fn test_gated_action_without_session_redirects_to_login() {
    let h = harness(None).await;
    mount_event(&h.server).await;

    Mock::given(method("POST"))
        .and(path("/api/eventos/1/registrarse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .expect(0)
        .mount(&h.server)
        .await;

    let mut view = EventDetailView::new(h.ctx.clone(), 1);
    assert!(view.load().await);
    assert!(!view.register().await);

    assert_eq!(view.controller().error_message(), SIGN_IN_REQUIRED);
    assert_eq!(
        view.controller().controller().last_failure(),
        Some(&Failure::AuthRequired)
    );

    view.settle().await;
    assert_eq!(h.nav.visited(), vec![Route::Login]);
}

#[tokio::test]
async fn test_gated_action_with_session_sends_bearer() {
    let h = harness(Some("mock-token")).await;
    mount_event(&h.server).await;

    Mock::given(method("POST"))
        .and(path("/api/eventos/1/registrarse"))
        .and(header("Authorization", "Bearer mock-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Registro exitoso"})),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    let mut view = EventDetailView::new(h.ctx.clone(), 1);
    view.load().await;
    assert!(view.register().await);
    assert_eq!(view.controller().success_message(), EVENT_JOINED);
    assert_eq!(view.controller().phase(), Phase::Viewing);
}

// ── Load / edit ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_toggle_edit_without_changes_mirrors_record() {
    let h = harness(Some("mock-token")).await;
    mount_event(&h.server).await;

    let mut view = EventDetailView::new(h.ctx.clone(), 1);
    assert!(view.load().await);
    assert_eq!(view.event().unwrap().status, "activo");
    assert_eq!(view.talks().len(), 1);

    view.toggle_edit();
    assert!(view.controller().is_editing());
    assert_eq!(
        view.form().form(),
        &EventForm::from(view.event().unwrap())
    );

    view.edit(|form| form.name = "Cambiado".into());
    view.toggle_edit();
    assert!(!view.controller().is_editing());
    assert_eq!(view.form().form().name, "Evento Test");
}

#[tokio::test]
async fn test_load_failure_stays_put() {
    let h = harness(None).await;

    Mock::given(method("GET"))
        .and(path("/api/eventos/99"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "Evento no encontrado"})),
        )
        .mount(&h.server)
        .await;

    let mut view = EventDetailView::new(h.ctx.clone(), 99);
    assert!(!view.load().await);

    assert_eq!(view.controller().phase(), Phase::LoadFailed);
    assert_eq!(view.controller().error_message(), "Evento no encontrado");
    assert!(!view.controller().loading());
    assert!(view.event().is_none());
    assert!(h.nav.visited().is_empty());
}

#[tokio::test]
async fn test_event_update_rejected_keeps_editing_and_summarises() {
    let h = harness(Some("mock-token")).await;
    mount_event(&h.server).await;

    Mock::given(method("PUT"))
        .and(path("/api/eventos/1/actualizar"))
        .and(body_json(json!({
            "nombre": "Evento Test Actualizado",
            "descripcion": "Descripción actualizada",
            "fecha_inicio": "2025-06-01 18:00:00",
            "fecha_fin": "2025-06-01 22:00:00",
            "capacidad_maxima": 100,
            "estado": "activo"
        })))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": {
                "nombre": ["El nombre ya está en uso"],
                "descripcion": ["La descripción es demasiado corta"]
            }
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let mut view = EventDetailView::new(h.ctx.clone(), 1);
    view.load().await;
    view.toggle_edit();
    view.edit(|form| {
        form.name = "Evento Test Actualizado".into();
        form.description = "Descripción actualizada".into();
        form.start_time = "2025-06-01 18:00:00".into();
        form.end_time = "2025-06-01 22:00:00".into();
        form.capacity = "100".into();
        form.status = "activo".into();
    });
    assert!(!view.update().await);

    let controller = view.controller();
    assert!(controller.error_message().contains("El nombre ya está en uso"));
    assert!(controller.error_message().contains("La descripción es demasiado corta"));
    assert!(controller.field_errors().is_empty());
    assert!(controller.is_editing());
    assert_eq!(controller.phase(), Phase::Editing);
    assert_eq!(controller.form().name, "Evento Test Actualizado");
    assert_eq!(controller.record().unwrap().name, "Evento Test");
    assert!(h.nav.visited().is_empty());
}

#[tokio::test]
async fn test_event_update_applies_payload_on_success() {
    let h = harness(Some("mock-token")).await;
    mount_event(&h.server).await;

    Mock::given(method("PUT"))
        .and(path("/api/eventos/1/actualizar"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "Evento actualizado exitosamente"})),
        )
        .mount(&h.server)
        .await;

    let mut view = EventDetailView::new(h.ctx.clone(), 1);
    view.load().await;
    view.toggle_edit();
    view.edit(|form| form.capacity = "150".into());
    assert!(view.update().await);

    assert_eq!(view.event().unwrap().capacity, 150);
    assert!(!view.controller().is_editing());
    assert_eq!(view.controller().phase(), Phase::Viewing);
    assert!(!view.controller().success_message().is_empty());
}

// ── Accounts ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_success_clears_error_and_goes_home() {
    let h = harness(None).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "test@example.com", "password": "password123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "token": "mock-token",
            "user": {"id": 1, "email": "test@example.com"}
        })))
        .mount(&h.server)
        .await;

    let mut view = LoginView::new(h.ctx.clone());
    view.edit(|form| {
        form.email = "test@example.com".into();
        form.password = "password123".into();
    });
    assert!(view.submit().await);

    assert_eq!(view.controller().error_message(), "");
    assert_eq!(view.controller().success_message(), SIGNED_IN);
    assert!(h.ctx.is_authenticated());
    assert_eq!(h.storage.get(TOKEN_KEY).unwrap().as_deref(), Some("mock-token"));
    assert!(h.storage.get(USER_KEY).unwrap().is_some());
    assert_eq!(h.nav.last(), Some(Route::Home));
}

#[tokio::test]
async fn test_login_failure_shows_server_message() {
    let h = harness(None).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Credenciales inválidas"})),
        )
        .mount(&h.server)
        .await;

    let mut view = LoginView::new(h.ctx.clone());
    view.edit(|form| {
        form.email = "test@example.com".into();
        form.password = "wrong-password".into();
    });
    assert!(!view.submit().await);

    assert_eq!(view.controller().error_message(), "Credenciales inválidas");
    assert_eq!(view.controller().form().email, "test@example.com");
    assert!(!h.ctx.is_authenticated());
    assert!(h.nav.visited().is_empty());
}

#[tokio::test]
async fn test_login_without_server_reports_connection_error() {
    let storage = Arc::new(MemoryStorage::new());
    let nav = Arc::new(NavigationLog::new());
    let mut config = ClientConfig::new(Url::parse("http://127.0.0.1:9/api").unwrap());
    config.timeout = Duration::from_secs(2);
    let ctx = AppContext::new(&config, storage, nav).unwrap();

    let mut view = LoginView::new(ctx);
    view.edit(|form| {
        form.email = "test@example.com".into();
        form.password = "password123".into();
    });
    assert!(!view.submit().await);
    assert_eq!(view.controller().error_message(), CONNECTION_FAILED);
}

#[tokio::test]
async fn test_register_field_errors_without_redirect() {
    let h = harness(None).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(body_json(json!({"email": "test@example.com", "password": "weak"})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": {
                "email": ["El correo ya está en uso"],
                "password": ["La contraseña es demasiado débil"]
            }
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let mut view = RegisterView::new(h.ctx.clone());
    view.edit(|form| {
        form.email = "test@example.com".into();
        form.password = "weak".into();
    });
    assert!(view.submit().await.is_none());

    let feedback = view.controller().feedback();
    assert_eq!(feedback.field_error("email"), Some("El correo ya está en uso"));
    assert_eq!(
        feedback.field_error("password"),
        Some("La contraseña es demasiado débil")
    );
    assert_eq!(feedback.error_message(), "");
    assert!(h.nav.visited().is_empty());
}

#[tokio::test]
async fn test_register_success_clears_form() {
    let h = harness(None).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"success": true})))
        .mount(&h.server)
        .await;

    let mut view = RegisterView::new(h.ctx.clone());
    view.edit(|form| {
        form.email = "test@example.com".into();
        form.password = "password123".into();
    });
    assert!(view.submit().await.is_some());

    assert_eq!(view.controller().success_message(), REGISTERED);
    assert!(view.controller().form().email.is_empty());
    assert!(view.controller().form().password.is_empty());
    assert!(view.controller().field_errors().is_empty());
    assert!(h.nav.visited().is_empty());
}

#[tokio::test]
async fn test_loading_is_observable_while_in_flight() {
    let h = harness(None).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"success": true}))
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&h.server)
        .await;

    let mut view = RegisterView::new(h.ctx.clone());
    view.edit(|form| {
        form.email = "test@example.com".into();
        form.password = "password123".into();
    });
    let mut states = view.controller().subscribe();

    let (ack, saw_loading) = tokio::join!(view.submit(), async {
        states.wait_for(|state| state.loading).await.is_ok()
    });

    assert!(ack.is_some());
    assert!(saw_loading);
    assert!(!view.controller().loading());
    assert!(!states.borrow().loading);
}

// ── Listings ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_event_list_pages() {
    let h = harness(None).await;

    Mock::given(method("GET"))
        .and(path("/api/eventos/eventos"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "eventos": [event_json()],
            "total": 11,
            "page": 2,
            "per_page": 10,
            "total_pages": 2
        })))
        .mount(&h.server)
        .await;

    let mut view = EventListView::new(h.ctx.clone());
    view.set_query(EventQuery {
        page: Some(2),
        ..EventQuery::default()
    });
    assert!(view.load().await);

    assert_eq!(view.events().len(), 1);
    assert_eq!(view.page_info().total, 11);
    assert_eq!(view.page_info().total_pages, Some(2));
    assert_eq!(view.open(1), Route::EventDetail { id: 1 });
}

#[tokio::test]
async fn test_profile_without_session_goes_to_login() {
    let h = harness(None).await;
    let mut view = ProfileView::new(h.ctx.clone());

    assert!(!view.load().await);
    assert_eq!(h.nav.visited(), vec![Route::Login]);
    assert!(h.server.received_requests().await.unwrap().is_empty());
}

// ── Sessions ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_speaker_assignment_updates_local_record() {
    let h = harness(Some("mock-token")).await;

    Mock::given(method("GET"))
        .and(path("/api/sesiones/sesiones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sesiones": [talk_json()]})))
        .mount(&h.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/sesiones/asignar_ponente/3"))
        .and(body_json(json!({"ponente": "Luis"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Ponente asignado"})),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    let mut view = TalkUpdateView::new(h.ctx.clone(), 3);
    assert!(view.load().await);
    assert!(view.assign_speaker(" Luis ").await);
    assert_eq!(view.talk().unwrap().speaker.as_deref(), Some("Luis"));
}
