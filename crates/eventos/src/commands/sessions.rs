//! Session (talk) command handlers.

use serde::Serialize;
use tabled::Tabled;

use eventos_core::views::{AttendanceView, TALK_CREATED, TalkCreateView, TalkUpdateView};
use eventos_core::{AppContext, Attendance, Listing, Route, Talk, TalkForm};

use crate::cli::{GlobalOpts, SessionsArgs, SessionsCommand, TalkFields};
use crate::error::CliError;
use crate::output;

use super::util::{self, Subject};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct TalkRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Event")]
    event: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Capacity")]
    capacity: i64,
    #[tabled(rename = "Speaker")]
    speaker: String,
}

impl From<&Talk> for TalkRow {
    fn from(t: &Talk) -> Self {
        Self {
            id: t.id,
            event: t.event_id,
            name: t.name.clone(),
            start: t.start_time.clone(),
            end: t.end_time.clone(),
            capacity: t.capacity,
            speaker: t.speaker.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct AttendanceRow {
    #[tabled(rename = "User")]
    user: i64,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Session")]
    talk: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Start")]
    start: String,
}

impl From<&Attendance> for AttendanceRow {
    fn from(a: &Attendance) -> Self {
        Self {
            user: a.user_id,
            email: a.email.clone(),
            talk: a.talk_id,
            name: a.talk_name.clone(),
            start: a.start_time.clone(),
        }
    }
}

fn detail(t: &Talk) -> String {
    let mut lines = vec![
        format!("ID:          {}", t.id),
        format!("Event:       {}", t.event_id),
        format!("Name:        {}", t.name),
    ];
    if let Some(ref d) = t.description {
        if !d.is_empty() {
            lines.push(format!("Description: {d}"));
        }
    }
    lines.push(format!("Start:       {}", t.start_time));
    lines.push(format!("End:         {}", t.end_time));
    lines.push(format!("Capacity:    {}", t.capacity));
    if let Some(ref speaker) = t.speaker {
        lines.push(format!("Speaker:     {speaker}"));
    }
    if let Some(attendees) = t.attendees {
        lines.push(format!("Attendees:   {attendees}"));
    }
    lines.join("\n")
}

#[derive(Serialize)]
struct Seats {
    id: i64,
    available: i64,
}

fn subject(id: Option<i64>, action: &str) -> Subject<'_> {
    Subject {
        kind: "session",
        id,
        list_command: "sessions list",
        action,
    }
}

/// Copy the given flags onto the form; omitted flags leave fields alone.
fn apply_fields(form: &mut TalkForm, fields: TalkFields) {
    let TalkFields {
        event,
        name,
        description,
        start,
        end,
        capacity,
        speaker,
    } = fields;
    if let Some(v) = event {
        form.event_id = v;
    }
    if let Some(v) = name {
        form.name = v;
    }
    if let Some(v) = description {
        form.description = v;
    }
    if let Some(v) = start {
        form.start_time = v;
    }
    if let Some(v) = end {
        form.end_time = v;
    }
    if let Some(v) = capacity {
        form.capacity = v;
    }
    if let Some(v) = speaker {
        form.speaker = v;
    }
}

fn print_talks(talks: &[Talk], global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_list(
        &global.output,
        talks,
        |t| TalkRow::from(t),
        |t| t.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn print_talk(talk: &Talk, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(&global.output, talk, detail, |t| t.id.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    ctx: &AppContext,
    args: SessionsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SessionsCommand::List => {
            let mut listing = Listing::new();
            let api = ctx.api().clone();
            let spinner = output::spinner(global, "Loading sessions");
            let loaded = listing.load(|| async move { api.list_talks().await }).await;
            spinner.finish_and_clear();
            if !loaded {
                return Err(util::listing_error(
                    &listing,
                    subject(None, "Listing sessions"),
                    ctx,
                ));
            }
            print_talks(listing.items(), global)
        }

        SessionsCommand::ForEvent { event_id } => {
            let mut listing = Listing::new();
            let api = ctx.api().clone();
            let spinner = output::spinner(global, "Loading sessions");
            let loaded = listing
                .load(|| async move { api.talks_for_event(event_id).await })
                .await;
            spinner.finish_and_clear();
            if !loaded {
                return Err(util::listing_error(
                    &listing,
                    Subject {
                        kind: "event",
                        id: Some(event_id),
                        list_command: "events list",
                        action: "Listing sessions",
                    },
                    ctx,
                ));
            }
            print_talks(listing.items(), global)
        }

        SessionsCommand::Show { id } => {
            let mut view = TalkUpdateView::new(ctx.clone(), id);
            let spinner = output::spinner(global, "Loading session");
            let loaded = view.load().await;
            spinner.finish_and_clear();
            match view.talk().filter(|_| loaded) {
                Some(talk) => print_talk(talk, global),
                None => Err(util::form_error(
                    view.form(),
                    subject(Some(id), "Loading a session"),
                    ctx,
                )),
            }
        }

        SessionsCommand::Create(fields) => {
            util::require(ctx, Route::SessionCreate, "Creating a session")?;

            let mut view = TalkCreateView::new(ctx.clone(), None);
            view.edit(|form| apply_fields(form, fields));

            let spinner = output::spinner(global, "Creating session");
            let created = view.submit().await;
            spinner.finish_and_clear();
            if created.is_none() {
                return Err(util::form_error(
                    view.controller(),
                    subject(None, "Creating a session"),
                    ctx,
                ));
            }
            output::success(global, TALK_CREATED);
            Ok(())
        }

        SessionsCommand::Update { id, fields } => {
            let mut view = TalkUpdateView::new(ctx.clone(), id);
            let spinner = output::spinner(global, "Updating session");
            if !view.load().await {
                spinner.finish_and_clear();
                return Err(util::form_error(
                    view.form(),
                    subject(Some(id), "Updating a session"),
                    ctx,
                ));
            }
            view.toggle_edit();
            view.edit(|form| apply_fields(form, fields));
            let updated = view.update().await;
            spinner.finish_and_clear();
            if !updated {
                return Err(util::form_error(
                    view.form(),
                    subject(Some(id), "Updating a session"),
                    ctx,
                ));
            }

            output::success(global, view.form().success_message());
            match view.talk() {
                Some(talk) => print_talk(talk, global),
                None => Ok(()),
            }
        }

        SessionsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete session {id}?"), global.yes, "sessions delete")? {
                return Ok(());
            }
            let mut view = TalkUpdateView::new(ctx.clone(), id);
            let deleted = view.delete().await;
            let subject = subject(Some(id), "Deleting a session");
            finish_action(&mut view, deleted, subject, ctx, global).await
        }

        SessionsCommand::Join { id } => {
            let mut view = TalkUpdateView::new(ctx.clone(), id);
            let joined = view.register_attendee().await;
            let subject = subject(Some(id), "Registering for a session");
            finish_action(&mut view, joined, subject, ctx, global).await
        }

        SessionsCommand::Capacity { id } => {
            let mut view = TalkUpdateView::new(ctx.clone(), id);
            let Some(available) = view.check_capacity().await else {
                return Err(util::form_error(
                    view.form(),
                    subject(Some(id), "Checking capacity"),
                    ctx,
                ));
            };
            let out = output::render_single(
                &global.output,
                &Seats { id, available },
                |s| format!("{} seats available", s.available),
                |s| s.available.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SessionsCommand::Attendance => {
            let mut view = AttendanceView::new(ctx.clone());
            let spinner = output::spinner(global, "Loading attendance");
            let loaded = view.load().await;
            spinner.finish_and_clear();
            if !loaded {
                return Err(util::listing_error(
                    view.listing(),
                    subject(None, "Listing attendance"),
                    ctx,
                ));
            }
            let out = output::render_list(
                &global.output,
                view.entries(),
                |a| AttendanceRow::from(a),
                |a| format!("{}\t{}", a.talk_id, a.email),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SessionsCommand::AssignSpeaker { id, speaker } => {
            let mut view = TalkUpdateView::new(ctx.clone(), id);
            let assigned = view.assign_speaker(&speaker).await;
            let subject = subject(Some(id), "Assigning a speaker");
            finish_action(&mut view, assigned, subject, ctx, global).await
        }
    }
}

/// Report a gated action. A blocked action waits for the sign-in redirect
/// so its hint is printed before the error.
async fn finish_action(
    view: &mut TalkUpdateView,
    ok: bool,
    subject: Subject<'_>,
    ctx: &AppContext,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if ok {
        output::success(global, view.form().success_message());
        return Ok(());
    }
    view.settle().await;
    Err(util::form_error(view.form(), subject, ctx))
}
