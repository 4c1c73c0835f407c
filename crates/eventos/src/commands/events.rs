//! Event command handlers.

use serde::Serialize;
use tabled::Tabled;

use eventos_core::views::{
    EVENT_CREATED, EventCreateView, EventDetailView, EventListView, ProfileView,
};
use eventos_core::{AppContext, Event, EventForm, EventQuery, Route, Talk};

use crate::cli::{
    EventFields, EventListArgs, EventsArgs, EventsCommand, GlobalOpts, OutputFormat,
};
use crate::error::CliError;
use crate::output;

use super::sessions::TalkRow;
use super::util::{self, Subject};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Capacity")]
    capacity: i64,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Event> for EventRow {
    fn from(e: &Event) -> Self {
        Self {
            id: e.id,
            name: e.name.clone(),
            start: e.start_time.clone(),
            end: e.end_time.clone(),
            capacity: e.capacity,
            status: e.status.clone(),
        }
    }
}

fn detail(e: &Event) -> String {
    let mut lines = vec![
        format!("ID:          {}", e.id),
        format!("Name:        {}", e.name),
    ];
    if let Some(ref d) = e.description {
        if !d.is_empty() {
            lines.push(format!("Description: {d}"));
        }
    }
    lines.push(format!("Start:       {}", e.start_time));
    lines.push(format!("End:         {}", e.end_time));
    lines.push(format!("Capacity:    {}", e.capacity));
    lines.push(format!("Status:      {}", e.status));
    lines.join("\n")
}

/// Event plus its sessions, for structured output of `events show`.
#[derive(Serialize)]
struct EventWithTalks<'a> {
    #[serde(flatten)]
    event: &'a Event,
    sessions: &'a [Talk],
}

#[derive(Serialize)]
struct Seats {
    id: i64,
    available: i64,
}

fn subject(id: Option<i64>, action: &str) -> Subject<'_> {
    Subject {
        kind: "event",
        id,
        list_command: "events list",
        action,
    }
}

/// Copy the given flags onto the form; omitted flags leave fields alone.
fn apply_fields(form: &mut EventForm, fields: EventFields) {
    let EventFields {
        name,
        description,
        start,
        end,
        capacity,
        status,
    } = fields;
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
    if let Some(v) = status {
        form.status = v;
    }
}

fn print_events(events: &[Event], global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_list(
        &global.output,
        events,
        |e| EventRow::from(e),
        |e| e.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn print_event(event: &Event, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(&global.output, event, detail, |e| e.id.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    ctx: &AppContext,
    args: EventsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        EventsCommand::List(list) => list_events(ctx, list, global).await,

        EventsCommand::Show { id } => {
            let mut view = EventDetailView::new(ctx.clone(), id);
            let spinner = output::spinner(global, "Loading event");
            let loaded = view.load().await;
            spinner.finish_and_clear();
            let Some(event) = view.event().filter(|_| loaded) else {
                return Err(util::form_error(
                    view.form(),
                    subject(Some(id), "Loading an event"),
                    ctx,
                ));
            };

            let talks_failed = !view.talk_listing().error_message().is_empty();
            if matches!(global.output, OutputFormat::Table) {
                let mut out = detail(event);
                if !view.talks().is_empty() {
                    out.push_str("\n\nSessions:\n");
                    out.push_str(&output::render_list(
                        &global.output,
                        view.talks(),
                        |t| TalkRow::from(t),
                        |t| t.id.to_string(),
                    )?);
                }
                output::print_output(&out, global.quiet);
            } else {
                let with_talks = EventWithTalks {
                    event,
                    sessions: view.talks(),
                };
                let out = output::render_single(
                    &global.output,
                    &with_talks,
                    |_| String::new(),
                    |w| w.event.id.to_string(),
                )?;
                output::print_output(&out, global.quiet);
            }
            if talks_failed && !global.quiet {
                eprintln!("sessions: {}", view.talk_listing().error_message());
            }
            Ok(())
        }

        EventsCommand::Create(fields) => {
            util::require(ctx, Route::EventCreate, "Creating an event")?;

            let mut view = EventCreateView::new(ctx.clone());
            view.edit(|form| apply_fields(form, fields));

            let spinner = output::spinner(global, "Creating event");
            let created = view.submit().await;
            spinner.finish_and_clear();
            let Some(event) = created else {
                return Err(util::form_error(
                    view.controller(),
                    subject(None, "Creating an event"),
                    ctx,
                ));
            };

            output::success(global, EVENT_CREATED);
            print_event(&event, global)
        }

        EventsCommand::Update { id, fields } => {
            let mut view = EventDetailView::new(ctx.clone(), id);
            let spinner = output::spinner(global, "Updating event");
            if !view.load().await {
                spinner.finish_and_clear();
                return Err(util::form_error(
                    view.form(),
                    subject(Some(id), "Updating an event"),
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
                    subject(Some(id), "Updating an event"),
                    ctx,
                ));
            }

            output::success(global, view.form().success_message());
            match view.event() {
                Some(event) => print_event(event, global),
                None => Ok(()),
            }
        }

        EventsCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete event {id}? Its sessions go with it."),
                global.yes,
                "events delete",
            )? {
                return Ok(());
            }
            let mut view = EventDetailView::new(ctx.clone(), id);
            let deleted = view.delete().await;
            let subject = subject(Some(id), "Deleting an event");
            finish_action(&mut view, deleted, subject, ctx, global).await
        }

        EventsCommand::Join { id } => {
            let mut view = EventDetailView::new(ctx.clone(), id);
            let joined = view.register().await;
            let subject = subject(Some(id), "Registering for an event");
            finish_action(&mut view, joined, subject, ctx, global).await
        }

        EventsCommand::Leave { id } => {
            let mut view = EventDetailView::new(ctx.clone(), id);
            let left = view.unregister().await;
            let subject = subject(Some(id), "Cancelling a registration");
            finish_action(&mut view, left, subject, ctx, global).await
        }

        EventsCommand::Capacity { id } => {
            let mut view = EventDetailView::new(ctx.clone(), id);
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

        EventsCommand::Mine => {
            util::require(ctx, Route::Profile, "Listing your events")?;

            let mut view = ProfileView::new(ctx.clone());
            let spinner = output::spinner(global, "Loading your events");
            let loaded = view.load().await;
            spinner.finish_and_clear();
            if !loaded {
                return Err(util::listing_error(
                    view.listing(),
                    subject(None, "Listing your events"),
                    ctx,
                ));
            }
            print_events(view.events(), global)
        }

        EventsCommand::Search { name } => {
            let mut view = EventListView::new(ctx.clone());
            let spinner = output::spinner(global, "Searching");
            let found = view.search(&name).await;
            spinner.finish_and_clear();
            if !found {
                return Err(util::listing_error(
                    view.listing(),
                    subject(None, "Searching events"),
                    ctx,
                ));
            }
            print_events(view.events(), global)
        }
    }
}

async fn list_events(
    ctx: &AppContext,
    args: EventListArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut view = EventListView::new(ctx.clone());
    view.set_query(EventQuery {
        name: args.name,
        page: args.page,
        per_page: args.per_page,
    });

    let spinner = output::spinner(global, "Loading events");
    let loaded = view.load().await;
    spinner.finish_and_clear();
    if !loaded {
        return Err(util::listing_error(
            view.listing(),
            subject(None, "Listing events"),
            ctx,
        ));
    }

    print_events(view.events(), global)?;

    let page = view.page_info();
    if matches!(global.output, OutputFormat::Table) && !global.quiet {
        match (page.page, page.total_pages) {
            (Some(p), Some(n)) => eprintln!("page {p} of {n}, {} events in total", page.total),
            _ => eprintln!("{} events in total", page.total),
        }
    }
    Ok(())
}

/// Report a gated action. A blocked action waits for the sign-in redirect
/// so its hint is printed before the error.
async fn finish_action(
    view: &mut EventDetailView,
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
