//! taskflow command implementations.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::Serialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::events::{Event, EventDestination, EventKind, EventSink};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::query::{
    compute_stats, filter, parse_category_filter, parse_priority_filter, FilterSelection,
    StatusFilter, TaskStats,
};
use crate::storage::FileStore;
use crate::store::TaskStore;
use crate::suggest::{CannedSuggestions, SuggestionProvider};
use crate::task::{parse_due_date, Category, Priority, Task, TaskDraft};

pub struct AddOptions {
    pub title: String,
    pub description: Option<String>,
    pub priority: String,
    pub category: String,
    pub due: Option<String>,
    pub events: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ListOptions {
    pub status: String,
    pub category: String,
    pub priority: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct EditOptions {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub due: Option<String>,
    pub clear_due: bool,
    pub clear_description: bool,
    pub events: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ToggleOptions {
    pub id: String,
    pub events: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct RmOptions {
    pub id: String,
    pub events: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct SuggestOptions {
    pub events: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct StatsOptions {
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

struct TaskContext {
    store: TaskStore,
    config: Config,
}

fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    ProjectDirs::from("", "", "taskflow")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(Error::NoDataDir)
}

fn load_context(data_dir: Option<PathBuf>) -> Result<TaskContext> {
    let dir = resolve_data_dir(data_dir)?;
    let config = Config::load_from_dir(&dir);
    let store = TaskStore::open(Box::new(FileStore::new(&dir)))?;
    Ok(TaskContext { store, config })
}

fn open_event_sink(raw: Option<&str>) -> Result<(Option<EventSink>, bool)> {
    match EventDestination::parse(raw) {
        Some(destination) => {
            let to_stdout = matches!(destination, EventDestination::Stdout);
            Ok((Some(destination.open()?), to_stdout))
        }
        None => Ok((None, false)),
    }
}

/// Best-effort event emission; a failed sink becomes a warning, never an
/// error, so the mutation's outcome is still reported.
fn emit_event<T: Serialize>(
    sink: &mut Option<EventSink>,
    kind: EventKind,
    data: T,
) -> Option<String> {
    let sink = sink.as_mut()?;
    let event = match Event::new(kind).with_data(data) {
        Ok(event) => event,
        Err(err) => return Some(format!("failed to build event: {err}")),
    };
    match sink.emit(&event) {
        Ok(()) => None,
        Err(err) => Some(format!("failed to emit event: {err}")),
    }
}

fn output_options(json: bool, quiet: bool, events_to_stdout: bool) -> OutputOptions {
    OutputOptions {
        json: json && !events_to_stdout,
        quiet: quiet || events_to_stdout,
    }
}

fn format_task_line(task: &Task) -> String {
    let mark = if task.completed { "[x]" } else { "[ ]" };
    let due = task
        .due_date
        .map(|date| format!(", due {date}"))
        .unwrap_or_default();
    format!(
        "{mark} {} [{}/{}{due}] {}",
        task.title, task.priority, task.category, task.id
    )
}

fn emit_not_found(
    options: OutputOptions,
    command: &str,
    id: &str,
    data: &impl Serialize,
) -> Result<()> {
    let mut human = HumanOutput::new("No matching task");
    human.push_summary("ID", id);
    emit_success(options, command, data, Some(&human))
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let (mut event_sink, events_to_stdout) = open_event_sink(options.events.as_deref())?;
    if options.title.trim().is_empty() {
        return Err(Error::InvalidArgument("title cannot be empty".to_string()));
    }

    let draft = TaskDraft {
        title: options.title,
        description: options.description,
        completed: false,
        priority: Priority::parse(&options.priority)?,
        category: Category::parse(&options.category)?,
        due_date: options.due.as_deref().map(parse_due_date).transpose()?,
    };

    let mut ctx = load_context(options.data_dir)?;
    let task = ctx.store.add(&draft)?;

    let event_warning = emit_event(
        &mut event_sink,
        EventKind::TaskAdded,
        serde_json::json!({ "id": task.id }),
    );

    let mut human = HumanOutput::new("Task added");
    if let Some(warning) = event_warning {
        human.push_warning(warning);
    }
    human.push_summary("ID", task.id.clone());
    human.push_summary("Title", task.title.clone());
    human.push_summary("Priority", task.priority.to_string());
    human.push_summary("Category", task.category.to_string());
    if let Some(due) = task.due_date {
        human.push_summary("Due", due.to_string());
    }

    emit_success(
        output_options(options.json, options.quiet, events_to_stdout),
        "add",
        &task,
        Some(&human),
    )
}

#[derive(Serialize)]
struct ListOutput {
    total: usize,
    matched: usize,
    tasks: Vec<Task>,
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let selection = FilterSelection {
        status: StatusFilter::parse(&options.status)?,
        category: parse_category_filter(&options.category)?,
        priority: parse_priority_filter(&options.priority)?,
    };

    let ctx = load_context(options.data_dir)?;
    let visible = filter(ctx.store.tasks(), &selection);

    let output = ListOutput {
        total: ctx.store.len(),
        matched: visible.len(),
        tasks: visible.iter().map(|task| (*task).clone()).collect(),
    };

    let mut human = HumanOutput::new("Tasks");
    human.push_summary("Matched", output.matched.to_string());
    human.push_summary("Total", output.total.to_string());
    if ctx.store.is_empty() {
        human.push_detail("No tasks yet. Add your first task to get started!");
    } else if visible.is_empty() {
        human.push_detail("No tasks match your filters.");
    } else {
        for task in &visible {
            human.push_detail(format_task_line(task));
        }
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "list",
        &output,
        Some(&human),
    )
}

#[derive(Serialize)]
struct EditOutput {
    id: String,
    found: bool,
}

pub fn run_edit(options: EditOptions) -> Result<()> {
    let (mut event_sink, events_to_stdout) = open_event_sink(options.events.as_deref())?;
    let out = output_options(options.json, options.quiet, events_to_stdout);

    if options.due.is_some() && options.clear_due {
        return Err(Error::InvalidArgument(
            "--due conflicts with --clear-due".to_string(),
        ));
    }
    if options.description.is_some() && options.clear_description {
        return Err(Error::InvalidArgument(
            "--description conflicts with --clear-description".to_string(),
        ));
    }
    if let Some(title) = options.title.as_deref() {
        if title.trim().is_empty() {
            return Err(Error::InvalidArgument("title cannot be empty".to_string()));
        }
    }

    let mut ctx = load_context(options.data_dir)?;
    let Some(current) = ctx.store.get(&options.id).cloned() else {
        let output = EditOutput {
            id: options.id.clone(),
            found: false,
        };
        return emit_not_found(out, "edit", &options.id, &output);
    };

    let updated = Task {
        id: current.id.clone(),
        title: options
            .title
            .map(|title| title.trim().to_string())
            .unwrap_or(current.title),
        description: if options.clear_description {
            None
        } else {
            options.description.or(current.description)
        },
        completed: current.completed,
        priority: match options.priority.as_deref() {
            Some(value) => Priority::parse(value)?,
            None => current.priority,
        },
        category: match options.category.as_deref() {
            Some(value) => Category::parse(value)?,
            None => current.category,
        },
        due_date: if options.clear_due {
            None
        } else {
            match options.due.as_deref() {
                Some(value) => Some(parse_due_date(value)?),
                None => current.due_date,
            }
        },
        created_at: current.created_at,
    };

    let title = updated.title.clone();
    ctx.store.update(updated)?;

    let event_warning = emit_event(
        &mut event_sink,
        EventKind::TaskEdited,
        serde_json::json!({ "id": options.id.as_str() }),
    );

    let output = EditOutput {
        id: options.id.clone(),
        found: true,
    };

    let mut human = HumanOutput::new("Task updated");
    if let Some(warning) = event_warning {
        human.push_warning(warning);
    }
    human.push_summary("ID", options.id);
    human.push_summary("Title", title);

    emit_success(out, "edit", &output, Some(&human))
}

#[derive(Serialize)]
struct ToggleOutput {
    id: String,
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed: Option<bool>,
}

pub fn run_toggle(options: ToggleOptions) -> Result<()> {
    let (mut event_sink, events_to_stdout) = open_event_sink(options.events.as_deref())?;
    let out = output_options(options.json, options.quiet, events_to_stdout);

    let mut ctx = load_context(options.data_dir)?;
    let Some(completed) = ctx.store.toggle_completed(&options.id)? else {
        let output = ToggleOutput {
            id: options.id.clone(),
            found: false,
            completed: None,
        };
        return emit_not_found(out, "toggle", &options.id, &output);
    };

    let event_warning = emit_event(
        &mut event_sink,
        EventKind::TaskToggled,
        serde_json::json!({ "id": options.id.as_str(), "completed": completed }),
    );

    let output = ToggleOutput {
        id: options.id.clone(),
        found: true,
        completed: Some(completed),
    };

    let header = if completed {
        "Task completed"
    } else {
        "Task reopened"
    };
    let mut human = HumanOutput::new(header);
    if let Some(warning) = event_warning {
        human.push_warning(warning);
    }
    human.push_summary("ID", options.id);

    emit_success(out, "toggle", &output, Some(&human))
}

#[derive(Serialize)]
struct RmOutput {
    id: String,
    removed: bool,
}

pub fn run_rm(options: RmOptions) -> Result<()> {
    let (mut event_sink, events_to_stdout) = open_event_sink(options.events.as_deref())?;
    let out = output_options(options.json, options.quiet, events_to_stdout);

    let mut ctx = load_context(options.data_dir)?;
    if !ctx.store.remove(&options.id)? {
        let output = RmOutput {
            id: options.id.clone(),
            removed: false,
        };
        return emit_not_found(out, "rm", &options.id, &output);
    }

    let event_warning = emit_event(
        &mut event_sink,
        EventKind::TaskDeleted,
        serde_json::json!({ "id": options.id.as_str() }),
    );

    let output = RmOutput {
        id: options.id.clone(),
        removed: true,
    };

    let mut human = HumanOutput::new("Task deleted");
    if let Some(warning) = event_warning {
        human.push_warning(warning);
    }
    human.push_summary("ID", options.id);

    emit_success(out, "rm", &output, Some(&human))
}

#[derive(Serialize)]
struct SuggestOutput {
    count: usize,
    tasks: Vec<Task>,
}

pub fn run_suggest(options: SuggestOptions) -> Result<()> {
    let (mut event_sink, events_to_stdout) = open_event_sink(options.events.as_deref())?;
    let out = output_options(options.json, options.quiet, events_to_stdout);

    let mut ctx = load_context(options.data_dir)?;
    let provider = CannedSuggestions::new(Duration::from_millis(ctx.config.suggest.delay_ms));

    let drafts = match provider.suggest(ctx.store.tasks()) {
        Ok(drafts) => drafts,
        Err(err) => {
            emit_event(
                &mut event_sink,
                EventKind::SuggestionFailed,
                serde_json::json!({ "message": err.to_string() }),
            );
            return Err(err);
        }
    };

    let added = ctx.store.add_many(&drafts)?;

    let ids: Vec<&str> = added.iter().map(|task| task.id.as_str()).collect();
    let event_warning = emit_event(
        &mut event_sink,
        EventKind::SuggestionsAdded,
        serde_json::json!({ "count": added.len(), "ids": ids }),
    );

    let output = SuggestOutput {
        count: added.len(),
        tasks: added.clone(),
    };

    let mut human = HumanOutput::new("Suggestions added to your task list");
    if let Some(warning) = event_warning {
        human.push_warning(warning);
    }
    human.push_summary("Count", added.len().to_string());
    for task in &added {
        human.push_detail(format_task_line(task));
    }
    human.push_next_step("taskflow list".to_string());

    emit_success(out, "suggest", &output, Some(&human))
}

pub fn run_stats(options: StatsOptions) -> Result<()> {
    let ctx = load_context(options.data_dir)?;
    let stats: TaskStats = compute_stats(ctx.store.tasks());

    let mut human = HumanOutput::new("Task statistics");
    human.push_summary("Completion rate", format!("{}%", stats.completion_rate));
    human.push_summary("Active tasks", stats.active_count.to_string());
    human.push_summary(
        "High priority (open)",
        stats.high_priority_open_count.to_string(),
    );
    human.push_summary("Total", stats.total.to_string());
    human.push_summary("Completed", stats.completed.to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "stats",
        &stats,
        Some(&human),
    )
}
