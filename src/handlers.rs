use crate::calendar::{CalendarWindow, DateKey};
use crate::errors::AppError;
use crate::models::{Habit, HabitRequest, HabitView, HeatmapDay, StatsQuery, StatsResponse};
use crate::state::AppState;
use crate::stats::habit_stats;
use crate::storage::{Store, persist_store};
use crate::ui::render_index;
use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

pub const DEFAULT_ICON: &str = "📚";
const TITLE_MIN_CHARS: usize = 2;
const TITLE_MAX_CHARS: usize = 50;

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let window = CalendarWindow::today()?;
    let store = state.store.lock().await;
    let views = habit_views(&store, &window);
    Ok(Html(render_index(&views)))
}

pub async fn list_habits(
    State(state): State<AppState>,
) -> Result<Json<Vec<HabitView>>, AppError> {
    let window = CalendarWindow::today()?;
    let store = state.store.lock().await;
    Ok(Json(habit_views(&store, &window)))
}

pub async fn create_habit(
    State(state): State<AppState>,
    Json(payload): Json<HabitRequest>,
) -> Result<(StatusCode, Json<HabitView>), AppError> {
    let view = apply_create(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn update_habit(
    State(state): State<AppState>,
    Path(habit_id): Path<String>,
    Json(payload): Json<HabitRequest>,
) -> Result<Json<HabitView>, AppError> {
    let view = apply_update(&state, &habit_id, payload).await?;
    Ok(Json(view))
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Path(habit_id): Path<String>,
) -> Result<StatusCode, AppError> {
    apply_delete(&state, &habit_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_today(
    State(state): State<AppState>,
    Path(habit_id): Path<String>,
) -> Result<Json<HabitView>, AppError> {
    let view = apply_toggle(&state, &habit_id).await?;
    Ok(Json(view))
}

pub async fn get_stats(
    State(state): State<AppState>,
    Path(habit_id): Path<String>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StatsResponse>, AppError> {
    let window = match query.date.as_deref() {
        Some(date) => CalendarWindow::from_reference_str(date)?,
        None => CalendarWindow::today()?,
    };

    let store = state.store.lock().await;
    if store.find_habit(&habit_id).is_none() {
        return Err(AppError::not_found(&habit_id));
    }
    let log = store.get_log(&habit_id);

    Ok(Json(StatsResponse {
        habit_id,
        reference_date: DateKey::from_date(window.reference()),
        stats: habit_stats(&log, &window),
    }))
}

pub async fn form_create(
    State(state): State<AppState>,
    Form(payload): Form<HabitRequest>,
) -> Result<Redirect, AppError> {
    apply_create(&state, payload).await?;
    Ok(Redirect::to("/"))
}

pub async fn form_update(
    State(state): State<AppState>,
    Path(habit_id): Path<String>,
    Form(payload): Form<HabitRequest>,
) -> Result<Redirect, AppError> {
    apply_update(&state, &habit_id, payload).await?;
    Ok(Redirect::to("/"))
}

pub async fn form_toggle(
    State(state): State<AppState>,
    Path(habit_id): Path<String>,
) -> Result<Redirect, AppError> {
    apply_toggle(&state, &habit_id).await?;
    Ok(Redirect::to("/"))
}

pub async fn form_delete(
    State(state): State<AppState>,
    Path(habit_id): Path<String>,
) -> Result<Redirect, AppError> {
    apply_delete(&state, &habit_id).await?;
    Ok(Redirect::to("/"))
}

async fn apply_create(state: &AppState, payload: HabitRequest) -> Result<HabitView, AppError> {
    let habit = Habit {
        id: new_habit_id(),
        title: validate_title(&payload.title)?,
        icon: normalize_icon(payload.icon.as_deref()),
        created_at: Utc::now(),
    };

    let window = CalendarWindow::today()?;
    let mut store = state.store.lock().await;
    let mut next = store.clone();
    next.save_habit(habit.clone())?;

    persist_store(&state.data_path, &next).await?;
    *store = next;
    info!(habit_id = %habit.id, "created habit");

    Ok(habit_view(&store, habit, &window))
}

async fn apply_update(
    state: &AppState,
    habit_id: &str,
    payload: HabitRequest,
) -> Result<HabitView, AppError> {
    let title = validate_title(&payload.title)?;

    let window = CalendarWindow::today()?;
    let mut store = state.store.lock().await;
    let mut habit = store
        .find_habit(habit_id)
        .ok_or_else(|| AppError::not_found(habit_id))?;
    habit.title = title;
    if payload.icon.is_some() {
        habit.icon = normalize_icon(payload.icon.as_deref());
    }
    let mut next = store.clone();
    next.save_habit(habit.clone())?;

    persist_store(&state.data_path, &next).await?;
    *store = next;
    info!(habit_id, "updated habit");

    Ok(habit_view(&store, habit, &window))
}

async fn apply_toggle(state: &AppState, habit_id: &str) -> Result<HabitView, AppError> {
    let window = CalendarWindow::today()?;
    let today = DateKey::from_date(window.reference());

    let mut store = state.store.lock().await;
    let habit = store
        .find_habit(habit_id)
        .ok_or_else(|| AppError::not_found(habit_id))?;
    let mut log = store.get_log(habit_id);
    let completed = log.toggle(&today);
    let mut next = store.clone();
    next.save_log(habit_id, &log)?;

    persist_store(&state.data_path, &next).await?;
    *store = next;
    info!(habit_id, date = %today, completed, "toggled habit");

    Ok(habit_view(&store, habit, &window))
}

async fn apply_delete(state: &AppState, habit_id: &str) -> Result<(), AppError> {
    let mut store = state.store.lock().await;
    let mut next = store.clone();
    if !next.delete_habit(habit_id)? {
        return Err(AppError::not_found(habit_id));
    }
    next.delete_log(habit_id);

    persist_store(&state.data_path, &next).await?;
    *store = next;
    info!(habit_id, "deleted habit");
    Ok(())
}

fn habit_views(store: &Store, window: &CalendarWindow) -> Vec<HabitView> {
    store
        .get_habits()
        .into_iter()
        .map(|habit| habit_view(store, habit, window))
        .collect()
}

fn habit_view(store: &Store, habit: Habit, window: &CalendarWindow) -> HabitView {
    let log = store.get_log(&habit.id);
    HabitView {
        stats: habit_stats(&log, window),
        heatmap: window.days().iter().map(|day| HeatmapDay::new(day, &log)).collect(),
        habit,
    }
}

fn new_habit_id() -> String {
    format!("habit_{}", Uuid::new_v4().simple())
}

fn validate_title(raw: &str) -> Result<String, AppError> {
    let title = raw.trim();
    let chars = title.chars().count();
    if chars == 0 {
        return Err(AppError::bad_request("Habit name is required"));
    }
    if chars < TITLE_MIN_CHARS {
        return Err(AppError::bad_request("Habit name must be at least 2 characters"));
    }
    if chars > TITLE_MAX_CHARS {
        return Err(AppError::bad_request("Habit name must be less than 50 characters"));
    }
    Ok(title.to_string())
}

fn normalize_icon(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(icon) if !icon.is_empty() => icon.to_string(),
        _ => DEFAULT_ICON.to_string(),
    }
}
