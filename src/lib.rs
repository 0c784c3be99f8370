pub mod app;
pub mod calendar;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod state;

pub use app::router;
pub use calendar::{CalendarWindow, DateKey, Day, WINDOW_DAYS};
pub use state::AppState;
pub use stats::{completion_stats, current_streak, habit_stats, longest_streak};
pub use storage::{load_store, resolve_data_path};
