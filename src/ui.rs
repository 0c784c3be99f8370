use crate::handlers::DEFAULT_ICON;
use crate::models::{HabitView, HeatmapDay};

const ICONS: [&str; 8] = ["📚", "🏃", "💧", "🧘", "🥗", "😴", "✍️", "🎸"];

pub fn render_index(habits: &[HabitView]) -> String {
    let cards = if habits.is_empty() {
        EMPTY_STATE.to_string()
    } else {
        let cards: String = habits.iter().map(render_card).collect();
        format!(r#"<section class="habits-grid">{cards}</section>"#)
    };

    INDEX_HTML
        .replace("{{ICONS}}", &icon_options(DEFAULT_ICON))
        .replace("{{HABITS}}", &cards)
}

fn icon_options(selected: &str) -> String {
    let mut icons: Vec<&str> = ICONS.to_vec();
    if !icons.contains(&selected) {
        icons.push(selected);
    }
    icons
        .into_iter()
        .map(|icon| {
            let marker = if icon == selected { " selected" } else { "" };
            let icon = escape_html(icon);
            format!(r#"<option value="{icon}"{marker}>{icon}</option>"#)
        })
        .collect()
}

fn render_card(view: &HabitView) -> String {
    let habit = &view.habit;
    let stats = &view.stats;
    let id = escape_html(&habit.id);
    let toggle_class = if stats.completed_today {
        "today-toggle completed"
    } else {
        "today-toggle"
    };

    format!(
        r#"
      <article class="habit-card" data-habit-id="{id}">
        <div class="habit-header">
          <div class="habit-icon">{icon}</div>
          <div class="habit-details">
            <h3 class="habit-title">{title}</h3>
            <div class="habit-stats">
              <span class="chip">{completed}/{total} days</span>
              <span class="chip">{percentage}%</span>
              <span class="chip">{longest} day best</span>
              <span class="chip">{current} day streak</span>
            </div>
          </div>
          <form method="post" action="/habits/{id}/delete">
            <button class="btn-delete" type="submit" aria-label="Delete habit">Delete</button>
          </form>
        </div>
        <form class="habit-edit" method="post" action="/habits/{id}">
          <input name="title" type="text" value="{title}" minlength="2" maxlength="50" required />
          <select name="icon" aria-label="Icon">{icons}</select>
          <button class="btn-edit" type="submit">Save</button>
        </form>
        <form class="habit-today" method="post" action="/habits/{id}/toggle">
          <span class="today-label">Today</span>
          <button class="{toggle_class}" type="submit" aria-label="Toggle today's completion">
            <span class="toggle-slider"></span>
          </button>
        </form>
        <div class="habit-heatmap">
          <h4 class="heatmap-title">Last 30 Days</h4>
          {heatmap}
        </div>
      </article>"#,
        icon = escape_html(&habit.icon),
        title = escape_html(&habit.title),
        completed = stats.completion.completed_days,
        total = stats.completion.total_days,
        percentage = stats.completion.completion_percentage,
        longest = stats.longest_streak,
        current = stats.current_streak,
        icons = icon_options(&habit.icon),
        heatmap = render_heatmap(&view.heatmap),
    )
}

pub fn render_heatmap(days: &[HeatmapDay]) -> String {
    let cells: String = days.iter().map(render_heatmap_cell).collect();
    format!(r#"<div class="heatmap-grid">{cells}</div>"#)
}

fn render_heatmap_cell(day: &HeatmapDay) -> String {
    let mut classes = String::from("heatmap-day");
    if day.completed {
        classes.push_str(" completed");
    }
    if day.is_today {
        classes.push_str(" today");
    }
    if day.is_future {
        classes.push_str(" future");
    }

    format!(
        r#"<div class="{classes}" title="{tooltip}" data-date="{date}"></div>"#,
        tooltip = day_tooltip(day),
        date = day.date,
    )
}

fn day_tooltip(day: &HeatmapDay) -> String {
    let mut tooltip = day.date.to_date().format("%b %-d").to_string();
    if day.completed {
        tooltip.push_str(" - Completed");
    }
    if day.is_today {
        tooltip.push_str(" (Today)");
    }
    tooltip
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const EMPTY_STATE: &str = r#"
      <section class="empty-state">
        <h2>No habits yet</h2>
        <p class="subtitle">Add your first habit above and start a streak today.</p>
      </section>"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Habit Sprout</title>
  <style>
    :root {
      --bg-1: #eef6e8;
      --bg-2: #cfe8b8;
      --ink: #23301f;
      --accent: #3d9a50;
      --accent-2: #2f4858;
      --muted: #e3eadf;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.16);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #f6fbf2 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(960px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    h1 {
      font-family: "Georgia", serif;
      font-size: clamp(2rem, 4vw, 2.6rem);
      margin: 0;
    }

    .subtitle {
      margin: 0;
      color: #5f6a5b;
    }

    .new-habit {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
      background: var(--card);
      border-radius: 20px;
      padding: 18px;
      box-shadow: var(--shadow);
    }

    .new-habit input,
    .new-habit select {
      border: 1px solid rgba(47, 72, 88, 0.2);
      border-radius: 12px;
      padding: 10px 14px;
      font-size: 1rem;
    }

    .new-habit input {
      flex: 1 1 220px;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 10px 18px;
      font-weight: 600;
      cursor: pointer;
    }

    .btn-add {
      background: var(--accent);
      color: white;
    }

    .btn-delete {
      background: transparent;
      color: #c63b2b;
      padding: 6px 10px;
    }

    .habits-grid {
      display: grid;
      grid-template-columns: repeat(auto-fill, minmax(300px, 1fr));
      gap: 18px;
    }

    .habit-card,
    .empty-state {
      background: var(--card);
      border-radius: 22px;
      padding: 20px;
      box-shadow: var(--shadow);
      display: grid;
      gap: 14px;
    }

    .habit-header {
      display: flex;
      align-items: flex-start;
      gap: 12px;
    }

    .habit-icon {
      font-size: 2rem;
    }

    .habit-details {
      flex: 1;
    }

    .habit-title {
      margin: 0 0 6px;
    }

    .habit-stats {
      display: flex;
      flex-wrap: wrap;
      gap: 6px;
    }

    .chip {
      background: var(--muted);
      border-radius: 999px;
      padding: 2px 10px;
      font-size: 0.85rem;
    }

    .habit-edit {
      display: flex;
      gap: 8px;
    }

    .habit-edit input {
      flex: 1;
      border: 1px solid rgba(47, 72, 88, 0.2);
      border-radius: 10px;
      padding: 6px 10px;
    }

    .btn-edit {
      background: var(--muted);
      color: var(--accent-2);
    }

    .habit-today {
      display: flex;
      align-items: center;
      justify-content: space-between;
    }

    .today-toggle {
      width: 52px;
      height: 28px;
      padding: 3px;
      background: var(--muted);
      display: flex;
    }

    .today-toggle .toggle-slider {
      width: 22px;
      height: 22px;
      border-radius: 50%;
      background: white;
      transition: transform 150ms ease;
    }

    .today-toggle.completed {
      background: var(--accent);
    }

    .today-toggle.completed .toggle-slider {
      transform: translateX(24px);
    }

    .heatmap-title {
      margin: 0 0 8px;
      font-size: 0.9rem;
      color: #5f6a5b;
    }

    .heatmap-grid {
      display: grid;
      grid-template-columns: repeat(10, 1fr);
      gap: 4px;
    }

    .heatmap-day {
      aspect-ratio: 1;
      border-radius: 4px;
      background: var(--muted);
    }

    .heatmap-day.completed {
      background: var(--accent);
    }

    .heatmap-day.today {
      outline: 2px solid var(--accent-2);
    }

    .heatmap-day.future {
      opacity: 0.3;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Habit Sprout</h1>
      <p class="subtitle">Mark each habit once a day and watch the last 30 days fill in.</p>
    </header>

    <form class="new-habit" method="post" action="/habits">
      <input name="title" type="text" placeholder="New habit" minlength="2" maxlength="50" required />
      <select name="icon" aria-label="Icon">{{ICONS}}</select>
      <button class="btn-add" type="submit">Add habit</button>
    </form>
{{HABITS}}
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CalendarWindow;
    use crate::models::{CompletionLog, Habit};
    use crate::stats::habit_stats;
    use chrono::{NaiveDate, Utc};

    fn view(title: &str, log: &CompletionLog) -> HabitView {
        let window =
            CalendarWindow::ending_at(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()).unwrap();
        HabitView {
            habit: Habit {
                id: "habit_1".to_string(),
                title: title.to_string(),
                icon: "📚".to_string(),
                created_at: Utc::now(),
            },
            stats: habit_stats(log, &window),
            heatmap: window.days().iter().map(|day| HeatmapDay::new(day, log)).collect(),
        }
    }

    #[test]
    fn empty_index_shows_empty_state() {
        let html = render_index(&[]);
        assert!(html.contains("No habits yet"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn card_shows_stats_and_thirty_cells() {
        let log: CompletionLog = [("2026-01-05".to_string(), true)].into_iter().collect();
        let html = render_index(&[view("Read", &log)]);

        assert!(html.contains("1/30 days"));
        assert!(html.contains("3%"));
        assert!(html.contains("1 day streak"));
        assert!(html.contains("today-toggle completed"));
        assert_eq!(html.matches(r#"class="heatmap-day"#).count(), 30);
        assert!(html.contains(r#"title="Jan 5 - Completed (Today)""#));
        assert!(html.contains(r#"data-date="2025-12-07""#));
    }

    #[test]
    fn card_has_an_edit_form_prefilled_with_the_habit() {
        let html = render_index(&[view("Read \"books\"", &CompletionLog::new())]);

        assert!(html.contains(r#"action="/habits/habit_1""#));
        assert!(html.contains(r#"value="Read &quot;books&quot;""#));
        assert!(html.contains(r#"<option value="📚" selected>📚</option>"#));
    }

    #[test]
    fn titles_are_escaped() {
        let html = render_index(&[view("<script>alert('x')</script>", &CompletionLog::new())]);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }
}
