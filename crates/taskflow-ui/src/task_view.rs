use std::fmt::Write as _;

use taskflow_services::{filter, FilterMode, Task};

pub const PANEL_TITLE: &str = "My Tasks";
pub const EMPTY_MESSAGE: &str = "No tasks here. Enjoy your day!";

/// Number of id characters shown in a row. Commands accept any unique prefix.
pub const SHORT_ID_LEN: usize = 8;

fn tab_label(mode: FilterMode, active_count: usize) -> String {
    match mode {
        FilterMode::All => "All".to_string(),
        FilterMode::Active => format!("Active ({})", active_count),
        FilterMode::Completed => "Completed".to_string(),
    }
}

/// The three filter tabs, selected one in brackets.
pub fn render_tabs(selected: FilterMode, active_count: usize) -> String {
    FilterMode::ALL_MODES
        .iter()
        .map(|&mode| {
            let label = tab_label(mode, active_count);
            if mode == selected {
                format!("[{}]", label)
            } else {
                format!(" {} ", label)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

pub fn render_task_row(task: &Task) -> String {
    let check = if task.completed { "[x]" } else { "[ ]" };
    format!("{} {:<width$}  {}", check, short_id(&task.id), task.text, width = SHORT_ID_LEN)
}

/// Title, tabs and the rows visible under `mode`.
pub fn render_task_panel(tasks: &[Task], mode: FilterMode) -> String {
    let active_count = tasks.iter().filter(|t| !t.completed).count();
    let visible = filter(tasks, mode);

    let mut out = String::new();
    let _ = writeln!(out, "{}", PANEL_TITLE);
    let _ = writeln!(out, "{}", render_tabs(mode, active_count));
    if visible.is_empty() {
        let _ = writeln!(out, "  {}", EMPTY_MESSAGE);
    } else {
        for task in visible {
            let _ = writeln!(out, "  {}", render_task_row(task));
        }
    }
    out
}
