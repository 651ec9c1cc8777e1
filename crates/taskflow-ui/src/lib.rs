//! Text presentation for TaskFlow: the weather card, the filter tabs and
//! the task list. No state lives here; everything renders from values the
//! services hand over.

pub mod error_mapping;
pub mod task_view;
pub mod weather_view;

pub use error_mapping::IntoAppError;
pub use task_view::{render_task_panel, render_task_row, render_tabs, EMPTY_MESSAGE};
pub use weather_view::render_weather;
