use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use taskflow_core::{App, AppError, Config, ValidationResult, WeatherConfig};
use taskflow_services::{FileStore, FilterMode, KeyValueStore, MemoryStore, Task, TaskList};
use taskflow_ui::{render_task_panel, render_task_row, render_weather, IntoAppError};
use taskflow_weather::{ConfiguredLocator, Coordinates, ProviderSettings, WeatherProvider, WeatherWidget};

/// Personal task list with a weather panel
#[derive(Debug, Parser)]
#[command(name = "taskflow", version)]
struct Cli {
    /// Keep tasks in memory for this run only
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Use this config file instead of the default one
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show tasks
    List {
        /// all, active or completed
        #[arg(short, long, default_value_t = FilterMode::All)]
        filter: FilterMode,
    },
    /// Add a task
    Add { text: String },
    /// Mark a task done, or not done again
    Toggle { id: String },
    /// Delete a task
    Delete { id: String },
    /// Replace a task's text
    Edit { id: String, text: String },
    /// Show the weather panel
    Weather {
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },
    /// Weather panel followed by the task list (default)
    Dashboard {
        #[arg(short, long, default_value_t = FilterMode::All)]
        filter: FilterMode,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = taskflow_core::init() {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let mut app = App::new(cli.config.as_deref())?;

    let command = cli.command.unwrap_or(Command::Dashboard {
        filter: FilterMode::All,
    });

    match command {
        Command::Weather { lat, lon } => {
            let override_coords = lat
                .zip(lon)
                .map(|(lat, lon)| checked_coordinates(lat, lon))
                .transpose()?;
            print_weather(app.config(), override_coords).await?;
        }
        Command::Dashboard { filter } => {
            let list = open_tasks(&mut app, cli.ephemeral)?;
            print_weather(app.config(), None).await?;
            println!();
            print!("{}", render_task_panel(list.tasks(), filter));
        }
        command => {
            let mut list = open_tasks(&mut app, cli.ephemeral)?;
            run_task_command(&mut list, command)?;
        }
    }

    app.shutdown()?;
    Ok(())
}

fn open_tasks(app: &mut App, ephemeral: bool) -> Result<TaskList<Box<dyn KeyValueStore>>, AppError> {
    let store: Box<dyn KeyValueStore> = if ephemeral {
        Box::new(MemoryStore::new())
    } else {
        app.initialize()?;
        Box::new(FileStore::new(&app.config().data_dir).map_err(IntoAppError::into_app_error)?)
    };

    TaskList::open_with_default(
        store,
        app.config().storage.tasks_key.clone(),
        taskflow_services::default_tasks(),
    )
    .map_err(IntoAppError::into_app_error)
}

fn run_task_command(
    list: &mut TaskList<Box<dyn KeyValueStore>>,
    command: Command,
) -> Result<(), AppError> {
    match command {
        Command::List { filter } => {
            print!("{}", render_task_panel(list.tasks(), filter));
        }
        Command::Add { text } => match list.add(&text).map_err(IntoAppError::into_app_error)? {
            Some(task) => println!("Added {}", render_task_row(task)),
            None => println!("{}", BLANK_TEXT_NOTICE),
        },
        Command::Toggle { id } => {
            let Some(id) = resolve_id(list.tasks(), &id) else {
                println!("{}", unknown_id_notice(&id));
                return Ok(());
            };
            if let Some(task) = list.toggle(&id).map_err(IntoAppError::into_app_error)? {
                println!("{}", render_task_row(task));
            }
        }
        Command::Delete { id } => {
            let Some(id) = resolve_id(list.tasks(), &id) else {
                println!("{}", unknown_id_notice(&id));
                return Ok(());
            };
            if let Some(task) = list.delete(&id).map_err(IntoAppError::into_app_error)? {
                println!("Deleted {}", render_task_row(&task));
            }
        }
        Command::Edit { id, text } => {
            let Some(id) = resolve_id(list.tasks(), &id) else {
                println!("{}", unknown_id_notice(&id));
                return Ok(());
            };
            match list.edit(&id, &text).map_err(IntoAppError::into_app_error)? {
                Some(task) => println!("{}", render_task_row(task)),
                None => println!("{}", BLANK_TEXT_NOTICE),
            }
        }
        Command::Weather { .. } | Command::Dashboard { .. } => {}
    }
    Ok(())
}

// Blank text and unknown ids leave the list alone and are not failures.
const BLANK_TEXT_NOTICE: &str = "Task text is empty, nothing changed.";

fn unknown_id_notice(input: &str) -> String {
    format!("No task matches '{}', nothing changed.", input)
}

/// Exact id, or the single task whose id starts with `input`.
fn resolve_id(tasks: &[Task], input: &str) -> Option<String> {
    if tasks.iter().any(|t| t.id == input) {
        return Some(input.to_string());
    }

    let mut matches = tasks.iter().filter(|t| !input.is_empty() && t.id.starts_with(input));
    match (matches.next(), matches.next()) {
        (Some(task), None) => Some(task.id.clone()),
        _ => None,
    }
}

fn checked_coordinates(latitude: f64, longitude: f64) -> Result<Coordinates, AppError> {
    let mut result = ValidationResult::default();
    WeatherConfig::validate_coordinates(latitude, longitude, "--", &mut result);
    if !result.is_valid() {
        return Err(AppError::InvalidInput(result.error_summary()));
    }
    Ok(Coordinates::new(latitude, longitude))
}

async fn print_weather(config: &Config, override_coords: Option<Coordinates>) -> Result<(), AppError> {
    let weather = &config.weather;
    let locator = match override_coords {
        Some(coords) => ConfiguredLocator::fixed(coords),
        None => ConfiguredLocator::new(
            weather
                .coordinates()
                .map(|(lat, lon)| Coordinates::new(lat, lon)),
            weather.location_enabled,
        ),
    };

    let provider = WeatherProvider::new(ProviderSettings {
        weather_base_url: weather.weather_base_url.clone(),
        geocode_base_url: weather.geocode_base_url.clone(),
        timeout: weather.request_timeout_secs.map(Duration::from_secs),
    })
    .map_err(IntoAppError::into_app_error)?;

    let state = WeatherWidget::new(locator, provider).mount().await;
    if let Some(panel) = render_weather(&state.view()) {
        println!("{}", panel);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn tasks() -> Vec<Task> {
        vec![
            Task::new("0f8e1c2a-1111", "a", false),
            Task::new("0f8e9999-2222", "b", false),
            Task::new("3", "c", true),
        ]
    }

    fn memory_list() -> TaskList<Box<dyn KeyValueStore>> {
        let store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        TaskList::open_with_default(store, "todos", tasks()).unwrap()
    }

    #[test]
    fn test_resolve_exact_id() {
        assert_eq!(resolve_id(&tasks(), "3").as_deref(), Some("3"));
    }

    #[test]
    fn test_resolve_unique_prefix() {
        assert_eq!(
            resolve_id(&tasks(), "0f8e1").as_deref(),
            Some("0f8e1c2a-1111")
        );
    }

    #[test]
    fn test_resolve_ambiguous_or_unknown_prefix() {
        assert_eq!(resolve_id(&tasks(), "0f8e"), None);
        assert_eq!(resolve_id(&tasks(), "zz"), None);
        assert_eq!(resolve_id(&tasks(), ""), None);
    }

    #[test]
    fn test_blank_text_and_unknown_ids_are_not_errors() {
        let mut list = memory_list();
        let commands = vec![
            Command::Add { text: "   ".into() },
            Command::Edit {
                id: "3".into(),
                text: "".into(),
            },
            Command::Toggle { id: "zz".into() },
            Command::Delete { id: "0f8e".into() },
            Command::Edit {
                id: "missing".into(),
                text: "new".into(),
            },
        ];

        for command in commands {
            assert!(run_task_command(&mut list, command).is_ok());
        }
        assert_eq!(list.tasks(), tasks().as_slice());
    }

    #[test]
    fn test_coordinate_overrides_are_range_checked() {
        assert!(checked_coordinates(-33.9, 18.4).is_ok());
        assert!(matches!(
            checked_coordinates(123.0, 2.35),
            Err(AppError::InvalidInput(msg)) if msg.contains("--latitude")
        ));
        assert!(matches!(
            checked_coordinates(48.8, -181.0),
            Err(AppError::InvalidInput(msg)) if msg.contains("--longitude")
        ));
        assert!(checked_coordinates(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_cli_parses_filter() {
        let cli = Cli::try_parse_from(["taskflow", "list", "--filter", "active"]).ok();
        assert!(matches!(
            cli.and_then(|c| c.command),
            Some(Command::List {
                filter: FilterMode::Active
            })
        ));
    }

    #[test]
    fn test_cli_weather_needs_both_coordinates() {
        assert!(Cli::try_parse_from(["taskflow", "weather", "--lat", "48.8"]).is_err());
        assert!(Cli::try_parse_from(["taskflow", "weather", "--lat", "-33.9", "--lon", "18.4"]).is_ok());
    }
}
