use clap::{Arg, ArgMatches, Command};
use color_eyre::Result;
use std::sync::Arc;
use std::time::Duration;

mod adapters;
mod application;
mod domain;
mod ports;

#[cfg(test)]
mod test_support;

use adapters::{
    api::{HttpTaskRepository, TodoClient},
    cache::MokaCacheAdapter,
    config::FileConfigStore,
    tui::{run_tui, App},
};
use application::{AppError, QueryClient, TaskService};
use domain::{TaskColor, TaskId};
use ports::{AppConfig, ConfigStore, API_URL_ENV};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // --help and --version exit here, before any log file exists
    let matches = cli().get_matches();

    init_logging()?;

    // Load configuration
    let config_store = Arc::new(FileConfigStore::new()?);
    let stored = config_store.load_config().await?;
    let cli_url = matches.get_one::<String>("api-url").cloned();
    let config = stored
        .clone()
        .with_overrides(cli_url.clone(), std::env::var(API_URL_ENV).ok());

    let base_url = match config.api_base_url() {
        Ok(Some(url)) => url,
        Ok(None) => {
            eprintln!("❌ No API URL configured!");
            eprintln!();
            eprintln!("Point the client at a task server in one of these ways:");
            eprintln!("1. Run: export {API_URL_ENV}=http://localhost:3333");
            eprintln!(
                "2. Or run: {} --api-url http://localhost:3333",
                std::env::args()
                    .next()
                    .unwrap_or_else(|| "todo-tui".to_string())
            );
            eprintln!();
            return Err(AppError::ApiUrlNotConfigured.into());
        }
        Err(e) => {
            eprintln!("❌ {e}");
            return Err(AppError::from(e).into());
        }
    };

    // Remember a URL given on the command line
    if let Some(url) = cli_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        if stored.api_url.as_deref() != Some(url) {
            let persisted = AppConfig {
                api_url: Some(url.to_string()),
                ..stored
            };
            config_store.save_config(&persisted).await?;
        }
    }

    tracing::info!("Using task API at {}", base_url);

    // Create dependencies
    let client = TodoClient::new(
        &base_url,
        Duration::from_secs(config.request_timeout_seconds),
    )?;
    let task_repo = Arc::new(HttpTaskRepository::new(client));

    // Create caches
    let list_cache = Arc::new(MokaCacheAdapter::new(config.cache_ttl_seconds, 100));
    let task_cache = Arc::new(MokaCacheAdapter::with_ttl(config.cache_ttl_seconds));
    let queries = Arc::new(QueryClient::new(list_cache, task_cache));

    let task_service = Arc::new(TaskService::new(task_repo, queries));

    match matches.subcommand() {
        Some(("tasks", tasks_matches)) => {
            if let Err(e) = run_tasks_command(&task_service, tasks_matches).await {
                eprintln!("❌ {e}");
                std::process::exit(exit_code(&e));
            }
        }
        None => {
            let app = App::new(task_service);

            if let Err(e) = run_tui(app).await {
                eprintln!("❌ Application error: {e}");
                std::process::exit(1);
            }
        }
        _ => {
            eprintln!("❌ Unknown command");
            std::process::exit(1);
        }
    }

    Ok(())
}

fn init_logging() -> Result<()> {
    // The terminal belongs to the TUI, so logs go to a file
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("todo-tui.log")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();

    Ok(())
}

/// Exit status for a failed `tasks` command: 2 for bad input, 3 for a
/// task the server does not have, 1 otherwise.
fn exit_code(error: &color_eyre::Report) -> i32 {
    match error.downcast_ref::<AppError>() {
        Some(e) if e.is_validation() => 2,
        Some(e) if e.is_not_found() => 3,
        _ => 1,
    }
}

fn cli() -> Command {
    let task_id = || {
        Arg::new("task_id")
            .help("Task ID")
            .required(true)
            .index(1)
    };
    let title = || {
        Arg::new("title")
            .long("title")
            .short('t')
            .value_name("TITLE")
            .help("Task title (surrounding whitespace is trimmed)")
            .required(true)
    };
    let color = || {
        Arg::new("color")
            .long("color")
            .short('c')
            .value_name("COLOR")
            .help("red, orange, yellow, green, blue, purple, pink, pink-red or beige")
    };

    Command::new("todo-tui")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A terminal client for a to-do REST API")
        .long_about("A keyboard-driven terminal interface for a to-do list served over REST.\n\nRun without a subcommand to open the interactive screens.")
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .value_name("URL")
                .help(format!(
                    "Base URL of the task API (can also be set via {API_URL_ENV}); remembered for next time"
                ))
                .global(true),
        )
        .subcommand(
            Command::new("tasks")
                .about("Task operations, printed as JSON")
                .subcommand_required(true)
                .subcommand(Command::new("list").about("List tasks as JSON"))
                .subcommand(
                    Command::new("get")
                        .about("Get a specific task by ID")
                        .arg(task_id()),
                )
                .subcommand(
                    Command::new("create")
                        .about("Create a task")
                        .arg(title())
                        .arg(color()),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Change a task's title and color")
                        .arg(task_id())
                        .arg(title())
                        .arg(color()),
                )
                .subcommand(
                    Command::new("toggle")
                        .about("Flip a task's completed flag")
                        .arg(task_id()),
                )
                .subcommand(
                    Command::new("delete")
                        .about("Delete a task")
                        .arg(task_id()),
                ),
        )
}

fn parse_task_id(matches: &ArgMatches) -> Result<TaskId, AppError> {
    let raw = matches
        .get_one::<String>("task_id")
        .ok_or_else(|| AppError::Application("missing task id".to_string()))?;
    Ok(raw.parse::<TaskId>()?)
}

fn parse_color(matches: &ArgMatches) -> Result<Option<TaskColor>, AppError> {
    matches
        .get_one::<String>("color")
        .map(|raw| raw.parse::<TaskColor>().map_err(AppError::from))
        .transpose()
}

fn title_arg(matches: &ArgMatches) -> &str {
    matches
        .get_one::<String>("title")
        .map(String::as_str)
        .unwrap_or_default()
}

async fn run_tasks_command(service: &TaskService, matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("list", _)) => {
            let tasks = service.list_tasks().await?;
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        Some(("get", get_matches)) => {
            let task = service.get_task(parse_task_id(get_matches)?).await?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        Some(("create", create_matches)) => {
            let color = parse_color(create_matches)?.unwrap_or_default();
            let task = service
                .create_task(title_arg(create_matches), color)
                .await?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        Some(("edit", edit_matches)) => {
            let id = parse_task_id(edit_matches)?;
            let color = match parse_color(edit_matches)? {
                Some(color) => color,
                None => service.get_task(id).await?.color,
            };
            let task = match service.update_task(id, title_arg(edit_matches), color).await? {
                Some(task) => task,
                None => service.get_task(id).await?,
            };
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        Some(("toggle", toggle_matches)) => {
            let current = service.get_task(parse_task_id(toggle_matches)?).await?;
            let task = match service.toggle_completion(&current).await? {
                Some(task) => task,
                None => service.get_task(current.id).await?,
            };
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        Some(("delete", delete_matches)) => {
            let id = parse_task_id(delete_matches)?;
            service.delete_task(id).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({ "deleted": id.0 }))?
            );
        }
        _ => return Err(AppError::Application("Unknown tasks subcommand".to_string()).into()),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn edit_requires_a_title() {
        let result = cli().try_get_matches_from(["todo-tui", "tasks", "edit", "3"]);
        assert!(result.is_err());
    }

    #[test]
    fn ids_and_colors_are_parsed() {
        let matches = cli()
            .try_get_matches_from([
                "todo-tui",
                "--api-url",
                "http://localhost:3333",
                "tasks",
                "create",
                "--title",
                "Feed cat",
                "--color",
                "bg-rose-500",
            ])
            .unwrap();
        let (_, tasks) = matches.subcommand().unwrap();
        let (_, create) = tasks.subcommand().unwrap();
        assert_eq!(parse_color(create).unwrap(), Some(TaskColor::PinkRed));
        assert_eq!(title_arg(create), "Feed cat");

        let matches = cli()
            .try_get_matches_from(["todo-tui", "tasks", "delete", "abc"])
            .unwrap();
        let (_, tasks) = matches.subcommand().unwrap();
        let (_, delete) = tasks.subcommand().unwrap();
        assert!(parse_task_id(delete).unwrap_err().is_validation());
    }

    #[test]
    fn help_is_answered_by_argument_parsing() {
        let err = cli()
            .try_get_matches_from(["todo-tui", "--help"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);

        let err = cli()
            .try_get_matches_from(["todo-tui", "--version"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn failed_commands_map_to_exit_codes() {
        use crate::ports::RepositoryError;

        let bad_id = color_eyre::Report::from(AppError::from("abc".parse::<TaskId>().unwrap_err()));
        assert_eq!(exit_code(&bad_id), 2);

        let missing = color_eyre::Report::from(AppError::from(RepositoryError::NotFound(
            "Task 9".to_string(),
        )));
        assert_eq!(exit_code(&missing), 3);

        let other = color_eyre::Report::from(AppError::Application("boom".to_string()));
        assert_eq!(exit_code(&other), 1);
    }
}
