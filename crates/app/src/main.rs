use std::fmt;

use compass_core::model::{AccessLevel, Category};
use services::{AppServices, Clock};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;

const DEFAULT_DB_PATH: &str = "access-compass.sqlite3";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingArgument { command: &'static str, name: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidDbUrl { raw: String },
    InvalidAccessLevel { raw: String },
    InvalidCategory { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArgument { command, name } => {
                write!(f, "{command} requires <{name}>")
            }
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidAccessLevel { raw } => {
                write!(f, "invalid --access-level value (expected pulse or deep_dive): {raw}")
            }
            ArgsError::InvalidCategory { raw } => write!(f, "invalid --category value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Courses,
    Course,
    Resources,
    Search,
    Start,
    Lesson,
    Complete,
    View,
    Progress,
    Export,
    Seed,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "courses" => Some(Self::Courses),
            "course" => Some(Self::Course),
            "resources" => Some(Self::Resources),
            "search" => Some(Self::Search),
            "start" => Some(Self::Start),
            "lesson" => Some(Self::Lesson),
            "complete" => Some(Self::Complete),
            "view" => Some(Self::View),
            "progress" => Some(Self::Progress),
            "export" => Some(Self::Export),
            "seed" => Some(Self::Seed),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Args {
    command: Command,
    db_url: String,
    access_level: Option<AccessLevel>,
    category: Option<Category>,
    featured: bool,
    json: bool,
    positionals: Vec<String>,
}

impl Args {
    fn parse(mut argv: impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = normalize_sqlite_url(
            std::env::var("COMPASS_DB_URL").unwrap_or_else(|_| DEFAULT_DB_PATH.into()),
        );
        let mut access_level = match std::env::var("COMPASS_ACCESS_LEVEL") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                raw.parse::<AccessLevel>()
                    .map_err(|_| ArgsError::InvalidAccessLevel { raw })?,
            ),
            _ => None,
        };
        let mut command = None;
        let mut category = None;
        let mut featured = false;
        let mut json = false;
        let mut positionals = Vec::new();

        while let Some(arg) = argv.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut argv, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--access-level" => {
                    let value = require_value(&mut argv, "--access-level")?;
                    let parsed = value
                        .parse::<AccessLevel>()
                        .map_err(|_| ArgsError::InvalidAccessLevel { raw: value.clone() })?;
                    access_level = Some(parsed);
                }
                "--category" => {
                    let value = require_value(&mut argv, "--category")?;
                    category = Some(
                        Category::from_slug(&value)
                            .ok_or(ArgsError::InvalidCategory { raw: value })?,
                    );
                }
                "--featured" => featured = true,
                "--json" => json = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ if arg.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ if command.is_none() => {
                    command = Some(
                        Command::from_arg(&arg).ok_or(ArgsError::UnknownCommand(arg))?,
                    );
                }
                _ => positionals.push(arg),
            }
        }

        Ok(Self {
            command: command.unwrap_or(Command::Progress),
            db_url,
            access_level,
            category,
            featured,
            json,
            positionals,
        })
    }

    fn positional(
        &self,
        idx: usize,
        command: &'static str,
        name: &'static str,
    ) -> Result<&str, ArgsError> {
        self.positionals
            .get(idx)
            .map(String::as_str)
            .ok_or(ArgsError::MissingArgument { command, name })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  compass [options] <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  courses [--category <slug>] [--featured]   List courses");
    eprintln!("  course <id|slug>                           Show a course with lesson progress");
    eprintln!("  resources [--category <slug>] [--featured] List standalone resources");
    eprintln!("  search <query>                             Search courses and resources");
    eprintln!("  start <course>                             Start a course");
    eprintln!("  lesson <course> <lesson-id>                Complete a lesson");
    eprintln!("  complete <course>                          Complete a fully finished course");
    eprintln!("  view <resource>                            Mark a resource as viewed");
    eprintln!("  progress [--json]                          Dashboard summary (default)");
    eprintln!("  export                                     Print the stored progress document");
    eprintln!("  seed                                       Write sample in-progress data");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>          (default: sqlite://access-compass.sqlite3)");
    eprintln!("  --access-level <level>     pulse | deep_dive (default: none)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  COMPASS_DB_URL, COMPASS_ACCESS_LEVEL, RUST_LOG");
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse(std::env::args().skip(1)).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite here so services stay backend-agnostic.
    prepare_sqlite_file(&args.db_url)?;
    debug!(db_url = %args.db_url, command = ?args.command, "starting");
    let mut app = AppServices::new_sqlite(&args.db_url, Clock::system(), args.access_level).await?;

    commands::dispatch(&mut app, &args).await
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
