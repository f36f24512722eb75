//! Command-line driver for `article_core`.
//!
//! # Responsibility
//! - Expose article create/rename/show/list/check use-cases on the shell.
//! - Map validation failures to exit status 2 and other failures to 1.

mod args;

use args::{Cli, Command};
use article_core::db::{open_db, open_db_in_memory};
use article_core::{
    default_log_level, init_logging, Article, ArticleListQuery, ArticleService, RepoError,
    SqliteArticleRepository,
};
use clap::Parser;
use log::info;
use std::process::ExitCode;
use uuid::Uuid;

const EXIT_FAILURE: u8 = 1;
const EXIT_VALIDATION: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliFailure::Invalid(messages)) => {
            for message in messages {
                eprintln!("{message}");
            }
            ExitCode::from(EXIT_VALIDATION)
        }
        Err(CliFailure::Other(message)) => {
            eprintln!("error: {message}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

enum CliFailure {
    Invalid(Vec<String>),
    Other(String),
}

impl From<RepoError> for CliFailure {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(errors) => Self::Invalid(errors.full_messages()),
            other => Self::Other(other.to_string()),
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliFailure> {
    if let Command::Ping = cli.command {
        println!("article_core ping={}", article_core::ping());
        println!("article_core version={}", article_core::core_version());
        return Ok(());
    }

    let conn = match cli.db.as_ref() {
        Some(path) => open_db(path),
        None => open_db_in_memory(),
    }
    .map_err(|err| CliFailure::Other(err.to_string()))?;
    let service = ArticleService::new(SqliteArticleRepository::try_new(&conn)?);
    info!("event=cli_command module=cli status=start command={}", command_name(&cli.command));

    match &cli.command {
        Command::Ping => {}
        Command::Create { title } => {
            let article = service.create_article(Some(title.clone()))?;
            print_json(&article)?;
        }
        Command::Rename { id, title } => {
            let article = service.rename_article(parse_id(id)?, Some(title.clone()))?;
            print_json(&article)?;
        }
        Command::Show { id } => {
            let id = parse_id(id)?;
            let article = service
                .get_article(id)?
                .ok_or(RepoError::NotFound(id))?;
            print_json(&article)?;
        }
        Command::List { limit, offset } => {
            let articles = service.list_articles(&ArticleListQuery {
                limit: *limit,
                offset: *offset,
            })?;
            print_json(&articles)?;
        }
        Command::Check { title, id } => {
            let candidate = match id {
                Some(id) => Article::with_id(parse_id(id)?, Some(title.clone())),
                None => Article::titled(title.clone()),
            };
            let errors = service.validate_article(&candidate)?;
            if !errors.is_empty() {
                return Err(CliFailure::Invalid(errors.full_messages()));
            }
            println!("ok");
        }
    }

    Ok(())
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Ping => "ping",
        Command::Create { .. } => "create",
        Command::Rename { .. } => "rename",
        Command::Show { .. } => "show",
        Command::List { .. } => "list",
        Command::Check { .. } => "check",
    }
}

fn parse_id(value: &str) -> Result<Uuid, CliFailure> {
    Uuid::parse_str(value.trim())
        .map_err(|err| CliFailure::Other(format!("invalid article id `{value}`: {err}")))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), CliFailure> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| CliFailure::Other(format!("failed to render output: {err}")))?;
    println!("{rendered}");
    Ok(())
}
