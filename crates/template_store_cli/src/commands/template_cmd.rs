//! Template commands for the template store CLI.
//!
//! Each subcommand maps to exactly one store operation. Templates are read as
//! JSON from a file or from standard input (`-`) and written to standard
//! output as pretty-printed JSON.
//!
//! # Examples
//!
//! ```bash
//! template-store list
//! template-store get rate-limit
//! template-store save ./rate-limit.json
//! echo '{"id":"rate-limit","name":"B"}' | template-store update -
//! template-store delete rate-limit
//! template-store ping
//! ```

use std::fs;
use std::io::{self, Read, Write};

use clap::Subcommand;
use colored::Colorize;
use template_store::{Template, TemplateRepository};
use tracing::{debug, instrument};

use crate::errors::Error;

#[cfg(test)]
#[path = "template_cmd_tests.rs"]
mod tests;

/// Exit code when `get` finds nothing or `ping` cannot reach the backend.
pub const EXIT_NOT_AVAILABLE: i32 = 3;

/// Subcommands operating on templates
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TemplateCommands {
    /// List all templates
    List,

    /// Show a single template
    Get {
        /// Template id
        id: String,
    },

    /// Create or overwrite a template
    Save {
        /// JSON file containing the template, or "-" for standard input
        source: String,
    },

    /// Overwrite an existing template and refresh its updated_at timestamp
    Update {
        /// JSON file containing the template, or "-" for standard input
        source: String,
    },

    /// Delete a template
    Delete {
        /// Template id
        id: String,
    },

    /// Check whether the backend is reachable
    Ping,
}

/// How a successfully executed command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Completed,
    NotFound,
    Unreachable,
}

impl CommandOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandOutcome::Completed => 0,
            CommandOutcome::NotFound | CommandOutcome::Unreachable => EXIT_NOT_AVAILABLE,
        }
    }
}

/// Execute a template command against `repository`, writing results to `out`.
#[instrument(skip(repository, out))]
pub async fn execute(
    cmd: &TemplateCommands,
    repository: &dyn TemplateRepository,
    out: &mut dyn Write,
) -> Result<CommandOutcome, Error> {
    match cmd {
        TemplateCommands::List => {
            let templates = repository.list_templates().await?;
            debug!(count = templates.len(), "Listed templates");
            write_json(out, &templates)?;
            Ok(CommandOutcome::Completed)
        }
        TemplateCommands::Get { id } => match repository.get_template(id).await? {
            Some(template) => {
                write_json(out, &template)?;
                Ok(CommandOutcome::Completed)
            }
            None => {
                eprintln!("Template '{}' not found", id);
                Ok(CommandOutcome::NotFound)
            }
        },
        TemplateCommands::Save { source } => {
            let template = read_template(source)?;
            repository.save_template(&template).await?;
            writeln!(out, "Saved template '{}'", template.id).map_err(Error::Output)?;
            Ok(CommandOutcome::Completed)
        }
        TemplateCommands::Update { source } => {
            let template = read_template(source)?;
            let updated = repository.update_template(template).await?;
            write_json(out, &updated)?;
            Ok(CommandOutcome::Completed)
        }
        TemplateCommands::Delete { id } => {
            repository.delete_template(id).await?;
            writeln!(out, "Deleted template '{}'", id).map_err(Error::Output)?;
            Ok(CommandOutcome::Completed)
        }
        TemplateCommands::Ping => {
            if repository.test_connection().await {
                writeln!(out, "Backend {}", "reachable".green()).map_err(Error::Output)?;
                Ok(CommandOutcome::Completed)
            } else {
                writeln!(out, "Backend {}", "unreachable".red()).map_err(Error::Output)?;
                Ok(CommandOutcome::Unreachable)
            }
        }
    }
}

/// Reads a template from a JSON file, or from standard input when `source` is `-`.
pub fn read_template(source: &str) -> Result<Template, Error> {
    let content = if source == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(Error::LoadFile)?;
        buffer
    } else {
        fs::read_to_string(source).map_err(Error::LoadFile)?
    };

    parse_template(&content)
}

fn parse_template(content: &str) -> Result<Template, Error> {
    serde_json::from_str(content).map_err(Error::ParseTemplate)
}

fn write_json<T: serde::Serialize>(out: &mut dyn Write, value: &T) -> Result<(), Error> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| Error::Output(io::Error::new(io::ErrorKind::InvalidData, e)))?;
    writeln!(out, "{}", text).map_err(Error::Output)
}
