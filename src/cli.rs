use std::path::PathBuf;

use thiserror::Error;

/// Inputs longer than this are refused before any work starts.
pub const MAX_INPUT_LEN: usize = 996;

pub const USAGE: &str = "\
Usage:
  edgy [--config <path>] -font <font name or file>
  edgy [--config <path>] -png <image file>
  edgy -info <file.edgy>

Paths must use '/' separators; a backslash is not treated as one.";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum UsageError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Bake a font atlas from a family name or font file.
    Font(String),
    /// Dump a decoded image as raw RGBA pixels.
    Png(String),
    /// Print the header of an existing container.
    Info(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub config: Option<PathBuf>,
    pub command: Command,
}

/// Parse everything after the program name.
pub fn parse_args<I, S>(args: I) -> Result<Invocation, UsageError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    let mut config = None;
    let mut command = None;

    let mut i = 0usize;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = args
            .get(i + 1)
            .ok_or_else(|| UsageError::InvalidArguments(format!("{flag} expects a value")))?;
        match flag {
            "--config" => {
                if config.replace(PathBuf::from(value)).is_some() {
                    return Err(UsageError::InvalidArguments(
                        "--config given more than once".into(),
                    ));
                }
            }
            "-font" | "-png" | "-info" => {
                if command.is_some() {
                    return Err(UsageError::InvalidArguments(
                        "only one of -font, -png or -info may be given".into(),
                    ));
                }
                if value.len() > MAX_INPUT_LEN {
                    return Err(UsageError::InvalidArguments(format!(
                        "input is {} characters, at most {} are allowed",
                        value.len(),
                        MAX_INPUT_LEN
                    )));
                }
                command = Some(match flag {
                    "-font" => Command::Font(value.clone()),
                    "-png" => Command::Png(value.clone()),
                    _ => Command::Info(PathBuf::from(value)),
                });
            }
            other => {
                return Err(UsageError::InvalidArguments(format!(
                    "unknown flag {other:?}"
                )));
            }
        }
        i += 2;
    }

    let command = command.ok_or_else(|| {
        UsageError::InvalidArguments("expected -font, -png or -info".into())
    })?;
    if let Command::Font(name) | Command::Png(name) = &command {
        if name.is_empty() || name.ends_with('/') {
            return Err(UsageError::InvalidArguments(format!(
                "{name:?} does not end in a file or family name"
            )));
        }
    }
    Ok(Invocation { config, command })
}
