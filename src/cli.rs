use clap::Parser;
use std::ffi::OsString;
use thiserror::Error;

/// Help text printed by `-?` or an empty invocation.
pub const USAGE: &str = "\
Execute a process on the command line elevated via UAC.

Usage: ado [-?] [-wait] [-k] prog [args]
-?\tShows this help.
-wait\tWaits until prog terminates.
-k\tStarts the %COMSPEC% environment variable value and
\texecutes prog in it (CMD.EXE, etc.).
-i\tInstalls the program to the current user's application data
\tand adds it to the user's PATH variable.
-u\tUninstalls the program from the current user's application data
\tand removes it from the user's PATH variable.
prog\tThe program to execute.
[args]\tOptional command line arguments to prog.

Flags may start with '-' or '/' and are matched case-insensitively.";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unrecognized flag '{0}'")]
    UnrecognizedFlag(String),

    #[error("invalid arguments")]
    InvalidArguments,

    #[error("argument '{0}' is not valid Unicode")]
    NonUnicodeArgument(String),

    #[error(transparent)]
    Canonical(#[from] clap::Error),
}

/// The single action a request resolves to, in dispatch priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Help,
    Install,
    Uninstall,
    Comspec,
    Launch,
}

/// Flags and positionals after Windows-style tokens have been rewritten to
/// their canonical spelling.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Parser)]
#[command(
    name = "ado",
    no_binary_name = true,
    disable_help_flag = true,
    disable_version_flag = true,
    args_override_self = true
)]
struct Canonical {
    #[arg(long)]
    help: bool,

    #[arg(long)]
    wait: bool,

    #[arg(short = 'k')]
    comspec: bool,

    #[arg(short = 'i')]
    install: bool,

    #[arg(short = 'u')]
    uninstall: bool,

    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    positional: Vec<String>,
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    show_help: bool,
    wait: bool,
    use_comspec: bool,
    install: bool,
    uninstall: bool,
    application_name: Option<String>,
    command_line: String,
}

impl LaunchRequest {
    /// Parses the argument vector (program name excluded).
    ///
    /// Flag scanning stops at the first token that does not start with `-`
    /// or `/`; that token and everything after it are positional.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnrecognizedFlag`] for an unknown flag and
    /// [`ParseError::InvalidArguments`] when no program (or, with `-k`, no
    /// command) is given. Arguments that are not valid Unicode are rejected
    /// with [`ParseError::NonUnicodeArgument`].
    pub fn parse<I, S>(args: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let raw = args
            .into_iter()
            .map(|arg| {
                arg.into().into_string().map_err(|arg| {
                    ParseError::NonUnicodeArgument(arg.to_string_lossy().into_owned())
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let canonical = Canonical::try_parse_from(canonicalize(&raw)?)?;

        let mut positional = canonical.positional.into_iter();
        let application_name = if canonical.comspec || canonical.install || canonical.uninstall {
            None
        } else {
            positional.next()
        };
        let command_line = positional.collect::<Vec<_>>().join(" ").trim_end().to_owned();

        let request = Self {
            show_help: canonical.help || raw.is_empty(),
            wait: canonical.wait,
            use_comspec: canonical.comspec,
            install: canonical.install,
            uninstall: canonical.uninstall,
            application_name,
            command_line,
        };

        let missing_command = request.use_comspec && request.command_line.is_empty();
        let missing_program = !request.use_comspec
            && request.application_name.is_none()
            && !request.install
            && !request.uninstall;
        if !request.show_help && (missing_command || missing_program) {
            return Err(ParseError::InvalidArguments);
        }

        log::debug!("parsed {request:?}");
        Ok(request)
    }

    #[must_use]
    pub fn action(&self) -> Action {
        if self.show_help {
            Action::Help
        } else if self.install {
            Action::Install
        } else if self.uninstall {
            Action::Uninstall
        } else if self.use_comspec {
            Action::Comspec
        } else {
            Action::Launch
        }
    }

    #[must_use]
    pub fn show_help(&self) -> bool {
        self.show_help
    }

    #[must_use]
    pub fn wait(&self) -> bool {
        self.wait
    }

    #[must_use]
    pub fn use_comspec(&self) -> bool {
        self.use_comspec
    }

    #[must_use]
    pub fn install(&self) -> bool {
        self.install
    }

    #[must_use]
    pub fn uninstall(&self) -> bool {
        self.uninstall
    }

    #[must_use]
    pub fn application_name(&self) -> Option<&str> {
        self.application_name.as_deref()
    }

    #[must_use]
    pub fn command_line(&self) -> &str {
        &self.command_line
    }
}

/// Rewrites `-FLAG` / `/FLAG` tokens into the spelling [`Canonical`] accepts
/// and fences the positional tail behind `--` so it is taken verbatim.
fn canonicalize(raw: &[String]) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::with_capacity(raw.len() + 1);
    let mut rest = raw.iter();

    for arg in rest.by_ref() {
        let Some(name) = arg.strip_prefix(['-', '/']) else {
            tokens.push("--".to_owned());
            tokens.push(arg.clone());
            break;
        };

        let name = name.to_lowercase();
        let canonical = match name.as_str() {
            "?" => "--help",
            "wait" => "--wait",
            "k" => "-k",
            "i" => "-i",
            "u" => "-u",
            _ => return Err(ParseError::UnrecognizedFlag(name)),
        };
        tokens.push(canonical.to_owned());
    }

    tokens.extend(rest.cloned());
    Ok(tokens)
}
