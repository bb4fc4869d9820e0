//! Command-line surface.
//!
//! # Responsibilities
//! - Declare the `start` command and its flags
//! - Record which flags were passed explicitly
//! - Turn parsed arguments into a [`RawInput`]
//!
//! # Design Decisions
//! - Flags are optional at the clap level so "explicitly set" is observable;
//!   defaults are filled in from [`LiteConfig`] afterwards
//! - Positional arguments are accepted by clap and rejected by validation,
//!   so the user gets the validator's message
//! - List flags accept repeated use and comma-separated values

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Args, CommandFactory, FromArgMatches, Parser, Subcommand};

use crate::config::defaults::LiteConfig;
use crate::config::raw::{FlagValue, RawInput};

pub const EPHEMERAL_FLAG: &str = "ephemeral";
pub const DB_PATH_FLAG: &str = "filename";
pub const PORT_FLAG: &str = "port";
pub const IP_FLAG: &str = "ip";
pub const LOG_FORMAT_FLAG: &str = "log-format";
pub const NAMESPACE_FLAG: &str = "namespace";
pub const SEARCH_ATTR_KEY_FLAG: &str = "search-attributes-key";
pub const SEARCH_ATTR_TYPE_FLAG: &str = "search-attributes-type";

#[derive(Debug, Parser)]
#[command(name = "workflow-lite")]
#[command(about = "Embedded workflow orchestration server", long_about = None)]
#[command(version, subcommand_required = true, arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the workflow server
    Start(StartArgs),
}

#[derive(Debug, Args)]
pub struct StartArgs {
    /// Optional search attribute keys registered at startup; separate multiple keys with ,
    #[arg(long = SEARCH_ATTR_KEY_FLAG, value_name = "KEY", value_delimiter = ',')]
    pub search_attribute_keys: Option<Vec<String>>,

    /// Optional search attribute types registered at startup; separate multiple types with ,
    #[arg(long = SEARCH_ATTR_TYPE_FLAG, value_name = "TYPE", value_delimiter = ',')]
    pub search_attribute_types: Option<Vec<String>>,

    /// Enable the in-memory storage driver **data will be lost on restart**
    #[arg(
        long = EPHEMERAL_FLAG,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub ephemeral: Option<bool>,

    /// File in which to persist server state
    #[arg(short = 'f', long = DB_PATH_FLAG, value_name = "PATH")]
    pub filename: Option<PathBuf>,

    /// Port for the frontend service
    #[arg(short = 'p', long = PORT_FLAG)]
    pub port: Option<u16>,

    /// Address the frontend binds to
    #[arg(long = IP_FLAG, value_name = "ADDR")]
    pub ip: Option<String>,

    /// Customize the log formatting (allowed: "json", "pretty")
    #[arg(long = LOG_FORMAT_FLAG, value_name = "FORMAT")]
    pub log_format: Option<String>,

    /// Namespaces that should be pre-created
    #[arg(short = 'n', long = NAMESPACE_FLAG, value_name = "NAME", value_delimiter = ',')]
    pub namespaces: Option<Vec<String>>,

    #[arg(hide = true)]
    pub args: Vec<String>,
}

impl StartArgs {
    /// Fill unset flags from `defaults`.
    pub fn into_raw(self, defaults: &LiteConfig) -> RawInput {
        RawInput {
            args: self.args,
            ephemeral: FlagValue::resolve(self.ephemeral, defaults.ephemeral),
            filename: FlagValue::resolve(self.filename, defaults.database_file_path.clone()),
            port: FlagValue::resolve(self.port, defaults.frontend_port),
            ip: FlagValue::resolve(self.ip, defaults.frontend_ip.clone()),
            log_format: FlagValue::resolve(self.log_format, defaults.log_format.clone()),
            namespaces: FlagValue::resolve(self.namespaces, Vec::new()),
            search_attribute_keys: FlagValue::resolve(self.search_attribute_keys, Vec::new()),
            search_attribute_types: FlagValue::resolve(self.search_attribute_types, Vec::new()),
        }
    }
}

/// The clap command with defaults from `defaults` shown in help.
pub fn build_command(defaults: &LiteConfig) -> clap::Command {
    Cli::command().mut_subcommand("start", |start| {
        start
            .mut_arg("ephemeral", |arg| {
                arg.help(format!(
                    "Enable the in-memory storage driver **data will be lost on restart** [default: {}]",
                    defaults.ephemeral
                ))
            })
            .mut_arg("filename", |arg| {
                arg.help(format!(
                    "File in which to persist server state [default: {}]",
                    defaults.database_file_path.display()
                ))
            })
            .mut_arg("port", |arg| {
                arg.help(format!(
                    "Port for the frontend service [default: {}]",
                    defaults.frontend_port
                ))
            })
            .mut_arg("ip", |arg| {
                arg.help(format!(
                    "Address the frontend binds to [default: {}]",
                    defaults.frontend_ip
                ))
            })
            .mut_arg("log_format", |arg| {
                arg.help(format!(
                    "Customize the log formatting (allowed: \"json\", \"pretty\") [default: {}]",
                    defaults.log_format
                ))
            })
    })
}

/// What the command line asked for.
#[derive(Debug)]
pub enum Invocation {
    Start(RawInput),
}

/// Parse `args` (including the binary name) against the `start` surface.
///
/// Help and version requests come back as `Err` with a display kind; see
/// [`is_display_request`].
pub fn parse_args<I, T>(args: I, defaults: &LiteConfig) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_command(defaults).try_get_matches_from(args)?;
    let cli = Cli::from_arg_matches(&matches)?;
    match cli.command {
        Commands::Start(start) => Ok(Invocation::Start(start.into_raw(defaults))),
    }
}

/// Whether `err` is a help or version request rather than a usage error.
pub fn is_display_request(err: &clap::Error) -> bool {
    use clap::error::ErrorKind;
    matches!(
        err.kind(),
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    )
}
