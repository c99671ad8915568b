//! Clap derive structures for the `sitecms` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use sitecms_core::{AdminRenderer, PublicRenderer, Renderer, ThemeMode};

/// Default export file name
pub const DEFAULT_EXPORT_FILE: &str = "ac_site_config.json";

/// sitecms -- edit and render the site configuration document
#[derive(Debug, Parser)]
#[command(
    name = "sitecms",
    version,
    about = "Edit, render and sync the site configuration document",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Storage backend
    #[arg(long, env = "SITECMS_STORAGE_TYPE", default_value = "file", global = true)]
    pub storage: StorageKind,

    /// Directory for the file backend
    #[arg(long, env = "SITECMS_STORAGE_DIR", default_value = ".sitecms", global = true)]
    pub storage_dir: PathBuf,

    /// Key the document is persisted under
    #[arg(long, env = "SITECMS_STORAGE_KEY", global = true)]
    pub storage_key: Option<String>,

    /// Render as if the platform prefers a dark color scheme
    #[arg(long, env = "SITECMS_PREFERS_DARK", global = true)]
    pub prefers_dark: bool,

    /// Poll interval for external changes in watch mode
    #[arg(long, env = "SITECMS_POLL_INTERVAL_MS", default_value = "500", global = true)]
    pub poll_interval_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SITECMS_LOG_LEVEL", default_value = "warn", global = true)]
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageKind {
    /// One JSON file per key in the storage directory
    File,
    /// Process memory; nothing survives the command
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewKind {
    /// The form editor
    Admin,
    /// The public site
    Public,
}

impl ViewKind {
    pub fn renderer(self) -> Box<dyn Renderer> {
        match self {
            ViewKind::Admin => Box::new(AdminRenderer),
            ViewKind::Public => Box::new(PublicRenderer),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Collection {
    Service,
    Partner,
    Project,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Light,
    Dark,
    System,
}

impl From<ModeArg> for ThemeMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Light => ThemeMode::Light,
            ModeArg::Dark => ThemeMode::Dark,
            ModeArg::System => ThemeMode::System,
        }
    }
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the current document as JSON
    Show {
        /// List the keys held by the storage backend instead
        #[arg(long)]
        keys: bool,
    },

    /// Render a view once
    Render {
        #[arg(long, value_enum, default_value = "public")]
        view: ViewKind,

        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Set one field by its form id (e.g. i-brand, i-srv-title-0)
    Set { field: String, value: String },

    /// Append a placeholder entry
    Add {
        #[arg(value_enum)]
        collection: Collection,
    },

    /// Remove the entry at INDEX
    #[command(alias = "rm")]
    Remove {
        #[arg(value_enum)]
        collection: Collection,
        index: usize,
    },

    /// Theme operations
    #[command(subcommand)]
    Theme(ThemeCommand),

    /// Write the document as pretty JSON
    Export {
        #[arg(long, default_value = DEFAULT_EXPORT_FILE)]
        out: PathBuf,
    },

    /// Merge an exported document into the current one
    Import { file: PathBuf },

    /// Restore every section to its defaults
    Reset,

    /// Re-render a view to a file whenever the document changes
    Watch {
        #[arg(long, value_enum, default_value = "public")]
        view: ViewKind,

        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum ThemeCommand {
    /// Choose light, dark, or follow the system
    Mode {
        #[arg(value_enum)]
        mode: ModeArg,
    },
    /// Switch between light and dark based on what renders now
    Toggle,
    /// Restore the default theme
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_remove_with_index() {
        let cli = Cli::try_parse_from(["sitecms", "remove", "service", "2"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Remove {
                collection: Collection::Service,
                index: 2
            }
        ));
        assert_eq!(cli.global.storage, StorageKind::File);
    }

    #[test]
    fn export_defaults_to_site_config_file() {
        let cli = Cli::try_parse_from(["sitecms", "export"]).unwrap();
        match cli.command {
            Command::Export { out } => assert_eq!(out, PathBuf::from(DEFAULT_EXPORT_FILE)),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn show_lists_keys_on_request() {
        let cli = Cli::try_parse_from(["sitecms", "show"]).unwrap();
        assert!(matches!(cli.command, Command::Show { keys: false }));

        let cli = Cli::try_parse_from(["sitecms", "show", "--keys"]).unwrap();
        assert!(matches!(cli.command, Command::Show { keys: true }));
    }

    #[test]
    fn theme_mode_subcommand() {
        let cli = Cli::try_parse_from(["sitecms", "--storage", "memory", "theme", "mode", "dark"])
            .unwrap();
        assert_eq!(cli.global.storage, StorageKind::Memory);
        assert!(matches!(
            cli.command,
            Command::Theme(ThemeCommand::Mode { mode: ModeArg::Dark })
        ));
    }
}
