//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::builder::{OsStringValueParser, TypedValueParser};
use clap::{Parser, Subcommand, ValueEnum};
use graft_core::{LoaderOptions, OverrideMode};

/// graft - Resolve a package graph and print its merged configuration
#[derive(Parser, Debug)]
#[command(name = "graft")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Root package directory (defaults to the current directory)
    #[arg(long, env = "GRAFT_CWD", value_name = "DIR", global = true)]
    pub cwd: Option<PathBuf>,

    /// Additional root directory to traverse after the root package
    #[arg(short = 'd', long = "directory", value_name = "DIR", global = true)]
    pub directories: Vec<PathBuf>,

    /// A path to a configuration file applied over package configuration;
    /// empty means none
    #[arg(
        long = "config-file",
        value_parser = OsStringValueParser::new().map(PathBuf::from),
        visible_alias = "config",
        alias = "conf",
        env = "GRAFT_CONFIG_FILE",
        value_name = "PATH",
        global = true
    )]
    pub config_file: Option<PathBuf>,

    /// How override file entries combine with package configuration
    #[arg(long, value_enum, default_value_t = OverrideModeArg::Merge, global = true)]
    pub override_mode: OverrideModeArg,

    /// The command to run (defaults to `show`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the merged configuration as JSON
    Show {
        /// Print only this namespace
        #[arg(short, long)]
        namespace: Option<String>,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print one value by JSON pointer, e.g. `/cli-package2/Listen/Port`
    Get {
        /// JSON pointer whose first segment is the namespace
        pointer: String,
    },

    /// List discovered packages in visit order
    Packages {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideModeArg {
    /// Deep merge override entries into package configuration
    Merge,
    /// Replace whole namespaces with override entries
    Replace,
}

impl From<OverrideModeArg> for OverrideMode {
    fn from(arg: OverrideModeArg) -> Self {
        match arg {
            OverrideModeArg::Merge => OverrideMode::Merge,
            OverrideModeArg::Replace => OverrideMode::Replace,
        }
    }
}

impl Cli {
    /// Build loader options, defaulting `cwd` to the process directory.
    pub fn loader_options(&self) -> std::io::Result<LoaderOptions> {
        let cwd = match &self.cwd {
            Some(cwd) => cwd.clone(),
            None => std::env::current_dir()?,
        };
        Ok(LoaderOptions {
            cwd: Some(cwd),
            directories: self.directories.clone(),
            config_file_path: self.config_file.clone(),
            override_mode: self.override_mode.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "graft",
            "packages",
            "--cwd",
            "/app",
            "-d",
            "/lib/a",
            "--config",
            "/etc/o.json",
            "--override-mode",
            "replace",
        ])
        .unwrap();

        assert_eq!(cli.command, Some(Commands::Packages { json: false }));
        let options = cli.loader_options().unwrap();
        assert_eq!(options.cwd, Some(PathBuf::from("/app")));
        assert_eq!(options.directories, vec![PathBuf::from("/lib/a")]);
        assert_eq!(options.config_file_path, Some(PathBuf::from("/etc/o.json")));
        assert_eq!(options.override_mode, OverrideMode::Replace);
    }

    #[test]
    fn conf_alias_is_accepted() {
        let cli = Cli::try_parse_from(["graft", "--conf", "o.yaml"]).unwrap();
        assert_eq!(cli.config_file, Some(PathBuf::from("o.yaml")));
        assert_eq!(cli.command, None);
    }

    #[test]
    fn empty_config_file_is_accepted() {
        let cli = Cli::try_parse_from(["graft", "--config-file", ""]).unwrap();
        assert_eq!(cli.config_file, Some(PathBuf::new()));
    }

    #[test]
    fn cwd_defaults_to_process_directory() {
        let cli = Cli::try_parse_from(["graft", "show"]).unwrap();
        if cli.cwd.is_none() {
            let options = cli.loader_options().unwrap();
            assert_eq!(options.cwd, Some(std::env::current_dir().unwrap()));
        }
    }
}
