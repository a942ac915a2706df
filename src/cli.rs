use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, PartialEq)]
#[command(name = "gitgrove")]
#[command(about = "Discover and browse Git repositories across scan roots")]
pub struct CliArgs {
    /// Directory to scan for repositories; repeatable (overrides config)
    #[arg(long = "root", value_name = "PATH")]
    pub roots: Vec<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Print the flat repository index
    List,
    /// Print the repository tree
    Tree {
        /// Keep only repositories whose name or description contains this text
        #[arg(long, default_value = "")]
        filter: String,
    },
    /// Look up one repository by its index key and print its details
    Show {
        /// Flat-index key (path relative to its scan root)
        key: String,
    },
    /// Initialize a new repository
    Init {
        path: PathBuf,

        /// Create a bare repository
        #[arg(long)]
        bare: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_list() {
        let args = CliArgs::parse_from(["gitgrove", "list"]);
        assert!(args.roots.is_empty());
        assert_eq!(args.config, None);
        assert_eq!(args.command, Command::List);
    }

    #[test]
    fn test_cli_parse_repeated_roots() {
        let args = CliArgs::parse_from([
            "gitgrove",
            "--root",
            "/srv/git",
            "--root",
            "/opt/mirrors",
            "list",
        ]);
        assert_eq!(
            args.roots,
            vec![PathBuf::from("/srv/git"), PathBuf::from("/opt/mirrors")]
        );
    }

    #[test]
    fn test_cli_parse_tree_filter() {
        let args = CliArgs::parse_from(["gitgrove", "tree", "--filter", "web"]);
        assert_eq!(
            args.command,
            Command::Tree {
                filter: "web".to_string()
            }
        );

        let args = CliArgs::parse_from(["gitgrove", "tree"]);
        assert_eq!(
            args.command,
            Command::Tree {
                filter: String::new()
            }
        );
    }

    #[test]
    fn test_cli_parse_init_bare_with_config() {
        let args = CliArgs::parse_from([
            "gitgrove",
            "--config",
            "/custom/config.toml",
            "init",
            "/srv/git/new.git",
            "--bare",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("/custom/config.toml")));
        assert_eq!(
            args.command,
            Command::Init {
                path: PathBuf::from("/srv/git/new.git"),
                bare: true
            }
        );
    }
}
