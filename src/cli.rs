//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Vistagram - photo sharing backend
#[derive(Parser, Debug)]
#[command(name = "vistagram")]
#[command(version)]
#[command(about = "Photo sharing backend with likes and short share links", long_about = None)]
pub struct Cli {
    /// Configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Issue session tokens for local development
    Token {
        #[command(subcommand)]
        action: TokenCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum TokenCommands {
    /// Create the user if needed and print an access token
    Issue {
        #[arg(long)]
        email: String,

        #[arg(long)]
        name: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["vistagram"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["vistagram", "serve", "-c", "/etc/vistagram.toml"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some("/etc/vistagram.toml"));
        assert!(matches!(cli.command, Some(Commands::Serve)));
    }

    #[test]
    fn test_token_issue() {
        let cli = Cli::try_parse_from([
            "vistagram", "token", "issue", "--email", "ana@example.com", "--name", "Ana",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Token {
                action: TokenCommands::Issue { email, name },
            }) => {
                assert_eq!(email, "ana@example.com");
                assert_eq!(name.as_deref(), Some("Ana"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_config_generate_force() {
        let cli = Cli::try_parse_from(["vistagram", "config", "generate", "out.toml", "--force"])
            .unwrap();
        match cli.command {
            Some(Commands::Config {
                action: ConfigCommands::Generate { output_path, force },
            }) => {
                assert_eq!(output_path.as_deref(), Some("out.toml"));
                assert!(force);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
