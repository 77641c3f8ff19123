// src/config.rs
use crate::constants::{DEFAULT_REVALIDATE_SECONDS, DEFAULT_SITE_TITLE};
use crate::error::AppError;
use crate::types::{ApiKey, DatabaseId, PreviewSecret};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Blog index database: URL or ID of the Notion table listing the posts
    #[arg(long, env = "NOTION_BLOG_INDEX_ID")]
    pub database: String,

    /// Secret that `/api/preview?token=...` must present to enter preview mode
    #[arg(long, env = "BLOG_PREVIEW_SECRET")]
    pub preview_secret: Option<String>,

    /// Seconds a rendered page may be served before it is regenerated
    #[arg(long, env = "BLOG_REVALIDATE_SECONDS", default_value_t = DEFAULT_REVALIDATE_SECONDS)]
    pub revalidate: u64,

    /// Site name shown in the header and page titles
    #[arg(long, env = "BLOG_SITE_TITLE", default_value = DEFAULT_SITE_TITLE)]
    pub site_title: String,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Serve the blog over HTTP (the default)
    Serve {
        /// Address to listen on
        #[arg(long, env = "BLOG_BIND", default_value = "127.0.0.1:3000")]
        bind: SocketAddr,
    },
    /// Render every published page into a directory of static HTML
    Export {
        /// Output directory
        #[arg(short, long, default_value = "dist")]
        out: PathBuf,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Serve {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}

/// Resolved blog configuration, validated and ready to build the site.
#[derive(Debug, Clone)]
pub struct BlogConfig {
    pub api_key: ApiKey,
    pub database_id: DatabaseId,
    pub preview_secret: Option<PreviewSecret>,
    pub revalidate: u64,
    pub site_title: String,
    pub command: Command,
}

impl BlogConfig {
    /// Resolves a complete configuration from CLI input and environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        let api_key_str = std::env::var("NOTION_API_KEY").map_err(|_| {
            AppError::MissingConfiguration(
                "NOTION_API_KEY environment variable not set".to_string(),
            )
        })?;

        Self::from_parts(ApiKey::new(api_key_str)?, cli)
    }

    /// Resolves everything except the API key, which the caller supplies.
    pub fn from_parts(api_key: ApiKey, cli: CommandLineInput) -> Result<Self, AppError> {
        let database_id = DatabaseId::parse(&cli.database)?;

        let preview_secret = match cli.preview_secret {
            Some(secret) if !secret.is_empty() => Some(PreviewSecret::new(secret)?),
            _ => {
                log::warn!("No preview secret configured; preview mode cannot be entered");
                None
            }
        };

        if cli.site_title.trim().is_empty() {
            return Err(AppError::MissingConfiguration(
                "site title cannot be empty".to_string(),
            ));
        }

        Ok(BlogConfig {
            api_key,
            database_id,
            preview_secret,
            revalidate: cli.revalidate,
            site_title: cli.site_title,
            command: cli.command.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATABASE: &str = "d9824bdc84454327be8b5b47500af6ce";
    const SECRET: &str = "a-preview-secret-of-thirty-two-b";

    fn key() -> ApiKey {
        ApiKey::new("secret_abcdefghijklmnopqrs").unwrap()
    }

    fn parse(args: &[&str]) -> CommandLineInput {
        let mut argv = vec!["notion-blog", "--database", DATABASE];
        argv.extend_from_slice(args);
        CommandLineInput::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = BlogConfig::from_parts(key(), parse(&[])).unwrap();
        assert_eq!(config.database_id.as_str(), DATABASE);
        assert_eq!(config.revalidate, DEFAULT_REVALIDATE_SECONDS);
        assert_eq!(config.site_title, DEFAULT_SITE_TITLE);
        assert!(config.preview_secret.is_none());
        assert_eq!(config.command, Command::default());
        assert!(!format!("{:?}", config).contains("abcdefghijklmnopqrs"));
    }

    #[test]
    fn test_export_subcommand() {
        let config = BlogConfig::from_parts(
            key(),
            parse(&["--revalidate", "60", "export", "--out", "public"]),
        )
        .unwrap();
        assert_eq!(config.revalidate, 60);
        assert_eq!(
            config.command,
            Command::Export {
                out: PathBuf::from("public")
            }
        );
    }

    #[test]
    fn test_serve_bind_address() {
        let config =
            BlogConfig::from_parts(key(), parse(&["serve", "--bind", "0.0.0.0:8080"])).unwrap();
        assert_eq!(
            config.command,
            Command::Serve {
                bind: "0.0.0.0:8080".parse().unwrap()
            }
        );
    }

    #[test]
    fn test_preview_secret_is_validated() {
        let config =
            BlogConfig::from_parts(key(), parse(&["--preview-secret", SECRET])).unwrap();
        assert!(config.preview_secret.unwrap().matches(SECRET));

        assert!(BlogConfig::from_parts(key(), parse(&["--preview-secret", "short"])).is_err());
        assert!(BlogConfig::from_parts(key(), parse(&["--preview-secret", "long-enough"])).is_err());
    }

    #[test]
    fn test_rejects_bad_database_id() {
        let cli = CommandLineInput::try_parse_from(["notion-blog", "--database", "nope"]).unwrap();
        assert!(matches!(
            BlogConfig::from_parts(key(), cli),
            Err(AppError::ValidationError(_))
        ));
    }
}
