// src/main.rs
use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion_blog::{
    export_site, serve, AppState, BlogConfig, BlogRepository, Command, CommandLineInput,
    NotionHttpClient, Pages,
};
use std::fs;
use std::sync::Arc;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("notion_blog.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose).context("failed to initialize logging")?;

    let config = BlogConfig::resolve(cli).context("invalid configuration")?;

    let repository: Arc<dyn BlogRepository> = Arc::new(
        NotionHttpClient::new(&config.api_key, config.database_id.clone())
            .context("failed to build the Notion client")?,
    );
    let pages = Pages::new(config.site_title.clone(), config.revalidate)
        .context("failed to compile page templates")?;

    match config.command {
        Command::Serve { bind } => {
            let state = AppState::new(
                repository,
                pages,
                config.preview_secret.clone(),
                config.revalidate,
            );
            serve(bind, state)
                .await
                .with_context(|| format!("server on {} stopped", bind))?;
        }
        Command::Export { ref out } => {
            let report = export_site(repository.as_ref(), &pages, config.revalidate, out)
                .await
                .with_context(|| format!("failed to export the blog to {}", out.display()))?;
            println!(
                "✓ Exported {} pages to {}",
                report.pages_written(),
                out.display()
            );
        }
    }

    Ok(())
}
