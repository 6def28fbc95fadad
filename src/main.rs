use anyhow::Result;
use clap::Parser;
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bilisub::bili::BiliClient;
use bilisub::cli::{Cli, Commands, OutputFormat};
use bilisub::config::Config;
use bilisub::llm::LlmClient;
use bilisub::output;
use bilisub::resolver::Resolver;
use bilisub::JobCoordinator;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG overrides the flag-derived default
    let default_filter = if cli.verbose {
        "bilisub=debug"
    } else if cli.quiet {
        "bilisub=warn"
    } else {
        "bilisub=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::load().await?;

    match cli.command {
        Commands::Info { input, json } => {
            let resolver = Resolver::from_config(&config)?;
            let bvid = resolver.resolve(&input).await?;

            let client = BiliClient::new(&config.api.base_url, config.api.timeout_secs)?;
            let metadata = client.fetch_metadata(&bvid).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&metadata)?);
            } else {
                println!("{}", output::format_metadata_card(&metadata));
            }
        }
        Commands::Transcribe {
            input,
            cid,
            output: output_path,
            format,
            no_simplify,
        } => {
            if no_simplify {
                config.app.simplify = false;
            }

            let resolver = Resolver::from_config(&config)?;
            let bvid = resolver.resolve(&input).await?;

            let cid = match cid {
                Some(cid) => cid,
                None => {
                    let client = BiliClient::new(&config.api.base_url, config.api.timeout_secs)?;
                    client.fetch_metadata(&bvid).await?.cid
                }
            };

            let format = format.unwrap_or_else(|| default_format(&config));
            let coordinator = JobCoordinator::new(&config)?;

            tracing::info!("Starting transcription for {} (cid {})", bvid, cid);
            let submission = coordinator.submit(&bvid, cid).await?;
            let result = coordinator.complete(submission).await?;

            match output_path {
                Some(path) => {
                    output::save_to_file(&result, &path, &format).await?;
                    println!("Subtitles saved to: {}", style(path.display()).green());
                }
                None => {
                    output::print_to_console(&result, &format)?;
                }
            }
        }
        Commands::Resolve { input } => {
            let resolver = Resolver::from_config(&config)?;
            let bvid = resolver.resolve(&input).await?;

            println!("{}", style(&bvid).cyan().bold());
            println!("https://www.bilibili.com/video/{}", bvid);
        }
        Commands::Summarize { input, cid, prompt } => {
            // Fail on a missing API key before any transcription work
            let llm = LlmClient::from_config(&config)?;

            let resolver = Resolver::from_config(&config)?;
            let bvid = resolver.resolve(&input).await?;

            let client = BiliClient::new(&config.api.base_url, config.api.timeout_secs)?;
            let metadata = client.fetch_metadata(&bvid).await?;
            let cid = cid.unwrap_or(metadata.cid);

            let coordinator = JobCoordinator::new(&config)?;
            tracing::info!("Starting transcription for {} (cid {})", bvid, cid);
            let submission = coordinator.submit(&bvid, cid).await?;
            let result = coordinator.complete(submission).await?;

            if result.is_empty() {
                anyhow::bail!("Transcription produced no text to summarize");
            }

            tracing::info!("Summarizing transcript with {}", config.llm.model);
            let summary = llm
                .summarize(&metadata.title, &result.text, prompt.as_deref())
                .await?;

            println!("{}", summary);
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                let path = Config::config_path()?;
                println!("Config file: {}", path.display());
                println!("Edit it directly; delete it to regenerate the defaults.");
            }
        }
    }

    Ok(())
}

fn default_format(config: &Config) -> OutputFormat {
    <OutputFormat as clap::ValueEnum>::from_str(&config.app.default_format, true).unwrap_or_else(
        |_| {
            tracing::warn!(
                "Unknown default format {:?} in config, using text",
                config.app.default_format
            );
            OutputFormat::Text
        },
    )
}
