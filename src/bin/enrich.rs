use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use folio::cli;
use folio::config::Settings;
use folio::enrich::{self, OgImageFetcher};
use folio::model::{BlogPost, Presentation};
use folio::store;

/// Print stored collections with their derived preview images as JSON.
///
/// Collection files are only read, never written.
#[derive(Parser)]
#[command(name = "enrich")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Blog posts with their Open Graph preview image
    Blog {
        /// Blog collection file (default: from settings)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Presentations with their YouTube thumbnail
    Talks {
        /// Only this year's file (default: every year, newest first)
        #[arg(short, long)]
        year: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    folio::init_tracing("info");
    let args: Cli = cli::parse_args();

    let t0 = Instant::now();
    let result = run(args.command).await;
    info!("Done in {:.1}s", t0.elapsed().as_secs_f64());

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => cli::report(&e),
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    let settings = Settings::load()?;

    let json = match command {
        Commands::Blog { file } => {
            let path = file.unwrap_or_else(|| settings.blog_path());
            let posts: Vec<BlogPost> = store::load(&path)?;
            info!("Resolving preview images for {} posts", posts.len());

            let fetcher = OgImageFetcher::from_settings(&settings)?;
            let enriched =
                enrich::enrich_blog_posts(posts, &fetcher, settings.fetch_concurrency).await;
            serde_json::to_string_pretty(&enriched).context("Failed to serialize blog posts")?
        }
        Commands::Talks { year } => {
            let dir = settings.presentations_path();
            let years = match year {
                Some(y) => vec![y],
                None => store::presentation_years(&dir)?,
            };

            let mut presentations: Vec<Presentation> = Vec::new();
            for y in &years {
                let path = dir.join(format!("{y}.json"));
                let batch: Vec<Presentation> = store::load(&path)?;
                presentations.extend(batch);
            }
            info!(
                "Deriving thumbnails for {} presentations across {} year files",
                presentations.len(),
                years.len()
            );
            serde_json::to_string_pretty(&enrich::enrich_presentations(presentations))
                .context("Failed to serialize presentations")?
        }
    };

    println!("{json}");
    Ok(())
}
