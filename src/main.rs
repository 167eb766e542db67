mod cli;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use futures::TryStreamExt;
use organizer::{CategoryMap, ReportWriter};
use reddit_client::{RedditAuthConfig, RedditClient};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "saved_sorter=info,reddit_client=info,organizer=info".into()
            }),
        )
        .init();

    let args = Cli::parse();
    run(args).await
}

async fn run(args: Cli) -> anyhow::Result<()> {
    let categories = CategoryMap::load(&args.categories)
        .with_context(|| format!("failed to load {}", args.categories.display()))?;
    info!(
        "Loaded {} categories from {}",
        categories.len(),
        args.categories.display()
    );

    let user_agent = format!(
        "saved-sorter/{} by /u/{}",
        env!("CARGO_PKG_VERSION"),
        args.username
    );
    let client = RedditClient::new(RedditAuthConfig {
        client_id: args.client_id,
        client_secret: args.client_secret,
        username: args.username,
        password: args.password,
        user_agent,
    })
    .context("failed to build the Reddit client")?;
    let session = client
        .authenticate()
        .await
        .context("Reddit authentication failed")?;

    let writer = ReportWriter::create(&args.output)
        .with_context(|| format!("failed to stage {}", args.output.display()))?;

    let mut reported = 0usize;
    let mut skipped = 0usize;

    let items = session.saved_items();
    futures::pin_mut!(items);
    while let Some(item) = items.try_next().await? {
        let record = match item.normalize() {
            Ok(record) => record,
            Err(err) => {
                warn!("Skipping saved item: {}", err);
                skipped += 1;
                continue;
            }
        };

        let matches = categories.classify(&record);
        writer.append(&record, &matches)?;
        reported += 1;

        if args.unsave {
            // Best effort; a failed unsave never blocks the run.
            if let Err(err) = session.unsave(&item).await {
                warn!("{}", err);
            }
        }
    }

    let output = writer.finalize()?;
    info!(
        "Wrote {} saved items to {} ({} skipped)",
        reported,
        output.display(),
        skipped
    );
    Ok(())
}
