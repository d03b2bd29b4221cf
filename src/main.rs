use std::io::{self, Write};
use std::sync::Arc;

use rand::{SeedableRng, rngs::StdRng};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use duesync::board::{BoardClient, TrelloConfig, TrelloHttpClient};
use duesync::calendar;
use duesync::config::Config;
use duesync::courses::{PromptResolver, request_course_names};
use duesync::services::{LabelAllocator, SyncService};
use duesync::state::SyncContext;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "duesync=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config_path = Config::resolve_path(std::env::args().nth(1));
    let config = Config::load(&config_path)?;
    info!("Loaded config from {}", config_path.display());
    let credentials = TrelloConfig::new_from_env()?;

    let mut courses = config.courses.clone();
    if courses.is_empty() {
        courses = request_course_names(&mut io::stdin().lock(), &mut io::stdout())?;
        println!();
    }

    print!("Getting ICS events...");
    io::stdout().flush()?;
    let http = reqwest::Client::new();
    let mut assignments =
        calendar::fetch_assignments(&http, &config.calendar_url, config.start_instant()).await?;
    println!("Done.\n");

    let board: Arc<dyn BoardClient> = Arc::new(TrelloHttpClient::new(credentials)?);
    let mut labels = LabelAllocator::new(StdRng::from_os_rng());
    let ctx = SyncContext::establish(
        board.as_ref(),
        &config.board,
        &config.list,
        courses,
        &mut labels,
    )
    .await?;

    let mut service = SyncService::new(board, ctx).await?;
    let mut resolver = PromptResolver::stdio();
    service.sync_all(&mut assignments, &mut resolver).await?;

    Ok(())
}
