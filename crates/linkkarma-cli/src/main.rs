mod display;

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use linkkarma_ai::gemini::GeminiClient;
use linkkarma_ai::{ContentGenerator, LlmClient, RateLimiter, SecurityVerifier};
use linkkarma_core::{Category, UserTier};
use linkkarma_fetch::ContentExtractor;
use linkkarma_server::{Config, FetchConfig, LlmConfig};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "linkkarma", version, about = "AI showcases for referral links")]
struct Cli {
    /// Print JSON instead of a card.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API.
    Serve {
        #[command(flatten)]
        config: Config,
    },
    /// Check a referral link's reputation.
    Verify {
        url: String,
        #[command(flatten)]
        llm: LlmConfig,
    },
    /// Fetch a referral page and show the text the model would see.
    Extract {
        url: String,
        #[command(flatten)]
        fetch: FetchConfig,
    },
    /// Verify a link and generate its showcase copy.
    Generate {
        url: String,
        #[arg(long, short)]
        category: Category,
        #[arg(long, default_value = "cli")]
        user_id: String,
        #[arg(long, default_value = "free")]
        tier: UserTier,
        #[command(flatten)]
        llm: LlmConfig,
        #[command(flatten)]
        fetch: FetchConfig,
    },
}

fn llm_client(config: &LlmConfig) -> anyhow::Result<Arc<dyn LlmClient>> {
    let client = GeminiClient::new(config.gemini()).context("building Gemini client")?;
    Ok(Arc::new(client))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::info!("linkkarma v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Serve { config } => {
            linkkarma_server::start_server(&config)
                .await
                .context("running HTTP server")?;
        }
        Command::Verify { url, llm } => {
            let verifier = SecurityVerifier::new(llm_client(&llm)?);
            let check = verifier.verify(&url).await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&check)?);
            } else {
                display::print_security_card(&url, &check);
            }
        }
        Command::Extract { url, fetch } => {
            let extractor = ContentExtractor::new(fetch.timeout()).context("building HTTP client")?;
            let page = extractor
                .extract(&url)
                .await
                .with_context(|| format!("extracting {url}"))?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else {
                display::print_page_card(&page);
            }
        }
        Command::Generate {
            url,
            category,
            user_id,
            tier,
            llm,
            fetch,
        } => {
            let client = llm_client(&llm)?;
            let check = SecurityVerifier::new(client.clone()).verify(&url).await;
            if check.is_blocked() {
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&check)?);
                } else {
                    display::print_security_card(&url, &check);
                }
                anyhow::bail!("link blocked by security verification: {url}");
            }

            let extractor = ContentExtractor::new(fetch.timeout()).context("building HTTP client")?;
            let page = extractor
                .extract(&url)
                .await
                .with_context(|| format!("extracting {url}"))?;

            let generator = ContentGenerator::new(client, Arc::new(RateLimiter::default()));
            let showcase = generator
                .generate(&page, category, &user_id, tier)
                .await
                .context("generating showcase content")?;

            if cli.json {
                let out = serde_json::json!({
                    "data": showcase,
                    "security_check": check,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                display::print_security_card(&url, &check);
                display::print_showcase_card(&showcase);
            }
        }
    }

    Ok(())
}
