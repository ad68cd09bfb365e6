use clap::{Parser, Subcommand};
use filter_search::config::{Config, ObservabilityConfig};
use filter_search::error::AppError;
use filter_search::metrics;
use filter_search::models::Filter;
use filter_search::search::executor::dsl;
use filter_search::search::{
    create_executor, PageRequest, PagedResponse, QueryCompiler, SearchRequest, SearchService,
};
use serde_json::Value;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fsearch")]
#[command(about = "Filter and free-text search over a document cluster", long_about = None)]
struct Cli {
    /// Configuration file (overrides FILTER_SEARCH_CONFIG)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Search cluster node (overrides configuration)
    #[arg(short, long, global = true, env = "FILTER_SEARCH_NODE")]
    node: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search with a JSON filter document
    Filter {
        /// Index to search (defaults to the configured index)
        #[arg(short, long)]
        index: Option<String>,

        /// Read the filter from a file
        #[arg(short, long, conflicts_with = "json")]
        file: Option<PathBuf>,

        /// Inline filter JSON
        #[arg(short, long)]
        json: Option<String>,

        #[arg(short = 's', long)]
        page_size: Option<u32>,

        #[arg(short, long, default_value = "0")]
        page: u32,
    },

    /// Free-text search across all fields
    Text {
        #[arg(value_name = "TEXT")]
        text: String,

        #[arg(short, long)]
        index: Option<String>,

        #[arg(short = 's', long)]
        page_size: Option<u32>,

        #[arg(short, long, default_value = "0")]
        page: u32,
    },

    /// Fetch one document by id
    Get {
        #[arg(value_name = "ID")]
        id: String,

        #[arg(short, long)]
        index: Option<String>,
    },

    /// Print the cluster request a filter compiles to, without running it
    Compile {
        #[arg(short, long)]
        index: Option<String>,

        #[arg(short, long, conflicts_with = "json")]
        file: Option<PathBuf>,

        #[arg(short, long)]
        json: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: failed to load configuration: {}", e);
            std::process::exit(e.exit_code());
        }
    };
    if let Some(node) = &cli.node {
        config.search.nodes = vec![node.clone()];
    }

    init_tracing(&config.observability);

    if config.observability.metrics_enabled {
        if let Err(e) = metrics::init_metrics() {
            tracing::warn!("Failed to initialize metrics: {}", e);
        }
    }

    if let Err(e) = run(cli.command, &config).await {
        tracing::error!(error_code = e.error_code(), error = %e, "Command failed");
        eprintln!("error: {}", e);
        std::process::exit(e.exit_code());
    }

    Ok(())
}

fn init_tracing(observability: &ObservabilityConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("filter_search={}", observability.log_level).into());

    // Logs go to stderr so stdout stays pure JSON
    if observability.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(command: Commands, config: &Config) -> Result<(), AppError> {
    match command {
        Commands::Filter {
            index,
            file,
            json,
            page_size,
            page,
        } => {
            let filter = read_filter(file, json)?;
            let index = index.unwrap_or_else(|| config.search.default_index.clone());
            let page_size = page_size.unwrap_or(config.search.default_page_size);

            let service = build_service(config)?;
            let response: PagedResponse<Value> = service
                .search_by_filter_paged(&filter, page_size, page, &index)
                .await?;
            print_json(&response)
        }

        Commands::Text {
            text,
            index,
            page_size,
            page,
        } => {
            let index = index.unwrap_or_else(|| config.search.default_index.clone());
            let page_size = page_size.unwrap_or(config.search.default_page_size);

            let service = build_service(config)?;
            let response: PagedResponse<Value> = service
                .search_by_text(&text, page_size, page, &index)
                .await?;
            print_json(&response)
        }

        Commands::Get { id, index } => {
            let index = index.unwrap_or_else(|| config.search.default_index.clone());

            let service = build_service(config)?;
            let document: Option<Value> = service.search_by_id(&id, &index).await?;
            print_json(&document)
        }

        Commands::Compile { index, file, json } => {
            let filter = read_filter(file, json)?;
            let index = index.unwrap_or_else(|| config.search.default_index.clone());
            let query = QueryCompiler::new().compile(&filter)?;
            let page = PageRequest::first(config.search.default_page_size)?;

            print_json(&serde_json::json!({
                "index": index,
                "body": dsl::search_body(&SearchRequest::new(index.clone(), query, page)),
            }))
        }
    }
}

fn build_service(config: &Config) -> Result<SearchService, AppError> {
    let service = SearchService::builder(create_executor(&config.search)?)
        .default_page_size(config.search.default_page_size)
        .build()?;
    Ok(service)
}

fn read_filter(file: Option<PathBuf>, json: Option<String>) -> Result<Filter, AppError> {
    let raw = match (file, json) {
        (Some(path), _) => std::fs::read_to_string(path)?,
        (None, Some(json)) => json,
        (None, None) => return Ok(Filter::new()),
    };

    let value: Value = serde_json::from_str(&raw)?;
    Ok(Filter::from_value(value)?)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
