use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;

use planstore_client::api::PlanFilters;
use planstore_client::config::{load_config, ClientConfig};
use planstore_client::observability::{logging, metrics};
use planstore_client::{ApiClient, ApiClientError, BatchRequest, RequestConfig};

#[derive(Parser)]
#[command(name = "planstore-cli")]
#[command(about = "Command-line access to the house-plan storefront API", long_about = None)]
struct Cli {
    /// Path to a TOML config file (defaults + PLANSTORE_API_URL otherwise).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the API base URL.
    #[arg(short, long)]
    url: Option<String>,

    /// Bearer token to attach to every request.
    #[arg(short, long, env = "PLANSTORE_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe the API health endpoint
    Health,
    /// GET an endpoint and print the response envelope
    Get {
        endpoint: String,
        #[arg(long)]
        retries: Option<u32>,
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// List plans matching filters
    Plans(PlanArgs),
    /// GET several endpoints in batches
    Batch {
        endpoints: Vec<String>,
        #[arg(long, default_value_t = 5)]
        concurrency: usize,
    },
    /// Show client configuration and resilience state
    Status,
}

#[derive(Args)]
struct PlanArgs {
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    min_price: Option<f64>,
    #[arg(long)]
    max_price: Option<f64>,
    #[arg(long)]
    bedrooms: Option<u32>,
    #[arg(long)]
    featured: bool,
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    limit: Option<u32>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::from_env()?,
    };
    if let Some(url) = cli.url {
        config = config.with_base_url(url)?;
    }

    logging::init_logging(&config.observability);
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let client = ApiClient::new(&config)?;
    client.set_auth_token(cli.token.as_deref());

    match cli.command {
        Commands::Health => {
            let healthy = client.health_check().await;
            println!("{}", if healthy { "healthy" } else { "unhealthy" });
            return Ok(if healthy { ExitCode::SUCCESS } else { ExitCode::FAILURE });
        }
        Commands::Get { endpoint, retries, timeout_ms } => {
            let mut request = RequestConfig::default();
            request.retries = retries;
            request.timeout = timeout_ms.map(std::time::Duration::from_millis);
            let resp = client.get::<Value>(&endpoint, request).await;
            return print_result(resp.map(|r| serde_json::to_value(r).unwrap_or(Value::Null)));
        }
        Commands::Plans(args) => {
            let filters = PlanFilters {
                search: args.search,
                category: args.category,
                min_price: args.min_price,
                max_price: args.max_price,
                bedrooms: args.bedrooms,
                featured: args.featured.then_some(true),
                page: args.page,
                limit: args.limit,
                ..Default::default()
            };
            let resp = client.plans().list(&filters).await;
            return print_result(resp.map(|r| serde_json::to_value(r).unwrap_or(Value::Null)));
        }
        Commands::Batch { endpoints, concurrency } => {
            let requests = endpoints.into_iter().map(BatchRequest::get).collect();
            let results = client.batch_request::<Value>(requests, concurrency).await;
            let mut failed = false;
            for result in results {
                match result {
                    Ok(resp) => println!("{}", serde_json::to_string(&resp)?),
                    Err(e) => {
                        failed = true;
                        println!("{}", error_json(&e));
                    }
                }
            }
            return Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS });
        }
        Commands::Status => {
            let status = serde_json::json!({
                "api_root": client.api_root(),
                "config": client.config(),
                "state": client.status(),
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_result(result: Result<Value, ApiClientError>) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match result {
        Ok(json) => {
            println!("{}", serde_json::to_string_pretty(&json)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}", error_json(&e));
            Ok(ExitCode::FAILURE)
        }
    }
}

fn error_json(e: &ApiClientError) -> Value {
    serde_json::json!({
        "message": e.message,
        "statusCode": e.status_code,
        "response": e.response,
    })
}
