use anyhow::{Context, Result as AnyhowResult};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use apifinder::cli::{Args, Command};
use apifinder::display::{format_search_results, format_stats, format_test_response};
use apifinder::{
    parse_args, start_grpc_server, test_endpoint, CatalogLoader, Config, EngineHandle,
    HttpTransport, ReqwestTransport, SearchFilters,
};

fn init_tracing(debug: bool) {
    // Logs go to stderr so `--json` output stays machine-readable.
    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> AnyhowResult<Config> {
    let mut config = Config::load_or_default(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    if let Some(catalog) = &args.catalog {
        config.catalog.path = catalog.clone();
    }
    if let Command::Serve {
        address: Some(address),
    } = &args.command
    {
        config.server.address = address.clone();
    }
    config.validate().map_err(|e| anyhow::anyhow!(e))?;
    Ok(config)
}

fn open_engine(config: &Config) -> AnyhowResult<Arc<EngineHandle>> {
    let loader = CatalogLoader::new(&config.catalog.path);
    let engine = EngineHandle::open(loader, config.ranking.max_features)
        .with_context(|| format!("Failed to load catalog {}", config.catalog.path.display()))?;
    Ok(Arc::new(engine))
}

#[tokio::main]
async fn main() -> AnyhowResult<()> {
    let args = parse_args();
    init_tracing(args.debug);

    let config = load_config(&args)?;
    debug!("Effective configuration: {:?}", config);

    match args.command {
        Command::Search {
            query,
            categories,
            auth_types,
            https_only,
            cors_yes,
            limit,
            json,
        } => {
            let engine = open_engine(&config)?.current()?;
            let filters = SearchFilters::default()
                .with_categories(categories)
                .with_auth_types(auth_types)
                .https_only(https_only)
                .cors_yes(cors_yes);
            let limit = limit.unwrap_or(config.search.default_limit);

            let result = engine.search(&query, &filters, limit)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                if let Some(notice) = engine.catalog().notice() {
                    eprintln!("{}", notice);
                }
                print!("{}", format_search_results(&result));
            }
        }

        Command::Test {
            url,
            method,
            headers,
            body,
            json,
        } => {
            let transport = ReqwestTransport::new(&config.tester)?;
            let outcome =
                test_endpoint(&transport, &config.tester, &method, &url, &headers, &body).await;
            match (outcome, json) {
                (Ok(response), true) => println!("{}", serde_json::to_string_pretty(&response)?),
                (Ok(response), false) => print!("{}", format_test_response(&response)),
                (Err(e), true) => {
                    println!("{}", serde_json::json!({ "error": e.to_string() }));
                    std::process::exit(1);
                }
                (Err(e), false) => return Err(anyhow::anyhow!("Error: {}", e)),
            }
        }

        Command::Stats { json } => {
            let engine = open_engine(&config)?.current()?;
            let stats = engine.catalog().stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                if let Some(notice) = &stats.notice {
                    eprintln!("{}", notice);
                }
                print!("{}", format_stats(&stats));
            }
        }

        Command::Serve { .. } => {
            let engine = open_engine(&config)?;
            let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(&config.tester)?);
            info!("Starting apifinder v{}", env!("CARGO_PKG_VERSION"));
            start_grpc_server(Arc::new(config), engine, transport)
                .await
                .map_err(|e| anyhow::anyhow!("gRPC server failed: {}", e))?;
        }
    }

    Ok(())
}
