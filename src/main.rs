//! uri-resolve - resolver probe
//!
//! Resolves identifiers against a fixture-backed content service, one per
//! argument or, without arguments, one per stdin line.

use log::{error, info};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use uri_path_resolver::utils::logging::setup_logging;
use uri_path_resolver::{
    ContentQueryService, MemoryContentService, PathResolver, ResolverConfig, resolve_with_timeout,
};

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let config = match ResolverConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let service = match &config.fixture_path {
        Some(path) => match MemoryContentService::from_fixture(Path::new(path)) {
            Ok(service) => service,
            Err(e) => {
                error!("Failed to load fixture {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            info!("No fixture_path configured, only file:// and document paths can resolve");
            MemoryContentService::with_default_document_providers()
        }
    };

    let timeout = config.query_timeout();
    let service: Arc<dyn ContentQueryService + Send + Sync> = Arc::new(service);
    let resolver = Arc::new(PathResolver::new(config));

    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        for identifier in args {
            let result =
                resolve_with_timeout(Arc::clone(&resolver), Arc::clone(&service), identifier, timeout)
                    .await;
            println!("{}", result);
        }
        return ExitCode::SUCCESS;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let identifier = line.trim();
                if identifier.is_empty() {
                    continue;
                }
                let result = resolve_with_timeout(
                    Arc::clone(&resolver),
                    Arc::clone(&service),
                    identifier.to_string(),
                    timeout,
                )
                .await;
                println!("{}", result);
            }
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
