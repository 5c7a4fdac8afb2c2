use sculk_common::config::ServerConfig;
use sculk_logger::log;
use sculk_logger::LogSeverity::{Info, Warning};
use sculk_server::server;
use std::path::Path;

#[tokio::main]
async fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => match ServerConfig::load(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                log(
                    format!("Failed to load {}: {}, using defaults", path, e),
                    Warning,
                );
                ServerConfig::default()
            }
        },
        None => ServerConfig::default(),
    };

    log("sculk init".to_owned(), Info);
    server::run(config).await;
}
