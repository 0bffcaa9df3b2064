use clap::Parser;
use staticy::config::{Cli, Config};
use staticy::fs::{Dir, UnindexedDir};
use staticy::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cfg = Config::load(&cli)?;
    logger::init(&cfg)?;

    // Worker threads default to the number of CPU cores
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    let result = runtime.block_on(async {
        let root = Dir::new(&cfg.server.docroot);
        if cfg.server.indexing {
            server::run(&cfg, UnindexedDir::new(root)).await
        } else {
            server::run(&cfg, root).await
        }
    });

    if let Err(e) = result {
        logger::log_error(&format!("Error starting the HTTP server: {e}"));
        std::process::exit(1);
    }
    Ok(())
}
