use anyhow::Result;
use log::{info, warn};
use traffic_graph::config::{load_config, AppConfig, OutputFormat};
use traffic_graph::logging::logger;
use traffic_graph::{
    fetch_snapshot, JsonRenderer, LogRenderer, Renderer, SeriesRegistry, StreamController,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;
    logger::setup_logging(config.log_level)?;

    match config.output {
        OutputFormat::Json => run(config, JsonRenderer::new(std::io::stdout())).await,
        OutputFormat::Log => run(config, LogRenderer).await,
    }
}

async fn run<R: Renderer>(config: AppConfig, renderer: R) -> Result<()> {
    let mut controller = StreamController::new(
        SeriesRegistry::new(config.max_ticks_x),
        renderer,
        config.chart_options(),
    );

    if let Some(url) = &config.url {
        match fetch_snapshot(url).await {
            Ok(snapshot) => controller.load_snapshot(&snapshot),
            Err(e) => warn!("{}", e),
        }
    }

    if !config.websocket.enabled {
        info!("Websocket disabled, showing snapshot only");
        return Ok(());
    }

    tokio::select! {
        res = controller.run(config.websocket.uri.as_deref()) => match res {
            Ok(state) => info!("Live feed stopped ({})", state),
            Err(e) => warn!("No live updates: {}", e),
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl-C");
        },
    }

    info!(
        "Shutting down with {} series tracked",
        controller.registry().len()
    );
    Ok(())
}
