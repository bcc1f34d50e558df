use std::path::{Path, PathBuf};

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;
use tokio::sync::Mutex;

mod config;
mod controller;
mod gps;
mod map;
mod model;
mod provider;
mod scene;
mod source;

use controller::ViewController;
use scene::SceneProvider;
use source::CoordinateSource;

#[derive(Debug, Parser)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the map page
    Serve { port: Option<u16> },
    /// Parse a local coordinate file and print a summary
    Check { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port } => {
            let path = match cli.config.as_deref() {
                Some(x) => x,
                None => Path::new("config.toml"),
            };
            let config = config::load(path)?;
            let port = port.unwrap_or(config.http_port);

            let provider = SceneProvider::probe(config.map.as_ref());
            let view = web::Data::new(Mutex::new(ViewController::new(
                provider,
                config.source.name.clone(),
            )));
            tokio::spawn(load(view.clone(), config.source.source()));

            info!("listening on port {port}");
            HttpServer::new(move || {
                App::new()
                    .wrap(Logger::default())
                    .app_data(view.clone())
                    .service(map::page)
                    .service(map::scene)
                    .service(map::trim)
            })
            .bind(("0.0.0.0", port))?
            .run()
            .await?;
        }

        Command::Check { path } => gps::check(&path)?,
    };

    Ok(())
}

/// Mount the view and fetch its path without holding the lock over the fetch.
async fn load<S: CoordinateSource>(view: web::Data<map::View>, source: S) {
    let resource = {
        let mut view = view.lock().await;
        if !view.begin_initialize() {
            return;
        }
        view.resource().to_string()
    };

    let result = source.fetch(&resource).await;
    view.lock().await.complete_initialize(result);
}
