mod config;
mod error;
mod model;
mod web;

use actix_web::{middleware::Logger, App, HttpServer, web::Data};
use dotenv::dotenv;
use log::{info, error};
use std::sync::Arc;

use config::Settings;
use model::{OpenAiClient, ResponseGenerator};
use web::routes;

// App state structure
pub struct AppState {
    pub generator: Arc<ResponseGenerator>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting species chat service");

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize the completion service client
    let client = match OpenAiClient::new(&settings) {
        Ok(client) => {
            info!("Completion service client initialized");
            client
        },
        Err(e) => {
            error!("Failed to initialize completion service client: {}", e);
            std::process::exit(1);
        }
    };

    // Create app state
    let app_state = Data::new(AppState {
        generator: Arc::new(ResponseGenerator::new(Arc::new(client))),
    });

    info!("Listening on {}:{}", settings.host, settings.port);

    // Start web server
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .configure(routes::configure)
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await
}
