use std::io;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{info, warn};
use sqlx::postgres::PgPoolOptions;

use tasktrack::config::Config;
use tasktrack::routes::health;
use tasktrack::state::AppState;

fn to_io_error<E: std::fmt::Display>(context: &'static str) -> impl Fn(E) -> io::Error {
    move |e| io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, e))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(to_io_error("Invalid configuration"))?;

    let state = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(url)
                .await
                .map_err(to_io_error("Failed to connect to database"))?;
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .map_err(to_io_error("Failed to run migrations"))?;
            info!("Connected to Postgres");
            AppState::postgres(pool, &config)
        }
        None => {
            warn!("DATABASE_URL is not set; using the in-memory store, data will not persist");
            AppState::in_memory(&config)
        }
    };

    info!("Starting server at {}", config.server_url());
    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .app_data(web::Data::new(state.backend))
            .service(health::health)
            .service(web::scope("/api").configure(move |cfg| state.configure(cfg)))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
