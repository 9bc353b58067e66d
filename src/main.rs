use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use todo_api::{auth::TokenIssuer, routes, store::PgStore, Config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(to_io)?;
    let store = PgStore::connect(&config).await.map_err(to_io)?;
    store.migrate().await.map_err(to_io)?;
    let issuer = TokenIssuer::from_config(&config);

    log::info!(
        "Starting todo_api at {} (token ttl {} min, refresh grace {} min)",
        config.server_url(),
        config.access_token_ttl_minutes,
        config.refresh_grace_minutes
    );

    let bind_addr = (config.server_host.clone(), config.server_port);
    let store = web::Data::new(store);
    let issuer = web::Data::new(issuer);
    let config = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .app_data(issuer.clone())
            .app_data(config.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config::<PgStore>)
    })
    .bind(bind_addr)?
    .run()
    .await
}

fn to_io(err: todo_api::AppError) -> std::io::Error {
    log::error!("{}", err);
    std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
}
