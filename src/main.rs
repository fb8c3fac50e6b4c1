use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use car_rental_api::{
    build_cors,
    config::{AppConfig, CachePolicy, StorageConfig},
    db::{self, MemoryStore, MongoStore, Store},
    middleware::auth::AuthMiddleware,
    routes,
    services::{auth_service::AuthService, seed_service},
};

async fn open_store(storage: &StorageConfig) -> Result<Store, db::StoreError> {
    match storage {
        StorageConfig::Mongo { uri, database } => {
            let client = db::mongo::create_mongo_client(uri).await?;
            let store = MongoStore::new(&client, database);
            store.ensure_indexes().await?;
            log::info!("Using MongoDB database '{}'", database);
            Ok(Store::Mongo(store))
        }
        StorageConfig::Memory => {
            log::warn!("Using in-memory storage; data is lost on restart");
            Ok(Store::Memory(MemoryStore::new()))
        }
    }
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env()?;
    log::debug!("Loaded {:?}", config);

    let store = open_store(&config.storage).await?;
    let auth = AuthService::from_config(&config);
    seed_service::seed(&store, &auth, &config).await?;

    let cache = CachePolicy::new(config.cache_max_age_secs);
    let cors_origin = config.cors_allowed_origin.clone();
    let store = web::Data::new(store);
    let auth_data = web::Data::new(auth.clone());

    log::info!("Starting HTTP server on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(AuthMiddleware::new(auth.clone()))
            .wrap(build_cors(cors_origin.as_deref()))
            .wrap(Logger::default())
            .app_data(store.clone())
            .app_data(auth_data.clone())
            .configure(|cfg| routes::configure(cfg, cache))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
