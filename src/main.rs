use std::{env, sync::Arc};

use bson::Uuid;
use clap::Parser;
use log::info;
use mongodb::{options::ClientOptions, Client, Database};
use simple_logger::SimpleLogger;

use gamestore::cart::store::CartStore;
use gamestore::http::{build_router, AppState};
use gamestore::mail::LogMailer;
use gamestore::model::videogame::Videogame;
use gamestore::repository::mongodb::{
    MongoCartRepository, MongoFavoriteRepository, MongoReviewRepository, MongoUserRepository,
    MongoVideogameRepository,
};
use gamestore::repository::{
    CartRepository, FavoriteRepository, ReviewRepository, UserRepository, VideogameRepository,
};

/// Command line arguments of the storefront service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port the REST API listens on.
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Inserts a small demo videogame catalog on startup.
    #[arg(long)]
    seed_demo_data: bool,
}

/// Establishes database connection and returns the client.
async fn db_connection() -> Client {
    let uri = match env::var_os("MONGODB_URI") {
        Some(uri) => uri.into_string().unwrap(),
        None => panic!("$MONGODB_URI is not set."),
    };

    // Parse a connection string into an options struct.
    let mut client_options = ClientOptions::parse(uri).await.unwrap();

    // Manually set an option.
    client_options.app_name = Some("GameStore".to_string());

    // Get a handle to the deployment.
    Client::with_options(client_options).unwrap()
}

/// Inserts a small demo videogame catalog.
async fn seed_demo_data(videogames: &dyn VideogameRepository) {
    let demo_videogames = vec![
        Videogame {
            id: Uuid::new(),
            name: "Hollow Knight".to_string(),
            price: 14.99,
            image: "https://images.gamestore.example/hollow-knight.jpg".to_string(),
        },
        Videogame {
            id: Uuid::new(),
            name: "Celeste".to_string(),
            price: 19.99,
            image: "https://images.gamestore.example/celeste.jpg".to_string(),
        },
        Videogame {
            id: Uuid::new(),
            name: "Hades".to_string(),
            price: 24.99,
            image: "https://images.gamestore.example/hades.jpg".to_string(),
        },
    ];
    for videogame in &demo_videogames {
        videogames.insert(videogame).await.unwrap();
    }
    info!("Seeded {} demo videogames.", demo_videogames.len());
}

/// Activates logger and parses arguments, then starts the storefront service.
#[tokio::main]
async fn main() {
    SimpleLogger::new().init().unwrap();

    let args = Args::parse();
    start_service(&args).await;
}

/// Starts the storefront REST service.
async fn start_service(args: &Args) {
    let client = db_connection().await;
    let db_client: Database = client.database("gamestore-database");

    let videogames: Arc<dyn VideogameRepository> =
        Arc::new(MongoVideogameRepository::new(&db_client));
    let carts: Arc<dyn CartRepository> = Arc::new(MongoCartRepository::new(&db_client));
    let users: Arc<dyn UserRepository> = Arc::new(MongoUserRepository::new(&db_client));
    let favorites: Arc<dyn FavoriteRepository> = Arc::new(MongoFavoriteRepository::new(&db_client));
    let reviews: Arc<dyn ReviewRepository> = Arc::new(MongoReviewRepository::new(&db_client));

    if args.seed_demo_data {
        seed_demo_data(videogames.as_ref()).await;
    }

    let cart_store = CartStore::new(carts, videogames.clone(), users.clone());
    let state = AppState {
        cart_store,
        videogames,
        users,
        favorites,
        reviews,
        mailer: Arc::new(LogMailer),
    };

    let app = build_router(state);
    let address = format!("0.0.0.0:{}", args.port);
    info!("GameStore API listening on: http://{}", address);
    let listener = tokio::net::TcpListener::bind(&address).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
