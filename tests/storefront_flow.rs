use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use gamestore::cart::slice::{CartAction, CartSlice, CART_STORAGE_KEY};
use gamestore::cart::storage::{DurableCache, MemoryCache};
use gamestore::cart::store::CartStore;
use gamestore::http::{build_router, AppState};
use gamestore::mail::RecordingMailer;
use gamestore::model::cart::CartLineItem;
use gamestore::model::videogame::Videogame;
use gamestore::repository::memory::{
    MemoryCartRepository, MemoryFavoriteRepository, MemoryReviewRepository, MemoryUserRepository,
    MemoryVideogameRepository,
};
use gamestore::repository::{
    CartRepository, FavoriteRepository, ReviewRepository, UserRepository, VideogameRepository,
};

struct TestApp {
    addr: SocketAddr,
    mailer: Arc<RecordingMailer>,
}

async fn spawn_app() -> TestApp {
    let videogames: Arc<dyn VideogameRepository> = Arc::new(MemoryVideogameRepository::default());
    let carts: Arc<dyn CartRepository> = Arc::new(MemoryCartRepository::default());
    let users: Arc<dyn UserRepository> = Arc::new(MemoryUserRepository::default());
    let favorites: Arc<dyn FavoriteRepository> = Arc::new(MemoryFavoriteRepository::default());
    let reviews: Arc<dyn ReviewRepository> = Arc::new(MemoryReviewRepository::default());
    let mailer = Arc::new(RecordingMailer::default());
    let cart_store = CartStore::new(carts, videogames.clone(), users.clone());
    let state = AppState {
        cart_store,
        videogames,
        users,
        favorites,
        reviews,
        mailer: mailer.clone(),
    };
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, build_router(state))
            .await
            .expect("serve app");
    });
    TestApp { addr, mailer }
}

async fn send_raw(
    addr: SocketAddr,
    method: &str,
    path: &str,
    body: Option<&str>,
) -> (u16, Value) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let body = body.unwrap_or("");
    let req = format!(
        "{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    );
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|status| status.parse::<u16>().ok())
        .expect("status");
    let parsed = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(body).unwrap_or(Value::Null)
    };
    (status, parsed)
}

async fn create_user(app: &TestApp, email: &str, name: &str) -> String {
    let payload = json!({"email": email, "name": name, "nickname": name.to_lowercase()});
    let (status, body) = send_raw(
        app.addr,
        "POST",
        "/users",
        Some(&payload.to_string()),
    )
    .await;
    assert_eq!(status, 201);
    body["user"]["id"].as_str().expect("user id").to_string()
}

async fn create_videogame(app: &TestApp, name: &str, price: f64) -> String {
    let payload = json!({"name": name, "price": price, "image": format!("https://images.gamestore.example/{name}.jpg")});
    let (status, body) = send_raw(
        app.addr,
        "POST",
        "/videogames",
        Some(&payload.to_string()),
    )
    .await;
    assert_eq!(status, 201);
    body["id"].as_str().expect("videogame id").to_string()
}

fn cart_items(cart: &Value) -> Vec<CartLineItem> {
    serde_json::from_value(cart["items"].clone()).expect("cart items")
}

#[tokio::test]
async fn cart_of_a_fresh_user_is_empty() {
    let app = spawn_app().await;
    let user_id = create_user(&app, "ash@example.com", "Ash").await;
    let (status, cart) = send_raw(app.addr, "GET", &format!("/cart?userId={user_id}"), None).await;
    assert_eq!(status, 200);
    assert_eq!(cart["ownerId"].as_str(), Some(user_id.as_str()));
    assert!(cart_items(&cart).is_empty());
}

#[tokio::test]
async fn adding_and_removing_line_items_through_the_api() {
    let app = spawn_app().await;
    let user_id = create_user(&app, "ash@example.com", "Ash").await;
    let game_id = create_videogame(&app, "Hades", 24.99).await;

    let (status, line_item) = send_raw(
        app.addr,
        "POST",
        &format!("/cart/add/{game_id}?userId={user_id}"),
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(line_item["quantity"].as_u64(), Some(1));
    assert_eq!(line_item["unitPrice"].as_f64(), Some(24.99));

    let (status, line_item) = send_raw(
        app.addr,
        "POST",
        &format!("/cart/add/{game_id}?userId={user_id}&quantity=2"),
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(line_item["quantity"].as_u64(), Some(3));

    let (status, cart) = send_raw(
        app.addr,
        "DELETE",
        &format!("/cart/remove/{game_id}?userId={user_id}"),
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert!(cart_items(&cart).is_empty());

    // Removing again is a no-op, not an error.
    let (status, cart) = send_raw(
        app.addr,
        "DELETE",
        &format!("/cart/remove/{game_id}?userId={user_id}"),
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert!(cart_items(&cart).is_empty());
}

#[tokio::test]
async fn a_malformed_user_id_is_rejected_as_a_bad_request() {
    let app = spawn_app().await;
    let (status, body) = send_raw(app.addr, "GET", "/cart?userId=not-a-uuid", None).await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("not a valid UUID"));
}

#[tokio::test]
async fn adding_an_unknown_videogame_returns_not_found() {
    let app = spawn_app().await;
    let user_id = create_user(&app, "ash@example.com", "Ash").await;
    let missing_id = bson::Uuid::new();
    let (status, body) = send_raw(
        app.addr,
        "POST",
        &format!("/cart/add/{missing_id}?userId={user_id}"),
        None,
    )
    .await;
    assert_eq!(status, 404);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn a_client_slice_reconciles_against_the_server_cart() {
    let app = spawn_app().await;
    let user_id = create_user(&app, "ash@example.com", "Ash").await;
    let first_game = create_videogame(&app, "Hades", 24.99).await;
    let second_game = create_videogame(&app, "Celeste", 19.99).await;

    // Server-side cart already holds three copies of the first game.
    let (status, _) = send_raw(
        app.addr,
        "POST",
        &format!("/cart/add/{first_game}?userId={user_id}&quantity=3"),
        None,
    )
    .await;
    assert_eq!(status, 200);

    // Client cached a cart with one copy of each game while offline.
    let mut slice = CartSlice::load(MemoryCache::default());
    slice.dispatch(CartAction::AddToCart(Videogame {
        id: bson::Uuid::parse_str(&first_game).unwrap(),
        name: "Hades".to_string(),
        price: 24.99,
        image: "https://images.gamestore.example/hades.jpg".to_string(),
    }));
    slice.dispatch(CartAction::AddToCart(Videogame {
        id: bson::Uuid::parse_str(&second_game).unwrap(),
        name: "Celeste".to_string(),
        price: 19.99,
        image: "https://images.gamestore.example/celeste.jpg".to_string(),
    }));

    let snapshot = serde_json::to_string(slice.cart_items()).unwrap();
    let (status, cart) = send_raw(
        app.addr,
        "POST",
        &format!("/cart/add?userId={user_id}"),
        Some(&snapshot),
    )
    .await;
    assert_eq!(status, 200);
    let reconciled = cart_items(&cart);

    // Quantities merge by maximum, and the union of both sources survives.
    assert_eq!(reconciled.len(), 2);
    let first = reconciled
        .iter()
        .find(|item| item.videogame_id.to_string() == first_game)
        .unwrap();
    assert_eq!(first.quantity, 3);
    let second = reconciled
        .iter()
        .find(|item| item.videogame_id.to_string() == second_game)
        .unwrap();
    assert_eq!(second.quantity, 1);

    // The client adopts the reconciled cart and flushes it to its cache.
    slice.replace(reconciled.clone());
    let cached = slice.cache().read(CART_STORAGE_KEY).unwrap();
    let cached_items: Vec<CartLineItem> = serde_json::from_str(&cached).unwrap();
    assert_eq!(cached_items, reconciled);

    // Reconciling the reconciled cart again changes nothing.
    let snapshot = serde_json::to_string(slice.cart_items()).unwrap();
    let (status, cart) = send_raw(
        app.addr,
        "POST",
        &format!("/cart/add?userId={user_id}"),
        Some(&snapshot),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(cart_items(&cart), reconciled);
}

#[tokio::test]
async fn reconciling_with_an_unknown_videogame_leaves_the_server_cart_unchanged() {
    let app = spawn_app().await;
    let user_id = create_user(&app, "ash@example.com", "Ash").await;
    let game_id = create_videogame(&app, "Hades", 24.99).await;
    let (status, _) = send_raw(
        app.addr,
        "POST",
        &format!("/cart/add/{game_id}?userId={user_id}"),
        None,
    )
    .await;
    assert_eq!(status, 200);

    let snapshot = json!([
        {"videogameId": bson::Uuid::new().to_string(), "quantity": 2, "unitPrice": 9.99}
    ]);
    let (status, _) = send_raw(
        app.addr,
        "POST",
        &format!("/cart/add?userId={user_id}"),
        Some(&snapshot.to_string()),
    )
    .await;
    assert_eq!(status, 404);

    let (status, cart) = send_raw(app.addr, "GET", &format!("/cart?userId={user_id}"), None).await;
    assert_eq!(status, 200);
    let items = cart_items(&cart);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 1);
}

#[tokio::test]
async fn creating_a_user_sends_the_welcome_email_exactly_once() {
    let app = spawn_app().await;
    create_user(&app, "ash@example.com", "Ash").await;
    assert_eq!(app.mailer.sent().len(), 1);
    assert_eq!(app.mailer.sent()[0].0, "ash@example.com");

    // Finding the existing user again sends nothing.
    let payload = json!({"email": "ash@example.com", "name": "Ash", "nickname": "ash"});
    let (status, body) = send_raw(app.addr, "POST", "/users", Some(&payload.to_string())).await;
    assert_eq!(status, 200);
    assert_eq!(body["message"].as_str(), Some("User already exists."));
    assert_eq!(app.mailer.sent().len(), 1);
}

#[tokio::test]
async fn favorites_collapse_duplicates_and_join_the_videogame() {
    let app = spawn_app().await;
    let user_id = create_user(&app, "ash@example.com", "Ash").await;
    let game_id = create_videogame(&app, "Celeste", 19.99).await;

    let payload = json!({"videogameId": game_id});
    let (status, favorite) = send_raw(
        app.addr,
        "POST",
        &format!("/users/{user_id}/favorites"),
        Some(&payload.to_string()),
    )
    .await;
    assert_eq!(status, 201);
    let (status, duplicate) = send_raw(
        app.addr,
        "POST",
        &format!("/users/{user_id}/favorites"),
        Some(&payload.to_string()),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(favorite["id"], duplicate["id"]);

    let (status, favorites) = send_raw(
        app.addr,
        "GET",
        &format!("/users/{user_id}/favorites"),
        None,
    )
    .await;
    assert_eq!(status, 200);
    let favorites = favorites.as_array().unwrap().clone();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0]["videogame"]["name"].as_str(), Some("Celeste"));
}

#[tokio::test]
async fn reviews_are_validated_and_unique_per_user_and_videogame() {
    let app = spawn_app().await;
    let user_id = create_user(&app, "ash@example.com", "Ash").await;
    let game_id = create_videogame(&app, "Celeste", 19.99).await;

    let out_of_range = json!({"videogameId": game_id, "userId": user_id, "score": 11, "text": "!"});
    let (status, _) = send_raw(app.addr, "POST", "/reviews", Some(&out_of_range.to_string())).await;
    assert_eq!(status, 400);

    let payload = json!({"videogameId": game_id, "userId": user_id, "score": 9, "text": "Tight controls."});
    let (status, _) = send_raw(app.addr, "POST", "/reviews", Some(&payload.to_string())).await;
    assert_eq!(status, 201);

    let (status, _) = send_raw(app.addr, "POST", "/reviews", Some(&payload.to_string())).await;
    assert_eq!(status, 400);

    let (status, reviews) = send_raw(
        app.addr,
        "GET",
        &format!("/videogames/{game_id}/reviews"),
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(reviews.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn deleting_a_user_cascades_cart_favorites_and_reviews() {
    let app = spawn_app().await;
    let user_id = create_user(&app, "ash@example.com", "Ash").await;
    let game_id = create_videogame(&app, "Celeste", 19.99).await;

    let (status, _) = send_raw(
        app.addr,
        "POST",
        &format!("/cart/add/{game_id}?userId={user_id}"),
        None,
    )
    .await;
    assert_eq!(status, 200);
    let payload = json!({"videogameId": game_id});
    let (status, _) = send_raw(
        app.addr,
        "POST",
        &format!("/users/{user_id}/favorites"),
        Some(&payload.to_string()),
    )
    .await;
    assert_eq!(status, 201);
    let review = json!({"videogameId": game_id, "userId": user_id, "score": 8, "text": "Lovely."});
    let (status, _) = send_raw(app.addr, "POST", "/reviews", Some(&review.to_string())).await;
    assert_eq!(status, 201);

    let (status, _) = send_raw(app.addr, "DELETE", &format!("/users/{user_id}"), None).await;
    assert_eq!(status, 204);

    let (status, _) = send_raw(app.addr, "GET", &format!("/users/{user_id}"), None).await;
    assert_eq!(status, 404);
    let (status, reviews) = send_raw(
        app.addr,
        "GET",
        &format!("/videogames/{game_id}/reviews"),
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert!(reviews.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn the_catalog_lists_pages_with_name_filter_and_ordering() {
    let app = spawn_app().await;
    create_videogame(&app, "Hades", 24.99).await;
    create_videogame(&app, "Hollow Knight", 14.99).await;
    create_videogame(&app, "Celeste", 19.99).await;

    let (status, page) = send_raw(
        app.addr,
        "GET",
        "/videogames?field=price&direction=desc&first=2",
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(page["totalCount"].as_u64(), Some(3));
    assert_eq!(page["hasNextPage"].as_bool(), Some(true));
    let nodes = page["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0]["name"].as_str(), Some("Hades"));
    assert_eq!(nodes[1]["name"].as_str(), Some("Celeste"));

    let (status, page) = send_raw(app.addr, "GET", "/videogames?name=ho", None).await;
    assert_eq!(status, 200);
    assert_eq!(page["totalCount"].as_u64(), Some(1));
    assert_eq!(
        page["nodes"][0]["name"].as_str(),
        Some("Hollow Knight")
    );
}
