//! End-to-end HTTP tests: a real router on an ephemeral port, driven with reqwest.

use cheese_api::api::{build_router, AppState};
use cheese_api::clients::{ActorClient, CheeseClient};
use cheese_api::lifecycle::CheeseSystem;
use cheese_api::model::CheeseListingId;
use reqwest::{header, Client, StatusCode};
use serde_json::{json, Value};

struct TestServer {
    base: String,
    http: Client,
    cheeses: CheeseClient,
}

impl TestServer {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get_json(&self, path: &str) -> (StatusCode, Value) {
        let response = self.http.get(self.url(path)).send().await.unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }

    async fn post_json(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let response = self
            .http
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }

    async fn create_user(&self, username: &str) -> String {
        let (status, body) = self
            .post_json(
                "/api/users",
                json!({ "email": format!("{username}@example.com"), "username": username }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["@id"].as_str().unwrap().to_string()
    }

    async fn create_cheese(&self, title: &str, price: i64, owner: &str) -> String {
        let (status, body) = self
            .post_json(
                "/api/cheeses",
                json!({
                    "title": title,
                    "description": format!("A lovely {title}"),
                    "price": price,
                    "owner": owner,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["@id"].as_str().unwrap().to_string()
    }
}

async fn spawn_test_server() -> TestServer {
    let system = CheeseSystem::new();
    let cheeses = system.cheese_client.clone();
    let app = build_router(AppState::from_system(&system, 10));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base: format!("http://{addr}"),
        http: Client::new(),
        cheeses,
    }
}

fn listing_id(iri: &str) -> CheeseListingId {
    CheeseListingId(iri.rsplit('/').next().unwrap().parse().unwrap())
}

fn titles(collection: &Value) -> Vec<String> {
    collection["hydra:member"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_create_and_fetch_listing() {
    let server = spawn_test_server().await;
    let owner = server.create_user("cheesehead").await;

    let response = server
        .http
        .post(server.url("/api/cheeses"))
        .json(&json!({
            "title": "Brie",
            "description": "Soft\nand creamy",
            "price": 500,
            "owner": owner,
            "isPublished": true,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers()[header::LOCATION].to_str().unwrap(),
        "/api/cheeses/1"
    );
    assert_eq!(
        response.headers()[header::CONTENT_TYPE].to_str().unwrap(),
        "application/ld+json; charset=utf-8"
    );
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["@context"], "/api/contexts/cheeses");
    assert_eq!(created["@type"], "cheeses");
    assert_eq!(created["description"], "Soft<br />and creamy");
    assert_eq!(created["owner"], "/api/users/1");
    assert!(created.get("isPublished").is_none());

    let (status, item) = server.get_json("/api/cheeses/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["title"], "Brie");
    assert_eq!(item["shortDescription"], "Soft<br />and creamy");
    assert!(item["createdAtAgo"].as_str().unwrap().ends_with(" ago"));
    assert_eq!(item["owner"]["@id"], "/api/users/1");
    assert_eq!(item["owner"]["username"], "cheesehead");
    assert!(item["owner"].get("email").is_none());

    // isPublished is not writable, so the listing starts unpublished.
    let stored = server
        .cheeses
        .get(listing_id("/api/cheeses/1"))
        .await
        .unwrap()
        .unwrap();
    assert!(!stored.is_published());
}

#[tokio::test]
async fn test_create_rejections() {
    let server = spawn_test_server().await;
    let owner = server.create_user("strict").await;

    let (status, body) = server
        .post_json("/api/cheeses", json!({ "title": "B", "price": 10, "owner": owner }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["@type"], "ConstraintViolationList");
    let violations = body["violations"].as_array().unwrap();
    assert_eq!(violations[0]["propertyPath"], "title");
    assert_eq!(violations[1]["propertyPath"], "description");

    let (status, body) = server
        .post_json(
            "/api/cheeses",
            json!({ "title": "Brie", "description": "x", "price": 1, "owner": "/api/users/77" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["hydra:description"], "Item not found for \"/api/users/77\".");

    let (status, body) = server
        .post_json(
            "/api/cheeses",
            json!({ "title": "Brie", "description": "x", "price": 1, "owner": "not-an-iri" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["@type"], "hydra:Error");

    let response = server
        .http
        .post(server.url("/api/cheeses"))
        .header(header::CONTENT_TYPE, "application/json")
        .body("{\"title\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing was stored.
    let (_, collection) = server.get_json("/api/cheeses").await;
    assert_eq!(collection["hydra:totalItems"], 0);
}

#[tokio::test]
async fn test_error_statuses() {
    let server = spawn_test_server().await;

    let (status, body) = server.get_json("/api/cheeses/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["@type"], "hydra:Error");

    let (status, _) = server.get_json("/api/cheeses/brie").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = server.get_json("/api/nothing-here").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let response = server
        .http
        .get(server.url("/api/cheeses"))
        .header(header::ACCEPT, "application/xml")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);

    // Users have no PUT operation.
    let response = server
        .http
        .put(server.url("/api/users/1"))
        .json(&json!({ "username": "x" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_put_keeps_absent_fields() {
    let server = spawn_test_server().await;
    let owner = server.create_user("editor").await;
    let iri = server.create_cheese("Comte", 900, &owner).await;

    let response = server
        .http
        .put(server.url(&iri))
        .json(&json!({ "price": 950, "title": null }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["price"], 950);
    assert_eq!(body["title"], "Comte");
    assert_eq!(body["description"], "A lovely Comte");

    let response = server
        .http
        .put(server.url(&iri))
        .json(&json!({ "title": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let (_, item) = server.get_json(&iri).await;
    assert_eq!(item["title"], "Comte");

    let response = server
        .http
        .put(server.url("/api/cheeses/99"))
        .json(&json!({ "price": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_collection_filters() {
    let server = spawn_test_server().await;
    let alice = server.create_user("alice").await;
    let bob = server.create_user("bob").await;

    let brie = server.create_cheese("Brie de Meaux", 500, &alice).await;
    server.create_cheese("Comte", 900, &alice).await;
    let gouda = server.create_cheese("Aged Gouda", 300, &bob).await;

    server.cheeses.publish(listing_id(&brie)).await.unwrap();
    server.cheeses.publish(listing_id(&gouda)).await.unwrap();

    let (_, body) = server.get_json("/api/cheeses?title=BRIE").await;
    assert_eq!(titles(&body), vec!["Brie de Meaux"]);

    let (_, body) = server.get_json("/api/cheeses?isPublished=true").await;
    assert_eq!(titles(&body), vec!["Brie de Meaux", "Aged Gouda"]);

    let (_, body) = server.get_json("/api/cheeses?price[gt]=400").await;
    assert_eq!(titles(&body), vec!["Brie de Meaux", "Comte"]);

    let (_, body) = server.get_json("/api/cheeses?price[between]=300..500").await;
    assert_eq!(body["hydra:totalItems"], 2);

    let (_, body) = server.get_json(&format!("/api/cheeses?owner={bob}")).await;
    assert_eq!(titles(&body), vec!["Aged Gouda"]);

    // An IRI of another resource type is not an owner.
    let (_, body) = server.get_json(&format!("/api/cheeses?owner={brie}")).await;
    assert_eq!(body["hydra:totalItems"], 0);

    let (_, body) = server.get_json("/api/cheeses?owner.username=ali").await;
    assert_eq!(titles(&body), vec!["Brie de Meaux", "Comte"]);

    let (_, body) = server.get_json("/api/cheeses?isPublished=0&title=comte").await;
    assert_eq!(titles(&body), vec!["Comte"]);

    // Collection members link their owner instead of embedding it.
    assert_eq!(body["hydra:member"][0]["owner"], alice);
    assert!(body["hydra:search"]["hydra:template"]
        .as_str()
        .unwrap()
        .starts_with("/api/cheeses{?"));
}

#[tokio::test]
async fn test_pagination_and_property_filter() {
    let server = spawn_test_server().await;
    let owner = server.create_user("bulk").await;
    for n in 0..12 {
        server.create_cheese(&format!("Cheese {n}"), 100 + n, &owner).await;
    }

    let (_, first) = server.get_json("/api/cheeses").await;
    assert_eq!(first["hydra:totalItems"], 12);
    assert_eq!(first["hydra:member"].as_array().unwrap().len(), 10);
    assert_eq!(first["hydra:view"]["hydra:next"], "/api/cheeses?page=2");
    assert_eq!(first["hydra:view"]["hydra:last"], "/api/cheeses?page=2");
    assert!(first["hydra:view"].get("hydra:previous").is_none());

    let (_, second) = server.get_json("/api/cheeses?page=2").await;
    assert_eq!(titles(&second), vec!["Cheese 10", "Cheese 11"]);
    assert_eq!(second["hydra:view"]["hydra:previous"], "/api/cheeses?page=1");

    let (_, narrow) = server
        .get_json("/api/cheeses?properties[]=title&properties[]=price&page=2")
        .await;
    let member = narrow["hydra:member"][0].as_object().unwrap();
    let mut keys: Vec<&str> = member.keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, vec!["@id", "@type", "price", "title"]);

    let (_, filtered) = server.get_json("/api/cheeses?title=Cheese 1").await;
    // "Cheese 1", "Cheese 10" and "Cheese 11" fit on one page.
    assert_eq!(filtered["hydra:totalItems"], 3);
    assert!(filtered.get("hydra:view").is_none());
}

#[tokio::test]
async fn test_alternative_formats() {
    let server = spawn_test_server().await;
    let owner = server.create_user("formats").await;
    server.create_cheese("Roquefort <blue>", 700, &owner).await;

    let fetch = |accept: &'static str| {
        server
            .http
            .get(server.url("/api/cheeses"))
            .header(header::ACCEPT, accept)
            .send()
    };

    let response = fetch("text/csv").await.unwrap();
    assert_eq!(
        response.headers()[header::CONTENT_TYPE].to_str().unwrap(),
        "text/csv; charset=utf-8"
    );
    let csv = response.text().await.unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next().unwrap(),
        "id,title,description,shortDescription,price,createdAtAgo,owner"
    );
    assert!(lines.next().unwrap().contains("Roquefort <blue>"));

    let response = fetch("text/html").await.unwrap();
    assert_eq!(
        response.headers()[header::CONTENT_TYPE].to_str().unwrap(),
        "text/html; charset=utf-8"
    );
    let html = response.text().await.unwrap();
    assert!(html.contains("Roquefort &lt;blue&gt;"));

    let response = fetch("application/hal+json").await.unwrap();
    let hal: Value = response.json().await.unwrap();
    assert_eq!(hal["totalItems"], 1);
    assert_eq!(hal["_embedded"]["item"][0]["_links"]["owner"]["href"], owner);

    let response = fetch("application/json").await.unwrap();
    let plain: Value = response.json().await.unwrap();
    assert_eq!(plain[0]["title"], "Roquefort <blue>");
}

#[tokio::test]
async fn test_users_expose_their_listings() {
    let server = spawn_test_server().await;
    let owner = server.create_user("ryan").await;
    let brie = server.create_cheese("Brie", 500, &owner).await;
    let comte = server.create_cheese("Comte", 900, &owner).await;

    let (status, user) = server.get_json(&owner).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["@type"], "User");
    assert_eq!(user["username"], "ryan");
    assert_eq!(user["cheeseListings"], json!([brie, comte]));

    let (_, users) = server.get_json("/api/users").await;
    assert_eq!(users["hydra:totalItems"], 1);

    let (status, body) = server
        .post_json("/api/users", json!({ "email": "broken", "username": "" }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["violations"].as_array().unwrap().len(), 2);
}
