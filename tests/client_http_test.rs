//! Client endpoints against a live HTTP mock.

use serde_json::json;
use sofa::prelude::*;
use sofa::{ReplicateOptions, User};
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> SofaClient {
    SofaClient::builder()
        .endpoint(server.uri())
        .build()
        .unwrap()
}

#[tokio::test]
async fn login_returns_session_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/_session"))
        .and(header(
            "content-type",
            "application/x-www-form-urlencoded; charset=utf-8",
        ))
        .and(body_string("name=root&password=p%40ss"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "AuthSession=cm9vdDo1; Version=1; Path=/; HttpOnly")
                .set_body_json(json!({"ok": true, "name": "root", "roles": ["_admin"]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let login = client(&server).session().login("root", "p@ss").await.unwrap();
    assert_eq!(login.token.as_deref(), Some("cm9vdDo1"));
    assert_eq!(login.roles, vec!["_admin".to_string()]);
}

#[tokio::test]
async fn token_auth_is_sent_on_every_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/_all_dbs"))
        .and(header("authorization", "Bearer t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["_users", "shop"])))
        .expect(1)
        .mount(&server)
        .await;

    let client = SofaClient::builder()
        .endpoint(server.uri())
        .token_auth("t1")
        .build()
        .unwrap();
    let dbs = client.all_dbs(Query::new()).await.unwrap();
    assert_eq!(dbs, vec!["_users".to_string(), "shop".to_string()]);
}

#[tokio::test]
async fn users_put_under_derived_id() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/_users/org.couchdb.user:ana"))
        .and(body_json(json!({
            "name": "ana",
            "roles": [],
            "type": "user",
            "password": "pw"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "ok": true,
            "id": "org.couchdb.user:ana",
            "rev": "1-a"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = serde_json::to_value(User::new("ana", "pw")).unwrap();
    let resp = client(&server)
        .users()
        .create(WriteOptions::new().data(user))
        .await
        .unwrap();
    assert_eq!(resp.status, 201);
}

#[tokio::test]
async fn missing_db_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nope"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"error": "not_found", "reason": "Database does not exist."})),
        )
        .mount(&server)
        .await;

    let err = client(&server).db("nope").info().await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.error_result().unwrap().reason, "Database does not exist.");
}

#[tokio::test]
async fn doc_copy_sends_destination() {
    let server = MockServer::start().await;
    Mock::given(method("COPY"))
        .and(path("/shop/apple"))
        .and(query_param("rev", "1-a"))
        .and(header("destination", "pear"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"ok": true, "id": "pear"})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .db("shop")
        .doc()
        .copy(CopyOptions::new("pear").id("apple").rev("1-a"))
        .await
        .unwrap();
}

#[tokio::test]
async fn attachment_round_trip_is_raw() {
    let server = MockServer::start().await;
    let png: &[u8] = &[0x89, b'P', b'N', b'G', 0, 1, 2];
    Mock::given(method("PUT"))
        .and(path("/shop/apple/photo.png"))
        .and(query_param("rev", "1-a"))
        .and(header("content-type", "image/png"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"ok": true, "rev": "2-b"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/shop/apple/photo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(png.to_vec(), "image/png"))
        .expect(1)
        .mount(&server)
        .await;

    let photo = client(&server).db("shop").doc_with("apple").attachment("photo.png");
    photo
        .upload(png.to_vec(), "image/png", Some("1-a".to_string()))
        .await
        .unwrap();
    let resp = photo
        .read(Some("image/png"), ReadOptions::new())
        .await
        .unwrap();
    assert_eq!(resp.bytes().map(|b| &b[..]), Some(png));

    let received = server.received_requests().await.unwrap();
    assert_eq!(received[0].body, png);
}

#[tokio::test]
async fn replicate_posts_options() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/_replicate"))
        .and(body_json(json!({"source": "shop", "target": "backup", "create_target": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .replicate(&ReplicateOptions::new("shop", "backup").create_target(true))
        .await
        .unwrap();
}
