//! End-to-end tests for the HTTP facade against a fixture database.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use pwnedpass::{DatabaseBuilder, OfflineDatabase, DATABASE_FILENAME};
use pwnedpass_serve::router;

/// SHA-1("P@ssword").
const PASSWORD_HASH: [u8; 20] = [
    0x9E, 0x7C, 0x97, 0x80, 0x1C, 0xB4, 0xCC, 0xE8, 0x7B, 0x6C, 0x02, 0xF9, 0x82, 0x91, 0xA6,
    0x42, 0x0E, 0x64, 0x00, 0xAD,
];

fn fixture() -> (tempfile::TempDir, Router) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(DATABASE_FILENAME);

    // in-range neighbour, the real password hash, and one record just past
    // the 9E7C9 bucket
    let mut sibling = [0u8; 20];
    sibling[0..3].copy_from_slice(&[0x9E, 0x7C, 0x93]);
    let mut outside = [0u8; 20];
    outside[0..3].copy_from_slice(&[0x9E, 0x7D, 0x00]);

    let mut builder = DatabaseBuilder::create(&path).expect("create fixture");
    builder.push(sibling, 5).expect("push");
    builder.push(PASSWORD_HASH, 10664).expect("push");
    builder.push(outside, 3).expect("push");
    builder.finish().expect("finish");

    let db = OfflineDatabase::open(&path).expect("open fixture");
    (dir, router(Arc::new(db)))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn pwnedpassword_hashes_the_argument() {
    let (_dir, app) = fixture();

    let (status, headers, body) = get(&app, "/pwnedpassword/P@ssword").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "10664\n");
    assert_eq!(
        headers["X-Password-SHA1"],
        "9e7c97801cb4cce87b6c02f98291a6420e6400ad"
    );
}

#[tokio::test]
async fn pwnedpassword_accepts_a_literal_hash() {
    let (_dir, app) = fixture();

    let (status, _, body) =
        get(&app, "/pwnedpassword/9E7C97801CB4CCE87B6C02F98291A6420E6400AD").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "10664\n");

    // lowercase works too
    let (status, _, body) =
        get(&app, "/pwnedpassword/9e7c97801cb4cce87b6c02f98291a6420e6400ad").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "10664\n");
}

#[tokio::test]
async fn pwnedpassword_miss_is_not_found() {
    let (_dir, app) = fixture();

    let (status, headers, body) = get(&app, "/pwnedpassword/not-in-the-corpus").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Password not compromised\n");
    assert!(headers.contains_key("X-Password-SHA1"));
}

#[tokio::test]
async fn range_lists_suffixes_in_the_bucket() {
    let (_dir, app) = fixture();

    let (status, _, body) = get(&app, "/range/9E7C9").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        "30000000000000000000000000000000000:5\r\n\
         7801CB4CCE87B6C02F98291A6420E6400AD:10664\r\n"
    );
}

#[tokio::test]
async fn range_accepts_lowercase_prefixes() {
    let (_dir, app) = fixture();

    let (status, _, body) = get(&app, "/range/9e7c9").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("7801CB4CCE87B6C02F98291A6420E6400AD:10664"));
}

#[tokio::test]
async fn range_of_an_empty_bucket_is_empty() {
    let (_dir, app) = fixture();

    let (status, _, body) = get(&app, "/range/00000").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "");
}

#[tokio::test]
async fn range_rejects_malformed_prefixes() {
    let (_dir, app) = fixture();

    for uri in ["/range/XYZ12", "/range/9E7C", "/range/9E7C97"] {
        let (status, _, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body, "The hash prefix was not in a valid format");
    }
}
