//! SigV4 gatekeeping

mod common;

use common::{recv_body_string, signed_request};

use hyper::header::AUTHORIZATION;
use hyper::{Body, Method, StatusCode};

#[tokio::test]
async fn anonymous_request_is_denied() {
    let (_root, service) = common::setup_service("anonymous_request_is_denied").unwrap();

    let req = common::build_request(Method::GET, "http://localhost/", Body::empty());
    let mut res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body = recv_body_string(&mut res).await.unwrap();
    assert!(body.contains("<Code>AccessDenied</Code>"));
}

#[tokio::test]
async fn wrong_secret_key_is_denied() {
    let (_root, service) = common::setup_service("wrong_secret_key_is_denied").unwrap();

    let mut req = common::build_request(Method::GET, "http://localhost/", Body::empty());
    common::sign_request(&mut req, common::ACCESS_KEY, "wrongsecret");
    let mut res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body = recv_body_string(&mut res).await.unwrap();
    assert!(body.contains("<Code>AccessDenied</Code>"));
}

#[tokio::test]
async fn unknown_access_key_is_denied() {
    let (_root, service) = common::setup_service("unknown_access_key_is_denied").unwrap();

    let mut req = common::build_request(Method::GET, "http://localhost/", Body::empty());
    common::sign_request(&mut req, "UNKNOWNACCESSKEY1234", common::SECRET_KEY);
    let res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn malformed_authorization_header_is_denied() {
    let (_root, service) = common::setup_service("malformed_authorization_header_is_denied")
        .unwrap();

    for value in [
        "Basic dXNlcjpwYXNz",
        "AWS4-HMAC-SHA256",
        "AWS4-HMAC-SHA256 Credential=only",
    ] {
        let mut req = common::build_request(Method::GET, "http://localhost/", Body::empty());
        let _prev = req
            .headers_mut()
            .insert(AUTHORIZATION, value.parse().unwrap());
        let res = service.hyper_call(req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN, "{}", value);
    }
}

#[tokio::test]
async fn tampered_request_is_denied() {
    let (_root, service) = common::setup_service("tampered_request_is_denied").unwrap();

    let req = signed_request(Method::PUT, "http://localhost/b", Body::empty());
    let _res = service.hyper_call(req).await;

    // sign a request for one key, then redirect it to another
    let mut req = signed_request(Method::PUT, "http://localhost/b/k", Body::from("x"));
    *req.uri_mut() = "http://localhost/b/other".parse().unwrap();
    let res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn signed_request_is_served() {
    let (_root, service) = common::setup_service("signed_request_is_served").unwrap();

    let req = signed_request(Method::GET, "http://localhost/", Body::empty());
    let mut res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get("server").is_some());
    let body = recv_body_string(&mut res).await.unwrap();
    assert!(body.contains("<ListAllMyBucketsResult>"));
}

#[tokio::test]
async fn missing_content_sha256_is_rejected() {
    let (_root, service) = common::setup_service("missing_content_sha256_is_rejected").unwrap();

    let mut req = common::build_request(Method::GET, "http://localhost/", Body::empty());
    common::sign_request(&mut req, common::ACCESS_KEY, common::SECRET_KEY);
    let _prev = req.headers_mut().remove("x-amz-content-sha256").unwrap();
    let mut res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = recv_body_string(&mut res).await.unwrap();
    assert!(body.contains("<Code>InvalidArgument</Code>"));
}
