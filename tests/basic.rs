//! Bucket and object round trips driven through `S3Service::hyper_call`

mod common;

use common::{recv_body_string, signed_request, xml_texts};

use hyper::{Body, Method, StatusCode};

#[tokio::test]
async fn put_get_roundtrip() {
    let (_root, service) = common::setup_service("put_get_roundtrip").unwrap();

    let req = signed_request(Method::PUT, "http://localhost/b", Body::empty());
    let res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::OK);

    let req = signed_request(Method::PUT, "http://localhost/b/k", Body::from("hello"));
    let res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get("etag").unwrap(),
        "\"5d41402abc4b2a76b9719d911017c592\""
    );

    let req = signed_request(Method::GET, "http://localhost/b/k", Body::empty());
    let mut res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get("etag").unwrap(),
        "\"5d41402abc4b2a76b9719d911017c592\""
    );
    assert_eq!(res.headers().get("content-length").unwrap(), "5");
    let body = recv_body_string(&mut res).await.unwrap();
    assert_eq!(body, "hello");
}

#[tokio::test]
async fn put_overwrites() {
    let (_root, service) = common::setup_service("put_overwrites").unwrap();

    let req = signed_request(Method::PUT, "http://localhost/b", Body::empty());
    let _res = service.hyper_call(req).await;

    for content in ["original", "updated"] {
        let req = signed_request(Method::PUT, "http://localhost/b/k", Body::from(content));
        let res = service.hyper_call(req).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let req = signed_request(Method::GET, "http://localhost/b/k", Body::empty());
    let mut res = service.hyper_call(req).await;
    let body = recv_body_string(&mut res).await.unwrap();
    assert_eq!(body, "updated");
}

#[tokio::test]
async fn head_object() {
    let (_root, service) = common::setup_service("head_object").unwrap();

    let req = signed_request(Method::PUT, "http://localhost/b", Body::empty());
    let _res = service.hyper_call(req).await;
    let req = signed_request(Method::PUT, "http://localhost/b/k", Body::from("hello"));
    let _res = service.hyper_call(req).await;

    let req = signed_request(Method::HEAD, "http://localhost/b/k", Body::empty());
    let mut res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get("content-length").unwrap(), "5");
    let body = recv_body_string(&mut res).await.unwrap();
    assert_eq!(body, "");

    let req = signed_request(Method::HEAD, "http://localhost/b/missing", Body::empty());
    let res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_missing_object() {
    let (_root, service) = common::setup_service("get_missing_object").unwrap();

    let req = signed_request(Method::PUT, "http://localhost/b", Body::empty());
    let _res = service.hyper_call(req).await;

    let req = signed_request(Method::GET, "http://localhost/b/nope", Body::empty());
    let mut res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = recv_body_string(&mut res).await.unwrap();
    assert!(body.contains("<Code>NoSuchKey</Code>"));
}

#[tokio::test]
async fn delete_object_is_idempotent() {
    let (root, service) = common::setup_service("delete_object_is_idempotent").unwrap();

    let req = signed_request(Method::PUT, "http://localhost/b", Body::empty());
    let _res = service.hyper_call(req).await;
    let req = signed_request(Method::PUT, "http://localhost/b/k", Body::from("x"));
    let _res = service.hyper_call(req).await;

    for _ in 0..2 {
        let req = signed_request(Method::DELETE, "http://localhost/b/k", Body::empty());
        let res = service.hyper_call(req).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    assert!(!root.join("b").join("k").exists());
}

#[tokio::test]
async fn nested_keys() {
    let (_root, service) = common::setup_service("nested_keys").unwrap();

    let req = signed_request(Method::PUT, "http://localhost/b", Body::empty());
    let _res = service.hyper_call(req).await;

    let req = signed_request(
        Method::PUT,
        "http://localhost/b/folder/nested/file.txt",
        Body::from("nested"),
    );
    let res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::OK);

    let req = signed_request(
        Method::GET,
        "http://localhost/b/folder/nested/file.txt",
        Body::empty(),
    );
    let mut res = service.hyper_call(req).await;
    let body = recv_body_string(&mut res).await.unwrap();
    assert_eq!(body, "nested");
}

#[tokio::test]
async fn empty_object() {
    let (_root, service) = common::setup_service("empty_object").unwrap();

    let req = signed_request(Method::PUT, "http://localhost/b", Body::empty());
    let _res = service.hyper_call(req).await;
    let req = signed_request(Method::PUT, "http://localhost/b/empty", Body::empty());
    let res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::OK);

    let req = signed_request(Method::GET, "http://localhost/b/empty", Body::empty());
    let mut res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get("content-length").unwrap(), "0");
    let body = recv_body_string(&mut res).await.unwrap();
    assert_eq!(body, "");
}

#[tokio::test]
async fn range_requests() {
    let (_root, service) = common::setup_service("range_requests").unwrap();

    let req = signed_request(Method::PUT, "http://localhost/b", Body::empty());
    let _res = service.hyper_call(req).await;
    let content = vec![b'x'; 1000];
    let req = signed_request(Method::PUT, "http://localhost/b/k", Body::from(content));
    let _res = service.hyper_call(req).await;

    let mut req = common::build_request(Method::GET, "http://localhost/b/k", Body::empty());
    let _prev = req.headers_mut().insert("range", "bytes=0-499".parse().unwrap());
    common::sign_request(&mut req, common::ACCESS_KEY, common::SECRET_KEY);
    let mut res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(
        res.headers().get("content-range").unwrap(),
        "bytes 0-499/1000"
    );
    assert_eq!(res.headers().get("content-length").unwrap(), "500");
    let body = recv_body_string(&mut res).await.unwrap();
    assert_eq!(body.len(), 500);

    // open-ended range
    let mut req = common::build_request(Method::GET, "http://localhost/b/k", Body::empty());
    let _prev = req.headers_mut().insert("range", "bytes=900-".parse().unwrap());
    common::sign_request(&mut req, common::ACCESS_KEY, common::SECRET_KEY);
    let mut res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(
        res.headers().get("content-range").unwrap(),
        "bytes 900-999/1000"
    );
    let body = recv_body_string(&mut res).await.unwrap();
    assert_eq!(body.len(), 100);

    // out-of-bounds range
    let mut req = common::build_request(Method::GET, "http://localhost/b/k", Body::empty());
    let _prev = req
        .headers_mut()
        .insert("range", "bytes=1000-1000".parse().unwrap());
    common::sign_request(&mut req, common::ACCESS_KEY, common::SECRET_KEY);
    let mut res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = recv_body_string(&mut res).await.unwrap();
    assert!(body.contains("<Code>InvalidArgument</Code>"));
}

#[tokio::test]
async fn bucket_lifecycle() {
    let (root, service) = common::setup_service("bucket_lifecycle").unwrap();

    // create
    let req = signed_request(Method::PUT, "http://localhost/b", Body::empty());
    let res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(root.join("b").is_dir());

    // idempotent create
    let req = signed_request(Method::PUT, "http://localhost/b", Body::empty());
    let res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::OK);

    // head
    let req = signed_request(Method::HEAD, "http://localhost/b", Body::empty());
    let res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let req = signed_request(Method::HEAD, "http://localhost/missing-bucket", Body::empty());
    let res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // delete with content -> conflict
    let req = signed_request(Method::PUT, "http://localhost/b/k", Body::from("x"));
    let _res = service.hyper_call(req).await;
    let req = signed_request(Method::DELETE, "http://localhost/b", Body::empty());
    let mut res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = recv_body_string(&mut res).await.unwrap();
    assert!(body.contains("<Code>BucketNotEmpty</Code>"));
    assert!(root.join("b").join("k").exists());

    // delete the object, then the bucket
    let req = signed_request(Method::DELETE, "http://localhost/b/k", Body::empty());
    let _res = service.hyper_call(req).await;
    let req = signed_request(Method::DELETE, "http://localhost/b", Body::empty());
    let res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(!root.join("b").exists());

    // delete again -> missing
    let req = signed_request(Method::DELETE, "http://localhost/b", Body::empty());
    let res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_buckets() {
    let (_root, service) = common::setup_service("list_buckets").unwrap();

    for bucket in ["alpha", "beta"] {
        let uri = format!("http://localhost/{}", bucket);
        let req = signed_request(Method::PUT, &uri, Body::empty());
        let _res = service.hyper_call(req).await;
    }

    let req = signed_request(Method::GET, "http://localhost/", Body::empty());
    let mut res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "application/xml"
    );
    let body = recv_body_string(&mut res).await.unwrap();
    assert_eq!(xml_texts(&body, "Name"), ["alpha", "beta"]);
}

#[tokio::test]
async fn invalid_bucket_names() {
    let (_root, service) = common::setup_service("invalid_bucket_names").unwrap();

    for bucket in ["ab", "MyBucket", "my_bucket", "-bucket"] {
        let uri = format!("http://localhost/{}", bucket);
        let req = signed_request(Method::PUT, &uri, Body::empty());
        let mut res = service.hyper_call(req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{}", bucket);
        let body = recv_body_string(&mut res).await.unwrap();
        assert!(body.contains("<Code>InvalidBucketName</Code>"));
    }
}

#[tokio::test]
async fn path_traversal_is_rejected() {
    let (root, service) = common::setup_service("path_traversal_is_rejected").unwrap();

    let req = signed_request(Method::PUT, "http://localhost/b", Body::empty());
    let _res = service.hyper_call(req).await;

    for uri in [
        "http://localhost/b/../../../etc/passwd",
        "http://localhost/b/folder/../../escape",
    ] {
        let req = signed_request(Method::PUT, uri, Body::from("hacked"));
        let mut res = service.hyper_call(req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let body = recv_body_string(&mut res).await.unwrap();
        assert!(body.contains("<Code>InvalidKey</Code>"));
    }

    // keys with inner dots are fine
    let req = signed_request(Method::PUT, "http://localhost/b/a..b", Body::from("ok"));
    let res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::OK);

    assert!(!root.parent().unwrap().join("etc").exists());
}

#[tokio::test]
async fn unmatched_routes() {
    let (_root, service) = common::setup_service("unmatched_routes").unwrap();

    let req = signed_request(Method::PUT, "http://localhost/b", Body::empty());
    let _res = service.hyper_call(req).await;

    // GET on a bucket without list-type=2
    let req = signed_request(Method::GET, "http://localhost/b", Body::empty());
    let mut res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body = recv_body_string(&mut res).await.unwrap();
    assert!(body.contains("<Code>MethodNotAllowed</Code>"));

    // POST on the root
    let req = signed_request(Method::POST, "http://localhost/", Body::empty());
    let res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn batch_delete() {
    let (_root, service) = common::setup_service("batch_delete").unwrap();

    let req = signed_request(Method::PUT, "http://localhost/b", Body::empty());
    let _res = service.hyper_call(req).await;

    for i in 0..10 {
        let uri = format!("http://localhost/b/file{}.txt", i);
        let req = signed_request(Method::PUT, &uri, Body::from("content"));
        let _res = service.hyper_call(req).await;
    }

    let mut delete_body = String::from("<Delete>");
    for i in 0..5 {
        delete_body.push_str(&format!("<Object><Key>file{}.txt</Key></Object>", i));
    }
    // a key that does not exist is deleted silently
    delete_body.push_str("<Object><Key>nonexistent.txt</Key></Object></Delete>");

    let req = signed_request(
        Method::POST,
        "http://localhost/b?delete",
        Body::from(delete_body),
    );
    let mut res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = recv_body_string(&mut res).await.unwrap();
    assert_eq!(xml_texts(&body, "Key").len(), 6);

    let req = signed_request(
        Method::GET,
        "http://localhost/b?list-type=2",
        Body::empty(),
    );
    let mut res = service.hyper_call(req).await;
    let body = recv_body_string(&mut res).await.unwrap();
    assert_eq!(xml_texts(&body, "Key").len(), 5);
}

#[tokio::test]
async fn aws_chunked_upload() {
    let (_root, service) = common::setup_service("aws_chunked_upload").unwrap();

    let req = signed_request(Method::PUT, "http://localhost/b", Body::empty());
    let _res = service.hyper_call(req).await;

    let sig = "0".repeat(64);
    let body = format!(
        "5;chunk-signature={sig}\r\nhello\r\n0;chunk-signature={sig}\r\n\r\n",
        sig = sig
    );

    let mut req = common::build_request(Method::PUT, "http://localhost/b/k", Body::from(body));
    let _prev = req.headers_mut().insert(
        "x-amz-content-sha256",
        "STREAMING-AWS4-HMAC-SHA256-PAYLOAD".parse().unwrap(),
    );
    let _prev = req
        .headers_mut()
        .insert("x-amz-decoded-content-length", "5".parse().unwrap());
    common::sign_request(&mut req, common::ACCESS_KEY, common::SECRET_KEY);
    let res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::OK);

    let req = signed_request(Method::GET, "http://localhost/b/k", Body::empty());
    let mut res = service.hyper_call(req).await;
    let body = recv_body_string(&mut res).await.unwrap();
    assert_eq!(body, "hello");
}

