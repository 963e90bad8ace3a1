//! Multipart upload state machine

mod common;

use common::{recv_body_string, signed_request, xml_text};

use hyper::{Body, Method, StatusCode};

async fn initiate(
    service: &s3_lite::S3Service<s3_lite::storages::fs::FileSystem>,
    uri: &str,
) -> String {
    let req = signed_request(Method::POST, uri, Body::empty());
    let mut res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = recv_body_string(&mut res).await.unwrap();
    let upload_id = xml_text(&body, "UploadId").unwrap();
    assert_eq!(upload_id.len(), 32);
    upload_id
}

#[tokio::test]
async fn multipart_roundtrip() {
    let (root, service) = common::setup_service("multipart_roundtrip").unwrap();

    let req = signed_request(Method::PUT, "http://localhost/b", Body::empty());
    let _res = service.hyper_call(req).await;

    let upload_id = initiate(&service, "http://localhost/b/big?uploads").await;
    assert!(root.join(".uploads").join(&upload_id).is_dir());

    for (part_number, content) in [(1, "aa"), (2, "bb")] {
        let uri = format!(
            "http://localhost/b/big?partNumber={}&uploadId={}",
            part_number, upload_id
        );
        let req = signed_request(Method::PUT, &uri, Body::from(content));
        let res = service.hyper_call(req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key("etag"));
    }

    let complete_body = concat!(
        "<CompleteMultipartUpload>",
        "<Part><PartNumber>1</PartNumber><ETag>\"x\"</ETag></Part>",
        "<Part><PartNumber>2</PartNumber><ETag>\"y\"</ETag></Part>",
        "</CompleteMultipartUpload>",
    );
    let uri = format!("http://localhost/b/big?uploadId={}", upload_id);
    let req = signed_request(Method::POST, &uri, Body::from(complete_body));
    let mut res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = recv_body_string(&mut res).await.unwrap();
    assert_eq!(xml_text(&body, "Bucket").unwrap(), "b");
    assert_eq!(xml_text(&body, "Key").unwrap(), "big");
    let e_tag = xml_text(&body, "ETag").unwrap();
    assert!(e_tag.ends_with("-2\""), "{}", e_tag);

    // the staging directory is gone
    assert!(!root.join(".uploads").join(&upload_id).exists());

    // the assembled object is the concatenation of the parts
    let req = signed_request(Method::GET, "http://localhost/b/big", Body::empty());
    let mut res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = recv_body_string(&mut res).await.unwrap();
    assert_eq!(body, "aabb");
}

#[tokio::test]
async fn multipart_matches_single_put() {
    let (_root, service) = common::setup_service("multipart_matches_single_put").unwrap();

    let req = signed_request(Method::PUT, "http://localhost/b", Body::empty());
    let _res = service.hyper_call(req).await;

    // single put
    let req = signed_request(Method::PUT, "http://localhost/b/single", Body::from("aabbcc"));
    let _res = service.hyper_call(req).await;

    // multipart
    let upload_id = initiate(&service, "http://localhost/b/multi?uploads").await;
    for (part_number, content) in [(1, "aa"), (2, "bb"), (3, "cc")] {
        let uri = format!(
            "http://localhost/b/multi?partNumber={}&uploadId={}",
            part_number, upload_id
        );
        let req = signed_request(Method::PUT, &uri, Body::from(content));
        let _res = service.hyper_call(req).await;
    }
    let uri = format!("http://localhost/b/multi?uploadId={}", upload_id);
    let req = signed_request(Method::POST, &uri, Body::empty());
    let res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::OK);

    let mut bodies = Vec::new();
    for key in ["single", "multi"] {
        let uri = format!("http://localhost/b/{}", key);
        let req = signed_request(Method::GET, &uri, Body::empty());
        let mut res = service.hyper_call(req).await;
        bodies.push(recv_body_string(&mut res).await.unwrap());
    }
    assert_eq!(bodies[0], bodies[1]);
}

#[tokio::test]
async fn abort_multipart() {
    let (root, service) = common::setup_service("abort_multipart").unwrap();

    let req = signed_request(Method::PUT, "http://localhost/b", Body::empty());
    let _res = service.hyper_call(req).await;

    let upload_id = initiate(&service, "http://localhost/b/k?uploads").await;

    let uri = format!("http://localhost/b/k?partNumber=1&uploadId={}", upload_id);
    let req = signed_request(Method::PUT, &uri, Body::from("data"));
    let _res = service.hyper_call(req).await;

    let uri = format!("http://localhost/b/k?uploadId={}", upload_id);
    let req = signed_request(Method::DELETE, &uri, Body::empty());
    let res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(!root.join(".uploads").join(&upload_id).exists());

    // the upload is gone afterwards
    let uri = format!("http://localhost/b/k?partNumber=2&uploadId={}", upload_id);
    let req = signed_request(Method::PUT, &uri, Body::from("data"));
    let mut res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = recv_body_string(&mut res).await.unwrap();
    assert!(body.contains("<Code>NoSuchUpload</Code>"));
}

#[tokio::test]
async fn unknown_upload_id() {
    let (_root, service) = common::setup_service("unknown_upload_id").unwrap();

    let req = signed_request(Method::PUT, "http://localhost/b", Body::empty());
    let _res = service.hyper_call(req).await;

    for uri in [
        "http://localhost/b/k?partNumber=1&uploadId=00000000000000000000000000000000",
        "http://localhost/b/k?uploadId=00000000000000000000000000000000",
        "http://localhost/b/k?uploadId=not-an-upload-id",
    ] {
        let method = if uri.contains("partNumber") {
            Method::PUT
        } else {
            Method::POST
        };
        let req = signed_request(method, uri, Body::empty());
        let mut res = service.hyper_call(req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{}", uri);
        let body = recv_body_string(&mut res).await.unwrap();
        assert!(body.contains("<Code>NoSuchUpload</Code>"));
    }
}

#[tokio::test]
async fn part_number_bounds() {
    let (_root, service) = common::setup_service("part_number_bounds").unwrap();

    let req = signed_request(Method::PUT, "http://localhost/b", Body::empty());
    let _res = service.hyper_call(req).await;

    let upload_id = initiate(&service, "http://localhost/b/k?uploads").await;

    for part_number in [0, 10001] {
        let uri = format!(
            "http://localhost/b/k?partNumber={}&uploadId={}",
            part_number, upload_id
        );
        let req = signed_request(Method::PUT, &uri, Body::from("data"));
        let mut res = service.hyper_call(req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{}", part_number);
        let body = recv_body_string(&mut res).await.unwrap();
        assert!(body.contains("<Code>InvalidArgument</Code>"));
    }
}

#[tokio::test]
async fn part_gaps_are_skipped() {
    let (_root, service) = common::setup_service("part_gaps_are_skipped").unwrap();

    let req = signed_request(Method::PUT, "http://localhost/b", Body::empty());
    let _res = service.hyper_call(req).await;

    let upload_id = initiate(&service, "http://localhost/b/k?uploads").await;

    // parts 1 and 3; part 2 missing
    for (part_number, content) in [(1, "aa"), (3, "cc")] {
        let uri = format!(
            "http://localhost/b/k?partNumber={}&uploadId={}",
            part_number, upload_id
        );
        let req = signed_request(Method::PUT, &uri, Body::from(content));
        let _res = service.hyper_call(req).await;
    }

    let uri = format!("http://localhost/b/k?uploadId={}", upload_id);
    let req = signed_request(Method::POST, &uri, Body::empty());
    let res = service.hyper_call(req).await;
    assert_eq!(res.status(), StatusCode::OK);

    let req = signed_request(Method::GET, "http://localhost/b/k", Body::empty());
    let mut res = service.hyper_call(req).await;
    let body = recv_body_string(&mut res).await.unwrap();
    assert_eq!(body, "aacc");
}
