//! Tests for image host response parsing and client setup.

use picsync_error::{PicsyncError, PicsyncErrorKind};
use picsync_hosting::{
    CloudinaryHost, HostProvider, HostingErrorKind, ImageHost, ImgurHost,
    parse_cloudinary_response, parse_imgur_response,
};
use std::str::FromStr;

fn hosting_kind(err: &PicsyncError) -> HostingErrorKind {
    match err.kind() {
        PicsyncErrorKind::Hosting(e) => e.kind.clone(),
        other => panic!("unexpected error: {}", other),
    }
}

fn rejection_detail(err: &PicsyncError) -> String {
    match hosting_kind(err) {
        HostingErrorKind::UploadRejected(detail) => detail,
        other => panic!("expected rejection, got {}", other),
    }
}

#[test]
fn test_imgur_success() {
    let body = r#"{"data":{"id":"abc","link":"https://i.imgur.com/abc.png"},"success":true,"status":200}"#;
    let hosted = parse_imgur_response(200, body).unwrap();
    assert_eq!(hosted.url, "https://i.imgur.com/abc.png");
    assert_eq!(hosted.to_string(), "https://i.imgur.com/abc.png");
}

#[test]
fn test_imgur_failure_carries_host_detail() {
    let body = r#"{"data":{"error":"Invalid client_id","request":"/3/image"},"success":false,"status":403}"#;
    let err = parse_imgur_response(403, body).unwrap_err();
    assert!(err.is_upload_rejected());
    assert!(rejection_detail(&err).contains("Invalid client_id"));
    assert!(rejection_detail(&err).contains("403"));
}

#[test]
fn test_imgur_structured_error_detail() {
    let body = r#"{"data":{"error":{"code":1003,"message":"File type invalid"}},"success":false,"status":400}"#;
    let err = parse_imgur_response(400, body).unwrap_err();
    assert!(rejection_detail(&err).contains("File type invalid"));
}

#[test]
fn test_imgur_missing_link_is_rejected() {
    let body = r#"{"data":{"id":"abc"},"success":true,"status":200}"#;
    let err = parse_imgur_response(200, body).unwrap_err();
    assert!(rejection_detail(&err).contains("data.link"));
}

#[test]
fn test_imgur_unreadable_body_is_rejected() {
    let err = parse_imgur_response(502, "<html>Bad Gateway</html>").unwrap_err();
    assert!(err.is_upload_rejected());
}

#[test]
fn test_cloudinary_success() {
    let body = r#"{"public_id":"x","secure_url":"https://res.cloudinary.com/demo/image/upload/x.png","url":"http://res.cloudinary.com/demo/image/upload/x.png"}"#;
    let hosted = parse_cloudinary_response(200, body).unwrap();
    assert_eq!(
        hosted.url,
        "https://res.cloudinary.com/demo/image/upload/x.png"
    );
}

#[test]
fn test_cloudinary_failure_carries_host_detail() {
    let body = r#"{"error":{"message":"Upload preset must be whitelisted for unsigned uploads"}}"#;
    let err = parse_cloudinary_response(400, body).unwrap_err();
    assert!(rejection_detail(&err).contains("whitelisted"));
}

#[test]
fn test_cloudinary_missing_secure_url_is_rejected() {
    let err = parse_cloudinary_response(200, r#"{"public_id":"x"}"#).unwrap_err();
    assert!(rejection_detail(&err).contains("secure_url"));
}

#[test]
fn test_blank_credentials_are_refused() {
    let err = ImgurHost::new("  ").unwrap_err();
    assert!(matches!(
        hosting_kind(&err),
        HostingErrorKind::MissingCredentials(_)
    ));

    let err = CloudinaryHost::new("demo", "").unwrap_err();
    assert!(matches!(
        hosting_kind(&err),
        HostingErrorKind::MissingCredentials(_)
    ));
}

#[test]
fn test_endpoints() {
    let imgur = ImgurHost::new("client").unwrap();
    assert_eq!(imgur.endpoint(), "https://api.imgur.com/3/image");
    assert_eq!(imgur.provider(), HostProvider::Imgur);

    let cloudinary = CloudinaryHost::new("demo", "preset").unwrap();
    assert_eq!(
        cloudinary.endpoint(),
        "https://api.cloudinary.com/v1_1/demo/image/upload"
    );
    assert_eq!(cloudinary.provider(), HostProvider::Cloudinary);
}

#[test]
fn test_provider_names() {
    assert_eq!(HostProvider::from_str("cloudinary").unwrap(), HostProvider::Cloudinary);
    assert_eq!(HostProvider::Imgur.to_string(), "imgur");
    assert!(HostProvider::from_str("flickr").is_err());
}

#[tokio::test]
async fn test_unreachable_host_is_http_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let host = ImgurHost::new("client")
        .unwrap()
        .with_endpoint(format!("http://127.0.0.1:{}/3/image", port));
    let err = host.upload(vec![1, 2, 3], "a.png").await.unwrap_err();
    assert!(matches!(hosting_kind(&err), HostingErrorKind::Http(_)));
}
