use searchd::http::response::{Response, ResponseBuilder, StatusCode, HTTP_VERSION};
use searchd::http::writer::serialize_response;

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
}

#[test]
fn test_response_builder_basic() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .body(b"Hello, World!")
        .build();

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.protocol, HTTP_VERSION);
    assert_eq!(&response.body[..], b"Hello, World!");
}

#[test]
fn test_response_builder_with_headers() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/plain")
        .header("X-Custom", "value")
        .build();

    assert_eq!(response.headers.get("Content-Type").unwrap(), "text/plain");
    assert_eq!(response.headers.get("X-Custom").unwrap(), "value");
}

#[test]
fn test_append_to_body() {
    let mut response = Response::new(StatusCode::NotFound);
    response.append_to_body("<html>");
    response.append_to_body(String::from("gone"));
    response.append_to_body(b"</html>");

    assert_eq!(&response.body[..], b"<html>gone</html>");
    assert_eq!(response.message(), "Not Found");
}

#[test]
fn test_content_type_accessors() {
    let mut response = Response::ok("x");
    assert_eq!(response.content_type(), None);

    response.set_content_type("image/png");
    assert_eq!(response.content_type(), Some("image/png"));
}

#[test]
fn test_serialize_status_line_and_headers() {
    let mut response = Response::ok("hello");
    response.set_content_type("text/plain");

    let bytes = serialize_response(&response);
    let text = String::from_utf8(bytes).unwrap();

    assert_eq!(
        text,
        "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 5\r\n\r\nhello"
    );
}

#[test]
fn test_serialize_content_length_tracks_body() {
    let mut response = ResponseBuilder::new(StatusCode::NotFound)
        .header("Content-Length", "999")
        .build();
    response.append_to_body("abc");

    let text = String::from_utf8(serialize_response(&response)).unwrap();

    assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
    assert!(text.contains("Content-Length: 3\r\n"));
    assert!(!text.contains("999"));
    assert!(text.ends_with("\r\n\r\nabc"));
}

#[test]
fn test_serialize_empty_body() {
    let response = Response::new(StatusCode::Ok);
    let text = String::from_utf8(serialize_response(&response)).unwrap();

    assert_eq!(text, "HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n");
}
