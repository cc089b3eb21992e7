use webroot::http::parser::{
    declared_content_length, decode_head, parse_request, parse_request_line, ParseError,
};
use webroot::http::request::Method;

#[test]
fn test_parse_simple_get_request() {
    let req = "GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let parsed = parse_request_line(req).unwrap();

    assert_eq!(parsed.method, Method::GET);
    assert_eq!(parsed.target, "/");
    assert_eq!(parsed.version, "HTTP/1.1");
    assert_eq!(parse_request(req).unwrap(), "/");
}

#[test]
fn test_parse_request_with_path_and_query_string() {
    let req = "GET /search?q=rust HTTP/1.1\r\nHost: example.com\r\n\r\n";

    assert_eq!(parse_request(req).unwrap(), "/search?q=rust");
}

#[test]
fn test_parse_request_line_without_crlf() {
    assert_eq!(parse_request("GET /index.html HTTP/1.0").unwrap(), "/index.html");
}

#[test]
fn test_parse_ignores_extra_whitespace_between_tokens() {
    assert_eq!(parse_request("GET   /a.txt \tHTTP/1.1\r\n\r\n").unwrap(), "/a.txt");
}

#[test]
fn test_parse_rejects_non_get_methods() {
    for method in ["POST", "PUT", "DELETE", "HEAD", "OPTIONS", "PATCH", "BREW", "get"] {
        let req = format!("{} /index.html HTTP/1.1\r\n\r\n", method);
        let result = parse_request(&req);

        assert_eq!(
            result,
            Err(ParseError::MethodNotSupported(method.to_string())),
            "method {method}"
        );
    }
}

#[test]
fn test_parse_request_line_keeps_non_get_methods() {
    let parsed = parse_request_line("POST /api HTTP/1.1\r\n\r\n").unwrap();
    assert_eq!(parsed.method, Method::POST);

    let parsed = parse_request_line("BREW /pot HTTP/1.1\r\n\r\n").unwrap();
    assert_eq!(parsed.method, Method::Other("BREW".to_string()));
}

#[test]
fn test_parse_malformed_request_lines() {
    for req in [
        "",
        "\r\n\r\n",
        "GET\r\n\r\n",
        "GET /\r\n\r\n",
        "GET / HTTP/1.1 extra\r\n\r\n",
    ] {
        assert_eq!(parse_request_line(req), Err(ParseError::Malformed), "{req:?}");
    }
}

#[test]
fn test_malformed_wins_over_method_check() {
    assert_eq!(parse_request("POST /\r\n\r\n"), Err(ParseError::Malformed));
}

#[test]
fn test_only_first_line_is_the_request_line() {
    let req = "GET /first HTTP/1.1\r\nGET /second HTTP/1.1\r\n\r\n";

    assert_eq!(parse_request(req).unwrap(), "/first");
}

#[test]
fn test_decode_head_rejects_invalid_utf8() {
    assert_eq!(decode_head(b"GET /\xff HTTP/1.1"), Err(ParseError::InvalidEncoding));
    assert_eq!(decode_head(b"GET / HTTP/1.1"), Ok("GET / HTTP/1.1"));
}

#[test]
fn test_content_length_absent_is_zero() {
    assert_eq!(declared_content_length("GET / HTTP/1.1\r\nHost: a"), Ok(0));
}

#[test]
fn test_content_length_is_case_insensitive() {
    let head = "POST /api HTTP/1.1\r\ncontent-length:  12 ";

    assert_eq!(declared_content_length(head), Ok(12));
}

#[test]
fn test_content_length_invalid() {
    let head = "POST /api HTTP/1.1\r\nContent-Length: lots";

    assert_eq!(
        declared_content_length(head),
        Err(ParseError::InvalidContentLength)
    );
}

#[test]
fn test_content_length_not_read_from_request_line() {
    assert_eq!(declared_content_length("Content-Length: 5"), Ok(0));
}
