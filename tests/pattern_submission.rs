#![cfg(feature = "submit")]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use rhombus_preview::SubmitError;
use rhombus_preview::pattern::{
    DEFAULT_ENDPOINT, GenerateRegexRequest, PatternQuery, PatternSubmitter, SubmitterConfig,
};

struct CapturedRequest {
    request_line: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl CapturedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Serve exactly one request, answering with `status` and `reply_body`, then hand back what
/// was received.
fn one_shot_server(
    status: &'static str,
    reply_body: &'static str,
) -> (String, thread::JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/api/generateregex", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let header_end = loop {
            let n = stream.read(&mut chunk).unwrap();
            assert!(n > 0, "client closed before sending headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos;
            }
        };

        let head = String::from_utf8(buf[..header_end].to_vec()).unwrap();
        let mut lines = head.split("\r\n");
        let request_line = lines.next().unwrap().to_string();
        let headers: Vec<(String, String)> = lines
            .filter_map(|l| l.split_once(':'))
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .collect();
        let content_length: usize = headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
            .map(|(_, v)| v.parse().unwrap())
            .unwrap_or(0);

        let mut body = buf[header_end + 4..].to_vec();
        while body.len() < content_length {
            let n = stream.read(&mut chunk).unwrap();
            assert!(n > 0, "client closed before sending body");
            body.extend_from_slice(&chunk[..n]);
        }

        let reply = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{reply_body}",
            reply_body.len(),
        );
        stream.write_all(reply.as_bytes()).unwrap();
        stream.flush().unwrap();

        CapturedRequest {
            request_line,
            headers,
            body: String::from_utf8(body).unwrap(),
        }
    });

    (url, handle)
}

fn submitter_for(url: String) -> PatternSubmitter {
    PatternSubmitter::new(SubmitterConfig {
        endpoint: url,
        timeout: Some(Duration::from_secs(10)),
        use_system_proxy: false,
    })
    .unwrap()
}

#[test]
fn default_config_targets_local_dev_server() {
    let config = SubmitterConfig::default();
    assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(config.endpoint, "http://127.0.0.1:8000/api/generateregex");
    assert!(config.timeout.is_none());
}

#[test]
fn submit_posts_pattern_as_json() {
    let (url, server) = one_shot_server("201 Created", r#"{"nat_lang_input":"\\d+"}"#);
    let submitter = submitter_for(url);

    let submission = submitter.submit(&PatternQuery::new(r"\d+")).unwrap();
    let req = server.join().unwrap();

    assert_eq!(req.request_line, "POST /api/generateregex HTTP/1.1");
    assert_eq!(req.header("content-type"), Some("application/json"));
    let sent: GenerateRegexRequest = serde_json::from_str(&req.body).unwrap();
    assert_eq!(
        sent,
        GenerateRegexRequest {
            nat_lang_input: r"\d+".to_string()
        }
    );
    let raw: serde_json::Value = serde_json::from_str(&req.body).unwrap();
    assert_eq!(raw.as_object().unwrap().len(), 1);

    assert_eq!(submission.status, 201);
    assert!(submission.is_success());
    assert_eq!(submission.echo().unwrap().nat_lang_input, r"\d+");
}

#[test]
fn non_success_status_is_returned_not_raised() {
    let (url, server) = one_shot_server(
        "400 Bad Request",
        r#"{"nat_lang_input":["This field may not be blank."]}"#,
    );
    let submitter = submitter_for(url);

    let submission = submitter.submit(&PatternQuery::new("")).unwrap();
    let req = server.join().unwrap();

    assert_eq!(req.body, r#"{"nat_lang_input":""}"#);
    assert_eq!(submission.status, 400);
    assert!(!submission.is_success());
    assert!(submission.body.contains("may not be blank"));
}

#[test]
fn connection_refused_is_http_error() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let submitter = submitter_for(format!("http://{addr}/api/generateregex"));

    let err = submitter.submit(&PatternQuery::new("digits")).unwrap_err();
    assert!(matches!(err, SubmitError::Http(_)));
}
