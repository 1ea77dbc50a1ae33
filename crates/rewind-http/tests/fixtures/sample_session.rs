// Generated by rewind-http. Delete this file to re-record.

use rewind_http::{HttpMethod, HttpRequest, HttpResponse, HttpVersion, MockHttpClient};

pub fn sample_session() -> MockHttpClient {
    let mut client = MockHttpClient::new();
    client.add(
        HttpRequest::builder(HttpMethod::Get, "http://localhost/1")
            .header("Host", "localhost")
            .header("User-Agent", "rewind-tester")
            .version(HttpVersion::Http11)
            .build(),
        HttpResponse::builder(200)
            .header("Content-Type", "text/plain")
            .body("It works!\n")
            .build()
            .expect("captured status code is valid"),
    );
    client.add(
        HttpRequest::builder(HttpMethod::Post, "http://localhost/login")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body("username=admin&password=secret1234")
            .version(HttpVersion::Http11)
            .build(),
        HttpResponse::builder(302)
            .header("Location", "http://localhost/dashboard")
            .build()
            .expect("captured status code is valid"),
    );
    client
}
