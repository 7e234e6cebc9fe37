// src/pages.rs
//! HTML shells served at `/`, `/login` and `/signup`. The frontend bundle
//! mounts into `#app`; these only give the session gate concrete targets.

use axum::{response::Html, routing::get, Router};

use crate::auth::AuthedUser;

fn shell(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title} | HackGenix</title>\n</head>\n<body>\n<main id=\"app\">{body}</main>\n</body>\n</html>\n"
    ))
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

async fn dashboard(user: AuthedUser) -> Html<String> {
    let who = user.email.as_deref().unwrap_or(&user.id);
    shell(
        "Dashboard",
        &format!("<h1>Welcome back, {}</h1>", escape(who)),
    )
}

async fn login() -> Html<String> {
    shell("Sign in", "<h1>Sign in</h1>")
}

async fn signup() -> Html<String> {
    shell("Sign up", "<h1>Create an account</h1>")
}

pub fn pages_routes() -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/login", get(login))
        .route("/signup", get(signup))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::{request, TestApp};
    use axum::http::{header, StatusCode};

    #[test]
    fn test_escape() {
        assert_eq!(escape("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }

    #[tokio::test]
    async fn test_guest_pages_render() {
        let app = TestApp::new().await;

        for path in ["/login", "/signup"] {
            let response = app.send(request("GET", path, None)).await;
            assert_eq!(response.status, StatusCode::OK);
            let content_type = response.headers[header::CONTENT_TYPE].to_str().unwrap();
            assert!(content_type.starts_with("text/html"));
            assert!(response.text.contains("<main id=\"app\">"));
        }
    }

    #[tokio::test]
    async fn test_dashboard_greets_signed_in_user() {
        let app = TestApp::new().await;
        let cookie = app.login("alice").await;

        let response = app.send(request("GET", "/", Some(&cookie))).await;

        assert_eq!(response.status, StatusCode::OK);
        assert!(response.text.contains("Welcome back, alice@uni.edu"));
    }
}
