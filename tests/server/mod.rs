use actix_web::{App, HttpResponse, HttpServer, web};
use serde_json::json;

/// Body text long enough to clear the thin content threshold
pub fn long_text() -> String {
    "lorem ipsum dolor ".repeat(120)
}

pub fn html_page(head: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head>{}</head><body>{}</body></html>",
        head, body
    )
}

/// A page that passes every on-page rule
pub fn healthy_page(title: &str, path: &str) -> String {
    html_page(
        &format!(
            r#"<title>{}</title>
            <meta name="description" content="{} description">
            <link rel="canonical" href="{}">"#,
            title, title, path
        ),
        &format!(
            r#"<h1>{}</h1><p>{}</p>
            <img src="/hero.webp" alt="Hero" width="800" height="400">"#,
            title,
            long_text()
        ),
    )
}

fn homepage() -> String {
    html_page(
        r#"<title>Fixture Home</title>
        <meta name="description" content="Fixture homepage">
        <meta property="og:title" content="Fixture Home">
        <link rel="canonical" href="/">
        <script type="application/ld+json">{"@type": "Organization"}</script>"#,
        &format!(
            r##"<nav>
                <a href="/">Home</a>
                <a href="/about">About</a>
                <a href="/blog">Blog</a>
            </nav>
            <h1>Welcome</h1>
            <p>{}</p>
            <a href="/contact?ref=home#form">Contact</a>
            <a href="/news">News</a>
            <a href="/about#team">Team</a>
            <a href="/missing">Old page</a>
            <a href="/brochure.pdf">Brochure</a>
            <a href="/assets/site.css">Styles</a>
            <a href="mailto:hello@example.com">Email</a>
            <a href="tel:+15555550100">Call</a>
            <a href="https://external.example.org/partner">Partner</a>
            <a href="">Empty</a>
            <footer><a href="/blog">Blog</a></footer>"##,
            long_text()
        ),
    )
}

/// Thin page failing several rules
fn contact_page() -> String {
    html_page(
        "<title>Contact</title>",
        r#"<script>var tracking = "lots of words hidden in a script tag";</script>
        <p>Write to us any time.</p>
        <img src="/map.png">"#,
    )
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// Starts the fixture site on an ephemeral port and returns its base URL (no trailing slash)
pub async fn start_fixture_site() -> String {
    let http_server = HttpServer::new(|| {
        App::new()
            .route(
                "/",
                web::get().to(|| async {
                    HttpResponse::Ok()
                        .content_type("text/html; charset=utf-8")
                        .insert_header(("strict-transport-security", "max-age=63072000"))
                        .insert_header(("x-frame-options", "DENY"))
                        .insert_header(("x-content-type-options", "nosniff"))
                        .body(homepage())
                }),
            )
            .route(
                "/about",
                web::get().to(|| async { html(healthy_page("About Us", "/about")) }),
            )
            .route(
                "/blog",
                web::get().to(|| async { html(healthy_page("Duplicate Title", "/blog")) }),
            )
            .route(
                "/news",
                web::get().to(|| async { html(healthy_page("Duplicate Title", "/news")) }),
            )
            .route("/contact", web::get().to(|| async { html(contact_page()) }))
            .route(
                "/missing",
                web::get().to(|| async { HttpResponse::NotFound().body("Not Found") }),
            )
            .route(
                "/old-home",
                web::get().to(|| async {
                    HttpResponse::MovedPermanently()
                        .append_header(("Location", "/"))
                        .finish()
                }),
            )
            .route(
                "/robots.txt",
                web::get().to(|| async {
                    HttpResponse::Ok()
                        .content_type("text/plain")
                        .body("User-agent: *\nDisallow: /private\n\nSitemap: /sitemap.xml\n")
                }),
            )
            .route(
                "/sitemap.xml",
                web::route().to(|| async {
                    HttpResponse::Ok()
                        .content_type("application/xml")
                        .body("<urlset></urlset>")
                }),
            )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("Failed to bind fixture site");

    let addr = http_server
        .addrs()
        .first()
        .cloned()
        .expect("No address bound");
    let url = format!("http://{}", addr);

    let app_server = http_server.run();
    tokio::spawn(async move {
        if let Err(e) = app_server.await {
            eprintln!("Test server error: {}", e);
        }
    });

    url
}

/// Fake PageSpeed, RDAP and search API endpoints
pub async fn start_provider_stub() -> String {
    let http_server = HttpServer::new(|| {
        App::new()
            .route(
                "/pagespeed",
                web::get().to(|| async {
                    HttpResponse::Ok().json(json!({
                        "lighthouseResult": {
                            "categories": {
                                "performance": { "score": 0.9 },
                                "accessibility": { "score": 0.8 },
                                "seo": { "score": 0.7 },
                                "best-practices": { "score": 1.0 }
                            }
                        }
                    }))
                }),
            )
            .route(
                "/rdap/{domain}",
                web::get().to(|| async {
                    HttpResponse::Ok().json(json!({
                        "events": [
                            { "eventAction": "last changed", "eventDate": "2024-01-01T00:00:00Z" },
                            { "eventAction": "registration", "eventDate": "2001-03-15T00:00:00Z" }
                        ]
                    }))
                }),
            )
            .route(
                "/serp",
                web::get().to(|query: web::Query<std::collections::HashMap<String, String>>| async move {
                    match query.get("q").map(String::as_str) {
                        Some("broken") => HttpResponse::InternalServerError().finish(),
                        Some("fixture site") => HttpResponse::Ok().json(json!({
                            "organic_results": [
                                { "link": "https://other.example.org/" },
                                { "link": "http://127.0.0.1/about" }
                            ]
                        })),
                        _ => HttpResponse::Ok().json(json!({
                            "organic_results": [ { "link": "https://other.example.org/" } ]
                        })),
                    }
                }),
            )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("Failed to bind provider stub");

    let addr = http_server
        .addrs()
        .first()
        .cloned()
        .expect("No address bound");
    let url = format!("http://{}", addr);

    let app_server = http_server.run();
    tokio::spawn(async move {
        if let Err(e) = app_server.await {
            eprintln!("Test server error: {}", e);
        }
    });

    url
}
