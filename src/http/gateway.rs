//! Serves the content tree over HTTP, rendering gemtext as HTML.

use std::path::Path;

use anyhow::Context;
use tracing::{debug, error};

use crate::config::Config;
use crate::content::{Directory, Listener, MimeType, Outcome, Resolver};
use crate::gemtext;
use crate::http::page;
use crate::http::request::{Method, Request};
use crate::http::response::Response;

/// Produces the response for one request. Never fails: every error becomes
/// a status code.
pub async fn handle(req: &Request, config: &Config) -> Response {
    if !matches!(req.method, Method::GET | Method::HEAD) {
        return Response::method_not_allowed();
    }

    let path = effective_path(req.target_path(), config.auto_list);
    let resolver = Resolver::from_config(config, Listener::Http);

    match resolver.resolve(path).await {
        Outcome::Blocked | Outcome::NotFound => Response::not_found(),
        Outcome::ServerError(e) => {
            error!(path, error = %e, "Failed to resolve request");
            Response::internal_error()
        }
        Outcome::Directory(Directory::Index(target)) => Response::redirect(target.href()),
        Outcome::Directory(Directory::Listing(listing)) => Response::html(page::shell(
            &config.site_name,
            &page::listing_title(&listing),
            config.http.css.as_deref(),
            &page::listing_fragment(&listing),
        )),
        Outcome::File { local, mime } => file_response(&local, mime, path, config).await,
    }
}

/// The site root is its `index.gmi` unless directories are listed.
pub fn effective_path(target: &str, auto_list: bool) -> &str {
    if !auto_list && (target.is_empty() || target == "/") {
        "/index.gmi"
    } else {
        target
    }
}

/// A file that disappears or fails to read after resolution is a 500.
async fn file_response(local: &Path, mime: MimeType, request_path: &str, config: &Config) -> Response {
    match serve_file(local, mime, request_path, config).await {
        Ok(response) => response,
        Err(e) => {
            error!(path = request_path, error = %format!("{:#}", e), "Failed to serve file");
            Response::internal_error()
        }
    }
}

async fn serve_file(
    local: &Path,
    mime: MimeType,
    request_path: &str,
    config: &Config,
) -> anyhow::Result<Response> {
    let body = tokio::fs::read(local)
        .await
        .with_context(|| format!("failed to read {}", local.display()))?;

    if mime != MimeType::Gemini {
        return Ok(Response::ok(mime.content_type(&config.default_charset), body));
    }

    let document = gemtext::parse(&body)?;
    let title = match document.title() {
        Some(title) => title.to_string(),
        None => {
            debug!(path = request_path, "Page has no level-1 heading");
            request_path.to_string()
        }
    };

    Ok(Response::html(page::shell(
        &config.site_name,
        &title,
        config.http.css.as_deref(),
        &document.to_html(),
    )))
}
