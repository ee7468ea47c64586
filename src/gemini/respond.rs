use tracing::error;

use crate::content::{Directory, Listing, Outcome};
use crate::gemini::response::Response;

/// Turns a resolver outcome into the gemini reply, reading the file body
/// when there is one.
///
/// Blocked and missing paths produce the same response.
pub async fn respond(outcome: Outcome, charset: &str) -> Response {
    match outcome {
        Outcome::Blocked | Outcome::NotFound => Response::not_found(),
        Outcome::ServerError(e) => {
            error!(error = %e, "Failed to resolve request");
            Response::server_error()
        }
        Outcome::Directory(Directory::Index(target)) => Response::redirect(target.href()),
        Outcome::Directory(Directory::Listing(listing)) => Response::success(
            format!("text/gemini; charset={}", charset),
            listing_body(&listing).into_bytes(),
        ),
        Outcome::File { local, mime } => match tokio::fs::read(&local).await {
            Ok(body) => Response::success(mime.content_type(charset), body),
            Err(e) => {
                error!(path = %local.display(), error = %e, "Failed to read file");
                Response::server_error()
            }
        },
    }
}

/// Gemtext page listing a directory's entries.
pub fn listing_body(listing: &Listing) -> String {
    let mut body = format!("# Directory {}\n", listing.path);
    for entry in &listing.entries {
        body.push_str(&format!("=> {} {}\n", entry.link, entry.name));
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentPath, Entry, MimeType};

    #[tokio::test]
    async fn blocked_and_missing_are_identical() {
        let blocked = respond(Outcome::Blocked, "utf-8").await;
        let missing = respond(Outcome::NotFound, "utf-8").await;
        assert_eq!(blocked, missing);
        assert_eq!(missing.to_bytes(), b"51 Not found\r\n");
    }

    #[tokio::test]
    async fn server_error_is_temporary_failure() {
        let err = std::io::Error::other("disk on fire");
        let response = respond(Outcome::ServerError(err), "utf-8").await;
        assert_eq!(response.to_bytes(), b"40 Server error\r\n");
    }

    #[tokio::test]
    async fn vanished_file_is_temporary_failure() {
        let outcome = Outcome::File {
            local: std::env::temp_dir().join("gemserve-vanished/page.gmi"),
            mime: MimeType::Gemini,
        };
        let response = respond(outcome, "utf-8").await;
        assert_eq!(response.to_bytes(), b"40 Server error\r\n");
    }

    #[tokio::test]
    async fn directory_redirects_to_index() {
        let target = ContentPath::parse("/docs").unwrap().child("index.gmi");
        let response = respond(Outcome::Directory(Directory::Index(target)), "utf-8").await;
        assert_eq!(response.to_bytes(), b"30 /docs/index.gmi\r\n");
    }

    #[test]
    fn listing_has_one_link_per_entry() {
        let listing = Listing {
            path: ContentPath::parse("/docs").unwrap(),
            entries: vec![
                Entry { name: "a.gmi".into(), link: "/docs/a.gmi".into(), is_dir: false },
                Entry { name: "sub".into(), link: "/docs/sub/".into(), is_dir: true },
            ],
        };
        assert_eq!(
            listing_body(&listing),
            "# Directory /docs\n=> /docs/a.gmi a.gmi\n=> /docs/sub/ sub\n"
        );
    }
}
