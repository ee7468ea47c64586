//! HTML pages generated by the gateway.

use crate::content::Listing;
use crate::gemtext::escape;

/// Wraps an HTML fragment in a full document.
///
/// The `<title>` reads `<site> :: <title>`; `css`, when configured, is
/// embedded in a `<style>` element.
pub fn shell(site: &str, title: &str, css: Option<&str>, fragment: &str) -> String {
    let mut page = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str(&format!("<title>{} :: {}</title>\n", escape(site), escape(title)));
    if let Some(css) = css {
        page.push_str("<style>\n");
        page.push_str(css);
        page.push_str("\n</style>\n");
    }
    page.push_str("</head>\n<body>\n");
    page.push_str(fragment);
    page.push_str("</body>\n</html>\n");
    page
}

/// Title used for a directory listing page.
pub fn listing_title(listing: &Listing) -> String {
    format!("Directory {}", listing.path)
}

/// Body of a directory listing: a `..` link to the parent, then one link
/// per entry.
pub fn listing_fragment(listing: &Listing) -> String {
    let mut html = format!("<h1>{}</h1>\n<ul>\n", escape(&listing_title(listing)));
    html.push_str(&format!(
        "<li><a href=\"{}\">..</a></li>\n",
        escape(&listing.path.parent().dir_href())
    ));
    for entry in &listing.entries {
        let name = if entry.is_dir {
            format!("{}/", entry.name)
        } else {
            entry.name.clone()
        };
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            escape(&entry.link),
            escape(&name)
        ));
    }
    html.push_str("</ul>\n");
    html
}
