//! robots.txt generation.

use std::fmt::Write;

use super::{MARKETING_PATHS, absolute_url};

/// Path prefixes crawlers must not follow: raw page data, framework
/// assets, administration.
pub const DISALLOWED_PREFIXES: &[&str] = &["/api/", "/page-data/", "/_assets/", "/admin/"];

/// Seconds between crawler requests.
pub const CRAWL_DELAY: u32 = 1;

/// The site's robots policy.
pub fn generate_robots(base_url: &str) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "User-agent: *");
    let _ = writeln!(out, "Allow: /");
    for prefix in DISALLOWED_PREFIXES {
        let _ = writeln!(out, "Disallow: {prefix}");
    }
    for path in MARKETING_PATHS.iter().filter(|p| **p != "/") {
        let _ = writeln!(out, "Allow: {path}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Sitemap: {}", absolute_url(base_url, "/sitemap.xml"));
    let _ = writeln!(out, "Crawl-delay: {CRAWL_DELAY}");

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_in_order() {
        let robots = generate_robots("https://example.com/");
        let lines: Vec<&str> = robots.lines().filter(|l| !l.is_empty()).collect();
        assert_eq!(
            lines,
            [
                "User-agent: *",
                "Allow: /",
                "Disallow: /api/",
                "Disallow: /page-data/",
                "Disallow: /_assets/",
                "Disallow: /admin/",
                "Allow: /technology",
                "Allow: /about",
                "Allow: /contact",
                "Sitemap: https://example.com/sitemap.xml",
                "Crawl-delay: 1",
            ]
        );
    }
}
