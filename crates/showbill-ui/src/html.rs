// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use url::Url;

/// Escapes text for interpolation into element content or a quoted
/// attribute value.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn is_web_url(raw: &str) -> bool {
    matches!(
        Url::parse(raw),
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https"
    )
}

/// Image sources must be http(s); anything else gets a deterministic
/// placeholder seeded from the record identifier, so a card keeps the same
/// stand-in image across renders.
pub fn safe_image_url(raw: Option<&str>, ident: &str) -> String {
    match raw {
        Some(candidate) if is_web_url(candidate) => candidate.to_owned(),
        _ => format!("https://picsum.photos/seed/{ident}/400/300"),
    }
}

/// Links get no placeholder: a card without a valid target simply renders
/// no action link.
pub fn safe_link_url(raw: Option<&str>) -> Option<String> {
    raw.filter(|candidate| is_web_url(candidate))
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::{escape_html, safe_image_url, safe_link_url};

    #[test]
    fn escapes_all_markup_significant_characters() {
        assert_eq!(
            escape_html(r#"<b>Tom & "Jerry's"</b>"#),
            "&lt;b&gt;Tom &amp; &quot;Jerry&#39;s&quot;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn http_and_https_images_pass_through() {
        assert_eq!(
            safe_image_url(Some("https://example.com/a.png"), "x"),
            "https://example.com/a.png"
        );
        assert_eq!(
            safe_image_url(Some("http://example.com/a.png"), "x"),
            "http://example.com/a.png"
        );
    }

    #[test]
    fn other_schemes_fall_back_to_seeded_placeholder() {
        for bad in [
            Some("javascript:alert(1)"),
            Some("data:image/png;base64,AAAA"),
            Some("ftp://example.com/a.png"),
            Some("not a url"),
            None,
        ] {
            assert_eq!(
                safe_image_url(bad, "abc123"),
                "https://picsum.photos/seed/abc123/400/300"
            );
        }
    }

    #[test]
    fn placeholder_is_deterministic_per_ident() {
        assert_eq!(safe_image_url(None, "25"), safe_image_url(None, "25"));
        assert_ne!(safe_image_url(None, "25"), safe_image_url(None, "250"));
    }

    #[test]
    fn invalid_links_are_dropped_not_replaced() {
        assert_eq!(
            safe_link_url(Some("https://tickets.example/e/1")),
            Some("https://tickets.example/e/1".to_owned())
        );
        assert_eq!(safe_link_url(Some("javascript:alert(1)")), None);
        assert_eq!(safe_link_url(None), None);
    }
}
