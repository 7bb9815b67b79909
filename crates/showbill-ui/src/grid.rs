// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::card::Card;
use crate::html::escape_html;

/// Renders the card grid fragment. The caller swaps the whole container
/// content for this string on every update; grids stay small (a few
/// hundred cards at most) so no diffing is attempted.
pub fn render_grid(cards: &[Card]) -> String {
    if cards.is_empty() {
        return r#"<p class="no-results">No results. Try clearing a filter or two.</p>"#.to_owned();
    }

    let mut out = String::new();
    for card in cards {
        render_card(&mut out, card);
    }
    out
}

fn render_card(out: &mut String, card: &Card) {
    out.push_str(&format!(
        "<article class=\"card\" data-ident=\"{}\">\n",
        escape_html(&card.ident)
    ));
    out.push_str(&format!(
        "  <img class=\"card-image\" src=\"{}\" alt=\"{}\" loading=\"lazy\">\n",
        escape_html(&card.image),
        escape_html(&card.title)
    ));
    out.push_str(&format!(
        "  <h3 class=\"card-title\">{}</h3>\n",
        escape_html(&card.title)
    ));
    if !card.tag_labels.is_empty() {
        out.push_str("  <ul class=\"card-tags\">");
        for label in &card.tag_labels {
            out.push_str(&format!("<li>{}</li>", escape_html(label)));
        }
        out.push_str("</ul>\n");
    }
    for line in &card.detail_lines {
        out.push_str(&format!(
            "  <p class=\"card-detail\">{}</p>\n",
            escape_html(line)
        ));
    }
    out.push_str("</article>\n");
}

/// Counter fragment for the results mount point.
pub fn render_results_count(shown: usize, total: usize) -> String {
    if shown == total {
        format!("<span class=\"results-count\">{total} shows</span>")
    } else {
        format!("<span class=\"results-count\">{shown} of {total} shows</span>")
    }
}

/// Active-filter tag list fragment. Empty selection renders nothing so the
/// mount point collapses.
pub fn render_active_tags(labels: &[String]) -> String {
    if labels.is_empty() {
        return String::new();
    }
    let mut out = String::from("<ul class=\"active-tags\">");
    for label in labels {
        out.push_str(&format!(
            "<li class=\"active-tag\">{}</li>",
            escape_html(label)
        ));
    }
    out.push_str("</ul>");
    out
}

#[cfg(test)]
mod tests {
    use super::{render_active_tags, render_grid, render_results_count};
    use crate::card::Card;
    use showbill_app::TagRegistry;
    use showbill_testkit::{sample_shows, show};

    fn cards() -> Vec<Card> {
        let registry = TagRegistry::builtin();
        sample_shows()
            .iter()
            .map(|record| Card::from_show(record, &registry))
            .collect()
    }

    #[test]
    fn empty_view_renders_the_placeholder_not_nothing() {
        let html = render_grid(&[]);
        assert!(html.contains("no-results"));
        assert!(!html.contains("<article"));
    }

    #[test]
    fn one_card_per_record_in_input_order() {
        let html = render_grid(&cards());
        assert_eq!(html.matches("<article").count(), 3);
        let night = html.find("Night Moves").expect("first card");
        let metal = html.find("Metal Monday").expect("second card");
        let open = html.find("Open Mic").expect("third card");
        assert!(night < metal && metal < open);
    }

    #[test]
    fn cards_expose_the_record_ident_as_data_attribute() {
        let shows = sample_shows();
        let html = render_grid(&cards());
        for record in &shows {
            assert!(html.contains(&format!("data-ident=\"{}\"", record.id.as_str())));
        }
    }

    #[test]
    fn card_text_is_escaped() {
        let registry = TagRegistry::builtin();
        let hostile = show("<script>alert('x')</script> & Friends", "harlows");
        let html = render_grid(&[Card::from_show(&hostile, &registry)]);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&amp; Friends"));
    }

    #[test]
    fn results_count_distinguishes_filtered_views() {
        assert_eq!(
            render_results_count(151, 151),
            "<span class=\"results-count\">151 shows</span>"
        );
        assert_eq!(
            render_results_count(3, 151),
            "<span class=\"results-count\">3 of 151 shows</span>"
        );
    }

    #[test]
    fn active_tags_fragment_collapses_when_empty() {
        assert_eq!(render_active_tags(&[]), "");
        let html = render_active_tags(&["Harlow's".to_owned()]);
        assert!(html.contains("Harlow&#39;s"));
    }
}
