//! End-to-end tests for the chunking engine.
//!
//! Exercises the public `split` / `Chunker` API on realistic article
//! markup and checks the output properties every caller relies on:
//! budget compliance, well-formed fragments, preserved content and
//! unique identifiers.

use std::collections::HashMap;

use html_chunker::html::{parse_fragment, serialize_nodes, HtmlNode};
use html_chunker::{split, Chunker, ChunkerConfig, DiagnosticKind, OversizePolicy};
use pretty_assertions::assert_eq;

/// Build a blog article with sections, lists, a table and long paragraphs.
fn sample_article() -> String {
    let mut html = String::new();
    html.push_str(r#"<h1 id="title">Spring collection notes</h1>"#);
    for section in 1..=4 {
        html.push_str(&format!(
            r#"<div class="rte-section" data-section-id="section-{section}" id="s{section}">"#
        ));
        html.push_str(&format!("<h2>Part {section}</h2>"));
        for para in 1..=3 {
            html.push_str(&format!(
                "<p>Paragraph {para} of section {section}: {}</p>",
                "The fabric is woven from organic cotton &amp; linen. ".repeat(6)
            ));
        }
        html.push_str(r#"<ul class="features">"#);
        for item in 1..=5 {
            html.push_str(&format!(
                r#"<li data-block-id="b{section}-{item}">Feature {item} &mdash; soft, breathable<br>and durable</li>"#
            ));
        }
        html.push_str("</ul>");
        html.push_str(r#"<img src="/cdn/shop/files/look.jpg" alt="Lookbook">"#);
        html.push_str("</div>");
    }
    html.push_str("<table><tr><td>Size</td><td>Fit</td></tr><tr><td>M</td><td>Regular</td></tr></table>");
    html
}

fn text_of(html: &str) -> String {
    parse_fragment(html)
        .unwrap()
        .iter()
        .map(HtmlNode::text_content)
        .collect()
}

fn collect_ids(node: &HtmlNode, ids: &mut Vec<String>) {
    if let HtmlNode::Element(el) = node {
        for name in ["id", "data-section-id", "data-block-id"] {
            if let Some(value) = el.attribute(name) {
                ids.push(format!("{name}={value}"));
            }
        }
        for child in &el.children {
            collect_ids(child, ids);
        }
    }
}

#[test]
fn test_fragments_respect_budget() {
    let html = sample_article();
    for budget in [200, 500, 1000, 3000] {
        let output = Chunker::with_max_chars(budget).unwrap().chunk(&html).unwrap();

        assert!(output.len() > 1, "budget {budget} should split");
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
        for fragment in &output.fragments {
            assert!(
                fragment.len() <= budget,
                "fragment of {} chars exceeds {budget}",
                fragment.len()
            );
        }
    }
}

/// Assert that a fragment parses and serializes back to itself.
fn assert_reparses(part: &str) {
    let nodes = parse_fragment(part).unwrap_or_else(|e| panic!("{e}: {part}"));
    assert!(!nodes.is_empty());
    assert_eq!(serialize_nodes(&nodes), part);
}

#[test]
fn test_fragments_are_well_formed() {
    let html = sample_article();
    for part in split(&html, 400) {
        assert_reparses(&part);
    }
}

#[test]
fn test_everyday_html_is_split() {
    let filler = format!("<p>{}</p>", "lorem ipsum dolor ".repeat(3));
    let snippets = [
        "<p>Caf&eacute; cr&egrave;me &amp; cake</p>",
        "<p>Salt & pepper</p>",
        r#"<iframe src="https://video.example/embed/42" allowfullscreen></iframe>"#,
        "<ul><li>one<li>two<li>three</ul>",
        "<p class=intro>Intro</p>",
    ];

    for snippet in snippets {
        let html = format!("{filler}{snippet}{filler}");
        let output = Chunker::with_max_chars(120).unwrap().chunk(&html).unwrap();

        assert!(output.len() > 1, "not split: {snippet}");
        assert!(output.diagnostics.is_empty(), "{snippet}: {:?}", output.diagnostics);
        let joined: String = output.fragments.iter().map(|f| text_of(f.html())).collect();
        assert_eq!(joined, text_of(&html));
        for fragment in &output.fragments {
            assert!(fragment.len() <= 120);
            assert_reparses(fragment.html());
        }
    }
}

#[test]
fn test_boolean_attribute_kept() {
    let html = format!(
        r#"<p>{}</p><iframe src="/embed/42" allowfullscreen></iframe>"#,
        "a".repeat(100)
    );
    let parts = split(&html, 120);

    assert_eq!(
        parts.last().map(String::as_str),
        Some(r#"<iframe src="/embed/42" allowfullscreen=""></iframe>"#)
    );
}

#[test]
fn test_attribute_with_angle_bracket_reparses() {
    let html = format!(
        r#"<p>{}</p><img alt="a &gt; b" src="x.png"><p>{}</p>"#,
        "a".repeat(50),
        "b".repeat(50)
    );
    let parts = split(&html, 80);

    assert_eq!(parts.len(), 3);
    assert_eq!(parts[1], r#"<img alt="a &gt; b" src="x.png">"#);
    for part in &parts {
        assert_reparses(part);
    }
    let img = parse_fragment(&parts[1]).unwrap();
    assert_eq!(img[0].as_element().unwrap().attribute("alt"), Some("a > b"));
}

#[test]
fn test_stylesheet_written_verbatim() {
    let html = format!("<style>ul > li {{ color: red }}</style><p>{}</p>", "a".repeat(80));
    let parts = split(&html, 60);

    assert_eq!(parts[0], "<style>ul > li { color: red }</style>");
    assert!(parts.iter().all(|p| !p.contains("&gt;")));
}

#[test]
fn test_comments_survive_splitting() {
    let html = format!(
        "<p>{}</p><!-- product grid --><p>{}</p>",
        "a".repeat(60),
        "b".repeat(60)
    );
    let parts = split(&html, 90);

    assert_eq!(parts.concat(), html);
}

#[test]
fn test_text_content_preserved() {
    let html = sample_article();
    for budget in [150, 400, 2500] {
        let joined: String = split(&html, budget).iter().map(|p| text_of(p)).collect();
        assert_eq!(joined, text_of(&html), "budget {budget}");
    }
}

#[test]
fn test_identifiers_unique_across_fragments() {
    let html = sample_article();
    let parts = split(&html, 300);

    let mut seen: HashMap<String, usize> = HashMap::new();
    for part in &parts {
        let mut ids = Vec::new();
        for node in parse_fragment(part).unwrap() {
            collect_ids(&node, &mut ids);
        }
        for id in ids {
            *seen.entry(id).or_default() += 1;
        }
    }

    assert!(seen.contains_key("id=title"));
    assert!(seen.contains_key("data-section-id=section-2"));
    for (id, count) in seen {
        assert_eq!(count, 1, "{id} appears {count} times");
    }
}

#[test]
fn test_non_identifier_attributes_kept_on_every_wrapper() {
    let html = sample_article();
    let parts = split(&html, 300);

    let section_wrappers: Vec<_> = parts
        .iter()
        .filter(|p| p.starts_with("<div"))
        .collect();
    assert!(section_wrappers.len() > 4);
    assert!(section_wrappers
        .iter()
        .all(|p| p.starts_with(r#"<div class="rte-section""#)));
}

#[test]
fn test_order_preserved() {
    let html = sample_article();
    let joined: String = split(&html, 250).iter().map(|p| text_of(p)).collect();

    let positions: Vec<usize> = (1..=4)
        .map(|n| joined.find(&format!("Part {n}")).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_budget_at_least_input_returns_input() {
    let html = sample_article();
    let len = html.chars().count();

    assert_eq!(split(&html, len), vec![html.clone()]);
    assert_eq!(split(&html, len * 2), vec![html]);
}

#[test]
fn test_short_input_is_byte_identical() {
    let html = "<P CLASS=odd>Not even   well-formed<br>";
    assert_eq!(split(html, 1000), vec![html.to_string()]);
}

#[test]
fn test_wrapped_paragraph_scenario() {
    let text = "A".repeat(120);
    let html = format!(r#"<div id="x"><p>{text}</p></div>"#);
    let output = Chunker::with_max_chars(100).unwrap().chunk(&html).unwrap();

    assert_eq!(output.len(), 2);
    let first = output.fragments[0].html();
    let second = output.fragments[1].html();
    assert!(first.starts_with(r#"<div id="x"><p>"#));
    assert!(second.starts_with("<div><p>"));
    assert!(output.fragments.iter().all(|f| f.len() <= 100));
    assert_eq!(format!("{}{}", text_of(first), text_of(second)), text);
}

#[test]
fn test_word_boundary_preference() {
    // 100 chars with a space at index 60: budget 80 cuts after it
    let text = format!("{} {}", "a".repeat(60), "b".repeat(39));
    let parts = split(&text, 80);
    assert_eq!(parts, vec![format!("{} ", "a".repeat(60)), "b".repeat(39)]);

    // Only a space at index 40 (below 56): hard cut at exactly 80
    let text = format!("{} {}", "a".repeat(40), "b".repeat(59));
    let output = Chunker::with_max_chars(80).unwrap().chunk(&text).unwrap();
    assert_eq!(output.fragments[0].len(), 80);
    assert_eq!(output.diagnostics_of(DiagnosticKind::HardTextSplit).count(), 1);
}

#[test]
fn test_unparsable_input_returned_with_warning() {
    let html = format!("<p>{}</p><", "word ".repeat(30));
    let output = Chunker::with_max_chars(50).unwrap().chunk(&html).unwrap();

    assert_eq!(output.len(), 1);
    assert_eq!(output.fragments[0].html(), html);
    assert_eq!(output.diagnostics_of(DiagnosticKind::ParseFailure).count(), 1);
}

#[test]
fn test_oversized_image_flagged() {
    let data_uri = format!("data:image/png;base64,{}", "A".repeat(600));
    let html = format!(
        r#"<p>Intro text.</p><figure><img src="{data_uri}"><figcaption>Caption</figcaption></figure>"#
    );
    let output = Chunker::with_max_chars(200).unwrap().chunk(&html).unwrap();

    let oversized: Vec<_> = output.fragments.iter().filter(|f| f.len() > 200).collect();
    assert_eq!(oversized.len(), 1);
    assert!(oversized[0].html().contains("<img"));
    assert!(oversized[0].html().starts_with("<figure>"));
    assert_eq!(
        output.diagnostics_of(DiagnosticKind::OversizedElement).count(),
        1
    );
    assert!(output
        .fragments
        .iter()
        .any(|f| f.html() == "<figure><figcaption>Caption</figcaption></figure>"));
}

#[test]
fn test_custom_identifier_attributes() {
    let config = ChunkerConfig::new(70)
        .unwrap()
        .with_identifier_attributes(["name"])
        .with_policy(OversizePolicy::PassThrough);
    let html = format!(
        r#"<div name="anchor" id="kept"><p>{}</p><p>{}</p></div>"#,
        "a".repeat(20),
        "b".repeat(20)
    );
    let parts = Chunker::new(config).chunk(&html).unwrap().into_strings();

    assert_eq!(parts.len(), 2);
    assert!(parts[0].contains(r#"name="anchor""#));
    assert!(!parts[1].contains("name="));
    assert!(parts[1].contains(r#"id="kept""#));
}

#[test]
fn test_chunker_shared_across_threads() {
    let chunker = Chunker::with_max_chars(300).unwrap();
    let html = sample_article();
    let expected = chunker.chunk(&html).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| chunker.chunk(&html).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
