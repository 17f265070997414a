//! Fragment extraction from a parsed DOM tree.
//!
//! The extractor walks every descendant element of the traversal root in
//! document order and emits a [`Fragment`] for each element that carries
//! meaningful text: at least [`MIN_FRAGMENT_TOKENS`] whitespace-separated
//! words after normalization.
//!
//! Elements whose tag is in [`TAG_BLACKLIST`] are skipped but their subtrees
//! are not pruned: a qualifying `<p>` inside a blacklisted `<header>` is
//! still visited and still emitted. Subtree pruning happens once, earlier,
//! in [`prune_noise`] — a coarser pre-pass over the whole document that
//! removes script/style/header/footer/nav subtrees so their text never
//! bleeds into ancestors' extracted text.
//!
//! The traversal operates on the [`DomElement`] capability trait rather than
//! on `scraper` types directly, so the filtering policy is testable against
//! synthetic trees without an HTML parser.

use scraper::{ElementRef, Html};

use crate::models::Fragment;

/// Minimum whitespace-token count for a fragment; anything shorter is noise.
pub const MIN_FRAGMENT_TOKENS: usize = 5;

/// Tags whose own text is never extracted (children are still visited).
pub const TAG_BLACKLIST: [&str; 10] = [
    "script", "style", "noscript", "header", "footer", "nav", "svg", "meta", "link", "iframe",
];

/// Tags whose entire subtree is removed before extraction.
pub const PRUNE_TAGS: [&str; 5] = ["script", "style", "header", "footer", "nav"];

/// Minimal read-only view of a DOM element.
///
/// The extractor needs nothing beyond these four capabilities; production
/// code uses the [`ScrapedElement`] adapter, tests use synthetic trees.
pub trait DomElement: Sized {
    /// The element name, lowercased by the parser.
    fn tag_name(&self) -> &str;
    /// All descendant text node contents, in document order.
    fn text_pieces(&self) -> Vec<String>;
    /// The element's serialized outer HTML.
    fn outer_html(&self) -> String;
    /// Child elements, in document order.
    fn children(&self) -> Vec<Self>;
}

/// [`DomElement`] adapter over a `scraper` element.
pub struct ScrapedElement<'a>(pub ElementRef<'a>);

impl<'a> DomElement for ScrapedElement<'a> {
    fn tag_name(&self) -> &str {
        self.0.value().name()
    }

    fn text_pieces(&self) -> Vec<String> {
        self.0.text().map(str::to_string).collect()
    }

    fn outer_html(&self) -> String {
        self.0.html()
    }

    fn children(&self) -> Vec<Self> {
        self.0
            .children()
            .filter_map(ElementRef::wrap)
            .map(ScrapedElement)
            .collect()
    }
}

/// Detach every [`PRUNE_TAGS`] subtree from the parsed document.
///
/// Runs once per request before extraction. Unlike the per-element blacklist
/// check this removes the whole subtree, so pruned content is also absent
/// from the text of surviving ancestors.
pub fn prune_noise(doc: &mut Html) {
    let ids: Vec<_> = doc
        .tree
        .nodes()
        .filter(|node| {
            node.value()
                .as_element()
                .is_some_and(|el| PRUNE_TAGS.contains(&el.name()))
        })
        .map(|node| node.id())
        .collect();
    for id in ids {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// Walk every descendant element of `root` (root excluded) in document order
/// and collect the qualifying fragments.
pub fn extract<E: DomElement>(root: &E) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    let mut stack = root.children();
    stack.reverse();

    while let Some(element) = stack.pop() {
        if !TAG_BLACKLIST.contains(&element.tag_name()) {
            let text = normalize_text(&element.text_pieces());
            if token_count(&text) >= MIN_FRAGMENT_TOKENS {
                fragments.push(Fragment {
                    text,
                    markup: element.outer_html(),
                    tag: element.tag_name().to_string(),
                });
            }
        }
        let mut children = element.children();
        children.reverse();
        stack.extend(children);
    }

    fragments
}

/// Join text pieces with single spaces, collapsing all whitespace runs.
fn normalize_text(pieces: &[String]) -> String {
    pieces
        .iter()
        .flat_map(|piece| piece.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

fn token_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Synthetic DOM node for exercising the traversal without a parser.
    #[derive(Clone)]
    struct TestElement {
        tag: String,
        own_text: Vec<String>,
        children: Vec<TestElement>,
    }

    impl TestElement {
        fn new(tag: &str, text: &[&str], children: Vec<TestElement>) -> Self {
            Self {
                tag: tag.to_string(),
                own_text: text.iter().map(|s| s.to_string()).collect(),
                children,
            }
        }

        fn leaf(tag: &str, text: &str) -> Self {
            Self::new(tag, &[text], Vec::new())
        }
    }

    impl DomElement for TestElement {
        fn tag_name(&self) -> &str {
            &self.tag
        }

        fn text_pieces(&self) -> Vec<String> {
            let mut pieces = self.own_text.clone();
            for child in &self.children {
                pieces.extend(child.text_pieces());
            }
            pieces
        }

        fn outer_html(&self) -> String {
            format!("<{}>{}</{}>", self.tag, self.own_text.join(""), self.tag)
        }

        fn children(&self) -> Vec<Self> {
            self.children.clone()
        }
    }

    #[test]
    fn emits_fragment_for_qualifying_element() {
        let body = TestElement::new(
            "body",
            &[],
            vec![TestElement::leaf("p", "one two three four five")],
        );
        let fragments = extract(&body);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].text, "one two three four five");
        assert_eq!(fragments[0].tag, "p");
    }

    #[test]
    fn discards_below_five_token_floor() {
        let body = TestElement::new(
            "body",
            &[],
            vec![
                TestElement::leaf("p", "only four words here"),
                TestElement::leaf("p", ""),
                TestElement::leaf("p", "   \n\t  "),
            ],
        );
        assert!(extract(&body).is_empty());
    }

    #[test]
    fn collapses_whitespace_in_fragment_text() {
        let body = TestElement::new(
            "body",
            &[],
            vec![TestElement::new(
                "p",
                &["  alpha \n beta\t", "gamma  ", " delta epsilon "],
                Vec::new(),
            )],
        );
        let fragments = extract(&body);
        assert_eq!(fragments[0].text, "alpha beta gamma delta epsilon");
    }

    #[test]
    fn skips_blacklisted_tags() {
        let body = TestElement::new(
            "body",
            &[],
            vec![
                TestElement::leaf("script", "var x = compute(1, 2, 3, 4);"),
                TestElement::leaf("nav", "home about products contact careers"),
                TestElement::leaf("p", "real content with enough words here"),
            ],
        );
        let fragments = extract(&body);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].tag, "p");
    }

    #[test]
    fn still_visits_descendants_of_blacklisted_elements() {
        // The blacklist filters per element without pruning: the <p> nested
        // inside the skipped <header> is visited independently and emitted.
        let body = TestElement::new(
            "body",
            &[],
            vec![TestElement::new(
                "header",
                &["site title words one two"],
                vec![TestElement::leaf("p", "nested paragraph with five words")],
            )],
        );
        let fragments = extract(&body);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].text, "nested paragraph with five words");
        assert_eq!(fragments[0].tag, "p");
    }

    #[test]
    fn preserves_document_order() {
        let body = TestElement::new(
            "body",
            &[],
            vec![
                TestElement::new(
                    "div",
                    &[],
                    vec![
                        TestElement::leaf("p", "first paragraph has five words"),
                        TestElement::leaf("p", "second paragraph also has five"),
                    ],
                ),
                TestElement::leaf("p", "third paragraph rounds things out"),
            ],
        );
        let fragments = extract(&body);
        let tags: Vec<&str> = fragments.iter().map(|f| f.tag.as_str()).collect();
        assert_eq!(tags, ["div", "p", "p", "p"]);
        assert!(fragments[0].text.starts_with("first paragraph"));
        assert!(fragments[1].text.starts_with("first paragraph"));
        assert!(fragments[2].text.starts_with("second paragraph"));
        assert!(fragments[3].text.starts_with("third paragraph"));
    }

    #[test]
    fn scraper_adapter_extracts_markup_and_text() {
        let doc = Html::parse_document(
            "<html><body><p id=\"a\">Some six word long test paragraph</p></body></html>",
        );
        let selector = scraper::Selector::parse("body").unwrap();
        let body = doc.select(&selector).next().unwrap();
        let fragments = extract(&ScrapedElement(body));
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].text, "Some six word long test paragraph");
        assert_eq!(
            fragments[0].markup,
            "<p id=\"a\">Some six word long test paragraph</p>"
        );
    }

    #[test]
    fn prune_removes_subtree_text_from_ancestors() {
        let mut doc = Html::parse_document(
            "<html><body><div>kept words stay right here\
             <script>var noise = \"one two three four five\";</script></div></body></html>",
        );
        prune_noise(&mut doc);
        let selector = scraper::Selector::parse("body").unwrap();
        let body = doc.select(&selector).next().unwrap();
        let fragments = extract(&ScrapedElement(body));
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].text, "kept words stay right here");
        assert!(!fragments[0].markup.contains("script"));
    }
}
