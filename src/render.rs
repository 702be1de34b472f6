//! Binds the extracted entries to the page template.
//!
//! The template is compiled in via `maud`, sized for the 400x300 panel. Word,
//! pronunciation, part of speech and definition are escaped text; the about
//! and examples fragments are raw markup produced by the extractor and are
//! spliced in unescaped.

use std::fs;
use std::path::Path;

use maud::{html, PreEscaped, DOCTYPE};

use crate::extract::EntryCollection;
use crate::{Error, Result};

/// Inline stylesheet tuned for a 400x300 viewport.
const STYLESHEET: &str = r#"
body { margin: 0; padding: 8px 12px; width: 400px; font-family: Georgia, serif; background: #fff; color: #000; }
h1 { margin: 0; font-size: 34px; }
.pronunciation { margin: 2px 0 6px; font-size: 16px; color: #c00; }
.pos { margin: 0 0 8px; font-size: 15px; }
.part-of-speech { font-style: italic; }
.origin { font-size: 12px; }
.origin h2 { margin: 4px 0 2px; font-size: 13px; }
.origin ul { margin: 0; padding-left: 16px; }
"#;

/// Render the complete HTML document for the panel.
///
/// An empty collection still yields a valid, content-less page.
pub fn render_page(entries: &EntryCollection) -> String {
    let markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { "Word of the Day" }
                style { (PreEscaped(STYLESHEET)) }
            }
            body {
                @for entry in entries.entries() {
                    article.entry {
                        header {
                            h1 { (entry.word) }
                            p.pronunciation { (entry.pronunciation) }
                            p.pos {
                                span.part-of-speech { (entry.part_of_speech) }
                                " "
                                span.definition { (entry.definition) }
                            }
                        }
                        section.origin {
                            h2 { "About" }
                            (PreEscaped(&entry.about))
                            h2 { "Examples" }
                            (PreEscaped(&entry.examples))
                        }
                    }
                }
            }
        }
    };
    markup.into_string()
}

/// Persist the rendered document, overwriting any previous run's artifact.
/// Kept around for inspection and used by the rasterizer as its input.
pub fn write_page(path: &Path, page: &str) -> Result<()> {
    fs::write(path, page)
        .map_err(|e| Error::Render(format!("Failed to write {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Extractor;

    fn collection_of(n: usize) -> EntryCollection {
        let wrappers: String = (0..n)
            .map(|i| {
                format!(
                    r#"<div class="otd-item-wrapper-content">
  <div class="wotd-item"><div class="otd-item-headword__word"><h1>word{i}</h1></div></div>
  <span class="otd-item-headword__pronunciation__text">wurd <span class="luna-bold">{i}</span></span>
  <div class="otd-item-headword__pos"><span>noun</span><span>definition &amp; meaning {i}</span></div>
  <div class="wotd-item-origin">
    <ul><li>about {i}</li></ul>
    <ul><li>example {i}</li></ul>
  </div>
</div>"#
                )
            })
            .collect();
        Extractor::new()
            .extract(&format!("<html><body>{}</body></html>", wrappers))
            .expect("fixture extraction failed")
    }

    #[test]
    fn both_entries_appear_in_document_order() {
        let page = render_page(&collection_of(2));
        let first = page.find("word0").expect("first word missing");
        let second = page.find("word1").expect("second word missing");
        assert!(first < second);
    }

    #[test]
    fn about_and_examples_are_raw_while_text_fields_are_escaped() {
        let page = render_page(&collection_of(1));

        // Raw fragments keep their list markup.
        assert!(page.contains("<ul><li>about 0</li></ul>"));
        assert!(page.contains("<ul><li>example 0</li></ul>"));

        // The definition's ampersand comes back escaped.
        assert!(page.contains("definition &amp; meaning 0"));

        // The pronunciation markup is escaped text, not live tags.
        assert!(page.contains("wurd&lt;em&gt;0&lt;/em&gt;"));
    }

    #[test]
    fn empty_collection_renders_a_valid_page() {
        let page = render_page(&EntryCollection::default());
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Word of the Day</title>"));
        assert!(page.contains("</html>"));
        assert!(!page.contains("<article"));
    }

    #[test]
    fn write_page_overwrites_previous_artifact() {
        let path = std::env::temp_dir().join(format!("wotd-render-{}.html", std::process::id()));
        write_page(&path, "first run").unwrap();
        write_page(&path, "second run").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second run");
        let _ = std::fs::remove_file(&path);
    }
}
