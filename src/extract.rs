//! Derives structured word-of-the-day entries from the fetched page.
//!
//! The extractor is deliberately coupled to dictionary.com's markup: every
//! lookup targets a fixed class name observed on the live page, and any
//! missing piece fails the whole run with [`Error::Structure`] rather than
//! emitting a partial entry. There is no tolerance for drift; when the site
//! changes, this module is the thing that breaks.

use std::collections::BTreeMap;

use scraper::{ElementRef, Html, Node, Selector};
use serde::Serialize;

use crate::{Error, Result};
use log::debug;

/// One word-of-the-day record. All six fields are populated or the entry
/// does not exist.
#[derive(Debug, Clone, Serialize)]
pub struct Entry {
    /// The headword.
    pub word: String,
    /// Pseudo-phonetic string; inline styling spans are reclassified into
    /// `<em>`/`<i>` and plain text is compacted (no spaces).
    pub pronunciation: String,
    pub part_of_speech: String,
    pub definition: String,
    /// Raw `<ul>` fragment with etymology/usage notes, newlines stripped.
    pub about: String,
    /// Raw `<ul>` fragment with example sentences, newlines stripped.
    pub examples: String,
}

/// Ordered mapping from a 1-based sequence index to an [`Entry`], in document
/// order of the source page. Built by [`Extractor::extract`], consumed
/// read-only by the renderer.
#[derive(Debug, Default, Serialize)]
pub struct EntryCollection(BTreeMap<u32, Entry>);

impl EntryCollection {
    /// Append an entry under the next sequence index. Indices stay contiguous
    /// starting at 1.
    fn push(&mut self, entry: Entry) {
        let idx = self.0.len() as u32 + 1;
        self.0.insert(idx, entry);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, idx: u32) -> Option<&Entry> {
        self.0.get(&idx)
    }

    /// Entries in sequence order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.0.values()
    }

    /// `(index, entry)` pairs in sequence order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Entry)> {
        self.0.iter().map(|(i, e)| (*i, e))
    }
}

/// Parses the fetched page into an [`EntryCollection`].
pub struct Extractor {
    wrapper_sel: Selector,
    word_sel: Selector,
    pronunciation_sel: Selector,
    pos_sel: Selector,
    origin_sel: Selector,
    list_sel: Selector,
}

impl Extractor {
    pub fn new() -> Self {
        // Fixed selectors for one site; these cannot fail to parse.
        Self {
            wrapper_sel: Selector::parse("div.otd-item-wrapper-content").unwrap(),
            word_sel: Selector::parse("div.wotd-item div.otd-item-headword__word h1").unwrap(),
            pronunciation_sel: Selector::parse("span.otd-item-headword__pronunciation__text")
                .unwrap(),
            pos_sel: Selector::parse("div.otd-item-headword__pos").unwrap(),
            origin_sel: Selector::parse("div.wotd-item-origin").unwrap(),
            list_sel: Selector::parse("ul").unwrap(),
        }
    }

    /// Walk the entry wrappers in document order and build the collection.
    ///
    /// Two passes over the same wrapper list: the headword block (word,
    /// pronunciation, part of speech, definition) and the origin block
    /// (about, examples) sit under different parent nodes within a wrapper.
    pub fn extract(&self, html: &str) -> Result<EntryCollection> {
        let document = Html::parse_document(html);
        let wrappers: Vec<ElementRef> = document.select(&self.wrapper_sel).collect();
        debug!("found {} entry wrappers", wrappers.len());

        // First pass: the headword block.
        let mut headwords = Vec::with_capacity(wrappers.len());
        for (i, el) in wrappers.iter().enumerate() {
            let idx = i as u32 + 1;
            headwords.push(self.headword_fields(*el, idx)?);
        }

        // Second pass: the origin block.
        let mut origins = Vec::with_capacity(wrappers.len());
        for (i, el) in wrappers.iter().enumerate() {
            let idx = i as u32 + 1;
            origins.push(self.origin_fields(*el, idx)?);
        }

        let mut collection = EntryCollection::default();
        for ((word, pronunciation, part_of_speech, definition), (about, examples)) in
            headwords.into_iter().zip(origins)
        {
            collection.push(Entry {
                word,
                pronunciation,
                part_of_speech,
                definition,
                about,
                examples,
            });
        }

        Ok(collection)
    }

    /// Word, pronunciation, part of speech and definition for one wrapper.
    fn headword_fields(
        &self,
        el: ElementRef,
        idx: u32,
    ) -> Result<(String, String, String, String)> {
        let word = el
            .select(&self.word_sel)
            .next()
            .ok_or_else(|| Error::Structure(format!("entry {}: missing headword", idx)))?
            .text()
            .collect::<String>()
            .trim()
            .to_string();

        let pronunciation_el = el.select(&self.pronunciation_sel).next().ok_or_else(|| {
            Error::Structure(format!("entry {}: missing pronunciation block", idx))
        })?;
        let pronunciation = pronunciation_markup(pronunciation_el);

        let pos_wrapper = el
            .select(&self.pos_sel)
            .next()
            .ok_or_else(|| Error::Structure(format!("entry {}: missing part-of-speech block", idx)))?;

        // The block holds exactly two child elements: the part of speech and
        // the definition, separated by whitespace text nodes.
        let pos_children: Vec<ElementRef> = pos_wrapper
            .children()
            .filter_map(ElementRef::wrap)
            .collect();

        let part_of_speech = pos_children
            .first()
            .ok_or_else(|| Error::Structure(format!("entry {}: missing part of speech", idx)))?
            .text()
            .collect::<String>()
            .trim()
            .to_string();

        let definition = pos_children
            .get(1)
            .ok_or_else(|| Error::Structure(format!("entry {}: missing definition", idx)))?
            .text()
            .collect::<String>()
            .trim()
            .to_string();

        Ok((word, pronunciation, part_of_speech, definition))
    }

    /// About and examples fragments for one wrapper: the first and second
    /// `<ul>` under the origin block, kept as raw markup with newlines
    /// stripped so they can be embedded verbatim in the rendered page.
    fn origin_fields(&self, el: ElementRef, idx: u32) -> Result<(String, String)> {
        let origin = el
            .select(&self.origin_sel)
            .next()
            .ok_or_else(|| Error::Structure(format!("entry {}: missing origin block", idx)))?;

        let lists: Vec<ElementRef> = origin.select(&self.list_sel).collect();

        let about = lists
            .first()
            .ok_or_else(|| Error::Structure(format!("entry {}: missing about list", idx)))?
            .html()
            .replace('\n', "");

        let examples = lists
            .get(1)
            .ok_or_else(|| Error::Structure(format!("entry {}: missing examples list", idx)))?
            .html()
            .replace('\n', "");

        Ok((about, examples))
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Flatten the pronunciation sub-tree into a compact markup string.
///
/// The source styles syllable stress with presentational span classes. Spans
/// whose class denotes bold become `<em>`, italic become `<i>`, with the
/// class dropped. Plain text is trimmed and has its inner spaces removed so
/// the pronunciation renders compact. Children are visited in document order;
/// whitespace-only children are skipped.
fn pronunciation_markup(el: ElementRef) -> String {
    let mut out = String::new();
    for child in el.children() {
        match child.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    out.push_str(&trimmed.replace(' ', ""));
                }
            }
            Node::Element(element) => {
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                let inner: String = child_el.text().collect();
                if inner.trim().is_empty() {
                    continue;
                }
                if element.name() == "span" {
                    let bold = element.classes().any(|c| c.contains("bold"));
                    let italic = element.classes().any(|c| c.contains("italic"));
                    if bold {
                        out.push_str("<em>");
                        out.push_str(&child_el.inner_html());
                        out.push_str("</em>");
                    } else if italic {
                        out.push_str("<i>");
                        out.push_str(&child_el.inner_html());
                        out.push_str("</i>");
                    } else {
                        // Neutral span: keep it as-is.
                        out.push_str(&child_el.html());
                    }
                } else {
                    out.push_str(&inner.trim().replace(' ', ""));
                }
            }
            _ => {}
        }
    }
    out
}
