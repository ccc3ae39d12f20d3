use std::io::BufRead;

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

/// Structural events surfaced by [`ConfigScanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanEvent {
    StartTag,
    EndTag,
    Text,
    EndOfDocument,
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("malformed markup at byte {position}: {source}")]
    Xml {
        position: u64,
        source: quick_xml::Error,
    },

    #[error("unexpected end of document inside <{0}>")]
    UnexpectedEof(String),

    #[error("unexpected element <{found}> inside text of <{parent}>")]
    UnexpectedTag { parent: String, found: String },
}

pub type ScanResult<T> = Result<T, ScanError>;

/// Pull-based scanner over a settings-style markup document.
///
/// Names are taken verbatim (no namespace processing). Empty elements are
/// reported as a start tag immediately followed by its end tag.
pub struct ConfigScanner<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    event: ScanEvent,
    name: String,
    text: String,
}

impl<R: BufRead> ConfigScanner<R> {
    pub fn new(source: R) -> Self {
        let mut reader = Reader::from_reader(source);
        let config = reader.config_mut();
        config.expand_empty_elements = true;
        config.trim_text(true);
        config.check_end_names = true;

        Self {
            reader,
            buf: Vec::new(),
            event: ScanEvent::EndOfDocument,
            name: String::new(),
            text: String::new(),
        }
    }

    /// Advance to the next structural event.
    pub fn next(&mut self) -> ScanResult<ScanEvent> {
        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(event) => event,
                Err(source) => {
                    return Err(ScanError::Xml {
                        position: self.reader.buffer_position() as u64,
                        source,
                    })
                }
            };

            let next = match event {
                Event::Start(start) => {
                    self.name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                    ScanEvent::StartTag
                }
                Event::End(end) => {
                    self.name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                    ScanEvent::EndTag
                }
                Event::Text(text) => {
                    let unescaped = text.unescape().map_err(|source| ScanError::Xml {
                        position: self.reader.buffer_position() as u64,
                        source,
                    })?;
                    self.text = unescaped.into_owned();
                    ScanEvent::Text
                }
                Event::CData(data) => {
                    self.text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    ScanEvent::Text
                }
                Event::Eof => ScanEvent::EndOfDocument,
                // Declarations, comments, processing instructions, doctypes.
                _ => continue,
            };

            self.event = next;
            return Ok(next);
        }
    }

    /// Advance to the next start or end tag inside `container`, ignoring
    /// stray text. Running out of document here means `container` was never
    /// closed.
    pub fn next_tag(&mut self, container: &str) -> ScanResult<ScanEvent> {
        loop {
            match self.next()? {
                ScanEvent::Text => continue,
                ScanEvent::EndOfDocument => {
                    return Err(ScanError::UnexpectedEof(container.to_string()))
                }
                tag => return Ok(tag),
            }
        }
    }

    /// The event the scanner is currently positioned on.
    pub fn event(&self) -> ScanEvent {
        self.event
    }

    /// Name of the most recent start or end tag.
    pub fn current_tag_name(&self) -> &str {
        &self.name
    }

    /// Read the text content of the current element, consuming through its
    /// end tag. Must be positioned on a start tag.
    pub fn read_text(&mut self) -> ScanResult<String> {
        let element = self.name.clone();
        let mut content = String::new();
        loop {
            match self.next()? {
                ScanEvent::Text => content.push_str(&self.text),
                ScanEvent::EndTag => return Ok(content),
                ScanEvent::StartTag => {
                    return Err(ScanError::UnexpectedTag {
                        parent: element,
                        found: self.name.clone(),
                    })
                }
                ScanEvent::EndOfDocument => return Err(ScanError::UnexpectedEof(element)),
            }
        }
    }

    /// Consume the current element and everything nested in it.
    ///
    /// # Panics
    /// When the scanner is not positioned on a start tag.
    pub fn skip_subtree(&mut self) -> ScanResult<()> {
        assert_eq!(
            self.event,
            ScanEvent::StartTag,
            "skip_subtree called while not positioned on a start tag"
        );

        let element = self.name.clone();
        let mut depth = 1usize;
        while depth != 0 {
            match self.next()? {
                ScanEvent::StartTag => depth += 1,
                ScanEvent::EndTag => depth -= 1,
                ScanEvent::Text => {}
                ScanEvent::EndOfDocument => return Err(ScanError::UnexpectedEof(element)),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner(xml: &str) -> ConfigScanner<&[u8]> {
        ConfigScanner::new(xml.as_bytes())
    }

    #[test]
    fn walks_start_text_and_end_events() {
        let mut s = scanner("<?xml version=\"1.0\"?><a><!-- c --><b>hi</b></a>");
        assert_eq!(s.next().unwrap(), ScanEvent::StartTag);
        assert_eq!(s.current_tag_name(), "a");
        assert_eq!(s.next().unwrap(), ScanEvent::StartTag);
        assert_eq!(s.current_tag_name(), "b");
        assert_eq!(s.next().unwrap(), ScanEvent::Text);
        assert_eq!(s.next().unwrap(), ScanEvent::EndTag);
        assert_eq!(s.next().unwrap(), ScanEvent::EndTag);
        assert_eq!(s.current_tag_name(), "a");
        assert_eq!(s.next().unwrap(), ScanEvent::EndOfDocument);
    }

    #[test]
    fn names_keep_prefixes() {
        let mut s = scanner("<m:settings xmlns:m=\"urn:x\"/>");
        assert_eq!(s.next().unwrap(), ScanEvent::StartTag);
        assert_eq!(s.current_tag_name(), "m:settings");
    }

    #[test]
    fn read_text_trims_and_unescapes() {
        let mut s = scanner("<url>\n   http://a/?x=1&amp;y=2  \n</url><next/>");
        s.next().unwrap();
        assert_eq!(s.read_text().unwrap(), "http://a/?x=1&y=2");
        assert_eq!(s.event(), ScanEvent::EndTag);
        assert_eq!(s.next().unwrap(), ScanEvent::StartTag);
        assert_eq!(s.current_tag_name(), "next");
    }

    #[test]
    fn read_text_of_empty_element() {
        let mut s = scanner("<id/>");
        s.next().unwrap();
        assert_eq!(s.read_text().unwrap(), "");
    }

    #[test]
    fn read_text_rejects_nested_elements() {
        let mut s = scanner("<id>a<b/></id>");
        s.next().unwrap();
        assert!(matches!(
            s.read_text(),
            Err(ScanError::UnexpectedTag { parent, found }) if parent == "id" && found == "b"
        ));
    }

    #[test]
    fn skip_subtree_consumes_nested_children() {
        let mut s = scanner("<root><skip><x><y>t</y></x><z/></skip><keep/></root>");
        s.next().unwrap();
        s.next().unwrap();
        assert_eq!(s.current_tag_name(), "skip");
        s.skip_subtree().unwrap();
        assert_eq!(s.event(), ScanEvent::EndTag);
        assert_eq!(s.current_tag_name(), "skip");
        assert_eq!(s.next_tag("root").unwrap(), ScanEvent::StartTag);
        assert_eq!(s.current_tag_name(), "keep");
    }

    #[test]
    #[should_panic(expected = "not positioned on a start tag")]
    fn skip_subtree_off_start_tag_panics() {
        let mut s = scanner("<a></a>");
        s.next().unwrap();
        s.next().unwrap();
        let _ = s.skip_subtree();
    }

    #[test]
    fn mismatched_end_tag_is_an_error() {
        let mut s = scanner("<a><b></a>");
        let result = (0..4).try_for_each(|_| s.next().map(|_| ()));
        assert!(matches!(result, Err(ScanError::Xml { .. })));
    }

    #[test]
    fn truncated_container_is_an_error() {
        let mut s = scanner("<a><b/>");
        s.next().unwrap();
        assert_eq!(s.next_tag("a").unwrap(), ScanEvent::StartTag);
        assert_eq!(s.next_tag("a").unwrap(), ScanEvent::EndTag);
        assert_eq!(s.current_tag_name(), "b");

        // The error names the unclosed container, not the sibling just closed.
        match s.next_tag("a") {
            Err(ScanError::UnexpectedEof(container)) => assert_eq!(container, "a"),
            Err(ScanError::Xml { .. }) => {}
            other => panic!("expected an end-of-document error, got {other:?}"),
        }
    }
}
