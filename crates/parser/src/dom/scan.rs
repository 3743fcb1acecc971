// ABOUTME: A single-pass tag scanner over raw HTML text.
// ABOUTME: Yields open/close tags with byte ranges, skipping comments and rawtext content.

//! Tag scanning over raw markup.
//!
//! The scanner walks the input once and yields every tag with its byte
//! range and raw attribute text. Comments, doctypes, and processing
//! instructions are skipped; the content of rawtext elements (`script`,
//! `style`, and friends) is opaque, so markup-looking text inside them
//! never produces a tag.

/// One scanned tag. `start..end` spans `<` through `>` in the input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Tag<'a> {
    pub name: &'a str,
    /// Raw text between the tag name and `>`, including any trailing `/`.
    pub attrs: &'a str,
    pub start: usize,
    pub end: usize,
    pub closing: bool,
    pub self_closing: bool,
}

/// Elements that never have content or a close tag.
const VOID_TAGS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is opaque text until the matching close tag.
const RAWTEXT_TAGS: [&str; 5] = ["script", "style", "noscript", "textarea", "title"];

pub(crate) fn is_void_tag(name: &str) -> bool {
    VOID_TAGS.iter().any(|t| t.eq_ignore_ascii_case(name))
}

fn is_rawtext_tag(name: &str) -> bool {
    RAWTEXT_TAGS.iter().any(|t| t.eq_ignore_ascii_case(name))
}

pub(crate) struct TagScanner<'a> {
    html: &'a str,
    pos: usize,
    /// Name of an open rawtext element whose close tag we are seeking.
    rawtext: Option<&'a str>,
}

impl<'a> TagScanner<'a> {
    pub(crate) fn new(html: &'a str) -> Self {
        TagScanner {
            html,
            pos: 0,
            rawtext: None,
        }
    }

    fn rawtext_close(&mut self, name: &'a str) -> Option<Tag<'a>> {
        let start = find_close_tag(self.html, self.pos, name)?;
        let name_end = start + 2 + name.len();
        let gt = self.html[name_end..].find('>').map(|i| name_end + i)?;
        self.pos = gt + 1;
        Some(Tag {
            name: &self.html[start + 2..name_end],
            attrs: &self.html[name_end..gt],
            start,
            end: gt + 1,
            closing: true,
            self_closing: false,
        })
    }
}

impl<'a> Iterator for TagScanner<'a> {
    type Item = Tag<'a>;

    fn next(&mut self) -> Option<Tag<'a>> {
        if let Some(name) = self.rawtext.take() {
            match self.rawtext_close(name) {
                Some(tag) => return Some(tag),
                None => {
                    self.pos = self.html.len();
                    return None;
                }
            }
        }
        loop {
            let start = self.pos + self.html[self.pos..].find('<')?;
            let rest = &self.html[start..];
            if rest.starts_with("<!--") {
                let end = rest.find("-->")?;
                self.pos = start + end + 3;
                continue;
            }
            if rest.starts_with("<!") || rest.starts_with("<?") {
                let end = rest.find('>')?;
                self.pos = start + end + 1;
                continue;
            }
            let closing = rest.starts_with("</");
            let name_start = start + if closing { 2 } else { 1 };
            let name_len = tag_name_len(&self.html[name_start..]);
            if name_len == 0 {
                self.pos = start + 1;
                continue;
            }
            let name = &self.html[name_start..name_start + name_len];
            let gt = find_tag_end(self.html, name_start + name_len)?;
            let attrs = &self.html[name_start + name_len..gt];
            let self_closing = !closing && attrs.trim_end().ends_with('/');
            self.pos = gt + 1;
            if !closing && !self_closing && is_rawtext_tag(name) {
                self.rawtext = Some(name);
            }
            return Some(Tag {
                name,
                attrs,
                start,
                end: gt + 1,
                closing,
                self_closing,
            });
        }
    }
}

/// Length of the tag name at the start of `s`, or 0 if none begins there.
fn tag_name_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    if bytes.first().map_or(true, |b| !b.is_ascii_alphabetic()) {
        return 0;
    }
    bytes
        .iter()
        .position(|b| !(b.is_ascii_alphanumeric() || *b == b'-' || *b == b':'))
        .unwrap_or(bytes.len())
}

/// Find the `>` ending the tag, treating `>` inside quoted attribute
/// values as content.
fn find_tag_end(html: &str, from: usize) -> Option<usize> {
    let bytes = html.as_bytes();
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'>' => return Some(i),
            quote @ (b'"' | b'\'') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    i += 1;
                }
                if i >= bytes.len() {
                    return None;
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    None
}

/// Case-insensitive search for `</name` followed by a tag-name boundary.
fn find_close_tag(html: &str, from: usize, name: &str) -> Option<usize> {
    let bytes = html.as_bytes();
    let want = name.as_bytes();
    for (rel, _) in html[from..].match_indices("</") {
        let at = from + rel;
        let name_end = at + 2 + want.len();
        if name_end > bytes.len() {
            return None;
        }
        if !bytes[at + 2..name_end].eq_ignore_ascii_case(want) {
            continue;
        }
        match bytes.get(name_end) {
            None | Some(b'>') | Some(b'/') => return Some(at),
            Some(b) if b.is_ascii_whitespace() => return Some(at),
            _ => continue,
        }
    }
    None
}

/// Iterate `(name, value)` attribute pairs in a tag's raw attribute text.
///
/// Handles double-quoted, single-quoted, unquoted, and bare (valueless)
/// attributes; bare attributes yield an empty value. Stray `/` characters
/// between attributes are skipped.
pub(crate) struct AttrIter<'a> {
    rest: &'a str,
}

impl<'a> AttrIter<'a> {
    pub(crate) fn new(attrs: &'a str) -> Self {
        AttrIter { rest: attrs }
    }
}

impl<'a> Iterator for AttrIter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<(&'a str, &'a str)> {
        loop {
            let s = self
                .rest
                .trim_start_matches(|c: char| c.is_ascii_whitespace() || c == '/');
            if s.is_empty() {
                self.rest = s;
                return None;
            }
            let name_end = s
                .find(|c: char| c.is_ascii_whitespace() || c == '=' || c == '/')
                .unwrap_or(s.len());
            if name_end == 0 {
                // stray '=' with no preceding name
                self.rest = &s[1..];
                continue;
            }
            let name = &s[..name_end];
            let rest = &s[name_end..];
            let value_part = match rest.trim_start().strip_prefix('=') {
                Some(v) => v.trim_start(),
                None => {
                    self.rest = rest;
                    return Some((name, ""));
                }
            };
            for quote in ['"', '\''] {
                if let Some(inner) = value_part.strip_prefix(quote) {
                    return Some(match inner.find(quote) {
                        Some(end) => {
                            self.rest = &inner[end + 1..];
                            (name, &inner[..end])
                        }
                        None => {
                            self.rest = "";
                            (name, inner)
                        }
                    });
                }
            }
            let end = value_part
                .find(|c: char| c.is_ascii_whitespace())
                .unwrap_or(value_part.len());
            self.rest = &value_part[end..];
            return Some((name, &value_part[..end]));
        }
    }
}
