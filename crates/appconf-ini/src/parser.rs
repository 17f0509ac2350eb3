// SPDX-FileCopyrightText: 2026 Appconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Line-oriented parser for the configobj dialect.

use tracing::debug;

use crate::document::{Document, DuplicateKey, Entry, Section};
use crate::error::{ParseError, ParseErrorKind};
use crate::value::RawValue;

pub(crate) fn parse(name: &str, src: &str) -> Result<Document, ParseError> {
    Parser::new(name, src).run()
}

#[derive(Clone, Copy)]
struct Line<'a> {
    /// Byte offset of the first character of the line.
    offset: usize,
    text: &'a str,
}

struct Parser<'a> {
    name: &'a str,
    src: &'a str,
    lines: Vec<Line<'a>>,
    pos: usize,
    doc: Document,
    /// Child indices from the root down to the current section.
    path: Vec<usize>,
    pending: Vec<String>,
}

enum Tail<'a> {
    Done(Option<String>),
    /// A triple-quoted value opened but did not close on this line.
    Open { delim: &'static str, first: &'a str },
}

impl<'a> Parser<'a> {
    fn new(name: &'a str, src: &'a str) -> Self {
        let mut lines = Vec::new();
        let mut offset = 0;
        for raw in src.split_inclusive('\n') {
            let text = raw.strip_suffix('\n').unwrap_or(raw);
            let text = text.strip_suffix('\r').unwrap_or(text);
            lines.push(Line { offset, text });
            offset += raw.len();
        }

        let mut doc = Document::new();
        doc.trailing_newline = src.is_empty() || src.ends_with('\n');

        Self {
            name,
            src,
            lines,
            pos: 0,
            doc,
            path: Vec::new(),
            pending: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Document, ParseError> {
        while self.pos < self.lines.len() {
            let line_no = self.pos + 1;
            let Line { offset, text } = self.lines[self.pos];
            self.pos += 1;

            let body = text.trim_start();
            if body.is_empty() || body.starts_with('#') || body.starts_with(';') {
                self.pending.push(text.to_string());
            } else if body.starts_with('[') {
                self.header(line_no, offset, text)?;
            } else {
                self.entry(line_no, offset, text)?;
            }
        }

        self.doc.final_comments = std::mem::take(&mut self.pending);
        debug!(
            source = self.name,
            lines = self.lines.len(),
            duplicates = self.doc.duplicates.len(),
            "parsed document"
        );
        Ok(self.doc)
    }

    fn error(&self, kind: ParseErrorKind, offset: usize) -> ParseError {
        ParseError::new(kind, self.name, self.src, offset)
    }

    fn current(&mut self) -> &mut Section {
        let mut section = &mut self.doc.root;
        for &idx in &self.path {
            section = &mut section.children[idx];
        }
        section
    }

    fn section_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.path.len());
        let mut section = &self.doc.root;
        for &idx in &self.path {
            section = &section.children[idx];
            names.push(section.name.clone());
        }
        names
    }

    fn header(&mut self, line_no: usize, offset: usize, text: &str) -> Result<(), ParseError> {
        let indent_len = text.len() - text.trim_start().len();
        let body = &text[indent_len..];
        let start = offset + indent_len;

        let depth = body.chars().take_while(|c| *c == '[').count();
        let inner = &body[depth..];
        let close_at = inner
            .find(']')
            .ok_or_else(|| self.error(ParseErrorKind::MismatchedBrackets, start + body.len()))?;
        let closing = inner[close_at..].chars().take_while(|c| *c == ']').count();
        if closing != depth {
            return Err(self.error(
                ParseErrorKind::MismatchedBrackets,
                start + depth + close_at,
            ));
        }

        let name = inner[..close_at].trim();
        if name.is_empty() {
            return Err(self.error(ParseErrorKind::EmptySectionName, start + depth));
        }

        let rest = &inner[close_at + closing..];
        let inline_comment = if rest.trim().is_empty() {
            None
        } else if rest.trim_start().starts_with('#') {
            Some(rest.to_string())
        } else {
            let skipped = rest.len() - rest.trim_start().len();
            return Err(self.error(
                ParseErrorKind::TrailingCharacters,
                start + depth + close_at + closing + skipped,
            ));
        };

        let max = self.path.len() + 1;
        if depth > max {
            return Err(self.error(ParseErrorKind::NestingTooDeep { depth, max }, start));
        }

        self.path.truncate(depth - 1);
        let comments = std::mem::take(&mut self.pending);
        let parent = self.current();

        if let Some(idx) = parent.children.iter().position(|c| c.name == name) {
            // A repeated header continues the earlier section; its leading
            // comments move to whatever comes next.
            debug!(section = name, line = line_no, "merging repeated section header");
            self.path.push(idx);
            self.pending = comments;
            return Ok(());
        }

        let mut section = Section::new(name);
        section.depth = depth;
        section.comments = comments;
        section.inline_comment = inline_comment;
        section.indent = text[..indent_len].to_string();
        section.line = line_no;
        section.original = Some(text.to_string());
        parent.children.push(section);
        let idx = parent.children.len() - 1;
        self.path.push(idx);
        Ok(())
    }

    fn entry(&mut self, line_no: usize, offset: usize, text: &'a str) -> Result<(), ParseError> {
        let indent_len = text.len() - text.trim_start().len();
        let body = &text[indent_len..];
        let start = offset + indent_len;

        let (key, after_key) = self.key(body, start)?;
        let value_src = &body[after_key..];
        let value_start = start + after_key;

        let (value, inline_comment, original) = match self.value(value_src, value_start)? {
            (value, Tail::Done(comment)) => (value, comment, text.to_string()),
            (_, Tail::Open { delim, first }) => {
                let (value, comment, original) =
                    self.multiline(text, first, delim, value_start)?;
                (value, comment, original)
            }
        };

        let comments = std::mem::take(&mut self.pending);
        let section_names = self.section_names();
        let earlier_duplicate = self
            .doc
            .duplicates
            .iter()
            .position(|d| d.key == key && d.section == section_names);
        let section = self.current();

        if let Some(existing) = section.entries.iter_mut().find(|e| e.key == key) {
            let first_line = existing.line;
            existing.line = line_no;
            existing.value = value.clone();
            existing.original = None;
            existing.comments.extend(comments);
            if inline_comment.is_some() {
                existing.inline_comment = inline_comment;
            }
            // One record per key: later repeats move its last line and value.
            match earlier_duplicate {
                Some(index) => {
                    let record = &mut self.doc.duplicates[index];
                    debug!(key = %key, line = line_no, first_line = record.first_line, "duplicate key, keeping last value");
                    record.line = line_no;
                    record.value = value;
                }
                None => {
                    debug!(key = %key, line = line_no, first_line, "duplicate key, keeping last value");
                    self.doc.duplicates.push(DuplicateKey {
                        section: section_names,
                        key,
                        first_line,
                        line: line_no,
                        value,
                    });
                }
            }
            return Ok(());
        }

        let mut entry = Entry::new(key, value);
        entry.comments = comments;
        entry.inline_comment = inline_comment;
        entry.indent = text[..indent_len].to_string();
        entry.line = line_no;
        entry.original = Some(original);
        section.entries.push(entry);
        Ok(())
    }

    /// Returns the key and the byte index just past the `=`.
    fn key(&self, body: &str, start: usize) -> Result<(String, usize), ParseError> {
        if let Some(q) = body.chars().next().filter(|c| *c == '"' || *c == '\'') {
            let close = body[1..]
                .find(q)
                .ok_or_else(|| self.error(ParseErrorKind::UnterminatedQuote, start))?;
            let key = body[1..1 + close].to_string();
            let after = 1 + close + 1;
            let rest = &body[after..];
            let skipped = rest.len() - rest.trim_start().len();
            if !rest.trim_start().starts_with('=') {
                return Err(self.error(ParseErrorKind::InvalidLine, start + after + skipped));
            }
            if key.is_empty() {
                return Err(self.error(ParseErrorKind::MissingKey, start));
            }
            return Ok((key, after + skipped + 1));
        }

        let eq = body
            .find('=')
            .ok_or_else(|| self.error(ParseErrorKind::InvalidLine, start))?;
        let key = body[..eq].trim_end();
        if key.is_empty() {
            return Err(self.error(ParseErrorKind::MissingKey, start));
        }
        Ok((key.to_string(), eq + 1))
    }

    fn value(&self, src: &'a str, start: usize) -> Result<(RawValue, Tail<'a>), ParseError> {
        let lead = src.len() - src.trim_start().len();
        let body = &src[lead..];

        for delim in ["\"\"\"", "'''"] {
            if let Some(rest) = body.strip_prefix(delim) {
                return match rest.find(delim) {
                    Some(end) => {
                        let tail_at = lead + delim.len() + end + delim.len();
                        let comment = self.comment_tail(&src[tail_at..], start + tail_at)?;
                        Ok((RawValue::quoted(&rest[..end]), Tail::Done(comment)))
                    }
                    None => Ok((RawValue::quoted(""), Tail::Open { delim, first: rest })),
                };
            }
        }

        self.list_or_scalar(src, start)
    }

    fn list_or_scalar(&self, src: &str, start: usize) -> Result<(RawValue, Tail<'a>), ParseError> {
        let mut items: Vec<(String, bool)> = Vec::new();
        let mut saw_comma = false;
        let mut i = 0;
        // Byte index just past the last value character, where an inline
        // comment (with its leading whitespace) begins.
        let mut value_end = 0;

        loop {
            i += src[i..].len() - src[i..].trim_start().len();
            let Some(c) = src[i..].chars().next() else {
                break;
            };
            if c == '#' {
                break;
            }
            if c == ',' {
                saw_comma = true;
                i += 1;
                value_end = i;
                continue;
            }

            if c == '"' || c == '\'' {
                let close = src[i + 1..]
                    .find(c)
                    .ok_or_else(|| self.error(ParseErrorKind::UnterminatedQuote, start + i))?;
                items.push((src[i + 1..i + 1 + close].to_string(), true));
                i += close + 2;
            } else {
                let len = src[i..].find([',', '#']).unwrap_or(src.len() - i);
                let token = src[i..i + len].trim_end();
                items.push((token.to_string(), false));
                i += token.len();
            }
            value_end = i;

            let skipped = src[i..].len() - src[i..].trim_start().len();
            match src[i + skipped..].chars().next() {
                None | Some('#') => break,
                Some(',') => {
                    saw_comma = true;
                    i += skipped + 1;
                    value_end = i;
                }
                Some(_) => {
                    return Err(self.error(
                        ParseErrorKind::TrailingCharacters,
                        start + i + skipped,
                    ));
                }
            }
        }

        let rest = &src[value_end..];
        let comment = if rest.trim().is_empty() {
            None
        } else {
            Some(rest.to_string())
        };

        let value = if saw_comma {
            RawValue::List(
                items
                    .into_iter()
                    .filter(|(text, quoted)| *quoted || !text.is_empty())
                    .map(|(text, _)| text)
                    .collect(),
            )
        } else {
            match items.into_iter().next() {
                Some((text, quoted)) => RawValue::Scalar { text, quoted },
                None => RawValue::unquoted(""),
            }
        };
        Ok((value, Tail::Done(comment)))
    }

    fn comment_tail(&self, rest: &str, start: usize) -> Result<Option<String>, ParseError> {
        if rest.trim().is_empty() {
            return Ok(None);
        }
        if rest.trim_start().starts_with('#') {
            return Ok(Some(rest.to_string()));
        }
        let skipped = rest.len() - rest.trim_start().len();
        Err(self.error(ParseErrorKind::TrailingCharacters, start + skipped))
    }

    /// Consume lines until the triple quote that opened on `first_line` closes.
    fn multiline(
        &mut self,
        first_line: &str,
        first: &str,
        delim: &'static str,
        value_start: usize,
    ) -> Result<(RawValue, Option<String>, String), ParseError> {
        let mut text = first.to_string();
        let mut original = first_line.to_string();

        while self.pos < self.lines.len() {
            let Line { offset, text: line } = self.lines[self.pos];
            self.pos += 1;
            original.push('\n');
            original.push_str(line);

            match line.find(delim) {
                Some(end) => {
                    text.push('\n');
                    text.push_str(&line[..end]);
                    let tail_at = end + delim.len();
                    let comment = self.comment_tail(&line[tail_at..], offset + tail_at)?;
                    return Ok((RawValue::quoted(text), comment, original));
                }
                None => {
                    text.push('\n');
                    text.push_str(line);
                }
            }
        }

        Err(self.error(ParseErrorKind::UnterminatedMultiline, value_start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(src: &str) -> Document {
        parse("<test>", src).unwrap()
    }

    fn kind_of(src: &str) -> ParseErrorKind {
        parse("<test>", src).unwrap_err().kind
    }

    #[test]
    fn root_keys_and_sections() {
        let doc = parse_ok("top = 1\n[core]\neditor = vim\n");
        assert_eq!(doc.root().get("top"), Some(&RawValue::unquoted("1")));
        assert_eq!(
            doc.section(&["core"]).unwrap().get("editor"),
            Some(&RawValue::unquoted("vim"))
        );
    }

    #[test]
    fn nested_sections_by_bracket_depth() {
        let doc = parse_ok("[a]\n  [[b]]\n  k = 1\n[c]\n");
        let b = doc.section(&["a", "b"]).unwrap();
        assert_eq!(b.depth(), 2);
        assert_eq!(b.get("k"), Some(&RawValue::unquoted("1")));
        assert!(doc.section(&["c"]).is_some());
    }

    #[test]
    fn quoted_values_and_inline_comments() {
        let doc = parse_ok("a = \"x # y\"  # real comment\nb = 'it'\n");
        let a = doc.root().entry("a").unwrap();
        assert_eq!(a.value(), &RawValue::quoted("x # y"));
        assert_eq!(a.inline_comment(), Some("  # real comment"));
        assert_eq!(doc.root().get("b"), Some(&RawValue::quoted("it")));
    }

    #[test]
    fn list_forms() {
        let doc = parse_ok("a = x, \"y, z\", w\nb = one,\nc = ,\nd = ,  # none\n");
        let root = doc.root();
        assert_eq!(root.get("a"), Some(&RawValue::list(["x", "y, z", "w"])));
        assert_eq!(root.get("b"), Some(&RawValue::list(["one"])));
        assert_eq!(root.get("c"), Some(&RawValue::List(vec![])));
        assert_eq!(root.entry("d").unwrap().inline_comment(), Some("  # none"));
    }

    #[test]
    fn empty_value_is_empty_bare_scalar() {
        let doc = parse_ok("a =\n");
        assert_eq!(doc.root().get("a"), Some(&RawValue::unquoted("")));
    }

    #[test]
    fn triple_quoted_multiline() {
        let src = "msg = \"\"\"first\nsecond\"\"\"  # note\nnext = 1\n";
        let doc = parse_ok(src);
        let msg = doc.root().entry("msg").unwrap();
        assert_eq!(msg.value(), &RawValue::quoted("first\nsecond"));
        assert_eq!(msg.inline_comment(), Some("  # note"));
        assert_eq!(doc.root().entry("next").unwrap().line(), 3);
        assert_eq!(doc.to_string(), src);
    }

    #[test]
    fn triple_quoted_single_line() {
        let doc = parse_ok("a = '''say \"hi\" it's'''\n");
        assert_eq!(doc.root().get("a"), Some(&RawValue::quoted("say \"hi\" it's")));
    }

    #[test]
    fn quoted_key() {
        let doc = parse_ok("\"odd = key\" = v\n");
        assert_eq!(doc.root().get("odd = key"), Some(&RawValue::unquoted("v")));
    }

    #[test]
    fn duplicate_keys_keep_last_value() {
        let doc = parse_ok("[core]\neditor = vim\neditor = nano\n");
        let core = doc.section(&["core"]).unwrap();
        assert_eq!(core.get("editor"), Some(&RawValue::unquoted("nano")));
        assert_eq!(core.entries().len(), 1);
        let dup = &doc.duplicates()[0];
        assert_eq!(dup.section, vec!["core".to_string()]);
        assert_eq!((dup.first_line, dup.line), (2, 3));
        assert_eq!(core.entry("editor").unwrap().line(), 3);
    }

    #[test]
    fn repeated_duplicates_share_one_record() {
        let doc = parse_ok("k = 1\nk = 2\nj = 0\nk = 3\n");
        let lines: Vec<(usize, usize)> = doc
            .duplicates()
            .iter()
            .map(|d| (d.first_line, d.line))
            .collect();
        assert_eq!(lines, [(1, 4)]);
        assert_eq!(doc.duplicates()[0].value, RawValue::unquoted("3"));
        assert_eq!(doc.root().get("k"), Some(&RawValue::unquoted("3")));
    }

    #[test]
    fn repeated_section_header_merges() {
        let doc = parse_ok("[a]\nx = 1\n[b]\n[a]\ny = 2\n");
        assert_eq!(doc.root().children().len(), 2);
        let a = doc.section(&["a"]).unwrap();
        assert_eq!(a.get("y"), Some(&RawValue::unquoted("2")));
    }

    #[test]
    fn comments_attach_to_following_item() {
        let doc = parse_ok("# top\n\n[a]\n; about x\nx = 1\n# trailing\n");
        assert_eq!(doc.section(&["a"]).unwrap().comments(), ["# top".to_string(), String::new()]);
        assert_eq!(doc.section(&["a"]).unwrap().entry("x").unwrap().comments(), ["; about x".to_string()]);
        assert_eq!(doc.final_comments(), ["# trailing".to_string()]);
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let doc = parse_ok("[a]\r\nx = 1\r\n");
        assert_eq!(doc.section(&["a"]).unwrap().get("x"), Some(&RawValue::unquoted("1")));
    }

    #[test]
    fn missing_trailing_newline_is_preserved() {
        assert_eq!(parse_ok("a = 1").to_string(), "a = 1");
    }

    #[test]
    fn syntax_errors() {
        assert_eq!(kind_of("just words\n"), ParseErrorKind::InvalidLine);
        assert_eq!(kind_of("= 1\n"), ParseErrorKind::MissingKey);
        assert_eq!(kind_of("a = \"open\n"), ParseErrorKind::UnterminatedQuote);
        assert_eq!(kind_of("a = \"\"\"open\nstill\n"), ParseErrorKind::UnterminatedMultiline);
        assert_eq!(kind_of("[a]]\n"), ParseErrorKind::MismatchedBrackets);
        assert_eq!(kind_of("[a\n"), ParseErrorKind::MismatchedBrackets);
        assert_eq!(kind_of("[ ]\n"), ParseErrorKind::EmptySectionName);
        assert_eq!(kind_of("[a] x\n"), ParseErrorKind::TrailingCharacters);
        assert_eq!(kind_of("a = \"x\" y\n"), ParseErrorKind::TrailingCharacters);
        assert_eq!(
            kind_of("[a]\n[[[c]]]\n"),
            ParseErrorKind::NestingTooDeep { depth: 3, max: 2 }
        );
    }

    #[test]
    fn error_position_points_at_problem() {
        let err = parse("cfg", "[a]\nx = \"open\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 5);
    }
}
