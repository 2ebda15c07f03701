//! Extraction of `<script>` elements from HTML text.
//!
//! This is a permissive scanner, not an HTML parser: it recognizes script
//! open/close anchors case-insensitively, collects attributes, and slices out
//! inline code. Real documents under analysis are frequently malformed, so
//! every irregularity degrades to "fewer tags found" rather than an error.

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

static OPEN: Lazy<AhoCorasick> = Lazy::new(|| {
  AhoCorasick::builder()
    .ascii_case_insensitive(true)
    .build(["<script"])
    .unwrap()
});

static CLOSE: Lazy<AhoCorasick> = Lazy::new(|| {
  AhoCorasick::builder()
    .ascii_case_insensitive(true)
    .build(["</script"])
    .unwrap()
});

/// One `<script>` element, in document order, with its attributes and inline
/// code (if any).
#[derive(Clone, Debug)]
pub struct ScriptTag {
  attrs: Vec<(String, String)>,
  pub code: Option<String>,
}

impl ScriptTag {
  /// Attribute value by case-insensitive name; boolean attributes yield an
  /// empty string.
  pub fn attr(&self, name: &str) -> Option<&str> {
    self
      .attrs
      .iter()
      .find(|(n, _)| n.eq_ignore_ascii_case(name))
      .map(|(_, v)| v.as_str())
  }
}

/// Returns all script tags of a document in order.
pub fn script_tags(html: &str) -> Vec<ScriptTag> {
  let bytes = html.as_bytes();
  let mut tags = Vec::new();
  let mut pos = 0;
  while pos < bytes.len() {
    let Some(open) = OPEN.find(&bytes[pos..]) else {
      break;
    };
    let name_end = pos + open.end();
    // Reject lookalikes such as `<scriptx>`.
    let tag_boundary = matches!(
      bytes.get(name_end),
      Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/'
    );
    if !tag_boundary {
      pos = name_end;
      continue;
    }
    let Some((attrs, body_start, self_closing)) = parse_attrs(bytes, name_end) else {
      // Open tag never closed; nothing more to find.
      break;
    };
    if self_closing {
      tags.push(ScriptTag { attrs, code: None });
      pos = body_start;
      continue;
    }
    let (code, next) = match CLOSE.find(&bytes[body_start..]) {
      Some(close) => (
        &html[body_start..body_start + close.start()],
        body_start + close.end(),
      ),
      None => (&html[body_start..], bytes.len()),
    };
    let code = (!code.trim().is_empty()).then(|| code.to_owned());
    tags.push(ScriptTag { attrs, code });
    pos = next;
  }
  tags
}

/// Parses attributes from just after the tag name up to and including the
/// closing `>`. Returns the attributes, the offset of the first byte after
/// the open tag, and whether the tag was self-closing. `None` if the input
/// ends before the tag does.
fn parse_attrs(bytes: &[u8], mut i: usize) -> Option<(Vec<(String, String)>, usize, bool)> {
  let mut attrs = Vec::new();
  loop {
    while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
      i += 1;
    }
    match bytes.get(i)? {
      b'>' => return Some((attrs, i + 1, false)),
      b'/' if bytes.get(i + 1) == Some(&b'>') => return Some((attrs, i + 2, true)),
      b'/' => i += 1,
      _ => {
        let name_start = i;
        while i < bytes.len()
          && !bytes[i].is_ascii_whitespace()
          && !matches!(bytes[i], b'=' | b'>' | b'/')
        {
          i += 1;
        }
        let name = String::from_utf8_lossy(&bytes[name_start..i]).to_ascii_lowercase();
        while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
          i += 1;
        }
        let mut value = String::new();
        if bytes.get(i) == Some(&b'=') {
          i += 1;
          while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
            i += 1;
          }
          match bytes.get(i) {
            Some(&quote @ (b'"' | b'\'')) => {
              i += 1;
              let end = memchr::memchr(quote, &bytes[i..])? + i;
              value = String::from_utf8_lossy(&bytes[i..end]).into_owned();
              i = end + 1;
            }
            _ => {
              let value_start = i;
              while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                i += 1;
              }
              value = String::from_utf8_lossy(&bytes[value_start..i]).into_owned();
            }
          }
        }
        if !name.is_empty() {
          attrs.push((name, value));
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn finds_tags_in_document_order() {
    let html = "<html><head>\n<script src=\"lib/curl.js\"></script>\n\
                <script src=\"app/run.js\"></script>\n</head></html>";
    let tags = script_tags(html);
    assert_eq!(tags.len(), 2);
    assert_eq!(tags[0].attr("src"), Some("lib/curl.js"));
    assert_eq!(tags[1].attr("src"), Some("app/run.js"));
    assert!(tags[0].code.is_none());
  }

  #[test]
  fn captures_inline_code() {
    let html = "<script>require({baseUrl: \"x\"});</script>";
    let tags = script_tags(html);
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].code.as_deref(), Some("require({baseUrl: \"x\"});"));
  }

  #[test]
  fn attribute_forms_and_case() {
    let html = "<SCRIPT Data-Main='app/main' src=require.js defer></SCRIPT>";
    let tags = script_tags(html);
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].attr("data-main"), Some("app/main"));
    assert_eq!(tags[0].attr("src"), Some("require.js"));
    assert_eq!(tags[0].attr("defer"), Some(""));
    assert_eq!(tags[0].attr("nonexistent"), None);
  }

  #[test]
  fn self_closing_and_lookalike_tags() {
    let html = "<script src=\"a.js\"/><scriptx>nope</scriptx>";
    let tags = script_tags(html);
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].attr("src"), Some("a.js"));
  }

  #[test]
  fn unterminated_tag_is_dropped() {
    assert!(script_tags("<script src=\"a.js\"").is_empty());
    assert!(script_tags("no scripts at all").is_empty());
  }
}
