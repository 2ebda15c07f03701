//! Boundary to the JavaScript parser.
//!
//! The engine works on the serialized form of the parse-js AST (a JSON tree
//! whose nodes carry their syntactic kind under `"$t"`), so the pattern
//! matcher and evaluator stay independent of the parser's node types.

use serde_json::Value;
use tracing::debug;

/// Parses JavaScript source into a JSON syntax tree.
///
/// Malformed source yields `None`, never an error: files under analysis are
/// routinely mid-edit, and an unparseable file simply means no configuration
/// can be extracted from it.
pub fn parse_source(code: &str) -> Option<Value> {
  match parse_js::parse(code.as_bytes()) {
    Ok(tree) => serde_json::to_value(&tree).ok(),
    Err(err) => {
      debug!(error = %err, "source failed to parse, ignoring");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_to_tagged_tree() {
    let tree = parse_source("require({baseUrl: \"scripts\"});").unwrap();
    assert_eq!(tree["$t"], "TopLevel");
    assert!(!tree["body"].as_array().unwrap().is_empty());
  }

  #[test]
  fn malformed_source_is_not_an_error() {
    assert!(parse_source("require({").is_none());
    assert!(parse_source("]]]").is_none());
  }
}
