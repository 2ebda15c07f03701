//! Structural pattern matching over JSON-shaped trees.
//!
//! The discovery engine queries parsed ASTs (serialized to
//! [`serde_json::Value`]) through these combinators rather than walking node
//! types by hand. A successful match yields an immutable set of named
//! captures; patterns themselves carry no mutable state, so they can be
//! shared and reused freely.

use serde_json::Value;

#[derive(Clone, Debug)]
pub enum Pat {
  /// Matches anything.
  Any,
  /// Matches a leaf equal to the given JSON value.
  Eq(Value),
  /// First alternative that matches wins.
  Or(Vec<Pat>),
  /// All must match the same node. The focus of the whole conjunction is the
  /// focus of the last pattern, so `and([shape, contains(x)])` focuses on
  /// the `x` found inside the matching shape.
  And(Vec<Pat>),
  /// Partial object shape: every listed field must be present and match.
  /// Extra fields on the node are ignored.
  Obj(Vec<(&'static str, Pat)>),
  /// Exact array shape: same length, elementwise match.
  Arr(Vec<Pat>),
  /// Array with at least one element matching; earliest element wins.
  Has(Box<Pat>),
  /// Any descendant (or the node itself) matching, in pre-order
  /// depth-first order.
  Contains(Box<Pat>),
  /// Captures the matched node under a name.
  Bind(&'static str, Box<Pat>),
  /// Captures a string leaf under a name; fails on non-strings.
  BindStr(&'static str),
}

pub fn any() -> Pat {
  Pat::Any
}

pub fn eq(value: impl Into<Value>) -> Pat {
  Pat::Eq(value.into())
}

pub fn text(s: &str) -> Pat {
  Pat::Eq(Value::String(s.to_owned()))
}

pub fn or(alternatives: Vec<Pat>) -> Pat {
  Pat::Or(alternatives)
}

pub fn and(all: Vec<Pat>) -> Pat {
  Pat::And(all)
}

pub fn obj(fields: Vec<(&'static str, Pat)>) -> Pat {
  Pat::Obj(fields)
}

pub fn arr(elements: Vec<Pat>) -> Pat {
  Pat::Arr(elements)
}

pub fn has(element: Pat) -> Pat {
  Pat::Has(Box::new(element))
}

pub fn contains(inner: Pat) -> Pat {
  Pat::Contains(Box::new(inner))
}

pub fn bind(name: &'static str, inner: Pat) -> Pat {
  Pat::Bind(name, Box::new(inner))
}

pub fn bind_str(name: &'static str) -> Pat {
  Pat::BindStr(name)
}

/// The result of a successful match: the focused subtree plus all captures
/// recorded by [`Pat::Bind`]/[`Pat::BindStr`] on the successful path.
pub struct Match<'a> {
  pub focus: &'a Value,
  captures: Vec<(&'static str, &'a Value)>,
}

impl<'a> Match<'a> {
  pub fn capture(&self, name: &str) -> Option<&'a Value> {
    self
      .captures
      .iter()
      .rev()
      .find(|(n, _)| *n == name)
      .map(|(_, v)| *v)
  }

  pub fn capture_str(&self, name: &str) -> Option<&'a str> {
    self.capture(name)?.as_str()
  }
}

impl Pat {
  /// Evaluates the pattern against a tree. `None` means no match; there is no
  /// error channel, mirroring the success/failure protocol of the engine.
  pub fn matches<'a>(&self, tree: &'a Value) -> Option<Match<'a>> {
    let mut captures = Vec::new();
    let focus = self.run(tree, &mut captures)?;
    Some(Match { focus, captures })
  }

  /// Runs with capture rollback: a failed attempt leaves no stale bindings
  /// behind, so alternatives tried later see a clean slate.
  fn run<'a>(&self, node: &'a Value, caps: &mut Vec<(&'static str, &'a Value)>) -> Option<&'a Value> {
    let mark = caps.len();
    let found = self.run_inner(node, caps);
    if found.is_none() {
      caps.truncate(mark);
    }
    found
  }

  fn run_inner<'a>(
    &self,
    node: &'a Value,
    caps: &mut Vec<(&'static str, &'a Value)>,
  ) -> Option<&'a Value> {
    match self {
      Pat::Any => Some(node),
      Pat::Eq(value) => (node == value).then_some(node),
      Pat::Or(alternatives) => alternatives.iter().find_map(|p| p.run(node, caps)),
      Pat::And(all) => {
        let mut focus = node;
        for p in all {
          focus = p.run(node, caps)?;
        }
        Some(focus)
      }
      Pat::Obj(fields) => {
        let map = node.as_object()?;
        for (key, p) in fields {
          p.run(map.get(*key)?, caps)?;
        }
        Some(node)
      }
      Pat::Arr(elements) => {
        let items = node.as_array()?;
        if items.len() != elements.len() {
          return None;
        }
        for (p, item) in elements.iter().zip(items) {
          p.run(item, caps)?;
        }
        Some(node)
      }
      Pat::Has(element) => {
        let items = node.as_array()?;
        items.iter().find_map(|item| element.run(item, caps))
      }
      Pat::Contains(inner) => search(inner, node, caps),
      Pat::Bind(name, inner) => {
        let focus = inner.run(node, caps)?;
        caps.push((name, node));
        Some(focus)
      }
      Pat::BindStr(name) => {
        node.as_str()?;
        caps.push((name, node));
        Some(node)
      }
    }
  }
}

fn search<'a>(
  pat: &Pat,
  node: &'a Value,
  caps: &mut Vec<(&'static str, &'a Value)>,
) -> Option<&'a Value> {
  if let Some(focus) = pat.run(node, caps) {
    return Some(focus);
  }
  match node {
    Value::Object(map) => map.values().find_map(|child| search(pat, child, caps)),
    Value::Array(items) => items.iter().find_map(|child| search(pat, child, caps)),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn eq_and_obj_match_partial_shapes() {
    let tree = json!({"$t": "Call", "name": "require", "extra": 1});
    assert!(obj(vec![("$t", text("Call"))]).matches(&tree).is_some());
    assert!(obj(vec![("$t", text("Id"))]).matches(&tree).is_none());
    assert!(obj(vec![("missing", any())]).matches(&tree).is_none());
  }

  #[test]
  fn and_focuses_on_last_pattern() {
    let tree = json!({"kind": "decl", "init": {"leaf": true}});
    let pat = and(vec![
      obj(vec![("kind", text("decl"))]),
      contains(obj(vec![("leaf", eq(true))])),
    ]);
    let m = pat.matches(&tree).unwrap();
    assert_eq!(m.focus, &json!({"leaf": true}));
  }

  #[test]
  fn contains_matches_self_and_descendants() {
    let needle = obj(vec![("x", eq(1))]);
    assert!(contains(needle.clone()).matches(&json!({"x": 1})).is_some());
    assert!(contains(needle.clone())
      .matches(&json!({"a": [{"b": {"x": 1}}]}))
      .is_some());
    assert!(contains(needle).matches(&json!({"a": {"x": 2}})).is_none());
  }

  #[test]
  fn arr_is_exact_and_has_is_existential() {
    let tree = json!([1, 2]);
    assert!(arr(vec![eq(1), eq(2)]).matches(&tree).is_some());
    assert!(arr(vec![eq(1)]).matches(&tree).is_none());
    assert!(has(eq(2)).matches(&tree).is_some());
    assert!(has(eq(3)).matches(&tree).is_none());
  }

  #[test]
  fn bind_captures_matched_subtree() {
    let tree = json!({"callee": {"name": "curl"}, "args": ["cfg"]});
    let pat = obj(vec![
      ("callee", bind("fn", obj(vec![("name", bind_str("fn_name"))]))),
      ("args", arr(vec![bind_str("arg")])),
    ]);
    let m = pat.matches(&tree).unwrap();
    assert_eq!(m.capture("fn"), Some(&json!({"name": "curl"})));
    assert_eq!(m.capture_str("fn_name"), Some("curl"));
    assert_eq!(m.capture_str("arg"), Some("cfg"));
  }

  #[test]
  fn failed_alternatives_leave_no_captures() {
    let tree = json!({"a": "one", "b": "two"});
    // First alternative binds `a` then fails on the bogus field; the second
    // succeeds. Only the second's captures must survive.
    let pat = or(vec![
      obj(vec![("a", bind_str("x")), ("bogus", any())]),
      obj(vec![("b", bind_str("y"))]),
    ]);
    let m = pat.matches(&tree).unwrap();
    assert_eq!(m.capture("x"), None);
    assert_eq!(m.capture_str("y"), Some("two"));
  }

  #[test]
  fn contains_prefers_shallower_preorder_match() {
    let tree = json!({"v": {"v": {"leaf": 1}}});
    let pat = contains(bind("hit", obj(vec![("v", any())])));
    let m = pat.matches(&tree).unwrap();
    assert_eq!(m.capture("hit"), Some(&tree));
  }
}
