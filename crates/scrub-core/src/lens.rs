//! A small path language over `serde_json::Value` (spec §4.C).
//!
//! A `Lens` is a sequence of `Step`s built at spec-construction time, not
//! parsed from user text the way a JSON pointer is. It is deliberately
//! narrower than a general pointer: it exists only to locate string leaves
//! that a column's transform should rewrite in place.

use serde_json::Value;

use crate::column::StringFn;

#[derive(Debug, Clone)]
pub enum Step {
    /// Descend into object key `k`. No-op (leaves the value untouched) if
    /// the current value isn't an object or doesn't have the key.
    Field(String),
    /// Apply the remainder of the lens to every element of an array. No-op
    /// if the current value isn't an array.
    ArrayElements,
}

/// A compiled traversal path, root-relative.
#[derive(Debug, Clone, Default)]
pub struct Lens {
    steps: Vec<Step>,
}

impl Lens {
    pub fn root() -> Self {
        Lens { steps: Vec::new() }
    }

    pub fn field(mut self, key: impl Into<String>) -> Self {
        self.steps.push(Step::Field(key.into()));
        self
    }

    pub fn array_elements(mut self) -> Self {
        self.steps.push(Step::ArrayElements);
        self
    }

    /// Rewrites every string leaf reached by this lens in place, applying
    /// `leaf_fn`. Non-string leaves and positions the path can't reach are
    /// left untouched.
    pub fn rewrite(&self, value: &mut Value, leaf_fn: &StringFn) {
        rewrite_steps(&self.steps, value, leaf_fn);
    }
}

fn rewrite_steps(steps: &[Step], value: &mut Value, leaf_fn: &StringFn) {
    match steps.split_first() {
        None => {
            if let Value::String(s) = value {
                *s = leaf_fn(s);
            }
        }
        Some((Step::Field(key), rest)) => {
            if let Value::Object(map) = value {
                if let Some(child) = map.get_mut(key) {
                    rewrite_steps(rest, child, leaf_fn);
                }
            }
        }
        Some((Step::ArrayElements, rest)) => {
            if let Value::Array(items) = value {
                for item in items.iter_mut() {
                    rewrite_steps(rest, item, leaf_fn);
                }
            }
        }
    }
}

/// Fluent entry point mirroring a `_.fieldName.mapString(fn)` surface:
/// `LensBuilder::field("tags").map_json_array().map_string(fn)`
/// builds `ArrayElements ∘ Field("tags")` paired with `fn`.
#[derive(Debug, Clone, Default)]
pub struct LensBuilder {
    lens: Lens,
}

impl LensBuilder {
    pub fn new() -> Self {
        LensBuilder { lens: Lens::root() }
    }

    pub fn field(mut self, key: impl Into<String>) -> Self {
        self.lens = self.lens.field(key);
        self
    }

    pub fn map_json_array(mut self) -> Self {
        self.lens = self.lens.array_elements();
        self
    }

    pub fn map_string(self, leaf_fn: StringFn) -> (Lens, StringFn) {
        (self.lens, leaf_fn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn upper() -> StringFn {
        Arc::new(|s: &str| s.to_uppercase())
    }

    #[test]
    fn rewrites_a_nested_field() {
        let mut doc = json!({"contact": {"email": "a@b.com"}});
        let lens = Lens::root().field("contact").field("email");
        lens.rewrite(&mut doc, &upper());
        assert_eq!(doc, json!({"contact": {"email": "A@B.COM"}}));
    }

    #[test]
    fn rewrites_every_array_element() {
        let mut doc = json!({"tags": ["a", "b", "c"]});
        let lens = Lens::root().field("tags").array_elements();
        lens.rewrite(&mut doc, &upper());
        assert_eq!(doc, json!({"tags": ["A", "B", "C"]}));
    }

    #[test]
    fn missing_key_is_a_noop() {
        let mut doc = json!({"other": "x"});
        let lens = Lens::root().field("missing");
        lens.rewrite(&mut doc, &upper());
        assert_eq!(doc, json!({"other": "x"}));
    }

    #[test]
    fn non_string_leaf_is_untouched() {
        let mut doc = json!({"count": 3});
        let lens = Lens::root().field("count");
        lens.rewrite(&mut doc, &upper());
        assert_eq!(doc, json!({"count": 3}));
    }

    #[test]
    fn array_elements_on_non_array_is_a_noop() {
        let mut doc = json!({"tags": "not-an-array"});
        let lens = Lens::root().field("tags").array_elements();
        lens.rewrite(&mut doc, &upper());
        assert_eq!(doc, json!({"tags": "not-an-array"}));
    }

    #[test]
    fn builder_composes_field_then_array() {
        let (lens, leaf_fn) = LensBuilder::new().field("tags").map_json_array().map_string(upper());
        let mut doc = json!({"tags": ["x", "y"]});
        lens.rewrite(&mut doc, &leaf_fn);
        assert_eq!(doc, json!({"tags": ["X", "Y"]}));
    }
}
