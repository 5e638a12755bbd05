use reweave_semantics::Tier;
use serde::{Deserialize, Serialize};

/// One element of a per-breakpoint export tree.
///
/// `identity_key` is assigned by the upstream extraction step (explicit
/// semantic name, falling back to structural path) and must be stable
/// across re-runs for the same design so cross-tree matching is
/// deterministic. Classes are unique utility tokens; the original
/// document order is preserved so merged output is stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub identity_key: String,
    /// Structural role (div, img, ...). Opaque to the merge.
    pub tag_kind: String,
    pub classes: Vec<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(identity_key: impl Into<String>, tag_kind: impl Into<String>) -> Self {
        Self {
            identity_key: identity_key.into(),
            tag_kind: tag_kind.into(),
            classes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    pub fn with_classes(mut self, classes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        for class in classes {
            let class = class.into();
            if !self.classes.contains(&class) {
                self.classes.push(class);
            }
        }
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, new_children: Vec<Element>) -> Self {
        self.children.extend(new_children);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Depth-first walk over this element and all descendants.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Element)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Find a descendant (or self) by identity key.
    pub fn find_by_key(&self, key: &str) -> Option<&Element> {
        if self.identity_key == key {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_by_key(key))
    }
}

/// One breakpoint's export: an ordered tree of elements, owned exclusively
/// by the tier it represents. Immutable input to the merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantTree {
    pub tier: Tier,
    pub root: Element,
}

impl VariantTree {
    pub fn new(tier: Tier, root: Element) -> Self {
        Self { tier, root }
    }
}

/// Output node: the desktop subtree shape plus the final merged class
/// string. Produced exclusively by the merge pipeline; input trees are
/// never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedElement {
    pub identity_key: String,
    pub tag_kind: String,
    pub merged_class_name: String,
    pub children: Vec<MergedElement>,
}

impl MergedElement {
    /// The merged class string split back into individual tokens.
    pub fn class_list(&self) -> Vec<&str> {
        self.merged_class_name.split_whitespace().collect()
    }

    pub fn find_by_key(&self, key: &str) -> Option<&MergedElement> {
        if self.identity_key == key {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_by_key(key))
    }

    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(MergedElement::node_count)
            .sum::<usize>()
    }
}
