/*
 * A retained element tree standing in for the browser DOM. Elements live in an
 * arena keyed by `NodeId`; ids are handed out sequentially and never reused
 * within a document, so comparing ids is the same as comparing node identity.
 *
 * Releasing a node (`remove_subtree`, `clear_children`) drops it and all of its
 * descendants from the arena. Any later operation naming a released node fails
 * with `PlatformError::InvalidNode`; read-only queries such as `has_class` and
 * `attribute` simply report "absent".
 */
use super::error::{PlatformError, Result as PlatformResult};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

// A document shared between a map engine and the controls mounted into it.
pub type SharedDocument = Rc<RefCell<Document>>;

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    classes: Vec<String>,
    // Kept in insertion order so serialisation is stable.
    attributes: Vec<(String, String)>,
    text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Element {
            tag: tag.to_string(),
            classes: Vec::new(),
            attributes: Vec::new(),
            text: None,
            parent: None,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Document {
    nodes: HashMap<NodeId, Element>,
    next_id: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedDocument {
        Rc::new(RefCell::new(Document::new()))
    }

    fn element(&self, id: NodeId) -> PlatformResult<&Element> {
        self.nodes.get(&id).ok_or(PlatformError::InvalidNode(id))
    }

    fn element_mut(&mut self, id: NodeId) -> PlatformResult<&mut Element> {
        self.nodes.get_mut(&id).ok_or(PlatformError::InvalidNode(id))
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.nodes.insert(id, Element::new(tag));
        log::trace!("Document: created <{tag}> as {id:?}");
        id
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn tag(&self, id: NodeId) -> PlatformResult<&str> {
        Ok(&self.element(id)?.tag)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|element| element.parent)
    }

    pub fn children(&self, id: NodeId) -> PlatformResult<&[NodeId]> {
        Ok(&self.element(id)?.children)
    }

    // False when `node` has been released.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !self.contains(node) {
            return false;
        }
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /*
     * Appends `child` as the last child of `parent`, first detaching it from
     * any previous parent. Appending a node into its own subtree is refused.
     */
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> PlatformResult<()> {
        self.insert_child(parent, child, false)
    }

    // Like `append_child`, but `child` becomes the first child of `parent`.
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> PlatformResult<()> {
        self.insert_child(parent, child, true)
    }

    fn insert_child(&mut self, parent: NodeId, child: NodeId, at_front: bool) -> PlatformResult<()> {
        self.element(parent)?;
        self.element(child)?;
        if self.is_ancestor_or_self(child, parent) {
            return Err(PlatformError::OperationFailed(format!(
                "cannot append {child:?} inside its own subtree"
            )));
        }
        self.detach(child)?;
        let siblings = &mut self.element_mut(parent)?.children;
        if at_front {
            siblings.insert(0, child);
        } else {
            siblings.push(child);
        }
        self.element_mut(child)?.parent = Some(parent);
        Ok(())
    }

    // Removes `node` from its parent, keeping the subtree alive. Returns whether
    // the node had a parent.
    pub fn detach(&mut self, node: NodeId) -> PlatformResult<bool> {
        let Some(parent) = self.element(node)?.parent else {
            return Ok(false);
        };
        if let Some(parent_element) = self.nodes.get_mut(&parent) {
            parent_element.children.retain(|c| *c != node);
        }
        self.element_mut(node)?.parent = None;
        Ok(true)
    }

    pub fn remove_subtree(&mut self, node: NodeId) -> PlatformResult<()> {
        self.detach(node)?;
        let mut released = self.descendants(node)?;
        released.push(node);
        for id in &released {
            self.nodes.remove(id);
        }
        log::trace!("Document: released {} node(s) rooted at {node:?}", released.len());
        Ok(())
    }

    pub fn clear_children(&mut self, node: NodeId) -> PlatformResult<()> {
        let released = self.descendants(node)?;
        for id in &released {
            self.nodes.remove(id);
        }
        self.element_mut(node)?.children.clear();
        Ok(())
    }

    // All descendants of `root` in document (pre-)order, excluding `root`.
    pub fn descendants(&self, root: NodeId) -> PlatformResult<Vec<NodeId>> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.element(root)?.children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(element) = self.nodes.get(&id) {
                stack.extend(element.children.iter().rev().copied());
            }
        }
        Ok(out)
    }

    // --- Attributes ---

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> PlatformResult<()> {
        let element = self.element_mut(id)?;
        match element.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => element
                .attributes
                .push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> PlatformResult<()> {
        self.element_mut(id)?.attributes.retain(|(n, _)| n != name);
        Ok(())
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes.get(&id).and_then(|element| {
            element
                .attributes
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str())
        })
    }

    // --- Class list ---

    /*
     * Replaces the whole class list with the whitespace-separated tokens of
     * `class_name`, dropping duplicates.
     */
    pub fn set_class_name(&mut self, id: NodeId, class_name: &str) -> PlatformResult<()> {
        let element = self.element_mut(id)?;
        element.classes.clear();
        for token in class_name.split_whitespace() {
            if !element.classes.iter().any(|c| c == token) {
                element.classes.push(token.to_string());
            }
        }
        Ok(())
    }

    pub fn class_name(&self, id: NodeId) -> PlatformResult<String> {
        Ok(self.element(id)?.classes.join(" "))
    }

    pub fn add_class(&mut self, id: NodeId, class_name: &str) -> PlatformResult<()> {
        let element = self.element_mut(id)?;
        for token in class_name.split_whitespace() {
            if !element.classes.iter().any(|c| c == token) {
                element.classes.push(token.to_string());
            }
        }
        Ok(())
    }

    pub fn remove_class(&mut self, id: NodeId, class_name: &str) -> PlatformResult<()> {
        let element = self.element_mut(id)?;
        let tokens: Vec<&str> = class_name.split_whitespace().collect();
        element.classes.retain(|c| !tokens.contains(&c.as_str()));
        Ok(())
    }

    pub fn has_class(&self, id: NodeId, class_name: &str) -> bool {
        self.nodes
            .get(&id)
            .is_some_and(|element| element.classes.iter().any(|c| c == class_name))
    }

    // --- Text ---

    pub fn set_text(&mut self, id: NodeId, text: &str) -> PlatformResult<()> {
        self.element_mut(id)?.text = Some(text.to_string());
        Ok(())
    }

    // Concatenated text of `id` and all of its descendants, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(text) = self.nodes.get(&id).and_then(|e| e.text.as_deref()) {
            out.push_str(text);
        }
        for child in self.descendants(id).unwrap_or_default() {
            if let Some(text) = self.nodes.get(&child).and_then(|e| e.text.as_deref()) {
                out.push_str(text);
            }
        }
        out
    }

    // --- Queries ---

    pub fn query_by_class(&self, root: NodeId, class_name: &str) -> Vec<NodeId> {
        self.descendants(root)
            .unwrap_or_default()
            .into_iter()
            .filter(|id| self.has_class(*id, class_name))
            .collect()
    }

    pub fn query_first_by_class(&self, root: NodeId, class_name: &str) -> Option<NodeId> {
        self.query_by_class(root, class_name).into_iter().next()
    }

    pub fn query_by_attribute(&self, root: NodeId, name: &str, value: &str) -> Vec<NodeId> {
        self.descendants(root)
            .unwrap_or_default()
            .into_iter()
            .filter(|id| self.attribute(*id, name) == Some(value))
            .collect()
    }

    // --- Serialisation ---

    pub fn to_html(&self, root: NodeId) -> PlatformResult<String> {
        let mut out = String::new();
        self.write_html(root, &mut out)?;
        Ok(out)
    }

    fn write_html(&self, id: NodeId, out: &mut String) -> PlatformResult<()> {
        let element = self.element(id)?;
        let _ = write!(out, "<{}", element.tag);
        if !element.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape_html(&element.classes.join(" ")));
        }
        for (name, value) in &element.attributes {
            let _ = write!(out, " {name}=\"{}\"", escape_html(value));
        }
        out.push('>');
        if is_void_element(&element.tag) {
            return Ok(());
        }
        if let Some(text) = &element.text {
            out.push_str(&escape_html(text));
        }
        for child in &element.children {
            self.write_html(*child, out)?;
        }
        let _ = write!(out, "</{}>", element.tag);
        Ok(())
    }
}

fn is_void_element(tag: &str) -> bool {
    matches!(tag, "img" | "br" | "hr" | "input")
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_detach() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let child = doc.create_element("span");
        doc.append_child(root, child).unwrap();

        assert_eq!(doc.children(root).unwrap(), &[child]);
        assert_eq!(doc.parent(child), Some(root));
        assert!(doc.is_ancestor_or_self(root, child));

        assert!(doc.detach(child).unwrap());
        assert!(doc.children(root).unwrap().is_empty());
        assert!(!doc.detach(child).unwrap());
        assert!(doc.contains(child));
    }

    #[test]
    fn test_prepend_child_goes_first() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        doc.append_child(root, a).unwrap();
        doc.prepend_child(root, b).unwrap();
        assert_eq!(doc.children(root).unwrap(), &[b, a]);
    }

    #[test]
    fn test_append_refuses_cycles() {
        let mut doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        doc.append_child(outer, inner).unwrap();
        let err = doc.append_child(inner, outer).unwrap_err();
        assert!(matches!(err, PlatformError::OperationFailed(_)));
    }

    #[test]
    fn test_clear_children_releases_descendants() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let list = doc.create_element("div");
        let item = doc.create_element("div");
        doc.append_child(root, list).unwrap();
        doc.append_child(list, item).unwrap();

        doc.clear_children(root).unwrap();
        assert!(doc.contains(root));
        assert!(!doc.contains(list));
        assert!(!doc.contains(item));
        assert_eq!(doc.node_count(), 1);
        assert_eq!(
            doc.set_text(item, "x").unwrap_err(),
            PlatformError::InvalidNode(item)
        );
    }

    #[test]
    fn test_node_ids_are_not_reused() {
        let mut doc = Document::new();
        let first = doc.create_element("div");
        doc.remove_subtree(first).unwrap();
        let second = doc.create_element("div");
        assert_ne!(first, second);
    }

    #[test]
    fn test_class_list_operations() {
        let mut doc = Document::new();
        let node = doc.create_element("div");
        doc.set_class_name(node, "a b  a c").unwrap();
        assert_eq!(doc.class_name(node).unwrap(), "a b c");

        doc.add_class(node, "d b").unwrap();
        assert_eq!(doc.class_name(node).unwrap(), "a b c d");

        doc.remove_class(node, "a c").unwrap();
        assert!(doc.has_class(node, "b"));
        assert!(!doc.has_class(node, "a"));
        assert_eq!(doc.class_name(node).unwrap(), "b d");
    }

    #[test]
    fn test_attributes_and_queries() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        doc.append_child(root, a).unwrap();
        doc.append_child(root, b).unwrap();
        doc.set_attribute(a, "aria-selected", "true").unwrap();
        doc.set_attribute(b, "aria-selected", "false").unwrap();
        doc.set_attribute(b, "aria-selected", "true").unwrap();
        doc.add_class(b, "item").unwrap();

        assert_eq!(doc.query_by_attribute(root, "aria-selected", "true"), vec![a, b]);
        assert_eq!(doc.query_first_by_class(root, "item"), Some(b));

        doc.remove_attribute(a, "aria-selected").unwrap();
        assert_eq!(doc.attribute(a, "aria-selected"), None);
    }

    #[test]
    fn test_text_content_and_html() {
        let mut doc = Document::new();
        let root = doc.create_element("div");
        let img = doc.create_element("img");
        let span = doc.create_element("span");
        doc.set_class_name(root, "entry").unwrap();
        doc.set_attribute(img, "alt", "A & B").unwrap();
        doc.set_text(span, "Streets").unwrap();
        doc.append_child(root, img).unwrap();
        doc.append_child(root, span).unwrap();

        assert_eq!(doc.text_content(root), "Streets");
        assert_eq!(
            doc.to_html(root).unwrap(),
            "<div class=\"entry\"><img alt=\"A &amp; B\"><span>Streets</span></div>"
        );
    }
}
