//! Mutable SVG tree
//!
//! roxmltree gives a read-only view, so the template is copied into an arena
//! of nodes that dynamics can rewrap and restyle. Output goes through
//! quick-xml so attribute and text escaping stay correct.

use crate::errors::SvgError;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use roxmltree::ParsingOptions;

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Handle to a node in an [`SvgDocument`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Element { tag: String, attrs: Vec<(String, String)> },
    Text(String),
}

#[derive(Clone, Debug, PartialEq)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SvgDocument {
    nodes: Vec<Node>,
    root: NodeId,
}

// ============================================================================
// PARSING
// ============================================================================

impl SvgDocument {
    /// Parse template markup; DTDs (and their entities) are allowed since
    /// illustration tools emit them
    pub fn parse(text: &str) -> Result<Self, SvgError> {
        let options = ParsingOptions { allow_dtd: true, ..ParsingOptions::default() };
        let xml = roxmltree::Document::parse_with_options(text, options)
            .map_err(|e| SvgError::Xml(e.to_string()))?;

        let mut doc = SvgDocument { nodes: Vec::new(), root: NodeId(0) };
        doc.root = doc.copy_element(xml.root_element(), None);
        Ok(doc)
    }

    fn push(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { kind, parent, children: Vec::new() });
        if let Some(p) = parent {
            self.nodes[p.0].children.push(id);
        }
        id
    }

    fn copy_element(&mut self, node: roxmltree::Node, parent: Option<NodeId>) -> NodeId {
        let mut attrs = Vec::new();

        let parent_xml = node.parent_element();
        for ns in node.namespaces() {
            if ns.name() == Some("xml") {
                continue;
            }
            let inherited = parent_xml
                .map(|p| p.namespaces().any(|pns| pns.name() == ns.name() && pns.uri() == ns.uri()))
                .unwrap_or(false);
            if !inherited {
                let key = match ns.name() {
                    Some(prefix) => format!("xmlns:{}", prefix),
                    None => "xmlns".to_string(),
                };
                attrs.push((key, ns.uri().to_string()));
            }
        }

        for attr in node.attributes() {
            let key = match attr.namespace() {
                Some(XML_NS) => format!("xml:{}", attr.name()),
                Some(uri) => match node.lookup_prefix(uri) {
                    Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, attr.name()),
                    _ => attr.name().to_string(),
                },
                None => attr.name().to_string(),
            };
            attrs.push((key, attr.value().to_string()));
        }

        let tag_name = node.tag_name();
        let tag = match tag_name.namespace().and_then(|uri| node.lookup_prefix(uri)) {
            Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, tag_name.name()),
            _ => tag_name.name().to_string(),
        };

        let id = self.push(NodeKind::Element { tag, attrs }, parent);
        for child in node.children() {
            if child.is_element() {
                self.copy_element(child, Some(id));
            } else if child.is_text() {
                if let Some(text) = child.text() {
                    self.push(NodeKind::Text(text.to_string()), Some(id));
                }
            }
        }
        id
    }
}

// ============================================================================
// TREE ACCESS
// ============================================================================

impl SvgDocument {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::Element { .. })
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).iter().copied().filter(|&c| self.is_element(c)).collect()
    }

    /// Element descendants of `id` in document order, `id` excluded
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            if self.is_element(next) {
                out.push(next);
                stack.extend(self.children(next).iter().rev().copied());
            }
        }
        out
    }

    /// Descendants whose tag is one of `tags`
    pub fn find_all(&self, id: NodeId, tags: &[&str]) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&n| self.tag(n).map(|t| tags.contains(&t)).unwrap_or(false))
            .collect()
    }

    /// `id` itself if it matches, else its first matching descendant
    pub fn find_first(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        if self.tag(id) == Some(tag) {
            return Some(id);
        }
        self.descendants(id).into_iter().find(|&n| self.tag(n) == Some(tag))
    }

    pub fn attrs(&self, id: NodeId) -> &[(String, String)] {
        match &self.nodes[id.0].kind {
            NodeKind::Element { attrs, .. } => attrs,
            NodeKind::Text(_) => &[],
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attrs(id).iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.nodes[id.0].kind {
            match attrs.iter_mut().find(|(k, _)| k == name) {
                Some((_, v)) => *v = value.to_string(),
                None => attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    /// Remove an attribute, returning its old value
    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Option<String> {
        if let NodeKind::Element { attrs, .. } = &mut self.nodes[id.0].kind {
            let pos = attrs.iter().position(|(k, _)| k == name)?;
            return Some(attrs.remove(pos).1);
        }
        None
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        match &self.nodes[id.0].kind {
            NodeKind::Text(text) => text.clone(),
            NodeKind::Element { .. } => {
                self.children(id).iter().map(|&c| self.text_content(c)).collect()
            }
        }
    }

    /// Replace all children with a single text node, reusing an existing
    /// text child so repeated updates do not grow the arena
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        if let NodeKind::Text(t) = &mut self.nodes[id.0].kind {
            *t = text.to_string();
            return;
        }
        let children = std::mem::take(&mut self.nodes[id.0].children);
        let reused = children
            .iter()
            .copied()
            .find(|&c| matches!(self.nodes[c.0].kind, NodeKind::Text(_)));
        for &child in &children {
            if Some(child) != reused {
                self.nodes[child.0].parent = None;
            }
        }
        match reused {
            Some(node) => {
                self.nodes[node.0].kind = NodeKind::Text(text.to_string());
                self.nodes[id.0].children.push(node);
            }
            None => {
                self.push(NodeKind::Text(text.to_string()), Some(id));
            }
        }
    }

    /// Number of nodes ever allocated, attached or not
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

// ============================================================================
// TREE EDITING
// ============================================================================

impl SvgDocument {
    /// New detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element { tag: tag.to_string(), attrs: Vec::new() }, None)
    }

    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Put a new `tag` element where `id` sits and move `id` inside it
    pub fn wrap(&mut self, id: NodeId, tag: &str) -> NodeId {
        let group = self.create_element(tag);
        if let Some(parent) = self.nodes[id.0].parent {
            if let Some(pos) = self.nodes[parent.0].children.iter().position(|&c| c == id) {
                self.nodes[parent.0].children[pos] = group;
                self.nodes[group.0].parent = Some(parent);
                self.nodes[id.0].parent = None;
            }
        }
        self.append_child(group, id);
        group
    }
}

// ============================================================================
// INLINE STYLE
// ============================================================================

/// Split a `style` attribute into property/value pairs
pub fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            let prop = prop.trim();
            if prop.is_empty() {
                return None;
            }
            Some((prop.to_string(), value.trim().to_string()))
        })
        .collect()
}

pub fn serialize_style(decls: &[(String, String)]) -> String {
    decls
        .iter()
        .map(|(p, v)| format!("{}: {};", p, v))
        .collect::<Vec<_>>()
        .join(" ")
}

impl SvgDocument {
    pub fn style(&self, id: NodeId, prop: &str) -> Option<String> {
        let style = self.attr(id, "style")?;
        parse_style(style).into_iter().find(|(p, _)| p == prop).map(|(_, v)| v)
    }

    pub fn set_style(&mut self, id: NodeId, prop: &str, value: &str) {
        let mut decls = self.attr(id, "style").map(parse_style).unwrap_or_default();
        match decls.iter_mut().find(|(p, _)| p == prop) {
            Some((_, v)) => *v = value.to_string(),
            None => decls.push((prop.to_string(), value.to_string())),
        }
        self.set_attr(id, "style", &serialize_style(&decls));
    }

    /// Drop one declaration; an emptied `style` attribute goes away too
    pub fn remove_style(&mut self, id: NodeId, prop: &str) {
        let Some(style) = self.attr(id, "style") else {
            return;
        };
        let mut decls = parse_style(style);
        decls.retain(|(p, _)| p != prop);
        if decls.is_empty() {
            self.remove_attr(id, "style");
        } else {
            self.set_attr(id, "style", &serialize_style(&decls));
        }
    }
}

// ============================================================================
// SERIALIZATION
// ============================================================================

impl SvgDocument {
    fn write_node(&self, writer: &mut Writer<Vec<u8>>, id: NodeId) -> Result<(), SvgError> {
        let write_err = |e: quick_xml::Error| SvgError::Write(e.to_string());
        match &self.nodes[id.0].kind {
            NodeKind::Text(text) => {
                writer.write_event(Event::Text(BytesText::new(text))).map_err(write_err)?;
            }
            NodeKind::Element { tag, attrs } => {
                let mut start = BytesStart::new(tag.as_str());
                for (k, v) in attrs {
                    start.push_attribute((k.as_str(), v.as_str()));
                }
                let children = &self.nodes[id.0].children;
                if children.is_empty() {
                    writer.write_event(Event::Empty(start)).map_err(write_err)?;
                } else {
                    writer.write_event(Event::Start(start)).map_err(write_err)?;
                    for &child in children {
                        self.write_node(writer, child)?;
                    }
                    writer
                        .write_event(Event::End(BytesEnd::new(tag.as_str())))
                        .map_err(write_err)?;
                }
            }
        }
        Ok(())
    }

    fn finish(writer: Writer<Vec<u8>>) -> Result<String, SvgError> {
        String::from_utf8(writer.into_inner()).map_err(|e| SvgError::Write(e.to_string()))
    }

    /// Markup of `id` including its own tag
    pub fn outer_markup(&self, id: NodeId) -> Result<String, SvgError> {
        let mut writer = Writer::new(Vec::new());
        self.write_node(&mut writer, id)?;
        Self::finish(writer)
    }

    /// Markup of the children of `id`
    pub fn inner_markup(&self, id: NodeId) -> Result<String, SvgError> {
        let mut writer = Writer::new(Vec::new());
        for &child in self.children(id) {
            self.write_node(&mut writer, child)?;
        }
        Self::finish(writer)
    }

    pub fn to_markup(&self) -> Result<String, SvgError> {
        self.outer_markup(self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" viewBox="0 0 100 100">
<style>.a{fill:red}</style>
<g id="grp"><rect id="bar" x="1" y="2" width="3" height="4"/><use xlink:href="#bar"/></g>
<text id="label" x="5" y="6">Rev &amp; {{Revenue}}</text>
</svg>"##;

    fn find_by_id(doc: &SvgDocument, id: &str) -> NodeId {
        doc.descendants(doc.root())
            .into_iter()
            .find(|&n| doc.attr(n, "id") == Some(id))
            .unwrap()
    }

    #[test]
    fn test_parse_and_query() {
        let doc = SvgDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.tag(doc.root()), Some("svg"));
        let rect = find_by_id(&doc, "bar");
        assert_eq!(doc.tag(rect), Some("rect"));
        assert_eq!(doc.attr(rect, "width"), Some("3"));
        let label = find_by_id(&doc, "label");
        assert_eq!(doc.text_content(label), "Rev & {{Revenue}}");
        assert_eq!(doc.find_all(doc.root(), &["rect", "use"]).len(), 2);
    }

    #[test]
    fn test_round_trip_keeps_namespaces() {
        let doc = SvgDocument::parse(SAMPLE).unwrap();
        let out = doc.to_markup().unwrap();
        assert!(out.starts_with("<svg "));
        assert!(out.contains(r#"xmlns="http://www.w3.org/2000/svg""#));
        assert!(out.contains(r#"xmlns:xlink="http://www.w3.org/1999/xlink""#));
        assert!(out.contains(r##"<use xlink:href="#bar"/>"##));
        assert!(out.contains("Rev &amp; {{Revenue}}"));
        let again = SvgDocument::parse(&out).unwrap();
        assert_eq!(again.to_markup().unwrap(), out);
    }

    #[test]
    fn test_invalid_xml() {
        assert!(matches!(SvgDocument::parse("<svg><g></svg>"), Err(SvgError::Xml(_))));
    }

    #[test]
    fn test_wrap_keeps_position() {
        let mut doc = SvgDocument::parse(SAMPLE).unwrap();
        let grp = find_by_id(&doc, "grp");
        let rect = find_by_id(&doc, "bar");
        let wrapper = doc.wrap(rect, "g");
        assert_eq!(doc.children(grp)[0], wrapper);
        assert_eq!(doc.parent(rect), Some(wrapper));
        assert_eq!(doc.parent(wrapper), Some(grp));
        assert_eq!(doc.children(wrapper).to_vec(), vec![rect]);
    }

    #[test]
    fn test_set_text_content_and_style() {
        let mut doc = SvgDocument::parse(SAMPLE).unwrap();
        let label = find_by_id(&doc, "label");
        doc.set_text_content(label, "Rev: 180,435");
        assert_eq!(doc.text_content(label), "Rev: 180,435");

        doc.set_style(label, "opacity", "0.5");
        doc.set_style(label, "fill", "red");
        doc.set_style(label, "opacity", "1");
        assert_eq!(doc.attr(label, "style"), Some("opacity: 1; fill: red;"));
        assert_eq!(doc.style(label, "fill").as_deref(), Some("red"));
        assert_eq!(doc.remove_attr(label, "x").as_deref(), Some("5"));
        assert!(!doc.has_attr(label, "x"));
    }

    #[test]
    fn test_repeated_text_updates_reuse_node() {
        let mut doc = SvgDocument::parse("<svg><text>{{Revenue}}</text></svg>").unwrap();
        let text = doc.element_children(doc.root())[0];
        let before = doc.node_count();
        for i in 0..1000 {
            doc.set_text_content(text, &i.to_string());
        }
        assert_eq!(doc.node_count(), before);
        assert_eq!(doc.text_content(text), "999");
        assert_eq!(doc.children(text).len(), 1);

        // Element children are dropped, the first text node is kept
        let mut doc = SvgDocument::parse("<svg><text>a<tspan>b</tspan>c</text></svg>").unwrap();
        let text = doc.element_children(doc.root())[0];
        let before = doc.node_count();
        doc.set_text_content(text, "x");
        doc.set_text_content(text, "y");
        assert_eq!(doc.node_count(), before);
        assert_eq!(doc.element_children(text).len(), 0);
        assert_eq!(doc.text_content(text), "y");
    }

    #[test]
    fn test_parse_style() {
        assert_eq!(
            parse_style("fill:#fff; stroke : none;;bad"),
            vec![("fill".to_string(), "#fff".to_string()), ("stroke".to_string(), "none".to_string())]
        );
    }
}
