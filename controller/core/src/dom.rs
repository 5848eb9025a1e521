//! In-Memory Page Model
//!
//! The page the controller enhances. Markup is produced externally; the
//! controller only reads it, attaches listeners, toggles classes and inline
//! styles, and appends/removes its own notification elements.
//!
//! # Design Philosophy
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Removing a node
//! detaches it from its parent but never reuses the slot, so a stale
//! [`NodeId`] held by a timer or listener can never alias a newer element.
//!
//! The page is shared through [`PageHandle`]. No lock is held while a
//! listener or ready continuation runs, so handlers are free to lock the page
//! again.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::events::{EventKind, Listener, ListenerRegistry};
use crate::ready::{Continuation, ReadyGate};

/// Arena index of a page element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Document loading state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadyState {
    /// Markup still streaming in; DOM wiring must wait
    #[default]
    Loading,
    /// Markup parsed, subresources may still load
    Interactive,
    /// Everything loaded
    Complete,
}

impl ReadyState {
    /// Whether DOM-dependent setup may run
    #[must_use]
    pub fn is_loading(self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// A page element
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    /// Tag name, lowercase
    pub tag: String,
    /// `id` attribute
    pub id: Option<String>,
    /// Class list, in insertion order, no duplicates
    pub classes: Vec<String>,
    /// Inline style properties
    pub style: BTreeMap<String, String>,
    /// Text content
    pub text: String,
    /// Form control value (inputs, textareas)
    pub value: String,
}

impl Element {
    /// Create an element with the given tag
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_lowercase(),
            ..Default::default()
        }
    }

    /// Set the `id` attribute
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a class
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.add_class(class);
        self
    }

    /// Set text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set form value
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Add a class if not already present
    pub fn add_class(&mut self, class: impl Into<String>) {
        let class = class.into();
        if !self.has_class(&class) {
            self.classes.push(class);
        }
    }

    /// Check class membership
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Read an inline style property
    #[must_use]
    pub fn style_value(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }
}

#[derive(Clone, Debug)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    element: Element,
}

/// The page: element arena, ready gate and listener registry
pub struct Page {
    nodes: Vec<Node>,
    body: NodeId,
    id_index: HashMap<String, NodeId>,
    ready_state: ReadyState,
    gate: ReadyGate,
    listeners: ListenerRegistry,
}

impl Page {
    /// Create an empty page with a `body` root
    #[must_use]
    pub fn new(ready_state: ReadyState) -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                element: Element::new("body"),
            }],
            body: NodeId(0),
            id_index: HashMap::new(),
            ready_state,
            gate: ReadyGate::new(ready_state),
            listeners: ListenerRegistry::default(),
        }
    }

    /// The body element
    #[must_use]
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Current loading state
    #[must_use]
    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    /// Append an element under `parent`
    ///
    /// A duplicate `id` keeps the first element indexed, as browsers do for
    /// `getElementById`. An unknown `parent` leaves the new node detached.
    pub fn append(&mut self, parent: NodeId, element: Element) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = if parent.0 < self.nodes.len() {
            Some(parent)
        } else {
            tracing::warn!(parent = %parent, "Append to unknown parent, node left detached");
            None
        };
        if let Some(ref element_id) = element.id {
            if parent.is_some_and(|p| self.is_attached(p)) {
                self.id_index.entry(element_id.clone()).or_insert(id);
            }
        }
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            element,
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    /// Detach a node (and its subtree) from the page
    ///
    /// The arena slots stay reserved but their contents and listeners are
    /// dropped. Returns false if the node was not attached.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if id == self.body || !self.is_attached(id) {
            return false;
        }
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != id);
        }
        let mut detached = vec![id];
        let mut cursor = 0;
        while cursor < detached.len() {
            let children = std::mem::take(&mut self.nodes[detached[cursor].0].children);
            detached.extend(children);
            cursor += 1;
        }

        let stale_ids: Vec<String> = self
            .id_index
            .iter()
            .filter(|(_, node)| detached.contains(node))
            .map(|(key, _)| key.clone())
            .collect();
        for node in &detached {
            let slot = &mut self.nodes[node.0];
            slot.parent = None;
            slot.element = Element::new(std::mem::take(&mut slot.element.tag));
        }
        self.listeners.remove_nodes(&detached);

        // A later element with the same id takes over the index entry
        for key in stale_ids {
            self.id_index.remove(&key);
            let next = self
                .descendants(self.body)
                .into_iter()
                .find(|node| self.nodes[node.0].element.id.as_deref() == Some(key.as_str()));
            if let Some(next) = next {
                self.id_index.insert(key, next);
            }
        }
        true
    }

    /// Whether the node is reachable from the body
    #[must_use]
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == self.body {
                return true;
            }
            current = self.nodes.get(node.0).and_then(|n| n.parent);
        }
        false
    }

    /// Borrow an element
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id.0).map(|n| &n.element)
    }

    /// Mutably borrow an element
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(id.0).map(|n| &mut n.element)
    }

    /// Look up an attached element by `id` attribute
    #[must_use]
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index
            .get(id)
            .copied()
            .filter(|node| self.is_attached(*node))
    }

    /// All attached elements carrying `class`, in document order
    #[must_use]
    pub fn query_by_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .filter(|id| self.nodes[id.0].element.has_class(class))
            .collect()
    }

    /// First descendant of `root` with the given tag, in document order
    #[must_use]
    pub fn first_descendant_by_tag(&self, root: NodeId, tag: &str) -> Option<NodeId> {
        let tag = tag.to_lowercase();
        self.descendants(root)
            .into_iter()
            .find(|id| self.nodes[id.0].element.tag == tag)
    }

    /// Children of a node
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id.0).map_or(&[], |n| n.children.as_slice())
    }

    /// Text content of an element (empty for unknown nodes)
    #[must_use]
    pub fn text(&self, id: NodeId) -> &str {
        self.element(id).map_or("", |e| e.text.as_str())
    }

    /// Replace text content
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let Some(element) = self.element_mut(id) {
            element.text = text.into();
        }
    }

    /// Form control value (empty for unknown nodes)
    #[must_use]
    pub fn value(&self, id: NodeId) -> &str {
        self.element(id).map_or("", |e| e.value.as_str())
    }

    /// Replace a form control value
    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) {
        if let Some(element) = self.element_mut(id) {
            element.value = value.into();
        }
    }

    /// Add a class to an element
    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(element) = self.element_mut(id) {
            element.add_class(class);
        }
    }

    /// Set an inline style property
    pub fn set_style(&mut self, id: NodeId, property: &str, value: impl Into<String>) {
        if let Some(element) = self.element_mut(id) {
            element.style.insert(property.to_string(), value.into());
        }
    }

    /// Number of listeners registered for a node and event kind
    #[must_use]
    pub fn listener_count(&self, node: NodeId, kind: EventKind) -> usize {
        self.listeners.matching(node, kind).len()
    }

    /// Pre-order descendants of `root`, excluding `root` itself
    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(ReadyState::Complete)
    }
}

/// Shared handle to the page
///
/// Cloning is cheap; all clones refer to the same page.
#[derive(Clone)]
pub struct PageHandle {
    inner: Arc<Mutex<Page>>,
}

impl PageHandle {
    /// Wrap a page
    #[must_use]
    pub fn new(page: Page) -> Self {
        Self {
            inner: Arc::new(Mutex::new(page)),
        }
    }

    /// Run `f` with the page locked
    ///
    /// Never call back into listeners or the ready gate from inside `f`.
    pub fn with<R>(&self, f: impl FnOnce(&mut Page) -> R) -> R {
        let mut page = self.inner.lock();
        f(&mut page)
    }

    /// Register a listener; listeners for the same node and kind fire in
    /// registration order
    pub fn add_event_listener(&self, node: NodeId, kind: EventKind, listener: Listener) {
        self.with(|page| page.listeners.add(node, kind, listener));
    }

    /// Fire an event at a node
    ///
    /// Listeners run synchronously on the calling task. Returns how many ran.
    pub fn dispatch(&self, node: NodeId, kind: EventKind) -> usize {
        let listeners = self.with(|page| {
            if page.is_attached(node) {
                page.listeners.matching(node, kind)
            } else {
                Vec::new()
            }
        });
        for listener in &listeners {
            listener(self, node);
        }
        listeners.len()
    }

    /// Run `continuation` once the document is no longer loading
    ///
    /// Runs immediately if the page is already ready, otherwise it is queued
    /// until [`PageHandle::signal_ready`].
    pub fn when_ready(&self, continuation: Continuation) {
        let run_now = self.with(|page| page.gate.register(continuation));
        if let Some(continuation) = run_now {
            continuation(self);
        }
    }

    /// Deliver the document-ready signal
    ///
    /// Queued continuations run once, in registration order. Later signals
    /// are no-ops.
    pub fn signal_ready(&self) -> usize {
        let queued = self.with(|page| {
            if page.ready_state.is_loading() {
                page.ready_state = ReadyState::Interactive;
            }
            page.gate.open()
        });
        let count = queued.len();
        if count > 0 {
            tracing::debug!(continuations = count, "Document ready, running deferred setup");
        }
        for continuation in queued {
            continuation(self);
        }
        count
    }
}

impl Default for PageHandle {
    fn default() -> Self {
        Self::new(Page::default())
    }
}

impl std::fmt::Debug for PageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageHandle").finish_non_exhaustive()
    }
}
