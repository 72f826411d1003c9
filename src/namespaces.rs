/*!
# Scoped namespace prefix bookkeeping

The [`PrefixIndex`] mirrors the prefix mappings reported by a SAX-style
producer. Each mapping is pushed when its scope starts and popped when it
ends, so shadowed bindings become visible again as elements close.
*/
use std::collections::HashMap;

use smartstring::alias::String as SmartString;

use crate::event::XMLNS_XML;

/// Prefix which is permanently bound to [`XMLNS_XML`].
pub const PREFIX_XML: &'static str = "xml";

fn push(index: &mut HashMap<SmartString, Vec<SmartString>>, key: &str, value: &str) {
	index
		.entry(SmartString::from(key))
		.or_insert_with(Vec::new)
		.push(SmartString::from(value));
}

fn pop(index: &mut HashMap<SmartString, Vec<SmartString>>, key: &str) -> Option<SmartString> {
	let stack = index.get_mut(key)?;
	let value = stack.pop();
	if stack.is_empty() {
		index.remove(key);
	}
	value
}

/// Remove the topmost occurrence of `value` from the stack under `key`.
fn remove(index: &mut HashMap<SmartString, Vec<SmartString>>, key: &str, value: &str) {
	let stack = match index.get_mut(key) {
		Some(v) => v,
		None => return,
	};
	if let Some(pos) = stack.iter().rposition(|x| x.as_str() == value) {
		stack.remove(pos);
	}
	if stack.is_empty() {
		index.remove(key);
	}
}

fn peek<'x>(index: &'x HashMap<SmartString, Vec<SmartString>>, key: &str) -> Option<&'x str> {
	index.get(key).and_then(|stack| stack.last()).map(|v| v.as_str())
}

/**
Bidirectional stack of namespace prefix bindings.

Two mappings are kept: `prefix -> stack of URIs` and `URI -> stack of
prefixes`. Binding pushes onto both, unbinding pops the prefix's URI and
removes the matching entry from the URI's stack. Keys whose stack runs empty
are removed.

The index also remembers which prefixes have been bound since the last call
to [`PrefixIndex::take_new_declarations`], so that the element which
introduces them can declare them.

```
use prettysax::namespaces::PrefixIndex;

let mut idx = PrefixIndex::new();
idx.bind("p", "urn:a");
idx.bind("p", "urn:b");
assert_eq!(idx.uri_for("p"), Some("urn:b"));
assert_eq!(idx.prefix_for("urn:a"), None);
idx.unbind("p");
assert_eq!(idx.uri_for("p"), Some("urn:a"));
assert_eq!(idx.prefix_for("urn:a"), Some("p"));
```
*/
#[derive(Debug, Clone, Default)]
pub struct PrefixIndex {
	uris_by_prefix: HashMap<SmartString, Vec<SmartString>>,
	prefixes_by_uri: HashMap<SmartString, Vec<SmartString>>,
	// ordered set; rebinding moves a prefix to the end
	new_prefixes: Vec<SmartString>,
}

impl PrefixIndex {
	pub fn new() -> Self {
		Self::default()
	}

	/// Begin the scope of a binding from `prefix` to `uri`.
	///
	/// The empty prefix stands for the default namespace.
	pub fn bind(&mut self, prefix: &str, uri: &str) {
		push(&mut self.uris_by_prefix, prefix, uri);
		push(&mut self.prefixes_by_uri, uri, prefix);
		self.new_prefixes.retain(|p| p.as_str() != prefix);
		self.new_prefixes.push(SmartString::from(prefix));
	}

	/// End the scope of the innermost binding of `prefix`.
	///
	/// Returns the URI the prefix was bound to. Unbinding a prefix which is
	/// not bound is tolerated and returns `None`.
	pub fn unbind(&mut self, prefix: &str) -> Option<SmartString> {
		let uri = match pop(&mut self.uris_by_prefix, prefix) {
			Some(uri) => uri,
			None => {
				log::debug!("ignoring end of mapping for unbound prefix {:?}", prefix);
				return None;
			}
		};
		remove(&mut self.prefixes_by_uri, &uri, prefix);
		Some(uri)
	}

	/// Return the innermost URI bound to `prefix`.
	pub fn uri_for(&self, prefix: &str) -> Option<&str> {
		match peek(&self.uris_by_prefix, prefix) {
			Some(uri) => Some(uri),
			None if prefix == PREFIX_XML => Some(XMLNS_XML),
			None => None,
		}
	}

	fn find_prefix(&self, uri: &str, allow_default: bool) -> Option<&str> {
		let found = self.prefixes_by_uri.get(uri).and_then(|stack| {
			stack
				.iter()
				.rev()
				.map(|p| p.as_str())
				.filter(|p| allow_default || !p.is_empty())
				// a prefix re-bound in an inner scope no longer denotes `uri`
				.find(|p| peek(&self.uris_by_prefix, p) == Some(uri))
		});
		match found {
			Some(prefix) => Some(prefix),
			None if uri == XMLNS_XML => Some(PREFIX_XML),
			None => None,
		}
	}

	/// Return the innermost active prefix bound to `uri`.
	///
	/// The empty string is returned if `uri` is the innermost default
	/// namespace.
	pub fn prefix_for(&self, uri: &str) -> Option<&str> {
		self.find_prefix(uri, true)
	}

	/// Return the innermost active non-empty prefix bound to `uri`.
	///
	/// Unprefixed attributes have no namespace, so the default namespace
	/// cannot be used to qualify them.
	pub fn attribute_prefix_for(&self, uri: &str) -> Option<&str> {
		self.find_prefix(uri, false)
	}

	/// Drain the prefixes bound since the last call, paired with their
	/// current URI, in the order they were bound.
	///
	/// Prefixes whose binding has ended in the meantime are skipped.
	pub fn take_new_declarations(&mut self) -> Vec<(SmartString, SmartString)> {
		let mut result = Vec::with_capacity(self.new_prefixes.len());
		for prefix in self.new_prefixes.drain(..) {
			if let Some(uri) = peek(&self.uris_by_prefix, &prefix) {
				let uri = SmartString::from(uri);
				result.push((prefix, uri));
			}
		}
		result
	}

	/// Whether any prefix is currently bound.
	pub fn is_empty(&self) -> bool {
		self.uris_by_prefix.is_empty()
	}

	/// Forget all bindings.
	pub fn clear(&mut self) {
		self.uris_by_prefix.clear();
		self.prefixes_by_uri.clear();
		self.new_prefixes.clear();
	}
}
