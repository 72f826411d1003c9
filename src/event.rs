/*!
# SAX-style document events

The term *Event* is borrowed from SAX terminology. Each [`Event`] describes
one structural part of an XML document, in document order. Events borrow
their strings from whoever produces them; the writer copies what it needs
into its output buffer right away.
*/

/// XML namespace URI of pseudo-attributes which declare namespaces.
///
/// Attributes with this namespace URI are never written as attributes;
/// namespace declarations are synthesized from the prefix mappings instead.
pub const XMLNS_XMLNS: &'static str = "http://www.w3.org/2000/xmlns/";

/// XML namespace URI which is permanently bound to the `xml` prefix.
pub const XMLNS_XML: &'static str = "http://www.w3.org/XML/1998/namespace";

/// A single attribute of a [`Event::StartElement`].
///
/// Empty strings stand for absent parts of the name triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Attribute<'a> {
	/// Namespace URI, or empty for unnamespaced attributes.
	pub uri: &'a str,
	/// Local part of the name.
	pub local_name: &'a str,
	/// Qualified name as it appeared in the source, possibly empty.
	pub qualified_name: &'a str,
	/// Unescaped attribute value.
	pub value: &'a str,
}

impl<'a> Attribute<'a> {
	/// Create an unnamespaced attribute.
	///
	/// ```
	/// use prettysax::Attribute;
	/// let attr = Attribute::new("id", "1");
	/// assert_eq!(attr.qualified_name, "id");
	/// assert_eq!(attr.uri, "");
	/// ```
	pub fn new(name: &'a str, value: &'a str) -> Self {
		Self {
			uri: "",
			local_name: name,
			qualified_name: name,
			value,
		}
	}

	/// Create a namespaced attribute without a qualified name.
	///
	/// The prefix is resolved from the active prefix mappings when the
	/// attribute is written.
	pub fn namespaced(uri: &'a str, local_name: &'a str, value: &'a str) -> Self {
		Self {
			uri,
			local_name,
			qualified_name: "",
			value,
		}
	}

	/// Whether this attribute is a namespace declaration pseudo-attribute.
	pub fn is_namespace_declaration(&self) -> bool {
		self.uri == XMLNS_XMLNS
	}
}

/// One structural notification about an XML document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
	/// Start of the document; must precede all other events.
	StartDocument,

	/// End of the document; must follow all other events.
	EndDocument,

	/// Start of an element.
	StartElement {
		/// Namespace URI, or empty.
		uri: &'a str,
		/// Local part of the name.
		local_name: &'a str,
		/// Qualified name, possibly empty.
		qualified_name: &'a str,
		/// Attributes in document order.
		attributes: &'a [Attribute<'a>],
	},

	/// End of an element.
	EndElement {
		uri: &'a str,
		local_name: &'a str,
		qualified_name: &'a str,
	},

	/// Begin the scope of a prefix-to-URI binding.
	///
	/// Mappings are reported before the [`Event::StartElement`] on which
	/// they are declared. The empty prefix denotes the default namespace.
	StartPrefixMapping { prefix: &'a str, uri: &'a str },

	/// End the scope of a prefix-to-URI binding.
	EndPrefixMapping { prefix: &'a str },

	/// Character data.
	///
	/// **Note:** Producers may split one run of text into multiple
	/// consecutive `Characters` events.
	Characters { text: &'a str },

	/// A processing instruction.
	ProcessingInstruction { target: &'a str, data: &'a str },

	/// Whitespace in element content which a validating parser determined
	/// to be insignificant.
	IgnorableWhitespace { text: &'a str },

	/// An entity the parser did not expand.
	SkippedEntity { name: &'a str },
}

impl<'a> Event<'a> {
	/// Start of an unnamespaced element.
	pub fn start(name: &'a str, attributes: &'a [Attribute<'a>]) -> Self {
		Event::StartElement {
			uri: "",
			local_name: name,
			qualified_name: name,
			attributes,
		}
	}

	/// End of an unnamespaced element.
	pub fn end(name: &'a str) -> Self {
		Event::EndElement {
			uri: "",
			local_name: name,
			qualified_name: name,
		}
	}

	/// Character data.
	pub fn text(text: &'a str) -> Self {
		Event::Characters { text }
	}

	/// Return a short name of the event kind, for logging.
	pub fn name(&self) -> &'static str {
		match self {
			Self::StartDocument => "StartDocument",
			Self::EndDocument => "EndDocument",
			Self::StartElement { .. } => "StartElement",
			Self::EndElement { .. } => "EndElement",
			Self::StartPrefixMapping { .. } => "StartPrefixMapping",
			Self::EndPrefixMapping { .. } => "EndPrefixMapping",
			Self::Characters { .. } => "Characters",
			Self::ProcessingInstruction { .. } => "ProcessingInstruction",
			Self::IgnorableWhitespace { .. } => "IgnorableWhitespace",
			Self::SkippedEntity { .. } => "SkippedEntity",
		}
	}
}
