/*!
Drive an [`EventSink`] from a parsed document.

The functions in this module walk a [`roxmltree::Document`] in document
order and report it to a sink, the way a SAX parser would report a file.
[`indent_str`] and [`indent_reader`] combine this with an [`XmlWriter`] to
pretty print XML text in one go.

```
let out = prettysax::indent_str(
	"<a xmlns='urn:x'><b>text</b><c/></a>",
	prettysax::WriterOptions::default(),
).unwrap();
assert_eq!(
	out,
	"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\r\n<a\r\n\txmlns=\"urn:x\">\r\n\t<b>\r\n\t\ttext\r\n\t</b>\r\n\t<c />\r\n</a>\r\n",
);
```

Comments are not reported. DTDs are rejected unless enabled through
[`DriverOptions::allow_dtd`].

   [`EventSink`]: crate::EventSink
*/
use std::borrow::Cow;
use std::io;

use roxmltree::{Document, Edge, Node};

use crate::error::{Error, Result};
use crate::event::Attribute;
use crate::namespaces::PREFIX_XML;
use crate::writer::{WriterOptions, XmlWriter};
use crate::EventSink;

/// Hold options to configure the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverOptions {
	/// Trim leading and trailing whitespace off text nodes and each of
	/// their lines, and drop text nodes which consist only of whitespace.
	///
	/// Whitespace between elements in the input would otherwise be
	/// reproduced on top of the indentation, so this is on by default.
	pub trim_text: bool,

	/// Accept documents with a DTD.
	///
	/// Entities declared in the DTD are expanded by the parser; the DTD
	/// itself is not reported.
	pub allow_dtd: bool,
}

impl DriverOptions {
	/// Set the [`DriverOptions::trim_text`] value.
	pub fn trim_text(mut self, v: bool) -> DriverOptions {
		self.trim_text = v;
		self
	}

	/// Set the [`DriverOptions::allow_dtd`] value.
	pub fn allow_dtd(mut self, v: bool) -> DriverOptions {
		self.allow_dtd = v;
		self
	}
}

impl Default for DriverOptions {
	fn default() -> Self {
		Self {
			trim_text: true,
			allow_dtd: false,
		}
	}
}

/// Return the prefix mappings which come into scope at `node`, in document
/// order.
fn declared_namespaces<'a, 'input: 'a>(node: Node<'a, 'input>) -> Vec<(&'a str, &'a str)> {
	let parent = node.parent_element();
	let mut result: Vec<(&'a str, &'a str)> = node
		.namespaces()
		.filter(|ns| ns.name() != Some(PREFIX_XML))
		.filter(|ns| match parent {
			Some(parent) => !parent
				.namespaces()
				.any(|pns| pns.name() == ns.name() && pns.uri() == ns.uri()),
			None => true,
		})
		.map(|ns| (ns.name().unwrap_or(""), ns.uri()))
		.collect();

	// xmlns="" removes the default namespace without declaring one
	if let Some(parent) = parent {
		let parent_has_default = parent.namespaces().any(|ns| ns.name().is_none());
		let has_default = node.namespaces().any(|ns| ns.name().is_none());
		if parent_has_default && !has_default {
			result.insert(0, ("", ""));
		}
	}
	result
}

/// Trim the text and each of its lines.
///
/// A writer indents continuation lines of text, so the indentation has to
/// go again when its output is read back.
fn trim_lines(text: &str) -> Cow<'_, str> {
	let text = text.trim();
	if !text.contains('\n') {
		return Cow::Borrowed(text);
	}
	let mut result = String::with_capacity(text.len());
	for (i, line) in text.lines().enumerate() {
		if i > 0 {
			result.push('\n');
		}
		result.push_str(line.trim());
	}
	Cow::Owned(result)
}

fn start_element<S: EventSink>(sink: &mut S, node: Node<'_, '_>) -> Result<()> {
	for (prefix, uri) in declared_namespaces(node) {
		sink.start_prefix_mapping(prefix, uri)?;
	}
	let attributes: Vec<Attribute<'_>> = node
		.attributes()
		.map(|attr| Attribute::namespaced(attr.namespace().unwrap_or(""), attr.name(), attr.value()))
		.collect();
	let tag = node.tag_name();
	sink.start_element(tag.namespace().unwrap_or(""), tag.name(), "", &attributes)
}

fn end_element<S: EventSink>(sink: &mut S, node: Node<'_, '_>) -> Result<()> {
	let tag = node.tag_name();
	sink.end_element(tag.namespace().unwrap_or(""), tag.name(), "")?;
	for (prefix, _) in declared_namespaces(node).into_iter().rev() {
		sink.end_prefix_mapping(prefix)?;
	}
	Ok(())
}

/**
Report the document to the sink.

The events start with [`EventSink::start_document`] and end with
[`EventSink::end_document`]. Elements carry no qualified names, so a writer
reconstructs prefixes from the reported prefix mappings.

The walk does not recurse, so deeply nested documents are fine.
*/
pub fn emit_document<S: EventSink>(doc: &Document<'_>, sink: &mut S, opts: &DriverOptions) -> Result<()> {
	sink.start_document()?;
	for edge in doc.root().traverse() {
		match edge {
			Edge::Open(node) if node.is_element() => start_element(sink, node)?,
			Edge::Close(node) if node.is_element() => end_element(sink, node)?,
			Edge::Open(node) if node.is_text() => {
				let text = node.text().unwrap_or("");
				if opts.trim_text {
					let text = trim_lines(text);
					if !text.is_empty() {
						sink.characters(&text)?;
					}
				} else {
					sink.characters(text)?;
				}
			}
			Edge::Open(node) => {
				if let Some(pi) = node.pi() {
					sink.processing_instruction(pi.target, pi.value.unwrap_or(""))?;
				}
			}
			Edge::Close(_) => (),
		}
	}
	sink.end_document()
}

/// Parse `input` with the given driver options and report it to `sink`.
pub fn emit_str<S: EventSink>(input: &str, sink: &mut S, opts: &DriverOptions) -> Result<()> {
	let mut parse_opts = roxmltree::ParsingOptions::default();
	parse_opts.allow_dtd = opts.allow_dtd;
	let doc = Document::parse_with_options(input, parse_opts)?;
	emit_document(&doc, sink, opts)
}

/**
Pretty print an XML document.

Whitespace-only text between elements is dropped and other text is trimmed
line by line (see [`DriverOptions::trim_text`]), so pretty printing the
output again yields the same text.

# Errors

[`Error::Parse`] if the input is not well-formed, and the writer's errors
for content which cannot be represented.
*/
pub fn indent_str(input: &str, opts: WriterOptions) -> Result<String> {
	let mut writer = XmlWriter::with_options(opts);
	emit_str(input, &mut writer, &DriverOptions::default())?;
	Ok(writer.into_string())
}

/// Read the whole source and pretty print it, see [`indent_str`].
///
/// Input which is not valid UTF-8 is reported as [`Error::IO`].
pub fn indent_reader<R: io::Read>(mut r: R, opts: WriterOptions) -> Result<String> {
	let mut input = String::new();
	r.read_to_string(&mut input).map_err(Error::io)?;
	indent_str(&input, opts)
}

/// Formatting-independent view of one node.
#[derive(Debug, PartialEq)]
enum Item<'a> {
	Open {
		uri: &'a str,
		name: &'a str,
		attributes: Vec<(&'a str, &'a str, &'a str)>,
	},
	Close,
	Text(String),
	ProcessingInstruction(&'a str, &'a str),
}

fn flush_text<'a>(items: &mut Vec<Item<'a>>, pending: &mut String) {
	let text = trim_lines(pending);
	if !text.is_empty() {
		items.push(Item::Text(text.into_owned()));
	}
	pending.clear();
}

fn flatten<'a, 'input: 'a>(doc: &'a Document<'input>) -> Vec<Item<'a>> {
	let mut items = Vec::new();
	let mut pending = String::new();
	for edge in doc.root().traverse() {
		match edge {
			Edge::Open(node) if node.is_text() => pending.push_str(node.text().unwrap_or("")),
			Edge::Open(node) if node.is_comment() => (),
			Edge::Open(node) if node.is_element() => {
				flush_text(&mut items, &mut pending);
				let mut attributes: Vec<(&'a str, &'a str, &'a str)> = node
					.attributes()
					.map(|attr| (attr.namespace().unwrap_or(""), attr.name(), attr.value()))
					.collect();
				attributes.sort();
				let tag = node.tag_name();
				items.push(Item::Open {
					uri: tag.namespace().unwrap_or(""),
					name: tag.name(),
					attributes,
				});
			}
			Edge::Close(node) if node.is_element() => {
				flush_text(&mut items, &mut pending);
				items.push(Item::Close);
			}
			Edge::Open(node) => {
				if let Some(pi) = node.pi() {
					flush_text(&mut items, &mut pending);
					items.push(Item::ProcessingInstruction(
						pi.target,
						pi.value.unwrap_or("").trim(),
					));
				}
			}
			Edge::Close(_) => (),
		}
	}
	flush_text(&mut items, &mut pending);
	items
}

/**
Compare two documents structurally.

Two documents are equal if they have the same elements (by namespace URI and
local name), the same attributes (in any order) and the same processing
instructions, in the same order. Namespace prefixes and comments do not
matter. Text nodes next to each other are merged, whitespace-only text is
ignored, and the remaining text is compared after trimming each line. This
makes a document equal to its pretty printed form.

```
assert!(prettysax::driver::equals_structurally(
	"<a xmlns='urn:x'><b k='v'>text</b></a>",
	"<p:a xmlns:p='urn:x'>\n  <p:b k=\"v\">\n    text\n  </p:b>\n</p:a>",
).unwrap());
```

# Errors

[`Error::Parse`] if either input is not well-formed.
*/
pub fn equals_structurally(a: &str, b: &str) -> Result<bool> {
	let a = Document::parse(a)?;
	let b = Document::parse(b)?;
	Ok(flatten(&a) == flatten(&b))
}
