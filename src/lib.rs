/*!
# Indenting XML writer for SAX-style events

This crate renders a stream of SAX-style document events as human-readable,
indented XML 1.0 text.

## Features

* Streaming: one pass over the events, memory bounded by the nesting depth
  and the number of active prefix mappings (plus the output buffer)
* Namespace declarations synthesized from prefix mappings, prefixes
  reconstructed from namespace URIs
* Configurable indentation and line breaks
* Two layouts: one attribute per line with collapsed empty elements
  ([`Layout::Collapse`]), or attributes inline ([`Layout::Readable`])
* Line breaks in text normalized and re-indented
* Optional pretty printing of XML text through `roxmltree` (the `roxmltree`
  feature, enabled by default)

## Example

```
use prettysax::{EventSink, XmlWriter};

let mut w = XmlWriter::new();
w.start_document().unwrap();
w.start_element("", "root", "root", &[]).unwrap();
w.characters("hello").unwrap();
w.end_element("", "root", "root").unwrap();
w.end_document().unwrap();
assert_eq!(
	w.into_string(),
	"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\r\n<root>\r\n\thello\r\n</root>\r\n",
);
```

## High-level usage

### Writing events

Producers call the [`EventSink`] methods of an [`XmlWriter`] in document
order, or pass [`Event`] values to [`EventSink::write_event`]. The output is
collected in memory; use [`XmlWriter::take_bytes`] to stream it out while
the document is being written.

### Pretty printing text

[`indent_str`] and [`indent_reader`] parse a document and feed it through a
writer. The [`driver`] module has the building blocks to feed other sinks,
and [`equals_structurally`] compares documents regardless of formatting.

### Watching events

A [`Tee`] passes events on to another sink and keeps an unformatted echo of
them for debugging.
*/
pub mod chars;
pub mod error;
pub mod event;
pub mod namespaces;
pub mod tee;
pub mod writer;

#[cfg(feature = "roxmltree")]
pub mod driver;


#[doc(inline)]
pub use error::{Error, Result, ValidationError};
#[doc(inline)]
pub use event::{Attribute, Event, XMLNS_XML, XMLNS_XMLNS};
#[doc(inline)]
pub use namespaces::PrefixIndex;
#[doc(inline)]
pub use tee::Tee;
#[doc(inline)]
pub use writer::{Layout, LineBreak, WriterOptions, XmlWriter};

#[cfg(feature = "roxmltree")]
#[doc(inline)]
pub use driver::{
	emit_document, emit_str, equals_structurally, indent_reader, indent_str, DriverOptions,
};

pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

/**
# Sink for individual XML events

This trait is implemented by consumers of document events, most notably the
[`XmlWriter`]. It is the counterpart of a SAX content handler: one method
per kind of [`Event`], called in document order.

Errors are fatal for the document being written.
*/
pub trait EventSink {
	/// Begin a new document.
	fn start_document(&mut self) -> Result<()>;

	/// Finish the current document.
	fn end_document(&mut self) -> Result<()>;

	/// Begin the scope of a prefix mapping.
	///
	/// Called before the [`EventSink::start_element`] of the element which
	/// declares the mapping. The empty prefix denotes the default namespace.
	fn start_prefix_mapping(&mut self, prefix: &str, uri: &str) -> Result<()>;

	/// End the scope of a prefix mapping.
	///
	/// Called after the [`EventSink::end_element`] of the element which
	/// declared the mapping.
	fn end_prefix_mapping(&mut self, prefix: &str) -> Result<()>;

	/// Begin an element.
	///
	/// Empty strings stand for absent parts of the name triple. If the
	/// qualified name is empty, it is reconstructed from the namespace URI.
	fn start_element(
		&mut self,
		uri: &str,
		local_name: &str,
		qualified_name: &str,
		attributes: &[Attribute<'_>],
	) -> Result<()>;

	/// End the innermost element.
	fn end_element(&mut self, uri: &str, local_name: &str, qualified_name: &str) -> Result<()>;

	/// Character data, possibly split over multiple calls.
	fn characters(&mut self, text: &str) -> Result<()>;

	/// A processing instruction.
	fn processing_instruction(&mut self, target: &str, data: &str) -> Result<()>;

	/// Whitespace which a validating parser considered insignificant.
	///
	/// Ignored by default.
	fn ignorable_whitespace(&mut self, _text: &str) -> Result<()> {
		Ok(())
	}

	/// An entity which was not expanded.
	///
	/// Ignored by default.
	fn skipped_entity(&mut self, _name: &str) -> Result<()> {
		Ok(())
	}

	/// Dispatch a single [`Event`] to the matching method.
	fn write_event(&mut self, ev: &Event<'_>) -> Result<()> {
		log::trace!("dispatching {}", ev.name());
		match *ev {
			Event::StartDocument => self.start_document(),
			Event::EndDocument => self.end_document(),
			Event::StartElement {
				uri,
				local_name,
				qualified_name,
				attributes,
			} => self.start_element(uri, local_name, qualified_name, attributes),
			Event::EndElement {
				uri,
				local_name,
				qualified_name,
			} => self.end_element(uri, local_name, qualified_name),
			Event::StartPrefixMapping { prefix, uri } => self.start_prefix_mapping(prefix, uri),
			Event::EndPrefixMapping { prefix } => self.end_prefix_mapping(prefix),
			Event::Characters { text } => self.characters(text),
			Event::ProcessingInstruction { target, data } => {
				self.processing_instruction(target, data)
			}
			Event::IgnorableWhitespace { text } => self.ignorable_whitespace(text),
			Event::SkippedEntity { name } => self.skipped_entity(name),
		}
	}

	/// Dispatch all events in order, stopping at the first error.
	fn write_all<'x, 'a: 'x, I>(&mut self, events: I) -> Result<()>
	where
		I: IntoIterator<Item = &'x Event<'a>>,
		Self: Sized,
	{
		for ev in events {
			self.write_event(ev)?;
		}
		Ok(())
	}
}
