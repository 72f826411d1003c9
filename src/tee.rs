/*!
Forward events to another sink while keeping a raw echo of them.

```
use prettysax::{EventSink, Tee, XmlWriter};

let mut tee = Tee::new(XmlWriter::new());
tee.start_document().unwrap();
tee.start_element("", "a", "a", &[]).unwrap();
tee.characters("x < y").unwrap();
tee.end_element("", "a", "a").unwrap();
tee.end_document().unwrap();
assert_eq!(tee.raw(), "<a>x < y</a>");
assert!(tee.into_inner().into_string().contains("x &lt; y"));
```
*/
use crate::error::Result;
use crate::event::Attribute;
use crate::EventSink;

/**
# Event sink which forwards to another sink

Every event is passed on to the wrapped sink unchanged. Start tags, end tags,
text and ignorable whitespace are also appended to a raw buffer, without
escaping, indentation or namespace declarations. This is meant for debugging
and logging what a producer emitted.

The buffer is cleared by [`EventSink::start_document`].
*/
#[derive(Debug, Default)]
pub struct Tee<S> {
	inner: S,
	raw: String,
}

impl<S: EventSink> Tee<S> {
	/// Wrap a sink.
	pub fn new(inner: S) -> Self {
		Self {
			inner,
			raw: String::new(),
		}
	}

	/// The events seen since the last start of a document.
	pub fn raw(&self) -> &str {
		&self.raw
	}

	/// Access the wrapped sink
	pub fn get_inner(&self) -> &S {
		&self.inner
	}

	/// Access the wrapped sink, mutably
	pub fn get_inner_mut(&mut self) -> &mut S {
		&mut self.inner
	}

	pub fn into_inner(self) -> S {
		self.inner
	}
}

fn display_name<'a>(local_name: &'a str, qualified_name: &'a str) -> &'a str {
	if qualified_name.is_empty() {
		local_name
	} else {
		qualified_name
	}
}

impl<S: EventSink> EventSink for Tee<S> {
	fn start_document(&mut self) -> Result<()> {
		self.raw.clear();
		self.inner.start_document()
	}

	fn end_document(&mut self) -> Result<()> {
		self.inner.end_document()
	}

	fn start_prefix_mapping(&mut self, prefix: &str, uri: &str) -> Result<()> {
		self.inner.start_prefix_mapping(prefix, uri)
	}

	fn end_prefix_mapping(&mut self, prefix: &str) -> Result<()> {
		self.inner.end_prefix_mapping(prefix)
	}

	fn start_element(
		&mut self,
		uri: &str,
		local_name: &str,
		qualified_name: &str,
		attributes: &[Attribute<'_>],
	) -> Result<()> {
		self.raw.push('<');
		self.raw.push_str(display_name(local_name, qualified_name));
		for attr in attributes {
			self.raw.push(' ');
			self.raw.push_str(display_name(attr.local_name, attr.qualified_name));
			self.raw.push_str("=\"");
			self.raw.push_str(attr.value);
			self.raw.push('"');
		}
		self.raw.push('>');
		self.inner.start_element(uri, local_name, qualified_name, attributes)
	}

	fn end_element(&mut self, uri: &str, local_name: &str, qualified_name: &str) -> Result<()> {
		self.raw.push_str("</");
		self.raw.push_str(display_name(local_name, qualified_name));
		self.raw.push('>');
		self.inner.end_element(uri, local_name, qualified_name)
	}

	fn characters(&mut self, text: &str) -> Result<()> {
		self.raw.push_str(text);
		self.inner.characters(text)
	}

	fn processing_instruction(&mut self, target: &str, data: &str) -> Result<()> {
		self.inner.processing_instruction(target, data)
	}

	fn ignorable_whitespace(&mut self, text: &str) -> Result<()> {
		self.raw.push_str(text);
		self.inner.ignorable_whitespace(text)
	}

	fn skipped_entity(&mut self, name: &str) -> Result<()> {
		self.inner.skipped_entity(name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use crate::event::Event;
	use crate::writer::XmlWriter;

	#[derive(Default)]
	struct Counter {
		whitespace: usize,
		skipped: usize,
		events: usize,
	}

	impl EventSink for Counter {
		fn start_document(&mut self) -> Result<()> {
			self.events += 1;
			Ok(())
		}

		fn end_document(&mut self) -> Result<()> {
			self.events += 1;
			Ok(())
		}

		fn start_prefix_mapping(&mut self, _prefix: &str, _uri: &str) -> Result<()> {
			self.events += 1;
			Ok(())
		}

		fn end_prefix_mapping(&mut self, _prefix: &str) -> Result<()> {
			self.events += 1;
			Ok(())
		}

		fn start_element(
			&mut self,
			_uri: &str,
			_local_name: &str,
			_qualified_name: &str,
			_attributes: &[Attribute<'_>],
		) -> Result<()> {
			self.events += 1;
			Ok(())
		}

		fn end_element(&mut self, _uri: &str, _local_name: &str, _qualified_name: &str) -> Result<()> {
			self.events += 1;
			Ok(())
		}

		fn characters(&mut self, _text: &str) -> Result<()> {
			self.events += 1;
			Ok(())
		}

		fn processing_instruction(&mut self, _target: &str, _data: &str) -> Result<()> {
			self.events += 1;
			Ok(())
		}

		fn ignorable_whitespace(&mut self, _text: &str) -> Result<()> {
			self.whitespace += 1;
			Ok(())
		}

		fn skipped_entity(&mut self, _name: &str) -> Result<()> {
			self.skipped += 1;
			Ok(())
		}
	}

	fn sample<'a>(attrs: &'a [Attribute<'a>]) -> Vec<Event<'a>> {
		vec![
			Event::StartDocument,
			Event::StartPrefixMapping {
				prefix: "p",
				uri: "urn:p",
			},
			Event::StartElement {
				uri: "urn:p",
				local_name: "root",
				qualified_name: "",
				attributes: attrs,
			},
			Event::ProcessingInstruction {
				target: "t",
				data: "d",
			},
			Event::text("a & b"),
			Event::IgnorableWhitespace { text: "  " },
			Event::start("child", &[]),
			Event::end("child"),
			Event::SkippedEntity { name: "ent" },
			Event::EndElement {
				uri: "urn:p",
				local_name: "root",
				qualified_name: "",
			},
			Event::EndPrefixMapping { prefix: "p" },
			Event::EndDocument,
		]
	}

	#[test]
	fn writer_output_is_unaffected() {
		let attrs = [Attribute::new("k", "v\"w")];
		let events = sample(&attrs);

		let mut bare = XmlWriter::new();
		bare.write_all(&events).unwrap();
		let mut tee = Tee::new(XmlWriter::new());
		tee.write_all(&events).unwrap();

		assert_eq!(tee.get_inner().as_bytes(), bare.as_bytes());
		assert_eq!(tee.into_inner().into_string(), bare.into_string());
	}

	#[test]
	fn raw_echo_is_unescaped() {
		let attrs = [Attribute::new("k", "v\"w")];
		let mut tee = Tee::new(XmlWriter::new());
		tee.write_all(&sample(&attrs)).unwrap();
		assert_eq!(tee.raw(), "<root k=\"v\"w\">a & b  <child></child></root>");
	}

	#[test]
	fn every_event_is_forwarded() {
		let attrs = [Attribute::new("k", "v")];
		let mut tee = Tee::new(Counter::default());
		tee.write_all(&sample(&attrs)).unwrap();
		let counter = tee.into_inner();
		assert_eq!(counter.events, 10);
		assert_eq!(counter.whitespace, 1);
		assert_eq!(counter.skipped, 1);
	}

	#[test]
	fn start_document_clears_the_echo() {
		let mut tee = Tee::new(Counter::default());
		tee.start_document().unwrap();
		tee.characters("first").unwrap();
		tee.end_document().unwrap();
		assert_eq!(tee.raw(), "first");
		tee.start_document().unwrap();
		tee.characters("second").unwrap();
		assert_eq!(tee.raw(), "second");
		tee.get_inner_mut().events = 0;
		tee.end_document().unwrap();
		assert_eq!(tee.get_inner().events, 1);
	}

	#[test]
	fn writer_errors_are_passed_through() {
		let mut tee = Tee::new(XmlWriter::new());
		tee.start_document().unwrap();
		tee.start_element("", "a", "a", &[]).unwrap();
		assert!(tee.characters("\u{0}").is_err());
	}
}
