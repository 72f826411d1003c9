/*!
# Indenting writer for SAX-style events

The [`XmlWriter`] receives [`Event`]s (through the [`EventSink`] trait) in
document order and renders them as indented XML text into an internal
buffer.

Two layouts are available, see [`Layout`].

   [`Event`]: crate::event::Event
*/
use std::fmt;

use bytes::{BufMut, BytesMut};
use smartstring::alias::String as SmartString;

use crate::chars::{validate_cdata, validate_name, validate_ncname, CharSelector, CLASS_XML_CHAR};
use crate::error::*;
use crate::event::Attribute;
use crate::namespaces::PrefixIndex;
use crate::EventSink;

static XML_DECL: &'static [u8] = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

const TEXT_SPECIALS: &'static [char] = &['<', '>', '&'];

const ATTR_SPECIALS: &'static [char] = &['"', '\'', '\r', '\n', '\t', '<', '>', '&'];

fn escape<B: BufMut>(
	out: &mut B,
	data: &str,
	specials: &'static [char],
	ctx: &'static str,
) -> Result<()> {
	let mut last_index = 0;
	for (i, ch) in data.char_indices() {
		if !CLASS_XML_CHAR.select(ch) {
			return Err(Error::InvalidChar(ctx, ch));
		}
		if !specials.contains(&ch) {
			continue;
		}
		out.put_slice(data[last_index..i].as_bytes());
		match ch {
			'"' => out.put_slice(b"&quot;"),
			'\'' => out.put_slice(b"&apos;"),
			'<' => out.put_slice(b"&lt;"),
			'>' => out.put_slice(b"&gt;"),
			'&' => out.put_slice(b"&amp;"),
			'\r' => out.put_slice(b"&#xd;"),
			'\n' => out.put_slice(b"&#xa;"),
			'\t' => out.put_slice(b"&#x9;"),
			// specials and this match are kept in sync
			other => out.put_slice(other.encode_utf8(&mut [0u8; 4]).as_bytes()),
		}
		last_index = i + ch.len_utf8();
	}
	out.put_slice(data[last_index..].as_bytes());
	Ok(())
}

/// Line break sequence used for structural line breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineBreak {
	/// `\r\n`
	CrLf,
	/// `\n`
	Lf,
}

impl LineBreak {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::CrLf => "\r\n",
			Self::Lf => "\n",
		}
	}
}

/// Formatting strategy of the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
	/// Put each namespace declaration and attribute on its own line below
	/// the element name, and collapse elements without content to
	/// `<name />`.
	Collapse,

	/// Keep namespace declarations and attributes on the line of the start
	/// tag and never self-close. An end tag which directly follows its own
	/// start tag is written on the same line (`<name></name>`).
	Readable,
}

/// Hold options to configure an [`XmlWriter`].
///
/// See also [`XmlWriter::with_options()`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WriterOptions {
	/// Character repeated to indent one nesting level.
	pub indent_char: char,

	/// Number of [`WriterOptions::indent_char`] per nesting level.
	pub indent_size: usize,

	/// Character used for the additional indentation of attribute and
	/// namespace declaration lines.
	pub deep_indent_char: char,

	/// Number of [`WriterOptions::deep_indent_char`] added to the
	/// indentation of the element for its attribute lines.
	pub deep_indent_size: usize,

	/// Line break sequence for all structural line breaks, including those
	/// which replace line breaks in text.
	pub line_break: LineBreak,

	/// Formatting strategy.
	pub layout: Layout,

	/// Reject element and attribute names, prefixes and processing
	/// instruction targets which do not conform to the XML 1.0 grammar.
	///
	/// Off by default: the producer is trusted to supply valid names. Empty
	/// names are rejected either way.
	pub check_names: bool,

	/// Remove lines which are empty or consist only of whitespace when the
	/// output is converted with [`XmlWriter::into_string`].
	///
	/// This is useful if the producer reports insignificant whitespace as
	/// text, at the cost of also dropping whitespace-only lines inside text.
	pub strip_blank_lines: bool,
}

impl WriterOptions {
	/// Set the [`WriterOptions::indent_char`] value.
	pub fn indent_char(mut self, v: char) -> WriterOptions {
		self.indent_char = v;
		self
	}

	/// Set the [`WriterOptions::indent_size`] value.
	///
	/// Negative values are clamped to zero.
	///
	/// # Example
	///
	/// ```
	/// use prettysax::WriterOptions;
	/// let opts = WriterOptions::default().indent_char(' ').indent_size(-2);
	/// assert_eq!(opts.indent_size, 0);
	/// ```
	pub fn indent_size(mut self, v: isize) -> WriterOptions {
		self.indent_size = v.max(0) as usize;
		self
	}

	/// Set the [`WriterOptions::deep_indent_char`] value.
	pub fn deep_indent_char(mut self, v: char) -> WriterOptions {
		self.deep_indent_char = v;
		self
	}

	/// Set the [`WriterOptions::deep_indent_size`] value.
	///
	/// Negative values are clamped to zero.
	pub fn deep_indent_size(mut self, v: isize) -> WriterOptions {
		self.deep_indent_size = v.max(0) as usize;
		self
	}

	/// Set the [`WriterOptions::line_break`] value.
	pub fn line_break(mut self, v: LineBreak) -> WriterOptions {
		self.line_break = v;
		self
	}

	/// Set the [`WriterOptions::layout`] value.
	pub fn layout(mut self, v: Layout) -> WriterOptions {
		self.layout = v;
		self
	}

	/// Set the [`WriterOptions::check_names`] value.
	pub fn check_names(mut self, v: bool) -> WriterOptions {
		self.check_names = v;
		self
	}

	/// Set the [`WriterOptions::strip_blank_lines`] value.
	pub fn strip_blank_lines(mut self, v: bool) -> WriterOptions {
		self.strip_blank_lines = v;
		self
	}
}

impl Default for WriterOptions {
	/// One tab per level, one tab of deep indent, `\r\n` line breaks and
	/// the [`Layout::Collapse`] layout.
	fn default() -> Self {
		Self {
			indent_char: '\t',
			indent_size: 1,
			deep_indent_char: '\t',
			deep_indent_size: 1,
			line_break: LineBreak::CrLf,
			layout: Layout::Collapse,
			check_names: false,
			strip_blank_lines: false,
		}
	}
}

fn repeat_char(ch: char, n: usize) -> SmartString {
	let mut result = SmartString::new();
	for _ in 0..n {
		result.push(ch);
	}
	result
}

/// Remove lines which are empty or whitespace-only.
fn strip_blank_lines(s: &str) -> String {
	let mut result = String::with_capacity(s.len());
	for line in s.split_inclusive('\n') {
		if !line.trim().is_empty() {
			result.push_str(line);
		}
	}
	result
}

/// Borrowed name triple of an element or attribute.
#[derive(Debug, Clone, Copy)]
struct NameParts<'a> {
	uri: &'a str,
	local_name: &'a str,
	qualified_name: &'a str,
}

/// Write a name, reconstructing the prefix from `ns` if no qualified name
/// is given.
fn write_name<B: BufMut>(
	out: &mut B,
	ns: &PrefixIndex,
	check_names: bool,
	ctx: &'static str,
	name: NameParts<'_>,
	attribute: bool,
) -> Result<()> {
	let prefix = if !name.qualified_name.is_empty() || name.uri.is_empty() {
		None
	} else {
		let prefix = if attribute {
			ns.attribute_prefix_for(name.uri)
		} else {
			ns.prefix_for(name.uri)
		};
		if prefix.is_none() {
			log::debug!(
				"no prefix bound for {:?}, writing {:?} unqualified",
				name.uri,
				name.local_name
			);
		}
		prefix.filter(|p| !p.is_empty())
	};
	let written = if name.qualified_name.is_empty() {
		name.local_name
	} else {
		name.qualified_name
	};
	if written.is_empty() {
		return Err(Error::InvalidName(ctx, ValidationError::EmptyName));
	}
	if check_names {
		match prefix {
			Some(_) => validate_ncname(written),
			None => validate_name(written),
		}
		.map_err(|e| Error::InvalidName(ctx, e))?;
	}
	if let Some(prefix) = prefix {
		out.put_slice(prefix.as_bytes());
		out.put_u8(b':');
	}
	out.put_slice(written.as_bytes());
	Ok(())
}

/**
Renders SAX-style events as indented XML text.

The writer owns its output buffer and its [`PrefixIndex`]. It is reset by
[`EventSink::start_document`], so one writer can be reused for several
documents in sequence, but never for interleaved ones.

Malformed event sequences (unbalanced elements or prefix mappings) produce
best-effort output and never panic. Errors are only returned for content
which cannot be represented in XML at all; after an error, the buffer
contents are unspecified.

```rust
use prettysax::{Attribute, EventSink, XmlWriter};

let mut w = XmlWriter::new();
w.start_document().unwrap();
w.start_element("", "empty", "empty", &[Attribute::new("id", "1")]).unwrap();
w.end_element("", "empty", "empty").unwrap();
w.end_document().unwrap();
assert_eq!(
	w.into_string(),
	"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\r\n<empty\r\n\tid=\"1\" />\r\n",
);
```
*/
pub struct XmlWriter {
	opts: WriterOptions,
	indent_unit: SmartString,
	deep_indent_unit: SmartString,
	out: BytesMut,
	ns: PrefixIndex,
	depth: usize,
	/// The `>` of the innermost start tag has not been written yet.
	tag_pending: bool,
	/// The last thing written was text; further text continues the line.
	after_text: bool,
	/// Nothing has been written since the last line break.
	line_start: bool,
}

impl XmlWriter {
	/// Create a new writer with default options.
	pub fn new() -> Self {
		Self::with_options(WriterOptions::default())
	}

	/// Create a new writer with the given options.
	pub fn with_options(opts: WriterOptions) -> Self {
		Self {
			indent_unit: repeat_char(opts.indent_char, opts.indent_size),
			deep_indent_unit: repeat_char(opts.deep_indent_char, opts.deep_indent_size),
			opts,
			out: BytesMut::new(),
			ns: PrefixIndex::new(),
			depth: 0,
			tag_pending: false,
			after_text: false,
			line_start: false,
		}
	}

	/// Return the options the writer was created with.
	pub fn options(&self) -> &WriterOptions {
		&self.opts
	}

	/// Number of currently open elements.
	pub fn depth(&self) -> usize {
		self.depth
	}

	/// Return the currently active prefix mappings.
	pub fn namespaces(&self) -> &PrefixIndex {
		&self.ns
	}

	/// Return the output produced so far (and not yet taken).
	pub fn as_bytes(&self) -> &[u8] {
		&self.out[..]
	}

	/// Remove and return the output produced so far.
	///
	/// This allows streaming the output to a consumer while the document is
	/// still being written. [`WriterOptions::strip_blank_lines`] is not
	/// applied to the returned bytes.
	pub fn take_bytes(&mut self) -> BytesMut {
		self.out.split()
	}

	/// Consume the writer and return the raw output buffer.
	pub fn into_bytes(self) -> BytesMut {
		self.out
	}

	/// Consume the writer and return the output as string.
	///
	/// If [`WriterOptions::strip_blank_lines`] is set, blank lines are
	/// removed.
	pub fn into_string(self) -> String {
		// only str data is ever put into the buffer
		let text = String::from_utf8_lossy(&self.out[..]).into_owned();
		if self.opts.strip_blank_lines {
			strip_blank_lines(&text)
		} else {
			text
		}
	}

	fn newline(&mut self) {
		if self.line_start {
			self.line_start = false;
		} else {
			self.out.put_slice(self.opts.line_break.as_str().as_bytes());
		}
	}

	fn indent(&mut self, depth: usize) {
		for _ in 0..depth {
			self.out.put_slice(self.indent_unit.as_bytes());
		}
	}

	fn newline_and_indent(&mut self) {
		self.newline();
		self.indent(self.depth);
	}

	/// Write the `>` of the parent's start tag if it is still open.
	fn complete_pending_tag(&mut self) {
		if self.tag_pending {
			self.out.put_u8(b'>');
			self.tag_pending = false;
		}
	}

	/// Separate the next attribute or namespace declaration of the element
	/// at `depth` from what precedes it.
	fn begin_attribute(&mut self, depth: usize) {
		match self.opts.layout {
			Layout::Collapse => {
				self.newline();
				self.indent(depth);
				self.out.put_slice(self.deep_indent_unit.as_bytes());
			}
			Layout::Readable => self.out.put_u8(b' '),
		}
	}

	fn write_text(&mut self, text: &str) -> Result<()> {
		let mut start = 0;
		let mut after_cr = false;
		for (i, ch) in text.char_indices() {
			match ch {
				'\r' | '\n' => {
					escape(&mut self.out, &text[start..i], TEXT_SPECIALS, ERRCTX_TEXT)?;
					start = i + 1;
					// \r\n is a single line break
					if !(ch == '\n' && after_cr) {
						self.newline_and_indent();
					}
					after_cr = ch == '\r';
				}
				_ => after_cr = false,
			}
		}
		escape(&mut self.out, &text[start..], TEXT_SPECIALS, ERRCTX_TEXT)
	}
}

impl Default for XmlWriter {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for XmlWriter {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("XmlWriter")
			.field("opts", &self.opts)
			.field("depth", &self.depth)
			.field("tag_pending", &self.tag_pending)
			.field("after_text", &self.after_text)
			.field("buffered", &self.out.len())
			.finish()
	}
}

impl EventSink for XmlWriter {
	fn start_document(&mut self) -> Result<()> {
		log::trace!("start of document");
		self.out.clear();
		self.ns.clear();
		self.depth = 0;
		self.tag_pending = false;
		self.after_text = false;
		self.out.put_slice(XML_DECL);
		self.out.put_slice(self.opts.line_break.as_str().as_bytes());
		self.line_start = true;
		Ok(())
	}

	fn end_document(&mut self) -> Result<()> {
		if self.depth > 0 {
			log::debug!("end of document with {} unclosed element(s)", self.depth);
		}
		if !self.line_start {
			self.out.put_slice(self.opts.line_break.as_str().as_bytes());
		}
		self.line_start = true;
		self.after_text = false;
		self.tag_pending = false;
		self.ns.clear();
		self.depth = 0;
		log::trace!("end of document");
		Ok(())
	}

	fn start_prefix_mapping(&mut self, prefix: &str, uri: &str) -> Result<()> {
		if self.opts.check_names && !prefix.is_empty() {
			validate_ncname(prefix).map_err(|e| Error::InvalidName(ERRCTX_PREFIX, e))?;
		}
		self.ns.bind(prefix, uri);
		Ok(())
	}

	fn end_prefix_mapping(&mut self, prefix: &str) -> Result<()> {
		self.ns.unbind(prefix);
		Ok(())
	}

	fn start_element(
		&mut self,
		uri: &str,
		local_name: &str,
		qualified_name: &str,
		attributes: &[Attribute<'_>],
	) -> Result<()> {
		self.complete_pending_tag();
		self.newline_and_indent();
		self.out.put_u8(b'<');
		write_name(
			&mut self.out,
			&self.ns,
			self.opts.check_names,
			ERRCTX_ELEMENT_NAME,
			NameParts {
				uri,
				local_name,
				qualified_name,
			},
			false,
		)?;

		let depth = self.depth;
		for (prefix, nsuri) in self.ns.take_new_declarations() {
			self.begin_attribute(depth);
			if prefix.is_empty() {
				self.out.put_slice(b"xmlns");
			} else {
				self.out.put_slice(b"xmlns:");
				self.out.put_slice(prefix.as_bytes());
			}
			self.out.put_slice(b"=\"");
			escape(&mut self.out, &nsuri, ATTR_SPECIALS, ERRCTX_ATTVAL)?;
			self.out.put_u8(b'"');
		}

		for attr in attributes.iter().filter(|a| !a.is_namespace_declaration()) {
			self.begin_attribute(depth);
			write_name(
				&mut self.out,
				&self.ns,
				self.opts.check_names,
				ERRCTX_ATTRIBUTE_NAME,
				NameParts {
					uri: attr.uri,
					local_name: attr.local_name,
					qualified_name: attr.qualified_name,
				},
				true,
			)?;
			self.out.put_slice(b"=\"");
			escape(&mut self.out, attr.value, ATTR_SPECIALS, ERRCTX_ATTVAL)?;
			self.out.put_u8(b'"');
		}

		self.depth += 1;
		self.tag_pending = true;
		self.after_text = false;
		Ok(())
	}

	fn end_element(&mut self, uri: &str, local_name: &str, qualified_name: &str) -> Result<()> {
		match self.depth.checked_sub(1) {
			Some(depth) => self.depth = depth,
			None => log::debug!("end of element {:?} without open element", local_name),
		}
		let name = NameParts {
			uri,
			local_name,
			qualified_name,
		};
		if self.tag_pending {
			self.tag_pending = false;
			match self.opts.layout {
				Layout::Collapse => {
					self.out.put_slice(b" />");
					self.after_text = false;
					return Ok(());
				}
				Layout::Readable => self.out.put_slice(b"></"),
			}
		} else {
			self.newline_and_indent();
			self.out.put_slice(b"</");
		}
		write_name(
			&mut self.out,
			&self.ns,
			self.opts.check_names,
			ERRCTX_ELEMENT_NAME,
			name,
			false,
		)?;
		self.out.put_u8(b'>');
		self.after_text = false;
		Ok(())
	}

	fn characters(&mut self, text: &str) -> Result<()> {
		if text.is_empty() {
			return Ok(());
		}
		if !self.after_text {
			self.complete_pending_tag();
			self.newline_and_indent();
		}
		self.write_text(text)?;
		self.after_text = true;
		Ok(())
	}

	fn processing_instruction(&mut self, target: &str, data: &str) -> Result<()> {
		if data.contains("?>") {
			return Err(Error::InvalidProcessingInstruction);
		}
		if target.is_empty() {
			return Err(Error::InvalidName(ERRCTX_PI_TARGET, ValidationError::EmptyName));
		}
		if self.opts.check_names {
			validate_name(target).map_err(|e| Error::InvalidName(ERRCTX_PI_TARGET, e))?;
		}
		validate_cdata(target).map_err(|e| match e {
			ValidationError::InvalidChar(ch) => Error::InvalidChar(ERRCTX_PI, ch),
			other => Error::InvalidName(ERRCTX_PI_TARGET, other),
		})?;
		validate_cdata(data).map_err(|e| match e {
			ValidationError::InvalidChar(ch) => Error::InvalidChar(ERRCTX_PI, ch),
			other => Error::InvalidName(ERRCTX_PI_TARGET, other),
		})?;
		self.complete_pending_tag();
		self.newline_and_indent();
		self.out.put_slice(b"<?");
		self.out.put_slice(target.as_bytes());
		self.out.put_u8(b' ');
		if !data.is_empty() {
			self.out.put_slice(data.as_bytes());
			self.out.put_u8(b' ');
		}
		self.out.put_slice(b"?>");
		self.after_text = false;
		Ok(())
	}
}

#[cfg(test)]
mod tests_escape {
	use super::*;

	fn escaped(data: &str, specials: &'static [char]) -> Result<String> {
		let mut out = BytesMut::new();
		escape(&mut out, data, specials, ERRCTX_TEXT)?;
		Ok(String::from_utf8(out.to_vec()).unwrap())
	}

	#[test]
	fn text_escapes_markup_but_not_quotes() {
		assert_eq!(
			escaped("a & b < c > d \"e\" 'f'", TEXT_SPECIALS).unwrap(),
			"a &amp; b &lt; c &gt; d \"e\" 'f'"
		);
	}

	#[test]
	fn attribute_escapes_quotes_and_whitespace() {
		assert_eq!(
			escaped("'\"&<>\t\r\n", ATTR_SPECIALS).unwrap(),
			"&apos;&quot;&amp;&lt;&gt;&#x9;&#xd;&#xa;"
		);
	}

	#[test]
	fn non_ascii_passes_through() {
		assert_eq!(escaped("grüße & 日本", TEXT_SPECIALS).unwrap(), "grüße &amp; 日本");
	}

	#[test]
	fn rejects_chars_outside_xml() {
		match escaped("ok\u{fffe}", TEXT_SPECIALS) {
			Err(Error::InvalidChar(_, '\u{fffe}')) => (),
			other => panic!("unexpected escape result: {:?}", other),
		}
	}

	#[test]
	fn strip_blank_lines_keeps_content_lines() {
		assert_eq!(
			strip_blank_lines("a\r\n\t\r\n\r\nb\n  \nc"),
			"a\r\nb\nc"
		);
	}
}
