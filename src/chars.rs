/*!
# XML 1.0 character classes

Codepoint tables for the `Char`, `NameStartChar` and `NameChar` productions
of XML 1.0 (fifth edition), plus the validators the writer uses to refuse
input which could not be represented in the output.

All tables are sorted and non-overlapping, which allows a binary search.
*/
use std::cmp::Ordering;
use std::fmt;

use crate::error::ValidationError;

/**
# Predicate trait for matching chars
*/
pub trait CharSelector {
	/// Return true if the given char is selected by the selector
	fn select(&self, c: char) -> bool;
}

impl CharSelector for char {
	fn select(&self, c: char) -> bool {
		*self == c
	}
}

/// Selects all chars from a range (including both ends)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodepointRange(pub char, pub char);

impl CodepointRange {
	pub fn contains(&self, c: char) -> bool {
		self.0 <= c && c <= self.1
	}

	fn compare(&self, c: char) -> Ordering {
		if c < self.0 {
			Ordering::Greater
		} else if c > self.1 {
			Ordering::Less
		} else {
			Ordering::Equal
		}
	}
}

impl CharSelector for CodepointRange {
	fn select(&self, c: char) -> bool {
		self.contains(c)
	}
}

/// Selects all chars from any of the contained (sorted) ranges
#[derive(Clone, Copy)]
pub struct CodepointRanges(pub &'static [CodepointRange]);

impl CharSelector for CodepointRanges {
	fn select(&self, c: char) -> bool {
		self.0.binary_search_by(|r| r.compare(c)).is_ok()
	}
}

impl fmt::Debug for CodepointRanges {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "CodepointRanges(<{} ranges>)", self.0.len())
	}
}

/// Valid codepoints for character data (XML 1.0 § 2.2 \[2\])
const XML_CHAR_RANGES: &'static [CodepointRange] = &[
	CodepointRange('\x09', '\x0a'),
	CodepointRange('\x0d', '\x0d'),
	CodepointRange('\u{0020}', '\u{d7ff}'),
	CodepointRange('\u{e000}', '\u{fffd}'),
	CodepointRange('\u{10000}', '\u{10ffff}'),
];

const XML_NAME_START_RANGES: &'static [CodepointRange] = &[
	CodepointRange(':', ':'),
	CodepointRange('A', 'Z'),
	CodepointRange('_', '_'),
	CodepointRange('a', 'z'),
	CodepointRange('\u{c0}', '\u{d6}'),
	CodepointRange('\u{d8}', '\u{f6}'),
	CodepointRange('\u{f8}', '\u{2ff}'),
	CodepointRange('\u{370}', '\u{37d}'),
	CodepointRange('\u{37f}', '\u{1fff}'),
	CodepointRange('\u{200c}', '\u{200d}'),
	CodepointRange('\u{2070}', '\u{218f}'),
	CodepointRange('\u{2c00}', '\u{2fef}'),
	CodepointRange('\u{3001}', '\u{d7ff}'),
	CodepointRange('\u{f900}', '\u{fdcf}'),
	CodepointRange('\u{fdf0}', '\u{fffd}'),
	CodepointRange('\u{10000}', '\u{effff}'),
];

const XML_NAME_RANGES: &'static [CodepointRange] = &[
	CodepointRange('-', '.'),
	CodepointRange('0', ':'),
	CodepointRange('A', 'Z'),
	CodepointRange('_', '_'),
	CodepointRange('a', 'z'),
	CodepointRange('\u{b7}', '\u{b7}'),
	CodepointRange('\u{c0}', '\u{d6}'),
	CodepointRange('\u{d8}', '\u{f6}'),
	CodepointRange('\u{f8}', '\u{37d}'),
	CodepointRange('\u{37f}', '\u{1fff}'),
	CodepointRange('\u{200c}', '\u{200d}'),
	CodepointRange('\u{203f}', '\u{2040}'),
	CodepointRange('\u{2070}', '\u{218f}'),
	CodepointRange('\u{2c00}', '\u{2fef}'),
	CodepointRange('\u{3001}', '\u{d7ff}'),
	CodepointRange('\u{f900}', '\u{fdcf}'),
	CodepointRange('\u{fdf0}', '\u{fffd}'),
	CodepointRange('\u{10000}', '\u{effff}'),
];

/// Characters allowed anywhere in an XML 1.0 document (`Char`).
pub static CLASS_XML_CHAR: CodepointRanges = CodepointRanges(XML_CHAR_RANGES);

/// Valid first characters for an XML Name (XML 1.0 § 2.3 \[4\])
pub static CLASS_XML_NAMESTART: CodepointRanges = CodepointRanges(XML_NAME_START_RANGES);

/// Valid non-first characters for an XML Name (XML 1.0 § 2.3 \[4a\])
pub static CLASS_XML_NAME: CodepointRanges = CodepointRanges(XML_NAME_RANGES);

/**
Check whether a str consists only of characters allowed in XML 1.0.

# Example

```rust
use prettysax::chars::validate_cdata;
use prettysax::ValidationError;

assert!(validate_cdata("foo bar baz <fnord!>").is_ok());
assert_eq!(validate_cdata("a\x01"), Err(ValidationError::InvalidChar('\x01')));
```
*/
pub fn validate_cdata(s: &str) -> Result<(), ValidationError> {
	match s.chars().find(|ch| !CLASS_XML_CHAR.select(*ch)) {
		Some(ch) => Err(ValidationError::InvalidChar(ch)),
		None => Ok(()),
	}
}

fn validate_name_with(s: &str, allow_colon: bool) -> Result<(), ValidationError> {
	let mut chars = s.chars();
	match chars.next() {
		None => return Err(ValidationError::EmptyName),
		Some(c) if !CLASS_XML_NAMESTART.select(c) || (!allow_colon && c == ':') => {
			return Err(ValidationError::InvalidChar(c))
		}
		Some(_) => (),
	}
	for ch in chars {
		if !CLASS_XML_NAME.select(ch) || (!allow_colon && ch == ':') {
			return Err(ValidationError::InvalidChar(ch));
		}
	}
	Ok(())
}

/**
Check whether a str is a valid XML 1.0 Name

# Example

```rust
use prettysax::chars::validate_name;
use prettysax::ValidationError;

assert!(validate_name("foo:bar").is_ok());
assert_eq!(validate_name("foo bar"), Err(ValidationError::InvalidChar(' ')));
assert_eq!(validate_name(""), Err(ValidationError::EmptyName));
```
*/
pub fn validate_name(s: &str) -> Result<(), ValidationError> {
	validate_name_with(s, true)
}

/// Check whether a str is a valid XML 1.0 Name without colons (NCName).
pub fn validate_ncname(s: &str) -> Result<(), ValidationError> {
	validate_name_with(s, false)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn assert_sorted(ranges: &[CodepointRange]) {
		for pair in ranges.windows(2) {
			assert!(
				pair[0].1 < pair[1].0,
				"ranges {:?} and {:?} overlap or are out of order",
				pair[0],
				pair[1]
			);
		}
	}

	#[test]
	fn tables_are_sorted_for_binary_search() {
		assert_sorted(XML_CHAR_RANGES);
		assert_sorted(XML_NAME_START_RANGES);
		assert_sorted(XML_NAME_RANGES);
	}

	#[test]
	fn binary_search_agrees_with_linear_scan() {
		for cp in 0x0..=0x10ffffu32 {
			if let Some(ch) = std::char::from_u32(cp) {
				let linear = XML_CHAR_RANGES.iter().any(|r| r.contains(ch));
				if linear != CLASS_XML_CHAR.select(ch) {
					panic!("lookup disagrees about U+{:x}", cp)
				}
			}
		}
	}

	#[test]
	fn name_start_chars_are_name_chars() {
		for cp in 0x0..=0x10ffffu32 {
			if let Some(ch) = std::char::from_u32(cp) {
				if CLASS_XML_NAMESTART.select(ch) && !CLASS_XML_NAME.select(ch) {
					panic!("U+{:x} may start a name but not continue it", cp)
				}
			}
		}
	}

	#[test]
	fn cdata_smoketest() {
		assert!(validate_cdata("foo bar baz http://<xyz>\t\r\n").is_ok());
		assert!(validate_cdata("grüße, 日本").is_ok());
		assert_eq!(validate_cdata("\u{ffff}"), Err(ValidationError::InvalidChar('\u{ffff}')));
		assert_eq!(validate_cdata("\0"), Err(ValidationError::InvalidChar('\0')));
	}

	#[test]
	fn name_smoketest() {
		assert!(validate_name("foobar").is_ok());
		assert!(validate_name("foo:bar").is_ok());
		assert!(validate_name("_x-1.2").is_ok());
		assert!(validate_name("-x").is_err());
		assert!(validate_name("1x").is_err());
		assert!(validate_name("").is_err());
		assert!(validate_name("\u{ffff}").is_err());
	}

	#[test]
	fn ncname_smoketest() {
		assert!(validate_ncname("foobar").is_ok());
		assert_eq!(validate_ncname("foo:bar"), Err(ValidationError::InvalidChar(':')));
		assert_eq!(validate_ncname(":foo"), Err(ValidationError::InvalidChar(':')));
		assert_eq!(validate_ncname(""), Err(ValidationError::EmptyName));
	}
}
