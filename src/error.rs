/*!
# Error types

This module holds the error types returned by the various functions of this
crate.
*/
use std::error;
use std::fmt;
use std::io;
use std::ops::Deref;
use std::result::Result as StdResult;
use std::sync::Arc;

/// Reason why a string failed validation against an XML 1.0 production.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
	/// A Name or NCName was empty.
	EmptyName,
	/// An invalid character was encountered.
	///
	/// This variant contains the character as data.
	InvalidChar(char),
}

impl fmt::Display for ValidationError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::EmptyName => f.write_str("Name and NCName must not be empty"),
			Self::InvalidChar(c) => write!(f, "character U+{:04x} is not allowed", *c as u32),
		}
	}
}

impl error::Error for ValidationError {}

/// [`std::sync::Arc`]-based around [`std::io::Error`] to allow cloning.
#[derive(Clone)]
pub struct IOErrorWrapper(Arc<io::Error>);

impl IOErrorWrapper {
	fn wrap(e: io::Error) -> IOErrorWrapper {
		IOErrorWrapper(Arc::new(e))
	}
}

impl fmt::Debug for IOErrorWrapper {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		fmt::Debug::fmt(&**self, f)
	}
}

impl fmt::Display for IOErrorWrapper {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		fmt::Display::fmt(&**self, f)
	}
}

impl PartialEq for IOErrorWrapper {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl Deref for IOErrorWrapper {
	type Target = io::Error;

	fn deref(&self) -> &io::Error {
		&*self.0
	}
}

/// Error types which may be returned by the writer or the driver.
///
/// Malformed event sequences (unbalanced elements or prefix mappings) are
/// not errors; the writer produces best-effort output for them. All errors
/// listed here are terminal for the document being written: the contents of
/// the output buffer are unspecified afterwards and should be discarded.
#[derive(Debug)]
pub enum Error {
	/// A character which cannot be represented in XML 1.0 was passed in.
	///
	/// The string indicates the context (text, attribute value, ...) and
	/// should not be interpreted by user code.
	InvalidChar(&'static str, char),

	/// A name did not conform to the XML 1.0 Name (or, for prefixes, NCName)
	/// production.
	///
	/// Empty names are always rejected, everything else only if
	/// [`WriterOptions::check_names`] is enabled.
	///
	///   [`WriterOptions::check_names`]: crate::writer::WriterOptions::check_names
	InvalidName(&'static str, ValidationError),

	/// Processing instruction data contained the `?>` terminator.
	InvalidProcessingInstruction,

	/// An I/O error was encountered while reading input.
	IO(IOErrorWrapper),

	/// The input handed to the driver was not well-formed XML.
	#[cfg(feature = "roxmltree")]
	Parse(roxmltree::Error),
}

pub type Result<T> = StdResult<T, Error>;

impl Error {
	pub fn io(e: io::Error) -> Error {
		Error::IO(IOErrorWrapper::wrap(e))
	}
}

impl From<io::Error> for Error {
	fn from(e: io::Error) -> Error {
		Error::io(e)
	}
}

#[cfg(feature = "roxmltree")]
impl From<roxmltree::Error> for Error {
	fn from(e: roxmltree::Error) -> Error {
		Error::Parse(e)
	}
}

impl fmt::Display for Error {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Error::InvalidChar(ctx, ch) => {
				write!(f, "U+{:04x} cannot be encoded {}", *ch as u32, ctx)
			}
			Error::InvalidName(ctx, e) => write!(f, "invalid name {}: {}", ctx, e),
			Error::InvalidProcessingInstruction => {
				f.write_str("processing instruction data must not contain '?>'")
			}
			Error::IO(e) => write!(f, "I/O error: {}", e),
			#[cfg(feature = "roxmltree")]
			Error::Parse(e) => write!(f, "failed to parse input: {}", e),
		}
	}
}

impl error::Error for Error {
	fn source(&self) -> Option<&(dyn error::Error + 'static)> {
		match self {
			Error::IO(e) => Some(&**e),
			Error::InvalidName(_, e) => Some(e),
			#[cfg(feature = "roxmltree")]
			Error::Parse(e) => Some(e),
			Error::InvalidChar(..) | Error::InvalidProcessingInstruction => None,
		}
	}
}

pub(crate) const ERRCTX_TEXT: &'static str = "in text";
pub(crate) const ERRCTX_ATTVAL: &'static str = "in attribute value";
pub(crate) const ERRCTX_PI: &'static str = "in processing instruction";
pub(crate) const ERRCTX_ELEMENT_NAME: &'static str = "of element";
pub(crate) const ERRCTX_ATTRIBUTE_NAME: &'static str = "of attribute";
pub(crate) const ERRCTX_PREFIX: &'static str = "of namespace prefix";
pub(crate) const ERRCTX_PI_TARGET: &'static str = "of processing instruction target";
