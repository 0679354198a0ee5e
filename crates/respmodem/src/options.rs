use crate::error::ConfigError;

/// Configuration options for the RESP streaming parser.
///
/// These options control how scalar replies are materialized: raw bytes
/// versus text for string payloads, and native versus textual forms for
/// numbers. All of them can also be toggled mid-stream through the setters
/// on [`RespParser`](crate::RespParser); a toggle affects replies that begin
/// after it.
///
/// # Examples
///
/// ```
/// use respmodem::{ParserOptions, RespParser};
///
/// let parser = RespParser::new(ParserOptions {
///     return_buffers: true,
///     ..Default::default()
/// })
/// .unwrap();
/// ```
///
/// # Default
///
/// All options default to `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParserOptions {
    /// Whether to deliver string payloads as raw bytes.
    ///
    /// When `true`, bulk strings, verbatim strings and simple strings decode
    /// to [`Reply::Buffer`](crate::Reply::Buffer) instead of their UTF-8
    /// text variants. Error payloads and attribute bodies are always
    /// decoded as text regardless of this flag.
    ///
    /// # Default
    ///
    /// `false`
    pub return_buffers: bool,

    /// Whether to deliver integers and doubles as verbatim decimal text.
    ///
    /// When `true`, `:` and `,` replies decode to
    /// [`Reply::Number`](crate::Reply::Number) carrying the exact digits
    /// from the wire, preserving precision past the 64-bit range.
    /// Mutually exclusive with `big_int`.
    ///
    /// # Default
    ///
    /// `false`
    pub string_numbers: bool,

    /// Whether to deliver integers as arbitrary-precision values.
    ///
    /// When `true`, `:` replies decode to
    /// [`Reply::BigNumber`](crate::Reply::BigNumber), the same text-backed
    /// representation `(` big numbers use. Mutually exclusive with
    /// `string_numbers`.
    ///
    /// # Default
    ///
    /// `false`
    pub big_int: bool,
}

impl ParserOptions {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.string_numbers && self.big_int {
            return Err(ConfigError::ExclusiveNumberModes);
        }
        Ok(())
    }
}
