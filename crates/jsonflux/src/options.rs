/// Configuration options shared by serialization and deserialization.
///
/// Read-relevant flags are copied into the per-call
/// [`ReadState`](crate::ReadState) when a deserialization begins;
/// write-side flags are carried for emit-side collaborators so that both
/// directions agree on the wire shape.
///
/// # Default
///
/// All options default to `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonOptions {
    /// Represent objects as positional arrays instead of name/value pairs.
    ///
    /// Both serialization and deserialization must agree on this mode: a
    /// nameless writer produces `[1,"a"]` where a named writer produces
    /// `{"id":1,"name":"a"}`, and the object reader consumes the positional
    /// form when this flag is set.
    ///
    /// # Default
    ///
    /// `false`
    pub nameless: bool,

    /// Skip object members whose value is null when serializing.
    ///
    /// # Default
    ///
    /// `false`
    pub do_not_write_null_properties: bool,

    /// Skip object members whose value equals the member's default when
    /// serializing.
    ///
    /// # Default
    ///
    /// `false`
    pub do_not_write_default_properties: bool,

    /// Write enum values as their integer discriminant instead of their
    /// name. The enum reader accepts both forms regardless.
    ///
    /// # Default
    ///
    /// `false`
    pub enum_as_number: bool,

    /// Raise [`JsonError::TypeMismatch`] when a value cannot be converted to
    /// its target type, instead of substituting the target's default value.
    ///
    /// [`JsonError::TypeMismatch`]: crate::JsonError::TypeMismatch
    ///
    /// # Default
    ///
    /// `false`
    pub error_on_type_mismatch: bool,
}
