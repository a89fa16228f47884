use crate::core::{RawValue, Result};

/// Host record abstraction.
///
/// The generated accessors and mutators reach the underlying record only
/// through this trait: one raw read, at most one raw write, and (for the
/// persisting mutators) one call into the host persistence operation.
/// Persistence failure semantics are owned by the implementor; this layer
/// propagates them unmodified.
pub trait Record {
    fn read_raw(&self, attribute: &str) -> RawValue;

    fn write_raw(&mut self, attribute: &str, value: RawValue);

    fn persist(&mut self) -> Result<()>;
}
