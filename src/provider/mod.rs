//! The injectable native call surface.
//!
//! [`Provider`] stands for the host's PDH facility; every other component in
//! this crate reaches the operating system only through it. The live
//! implementation is [`SystemProvider`]; tests inject synthetic providers.

#[cfg(test)]
pub(crate) mod fake;
mod system;

pub use system::SystemProvider;

use crate::enumerate::DetailLevel;
use crate::ffi::bindings as b;
use crate::status::Status;

/// Opaque query-session handle issued by a provider.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct QueryHandle(pub isize);

/// Opaque counter handle issued by a provider, scoped to one query.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CounterHandle(pub isize);

impl QueryHandle {
    pub const NULL: Self = Self(0);
}

impl CounterHandle {
    pub const NULL: Self = Self(0);
}

/// The numeric representation to request for a formatted counter value.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ValueFormat {
    /// 32-bit signed integer (`PDH_FMT_LONG`).
    Long,
    /// 64-bit signed integer (`PDH_FMT_LARGE`).
    Large,
    /// Double-precision float (`PDH_FMT_DOUBLE`).
    Double,
}

impl ValueFormat {
    pub fn bits(self) -> u32 {
        match self {
            ValueFormat::Long => b::PDH_FMT_LONG,
            ValueFormat::Large => b::PDH_FMT_LARGE,
            ValueFormat::Double => b::PDH_FMT_DOUBLE,
        }
    }
}

/// A formatted counter value, tagged by the representation that was
/// requested rather than read out of a raw union.
#[derive(Clone, PartialEq, Debug)]
pub enum RawValue {
    Int32(i32),
    Int64(i64),
    Double(f64),
    Text(String),
}

/// The native PDH call surface.
///
/// Variable-length outputs follow the growing-buffer convention of
/// [`crate::buffer`]: the implementation reports the required element count
/// through the length argument together with a "need bigger buffer" status,
/// and on success sets the length to the number of elements written.
/// Handles are owned by the caller; `close_query` releases every counter
/// attached to the query on the native side.
pub trait Provider: Send + Sync {
    fn open_query(&self, source: Option<&str>, machine: Option<&str>) -> (Status, QueryHandle);

    fn close_query(&self, query: QueryHandle) -> Status;

    /// Whether the query streams live data rather than replaying a
    /// recorded source.
    fn is_realtime_query(&self, query: QueryHandle) -> bool;

    /// Takes one reading of every counter attached to the query.
    fn collect(&self, query: QueryHandle) -> Status;

    fn add_counter(&self, query: QueryHandle, path: &str) -> (Status, CounterHandle);

    fn remove_counter(&self, counter: CounterHandle) -> Status;

    /// Fills the canonical counter-metadata blob (see
    /// [`crate::counter::CounterInfo`]); `len` is in bytes.
    fn counter_info(
        &self,
        counter: CounterHandle,
        want_text: bool,
        len: &mut u32,
        buf: &mut [u8],
    ) -> Status;

    /// Returns `(call status, counter status, value)`; the value is only
    /// meaningful when both statuses are successful.
    fn formatted_value(
        &self,
        counter: CounterHandle,
        format: ValueFormat,
    ) -> (Status, Status, RawValue);

    /// Lists counter object names as a NUL-delimited wide-character blob;
    /// `len` is in UTF-16 units.
    #[allow(clippy::too_many_arguments)]
    fn enum_objects(
        &self,
        source: Option<&str>,
        machine: Option<&str>,
        detail: DetailLevel,
        refresh: bool,
        len: &mut u32,
        buf: &mut [u16],
    ) -> Status;

    /// Lists counter and instance names under one object as two
    /// NUL-delimited blobs filled in a single call.
    #[allow(clippy::too_many_arguments)]
    fn enum_object_items(
        &self,
        source: Option<&str>,
        machine: Option<&str>,
        object: &str,
        detail: DetailLevel,
        counters_len: &mut u32,
        counters_buf: &mut [u16],
        instances_len: &mut u32,
        instances_buf: &mut [u16],
    ) -> Status;

    /// Expands a wildcard counter path into a NUL-delimited blob of
    /// concrete paths; `flags` carries the `PDH_NOEXPAND*` bits.
    fn expand_wildcard_path(
        &self,
        source: Option<&str>,
        path: &str,
        flags: u32,
        len: &mut u32,
        buf: &mut [u16],
    ) -> Status;
}
