mod info;

use std::cell::Cell;
use std::sync::atomic::Ordering;
use std::sync::Arc;

pub use info::CounterInfo;
use tracing::debug;

use crate::buffer;
use crate::ffi::bindings as b;
use crate::provider::{CounterHandle, RawValue, ValueFormat};
use crate::session::Shared;
use crate::status::{Error, Result, Status};

/// A single metric subscription, owned by exactly one [`Session`].
///
/// Created only through [`Session::attach_counter`]; the native handle lives
/// until the counter is [detached][Counter::detach] or its session closes,
/// whichever comes first. Metadata is fetched once at attach time and cached;
/// values are always fetched fresh because their entire purpose is to
/// reflect the most recent collection.
///
/// [`Session`]: crate::session::Session
/// [`Session::attach_counter`]: crate::session::Session::attach_counter
#[derive(Debug)]
pub struct Counter {
    shared: Arc<Shared>,
    handle: CounterHandle,
    detached: Cell<bool>,
    status: Cell<Status>,
    info: CounterInfo,
}

impl Counter {
    pub(crate) fn attach(shared: Arc<Shared>, path: &str) -> Result<Self> {
        let (status, handle) = shared.provider.add_counter(shared.query, path);
        status.check()?;

        // The one-time metadata load. If it fails the native counter is
        // removed again so a failed attach leaves nothing behind.
        let info = match Self::load_info(&shared, handle) {
            Ok(info) => info,
            Err(err) => {
                let _ = shared.provider.remove_counter(handle);
                return Err(err);
            }
        };
        if let Err(err) = info.load_status().check() {
            let _ = shared.provider.remove_counter(handle);
            return Err(err);
        }

        debug!(path = %info.full_path, "counter attached");

        Ok(Self {
            status: Cell::new(info.load_status()),
            shared,
            handle,
            detached: Cell::new(false),
            info,
        })
    }

    fn load_info(shared: &Shared, handle: CounterHandle) -> Result<CounterInfo> {
        let blob = buffer::grow::<u8, _>(|len, buf| {
            shared.provider.counter_info(handle, true, len, buf)
        })?;
        CounterInfo::decode(&blob)
    }

    /// Removes the counter from its session.
    ///
    /// Not needed as part of general cleanup — closing the session releases
    /// every attached counter — but long-lived sessions that add and remove
    /// counters while running must detach, or the native side leaks.
    /// Idempotent, and a no-op after the owning session has already closed.
    pub fn detach(&mut self) -> Result<()> {
        if self.detached.replace(true) {
            return Ok(());
        }
        // A closed session already released the handle natively.
        if !self.shared.open.load(Ordering::SeqCst) {
            return Ok(());
        }
        debug!(path = %self.info.full_path, "counter detached");
        self.shared.provider.remove_counter(self.handle).check()
    }

    /// Fetches the current reading formatted as requested.
    ///
    /// Fails with [`Error::InvalidHandleUse`] once detached or after the
    /// session closed, and with [`Error::InsufficientHistory`] when a
    /// rate-type counter has not yet seen two time-separated collections —
    /// an expected, recoverable condition, not a bug.
    pub fn value(&self, format: ValueFormat) -> Result<RawValue> {
        if self.detached.get() || !self.shared.open.load(Ordering::SeqCst) {
            return Err(Error::InvalidHandleUse);
        }
        let (status, counter_status, value) =
            self.shared.provider.formatted_value(self.handle, format);
        status.check()?;
        self.status.set(counter_status);
        counter_status.check()?;
        Ok(value)
    }

    pub fn value_as_double(&self) -> Result<f64> {
        match self.value(ValueFormat::Double)? {
            RawValue::Double(v) => Ok(v),
            _ => Err(Status(b::PDH_INVALID_ARGUMENT).into_error()),
        }
    }

    pub fn value_as_integer32(&self) -> Result<i32> {
        match self.value(ValueFormat::Long)? {
            RawValue::Int32(v) => Ok(v),
            _ => Err(Status(b::PDH_INVALID_ARGUMENT).into_error()),
        }
    }

    pub fn value_as_integer64(&self) -> Result<i64> {
        match self.value(ValueFormat::Large)? {
            RawValue::Int64(v) => Ok(v),
            _ => Err(Status(b::PDH_INVALID_ARGUMENT).into_error()),
        }
    }

    /// The cached metadata snapshot.
    pub fn info(&self) -> &CounterInfo {
        &self.info
    }

    /// Fully qualified counter path.
    pub fn path(&self) -> &str {
        &self.info.full_path
    }

    pub fn machine_name(&self) -> &str {
        &self.info.machine_name
    }

    pub fn object_name(&self) -> &str {
        &self.info.object_name
    }

    pub fn instance_name(&self) -> &str {
        &self.info.instance_name
    }

    pub fn parent_instance(&self) -> &str {
        &self.info.parent_instance
    }

    pub fn instance_index(&self) -> u32 {
        self.info.instance_index
    }

    pub fn counter_name(&self) -> &str {
        &self.info.counter_name
    }

    pub fn explain_text(&self) -> &str {
        &self.info.explain_text
    }

    pub fn counter_type(&self) -> u32 {
        self.info.counter_type
    }

    pub fn version(&self) -> u32 {
        self.info.version
    }

    pub fn scale(&self) -> i32 {
        self.info.scale
    }

    pub fn default_scale(&self) -> i32 {
        self.info.default_scale
    }

    /// Status reported by the most recent metadata or value fetch.
    pub fn last_status(&self) -> Status {
        self.status.get()
    }

    pub fn is_detached(&self) -> bool {
        self.detached.get()
    }
}

impl Drop for Counter {
    fn drop(&mut self) {
        if !self.detached.get() && self.shared.open.load(Ordering::SeqCst) {
            let _ = self.shared.provider.remove_counter(self.handle);
        }
    }
}
