
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::counter::Counter;
use crate::provider::{Provider, QueryHandle, SystemProvider};
use crate::status::{Error, Result};

// State a session shares with its counters: counters check `open` to detect
// that the session close already released their native handles.
pub(crate) struct Shared {
    pub(crate) provider: Arc<dyn Provider>,
    pub(crate) query: QueryHandle,
    pub(crate) open: AtomicBool,
}

impl std::fmt::Debug for Shared {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shared")
            .field("query", &self.query)
            .field("open", &self.open)
            .finish_non_exhaustive()
    }
}

/// A query session: the unit of collection.
///
/// Owns one native query handle and every counter attached to it. Closing
/// the session releases all attached counters natively, even ones the caller
/// never detached, so nothing leaks; the reverse does not hold — detaching a
/// counter never closes its session.
///
/// Calls block the current thread for the duration of the native operation,
/// which can be long when a remote machine or a recorded source is involved.
/// Mutating operations take `&mut self`, so use of one session is serialized
/// by the borrow checker; distinct sessions are fully independent.
///
/// # Examples
///
/// ```rust,no_run
/// use pdh_query::session::Session;
///
/// let mut session = Session::open(None, None).unwrap();
/// let counter = session.attach_counter(r"\System\Processes").unwrap();
///
/// session.collect_sample().unwrap();
/// println!("{} processes", counter.value_as_integer32().unwrap());
///
/// session.close().unwrap();
/// ```
#[derive(Debug)]
pub struct Session {
    shared: Arc<Shared>,
    source: Option<String>,
    machine: Option<String>,
    attached: Vec<String>,
}

impl Session {
    /// Opens a session against the live host facility.
    ///
    /// `source` names a recorded data source (a log file) instead of the
    /// current activity; `machine` scopes the session to a remote computer.
    /// Fails if the provider rejects either.
    pub fn open(source: Option<&str>, machine: Option<&str>) -> Result<Self> {
        Self::open_with(Arc::new(SystemProvider::new()), source, machine)
    }

    /// Opens a session against an explicit [`Provider`].
    pub fn open_with(
        provider: Arc<dyn Provider>,
        source: Option<&str>,
        machine: Option<&str>,
    ) -> Result<Self> {
        let (status, query) = provider.open_query(source, machine);
        status.check()?;

        debug!(?source, ?machine, "session opened");

        Ok(Self {
            shared: Arc::new(Shared {
                provider,
                query,
                open: AtomicBool::new(true),
            }),
            source: source.map(Into::into),
            machine: machine.map(Into::into),
            attached: Vec::new(),
        })
    }

    /// Releases the native handle exactly once.
    ///
    /// Idempotent: a second close is a no-op, never an error. A genuine
    /// release failure propagates exactly once; the session counts as closed
    /// either way.
    pub fn close(&mut self) -> Result<()> {
        if !self.shared.open.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        debug!("session closed");
        self.shared.provider.close_query(self.shared.query).check()
    }

    /// Whether the session streams live data rather than replaying a
    /// recorded source.
    pub fn is_real_time(&self) -> Result<bool> {
        self.ensure_open()?;
        Ok(self.shared.provider.is_realtime_query(self.shared.query))
    }

    /// Adds a counter by its fully qualified path and loads its metadata.
    ///
    /// Attaching the same path twice yields two independent counters.
    /// Fails if the path is malformed, the referenced object, instance or
    /// counter does not exist, or the session is closed.
    pub fn attach_counter(&mut self, path: &str) -> Result<Counter> {
        self.ensure_open()?;
        let counter = Counter::attach(Arc::clone(&self.shared), path)?;
        self.attached.push(path.into());
        Ok(counter)
    }

    /// Takes one reading for every attached counter at the current instant.
    ///
    /// Must run at least once before any formatted value is meaningful;
    /// counters computing a rate need two calls separated by a real time
    /// interval, and reading one earlier fails with
    /// [`Error::InsufficientHistory`](crate::status::Error::InsufficientHistory).
    pub fn collect_sample(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.shared.provider.collect(self.shared.query).check()
    }

    /// Counter paths in attach order.
    pub fn attached_paths(&self) -> &[String] {
        &self.attached
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn machine(&self) -> Option<&str> {
        self.machine.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.shared.open.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(Error::InvalidHandleUse)
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.shared.open.swap(false, Ordering::SeqCst) {
            let _ = self.shared.provider.close_query(self.shared.query);
        }
    }
}
