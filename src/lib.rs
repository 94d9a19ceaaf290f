//! High-level wrapper for the Windows Performance Data Helper (PDH) query API.
//!
//! ## Example
//!
//! Sample total CPU utilization over one second.
//!
//! ```rust,no_run
//! use std::thread;
//! use std::time::Duration;
//!
//! use pdh_query::session::Session;
//!
//! let mut session = Session::open(None, None).unwrap();
//! let counter = session
//!     .attach_counter(r"\Processor(_Total)\% Processor Time")
//!     .unwrap();
//!
//! // Rate counters need two time-separated collections
//! // before a formatted value exists.
//! session.collect_sample().unwrap();
//! thread::sleep(Duration::from_secs(1));
//! session.collect_sample().unwrap();
//!
//! let busy = counter.value_as_double().unwrap();
//! println!("{busy:.1}% busy");
//!
//! session.close().unwrap();
//! ```
//!
//! Counter paths are discovered with the session-less functions in
//! [`enumerate`]: list objects, list the counters and instances under an
//! object, or expand a wildcard path such as `\Processor(*)\*` into every
//! concrete match.
//!
//! ## Platform support
//!
//! The live system facility is only available on Windows. The crate compiles
//! everywhere; on other targets every native call reports
//! `PDH_NOT_IMPLEMENTED`. All components accept any [`provider::Provider`]
//! implementation, so recorded or synthetic providers work on any platform.

mod buffer;
pub mod counter;
pub mod enumerate;
mod ffi;
pub mod provider;
pub mod session;
pub mod status;
