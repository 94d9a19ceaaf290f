
use tracing::trace;

use crate::status::{Result, Status};

/// Runs a native call with a variable-length output through the
/// probe-then-fill convention.
///
/// The call receives the buffer length (in elements) and the buffer itself.
/// The first invocation probes with a zero length and an empty buffer; the
/// native side reports the required size through the length and a
/// "need bigger buffer" status. On success the length holds the number of
/// elements actually written.
///
/// The retry loop is deliberately unbounded: the probed size is a snapshot
/// of live data and can be stale again by the time the fill call runs.
pub fn grow<T, F>(mut call: F) -> Result<Vec<T>>
where
    T: Clone + Default,
    F: FnMut(&mut u32, &mut [T]) -> Status,
{
    let mut len = 0_u32;
    let mut buf: Vec<T> = Vec::new();

    loop {
        let status = call(&mut len, &mut buf);
        if status.needs_larger_buffer() {
            trace!(required = len, "buffer too small, growing");
            buf.resize(len as usize, T::default());
            continue;
        }
        status.check()?;
        // A success on the zero-size probe is a legitimate empty result.
        buf.truncate(len as usize);
        return Ok(buf);
    }
}

/// Like [`grow`], for native calls that fill two independently sized
/// buffers in one invocation.
pub fn grow_pair<T, F>(mut call: F) -> Result<(Vec<T>, Vec<T>)>
where
    T: Clone + Default,
    F: FnMut(&mut u32, &mut [T], &mut u32, &mut [T]) -> Status,
{
    let mut first_len = 0_u32;
    let mut first: Vec<T> = Vec::new();
    let mut second_len = 0_u32;
    let mut second: Vec<T> = Vec::new();

    loop {
        let status = call(&mut first_len, &mut first, &mut second_len, &mut second);
        if status.needs_larger_buffer() {
            trace!(
                first_required = first_len,
                second_required = second_len,
                "buffers too small, growing"
            );
            first.resize(first_len as usize, T::default());
            second.resize(second_len as usize, T::default());
            continue;
        }
        status.check()?;
        first.truncate(first_len as usize);
        second.truncate(second_len as usize);
        return Ok((first, second));
    }
}
