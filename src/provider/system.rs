use super::{CounterHandle, Provider, QueryHandle, RawValue, ValueFormat};
use crate::enumerate::DetailLevel;
use crate::ffi::bindings as b;
use crate::status::Status;

/// The live PDH facility of the host.
///
/// On non-Windows targets the type still exists so callers can compile and
/// inject providers uniformly, but every call reports `PDH_NOT_IMPLEMENTED`.
#[derive(Clone, Copy, Default, Debug)]
pub struct SystemProvider;

impl SystemProvider {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(windows)]
impl Provider for SystemProvider {
    fn open_query(&self, source: Option<&str>, machine: Option<&str>) -> (Status, QueryHandle) {
        imp::open_query(source, machine)
    }

    fn close_query(&self, query: QueryHandle) -> Status {
        imp::close_query(query)
    }

    fn is_realtime_query(&self, query: QueryHandle) -> bool {
        imp::is_realtime_query(query)
    }

    fn collect(&self, query: QueryHandle) -> Status {
        imp::collect(query)
    }

    fn add_counter(&self, query: QueryHandle, path: &str) -> (Status, CounterHandle) {
        imp::add_counter(query, path)
    }

    fn remove_counter(&self, counter: CounterHandle) -> Status {
        imp::remove_counter(counter)
    }

    fn counter_info(
        &self,
        counter: CounterHandle,
        want_text: bool,
        len: &mut u32,
        buf: &mut [u8],
    ) -> Status {
        imp::counter_info(counter, want_text, len, buf)
    }

    fn formatted_value(
        &self,
        counter: CounterHandle,
        format: ValueFormat,
    ) -> (Status, Status, RawValue) {
        imp::formatted_value(counter, format)
    }

    fn enum_objects(
        &self,
        source: Option<&str>,
        machine: Option<&str>,
        detail: DetailLevel,
        refresh: bool,
        len: &mut u32,
        buf: &mut [u16],
    ) -> Status {
        imp::enum_objects(source, machine, detail, refresh, len, buf)
    }

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
    ) -> Status {
        imp::enum_object_items(
            source,
            machine,
            object,
            detail,
            counters_len,
            counters_buf,
            instances_len,
            instances_buf,
        )
    }

    fn expand_wildcard_path(
        &self,
        source: Option<&str>,
        path: &str,
        flags: u32,
        len: &mut u32,
        buf: &mut [u16],
    ) -> Status {
        imp::expand_wildcard_path(source, path, flags, len, buf)
    }
}

#[cfg(not(windows))]
impl Provider for SystemProvider {
    fn open_query(&self, _: Option<&str>, _: Option<&str>) -> (Status, QueryHandle) {
        (Status(b::PDH_NOT_IMPLEMENTED), QueryHandle::NULL)
    }

    fn close_query(&self, _: QueryHandle) -> Status {
        Status(b::PDH_NOT_IMPLEMENTED)
    }

    fn is_realtime_query(&self, _: QueryHandle) -> bool {
        false
    }

    fn collect(&self, _: QueryHandle) -> Status {
        Status(b::PDH_NOT_IMPLEMENTED)
    }

    fn add_counter(&self, _: QueryHandle, _: &str) -> (Status, CounterHandle) {
        (Status(b::PDH_NOT_IMPLEMENTED), CounterHandle::NULL)
    }

    fn remove_counter(&self, _: CounterHandle) -> Status {
        Status(b::PDH_NOT_IMPLEMENTED)
    }

    fn counter_info(&self, _: CounterHandle, _: bool, _: &mut u32, _: &mut [u8]) -> Status {
        Status(b::PDH_NOT_IMPLEMENTED)
    }

    fn formatted_value(
        &self,
        _: CounterHandle,
        format: ValueFormat,
    ) -> (Status, Status, RawValue) {
        let value = match format {
            ValueFormat::Long => RawValue::Int32(0),
            ValueFormat::Large => RawValue::Int64(0),
            ValueFormat::Double => RawValue::Double(0.0),
        };
        (Status(b::PDH_NOT_IMPLEMENTED), Status::OK, value)
    }

    fn enum_objects(
        &self,
        _: Option<&str>,
        _: Option<&str>,
        _: DetailLevel,
        _: bool,
        _: &mut u32,
        _: &mut [u16],
    ) -> Status {
        Status(b::PDH_NOT_IMPLEMENTED)
    }

    fn enum_object_items(
        &self,
        _: Option<&str>,
        _: Option<&str>,
        _: &str,
        _: DetailLevel,
        _: &mut u32,
        _: &mut [u16],
        _: &mut u32,
        _: &mut [u16],
    ) -> Status {
        Status(b::PDH_NOT_IMPLEMENTED)
    }

    fn expand_wildcard_path(
        &self,
        _: Option<&str>,
        _: &str,
        _: u32,
        _: &mut u32,
        _: &mut [u16],
    ) -> Status {
        Status(b::PDH_NOT_IMPLEMENTED)
    }
}

#[cfg(windows)]
mod imp {
    use std::ptr;

    use windows_sys::Win32::System::Performance as pdh;

    use crate::counter::CounterInfo;
    use crate::provider::{CounterHandle, QueryHandle, RawValue, ValueFormat};
    use crate::enumerate::DetailLevel;
    use crate::ffi::to_wide;
    use crate::status::Status;

    fn wide_opt(text: Option<&str>) -> Option<Vec<u16>> {
        text.map(to_wide)
    }

    fn ptr_of(wide: &Option<Vec<u16>>) -> *const u16 {
        wide.as_ref().map_or(ptr::null(), |w| w.as_ptr())
    }

    // Reads a NUL-terminated wide string the native side placed inside the
    // info buffer. A null pointer stands for "no such segment".
    unsafe fn read_pwstr(ptr: *const u16) -> String {
        if ptr.is_null() {
            return String::new();
        }
        let mut len = 0;
        while *ptr.add(len) != 0 {
            len += 1;
        }
        String::from_utf16_lossy(std::slice::from_raw_parts(ptr, len))
    }

    pub fn open_query(source: Option<&str>, machine: Option<&str>) -> (Status, QueryHandle) {
        // The native open is not machine-scoped; an explicit machine is
        // honored by connecting to it first.
        if let Some(machine) = wide_opt(machine) {
            let status = unsafe { pdh::PdhConnectMachineW(machine.as_ptr()) };
            let status = Status(status as u32);
            if !status.is_success() {
                return (status, QueryHandle::NULL);
            }
        }

        let source = wide_opt(source);
        let mut raw: pdh::PDH_HQUERY = ptr::null_mut();
        let status = unsafe { pdh::PdhOpenQueryW(ptr_of(&source), 0, &mut raw) };
        (Status(status as u32), QueryHandle(raw as isize))
    }

    pub fn close_query(query: QueryHandle) -> Status {
        let status = unsafe { pdh::PdhCloseQuery(query.0 as _) };
        Status(status as u32)
    }

    pub fn is_realtime_query(query: QueryHandle) -> bool {
        unsafe { pdh::PdhIsRealTimeQuery(query.0 as _) != 0 }
    }

    pub fn collect(query: QueryHandle) -> Status {
        let status = unsafe { pdh::PdhCollectQueryData(query.0 as _) };
        Status(status as u32)
    }

    pub fn add_counter(query: QueryHandle, path: &str) -> (Status, CounterHandle) {
        let path = to_wide(path);
        let mut raw: pdh::PDH_HCOUNTER = ptr::null_mut();
        let status = unsafe { pdh::PdhAddCounterW(query.0 as _, path.as_ptr(), 0, &mut raw) };
        (Status(status as u32), CounterHandle(raw as isize))
    }

    pub fn remove_counter(counter: CounterHandle) -> Status {
        let status = unsafe { pdh::PdhRemoveCounter(counter.0 as _) };
        Status(status as u32)
    }

    pub fn counter_info(
        counter: CounterHandle,
        want_text: bool,
        len: &mut u32,
        buf: &mut [u8],
    ) -> Status {
        // The native fill wants a PDH_COUNTER_INFO_W image, so it runs
        // against an aligned scratch buffer; a successful fill is then
        // re-serialized as the canonical blob, which is always smaller than
        // the raw image (pointers drop out, the strings stay).
        let mut raw_len = *len;
        let mut scratch = vec![0_u64; (raw_len as usize).div_ceil(8).max(1)];
        let status = unsafe {
            pdh::PdhGetCounterInfoW(
                counter.0 as _,
                want_text as _,
                &mut raw_len,
                scratch.as_mut_ptr() as _,
            )
        };
        let status = Status(status as u32);
        if !status.is_success() {
            *len = raw_len;
            return status;
        }

        let info = unsafe {
            let raw = &*(scratch.as_ptr() as *const pdh::PDH_COUNTER_INFO_W);
            let path = &raw.Anonymous.CounterPath;
            CounterInfo {
                counter_type: raw.dwType,
                version: raw.CVersion,
                status: raw.CStatus,
                scale: raw.lScale,
                default_scale: raw.lDefaultScale,
                instance_index: path.dwInstanceIndex,
                full_path: read_pwstr(raw.szFullPath),
                machine_name: read_pwstr(path.szMachineName),
                object_name: read_pwstr(path.szObjectName),
                instance_name: read_pwstr(path.szInstanceName),
                parent_instance: read_pwstr(path.szParentInstance),
                counter_name: read_pwstr(path.szCounterName),
                explain_text: read_pwstr(raw.szExplainText),
            }
        };

        let blob = info.to_blob();
        *len = blob.len() as u32;
        if blob.len() > buf.len() {
            return Status(crate::ffi::bindings::PDH_MORE_DATA);
        }
        buf[..blob.len()].copy_from_slice(&blob);
        Status::OK
    }

    pub fn formatted_value(
        counter: CounterHandle,
        format: ValueFormat,
    ) -> (Status, Status, RawValue) {
        let mut value: pdh::PDH_FMT_COUNTERVALUE = unsafe { std::mem::zeroed() };
        let status = unsafe {
            pdh::PdhGetFormattedCounterValue(
                counter.0 as _,
                format.bits(),
                ptr::null_mut(),
                &mut value,
            )
        };
        let raw = unsafe {
            match format {
                ValueFormat::Long => RawValue::Int32(value.Anonymous.longValue),
                ValueFormat::Large => RawValue::Int64(value.Anonymous.largeValue),
                ValueFormat::Double => RawValue::Double(value.Anonymous.doubleValue),
            }
        };
        (Status(status as u32), Status(value.CStatus), raw)
    }

    pub fn enum_objects(
        source: Option<&str>,
        machine: Option<&str>,
        detail: DetailLevel,
        refresh: bool,
        len: &mut u32,
        buf: &mut [u16],
    ) -> Status {
        let source = wide_opt(source);
        let machine = wide_opt(machine);
        let status = unsafe {
            pdh::PdhEnumObjectsW(
                ptr_of(&source),
                ptr_of(&machine),
                buf.as_mut_ptr(),
                len,
                detail.bits(),
                refresh as _,
            )
        };
        Status(status as u32)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn enum_object_items(
        source: Option<&str>,
        machine: Option<&str>,
        object: &str,
        detail: DetailLevel,
        counters_len: &mut u32,
        counters_buf: &mut [u16],
        instances_len: &mut u32,
        instances_buf: &mut [u16],
    ) -> Status {
        let source = wide_opt(source);
        let machine = wide_opt(machine);
        let object = to_wide(object);
        let status = unsafe {
            pdh::PdhEnumObjectItemsW(
                ptr_of(&source),
                ptr_of(&machine),
                object.as_ptr(),
                counters_buf.as_mut_ptr(),
                counters_len,
                instances_buf.as_mut_ptr(),
                instances_len,
                detail.bits(),
                0,
            )
        };
        Status(status as u32)
    }

    pub fn expand_wildcard_path(
        source: Option<&str>,
        path: &str,
        flags: u32,
        len: &mut u32,
        buf: &mut [u16],
    ) -> Status {
        let source = wide_opt(source);
        let path = to_wide(path);
        let status = unsafe {
            pdh::PdhExpandWildCardPathW(
                ptr_of(&source),
                path.as_ptr(),
                buf.as_mut_ptr(),
                len,
                flags,
            )
        };
        Status(status as u32)
    }
}
