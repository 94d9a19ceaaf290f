//! Synthetic provider for tests: a small in-memory model of the native
//! facility with configurable catalogs and failure injection.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{CounterHandle, Provider, QueryHandle, RawValue, ValueFormat};
use crate::counter::CounterInfo;
use crate::enumerate::DetailLevel;
use crate::ffi::bindings as b;
use crate::ffi::to_wide;
use crate::status::Status;

#[derive(Clone)]
pub(crate) struct CounterSpec {
    /// Rate counters need two collections before a value exists.
    pub rate: bool,
    pub value: f64,
}

struct QueryState {
    source: Option<String>,
    collections: u32,
}

struct CounterState {
    query: isize,
    path: String,
}

#[derive(Default)]
struct State {
    next_handle: isize,
    queries: HashMap<isize, QueryState>,
    counters: HashMap<isize, CounterState>,
    catalog: HashMap<String, CounterSpec>,
    objects: Vec<(DetailLevel, String)>,
    items: HashMap<String, (Vec<String>, Vec<String>)>,
    expansions: HashMap<String, Vec<String>>,
    fail_open: Option<u32>,
    fail_close: Option<u32>,
    close_calls: u32,
    remove_calls: u32,
}

pub(crate) struct FakeProvider {
    state: Mutex<State>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    pub fn define_counter(&self, path: &str, rate: bool, value: f64) {
        let mut state = self.state.lock().unwrap();
        state
            .catalog
            .insert(path.to_string(), CounterSpec { rate, value });
    }

    pub fn define_object(&self, detail: DetailLevel, name: &str) {
        let mut state = self.state.lock().unwrap();
        state.objects.push((detail, name.to_string()));
    }

    pub fn define_items(&self, object: &str, counters: &[&str], instances: &[&str]) {
        let mut state = self.state.lock().unwrap();
        state.items.insert(
            object.to_string(),
            (
                counters.iter().map(|s| s.to_string()).collect(),
                instances.iter().map(|s| s.to_string()).collect(),
            ),
        );
    }

    pub fn define_expansion(&self, pattern: &str, paths: &[&str]) {
        let mut state = self.state.lock().unwrap();
        state.expansions.insert(
            pattern.to_string(),
            paths.iter().map(|s| s.to_string()).collect(),
        );
    }

    pub fn fail_next_open(&self, code: u32) {
        self.state.lock().unwrap().fail_open = Some(code);
    }

    pub fn fail_next_close(&self, code: u32) {
        self.state.lock().unwrap().fail_close = Some(code);
    }

    pub fn live_counters(&self) -> usize {
        self.state.lock().unwrap().counters.len()
    }

    pub fn live_queries(&self) -> usize {
        self.state.lock().unwrap().queries.len()
    }

    pub fn close_calls(&self) -> u32 {
        self.state.lock().unwrap().close_calls
    }

    pub fn remove_calls(&self) -> u32 {
        self.state.lock().unwrap().remove_calls
    }
}

// Serves a blob through the probe-then-fill convention.
fn serve_wide(blob: &[u16], len: &mut u32, buf: &mut [u16]) -> Status {
    let needed = blob.len() as u32;
    if (*len as usize) < blob.len() {
        *len = needed;
        return Status(b::PDH_MORE_DATA);
    }
    buf[..blob.len()].copy_from_slice(blob);
    *len = needed;
    Status::OK
}

fn serve_bytes(blob: &[u8], len: &mut u32, buf: &mut [u8]) -> Status {
    let needed = blob.len() as u32;
    if (*len as usize) < blob.len() {
        *len = needed;
        return Status(b::PDH_MORE_DATA);
    }
    buf[..blob.len()].copy_from_slice(blob);
    *len = needed;
    Status::OK
}

// Joins segments into the doubly NUL-terminated wide list format.
fn wide_list(items: &[String]) -> Vec<u16> {
    let mut blob = Vec::new();
    for item in items {
        blob.extend(to_wide(item));
    }
    blob.push(0);
    blob
}

// "\Object(instance)\Counter" -> (object, instance, counter)
fn parse_path(path: &str) -> (String, String, String) {
    let trimmed = path.trim_start_matches('\\');
    let (head, counter) = trimmed.rsplit_once('\\').unwrap_or(("", trimmed));
    let (object, instance) = match head.split_once('(') {
        Some((object, rest)) => (object, rest.trim_end_matches(')')),
        None => (head, ""),
    };
    (object.to_string(), instance.to_string(), counter.to_string())
}

impl Provider for FakeProvider {
    fn open_query(&self, source: Option<&str>, machine: Option<&str>) -> (Status, QueryHandle) {
        let mut state = self.state.lock().unwrap();
        if let Some(code) = state.fail_open.take() {
            return (Status(code), QueryHandle::NULL);
        }
        if machine.is_some() {
            // The fake models the local machine only.
            return (Status(b::PDH_CSTATUS_NO_MACHINE), QueryHandle::NULL);
        }
        state.next_handle += 1;
        let handle = state.next_handle;
        state.queries.insert(
            handle,
            QueryState {
                source: source.map(Into::into),
                collections: 0,
            },
        );
        (Status::OK, QueryHandle(handle))
    }

    fn close_query(&self, query: QueryHandle) -> Status {
        let mut state = self.state.lock().unwrap();
        state.close_calls += 1;
        if let Some(code) = state.fail_close.take() {
            return Status(code);
        }
        if state.queries.remove(&query.0).is_none() {
            return Status(b::PDH_INVALID_HANDLE);
        }
        // Closing a query releases every counter attached to it.
        state.counters.retain(|_, c| c.query != query.0);
        Status::OK
    }

    fn is_realtime_query(&self, query: QueryHandle) -> bool {
        let state = self.state.lock().unwrap();
        state
            .queries
            .get(&query.0)
            .is_some_and(|q| q.source.is_none())
    }

    fn collect(&self, query: QueryHandle) -> Status {
        let mut state = self.state.lock().unwrap();
        match state.queries.get_mut(&query.0) {
            Some(q) => {
                q.collections += 1;
                Status::OK
            }
            None => Status(b::PDH_INVALID_HANDLE),
        }
    }

    fn add_counter(&self, query: QueryHandle, path: &str) -> (Status, CounterHandle) {
        let mut state = self.state.lock().unwrap();
        if !state.queries.contains_key(&query.0) {
            return (Status(b::PDH_INVALID_HANDLE), CounterHandle::NULL);
        }
        if !state.catalog.contains_key(path) {
            return (Status(b::PDH_CSTATUS_NO_COUNTER), CounterHandle::NULL);
        }
        state.next_handle += 1;
        let handle = state.next_handle;
        state.counters.insert(
            handle,
            CounterState {
                query: query.0,
                path: path.to_string(),
            },
        );
        (Status::OK, CounterHandle(handle))
    }

    fn remove_counter(&self, counter: CounterHandle) -> Status {
        let mut state = self.state.lock().unwrap();
        state.remove_calls += 1;
        if state.counters.remove(&counter.0).is_none() {
            return Status(b::PDH_INVALID_HANDLE);
        }
        Status::OK
    }

    fn counter_info(
        &self,
        counter: CounterHandle,
        want_text: bool,
        len: &mut u32,
        buf: &mut [u8],
    ) -> Status {
        let state = self.state.lock().unwrap();
        let Some(c) = state.counters.get(&counter.0) else {
            return Status(b::PDH_INVALID_HANDLE);
        };
        let (object, instance, name) = parse_path(&c.path);
        let info = CounterInfo {
            counter_type: 0,
            version: 1,
            status: b::PDH_CSTATUS_VALID_DATA,
            scale: 0,
            default_scale: 0,
            instance_index: 0,
            full_path: c.path.clone(),
            machine_name: String::new(),
            object_name: object,
            instance_name: instance,
            parent_instance: String::new(),
            counter_name: name,
            explain_text: if want_text {
                format!("synthetic counter {}", c.path)
            } else {
                String::new()
            },
        };
        serve_bytes(&info.to_blob(), len, buf)
    }

    fn formatted_value(
        &self,
        counter: CounterHandle,
        format: ValueFormat,
    ) -> (Status, Status, RawValue) {
        let dummy = |format| match format {
            ValueFormat::Long => RawValue::Int32(0),
            ValueFormat::Large => RawValue::Int64(0),
            ValueFormat::Double => RawValue::Double(0.0),
        };

        let state = self.state.lock().unwrap();
        let Some(c) = state.counters.get(&counter.0) else {
            return (Status(b::PDH_INVALID_HANDLE), Status::OK, dummy(format));
        };
        let spec = &state.catalog[&c.path];
        let collections = state.queries[&c.query].collections;
        let required = if spec.rate { 2 } else { 1 };
        if collections < required {
            // Not enough history yet; signaled through the counter status.
            return (
                Status::OK,
                Status(b::PDH_CSTATUS_INVALID_DATA),
                dummy(format),
            );
        }

        let value = match format {
            ValueFormat::Long => RawValue::Int32(spec.value as i32),
            ValueFormat::Large => RawValue::Int64(spec.value as i64),
            ValueFormat::Double => RawValue::Double(spec.value),
        };
        (Status::OK, Status(b::PDH_CSTATUS_VALID_DATA), value)
    }

    fn enum_objects(
        &self,
        _source: Option<&str>,
        machine: Option<&str>,
        detail: DetailLevel,
        _refresh: bool,
        len: &mut u32,
        buf: &mut [u16],
    ) -> Status {
        let state = self.state.lock().unwrap();
        if machine.is_some() {
            return Status(b::PDH_CSTATUS_NO_MACHINE);
        }
        let visible: Vec<String> = state
            .objects
            .iter()
            .filter(|(tier, _)| *tier <= detail)
            .map(|(_, name)| name.clone())
            .collect();
        serve_wide(&wide_list(&visible), len, buf)
    }

    fn enum_object_items(
        &self,
        _source: Option<&str>,
        machine: Option<&str>,
        object: &str,
        _detail: DetailLevel,
        counters_len: &mut u32,
        counters_buf: &mut [u16],
        instances_len: &mut u32,
        instances_buf: &mut [u16],
    ) -> Status {
        let state = self.state.lock().unwrap();
        if machine.is_some() {
            return Status(b::PDH_CSTATUS_NO_MACHINE);
        }
        let Some((counters, instances)) = state.items.get(object) else {
            return Status(b::PDH_CSTATUS_NO_OBJECT);
        };
        let counters = wide_list(counters);
        let instances = wide_list(instances);
        // Both buffers must be large enough before either is filled.
        if (*counters_len as usize) < counters.len() || (*instances_len as usize) < instances.len()
        {
            *counters_len = counters.len() as u32;
            *instances_len = instances.len() as u32;
            return Status(b::PDH_MORE_DATA);
        }
        let first = serve_wide(&counters, counters_len, counters_buf);
        let second = serve_wide(&instances, instances_len, instances_buf);
        if !first.is_success() {
            first
        } else {
            second
        }
    }

    fn expand_wildcard_path(
        &self,
        _source: Option<&str>,
        path: &str,
        flags: u32,
        len: &mut u32,
        buf: &mut [u16],
    ) -> Status {
        let state = self.state.lock().unwrap();
        let suppressed = b::PDH_NOEXPANDCOUNTERS | b::PDH_NOEXPANDINSTANCES;
        let paths = if flags & suppressed == suppressed {
            // Nothing left to expand: the literal path comes back.
            vec![path.to_string()]
        } else {
            match state.expansions.get(path) {
                Some(paths) => paths.clone(),
                None => vec![path.to_string()],
            }
        };
        serve_wide(&wide_list(&paths), len, buf)
    }
}
