use crate::ffi::{put_i32, put_u32, put_wide_str, take_i32, take_u32, take_wide_str};
use crate::status::{Error, Result, Status};

/// Immutable counter metadata, loaded once right after a successful attach.
///
/// This is a snapshot: the live object on the host may change later, the
/// cached fields intentionally do not track it.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CounterInfo {
    /// Counter type code (`PERF_COUNTER_*`), drives how raw readings are
    /// turned into formatted values.
    pub counter_type: u32,
    /// Format version of the metadata record.
    pub version: u32,
    /// Counter status at load time, a raw PDH status code.
    pub status: u32,
    /// Current scale factor applied to formatted values, as a power of ten.
    pub scale: i32,
    /// Default scale factor suggested by the object definition.
    pub default_scale: i32,
    pub instance_index: u32,
    pub full_path: String,
    pub machine_name: String,
    pub object_name: String,
    pub instance_name: String,
    pub parent_instance: String,
    pub counter_name: String,
    /// Help text; empty when the metadata was fetched without it.
    pub explain_text: String,
}

// Canonical metadata blob, little-endian:
//
//  0  u32 counter_type
//  4  u32 version
//  8  u32 status
// 12  i32 scale
// 16  i32 default_scale
// 20  u32 instance_index
// 24  7 NUL-terminated UTF-16 strings: full_path, machine, object,
//     instance, parent_instance, counter, explain_text
impl CounterInfo {
    pub fn decode(blob: &[u8]) -> Result<Self> {
        let mut cur = blob;

        let mut scalar_u32 = || take_u32(&mut cur).ok_or(truncated());
        let counter_type = scalar_u32()?;
        let version = scalar_u32()?;
        let status = scalar_u32()?;
        let scale = take_i32(&mut cur).ok_or(truncated())?;
        let default_scale = take_i32(&mut cur).ok_or(truncated())?;
        let instance_index = take_u32(&mut cur).ok_or(truncated())?;

        let mut text = || take_wide_str(&mut cur).ok_or(truncated());
        let full_path = text()?;
        let machine_name = text()?;
        let object_name = text()?;
        let instance_name = text()?;
        let parent_instance = text()?;
        let counter_name = text()?;
        let explain_text = text()?;

        Ok(Self {
            counter_type,
            version,
            status,
            scale,
            default_scale,
            instance_index,
            full_path,
            machine_name,
            object_name,
            instance_name,
            parent_instance,
            counter_name,
            explain_text,
        })
    }

    /// Encoder used by providers to produce the blob [`decode`] reads.
    ///
    /// [`decode`]: Self::decode
    pub fn to_blob(&self) -> Vec<u8> {
        let mut blob = Vec::new();
        put_u32(&mut blob, self.counter_type);
        put_u32(&mut blob, self.version);
        put_u32(&mut blob, self.status);
        put_i32(&mut blob, self.scale);
        put_i32(&mut blob, self.default_scale);
        put_u32(&mut blob, self.instance_index);
        put_wide_str(&mut blob, &self.full_path);
        put_wide_str(&mut blob, &self.machine_name);
        put_wide_str(&mut blob, &self.object_name);
        put_wide_str(&mut blob, &self.instance_name);
        put_wide_str(&mut blob, &self.parent_instance);
        put_wide_str(&mut blob, &self.counter_name);
        put_wide_str(&mut blob, &self.explain_text);
        blob
    }

    pub(crate) fn load_status(&self) -> Status {
        Status(self.status)
    }
}

fn truncated() -> Error {
    Status(crate::ffi::bindings::PDH_INVALID_BUFFER).into_error()
}
