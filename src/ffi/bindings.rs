//! PDH constants, hand-maintained from `pdhmsg.h` / `pdh.h`.
//!
//! The set is small and the ABI has been frozen for decades, so these are
//! kept by hand instead of being generated.

#![allow(dead_code)]

pub const ERROR_SUCCESS: u32 = 0x0000_0000;

// Counter status values (`CStatus`).
pub const PDH_CSTATUS_VALID_DATA: u32 = 0x0000_0000;
pub const PDH_CSTATUS_NEW_DATA: u32 = 0x0000_0001;
pub const PDH_CSTATUS_NO_MACHINE: u32 = 0x8000_07D0;
pub const PDH_CSTATUS_NO_INSTANCE: u32 = 0x8000_07D1;
pub const PDH_CSTATUS_ITEM_NOT_VALIDATED: u32 = 0x8000_07D3;
pub const PDH_CSTATUS_NO_OBJECT: u32 = 0xC000_0BB8;
pub const PDH_CSTATUS_NO_COUNTER: u32 = 0xC000_0BB9;
pub const PDH_CSTATUS_INVALID_DATA: u32 = 0xC000_0BBA;
pub const PDH_CSTATUS_NO_COUNTERNAME: u32 = 0xC000_0BBF;
pub const PDH_CSTATUS_BAD_COUNTERNAME: u32 = 0xC000_0BC0;

// Function status values.
pub const PDH_MORE_DATA: u32 = 0x8000_07D2;
pub const PDH_RETRY: u32 = 0x8000_07D4;
pub const PDH_NO_DATA: u32 = 0x8000_07D5;
pub const PDH_CALC_NEGATIVE_DENOMINATOR: u32 = 0x8000_07D6;
pub const PDH_CALC_NEGATIVE_TIMEBASE: u32 = 0x8000_07D7;
pub const PDH_CALC_NEGATIVE_VALUE: u32 = 0x8000_07D8;
pub const PDH_MEMORY_ALLOCATION_FAILURE: u32 = 0xC000_0BBB;
pub const PDH_INVALID_HANDLE: u32 = 0xC000_0BBC;
pub const PDH_INVALID_ARGUMENT: u32 = 0xC000_0BBD;
pub const PDH_FUNCTION_NOT_FOUND: u32 = 0xC000_0BBE;
pub const PDH_INVALID_BUFFER: u32 = 0xC000_0BC1;
pub const PDH_INSUFFICIENT_BUFFER: u32 = 0xC000_0BC2;
pub const PDH_CANNOT_CONNECT_MACHINE: u32 = 0xC000_0BC3;
pub const PDH_INVALID_PATH: u32 = 0xC000_0BC4;
pub const PDH_INVALID_INSTANCE: u32 = 0xC000_0BC5;
pub const PDH_INVALID_DATA: u32 = 0xC000_0BC6;
pub const PDH_NO_MORE_DATA: u32 = 0xC000_0BCC;
pub const PDH_DATA_SOURCE_IS_LOG_FILE: u32 = 0xC000_0BCE;
pub const PDH_DATA_SOURCE_IS_REAL_TIME: u32 = 0xC000_0BCF;
pub const PDH_FILE_NOT_FOUND: u32 = 0xC000_0BD1;
pub const PDH_NOT_IMPLEMENTED: u32 = 0xC000_0BD3;
pub const PDH_STRING_NOT_FOUND: u32 = 0xC000_0BD4;
pub const PDH_ACCESS_DENIED: u32 = 0xC000_0BDB;

// Formatted value requests (`PdhGetFormattedCounterValue`).
pub const PDH_FMT_LONG: u32 = 0x0000_0100;
pub const PDH_FMT_DOUBLE: u32 = 0x0000_0200;
pub const PDH_FMT_LARGE: u32 = 0x0000_0400;
pub const PDH_FMT_NOSCALE: u32 = 0x0000_1000;
pub const PDH_FMT_1000: u32 = 0x0000_2000;
pub const PDH_FMT_NOCAP100: u32 = 0x0000_8000;

// Detail levels (`PERF_DETAIL_*`). Each wider tier is a superset.
pub const PERF_DETAIL_NOVICE: u32 = 100;
pub const PERF_DETAIL_ADVANCED: u32 = 200;
pub const PERF_DETAIL_EXPERT: u32 = 300;
pub const PERF_DETAIL_WIZARD: u32 = 400;

// `PdhExpandWildCardPath` flag bits.
pub const PDH_NOEXPANDCOUNTERS: u32 = 1;
pub const PDH_NOEXPANDINSTANCES: u32 = 2;
