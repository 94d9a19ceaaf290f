use super::{Error, Status, StatusKind};
use crate::ffi::bindings as b;

#[test]
fn test_kind_taxonomy() {
    assert_eq!(Status::OK.kind(), StatusKind::Success);
    assert_eq!(Status(b::PDH_CSTATUS_NEW_DATA).kind(), StatusKind::Success);
    assert_eq!(Status(b::PDH_MORE_DATA).kind(), StatusKind::MoreData);
    assert_eq!(
        Status(b::PDH_INSUFFICIENT_BUFFER).kind(),
        StatusKind::InsufficientBuffer
    );
    assert_eq!(Status(b::PDH_CSTATUS_NO_OBJECT).kind(), StatusKind::NotFound);
    assert_eq!(Status(b::PDH_CSTATUS_NO_COUNTER).kind(), StatusKind::NotFound);
    assert_eq!(Status(b::PDH_NO_DATA).kind(), StatusKind::NoData);
    assert_eq!(Status(b::PDH_INVALID_HANDLE).kind(), StatusKind::InvalidHandle);
    assert_eq!(Status(b::PDH_ACCESS_DENIED).kind(), StatusKind::AccessDenied);
    assert_eq!(Status(0xDEAD_BEEF).kind(), StatusKind::Unknown);
}

#[test]
fn test_retry_statuses() {
    assert!(Status(b::PDH_MORE_DATA).needs_larger_buffer());
    assert!(Status(b::PDH_INSUFFICIENT_BUFFER).needs_larger_buffer());
    assert!(!Status::OK.needs_larger_buffer());
    assert!(!Status(b::PDH_NO_DATA).needs_larger_buffer());
}

#[test]
fn test_check_success() {
    Status::OK.check().unwrap();
    Status(b::PDH_CSTATUS_NEW_DATA).check().unwrap();
}

#[test]
fn test_check_carries_code_and_name() {
    let err = Status(b::PDH_CSTATUS_NO_COUNTER).check().unwrap_err();
    assert_eq!(err.code(), Some(b::PDH_CSTATUS_NO_COUNTER));
    let text = err.to_string();
    assert!(text.contains("PDH_CSTATUS_NO_COUNTER"));
    assert!(text.contains(&format!("{:08X}", b::PDH_CSTATUS_NO_COUNTER)));
}

#[test]
fn test_insufficient_history_mapping() {
    for code in [b::PDH_CSTATUS_INVALID_DATA, b::PDH_INVALID_DATA] {
        let err = Status(code).check().unwrap_err();
        assert!(err.is_insufficient_history());
        assert_eq!(err.code(), Some(code));
    }
}

#[test]
fn test_unknown_code_still_reports() {
    let err = Status(0xDEAD_BEEF).check().unwrap_err();
    assert_eq!(err.code(), Some(0xDEAD_BEEF));
    assert!(err.to_string().contains("DEADBEEF"));
}

#[test]
fn test_invalid_handle_use_has_no_code() {
    assert_eq!(Error::InvalidHandleUse.code(), None);
}
