// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::Cause;

#[derive(Debug)]
struct BrokenPipe;

impl std::fmt::Display for BrokenPipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "broken pipe")
    }
}

impl std::error::Error for BrokenPipe {}

#[test]
fn code_is_stored_verbatim() {
    let cause = Cause::from("timeout");
    assert_eq!(cause.path_value(), "timeout");
    assert_eq!(cause.fail_value(), "timeout");
    assert_eq!(cause.message(), None);
}

#[test]
fn captured_error_splits_names() {
    let cause = Cause::of(&BrokenPipe);
    assert_eq!(cause.path_value(), "BrokenPipe");
    assert!(cause.fail_value().ends_with("::BrokenPipe"));
    assert_ne!(cause.fail_value(), cause.path_value());
    assert_eq!(cause.message(), Some("broken pipe"));
}

#[test]
fn std_error_type_names() {
    let err = "x".parse::<u64>().unwrap_err();
    let cause = Cause::of(&err);
    assert_eq!(cause.path_value(), "ParseIntError");
    assert!(cause.fail_value().contains("ParseIntError"));
    assert!(cause.message().is_some());
}

#[test]
fn display_shows_the_path_discriminator() {
    assert_eq!(Cause::from("oops").to_string(), "oops");
    assert_eq!(Cause::of(&BrokenPipe).to_string(), "BrokenPipe");
}
