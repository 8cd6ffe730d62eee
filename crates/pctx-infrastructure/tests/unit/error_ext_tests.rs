//! Error Extension Tests

use pctx_domain::error::{Error, Result};
use pctx_infrastructure::error_ext::{ErrorContext, config_error};
use std::io;

fn not_found() -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, "file not found")
}

#[test]
fn test_config_context_keeps_source() {
    let result: Result<()> = Err(not_found()).config_context("loading config");

    match result {
        Err(Error::Configuration { message, source }) => {
            assert_eq!(message, "loading config: file not found");
            assert!(source.is_some());
        }
        other => panic!("Expected Configuration error, got {other:?}"),
    }
}

#[test]
fn test_config_context_passes_success_through() {
    let ok: std::result::Result<u8, io::Error> = Ok(7);
    assert_eq!(ok.config_context("unused").unwrap(), 7);
}

#[test]
fn test_config_error() {
    let error = config_error(not_found(), "bad config");

    match error {
        Error::Configuration { message, source } => {
            assert_eq!(message, "bad config");
            assert!(source.is_some());
        }
        other => panic!("Expected Configuration error, got {other:?}"),
    }
}
