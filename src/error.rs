//! Error types for the interpreter core.

use thiserror::Error;

/// Everything that can go wrong while loading or running a story file.
///
/// Conditions the specification explicitly leaves unchecked (out-of-bounds
/// memory addresses, division by zero) are not modeled here — they are
/// handled at the point of use per the Z-machine's own "not policed"
/// contract, not promoted to recoverable errors.
#[derive(Debug, Error)]
pub enum ZError {
    #[error("unsupported story file version {0} (only version 3 is supported)")]
    UnsupportedVersion(u8),

    #[error("invalid opcode 0x{opcode:02x} in {form} form")]
    InvalidOpcode { form: &'static str, opcode: u8 },

    #[error("data stack underflow")]
    StackUnderflow,

    #[error("return from the outermost call frame")]
    ReturnFromOutermost,

    #[error("save blob is malformed or truncated")]
    MalformedSaveBlob,

    #[error("step() called while a host callout is pending resume()")]
    AwaitingResume,

    #[error("resume() called without a pending callout")]
    NotAwaiting,

    #[error("resume() result did not match the pending callout")]
    MismatchedCalloutResult,
}

pub type ZResult<T> = Result<T, ZError>;
