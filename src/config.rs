//! Host-configurable capability flags.
//!
//! These mirror the bits of header byte 1 that the specification calls
//! out as host-configured rather than core-computed, plus the read-only
//! properties a host is expected to surface to a player (about box,
//! version string, and so on). A host may build one of these by hand or
//! load it from TOML; the interpreter itself never touches the filesystem.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    /// Header byte 1, bit 0. Controls the endianness of every 16-bit word
    /// read or written in the story image.
    pub byte_swap: bool,
    /// Header byte 1, bit 1. When set, the status line shows hours:minutes
    /// instead of score/moves.
    pub status_type: bool,
    /// Header byte 1, bit 3. Advertises Tandy-licensed text substitutions.
    pub is_tandy: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Capabilities {
            byte_swap: false,
            status_type: false,
            is_tandy: false,
        }
    }
}

impl Capabilities {
    /// Convenience constructor for hosts that keep their capability flags
    /// in a TOML config file alongside their other settings.
    pub fn from_toml(text: &str) -> Result<Capabilities, toml::de::Error> {
        toml::from_str(text)
    }
}

/// The interpreter build's own major/minor/subminor version, distinct from
/// the story file's `zorkid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterVersion {
    pub major: u16,
    pub minor: u16,
    pub subminor: u16,
}

impl InterpreterVersion {
    pub const CURRENT: InterpreterVersion = InterpreterVersion {
        major: 0,
        minor: 1,
        subminor: 0,
    };
}

/// Read-only properties derived from the loaded story file and the running
/// build, exposed to the host after construction.
#[derive(Debug, Clone)]
pub struct StoryProperties {
    pub serial: [u8; 6],
    pub zorkid: u16,
    pub checksum: u16,
    /// Header byte 1, bit 1, as configured at load time.
    pub status_type: bool,
    /// Header byte 1, bit 3, as configured at load time.
    pub is_tandy: bool,
    pub version: InterpreterVersion,
}
