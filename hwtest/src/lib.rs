//! Keystore test suite.
//!
//! The building blocks of the test-suite runner: the keystore selection, the fixed test seed,
//! the test definitions and the lifecycle of a single test run. Rendering is left to the GUI
//! crate, everything here is plain state and pure transitions.

pub mod detect;
pub mod device;
pub mod diff;
pub mod download;
pub mod interaction;
pub mod keystore;
pub mod result;
pub mod run;
pub mod seed;
pub mod suite;

pub use miniscript;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

pub const VERSION: Version = Version {
    major: 0,
    minor: 4,
    patch: 0,
};
