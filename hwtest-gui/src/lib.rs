pub mod app;
pub mod dir;
pub mod export;
pub mod logger;
pub mod settings;

use hwtest::Version;

pub const VERSION: Version = Version {
    major: 0,
    minor: 4,
    patch: 0,
};

#[cfg(test)]
mod tests {
    #[test]
    fn gui_version() {
        // The GUI is released along with the test suite it runs.
        assert_eq!(super::VERSION, hwtest::VERSION);
    }
}
