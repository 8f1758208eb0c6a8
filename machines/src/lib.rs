pub mod registry;
pub mod test_pattern;

pub use test_pattern::TestPatternConsole;
