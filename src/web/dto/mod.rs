pub mod levels;
pub mod runs;
