pub mod archive;
pub mod filename;
