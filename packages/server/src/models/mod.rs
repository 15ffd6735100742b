pub mod photo;
pub mod share;
