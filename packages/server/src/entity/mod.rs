pub mod photo;
pub mod share_link;
pub mod share_photo;
