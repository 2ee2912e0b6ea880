pub mod admins;
pub mod object_storage;
pub mod tracks;
