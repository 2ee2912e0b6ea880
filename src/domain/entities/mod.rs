pub mod admins;
pub mod tracks;
