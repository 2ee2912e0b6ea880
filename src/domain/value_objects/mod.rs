pub mod admins;
pub mod tracks;
pub mod uploads;
