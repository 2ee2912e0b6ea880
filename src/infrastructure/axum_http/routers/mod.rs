pub mod admin;
pub mod musics;
