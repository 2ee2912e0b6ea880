pub mod argon2_hashing;
pub mod axum_http;
pub mod jwt_authentication;
pub mod postgres;
pub mod storage;
