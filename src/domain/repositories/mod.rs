pub mod remote_api;
pub mod session_backend;
