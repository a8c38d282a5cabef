#[allow(dead_code)]
pub mod file_server;
