// HTTP API (actix-web)
pub mod http;
