pub mod config;
pub mod error;
pub mod http;

pub use config::{AppEnv, ClientConfig};
pub use error::SendError;
pub use http::{ChatTransport, HttpTransport, CHAT_PATH, NO_REPLY_FALLBACK};
