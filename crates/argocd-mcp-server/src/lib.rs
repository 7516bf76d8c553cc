pub mod cancellation;
pub mod http;
pub mod prompts;
pub mod protocol;
pub mod server;
pub mod session;
pub mod tools;
