pub mod catalog;
pub mod chat;
pub mod config;
pub mod constants;
pub mod fallback;
pub mod guidance;
pub mod render;
pub mod session;
pub mod session_store;
pub mod web_server;

pub use catalog::Path;
pub use config::{BatchPolicy, GuidanceConfig};
pub use guidance::{Guidance, GuidanceClient, GuidanceSource};
pub use session::{Phase, SelectionTicket, Session};
pub use session_store::SessionStore;
