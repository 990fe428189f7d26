pub mod errors;
pub mod session;
pub mod store;

pub use errors::LoginError;
pub use session::{SessionManager, SessionState, SignOutListener};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, StorageError};
