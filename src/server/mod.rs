// Server module entry point
// Socket binding, the accept loop, per-connection serving and shutdown signals

pub mod connection;
pub mod guard;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is exposed as `server_loop`
#[path = "loop.rs"]
pub mod server_loop;

// Re-export commonly used items
pub use listener::bind;
pub use server_loop::run;
pub use signal::ShutdownSignal;
