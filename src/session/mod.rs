//! Streaming sessions: lifecycle, cancellation and the read loop.

mod cancel;
mod driver;
mod state;

pub use cancel::CancelHandle;
pub use driver::{SessionOutcome, SessionRequest, StreamSession};
pub use state::SessionState;
