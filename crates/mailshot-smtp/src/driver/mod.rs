//! Protocol driver: a pure state machine and the loop that runs it.
//!
//! [`Session`] decides, [`deliver`] performs the I/O. Keeping them apart lets
//! the state machine be exercised with synthetic events.

mod deliver;
mod session;

pub use deliver::deliver;
pub use session::{Action, Event, Session, SessionState};
