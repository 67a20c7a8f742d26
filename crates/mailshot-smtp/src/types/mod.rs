//! Core SMTP types.

mod reply;

pub use reply::ReplyCode;
