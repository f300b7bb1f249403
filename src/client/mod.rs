mod rawsession;
mod session;

pub use rawsession::{Options, RawSession, State};
pub use session::UpySession;
