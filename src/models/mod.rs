pub mod event;
pub mod response;
pub mod session;

pub use event::*;
pub use response::*;
pub use session::*;
