mod mailer;
mod push;

pub use mailer::*;
pub use push::*;
