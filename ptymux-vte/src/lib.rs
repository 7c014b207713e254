mod actor;
mod enums;
mod params;
mod parser;
mod timeout;
mod transitions;
mod utf8;

pub use actor::Actor;
pub use enums::StringTerminator;
pub use params::{MAX_PARAMS, Param, Params};
pub use parser::{Parser, STRING_BUF_LIMIT};
pub use timeout::{StdWatchdog, Timeout, WATCHDOG_TIMEOUT};
