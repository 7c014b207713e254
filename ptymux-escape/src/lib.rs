mod actor;
mod cell;
mod charset;
mod color;
mod control;
mod csi;
mod dcs;
mod decrqss;
mod esc;
mod level;
mod mode;
mod options;
mod osc;
mod parser;
mod reply;

pub use actor::{ScreenActor, SpecialColor};
pub use cell::{CellAttrs, CellStyle, Hyperlink, UnderlineStyle};
pub use charset::Charset;
pub use color::{Color, Rgb};
pub use level::TermLevel;
pub use mode::{
    Mode, ModifyOtherKeys, NamedMode, NamedPrivateMode, PrivateMode, TabClearMode, TermModes,
    Theme,
};
pub use options::{ExtendedKeys, Options, Passthrough, SetClipboard};
pub use parser::Parser;
pub use ptymux_vte as vte;
pub use ptymux_vte::{StdWatchdog, StringTerminator, Timeout, WATCHDOG_TIMEOUT};
