#[allow(unused_macros)]
macro_rules! noop {
    ($($arg:expr),* $(,)?) => {{ $( let _ = &$arg; )* }};
}

cfg_if::cfg_if! {
    if #[cfg(feature = "defmt")] {
        pub(crate) use defmt::{debug, trace, warn};
    } else if #[cfg(feature = "log")] {
        pub(crate) use log::{debug, trace, warn};
    } else {
        pub(crate) use noop as debug;
        pub(crate) use noop as trace;
        pub(crate) use noop as warn;
    }
}
