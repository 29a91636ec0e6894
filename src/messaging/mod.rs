pub mod console;
pub mod observer;
pub mod traits;

pub use console::ConsoleMessenger;
pub use observer::NoopObserver;
pub use traits::{JobObserver, Messenger};
