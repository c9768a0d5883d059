//! Display side of the console: the typed field → target bindings, the
//! board holding every target's current value, alert banners, action
//! buttons and the plain-text frame drawn from all of them.

pub mod alert;
pub mod bindings;
pub mod board;
pub mod button;
pub mod frame;

pub use alert::{Alert, AlertKind, AlertQueue};
pub use bindings::{Bindings, TargetHandle, TargetKind, TargetSpec};
pub use board::DisplayBoard;
pub use button::ActionButton;
pub use frame::{progress_bar, render_frame, sparkline};
