pub mod action;
pub mod error;
pub mod event;
pub mod history;
pub mod state;
pub mod widget;

pub use action::ServiceAction;
pub use error::{DashError, Result};
pub use event::{Message, PollData, PollResult, PollSource};
pub use history::{BoundedHistory, Sample};
pub use state::AppState;
pub use widget::{DashWidget, Field, Patch, Series, TargetValue};
