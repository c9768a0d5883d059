use dash_core::state::Uptime;
use dash_core::{AppState, DashWidget, Field, Patch, TargetValue};
use dash_monitor::format_uptime;

/// Router uptime. Consoles that send a preformatted string get it verbatim.
#[derive(Debug, Default)]
pub struct UptimeWidget;

impl UptimeWidget {
    pub fn new() -> Self {
        Self
    }
}

impl DashWidget for UptimeWidget {
    fn id(&self) -> &str {
        "uptime"
    }

    fn fields(&self) -> Vec<Field> {
        vec![Field::Uptime]
    }

    fn render(&self, state: &AppState) -> Patch {
        let text = match &state.system.uptime {
            Some(Uptime::Seconds(secs)) => format_uptime(*secs),
            Some(Uptime::Text(text))    => text.clone(),
            None                        => return Patch::new(),
        };
        vec![(Field::Uptime, TargetValue::Text(text))]
    }
}
