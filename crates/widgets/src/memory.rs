use dash_core::{AppState, DashWidget, Field, Patch, TargetValue};
use dash_monitor::format_bytes;

/// RAM usage as a percentage, a progress bar and `used / total`.
#[derive(Debug, Default)]
pub struct MemoryWidget;

impl MemoryWidget {
    pub fn new() -> Self {
        Self
    }
}

impl DashWidget for MemoryWidget {
    fn id(&self) -> &str {
        "memory"
    }

    fn fields(&self) -> Vec<Field> {
        vec![Field::MemoryPercent, Field::MemoryBar, Field::MemoryDetails]
    }

    fn render(&self, state: &AppState) -> Patch {
        let system = &state.system;
        let mut patch = Patch::new();

        if let Some(percent) = system.memory_percent {
            patch.push((Field::MemoryPercent, TargetValue::Text(format!("{percent}%"))));
        }
        if let Some(fraction) = system.memory_fraction() {
            patch.push((Field::MemoryBar, TargetValue::Progress(fraction)));
        }
        if let (Some(used), Some(total)) = (system.memory_used, system.memory_total) {
            let details = format!("{} / {}", format_bytes(used as f64, 2), format_bytes(total as f64, 2));
            patch.push((Field::MemoryDetails, TargetValue::Text(details)));
        }

        patch
    }
}
