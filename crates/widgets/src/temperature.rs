use dash_core::{AppState, DashWidget, Field, Patch, TargetValue};

/// CPU temperature. Shows `N/A` when a stats response carried no reading.
#[derive(Debug, Default)]
pub struct TempWidget;

impl TempWidget {
    pub fn new() -> Self {
        Self
    }
}

impl DashWidget for TempWidget {
    fn id(&self) -> &str {
        "temperature"
    }

    fn fields(&self) -> Vec<Field> {
        vec![Field::Temperature]
    }

    fn render(&self, state: &AppState) -> Patch {
        // Nothing to say before the first stats response.
        if state.stats_at.is_none() {
            return Patch::new();
        }
        let text = match state.system.cpu_temperature {
            Some(temp) => format!("{temp:.1} °C"),
            None       => "N/A".to_string(),
        };
        vec![(Field::Temperature, TargetValue::Text(text))]
    }
}
