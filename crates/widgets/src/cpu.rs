use dash_core::{AppState, DashWidget, Field, Patch, Series, TargetValue};

/// Average CPU usage readout plus its history chart.
#[derive(Debug, Default)]
pub struct CpuWidget;

impl CpuWidget {
    pub fn new() -> Self {
        Self
    }
}

impl DashWidget for CpuWidget {
    fn id(&self) -> &str {
        "cpu"
    }

    fn fields(&self) -> Vec<Field> {
        vec![Field::CpuUsage, Field::CpuChart]
    }

    fn render(&self, state: &AppState) -> Patch {
        let mut patch = Patch::new();

        if let Some(usage) = state.system.cpu_usage {
            patch.push((Field::CpuUsage, TargetValue::Text(format!("{usage}%"))));
        }
        if !state.cpu_history.is_empty() {
            let points = state.cpu_history.iter().map(|s| s.value).collect();
            patch.push((
                Field::CpuChart,
                TargetValue::Series(vec![Series { label: "CPU Usage".into(), points }]),
            ));
        }

        patch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn usage_is_rendered_verbatim() {
        let mut state = AppState::default();
        state.system.cpu_usage = Some(12.5);
        state.cpu_history.push(Utc::now(), 12.5);

        let patch = CpuWidget::new().render(&state);
        assert_eq!(patch[0], (Field::CpuUsage, TargetValue::Text("12.5%".into())));
        match &patch[1].1 {
            TargetValue::Series(series) => assert_eq!(series[0].points, vec![12.5]),
            other => panic!("expected a series, got {other:?}"),
        }
    }

    #[test]
    fn missing_usage_is_left_out() {
        let patch = CpuWidget::new().render(&AppState::default());
        assert!(patch.is_empty());
    }
}
