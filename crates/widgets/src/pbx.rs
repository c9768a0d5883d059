use dash_core::{AppState, DashWidget, Field, Patch, TargetValue};
use dash_monitor::format_uptime;

/// FreeSWITCH service state and its counters.
#[derive(Debug, Default)]
pub struct PbxWidget;

impl PbxWidget {
    pub fn new() -> Self {
        Self
    }
}

impl DashWidget for PbxWidget {
    fn id(&self) -> &str {
        "pbx"
    }

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::PbxState,
            Field::PbxVersion,
            Field::PbxUptime,
            Field::PbxCalls,
            Field::PbxChannels,
            Field::PbxRegistrations,
        ]
    }

    fn render(&self, state: &AppState) -> Patch {
        if state.pbx_unreachable {
            return vec![(Field::PbxState, TargetValue::Text("Unknown".into()))];
        }
        let Some(pbx) = &state.pbx else {
            return Patch::new();
        };

        let label = match (pbx.installed, pbx.running) {
            (Some(false), _) => "Not Installed",
            (_, true) => "Running",
            (_, false) => "Not Running",
        };
        let version = pbx.version.clone().unwrap_or_else(|| "N/A".into());
        let mut patch = vec![
            (Field::PbxState, TargetValue::Text(label.into())),
            (Field::PbxVersion, TargetValue::Text(version)),
        ];

        // Counters are only meaningful while the service runs.
        if pbx.running {
            let count = |n: Option<u64>| TargetValue::Text(n.unwrap_or(0).to_string());
            patch.push((Field::PbxUptime, TargetValue::Text(format_uptime(pbx.uptime_secs.unwrap_or(0)))));
            patch.push((Field::PbxCalls, count(pbx.calls)));
            patch.push((Field::PbxChannels, count(pbx.channels)));
            patch.push((Field::PbxRegistrations, count(pbx.registrations)));
        }

        patch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dash_core::state::PbxStatus;

    fn text(patch: &Patch, field: Field) -> Option<String> {
        patch.iter().find(|(f, _)| *f == field).and_then(|(_, v)| match v {
            TargetValue::Text(t) => Some(t.clone()),
            _ => None,
        })
    }

    #[test]
    fn running_service_shows_counters() {
        let mut state = AppState::default();
        state.pbx = Some(PbxStatus {
            running: true,
            version: Some("1.10.9".into()),
            uptime_secs: Some(7_200),
            calls: Some(2),
            ..Default::default()
        });

        let patch = PbxWidget::new().render(&state);
        assert_eq!(text(&patch, Field::PbxState).as_deref(), Some("Running"));
        assert_eq!(text(&patch, Field::PbxVersion).as_deref(), Some("1.10.9"));
        assert_eq!(text(&patch, Field::PbxUptime).as_deref(), Some("2 hours"));
        assert_eq!(text(&patch, Field::PbxCalls).as_deref(), Some("2"));
        assert_eq!(text(&patch, Field::PbxChannels).as_deref(), Some("0"));
    }

    #[test]
    fn stopped_service_keeps_old_counters() {
        let mut state = AppState::default();
        state.pbx = Some(PbxStatus::default());

        let patch = PbxWidget::new().render(&state);
        assert_eq!(text(&patch, Field::PbxState).as_deref(), Some("Not Running"));
        assert_eq!(text(&patch, Field::PbxVersion).as_deref(), Some("N/A"));
        assert_eq!(text(&patch, Field::PbxCalls), None);
    }

    #[test]
    fn missing_install_is_reported() {
        let mut state = AppState::default();
        state.pbx = Some(PbxStatus { installed: Some(false), ..Default::default() });

        let patch = PbxWidget::new().render(&state);
        assert_eq!(text(&patch, Field::PbxState).as_deref(), Some("Not Installed"));
        assert_eq!(text(&patch, Field::PbxCalls), None);

        state.pbx = Some(PbxStatus { installed: Some(true), running: true, ..Default::default() });
        let patch = PbxWidget::new().render(&state);
        assert_eq!(text(&patch, Field::PbxState).as_deref(), Some("Running"));
    }

    #[test]
    fn unreachable_service_is_unknown() {
        let mut state = AppState::default();
        state.pbx = Some(PbxStatus { running: true, ..Default::default() });
        state.pbx_unreachable = true;

        let patch = PbxWidget::new().render(&state);
        assert_eq!(patch, vec![(Field::PbxState, TargetValue::Text("Unknown".into()))]);
    }
}
