use dash_core::{AppState, DashWidget, Field, Patch, Series, TargetValue};
use dash_monitor::format_bitrate;

/// Download / upload readouts for the configured interfaces and the WAN
/// throughput chart.
#[derive(Debug)]
pub struct NetworkWidget {
    interfaces: Vec<String>,
}

impl NetworkWidget {
    pub fn new(interfaces: Vec<String>) -> Self {
        Self { interfaces }
    }
}

impl DashWidget for NetworkWidget {
    fn id(&self) -> &str {
        "network"
    }

    fn fields(&self) -> Vec<Field> {
        let mut fields: Vec<Field> = self
            .interfaces
            .iter()
            .flat_map(|name| {
                [
                    Field::InterfaceDownload(name.clone()),
                    Field::InterfaceUpload(name.clone()),
                ]
            })
            .collect();
        fields.push(Field::NetworkChart);
        fields
    }

    fn render(&self, state: &AppState) -> Patch {
        let mut patch = Patch::new();

        for name in &self.interfaces {
            // No rate until the second counter sample.
            let Some(rate) = state.interfaces.get(name) else {
                continue;
            };
            patch.push((
                Field::InterfaceDownload(name.clone()),
                TargetValue::Text(format_bitrate(rate.mbits_recv())),
            ));
            patch.push((
                Field::InterfaceUpload(name.clone()),
                TargetValue::Text(format_bitrate(rate.mbits_sent())),
            ));
        }

        if !state.net_history.is_empty() {
            let (download, upload): (Vec<f64>, Vec<f64>) = state
                .net_history
                .iter()
                .map(|s| (s.value.download, s.value.upload))
                .unzip();
            patch.push((
                Field::NetworkChart,
                TargetValue::Series(vec![
                    Series { label: "Download".into(), points: download },
                    Series { label: "Upload".into(), points: upload },
                ]),
            ));
        }

        patch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use dash_core::state::{InterfaceRate, NetPoint};

    fn widget() -> NetworkWidget {
        NetworkWidget::new(vec!["wan".into(), "lan".into()])
    }

    #[test]
    fn fields_cover_every_interface() {
        let fields = widget().fields();
        assert_eq!(fields.len(), 5);
        assert!(fields.contains(&Field::InterfaceUpload("lan".into())));
    }

    #[test]
    fn only_interfaces_with_a_rate_are_patched() {
        let mut state = AppState::default();
        state.interfaces.insert(
            "wan".into(),
            InterfaceRate { recv_bytes_per_sec: 1_250_000.0, sent_bytes_per_sec: 62_500.0 },
        );
        // Unbound interfaces are ignored.
        state.interfaces.insert("eth9".into(), InterfaceRate::default());

        let patch = widget().render(&state);
        assert_eq!(
            patch,
            vec![
                (Field::InterfaceDownload("wan".into()), TargetValue::Text("10.0 Mbps".into())),
                (Field::InterfaceUpload("wan".into()), TargetValue::Text("500 Kbps".into())),
            ]
        );
    }

    #[test]
    fn chart_has_two_series() {
        let mut state = AppState::default();
        state.net_history.push(Utc::now(), NetPoint { download: 4.0, upload: 1.0 });
        state.net_history.push(Utc::now(), NetPoint { download: 6.0, upload: 2.0 });

        let patch = widget().render(&state);
        let (field, value) = &patch[0];
        assert_eq!(*field, Field::NetworkChart);
        match value {
            TargetValue::Series(series) => {
                assert_eq!(series[0].points, vec![4.0, 6.0]);
                assert_eq!(series[1].points, vec![1.0, 2.0]);
            }
            other => panic!("expected series, got {other:?}"),
        }
    }
}
