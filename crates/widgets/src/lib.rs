pub mod cpu;
pub mod interface_stats;
pub mod memory;
pub mod network;
pub mod pbx;
pub mod registrations;
pub mod temperature;
pub mod uptime;

pub use cpu::CpuWidget;
pub use interface_stats::InterfaceStatsWidget;
pub use memory::MemoryWidget;
pub use network::NetworkWidget;
pub use pbx::PbxWidget;
pub use registrations::RegistrationsWidget;
pub use temperature::TempWidget;
pub use uptime::UptimeWidget;

use dash_config::DashConfig;
use dash_core::DashWidget;

/// Build the widget set for a configuration, in display order.
pub fn from_config(config: &DashConfig) -> Vec<Box<dyn DashWidget>> {
    let mut widgets: Vec<Box<dyn DashWidget>> = vec![
        Box::new(CpuWidget::new()),
        Box::new(MemoryWidget::new()),
        Box::new(UptimeWidget::new()),
        Box::new(TempWidget::new()),
        Box::new(NetworkWidget::new(config.dashboard.interfaces.clone())),
    ];

    if config.pbx.enabled {
        widgets.push(Box::new(PbxWidget::new()));
        widgets.push(Box::new(RegistrationsWidget::new(config.pbx.extensions.clone())));
    }

    for stats in &config.interface_stats {
        widgets.push(Box::new(InterfaceStatsWidget::new(stats.id, stats.keys.clone())));
    }

    tracing::debug!("Built {} widgets", widgets.len());
    widgets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pbx_widgets_follow_the_toggle() {
        let mut config = DashConfig::default();
        let with_pbx = from_config(&config).len();

        config.pbx.enabled = false;
        assert_eq!(from_config(&config).len(), with_pbx - 2);
    }

    #[test]
    fn widget_ids_are_unique() {
        let mut config = DashConfig::default();
        config.interface_stats.push(dash_config::InterfaceStatsConfig {
            id: 1,
            interval_ms: 5_000,
            keys: vec!["rx_packets".into()],
        });

        let widgets = from_config(&config);
        let mut ids: Vec<&str> = widgets.iter().map(|w| w.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), widgets.len());
    }
}
