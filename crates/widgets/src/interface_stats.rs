use dash_core::{AppState, DashWidget, Field, Patch, TargetValue};

/// Selected counters of one interface's detail page.
#[derive(Debug)]
pub struct InterfaceStatsWidget {
    id:   u32,
    name: String,
    keys: Vec<String>,
}

impl InterfaceStatsWidget {
    pub fn new(id: u32, keys: Vec<String>) -> Self {
        Self {
            id,
            name: format!("interface-{id}"),
            keys,
        }
    }
}

impl DashWidget for InterfaceStatsWidget {
    fn id(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> Vec<Field> {
        self.keys
            .iter()
            .map(|key| Field::InterfaceStat { id: self.id, key: key.clone() })
            .collect()
    }

    fn render(&self, state: &AppState) -> Patch {
        let Some(stats) = state.interface_stats.get(&self.id) else {
            return Patch::new();
        };

        self.keys
            .iter()
            .filter_map(|key| {
                let value = stats.get(key)?;
                Some((
                    Field::InterfaceStat { id: self.id, key: key.clone() },
                    TargetValue::Text(value.clone()),
                ))
            })
            .collect()
    }
}
