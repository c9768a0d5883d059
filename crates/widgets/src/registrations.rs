use dash_core::{AppState, DashWidget, Field, Patch, TargetValue};

/// Online / offline badge for each configured extension.
#[derive(Debug)]
pub struct RegistrationsWidget {
    extensions: Vec<String>,
}

impl RegistrationsWidget {
    pub fn new(extensions: Vec<String>) -> Self {
        Self { extensions }
    }
}

impl DashWidget for RegistrationsWidget {
    fn id(&self) -> &str {
        "registrations"
    }

    fn fields(&self) -> Vec<Field> {
        self.extensions
            .iter()
            .map(|ext| Field::ExtensionStatus(ext.clone()))
            .collect()
    }

    fn render(&self, state: &AppState) -> Patch {
        let Some(registrations) = &state.registrations else {
            return Patch::new();
        };

        self.extensions
            .iter()
            .map(|ext| {
                let status = match registrations.iter().find(|r| &r.extension == ext) {
                    Some(reg) => format!("Online {} {}", reg.ip, reg.user_agent).trim_end().to_string(),
                    None      => "Offline".to_string(),
                };
                (Field::ExtensionStatus(ext.clone()), TargetValue::Text(status))
            })
            .collect()
    }
}
