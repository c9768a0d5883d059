use dash_core::{DashWidget, Field};
use std::collections::BTreeMap;

/// Index of a display target on the [`DisplayBoard`](crate::DisplayBoard).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetHandle(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Text,
    Progress,
    Chart,
}

impl TargetKind {
    fn of(field: &Field) -> Self {
        match field {
            Field::CpuChart | Field::NetworkChart => Self::Chart,
            Field::MemoryBar                      => Self::Progress,
            _                                     => Self::Text,
        }
    }
}

/// A display target as laid out on the board.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetSpec {
    pub id:     String,
    pub kind:   TargetKind,
    /// Widget that publishes into this target.
    pub widget: String,
}

/// Typed mapping from logical fields to display targets.
///
/// Built once from the widget set. Patches addressing a field without a
/// binding are dropped.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    handles: BTreeMap<Field, TargetHandle>,
    targets: Vec<TargetSpec>,
}

impl Bindings {
    pub fn from_widgets(widgets: &[Box<dyn DashWidget>]) -> Self {
        let mut bindings = Self::default();

        for widget in widgets {
            for field in widget.fields() {
                if bindings.handles.contains_key(&field) {
                    tracing::warn!("Field '{}' bound twice; keeping the first binding", field.target_id());
                    continue;
                }
                let handle = TargetHandle(bindings.targets.len());
                bindings.targets.push(TargetSpec {
                    id:     field.target_id(),
                    kind:   TargetKind::of(&field),
                    widget: widget.id().to_string(),
                });
                bindings.handles.insert(field, handle);
            }
        }

        bindings
    }

    pub fn handle(&self, field: &Field) -> Option<TargetHandle> {
        self.handles.get(field).copied()
    }

    pub fn targets(&self) -> &[TargetSpec] {
        &self.targets
    }

    /// Every bound field.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.handles.keys()
    }

    pub fn spec(&self, handle: TargetHandle) -> Option<&TargetSpec> {
        self.targets.get(handle.0)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dash_core::{AppState, Patch};

    #[derive(Debug)]
    struct Fixed(&'static str, Vec<Field>);

    impl DashWidget for Fixed {
        fn id(&self) -> &str {
            self.0
        }
        fn fields(&self) -> Vec<Field> {
            self.1.clone()
        }
        fn render(&self, _: &AppState) -> Patch {
            Patch::new()
        }
    }

    #[test]
    fn every_field_gets_one_target() {
        let widgets: Vec<Box<dyn DashWidget>> = vec![
            Box::new(Fixed("cpu", vec![Field::CpuUsage, Field::CpuChart])),
            Box::new(Fixed("memory", vec![Field::MemoryBar])),
        ];
        let bindings = Bindings::from_widgets(&widgets);

        assert_eq!(bindings.len(), 3);
        let chart = bindings.handle(&Field::CpuChart).unwrap();
        let spec = bindings.spec(chart).unwrap();
        assert_eq!(spec.id, "cpu.chart");
        assert_eq!(spec.kind, TargetKind::Chart);
        assert_eq!(bindings.spec(bindings.handle(&Field::MemoryBar).unwrap()).unwrap().kind, TargetKind::Progress);
        assert!(bindings.handle(&Field::PbxState).is_none());
    }

    #[test]
    fn duplicate_fields_keep_first_binding() {
        let widgets: Vec<Box<dyn DashWidget>> = vec![
            Box::new(Fixed("a", vec![Field::Uptime])),
            Box::new(Fixed("b", vec![Field::Uptime])),
        ];
        let bindings = Bindings::from_widgets(&widgets);
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings.targets()[0].widget, "a");
    }
}
