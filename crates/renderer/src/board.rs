use crate::bindings::{Bindings, TargetSpec};
use dash_core::{Field, Patch, TargetValue};
use tracing::debug;

/// Current value of every bound display target.
///
/// Targets start empty and are overwritten wholesale by patches; a target
/// no patch mentions keeps whatever it showed before.
#[derive(Debug, Clone)]
pub struct DisplayBoard {
    bindings: Bindings,
    values:   Vec<Option<TargetValue>>,
}

impl DisplayBoard {
    pub fn new(bindings: Bindings) -> Self {
        let values = vec![None; bindings.len()];
        Self { bindings, values }
    }

    /// A board over new bindings that keeps the value of every field bound
    /// in both.
    pub fn rebind(&self, bindings: Bindings) -> Self {
        let mut board = Self::new(bindings);
        let carried: Patch = board
            .bindings
            .fields()
            .filter_map(|field| Some((field.clone(), self.value(field)?.clone())))
            .collect();
        board.apply(carried);
        board
    }

    /// Apply a patch. Returns the number of targets whose value changed.
    pub fn apply(&mut self, patch: Patch) -> usize {
        let mut changed = 0;
        for (field, value) in patch {
            let Some(handle) = self.bindings.handle(&field) else {
                debug!("No display target bound to '{}'", field.target_id());
                continue;
            };
            let slot = &mut self.values[handle.0];
            if slot.as_ref() != Some(&value) {
                *slot = Some(value);
                changed += 1;
            }
        }
        changed
    }

    pub fn value(&self, field: &Field) -> Option<&TargetValue> {
        let handle = self.bindings.handle(field)?;
        self.values[handle.0].as_ref()
    }

    /// Text shown by `field`, if it is a text target with a value.
    pub fn text(&self, field: &Field) -> Option<&str> {
        match self.value(field)? {
            TargetValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Every target in binding order, with its value if it has one.
    pub fn iter(&self) -> impl Iterator<Item = (&TargetSpec, Option<&TargetValue>)> {
        self.bindings
            .targets()
            .iter()
            .zip(self.values.iter().map(Option::as_ref))
    }
}
