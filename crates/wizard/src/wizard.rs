use crate::form::Form;
use crate::validate::{is_valid_email, is_valid_extension, is_valid_ip, parse_port};
use tracing::debug;

pub const REQUIRED: &str = "This field is required";
pub const FIX_ERRORS: &str = "Please fix the errors before continuing.";

/// How a field's non-empty value is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Ip,
    Email,
    Extension,
    Port { min: u16, max: u16 },
}

/// A field visible on a step, given the current form values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name:     String,
    pub kind:     FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub fn required(name: impl Into<String>, kind: FieldKind) -> Self {
        Self { name: name.into(), kind, required: true }
    }

    pub fn optional(name: impl Into<String>, kind: FieldKind) -> Self {
        Self { name: name.into(), kind, required: false }
    }
}

/// Problems found by a step's own rules.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Report {
    /// Field name → inline feedback.
    pub fields:   Vec<(String, String)>,
    /// Messages for the banner.
    pub messages: Vec<String>,
}

impl Report {
    pub fn field(&mut self, name: impl Into<String>, feedback: impl Into<String>) {
        self.fields.push((name.into(), feedback.into()));
    }

    pub fn message(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !self.messages.contains(&message) {
            self.messages.push(message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.messages.is_empty()
    }
}

/// A concrete multi-step form: which fields each step shows and the
/// cross-field rules it enforces.
pub trait Flow: std::fmt::Debug {
    fn title(&self) -> &str;

    /// Step titles, in order. The length is the number of steps.
    fn steps(&self) -> &[&'static str];

    /// Fields visible on `step` (1-based) for the current answers.
    fn fields(&self, step: usize, form: &Form) -> Vec<FieldSpec>;

    /// Rules beyond "required" and the field kind.
    fn check(&self, _step: usize, _form: &Form, _report: &mut Report) {}

    /// Review lines computed from the form.
    fn summary(&self, form: &Form) -> Vec<(String, String)>;
}

/// Position in the flow. Steps are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardState {
    current: usize,
    total:   usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    Active,
    Pending,
}

impl WizardState {
    pub fn new(total: usize) -> Self {
        Self { current: 1, total: total.max(1) }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_first(&self) -> bool {
        self.current == 1
    }

    pub fn is_last(&self) -> bool {
        self.current == self.total
    }

    /// Progress bar width: 0 on the first step, 100 on the last.
    pub fn progress_percent(&self) -> u8 {
        if self.total <= 1 {
            return 100;
        }
        ((self.current - 1) * 100 / (self.total - 1)) as u8
    }

    pub fn status(&self, step: usize) -> StepStatus {
        match step.cmp(&self.current) {
            std::cmp::Ordering::Less    => StepStatus::Completed,
            std::cmp::Ordering::Equal   => StepStatus::Active,
            std::cmp::Ordering::Greater => StepStatus::Pending,
        }
    }
}

/// What a call to [`Wizard::next`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Advanced(usize),
    /// Validation failed on `step`, which is now current.
    Blocked { step: usize, banner: Vec<String> },
    /// Every step validated on the final `next`.
    Submitted,
}

/// Drives a [`Flow`] over a [`Form`].
#[derive(Debug)]
pub struct Wizard<F: Flow> {
    flow:   F,
    form:   Form,
    state:  WizardState,
    banner: Vec<String>,
}

impl<F: Flow> Wizard<F> {
    pub fn new(flow: F, form: Form) -> Self {
        let state = WizardState::new(flow.steps().len());
        Self { flow, form, state, banner: Vec::new() }
    }

    pub fn flow(&self) -> &F {
        &self.flow
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn banner(&self) -> &[String] {
        &self.banner
    }

    pub fn summary(&self) -> Vec<(String, String)> {
        self.flow.summary(&self.form)
    }

    /// Validate the current step and move forward. On the last step this
    /// submits instead, re-validating every step in order.
    pub fn next(&mut self) -> StepOutcome {
        if self.state.is_last() {
            return self.submit();
        }

        let step = self.state.current;
        if !self.validate_step(step) {
            return StepOutcome::Blocked { step, banner: self.banner.clone() };
        }

        self.state.current += 1;
        debug!("{}: advanced to step {}", self.flow.title(), self.state.current);
        StepOutcome::Advanced(self.state.current)
    }

    /// Move back one step. Never validates; a no-op on step 1.
    pub fn prev(&mut self) -> usize {
        if !self.state.is_first() {
            self.state.current -= 1;
        }
        self.state.current
    }

    /// Press `next` until the flow submits or a step blocks.
    pub fn complete(&mut self) -> StepOutcome {
        loop {
            match self.next() {
                StepOutcome::Advanced(_) => continue,
                outcome => return outcome,
            }
        }
    }

    pub fn submit(&mut self) -> StepOutcome {
        for step in 1..=self.state.total {
            if !self.validate_step(step) {
                self.state.current = step;
                return StepOutcome::Blocked { step, banner: self.banner.clone() };
            }
        }
        debug!("{}: submitted", self.flow.title());
        StepOutcome::Submitted
    }

    /// Check one step, refreshing its invalid marks and the banner.
    pub fn validate_step(&mut self, step: usize) -> bool {
        let fields = self.flow.fields(step, &self.form);
        let mut report = Report::default();

        for field in &fields {
            self.form.clear_invalid(&field.name);
            let value = self.form.value(&field.name);

            if value.is_empty() {
                if field.required {
                    report.field(field.name.clone(), REQUIRED);
                }
                continue;
            }
            if let Some(feedback) = kind_error(field.kind, value) {
                report.field(field.name.clone(), feedback);
            }
        }

        self.flow.check(step, &self.form, &mut report);

        if report.is_empty() {
            self.banner.clear();
            return true;
        }

        for (name, feedback) in &report.fields {
            // The first problem found on a field wins.
            if !self.form.is_invalid(name) {
                self.form.mark_invalid(name.clone(), feedback.clone());
            }
        }
        self.banner = report.messages;
        self.banner.push(FIX_ERRORS.to_string());
        false
    }
}

fn kind_error(kind: FieldKind, value: &str) -> Option<String> {
    match kind {
        FieldKind::Text => None,
        FieldKind::Ip if !is_valid_ip(value) => {
            Some("Invalid IP address. Expected format: xxx.xxx.xxx.xxx".into())
        }
        FieldKind::Email if !is_valid_email(value) => Some("Invalid email address".into()),
        FieldKind::Extension if !is_valid_extension(value) => {
            Some("Extension numbers must have 3 to 6 digits".into())
        }
        FieldKind::Port { min, max } if parse_port(value, min, max).is_none() => {
            Some(format!("Enter a port between {min} and {max}"))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Step 1 needs a name, step 2 an optional address, step 3 reviews.
    #[derive(Debug)]
    struct Demo;

    impl Flow for Demo {
        fn title(&self) -> &str {
            "demo"
        }
        fn steps(&self) -> &[&'static str] {
            &["Name", "Address", "Review"]
        }
        fn fields(&self, step: usize, _: &Form) -> Vec<FieldSpec> {
            match step {
                1 => vec![FieldSpec::required("name", FieldKind::Text)],
                2 => vec![FieldSpec::optional("ip", FieldKind::Ip)],
                _ => Vec::new(),
            }
        }
        fn summary(&self, form: &Form) -> Vec<(String, String)> {
            vec![("Name".into(), form.get("name").into())]
        }
    }

    #[test]
    fn empty_required_field_blocks_and_marks_it() {
        let mut wizard = Wizard::new(Demo, Form::new());
        let outcome = wizard.next();

        assert!(matches!(outcome, StepOutcome::Blocked { step: 1, .. }));
        assert_eq!(wizard.state().current(), 1);
        assert_eq!(wizard.form().feedback("name"), Some(REQUIRED));
        assert_eq!(wizard.banner().last().map(String::as_str), Some(FIX_ERRORS));
    }

    #[test]
    fn whitespace_only_counts_as_empty() {
        let mut form = Form::new();
        form.set("name", "   ");
        let mut wizard = Wizard::new(Demo, form);
        assert!(matches!(wizard.next(), StepOutcome::Blocked { .. }));
    }

    #[test]
    fn fixing_the_field_clears_the_mark() {
        let mut wizard = Wizard::new(Demo, Form::new());
        wizard.next();
        wizard.form_mut().set("name", "edge");

        assert_eq!(wizard.next(), StepOutcome::Advanced(2));
        assert!(!wizard.form().is_invalid("name"));
        assert!(wizard.banner().is_empty());
    }

    #[test]
    fn optional_field_is_still_format_checked() {
        let mut form = Form::new();
        form.set("name", "edge");
        form.set("ip", "10.0.0");
        let mut wizard = Wizard::new(Demo, form);

        wizard.next();
        assert!(matches!(wizard.next(), StepOutcome::Blocked { step: 2, .. }));
        assert!(wizard.form().is_invalid("ip"));
    }

    #[test]
    fn prev_is_unconditional_and_stops_at_one() {
        let mut form = Form::new();
        form.set("name", "edge");
        let mut wizard = Wizard::new(Demo, form);
        assert!(wizard.state().is_first());
        assert_eq!(wizard.prev(), 1);

        wizard.next();
        wizard.form_mut().set("name", "");
        assert_eq!(wizard.prev(), 1);
    }

    #[test]
    fn submit_returns_to_first_failing_step() {
        let mut form = Form::new();
        form.set("name", "edge");
        let mut wizard = Wizard::new(Demo, form);
        wizard.next();
        wizard.next();
        assert!(wizard.state().is_last());

        // Clearing an earlier answer sends submit back to that step.
        wizard.form_mut().set("name", "");
        assert!(matches!(wizard.next(), StepOutcome::Blocked { step: 1, .. }));
        assert_eq!(wizard.state().current(), 1);
    }

    #[test]
    fn submit_succeeds_when_all_steps_pass() {
        let mut form = Form::new();
        form.set("name", "edge");
        let mut wizard = Wizard::new(Demo, form);
        wizard.next();
        wizard.next();
        assert_eq!(wizard.next(), StepOutcome::Submitted);
        assert_eq!(wizard.summary(), vec![("Name".to_string(), "edge".to_string())]);
    }

    #[test]
    fn complete_stops_at_the_first_block() {
        let mut form = Form::new();
        form.set("name", "edge");
        form.set("ip", "300.1.1.1");
        let mut wizard = Wizard::new(Demo, form);
        assert!(matches!(wizard.complete(), StepOutcome::Blocked { step: 2, .. }));

        wizard.form_mut().set("ip", "10.1.1.1");
        assert_eq!(wizard.complete(), StepOutcome::Submitted);
    }

    #[test]
    fn progress_and_indicators() {
        let mut state = WizardState::new(5);
        assert_eq!(state.progress_percent(), 0);
        state.current = 3;
        assert_eq!(state.progress_percent(), 50);
        assert_eq!(state.status(2), StepStatus::Completed);
        assert_eq!(state.status(3), StepStatus::Active);
        assert_eq!(state.status(4), StepStatus::Pending);
        state.current = 5;
        assert_eq!(state.progress_percent(), 100);
    }
}
