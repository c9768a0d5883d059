//! Multi-step configuration wizards: a navigator with forward validation
//! gates, the network and PBX flows, field validators and password tools.

pub mod form;
pub mod network;
pub mod password;
pub mod pbx;
pub mod validate;
pub mod wizard;

pub use form::Form;
pub use network::NetworkFlow;
pub use password::{generate_secure_password, password_strength, Strength, StrengthLevel};
pub use pbx::{add_extension, extension_slots, password_key, remove_extension, PbxFlow};
pub use wizard::{FieldKind, FieldSpec, Flow, Report, StepOutcome, StepStatus, Wizard, WizardState};
