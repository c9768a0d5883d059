use crate::form::Form;
use crate::password::generate_secure_password;
use crate::validate::parse_port;
use crate::wizard::{FieldKind, FieldSpec, Flow, Report};
use dash_core::{DashError, Result};
use std::collections::BTreeSet;

pub const NO_EXTENSIONS: &str = "At least one extension must be configured.";
pub const DUPLICATE_EXTENSION: &str = "Extension numbers must be unique.";

const MEDIA_PORTS: FieldKind = FieldKind::Port { min: 1024, max: 65535 };

fn number_key(slot: u32) -> String {
    format!("ext_number_{slot}")
}

fn name_key(slot: u32) -> String {
    format!("ext_name_{slot}")
}

pub fn password_key(slot: u32) -> String {
    format!("ext_password_{slot}")
}

/// Slots of the extensions present in the form, ascending.
///
/// Each extension is stored as `ext_number_N`, `ext_name_N` and
/// `ext_password_N`.
pub fn extension_slots(form: &Form) -> Vec<u32> {
    let mut slots: Vec<u32> = form
        .names()
        .filter_map(|name| name.strip_prefix("ext_number_")?.parse().ok())
        .collect();
    slots.sort_unstable();
    slots
}

/// Append an extension numbered `100 + n` (n = extension count after the
/// add) with a generated password. Returns its slot.
pub fn add_extension(form: &mut Form) -> u32 {
    let slots = extension_slots(form);
    let count = slots.len() as u32 + 1;
    let slot = slots.last().map_or(1, |last| last + 1);

    form.set(number_key(slot), (100 + count).to_string());
    form.set(name_key(slot), format!("Extension {count}"));
    form.set(password_key(slot), generate_secure_password(12));
    slot
}

/// Remove the extension in `slot`. The last remaining one stays.
pub fn remove_extension(form: &mut Form, slot: u32) -> Result<()> {
    let slots = extension_slots(form);
    if !slots.contains(&slot) {
        return Err(DashError::Validation(format!("no extension in slot {slot}")));
    }
    if slots.len() <= 1 {
        return Err(DashError::Validation(NO_EXTENSIONS.to_string()));
    }

    form.remove(&number_key(slot));
    form.remove(&name_key(slot));
    form.remove(&password_key(slot));
    Ok(())
}

/// Five-step FreeSWITCH setup: general, extensions, SIP trunk, advanced
/// features, summary.
#[derive(Debug, Default)]
pub struct PbxFlow;

impl PbxFlow {
    pub fn new() -> Self {
        Self
    }

    /// Starting answers: service enabled, default ports and one extension.
    pub fn initial_form() -> Form {
        let mut form = Form::new();
        form.set("enabled", "true");
        form.set("sip_port", "5060");
        form.set("rtp_port_start", "16384");
        form.set("rtp_port_end", "32768");
        add_extension(&mut form);
        form
    }
}

fn enabled(on: bool) -> String {
    let label = if on { "Enabled" } else { "Disabled" };
    label.to_string()
}

impl Flow for PbxFlow {
    fn title(&self) -> &str {
        "pbx"
    }

    fn steps(&self) -> &[&'static str] {
        &["General", "Extensions", "SIP trunk", "Advanced", "Summary"]
    }

    fn fields(&self, step: usize, form: &Form) -> Vec<FieldSpec> {
        match step {
            1 => vec![
                FieldSpec::required("sip_port", MEDIA_PORTS),
                FieldSpec::required("rtp_port_start", MEDIA_PORTS),
                FieldSpec::required("rtp_port_end", MEDIA_PORTS),
            ],
            2 => extension_slots(form)
                .into_iter()
                .flat_map(|slot| {
                    [
                        FieldSpec::required(number_key(slot), FieldKind::Extension),
                        FieldSpec::required(name_key(slot), FieldKind::Text),
                        FieldSpec::required(password_key(slot), FieldKind::Text),
                    ]
                })
                .collect(),
            3 if form.checked("configure_trunk") => vec![
                FieldSpec::optional("trunk_name", FieldKind::Text),
                FieldSpec::required("trunk_host", FieldKind::Text),
                FieldSpec::required("trunk_port", FieldKind::Port { min: 1, max: 65535 }),
                FieldSpec::optional("trunk_username", FieldKind::Text),
                FieldSpec::optional("trunk_password", FieldKind::Text),
            ],
            4 if form.checked("voicemail_enabled") => {
                vec![FieldSpec::optional("voicemail_email", FieldKind::Email)]
            }
            _ => Vec::new(),
        }
    }

    fn check(&self, step: usize, form: &Form, report: &mut Report) {
        match step {
            1 => {
                let start = parse_port(form.value("rtp_port_start"), 1024, 65535);
                let end = parse_port(form.value("rtp_port_end"), 1024, 65535);
                if let (Some(start), Some(end)) = (start, end) {
                    if end <= start {
                        report.field("rtp_port_end", "The RTP range must end after it starts");
                    }
                }
            }
            2 => {
                let slots = extension_slots(form);
                if slots.is_empty() {
                    report.message(NO_EXTENSIONS);
                }

                let mut seen = BTreeSet::new();
                for slot in slots {
                    let number = form.value(&number_key(slot));
                    if !number.is_empty() && !seen.insert(number) {
                        report.field(number_key(slot), DUPLICATE_EXTENSION);
                        report.message(DUPLICATE_EXTENSION);
                    }
                }
            }
            _ => {}
        }
    }

    fn summary(&self, form: &Form) -> Vec<(String, String)> {
        let mut lines = vec![
            ("Status".to_string(), enabled(form.checked("enabled"))),
            ("SIP port".to_string(), form.value("sip_port").to_string()),
            (
                "RTP ports".to_string(),
                format!("{}-{}", form.value("rtp_port_start"), form.value("rtp_port_end")),
            ),
        ];

        for slot in extension_slots(form) {
            lines.push((
                format!("Extension {}", form.value(&number_key(slot))),
                form.value(&name_key(slot)).to_string(),
            ));
        }

        if form.checked("configure_trunk") {
            let username = form.value("trunk_username");
            lines.push(("Trunk".into(), form.value("trunk_name").into()));
            lines.push(("Trunk host".into(), form.value("trunk_host").into()));
            lines.push(("Trunk port".into(), form.value("trunk_port").into()));
            lines.push((
                "Trunk username".into(),
                (if username.is_empty() { "Not specified" } else { username }).into(),
            ));
        }

        let voicemail = form.checked("voicemail_enabled");
        lines.push(("Voicemail".into(), enabled(voicemail)));
        if voicemail {
            let email = form.value("voicemail_email");
            lines.push((
                "Voicemail email".into(),
                (if email.is_empty() { "Not configured" } else { email }).into(),
            ));
        }

        let recording = form.checked("call_recording_enabled");
        lines.push(("Call recording".into(), enabled(recording)));
        if recording {
            let mut details = Vec::new();
            if form.checked("record_inbound") {
                details.push("Inbound calls");
            }
            if form.checked("record_outbound") {
                details.push("Outbound calls");
            }
            lines.push(("Recorded".into(), details.join(", ")));
        }

        lines
    }
}
