use crate::form::Form;
use crate::validate::same_prefix24;
use crate::wizard::{FieldKind, FieldSpec, Flow, Report};

pub const SUBNET_CONFLICT: &str = "The LAN network cannot use the same subnet as the WAN.";
pub const DHCP_OUTSIDE_LAN: &str = "The DHCP range must be in the same subnet as the LAN address.";

const WAN_MODES: [&str; 3] = ["dhcp", "static", "pppoe"];

/// Four-step router setup: WAN, LAN, DHCP server, review.
#[derive(Debug, Default)]
pub struct NetworkFlow;

impl NetworkFlow {
    pub fn new() -> Self {
        Self
    }
}

fn wan_mode(form: &Form) -> &str {
    form.value("wan_mode")
}

impl Flow for NetworkFlow {
    fn title(&self) -> &str {
        "network"
    }

    fn steps(&self) -> &[&'static str] {
        &["WAN", "LAN", "DHCP server", "Review"]
    }

    fn fields(&self, step: usize, form: &Form) -> Vec<FieldSpec> {
        match step {
            1 => {
                let mut fields = vec![FieldSpec::required("wan_mode", FieldKind::Text)];
                match wan_mode(form) {
                    "static" => fields.extend([
                        FieldSpec::required("wan_ip", FieldKind::Ip),
                        FieldSpec::required("wan_netmask", FieldKind::Ip),
                        FieldSpec::required("wan_gateway", FieldKind::Ip),
                        FieldSpec::optional("wan_dns", FieldKind::Text),
                    ]),
                    "pppoe" => fields.extend([
                        FieldSpec::required("wan_pppoe_username", FieldKind::Text),
                        FieldSpec::required("wan_pppoe_password", FieldKind::Text),
                        FieldSpec::optional("wan_pppoe_service", FieldKind::Text),
                    ]),
                    _ => {}
                }
                fields
            }
            2 => vec![
                FieldSpec::required("lan_ip", FieldKind::Ip),
                FieldSpec::required("lan_subnet", FieldKind::Ip),
            ],
            3 if form.checked("dhcp_enabled") => vec![
                FieldSpec::required("dhcp_start", FieldKind::Ip),
                FieldSpec::required("dhcp_end", FieldKind::Ip),
            ],
            _ => Vec::new(),
        }
    }

    fn check(&self, step: usize, form: &Form, report: &mut Report) {
        match step {
            1 => {
                let mode = wan_mode(form);
                if !mode.is_empty() && !WAN_MODES.contains(&mode) {
                    report.field("wan_mode", "Choose dhcp, static or pppoe");
                }
            }
            2 => {
                let (lan_ip, wan_ip) = (form.value("lan_ip"), form.value("wan_ip"));
                if wan_mode(form) == "static"
                    && !lan_ip.is_empty()
                    && !form.value("lan_subnet").is_empty()
                    && !wan_ip.is_empty()
                    && same_prefix24(lan_ip, wan_ip)
                {
                    report.message(SUBNET_CONFLICT);
                }
            }
            3 if form.checked("dhcp_enabled") => {
                let lan_ip = form.value("lan_ip");
                let (start, end) = (form.value("dhcp_start"), form.value("dhcp_end"));
                if !lan_ip.is_empty()
                    && !start.is_empty()
                    && !end.is_empty()
                    && !(same_prefix24(start, lan_ip) && same_prefix24(end, lan_ip))
                {
                    report.message(DHCP_OUTSIDE_LAN);
                }
            }
            _ => {}
        }
    }

    fn summary(&self, form: &Form) -> Vec<(String, String)> {
        let mut lines = vec![("WAN mode".to_string(), form.value("wan_mode").to_string())];

        match wan_mode(form) {
            "static" => {
                lines.push(("WAN address".into(), form.value("wan_ip").into()));
                lines.push(("WAN netmask".into(), form.value("wan_netmask").into()));
                lines.push(("WAN gateway".into(), form.value("wan_gateway").into()));
                let dns = form.value("wan_dns");
                lines.push(("DNS servers".into(), (if dns.is_empty() { "Automatic" } else { dns }).into()));
            }
            "pppoe" => {
                lines.push(("PPPoE username".into(), form.value("wan_pppoe_username").into()));
                let service = form.value("wan_pppoe_service");
                lines.push(("PPPoE service".into(), (if service.is_empty() { "Not specified" } else { service }).into()));
            }
            _ => {}
        }

        lines.push(("LAN address".into(), form.value("lan_ip").into()));
        lines.push(("LAN subnet".into(), form.value("lan_subnet").into()));

        if form.checked("dhcp_enabled") {
            let range = format!("{} - {}", form.value("dhcp_start"), form.value("dhcp_end"));
            lines.push(("DHCP server".into(), "Enabled".into()));
            lines.push(("DHCP range".into(), range));
        } else {
            lines.push(("DHCP server".into(), "Disabled".into()));
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::{StepOutcome, Wizard, REQUIRED};

    fn wizard(answers: &[(&str, &str)]) -> Wizard<NetworkFlow> {
        let mut form = Form::new();
        for (k, v) in answers {
            form.set(*k, *v);
        }
        Wizard::new(NetworkFlow::new(), form)
    }

    #[test]
    fn dhcp_wan_needs_no_addresses() {
        let mut w = wizard(&[("wan_mode", "dhcp")]);
        assert_eq!(w.next(), StepOutcome::Advanced(2));
    }

    #[test]
    fn static_wan_requires_addresses_but_not_dns() {
        let mut w = wizard(&[("wan_mode", "static"), ("wan_ip", "203.0.113.2")]);
        assert!(matches!(w.next(), StepOutcome::Blocked { step: 1, .. }));
        assert_eq!(w.form().feedback("wan_netmask"), Some(REQUIRED));
        assert!(w.form().is_invalid("wan_gateway"));
        assert!(!w.form().is_invalid("wan_dns"));
    }

    #[test]
    fn hidden_fields_are_not_validated() {
        // Static-mode fields are ignored in PPPoE mode.
        let mut w = wizard(&[
            ("wan_mode", "pppoe"),
            ("wan_pppoe_username", "user"),
            ("wan_pppoe_password", "secret"),
            ("wan_ip", "not an ip"),
        ]);
        assert_eq!(w.next(), StepOutcome::Advanced(2));
    }

    #[test]
    fn invalid_lan_address_blocks() {
        let mut w = wizard(&[("wan_mode", "dhcp"), ("lan_ip", "192.168.1.256"), ("lan_subnet", "255.255.255.0")]);
        w.next();
        assert!(matches!(w.next(), StepOutcome::Blocked { step: 2, .. }));
        assert!(w.form().is_invalid("lan_ip"));
    }

    #[test]
    fn lan_cannot_share_static_wan_subnet() {
        let mut w = wizard(&[
            ("wan_mode", "static"),
            ("wan_ip", "192.168.1.2"),
            ("wan_netmask", "255.255.255.0"),
            ("wan_gateway", "192.168.1.254"),
            ("lan_ip", "192.168.1.1"),
            ("lan_subnet", "255.255.255.0"),
        ]);
        w.next();
        match w.next() {
            StepOutcome::Blocked { step, banner } => {
                assert_eq!(step, 2);
                assert!(banner.iter().any(|m| m == SUBNET_CONFLICT));
            }
            other => panic!("expected a block, got {other:?}"),
        }
    }

    #[test]
    fn dhcp_range_must_sit_in_lan_subnet() {
        let mut w = wizard(&[
            ("wan_mode", "dhcp"),
            ("lan_ip", "192.168.1.1"),
            ("lan_subnet", "255.255.255.0"),
            ("dhcp_enabled", "true"),
            ("dhcp_start", "192.168.1.100"),
            ("dhcp_end", "192.168.2.200"),
        ]);
        w.next();
        w.next();
        match w.next() {
            StepOutcome::Blocked { step, banner } => {
                assert_eq!(step, 3);
                assert!(banner.iter().any(|m| m == DHCP_OUTSIDE_LAN));
            }
            other => panic!("expected a block, got {other:?}"),
        }

        w.form_mut().set("dhcp_end", "192.168.1.200");
        assert_eq!(w.next(), StepOutcome::Advanced(4));
    }

    #[test]
    fn disabled_dhcp_skips_range() {
        let mut w = wizard(&[("wan_mode", "dhcp"), ("lan_ip", "10.0.0.1"), ("lan_subnet", "255.0.0.0")]);
        w.next();
        w.next();
        assert_eq!(w.next(), StepOutcome::Advanced(4));
        assert_eq!(w.next(), StepOutcome::Submitted);

        let summary = w.summary();
        assert!(summary.contains(&("DHCP server".to_string(), "Disabled".to_string())));
        assert!(summary.contains(&("LAN address".to_string(), "10.0.0.1".to_string())));
    }
}
