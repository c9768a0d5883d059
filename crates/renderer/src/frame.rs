use crate::alert::AlertQueue;
use crate::board::DisplayBoard;
use crate::button::ActionButton;
use chrono::{DateTime, Local};
use dash_core::TargetValue;
use std::fmt::Write as _;

const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const BAR_WIDTH: usize = 20;

/// One-line chart of `points`, scaled between their minimum and maximum.
pub fn sparkline(points: &[f64]) -> String {
    let finite = points.iter().copied().filter(|p| p.is_finite());
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p), hi.max(p)));
    if min > max {
        return String::new();
    }

    let span = max - min;
    points
        .iter()
        .map(|&p| {
            if !p.is_finite() {
                ' '
            } else if span == 0.0 {
                BLOCKS[BLOCKS.len() / 2]
            } else {
                let idx = ((p - min) / span * (BLOCKS.len() - 1) as f64).round() as usize;
                BLOCKS[idx.min(BLOCKS.len() - 1)]
            }
        })
        .collect()
}

/// `[#####---------------]` for a fraction in `[0, 1]`.
pub fn progress_bar(fraction: f32) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * BAR_WIDTH as f32).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// Render the whole console as plain text.
pub fn render_frame(
    board: &DisplayBoard,
    alerts: &AlertQueue,
    buttons: &[ActionButton],
    time: DateTime<Local>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "routerdash  {}", time.format("%Y-%m-%d %H:%M:%S"));

    for alert in alerts.iter() {
        let _ = writeln!(out, "[{}] {}", alert.kind.tag(), alert.message);
    }

    let mut section = "";
    for (spec, value) in board.iter() {
        if spec.widget != section {
            section = spec.widget.as_str();
            let _ = writeln!(out, "\n== {section} ==");
        }

        let shown = match value {
            None                              => "--".to_string(),
            Some(TargetValue::Text(text))     => text.clone(),
            Some(TargetValue::Progress(f))    => format!("{} {:.0}%", progress_bar(*f), f * 100.0),
            Some(TargetValue::Series(series)) => series
                .iter()
                .map(|s| format!("{} {}", s.label, sparkline(&s.points)))
                .collect::<Vec<_>>()
                .join("  "),
        };
        let _ = writeln!(out, "{:<28} {shown}", spec.id);
    }

    if !buttons.is_empty() {
        out.push('\n');
        let row: Vec<String> = buttons
            .iter()
            .map(|b| {
                if b.is_enabled() {
                    format!("[{}]", b.label())
                } else {
                    format!("({})", b.label())
                }
            })
            .collect();
        let _ = writeln!(out, "{}", row.join(" "));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertKind;
    use crate::bindings::Bindings;
    use dash_core::{AppState, DashWidget, Field, Patch, ServiceAction, Series};
    use std::time::{Duration, Instant};

    #[derive(Debug)]
    struct Cpu;

    impl DashWidget for Cpu {
        fn id(&self) -> &str {
            "cpu"
        }
        fn fields(&self) -> Vec<Field> {
            vec![Field::CpuUsage, Field::CpuChart, Field::MemoryBar]
        }
        fn render(&self, _: &AppState) -> Patch {
            Patch::new()
        }
    }

    #[test]
    fn sparkline_spans_min_to_max() {
        assert_eq!(sparkline(&[0.0, 50.0, 100.0]), "▁▅█");
        assert_eq!(sparkline(&[3.0, 3.0]), "▅▅");
        assert_eq!(sparkline(&[]), "");
    }

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0.25), "[#####---------------]");
        assert_eq!(progress_bar(2.0), format!("[{}]", "#".repeat(20)));
    }

    #[test]
    fn frame_lists_targets_alerts_and_buttons() {
        let widgets: Vec<Box<dyn DashWidget>> = vec![Box::new(Cpu)];
        let mut board = DisplayBoard::new(Bindings::from_widgets(&widgets));
        board.apply(vec![
            (Field::CpuUsage, TargetValue::Text("12%".into())),
            (
                Field::CpuChart,
                TargetValue::Series(vec![Series { label: "CPU Usage".into(), points: vec![1.0, 2.0] }]),
            ),
        ]);

        let mut alerts = AlertQueue::new(Duration::from_secs(5));
        alerts.push(AlertKind::Danger, "Error while restarting network services: X", Instant::now());

        let mut pending = ActionButton::new(ServiceAction::RestartPbx);
        pending.press();
        let buttons = [ActionButton::new(ServiceAction::RestartNetwork), pending];

        let frame = render_frame(&board, &alerts, &buttons, Local::now());
        assert!(frame.contains("[ERROR] Error while restarting network services: X"));
        assert!(frame.contains("== cpu =="));
        assert!(frame.contains("12%"));
        assert!(frame.contains("CPU Usage ▁█"));
        assert!(frame.contains("memory.bar"));
        assert!(frame.contains("--"));
        assert!(frame.contains("[Restart network] (Starting PBX…)"));
    }
}
