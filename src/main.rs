//! routerdash — terminal admin console for a router/PBX appliance.
//!
//! Run with:  `RUST_LOG=info routerdash --base-url http://192.168.1.1`

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dash_core::ServiceAction;
use dash_runtime::Options;
use dash_wizard::{
    extension_slots, password_key, password_strength, Flow, Form, NetworkFlow, PbxFlow, StepOutcome,
    StepStatus, Wizard,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "routerdash", version, about = "Router and PBX admin console")]
struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/routerdash/routerdash.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Console base URL, overriding `global.base_url`.
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Live console (default).
    Watch,
    /// Poll every source once, print the frame and exit.
    Once,
    /// Run a restart action and report the outcome.
    Restart {
        #[arg(value_enum)]
        service: Service,
    },
    /// List visible WiFi networks.
    ScanWifi,
    /// Run a setup wizard over answers from a TOML file.
    Wizard {
        #[arg(value_enum)]
        kind:    WizardKind,
        answers: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Service {
    Network,
    Pbx,
}

impl From<Service> for ServiceAction {
    fn from(service: Service) -> Self {
        match service {
            Service::Network => ServiceAction::RestartNetwork,
            Service::Pbx     => ServiceAction::RestartPbx,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum WizardKind {
    Network,
    Pbx,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Structured logging — RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = Options {
        config_path: cli.config.unwrap_or_else(dash_config::default_path),
        base_url:    cli.base_url,
    };

    match cli.command.unwrap_or(Command::Watch) {
        Command::Watch => {
            tracing::info!("routerdash v{} starting", env!("CARGO_PKG_VERSION"));
            dash_runtime::watch(options).await?;
        }
        Command::Once => print!("{}", dash_runtime::once(options).await?),
        Command::Restart { service } => {
            let action = ServiceAction::from(service);
            match dash_runtime::restart(options, action).await {
                Ok(reply) if reply.is_empty() => println!("{}", action.success_message()),
                Ok(reply) => println!("{} ({reply})", action.success_message()),
                Err(e) => bail!("{}: {e}", action.failure_message()),
            }
        }
        Command::ScanWifi => {
            let networks = dash_runtime::scan_wifi(&options).await?;
            if networks.is_empty() {
                println!("No networks found");
            }
            for net in networks {
                println!(
                    "{:<32} ch {:<4} {:<12} {}",
                    net.ssid,
                    net.channel.map_or("-".to_string(), |c| c.to_string()),
                    net.security.as_deref().unwrap_or("open"),
                    net.signal_strength.map_or("-".to_string(), |s| format!("{s} dBm")),
                );
            }
        }
        Command::Wizard { kind, answers } => run_wizard(kind, &answers)?,
    }
    Ok(())
}

fn run_wizard(kind: WizardKind, path: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read wizard answers from '{}'", path.display()))?;
    let answers = Form::from_toml_str(&raw)?;

    match kind {
        WizardKind::Network => report(Wizard::new(NetworkFlow::new(), answers)),
        WizardKind::Pbx => {
            let mut form = PbxFlow::initial_form();
            form.merge(answers);
            let wizard = Wizard::new(PbxFlow::new(), form);
            for slot in extension_slots(wizard.form()) {
                let strength = password_strength(wizard.form().value(&password_key(slot)));
                println!("extension slot {slot}: password {}", strength.level);
            }
            report(wizard)
        }
    }
}

fn report<F: Flow>(mut wizard: Wizard<F>) -> Result<()> {
    let outcome = wizard.complete();
    let state = wizard.state();

    println!(
        "{} wizard, step {} of {} ({}%)",
        wizard.flow().title(),
        state.current(),
        state.total(),
        state.progress_percent()
    );
    for (i, title) in wizard.flow().steps().iter().enumerate() {
        let mark = match state.status(i + 1) {
            StepStatus::Completed => "x",
            StepStatus::Active    => ">",
            StepStatus::Pending   => " ",
        };
        println!("  [{mark}] {}. {title}", i + 1);
    }
    println!();

    match outcome {
        StepOutcome::Submitted => {
            for (label, value) in wizard.summary() {
                println!("{label:<24} {value}");
            }
            Ok(())
        }
        StepOutcome::Blocked { step, banner } => {
            for message in banner {
                println!("! {message}");
            }
            for (field, feedback) in wizard.form().invalid_fields() {
                println!("  {field}: {feedback}");
            }
            bail!("step {step} did not validate")
        }
        StepOutcome::Advanced(step) => bail!("wizard stopped on step {step}"),
    }
}
