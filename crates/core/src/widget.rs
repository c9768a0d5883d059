use crate::state::AppState;

/// Logical fields a widget can publish. Each one binds to exactly one
/// display target, addressed by [`Field::target_id`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    CpuUsage,
    CpuChart,
    MemoryPercent,
    MemoryBar,
    MemoryDetails,
    Uptime,
    Temperature,
    InterfaceDownload(String),
    InterfaceUpload(String),
    NetworkChart,
    PbxState,
    PbxVersion,
    PbxUptime,
    PbxCalls,
    PbxChannels,
    PbxRegistrations,
    ExtensionStatus(String),
    InterfaceStat { id: u32, key: String },
}

impl Field {
    /// Stable display-target identifier, e.g. `"net.wan.download"`.
    pub fn target_id(&self) -> String {
        match self {
            Self::CpuUsage               => "cpu.usage".into(),
            Self::CpuChart               => "cpu.chart".into(),
            Self::MemoryPercent          => "memory.percent".into(),
            Self::MemoryBar              => "memory.bar".into(),
            Self::MemoryDetails          => "memory.details".into(),
            Self::Uptime                 => "system.uptime".into(),
            Self::Temperature            => "system.temperature".into(),
            Self::InterfaceDownload(n)   => format!("net.{n}.download"),
            Self::InterfaceUpload(n)     => format!("net.{n}.upload"),
            Self::NetworkChart           => "net.chart".into(),
            Self::PbxState               => "pbx.state".into(),
            Self::PbxVersion             => "pbx.version".into(),
            Self::PbxUptime              => "pbx.uptime".into(),
            Self::PbxCalls               => "pbx.calls".into(),
            Self::PbxChannels            => "pbx.channels".into(),
            Self::PbxRegistrations       => "pbx.registrations".into(),
            Self::ExtensionStatus(ext)   => format!("extension.{ext}.status"),
            Self::InterfaceStat { id, key } => format!("iface.{id}.{key}"),
        }
    }
}

/// What a display target shows. Always replaced wholesale.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetValue {
    Text(String),
    /// Fraction in `[0, 1]`.
    Progress(f32),
    Series(Vec<Series>),
}

/// One named line of a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label:  String,
    pub points: Vec<f64>,
}

/// Field updates produced by one render pass. Fields not listed are left alone.
pub type Patch = Vec<(Field, TargetValue)>;

/// Every console widget implements this trait.
///
/// Widgets are purely reactive: they receive a read-only view of `AppState`
/// and publish updates for the fields they own. Fields whose data is absent
/// are simply left out of the patch so the previous value stays on screen.
pub trait DashWidget: Send + Sync + std::fmt::Debug {
    /// Unique string identifier, e.g. `"cpu"` or `"registrations"`.
    fn id(&self) -> &str;

    /// Every field this widget may publish. Used once to build the bindings.
    fn fields(&self) -> Vec<Field>;

    /// Render the current state into field updates.
    fn render(&self, state: &AppState) -> Patch;
}
