use std::fmt;
use std::str::FromStr;

/// Resource kinds the resolvers memoize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    WorkOrder,
    AppVersion,
    TaskGroup,
    WorkOrderType,
    Analysis,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::WorkOrder => write!(f, "work_order"),
            ResourceKind::AppVersion => write!(f, "app_version"),
            ResourceKind::TaskGroup => write!(f, "task_group"),
            ResourceKind::WorkOrderType => write!(f, "work_order_type"),
            ResourceKind::Analysis => write!(f, "analysis"),
        }
    }
}

/// How `list` prints enriched work orders
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One compact JSON document per line
    #[default]
    Json,
    /// Indented JSON
    Pretty,
    /// One colored line per work order
    Summary,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Pretty => write!(f, "pretty"),
            OutputFormat::Summary => write!(f, "summary"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "pretty" => Ok(OutputFormat::Pretty),
            "summary" => Ok(OutputFormat::Summary),
            _ => Err(format!(
                "Unknown output format: '{s}'. Expected: json, pretty, summary"
            )),
        }
    }
}

/// Log line format on stderr
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: '{s}'. Expected: pretty, json")),
        }
    }
}
