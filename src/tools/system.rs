//! `system_info` and `get_time`

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, Local, SecondsFormat, TimeZone};
use serde::Serialize;

use crate::registry::{
    CapabilityDescriptor, Content, Failure, HandlerOutcome, ParameterSpec, ValidatedArgs,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemInfo {
    pub os: String,
    pub architecture: String,
    pub runtime_version: String,
    pub cpu_count: usize,
}

impl SystemInfo {
    pub fn current() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            architecture: std::env::consts::ARCH.to_string(),
            runtime_version: format!("rust {}", env!("CARGO_PKG_RUST_VERSION")),
            cpu_count: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

pub fn system_info_descriptor() -> CapabilityDescriptor {
    CapabilityDescriptor::new(
        "system_info",
        "Get system information (OS, architecture, runtime version, CPU count)",
    )
}

pub fn system_info(_args: &ValidatedArgs) -> HandlerOutcome {
    serde_json::to_value(SystemInfo::current())
        .map(Content::Structured)
        .map_err(|e| Failure::internal(format!("Error marshaling system info: {}", e)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormat {
    Unix,
    Rfc3339,
    Iso8601,
    Human,
}

impl TimeFormat {
    pub const NAMES: [&'static str; 4] = ["unix", "rfc3339", "iso8601", "human"];

    pub fn render<Tz>(&self, now: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        match self {
            TimeFormat::Unix => now.timestamp().to_string(),
            TimeFormat::Rfc3339 => now.to_rfc3339_opts(SecondsFormat::Secs, false),
            TimeFormat::Iso8601 => now.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string(),
            TimeFormat::Human => now.format("%Y-%m-%d %H:%M:%S %Z").to_string(),
        }
    }
}

impl FromStr for TimeFormat {
    type Err = Failure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unix" => Ok(TimeFormat::Unix),
            "rfc3339" => Ok(TimeFormat::Rfc3339),
            "iso8601" => Ok(TimeFormat::Iso8601),
            "human" => Ok(TimeFormat::Human),
            _ => Err(Failure::invalid_params(
                "Invalid format. Use 'unix', 'rfc3339', 'iso8601', or 'human'",
            )),
        }
    }
}

pub fn get_time_descriptor() -> CapabilityDescriptor {
    CapabilityDescriptor::new("get_time", "Get the current time in various formats").param(
        ParameterSpec::string(
            "format",
            "Time format: 'unix', 'rfc3339', 'iso8601', or 'human' (default)",
        )
        .one_of(&TimeFormat::NAMES)
        .with_default("human"),
    )
}

pub fn get_time(args: &ValidatedArgs) -> HandlerOutcome {
    let format: TimeFormat = args.str("format")?.parse()?;
    Ok(Content::text(format.render(&Local::now())))
}
