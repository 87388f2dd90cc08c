//! Disk requests and results
//!
//! A disk is a block-storage volume addressed by (location, project, name).

use crate::constants::{DISK_MAX_SIZE, MAX_NAME_LENGTH, MIN_NAME_LENGTH, RE_VALID_NAME, RE_VALID_NAME_STR};
use crate::error::{Error, Result};
use crate::table::Table;
use crate::types::{age, Status};
use crate::validator::{char_len, trim_in_place, Validate, Validator};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name pattern and length bounds, shared by create and update
fn check_name(v: &mut Validator, name: &str) {
    v.must(
        RE_VALID_NAME.is_match(name),
        "name",
        format!("name invalid {}", RE_VALID_NAME_STR),
    );
    let cnt = char_len(name);
    v.must(
        (MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&cnt),
        "name",
        format!(
            "name must have length between {}-{} characters",
            MIN_NAME_LENGTH, MAX_NAME_LENGTH
        ),
    );
}

fn check_size(v: &mut Validator, size: i64) {
    v.must(size >= 1, "size", "minimum disk size 1 Gi");
    v.must(
        size <= DISK_MAX_SIZE,
        "size",
        format!("maximum disk size {} Gi", DISK_MAX_SIZE),
    );
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskCreate {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub name: String,
    /// Size in GiB
    #[serde(default)]
    pub size: i64,
}

impl Validate for DiskCreate {
    fn validate(&mut self) -> Result<()> {
        trim_in_place(&mut self.name);

        let mut v = Validator::new();
        v.must(!self.location.is_empty(), "location", "location required");
        v.must(!self.project.is_empty(), "project", "project required");
        check_name(&mut v, &self.name);
        check_size(&mut v, self.size);
        v.finish()
    }
}

/// Replaces the disk identified by (location, project, name); every field is required
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskUpdate {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: i64,
}

impl Validate for DiskUpdate {
    fn validate(&mut self) -> Result<()> {
        trim_in_place(&mut self.name);

        let mut v = Validator::new();
        v.must(!self.location.is_empty(), "location", "location required");
        v.must(!self.project.is_empty(), "project", "project required");
        check_name(&mut v, &self.name);
        check_size(&mut v, self.size);
        v.finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskGet {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub name: String,
}

impl Validate for DiskGet {
    fn validate(&mut self) -> Result<()> {
        let mut v = Validator::new();
        v.must(!self.location.is_empty(), "location", "location required");
        v.must(!self.project.is_empty(), "project", "project required");
        v.must(!self.name.is_empty(), "name", "name required");
        v.finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskList {
    /// Narrows the listing to one location when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub project: String,
}

impl DiskList {
    /// Location filter, ignoring an empty string
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref().filter(|l| !l.is_empty())
    }
}

impl Validate for DiskList {
    fn validate(&mut self) -> Result<()> {
        let mut v = Validator::new();
        v.must(!self.project.is_empty(), "project", "project required");
        v.finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskItem {
    pub project: String,
    pub location: String,
    pub name: String,
    /// Size in GiB
    pub size: i64,
    #[serde(default)]
    pub status: Status,
    /// Operation currently in progress, empty when idle
    #[serde(default)]
    pub action: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub success_at: Option<DateTime<Utc>>,
}

impl DiskItem {
    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            format!("{}Gi", self.size),
            self.location.clone(),
            age(self.created_at),
        ]
    }
}

fn header() -> Vec<String> {
    ["NAME", "SIZE", "LOCATION", "AGE"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Table for DiskItem {
    fn table(&self) -> Vec<Vec<String>> {
        vec![header(), self.row()]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskListResult {
    #[serde(default)]
    pub items: Vec<DiskItem>,
}

impl Table for DiskListResult {
    fn table(&self) -> Vec<Vec<String>> {
        std::iter::once(header())
            .chain(self.items.iter().map(DiskItem::row))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskDelete {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub name: String,
}

impl Validate for DiskDelete {
    /// An over-long name is rejected on its own with [`Error::InvalidField`],
    /// ahead of the aggregated checks.
    fn validate(&mut self) -> Result<()> {
        trim_in_place(&mut self.name);

        let mut v = Validator::new();
        v.must(!self.location.is_empty(), "location", "location required");
        v.must(!self.project.is_empty(), "project", "project required");
        v.must(
            RE_VALID_NAME.is_match(&self.name),
            "name",
            format!("name invalid {}", RE_VALID_NAME_STR),
        );
        if char_len(&self.name) > MAX_NAME_LENGTH {
            return Err(Error::InvalidField { field: "name" });
        }
        v.finish()
    }
}

/// Window of a metrics query
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DiskMetricsTimeRange {
    Hour1,
    Hour6,
    Hour12,
    Day1,
    Day2,
    Day7,
    Day30,
    /// Any token outside the supported set; decodes fine, fails validation
    Other(String),
}

impl DiskMetricsTimeRange {
    pub const ALL: [DiskMetricsTimeRange; 7] = [
        DiskMetricsTimeRange::Hour1,
        DiskMetricsTimeRange::Hour6,
        DiskMetricsTimeRange::Hour12,
        DiskMetricsTimeRange::Day1,
        DiskMetricsTimeRange::Day2,
        DiskMetricsTimeRange::Day7,
        DiskMetricsTimeRange::Day30,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            DiskMetricsTimeRange::Hour1 => "1h",
            DiskMetricsTimeRange::Hour6 => "6h",
            DiskMetricsTimeRange::Hour12 => "12h",
            DiskMetricsTimeRange::Day1 => "1d",
            DiskMetricsTimeRange::Day2 => "2d",
            DiskMetricsTimeRange::Day7 => "7d",
            DiskMetricsTimeRange::Day30 => "30d",
            DiskMetricsTimeRange::Other(s) => s,
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, DiskMetricsTimeRange::Other(_))
    }
}

impl Default for DiskMetricsTimeRange {
    fn default() -> Self {
        DiskMetricsTimeRange::Other(String::new())
    }
}

impl From<String> for DiskMetricsTimeRange {
    fn from(s: String) -> Self {
        DiskMetricsTimeRange::from(s.as_str())
    }
}

impl From<&str> for DiskMetricsTimeRange {
    fn from(s: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .unwrap_or_else(|| DiskMetricsTimeRange::Other(s.to_string()))
    }
}

impl From<DiskMetricsTimeRange> for String {
    fn from(t: DiskMetricsTimeRange) -> Self {
        match t {
            DiskMetricsTimeRange::Other(s) => s,
            t => t.as_str().to_string(),
        }
    }
}

impl fmt::Display for DiskMetricsTimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskMetrics {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub time_range: DiskMetricsTimeRange,
}

impl Validate for DiskMetrics {
    fn validate(&mut self) -> Result<()> {
        trim_in_place(&mut self.name);

        let mut v = Validator::new();
        v.must(!self.location.is_empty(), "location", "location required");
        v.must(
            RE_VALID_NAME.is_match(&self.name),
            "name",
            format!("name invalid {}", RE_VALID_NAME_STR),
        );
        v.must(
            char_len(&self.name) <= MAX_NAME_LENGTH,
            "name",
            format!("name must have length less then {} characters", MAX_NAME_LENGTH),
        );
        v.must(!self.project.is_empty(), "project", "project required");
        v.must(self.time_range.is_valid(), "timeRange", "timeRange invalid");
        v.finish()
    }
}

/// Usage and provisioned-size series for one disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskMetricsResult {
    #[serde(default)]
    pub usage: Vec<DiskMetricsLine>,
    #[serde(default)]
    pub size: Vec<DiskMetricsLine>,
}

/// A named series of `[timestamp, value]` points
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskMetricsLine {
    pub name: String,
    #[serde(default)]
    pub points: Vec<[f64; 2]>,
}
