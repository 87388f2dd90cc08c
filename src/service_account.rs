//! Service-account requests and results
//!
//! A service account is a non-human identity addressed by (project, sid).
//! Keys hang off an account and are identified by their secret, which the
//! backend discloses only once, when the key is issued.

use crate::constants::{
    MIN_NAME_LENGTH, RE_VALID_SID, RE_VALID_SID_STR, SERVICE_ACCOUNT_NAME_MAX_LENGTH,
    SID_MAX_LENGTH, SID_MIN_LENGTH,
};
use crate::error::Result;
use crate::table::Table;
use crate::types::age;
use crate::validator::{char_len, trim_in_place, Validate, Validator};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rules shared by create and update; trims the free-text fields first
fn check_account(project: &str, sid: &mut String, name: &mut String, description: &mut String) -> Result<()> {
    trim_in_place(sid);
    trim_in_place(name);
    trim_in_place(description);

    let mut v = Validator::new();
    v.must(!project.is_empty(), "project", "project required");
    if v.must(!sid.is_empty(), "sid", "sid required") {
        v.must(
            RE_VALID_SID.is_match(sid),
            "sid",
            format!("sid invalid {}", RE_VALID_SID_STR),
        );
        let cnt = char_len(sid);
        v.must(
            (SID_MIN_LENGTH..=SID_MAX_LENGTH).contains(&cnt),
            "sid",
            format!(
                "sid must have length between {}-{} characters",
                SID_MIN_LENGTH, SID_MAX_LENGTH
            ),
        );
    }
    let cnt = char_len(name);
    v.must(
        (MIN_NAME_LENGTH..=SERVICE_ACCOUNT_NAME_MAX_LENGTH).contains(&cnt),
        "name",
        format!(
            "name must have length between {}-{} characters",
            MIN_NAME_LENGTH, SERVICE_ACCOUNT_NAME_MAX_LENGTH
        ),
    );
    v.finish()
}

/// Project and account reference, required by every single-account request
fn check_ref(v: &mut Validator, project: &str, id: &str) {
    v.must(!project.is_empty(), "project", "project required");
    v.must(!id.is_empty(), "id", "service account id required");
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAccountCreate {
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub sid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Validate for ServiceAccountCreate {
    fn validate(&mut self) -> Result<()> {
        check_account(&self.project, &mut self.sid, &mut self.name, &mut self.description)
    }
}

/// Replaces the display fields of an existing account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAccountUpdate {
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub sid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Validate for ServiceAccountUpdate {
    fn validate(&mut self) -> Result<()> {
        check_account(&self.project, &mut self.sid, &mut self.name, &mut self.description)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAccountGet {
    #[serde(default)]
    pub project: String,
    /// Account sid
    #[serde(default)]
    pub id: String,
}

impl Validate for ServiceAccountGet {
    fn validate(&mut self) -> Result<()> {
        let mut v = Validator::new();
        check_ref(&mut v, &self.project, &self.id);
        v.finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAccountList {
    #[serde(default)]
    pub project: String,
}

impl Validate for ServiceAccountList {
    fn validate(&mut self) -> Result<()> {
        let mut v = Validator::new();
        v.must(!self.project.is_empty(), "project", "project required");
        v.finish()
    }
}

/// Deleting an account revokes all of its keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAccountDelete {
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub id: String,
}

impl Validate for ServiceAccountDelete {
    fn validate(&mut self) -> Result<()> {
        let mut v = Validator::new();
        check_ref(&mut v, &self.project, &self.id);
        v.finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAccountCreateKey {
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub id: String,
}

impl Validate for ServiceAccountCreateKey {
    fn validate(&mut self) -> Result<()> {
        let mut v = Validator::new();
        check_ref(&mut v, &self.project, &self.id);
        v.finish()
    }
}

/// Revokes the key holding `secret`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAccountDeleteKey {
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub secret: String,
}

impl Validate for ServiceAccountDeleteKey {
    fn validate(&mut self) -> Result<()> {
        let mut v = Validator::new();
        check_ref(&mut v, &self.project, &self.id);
        v.must(!self.secret.is_empty(), "secret", "secret required");
        v.finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccountKey {
    pub secret: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub created_by: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccountGetResult {
    pub sid: String,
    pub project: String,
    /// Principal derived from sid and project
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub keys: Vec<ServiceAccountKey>,
}

fn header() -> Vec<String> {
    ["ID", "EMAIL", "NAME", "AGE"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Table for ServiceAccountGetResult {
    fn table(&self) -> Vec<Vec<String>> {
        vec![
            header(),
            vec![
                self.sid.clone(),
                self.email.clone(),
                self.name.clone(),
                age(self.created_at),
            ],
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccountListItem {
    pub sid: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub created_by: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAccountListResult {
    pub project: String,
    #[serde(default)]
    pub items: Vec<ServiceAccountListItem>,
}

impl Table for ServiceAccountListResult {
    fn table(&self) -> Vec<Vec<String>> {
        let mut table = vec![header()];
        for x in &self.items {
            table.push(vec![
                x.sid.clone(),
                x.email.clone(),
                x.name.clone(),
                age(x.created_at),
            ]);
        }
        table
    }
}
