use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Contract category. Determines the contract duration: five years for
/// full-time, one year for part-time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractType {
    #[default]
    #[serde(rename = "PENUH_WAKTU")]
    PenuhWaktu,
    #[serde(rename = "PARUH_WAKTU")]
    ParuhWaktu,
}

impl ContractType {
    pub fn duration_years(self) -> u32 {
        match self {
            ContractType::PenuhWaktu => 5,
            ContractType::ParuhWaktu => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    #[serde(rename = "LAKI-LAKI")]
    LakiLaki,
    #[serde(rename = "PEREMPUAN")]
    Perempuan,
}

/// Lifecycle of a contract record: New → Generated → Archived, or Error
/// when validation or archival fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmployeeStatus {
    #[default]
    New,
    Generated,
    Archived,
    Error,
}

/// One employee's contract-relevant data. Immutable for the duration of a
/// generation call. Every field except `ni_pppk` defaults to empty/zero
/// when absent from an import source.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default)]
    pub contract_number: String,
    #[serde(default)]
    pub nik: String,
    #[serde(default)]
    pub participant_id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub birth_place: String,
    #[serde(default = "default_birth_date")]
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub gender: Gender,
    pub ni_pppk: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub unit_name: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub grade_class: String,
    #[serde(default)]
    pub salary_numeric: u64,
    #[serde(default)]
    pub salary_words: String,
    #[serde(default)]
    pub graduation_year: u32,
    #[serde(default)]
    pub contract_type: ContractType,
    #[serde(default)]
    pub status: EmployeeStatus,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

fn default_birth_date() -> NaiveDate {
    NaiveDate::default()
}

impl Employee {
    /// Reject the record before any layout work happens.
    pub fn validate(&self) -> Result<(), Error> {
        if self.ni_pppk.trim().is_empty() {
            return Err(Error::InvalidRecord("niPppk must not be empty".into()));
        }
        Ok(())
    }
}

/// One numbered clause of a contract template.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TemplateArticle {
    pub title: String,
    pub subtitle: String,
    pub content: String,
}

/// Reusable contract structure: header, optional opening/closing boilerplate
/// and an ordered list of articles. The array order of `articles` is the
/// clause numbering order; nothing in the title strings overrides it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractTemplate {
    pub id: String,
    pub name: String,
    pub contract_type: ContractType,
    pub header_title: String,
    #[serde(default)]
    pub opening_text: Option<String>,
    pub articles: Vec<TemplateArticle>,
    #[serde(default)]
    pub closing_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ContractTemplate {
    pub fn validate(&self) -> Result<(), Error> {
        if self.articles.is_empty() {
            return Err(Error::InvalidTemplate(
                "template must contain at least one article".into(),
            ));
        }
        Ok(())
    }
}

/// The computed date pair for one generation call. The end date is derived
/// from the start date and contract category; the pair is recomputed on any
/// change and never persisted on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContractDates {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ContractDates {
    pub fn from_start(start: NaiveDate, contract_type: ContractType) -> Self {
        ContractDates {
            start,
            end: crate::dates::contract_end_date(start, contract_type),
        }
    }
}
