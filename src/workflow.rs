//! Orchestration around the document engine: storage and validation seams,
//! file-naming conventions, and the generate/archive state transitions.
//!
//! The engine itself never touches a database or object store; callers plug
//! their backends in through the traits here.

use chrono::NaiveDate;

use crate::error::Error;
use crate::model::{ContractDates, ContractTemplate, Employee, EmployeeStatus};

/// Backend holding employee records, keyed by NI PPPK.
pub trait RecordStore {
    fn get_all(&self) -> Result<Vec<Employee>, Error>;
    fn get_by_id(&self, ni_pppk: &str) -> Result<Option<Employee>, Error>;
    /// Insert or overwrite records in bulk, as an import does.
    fn upsert_many(&self, records: &[Employee]) -> Result<(), Error>;
    fn update_status(&self, ni_pppk: &str, status: EmployeeStatus) -> Result<(), Error>;
}

/// Backend holding contract templates.
pub trait TemplateStore {
    fn get_all(&self) -> Result<Vec<ContractTemplate>, Error>;
    fn get_by_id(&self, id: &str) -> Result<Option<ContractTemplate>, Error>;
    fn create(&self, template: &ContractTemplate) -> Result<(), Error>;
    fn update(&self, template: &ContractTemplate) -> Result<(), Error>;
    fn delete(&self, id: &str) -> Result<(), Error>;
}

/// Verdict of an external check on a finished contract document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Validation {
    Pass,
    Fail(String),
}

/// Inspects a merged contract before it is archived.
pub trait ContractValidator {
    fn validate(&self, pdf: &[u8]) -> Result<Validation, Error>;
}

/// Durable byte storage for archived contracts. Returns the stored path.
pub trait BlobArchive {
    fn store(&self, path: &str, bytes: &[u8]) -> Result<String, Error>;
}

/// Result of an archive attempt, reported back to the caller verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveOutcome {
    pub archived: bool,
    pub validation_result: String,
}

const VALIDATION_PASSED: &str = "Contract Validated";

/// Name a scanned signature upload after its owner.
pub fn signature_file_name(ni_pppk: &str, suffix: &str) -> String {
    format!("{ni_pppk}_{suffix}.pdf")
}

/// Archive location of a finalized contract.
pub fn archive_path(ni_pppk: &str) -> String {
    format!("archives/{ni_pppk}_FINAL.pdf")
}

/// Look up record and template, compose the draft, and mark the record
/// Generated. The stored record's own start/end dates are ignored; the
/// supplied `start_date` is authoritative for this run.
pub fn generate_draft(
    records: &dyn RecordStore,
    templates: &dyn TemplateStore,
    ni_pppk: &str,
    template_id: &str,
    start_date: NaiveDate,
) -> Result<Vec<u8>, Error> {
    let employee = records
        .get_by_id(ni_pppk)?
        .ok_or_else(|| Error::External(format!("record {ni_pppk} not found")))?;
    let template = templates
        .get_by_id(template_id)?
        .ok_or_else(|| Error::External(format!("template {template_id} not found")))?;

    let dates = ContractDates::from_start(start_date, employee.contract_type);
    let bytes = crate::pdf::compose(&template, &employee, &dates)?;

    records.update_status(ni_pppk, EmployeeStatus::Generated)?;
    log::info!("generated draft for {ni_pppk} ({} bytes)", bytes.len());
    Ok(bytes)
}

/// Run the merged contract through validation and, on a pass, store it at
/// [`archive_path`] and mark the record Archived. A failed validation marks
/// the record Error and skips storage; the outcome carries the verdict text
/// either way.
pub fn archive_contract(
    records: &dyn RecordStore,
    validator: &dyn ContractValidator,
    archive: &dyn BlobArchive,
    ni_pppk: &str,
    final_pdf: &[u8],
) -> Result<ArchiveOutcome, Error> {
    match validator.validate(final_pdf)? {
        Validation::Pass => {
            let path = archive.store(&archive_path(ni_pppk), final_pdf)?;
            records.update_status(ni_pppk, EmployeeStatus::Archived)?;
            log::info!("archived contract for {ni_pppk} at {path}");
            Ok(ArchiveOutcome {
                archived: true,
                validation_result: VALIDATION_PASSED.to_string(),
            })
        }
        Validation::Fail(reason) => {
            records.update_status(ni_pppk, EmployeeStatus::Error)?;
            log::warn!("validation failed for {ni_pppk}: {reason}");
            Ok(ArchiveOutcome {
                archived: false,
                validation_result: reason,
            })
        }
    }
}
