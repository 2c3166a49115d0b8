//! PPPK contract document engine: resolves `{{...}}` placeholders against
//! employee records, lays the text out as justified paragraphs on F4 pages,
//! and merges the scanned signature page into the generated draft.

mod dates;
mod error;
mod fonts;
mod merge;
mod model;
mod pdf;
mod resolve;
mod workflow;

pub use dates::{contract_end_date, format_day_long, format_long};
pub use error::{DocumentRole, Error};
pub use merge::merge_signature;
pub use model::{
    ContractDates, ContractTemplate, ContractType, Employee, EmployeeStatus, Gender,
    TemplateArticle,
};
pub use pdf::compose;
pub use resolve::{PLACEHOLDERS, Placeholder, resolve_placeholders};
pub use workflow::{
    ArchiveOutcome, BlobArchive, ContractValidator, RecordStore, TemplateStore, Validation,
    archive_contract, archive_path, generate_draft, signature_file_name,
};

use std::time::Instant;

use chrono::NaiveDate;

/// Generate a draft contract for one employee: compute the date pair from
/// `start_date` and the record's contract category, then compose the
/// document. The last page of the result is the signature placeholder.
pub fn generate_contract(
    template: &ContractTemplate,
    employee: &Employee,
    start_date: NaiveDate,
) -> Result<Vec<u8>, Error> {
    let start = Instant::now();
    let dates = ContractDates::from_start(start_date, employee.contract_type);
    let bytes = pdf::compose(template, employee, &dates)?;
    log::info!(
        "Composed contract for {} in {:?} ({} bytes)",
        employee.ni_pppk,
        start.elapsed(),
        bytes.len(),
    );
    Ok(bytes)
}

/// Replace the draft's signature placeholder page with the first page of
/// the signed document.
pub fn merge_signed_page(draft: &[u8], signed: &[u8]) -> Result<Vec<u8>, Error> {
    let start = Instant::now();
    let bytes = merge::merge_signature(draft, signed)?;
    log::info!(
        "Merged signature page in {:?} ({} bytes)",
        start.elapsed(),
        bytes.len(),
    );
    Ok(bytes)
}
