//! Detail-page extraction.
//!
//! A detail page is read in six independent groups (identity, contact,
//! hours, ages, licensing, visits). Each group writes its own fields and
//! leaves them at the sentinel when its markup is missing, so one absent
//! section never affects another.

use std::sync::Arc;

use carefind_core::error::AppError;
use carefind_core::models::{ACCEPTED, AgeBand, Field, ProviderRecord, Weekday};
use carefind_core::selectors::SelectorTable;
use carefind_core::traits::RecordParser;
use scraper::{ElementRef, Html, Selector};

use crate::selectors::CompiledSelectors;

const CONTACT_FIELDS: [Field; 4] = [
    Field::ContactNo,
    Field::Email,
    Field::Address,
    Field::SubsidyContractNumber,
];

/// Extracts a [`ProviderRecord`] from a facility detail page.
#[derive(Clone)]
pub struct HtmlRecordParser {
    selectors: Arc<CompiledSelectors>,
}

impl HtmlRecordParser {
    pub fn new(selectors: Arc<CompiledSelectors>) -> Self {
        Self { selectors }
    }

    pub fn from_table(table: &SelectorTable) -> Result<Self, AppError> {
        Ok(Self::new(Arc::new(CompiledSelectors::compile(table)?)))
    }
}

impl RecordParser for HtmlRecordParser {
    fn parse_record(&self, html: &str, url: &str) -> ProviderRecord {
        let document = Html::parse_document(html);
        let root = document.root_element();
        let sel = &*self.selectors;

        let mut record = ProviderRecord::for_url(url);
        read_identity(root, sel, &mut record);
        read_contact(root, sel, &mut record);
        read_hours(root, sel, &mut record);
        read_ages(root, sel, &mut record);
        read_licensing(root, sel, &mut record);
        read_visits(root, sel, &mut record);
        record
    }
}

/// Center type from the container, name and program level from its
/// following sibling headings.
fn read_identity(root: ElementRef<'_>, sel: &CompiledSelectors, record: &mut ProviderRecord) {
    let Some(container) = root.select(&sel.identity).next() else {
        return;
    };

    record.set(Field::ChildCareCenter, stripped_text(container));
    if let Some(name) = next_sibling_matching(container, &sel.identity_name) {
        record.set(Field::ChildCareName, stripped_text(name));
    }
    if let Some(program) = next_sibling_matching(container, &sel.identity_program) {
        record.set(Field::ProgramLevel, stripped_text(program));
    }
}

/// Positional: phone, email, address, subsidy contract. Missing trailing
/// items stay at the sentinel.
fn read_contact(root: ElementRef<'_>, sel: &CompiledSelectors, record: &mut ProviderRecord) {
    let Some(container) = root.select(&sel.contact).next() else {
        return;
    };

    for (field, item) in CONTACT_FIELDS.into_iter().zip(container.select(&sel.contact_item)) {
        record.set(field, stripped_text(item));
    }
}

fn read_hours(root: ElementRef<'_>, sel: &CompiledSelectors, record: &mut ProviderRecord) {
    for row in root.select(&sel.day_row) {
        let (Some(day), Some(hours)) = (
            row.select(&sel.day_name).next(),
            row.select(&sel.day_hours).next(),
        ) else {
            continue;
        };

        if let Some(weekday) = Weekday::from_label(&stripped_text(day)) {
            record.set(weekday.field(), stripped_text(hours));
        }
    }
}

fn read_ages(root: ElementRef<'_>, sel: &CompiledSelectors, record: &mut ProviderRecord) {
    for tag in root.select(&sel.age_tag) {
        if let Some(band) = AgeBand::find_in(&stripped_text(tag)) {
            record.set(band.field(), ACCEPTED);
        }
    }
}

fn read_licensing(root: ElementRef<'_>, sel: &CompiledSelectors, record: &mut ProviderRecord) {
    let Some(container) = root.select(&sel.licensing).next() else {
        return;
    };

    if let Some(specialist) = container.select(&sel.licensing_specialist).next() {
        record.set(Field::LicensingSpecialist, trimmed_text(specialist));
    }
    if let Some(contact) = container.select(&sel.licensing_contact).next() {
        record.set(Field::LicensingSpecialistContactNo, stripped_text(contact));
    }
}

/// Zero visits is indistinguishable from a missing section: sentinel, not `0`.
fn read_visits(root: ElementRef<'_>, sel: &CompiledSelectors, record: &mut ProviderRecord) {
    let count = root.select(&sel.visit_article).count();
    if count > 0 {
        record.set(Field::ComplianceVisits, count.to_string());
    }
}

/// Descendant text fragments, each trimmed, blanks dropped, concatenated.
fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Descendant text concatenated as-is, then trimmed at both ends.
fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn next_sibling_matching<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| selector.matches(sibling))
}
