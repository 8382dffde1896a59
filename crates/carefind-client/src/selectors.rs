use carefind_core::error::AppError;
use carefind_core::selectors::SelectorTable;
use scraper::Selector;

/// A [`SelectorTable`] compiled into `scraper` selectors.
///
/// Compiled once up front so a bad expression is reported before any
/// page is fetched.
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub listing_card: Selector,
    pub identity: Selector,
    pub identity_name: Selector,
    pub identity_program: Selector,
    pub contact: Selector,
    pub contact_item: Selector,
    pub day_row: Selector,
    pub day_name: Selector,
    pub day_hours: Selector,
    pub age_tag: Selector,
    pub licensing: Selector,
    pub licensing_specialist: Selector,
    pub licensing_contact: Selector,
    pub visit_article: Selector,
}

impl CompiledSelectors {
    pub fn compile(table: &SelectorTable) -> Result<Self, AppError> {
        Ok(Self {
            listing_card: compile("listing_card", &table.listing_card)?,
            identity: compile("identity", &table.identity)?,
            identity_name: compile("identity_name", &table.identity_name)?,
            identity_program: compile("identity_program", &table.identity_program)?,
            contact: compile("contact", &table.contact)?,
            contact_item: compile("contact_item", &table.contact_item)?,
            day_row: compile("day_row", &table.day_row)?,
            day_name: compile("day_name", &table.day_name)?,
            day_hours: compile("day_hours", &table.day_hours)?,
            age_tag: compile("age_tag", &table.age_tag)?,
            licensing: compile("licensing", &table.licensing)?,
            licensing_specialist: compile("licensing_specialist", &table.licensing_specialist)?,
            licensing_contact: compile("licensing_contact", &table.licensing_contact)?,
            visit_article: compile("visit_article", &table.visit_article)?,
        })
    }
}

fn compile(section: &str, expr: &str) -> Result<Selector, AppError> {
    Selector::parse(expr).map_err(|e| AppError::SelectorError {
        section: section.to_string(),
        message: format!("'{expr}': {e}"),
    })
}
