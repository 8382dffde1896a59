use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Placeholder for any field extraction could not populate.
pub const SENTINEL: &str = "N/A";

/// Marker stored in an age-band field when the provider accepts that band.
pub const ACCEPTED: &str = "yes";

/// Number of columns in a [`ProviderRecord`] and in the output table.
pub const FIELD_COUNT: usize = 22;

/// One column of the output table.
///
/// The declaration order is the column order of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Url,
    ChildCareCenter,
    ChildCareName,
    ProgramLevel,
    ContactNo,
    Email,
    Address,
    SubsidyContractNumber,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
    Infants,
    Toddlers,
    Preschool,
    SchoolAge,
    LicensingSpecialist,
    LicensingSpecialistContactNo,
    ComplianceVisits,
}

impl Field {
    /// Every field, in column order.
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::Url,
        Field::ChildCareCenter,
        Field::ChildCareName,
        Field::ProgramLevel,
        Field::ContactNo,
        Field::Email,
        Field::Address,
        Field::SubsidyContractNumber,
        Field::Monday,
        Field::Tuesday,
        Field::Wednesday,
        Field::Thursday,
        Field::Friday,
        Field::Saturday,
        Field::Sunday,
        Field::Infants,
        Field::Toddlers,
        Field::Preschool,
        Field::SchoolAge,
        Field::LicensingSpecialist,
        Field::LicensingSpecialistContactNo,
        Field::ComplianceVisits,
    ];

    /// Column name as written in the header row.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Url => "URL",
            Field::ChildCareCenter => "ChildCare_Center",
            Field::ChildCareName => "ChildCare_Name",
            Field::ProgramLevel => "Program_Level",
            Field::ContactNo => "Contact_No",
            Field::Email => "Email",
            Field::Address => "Address",
            Field::SubsidyContractNumber => "Subsidy_Contract_Number",
            Field::Monday => "Monday",
            Field::Tuesday => "Tuesday",
            Field::Wednesday => "Wednesday",
            Field::Thursday => "Thursday",
            Field::Friday => "Friday",
            Field::Saturday => "Saturday",
            Field::Sunday => "Sunday",
            Field::Infants => "Infants_0_11_months",
            Field::Toddlers => "Toddlers_12_23_months_1yr",
            Field::Preschool => "Preschool_24_48_months_2_4_yrs",
            Field::SchoolAge => "School_age_5_years_older",
            Field::LicensingSpecialist => "Licensing_Specialist",
            Field::LicensingSpecialistContactNo => "Licensing_Specialist_contact_no",
            Field::ComplianceVisits => "Visit_for_non_compliances_OBSERVED",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    /// The header row of the output table.
    pub fn header() -> [&'static str; FIELD_COUNT] {
        Field::ALL.map(|f| f.as_str())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day of the week as labelled in a provider's hours table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Match an hours-table label exactly (`"Monday"`, ..., `"Sunday"`).
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Monday" => Some(Weekday::Monday),
            "Tuesday" => Some(Weekday::Tuesday),
            "Wednesday" => Some(Weekday::Wednesday),
            "Thursday" => Some(Weekday::Thursday),
            "Friday" => Some(Weekday::Friday),
            "Saturday" => Some(Weekday::Saturday),
            "Sunday" => Some(Weekday::Sunday),
            _ => None,
        }
    }

    pub fn field(&self) -> Field {
        match self {
            Weekday::Monday => Field::Monday,
            Weekday::Tuesday => Field::Tuesday,
            Weekday::Wednesday => Field::Wednesday,
            Weekday::Thursday => Field::Thursday,
            Weekday::Friday => Field::Friday,
            Weekday::Saturday => Field::Saturday,
            Weekday::Sunday => Field::Sunday,
        }
    }
}

/// Age band a provider may accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBand {
    Infants,
    Toddlers,
    Preschool,
    SchoolAge,
}

impl AgeBand {
    /// Bands in the order an age tag is tested against them.
    pub const ALL: [AgeBand; 4] = [
        AgeBand::Infants,
        AgeBand::Toddlers,
        AgeBand::Preschool,
        AgeBand::SchoolAge,
    ];

    /// Label the site prints inside an age tag.
    pub fn label(&self) -> &'static str {
        match self {
            AgeBand::Infants => "Infants (0-11 months)",
            AgeBand::Toddlers => "Toddlers (12-23 months; 1yr.)",
            AgeBand::Preschool => "Preschool (24-48 months; 2-4 yrs.)",
            AgeBand::SchoolAge => "School-age (5 years-older)",
        }
    }

    /// First band whose label occurs in `text`.
    pub fn find_in(text: &str) -> Option<Self> {
        AgeBand::ALL.into_iter().find(|band| text.contains(band.label()))
    }

    pub fn field(&self) -> Field {
        match self {
            AgeBand::Infants => Field::Infants,
            AgeBand::Toddlers => Field::Toddlers,
            AgeBand::Preschool => Field::Preschool,
            AgeBand::SchoolAge => Field::SchoolAge,
        }
    }
}

/// Relative URL of one facility's detail page, as found on a search page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingReference(String);

impl ListingReference {
    pub fn new(href: impl Into<String>) -> Self {
        Self(href.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ListingReference {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Extracted facility data: one value per [`Field`].
///
/// Every field always holds a value; anything not extracted stays at
/// [`SENTINEL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRecord {
    values: [String; FIELD_COUNT],
}

impl ProviderRecord {
    /// A record with every field at the sentinel.
    pub fn new() -> Self {
        Self {
            values: std::array::from_fn(|_| SENTINEL.to_string()),
        }
    }

    /// A sentinel-filled record whose URL field is already set.
    pub fn for_url(url: &str) -> Self {
        let mut record = Self::new();
        record.set(Field::Url, url);
        record
    }

    pub fn get(&self, field: Field) -> &str {
        &self.values[field.index()]
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values[field.index()] = value.into();
    }

    /// Field names in column order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> {
        Field::ALL.into_iter().map(|f| f.as_str())
    }

    /// Values in column order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    /// `(field, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL.into_iter().zip(self.values())
    }

    /// Number of fields holding something other than the sentinel.
    pub fn filled_count(&self) -> usize {
        self.values().filter(|v| *v != SENTINEL).count()
    }
}

impl Default for ProviderRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for ProviderRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FIELD_COUNT))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.as_str(), value)?;
        }
        map.end()
    }
}
