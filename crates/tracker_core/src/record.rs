use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder stored for any field the page did not provide.
pub const UNAVAILABLE: &str = "N/A";

fn unavailable_field() -> String {
    UNAVAILABLE.to_string()
}

/// One captured job posting.
///
/// Every field is always populated; scraped fields fall back to
/// [`UNAVAILABLE`]. Serde names match the storage document layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    #[serde(rename = "jobTitle", default = "unavailable_field")]
    pub title: String,
    #[serde(default = "unavailable_field")]
    pub location: String,
    #[serde(default = "unavailable_field")]
    pub industry: String,
    #[serde(default = "unavailable_field")]
    pub work_type: String,
    #[serde(default = "unavailable_field")]
    pub salary_range: String,
    #[serde(default = "unavailable_field")]
    pub company_name: String,
    #[serde(rename = "jobLink", default = "unavailable_field")]
    pub source_link: String,
    #[serde(rename = "scrapeDate", default = "unavailable_field")]
    pub captured_date: String,
    #[serde(rename = "scrapeTime", default = "unavailable_field")]
    pub captured_time: String,
}

impl JobRecord {
    /// A record with every field set to [`UNAVAILABLE`].
    pub fn unavailable() -> Self {
        Self {
            title: unavailable_field(),
            location: unavailable_field(),
            industry: unavailable_field(),
            work_type: unavailable_field(),
            salary_range: unavailable_field(),
            company_name: unavailable_field(),
            source_link: unavailable_field(),
            captured_date: unavailable_field(),
            captured_time: unavailable_field(),
        }
    }

    pub fn key(&self) -> JobKey {
        JobKey::new(&self.title, &self.company_name)
    }
}

/// Dedup identity of a job: title paired with company name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobKey {
    title: String,
    company: String,
}

impl JobKey {
    pub fn new(title: impl Into<String>, company: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            company: company.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    /// Key under which the job is recorded in the tracked index.
    pub fn storage_key(&self) -> String {
        format!("{}_{}", self.title, self.company)
    }
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.title, self.company)
    }
}

/// Column titles shared by the record table and the export header.
pub const COLUMN_TITLES: [&str; 9] = [
    "Job Title",
    "Company",
    "Location",
    "Industry",
    "Work Type",
    "Salary Range",
    "Date",
    "Time",
    "Job Link",
];

impl JobRecord {
    /// Field values in [`COLUMN_TITLES`] order.
    pub fn columns(&self) -> [&str; 9] {
        [
            self.title.as_str(),
            self.company_name.as_str(),
            self.location.as_str(),
            self.industry.as_str(),
            self.work_type.as_str(),
            self.salary_range.as_str(),
            self.captured_date.as_str(),
            self.captured_time.as_str(),
            self.source_link.as_str(),
        ]
    }
}
