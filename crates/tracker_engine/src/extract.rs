use std::fmt;
use std::sync::Arc;

use scraper::{Html, Selector};
use tracker_core::{JobRecord, UNAVAILABLE};

const TITLE: &str = r#"h1[data-automation="job-detail-title"]"#;
const LOCATION: &str = r#"span[data-automation="job-detail-location"]"#;
const INDUSTRY: &str = r#"span[data-automation="job-detail-classifications"]"#;
const WORK_TYPE: &str = r#"span[data-automation="job-detail-work-type"]"#;
const SALARY: &str = r#"span[data-automation="job-detail-salary"]"#;
const COMPANY: &str = r#"span[data-automation="advertiser-name"]"#;
/// Container the track affordance is attached to.
const APPLY_CONTAINER: &str = r#"[data-automation="job-detail-apply"]"#;

/// Local date and time a record was captured, in display form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureStamp {
    pub date: String,
    pub time: String,
}

pub type CaptureClock = Arc<dyn Fn() -> CaptureStamp + Send + Sync>;

/// Current local time as `M/D/YYYY` and `h:mm:ss AM`.
pub fn local_capture_stamp() -> CaptureStamp {
    let now = chrono::Local::now();
    CaptureStamp {
        date: now.format("%-m/%-d/%Y").to_string(),
        time: now.format("%-I:%M:%S %p").to_string(),
    }
}

pub trait Extractor: Send + Sync {
    /// Whether `html` is a job detail view that can be tracked.
    fn is_job_detail_page(&self, html: &str) -> bool;
    /// Builds a record from the page; absent fields become [`UNAVAILABLE`].
    fn extract(&self, html: &str, page_url: &str) -> JobRecord;

    /// The record for `html` if it is a job detail page.
    fn candidate(&self, html: &str, page_url: &str) -> Option<JobRecord> {
        if self.is_job_detail_page(html) {
            Some(self.extract(html, page_url))
        } else {
            None
        }
    }
}

/// Reads job detail pages by their `data-automation` markers.
#[derive(Clone)]
pub struct JobPageExtractor {
    clock: CaptureClock,
}

impl fmt::Debug for JobPageExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobPageExtractor").finish_non_exhaustive()
    }
}

impl Default for JobPageExtractor {
    fn default() -> Self {
        Self::with_clock(Arc::new(local_capture_stamp))
    }
}

impl JobPageExtractor {
    pub fn with_clock(clock: CaptureClock) -> Self {
        Self { clock }
    }
}

impl Extractor for JobPageExtractor {
    fn is_job_detail_page(&self, html: &str) -> bool {
        let doc = Html::parse_document(html);
        Selector::parse(APPLY_CONTAINER)
            .ok()
            .is_some_and(|sel| doc.select(&sel).next().is_some())
    }

    fn extract(&self, html: &str, page_url: &str) -> JobRecord {
        let doc = Html::parse_document(html);
        let stamp = (self.clock)();
        JobRecord {
            title: field_text(&doc, TITLE),
            location: field_text(&doc, LOCATION),
            industry: field_text(&doc, INDUSTRY),
            work_type: field_text(&doc, WORK_TYPE),
            salary_range: field_text(&doc, SALARY),
            company_name: field_text(&doc, COMPANY),
            source_link: page_url.to_string(),
            captured_date: stamp.date,
            captured_time: stamp.time,
        }
    }
}

/// Whitespace-collapsed text of the first match, or the sentinel.
fn field_text(doc: &Html, css: &str) -> String {
    Selector::parse(css)
        .ok()
        .and_then(|sel| {
            doc.select(&sel)
                .next()
                .map(|node| node.text().collect::<String>())
        })
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| UNAVAILABLE.to_string())
}
