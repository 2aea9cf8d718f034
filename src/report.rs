//! PageSpeed Insights report model and the request/response plumbing around
//! it. Nothing here performs network I/O: hosts fetch the URL built by
//! [`request_url`] and hand the body to [`decode_response`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";

/// Radius of the score gauge ring, in its 120×120 view box.
pub const GAUGE_RADIUS: f64 = 52.;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Strategy {
    #[default]
    Mobile,
    Desktop,
}

/// Field-data verdict as reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "GOOD")]
    Good,
    #[serde(rename = "NEEDS IMPROVEMENT")]
    NeedsImprovement,
    #[serde(rename = "POOR")]
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Grade {
    #[strum(serialize = "good")]
    Good,
    #[strum(serialize = "needs improvement")]
    NeedsImprovement,
    #[strum(serialize = "poor")]
    Poor,
}

impl Grade {
    /// Grade of a 0–100 performance score.
    pub fn from_percent(score: u8) -> Self {
        match score {
            90..=u8::MAX => Grade::Good,
            50..=89 => Grade::NeedsImprovement,
            _ => Grade::Poor,
        }
    }

    /// Grade of a 0–1 audit score.
    pub fn from_unit_score(score: f64) -> Self {
        if score >= 0.9 {
            Grade::Good
        } else if score >= 0.5 {
            Grade::NeedsImprovement
        } else {
            Grade::Poor
        }
    }

    /// Headline shown next to the performance gauge.
    pub fn verdict(self) -> &'static str {
        match self {
            Grade::Good => "Excellent!",
            Grade::NeedsImprovement => "Needs Work",
            Grade::Poor => "Poor",
        }
    }

    pub fn stroke_color(self) -> &'static str {
        match self {
            Grade::Good => "#22c55e",
            Grade::NeedsImprovement => "#f97316",
            Grade::Poor => "#ef4444",
        }
    }
}

impl From<Category> for Grade {
    fn from(category: Category) -> Self {
        match category {
            Category::Good => Grade::Good,
            Category::NeedsImprovement => Grade::NeedsImprovement,
            Category::Poor => Grade::Poor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMetric {
    pub percentile: f64,
    pub category: Category,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMetrics {
    #[serde(rename = "LARGEST_CONTENTFUL_PAINT_MS", default, skip_serializing_if = "Option::is_none")]
    pub largest_contentful_paint: Option<FieldMetric>,
    #[serde(rename = "CUMULATIVE_LAYOUT_SHIFT_SCORE", default, skip_serializing_if = "Option::is_none")]
    pub cumulative_layout_shift: Option<FieldMetric>,
    #[serde(rename = "FIRST_INPUT_DELAY_MS", default, skip_serializing_if = "Option::is_none")]
    pub first_input_delay: Option<FieldMetric>,
    #[serde(rename = "INTERACTION_TO_NEXT_PAINT", default, skip_serializing_if = "Option::is_none")]
    pub interaction_to_next_paint: Option<FieldMetric>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadingExperience {
    #[serde(default)]
    pub metrics: Option<FieldMetrics>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LighthouseAudit {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub display_value: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Categories {
    pub performance: CategoryScore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LighthouseResult {
    pub categories: Categories,
    #[serde(default)]
    pub audits: BTreeMap<String, LighthouseAudit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpeedResponse {
    #[serde(default)]
    pub loading_experience: LoadingExperience,
    pub lighthouse_result: LighthouseResult,
}

/// Lab audits shown on the dashboard, with their labels.
pub const LAB_AUDITS: [(&str, &str); 4] = [
    ("first-contentful-paint", "First Contentful Paint"),
    ("interactive", "Time to Interactive"),
    ("speed-index", "Speed Index"),
    ("total-blocking-time", "Total Blocking Time"),
];

impl PageSpeedResponse {
    /// Performance score on a 0–100 scale.
    pub fn performance_score(&self) -> u8 {
        let score = self.lighthouse_result.categories.performance.score.unwrap_or(0.);
        (score * 100.).round().clamp(0., 100.) as u8
    }

    /// All four Core Web Vitals in dashboard order, `None` where the API had
    /// no field data.
    pub fn field_metrics(&self) -> [(Vital, Option<&FieldMetric>); 4] {
        let metrics = self.loading_experience.metrics.as_ref();
        Vital::ALL.map(|vital| (vital, metrics.and_then(|metrics| metrics.get(vital))))
    }

    /// All four lab audits in dashboard order.
    pub fn lab_metrics(&self) -> [(&'static str, Option<&LighthouseAudit>); 4] {
        LAB_AUDITS.map(|(id, label)| (label, self.lighthouse_result.audits.get(id)))
    }

    pub fn summary(&self) -> ReportSummary {
        let score = self.performance_score();
        ReportSummary {
            score,
            grade: Grade::from_percent(score),
            field: self
                .field_metrics()
                .into_iter()
                .map(|(vital, metric)| SummaryRow {
                    label: vital.label(),
                    value: metric
                        .and_then(|metric| vital.format(metric.percentile))
                        .unwrap_or_else(|| NOT_AVAILABLE.into()),
                    grade: metric.map(|metric| metric.category.into()),
                })
                .collect(),
            lab: self
                .lab_metrics()
                .into_iter()
                .map(|(label, audit)| SummaryRow {
                    label,
                    value: audit
                        .and_then(|audit| audit.display_value.clone())
                        .filter(|value| !value.is_empty())
                        .unwrap_or_else(|| NOT_AVAILABLE.into()),
                    grade: audit.and_then(|audit| audit.score).map(Grade::from_unit_score),
                })
                .collect(),
        }
    }
}

/// Placeholder for a metric the report has no value for.
pub const NOT_AVAILABLE: &str = "N/A";

/// A Core Web Vital from the field data section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vital {
    LargestContentfulPaint,
    CumulativeLayoutShift,
    FirstInputDelay,
    InteractionToNextPaint,
}

impl Vital {
    pub const ALL: [Vital; 4] = [
        Vital::LargestContentfulPaint,
        Vital::CumulativeLayoutShift,
        Vital::FirstInputDelay,
        Vital::InteractionToNextPaint,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Vital::LargestContentfulPaint => "Largest Contentful Paint",
            Vital::CumulativeLayoutShift => "Cumulative Layout Shift",
            Vital::FirstInputDelay => "First Input Delay",
            Vital::InteractionToNextPaint => "Interaction to Next Paint",
        }
    }

    /// Display form of a percentile; `None` for a zero reading.
    pub fn format(self, percentile: f64) -> Option<String> {
        if percentile == 0. {
            return None;
        }
        Some(match self {
            Vital::LargestContentfulPaint => format!("{:.2}s", percentile / 1000.),
            // reported multiplied by 100
            Vital::CumulativeLayoutShift => format!("{:.2}", percentile / 100.),
            Vital::FirstInputDelay | Vital::InteractionToNextPaint => format!("{}ms", percentile),
        })
    }
}

impl FieldMetrics {
    pub fn get(&self, vital: Vital) -> Option<&FieldMetric> {
        match vital {
            Vital::LargestContentfulPaint => self.largest_contentful_paint.as_ref(),
            Vital::CumulativeLayoutShift => self.cumulative_layout_shift.as_ref(),
            Vital::FirstInputDelay => self.first_input_delay.as_ref(),
            Vital::InteractionToNextPaint => self.interaction_to_next_paint.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub label: &'static str,
    pub value: String,
    pub grade: Option<Grade>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub score: u8,
    pub grade: Grade,
    pub field: Vec<SummaryRow>,
    pub lab: Vec<SummaryRow>,
}

impl std::fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Performance: {} ({}) {}", self.score, self.grade, self.grade.verdict())?;
        for (title, rows) in [("Core Web Vitals", &self.field), ("Lab data", &self.lab)] {
            writeln!(f, "{}:", title)?;
            for row in rows {
                match row.grade {
                    Some(grade) => writeln!(f, "  {}: {} ({})", row.label, row.value, grade)?,
                    None => writeln!(f, "  {}: {}", row.label, row.value)?,
                }
            }
        }
        Ok(())
    }
}

/// Stroke dash offset drawing `score` percent of the gauge ring.
pub fn gauge_dash_offset(score: u8) -> f64 {
    let circumference = std::f64::consts::TAU * GAUGE_RADIUS;
    circumference - f64::from(score.min(100)) / 100. * circumference
}

#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    #[error("Please enter a URL.")]
    EmptyUrl,

    #[error("invalid URL {input:?}: {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{0}")]
    Api(String),

    #[error("malformed report: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Turns user input into the URL to analyze, assuming `https://` when no
/// scheme is given.
pub fn normalize_target(input: &str) -> Result<Url, ReportError> {
    if input.is_empty() {
        return Err(ReportError::EmptyUrl);
    }
    let lower = input.to_ascii_lowercase();
    let full = if lower.starts_with("http://") || lower.starts_with("https://") {
        input.to_string()
    } else {
        format!("https://{}", input)
    };
    Url::parse(&full).map_err(|source| ReportError::InvalidUrl {
        input: input.to_string(),
        source,
    })
}

pub fn request_url(endpoint: &Url, target: &Url, strategy: Strategy, api_key: Option<&str>) -> Url {
    let mut url = endpoint.clone();
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("url", target.as_str());
        query.append_pair("strategy", &strategy.to_string());
        if let Some(key) = api_key {
            query.append_pair("key", key);
        }
    }
    url
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

/// Interprets an API response. Non-2xx statuses become [`ReportError::Api`]
/// carrying the API's own message when it sent one.
pub fn decode_response(status: u16, body: &str) -> Result<PageSpeedResponse, ReportError> {
    if (200..300).contains(&status) {
        return Ok(serde_json::from_str(body)?);
    }
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|body| body.error.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("An error occurred: {}", status));
    Err(ReportError::Api(message))
}
