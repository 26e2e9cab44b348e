//! Official financial reports from the Mongolian Stock Exchange website.
//!
//! A company page on mse.mn carries its reported figures in one bordered
//! bootstrap table. This client fetches the page once and lifts that table
//! into plain rows of text; there is no retrying and nothing is cached.

pub mod error;

pub use error::{MseError, MseResult};

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use std::sync::LazyLock;
use std::time::Duration;

const BASE_URL: &str = "https://mse.mn";

static REPORT_TABLE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("table.table.table-bordered.table-striped.table-hover.table-condensed")
        .expect("REPORT_TABLE is a valid hardcoded selector")
});
static ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("ROW is a valid hardcoded selector"));

/// Financial report table as text cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Clone)]
pub struct MseClient {
    client: reqwest::Client,
    base_url: String,
}

impl MseClient {
    pub fn new(base_url: Option<String>, timeout: Duration) -> MseResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url
                .unwrap_or_else(|| BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }

    pub fn company_url(&self, mse_id: u32) -> String {
        format!("{}/mn/company/{}", self.base_url, mse_id)
    }

    /// Fetch the report table for a company id. `Ok(None)` when the page
    /// has no such table.
    pub async fn financial_reports(&self, mse_id: u32) -> MseResult<Option<ReportTable>> {
        let url = self.company_url(mse_id);
        tracing::debug!("Fetching MSE company page {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(MseError::Status(response.status()));
        }

        let html = response.text().await?;
        let table = parse_report_table(&html);
        if table.is_none() {
            tracing::info!("No financial report table on {}", url);
        }
        Ok(table)
    }
}

/// Extract the first report table from a company page.
///
/// Only rows and cells owned by that table are read; tables nested inside
/// its cells are skipped.
pub fn parse_report_table(html: &str) -> Option<ReportTable> {
    let document = Html::parse_document(html);
    let table = document.select(&REPORT_TABLE).next()?;

    let own_rows: Vec<ElementRef> = table
        .select(&ROW)
        .filter(|row| owning_table(row).map(|t| t.id()) == Some(table.id()))
        .collect();

    let mut headers: Vec<String> = own_rows
        .iter()
        .filter(|row| in_thead(row))
        .flat_map(|row| cells(row).filter(|c| c.value().name() == "th"))
        .map(cell_text)
        .collect();
    let body_rows: Vec<&ElementRef> = own_rows.iter().filter(|row| !in_thead(row)).collect();
    let mut rows: Vec<Vec<String>> = body_rows
        .iter()
        .map(|row| cells(row).map(cell_text).collect::<Vec<_>>())
        .filter(|cells| !cells.is_empty())
        .collect();

    // Without a <thead>, a leading row made only of <th> is the header
    if headers.is_empty() {
        if let Some(first) = body_rows.first() {
            let all_th = cells(first).all(|c| c.value().name() == "th");
            if all_th && !rows.is_empty() {
                headers = rows.remove(0);
            }
        }
    }

    Some(ReportTable { headers, rows })
}

/// Nearest enclosing `<table>`.
fn owning_table<'a>(element: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "table")
}

/// Whether the row sits in the `<thead>` of its own table.
fn in_thead(row: &ElementRef) -> bool {
    row.ancestors()
        .filter_map(ElementRef::wrap)
        .take_while(|a| a.value().name() != "table")
        .any(|a| a.value().name() == "thead")
}

/// Direct `th`/`td` children of a row.
fn cells<'a>(row: &ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|c| matches!(c.value().name(), "th" | "td"))
}

fn cell_text(cell: ElementRef) -> String {
    cell.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
