//! Presentational table contract
//!
//! `TableView::build` turns a view-model into what a table shows: a loading
//! placeholder, a failed first load, an explicit empty state, or one page of
//! rows. User actions
//! come back as `TableIntent`s and are applied with `dispatch`.

use crm_shared::{
    CallbackField, CallbackRequest, ClosedSet, Consultation, ConsultationField, DemoField,
    DemoRequest, Email, EmailField, Lead, LeadField, Record, WhatsAppField, WhatsAppMessage,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{DashboardError, DashboardResult};
use crate::pagination::PageMeta;
use crate::query::{SortDirection, StatusTab};
use crate::view_model::ViewModel;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

pub struct Column<R: Record> {
    pub header: &'static str,
    pub sort: Option<R::Field>,
    pub cell: fn(&R) -> String,
}

/// Column layout for one entity kind
pub trait TableColumns: Record {
    fn columns() -> Vec<Column<Self>>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderCell {
    pub label: &'static str,
    /// Field key emitted with a sort intent, if the column is sortable
    pub sort_key: Option<&'static str>,
    pub indicator: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub id: Uuid,
    pub cells: Vec<String>,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TableView {
    Loading {
        title: &'static str,
    },
    /// The first load failed; nothing is held to show
    Error {
        title: &'static str,
        message: String,
        retryable: bool,
    },
    Empty {
        title: &'static str,
        message: String,
    },
    Rows {
        title: &'static str,
        headers: Vec<HeaderCell>,
        rows: Vec<TableRow>,
        meta: PageMeta,
    },
}

/// Sort indicator for a column header
pub fn sort_indicator(active: bool, direction: SortDirection) -> &'static str {
    match (active, direction) {
        (false, _) => "⇅",
        (true, SortDirection::Asc) => "▲",
        (true, SortDirection::Desc) => "▼",
    }
}

impl TableView {
    pub fn build<R: TableColumns>(vm: &ViewModel<R>) -> Self {
        let title = R::KIND.label();
        if vm.is_loading() {
            return TableView::Loading { title };
        }
        if let (Some(err), false) = (vm.last_error(), vm.has_loaded()) {
            return TableView::Error {
                title,
                message: err.to_string(),
                retryable: err.is_retryable(),
            };
        }

        let projection = vm.projection();
        if projection.is_empty() {
            return TableView::Empty {
                title,
                message: empty_message(vm),
            };
        }

        let columns = R::columns();
        let headers = columns
            .iter()
            .map(|column| HeaderCell {
                label: column.header,
                sort_key: column.sort.map(|field| field.as_str()),
                indicator: match column.sort {
                    Some(field) => sort_indicator(field == vm.sort_field(), vm.sort_direction()),
                    None => "",
                },
            })
            .collect();
        let meta = projection.meta();
        let rows = projection
            .items
            .iter()
            .map(|record| TableRow {
                id: record.id(),
                cells: columns.iter().map(|column| (column.cell)(record)).collect(),
                selected: vm.is_selected(record.id()),
            })
            .collect();

        TableView::Rows {
            title,
            headers,
            rows,
            meta,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            TableView::Loading { title }
            | TableView::Error { title, .. }
            | TableView::Empty { title, .. }
            | TableView::Rows { title, .. } => title,
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            TableView::Rows { rows, .. } => rows.len(),
            _ => 0,
        }
    }

    /// Plain-text rendering for terminals and logs
    pub fn render_text(&self) -> String {
        match self {
            TableView::Loading { title } => format!("{}\n  Loading…\n", title),
            TableView::Error {
                title,
                message,
                retryable,
            } => {
                let hint = if *retryable { "\n  Reload to try again" } else { "" };
                format!("{}\n  Failed to load: {}{}\n", title, message, hint)
            }
            TableView::Empty { title, message } => format!("{}\n  {}\n", title, message),
            TableView::Rows {
                title,
                headers,
                rows,
                meta,
            } => render_rows(title, headers, rows, meta),
        }
    }
}

fn empty_message<R: Record>(vm: &ViewModel<R>) -> String {
    let label = R::KIND.label().to_lowercase();
    let query = vm.search_query();
    match (query.is_empty(), vm.active_status()) {
        (false, _) => format!("No {} match \"{}\"", label, query),
        (true, StatusTab::Only(status)) => format!("No {} with status {}", label, status),
        (true, StatusTab::All) => format!("No {} yet", label),
    }
}

fn render_rows(title: &str, headers: &[HeaderCell], rows: &[TableRow], meta: &PageMeta) -> String {
    let labels: Vec<String> = headers
        .iter()
        .map(|header| {
            if header.indicator.is_empty() {
                header.label.to_string()
            } else {
                format!("{} {}", header.label, header.indicator)
            }
        })
        .collect();

    let mut widths: Vec<usize> = labels.iter().map(|label| label.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(&row.cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |marker: &str, cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect();
        format!("{} {}\n", marker, padded.join(" | ").trim_end())
    };

    let mut out = format!("{}\n", title);
    out.push_str(&line(" ", &labels));
    for row in rows {
        out.push_str(&line(if row.selected { "*" } else { " " }, &row.cells));
    }
    if let Some((first, last)) = meta.item_range() {
        out.push_str(&format!(
            "  Showing {}-{} of {} · page {}/{}\n",
            first, last, meta.total, meta.page, meta.total_pages
        ));
    }
    out
}

/// A user action on a table
#[derive(Debug, Clone, PartialEq)]
pub enum TableIntent<R: Record> {
    Sort(R::Field),
    PageChange(usize),
    Search(String),
    StatusTab(StatusTab<R::Status>),
    Select(Uuid),
    Edit(Uuid),
    Delete(Uuid),
}

/// What the caller should do after an intent was applied
#[derive(Debug, Clone, PartialEq)]
pub enum IntentOutcome<R> {
    Applied,
    /// Open the form overlay on this record
    OpenEditor(R),
    Deleted(R),
}

pub async fn dispatch<R: Record>(
    vm: &mut ViewModel<R>,
    intent: TableIntent<R>,
) -> DashboardResult<IntentOutcome<R>> {
    match intent {
        TableIntent::Sort(field) => vm.handle_sort(field),
        TableIntent::PageChange(page) => {
            vm.set_current_page(page);
        }
        TableIntent::Search(query) => vm.set_search_query(query),
        TableIntent::StatusTab(tab) => vm.set_active_status(tab),
        TableIntent::Select(id) => {
            vm.toggle_selection(id)?;
        }
        TableIntent::Edit(id) => {
            let record = vm
                .get(id)
                .cloned()
                .ok_or_else(|| DashboardError::not_found(R::KIND, id))?;
            return Ok(IntentOutcome::OpenEditor(record));
        }
        TableIntent::Delete(id) => {
            let removed = vm.delete(id).await?;
            return Ok(IntentOutcome::Deleted(removed));
        }
    }
    Ok(IntentOutcome::Applied)
}

fn date(value: &chrono::DateTime<chrono::Utc>) -> String {
    value.format(DATE_FORMAT).to_string()
}

fn optional_date(value: &Option<chrono::DateTime<chrono::Utc>>) -> String {
    value.as_ref().map(date).unwrap_or_else(|| "-".to_string())
}

impl TableColumns for Lead {
    fn columns() -> Vec<Column<Self>> {
        vec![
            Column { header: "Name", sort: Some(LeadField::Name), cell: |l| l.name.clone() },
            Column { header: "Company", sort: Some(LeadField::Company), cell: |l| l.company.clone() },
            Column { header: "Email", sort: None, cell: |l| l.email.clone() },
            Column { header: "Status", sort: Some(LeadField::Status), cell: |l| l.status.to_string() },
            Column {
                header: "Value",
                sort: Some(LeadField::Value),
                cell: |l| l.value.map(|v| format!("${}", v)).unwrap_or_default(),
            },
            Column { header: "Created", sort: Some(LeadField::CreatedAt), cell: |l| date(&l.created_at) },
        ]
    }
}

impl TableColumns for DemoRequest {
    fn columns() -> Vec<Column<Self>> {
        vec![
            Column { header: "Name", sort: Some(DemoField::Name), cell: |d| d.name.clone() },
            Column { header: "Company", sort: Some(DemoField::Company), cell: |d| d.company.clone() },
            Column { header: "Product", sort: None, cell: |d| d.product.clone() },
            Column {
                header: "Preferred",
                sort: Some(DemoField::PreferredDate),
                cell: |d| optional_date(&d.preferred_date),
            },
            Column { header: "Status", sort: Some(DemoField::Status), cell: |d| d.status.to_string() },
            Column { header: "Created", sort: Some(DemoField::CreatedAt), cell: |d| date(&d.created_at) },
        ]
    }
}

impl TableColumns for CallbackRequest {
    fn columns() -> Vec<Column<Self>> {
        vec![
            Column { header: "Name", sort: Some(CallbackField::Name), cell: |c| c.name.clone() },
            Column { header: "Phone", sort: None, cell: |c| c.phone.clone() },
            Column { header: "Reason", sort: None, cell: |c| c.reason.clone() },
            Column {
                header: "Preferred",
                sort: Some(CallbackField::PreferredTime),
                cell: |c| optional_date(&c.preferred_time),
            },
            Column { header: "Status", sort: Some(CallbackField::Status), cell: |c| c.status.to_string() },
        ]
    }
}

impl TableColumns for Consultation {
    fn columns() -> Vec<Column<Self>> {
        vec![
            Column {
                header: "Client",
                sort: Some(ConsultationField::ClientName),
                cell: |c| c.client_name.clone(),
            },
            Column { header: "Topic", sort: None, cell: |c| c.topic.clone() },
            Column {
                header: "Consultant",
                sort: None,
                cell: |c| c.consultant.clone().unwrap_or_else(|| "Unassigned".to_string()),
            },
            Column {
                header: "Scheduled",
                sort: Some(ConsultationField::ScheduledAt),
                cell: |c| optional_date(&c.scheduled_at),
            },
            Column {
                header: "Minutes",
                sort: Some(ConsultationField::Duration),
                cell: |c| c.duration_minutes.to_string(),
            },
            Column { header: "Status", sort: Some(ConsultationField::Status), cell: |c| c.status.to_string() },
        ]
    }
}

impl TableColumns for Email {
    fn columns() -> Vec<Column<Self>> {
        vec![
            Column {
                header: "",
                sort: None,
                cell: |e| (if e.starred { "★" } else { "" }).to_string(),
            },
            Column { header: "From", sort: Some(EmailField::Sender), cell: |e| e.sender.clone() },
            Column { header: "To", sort: None, cell: |e| e.recipient.clone() },
            Column { header: "Subject", sort: Some(EmailField::Subject), cell: |e| e.subject.clone() },
            Column { header: "Status", sort: Some(EmailField::Status), cell: |e| e.status.to_string() },
            Column { header: "Date", sort: Some(EmailField::CreatedAt), cell: |e| date(&e.created_at) },
        ]
    }
}

impl TableColumns for WhatsAppMessage {
    fn columns() -> Vec<Column<Self>> {
        vec![
            Column {
                header: "Contact",
                sort: Some(WhatsAppField::ContactName),
                cell: |m| m.contact_name.clone(),
            },
            Column { header: "Direction", sort: None, cell: |m| m.direction.to_string() },
            Column { header: "Message", sort: None, cell: |m| m.body.clone() },
            Column { header: "Status", sort: Some(WhatsAppField::Status), cell: |m| m.status.to_string() },
            Column { header: "Sent", sort: Some(WhatsAppField::CreatedAt), cell: |m| date(&m.created_at) },
        ]
    }
}
