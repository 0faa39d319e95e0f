//! Detail/form overlay
//!
//! Each entity kind has a form of controlled text fields. A form validates
//! into the record's `Draft` (create) or `Patch` (edit); `FormOverlay` drives
//! the open/submit/close cycle against a view-model.

use chrono::{DateTime, Utc};
use crm_shared::{
    CallbackDraft, CallbackRequest, ClosedSet, Consultation, ConsultationDraft, DemoDraft,
    DemoRequest, Email, EmailDraft, EntityKind, Lead, LeadDraft, LeadSource, Record, WhatsAppDraft,
    WhatsAppMessage,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DashboardError, DashboardResult, FieldErrors};
use crate::validation::{Validated, Validator, optional, parse_datetime};
use crate::view_model::ViewModel;

/// Full precision so an untouched edit input parses back to the same instant
const DATETIME_INPUT: &str = "%Y-%m-%d %H:%M:%S%.f";
const NAME_MAX: usize = 100;
const NOTES_MAX: usize = 1000;
/// Longest bookable consultation, in minutes
const DURATION_MAX: u32 = 480;

/// Named text inputs of a form
pub trait FormFields {
    const FIELDS: &'static [&'static str];

    fn slot(&self, name: &str) -> Option<&str>;

    fn slot_mut(&mut self, name: &str) -> Option<&mut String>;
}

macro_rules! form_fields {
    (
        $(#[$meta:meta])*
        pub struct $form:ident { $($field:ident),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
        pub struct $form {
            $(pub $field: String),+
        }

        impl FormFields for $form {
            const FIELDS: &'static [&'static str] = &[$(stringify!($field)),+];

            fn slot(&self, name: &str) -> Option<&str> {
                match name {
                    $(stringify!($field) => Some(self.$field.as_str()),)+
                    _ => None,
                }
            }

            fn slot_mut(&mut self, name: &str) -> Option<&mut String> {
                match name {
                    $(stringify!($field) => Some(&mut self.$field),)+
                    _ => None,
                }
            }
        }
    };
}

pub trait EntityForm: FormFields + Clone + std::fmt::Debug + Send {
    type Record: Record;

    /// Inputs for a new record
    fn empty() -> Self;

    /// Inputs pre-filled from an existing record, status included
    fn from_record(record: &Self::Record) -> Self;

    fn validate(&self) -> Result<<Self::Record as Record>::Draft, FieldErrors>;

    /// Raw status input; blank leaves the status alone on edit
    fn status(&self) -> &str;

    fn field(&self, name: &str) -> Option<&str> {
        self.slot(name)
    }

    fn set_field(&mut self, name: &str, value: impl Into<String>) -> DashboardResult<()> {
        let kind = <Self::Record as Record>::KIND;
        let slot = self.slot_mut(name).ok_or_else(|| {
            DashboardError::InvalidInput(format!("{} form has no field '{}'", kind, name))
        })?;
        *slot = value.into();
        Ok(())
    }

    /// Edit payload: every field of the draft plus the status input
    fn validate_patch(&self) -> Result<<Self::Record as Record>::Patch, FieldErrors> {
        let mut patch = self.validate().map(<<Self::Record as Record>::Patch>::from);
        let status = self.status().trim();
        if status.is_empty() {
            return patch;
        }

        match <<Self::Record as Record>::Status as ClosedSet>::parse(status) {
            Some(status) => {
                if let Ok(patch) = patch.as_mut() {
                    <Self::Record as Record>::set_patch_status(patch, status);
                }
            }
            None => {
                let allowed: Vec<&str> = <<Self::Record as Record>::Status as ClosedSet>::all()
                    .iter()
                    .map(ClosedSet::as_str)
                    .collect();
                let mut errors = patch.err().unwrap_or_default();
                errors
                    .entry("status".to_string())
                    .or_default()
                    .push(format!("Must be one of: {}", allowed.join(", ")));
                patch = Err(errors);
            }
        }
        patch
    }
}

fn datetime_input(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|value| value.format(DATETIME_INPUT).to_string())
        .unwrap_or_default()
}

fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

form_fields! {
    pub struct LeadForm { name, company, email, phone, source, value, owner, notes, status }
}

impl EntityForm for LeadForm {
    type Record = Lead;

    fn empty() -> Self {
        Self {
            source: LeadSource::Website.as_str().to_string(),
            ..Self::default()
        }
    }

    fn from_record(lead: &Lead) -> Self {
        Self {
            name: lead.name.clone(),
            company: lead.company.clone(),
            email: lead.email.clone(),
            phone: lead.phone.clone().unwrap_or_default(),
            source: lead.source.as_str().to_string(),
            value: lead.value.map(|v| v.to_string()).unwrap_or_default(),
            owner: lead.owner.clone().unwrap_or_default(),
            notes: lead.notes.clone().unwrap_or_default(),
            status: lead.status.as_str().to_string(),
        }
    }

    fn validate(&self) -> Result<LeadDraft, FieldErrors> {
        let sources: Vec<&str> = LeadSource::all().iter().map(ClosedSet::as_str).collect();
        Validator::new()
            .required(&self.name, "name", "Name")
            .max_length(&self.name, "name", NAME_MAX)
            .required(&self.company, "company", "Company")
            .max_length(&self.company, "company", NAME_MAX)
            .email(&self.email, "email")
            .optional_phone(&self.phone, "phone")
            .one_of(&self.source, "source", &sources)
            .optional_amount(&self.value, "value")
            .max_length(&self.notes, "notes", NOTES_MAX)
            .finish_with(|| LeadDraft {
                name: trimmed(&self.name),
                company: trimmed(&self.company),
                email: trimmed(&self.email),
                phone: optional(&self.phone),
                source: LeadSource::parse(&self.source).unwrap_or(LeadSource::Other),
                value: optional(&self.value).and_then(|v| Decimal::from_str(&v).ok()),
                owner: optional(&self.owner),
                notes: optional(&self.notes),
            })
            .map(Validated::into_inner)
    }

    fn status(&self) -> &str {
        &self.status
    }
}

form_fields! {
    pub struct DemoRequestForm { name, company, email, phone, product, preferred_date, notes, status }
}

impl EntityForm for DemoRequestForm {
    type Record = DemoRequest;

    fn empty() -> Self {
        Self::default()
    }

    fn from_record(demo: &DemoRequest) -> Self {
        Self {
            name: demo.name.clone(),
            company: demo.company.clone(),
            email: demo.email.clone(),
            phone: demo.phone.clone().unwrap_or_default(),
            product: demo.product.clone(),
            preferred_date: datetime_input(demo.preferred_date),
            notes: demo.notes.clone().unwrap_or_default(),
            status: demo.status.as_str().to_string(),
        }
    }

    fn validate(&self) -> Result<DemoDraft, FieldErrors> {
        Validator::new()
            .required(&self.name, "name", "Name")
            .max_length(&self.name, "name", NAME_MAX)
            .required(&self.company, "company", "Company")
            .email(&self.email, "email")
            .optional_phone(&self.phone, "phone")
            .required(&self.product, "product", "Product")
            .optional_datetime(&self.preferred_date, "preferred_date")
            .max_length(&self.notes, "notes", NOTES_MAX)
            .finish_with(|| DemoDraft {
                name: trimmed(&self.name),
                company: trimmed(&self.company),
                email: trimmed(&self.email),
                phone: optional(&self.phone),
                product: trimmed(&self.product),
                preferred_date: parse_datetime(&self.preferred_date),
                notes: optional(&self.notes),
            })
            .map(Validated::into_inner)
    }

    fn status(&self) -> &str {
        &self.status
    }
}

form_fields! {
    pub struct CallbackForm { name, phone, email, preferred_time, reason, status }
}

impl EntityForm for CallbackForm {
    type Record = CallbackRequest;

    fn empty() -> Self {
        Self::default()
    }

    fn from_record(callback: &CallbackRequest) -> Self {
        Self {
            name: callback.name.clone(),
            phone: callback.phone.clone(),
            email: callback.email.clone().unwrap_or_default(),
            preferred_time: datetime_input(callback.preferred_time),
            reason: callback.reason.clone(),
            status: callback.status.as_str().to_string(),
        }
    }

    fn validate(&self) -> Result<CallbackDraft, FieldErrors> {
        Validator::new()
            .required(&self.name, "name", "Name")
            .max_length(&self.name, "name", NAME_MAX)
            .phone(&self.phone, "phone")
            .optional_email(&self.email, "email")
            .optional_datetime(&self.preferred_time, "preferred_time")
            .required(&self.reason, "reason", "Reason")
            .max_length(&self.reason, "reason", 500)
            .finish_with(|| CallbackDraft {
                name: trimmed(&self.name),
                phone: trimmed(&self.phone),
                email: optional(&self.email),
                preferred_time: parse_datetime(&self.preferred_time),
                reason: trimmed(&self.reason),
            })
            .map(Validated::into_inner)
    }

    fn status(&self) -> &str {
        &self.status
    }
}

form_fields! {
    pub struct ConsultationForm {
        client_name, email, phone, topic, consultant, scheduled_at, duration_minutes, status
    }
}

impl EntityForm for ConsultationForm {
    type Record = Consultation;

    fn empty() -> Self {
        Self {
            duration_minutes: "30".to_string(),
            ..Self::default()
        }
    }

    fn from_record(consultation: &Consultation) -> Self {
        Self {
            client_name: consultation.client_name.clone(),
            email: consultation.email.clone(),
            phone: consultation.phone.clone().unwrap_or_default(),
            topic: consultation.topic.clone(),
            consultant: consultation.consultant.clone().unwrap_or_default(),
            scheduled_at: datetime_input(consultation.scheduled_at),
            duration_minutes: consultation.duration_minutes.to_string(),
            status: consultation.status.as_str().to_string(),
        }
    }

    fn validate(&self) -> Result<ConsultationDraft, FieldErrors> {
        Validator::new()
            .required(&self.client_name, "client_name", "Client name")
            .max_length(&self.client_name, "client_name", NAME_MAX)
            .email(&self.email, "email")
            .optional_phone(&self.phone, "phone")
            .required(&self.topic, "topic", "Topic")
            .max_length(&self.topic, "topic", 200)
            .optional_datetime(&self.scheduled_at, "scheduled_at")
            .positive_integer(&self.duration_minutes, "duration_minutes", DURATION_MAX)
            .finish_with(|| ConsultationDraft {
                client_name: trimmed(&self.client_name),
                email: trimmed(&self.email),
                phone: optional(&self.phone),
                topic: trimmed(&self.topic),
                consultant: optional(&self.consultant),
                scheduled_at: parse_datetime(&self.scheduled_at),
                duration_minutes: self.duration_minutes.trim().parse().unwrap_or(DURATION_MAX),
            })
            .map(Validated::into_inner)
    }

    fn status(&self) -> &str {
        &self.status
    }
}

form_fields! {
    pub struct EmailForm { sender, recipient, subject, body, status }
}

impl EntityForm for EmailForm {
    type Record = Email;

    fn empty() -> Self {
        Self::default()
    }

    fn from_record(email: &Email) -> Self {
        Self {
            sender: email.sender.clone(),
            recipient: email.recipient.clone(),
            subject: email.subject.clone(),
            body: email.body.clone(),
            status: email.status.as_str().to_string(),
        }
    }

    fn validate(&self) -> Result<EmailDraft, FieldErrors> {
        Validator::new()
            .email(&self.sender, "sender")
            .email(&self.recipient, "recipient")
            .required(&self.subject, "subject", "Subject")
            .max_length(&self.subject, "subject", 200)
            .required(&self.body, "body", "Message")
            .finish_with(|| EmailDraft {
                sender: trimmed(&self.sender),
                recipient: trimmed(&self.recipient),
                subject: trimmed(&self.subject),
                body: self.body.clone(),
            })
            .map(Validated::into_inner)
    }

    fn status(&self) -> &str {
        &self.status
    }
}

form_fields! {
    pub struct WhatsAppForm { contact_name, phone, body, status }
}

impl EntityForm for WhatsAppForm {
    type Record = WhatsAppMessage;

    fn empty() -> Self {
        Self::default()
    }

    fn from_record(message: &WhatsAppMessage) -> Self {
        Self {
            contact_name: message.contact_name.clone(),
            phone: message.phone.clone(),
            body: message.body.clone(),
            status: message.status.as_str().to_string(),
        }
    }

    fn validate(&self) -> Result<WhatsAppDraft, FieldErrors> {
        Validator::new()
            .required(&self.contact_name, "contact_name", "Contact name")
            .phone(&self.phone, "phone")
            .required(&self.body, "body", "Message")
            .max_length(&self.body, "body", 4096)
            .finish_with(|| WhatsAppDraft {
                contact_name: trimmed(&self.contact_name),
                phone: trimmed(&self.phone),
                body: self.body.trim().to_string(),
            })
            .map(Validated::into_inner)
    }

    fn status(&self) -> &str {
        &self.status
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "id", rename_all = "snake_case")]
pub enum FormMode {
    New,
    Edit(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OverlayState {
    Closed,
    Open { mode: FormMode },
    /// Save in flight; the submit trigger is disabled
    Submitting { mode: FormMode },
}

/// Validated payload handed to the view-model
#[derive(Debug, Clone)]
pub enum Submission<R: Record> {
    Create(R::Draft),
    Update(Uuid, R::Patch),
}

#[derive(Debug, Clone)]
pub struct FormOverlay<F: EntityForm> {
    state: OverlayState,
    form: F,
    errors: FieldErrors,
    last_error: Option<DashboardError>,
}

impl<F: EntityForm> FormOverlay<F> {
    pub fn new() -> Self {
        Self {
            state: OverlayState::Closed,
            form: F::empty(),
            errors: FieldErrors::new(),
            last_error: None,
        }
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn mode(&self) -> Option<FormMode> {
        match self.state {
            OverlayState::Closed => None,
            OverlayState::Open { mode } | OverlayState::Submitting { mode } => Some(mode),
        }
    }

    pub fn is_open(&self) -> bool {
        self.state != OverlayState::Closed
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, OverlayState::Submitting { .. })
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    /// Inline errors from the last submit attempt
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn field_errors(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Save failure shown in the overlay banner
    pub fn last_error(&self) -> Option<&DashboardError> {
        self.last_error.as_ref()
    }

    pub fn open_new(&mut self) -> DashboardResult<()> {
        self.open(FormMode::New, F::empty())
    }

    pub fn open_edit(&mut self, record: &F::Record) -> DashboardResult<()> {
        self.open(FormMode::Edit(record.id()), F::from_record(record))
    }

    fn open(&mut self, mode: FormMode, form: F) -> DashboardResult<()> {
        self.ensure_idle()?;
        debug!(kind = %Self::kind(), ?mode, "form opened");
        self.state = OverlayState::Open { mode };
        self.form = form;
        self.errors.clear();
        self.last_error = None;
        Ok(())
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> DashboardResult<()> {
        match self.state {
            OverlayState::Open { .. } => self.form.set_field(name, value),
            OverlayState::Submitting { .. } => Err(self.busy()),
            OverlayState::Closed => Err(DashboardError::InvalidInput("form is not open".to_string())),
        }
    }

    /// Discards the edits. Refused while a save is in flight.
    pub fn cancel(&mut self) -> DashboardResult<()> {
        self.ensure_idle()?;
        self.reset();
        Ok(())
    }

    /// Validates the inputs and enters `Submitting`. Invalid input keeps the
    /// overlay open with inline errors.
    pub fn begin_submit(&mut self) -> DashboardResult<Submission<F::Record>> {
        let mode = match self.state {
            OverlayState::Open { mode } => mode,
            OverlayState::Submitting { .. } => return Err(self.busy()),
            OverlayState::Closed => {
                return Err(DashboardError::InvalidInput("form is not open".to_string()));
            }
        };

        let submission = match mode {
            FormMode::New => self.form.validate().map(Submission::Create),
            FormMode::Edit(id) => self.form.validate_patch().map(|patch| Submission::Update(id, patch)),
        };
        match submission {
            Ok(submission) => {
                self.errors.clear();
                self.last_error = None;
                self.state = OverlayState::Submitting { mode };
                Ok(submission)
            }
            Err(details) => {
                debug!(kind = %Self::kind(), fields = details.len(), "form invalid");
                self.errors = details.clone();
                Err(DashboardError::Validation { details })
            }
        }
    }

    /// Leaves `Submitting`: a save closes the overlay, a failure reopens it
    /// with the inputs intact, a cancellation closes it.
    pub fn complete(&mut self, result: &DashboardResult<F::Record>) {
        let Some(mode) = self.mode() else {
            return;
        };
        match result {
            Ok(record) => {
                info!(kind = %Self::kind(), id = %record.id(), "form saved");
                self.reset();
            }
            Err(DashboardError::Cancelled(_)) => self.reset(),
            Err(err) => {
                warn!(kind = %Self::kind(), error = %err, "form save failed");
                if let Some(details) = err.field_errors() {
                    self.errors = details.clone();
                }
                self.last_error = Some(err.clone());
                self.state = OverlayState::Open { mode };
            }
        }
    }

    /// Validates and saves through `vm`. Dropping the future mid-save closes
    /// the overlay the same way a cancellation does.
    pub async fn submit(&mut self, vm: &mut ViewModel<F::Record>) -> DashboardResult<F::Record> {
        let submission = self.begin_submit()?;
        let mut guard = SubmitGuard {
            overlay: self,
            finished: false,
        };
        let result = match submission {
            Submission::Create(draft) => vm.create(draft).await,
            Submission::Update(id, patch) => vm.update(id, patch).await,
        };
        guard.overlay.complete(&result);
        guard.finished = true;
        result
    }

    /// Closes unconditionally, used when the owning screen goes away
    pub fn dismiss(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.state = OverlayState::Closed;
        self.form = F::empty();
        self.errors.clear();
        self.last_error = None;
    }

    fn ensure_idle(&self) -> DashboardResult<()> {
        if self.is_submitting() {
            return Err(self.busy());
        }
        Ok(())
    }

    fn busy(&self) -> DashboardError {
        DashboardError::Busy(format!("{} save", Self::kind()))
    }

    fn kind() -> EntityKind {
        <F::Record as Record>::KIND
    }
}

/// Resets an overlay left in `Submitting` when `submit` is dropped
struct SubmitGuard<'a, F: EntityForm> {
    overlay: &'a mut FormOverlay<F>,
    finished: bool,
}

impl<F: EntityForm> Drop for SubmitGuard<'_, F> {
    fn drop(&mut self) {
        if !self.finished {
            debug!(kind = %FormOverlay::<F>::kind(), "form save abandoned");
            self.overlay.reset();
        }
    }
}

impl<F: EntityForm> Default for FormOverlay<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use crate::source::{FailurePlan, MockDataSource};
    use crate::view_model::ViewSettings;
    use chrono::TimeZone;
    use crm_shared::{ConsultationStatus, DemoStatus, LeadStatus};
    use std::sync::Arc;
    use std::time::Duration;

    fn filled_lead_form() -> LeadForm {
        let mut form = LeadForm::empty();
        form.set_field("name", "Sarah Connor").unwrap();
        form.set_field("company", "Cyberdyne Systems").unwrap();
        form.set_field("email", "sarah@cyberdyne.com").unwrap();
        form.set_field("value", "2500.50").unwrap();
        form
    }

    #[test]
    fn test_lead_form_builds_draft() {
        let draft = filled_lead_form().validate().unwrap();
        assert_eq!(draft.name, "Sarah Connor");
        assert_eq!(draft.source, LeadSource::Website);
        assert_eq!(draft.value, Some(Decimal::from_str("2500.50").unwrap()));
        assert_eq!(draft.phone, None);
    }

    #[test]
    fn test_lead_form_reports_every_bad_field() {
        let mut form = LeadForm::empty();
        form.set_field("email", "not-an-email").unwrap();
        form.set_field("value", "-3").unwrap();
        form.set_field("source", "carrier pigeon").unwrap();

        let errors = form.validate().unwrap_err();
        assert_eq!(errors["name"], vec!["Name is required"]);
        assert_eq!(errors["email"], vec!["Invalid email format"]);
        assert!(errors.contains_key("company"));
        assert!(errors.contains_key("value"));
        assert!(errors.contains_key("source"));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let mut form = WhatsAppForm::empty();
        assert!(matches!(
            form.set_field("attachment", "x"),
            Err(DashboardError::InvalidInput(_))
        ));
        assert_eq!(WhatsAppForm::FIELDS, &["contact_name", "phone", "body", "status"]);
    }

    #[test]
    fn test_patch_carries_status() {
        let lead = &seed::leads()[0];
        let mut form = LeadForm::from_record(lead);
        form.set_field("status", "qualified").unwrap();
        let patch = form.validate_patch().unwrap();
        assert_eq!(patch.status, Some(LeadStatus::Qualified));
        assert_eq!(patch.name.as_deref(), Some(lead.name.as_str()));

        form.set_field("status", "promoted").unwrap();
        let errors = form.validate_patch().unwrap_err();
        assert!(errors["status"][0].starts_with("Must be one of"));
    }

    #[test]
    fn test_consultation_duration_bounds() {
        let consultation = &seed::consultations()[0];
        let mut form = ConsultationForm::from_record(consultation);
        assert_eq!(form.field("duration_minutes"), Some("60"));
        form.set_field("duration_minutes", "0").unwrap();
        assert!(form.validate().unwrap_err().contains_key("duration_minutes"));
        form.set_field("duration_minutes", "45").unwrap();
        form.set_field("status", "confirmed").unwrap();
        let patch = form.validate_patch().unwrap();
        assert_eq!(patch.duration_minutes, Some(45));
        assert_eq!(patch.status, Some(ConsultationStatus::Confirmed));
    }

    #[test]
    fn test_datetime_inputs_round_trip_through_form() {
        let demo = seed::demo_requests()
            .into_iter()
            .find(|demo| demo.preferred_date.is_some())
            .unwrap();
        let form = DemoRequestForm::from_record(&demo);
        assert_eq!(form.validate().unwrap().preferred_date, demo.preferred_date);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_only_edit_keeps_datetime_precision() {
        let mut demo = seed::demo_requests()[1].clone();
        assert_eq!(demo.status, DemoStatus::Pending);
        let preferred = Utc.with_ymd_and_hms(2026, 3, 1, 14, 30, 45).unwrap()
            + chrono::Duration::milliseconds(250);
        demo.preferred_date = Some(preferred);
        let id = demo.id;
        let mut vm = ViewModel::local(vec![demo.clone()], 10).unwrap();

        let mut overlay = FormOverlay::<DemoRequestForm>::new();
        overlay.open_edit(&demo).unwrap();
        overlay.set_field("status", "scheduled").unwrap();
        let saved = overlay.submit(&mut vm).await.unwrap();

        assert_eq!(saved.status, DemoStatus::Scheduled);
        assert_eq!(vm.get(id).unwrap().preferred_date, Some(preferred));
        assert_eq!(vm.get(id).unwrap().name, demo.name);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_submit_closes_overlay() {
        let source = MockDataSource::new(seed::leads(), Duration::from_secs(2)).into_shared();
        let mut vm = ViewModel::<Lead>::new(source, ViewSettings::default());
        vm.load().await.unwrap();

        let mut overlay = FormOverlay::<LeadForm>::new();
        overlay.open_new().unwrap();
        for (name, value) in [("name", "Ada"), ("company", "Analytical"), ("email", "ada@engine.org")] {
            overlay.set_field(name, value).unwrap();
        }

        let abandoned =
            tokio::time::timeout(Duration::from_millis(100), overlay.submit(&mut vm)).await;
        assert!(abandoned.is_err());
        assert_eq!(overlay.state(), OverlayState::Closed);
        assert!(overlay.open_new().is_ok());
        assert_eq!(vm.records().len(), 12);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_submit_stays_open() {
        let mut vm = ViewModel::local(seed::leads(), 10).unwrap();
        let mut overlay = FormOverlay::<LeadForm>::new();
        overlay.open_new().unwrap();
        overlay.set_field("email", "someone@example.com").unwrap();

        let result = overlay.submit(&mut vm).await;
        assert!(matches!(result, Err(DashboardError::Validation { .. })));
        assert_eq!(overlay.state(), OverlayState::Open { mode: FormMode::New });
        assert_eq!(overlay.field_errors("name"), ["Name is required".to_string()]);
        assert_eq!(vm.records().len(), 12);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submitting_refuses_reentry_and_cancel() {
        let mut overlay = FormOverlay::<LeadForm>::new();
        overlay.open_new().unwrap();
        for (name, value) in [("name", "Ada"), ("company", "Analytical"), ("email", "ada@engine.org")] {
            overlay.set_field(name, value).unwrap();
        }

        let submission = overlay.begin_submit().unwrap();
        assert!(matches!(submission, Submission::Create(_)));
        assert!(overlay.is_submitting());
        assert!(matches!(overlay.begin_submit(), Err(DashboardError::Busy(_))));
        assert!(matches!(overlay.cancel(), Err(DashboardError::Busy(_))));
        assert!(matches!(overlay.open_new(), Err(DashboardError::Busy(_))));

        overlay.complete(&Err(DashboardError::SimulatedFailure {
            operation: "lead create".to_string(),
        }));
        assert_eq!(overlay.state(), OverlayState::Open { mode: FormMode::New });
        assert_eq!(overlay.form().name, "Ada");
        assert!(overlay.last_error().is_some());

        overlay.cancel().unwrap();
        assert_eq!(overlay.state(), OverlayState::Closed);
        assert_eq!(overlay.form(), &LeadForm::empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_save_keeps_draft() {
        let source = Arc::new(MockDataSource::new(seed::leads(), Duration::from_millis(50)));
        let mut vm = ViewModel::<Lead>::new(source.clone(), ViewSettings::default());
        vm.load().await.unwrap();
        source.set_failures(FailurePlan::Always);

        let mut overlay = FormOverlay::<LeadForm>::new();
        overlay.open_new().unwrap();
        let form = filled_lead_form();
        for name in LeadForm::FIELDS {
            overlay.set_field(name, form.slot(name).unwrap_or_default()).unwrap();
        }

        assert!(overlay.submit(&mut vm).await.is_err());
        assert_eq!(overlay.state(), OverlayState::Open { mode: FormMode::New });
        assert_eq!(overlay.form(), &form);
        assert_eq!(vm.records().len(), 12);
    }

    #[tokio::test(start_paused = true)]
    async fn test_edit_preserves_identity() {
        let mut vm = ViewModel::local(seed::leads(), 10).unwrap();
        let original = vm.records()[0].clone();
        assert_eq!(original.status, LeadStatus::New);

        let mut overlay = FormOverlay::<LeadForm>::new();
        overlay.open_edit(&original).unwrap();
        assert_eq!(overlay.mode(), Some(FormMode::Edit(original.id)));
        overlay.set_field("status", "qualified").unwrap();

        let saved = overlay.submit(&mut vm).await.unwrap();
        assert_eq!(overlay.state(), OverlayState::Closed);
        assert_eq!(saved.id, original.id);
        assert_eq!(saved.created_at, original.created_at);
        assert_eq!(saved.status, LeadStatus::Qualified);
        assert_eq!(vm.get(original.id), Some(&saved));
    }
}
