// Shared CRM records used by the dashboard view-models

/// Declares a closed, string-keyed enumeration (statuses, sortable fields,
/// entity kinds) together with its `ClosedSet` implementation.
macro_rules! closed_set {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $crate::record::ClosedSet for $name {
            fn all() -> &'static [Self] {
                &[$($name::$variant),+]
            }

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::record::ClosedSet::as_str(self))
            }
        }
    };
}

pub mod callback;
pub mod consultation;
pub mod demo;
pub mod email;
pub mod lead;
pub mod record;
pub mod whatsapp;

pub use callback::{CallbackDraft, CallbackField, CallbackPatch, CallbackRequest, CallbackStatus};
pub use consultation::{
    Consultation, ConsultationDraft, ConsultationField, ConsultationPatch, ConsultationStatus,
};
pub use demo::{DemoDraft, DemoField, DemoPatch, DemoRequest, DemoStatus};
pub use email::{Email, EmailDraft, EmailField, EmailPatch, EmailStatus};
pub use lead::{Lead, LeadDraft, LeadField, LeadPatch, LeadSource, LeadStatus};
pub use record::{ClosedSet, EntityKind, Record, SortKey, StatusSet, locale_compare};
pub use whatsapp::{
    MessageDirection, MessageStatus, WhatsAppDraft, WhatsAppField, WhatsAppMessage, WhatsAppPatch,
};
