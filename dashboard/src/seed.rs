//! Mock datasets, one per screen
//!
//! Ids and timestamps are fixed so repeated runs render the same tables.

use chrono::{DateTime, NaiveDate, Utc};
use crm_shared::{
    CallbackRequest, CallbackStatus, Consultation, ConsultationStatus, DemoRequest, DemoStatus,
    Email, EmailStatus, Lead, LeadSource, LeadStatus, MessageDirection, MessageStatus,
    WhatsAppMessage,
};
use rust_decimal::Decimal;
use uuid::Uuid;

/// 2026-09-`day` `hour`:00 UTC
fn at(day: u32, hour: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2026, 9, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

/// Stable id: high bits select the entity kind, low bits the row
fn id(kind: u128, row: u128) -> Uuid {
    Uuid::from_u128((kind << 64) | row)
}

fn lead(
    row: u128,
    name: &str,
    company: &str,
    source: LeadSource,
    status: LeadStatus,
    value: Option<i64>,
    day: u32,
) -> Lead {
    let handle = name.split_whitespace().next().unwrap_or(name).to_lowercase();
    let domain: String = company
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_lowercase();
    Lead {
        id: id(1, row),
        name: name.to_string(),
        company: company.to_string(),
        email: format!("{}@{}.com", handle, domain),
        phone: Some(format!("(555) 01{:01}-{:04}", row % 10, 1000 + row)),
        source,
        status,
        value: value.map(Decimal::from),
        owner: Some(if row % 2 == 0 { "Dana Scully" } else { "Fox Mulder" }.to_string()),
        notes: None,
        created_at: at(day, 9 + (row % 8) as u32),
    }
}

pub fn leads() -> Vec<Lead> {
    use LeadSource::*;
    use LeadStatus::*;
    vec![
        lead(1, "Sarah Connor", "Cyberdyne Systems", Website, New, Some(18_000), 1),
        lead(2, "Miles Dyson", "Cyberdyne Systems", Referral, Contacted, Some(42_000), 2),
        lead(3, "Ellen Ripley", "Weyland Yutani", Event, Qualified, Some(95_000), 3),
        lead(4, "Rick Deckard", "Tyrell Corporation", ColdCall, Proposal, Some(60_000), 4),
        lead(5, "Marty McFly", "Hill Valley Motors", Social, New, None, 5),
        lead(6, "Dana Barrett", "Sedgewick Hotel", Website, Lost, Some(7_500), 6),
        lead(7, "Peter Venkman", "Ghostbusters Inc", Referral, Won, Some(33_000), 7),
        lead(8, "Hari Seldon", "Foundation Trust", Event, Contacted, Some(120_000), 8),
        lead(9, "Arthur Dent", "Magrathea Holdings", Other, New, Some(4_200), 9),
        lead(10, "Trinity Moss", "Metacortex", Website, Qualified, Some(51_000), 10),
        lead(11, "Leeloo Dallas", "Zorg Industries", Social, Proposal, Some(77_000), 11),
        lead(12, "Kaylee Frye", "Serenity Freight", Referral, Won, Some(12_800), 12),
    ]
}

pub fn demo_requests() -> Vec<DemoRequest> {
    let rows = [
        ("Jean-Luc Picard", "Starfleet Logistics", "Analytics Suite", DemoStatus::Scheduled, Some(at(22, 15))),
        ("Kathryn Janeway", "Voyager Partners", "CRM Core", DemoStatus::Pending, None),
        ("Benjamin Sisko", "Deep Space Trading", "WhatsApp Inbox", DemoStatus::Completed, Some(at(3, 11))),
        ("Jonathan Archer", "Enterprise Outfitters", "CRM Core", DemoStatus::Cancelled, None),
        ("Christopher Pike", "Discovery Labs", "Analytics Suite", DemoStatus::Pending, Some(at(25, 10))),
        ("Michael Burnham", "Discovery Labs", "Email Campaigns", DemoStatus::Scheduled, Some(at(24, 16))),
    ];
    rows.into_iter()
        .enumerate()
        .map(|(index, (name, company, product, status, preferred_date))| {
            let row = index as u128 + 1;
            DemoRequest {
                id: id(2, row),
                name: name.to_string(),
                company: company.to_string(),
                email: format!("demo{}@{}.com", row, company.split_whitespace().next().unwrap_or(company).to_lowercase()),
                phone: None,
                product: product.to_string(),
                preferred_date,
                status,
                notes: None,
                created_at: at(index as u32 + 2, 10),
            }
        })
        .collect()
}

pub fn callbacks() -> Vec<CallbackRequest> {
    let rows = [
        ("Walter White", "(555) 014-9001", "Pricing for 50 seats", CallbackStatus::Pending),
        ("Jesse Pinkman", "(555) 014-9002", "Integration question", CallbackStatus::Scheduled),
        ("Saul Goodman", "(555) 014-9003", "Contract renewal", CallbackStatus::Completed),
        ("Kim Wexler", "(555) 014-9004", "Invoice discrepancy", CallbackStatus::Missed),
        ("Gus Fring", "(555) 014-9005", "Enterprise onboarding", CallbackStatus::Pending),
        ("Mike Ehrmantraut", "(555) 014-9006", "Security review", CallbackStatus::Scheduled),
    ];
    rows.into_iter()
        .enumerate()
        .map(|(index, (name, phone, reason, status))| CallbackRequest {
            id: id(3, index as u128 + 1),
            name: name.to_string(),
            phone: phone.to_string(),
            email: None,
            preferred_time: (status == CallbackStatus::Scheduled).then(|| at(20 + index as u32, 14)),
            reason: reason.to_string(),
            status,
            created_at: at(index as u32 + 4, 13),
        })
        .collect()
}

pub fn consultations() -> Vec<Consultation> {
    let rows = [
        ("Leslie Knope", "Parks budget planning", Some("Ann Perkins"), 60, ConsultationStatus::Confirmed),
        ("Ron Swanson", "Woodworking shop CRM", None, 30, ConsultationStatus::Requested),
        ("April Ludgate", "Animal shelter outreach", Some("Ben Wyatt"), 45, ConsultationStatus::Completed),
        ("Tom Haverford", "Entertainment 720 relaunch", Some("Ann Perkins"), 90, ConsultationStatus::Cancelled),
        ("Chris Traeger", "Wellness program rollout", None, 30, ConsultationStatus::Requested),
    ];
    rows.into_iter()
        .enumerate()
        .map(|(index, (client_name, topic, consultant, duration_minutes, status))| {
            let row = index as u128 + 1;
            Consultation {
                id: id(4, row),
                client_name: client_name.to_string(),
                email: format!(
                    "{}@pawnee.gov",
                    client_name.split_whitespace().next().unwrap_or(client_name).to_lowercase()
                ),
                phone: None,
                topic: topic.to_string(),
                consultant: consultant.map(str::to_string),
                scheduled_at: consultant.map(|_| at(18 + index as u32, 9)),
                duration_minutes,
                status,
                created_at: at(index as u32 + 1, 16),
            }
        })
        .collect()
}

pub fn emails() -> Vec<Email> {
    let rows = [
        ("sarah@cyberdynesystems.com", "sales@crm.local", "Re: Proposal timeline", EmailStatus::Unread),
        ("sales@crm.local", "ripley@weylandyutani.com", "Follow-up on our call", EmailStatus::Sent),
        ("hari@foundationtrust.com", "sales@crm.local", "Question about seats", EmailStatus::Read),
        ("sales@crm.local", "deckard@tyrellcorporation.com", "Draft: revised quote", EmailStatus::Draft),
        ("noreply@billing.local", "sales@crm.local", "Monthly invoice", EmailStatus::Archived),
        ("trinity@metacortex.com", "sales@crm.local", "Demo recording", EmailStatus::Unread),
        ("sales@crm.local", "peter@ghostbustersinc.com", "Welcome aboard", EmailStatus::Sent),
        ("kaylee@serenityfreight.com", "sales@crm.local", "Thanks!", EmailStatus::Read),
    ];
    rows.into_iter()
        .enumerate()
        .map(|(index, (sender, recipient, subject, status))| Email {
            id: id(5, index as u128 + 1),
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: format!("{}\n\nBest regards", subject),
            starred: index % 3 == 0,
            status,
            created_at: at(index as u32 + 10, 8),
        })
        .collect()
}

pub fn whatsapp_messages() -> Vec<WhatsAppMessage> {
    use MessageDirection::*;
    let rows = [
        ("Sarah Connor", "+1 555 014 1001", "Is the demo still on for Tuesday?", Inbound, MessageStatus::Read),
        ("Sarah Connor", "+1 555 014 1001", "Yes, 3pm works for us.", Outbound, MessageStatus::Delivered),
        ("Ellen Ripley", "+1 555 014 1003", "Please send the contract.", Inbound, MessageStatus::Read),
        ("Ellen Ripley", "+1 555 014 1003", "Sent it to your email just now.", Outbound, MessageStatus::Sent),
        ("Marty McFly", "+1 555 014 1005", "Can we move our call?", Inbound, MessageStatus::Delivered),
        ("Hari Seldon", "+1 555 014 1008", "Pricing sheet attached.", Outbound, MessageStatus::Failed),
        ("Trinity Moss", "+1 555 014 1010", "Thanks for the walkthrough!", Inbound, MessageStatus::Read),
        ("Kaylee Frye", "+1 555 014 1012", "Renewal confirmed.", Outbound, MessageStatus::Queued),
    ];
    rows.into_iter()
        .enumerate()
        .map(|(index, (contact_name, phone, body, direction, status))| WhatsAppMessage {
            id: id(6, index as u128 + 1),
            contact_name: contact_name.to_string(),
            phone: phone.to_string(),
            body: body.to_string(),
            direction,
            status,
            created_at: at(15, 8 + index as u32),
        })
        .collect()
}
