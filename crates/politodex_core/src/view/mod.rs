//! Headless render instructions for the directory UI.
//!
//! # Responsibility
//! - Map store state (+ filter query) to card, detail and edit-form views.
//! - Derive link targets and fallback labels.
//!
//! # Invariants
//! - Functions here are pure; a UI adapter applies their output verbatim.
//! - Every card carries the record's true store index, not its filtered
//!   position.
//!
//! # See also
//! - `carousel` for scroll/drag handling, `modal` for the dialog state machine.

pub mod carousel;
pub mod modal;

use crate::model::contact::{ContactId, ContactRecord};
use crate::model::form::{ContactField, ContactForm};
use crate::service::photo::portrait_source;
use once_cell::sync::Lazy;
use regex::Regex;

pub const EMPTY_STATE_MESSAGE: &str = "No contacts found.";
pub const NO_FILE_LABEL: &str = "No file selected";
const UNTITLED_NAME: &str = "Untitled";
const INDEPENDENT_COMPANY: &str = "Independent";
const GENERAL_INDUSTRY: &str = "General";
const NO_NOTES: &str = "No notes provided.";
const MISSING_VALUE: &str = "—";
const SUBJECT_FALLBACK: &str = "Contact";

static PHONE_STRIP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^+0-9]").expect("valid phone strip regex"));

/// Contents of the card track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackRender {
    /// Nothing matched; show a placeholder.
    Empty { message: String },
    /// Cards in filtered order.
    Cards(Vec<CardView>),
}

impl TrackRender {
    pub fn cards(&self) -> &[CardView] {
        match self {
            Self::Empty { .. } => &[],
            Self::Cards(cards) => cards,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }
}

/// One carousel card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    /// True position in the store.
    pub index: usize,
    pub contact_id: ContactId,
    pub name: String,
    pub company: String,
    pub portrait_src: String,
    pub portrait_alt: String,
    pub aria_label: String,
}

/// A link that is disabled when `href` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactLink {
    pub text: String,
    pub href: Option<String>,
}

impl ContactLink {
    pub fn is_disabled(&self) -> bool {
        self.href.is_none()
    }

    fn disabled() -> Self {
        Self {
            text: MISSING_VALUE.to_string(),
            href: None,
        }
    }
}

/// Read-only half of the detail modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub portrait_src: String,
    pub portrait_alt: String,
    pub name: String,
    pub company: String,
    pub industry: String,
    pub email: ContactLink,
    pub phone: ContactLink,
    pub notes: String,
}

/// Editable half of the detail modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditFormView {
    /// Field values in `ContactField::ALL` order.
    pub fields: Vec<(ContactField, String)>,
    pub file_label: String,
}

impl EditFormView {
    pub fn value(&self, field: ContactField) -> Option<&str> {
        self.fields
            .iter()
            .find(|(candidate, _)| *candidate == field)
            .map(|(_, value)| value.as_str())
    }
}

/// Renders the card track for `query`.
pub fn render_list(contacts: &[ContactRecord], query: &str) -> TrackRender {
    let needle = query.trim().to_lowercase();
    let cards = contacts
        .iter()
        .enumerate()
        .filter(|(_, record)| record.name_matches(needle.as_str()))
        .map(|(index, record)| card_view(index, record))
        .collect::<Vec<_>>();

    if cards.is_empty() {
        TrackRender::Empty {
            message: EMPTY_STATE_MESSAGE.to_string(),
        }
    } else {
        TrackRender::Cards(cards)
    }
}

/// Builds one card for the record at store position `index`.
pub fn card_view(index: usize, record: &ContactRecord) -> CardView {
    let subject = subject_name(record);
    CardView {
        index,
        contact_id: record.id,
        name: non_empty_or(record.name.as_str(), UNTITLED_NAME),
        company: non_empty_or(record.company.as_str(), INDEPENDENT_COMPANY),
        portrait_src: portrait_source(record).into_owned(),
        portrait_alt: format!("{subject}'s portrait"),
        aria_label: format!("{subject} details"),
    }
}

pub fn detail_view(record: &ContactRecord) -> DetailView {
    DetailView {
        portrait_src: portrait_source(record).into_owned(),
        portrait_alt: format!("{}'s portrait", subject_name(record)),
        name: non_empty_or(record.name.as_str(), UNTITLED_NAME),
        company: non_empty_or(record.company.as_str(), INDEPENDENT_COMPANY),
        industry: non_empty_or(record.industry.as_str(), GENERAL_INDUSTRY),
        email: email_link(record.email.as_str()),
        phone: phone_link(record.phone.as_str()),
        notes: non_empty_or(record.notes.trim(), NO_NOTES),
    }
}

/// Edit form populated from `record`, with the file input cleared.
pub fn edit_form_view(record: &ContactRecord) -> EditFormView {
    edit_form_from(&ContactForm::from_record(record))
}

/// Edit form showing in-progress draft values.
pub fn edit_form_from(form: &ContactForm) -> EditFormView {
    EditFormView {
        fields: ContactField::ALL
            .into_iter()
            .map(|field| (field, form.get(field).unwrap_or_default().to_string()))
            .collect(),
        file_label: file_label(None),
    }
}

/// Label next to a file input.
pub fn file_label(file_name: Option<&str>) -> String {
    match file_name.filter(|name| !name.is_empty()) {
        Some(name) => name.to_string(),
        None => NO_FILE_LABEL.to_string(),
    }
}

/// `mailto:` target for a trimmed, non-empty email.
pub fn mailto_href(email: &str) -> Option<String> {
    let email = email.trim();
    (!email.is_empty()).then(|| format!("mailto:{email}"))
}

/// `tel:` target keeping digits and a leading `+` only.
pub fn tel_href(phone: &str) -> Option<String> {
    let phone = phone.trim();
    if phone.is_empty() {
        return None;
    }
    let stripped = PHONE_STRIP_RE.replace_all(phone, "");
    let (lead, rest) = match stripped.strip_prefix('+') {
        Some(rest) => ("+", rest),
        None => ("", &stripped[..]),
    };
    Some(format!("tel:{lead}{}", rest.replace('+', "")))
}

fn email_link(email: &str) -> ContactLink {
    match mailto_href(email) {
        Some(href) => ContactLink {
            text: email.trim().to_string(),
            href: Some(href),
        },
        None => ContactLink::disabled(),
    }
}

fn phone_link(phone: &str) -> ContactLink {
    match tel_href(phone) {
        Some(href) => ContactLink {
            text: phone.trim().to_string(),
            href: Some(href),
        },
        None => ContactLink::disabled(),
    }
}

fn subject_name(record: &ContactRecord) -> &str {
    if record.name.is_empty() {
        SUBJECT_FALLBACK
    } else {
        record.name.as_str()
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        detail_view, edit_form_view, file_label, mailto_href, render_list, tel_href, TrackRender,
        EMPTY_STATE_MESSAGE,
    };
    use crate::model::contact::{seed_contacts, ContactRecord};
    use crate::model::form::ContactField;

    #[test]
    fn render_list_keeps_true_store_index_under_filter() {
        let contacts = seed_contacts();
        let rendered = render_list(&contacts, "morty");
        let cards = rendered.cards();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].index, 1);
        assert_eq!(cards[0].aria_label, "President Morty details");
        assert_eq!(cards[0].portrait_alt, "President Morty's portrait");
    }

    #[test]
    fn render_list_shows_empty_state_when_nothing_matches() {
        let rendered = render_list(&seed_contacts(), "nobody");
        assert_eq!(
            rendered,
            TrackRender::Empty {
                message: EMPTY_STATE_MESSAGE.to_string()
            }
        );
        assert!(render_list(&[], "").is_empty());
    }

    #[test]
    fn card_and_detail_fall_back_for_blank_fields() {
        let record = ContactRecord::new("");
        let rendered = render_list(std::slice::from_ref(&record), "");
        let card = &rendered.cards()[0];
        assert_eq!(card.name, "Untitled");
        assert_eq!(card.company, "Independent");
        assert_eq!(card.portrait_alt, "Contact's portrait");
        assert!(card.portrait_src.starts_with("data:image/svg+xml;base64,"));

        let detail = detail_view(&record);
        assert_eq!(detail.industry, "General");
        assert_eq!(detail.notes, "No notes provided.");
        assert!(detail.email.is_disabled());
        assert_eq!(detail.phone.text, "—");
    }

    #[test]
    fn detail_view_builds_links_from_trimmed_values() {
        let mut record = ContactRecord::new("Rick Sanchez");
        record.email = "  rick@citadel.gov ".to_string();
        record.phone = " +1 (202) 555-0110 ".to_string();
        let detail = detail_view(&record);
        assert_eq!(detail.email.text, "rick@citadel.gov");
        assert_eq!(detail.email.href.as_deref(), Some("mailto:rick@citadel.gov"));
        assert_eq!(detail.phone.text, "+1 (202) 555-0110");
        assert_eq!(detail.phone.href.as_deref(), Some("tel:+12025550110"));
    }

    #[test]
    fn tel_href_keeps_only_a_leading_plus() {
        assert_eq!(tel_href("555-1234").as_deref(), Some("tel:5551234"));
        assert_eq!(tel_href("(+44) 20+1").as_deref(), Some("tel:+44201"));
        assert_eq!(tel_href("\u{665}\u{665}\u{665} 12").as_deref(), Some("tel:12"));
        assert_eq!(tel_href("   "), None);
        assert_eq!(mailto_href(""), None);
    }

    #[test]
    fn edit_form_mirrors_record_and_clears_file_label() {
        let mut record = ContactRecord::new("Rick");
        record.phone = "555".to_string();
        let form = edit_form_view(&record);
        assert_eq!(form.value(ContactField::Name), Some("Rick"));
        assert_eq!(form.value(ContactField::Phone), Some("555"));
        assert_eq!(form.file_label, "No file selected");
        assert_eq!(file_label(Some("face.png")), "face.png");
    }
}
