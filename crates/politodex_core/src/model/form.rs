//! Form submissions and partial updates.
//!
//! # Responsibility
//! - Model the named text entries a create/edit form submits.
//! - Turn submissions into trimmed records or partial patches.
//!
//! # Invariants
//! - Every value leaving this module is trimmed.
//! - A field absent from a submission never produces a patch entry.

use crate::model::contact::ContactRecord;

/// Text fields shared by the create and edit forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    Name,
    Company,
    Industry,
    Email,
    Phone,
    Notes,
}

impl ContactField {
    pub const ALL: [ContactField; 6] = [
        Self::Name,
        Self::Company,
        Self::Industry,
        Self::Email,
        Self::Phone,
        Self::Notes,
    ];

    /// Form control name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Company => "company",
            Self::Industry => "industry",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Notes => "notes",
        }
    }

    /// Parses a form control name; unknown names (including `photo`) yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }

    /// Reads this field from a record.
    pub fn get(self, record: &ContactRecord) -> &str {
        match self {
            Self::Name => &record.name,
            Self::Company => &record.company,
            Self::Industry => &record.industry,
            Self::Email => &record.email,
            Self::Phone => &record.phone,
            Self::Notes => &record.notes,
        }
    }

    fn slot(self, record: &mut ContactRecord) -> &mut String {
        match self {
            Self::Name => &mut record.name,
            Self::Company => &mut record.company,
            Self::Industry => &mut record.industry,
            Self::Email => &mut record.email,
            Self::Phone => &mut record.phone,
            Self::Notes => &mut record.notes,
        }
    }
}

/// Raw text entries of one form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    values: [Option<String>; 6],
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a submission from `(control name, value)` pairs.
    ///
    /// Unknown control names are ignored; later duplicates win.
    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::new();
        for (key, value) in entries {
            if let Some(field) = ContactField::parse(key.as_ref()) {
                form.set(field, value);
            }
        }
        form
    }

    /// Mirrors every text field of `record`, as an edit form shows it.
    pub fn from_record(record: &ContactRecord) -> Self {
        Self::from_entries(
            ContactField::ALL
                .into_iter()
                .map(|field| (field.as_str(), field.get(record).to_string())),
        )
    }

    /// Builder-style setter.
    pub fn with(mut self, field: ContactField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: ContactField, value: impl Into<String>) {
        self.values[index_of(field)] = Some(value.into());
    }

    /// Raw (untrimmed) submitted value.
    pub fn get(&self, field: ContactField) -> Option<&str> {
        self.values[index_of(field)].as_deref()
    }

    /// Builds a new record; absent fields become empty strings.
    pub fn to_record(&self) -> ContactRecord {
        let mut record = ContactRecord::new(String::new());
        for field in ContactField::ALL {
            if let Some(value) = self.get(field) {
                *field.slot(&mut record) = value.trim().to_string();
            }
        }
        record
    }

    /// Builds a partial update carrying only the submitted fields.
    pub fn to_patch(&self) -> ContactPatch {
        let mut patch = ContactPatch::default();
        for field in ContactField::ALL {
            if let Some(value) = self.get(field) {
                patch.fields.push((field, value.trim().to_string()));
            }
        }
        patch
    }
}

/// Partial update applied to one stored record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPatch {
    fields: Vec<(ContactField, String)>,
    /// Replaces the stored photo only when set.
    pub photo: Option<String>,
}

impl ContactPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter; the value is stored as given.
    pub fn with(mut self, field: ContactField, value: impl Into<String>) -> Self {
        self.fields.retain(|(existing, _)| *existing != field);
        self.fields.push((field, value.into()));
        self
    }

    pub fn with_photo(mut self, photo: impl Into<String>) -> Self {
        self.photo = Some(photo.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.photo.is_none()
    }

    /// Merges this patch into `record`; unspecified fields stay untouched.
    pub fn apply(&self, record: &mut ContactRecord) {
        for (field, value) in &self.fields {
            *field.slot(record) = value.clone();
        }
        if let Some(photo) = self.photo.as_ref().filter(|photo| !photo.trim().is_empty()) {
            record.photo = Some(photo.clone());
        }
    }
}

fn index_of(field: ContactField) -> usize {
    match field {
        ContactField::Name => 0,
        ContactField::Company => 1,
        ContactField::Industry => 2,
        ContactField::Email => 3,
        ContactField::Phone => 4,
        ContactField::Notes => 5,
    }
}
