use serde::{Deserialize, Serialize};

/// A directory record.
///
/// `id` is generated by the caller before insertion and is never rewritten by
/// a storage backend. The JSON shape is the file and index document format.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contact {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub favorite: bool,
}

/// Partial update of a [`Contact`]. Empty fields leave the stored value as is.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EditContact {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterRequest {
    pub field: String,
    pub value: String,
}

impl Contact {
    /// Apply a partial patch in place. `id` and `favorite` are never touched.
    pub fn apply_patch(&mut self, patch: &EditContact) {
        fn set(target: &mut String, value: &str) {
            if !value.is_empty() {
                *target = value.to_string();
            }
        }
        set(&mut self.name, &patch.name);
        set(&mut self.phone, &patch.phone);
        set(&mut self.gender, &patch.gender);
        set(&mut self.country, &patch.country);
    }
}

impl EditContact {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.phone.is_empty() && self.gender.is_empty() && self.country.is_empty()
    }
}
