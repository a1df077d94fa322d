//! Sorting and alphabetical grouping of guests.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::guests::GuestRecord;

/// Key used for guests whose last name is empty.
pub const EMPTY_KEY: &str = "#";

/// Ordering rule applied to (last name, first name) pairs, both for the
/// overall sort and within each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Collation {
    /// Compare uppercased names.
    #[default]
    CaseInsensitive,
    /// Compare names byte for byte.
    CaseSensitive,
}

impl Collation {
    pub fn compare(self, a: &GuestRecord, b: &GuestRecord) -> Ordering {
        match self {
            Collation::CaseInsensitive => a
                .last_name
                .to_uppercase()
                .cmp(&b.last_name.to_uppercase())
                .then_with(|| a.first_name.to_uppercase().cmp(&b.first_name.to_uppercase())),
            Collation::CaseSensitive => a
                .last_name
                .cmp(&b.last_name)
                .then_with(|| a.first_name.cmp(&b.first_name)),
        }
    }
}

/// Stable sort by (last name, first name).
pub fn sort_guests(guests: &mut [GuestRecord], collation: Collation) {
    guests.sort_by(|a, b| collation.compare(a, b));
}

/// Uppercased first character of the last name, or `#` when it is empty.
pub fn group_key(guest: &GuestRecord) -> String {
    match guest.last_name.chars().next() {
        Some(c) => c.to_uppercase().collect(),
        None => EMPTY_KEY.to_string(),
    }
}

/// Guests bucketed by [`group_key`], keys ascending, each bucket sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedGuests {
    groups: BTreeMap<String, Vec<GuestRecord>>,
}

impl GroupedGuests {
    pub fn new(guests: &[GuestRecord], collation: Collation) -> Self {
        let mut groups: BTreeMap<String, Vec<GuestRecord>> = BTreeMap::new();
        for guest in guests {
            groups.entry(group_key(guest)).or_default().push(guest.clone());
        }
        for members in groups.values_mut() {
            sort_guests(members, collation);
        }
        Self { groups }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[GuestRecord])> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&[GuestRecord]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn guest_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
