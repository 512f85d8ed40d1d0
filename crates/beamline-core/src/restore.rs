//! The [`RestoreSet`] bitset naming which event fields a restore copies back.
//!
//! Components declare their restore set once; the pipeline consults it when
//! a component returns [`TraceStatus::Restored`](crate::TraceStatus::Restored).
//! Anything narrower than [`RestoreSet::ALL`] leaves part of the component's
//! own mutation in place and is reported at pipeline construction.

use std::fmt;

/// One restorable field of an [`Event`](crate::Event).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventField {
    /// Position `r`.
    Position,
    /// Wavevector (photons) or velocity (neutrons), together with the kind tag.
    Motion,
    /// Time of flight.
    Time,
    /// Polarization vector.
    Polarization,
    /// Statistical weight.
    Weight,
}

impl EventField {
    /// Every field, in declaration order.
    pub const ALL: [EventField; 5] = [
        EventField::Position,
        EventField::Motion,
        EventField::Time,
        EventField::Polarization,
        EventField::Weight,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Lower-case field name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Motion => "motion",
            Self::Time => "time",
            Self::Polarization => "polarization",
            Self::Weight => "weight",
        }
    }
}

impl fmt::Display for EventField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of [`EventField`]s.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RestoreSet {
    bits: u8,
}

impl RestoreSet {
    /// Every field. The only field-complete restore.
    pub const ALL: Self = Self { bits: 0b1_1111 };

    /// No field.
    pub const NONE: Self = Self { bits: 0 };

    /// Create an empty set.
    pub fn empty() -> Self {
        Self::NONE
    }

    /// Insert a field into the set.
    pub fn insert(&mut self, field: EventField) {
        self.bits |= field.bit();
    }

    /// Return a copy of the set without `field`.
    pub fn without(mut self, field: EventField) -> Self {
        self.bits &= !field.bit();
        self
    }

    /// Check whether the set contains a field.
    pub fn contains(&self, field: EventField) -> bool {
        self.bits & field.bit() != 0
    }

    /// Return the union of two sets (`self | other`).
    pub fn union(&self, other: &Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Whether every field is restored.
    pub fn is_complete(&self) -> bool {
        *self == Self::ALL
    }

    /// Whether no field is restored.
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Fields NOT covered by this set, in declaration order.
    pub fn missing(&self) -> Vec<EventField> {
        EventField::ALL
            .into_iter()
            .filter(|f| !self.contains(*f))
            .collect()
    }

    /// Iterate over contained fields in declaration order.
    pub fn iter(&self) -> RestoreSetIter {
        RestoreSetIter {
            set: *self,
            next: 0,
        }
    }
}

impl Default for RestoreSet {
    fn default() -> Self {
        Self::ALL
    }
}

impl fmt::Debug for RestoreSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<EventField> for RestoreSet {
    fn from_iter<I: IntoIterator<Item = EventField>>(iter: I) -> Self {
        let mut set = Self::empty();
        for field in iter {
            set.insert(field);
        }
        set
    }
}

impl IntoIterator for &RestoreSet {
    type Item = EventField;
    type IntoIter = RestoreSetIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the fields of a [`RestoreSet`], in declaration order.
pub struct RestoreSetIter {
    set: RestoreSet,
    next: usize,
}

impl Iterator for RestoreSetIter {
    type Item = EventField;

    fn next(&mut self) -> Option<EventField> {
        while self.next < EventField::ALL.len() {
            let field = EventField::ALL[self.next];
            self.next += 1;
            if self.set.contains(field) {
                return Some(field);
            }
        }
        None
    }
}
