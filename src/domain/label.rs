//! The six toxicity labels and fixed-size per-label storage.

use std::ops::{Index, IndexMut};

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// One of the six independently classified toxicity categories.
///
/// Declaration order matters: it is the order used for iteration, display and
/// tie-breaking when ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Toxic,
    SevereToxic,
    Obscene,
    Threat,
    Insult,
    IdentityHate,
}

impl Label {
    pub const COUNT: usize = 6;

    pub const ALL: [Label; Label::COUNT] = [
        Label::Toxic,
        Label::SevereToxic,
        Label::Obscene,
        Label::Threat,
        Label::Insult,
        Label::IdentityHate,
    ];

    /// Key used by the API payloads.
    pub fn id(self) -> &'static str {
        match self {
            Label::Toxic => "toxic",
            Label::SevereToxic => "severe_toxic",
            Label::Obscene => "obscene",
            Label::Threat => "threat",
            Label::Insult => "insult",
            Label::IdentityHate => "identity_hate",
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Label::Toxic => "Toxic",
            Label::SevereToxic => "Severe toxic",
            Label::Obscene => "Obscene",
            Label::Threat => "Threat",
            Label::Insult => "Insult",
            Label::IdentityHate => "Identity hate",
        }
    }

    pub fn from_id(id: &str) -> Option<Label> {
        Label::ALL.into_iter().find(|l| l.id() == id)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// One value per label, indexed by `Label`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelMap<T>([T; Label::COUNT]);

impl<T> LabelMap<T> {
    pub fn from_fn(mut f: impl FnMut(Label) -> T) -> Self {
        Self(Label::ALL.map(&mut f))
    }

    /// Pairs of `(label, value)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Label, &T)> {
        Label::ALL.into_iter().zip(self.0.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }
}

impl<T: Default> Default for LabelMap<T> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T> Index<Label> for LabelMap<T> {
    type Output = T;

    fn index(&self, label: Label) -> &T {
        &self.0[label.index()]
    }
}

impl<T> IndexMut<Label> for LabelMap<T> {
    fn index_mut(&mut self, label: Label) -> &mut T {
        &mut self.0[label.index()]
    }
}

/// Serialized as a JSON object keyed by label id, in declaration order.
impl<T: Serialize> Serialize for LabelMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Label::COUNT))?;
        for (label, value) in self.iter() {
            map.serialize_entry(label.id(), value)?;
        }
        map.end()
    }
}
