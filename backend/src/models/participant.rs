//! Participants and the fixed roster
//!
//! A participant is a coach (shown during the reveal) together with the
//! label of the team they play. Participants are created once from static
//! data and never change during a session.

use serde::{Deserialize, Serialize};

/// Static roster data: (display name, group label).
const DEFAULT_ROSTER: [(&str, &str); 24] = [
    ("Alpha", "Ogres"),
    ("Azhagmorglum", "Orcs"),
    ("Cédric", "Orcs"),
    ("Chakabon", "Black_Orcs"),
    ("Chris TBZ 🥉", "Nurgle"),
    ("El Nabo", "Lizardmen"),
    ("Grunnlock", "Vampire"),
    ("Hellmarauder 🥉", "Underworld_Denizens"),
    ("Looping", "Skavens"),
    ("Mithrandil", "Necromantic_Horror"),
    ("Naestra", "Imperial_Retainer"),
    ("Nathan", "Norse"),
    ("NicoB 🥇", "Vampire"),
    ("Poulidor", "Human"),
    ("Ruth le Blanc", "Dwarf"),
    ("Schtroumpf", "Wood_Elves"),
    ("Skarlan", "Vampire"),
    ("Spiff04", "Skavens"),
    ("Syrseth", "Khorne"),
    ("Thibolive", "Dark_Elves"),
    ("Veltaz", "High_Elves"),
    ("VenomNerva", "Orcs"),
    ("WAX 🥈", "Dark_Elves"),
    ("coach n°24", "?"),
];

/// A single entrant in the draw.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    id: usize,
    display_name: String,
    group_label: String,
}

impl Participant {
    pub fn new(id: usize, display_name: impl Into<String>, group_label: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            group_label: group_label.into(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Name shown on the reveal banner and spun through during animation
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Team label shown next to the name in group tables
    pub fn group_label(&self) -> &str {
        &self.group_label
    }
}

/// Ordered list of participants; position `i` holds the participant with id `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    /// Build a roster from (display name, group label) pairs, assigning ids in order.
    pub fn from_pairs<I, N, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, L)>,
        N: Into<String>,
        L: Into<String>,
    {
        let participants = pairs
            .into_iter()
            .enumerate()
            .map(|(id, (name, label))| Participant::new(id, name, label))
            .collect();
        Self { participants }
    }

    /// Build a roster from already-constructed participants.
    ///
    /// Ids are not renumbered; [`Roster::validate_ids`] reports mismatches.
    pub fn from_participants(participants: Vec<Participant>) -> Self {
        Self { participants }
    }

    /// The 24-entry tournament roster.
    pub fn default_roster() -> Self {
        Self::from_pairs(DEFAULT_ROSTER)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&Participant> {
        self.participants.get(id)
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn display_names(&self) -> impl Iterator<Item = &str> {
        self.participants.iter().map(Participant::display_name)
    }

    /// Check that every participant sits at the index matching its id and has a name.
    pub fn validate_ids(&self) -> Result<(), String> {
        for (index, participant) in self.participants.iter().enumerate() {
            if participant.id != index {
                return Err(format!(
                    "participant '{}' has id {} but sits at position {}",
                    participant.display_name, participant.id, index
                ));
            }
            if participant.display_name.trim().is_empty() {
                return Err(format!("participant {} has an empty display name", index));
            }
        }
        Ok(())
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::default_roster()
    }
}
