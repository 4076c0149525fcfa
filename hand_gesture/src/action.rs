//! Gesture → [`Command`] mapping.
//!
//! One-to-one for now; kept apart from the classifier so a new gesture
//! vocabulary can be remapped without touching the geometry.

use crate::classifier::Gesture;

/// A control signal for the entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    Jump,
    MoveLeft,
    MoveRight,
    None,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Jump      => "jump",
            Command::MoveLeft  => "move-left",
            Command::MoveRight => "move-right",
            Command::None      => "none",
        }
    }
}

pub fn map(gesture: Gesture) -> Command {
    match gesture {
        Gesture::Open    => Command::Jump,
        Gesture::Left    => Command::MoveLeft,
        Gesture::Right   => Command::MoveRight,
        Gesture::Neutral => Command::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_table() {
        assert_eq!(map(Gesture::Open),    Command::Jump);
        assert_eq!(map(Gesture::Left),    Command::MoveLeft);
        assert_eq!(map(Gesture::Right),   Command::MoveRight);
        assert_eq!(map(Gesture::Neutral), Command::None);
    }
}
