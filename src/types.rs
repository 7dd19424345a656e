/// Keyboard modifiers attached to a selection click.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
    };
    pub const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
    };
}

/// The active sort direction.
///
/// `None` means "no active sort": the sort layer passes the item collection
/// through in insertion order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortDirection {
    #[default]
    None,
    Ascending,
    Descending,
}

impl SortDirection {
    /// Ascending ↔ descending; `None` becomes ascending.
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::None | SortDirection::Descending => SortDirection::Ascending,
            SortDirection::Ascending => SortDirection::Descending,
        }
    }

    pub fn as_i8(self) -> i8 {
        match self {
            SortDirection::None => 0,
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }
}

/// Viewport geometry reported by the hosting renderer.
///
/// Only the scrollable axis matters; the table assumes a single vertical
/// scroll axis with a fixed row height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub height: u32,
}
