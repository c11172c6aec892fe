//! Secondary layout table of the polymorphic link macro.
use strum::{EnumIter, FromRepr};

use super::FieldSlot::{self, Field as F, Terminator as T};

/// Link target selected by the first field of a link macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, FromRepr)]
#[repr(u8)]
pub enum LinkKind {
    Character = 0,
    Item = 2,
    MapPosition = 3,
    Quest = 4,
    Achievement = 5,
    HowTo = 6,
    PartyFinderNotification = 7,
    Status = 8,
    PartyFinder = 9,
    AkatsukiNote = 10,
    Description = 11,
    WorldRanking = 12,
    Story = 13,
    /// Closes the hyperlink opened by a previous link macro.
    Terminator = 0xCE,
}

/// Layout used for kinds without a dedicated entry.
pub const GENERIC: &[FieldSlot] = &[
    F("kind"),
    F("arg1"),
    F("arg2"),
    F("arg3"),
    F("arg4"),
    T,
];

impl LinkKind {
    /// Decode the selector value of a link macro.
    pub fn from_value(value: u32) -> Option<Self> {
        u8::try_from(value).ok().and_then(Self::from_repr)
    }

    pub fn to_str(self) -> &'static str {
        match self {
            LinkKind::Character => "character",
            LinkKind::Item => "item",
            LinkKind::MapPosition => "mapposition",
            LinkKind::Quest => "quest",
            LinkKind::Achievement => "achievement",
            LinkKind::HowTo => "howto",
            LinkKind::PartyFinderNotification => "partyfindernotification",
            LinkKind::Status => "status",
            LinkKind::PartyFinder => "partyfinder",
            LinkKind::AkatsukiNote => "akatsukinote",
            LinkKind::Description => "description",
            LinkKind::WorldRanking => "worldranking",
            LinkKind::Story => "story",
            LinkKind::Terminator => "terminator",
        }
    }

    /// Field slots of this kind, selector included.
    pub fn slots(self) -> &'static [FieldSlot] {
        match self {
            LinkKind::Character => &[
                F("kind"),
                F("flags"),
                F("world_id"),
                F("unused"),
                F("name"),
                T,
            ],
            LinkKind::Item => &[
                F("kind"),
                F("item_id"),
                F("rarity"),
                F("unused1"),
                F("unused2"),
                F("item_name"),
                T,
            ],
            LinkKind::MapPosition => &[
                F("kind"),
                F("territory_map"),
                F("raw_x"),
                F("raw_y"),
                F("raw_z"),
                T,
            ],
            LinkKind::Quest => &[F("kind"), F("quest_id"), T],
            LinkKind::Achievement => &[F("kind"), F("achievement_id"), T],
            LinkKind::HowTo => &[F("kind"), F("how_to_id"), T],
            LinkKind::PartyFinderNotification => &[F("kind"), T],
            LinkKind::Status => &[F("kind"), F("status_id"), F("flags"), T],
            LinkKind::PartyFinder => &[
                F("kind"),
                F("listing_id"),
                F("unused"),
                F("world_id"),
                F("name"),
                T,
            ],
            LinkKind::AkatsukiNote => &[F("kind"), F("note_id"), T],
            LinkKind::Description => &[F("kind"), F("entry_type"), F("entry_id"), T],
            LinkKind::WorldRanking => &[F("kind"), F("world_id"), T],
            LinkKind::Story => &[F("kind"), F("story_id"), T],
            LinkKind::Terminator => &[F("kind"), T],
        }
    }
}

/// Slots selected by the literal value of the selector field. `None` stands
/// for a selector that is not an integer literal.
pub fn slots_for(selector: Option<u32>) -> &'static [FieldSlot] {
    selector
        .and_then(LinkKind::from_value)
        .map_or(GENERIC, LinkKind::slots)
}
