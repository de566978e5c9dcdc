use std::str::FromStr;

/// Shared literal header every synthesized keymode section is written
/// under. osu! expects `[Mania]` repeated once per playable keymode and
/// tells the copies apart by their own `Keys` option, not by header name.
pub const MANIA_HEADER: &str = "Mania";

/// The closed set of keymodes osu!mania recognizes. This table is fixed at
/// design time; resolution iterates it in this order, it is never
/// discovered from input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keymode {
    Keys1,
    Keys2,
    Keys3,
    Keys4,
    Keys5,
    Keys6,
    Keys7,
    Keys8,
    Keys9,
    Keys10,
    Keys12,
    Keys14,
    Keys16,
    Keys18,
}

impl Keymode {
    pub const ALL: [Keymode; 14] = [
        Self::Keys1,
        Self::Keys2,
        Self::Keys3,
        Self::Keys4,
        Self::Keys5,
        Self::Keys6,
        Self::Keys7,
        Self::Keys8,
        Self::Keys9,
        Self::Keys10,
        Self::Keys12,
        Self::Keys14,
        Self::Keys16,
        Self::Keys18,
    ];

    pub const fn key_count(self) -> u32 {
        match self {
            Self::Keys1 => 1,
            Self::Keys2 => 2,
            Self::Keys3 => 3,
            Self::Keys4 => 4,
            Self::Keys5 => 5,
            Self::Keys6 => 6,
            Self::Keys7 => 7,
            Self::Keys8 => 8,
            Self::Keys9 => 9,
            Self::Keys10 => 10,
            Self::Keys12 => 12,
            Self::Keys14 => 14,
            Self::Keys16 => 16,
            Self::Keys18 => 18,
        }
    }

    /// Option name a variant assigns a style under. Authoring input is
    /// matched against this case-insensitively; observed configs mix
    /// `Keys14` and `keys14` spellings.
    pub const fn identifier(self) -> &'static str {
        match self {
            Self::Keys1 => "Keys1",
            Self::Keys2 => "Keys2",
            Self::Keys3 => "Keys3",
            Self::Keys4 => "Keys4",
            Self::Keys5 => "Keys5",
            Self::Keys6 => "Keys6",
            Self::Keys7 => "Keys7",
            Self::Keys8 => "Keys8",
            Self::Keys9 => "Keys9",
            Self::Keys10 => "Keys10",
            Self::Keys12 => "Keys12",
            Self::Keys14 => "Keys14",
            Self::Keys16 => "Keys16",
            Self::Keys18 => "Keys18",
        }
    }

    /// Internal section name used while a derived config is composed in
    /// memory. Unique per keymode so sections can coexist in the store;
    /// rewritten to [`MANIA_HEADER`] when the document is serialized.
    pub fn section_name(self) -> String {
        format!("{MANIA_HEADER}{}", self.key_count())
    }
}

impl FromStr for Keymode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|keymode| keymode.identifier().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Keymode, MANIA_HEADER};
    use std::str::FromStr;

    #[test]
    fn table_is_ordered_by_key_count() {
        let counts: Vec<u32> = Keymode::ALL.iter().map(|k| k.key_count()).collect();
        let mut sorted = counts.clone();
        sorted.sort_unstable();
        assert_eq!(counts, sorted);
        assert_eq!(counts.len(), 14);
    }

    #[test]
    fn identifiers_carry_their_key_count() {
        for keymode in Keymode::ALL {
            assert_eq!(
                keymode.identifier(),
                format!("Keys{}", keymode.key_count())
            );
        }
    }

    #[test]
    fn from_str_ignores_ascii_case() {
        assert_eq!(Keymode::from_str("keys14"), Ok(Keymode::Keys14));
        assert_eq!(Keymode::from_str("KEYS4"), Ok(Keymode::Keys4));
        assert_eq!(Keymode::from_str(" Keys18 "), Ok(Keymode::Keys18));
        assert!(Keymode::from_str("Keys11").is_err());
    }

    #[test]
    fn section_names_disambiguate_by_count() {
        assert_eq!(Keymode::Keys7.section_name(), "Mania7");
        assert!(Keymode::Keys7.section_name().starts_with(MANIA_HEADER));
    }
}
