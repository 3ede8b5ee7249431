use strum::{Display, EnumString};

/// Elemental attribute. The three form a cycle: Wit beats Gut, Gut beats
/// Heart, Heart beats Wit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Attribute {
    Gut,
    Wit,
    Heart,
}

/// How an attacker's attribute relates to a defender's.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Matchup {
    Advantage,
    Disadvantage,
    Neutral,
}

impl Attribute {
    pub const ALL: [Attribute; 3] = [Attribute::Gut, Attribute::Wit, Attribute::Heart];

    /// The attribute this one beats.
    pub const fn prey(self) -> Attribute {
        match self {
            Attribute::Wit => Attribute::Gut,
            Attribute::Gut => Attribute::Heart,
            Attribute::Heart => Attribute::Wit,
        }
    }

    pub fn beats(self, other: Attribute) -> bool {
        self.prey() == other
    }

    pub fn against(self, defender: Attribute) -> Matchup {
        if self.beats(defender) {
            Matchup::Advantage
        } else if defender.beats(self) {
            Matchup::Disadvantage
        } else {
            Matchup::Neutral
        }
    }

    /// Matchup between two optional attributes. Missing on either side is neutral.
    pub fn matchup(attacker: Option<Attribute>, defender: Option<Attribute>) -> Matchup {
        match (attacker, defender) {
            (Some(a), Some(d)) => a.against(d),
            _ => Matchup::Neutral,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_is_antisymmetric() {
        for a in Attribute::ALL {
            for b in Attribute::ALL {
                if a == b {
                    assert!(!a.beats(b));
                    assert_eq!(a.against(b), Matchup::Neutral);
                } else if a.beats(b) {
                    assert!(!b.beats(a));
                    assert_eq!(b.against(a), Matchup::Disadvantage);
                }
            }
        }
    }

    #[test]
    fn each_attribute_beats_exactly_one() {
        for a in Attribute::ALL {
            let wins = Attribute::ALL.iter().filter(|b| a.beats(**b)).count();
            let losses = Attribute::ALL.iter().filter(|b| b.beats(a)).count();
            assert_eq!((wins, losses), (1, 1));
        }
    }

    #[test]
    fn missing_attribute_is_neutral() {
        assert_eq!(Attribute::matchup(None, Some(Attribute::Gut)), Matchup::Neutral);
        assert_eq!(Attribute::matchup(Some(Attribute::Wit), None), Matchup::Neutral);
        assert_eq!(
            Attribute::matchup(Some(Attribute::Wit), Some(Attribute::Gut)),
            Matchup::Advantage
        );
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("heart".parse::<Attribute>(), Ok(Attribute::Heart));
        assert_eq!("WIT".parse::<Attribute>(), Ok(Attribute::Wit));
    }
}
