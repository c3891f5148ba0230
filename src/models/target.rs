//! Demand targets, one regression model each

use std::fmt;

/// Beer style whose bottle demand is forecast.
///
/// [`Target::ALL`] is the single ordering used to load models, run
/// predictions and lay out response fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Target {
    PaleAle,
    Lager,
    Ipa,
    WhiteBeer,
    DarkBeer,
    FruitBeer,
}

impl Target {
    pub const COUNT: usize = 6;

    pub const ALL: [Target; Self::COUNT] = [
        Target::PaleAle,
        Target::Lager,
        Target::Ipa,
        Target::WhiteBeer,
        Target::DarkBeer,
        Target::FruitBeer,
    ];

    /// Identifier used for artifact file names and response fields
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Target::PaleAle => "pale_ale_bottles",
            Target::Lager => "lager_bottles",
            Target::Ipa => "ipa_bottles",
            Target::WhiteBeer => "white_beer_bottles",
            Target::DarkBeer => "dark_beer_bottles",
            Target::FruitBeer => "fruit_beer_bottles",
        }
    }

    /// Position of this target within [`Target::ALL`]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
