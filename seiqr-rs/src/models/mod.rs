use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

mod indices;
mod states;
mod transitions;
pub use indices::*;
pub use states::*;
pub use transitions::*;

/// Semantic category of a sub-state.
///
/// Chain categories (Vaccinated, Exposed, Quarantined, Infected, Severe) are
/// expanded into one cohort per time step of residence. All other categories
/// have a single sub-state.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Birth,
    Susceptible,
    Vaccinated,
    Exposed,
    Quarantined,
    Infected,
    Severe,
    VaccinationImmunized,
    MaternallyImmunized,
    RecoveryImmunized,
    Dead,
}

impl Category {
    /// Number of categories.
    pub const CARDINALITY: usize = 11;

    /// All categories in population vector order.
    pub const ALL: [Category; Category::CARDINALITY] = [
        Category::Birth,
        Category::Susceptible,
        Category::Vaccinated,
        Category::Exposed,
        Category::Quarantined,
        Category::Infected,
        Category::Severe,
        Category::VaccinationImmunized,
        Category::MaternallyImmunized,
        Category::RecoveryImmunized,
        Category::Dead,
    ];

    /// Position of the category in [`Category::ALL`].
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// True for stages expanded into chains of cohorts.
    pub fn is_chain(self) -> bool {
        matches!(
            self,
            Category::Vaccinated
                | Category::Exposed
                | Category::Quarantined
                | Category::Infected
                | Category::Severe
        )
    }

    /// True for the three immunized sinks.
    pub fn is_immunized(self) -> bool {
        matches!(
            self,
            Category::VaccinationImmunized
                | Category::MaternallyImmunized
                | Category::RecoveryImmunized
        )
    }

    /// True for states without disease-driven outgoing edges.
    pub fn is_terminal(self) -> bool {
        self.is_immunized() || self == Category::Dead
    }

    /// Prefix used to name sub-states of this category.
    pub fn label(self) -> &'static str {
        match self {
            Category::Birth => "Birth",
            Category::Susceptible => "Susceptible",
            Category::Vaccinated => "Vaccinated",
            Category::Exposed => "Exposed",
            Category::Quarantined => "Quarantined",
            Category::Infected => "Infected",
            Category::Severe => "Severe_Infected",
            Category::VaccinationImmunized => "Vaccination_Immunized",
            Category::MaternallyImmunized => "Maternally_Immunized",
            Category::RecoveryImmunized => "Recovery_Immunized",
            Category::Dead => "Dead",
        }
    }

    /// Short column header.
    pub fn abbrev(self) -> &'static str {
        match self {
            Category::Birth => "B",
            Category::Susceptible => "S",
            Category::Vaccinated => "V",
            Category::Exposed => "E",
            Category::Quarantined => "Q",
            Category::Infected => "I",
            Category::Severe => "H",
            Category::VaccinationImmunized => "VI",
            Category::MaternallyImmunized => "MI",
            Category::RecoveryImmunized => "RI",
            Category::Dead => "D",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One entry of the population vector: a category and, for chain stages, the
/// 1-based cohort (time steps since entering the stage). Single states use
/// cohort 0.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct SubState {
    pub category: Category,
    pub cohort: usize,
}

impl SubState {
    /// The sub-state of a non-chain category.
    pub fn single(category: Category) -> Self {
        SubState {
            category,
            cohort: 0,
        }
    }

    /// The k-th cohort of a chain category.
    pub fn cohort(category: Category, k: usize) -> Self {
        SubState {
            category,
            cohort: k,
        }
    }
}

impl Display for SubState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.category.is_chain() {
            write!(f, "{}_{}", self.category.label(), self.cohort)
        } else {
            f.write_str(self.category.label())
        }
    }
}
