//! Process phases and wizard steps.

use core::fmt;

use serde::Serialize;

/// Process phase. Exactly one is active; a run only moves forward through
/// the list, and only a reset returns it to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub enum Phase {
    #[default]
    Idle,
    Pressurizzazione,
    Stasi,
    Depressurizzazione,
    ScaricoLinee,
    ScaricoGeneratore,
    Checklist,
}

impl Phase {
    /// Labels shown for the automatic shutdown sequence. Only `Stasi` is ever
    /// entered; the sequence runs as one countdown.
    pub const AUTOMATIC_SEQUENCE: [Phase; 4] = [
        Phase::Stasi,
        Phase::Depressurizzazione,
        Phase::ScaricoLinee,
        Phase::ScaricoGeneratore,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Pressurizzazione => "Pressurizzazione",
            Phase::Stasi => "Stasi",
            Phase::Depressurizzazione => "Depressurizzazione",
            Phase::ScaricoLinee => "ScaricoLinee",
            Phase::ScaricoGeneratore => "ScaricoGeneratore",
            Phase::Checklist => "Checklist",
        }
    }

    /// True while gas is moving and line toggles are interlocked.
    pub fn is_running(self) -> bool {
        matches!(self, Phase::Pressurizzazione | Phase::Stasi)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One of the nine ordered wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub enum WizardStep {
    #[default]
    TankData,
    TargetPressure,
    BottleSelection,
    Checks,
    Generator,
    Utilities,
    Pressurization,
    AutomaticProcess,
    Save,
}

impl WizardStep {
    pub const COUNT: usize = 9;

    pub const ALL: [WizardStep; Self::COUNT] = [
        WizardStep::TankData,
        WizardStep::TargetPressure,
        WizardStep::BottleSelection,
        WizardStep::Checks,
        WizardStep::Generator,
        WizardStep::Utilities,
        WizardStep::Pressurization,
        WizardStep::AutomaticProcess,
        WizardStep::Save,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn is_last(self) -> bool {
        self.index() + 1 == Self::COUNT
    }

    pub fn name(self) -> &'static str {
        match self {
            WizardStep::TankData => "Tank data",
            WizardStep::TargetPressure => "Target pressure",
            WizardStep::BottleSelection => "Bottle selection",
            WizardStep::Checks => "Checks",
            WizardStep::Generator => "Generator",
            WizardStep::Utilities => "Utilities",
            WizardStep::Pressurization => "Pressurization",
            WizardStep::AutomaticProcess => "Automatic process",
            WizardStep::Save => "Save",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.index(), self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_indices_round_trip_through_the_table() {
        for (i, s) in WizardStep::ALL.iter().enumerate() {
            assert_eq!(s.index(), i);
            assert_eq!(WizardStep::from_index(i), Some(*s));
        }
        assert_eq!(WizardStep::from_index(9), None);
    }

    #[test]
    fn navigation_stops_at_both_ends() {
        assert_eq!(WizardStep::TankData.previous(), None);
        assert_eq!(WizardStep::Save.next(), None);
        assert!(WizardStep::Save.is_last());
        assert_eq!(
            WizardStep::Generator.next(),
            Some(WizardStep::Utilities)
        );
    }

    #[test]
    fn phases_are_ordered_along_the_run() {
        assert!(Phase::Idle < Phase::Pressurizzazione);
        assert!(Phase::Stasi < Phase::Checklist);
        assert!(Phase::Stasi.is_running());
        assert!(!Phase::Checklist.is_running());
    }
}
