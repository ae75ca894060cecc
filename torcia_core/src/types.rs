//! Plain data records held by `ProcessState`.

use serde::Serialize;

/// Number of bottles in the pack.
pub const BOTTLE_COUNT: usize = 3;

/// Tank data entered on the first two steps. `None` means "not yet entered".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TankParameters {
    /// Initial pressure (bar)
    #[serde(rename = "P0")]
    pub p0: Option<f64>,
    /// Target pressure (bar)
    #[serde(rename = "Pfinale")]
    pub p_finale: Option<f64>,
    /// Product volume (L)
    #[serde(rename = "volumeProdotto")]
    pub volume_prodotto: Option<f64>,
    /// °C
    pub temperatura: Option<f64>,
    /// Fill level (%)
    #[serde(rename = "riempPerc")]
    pub riemp_perc: Option<f64>,
}

/// Addressable tank field, used by the numeric keypad binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TankField {
    P0,
    PFinale,
    VolumeProdotto,
    Temperatura,
    RiempPerc,
}

impl TankParameters {
    pub fn get(&self, field: TankField) -> Option<f64> {
        match field {
            TankField::P0 => self.p0,
            TankField::PFinale => self.p_finale,
            TankField::VolumeProdotto => self.volume_prodotto,
            TankField::Temperatura => self.temperatura,
            TankField::RiempPerc => self.riemp_perc,
        }
    }

    /// Store a value; non-finite input is stored as unset.
    pub(crate) fn set(&mut self, field: TankField, value: Option<f64>) {
        let value = value.filter(|v| v.is_finite());
        let slot = match field {
            TankField::P0 => &mut self.p0,
            TankField::PFinale => &mut self.p_finale,
            TankField::VolumeProdotto => &mut self.volume_prodotto,
            TankField::Temperatura => &mut self.temperatura,
            TankField::RiempPerc => &mut self.riemp_perc,
        };
        *slot = value;
    }
}

/// Parse keypad text: blank means unset, anything unparsable or non-finite too.
pub fn parse_field(text: &str) -> Option<f64> {
    let t = text.trim();
    if t.is_empty() {
        return None;
    }
    t.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BottleConfig {
    pub used: bool,
    /// bar
    pub pressure: f64,
    /// L
    pub volume: f64,
}

impl Default for BottleConfig {
    fn default() -> Self {
        Self {
            used: false,
            pressure: 200.0,
            volume: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GeneratorState {
    pub started: bool,
    pub warmup_complete: bool,
    pub operational: bool,
    pub rpm: u32,
}

/// The six end-of-run confirmations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecklistItem {
    PressuresZero,
    ValvesClosed,
    TorchStowed,
    BottlesClosed,
    UtilitiesOff,
    InstrumentsOff,
}

impl ChecklistItem {
    pub const ALL: [ChecklistItem; 6] = [
        ChecklistItem::PressuresZero,
        ChecklistItem::ValvesClosed,
        ChecklistItem::TorchStowed,
        ChecklistItem::BottlesClosed,
        ChecklistItem::UtilitiesOff,
        ChecklistItem::InstrumentsOff,
    ];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Checklist {
    pub pressures_zero: bool,
    pub valves_closed: bool,
    pub torch_stowed: bool,
    pub bottles_closed: bool,
    pub utilities_off: bool,
    pub instruments_off: bool,
}

impl Checklist {
    pub fn get(&self, item: ChecklistItem) -> bool {
        match item {
            ChecklistItem::PressuresZero => self.pressures_zero,
            ChecklistItem::ValvesClosed => self.valves_closed,
            ChecklistItem::TorchStowed => self.torch_stowed,
            ChecklistItem::BottlesClosed => self.bottles_closed,
            ChecklistItem::UtilitiesOff => self.utilities_off,
            ChecklistItem::InstrumentsOff => self.instruments_off,
        }
    }

    pub(crate) fn set(&mut self, item: ChecklistItem, done: bool) {
        let slot = match item {
            ChecklistItem::PressuresZero => &mut self.pressures_zero,
            ChecklistItem::ValvesClosed => &mut self.valves_closed,
            ChecklistItem::TorchStowed => &mut self.torch_stowed,
            ChecklistItem::BottlesClosed => &mut self.bottles_closed,
            ChecklistItem::UtilitiesOff => &mut self.utilities_off,
            ChecklistItem::InstrumentsOff => &mut self.instruments_off,
        };
        *slot = done;
    }

    pub fn is_complete(&self) -> bool {
        ChecklistItem::ALL.iter().all(|i| self.get(*i))
    }
}

/// Line valves on the P&ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Valve {
    /// Bottle pack header
    Manifold,
    TankInlet,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValveStates {
    pub manifold: bool,
    pub tank_inlet: bool,
}

impl ValveStates {
    pub fn is_open(&self, valve: Valve) -> bool {
        match valve {
            Valve::Manifold => self.manifold,
            Valve::TankInlet => self.tank_inlet,
        }
    }

    pub(crate) fn set(&mut self, valve: Valve, open: bool) {
        match valve {
            Valve::Manifold => self.manifold = open,
            Valve::TankInlet => self.tank_inlet = open,
        }
    }

    pub fn all_open(&self) -> bool {
        self.manifold && self.tank_inlet
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Utility {
    Compressor,
    Torch,
    Instrumentation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UtilityStates {
    pub compressor: bool,
    pub torch: bool,
    pub instrumentation: bool,
}

impl UtilityStates {
    pub fn is_on(&self, utility: Utility) -> bool {
        match utility {
            Utility::Compressor => self.compressor,
            Utility::Torch => self.torch,
            Utility::Instrumentation => self.instrumentation,
        }
    }

    pub(crate) fn set(&mut self, utility: Utility, on: bool) {
        match utility {
            Utility::Compressor => self.compressor = on,
            Utility::Torch => self.torch = on,
            Utility::Instrumentation => self.instrumentation = on,
        }
    }

    pub fn all_on(&self) -> bool {
        self.compressor && self.torch && self.instrumentation
    }
}
