//! Physical train composition types.

use std::collections::HashSet;

/// Kind of physical unit, classified from the upstream material type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Locomotive,
    /// Unpowered driving cab (HVP/HVR material).
    DrivingTrailer,
    Coach,
    /// Self-propelled unit (AM material).
    Railcar,
}

impl UnitKind {
    /// Classify a material type label.
    ///
    /// SNCB material codes: HLE are electric locomotives, HVP/HVR are
    /// driving trailers, M/I/B series are coaches, AM are railcars.
    /// Unrecognized labels count as coaches.
    pub fn classify(material_type: &str) -> Self {
        let upper = material_type.to_ascii_uppercase();

        if upper.contains("HLE") || material_type.to_ascii_lowercase().contains("loco") {
            return UnitKind::Locomotive;
        }
        if upper.contains("HVP") || upper.contains("HVR") {
            return UnitKind::DrivingTrailer;
        }

        let mut chars = upper.chars();
        if let (Some(first), Some(second)) = (chars.next(), chars.next())
            && matches!(first, 'M' | 'I' | 'B')
            && second.is_ascii_digit()
        {
            return UnitKind::Coach;
        }

        if upper.contains("AM") {
            return UnitKind::Railcar;
        }

        UnitKind::Coach
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitKind::Locomotive => "locomotive",
            UnitKind::DrivingTrailer => "driving_trailer",
            UnitKind::Coach => "coach",
            UnitKind::Railcar => "railcar",
        }
    }
}

/// One physical unit of a train.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    /// Upstream unit identifier, when present.
    pub id: Option<String>,
    /// Raw material type label.
    pub material_type: String,
    pub kind: UnitKind,
}

/// The physical makeup of a vehicle on one day, head of train first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Composition {
    pub units: Vec<Unit>,
}

impl Composition {
    /// Build a composition from units in segment order.
    ///
    /// Unit identifiers may repeat across response segments; only the
    /// first occurrence of an identified unit is kept. Units without an
    /// identifier are always kept.
    pub fn from_units(units: impl IntoIterator<Item = Unit>) -> Self {
        let mut seen: HashSet<String> = HashSet::new();
        let units = units
            .into_iter()
            .filter(|unit| match &unit.id {
                Some(id) => seen.insert(id.clone()),
                None => true,
            })
            .collect();

        Self { units }
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
