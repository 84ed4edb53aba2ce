//! Layer catalog: the fixed set of measurement layers the dashboard analyses

use serde::{Deserialize, Serialize};

/// Kind of data a layer carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Temperature,
    Traffic,
    Precipitation,
    AirQuality,
    WaterQuality,
    GreenSpaces,
}

/// Static description of an analysable layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: LayerKind,
    pub unit: &'static str,
}

/// Built-in layers, in display order.
pub const LAYER_CATALOG: [LayerDescriptor; 6] = [
    LayerDescriptor { id: "fixed-temperature", name: "Temperature", kind: LayerKind::Temperature, unit: "°C" },
    LayerDescriptor { id: "fixed-traffic", name: "Traffic", kind: LayerKind::Traffic, unit: "vehicles/h" },
    LayerDescriptor { id: "fixed-rain", name: "Precipitation", kind: LayerKind::Precipitation, unit: "mm" },
    LayerDescriptor { id: "fixed-air-quality", name: "Air Quality", kind: LayerKind::AirQuality, unit: "AQI" },
    LayerDescriptor { id: "fixed-water-quality", name: "Water Quality", kind: LayerKind::WaterQuality, unit: "WQI" },
    LayerDescriptor { id: "fixed-green-spaces", name: "Green Spaces", kind: LayerKind::GreenSpaces, unit: "%" },
];

/// Look up a catalog layer by id.
pub fn find_layer(id: &str) -> Option<&'static LayerDescriptor> {
    LAYER_CATALOG.iter().find(|l| l.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_layer() {
        let layer = find_layer("fixed-rain").unwrap();
        assert_eq!(layer.kind, LayerKind::Precipitation);
        assert!(find_layer("fixed-snow").is_none());
    }

    #[test]
    fn test_catalog_ids_unique() {
        let mut ids: Vec<_> = LAYER_CATALOG.iter().map(|l| l.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), LAYER_CATALOG.len());
    }
}
