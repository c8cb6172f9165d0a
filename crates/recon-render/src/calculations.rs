//! Display metadata and number formatting for derived calculations.

use serde::Serialize;

use recon_common::{Observation, NOT_AVAILABLE};

/// Label, description and unit of one calculation key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalculationInfo {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub unit: &'static str,
}

const fn info(
    key: &'static str,
    label: &'static str,
    description: &'static str,
    unit: &'static str,
) -> CalculationInfo {
    CalculationInfo {
        key,
        label,
        description,
        unit,
    }
}

/// Known calculations, in display order.
pub const CALCULATIONS: &[CalculationInfo] = &[
    info("sst", "Sea Surface Temperature", "SST at the splash location", "°C"),
    info("u10", "10 m Wind Speed", "Wind speed extrapolated to 10 m", "m/s"),
    info("u10_corrected", "10 m Wind (Corrected)", "10 m wind after boundary-layer correction", "m/s"),
    info("wind_correction_factor", "Wind Correction Factor", "Ratio applied to the lowest measured wind", ""),
    info("ustar", "Friction Velocity", "Surface friction velocity u*", "m/s"),
    info("z0", "Roughness Length", "Aerodynamic roughness length", "m"),
    info("cd", "Drag Coefficient", "Bulk momentum exchange coefficient", ""),
    info("ch", "Heat Exchange Coefficient", "Bulk sensible heat exchange coefficient (Stanton number)", ""),
    info("ce", "Moisture Exchange Coefficient", "Bulk latent heat exchange coefficient (Dalton number)", ""),
    info("tau", "Surface Stress", "Wind stress on the sea surface", "N/m²"),
    info("sensible_heat_flux", "Sensible Heat Flux", "Air-sea sensible heat flux", "W/m²"),
    info("latent_heat_flux", "Latent Heat Flux", "Air-sea latent heat flux", "W/m²"),
    info("total_heat_flux", "Total Heat Flux", "Sum of sensible and latent heat flux", "W/m²"),
    info("bowen_ratio", "Bowen Ratio", "Sensible over latent heat flux", ""),
    info("q_air", "Surface Specific Humidity", "Specific humidity of the lowest level", "g/kg"),
    info("q_sea", "Saturation Specific Humidity", "Saturation specific humidity at the SST", "g/kg"),
    info("delta_q", "Air-Sea Humidity Difference", "q_sea minus q_air", "g/kg"),
    info("delta_t", "Air-Sea Temperature Difference", "SST minus air temperature", "°C"),
    info("theta_e_sfc", "Surface Theta-E", "Equivalent potential temperature at the surface", "K"),
    info("mixed_layer_depth", "Mixed Layer Depth", "Depth of the well-mixed boundary layer", "m"),
    info("shear_0_3km", "0-3 km Bulk Shear", "Bulk wind shear between the surface and 3 km", "kt"),
    info("obukhov_length", "Obukhov Length", "Monin-Obukhov stability length", "m"),
];

/// Look up display metadata for a key.
pub fn lookup(key: &str) -> Option<&'static CalculationInfo> {
    CALCULATIONS.iter().find(|c| c.key == key)
}

/// Format a calculation value: scientific notation for `0 < |v| < 0.01`,
/// two fixed decimals otherwise.
pub fn format_calc_value(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude > 0.0 && magnitude < 0.01 {
        format!("{:.2e}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// One row of the calculations table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationRow {
    pub key: String,
    pub label: String,
    pub description: String,
    pub unit: String,
    pub value: String,
}

/// Calculation rows for an observation: known keys in curated order, then
/// unknown keys (sorted) labeled with the raw key.
pub fn calculation_rows(obs: &Observation) -> Vec<CalculationRow> {
    let row = |key: &str, value: &Option<f64>| {
        let meta = lookup(key);
        CalculationRow {
            key: key.to_string(),
            label: meta.map_or(key, |m| m.label).to_string(),
            description: meta.map_or("", |m| m.description).to_string(),
            unit: meta.map_or("", |m| m.unit).to_string(),
            value: value
                .map(format_calc_value)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    };

    let known = CALCULATIONS
        .iter()
        .filter_map(|c| obs.calculations.get(c.key).map(|v| row(c.key, v)));
    // BTreeMap iteration is already sorted by key
    let unknown = obs
        .calculations
        .iter()
        .filter(|(k, _)| lookup(k).is_none())
        .map(|(k, v)| row(k, v));

    known.chain(unknown).collect()
}
