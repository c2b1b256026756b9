// laes-core/src/units.rs

use uom::si::f64::{
    MassDensity as UomMassDensity, Power as UomPower, Pressure as UomPressure,
    ThermodynamicTemperature as UomThermodynamicTemperature,
};

// Public canonical unit types (SI, f64)
pub type Density = UomMassDensity;
pub type Power = UomPower;
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;

/// Specific energy (enthalpy, work, heat per unit mass) [J/kg].
///
/// Not part of uom's f64 set, so we use f64 with clear documentation.
pub type SpecEnergy = f64;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn bar(v: f64) -> Pressure {
    use uom::si::pressure::bar;
    Pressure::new::<bar>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn celsius(v: f64) -> Temperature {
    k(v + constants::KELVIN_OFFSET)
}

#[inline]
pub fn kg_per_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn megawatts(v: f64) -> Power {
    use uom::si::power::megawatt;
    Power::new::<megawatt>(v)
}

/// Joules to kilowatt-hours.
#[inline]
pub fn j_to_kwh(j: f64) -> f64 {
    j / constants::J_PER_KWH
}

pub mod constants {
    pub const KELVIN_OFFSET: f64 = 273.15;
    pub const SECONDS_PER_HOUR: f64 = 3600.0;
    pub const HOURS_PER_DAY: f64 = 24.0;
    pub const J_PER_KWH: f64 = 3.6e6;

    /// Standard atmosphere [Pa].
    pub const P_ATM_PA: f64 = 101_325.0;

    /// Lowest temperature the cold box may drive the high-pressure stream to [K].
    pub const T_COLD_FLOOR_K: f64 = 105.0;

    /// Density of liquid air at the normal boiling point [kg/m³].
    pub const RHO_LIQUID_AIR: f64 = 875.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _p = pa(101_325.0);
        let _t = k(300.0);
        let _rho = kg_per_m3(875.0);
        let _w = megawatts(10.0);
    }

    #[test]
    fn engineering_units() {
        assert!((bar(50.0).value - 5.0e6).abs() < 1e-6);
        assert!((celsius(25.0).value - 298.15).abs() < 1e-9);
        assert!((megawatts(10.0).value - 1.0e7).abs() < 1e-6);
        assert!((j_to_kwh(3.6e6) - 1.0).abs() < 1e-12);
    }
}
