pub const KBTU_PER_KILOWATT_HOUR: f64 = 3.412;
pub const KBTU_PER_THERM: f64 = 100.;
pub const PERCENT_PER_UNIT: f64 = 100.;

/// Convert a percentage on a 0-100 scale into a fraction on a 0-1 scale.
///
/// No bounds are applied: values outside 0-100 propagate as-is.
pub fn percent_to_fraction(percent: f64) -> f64 {
    percent / PERCENT_PER_UNIT
}

/// Express `part` as a percentage of `whole`, or 0 when `whole` is zero.
pub fn percentage_of(part: f64, whole: f64) -> f64 {
    if whole == 0. {
        0.
    } else {
        part / whole * PERCENT_PER_UNIT
    }
}

pub fn kbtu_to_kwh(kbtu: f64, kbtu_per_kwh: f64) -> f64 {
    kbtu / kbtu_per_kwh
}

pub fn kbtu_to_therm(kbtu: f64, kbtu_per_therm: f64) -> f64 {
    kbtu / kbtu_per_therm
}
