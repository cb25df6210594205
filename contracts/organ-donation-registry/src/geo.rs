// geo.rs - Deterministic distance between registered locations
// Integer-only equirectangular approximation over microdegree coordinates.
// Identical inputs always produce identical output; there is no RNG and
// no floating point anywhere in the computation.

use crate::GeoPoint;

/// Meters per degree of latitude (and of longitude at the equator)
const METERS_PER_DEGREE: i64 = 111_320;

/// cos(deg) scaled by 1000, for 0..=90 degrees
const COS_MILLI: [i64; 91] = [
    1000, 1000, 999, 999, 998, 996, 995, 993, 990, 988, // 0-9
    985, 982, 978, 974, 970, 966, 961, 956, 951, 946, // 10-19
    940, 934, 927, 921, 914, 906, 899, 891, 883, 875, // 20-29
    866, 857, 848, 839, 829, 819, 809, 799, 788, 777, // 30-39
    766, 755, 743, 731, 719, 707, 695, 682, 669, 656, // 40-49
    643, 629, 616, 602, 588, 574, 559, 545, 530, 515, // 50-59
    500, 485, 469, 454, 438, 423, 407, 391, 375, 358, // 60-69
    342, 326, 309, 292, 276, 259, 242, 225, 208, 191, // 70-79
    174, 156, 139, 122, 105, 87, 70, 52, 35, 17, // 80-89
    0, // 90
];

/// Integer square root (Newton's method)
fn isqrt(n: u64) -> u64 {
    if n < 2 {
        return n;
    }
    let mut x = n;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

fn cos_milli_at(lat_e6: i64) -> i64 {
    let deg = lat_e6.unsigned_abs() / 1_000_000;
    let idx = if deg > 90 { 90 } else { deg as usize };
    COS_MILLI[idx]
}

/// Great-circle distance in whole kilometers between two points.
/// Equirectangular projection around the mean latitude, which is
/// accurate to within a few percent at the distances that matter for
/// organ transport.
pub fn distance_km(a: &GeoPoint, b: &GeoPoint) -> u32 {
    let dlat = (a.lat_e6 as i64 - b.lat_e6 as i64).unsigned_abs() as i64;

    let mut dlon = (a.lon_e6 as i64 - b.lon_e6 as i64).unsigned_abs() as i64;
    // Shorter way around the antimeridian
    if dlon > 180_000_000 {
        dlon = 360_000_000 - dlon;
    }

    let mean_lat = (a.lat_e6 as i64 + b.lat_e6 as i64) / 2;
    let cos_lat = cos_milli_at(mean_lat);

    let dy_m = dlat * METERS_PER_DEGREE / 1_000_000;
    let dx_m = dlon * METERS_PER_DEGREE * cos_lat / 1_000_000_000;

    let dist_m = isqrt((dx_m * dx_m + dy_m * dy_m) as u64);
    (dist_m / 1000) as u32
}
