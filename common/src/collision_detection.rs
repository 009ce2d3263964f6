use crate::shapes::{OrientedRect, Sector};

// Accumulated in f64.
pub fn circle_circle(x1: f32, z1: f32, r1: f32, x2: f32, z2: f32, r2: f32) -> bool {
    let dx = x1 as f64 - x2 as f64;
    let dz = z1 as f64 - z2 as f64;
    let dr = r1 as f64 + r2 as f64;
    dx * dx + dz * dz <= dr * dr
}

pub fn circle_rect(rect: &OrientedRect, cx: f32, cz: f32, radius: f32) -> bool {
    let check_width = rect.half_width + radius;
    let check_height = rect.half_height + radius;
    let to_circle_x = cx - rect.x;
    let to_circle_z = cz - rect.z;

    let width_proj = (to_circle_x * rect.dir_z - rect.dir_x * to_circle_z).abs();
    if width_proj > check_width {
        return false;
    }
    let height_proj = (to_circle_x * rect.dir_x + to_circle_z * rect.dir_z).abs();
    if height_proj > check_height {
        return false;
    }

    if width_proj < rect.half_width || height_proj < rect.half_height {
        return true;
    }

    let corner_dw = (width_proj - rect.half_width) as f64;
    let corner_dh = (height_proj - rect.half_height) as f64;
    let radius = radius as f64;
    corner_dw * corner_dw + corner_dh * corner_dh <= radius * radius
}

/// Approximate circle vs. sector test.
///
/// After the bounding-circle check, the circle center is tested against the
/// half-cone whose apex is pulled back by `radius` along the facing direction.
pub fn circle_sector(sector: &Sector, cx: f32, cz: f32, radius: f32) -> bool {
    if !circle_circle(sector.x, sector.z, sector.radius, cx, cz, radius) {
        return false;
    }
    if sector.is_full_circle() {
        return true;
    }

    let dir_x = sector.dir_x as f64;
    let dir_z = sector.dir_z as f64;
    let apex_x = sector.x as f64 - dir_x * radius as f64;
    let apex_z = sector.z as f64 - dir_z * radius as f64;
    let vx = cx as f64 - apex_x;
    let vz = cz as f64 - apex_z;

    let dot = vx * dir_x + vz * dir_z;
    let len_sq = vx * vx + vz * vz;
    let cos = sector.cos_half() as f64;
    let bound_sq = len_sq * cos * cos;
    if cos >= 0.0 {
        dot >= 0.0 && dot * dot >= bound_sq
    } else {
        dot >= 0.0 || dot * dot <= bound_sq
    }
}
