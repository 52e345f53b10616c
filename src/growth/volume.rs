use tracing::warn;

use crate::error::StandError;
use crate::models::{
    MerchantableCoefficients, MerchantableLimits, MerchantableModel, MerchantablePair,
    VolumeCoefficients, VolumeModel, VolumePair,
};

fn require_positive(name: &str, value: f64) -> Result<(), StandError> {
    if value <= 0.0 {
        return Err(StandError::Domain(format!(
            "{name} must be positive, got {value}"
        )));
    }
    Ok(())
}

fn volume_one_bark(n: f64, ba: f64, age: f64, si: f64, c: &VolumeCoefficients) -> f64 {
    (c.d1 + c.d2 * n.ln() + c.d3 * ba.ln() + c.d4 * ba.ln() / age + c.d5 * si.ln()).exp()
}

/// Total stand volume, outside and inside bark (m³/ha).
///
/// `ln(VOL) = d1 + d2*ln(N) + d3*ln(BA) + d4*ln(BA)/AGE + d5*ln(SI)`
pub fn total_volume(n: f64, ba: f64, age: f64, si: f64) -> Result<VolumePair, StandError> {
    total_volume_with(n, ba, age, si, &VolumeModel::default())
}

pub fn total_volume_with(
    n: f64,
    ba: f64,
    age: f64,
    si: f64,
    model: &VolumeModel,
) -> Result<VolumePair, StandError> {
    require_positive("N", n)?;
    require_positive("BA", ba)?;
    require_positive("AGE", age)?;
    require_positive("SI", si)?;
    Ok(VolumePair {
        outside_bark: volume_one_bark(n, ba, age, si, &model.outside_bark),
        inside_bark: volume_one_bark(n, ba, age, si, &model.inside_bark),
    })
}

fn merchantable_ratio(
    n: f64,
    qd: f64,
    top: f64,
    min_dbh: f64,
    c: &MerchantableCoefficients,
) -> f64 {
    (c.m1 * (top / qd).powf(c.m2) + c.m3 * n.powf(c.m4) * (min_dbh / qd).powf(c.m5)).exp()
}

/// Merchantable stand volume under the given size limits (m³/ha).
///
/// `VOLm = VOL * exp(m1*(t/QD)^m2 + m3*N^m4*(d/QD)^m5)` per bark type.
/// A one-sided total volume yields a one-sided result and an observable
/// warning; only the absence of both totals is an error.
pub fn merchantable_volume(
    n: f64,
    qd: f64,
    limits: &MerchantableLimits,
    vol_outside: Option<f64>,
    vol_inside: Option<f64>,
) -> Result<MerchantablePair, StandError> {
    merchantable_volume_with(
        n,
        qd,
        limits,
        vol_outside,
        vol_inside,
        &MerchantableModel::default(),
    )
}

pub fn merchantable_volume_with(
    n: f64,
    qd: f64,
    limits: &MerchantableLimits,
    vol_outside: Option<f64>,
    vol_inside: Option<f64>,
    model: &MerchantableModel,
) -> Result<MerchantablePair, StandError> {
    if vol_outside.is_none() && vol_inside.is_none() {
        return Err(StandError::InsufficientInput(
            "merchantable volume needs at least one total volume".to_string(),
        ));
    }
    require_positive("N", n)?;
    require_positive("QD", qd)?;
    require_positive("top diameter", limits.top_diameter_cm)?;
    require_positive("minimum DBH", limits.min_dbh_cm)?;
    if let Some(v) = vol_outside {
        require_positive("VOL outside bark", v)?;
    }
    if let Some(v) = vol_inside {
        require_positive("VOL inside bark", v)?;
    }

    match (vol_outside, vol_inside) {
        (Some(_), None) => warn!("no inside-bark total volume; VOLm inside bark unavailable"),
        (None, Some(_)) => warn!("no outside-bark total volume; VOLm outside bark unavailable"),
        _ => {}
    }

    let outside = vol_outside.map(|v| {
        v * merchantable_ratio(
            n,
            qd,
            limits.top_diameter_cm,
            limits.min_dbh_cm,
            &model.outside_bark,
        )
    });
    let inside = vol_inside.map(|v| {
        v * merchantable_ratio(
            n,
            qd,
            limits.top_diameter_cm,
            limits.min_dbh_cm,
            &model.inside_bark,
        )
    });

    Ok(MerchantablePair {
        outside_bark: outside,
        inside_bark: inside,
    })
}
