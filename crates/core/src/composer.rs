//! Field composer: turns a sample point, a time and a configuration into one
//! scalar.
//!
//! The pipeline is fixed; presets differ only in configuration:
//!
//! 1. rotate the point by `angle` so the wave travels in that direction,
//! 2. domain-warp the rotated coordinate (slow curvature, static froth),
//! 3. compute the traveling-wave phase,
//! 4. shape the phase into an intensity in [0, 1],
//! 5. map intensity to a dot size.
//!
//! Evaluation is pure: the same point, time and configuration always give the
//! same value.

use glam::DVec2;
use log::debug;

use crate::config::FieldConfig;
use crate::frame::FieldFrame;
use crate::grid::{Grid, SamplePoint};
use crate::noise::{NoiseFamily, NoiseKernel};
use crate::params::ParamId;
use crate::shape::{self, WaveShape};

/// Smallest size ever emitted.
pub const SIZE_FLOOR: f64 = 1.0;
/// Largest size ever emitted.
pub const SIZE_CEILING: f64 = 100.0;

/// Numerator of the perspective size attenuation, in world units.
pub const PERSPECTIVE_REFERENCE: f64 = 300.0;

/// Domain offset between the x and y warp samples so they decorrelate.
const WARP_DECORRELATE: DVec2 = DVec2::new(5.2, 1.3);

/// Configuration values read once per frame instead of once per point.
#[derive(Debug, Clone, Copy)]
struct Resolved {
    direction: DVec2,
    frequency: f64,
    speed: f64,
    wind_speed: f64,
    steepness: f64,
    peak_softness: f64,
    convexity: f64,
    min_size: f64,
    max_size: f64,
    noise_scale: f64,
    noise_intensity: f64,
    octaves: f64,
    persistence: f64,
    curvature_strength: f64,
    curvature_scale: f64,
    time_modulation: f64,
    froth_strength: f64,
    froth_scale: f64,
    shape: WaveShape,
    family: NoiseFamily,
}

impl Resolved {
    fn from_config(config: &FieldConfig) -> Self {
        let get = |id: ParamId| config.get(id);
        Self {
            direction: DVec2::from_angle(get(ParamId::Angle).to_radians()),
            frequency: get(ParamId::Frequency),
            speed: get(ParamId::Speed),
            wind_speed: get(ParamId::WindSpeed),
            steepness: get(ParamId::Steepness),
            peak_softness: get(ParamId::PeakSoftness),
            convexity: get(ParamId::Convexity),
            min_size: get(ParamId::MinSize),
            max_size: get(ParamId::MaxSize),
            noise_scale: get(ParamId::NoiseScale),
            noise_intensity: get(ParamId::NoiseIntensity),
            octaves: get(ParamId::Octaves),
            persistence: get(ParamId::Persistence),
            curvature_strength: get(ParamId::CurvatureStrength),
            curvature_scale: get(ParamId::CurvatureScale),
            time_modulation: get(ParamId::TimeModulation),
            froth_strength: get(ParamId::FrothStrength),
            froth_scale: get(ParamId::FrothScale),
            shape: config.shape(),
            family: config.noise_family(),
        }
    }
}

/// Composes noise and waveforms into per-point intensities and sizes.
#[derive(Debug, Clone)]
pub struct FieldComposer {
    kernel: NoiseKernel,
}

impl FieldComposer {
    pub fn new(seed: u32) -> Self {
        Self {
            kernel: NoiseKernel::new(seed),
        }
    }

    pub fn kernel(&self) -> &NoiseKernel {
        &self.kernel
    }

    /// Dot size at `point` and `time`, in `[SIZE_FLOOR, SIZE_CEILING]`.
    pub fn evaluate(&self, point: SamplePoint, time: f64, config: &FieldConfig) -> f64 {
        let r = Resolved::from_config(config);
        size_for(map_intensity(self.raw(point, time, &r)), r.min_size, r.max_size)
    }

    /// Normalized intensity at `point` and `time`, in [0, 1].
    pub fn intensity(&self, point: SamplePoint, time: f64, config: &FieldConfig) -> f64 {
        map_intensity(self.raw(point, time, &Resolved::from_config(config)))
    }

    /// Evaluates every grid point into `frame`, replacing its contents.
    ///
    /// The configuration is resolved once for the whole frame. Points whose
    /// raw value is not finite get intensity 0; how many did is logged.
    pub fn evaluate_frame(
        &self,
        grid: &Grid,
        time: f64,
        config: &FieldConfig,
        frame: &mut FieldFrame,
    ) {
        frame.begin(time, grid.len());
        if grid.is_empty() {
            return;
        }

        let r = Resolved::from_config(config);
        let mut non_finite = 0_usize;
        for &point in grid.points() {
            let raw = self.raw(point, time, &r);
            if !raw.is_finite() {
                non_finite += 1;
            }
            let intensity = map_intensity(raw);
            frame.push(intensity, size_for(intensity, r.min_size, r.max_size));
        }

        if non_finite > 0 {
            debug!("{non_finite} of {} points were non-finite at t={time}", grid.len());
        }
    }

    /// Un-sanitized intensity. May be NaN for pathological input.
    fn raw(&self, point: SamplePoint, time: f64, r: &Resolved) -> f64 {
        let p = point.to_dvec2();
        let rotated = DVec2::new(r.direction.dot(p), r.direction.perp_dot(p));
        let offset = self.warp(rotated, time, r);
        let warped = rotated + offset;

        match r.shape {
            WaveShape::Noise => {
                // The noise shape rides the wind along the travel direction.
                let n = rotated - DVec2::new(r.wind_speed * time, 0.0) + offset;
                let v = self.kernel.layered(
                    r.family,
                    n.x,
                    n.y,
                    time * r.time_modulation,
                    r.octaves,
                    r.persistence,
                    r.noise_scale,
                );
                0.5 + 0.5 * r.noise_intensity * v
            }
            WaveShape::Sine => shape::sine(self.phase(warped, time, r)),
            WaveShape::Ramp => shape::ramp(self.phase(warped, time, r)),
            WaveShape::PeakTrough => {
                shape::peak_trough(self.phase(warped, time, r), r.steepness, r.peak_softness)
            }
            WaveShape::Breaking => shape::breaking(self.phase(warped, time, r), r.convexity),
        }
    }

    #[inline]
    fn phase(&self, p: DVec2, time: f64, r: &Resolved) -> f64 {
        shape::wave_phase(p.x, r.frequency, time, r.speed)
    }

    /// Displacement from curvature and froth. Stages at zero strength or
    /// zero scale contribute exactly nothing.
    fn warp(&self, p: DVec2, time: f64, r: &Resolved) -> DVec2 {
        let mut offset = DVec2::ZERO;

        if r.curvature_strength != 0.0 && r.curvature_scale != 0.0 {
            let q = p / r.curvature_scale;
            let t = time * r.time_modulation;
            let layered = |at: DVec2| {
                self.kernel
                    .layered(r.family, at.x, at.y, t, r.octaves, r.persistence, 1.0)
            };
            offset += r.curvature_strength
                * DVec2::new(layered(q), layered(q + WARP_DECORRELATE));
        }

        if r.froth_strength != 0.0 && r.froth_scale != 0.0 {
            let q = p * r.froth_scale;
            let w = q + WARP_DECORRELATE;
            offset += r.froth_strength
                * DVec2::new(
                    self.kernel.sample(r.family, q.x, q.y),
                    self.kernel.sample(r.family, w.x, w.y),
                );
        }

        offset
    }
}

/// Output mapping step one: non-finite becomes 0, then clamp into [0, 1].
#[inline]
pub fn map_intensity(raw: f64) -> f64 {
    if raw.is_finite() {
        raw.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Output mapping step two: `lerp(min_size, max_size, intensity)`, clamped to
/// `[SIZE_FLOOR, SIZE_CEILING]`.
#[inline]
pub fn size_for(intensity: f64, min_size: f64, max_size: f64) -> f64 {
    let t = map_intensity(intensity);
    let size = min_size + (max_size - min_size) * t;
    if size.is_finite() {
        size.clamp(SIZE_FLOOR, SIZE_CEILING)
    } else {
        SIZE_FLOOR
    }
}

/// Perspective attenuation a host applies to a size for a point `distance`
/// units in front of the camera: `PERSPECTIVE_REFERENCE / distance`.
///
/// Non-positive or non-finite distances give 0 (the point is behind the
/// camera and should not be drawn).
pub fn perspective_scale(distance: f64) -> f64 {
    if distance.is_finite() && distance > 0.0 {
        PERSPECTIVE_REFERENCE / distance
    } else {
        0.0
    }
}
