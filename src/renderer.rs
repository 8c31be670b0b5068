use crate::{
    algebra::Vec3,
    camera::{Camera, CameraConfig},
    error::{CameraError, RenderError},
    framebuffer::{clamp_color, Framebuffer},
    light::{Illumination, LightModel},
    scene::Scene,
};
use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

/// `t_min` for reflected and refracted rays.
pub const EPSILON: f32 = 1e-3;

const SKY: Vec3 = Vec3(0.3, 0.4, 0.8);

/// Vertical white → sky-blue gradient for rays that leave the scene.
pub fn background_color(rd: Vec3) -> Vec3 {
    let a = 0.5 * (rd.normalize().1 + 1.0);
    Vec3::ONE.scale(1.0 - a).add(SKY.scale(a))
}

pub fn reflect(d: Vec3, n: Vec3) -> Vec3 {
    d.sub(n.scale(2.0 * d.dot(n)))
}

/// Snell refraction of `dir` at a surface with outward normal `normal`.
/// Entering vs. exiting is decided by the sign of `dir·normal`.
/// Returns `None` on total internal reflection.
pub fn refract(dir: Vec3, normal: Vec3, ior: f32) -> Option<Vec3> {
    let d = dir.normalize();
    let (eta, n) = if d.dot(normal) < 0.0 { (1.0 / ior, normal) } else { (ior, normal.neg()) };
    let cos_i = -d.dot(n);
    let sin2_t = eta * eta * (1.0 - cos_i * cos_i);
    if sin2_t > 1.0 {
        return None;
    }
    let cos_t = (1.0 - sin2_t).sqrt();
    Some(d.scale(eta).add(n.scale(eta * cos_i - cos_t)).normalize())
}

/// Recursive Whitted tracer over an immutable scene snapshot.
pub struct Tracer<'a, L: Illumination = LightModel> {
    scene: &'a Scene,
    lights: &'a L,
    camera: &'a Camera,
}

impl<'a, L: Illumination> Tracer<'a, L> {
    pub fn new(scene: &'a Scene, lights: &'a L, camera: &'a Camera) -> Self {
        Self { scene, lights, camera }
    }

    /// Colour seen along `ro + t·rd` for `t > t_min`, following up to `depth`
    /// reflection/refraction bounces.
    pub fn trace_color(&self, ro: Vec3, rd: Vec3, t_min: f32, depth: u32) -> Vec3 {
        let Some(hit) = self.scene.intersect_nearest(ro, rd, t_min, f32::INFINITY) else {
            return background_color(rd);
        };

        let intensity = self.lights.compute_intensity(self.scene, hit.sphere, hit.point, self.camera);
        let local = self.scene.surface_color(hit.sphere, hit.point).scale(intensity);
        if depth == 0 {
            return local;
        }

        let mat = &self.scene.spheres()[hit.sphere].material;

        let reflected = if mat.reflectivity > 0.0 {
            self.trace_color(hit.point, reflect(rd, hit.normal), EPSILON, depth - 1)
        } else {
            Vec3::ZERO
        };

        let refracted = if mat.refractivity > 0.0 {
            match refract(rd, hit.normal, mat.refraction_index) {
                Some(dir) => self.trace_color(hit.point, dir, EPSILON, depth - 1),
                None => Vec3::ZERO,
            }
        } else {
            Vec3::ZERO
        };

        local
            .scale(mat.local_weight())
            .add(reflected.scale(mat.reflectivity))
            .add(refracted.scale(mat.refractivity))
    }

    /// Mean of `samples` primary rays for a pixel. One sample uses the cached
    /// pixel direction; more jitter each ray within the pixel footprint.
    pub fn pixel_color(&self, row: usize, col: usize, settings: &RenderSettings) -> Vec3 {
        let ro = self.camera.origin();
        if settings.samples <= 1 {
            return self.trace_color(ro, self.camera.direction(row, col), settings.near, settings.depth);
        }

        let index = row * self.camera.cols() + col;
        let mut rng = StdRng::seed_from_u64(settings.seed.wrapping_add(index as u64));
        let mut col_sum = Vec3::ZERO;
        for _ in 0..settings.samples {
            let jr = row as f32 + rng.gen_range(-0.5..0.5);
            let jc = col as f32 + rng.gen_range(-0.5..0.5);
            let rd = self.camera.direction_at(jr, jc);
            col_sum = col_sum.add(self.trace_color(ro, rd, settings.near, settings.depth));
        }
        col_sum.scale(1.0 / settings.samples as f32)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderSettings {
    /// Primary rays per pixel.
    pub samples: u32,
    /// Recursion bound for reflection/refraction.
    pub depth: u32,
    /// `t_min` for primary rays; 1.0 clips at the viewport plane.
    pub near: f32,
    pub seed: u64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self { samples: 1, depth: 2, near: 1.0, seed: 0 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassStats {
    pub pass: u64,
    pub resolved: usize,
    pub remaining: usize,
}

/// Owns the framebuffer and the progressive "completed" bitmap; everything
/// else is read-only while a pass runs.
pub struct Renderer<L: Illumination = LightModel> {
    scene: Scene,
    lights: L,
    camera: Camera,
    settings: RenderSettings,
    framebuffer: Framebuffer,
    completed: Vec<bool>,
    pass: u64,
    /// Draws one selection seed per progressive pass.
    selector: StdRng,
}

impl<L: Illumination> Renderer<L> {
    pub fn new(scene: Scene, lights: L, camera: Camera, settings: RenderSettings) -> Self {
        let framebuffer = Framebuffer::new(camera.rows(), camera.cols());
        let completed = vec![false; camera.rows() * camera.cols()];
        let selector = StdRng::seed_from_u64(settings.seed);
        Self { scene, lights, camera, settings, framebuffer, completed, pass: 0, selector }
    }

    pub fn tracer(&self) -> Tracer<'_, L> {
        Tracer::new(&self.scene, &self.lights, &self.camera)
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Swap camera parameters; the framebuffer and completed bitmap are
    /// reallocated at the new resolution.
    pub fn reconfigure_camera(&mut self, config: CameraConfig) -> Result<(), CameraError> {
        self.camera.reconfigure(config)?;
        let (rows, cols) = (self.camera.rows(), self.camera.cols());
        self.framebuffer = Framebuffer::new(rows, cols);
        self.completed = vec![false; rows * cols];
        self.reset_progress();
        Ok(())
    }

    /// Mark every pixel pending again without touching the framebuffer.
    pub fn reset_progress(&mut self) {
        self.completed.iter_mut().for_each(|c| *c = false);
        self.pass = 0;
        self.selector = StdRng::seed_from_u64(self.settings.seed);
    }

    pub fn remaining(&self) -> usize {
        self.completed.iter().filter(|c| !**c).count()
    }

    pub fn is_complete(&self) -> bool {
        self.remaining() == 0
    }

    /// Full pass over every pixel with `samples` rays each.
    pub fn render(&mut self, samples: u32) {
        let settings = RenderSettings { samples: samples.max(1), ..self.settings };
        let tracer = Tracer::new(&self.scene, &self.lights, &self.camera);
        let cols = self.camera.cols();

        self.framebuffer
            .pixels_mut()
            .par_iter_mut()
            .zip(self.completed.par_iter_mut())
            .enumerate()
            .for_each(|(i, (px, done))| {
                *px = clamp_color(tracer.pixel_color(i / cols, i % cols, &settings));
                *done = true;
            });

        info!(
            "rendered {}x{} at {} sample(s), depth {}",
            cols,
            self.camera.rows(),
            settings.samples,
            settings.depth
        );
    }

    /// Single-sample full pass.
    pub fn render_single(&mut self) {
        self.render(1)
    }

    /// Resolve a random `fraction` of the not-yet-completed pixels with the
    /// configured sample count. Completed pixels are never touched again.
    /// `fraction` must lie in `(0, 1]`.
    pub fn render_progressive(&mut self, fraction: f32) -> Result<PassStats, RenderError> {
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(RenderError::InvalidFraction(fraction));
        }
        let settings = self.settings;
        let pass_seed: u64 = self.selector.gen();
        let tracer = Tracer::new(&self.scene, &self.lights, &self.camera);
        let cols = self.camera.cols();

        let resolved: usize = self
            .framebuffer
            .pixels_mut()
            .par_iter_mut()
            .zip(self.completed.par_iter_mut())
            .enumerate()
            .map(|(i, (px, done))| {
                if *done {
                    return 0usize;
                }
                let mut rng = StdRng::seed_from_u64(pass_seed.wrapping_add(i as u64));
                if rng.gen::<f32>() >= fraction {
                    return 0;
                }
                *px = clamp_color(tracer.pixel_color(i / cols, i % cols, &settings));
                *done = true;
                1
            })
            .sum();

        let stats = PassStats { pass: self.pass, resolved, remaining: self.remaining() };
        debug!("progressive pass {}: {} resolved, {} remaining", stats.pass, resolved, stats.remaining);
        self.pass += 1;
        Ok(stats)
    }

    /// Run progressive passes until the image is complete or `stop` is set.
    /// `stop` is only checked between passes.
    pub fn run_progressive(
        &mut self,
        fraction: f32,
        stop: &AtomicBool,
        mut on_pass: impl FnMut(&PassStats),
    ) -> Result<Option<PassStats>, RenderError> {
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(RenderError::InvalidFraction(fraction));
        }
        let mut last = None;
        while !self.is_complete() {
            if stop.load(Ordering::Relaxed) {
                info!("progressive render stopped with {} pixels remaining", self.remaining());
                break;
            }
            let stats = self.render_progressive(fraction)?;
            on_pass(&stats);
            last = Some(stats);
        }
        Ok(last)
    }
}
