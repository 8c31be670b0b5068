use std::{env, fs, process};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};

use spheretrace::{
    config::{self, Setup},
    renderer::Renderer,
};

struct Args {
    scene: PathBuf,
    out: Option<PathBuf>,
    samples: Option<u32>,
    depth: Option<u32>,
    progressive: Option<f32>,
    quiet: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        scene: PathBuf::from("scene.json"),
        out: None,
        samples: None,
        depth: None,
        progressive: None,
        quiet: false,
    };

    let mut it = env::args().skip(1);
    while let Some(flag) = it.next() {
        let mut value = || it.next().ok_or_else(|| format!("{flag} needs a value"));
        match flag.as_str() {
            "--scene" => args.scene = PathBuf::from(value()?),
            "--out" => args.out = Some(PathBuf::from(value()?)),
            "--samples" => args.samples = Some(value()?.parse().map_err(|e| format!("--samples: {e}"))?),
            "--depth" => args.depth = Some(value()?.parse().map_err(|e| format!("--depth: {e}"))?),
            "--progressive" => {
                let f: f32 = value()?.parse().map_err(|e| format!("--progressive: {e}"))?;
                if !(f > 0.0 && f <= 1.0) {
                    return Err(format!("--progressive must lie in (0, 1], got {f}"));
                }
                args.progressive = Some(f);
            }
            "--quiet" | "-q" => args.quiet = true,
            other => return Err(format!("unknown argument {other}")),
        }
    }
    Ok(args)
}

fn dump_setup(setup: &Setup) {
    let cam = setup.camera.config();
    info!("=== CAMERA ===");
    info!(" origin   : {:?}", cam.origin);
    info!(" yaw/pitch/roll (deg): {:.2} / {:.2} / {:.2}",
          cam.yaw.to_degrees(), cam.pitch.to_degrees(), cam.roll.to_degrees());
    info!(" viewport : {:.4} x {:.4} at {:.4}", cam.viewport_width(), cam.viewport_height, cam.focal_distance);
    info!(" pixels   : {} rows x {} cols", cam.rows, cam.cols);

    let l = &setup.lights;
    info!("=== LIGHTS ===");
    info!(" ambient {:.3}, directional {:.3} toward {:?}, point {:.3} at {:?}",
          l.ambient, l.directional, l.direction, l.point, l.position);

    info!("=== SPHERES ({}, {:?}) ===", setup.scene.len(), setup.source);
    for s in setup.scene.spheres() {
        info!(" [{}] center {:?} radius {:.4} color {:?} specular {:?} refl {:.2} refr {:.2} ior {:.2}",
              s.id, s.center, s.radius, s.material.color, s.material.specular,
              s.material.reflectivity, s.material.refractivity, s.material.refraction_index);
    }
}

fn output_name(rows: usize, cols: usize, samples: u32, depth: u32) -> PathBuf {
    PathBuf::from(format!("renders/render_{cols}x{rows}_s{samples}_d{depth}.png"))
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut setup = config::load_or_default(&args.scene)?;
    if let Some(s) = args.samples {
        setup.render.samples = s.max(1);
    }
    if let Some(d) = args.depth {
        setup.render.depth = d;
    }
    let progressive = args.progressive.or(setup.progressive);
    dump_setup(&setup);

    let rows = setup.camera.rows();
    let cols = setup.camera.cols();
    let settings = setup.render;
    let mut renderer = Renderer::new(setup.scene, setup.lights, setup.camera, settings);

    match progressive {
        Some(fraction) => {
            let bar = if args.quiet {
                None
            } else {
                let pb = ProgressBar::new((rows * cols) as u64);
                pb.set_style(ProgressStyle::default_bar()
                    .template("{bar:40.cyan/blue} {pos}/{len} pixels | {elapsed_precise} | ETA: {eta}")?);
                Some(pb)
            };
            let stop = AtomicBool::new(false);
            renderer.run_progressive(fraction, &stop, |stats| {
                if let Some(b) = &bar {
                    b.inc(stats.resolved as u64);
                }
            })?;
            if let Some(b) = bar {
                b.finish_with_message("Rendering complete");
            }
        }
        None => {
            let spinner = (!args.quiet).then(|| {
                let pb = ProgressBar::new_spinner();
                pb.set_message(format!("rendering {cols}x{rows} with {} sample(s)", settings.samples));
                pb.enable_steady_tick(std::time::Duration::from_millis(120));
                pb
            });
            renderer.render(settings.samples);
            if let Some(s) = spinner {
                s.finish_with_message("Rendering complete");
            }
        }
    }

    let name = args.out.unwrap_or_else(|| output_name(rows, cols, settings.samples, settings.depth));
    if let Some(dir) = Path::new(&name).parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    renderer.framebuffer().save(&name)?;
    info!("Saved → {}", name.display());
    if !args.quiet {
        println!("Saved → {}", name.display());
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            error!("{e}");
            eprintln!("usage: spheretrace [--scene FILE] [--out FILE] [--samples N] [--depth N] [--progressive F] [--quiet]");
            process::exit(2);
        }
    };

    if let Err(e) = run(args) {
        error!("{e}");
        process::exit(1);
    }
}
