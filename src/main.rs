use anyhow::{Context, Result};
use log::{info, warn};
use softblit::config::SceneConfig;
use softblit::display::{Display, RenderTarget, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use softblit::util::{FpsCounter, Rng};
use softblit::{BlendMode, Point, Renderer2D, SoftwareRenderer, TextureId};
use std::path::PathBuf;

const DEFAULT_SCENE: &str = "scene.json";
const STATS_INTERVAL: f32 = 5.0;

/// Command line overrides; anything left as `None` comes from the scene
#[derive(Default)]
struct Options {
    width: Option<u32>,
    height: Option<u32>,
    vsync: Option<bool>,
    scene: Option<PathBuf>,
}

fn print_help() {
    println!("Usage: softblit [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --width W, -w W           Set window width (default: {})", DEFAULT_WIDTH);
    println!("  --height H, -h H          Set window height (default: {})", DEFAULT_HEIGHT);
    println!("  --resolution WxH, -r WxH  Set resolution (e.g., 1280x720)");
    println!("  --no-vsync                Disable VSync for uncapped framerate");
    println!("  --config PATH, -c PATH    Scene file (default: {})", DEFAULT_SCENE);
    println!("  --help                    Show this help message");
}

fn parse_args() -> Options {
    let args: Vec<String> = std::env::args().collect();
    let mut options = Options::default();

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match args[i].as_str() {
            "--no-vsync" => options.vsync = Some(false),
            "--width" | "-w" => {
                options.width = value.and_then(|v| v.parse().ok());
                i += 1;
            },
            "--height" | "-h" => {
                options.height = value.and_then(|v| v.parse().ok());
                i += 1;
            },
            "--resolution" | "-r" => {
                if let Some((w, h)) = value.and_then(|v| v.split_once('x')) {
                    if let (Ok(w), Ok(h)) = (w.parse(), h.parse()) {
                        options.width = Some(w);
                        options.height = Some(h);
                    }
                }
                i += 1;
            },
            "--config" | "-c" => {
                options.scene = value.map(PathBuf::from);
                i += 1;
            },
            "--help" => {
                print_help();
                std::process::exit(0);
            },
            other => warn!("ignoring unknown argument {}", other),
        }
        i += 1;
    }

    options
}

/// An explicitly requested scene must load; the default one may be absent.
fn load_scene(options: &Options) -> Result<SceneConfig> {
    let mut scene = match &options.scene {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("failed to load scene {}", path.display()))?,
        None => SceneConfig::load(DEFAULT_SCENE).unwrap_or_else(|e| {
            info!("{} not loaded ({}), using the built-in scene", DEFAULT_SCENE, e);
            SceneConfig::default()
        }),
    };

    if let Some(width) = options.width {
        scene.width = width;
    }
    if let Some(height) = options.height {
        scene.height = height;
    }
    if let Some(vsync) = options.vsync {
        scene.vsync = vsync;
    }
    Ok(scene)
}

/// A placed texture, optionally cycling through its frames
struct Sprite {
    texture: TextureId,
    position: Point,
    blend: BlendMode,
    frame: Point,
    grid: Point,
    frame_rate: f32,
    elapsed: f32,
}

impl Sprite {
    fn advance(&mut self, dt: f32) {
        if self.frame_rate <= 0.0 || self.grid.x.saturating_mul(self.grid.y) <= 1 {
            return;
        }

        self.elapsed += dt;
        let step = 1.0 / self.frame_rate;
        while self.elapsed >= step {
            self.elapsed -= step;
            self.frame.x += 1;
            if self.frame.x >= self.grid.x {
                self.frame.x = 0;
                self.frame.y = (self.frame.y + 1) % self.grid.y;
            }
        }
    }
}

/// Load every texture in the scene and lay out the sprites.
/// A texture that fails to load is logged and its sprite left out.
fn build_sprites(renderer: &mut SoftwareRenderer, scene: &SceneConfig, rng: &mut Rng) -> Vec<Sprite> {
    let mut sprites = Vec::new();

    for config in &scene.sprites {
        let texture = match config.texture.build() {
            Ok(texture) => texture,
            Err(e) => {
                warn!("skipping sprite: {}", e);
                continue;
            },
        };

        let grid = texture.frame_dimensions();
        let size = texture.frame_size();
        let id = renderer.register_texture(texture);

        sprites.push(Sprite {
            texture: id,
            position: config.position,
            blend: config.blend,
            frame: config.frame,
            grid,
            frame_rate: config.frame_rate,
            elapsed: 0.0,
        });

        // Scattered copies may hang half off any edge
        for _ in 0..config.scatter {
            let position = Point::new(
                rng.range_i32(-size.x / 2, scene.width as i32 - size.x / 2),
                rng.range_i32(-size.y / 2, scene.height as i32 - size.y / 2),
            );
            let frame = if grid.x > 0 && grid.y > 0 {
                Point::new(rng.range_i32(0, grid.x - 1), rng.range_i32(0, grid.y - 1))
            } else {
                Point::ZERO
            };
            sprites.push(Sprite {
                texture: id,
                position,
                blend: config.blend,
                frame,
                grid,
                frame_rate: config.frame_rate,
                elapsed: 0.0,
            });
        }
    }

    sprites
}

fn main() -> Result<()> {
    env_logger::init();

    let options = parse_args();
    let scene = load_scene(&options)?;

    let (mut display, texture_creator) =
        Display::open("softblit", scene.width, scene.height, scene.vsync)
            .map_err(anyhow::Error::msg)
            .context("failed to open window")?;
    let mut target = RenderTarget::with_size(&texture_creator, scene.width, scene.height)
        .map_err(anyhow::Error::msg)?;

    let mut renderer = SoftwareRenderer::with_size(scene.width, scene.height);
    let mut rng = Rng::new(0x5EED_F00D);
    let mut sprites = build_sprites(&mut renderer, &scene, &mut rng);

    info!(
        "{}x{}, vsync {}, {} sprites from {} textures",
        scene.width,
        scene.height,
        if scene.vsync { "on" } else { "off" },
        sprites.len(),
        renderer.texture_count()
    );

    let mut fps = FpsCounter::new(120);
    let mut since_stats = 0.0;

    loop {
        let dt = fps.tick();
        if display.quit_requested() {
            break;
        }

        renderer.clear_to_black(scene.black_level)?;
        for sprite in &mut sprites {
            sprite.advance(dt);
            renderer.draw_frame_to_screen(sprite.position, sprite.texture, sprite.blend, sprite.frame)?;
        }

        if let Some(screen) = renderer.screen() {
            display.present(&mut target, screen).map_err(anyhow::Error::msg)?;
        }

        since_stats += dt;
        if since_stats >= STATS_INTERVAL {
            since_stats = 0.0;
            info!("{:.1} fps ({:.2} ms/frame)", fps.avg_fps(), fps.avg_frame_time_ms());
        }
    }

    Ok(())
}
