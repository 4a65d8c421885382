use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use engine_core::raster::{rasterize, save_png};
use engine_core::{Color, FontdueText, HeuristicMeasure, Painter, TextMeasure, Viewport};
use vellum_config::VellumConfig;
use vellum_scene::{AnimationSettings, FrameDriver, Interaction, PaintSession};

mod scenes;
use scenes::cards::CardsScene;
use scenes::shapes::ShapesScene;
use scenes::{Board, DemoScene};

const DEFAULT_BACKGROUND: Color = Color::rgb(11.0, 18.0, 32.0);

fn select_scene(config: &VellumConfig) -> Rc<dyn DemoScene> {
    let background = config
        .rendering
        .background
        .as_deref()
        .and_then(|hex| {
            let parsed = Color::from_hex(hex);
            if parsed.is_none() {
                log::warn!("ignoring unparsable background color {hex:?}");
            }
            parsed
        })
        .unwrap_or(DEFAULT_BACKGROUND);
    let text_size = config.text.size;

    let scene_env = std::env::var("DEMO_SCENE").ok();
    if scene_env.as_deref() == Some("shapes") || std::env::args().any(|a| a == "--scene=shapes" || a == "--shapes") {
        Rc::new(ShapesScene::new(background, text_size))
    } else {
        Rc::new(CardsScene::new(background, text_size))
    }
}

fn load_font(config: &VellumConfig) -> Option<FontdueText> {
    let path = config.text.font.as_ref()?;
    match FontdueText::load(path) {
        Ok(font) => Some(font),
        Err(e) => {
            log::warn!("font {} unavailable, text will not be rasterized: {e}", path.display());
            None
        }
    }
}

fn main() -> Result<()> {
    let _ = env_logger::try_init();

    let config = VellumConfig::load();
    let settings = AnimationSettings::from(&config.animation);
    let scene = select_scene(&config);
    let font = load_font(&config);

    let measure: Box<dyn TextMeasure> = match &font {
        Some(font) => Box::new(font.clone()),
        None => Box::new(HeuristicMeasure { char_width_factor: config.rendering.char_width_factor }),
    };
    let viewport = Viewport::new(config.demo.width, config.demo.height)
        .with_scale_factor(config.rendering.scale_factor.unwrap_or(1.0));
    let mut surface = Painter::with_measure(viewport, measure);

    let painter_scene = Rc::clone(&scene);
    let mut driver = FrameDriver::new(
        settings,
        move |session: &mut PaintSession<'_, Board>, board: &Board| -> Result<()> { painter_scene.paint(session, board) },
    );

    log::info!(
        "running scene '{}' for {} frames at {}x{} (scale {})",
        scene.name(),
        config.demo.frames,
        viewport.width,
        viewport.height,
        viewport.scale_factor
    );

    // Ticks run on a synthetic clock so the output does not depend on wall time.
    let start = Instant::now();
    let interval = settings.frame_interval().max(Duration::from_millis(1));
    let size = viewport.size();
    let mut model = scene.initial_model();
    let mut dirty = true;

    for frame in 0..config.demo.frames {
        let now = start + interval * frame;
        if let Some(p) = scene.pointer(frame, size) {
            driver.set_pointer(p, now);
        }

        dirty |= scene.script(frame, &mut model);
        let result = if dirty {
            dirty = false;
            driver.request_update(Some(model.clone()), &mut surface, now)
        } else {
            driver.tick(&mut surface, now)
        };
        if let Err(e) = result {
            log::warn!("frame {frame}: {e}");
        }

        let hovered = driver.hovered().map(str::to_string);
        if hovered != model.hovered {
            log::debug!("frame {frame}: hover {:?} -> {:?}", model.hovered, hovered);
            model.hovered = hovered;
            dirty = true;
        }

        if scene.clicks_at(frame) {
            let event = driver.pointer_event(Interaction::Click);
            log::info!("frame {frame}: click on {:?}", event.topmost_identity());
            model = event.apply(&model);
            dirty = true;
        }
    }

    let list = surface.display_list();
    let pixmap = rasterize(list, font.as_ref()).context("rasterizing final frame")?;
    save_png(&pixmap, &config.demo.output)
        .with_context(|| format!("writing {}", config.demo.output.display()))?;

    log::info!(
        "wrote {} ({} commands, {} live elements, {:?})",
        config.demo.output.display(),
        list.len(),
        driver.registry().len(),
        driver.state()
    );
    Ok(())
}
