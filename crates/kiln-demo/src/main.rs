use std::time::Duration;

use anyhow::Context;
use image::{Rgba, RgbaImage};

use kiln_engine::animation::{AnimationGroup, AnimationState};
use kiln_engine::batch::Batch;
use kiln_engine::config::EngineConfig;
use kiln_engine::core::{App, AppControl, EngineCtx};
use kiln_engine::device::GpuInit;
use kiln_engine::fatal;
use kiln_engine::hints::{HintKey, HintValue};
use kiln_engine::logging::{init_logging, LoggingConfig};
use kiln_engine::model::Model;
use kiln_engine::runloop::LoopStats;
use kiln_engine::scene::{Scene, SceneManager};
use kiln_engine::text::{find_system_font, Font};
use kiln_engine::window::Runtime;

const SHEET: &str = "hero";
const CELL: u32 = 16;
const TITLE_TICKS: u64 = 180;
const PIXEL_SIZES: [u32; 3] = [2, 3, 4];

fn main() {
    init_logging(LoggingConfig::default());

    let config = EngineConfig {
        title: "kiln demo".to_string(),
        width: 960,
        height: 540,
        pixel_size: 2,
        ..Default::default()
    };

    let gpu = GpuInit::for_engine(&config);
    if let Err(err) = Runtime::run(config, gpu, Demo::default()) {
        fatal::crash(&err, || {});
    }
}

/// Two idle frames on row 0, four walk frames on row 1.
fn hero_sheet() -> RgbaImage {
    RgbaImage::from_fn(CELL * 4, CELL * 2, |x, y| {
        let (frame, row) = (x / CELL, y / CELL);
        let (cx, cy) = (x % CELL, y % CELL);

        let body = (4..12).contains(&cx) && (2..11).contains(&cy);
        let stride = if row == 1 { frame as i32 % 2 * 2 - 1 } else { 0 };
        let leg = (11..16).contains(&cy)
            && ((cx as i32 == 5 + stride) || (cx as i32 == 10 - stride));
        let eye = cy == 5 && (cx == 6 || cx == 9) && !(row == 0 && frame == 1);

        if eye {
            Rgba([20, 20, 30, 255])
        } else if body {
            Rgba([230, 140, 60, 255])
        } else if leg {
            Rgba([120, 70, 40, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

#[derive(Default)]
struct Demo {
    scenes: SceneManager,
    font: Option<Font>,
    ticks: u64,
}

impl App for Demo {
    fn init(&mut self, ctx: &mut EngineCtx) -> anyhow::Result<()> {
        ctx.assets
            .sprites
            .register_sheet(SHEET, hero_sheet(), CELL, CELL)
            .context("failed to register hero sheet")?;

        ctx.assets.models.insert(
            "ship",
            Model::new().vertex(0.0, -10.0).vertex(7.0, 8.0).vertex(0.0, 4.0).vertex(-7.0, 8.0),
        )?;

        match find_system_font() {
            Some(bytes) => {
                let id = ctx.assets.fonts.load_font(&bytes)?;
                self.font = Some(Font::new(id, 8.0));
            }
            None => log::warn!("no system font found; text is disabled"),
        }

        ctx.set_hint(HintKey::Antialias, HintValue::True)?;
        ctx.set_hint_named("text-antialias", "true")?;

        self.scenes.set_scene(Some(Box::new(Title::new(self.font))));
        Ok(())
    }

    fn update(&mut self, ctx: &mut EngineCtx, delta: f64) -> anyhow::Result<AppControl> {
        self.ticks += 1;
        if self.ticks == TITLE_TICKS {
            self.scenes.set_scene(Some(Box::new(Field::new(self.font)?)));
        }
        self.scenes.update(ctx, delta)?;
        Ok(AppControl::Continue)
    }

    fn render(&mut self, batch: &mut Batch<'_>) -> anyhow::Result<()> {
        self.scenes.render(batch)
    }
}

struct Title {
    font: Option<Font>,
    pulse: f32,
}

impl Title {
    fn new(font: Option<Font>) -> Self {
        Self { font, pulse: 0.0 }
    }
}

impl Scene for Title {
    fn update(&mut self, _ctx: &mut EngineCtx, _delta: f64) -> anyhow::Result<()> {
        self.pulse += 0.08;
        Ok(())
    }

    fn render(&mut self, batch: &mut Batch<'_>) -> anyhow::Result<()> {
        let (w, h) = (batch.width() as f32, batch.height() as f32);
        batch.clear_color_rgb(0.05, 0.05, 0.08);
        batch.clear_screen();

        let r = 30.0 + self.pulse.sin() * 6.0;
        batch.color(0.9, 0.5, 0.2, 0.8);
        batch.fill_oval(w / 2.0 - r, h / 2.0 - r, r * 2.0, r * 2.0);

        if let Some(font) = &self.font {
            batch.color_rgb(1.0, 1.0, 1.0);
            batch.draw_text("kiln", w / 2.0 - 10.0, h / 2.0 + r + 4.0, &font.sized(12.0));
        }
        Ok(())
    }

    fn on_end(&mut self) {
        log::info!("title finished");
    }
}

struct Field {
    font: Option<Font>,
    hero: AnimationGroup,
    x: f32,
    dir: f32,
    angle: f32,
    ticks: u64,
    stats: LoopStats,
}

impl Field {
    const IDLE: usize = 0;
    const WALK: usize = 1;

    fn new(font: Option<Font>) -> anyhow::Result<Self> {
        let idle = AnimationState::new(SHEET, vec![(0, 0), (1, 0)], 0, 0, Duration::from_millis(400))?;
        let walk = AnimationState::new(
            SHEET,
            vec![(0, 1), (1, 1), (2, 1), (3, 1)],
            0,
            0,
            Duration::from_millis(120),
        )?;
        Ok(Self {
            font,
            hero: AnimationGroup::new(Self::WALK, vec![idle, walk])?,
            x: 8.0,
            dir: 1.0,
            angle: 0.0,
            ticks: 0,
            stats: LoopStats::default(),
        })
    }
}

impl Scene for Field {
    fn update(&mut self, ctx: &mut EngineCtx, _delta: f64) -> anyhow::Result<()> {
        self.ticks += 1;
        self.stats = ctx.stats();
        self.angle += 0.03;

        // Walk for four seconds, rest for one.
        let walking = self.ticks % 300 < 240;
        let wanted = if walking { Self::WALK } else { Self::IDLE };
        if self.hero.current_index() != wanted {
            self.hero.set_current(wanted)?;
            self.hero.reset();
        }
        self.hero.update();

        if walking {
            let width = ctx.parent_size().scaled_down(ctx.pixel_size()).width as f32;
            self.x += self.dir;
            if self.x < 0.0 || self.x > width - 32.0 {
                self.dir = -self.dir;
                self.x = self.x.clamp(0.0, (width - 32.0).max(0.0));
            }
        }

        if self.ticks % 600 == 0 {
            let next = PIXEL_SIZES[(self.ticks / 600) as usize % PIXEL_SIZES.len()];
            if let Err(err) = ctx.set_pixel_size(next) {
                log::warn!("{err}");
            }
        }
        Ok(())
    }

    fn render(&mut self, batch: &mut Batch<'_>) -> anyhow::Result<()> {
        let (w, h) = (batch.width() as f32, batch.height() as f32);
        let ground = h * 0.7;

        batch.clear_color_rgb(0.35, 0.6, 0.85);
        batch.clear_screen();

        batch.color_u8(70, 140, 60, 255);
        batch.fill_rect(0.0, ground, w, h - ground);
        batch.color_u8(40, 90, 40, 255);
        batch.stroke(2.0);
        batch.draw_line(0.0, ground, w, ground);

        batch.color(1.0, 0.95, 0.6, 1.0);
        batch.fill_oval(w - 50.0, 12.0, 28.0, 28.0);
        batch.color_argb(0x80ff_ffff);
        batch.fill_round_rect(20.0, 24.0, 60.0, 18.0, 12.0, 12.0);

        self.hero.begin(batch);
        batch.draw_sprite_scaled(self.x, ground - 32.0, 32.0, 32.0);
        self.hero.end(batch);

        batch.translate(w / 2.0, h * 0.35);
        batch.rotate(self.angle, 0.0, 0.0);
        batch.color(0.9, 0.9, 0.95, 1.0);
        batch.fill_model("ship")?;
        batch.color(0.2, 0.2, 0.3, 1.0);
        batch.stroke(1.0);
        batch.draw_model("ship")?;
        batch.reset_transform();

        if let Some(font) = &self.font {
            batch.color_rgb(1.0, 1.0, 1.0);
            batch.draw_text(&self.stats.to_string(), 4.0, 4.0, font);
        }
        Ok(())
    }

    fn on_init(&mut self) {
        log::info!("field started");
    }
}
