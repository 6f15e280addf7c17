use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

static MESSAGES_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/messages");

/// Placeholder replaced by the winner's name in message templates.
pub const NAME_PLACEHOLDER: &str = "{name}";

const FALLBACK_TEMPLATE: &str = "Selected participant: {name}";

#[derive(Deserialize)]
struct MessageFile {
    templates: Vec<String>,
}

/// Bundled winner message templates. Falls back to a single plain template if
/// the bundle cannot be read.
pub fn winner_templates() -> Vec<String> {
    MESSAGES_DIR
        .get_file("winner.json")
        .and_then(|file| file.contents_utf8())
        .and_then(|text| serde_json::from_str::<MessageFile>(text).ok())
        .map(|file| file.templates)
        .filter(|templates| !templates.is_empty())
        .unwrap_or_else(|| vec![FALLBACK_TEMPLATE.to_string()])
}

pub fn render_message(template: &str, name: &str) -> String {
    template.replace(NAME_PLACEHOLDER, name)
}

/// Spark thrown out from the announcement
#[derive(Debug, Clone)]
pub struct Spark {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
}

impl Spark {
    fn new<R: Rng>(x: f64, y: f64, rng: &mut R) -> Self {
        Self {
            x,
            y,
            vel_x: rng.gen_range(-3.0..3.0),
            vel_y: rng.gen_range(-4.0..-1.0),
            symbol: *['*', '+', '·', '✦', '✧', '•'].choose(rng).unwrap_or(&'*'),
            color_index: rng.gen_range(0..7),
            age: 0.0,
            max_age: rng.gen_range(1.5..3.0),
        }
    }

    fn update(&mut self, dt: f64) -> bool {
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.vel_y += 9.0 * dt;
        self.age += dt;
        self.age < self.max_age
    }
}

/// Winner announcement shown after a spin until dismissed.
#[derive(Debug, Default)]
pub struct Celebration {
    pub winner: Option<String>,
    pub message: String,
    pub sparks: Vec<Spark>,
    width: f64,
    height: f64,
}

impl Celebration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.winner.is_some()
    }

    pub fn start(&mut self, name: &str, width: u16, height: u16) {
        let mut rng = rand::thread_rng();
        self.start_with_rng(name, width, height, &mut rng);
    }

    pub fn start_with_rng<R: Rng>(&mut self, name: &str, width: u16, height: u16, rng: &mut R) {
        let templates = winner_templates();
        let template = templates
            .choose(rng)
            .map(String::as_str)
            .unwrap_or(FALLBACK_TEMPLATE);

        self.winner = Some(name.to_string());
        self.message = render_message(template, name);
        self.width = width as f64;
        self.height = height as f64;

        let center_x = self.width / 2.0;
        let center_y = self.height / 2.0;
        self.sparks = (0..30)
            .map(|_| {
                Spark::new(
                    center_x + rng.gen_range(-12.0..12.0),
                    center_y + rng.gen_range(-3.0..3.0),
                    rng,
                )
            })
            .collect();
    }

    /// Advances the sparks by one animation step; the message stays until dismissed.
    pub fn update(&mut self) {
        if !self.is_active() {
            return;
        }
        let dt = 0.1;
        let (width, height) = (self.width, self.height);
        self.sparks.retain_mut(|spark| {
            let alive = spark.update(dt);
            let buffer = 2.0;
            let off_screen =
                spark.y > height + buffer || spark.x < -buffer || spark.x > width + buffer;
            alive && !off_screen
        });
    }

    pub fn dismiss(&mut self) {
        self.winner = None;
        self.message.clear();
        self.sparks.clear();
    }
}
