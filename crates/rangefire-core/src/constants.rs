//! Simulation constants and tuning parameters.

use crate::types::Color;

/// Simulation tick rate (Hz). One tick per rendered frame.
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Target field ---

/// Number of targets placed around the circle.
pub const TARGET_COUNT: u32 = 10;

/// Radius of the target circle (scene units).
pub const TARGET_LAYOUT_RADIUS: f32 = 2.0;

/// Height of every target above the floor.
pub const TARGET_HEIGHT: f32 = 1.5;

/// Forward offset of the circle center along +z.
pub const TARGET_Z_OFFSET: f32 = 5.0;

/// Edge length of a target box.
pub const TARGET_SIZE: f32 = 0.5;

/// Target diffuse color (yellow).
pub const TARGET_DIFFUSE: Color = Color::rgb(1.0, 1.0, 0.0);

/// Target emissive color.
pub const TARGET_EMISSIVE: Color = Color::rgb(0.5, 0.5, 0.0);

// --- Projectiles ---

/// Distance travelled per tick.
pub const PROJECTILE_SPEED: f32 = 0.5;

/// Characteristic radius of a projectile for the distance collision test.
pub const PROJECTILE_RADIUS: f32 = 0.1;

/// Projectiles further than this from the origin are disposed.
pub const PROJECTILE_MAX_RANGE: f32 = 50.0;

// --- Effects ---

/// Lifetime of an explosion effect.
pub const EXPLOSION_TTL_MS: u32 = 2000;

/// Portion of the explosion lifetime spent ramping up.
pub const EXPLOSION_RAMP_MS: u32 = 100;

/// Lifetime of the flash sphere that accompanies an explosion.
pub const FLASH_TTL_MS: u32 = 500;

/// Flash sphere scale at spawn.
pub const FLASH_SCALE_START: f32 = 0.1;

/// Flash sphere scale when fully grown.
pub const FLASH_SCALE_END: f32 = 2.0;

/// Flash sphere emissive color.
pub const FLASH_COLOR: Color = Color::rgb(1.0, 1.0, 0.8);

/// Delay between a hit and the struck target's removal.
pub const TARGET_REMOVAL_DELAY_MS: u32 = 100;

/// Upper bound accepted for the target removal delay.
pub const TARGET_REMOVAL_DELAY_MAX_MS: u32 = 1000;

/// Particles emitted by one explosion burst.
pub const EXPLOSION_PARTICLE_COUNT: u32 = 200;

/// Particle color at birth (lower bound).
pub const PARTICLE_COLOR_1: Color = Color::rgba(1.0, 0.5, 0.0, 1.0);

/// Particle color at birth (upper bound).
pub const PARTICLE_COLOR_2: Color = Color::rgba(1.0, 1.0, 0.2, 1.0);

/// Particle color at death.
pub const PARTICLE_COLOR_DEAD: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

pub const PARTICLE_MIN_SIZE: f32 = 0.2;
pub const PARTICLE_MAX_SIZE: f32 = 0.4;

pub const PARTICLE_MIN_LIFETIME_SECS: f32 = 0.05;
pub const PARTICLE_MAX_LIFETIME_SECS: f32 = 0.2;

pub const PARTICLE_MIN_EMIT_POWER: f32 = 3.0;
pub const PARTICLE_MAX_EMIT_POWER: f32 = 6.0;

/// Particle direction box corners; each particle picks a direction inside.
pub const PARTICLE_DIRECTION_1: [f32; 3] = [-5.0, 1.0, -5.0];
pub const PARTICLE_DIRECTION_2: [f32; 3] = [5.0, -1.0, 5.0];

/// Maximum particle spin (rad/s).
pub const PARTICLE_MAX_ANGULAR_SPEED: f32 = std::f32::consts::PI;

/// Camera shake triggered by an explosion.
pub const CAMERA_SHAKE_INTENSITY: f32 = 0.05;
pub const CAMERA_SHAKE_DURATION_MS: u32 = 200;

// --- Audio ---

/// Explosion sound volume (0..1).
pub const SOUND_VOLUME: f32 = 0.5;

/// Distance beyond which the spatial explosion sound is inaudible.
pub const SOUND_MAX_DISTANCE: f32 = 15.0;

// --- Camera ---

/// Camera position before the XR session reports a pose.
pub const CAMERA_START_POSITION: [f32; 3] = [0.0, 1.0, -5.0];

// --- Portal ---

/// Offset from the portal anchor to the virtual scene root.
pub const PORTAL_SCENE_OFFSET: [f32; 3] = [29.0, -1.0, -11.0];

/// Rise of the occluder root above the anchor before it is tilted.
pub const PORTAL_OCCLUDER_RISE: f32 = 3.0;

/// Local-z push of the occluder root after it is tilted.
pub const PORTAL_OCCLUDER_PUSH: f32 = -2.0;

/// Offset from the portal anchor to the pillar frame root.
pub const PORTAL_PILLAR_OFFSET: [f32; 3] = [-0.5, 1.0, 0.05];

/// Edge length of the square occluder panels.
pub const PORTAL_PANEL_SIZE: f32 = 7.0;

/// Neon color of the portal frame and the hit-test marker.
pub const PORTAL_NEON: Color = Color::rgb(0.35, 0.96, 0.88);

/// Particle snippet attached to the lintel pillar.
pub const PORTAL_LINTEL_SNIPPET: &str = "UY098C#488";

/// Particle snippet attached to the side pillars.
pub const PORTAL_SIDE_SNIPPET: &str = "UY098C#489";

// --- Overlay ---

pub const MESSAGE_AR_UNSUPPORTED: &str = "AR is not available in your system. Please make sure you use a supported device such as a Meta Quest 3 or a modern Android device and a supported browser like Chrome.\n \n Make sure you have Google AR services installed and that you enabled the WebXR incubation flag under chrome://flags";

pub const MESSAGE_SHOOTER_INTRO: &str = "WebXR Demo: Target Range.\n \n Please enter AR with the button on the lower right corner to start. Once in AR, tap anywhere on the screen to fire at the ring of boxes in front of you.";

pub const MESSAGE_PORTAL_INTRO: &str = "WebXR Demo: AR Portal.\n \n Please enter AR with the button on the lower right corner to start. Once in AR, look at the floor for a few seconds (and move a little): the hit-testing ring will appear. Then click anywhere on the screen...";

// --- Asset sources ---

/// Projectile template sources, tried in order.
pub const DEFAULT_TEMPLATE_SOURCES: [&str; 2] = ["assets/bullet.glb", "assets/bullet_low.glb"];

/// Explosion sound sources, tried in order.
pub const DEFAULT_SOUND_SOURCES: [&str; 3] = [
    "assets/explosion.mp3",
    "https://www.soundjay.com/misc/sounds/explosion_x.wav",
    "https://opengameart.org/sites/default/files/explosion.wav",
];

/// Convert a millisecond duration to whole ticks, rounding up.
pub const fn ms_to_ticks(ms: u32) -> u64 {
    (ms as u64 * TICK_RATE as u64).div_ceil(1000)
}
