/// Tuning parameters for the paddle/ball contact core
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Paddle driver
    pub const FOLLOW_GAIN: f32 = 20.0; // 1/s, exponential follow rate toward the hand
    pub const MAX_PADDLE_SPEED: f32 = 8.0; // m/s
    pub const VELOCITY_WINDOW: usize = 5; // samples in the smoothing ring

    // Paddle face (local X = width, local Y = height, local Z = face normal)
    pub const PADDLE_WIDTH: f32 = 0.15;
    pub const PADDLE_HEIGHT: f32 = 0.15;
    pub const PADDLE_THICKNESS: f32 = 0.01;

    // Tunneling guard
    pub const SWEEP_RADIUS: f32 = 0.1;
    pub const MAX_SWEEP_DISTANCE: f32 = 1.0; // longer moves are teleports
    pub const PROBES_ALONG_WIDTH: u32 = 5;
    pub const PROBES_ALONG_HEIGHT: u32 = 5;
    pub const PROBE_DISTANCE: f32 = 0.1;
    pub const PROBE_MIN_SPEED: f32 = 1.0;

    // Full native hit response
    pub const BASE_IMPULSE: f32 = 4.0;
    pub const MAX_IMPULSE: f32 = 12.0;
    pub const REFERENCE_SPEED: f32 = 5.0;
    pub const SWEET_SPOT_MULTIPLIER: f32 = 1.2;
    pub const EDGE_MULTIPLIER: f32 = 0.7;
    pub const DIRECTION_BLEND: f32 = 0.3;
    pub const SPIN_GAIN: f32 = 5.0;
    pub const HIT_COOLDOWN: f32 = 0.1; // seconds

    // Guard correction nudge
    pub const CORRECTION_BASE_IMPULSE: f32 = 0.5;
    pub const CORRECTION_MAX_IMPULSE: f32 = 2.0;

    // Hit zones, as a fraction of the paddle radius
    pub const SWEET_SPOT_FRACTION: f32 = 0.3;
    pub const EDGE_FRACTION: f32 = 0.7;

    // Ball (regulation 40 mm, 2.7 g)
    pub const BALL_RADIUS: f32 = 0.02;
    pub const BALL_MASS: f32 = 0.0027;
    pub const BALL_LINEAR_DRAG: f32 = 0.1;
    pub const BALL_QUADRATIC_DRAG: f32 = 0.0005;
    pub const BALL_ANGULAR_DRAG: f32 = 0.05;
    pub const BALL_MAX_SPEED: f32 = 30.0;
    pub const BALL_MAX_ANGULAR_SPEED: f32 = 1000.0;
    pub const BOUNCE_ENERGY_LOSS: f32 = 0.05;
    pub const MIN_BOUNCE_VELOCITY: f32 = 0.1;
    pub const SURFACE_FRICTION: f32 = 0.5;
    pub const BALL_BOUNCINESS: f32 = 0.9; // host material restitution
    pub const STATIC_FRICTION_RATIO: f32 = 1.5;

    // Ball launcher
    pub const LAUNCH_MIN_SPEED: f32 = 5.0;
    pub const LAUNCH_MAX_SPEED: f32 = 15.0;
    pub const LAUNCH_MIN_Z_OFFSET: f32 = -1.0;
    pub const LAUNCH_MAX_Z_OFFSET: f32 = 1.0;
    pub const LAUNCH_INTERVAL: f32 = 3.0;
    pub const BALL_LIFETIME: f32 = 10.0;

    // Physics
    pub const FIXED_DT: f32 = 1.0 / 72.0; // Quest-class headset refresh
    pub const MAX_DT: f32 = 0.1; // Clamp to prevent large jumps
    pub const GRAVITY: f32 = -9.81;
}
