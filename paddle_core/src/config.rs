use glam::Vec3;
use serde::{Deserialize, Deserializer, Serialize};

use crate::curve::ResponseCurve;
use crate::error::ConfigError;
use crate::params::Params;

/// Paddle geometry and driver tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddleConfig {
    pub follow_gain: f32,
    pub max_speed: f32,
    pub velocity_window: usize,
    pub width: f32,
    pub height: f32,
    pub thickness: f32,
    pub hit_cooldown: f32,
}

impl Default for PaddleConfig {
    fn default() -> Self {
        Self {
            follow_gain: Params::FOLLOW_GAIN,
            max_speed: Params::MAX_PADDLE_SPEED,
            velocity_window: Params::VELOCITY_WINDOW,
            width: Params::PADDLE_WIDTH,
            height: Params::PADDLE_HEIGHT,
            thickness: Params::PADDLE_THICKNESS,
            hit_cooldown: Params::HIT_COOLDOWN,
        }
    }
}

impl PaddleConfig {
    /// Characteristic radius used for hit zones: length of the half extents
    pub fn radius(&self) -> f32 {
        Vec3::new(self.width, self.height, self.thickness).length() * 0.5
    }
}

/// Supplemental tunneling tests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    pub swept_enabled: bool,
    pub sweep_radius: f32,
    pub max_sweep_distance: f32,

    pub probes_enabled: bool,
    pub probes_along_width: u32,
    pub probes_along_height: u32,
    pub probe_distance: f32,
    pub probe_min_speed: f32,
    /// Grid origin offset in paddle-local space
    pub probe_offset: [f32; 3],
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            swept_enabled: true,
            sweep_radius: Params::SWEEP_RADIUS,
            max_sweep_distance: Params::MAX_SWEEP_DISTANCE,
            probes_enabled: true,
            probes_along_width: Params::PROBES_ALONG_WIDTH,
            probes_along_height: Params::PROBES_ALONG_HEIGHT,
            probe_distance: Params::PROBE_DISTANCE,
            probe_min_speed: Params::PROBE_MIN_SPEED,
            probe_offset: [0.0; 3],
        }
    }
}

/// Response direction used for native (host-reported) paddle hits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeDirection {
    /// Reflect the ball's incoming direction about the paddle face normal
    #[default]
    Reflect,
    /// Blend the contact normal toward the paddle's velocity direction
    Blend,
}

/// Impulse model parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpulseProfile {
    pub base_impulse: f32,
    pub max_impulse: f32,
    pub reference_speed: f32,
    pub curve: ResponseCurve,
    pub sweet_spot_multiplier: f32,
    pub edge_multiplier: f32,
    pub default_multiplier: f32,
    pub direction_blend: f32,
    pub spin_gain: f32,
    pub native_direction: NativeDirection,
}

impl Default for ImpulseProfile {
    fn default() -> Self {
        Self {
            base_impulse: Params::BASE_IMPULSE,
            max_impulse: Params::MAX_IMPULSE,
            reference_speed: Params::REFERENCE_SPEED,
            curve: ResponseCurve::default(),
            sweet_spot_multiplier: Params::SWEET_SPOT_MULTIPLIER,
            edge_multiplier: Params::EDGE_MULTIPLIER,
            default_multiplier: 1.0,
            direction_blend: Params::DIRECTION_BLEND,
            spin_gain: Params::SPIN_GAIN,
            native_direction: NativeDirection::default(),
        }
    }
}

impl ImpulseProfile {
    /// Weak profile used for tunneling-guard nudges
    pub fn correction() -> Self {
        Self {
            base_impulse: Params::CORRECTION_BASE_IMPULSE,
            max_impulse: Params::CORRECTION_MAX_IMPULSE,
            spin_gain: 0.0,
            native_direction: NativeDirection::Blend,
            ..Self::default()
        }
    }

    fn validate(&self, prefix: &str) -> Result<(), ConfigError> {
        let field = |name: &str| format!("{prefix}.{name}");
        require_finite(&[
            (field("base_impulse").as_str(), self.base_impulse),
            (field("max_impulse").as_str(), self.max_impulse),
            (field("reference_speed").as_str(), self.reference_speed),
            (field("sweet_spot_multiplier").as_str(), self.sweet_spot_multiplier),
            (field("edge_multiplier").as_str(), self.edge_multiplier),
            (field("default_multiplier").as_str(), self.default_multiplier),
            (field("direction_blend").as_str(), self.direction_blend),
            (field("spin_gain").as_str(), self.spin_gain),
        ])?;
        if let ResponseCurve::Constant(v) = &self.curve {
            require_finite(&[(field("curve").as_str(), *v)])?;
        }
        if let ResponseCurve::Keyframes(keys) = &self.curve {
            if keys.iter().flatten().any(|v| !v.is_finite()) {
                return Err(ConfigError::invalid(field("curve").as_str(), "keys must be finite"));
            }
        }
        if self.base_impulse < 0.0 {
            return Err(ConfigError::invalid(field("base_impulse").as_str(), "must be >= 0"));
        }
        if self.max_impulse < self.base_impulse {
            return Err(ConfigError::invalid(
                &field("max_impulse"),
                "must be >= base_impulse",
            ));
        }
        if self.reference_speed <= 0.0 {
            return Err(ConfigError::invalid(field("reference_speed").as_str(), "must be > 0"));
        }
        if !self.curve.is_monotonic() {
            return Err(ConfigError::invalid(field("curve").as_str(), "keys must not decrease"));
        }
        if self.sweet_spot_multiplier < self.default_multiplier
            || self.edge_multiplier > self.default_multiplier
        {
            return Err(ConfigError::invalid(
                &field("sweet_spot_multiplier"),
                "zones must satisfy sweet >= default >= edge",
            ));
        }
        if !(0.0..=1.0).contains(&self.direction_blend) {
            return Err(ConfigError::invalid(field("direction_blend").as_str(), "must be in [0, 1]"));
        }
        Ok(())
    }
}

/// Fields set in a TOML profile table; the rest come from a base profile
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProfileOverrides {
    base_impulse: Option<f32>,
    max_impulse: Option<f32>,
    reference_speed: Option<f32>,
    curve: Option<ResponseCurve>,
    sweet_spot_multiplier: Option<f32>,
    edge_multiplier: Option<f32>,
    default_multiplier: Option<f32>,
    direction_blend: Option<f32>,
    spin_gain: Option<f32>,
    native_direction: Option<NativeDirection>,
}

impl ProfileOverrides {
    fn apply(self, base: ImpulseProfile) -> ImpulseProfile {
        ImpulseProfile {
            base_impulse: self.base_impulse.unwrap_or(base.base_impulse),
            max_impulse: self.max_impulse.unwrap_or(base.max_impulse),
            reference_speed: self.reference_speed.unwrap_or(base.reference_speed),
            curve: self.curve.unwrap_or(base.curve),
            sweet_spot_multiplier: self
                .sweet_spot_multiplier
                .unwrap_or(base.sweet_spot_multiplier),
            edge_multiplier: self.edge_multiplier.unwrap_or(base.edge_multiplier),
            default_multiplier: self.default_multiplier.unwrap_or(base.default_multiplier),
            direction_blend: self.direction_blend.unwrap_or(base.direction_blend),
            spin_gain: self.spin_gain.unwrap_or(base.spin_gain),
            native_direction: self.native_direction.unwrap_or(base.native_direction),
        }
    }
}

/// A partial `[correction]` table fills its gaps from the weak correction profile
fn correction_profile<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ImpulseProfile, D::Error> {
    Ok(ProfileOverrides::deserialize(deserializer)?.apply(ImpulseProfile::correction()))
}

/// Default ball body and response coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallConfig {
    pub radius: f32,
    pub mass: f32,
    pub linear_drag: f32,
    pub quadratic_drag: f32,
    pub angular_drag: f32,
    pub max_speed: f32,
    pub max_angular_speed: f32,
    pub bounce_energy_loss: f32,
    pub min_bounce_velocity: f32,
    pub surface_friction: f32,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: Params::BALL_RADIUS,
            mass: Params::BALL_MASS,
            linear_drag: Params::BALL_LINEAR_DRAG,
            quadratic_drag: Params::BALL_QUADRATIC_DRAG,
            angular_drag: Params::BALL_ANGULAR_DRAG,
            max_speed: Params::BALL_MAX_SPEED,
            max_angular_speed: Params::BALL_MAX_ANGULAR_SPEED,
            bounce_energy_loss: Params::BOUNCE_ENERGY_LOSS,
            min_bounce_velocity: Params::MIN_BOUNCE_VELOCITY,
            surface_friction: Params::SURFACE_FRICTION,
        }
    }
}

/// Training ball feeder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    pub enabled: bool,
    pub position: [f32; 3],
    pub targets: Vec<[f32; 3]>,
    pub min_speed: f32,
    pub max_speed: f32,
    pub min_z_offset: f32,
    pub max_z_offset: f32,
    pub interval: f32,
    pub ball_lifetime: f32,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            position: [0.0, 1.0, 2.5],
            targets: Vec::new(),
            min_speed: Params::LAUNCH_MIN_SPEED,
            max_speed: Params::LAUNCH_MAX_SPEED,
            min_z_offset: Params::LAUNCH_MIN_Z_OFFSET,
            max_z_offset: Params::LAUNCH_MAX_Z_OFFSET,
            interval: Params::LAUNCH_INTERVAL,
            ball_lifetime: Params::BALL_LIFETIME,
        }
    }
}

/// Full core configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paddle: PaddleConfig,
    pub guard: GuardConfig,
    /// Full response for native hits
    pub impulse: ImpulseProfile,
    /// Weak response for tunneling-guard corrections
    #[serde(deserialize_with = "correction_profile")]
    pub correction: ImpulseProfile,
    pub ball: BallConfig,
    pub launcher: LauncherConfig,
    pub max_dt: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paddle: PaddleConfig::default(),
            guard: GuardConfig::default(),
            impulse: ImpulseProfile::default(),
            correction: ImpulseProfile::correction(),
            ball: BallConfig::default(),
            launcher: LauncherConfig::default(),
            max_dt: Params::MAX_DT,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.check_finite()?;

        let p = &self.paddle;
        if p.width <= 0.0 || p.height <= 0.0 || p.thickness < 0.0 {
            return Err(ConfigError::invalid("paddle.width", "paddle extents must be positive"));
        }
        if p.max_speed <= 0.0 {
            return Err(ConfigError::invalid("paddle.max_speed", "must be > 0"));
        }
        if p.follow_gain < 0.0 {
            return Err(ConfigError::invalid("paddle.follow_gain", "must be >= 0"));
        }
        if p.velocity_window == 0 {
            return Err(ConfigError::invalid("paddle.velocity_window", "must be >= 1"));
        }
        if p.hit_cooldown < 0.0 {
            return Err(ConfigError::invalid("paddle.hit_cooldown", "must be >= 0"));
        }

        let g = &self.guard;
        if g.sweep_radius < 0.0 || g.max_sweep_distance < 0.0 {
            return Err(ConfigError::invalid("guard.sweep_radius", "sweep sizes must be >= 0"));
        }
        if g.probes_along_width == 0 || g.probes_along_height == 0 {
            return Err(ConfigError::invalid("guard.probes_along_width", "grid needs at least one probe per axis"));
        }
        if g.probe_distance < 0.0 {
            return Err(ConfigError::invalid("guard.probe_distance", "must be >= 0"));
        }

        self.impulse.validate("impulse")?;
        self.correction.validate("correction")?;

        let b = &self.ball;
        if b.mass <= 0.0 {
            return Err(ConfigError::invalid("ball.mass", "must be > 0"));
        }
        if b.radius <= 0.0 {
            return Err(ConfigError::invalid("ball.radius", "must be > 0"));
        }
        if b.max_speed <= 0.0 || b.max_angular_speed <= 0.0 {
            return Err(ConfigError::invalid("ball.max_speed", "speed limits must be > 0"));
        }
        if !(0.0..=1.0).contains(&b.bounce_energy_loss) {
            return Err(ConfigError::invalid("ball.bounce_energy_loss", "must be in [0, 1]"));
        }
        if b.linear_drag < 0.0 || b.quadratic_drag < 0.0 || b.angular_drag < 0.0 {
            return Err(ConfigError::invalid("ball.linear_drag", "drag must be >= 0"));
        }

        let l = &self.launcher;
        if l.min_speed > l.max_speed {
            return Err(ConfigError::invalid("launcher.min_speed", "must be <= max_speed"));
        }
        if l.min_z_offset > l.max_z_offset {
            return Err(ConfigError::invalid("launcher.min_z_offset", "must be <= max_z_offset"));
        }
        if l.enabled && l.interval <= 0.0 {
            return Err(ConfigError::invalid("launcher.interval", "must be > 0"));
        }
        if l.max_speed > b.max_speed {
            return Err(ConfigError::invalid("launcher.max_speed", "must be <= ball.max_speed"));
        }

        if self.max_dt <= 0.0 {
            return Err(ConfigError::invalid("max_dt", "must be > 0"));
        }
        Ok(())
    }

    fn check_finite(&self) -> Result<(), ConfigError> {
        let (p, g, b, l) = (&self.paddle, &self.guard, &self.ball, &self.launcher);
        require_finite(&[
            ("paddle.follow_gain", p.follow_gain),
            ("paddle.max_speed", p.max_speed),
            ("paddle.width", p.width),
            ("paddle.height", p.height),
            ("paddle.thickness", p.thickness),
            ("paddle.hit_cooldown", p.hit_cooldown),
            ("guard.sweep_radius", g.sweep_radius),
            ("guard.max_sweep_distance", g.max_sweep_distance),
            ("guard.probe_distance", g.probe_distance),
            ("guard.probe_min_speed", g.probe_min_speed),
            ("ball.radius", b.radius),
            ("ball.mass", b.mass),
            ("ball.linear_drag", b.linear_drag),
            ("ball.quadratic_drag", b.quadratic_drag),
            ("ball.angular_drag", b.angular_drag),
            ("ball.max_speed", b.max_speed),
            ("ball.max_angular_speed", b.max_angular_speed),
            ("ball.bounce_energy_loss", b.bounce_energy_loss),
            ("ball.min_bounce_velocity", b.min_bounce_velocity),
            ("ball.surface_friction", b.surface_friction),
            ("launcher.min_speed", l.min_speed),
            ("launcher.max_speed", l.max_speed),
            ("launcher.min_z_offset", l.min_z_offset),
            ("launcher.max_z_offset", l.max_z_offset),
            ("launcher.interval", l.interval),
            ("launcher.ball_lifetime", l.ball_lifetime),
            ("max_dt", self.max_dt),
        ])?;
        if g.probe_offset.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::invalid("guard.probe_offset", "must be finite"));
        }
        let points = std::iter::once(&l.position).chain(&l.targets);
        if points.flatten().any(|v| !v.is_finite()) {
            return Err(ConfigError::invalid("launcher.targets", "positions must be finite"));
        }
        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

/// NaN and infinities slip through ordered comparisons, so reject them up front
fn require_finite(fields: &[(&str, f32)]) -> Result<(), ConfigError> {
    match fields.iter().find(|(_, value)| !value.is_finite()) {
        Some((field, _)) => Err(ConfigError::invalid(field, "must be finite")),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::new().validate().is_ok());
    }

    #[test]
    fn test_paddle_radius_from_extents() {
        let paddle = PaddleConfig {
            width: 0.6,
            height: 0.8,
            thickness: 0.0,
            ..PaddleConfig::default()
        };
        assert!((paddle.radius() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_correction_profile_is_weaker() {
        let config = Config::new();
        assert!(config.correction.max_impulse < config.impulse.base_impulse);
        assert_eq!(config.correction.spin_gain, 0.0);
    }

    #[test]
    fn test_max_below_base_rejected() {
        let mut config = Config::new();
        config.impulse.max_impulse = 1.0;
        match config.validate() {
            Err(ConfigError::InvalidValue { field, .. }) => {
                assert_eq!(field, "impulse.max_impulse")
            }
            other => panic!("Expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_zone_order_enforced() {
        let mut config = Config::new();
        config.impulse.edge_multiplier = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_partial_override() {
        let config = Config::from_toml_str(
            r#"
            max_dt = 0.05

            [paddle]
            max_speed = 12.0

            [guard]
            probes_enabled = false

            [impulse]
            native_direction = "blend"
            curve = { kind = "constant", value = 1.0 }
            "#,
        )
        .expect("TOML should parse");

        assert_eq!(config.max_dt, 0.05);
        assert_eq!(config.paddle.max_speed, 12.0);
        assert_eq!(config.paddle.width, Params::PADDLE_WIDTH);
        assert!(!config.guard.probes_enabled);
        assert!(config.guard.swept_enabled);
        assert_eq!(config.impulse.native_direction, NativeDirection::Blend);
        assert_eq!(config.impulse.curve, ResponseCurve::Constant(1.0));
    }

    #[test]
    fn test_toml_invalid_value_rejected() {
        let result = Config::from_toml_str("[ball]\nmass = 0.0\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_toml_syntax_error() {
        let result = Config::from_toml_str("[paddle\nmax_speed = 1");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_partial_correction_keeps_weak_defaults() {
        let config = Config::from_toml_str("[correction]\nbase_impulse = 0.3\n")
            .expect("Partial correction table should parse");

        assert_eq!(config.correction.base_impulse, 0.3);
        assert_eq!(config.correction.max_impulse, Params::CORRECTION_MAX_IMPULSE);
        assert_eq!(config.correction.spin_gain, 0.0);
        assert_eq!(config.correction.native_direction, NativeDirection::Blend);
        assert_eq!(config.impulse, ImpulseProfile::default());
    }

    #[test]
    fn test_partial_impulse_keeps_native_defaults() {
        let config = Config::from_toml_str("[impulse]\nspin_gain = 2.0\n").expect("TOML should parse");
        assert_eq!(config.impulse.max_impulse, Params::MAX_IMPULSE);
        assert_eq!(config.impulse.spin_gain, 2.0);
        assert_eq!(config.correction, ImpulseProfile::correction());
    }

    #[test]
    fn test_launcher_faster_than_ball_cap_rejected() {
        let mut config = Config::new();
        config.launcher.min_speed = 40.0;
        config.launcher.max_speed = 50.0;
        match config.validate() {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "launcher.max_speed"),
            other => panic!("Expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_values_rejected() {
        for doc in [
            "[ball]\nmax_speed = nan\n",
            "[paddle]\nmax_speed = inf\n",
            "max_dt = nan\n",
            "[launcher]\nmin_z_offset = -inf\n",
            "[correction]\nmax_impulse = nan\n",
        ] {
            let result = Config::from_toml_str(doc);
            assert!(
                matches!(result, Err(ConfigError::InvalidValue { ref message, .. }) if message == "must be finite"),
                "{doc:?} gave {result:?}"
            );
        }
    }
}
