use thiserror::Error;

/// Setup-time failures. Nothing in the per-tick path returns these.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{role} entity {entity:?} has no RigidBody component")]
    MissingRigidBody { entity: hecs::Entity, role: BodyRole },

    #[error("Entity {0:?} does not exist")]
    NoSuchEntity(hecs::Entity),
}

/// Which part of the rig a setup check was validating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyRole {
    Paddle,
    Ball,
}

impl std::fmt::Display for BodyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BodyRole::Paddle => write!(f, "Paddle"),
            BodyRole::Ball => write!(f, "Ball"),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
