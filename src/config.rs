// config.rs: tuning constants and runtime codec configuration.
//
// Format-contract constants (MIN_MATCH, MAX_OFFSET, ...) live in
// `block::types`; they must never change without breaking compatibility.
// The values here only affect speed and ratio, never decodability.

// Largest hash-table log: 4096 slots of u32 (16 KiB).
// Corresponds to LZ4_MEMORY_USAGE = 14 in the reference encoder.
pub const HASH_LOG_MAX: u32 = 12;

// Smallest hash-table log: 16 slots.  Tiny inputs get a tiny table so that
// resetting it costs less than compressing.
pub const HASH_LOG_MIN: u32 = 4;

// Every 2^SKIP_TRIGGER consecutive misses the match finder widens its probe
// step by one (times the acceleration).  Higher means slower to give up on
// incompressible regions.
pub const SKIP_TRIGGER: u32 = 6;

// Default acceleration: probe every position until misses accumulate.
pub const ACCELERATION_DEFAULT: u32 = 1;

// Acceleration values above this are clamped.
pub const ACCELERATION_MAX: u32 = 65_537;

// Largest input a single block may describe (2 113 929 216 bytes).
pub const MAX_INPUT_SIZE: usize = 0x7E00_0000;

/// Which engine a codec should run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnginePreference {
    /// Whatever the process-wide selector resolved.
    #[default]
    Auto,
    /// Always the portable software engine.
    Software,
    /// The native engine when available, otherwise software.
    Native,
}

/// Runtime codec settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Probe-step multiplier, `1..=ACCELERATION_MAX`.
    pub acceleration: u32,
    /// Engine choice.
    pub engine: EnginePreference,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            acceleration: ACCELERATION_DEFAULT,
            engine: EnginePreference::Auto,
        }
    }
}

impl CodecConfig {
    /// Start building a configuration from the defaults.
    #[must_use]
    pub fn builder() -> CodecConfigBuilder {
        CodecConfigBuilder::default()
    }
}

/// Builder for [`CodecConfig`].
#[derive(Debug, Clone, Default)]
pub struct CodecConfigBuilder {
    config: CodecConfig,
}

impl CodecConfigBuilder {
    /// Set the acceleration factor; out-of-range values are clamped to
    /// `ACCELERATION_DEFAULT..=ACCELERATION_MAX`.
    #[must_use]
    pub fn acceleration(mut self, acceleration: u32) -> Self {
        self.config.acceleration = clamp_acceleration(acceleration);
        self
    }

    /// Set the engine preference.
    #[must_use]
    pub fn engine(mut self, engine: EnginePreference) -> Self {
        self.config.engine = engine;
        self
    }

    /// Finish the configuration.
    #[must_use]
    pub fn build(self) -> CodecConfig {
        self.config
    }
}

/// Clamp an acceleration factor into its legal range.
#[inline]
pub fn clamp_acceleration(acceleration: u32) -> u32 {
    acceleration.clamp(ACCELERATION_DEFAULT, ACCELERATION_MAX)
}
