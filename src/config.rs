//! Configuration for the render driver

/// Default number of rescans per expansion phase
pub const DEFAULT_PASS_CAP: usize = 10;

/// Default ceiling on nested render frames
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Limits applied while rendering
///
/// Both limits degrade output instead of failing: loops or conditionals still
/// present after `pass_cap` rescans stay in the output verbatim, and a frame
/// nested deeper than `max_depth` is returned unrendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Rescans allowed for the loop phase and for the conditional phase
    pub pass_cap: usize,

    /// Maximum nesting of loop bodies, winning branches and includes
    pub max_depth: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            pass_cap: DEFAULT_PASS_CAP,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl RenderConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pass cap
    pub fn with_pass_cap(mut self, pass_cap: usize) -> Self {
        self.pass_cap = pass_cap;
        self
    }

    /// Set the recursion ceiling
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
