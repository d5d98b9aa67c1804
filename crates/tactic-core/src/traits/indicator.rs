//! Streaming indicator trait definition.

/// Incrementally updated technical indicator.
///
/// Streaming indicators absorb one input per bar and expose the current
/// derived value, matching the one-bar-at-a-time evaluation model of the
/// policies. Each policy instance owns one indicator set per instrument.
pub trait StreamingIndicator: Send {
    /// The input type consumed per bar.
    type Input;
    /// The output type of the indicator.
    type Output;

    /// Update the indicator with a new input.
    ///
    /// # Returns
    /// The current indicator value, or None while warming up.
    fn update(&mut self, input: Self::Input) -> Option<Self::Output>;

    /// Get the current value without adding new data.
    fn current(&self) -> Option<Self::Output>;

    /// Check if the indicator has absorbed enough data to produce values.
    fn is_ready(&self) -> bool;

    /// Minimum number of inputs required before values are produced.
    fn period(&self) -> usize;

    /// Reset the indicator state.
    fn reset(&mut self);

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}
