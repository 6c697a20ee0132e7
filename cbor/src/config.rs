/// Limits applied to untrusted input by a [`Decoder`](crate::decode::Decoder).
///
/// `max_length` bounds the length any single byte/text string, array or map
/// header may declare (maps count pairs). `max_depth` bounds how deeply
/// [`Decoder::skip`](crate::decode::Decoder::skip) will recurse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    pub max_length: usize,
    pub max_depth: usize,
}

impl Config {
    pub const DEFAULT_MAX_LENGTH: usize = 5 * 1024 * 1024;
    pub const DEFAULT_MAX_DEPTH: usize = 16;

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_length: Self::DEFAULT_MAX_LENGTH,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}
