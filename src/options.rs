//
// Copyright (c) Pirmin Kalberer. All rights reserved.
//

/// Bounds applied by the WKT and WKB readers to untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Deepest allowed nesting of geometry collections. The outermost
    /// geometry is level 1.
    pub max_depth: usize,
}

impl Limits {
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}
