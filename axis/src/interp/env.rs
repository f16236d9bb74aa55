//! Call frames and the frame stack
//!
//! Each function call gets its own [`Environment`] pushed on the
//! [`CallStack`]. Lookups only ever consult the topmost frame: a callee sees
//! its parameters and whatever it assigns, never its caller's bindings.

use super::Value;
use std::collections::HashMap;

/// Variable bindings of a single call frame
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            bindings: HashMap::new(),
        }
    }

    /// Bind (or rebind) a name in this frame
    pub fn define(&mut self, name: String, value: Value) {
        self.bindings.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Get all bindings (for debugging)
    pub fn bindings(&self) -> &HashMap<String, Value> {
        &self.bindings
    }
}

/// Stack of call frames, index 0 is the top-level program frame
#[derive(Debug)]
pub struct CallStack {
    frames: Vec<Environment>,
}

impl CallStack {
    /// Create a stack holding only the top-level frame
    pub fn new() -> Self {
        CallStack {
            frames: vec![Environment::new()],
        }
    }

    /// Push a frame for a call; returns the new depth
    pub fn push_frame(&mut self, frame: Environment) -> usize {
        self.frames.push(frame);
        self.frames.len()
    }

    /// Pop the current call frame
    /// Panics if trying to pop the top-level frame
    pub fn pop_frame(&mut self) -> Environment {
        if self.frames.len() <= 1 {
            panic!("Cannot pop the top-level frame");
        }
        self.frames.pop().unwrap_or_default()
    }

    /// Number of live frames, including the top-level one
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Frame currently executing
    pub fn current(&self) -> &Environment {
        // frames is never empty: new() seeds it and pop_frame() keeps index 0
        &self.frames[self.frames.len() - 1]
    }

    pub fn current_mut(&mut self) -> &mut Environment {
        let top = self.frames.len() - 1;
        &mut self.frames[top]
    }

    /// Bind a name in the current frame
    pub fn define(&mut self, name: String, value: Value) {
        self.current_mut().define(name, value);
    }

    /// Look a name up in the current frame only
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.current().get(name)
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new()
    }
}
