//! Append-only output buffer

/// Ordered text fragments, flattened once at the end of a request
#[derive(Debug, Default)]
pub struct Emitter {
    fragments: Vec<String>,
    len: usize,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.len += text.len();
        self.fragments.push(text.to_string());
    }

    /// Total bytes appended so far
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn finalize(self) -> String {
        let mut out = String::with_capacity(self.len);
        for fragment in self.fragments {
            out.push_str(&fragment);
        }
        out
    }
}
