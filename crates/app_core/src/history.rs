//! Browser history boundary

/// Append/replace-only log of URLs
///
/// Back and forward are not driven through this trait: the browser moves
/// its cursor and reports the new URL as a pop-state event.
pub trait History {
    /// URL of the current entry
    fn current_url(&self) -> String;

    /// Add an entry after the current one, dropping any forward entries
    fn push(&mut self, url: &str);

    /// Overwrite the current entry
    fn replace(&mut self, url: &str);
}

/// In-memory history with browser semantics
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<String>,
    cursor: usize,
    pushes: usize,
    replaces: usize,
}

impl MemoryHistory {
    /// History resumed at an arbitrary entry, as after a bookmark or reload
    pub fn new(initial_url: &str) -> Self {
        Self {
            entries: vec![initial_url.to_string()],
            cursor: 0,
            pushes: 0,
            replaces: 0,
        }
    }

    /// Move one entry back; returns the URL to report as pop-state
    pub fn back(&mut self) -> Option<String> {
        self.go(-1)
    }

    /// Move one entry forward; returns the URL to report as pop-state
    pub fn forward(&mut self) -> Option<String> {
        self.go(1)
    }

    /// Move by `delta` entries, if the target exists
    pub fn go(&mut self, delta: isize) -> Option<String> {
        let target = self.cursor.checked_add_signed(delta)?;
        if target >= self.entries.len() {
            return None;
        }
        self.cursor = target;
        Some(self.entries[target].clone())
    }

    /// Number of entries up to and including the current one
    pub fn depth(&self) -> usize {
        self.cursor + 1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn push_count(&self) -> usize {
        self.pushes
    }

    pub fn replace_count(&self) -> usize {
        self.replaces
    }

    /// Pushes plus replaces
    pub fn write_count(&self) -> usize {
        self.pushes + self.replaces
    }
}

impl History for MemoryHistory {
    fn current_url(&self) -> String {
        self.entries[self.cursor].clone()
    }

    fn push(&mut self, url: &str) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(url.to_string());
        self.cursor += 1;
        self.pushes += 1;
    }

    fn replace(&mut self, url: &str) {
        self.entries[self.cursor] = url.to_string();
        self.replaces += 1;
    }
}
