#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

/// Holds the latest user-facing outcome. Each write overwrites it; nothing accumulates.
#[derive(Debug, Clone, Default)]
pub struct StatusNotifier {
    current: Option<StatusMessage>,
}

impl StatusNotifier {
    pub fn success(&mut self, text: impl Into<String>) {
        self.set(StatusLevel::Success, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.set(StatusLevel::Error, text);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&StatusMessage> {
        self.current.as_ref()
    }

    fn set(&mut self, level: StatusLevel, text: impl Into<String>) {
        self.current = Some(StatusMessage {
            level,
            text: text.into(),
        });
    }
}
