use crate::navigator::{NavigationObserver, SlideInfo};

/// Counter and previous/next button state shown around the slides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chrome {
    current: usize,
    total: usize,
    previous_enabled: bool,
    next_enabled: bool,
}

impl Chrome {
    pub fn new(info: &SlideInfo) -> Self {
        let mut chrome = Self {
            current: 0,
            total: 0,
            previous_enabled: false,
            next_enabled: false,
        };
        chrome.slide_changed(info);
        chrome
    }

    pub fn current_label(&self) -> String {
        self.current.to_string()
    }

    pub fn total_label(&self) -> String {
        self.total.to_string()
    }

    pub fn counter(&self) -> String {
        format!("{} / {}", self.current, self.total)
    }

    pub fn previous_enabled(&self) -> bool {
        self.previous_enabled
    }

    pub fn next_enabled(&self) -> bool {
        self.next_enabled
    }
}

impl NavigationObserver for Chrome {
    fn slide_changed(&mut self, info: &SlideInfo) {
        self.current = info.position;
        self.total = info.total;
        self.previous_enabled = !info.is_first;
        self.next_enabled = !info.is_last;
    }
}
