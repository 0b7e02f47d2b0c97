//! Keyboard highlight over the suggestion list and the scroll offset that
//! keeps the highlighted entry in view.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationKey {
    ArrowDown,
    ArrowUp,
    Enter,
}

/// Layout measurements the shell takes from the rendered panel.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PanelMetrics {
    /// Height of the first rendered entry; entries are assumed uniform.
    pub entry_height: f64,
    pub viewport_height: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Nothing to select, or a key that changes nothing.
    Ignored,
    Highlighted(Option<usize>),
    Commit(usize),
}

/// Highlighted position over `len` entries. `None` means nothing is highlighted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    highlighted: Option<usize>,
    len: usize,
}

impl SelectionState {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            highlighted: None,
            len,
        }
    }

    #[must_use]
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index in the `[-1, len - 1]` form, `-1` meaning no highlight.
    #[must_use]
    pub fn as_index(&self) -> i64 {
        self.highlighted
            .and_then(|i| i64::try_from(i).ok())
            .unwrap_or(-1)
    }

    pub fn transition(&mut self, key: NavigationKey) -> Transition {
        if self.len == 0 {
            return Transition::Ignored;
        }

        match key {
            NavigationKey::ArrowDown => {
                let next = match self.highlighted {
                    None => 0,
                    Some(i) => (i + 1).min(self.len - 1),
                };
                self.highlighted = Some(next);
                Transition::Highlighted(self.highlighted)
            }
            NavigationKey::ArrowUp => {
                self.highlighted = self.highlighted.and_then(|i| i.checked_sub(1));
                Transition::Highlighted(self.highlighted)
            }
            NavigationKey::Enter => match self.highlighted.take() {
                Some(i) => Transition::Commit(i),
                None => Transition::Ignored,
            },
        }
    }
}

/// Scroll offset for the panel after the highlight moved, or `None` to leave it.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn scroll_offset(highlighted: Option<usize>, count: usize, metrics: PanelMetrics) -> Option<f64> {
    if count == 0 {
        return None;
    }

    let PanelMetrics {
        entry_height,
        viewport_height,
    } = metrics;
    let index = highlighted.map_or(-1.0, |i| i as f64);

    let entry_top = entry_height * index;
    let midpoint = entry_top + entry_height / 2.0;
    let content_height = count as f64 * entry_height;

    if midpoint < viewport_height / 2.0 {
        None
    } else if midpoint > content_height - viewport_height / 2.0 {
        Some(content_height - viewport_height)
    } else {
        Some(entry_top - viewport_height / 2.0 + entry_height / 2.0)
    }
}
