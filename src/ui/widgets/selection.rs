//! Single-selection list model
//!
//! Holds an ordered list of records and exactly one selected position while
//! non-empty. Rendering is a projection of this model (see `picker.rs`); the
//! model never asks the presentation layer what is selected.

use std::fmt;

use thiserror::Error;

use crate::items::Listable;

/// Selection list errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("index {index} is out of range for a list of {len}")]
    OutOfRange { index: usize, len: usize },
}

/// Snapshot handed to observers on every refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Refresh<'a> {
    pub selected: Option<usize>,
    pub len: usize,
    /// Transient status that replaces the restriction line for this refresh
    pub message: Option<&'a str>,
}

/// Display-name function: `(item, position) -> label`
pub type Namer<T> = Box<dyn Fn(&T, usize) -> String>;

/// Refresh callback
pub type Observer = Box<dyn FnMut(&Refresh<'_>)>;

/// Ordered list with a single selected position
pub struct SelectionList<T> {
    items: Vec<T>,
    selected: Option<usize>,
    namer: Namer<T>,
    observers: Vec<Observer>,
    /// Status override from the most recent refresh
    message: Option<String>,
}

impl<T: Listable + 'static> SelectionList<T> {
    /// Create an empty list that names items by their intrinsic name
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            namer: Box::new(|item: &T, _| item.display_name()),
            observers: Vec::new(),
            message: None,
        }
    }

    /// Create a list seeded with `items`, first one selected
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Self {
        let mut list = Self::new();
        for item in items {
            list.add(item);
        }
        list
    }
}

impl<T: Listable + 'static> Default for SelectionList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SelectionList<T> {
    /// Replace the display-name function (builder form)
    pub fn with_namer(mut self, namer: impl Fn(&T, usize) -> String + 'static) -> Self {
        self.namer = Box::new(namer);
        self
    }

    /// Replace the display-name function
    pub fn set_namer(&mut self, namer: impl Fn(&T, usize) -> String + 'static) {
        self.namer = Box::new(namer);
    }

    /// Register a refresh observer
    pub fn subscribe(&mut self, observer: impl FnMut(&Refresh<'_>) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Append an item. The very first item of an empty list becomes selected.
    pub fn add(&mut self, item: T) {
        self.items.push(item);
        if self.items.len() == 1 {
            self.selected = Some(0);
        }
        self.notify(None);
    }

    /// Select the item at `index`
    pub fn select(&mut self, index: usize) -> Result<(), SelectionError> {
        if index >= self.items.len() {
            return Err(SelectionError::OutOfRange {
                index,
                len: self.items.len(),
            });
        }
        self.selected = Some(index);
        self.notify(None);
        Ok(())
    }

    /// Move the selection one row down, stopping at the last row
    pub fn select_next(&mut self) {
        if let Some(i) = self.selected {
            if i + 1 < self.items.len() {
                self.selected = Some(i + 1);
                self.notify(None);
            }
        }
    }

    /// Move the selection one row up, stopping at the first row
    pub fn select_prev(&mut self) {
        if let Some(i) = self.selected {
            if i > 0 {
                self.selected = Some(i - 1);
                self.notify(None);
            }
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected(&self) -> Option<&T> {
        self.selected.and_then(|i| self.items.get(i))
    }

    /// Mutable access to the selected record. Does not notify; callers
    /// follow up with `refresh`.
    pub fn selected_mut(&mut self) -> Option<&mut T> {
        match self.selected {
            Some(i) => self.items.get_mut(i),
            None => None,
        }
    }

    /// Remove the selected item and return it.
    ///
    /// The cursor stays on the same row (which now holds the following item)
    /// unless the removed row was the last one, in which case it steps up.
    /// No-op when nothing is selected.
    pub fn remove_selected(&mut self) -> Option<T> {
        let index = self.selected?;
        let next = self.index_after_removal(index);
        let removed = self.items.remove(index);
        self.selected = next;
        self.notify(None);
        Some(removed)
    }

    /// Where the cursor goes once `index` is removed. Computed before mutation.
    fn index_after_removal(&self, index: usize) -> Option<usize> {
        let len = self.items.len();
        if len <= 1 {
            None
        } else if index == len - 1 {
            Some(index - 1)
        } else {
            Some(index)
        }
    }

    /// Re-render request. `message` overrides the status line for this
    /// refresh only.
    pub fn refresh(&mut self, message: Option<&str>) {
        self.notify(message);
    }

    /// Status override from the most recent refresh
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Decorated label for the row at `index`
    pub fn name_of(&self, index: usize) -> Option<String> {
        self.items.get(index).map(|item| (self.namer)(item, index))
    }

    /// Decorated labels for every row, in order
    pub fn names(&self) -> Vec<String> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (self.namer)(item, i))
            .collect()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn notify(&mut self, message: Option<&str>) {
        debug_assert!(
            match self.selected {
                None => self.items.is_empty(),
                Some(i) => i < self.items.len(),
            },
            "selection {:?} inconsistent with {} items",
            self.selected,
            self.items.len()
        );

        self.message = message.map(str::to_string);
        let refresh = Refresh {
            selected: self.selected,
            len: self.items.len(),
            message: self.message.as_deref(),
        };
        for observer in self.observers.iter_mut() {
            observer(&refresh);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SelectionList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionList")
            .field("items", &self.items)
            .field("selected", &self.selected)
            .field("message", &self.message)
            .field("observers", &self.observers.len())
            .finish()
    }
}
