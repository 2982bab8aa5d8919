//! Selected node ids. The rubber-band overlap test itself lives on
//! [`Rect::intersects`](super::types::Rect::intersects); this model only
//! tracks membership.

use std::collections::HashSet;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
	ids: HashSet<String>,
}

impl Selection {
	/// Replace the whole selection, as rubber-band dragging does on every
	/// pointer move.
	pub fn set(&mut self, ids: impl IntoIterator<Item = String>) {
		self.ids = ids.into_iter().collect();
	}

	pub fn clear(&mut self) {
		self.ids.clear();
	}

	pub fn contains(&self, id: &str) -> bool {
		self.ids.contains(id)
	}

	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}

	pub fn len(&self) -> usize {
		self.ids.len()
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.ids.iter().map(String::as_str)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn set_replaces_previous_contents() {
		let mut sel = Selection::default();
		sel.set(["1".to_string(), "2".to_string()]);
		assert!(sel.contains("1") && sel.contains("2"));
		sel.set(["3".to_string()]);
		assert!(!sel.contains("1"));
		assert_eq!(sel.len(), 1);
	}

	#[test]
	fn clear_empties() {
		let mut sel = Selection::default();
		sel.set(["1".to_string()]);
		sel.clear();
		assert!(sel.is_empty());
	}
}
