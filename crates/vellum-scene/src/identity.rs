//! Stable identities for drawable elements.
//!
//! Animation state is keyed by the string an element reports here. Two
//! elements that report the same identity share state, which is how an
//! element rebuilt from a new model is matched to last frame's record.

use std::borrow::Cow;
use std::rc::Rc;

pub trait Identify {
    fn identity(&self) -> Cow<'_, str>;
}

/// Identity string of `element`.
pub fn identify<T: Identify + ?Sized>(element: &T) -> Cow<'_, str> {
    element.identity()
}

impl Identify for str {
    fn identity(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl Identify for String {
    fn identity(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl<T: Identify + ?Sized> Identify for &T {
    fn identity(&self) -> Cow<'_, str> {
        (**self).identity()
    }
}

impl<T: Identify + ?Sized> Identify for Rc<T> {
    fn identity(&self) -> Cow<'_, str> {
        (**self).identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Cell {
        row: usize,
        col: usize,
    }

    impl Identify for Cell {
        fn identity(&self) -> Cow<'_, str> {
            Cow::Owned(format!("cell_{}_{}", self.row, self.col))
        }
    }

    #[test]
    fn equal_elements_have_equal_identities() {
        let a = Cell { row: 1, col: 2 };
        let b = Cell { row: 1, col: 2 };
        assert_eq!(identify(&a), identify(&b));
        assert_ne!(identify(&a), identify(&Cell { row: 2, col: 1 }));
    }

    #[test]
    fn strings_identify_as_themselves() {
        assert_eq!(identify("box"), "box");
        assert_eq!(identify(&String::from("box")), "box");
        assert_eq!(identify(&Rc::new(Cell { row: 0, col: 0 })), "cell_0_0");
    }
}
