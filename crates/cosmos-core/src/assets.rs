use crate::constants::{FIRST_FRAME_NUMBER, IMAGE_DIR};

/// Ordered list of photo URLs the background loads.
///
/// The list is fixed in code; index `i` is what the gallery modal receives
/// when sprite `i` is clicked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageCatalog {
    frames: Vec<usize>,
}

impl ImageCatalog {
    /// `n` consecutive frames starting at `DSCF3726.JPG`.
    pub fn sequential(n: usize) -> Self {
        Self {
            frames: (0..n).map(|i| FIRST_FRAME_NUMBER + i).collect(),
        }
    }

    /// The same `n` frames listed twice, for a denser field.
    pub fn duplicated(n: usize) -> Self {
        Self {
            frames: (0..2 * n).map(|i| FIRST_FRAME_NUMBER + i % n.max(1)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn file_name(&self, index: usize) -> Option<String> {
        self.frames.get(index).map(|n| format!("DSCF{n}.JPG"))
    }

    pub fn url(&self, index: usize) -> Option<String> {
        self.file_name(index).map(|f| format!("{IMAGE_DIR}/{f}"))
    }

    pub fn urls(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.len()).filter_map(|i| self.url(i))
    }

    /// Clamp an index coming from the scene into the catalog range.
    ///
    /// Returns `None` only when the catalog is empty.
    pub fn clamp_index(&self, index: usize) -> Option<usize> {
        clamp_index(index, self.len())
    }
}

#[inline]
pub fn clamp_index(index: usize, len: usize) -> Option<usize> {
    (len > 0).then(|| index.min(len - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_urls_follow_frame_numbers() {
        let c = ImageCatalog::sequential(35);
        assert_eq!(c.len(), 35);
        assert_eq!(c.url(0).as_deref(), Some("/images/DSCF3726.JPG"));
        assert_eq!(c.url(34).as_deref(), Some("/images/DSCF3760.JPG"));
        assert_eq!(c.url(35), None);
    }

    #[test]
    fn duplicated_wraps_around() {
        let c = ImageCatalog::duplicated(35);
        assert_eq!(c.len(), 70);
        assert_eq!(c.url(35), c.url(0));
        assert_eq!(c.url(69), c.url(34));
    }

    #[test]
    fn clamp_index_never_leaves_range() {
        assert_eq!(clamp_index(0, 0), None);
        assert_eq!(clamp_index(3, 5), Some(3));
        assert_eq!(clamp_index(99, 5), Some(4));
        assert_eq!(ImageCatalog::sequential(2).clamp_index(usize::MAX), Some(1));
    }
}
