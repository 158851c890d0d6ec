/// A one-to-many relation stored as offsets into one flat member buffer.
///
/// Row `i` holds the members `members[offsets[i]..offsets[i + 1]]`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Relation<T> {
    offsets: Vec<u32>,
    members: Vec<T>,
}

impl<T> Default for Relation<T> {
    fn default() -> Self {
        Self {
            offsets: vec![0],
            members: Vec::new(),
        }
    }
}

impl<T: Copy> Relation<T> {
    pub(crate) fn with_capacity(rows: usize, members: usize) -> Self {
        let mut offsets = Vec::with_capacity(rows + 1);
        offsets.push(0);
        Self {
            offsets,
            members: Vec::with_capacity(members),
        }
    }

    pub(crate) fn from_rows(rows: Vec<Vec<T>>) -> Self {
        let member_count = rows.iter().map(Vec::len).sum();
        let mut relation = Self::with_capacity(rows.len(), member_count);
        for row in rows {
            relation.push_row(row);
        }
        relation
    }

    pub(crate) fn push_row(&mut self, row: impl IntoIterator<Item = T>) {
        self.members.extend(row);
        self.offsets.push(self.members.len() as u32);
    }

    #[inline]
    pub(crate) fn row(&self, i: usize) -> &[T] {
        &self.members[self.offsets[i] as usize..self.offsets[i + 1] as usize]
    }

    #[inline]
    pub(crate) fn get(&self, i: usize) -> Option<&[T]> {
        (i < self.len()).then(|| self.row(i))
    }

    /// Offset of the first member of row `i` in the flat buffer.
    #[inline]
    pub(crate) fn offset(&self, i: usize) -> usize {
        self.offsets[i] as usize
    }

    /// Number of rows.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    #[inline]
    pub(crate) fn member_count(&self) -> usize {
        self.members.len()
    }

    pub(crate) fn iter(&self) -> impl ExactSizeIterator<Item = &[T]> + '_ {
        (0..self.len()).map(move |i| self.row(i))
    }
}
