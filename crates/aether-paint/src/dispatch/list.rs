use super::DrawCmd;

/// Per-frame draw stream, in paint order.
///
/// Commands are recorded in commit order with the preview last; renderers
/// must preserve this order.
#[derive(Debug, Default)]
pub struct DrawList<'a> {
    items: Vec<DrawCmd<'a>>,
}

impl<'a> DrawList<'a> {
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { items: Vec::with_capacity(capacity) }
    }

    #[inline]
    pub fn push(&mut self, cmd: DrawCmd<'a>) {
        self.items.push(cmd);
    }

    #[inline]
    pub fn items(&self) -> &[DrawCmd<'a>] {
        &self.items
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, DrawCmd<'a>> {
        self.items.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'l, 'a> IntoIterator for &'l DrawList<'a> {
    type Item = &'l DrawCmd<'a>;
    type IntoIter = std::slice::Iter<'l, DrawCmd<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
