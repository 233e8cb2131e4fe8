use crate::{index::Segment, operation::Operator};

/// 葉と内部頂点の組み立て方。配列上の木と永続木で共有する。
pub(crate) trait Assemble<T> {
    type Output;
    fn leaf(&mut self, seg: Segment, value: T) -> Self::Output;
    fn join(&mut self, seg: Segment, left: Self::Output, right: Self::Output) -> Self::Output;
}

/// `source`の要素を左から葉に割り当て、下から順に組み立てる。O(n)。
///
/// `source`はちょうど`len`個の要素を持たなければならない。
pub(crate) fn build<T, I, A>(len: usize, source: I, assemble: &mut A) -> Option<A::Output>
where
    I: IntoIterator<Item = T>,
    A: Assemble<T>,
{
    let root = Segment::root(len)?;
    let mut source = source.into_iter();
    let built = build_inner(root, &mut source, assemble);
    debug_assert!(source.next().is_none());
    tracing::trace!(len, "built segment tree");
    Some(built)
}

fn build_inner<T, I, A>(seg: Segment, source: &mut I, assemble: &mut A) -> A::Output
where
    I: Iterator<Item = T>,
    A: Assemble<T>,
{
    if seg.is_leaf() {
        let Some(value) = source.next() else {
            unreachable!("source exhausted at position {}", seg.left);
        };
        assemble.leaf(seg, value)
    } else {
        let (l, r) = seg.children();
        let left = build_inner(l, source, assemble);
        let right = build_inner(r, source, assemble);
        assemble.join(seg, left, right)
    }
}

/// 平らな配列に書き込む組み立て方。
pub(crate) struct Flat<'a, T, OP> {
    pub data: &'a mut [T],
    pub op: &'a OP,
}

impl<'a, T, OP: Operator<Query = T>> Assemble<T> for Flat<'a, T, OP> {
    type Output = ();

    fn leaf(&mut self, seg: Segment, value: T) {
        self.data[seg.index] = value;
    }

    fn join(&mut self, seg: Segment, _left: (), _right: ()) {
        let (l, r) = seg.children();
        self.data[seg.index] = self.op.op(&self.data[l.index], &self.data[r.index]);
    }
}

/// 要素を集めて長さを確定させる。
pub(crate) fn collect_exact<T, I>(source: I, expected: usize) -> crate::Result<Vec<T>>
where
    I: IntoIterator<Item = T>,
{
    let source = source.into_iter().collect::<Vec<_>>();
    if source.len() == expected {
        Ok(source)
    } else {
        Err(crate::SegtreeError::LengthMismatch {
            expected,
            found: source.len(),
        })
    }
}
