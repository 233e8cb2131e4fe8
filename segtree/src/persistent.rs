use std::{ops::RangeBounds, sync::Arc};

use super::{
    build::{self, Assemble},
    error,
    index::{self, Segment, Span},
    operation::Operator,
    Result, SegtreeError,
};

/// 一度作られたら変更されない頂点。子が`None`なら、その部分木は単位元とみなす。
#[derive(Debug)]
struct Node<T> {
    left: Option<Arc<Node<T>>>,
    right: Option<Arc<Node<T>>>,
    value: T,
}

type Link<T> = Option<Arc<Node<T>>>;

impl<T> Node<T> {
    fn leaf(value: T) -> Arc<Self> {
        Arc::new(Self {
            left: None,
            right: None,
            value,
        })
    }

    fn join<OP: Operator<Query = T>>(op: &OP, left: Link<T>, right: Link<T>) -> Arc<Self> {
        let value = match (&left, &right) {
            (Some(l), Some(r)) => op.op(&l.value, &r.value),
            (Some(l), None) => op.op(&l.value, &op.ident()),
            (None, Some(r)) => op.op(&op.ident(), &r.value),
            (None, None) => op.ident(),
        };
        Arc::new(Self { left, right, value })
    }
}

struct Linked<'a, OP> {
    op: &'a OP,
}

impl<'a, T, OP: Operator<Query = T>> Assemble<T> for Linked<'a, OP> {
    type Output = Arc<Node<T>>;

    fn leaf(&mut self, _seg: Segment, value: T) -> Arc<Node<T>> {
        Node::leaf(value)
    }

    fn join(&mut self, _seg: Segment, left: Arc<Node<T>>, right: Arc<Node<T>>) -> Arc<Node<T>> {
        Node::join(self.op, Some(left), Some(right))
    }
}

/// 永続セグメント木の一つの版。
///
/// `set`・`update`・`transform`は新しい版を返し、`self`は変更しない。
/// 新しい版は根から葉までの経路上のO(log(n))個の頂点だけを新しく作り、
/// 残りの部分木は元の版と共有する。一度も書き込まれていない部分木は頂点を持たないので、
/// 非常に長い区間でも書き込んだ回数に比例するメモリしか使わない。
///
/// 頂点は変更されないので、公開済みの版は複数のスレッドから同時に読み書きの起点にできる。
#[derive(Debug)]
pub struct PersistentSegtree<T, OP> {
    len: usize,
    root: Link<T>,
    op: Arc<OP>,
}

impl<T, OP> Clone for PersistentSegtree<T, OP> {
    fn clone(&self) -> Self {
        Self {
            len: self.len,
            root: self.root.clone(),
            op: Arc::clone(&self.op),
        }
    }
}

impl<T, OP> PersistentSegtree<T, OP> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn operator(&self) -> &OP {
        &self.op
    }

    /// 二つの版が同じ根を共有しているか。
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// 位置`pos`に書き込まれた値への参照。
    ///
    /// 一度も書き込まれていない位置に対しては`SegtreeError::Uninitialized`を返す。
    pub fn get(&self, pos: usize) -> Result<&T> {
        let mut span = error::root_for(pos, self.len)?.span();
        let mut node = self.root.as_deref();
        while !span.is_leaf() {
            let (l, r) = span.children();
            (span, node) = if pos <= l.right {
                (l, node.and_then(|n| n.left.as_deref()))
            } else {
                (r, node.and_then(|n| n.right.as_deref()))
            };
        }
        node.map(|n| &n.value)
            .ok_or(SegtreeError::Uninitialized { index: pos })
    }

    fn with_root(&self, root: Arc<Node<T>>) -> Self {
        Self {
            len: self.len,
            root: Some(root),
            op: Arc::clone(&self.op),
        }
    }
}

impl<T, OP: Operator<Query = T>> PersistentSegtree<T, OP> {
    /// 頂点を一つも持たない、長さ`len`の版。すべての区間の値は単位元になる。
    pub fn new(len: usize, op: OP) -> Self {
        tracing::trace!(len, "created sparse persistent segment tree");
        Self {
            len,
            root: None,
            op: Arc::new(op),
        }
    }

    pub fn from_iter_op<I: IntoIterator<Item = T>>(iter: I, op: OP) -> Self {
        let source = iter.into_iter().collect::<Vec<_>>();
        let len = source.len();
        let root = build::build(len, source, &mut Linked { op: &op });
        Self {
            len,
            root,
            op: Arc::new(op),
        }
    }

    /// 根から位置`pos`の葉までの経路を作り直す。葉の値は`f(op, 元の値)`になる。
    fn path_copy<F>(&self, span: Span, node: Option<&Node<T>>, pos: usize, f: F) -> Result<Arc<Node<T>>>
    where
        F: FnOnce(&OP, Option<&T>) -> Result<T>,
    {
        if span.is_leaf() {
            return Ok(Node::leaf(f(&self.op, node.map(|n| &n.value))?));
        }
        let (l, r) = span.children();
        let left = node.and_then(|n| n.left.as_ref());
        let right = node.and_then(|n| n.right.as_ref());
        let (left, right) = if pos <= l.right {
            (Some(self.path_copy(l, left.map(|n| &**n), pos, f)?), right.cloned())
        } else {
            (left.cloned(), Some(self.path_copy(r, right.map(|n| &**n), pos, f)?))
        };
        Ok(Node::join(&*self.op, left, right))
    }

    fn rewrite<F>(&self, pos: usize, f: F) -> Result<Self>
    where
        F: FnOnce(&OP, Option<&T>) -> Result<T>,
    {
        let span = error::root_for(pos, self.len)?.span();
        let root = self.path_copy(span, self.root.as_deref(), pos, f)?;
        Ok(self.with_root(root))
    }

    /// 位置`pos`の値を`value`で置き換えた版を返す。
    pub fn set(&self, pos: usize, value: T) -> Result<Self> {
        self.rewrite(pos, |_, _| Ok(value))
    }

    /// 位置`pos`の値`a`を`op(a, value)`で置き換えた版を返す。書き込まれていなければ`a`は単位元。
    pub fn update(&self, pos: usize, value: T) -> Result<Self> {
        self.rewrite(pos, |op, old| {
            Ok(match old {
                Some(old) => op.op(old, &value),
                None => op.op(&op.ident(), &value),
            })
        })
    }

    /// 位置`pos`の値`a`を`f(a)`で置き換えた版を返す。
    ///
    /// 一度も書き込まれていない位置に対しては`SegtreeError::Uninitialized`を返す。
    pub fn transform<F>(&self, pos: usize, f: F) -> Result<Self>
    where
        F: FnOnce(&T) -> T,
    {
        self.rewrite(pos, |_, old| {
            old.map(f).ok_or(SegtreeError::Uninitialized { index: pos })
        })
    }

    /// 区間に含まれる値を`op`で畳み込んだ値。
    ///
    /// 範囲外の部分と頂点を持たない部分木は単位元として扱われる。
    pub fn query<R: RangeBounds<usize>>(&self, range: R) -> T
    where
        T: Clone,
    {
        match (Span::root(self.len), index::inclusive_bounds(range, self.len)) {
            (Some(root), Some((l, r))) => self.query_inner(root, self.root.as_deref(), l, r),
            _ => self.op.ident(),
        }
    }

    fn query_inner(&self, span: Span, node: Option<&Node<T>>, l: usize, r: usize) -> T
    where
        T: Clone,
    {
        let Some(node) = node.filter(|_| !span.is_disjoint(l, r)) else {
            return self.op.ident();
        };
        if span.is_covered_by(l, r) {
            return node.value.clone();
        }
        let (lc, rc) = span.children();
        self.op.op(
            &self.query_inner(lc, node.left.as_deref(), l, r),
            &self.query_inner(rc, node.right.as_deref(), l, r),
        )
    }

    pub fn all(&self) -> T
    where
        T: Clone,
    {
        self.root
            .as_ref()
            .map_or_else(|| self.op.ident(), |root| root.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::super::operation;
    use super::*;

    #[test]
    fn scenario_test() {
        let v0 = PersistentSegtree::new(4, operation::add::<i64>());
        let v1 = v0.set(2, 5).unwrap();
        let v2 = v1.set(2, 9).unwrap();
        assert_eq!(v0.query(2..=2), 0);
        assert_eq!(v1.query(2..=2), 5);
        assert_eq!(v2.query(2..=2), 9);
        assert_eq!(v2.query(..), 9);
    }

    #[test]
    fn build_and_query() {
        let base = PersistentSegtree::from_iter_op([1, 2, 3, 4, 5], operation::add());
        assert_eq!(base.query(1..=3), 9);
        assert_eq!(base.all(), 15);
        assert_eq!(base.query(3..100), 9);
        assert_eq!(base.query(5..), 0);
        assert_eq!(base.get(4), Ok(&5));
    }

    #[test]
    fn versions_are_isolated() {
        let base = PersistentSegtree::from_iter_op([4, 8, 15, 16, 23, 42], operation::max());
        let v1 = base.set(1, 100).unwrap();
        let v2 = v1.set(1, -1).unwrap();
        let v3 = base.update(5, 50).unwrap();
        assert_eq!(base.query(..3), 15);
        assert_eq!(v1.query(..3), 100);
        assert_eq!(v2.query(..3), 15);
        assert_eq!(v2.get(1), Ok(&-1));
        assert_eq!(v3.get(5), Ok(&50));
        assert_eq!(base.get(5), Ok(&42));
        assert_eq!(v1.get(5), Ok(&42));
    }

    #[test]
    fn shares_untouched_subtrees() {
        let base = PersistentSegtree::from_iter_op(0..8, operation::add::<i32>());
        let next = base.set(0, 10).unwrap();
        let (Some(a), Some(b)) = (&base.root, &next.root) else {
            panic!("roots should exist");
        };
        assert!(!Arc::ptr_eq(a, b));
        assert!(Arc::ptr_eq(a.right.as_ref().unwrap(), b.right.as_ref().unwrap()));
        assert!(!Arc::ptr_eq(a.left.as_ref().unwrap(), b.left.as_ref().unwrap()));
        assert!(!base.ptr_eq(&next));
        assert!(base.ptr_eq(&base.clone()));
    }

    #[test]
    fn set_and_update_are_distinct() {
        let v0 = PersistentSegtree::new(3, operation::add::<i32>());
        let v1 = v0.update(1, 4).unwrap();
        let v2 = v1.update(1, 4).unwrap();
        let v3 = v2.set(1, 4).unwrap();
        assert_eq!(v1.query(..), 4);
        assert_eq!(v2.query(..), 8);
        assert_eq!(v3.query(..), 4);
    }

    #[test]
    fn uninitialized_and_out_of_bounds() {
        let v0 = PersistentSegtree::new(4, operation::min::<u32>());
        let v1 = v0.set(1, 7).unwrap();
        assert_eq!(v1.get(1), Ok(&7));
        assert_eq!(v1.get(2), Err(SegtreeError::Uninitialized { index: 2 }));
        assert_eq!(v0.get(1), Err(SegtreeError::Uninitialized { index: 1 }));
        assert_eq!(
            v1.get(4),
            Err(SegtreeError::IndexOutOfBounds { index: 4, len: 4 })
        );
        assert_eq!(
            v1.set(4, 0).unwrap_err(),
            SegtreeError::IndexOutOfBounds { index: 4, len: 4 }
        );
        assert!(v1.update(9, 0).is_err());
        // 未初期化の位置でもクエリは単位元として扱う
        assert_eq!(v1.query(2..), u32::MAX);
    }

    #[test]
    fn transform_test() {
        let v0 = PersistentSegtree::new(5, operation::add::<i64>());
        let v1 = v0.set(3, 10).unwrap();
        let v2 = v1.transform(3, |x| x * 3).unwrap();
        assert_eq!(v2.get(3), Ok(&30));
        assert_eq!(v1.get(3), Ok(&10));
        assert_eq!(
            v1.transform(0, |x| x + 1).unwrap_err(),
            SegtreeError::Uninitialized { index: 0 }
        );
    }

    #[test]
    fn sparse_large_range() {
        let len = 1usize << 60;
        let mut version = PersistentSegtree::new(len, operation::add::<u64>());
        for (i, pos) in [0, 12345, 1 << 40, len - 1].into_iter().enumerate() {
            version = version.update(pos, i as u64 + 1).unwrap();
        }
        assert_eq!(version.all(), 10);
        assert_eq!(version.query(..=12345), 3);
        assert_eq!(version.query(12346..(1 << 40)), 0);
        assert_eq!(version.query((1 << 40)..), 7);
        assert_eq!(version.get(len - 1), Ok(&4));
        assert!(version.get(7).is_err());
    }

    #[test]
    fn maximum_length_range() {
        let len = usize::MAX;
        let v0 = PersistentSegtree::new(len, operation::add::<i64>());
        let v1 = v0.set(len - 1, 3).unwrap();
        let v2 = v1.update(0, 4).unwrap().transform(len - 1, |x| x * 2).unwrap();
        assert_eq!(v1.all(), 3);
        assert_eq!(v2.query(..), 10);
        assert_eq!(v2.query(1..), 6);
        assert_eq!(v2.query(..len - 1), 4);
        assert_eq!(v2.get(len - 1), Ok(&6));
        assert_eq!(v1.get(0), Err(SegtreeError::Uninitialized { index: 0 }));
        assert_eq!(
            v2.set(len, 1).map(|_| ()),
            Err(SegtreeError::IndexOutOfBounds { index: len, len })
        );
    }

    #[test]
    fn single_element_test() {
        let v0 = PersistentSegtree::new(1, operation::add::<i32>());
        assert_eq!(v0.query(0..=0), 0);
        let v1 = v0.set(0, 3).unwrap();
        assert_eq!(v1.query(0..=0), 3);
        assert_eq!(v1.all(), 3);
        assert!(v1.set(1, 3).is_err());
    }

    #[test]
    fn empty_test() {
        let v0 = PersistentSegtree::from_iter_op(Vec::<i32>::new(), operation::add());
        assert!(v0.is_empty());
        assert_eq!(v0.query(..), 0);
        assert_eq!(v0.all(), 0);
        assert!(v0.set(0, 1).is_err());
    }
}
